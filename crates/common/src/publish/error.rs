use std::io;
use std::path::PathBuf;

use crate::restriction::ProtectionError;

/// Errors that can occur during a publish operation.
///
/// `SourceNotFound` is the expected, recoverable outcome for a missing
/// source file; everything else is fatal for the single request that hit it.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The referenced resource or URI does not correspond to an existing
    /// file. No filesystem writes have happened when this is returned.
    #[error("source not found: {0}")]
    SourceNotFound(PathBuf),

    /// A raw URI escaped the document root after canonicalization.
    #[error("uri resolves outside the document root: {0}")]
    OutsideDocumentRoot(PathBuf),

    /// Directory creation, link creation, or an existence probe failed for
    /// a source that did resolve.
    #[error("mirror i/o failure at {path}: {source}")]
    MirrorIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The access restriction artifact could not be written. The mirror
    /// link is not created when this happens.
    #[error("access restriction failure: {0}")]
    Protection(#[from] ProtectionError),
}

impl PublishError {
    /// Whether this is the recoverable "source missing" outcome rather
    /// than a genuine failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PublishError::SourceNotFound(_))
    }
}
