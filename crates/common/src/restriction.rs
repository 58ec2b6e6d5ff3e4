//! Access restriction publishers.
//!
//! A mirror directory holding entries for an authenticated session must be
//! locked down at the web-server level before anything inside it becomes
//! reachable. The publishers here write whatever artifact the web server
//! needs for that; enforcement itself stays with the web server and the
//! delivery component sitting in front of it.
//!
//! Implementations must be safe to call repeatedly on the same directory:
//! concurrent publishers racing on a fresh directory all write the same
//! artifact, so overwriting has to converge rather than fail.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur while writing a restriction artifact.
#[derive(Debug, thiserror::Error)]
pub enum ProtectionError {
    #[error("failed to write access restriction at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Capability for restricting direct web access to a directory.
///
/// Injected into the publishing target at construction. `protect` is invoked
/// on a mirror directory before the first protected entry is linked into it.
pub trait AccessRestrictionPublisher: Send + Sync {
    fn protect(&self, dir: &Path) -> Result<(), ProtectionError>;
}

/// Content of the `.htaccess` file written by [`HtaccessPublisher`].
///
/// Apache 2.4 syntax. Direct requests are denied outright; the delivery
/// component reaches the file through the filesystem, not through HTTP.
const HTACCESS_CONTENT: &str = "Require all denied\n";

/// Restricts a directory by dropping a deny-all `.htaccess` file into it.
///
/// Requires the Apache vhost to enable `AllowOverride AuthConfig` (or
/// `All`) for the publishing root.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtaccessPublisher;

impl AccessRestrictionPublisher for HtaccessPublisher {
    fn protect(&self, dir: &Path) -> Result<(), ProtectionError> {
        let path = dir.join(".htaccess");
        // full overwrite so concurrent writers converge on identical content
        fs::write(&path, HTACCESS_CONTENT).map_err(|source| ProtectionError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "wrote access restriction");
        Ok(())
    }
}

/// Publisher for setups where the web server is configured out of band.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

impl AccessRestrictionPublisher for NoopPublisher {
    fn protect(&self, _dir: &Path) -> Result<(), ProtectionError> {
        Ok(())
    }
}
