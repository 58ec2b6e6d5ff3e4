//! Source resolution.
//!
//! Turns a resource identifier or a raw document-root-relative URI into a
//! verified absolute source path. A missing file is the expected negative
//! outcome here, not an exception; callers branch on
//! [`PublishError::SourceNotFound`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::PublishError;

/// A file held by the storage layer, referenced by its identifier.
///
/// The identifier is opaque and path-like; a leading separator is tolerated
/// and stripped before concatenation. Read-only input, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    identifier: String,
}

impl Resource {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// Resolves resources and raw URIs to verified absolute source paths.
#[derive(Debug, Clone)]
pub struct ResourceLocator {
    storage_root: PathBuf,
    document_root: PathBuf,
}

impl ResourceLocator {
    pub fn new(storage_root: impl Into<PathBuf>, document_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
            document_root: document_root.into(),
        }
    }

    /// Resolve a storage resource to its absolute source path.
    ///
    /// Joins the storage root with the identifier (stripped of leading
    /// separators) and verifies the file exists.
    pub fn resolve_resource(&self, resource: &Resource) -> Result<PathBuf, PublishError> {
        let relative = resource.identifier().trim_start_matches('/');
        let candidate = self.storage_root.join(relative);
        self.verify_exists(candidate)
    }

    /// Resolve a raw URI, interpreted relative to the document root.
    ///
    /// The joined path is canonicalized and must stay inside the document
    /// root; a URI that escapes it (via `..` or a symlink) is rejected with
    /// [`PublishError::OutsideDocumentRoot`] rather than published.
    pub fn resolve_uri(&self, uri: &str) -> Result<PathBuf, PublishError> {
        let relative = uri.trim_start_matches('/');
        let candidate = self.document_root.join(relative);

        let canonical = candidate.canonicalize().map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                PublishError::SourceNotFound(candidate.clone())
            } else {
                PublishError::MirrorIo {
                    path: candidate.clone(),
                    source,
                }
            }
        })?;
        let canonical_root =
            self.document_root
                .canonicalize()
                .map_err(|source| PublishError::MirrorIo {
                    path: self.document_root.clone(),
                    source,
                })?;

        if !canonical.starts_with(&canonical_root) {
            tracing::warn!(uri, path = %canonical.display(), "rejected uri escaping the document root");
            return Err(PublishError::OutsideDocumentRoot(canonical));
        }

        Ok(canonical)
    }

    fn verify_exists(&self, candidate: PathBuf) -> Result<PathBuf, PublishError> {
        match candidate.try_exists() {
            Ok(true) => Ok(candidate),
            Ok(false) => {
                tracing::debug!(path = %candidate.display(), "source does not exist");
                Err(PublishError::SourceNotFound(candidate))
            }
            Err(source) => Err(PublishError::MirrorIo {
                path: candidate,
                source,
            }),
        }
    }

    pub fn document_root(&self) -> &Path {
        &self.document_root
    }
}
