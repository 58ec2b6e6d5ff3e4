use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Directory name of the default publishing root, relative to the document root.
pub const DEFAULT_PUBLISHING_DIR: &str = "linkveil";

/// Configuration for a publishing target.
///
/// All paths are expected to be absolute. The publishing root is the only
/// optional piece; when unset it defaults to [`DEFAULT_PUBLISHING_DIR`]
/// under the document root.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// the web server's document root; public addresses are
    ///  expressed relative to this directory
    pub document_root: PathBuf,
    /// root directory the storage layer keeps its files under;
    ///  resource identifiers resolve relative to it
    pub storage_root: PathBuf,
    /// base directory for all mirror entries, if not set then
    ///  a fixed subdirectory of the document root will be used
    #[serde(default)]
    pub publishing_root: Option<PathBuf>,
}

impl Config {
    pub fn new(document_root: impl Into<PathBuf>, storage_root: impl Into<PathBuf>) -> Self {
        Self {
            document_root: document_root.into(),
            storage_root: storage_root.into(),
            publishing_root: None,
        }
    }

    /// Resolve the effective publishing root.
    ///
    /// Falls back to `<document_root>/linkveil` when no explicit root is
    /// configured. The directory is not created here; creation is deferred
    /// to the first publish operation.
    pub fn publishing_root(&self) -> PathBuf {
        self.publishing_root
            .clone()
            .unwrap_or_else(|| self.document_root.join(DEFAULT_PUBLISHING_DIR))
    }

    pub fn document_root(&self) -> &Path {
        &self.document_root
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }
}
