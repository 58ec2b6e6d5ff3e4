//! Mirror entry materialization.
//!
//! Creates the public-facing directory tree and the symlink that aliases a
//! target path to its verified source, without copying bytes. For
//! authenticated contexts the access restriction is published on the target
//! directory before the link exists, so there is never a window in which the
//! entry is reachable but unprotected.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::restriction::AccessRestrictionPublisher;

use super::error::PublishError;

/// Creates mirror entries under the publishing root.
#[derive(Debug, Clone)]
pub struct Mirror {
    publishing_root: PathBuf,
}

impl Mirror {
    pub fn new(publishing_root: impl Into<PathBuf>) -> Self {
        Self {
            publishing_root: publishing_root.into(),
        }
    }

    pub fn publishing_root(&self) -> &Path {
        &self.publishing_root
    }

    /// Materialize the mirror entry `target -> source`.
    ///
    /// Creates the target's directory chain, publishes the access
    /// restriction on it when the context is authenticated, then creates
    /// the symlink. Losing a creation race to a concurrent publisher is
    /// fine: the mapping is deterministic, so an already-existing directory
    /// or link is the same entry we were about to create.
    pub fn ensure_link(
        &self,
        source: &Path,
        target: &Path,
        authenticated: bool,
        restriction: &dyn AccessRestrictionPublisher,
    ) -> Result<(), PublishError> {
        let target_dir = target.parent().unwrap_or(&self.publishing_root);

        fs::create_dir_all(target_dir).map_err(|e| PublishError::MirrorIo {
            path: target_dir.to_path_buf(),
            source: e,
        })?;

        // protection must be in place before the link makes content reachable
        if authenticated {
            restriction.protect(target_dir)?;
        }

        match symlink(source, target) {
            Ok(()) => {
                tracing::info!(
                    source = %source.display(),
                    target = %target.display(),
                    "created mirror entry"
                );
                Ok(())
            }
            // a concurrent publisher won the race; same mapping, same entry
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(PublishError::MirrorIo {
                path: target.to_path_buf(),
                source: e,
            }),
        }
    }
}

#[cfg(unix)]
fn symlink(source: &Path, target: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(source, target)
}

#[cfg(windows)]
fn symlink(source: &Path, target: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(source, target)
}
