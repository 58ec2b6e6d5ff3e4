//! The publishing target orchestrates locator, obfuscator, mirror, and the
//! access restriction publisher into the two publish operations.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::config::Config;
use crate::context::RequestContext;
use crate::restriction::AccessRestrictionPublisher;

use super::error::PublishError;
use super::locator::{Resource, ResourceLocator};
use super::mirror::Mirror;
use super::obfuscate;

/// Publishes access-restricted files into the web-reachable mirror tree.
///
/// Stateless per request: every operation takes an immutable
/// [`RequestContext`] snapshot and either returns the web-root-relative
/// address of the published entry or a tagged failure. The same inputs
/// always map to the same address, so repeated and concurrent publishes of
/// one (source, context) pair converge on a single mirror entry.
pub struct PublishingTarget {
    locator: ResourceLocator,
    mirror: Mirror,
    restriction: Box<dyn AccessRestrictionPublisher>,
    document_root: PathBuf,
    root_initialized: OnceLock<()>,
}

impl PublishingTarget {
    /// Build a target from configuration and an injected restriction
    /// publisher capability.
    pub fn new(config: &Config, restriction: Box<dyn AccessRestrictionPublisher>) -> Self {
        let publishing_root = config.publishing_root();
        Self {
            locator: ResourceLocator::new(config.storage_root(), config.document_root()),
            mirror: Mirror::new(publishing_root),
            restriction,
            document_root: config.document_root().to_path_buf(),
            root_initialized: OnceLock::new(),
        }
    }

    /// Publish a storage resource.
    ///
    /// Returns the public address of its mirror entry, creating the entry
    /// if this is the first publish for the (source, context) pair.
    pub fn publish_resource(
        &self,
        resource: &Resource,
        ctx: &RequestContext,
    ) -> Result<String, PublishError> {
        let source = self.locator.resolve_resource(resource)?;
        self.publish_source(&source, ctx)
    }

    /// Publish a file already under the document root but shielded from
    /// direct access, referenced by its raw URI.
    pub fn publish_uri(&self, uri: &str, ctx: &RequestContext) -> Result<String, PublishError> {
        let source = self.locator.resolve_uri(uri)?;
        self.publish_source(&source, ctx)
    }

    fn publish_source(&self, source: &Path, ctx: &RequestContext) -> Result<String, PublishError> {
        let segment =
            obfuscate::public_path_segment(ctx.location_id(), &ctx.context_hash(), source);
        let target = self.mirror.publishing_root().join(&segment);
        let address = self.public_address(&target)?;

        match target.symlink_metadata() {
            // entry already materialized (possibly dangling; stale entries
            // are cleaned up externally, never re-pointed here)
            Ok(_) => {
                tracing::debug!(%address, "mirror entry already published");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.ensure_publishing_root()?;
                self.mirror.ensure_link(
                    source,
                    &target,
                    ctx.is_authenticated(),
                    self.restriction.as_ref(),
                )?;
            }
            Err(e) => {
                return Err(PublishError::MirrorIo {
                    path: target,
                    source: e,
                })
            }
        }

        Ok(address)
    }

    /// The portion of the target path a web client would request.
    fn public_address(&self, target: &Path) -> Result<String, PublishError> {
        let relative = target
            .strip_prefix(&self.document_root)
            .map_err(|_| PublishError::OutsideDocumentRoot(target.to_path_buf()))?;
        Ok(relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"))
    }

    /// One-time lazy creation of the publishing root. `create_dir_all`
    /// keeps the cross-process race benign; the guard only spares the
    /// repeated syscall within this instance.
    fn ensure_publishing_root(&self) -> Result<(), PublishError> {
        if self.root_initialized.get().is_none() {
            let root = self.mirror.publishing_root();
            std::fs::create_dir_all(root).map_err(|source| PublishError::MirrorIo {
                path: root.to_path_buf(),
                source,
            })?;
            let _ = self.root_initialized.set(());
        }
        Ok(())
    }

    pub fn publishing_root(&self) -> &Path {
        self.mirror.publishing_root()
    }

    pub fn document_root(&self) -> &Path {
        &self.document_root
    }
}
