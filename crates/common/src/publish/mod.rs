//! The publishing protocol.
//!
//! Maps an internal resource identifier (or a raw document-root-relative
//! URI) onto a stable obfuscated public path, and lazily materializes that
//! mapping as a symlink in the publishing tree:
//!
//! ```text
//! <publishing_root>/<location_id>/<context_hash>/<sha1(dirname)>/<basename>
//! ```
//!
//! The mapping is deterministic, so concurrent publishers racing on the same
//! (source, context) pair converge on the same entry instead of corrupting
//! each other. Entries are created at most once and never invalidated here;
//! cleaning up stale ones is an external concern.

mod error;
mod locator;
mod mirror;
pub mod obfuscate;
mod target;

pub use error::PublishError;
pub use locator::{Resource, ResourceLocator};
pub use mirror::Mirror;
pub use target::PublishingTarget;
