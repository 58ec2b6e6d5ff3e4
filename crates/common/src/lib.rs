/**
 * Configuration for the publishing tree: document root,
 *  storage source root, and the optional publishing root
 *  override.
 */
pub mod config;
/**
 * Immutable per-request context snapshot: location id,
 *  authentication state, and the opaque access token it
 *  derives the partitioning hash from.
 */
pub mod context;
/**
 * The publishing protocol itself. Maps a resource or raw
 *  URI onto a stable obfuscated public path and lazily
 *  materializes it as a symlink mirror entry.
 */
pub mod publish;
/**
 * Access restriction publishers. Narrow capability for
 *  locking a mirror directory down at the web-server
 *  level before protected content becomes reachable.
 */
pub mod restriction;

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::context::RequestContext;
    pub use crate::publish::{PublishError, PublishingTarget, Resource, ResourceLocator};
    pub use crate::restriction::{
        AccessRestrictionPublisher, HtaccessPublisher, NoopPublisher, ProtectionError,
    };
}
