/**
 * Visibility levels attached to every resource,
 *  and the normalization rules for turning
 *  untrusted strings into one.
 */
pub mod visibility;
/**
 * Pure read/write decision functions.
 *  No state, no I/O, no logging.
 */
pub mod permissions;
/**
 * Bundle ownership policy built on top of
 *  the permission checks: who may create a
 *  bundle, who may write into it, and what
 *  a requester is allowed to see.
 */
pub mod policy;
/**
 * Persistence contract for resources and
 *  bundle owners, plus an in-memory store
 *  used by tests and ephemeral deployments.
 */
pub mod store;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::permissions::{can_read, can_write};
    pub use crate::policy::{
        handle_list_read, handle_read, handle_write, Outcome, PolicyError, WriteRequest,
    };
    pub use crate::store::{Claim, MemoryResourceStore, Resource, ResourceStore};
    pub use crate::version::build_info;
    pub use crate::visibility::{Visibility, VisibilityParseError};
}
