//! # Permissions
//!
//! The two decision functions every request goes through. Both are total:
//! any combination of inputs yields a boolean.
//!
//! Ownership is an exact, case-sensitive string match. An empty owner or an
//! empty requester never counts as a match.

use crate::visibility::Visibility;

/// Whether `requester` may read a resource owned by `owner`.
pub fn can_read(visibility: Visibility, owner: &str, requester: Option<&str>) -> bool {
    if visibility.is_public() {
        return true;
    }

    is_owner(owner, requester)
}

/// Whether `requester` may write a resource owned by `owner`.
///
/// Public read access never implies public write access.
pub fn can_write(visibility: Visibility, owner: &str, requester: Option<&str>) -> bool {
    if visibility == Visibility::PublicWrite {
        return true;
    }

    is_owner(owner, requester)
}

fn is_owner(owner: &str, requester: Option<&str>) -> bool {
    match requester {
        Some(requester) => !owner.is_empty() && !requester.is_empty() && requester == owner,
        None => false,
    }
}
