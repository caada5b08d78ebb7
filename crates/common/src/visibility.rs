//! # Visibility
//!
//! Every resource carries a [`Visibility`] that decides who besides the bundle
//! owner may touch it.
//!
//! Visibility arrives from two untrusted places, and each has its own
//! normalization:
//!
//! - **Request headers** ([`Visibility::from_header`]): a missing or
//!   unrecognized value becomes [`Visibility::PublicRead`]. A writer never ends
//!   up with a more permissive resource than they asked for.
//! - **Stored records** ([`Visibility::from_stored`]): an unrecognized value
//!   becomes [`Visibility::PublicNone`], so a corrupted row is only ever
//!   readable by its owner.
//!
//! [`FromStr`] is strict and rejects anything outside the canonical names.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Header carrying the requested visibility on writes.
pub const PUBLIC_ACCESS_HEADER: &str = "Public-Access";

/// Who may access a resource besides its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    /// Anyone may read or write.
    PublicWrite,
    /// Anyone may read; only the owner may write.
    #[default]
    PublicRead,
    /// Only the owner may read or write.
    PublicNone,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::PublicWrite => "public-write",
            Visibility::PublicRead => "public-read",
            Visibility::PublicNone => "public-none",
        }
    }

    /// Whether anonymous requesters may read.
    pub fn is_public(&self) -> bool {
        matches!(self, Visibility::PublicRead | Visibility::PublicWrite)
    }

    /// Normalize a `Public-Access` header value.
    ///
    /// Accepts both the short (`write`, `none`) and canonical
    /// (`public-write`, `public-none`) spellings. Everything else, including
    /// an absent header, is [`Visibility::PublicRead`].
    pub fn from_header(value: Option<&str>) -> Self {
        match value {
            Some("write") | Some("public-write") => Visibility::PublicWrite,
            Some("none") | Some("public-none") => Visibility::PublicNone,
            _ => Visibility::PublicRead,
        }
    }

    /// Parse a visibility read back from storage. Unknown values are
    /// [`Visibility::PublicNone`].
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or(Visibility::PublicNone)
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized visibility: {0}")]
pub struct VisibilityParseError(pub String);

impl FromStr for Visibility {
    type Err = VisibilityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public-write" => Ok(Visibility::PublicWrite),
            "public-read" => Ok(Visibility::PublicRead),
            "public-none" => Ok(Visibility::PublicNone),
            other => Err(VisibilityParseError(other.to_string())),
        }
    }
}
