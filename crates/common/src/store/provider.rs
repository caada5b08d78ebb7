use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::visibility::Visibility;

/// A single stored resource, addressed by `(bundle, filename)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub bundle: String,
    pub filename: String,
    /// Owner of the whole bundle, identical for every resource in it
    pub owner: String,
    pub visibility: Visibility,
    /// Opaque payload, stored and returned as-is
    pub content: serde_json::Value,
}

/// Result of [`ResourceStore::create_resource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// The bundle did not exist: it is now owned by the resource's owner and
    ///  holds the resource
    Created,
    /// The bundle already existed and nothing was written
    Taken { owner: String },
}

#[async_trait]
pub trait ResourceStore: Send + Sync + Debug + Clone + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Get the owner of a bundle
    ///
    /// # Returns
    /// * `Ok(Some(owner))` - The bundle exists and is owned by `owner`
    /// * `Ok(None)` - The bundle does not exist yet
    async fn bundle_owner(&self, bundle: &str) -> Result<Option<String>, Self::Error>;

    /// Create `resource.bundle` owned by `resource.owner` and write its first
    ///  resource, unless the bundle already exists
    ///
    /// Both happen or neither does. When two callers race on the same new
    ///  bundle exactly one of them gets [`Claim::Created`]; the others get
    ///  [`Claim::Taken`] with the winner as owner.
    async fn create_resource(&self, resource: &Resource) -> Result<Claim, Self::Error>;

    /// Fetch a single resource
    async fn get_resource(
        &self,
        bundle: &str,
        filename: &str,
    ) -> Result<Option<Resource>, Self::Error>;

    /// List every resource in a bundle
    ///
    /// Ordering must be deterministic; both bundled stores return
    ///  resources in the order they were first written.
    async fn list_resources(&self, bundle: &str) -> Result<Vec<Resource>, Self::Error>;

    /// Insert a resource or replace the one at the same `(bundle, filename)`
    async fn upsert_resource(&self, resource: Resource) -> Result<(), Self::Error>;
}
