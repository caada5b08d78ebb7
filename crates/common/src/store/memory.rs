use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::provider::{Claim, Resource, ResourceStore};

/// In-memory resource store using HashMaps
#[derive(Debug, Clone)]
pub struct MemoryResourceStore {
    inner: Arc<RwLock<MemoryResourceStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryResourceStoreInner {
    /// bundle -> owner
    owners: HashMap<String, String>,
    /// bundle -> resources in first-write order
    resources: HashMap<String, Vec<Resource>>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryResourceStoreError {
    #[error("memory store error: {0}")]
    Internal(String),
}

impl MemoryResourceStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryResourceStoreInner::default())),
        }
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, MemoryResourceStoreInner>, MemoryResourceStoreError>
    {
        self.inner.read().map_err(|e| {
            MemoryResourceStoreError::Internal(format!("failed to acquire read lock: {}", e))
        })
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, MemoryResourceStoreInner>, MemoryResourceStoreError>
    {
        self.inner.write().map_err(|e| {
            MemoryResourceStoreError::Internal(format!("failed to acquire write lock: {}", e))
        })
    }
}

impl Default for MemoryResourceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceStore for MemoryResourceStore {
    type Error = MemoryResourceStoreError;

    async fn bundle_owner(&self, bundle: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.read()?.owners.get(bundle).cloned())
    }

    async fn create_resource(&self, resource: &Resource) -> Result<Claim, Self::Error> {
        let mut inner = self.write()?;
        if let Some(owner) = inner.owners.get(&resource.bundle) {
            return Ok(Claim::Taken {
                owner: owner.clone(),
            });
        }

        inner
            .owners
            .insert(resource.bundle.clone(), resource.owner.clone());
        inner
            .resources
            .insert(resource.bundle.clone(), vec![resource.clone()]);
        Ok(Claim::Created)
    }

    async fn get_resource(
        &self,
        bundle: &str,
        filename: &str,
    ) -> Result<Option<Resource>, Self::Error> {
        let inner = self.read()?;
        Ok(inner
            .resources
            .get(bundle)
            .and_then(|resources| resources.iter().find(|r| r.filename == filename))
            .cloned())
    }

    async fn list_resources(&self, bundle: &str) -> Result<Vec<Resource>, Self::Error> {
        let inner = self.read()?;
        Ok(inner.resources.get(bundle).cloned().unwrap_or_default())
    }

    async fn upsert_resource(&self, resource: Resource) -> Result<(), Self::Error> {
        let mut inner = self.write()?;

        // A direct upsert into an unknown bundle still establishes its owner
        inner
            .owners
            .entry(resource.bundle.clone())
            .or_insert_with(|| resource.owner.clone());

        let resources = inner.resources.entry(resource.bundle.clone()).or_default();
        match resources
            .iter_mut()
            .find(|existing| existing.filename == resource.filename)
        {
            Some(existing) => *existing = resource,
            None => resources.push(resource),
        }

        Ok(())
    }
}
