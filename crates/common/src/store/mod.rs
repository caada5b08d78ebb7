mod memory;
mod provider;

pub use memory::{MemoryResourceStore, MemoryResourceStoreError};
pub use provider::{Claim, Resource, ResourceStore};
