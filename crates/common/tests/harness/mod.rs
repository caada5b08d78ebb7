//! Shared helpers for policy integration tests
#![allow(dead_code)]

use common::prelude::*;
use serde_json::Value;

pub const OWNER: &str = "owner@x.com";
pub const OTHER: &str = "other@x.com";

/// Write `content` to `(bundle, filename)` as `requester`
pub async fn write(
    store: &MemoryResourceStore,
    requester: Option<&str>,
    bundle: &str,
    filename: &str,
    visibility: Visibility,
    content: Value,
) -> Result<Outcome, PolicyError<<MemoryResourceStore as ResourceStore>::Error>> {
    handle_write(
        store,
        requester,
        WriteRequest {
            bundle,
            filename,
            visibility,
            content,
        },
    )
    .await
}

/// Set up a store holding one bundle owned by [`OWNER`]
pub async fn setup_owned_bundle(bundle: &str, visibility: Visibility) -> MemoryResourceStore {
    let store = MemoryResourceStore::new();
    write(
        &store,
        Some(OWNER),
        bundle,
        "index.json",
        visibility,
        serde_json::json!({"seed": true}),
    )
    .await
    .unwrap();
    store
}
