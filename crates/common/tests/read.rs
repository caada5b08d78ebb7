//! Integration tests for single-resource reads and bundle listings

mod harness;

use common::prelude::*;
use harness::{write, OTHER, OWNER};
use serde_json::json;

/// Bundle with one public resource and one private resource per owner
async fn setup_mixed_bundle() -> MemoryResourceStore {
    let store = MemoryResourceStore::new();
    for (requester, filename, visibility) in [
        (OWNER, "public.json", Visibility::PublicRead),
        (OWNER, "mine.json", Visibility::PublicNone),
    ] {
        write(&store, Some(requester), "mixed", filename, visibility, json!(filename))
            .await
            .unwrap();
    }

    // A private resource recorded under a different owner
    store
        .upsert_resource(Resource {
            bundle: "mixed".to_string(),
            filename: "theirs.json".to_string(),
            owner: OTHER.to_string(),
            visibility: Visibility::PublicNone,
            content: json!("theirs.json"),
        })
        .await
        .unwrap();

    store
}

#[tokio::test]
async fn test_read_missing() {
    let store = MemoryResourceStore::new();
    let result = handle_read(&store, Some(OWNER), "nope", "a.json").await;
    assert!(matches!(result, Err(PolicyError::NotFound)));
}

#[tokio::test]
async fn test_read_respects_visibility() {
    let store = setup_mixed_bundle().await;

    let outcome = handle_read(&store, None, "mixed", "public.json").await.unwrap();
    assert_eq!(outcome, Outcome::Content(json!("public.json")));

    let result = handle_read(&store, None, "mixed", "mine.json").await;
    assert!(matches!(result, Err(PolicyError::ReadDenied)));

    let result = handle_read(&store, Some(OTHER), "mixed", "mine.json").await;
    assert!(matches!(result, Err(PolicyError::ReadDenied)));

    let outcome = handle_read(&store, Some(OWNER), "mixed", "mine.json").await.unwrap();
    assert_eq!(outcome, Outcome::Content(json!("mine.json")));
}

#[tokio::test]
async fn test_list_filters_per_requester() {
    let store = setup_mixed_bundle().await;

    let outcome = handle_list_read(&store, None, "mixed").await.unwrap();
    assert_eq!(
        outcome,
        Outcome::FilteredContent(vec![("public.json".to_string(), json!("public.json"))])
    );

    let outcome = handle_list_read(&store, Some(OWNER), "mixed").await.unwrap();
    assert_eq!(
        outcome,
        Outcome::FilteredContent(vec![
            ("public.json".to_string(), json!("public.json")),
            ("mine.json".to_string(), json!("mine.json")),
        ])
    );

    let outcome = handle_list_read(&store, Some(OTHER), "mixed").await.unwrap();
    assert_eq!(
        outcome,
        Outcome::FilteredContent(vec![
            ("public.json".to_string(), json!("public.json")),
            ("theirs.json".to_string(), json!("theirs.json")),
        ])
    );
}

#[tokio::test]
async fn test_list_nothing_readable() {
    let store = MemoryResourceStore::new();
    write(&store, Some(OWNER), "secret", "a.json", Visibility::PublicNone, json!(1))
        .await
        .unwrap();

    let result = handle_list_read(&store, None, "secret").await;
    assert!(matches!(result, Err(PolicyError::NoReadableResources)));

    // Unknown bundles look the same as fully private ones
    let result = handle_list_read(&store, None, "missing").await;
    assert!(matches!(result, Err(PolicyError::NoReadableResources)));

    let result = handle_list_read(&store, None, "").await;
    assert!(matches!(result, Err(PolicyError::InvalidInput(_))));
}
