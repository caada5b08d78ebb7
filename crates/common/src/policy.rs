//! # Bundle Policy
//!
//! Request-level procedures that combine the permission checks with the
//! [`ResourceStore`]. Each one takes the requester explicitly; nothing here
//! looks identity up on its own.
//!
//! ## Ownership
//!
//! A bundle's owner is whoever performed its first successful write. Creating
//! a bundle requires an identity, and the bundle comes into existence
//! together with its first resource or not at all. After that the owner never changes, even
//! when somebody else writes into a `public-write` resource.
//!
//! ## Visibility
//!
//! Each write sets the visibility of the written resource to the incoming
//! value, and the write check is evaluated against that incoming value.

use crate::permissions::{can_read, can_write};
use crate::store::{Claim, Resource, ResourceStore};
use crate::visibility::Visibility;

/// Successful result of a policy procedure.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The resource was written. Carries the bundle owner.
    Created { owner: String },
    /// Content of a single readable resource.
    Content(serde_json::Value),
    /// `(filename, content)` of every readable resource in a bundle, in
    ///  store listing order.
    FilteredContent(Vec<(String, serde_json::Value)>),
}

#[derive(Debug, thiserror::Error)]
pub enum PolicyError<E> {
    #[error("Authentication required to create bundle")]
    AuthenticationRequired,
    #[error("Write access denied")]
    WriteDenied,
    #[error("Read access denied")]
    ReadDenied,
    #[error("No readable resources")]
    NoReadableResources,
    #[error("Resource not found")]
    NotFound,
    #[error("Invalid path parameters: {0}")]
    InvalidInput(String),
    #[error("store error: {0}")]
    Store(#[from] E),
}

/// An incoming write to `(bundle, filename)`.
#[derive(Debug, Clone)]
pub struct WriteRequest<'a> {
    pub bundle: &'a str,
    pub filename: &'a str,
    pub visibility: Visibility,
    pub content: serde_json::Value,
}

/// Write a resource, creating its bundle if needed.
pub async fn handle_write<S: ResourceStore>(
    store: &S,
    requester: Option<&str>,
    request: WriteRequest<'_>,
) -> Result<Outcome, PolicyError<S::Error>> {
    validate_bundle(request.bundle)?;
    validate_filename(request.filename)?;
    let requester = normalize_requester(requester);

    let mut resource = Resource {
        bundle: request.bundle.to_string(),
        filename: request.filename.to_string(),
        owner: String::new(),
        visibility: request.visibility,
        content: request.content,
    };

    let owner = match store.bundle_owner(request.bundle).await? {
        Some(owner) => owner,
        None => {
            let requester = requester.ok_or(PolicyError::AuthenticationRequired)?;
            resource.owner = requester.to_string();
            match store.create_resource(&resource).await? {
                Claim::Created => return Ok(Outcome::Created { owner: resource.owner }),
                Claim::Taken { owner } => {
                    tracing::warn!(
                        bundle = request.bundle,
                        "bundle was created concurrently by another writer"
                    );
                    owner
                }
            }
        }
    };

    if !can_write(request.visibility, &owner, requester) {
        return Err(PolicyError::WriteDenied);
    }

    resource.owner = owner.clone();
    store.upsert_resource(resource).await?;

    Ok(Outcome::Created { owner })
}

/// Read a single resource.
pub async fn handle_read<S: ResourceStore>(
    store: &S,
    requester: Option<&str>,
    bundle: &str,
    filename: &str,
) -> Result<Outcome, PolicyError<S::Error>> {
    validate_bundle(bundle)?;
    validate_filename(filename)?;
    let requester = normalize_requester(requester);

    let resource = store
        .get_resource(bundle, filename)
        .await?
        .ok_or(PolicyError::NotFound)?;

    if !can_read(resource.visibility, &resource.owner, requester) {
        return Err(PolicyError::ReadDenied);
    }

    Ok(Outcome::Content(resource.content))
}

/// Read every resource in a bundle the requester is allowed to see.
pub async fn handle_list_read<S: ResourceStore>(
    store: &S,
    requester: Option<&str>,
    bundle: &str,
) -> Result<Outcome, PolicyError<S::Error>> {
    validate_bundle(bundle)?;
    let requester = normalize_requester(requester);

    let readable: Vec<_> = store
        .list_resources(bundle)
        .await?
        .into_iter()
        .filter(|r| can_read(r.visibility, &r.owner, requester))
        .map(|r| (r.filename, r.content))
        .collect();

    if readable.is_empty() {
        return Err(PolicyError::NoReadableResources);
    }

    Ok(Outcome::FilteredContent(readable))
}

fn normalize_requester(requester: Option<&str>) -> Option<&str> {
    requester.filter(|r| !r.is_empty())
}

fn validate_bundle<E>(bundle: &str) -> Result<(), PolicyError<E>> {
    if bundle.is_empty() {
        return Err(PolicyError::InvalidInput("bundle cannot be empty".into()));
    }
    Ok(())
}

fn validate_filename<E>(filename: &str) -> Result<(), PolicyError<E>> {
    if filename.is_empty() {
        return Err(PolicyError::InvalidInput("filename cannot be empty".into()));
    }
    Ok(())
}
