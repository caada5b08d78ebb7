//! Request authentication.
//!
//! Requests identify themselves with `Authorization: Bearer <token>`. Tokens
//! are mapped to email identities by a [`TokenTable`] loaded from the config
//! file. A request without the header is anonymous; a request with a header
//! we cannot resolve is rejected rather than downgraded.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::header::AUTHORIZATION;
use http::request::Parts;
use http::StatusCode;

const BEARER_SCHEME: &str = "Bearer";

/// Token -> email lookup
#[derive(Debug, Clone, Default)]
pub struct TokenTable(Arc<HashMap<String, String>>);

impl TokenTable {
    pub fn new(tokens: &BTreeMap<String, String>) -> Self {
        let table = tokens
            .iter()
            .filter(|(token, email)| {
                let usable = !token.is_empty() && !email.is_empty();
                if !usable {
                    tracing::warn!("ignoring token entry with an empty token or email");
                }
                usable
            })
            .map(|(token, email)| (token.clone(), email.clone()))
            .collect();
        Self(Arc::new(table))
    }

    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.0.get(token).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The identity behind a request, `None` for anonymous callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester(pub Option<String>);

impl Requester {
    pub fn email(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Requester
where
    TokenTable: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Requester(None));
        };

        let token = value
            .to_str()
            .ok()
            .and_then(bearer_token)
            .ok_or(AuthError::MalformedHeader)?;

        let tokens = TokenTable::from_ref(state);
        match tokens.resolve(token) {
            Some(email) => Ok(Requester(Some(email.to_string()))),
            None => Err(AuthError::UnknownToken),
        }
    }
}

/// Token from a `Bearer <token>` credential. The scheme name is case-insensitive.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case(BEARER_SCHEME) && !token.is_empty()).then_some(token)
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("malformed authorization header")]
    MalformedHeader,
    #[error("unknown bearer token")]
    UnknownToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("rejecting request: {}", self);
        let msg = serde_json::json!({"error": "Invalid credentials"});
        (StatusCode::UNAUTHORIZED, Json(msg)).into_response()
    }
}
