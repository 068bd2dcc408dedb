//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use clipcommerce_db::entities::user;

/// Authenticated user extractor.
///
/// Reads the user placed in the request extensions by the auth middleware
/// and rejects with 401 when no valid bearer token was presented.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}
