//! API endpoints.

mod health;
mod notifications;
mod payments;
mod profiles;
mod submissions;
mod users;
mod webhooks;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/profiles", profiles::router())
        .nest("/submissions", submissions::router())
        .nest("/payments", payments::router())
        .nest("/webhooks", webhooks::router())
        .nest("/notifications", notifications::router())
}

/// Health check router, mounted outside `/api`.
pub fn health_router() -> Router<AppState> {
    health::router()
}
