//! HTTP API layer for clipcommerce.
//!
//! This crate provides the REST API of the marketplace:
//!
//! - **Endpoints**: submissions, payments, profiles, notifications, users
//! - **Extractors**: authentication
//! - **Middleware**: bearer-token resolution
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
