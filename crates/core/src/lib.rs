//! Core business logic for clipcommerce.

pub mod services;

pub use services::*;
