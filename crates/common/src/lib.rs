//! Common utilities and shared types for clipcommerce.
//!
//! This crate provides foundational components used across all clipcommerce crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Money**: Currency rounding and fee-split helpers
//!
//! # Example
//!
//! ```no_run
//! use clipcommerce_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod money;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use money::{round_to_cents, split_fee, to_minor_units, FeeSplit};
