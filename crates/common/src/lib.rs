//! Common utilities and shared types for shroud.
//!
//! This crate provides foundational components used across all shroud crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based record identifiers via [`IdGenerator`]
//!
//! # Example
//!
//! ```no_run
//! use shroud_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("{} -> {}", config.database.url, id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;

pub use config::{Config, DatabaseConfig, ModulesConfig};
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
