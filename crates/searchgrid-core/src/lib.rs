//! searchgrid core: shared types, errors, and configuration.
//!
//! This crate has no internal searchgrid dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error taxonomy and `Result` alias
//! - [`field`]: The [`FieldId`] newtype naming an entity field
//! - [`config`]: Admin → finder routing configuration
//! - [`scalar`]: Equality and ordering for JSON scalars

pub mod config;
pub mod error;
pub mod field;
pub mod scalar;

// Re-export key types at crate root for convenience
pub use config::{FinderService, SearchDefaults, SearchGridConfig};
pub use error::{Error, Result};
pub use field::FieldId;
