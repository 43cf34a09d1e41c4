//! # viewcraft-core
//!
//! Core types shared by every viewcraft crate. This crate has no framework
//! dependencies and provides the foundation for the others.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy and result alias
//! - [`settings`] - Immutable configuration values
//! - [`settings_loader`] - Loading settings from TOML, JSON and the environment
//! - [`logging`] - Tracing-based logging integration
//! - [`utils`] - Utility types (`MultiValueDict`, text helpers)

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod utils;

// Re-export the most commonly used types at the crate root.
pub use error::{ViewcraftError, ViewcraftResult};
pub use settings::Settings;
