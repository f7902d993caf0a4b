//! n-serve configuration
//!
//! Environment variable names, shared defaults, and the [`Settings`] loader
//! used by the `n-serve` binary.

pub mod constants;
pub mod settings;

pub use settings::{ConfigError, Settings};
