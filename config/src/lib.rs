/// Base Config
pub mod base;
pub use base::*;

/// Core Config
pub mod config;
pub use crate::config::*;

/// Cli Config
pub mod cli;
pub use cli::*;

/// Config Errors
pub mod errors;
pub use errors::*;

/// Serde helpers
pub mod utils;
