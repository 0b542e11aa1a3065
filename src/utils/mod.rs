//! Utility functions and helpers.
//!
//! Environment variable handling for configuration loading.

pub mod env;

pub use env::get_env_with_prefix;
