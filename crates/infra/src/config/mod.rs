//! Configuration loading
//!
//! This module provides utilities for loading the job configuration
//! from environment variables and files.

pub mod loader;

// Re-export commonly used items
pub use loader::{load, load_from_file, load_from_lookup, probe_config_paths};
