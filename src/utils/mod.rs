//! # Utility Functions (`utils`)
//!
//! Provides helpers for saving and loading configurations and params bundles.

pub mod serialization;

pub use serialization::{load_config, load_params, save_config, save_params, SerializationError};
