//! Foodcheck Core
//!
//! Types and error handling shared by the Foodcheck crates.
//!
//! This crate provides:
//! - The error type and `Result` alias used across the workspace
//! - `LabelScore`, the fixed-shape record produced by an inference backend
//! - `ClassificationResult`, the label -> probability mapping returned to callers

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{ClassificationResult, LabelScore};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{ClassificationResult, LabelScore};
}
