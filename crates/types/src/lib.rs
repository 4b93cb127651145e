//! Shared types for the Maven bridge
//!
//! This crate contains the error types shared between the configuration
//! crate and the bridge binary.

pub mod error;

// Re-export commonly used types
pub use error::{ConfigError, ConfigValidationError, ValidationIssue};
