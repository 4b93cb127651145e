//! Error types for the Maven bridge

use std::fmt;
use thiserror::Error;

/// Configuration specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An override source exists but could not be read
    #[error("Override source {source_name} unavailable: {message}")]
    SourceUnavailable { source_name: String, message: String },

    /// One or more overrides could not be coerced to their declared type
    #[error(transparent)]
    Validation(#[from] ConfigValidationError),
}

/// A single override that failed coercion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Key as it appeared in the source, e.g. `MC_MAVEN_BRIDGE__HANGAR__VERSIONS_LIMIT_PER_BATCH`
    pub key: String,
    /// Normalized field path, e.g. `hangar.versions_limit_per_batch`
    pub field: String,
    /// Human readable name of the declared type
    pub expected: String,
    /// The raw value that was rejected
    pub value: String,
    /// Name of the source that supplied the value
    pub source: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (from {}): expected {}, got {:?}",
            self.key, self.source, self.expected, self.value
        )
    }
}

/// Every invalid override found during one resolution pass
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ConfigValidationError {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    /// Whether the given normalized field path is among the rejected overrides
    pub fn contains_field(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration validation failed: {} invalid override(s)", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "; {}", issue)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(field: &str) -> ValidationIssue {
        ValidationIssue {
            key: "MC_MAVEN_BRIDGE__HANGAR__VERSIONS_LIMIT_PER_BATCH".to_string(),
            field: field.to_string(),
            expected: "integer".to_string(),
            value: "notanumber".to_string(),
            source: "environment".to_string(),
        }
    }

    #[test]
    fn test_validation_error_lists_every_issue() {
        let err = ConfigValidationError::new(vec![
            issue("hangar.versions_limit_per_batch"),
            issue("cache.pom_expiration"),
        ]);
        let message = err.to_string();
        assert!(message.contains("2 invalid override(s)"));
        assert!(message.contains("MC_MAVEN_BRIDGE__HANGAR__VERSIONS_LIMIT_PER_BATCH"));
        assert!(message.contains("expected integer"));
        assert!(err.contains_field("cache.pom_expiration"));
        assert!(!err.contains_field("debug"));
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err = ConfigError::from(ConfigValidationError::new(vec![issue("debug")]));
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().starts_with("Configuration validation failed"));
    }
}
