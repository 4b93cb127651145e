//! Validation report produced alongside resolved settings

use crate::schema::Settings;
use types::{ConfigValidationError, ValidationIssue};

/// Soft checks on resolved settings; they never fail resolution
pub struct ConfigValidator;

impl ConfigValidator {
    /// Record warnings for suspicious but valid settings
    pub fn check(settings: &Settings, report: &mut ValidationReport) {
        Self::check_cache(settings, report);
        Self::check_hangar(settings, report);
        Self::check_modrinth(settings, report);
    }

    fn check_cache(settings: &Settings, report: &mut ValidationReport) {
        let known_backends = ["inmemory", "redis"];
        if !known_backends.contains(&settings.cache.backend.as_str()) {
            report.add_warning(
                "cache.backend",
                &format!(
                    "Unknown cache backend '{}'. Known backends: {:?}",
                    settings.cache.backend, known_backends
                ),
            );
        }

        if settings.cache.backend == "redis" && settings.cache.redis_url.is_empty() {
            report.add_warning("cache.redis_url", "Redis backend selected but redis_url is empty");
        }

        Self::check_expiration("cache.pom_expiration", settings.cache.pom_expiration, report);
        Self::check_expiration("cache.metadata_expiration", settings.cache.metadata_expiration, report);
    }

    fn check_hangar(settings: &Settings, report: &mut ValidationReport) {
        if !is_http_url(&settings.hangar.api_base_url) {
            report.add_warning("hangar.api_base_url", "Hangar API base URL should start with http:// or https://");
        }

        Self::check_expiration("hangar.cache_project_expiration", settings.hangar.cache_project_expiration, report);
        Self::check_expiration("hangar.cache_version_expiration", settings.hangar.cache_version_expiration, report);

        if settings.hangar.versions_limit_per_batch <= 0 {
            report.add_warning(
                "hangar.versions_limit_per_batch",
                &format!(
                    "Batch size is {}, no versions will be fetched",
                    settings.hangar.versions_limit_per_batch
                ),
            );
        }

        if settings.hangar.versions_total_to_fetch < 0 {
            report.add_warning("hangar.versions_total_to_fetch", "Total versions to fetch is negative, treated as 0");
        }

        if settings.hangar.versions_limit_per_batch > settings.hangar.versions_total_to_fetch {
            report.add_warning(
                "hangar.versions_limit_per_batch",
                "Batch size is greater than the total number of versions to fetch",
            );
        }
    }

    fn check_expiration(field: &str, seconds: i64, report: &mut ValidationReport) {
        if seconds < 0 {
            report.add_warning(field, &format!("Expiration is negative ({}s), entries expire immediately", seconds));
        } else if seconds == 0 {
            report.add_warning(field, "Expiration is 0, entries expire immediately");
        }
    }

    fn check_modrinth(settings: &Settings, report: &mut ValidationReport) {
        if !is_http_url(&settings.modrinth.api_base_url) {
            report.add_warning("modrinth.api_base_url", "Modrinth API base URL should start with http:// or https://");
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Validation report containing errors, warnings and ignored keys
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationWarning>,
    /// Prefixed keys that matched no declared field
    pub ignored: Vec<String>,
}

/// A non-fatal finding about a resolved field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, issue: ValidationIssue) {
        self.errors.push(issue);
    }

    /// Drop errors for `field` after a higher-ranked source set it successfully
    pub fn clear_errors_for(&mut self, field: &str) {
        self.errors.retain(|issue| issue.field != field);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_ignored(&mut self, key: &str) {
        self.ignored.push(key.to_string());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn summary(&self) -> String {
        format!(
            "Validation: {} errors, {} warnings, {} ignored keys",
            self.errors.len(),
            self.warnings.len(),
            self.ignored.len()
        )
    }

    /// Turn collected errors into the fatal error, if any, ordered by field path
    pub fn into_error(mut self) -> Option<ConfigValidationError> {
        if self.errors.is_empty() {
            return None;
        }
        self.errors.sort_by(|a, b| a.field.cmp(&b.field));
        Some(ConfigValidationError::new(self.errors))
    }
}
