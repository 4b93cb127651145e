//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Prefix shared by every override key
pub const ENV_PREFIX: &str = "MC_MAVEN_BRIDGE__";

/// Delimiter between section and field in an override key
pub const NESTED_DELIMITER: &str = "__";

/// Default dotenv file consulted during resolution
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Root settings of the bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Enable debug behaviour and verbose logging
    pub debug: bool,
    /// Cache configuration
    pub cache: CacheConfig,
    /// Hangar API configuration
    pub hangar: HangarConfig,
    /// Modrinth API configuration
    pub modrinth: ModrinthConfig,
}

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache backend name (inmemory, redis)
    pub backend: String,
    /// Redis connection URL, only used by the redis backend
    pub redis_url: String,
    /// Key prefix for every cache entry
    pub prefix: String,
    /// Lifetime of cached POM files in seconds
    pub pom_expiration: i64,
    /// Lifetime of cached maven-metadata.xml files in seconds
    pub metadata_expiration: i64,
}

/// Hangar API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HangarConfig {
    /// Base URL of the Hangar API
    pub api_base_url: String,
    /// Lifetime of cached project lookups in seconds
    pub cache_project_expiration: i64,
    /// Lifetime of cached version lookups in seconds
    pub cache_version_expiration: i64,
    /// Number of versions requested per API call
    pub versions_limit_per_batch: i64,
    /// Total number of versions fetched per project
    pub versions_total_to_fetch: i64,
}

/// Modrinth API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModrinthConfig {
    /// Base URL of the Modrinth API
    pub api_base_url: String,
}

// Default value functions
fn default_cache_backend() -> String {
    "inmemory".to_string()
}

fn default_cache_prefix() -> String {
    "hangar_maven_bridge_".to_string()
}

fn default_expiration() -> i64 {
    3600 // 1 hour
}

fn default_hangar_api_base_url() -> String {
    "https://hangar.papermc.io/api/v1".to_string()
}

fn default_versions_batch() -> i64 {
    20
}

fn default_modrinth_api_base_url() -> String {
    "https://api.modrinth.com/v2".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            cache: CacheConfig::default(),
            hangar: HangarConfig::default(),
            modrinth: ModrinthConfig::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: default_cache_backend(),
            redis_url: String::new(),
            prefix: default_cache_prefix(),
            pom_expiration: default_expiration(),
            metadata_expiration: default_expiration(),
        }
    }
}

impl Default for HangarConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_hangar_api_base_url(),
            cache_project_expiration: default_expiration(),
            cache_version_expiration: default_expiration(),
            versions_limit_per_batch: default_versions_batch(),
            versions_total_to_fetch: default_versions_batch(),
        }
    }
}

impl Default for ModrinthConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_modrinth_api_base_url(),
        }
    }
}

/// Negative expirations mean "expire immediately"
fn ttl(seconds: i64) -> Duration {
    Duration::from_secs(u64::try_from(seconds).unwrap_or(0))
}

impl CacheConfig {
    pub fn pom_ttl(&self) -> Duration {
        ttl(self.pom_expiration)
    }

    pub fn metadata_ttl(&self) -> Duration {
        ttl(self.metadata_expiration)
    }
}

impl HangarConfig {
    pub fn project_ttl(&self) -> Duration {
        ttl(self.cache_project_expiration)
    }

    pub fn version_ttl(&self) -> Duration {
        ttl(self.cache_version_expiration)
    }
}

impl Settings {
    /// Render every field as a `.env` line carrying its current value
    pub fn to_env_lines(&self) -> Vec<String> {
        crate::fields::fields()
            .iter()
            .map(|spec| format!("{}={}", spec.env_key(), (spec.get)(self).to_env_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.debug);
        assert_eq!(settings.cache.backend, "inmemory");
        assert_eq!(settings.cache.redis_url, "");
        assert_eq!(settings.cache.prefix, "hangar_maven_bridge_");
        assert_eq!(settings.cache.pom_expiration, 3600);
        assert_eq!(settings.cache.metadata_expiration, 3600);
        assert_eq!(settings.hangar.api_base_url, "https://hangar.papermc.io/api/v1");
        assert_eq!(settings.hangar.cache_project_expiration, 3600);
        assert_eq!(settings.hangar.cache_version_expiration, 3600);
        assert_eq!(settings.hangar.versions_limit_per_batch, 20);
        assert_eq!(settings.hangar.versions_total_to_fetch, 20);
        assert_eq!(settings.modrinth.api_base_url, "https://api.modrinth.com/v2");
    }

    #[test]
    fn test_ttl_accessors() {
        let settings = Settings::default();
        assert_eq!(settings.cache.pom_ttl(), Duration::from_secs(3600));
        assert_eq!(settings.hangar.version_ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn test_negative_ttl_clamps_to_zero() {
        let mut settings = Settings::default();
        settings.cache.metadata_expiration = -1;
        settings.hangar.cache_project_expiration = i64::MIN;
        assert_eq!(settings.cache.metadata_ttl(), Duration::ZERO);
        assert_eq!(settings.hangar.project_ttl(), Duration::ZERO);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"cache": {"backend": "redis"}}"#).unwrap();
        assert_eq!(settings.cache.backend, "redis");
        assert_eq!(settings.cache.prefix, "hangar_maven_bridge_");
        assert_eq!(settings.hangar, HangarConfig::default());
    }

    #[test]
    fn test_env_lines_cover_every_field() {
        let lines = Settings::default().to_env_lines();
        assert_eq!(lines.len(), 12);
        assert!(lines.contains(&"MC_MAVEN_BRIDGE__DEBUG=false".to_string()));
        assert!(lines.contains(&"MC_MAVEN_BRIDGE__CACHE__REDIS_URL=''".to_string()));
        assert!(lines.contains(&"MC_MAVEN_BRIDGE__CACHE__PREFIX='hangar_maven_bridge_'".to_string()));
        assert!(lines.contains(&"MC_MAVEN_BRIDGE__HANGAR__VERSIONS_LIMIT_PER_BATCH=20".to_string()));
    }
}
