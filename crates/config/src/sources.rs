//! Override sources consulted during resolution

use figment::providers::Env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use types::ConfigError;

/// A raw key/value pair supplied by an override source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOverride {
    /// Key exactly as the source spelled it, prefix included
    pub key: String,
    pub value: String,
}

/// Externally supplied key/value pairs, ranked by the order the resolver
/// consults them
pub trait OverrideSource: Send + Sync {
    /// Name used in logs and validation issues
    fn name(&self) -> &str;

    /// Every pair whose key starts with `prefix`, compared case-insensitively
    fn overrides(&self, prefix: &str) -> Result<Vec<RawOverride>, ConfigError>;
}

/// Case-insensitive prefix check on raw keys
pub fn has_prefix(key: &str, prefix: &str) -> bool {
    key.len() >= prefix.len()
        && key.is_char_boundary(prefix.len())
        && key[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Process environment variables
#[derive(Debug, Clone, Default)]
pub struct EnvSource;

impl OverrideSource for EnvSource {
    fn name(&self) -> &str {
        "environment"
    }

    fn overrides(&self, prefix: &str) -> Result<Vec<RawOverride>, ConfigError> {
        let owned_prefix = prefix.to_string();
        let env = Env::raw().filter(move |key| has_prefix(key.as_str(), &owned_prefix));

        let mut overrides: Vec<RawOverride> = env
            .iter()
            .map(|(key, value)| RawOverride {
                key: key.as_str().to_string(),
                value,
            })
            .collect();
        // Environment iteration order is platform dependent
        overrides.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(overrides)
    }
}

/// Optional dotenv-style file
///
/// A missing file yields no overrides. Malformed lines are skipped with a
/// warning. The file is never exported into the process environment.
#[derive(Debug, Clone)]
pub struct DotenvSource {
    path: PathBuf,
    name: String,
}

impl DotenvSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = format!("file {}", path.display());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OverrideSource for DotenvSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn overrides(&self, prefix: &str) -> Result<Vec<RawOverride>, ConfigError> {
        let iter = match dotenv::from_path_iter(&self.path) {
            Ok(iter) => iter,
            Err(e) if e.not_found() => {
                debug!(path = %self.path.display(), "Dotenv file not present, skipping");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(ConfigError::SourceUnavailable {
                    source_name: self.name.clone(),
                    message: e.to_string(),
                });
            }
        };

        let mut overrides = Vec::new();
        for item in iter {
            match item {
                Ok((key, value)) if has_prefix(&key, prefix) => {
                    overrides.push(RawOverride { key, value });
                }
                Ok(_) => {}
                Err(dotenv::Error::Io(e)) => {
                    return Err(ConfigError::SourceUnavailable {
                        source_name: self.name.clone(),
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Skipping malformed dotenv line");
                }
            }
        }
        Ok(overrides)
    }
}

/// In-memory source, for embedding callers and tests
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    name: String,
    entries: Vec<RawOverride>,
}

impl MapSource {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::named("map", entries)
    }

    pub fn named<I, K, V>(name: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.to_string(),
            entries: entries
                .into_iter()
                .map(|(key, value)| RawOverride {
                    key: key.into(),
                    value: value.into(),
                })
                .collect(),
        }
    }
}

impl OverrideSource for MapSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn overrides(&self, prefix: &str) -> Result<Vec<RawOverride>, ConfigError> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| has_prefix(&entry.key, prefix))
            .cloned()
            .collect())
    }
}
