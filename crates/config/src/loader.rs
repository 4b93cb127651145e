//! Settings resolver
//!
//! Resolution starts from compiled-in defaults and applies overrides from
//! each source in turn, lowest precedence first. The production order is
//! the optional `.env` file followed by the process environment.

use crate::fields::{self, FieldSpec, Section};
use crate::schema::{Settings, DEFAULT_ENV_FILE, ENV_PREFIX, NESTED_DELIMITER};
use crate::sources::{has_prefix, DotenvSource, EnvSource, OverrideSource};
use crate::validation::{ConfigValidator, ValidationReport};
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};
use types::{ConfigError, ValidationIssue};

/// Produces validated [`Settings`] from defaults and override sources
pub struct Resolver {
    sources: Vec<Box<dyn OverrideSource>>,
}

/// The last value a source gave for one normalized key
#[derive(Debug, Clone)]
struct MergedOverride {
    key: String,
    value: String,
    source: String,
}

impl Default for Resolver {
    /// `.env` in the working directory, then the process environment
    fn default() -> Self {
        Self::with_env_file(DEFAULT_ENV_FILE)
    }
}

impl Resolver {
    /// Resolver with no override sources; resolves to pure defaults
    pub fn empty() -> Self {
        Self { sources: Vec::new() }
    }

    /// The given dotenv file, then the process environment
    pub fn with_env_file<P: AsRef<Path>>(path: P) -> Self {
        Self::empty()
            .with_source(DotenvSource::new(path))
            .with_source(EnvSource)
    }

    /// Add a source that takes precedence over every source added before it
    pub fn with_source<S: OverrideSource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Names of the configured sources, lowest precedence first
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    /// Resolve settings, failing if any override cannot be coerced
    pub fn resolve(&self) -> Result<Settings, ConfigError> {
        self.resolve_with_report().map(|(settings, _)| settings)
    }

    /// Resolve settings and return the warnings and ignored keys found along the way
    pub fn resolve_with_report(&self) -> Result<(Settings, ValidationReport), ConfigError> {
        let mut settings = Settings::default();
        let mut report = ValidationReport::new();

        for source in &self.sources {
            let entries = collect_source(source.as_ref())?;
            apply_source(&mut settings, &mut report, &entries);
        }

        if let Some(err) = report.clone().into_error() {
            return Err(err.into());
        }

        ConfigValidator::check(&settings, &mut report);
        debug!("{}", report.summary());
        Ok((settings, report))
    }
}

/// One source's pairs keyed by the lowercase path after the prefix
fn collect_source(source: &dyn OverrideSource) -> Result<BTreeMap<String, MergedOverride>, ConfigError> {
    let mut entries = BTreeMap::new();
    for raw in source.overrides(ENV_PREFIX)? {
        if !has_prefix(&raw.key, ENV_PREFIX) {
            continue;
        }
        let path = raw.key[ENV_PREFIX.len()..].to_ascii_lowercase();
        entries.insert(
            path,
            MergedOverride {
                key: raw.key,
                value: raw.value,
                source: source.name().to_string(),
            },
        );
    }
    Ok(entries)
}

/// Apply one source on top of everything ranked below it
fn apply_source(settings: &mut Settings, report: &mut ValidationReport, entries: &BTreeMap<String, MergedOverride>) {
    // Whole-section JSON objects first so field keys of the same source win over them
    for (path, entry) in entries {
        if let Some(section) = Section::from_name(path) {
            apply_section_json(settings, report, entries, section, entry);
        }
    }

    for (path, entry) in entries {
        if Section::from_name(path).is_some() {
            continue;
        }
        match match_field(path) {
            Some(spec) => apply_field(settings, report, spec, entry),
            None => {
                debug!(key = %entry.key, source = %entry.source, "Ignoring unknown configuration key");
                report.add_ignored(&entry.key);
            }
        }
    }
}

/// Match a normalized path against the field table
fn match_field(path: &str) -> Option<&'static FieldSpec> {
    match path.split_once(NESTED_DELIMITER) {
        Some((section, field)) => fields::lookup(Some(Section::from_name(section)?), field),
        None => fields::lookup(None, path),
    }
}

fn apply_field(settings: &mut Settings, report: &mut ValidationReport, spec: &FieldSpec, entry: &MergedOverride) {
    match (spec.set)(settings, &entry.value) {
        Ok(()) => {
            debug!(key = %entry.key, field = %spec.path(), source = %entry.source, "Applied configuration override");
            report.clear_errors_for(&spec.path());
        }
        Err(e) => report.add_error(ValidationIssue {
            key: entry.key.clone(),
            field: spec.path(),
            expected: e.expected.to_string(),
            value: e.value,
            source: entry.source.clone(),
        }),
    }
}

fn apply_section_json(
    settings: &mut Settings,
    report: &mut ValidationReport,
    entries: &BTreeMap<String, MergedOverride>,
    section: Section,
    entry: &MergedOverride,
) {
    let members = match serde_json::from_str::<Value>(&entry.value) {
        Ok(Value::Object(members)) => {
            report.clear_errors_for(section.name());
            members
        }
        _ => {
            report.add_error(ValidationIssue {
                key: entry.key.clone(),
                field: section.name().to_string(),
                expected: "JSON object".to_string(),
                value: entry.value.clone(),
                source: entry.source.clone(),
            });
            return;
        }
    };

    for (member, value) in &members {
        let name = member.to_ascii_lowercase();
        let member_key = format!("{}.{}", entry.key, member);
        let Some(spec) = fields::lookup(Some(section), &name) else {
            debug!(key = %member_key, source = %entry.source, "Ignoring unknown configuration key");
            report.add_ignored(&member_key);
            continue;
        };

        // A dedicated key in the same source overrides the section object
        let field_path = format!("{}{}{}", section.name(), NESTED_DELIMITER, name);
        if entries.contains_key(&field_path) {
            continue;
        }

        let raw = match value {
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            other => {
                report.add_error(ValidationIssue {
                    key: member_key,
                    field: spec.path(),
                    expected: spec.kind.to_string(),
                    value: other.to_string(),
                    source: entry.source.clone(),
                });
                continue;
            }
        };

        let member_entry = MergedOverride {
            key: member_key,
            value: raw,
            source: entry.source.clone(),
        };
        apply_field(settings, report, spec, &member_entry);
    }
}

impl Settings {
    /// Resolve settings from `.env` and the process environment
    pub fn resolve() -> Result<Self, ConfigError> {
        Resolver::default().resolve()
    }
}

/// Write a `.env` file listing every key with the value it has in `settings`
pub fn write_env_example<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<()> {
    let mut content = settings.to_env_lines().join("\n");
    content.push('\n');

    std::fs::write(path.as_ref(), content)
        .with_context(|| format!("Failed to write env example to {}", path.as_ref().display()))?;

    info!(path = %path.as_ref().display(), "Wrote env example");
    Ok(())
}
