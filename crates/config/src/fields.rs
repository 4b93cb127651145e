//! Static field table binding override keys to settings fields
//!
//! Every overridable field is declared once in [`FIELDS`] together with its
//! section, declared kind, and the functions that coerce a raw string into
//! the field and read it back. Resolution walks this table instead of
//! discovering fields at runtime.

use crate::schema::{Settings, ENV_PREFIX, NESTED_DELIMITER};
use std::fmt;
use thiserror::Error;

/// Named group of fields below the settings root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Cache,
    Hangar,
    Modrinth,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Cache, Section::Hangar, Section::Modrinth];

    pub fn name(self) -> &'static str {
        match self {
            Section::Cache => "cache",
            Section::Hangar => "hangar",
            Section::Modrinth => "modrinth",
        }
    }

    /// Look up a section by its lowercase name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.name() == name)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    String,
    Integer,
}

impl FieldKind {
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Bool => "boolean",
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed value read back from a settings field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Bool(bool),
    String(String),
    Integer(i64),
}

impl FieldValue {
    /// Value formatted the way it would be written in a `.env` file
    pub fn to_env_string(&self) -> String {
        match self {
            FieldValue::Bool(value) => value.to_string(),
            FieldValue::String(value) => quote_env_value(value),
            FieldValue::Integer(value) => value.to_string(),
        }
    }
}

/// Quote a string so a dotenv parser reads it back verbatim
///
/// Single quotes keep the content literal. Values containing a single quote
/// or a newline fall back to double quotes with `\`, `"`, `$` and newlines
/// escaped.
fn quote_env_value(value: &str) -> String {
    if !value.contains('\'') && !value.contains('\n') {
        return format!("'{}'", value);
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' | '"' | '$' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// A raw value that does not fit the declared kind
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected {expected}, got {value:?}")]
pub struct CoercionError {
    pub expected: FieldKind,
    pub value: String,
}

/// Rust types a field can be declared with
pub trait FieldType: Sized {
    const KIND: FieldKind;

    /// Convert a raw override string into this type
    fn coerce(raw: &str) -> Result<Self, CoercionError>;

    fn to_value(&self) -> FieldValue;
}

impl FieldType for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn coerce(raw: &str) -> Result<Self, CoercionError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" | "t" | "y" => Ok(true),
            "false" | "0" | "no" | "off" | "f" | "n" => Ok(false),
            _ => Err(CoercionError {
                expected: Self::KIND,
                value: raw.to_string(),
            }),
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Bool(*self)
    }
}

impl FieldType for i64 {
    const KIND: FieldKind = FieldKind::Integer;

    fn coerce(raw: &str) -> Result<Self, CoercionError> {
        let invalid = || CoercionError {
            expected: Self::KIND,
            value: raw.to_string(),
        };
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix('-')
            .or_else(|| trimmed.strip_prefix('+'))
            .unwrap_or(trimmed);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        trimmed.parse().map_err(|_| invalid())
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Integer(*self)
    }
}

impl FieldType for String {
    const KIND: FieldKind = FieldKind::String;

    fn coerce(raw: &str) -> Result<Self, CoercionError> {
        Ok(raw.to_string())
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::String(self.clone())
    }
}

/// One overridable field of [`Settings`]
pub struct FieldSpec {
    /// Owning section, `None` for root scalars
    pub section: Option<Section>,
    pub name: &'static str,
    pub kind: FieldKind,
    /// Coerce a raw string and store it in the field
    pub set: fn(&mut Settings, &str) -> Result<(), CoercionError>,
    /// Read the field back as a typed value
    pub get: fn(&Settings) -> FieldValue,
}

impl FieldSpec {
    /// Dotted path such as `cache.redis_url`
    pub fn path(&self) -> String {
        match self.section {
            Some(section) => format!("{}.{}", section, self.name),
            None => self.name.to_string(),
        }
    }

    /// Canonical environment variable name for this field
    pub fn env_key(&self) -> String {
        let key = match self.section {
            Some(section) => format!("{}{}{}", section.name(), NESTED_DELIMITER, self.name),
            None => self.name.to_string(),
        };
        format!("{}{}", ENV_PREFIX, key.to_ascii_uppercase())
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("section", &self.section)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

macro_rules! field {
    ($section:expr, $name:literal, $ty:ty, $($path:ident).+) => {
        FieldSpec {
            section: $section,
            name: $name,
            kind: <$ty as FieldType>::KIND,
            set: |settings: &mut Settings, raw: &str| -> Result<(), CoercionError> {
                settings.$($path).+ = <$ty as FieldType>::coerce(raw)?;
                Ok(())
            },
            get: |settings: &Settings| -> FieldValue { FieldType::to_value(&settings.$($path).+) },
        }
    };
}

static FIELDS: [FieldSpec; 12] = [
    field!(None, "debug", bool, debug),
    field!(Some(Section::Cache), "backend", String, cache.backend),
    field!(Some(Section::Cache), "redis_url", String, cache.redis_url),
    field!(Some(Section::Cache), "prefix", String, cache.prefix),
    field!(Some(Section::Cache), "pom_expiration", i64, cache.pom_expiration),
    field!(Some(Section::Cache), "metadata_expiration", i64, cache.metadata_expiration),
    field!(Some(Section::Hangar), "api_base_url", String, hangar.api_base_url),
    field!(Some(Section::Hangar), "cache_project_expiration", i64, hangar.cache_project_expiration),
    field!(Some(Section::Hangar), "cache_version_expiration", i64, hangar.cache_version_expiration),
    field!(Some(Section::Hangar), "versions_limit_per_batch", i64, hangar.versions_limit_per_batch),
    field!(Some(Section::Hangar), "versions_total_to_fetch", i64, hangar.versions_total_to_fetch),
    field!(Some(Section::Modrinth), "api_base_url", String, modrinth.api_base_url),
];

/// Every overridable field, root scalars first
pub fn fields() -> &'static [FieldSpec] {
    &FIELDS
}

/// Find a field by section and lowercase name
pub fn lookup(section: Option<Section>, name: &str) -> Option<&'static FieldSpec> {
    FIELDS
        .iter()
        .find(|spec| spec.section == section && spec.name == name)
}
