//! Configuration management for the Maven bridge
//!
//! This crate declares the typed settings tree and resolves it from
//! compiled-in defaults, an optional `.env` file and `MC_MAVEN_BRIDGE__*`
//! environment variables.

pub mod fields;
pub mod global;
pub mod loader;
pub mod schema;
pub mod sources;
pub mod validation;

pub use fields::{FieldKind, FieldSpec, FieldValue, Section};
pub use loader::{write_env_example, Resolver};
pub use schema::*;
pub use sources::{DotenvSource, EnvSource, MapSource, OverrideSource, RawOverride};
pub use validation::*;

/// Resolve settings from `.env` and the process environment
pub fn resolve() -> Result<Settings, types::ConfigError> {
    Settings::resolve()
}

#[cfg(test)]
pub(crate) fn env_test_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
