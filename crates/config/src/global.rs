//! Process-wide settings instance
//!
//! The bridge binary calls [`init`] once at startup before spawning any
//! workers and hands the returned reference to its components. [`get`] is
//! available for code that cannot have the reference passed in.

use crate::loader::Resolver;
use crate::schema::Settings;
use once_cell::sync::OnceCell;
use tracing::debug;
use types::ConfigError;

static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Resolve from `.env` and the process environment and install the result
pub fn init() -> Result<&'static Settings, ConfigError> {
    init_with(&Resolver::default())
}

/// Resolve with `resolver` and install the result
///
/// If settings were already installed they are returned unchanged and
/// `resolver` is not consulted. Concurrent first callers block until the
/// single resolution finishes, so exactly one instance is ever built. A
/// failed resolution installs nothing and a later call may retry.
pub fn init_with(resolver: &Resolver) -> Result<&'static Settings, ConfigError> {
    SETTINGS.get_or_try_init(|| {
        let settings = resolver.resolve()?;
        debug!("Installed process-wide settings");
        Ok(settings)
    })
}

/// Install already resolved settings
///
/// Returns the previously installed instance, dropping `settings`, if
/// another caller got there first.
pub fn install(settings: Settings) -> &'static Settings {
    SETTINGS.get_or_init(|| {
        debug!("Installed process-wide settings");
        settings
    })
}

/// The installed settings, if [`init`] has completed
pub fn get() -> Option<&'static Settings> {
    SETTINGS.get()
}
