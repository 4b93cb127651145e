use config::{global, MapSource, Resolver};
use types::ConfigError;

#[test]
fn test_failed_resolution_installs_nothing() {
    let invalid = Resolver::empty().with_source(MapSource::new([(
        "MC_MAVEN_BRIDGE__HANGAR__VERSIONS_LIMIT_PER_BATCH",
        "notanumber",
    )]));

    let err = global::init_with(&invalid).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
    assert!(global::get().is_none());

    let valid = Resolver::empty().with_source(MapSource::new([("MC_MAVEN_BRIDGE__DEBUG", "true")]));
    let settings = global::init_with(&valid).unwrap();
    assert!(settings.debug);
    assert!(std::ptr::eq(global::get().unwrap(), settings));
}
