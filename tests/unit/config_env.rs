use cypherable::ProviderConfig;
use serial_test::serial;

fn clear_env() {
    for key in [
        "CYPHERABLE_PARAMETER_PREFIX",
        "CYPHERABLE_MAX_TRAVERSAL_DEPTH",
        "CYPHERABLE_PRETTY_PRINT",
        "CYPHERABLE_LOAD_COMPLEX_PROPERTIES",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn defaults_when_environment_is_empty() {
    clear_env();
    let config = ProviderConfig::from_env().unwrap();
    assert_eq!(config.parameter_prefix, "p");
    assert_eq!(config.max_traversal_depth, 100);
    assert!(!config.pretty_print);
    assert!(config.load_complex_properties);
}

#[test]
#[serial]
fn environment_overrides_are_applied() {
    clear_env();
    std::env::set_var("CYPHERABLE_PARAMETER_PREFIX", "param");
    std::env::set_var("CYPHERABLE_MAX_TRAVERSAL_DEPTH", "25");
    std::env::set_var("CYPHERABLE_PRETTY_PRINT", "true");
    let config = ProviderConfig::from_env().unwrap();
    assert_eq!(config.parameter_prefix, "param");
    assert_eq!(config.max_traversal_depth, 25);
    assert!(config.pretty_print);
    clear_env();
}

#[test]
#[serial]
fn invalid_depth_is_rejected() {
    clear_env();
    std::env::set_var("CYPHERABLE_MAX_TRAVERSAL_DEPTH", "5000");
    assert!(ProviderConfig::from_env().is_err());
    clear_env();
}
