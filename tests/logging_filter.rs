// tests/logging_filter.rs

use scriptcollect::logging::{filter_from_env, parse_level_str};
use tracing::Level;

#[test]
fn bare_levels_are_case_insensitive() {
    assert_eq!(parse_level_str("DEBUG"), Some(Level::DEBUG));
    assert_eq!(parse_level_str(" warning "), Some(Level::WARN));
    assert_eq!(parse_level_str("verbose"), None);
}

#[test]
fn env_value_accepts_levels_and_directives() {
    assert!(filter_from_env(None).is_ok());
    assert!(filter_from_env(Some("   ")).is_ok());
    assert!(filter_from_env(Some("trace")).is_ok());
    assert!(filter_from_env(Some("scriptcollect=debug,reqwest=warn")).is_ok());
}

#[test]
fn malformed_directive_is_rejected() {
    let err = filter_from_env(Some("scriptcollect=loud")).unwrap_err();
    assert!(err.to_string().contains("SCRIPTCOLLECT_LOG"));
}
