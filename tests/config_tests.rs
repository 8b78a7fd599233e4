use std::collections::HashMap;

use shule::{
    config::{ConfigState, DEFAULT_BIND_ADDR},
    types::AcademicLevel,
};
use tracing::Level;

fn from(vars: &[(&str, &str)]) -> anyhow::Result<ConfigState> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ConfigState::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_apply_when_unset() {
    let cfg = from(&[]).expect("config");
    assert_eq!(cfg.bind_addr(), DEFAULT_BIND_ADDR);
    assert_eq!(cfg.log_level(), Level::INFO);
    assert_eq!(cfg.default_level(), AcademicLevel::OLevel);
}

#[test]
fn blank_values_count_as_unset() {
    let cfg = from(&[("SHULE_BIND_ADDR", "   "), ("SHULE_DEFAULT_LEVEL", "")]).expect("config");
    assert_eq!(cfg.bind_addr(), DEFAULT_BIND_ADDR);
    assert_eq!(cfg.default_level(), AcademicLevel::OLevel);
}

#[test]
fn overrides_are_read() {
    let cfg = from(&[
        ("SHULE_BIND_ADDR", "0.0.0.0:9000"),
        ("SHULE_LOG_LEVEL", "debug"),
        ("SHULE_DEFAULT_LEVEL", "university"),
    ])
    .expect("config");
    assert_eq!(cfg.bind_addr(), "0.0.0.0:9000");
    assert_eq!(cfg.log_level(), Level::DEBUG);
    assert_eq!(cfg.default_level(), AcademicLevel::University);
}

#[test]
fn invalid_values_are_errors() {
    assert!(from(&[("SHULE_LOG_LEVEL", "loud")]).is_err());
    assert!(from(&[("SHULE_DEFAULT_LEVEL", "nursery")]).is_err());
}
