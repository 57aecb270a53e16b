//! Integration tests for fail-fast configuration loading.

use std::ffi::OsString;
use std::fs;

use ortho_config::OrthoConfig;
use tempfile::TempDir;

use dockworker_config::{Config, default_api_version, default_backend_timeout};

fn load_with_file(contents: &str) -> Result<Config, String> {
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = temp_dir.path().join("dockworker.toml");
    fs::write(&path, contents).expect("write config");

    Config::load_from_iter([
        OsString::from("dockworkerd"),
        OsString::from("--config-path"),
        path.into_os_string(),
    ])
    .map_err(|error| error.to_string())
}

#[test]
fn malformed_toml_fails_to_load() {
    let result = load_with_file("api_version = \"1.41\"\nbackend_timeout_secs = = 3\n");
    assert!(result.is_err(), "malformed TOML should be rejected");
}

#[test]
fn invalid_api_version_fails_to_load() {
    let result = load_with_file("api_version = \"latest\"\n");
    let error = result.expect_err("non-numeric API version should be rejected");
    assert!(!error.is_empty());
}

#[test]
fn invalid_bus_socket_flag_fails_to_load() {
    let result = Config::load_from_iter([
        OsString::from("dockworkerd"),
        OsString::from("--bus-socket"),
        OsString::from("invalid://socket"),
    ]);
    assert!(result.is_err());
}

#[test]
fn backend_timeout_is_read_from_file() {
    let config = load_with_file("backend_timeout_secs = 15\n").expect("config loads");
    assert_eq!(config.backend_timeout().as_secs(), 15);
}

#[test]
fn bare_invocation_resolves_defaults() {
    let config = Config::load_from_iter([OsString::from("dockworkerd")])
        .expect("defaults load without file, environment or flags");
    assert_eq!(config.api_version(), default_api_version());
    assert_eq!(config.backend_timeout(), default_backend_timeout());
}
