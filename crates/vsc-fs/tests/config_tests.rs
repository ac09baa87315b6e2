use std::collections::BTreeMap;
use std::fs;

use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use vsc_fs::{ConfigStore, Error, Format, NormalizedPath};

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
struct TestConfig {
    configs_path: String,
    #[serde(default)]
    apps: BTreeMap<String, String>,
}

#[test]
fn test_load_toml() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.toml");
    fs::write(
        &file_path,
        "configs_path = \"/srv/configs\"\n\n[apps]\nvscode = \"/home/u/.config/Code/User\"\n",
    )
    .unwrap();

    let config: TestConfig = ConfigStore::new()
        .load(&NormalizedPath::new(&file_path))
        .unwrap();

    assert_eq!(config.configs_path, "/srv/configs");
    assert_eq!(config.apps["vscode"], "/home/u/.config/Code/User");
}

#[test]
fn test_load_json() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.json");
    fs::write(&file_path, r#"{"configs_path": "/srv/configs"}"#).unwrap();

    let config: TestConfig = ConfigStore::new()
        .load(&NormalizedPath::new(&file_path))
        .unwrap();

    assert_eq!(config.configs_path, "/srv/configs");
    assert!(config.apps.is_empty());
}

#[test]
fn test_save_then_load_toml() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("nested/config.toml"));
    let mut apps = BTreeMap::new();
    apps.insert("cursor".to_string(), "/c".to_string());
    let config = TestConfig {
        configs_path: "/x".to_string(),
        apps,
    };

    let store = ConfigStore::new();
    store.save(&path, &config).unwrap();
    let loaded: TestConfig = store.load(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_load_or_default_when_missing() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("config.toml"));

    let config: TestConfig = ConfigStore::new().load_or_default(&path).unwrap();

    assert_eq!(config, TestConfig::default());
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.toml");
    fs::write(&file_path, "configs_path = [unterminated").unwrap();

    let result: Result<TestConfig, _> = ConfigStore::new().load(&NormalizedPath::new(&file_path));

    assert!(matches!(result, Err(Error::ConfigParse { ref format, .. }) if format == "TOML"));
}

#[test]
fn test_unknown_extension_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.ini");
    fs::write(&file_path, "x=1").unwrap();

    let result: Result<TestConfig, _> = ConfigStore::new().load(&NormalizedPath::new(&file_path));

    assert!(matches!(result, Err(Error::UnsupportedFormat { ref extension }) if extension == "ini"));
}

#[test]
fn test_format_from_extension_ignores_case() {
    assert_eq!(
        Format::from_path(&NormalizedPath::new("/etc/vsc-sync/Config.TOML")).unwrap(),
        Format::Toml
    );
    assert_eq!(
        Format::from_path(&NormalizedPath::new("settings.Json")).unwrap(),
        Format::Json
    );
    assert!(Format::from_path(&NormalizedPath::new("config")).is_err());
}
