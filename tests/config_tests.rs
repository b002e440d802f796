use mdimg::config::{Config, FetchMode};
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_missing_config_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_from(&dir.path().join("config.toml")).expect("Should load defaults");
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/config.toml");

    let config = Config {
        upload_url: "https://img.example.com/upload".to_string(),
        markdown_dir: PathBuf::from("/home/me/vault"),
        obs2md: false,
        local_upload: true,
        timeout_secs: Some(10),
        temp_dir: Some(PathBuf::from("/var/tmp")),
    };

    config.save_to(&path).expect("Should save config");
    let loaded = Config::load_from(&path).expect("Should load config");

    assert_eq!(loaded, config);
    assert_eq!(loaded.fetch_mode(), FetchMode::Local);
}

#[test]
fn test_unparsable_config_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "obs2md = \"maybe\"").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}
