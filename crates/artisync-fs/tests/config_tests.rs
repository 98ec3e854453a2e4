//! Tests for ConfigStore format detection

use artisync_fs::{ConfigStore, Error};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use std::fs;
use tempfile::TempDir;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Sample {
    name: String,
    roots: Vec<String>,
}

fn sample() -> Sample {
    Sample {
        name: "artisync".into(),
        roots: vec!["/home/user/prompts".into()],
    }
}

#[test]
fn save_and_load_each_format() {
    let temp = TempDir::new().unwrap();
    let store = ConfigStore::new();

    for file in ["config.toml", "config.json", "config.yaml"] {
        let path = temp.path().join(file);
        store.save(&path, &sample()).unwrap();
        let loaded: Sample = store.load(&path).unwrap();
        assert_eq!(loaded, sample(), "format {file}");
    }
}

#[test]
fn unknown_extension_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.ini");
    fs::write(&path, "name = x").unwrap();

    let result: Result<Sample, _> = ConfigStore::new().load(&path);
    assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
}

#[test]
fn parse_error_names_the_format() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "name = [unterminated").unwrap();

    let err = ConfigStore::new().load::<Sample>(&path).unwrap_err();
    assert!(err.to_string().contains("TOML"), "got: {err}");
}
