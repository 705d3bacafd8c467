//! Fixture files for data-driven tests.
//!
//! A fixture file holds a list of cases under a `case` key. TOML files use
//! `[[case]]` tables; JSON files use `{"case": [...]}`.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
struct CaseFile<T> {
    case: Vec<T>,
}

/// Reads every case in `path`, choosing the format by file extension.
pub fn load_cases<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read fixture file {path:?}: {err}"));
    let file: CaseFile<T> = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&content)
            .unwrap_or_else(|err| panic!("invalid TOML fixture {path:?}: {err}")),
        Some("json") => serde_json::from_str(&content)
            .unwrap_or_else(|err| panic!("invalid JSON fixture {path:?}: {err}")),
        other => panic!("unsupported fixture extension {other:?} for {path:?}"),
    };
    assert!(!file.case.is_empty(), "fixture file {path:?} has no cases");
    file.case
}

/// Path of `name` inside the calling crate's `tests/fixtures` directory.
pub fn fixture_path(manifest_dir: &str, name: &str) -> PathBuf {
    Path::new(manifest_dir).join("tests").join("fixtures").join(name)
}

/// Splits a multi-line expectation into trimmed, non-empty lines.
pub fn expected_lines(block: &str) -> Vec<String> {
    block
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}
