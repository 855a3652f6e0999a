//! Dependency extraction from package manifests.

use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    static ref REQUIREMENT_NAME: Regex = Regex::new(r"^([^=<>!~;\[\s@]+)").unwrap();
}

/// Manifests read from the repository root, in lookup order
pub const MANIFEST_FILES: &[&str] = &["package.json", "requirements.txt", "Cargo.toml"];

/// `dependencies` then `devDependencies` keys of a parsed `package.json`
pub fn package_json_dependencies(package: &Value) -> Vec<String> {
    ["dependencies", "devDependencies"]
        .iter()
        .filter_map(|section| package.get(section).and_then(Value::as_object))
        .flat_map(|deps| deps.keys().cloned())
        .collect()
}

/// Parses `package.json`, logging and discarding malformed documents
pub fn parse_package_json(content: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(content) {
        Ok(value) if value.is_object() => Some(value),
        Ok(_) => {
            warn!("package.json is not a JSON object, ignoring it");
            None
        }
        Err(e) => {
            warn!("Failed to parse package.json: {}", e);
            None
        }
    }
}

/// Package names from a pip requirements file
///
/// Comments, blank lines and option lines (`-r`, `-e`, `--index-url`) are
/// skipped; version specifiers, extras and markers are cut off.
pub fn requirements_dependencies(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
        .filter_map(|line| REQUIREMENT_NAME.captures(line))
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Keys of `[dependencies]` and `[dev-dependencies]` in a `Cargo.toml`
pub fn cargo_dependencies(content: &str) -> Vec<String> {
    let manifest: toml::Value = match toml::from_str(content) {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to parse Cargo.toml: {}", e);
            return Vec::new();
        }
    };

    ["dependencies", "dev-dependencies"]
        .iter()
        .filter_map(|section| manifest.get(section).and_then(toml::Value::as_table))
        .flat_map(|table| table.keys().cloned())
        .collect()
}

/// Removes duplicates keeping the first occurrence, then truncates to `limit`
pub fn dedup_and_limit(dependencies: Vec<String>, limit: usize) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    dependencies
        .into_iter()
        .filter(|dep| seen.insert(dep.clone()))
        .take(limit)
        .collect()
}
