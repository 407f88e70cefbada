//! File helpers shared by the subcommands. Errors are human-readable strings.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|_| format!("error: {} file not found: {}", what, path.display()))?;
    serde_json::from_str(&text)
        .map_err(|e| format!("error: invalid {} JSON in {}: {}", what, path.display(), e))
}

pub fn to_pretty<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("error: serialization failed: {}", e))
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    let mut text = to_pretty(value)?;
    text.push('\n');
    std::fs::write(path, text)
        .map_err(|e| format!("error: could not write {}: {}", path.display(), e))
}
