//! `KEY=VALUE` settings file loading.
//!
//! Lines are trimmed; blank lines and `#` comments are skipped, and lines
//! without an `=` are ignored, as are lines with an empty key or a NUL
//! byte, which the environment cannot hold. Entries are applied to the process
//! environment in file order, so a later key overwrites an earlier one.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Default settings file, relative to the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = ".env";

/// A single key/value pair parsed from a settings source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsEntry {
    /// Setting name.
    pub key: String,
    /// Setting value.
    pub value: String,
}

/// Parse one settings line.
///
/// Returns `None` for blank lines, comments, lines without an `=` and
/// entries that cannot be stored in the environment.
pub fn parse_line(line: &str) -> Option<SettingsEntry> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (key, value) = line.split_once('=')?;
    let (key, value) = (key.trim(), value.trim());

    if key.is_empty() {
        debug!("Skipping settings line with empty key");
        return None;
    }
    if key.contains('\0') || value.contains('\0') {
        warn!("Skipping setting {:?}: contains a NUL byte", key.replace('\0', "\\0"));
        return None;
    }

    Some(SettingsEntry {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Parse every entry from a reader without touching process state.
pub fn parse_settings<R: BufRead>(reader: R) -> std::io::Result<Vec<SettingsEntry>> {
    let mut entries = Vec::new();
    for line in reader.lines() {
        if let Some(entry) = parse_line(&line?) {
            entries.push(entry);
        }
    }
    Ok(entries)
}

/// Load a settings file into the process environment.
///
/// Returns the number of entries applied. A read error partway through the
/// file is reported after the lines before it have been applied.
pub fn load_settings(path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::ConfigFile {
        path: path.display().to_string(),
        source,
    })?;

    let mut applied = 0;
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|source| Error::ConfigFile {
            path: path.display().to_string(),
            source,
        })?;

        if let Some(entry) = parse_line(&line) {
            std::env::set_var(&entry.key, &entry.value);
            applied += 1;
        }
    }

    debug!("Loaded {} settings from {}", applied, path.display());
    Ok(applied)
}
