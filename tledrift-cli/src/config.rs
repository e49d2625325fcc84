//! Configuration file handling.
//!
//! Settings live in `~/.tledrift/config.yaml`, in a small flat YAML subset
//! (two-level `section: / key: value`). Example:
//!
//! ```yaml
//! spacetrack:
//!   username: someone@example.org
//!   password: hunter2
//! discos:
//!   token: IjEyMzQi...
//! data:
//!   dir: data
//! ```

use std::fs;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Settings structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub spacetrack: SpaceTrackConfig,
    pub discos: DiscosConfig,
    pub data: DataConfig,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpaceTrackConfig {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiscosConfig {
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataConfig {
    /// Root of the local catalog cache.
    pub dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            dir: "data".to_string(),
        }
    }
}

impl Config {
    /// Username/password pair, present only when both keys are set.
    pub fn spacetrack_credentials(&self) -> Option<(String, String)> {
        match (&self.spacetrack.username, &self.spacetrack.password) {
            (Some(user), Some(pass)) => Some((user.clone(), pass.clone())),
            _ => None,
        }
    }

    pub fn discos_token(&self) -> Option<String> {
        self.discos.token.clone()
    }
}

// ---------------------------------------------------------------------------
// Load & parse
// ---------------------------------------------------------------------------

fn dirs_home() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn config_path() -> PathBuf {
    dirs_home().join(".tledrift").join("config.yaml")
}

/// Read the config file, falling back to defaults when it is missing
/// or unreadable. A missing file is the normal first-run state.
pub fn load_config() -> Config {
    match fs::read_to_string(config_path()) {
        Ok(text) => parse_config(&text),
        Err(_) => Config::default(),
    }
}

fn parse_config(text: &str) -> Config {
    let mut config = Config::default();
    let mut section = String::new();

    for line in text.lines() {
        let trimmed = line.trim_end();
        if trimmed.is_empty() || trimmed.trim_start().starts_with('#') {
            continue;
        }
        let indented = trimmed.starts_with("  ") || trimmed.starts_with('\t');
        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        if !indented {
            section = key.to_string();
            continue;
        }

        match (section.as_str(), key) {
            ("spacetrack", "username") => config.spacetrack.username = parse_string_value(value),
            ("spacetrack", "password") => config.spacetrack.password = parse_string_value(value),
            ("discos", "token") => config.discos.token = parse_string_value(value),
            ("data", "dir") => {
                if let Some(dir) = parse_string_value(value) {
                    config.data.dir = dir;
                }
            }
            _ => {} // unknown keys are ignored
        }
    }

    config
}

fn parse_string_value(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value == "null" || value == "~" {
        return None;
    }
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    Some(value.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
