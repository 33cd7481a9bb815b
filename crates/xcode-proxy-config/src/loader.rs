//! Settings layer loaders.
//!
//! Each loader reads one file. The `read_*` functions report failures as
//! [`SettingsError`]; the `load_*` wrappers log them and fall back to an empty
//! layer so that a broken file never prevents startup.

use crate::error::SettingsError;
use crate::schema::{ClaudeCliEnv, ClaudeCliSettingsFile, LocalSettings};
use std::fs;
use std::path::{Path, PathBuf};

pub const CLAUDE_DIR: &str = ".claude";
pub const CLAUDE_SETTINGS_FILE: &str = "settings.json";
pub const LOCAL_SETTINGS_FILE: &str = "settings.toml";

/// Where the two settings layers are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsSources {
    /// Claude CLI settings (`~/.claude/settings.json`)
    pub claude_settings: Option<PathBuf>,

    /// Project-local overlay (`./settings.toml`)
    pub local_settings: Option<PathBuf>,
}

impl Default for SettingsSources {
    fn default() -> Self {
        Self {
            claude_settings: dirs::home_dir()
                .map(|home| home.join(CLAUDE_DIR).join(CLAUDE_SETTINGS_FILE)),
            local_settings: Some(PathBuf::from(LOCAL_SETTINGS_FILE)),
        }
    }
}

impl SettingsSources {
    pub fn with_claude_settings(mut self, path: impl Into<PathBuf>) -> Self {
        self.claude_settings = Some(path.into());
        self
    }

    pub fn with_local_settings(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_settings = Some(path.into());
        self
    }
}

/// Read the `env` object of the Claude CLI settings file.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_claude_cli_env(path: &Path) -> Result<Option<ClaudeCliEnv>, SettingsError> {
    let Some(content) = read_optional(path)? else {
        return Ok(None);
    };

    let file: ClaudeCliSettingsFile =
        serde_json::from_str(&content).map_err(|source| SettingsError::ParseJson {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(Some(file.env))
}

/// Read the project-local overlay file.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_local_settings(path: &Path) -> Result<Option<LocalSettings>, SettingsError> {
    let Some(content) = read_optional(path)? else {
        return Ok(None);
    };

    toml::from_str(&content)
        .map(Some)
        .map_err(|source| SettingsError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
}

pub fn load_claude_cli_env(path: Option<&Path>) -> ClaudeCliEnv {
    let Some(path) = path else {
        return ClaudeCliEnv::default();
    };

    match read_claude_cli_env(path) {
        Ok(Some(env)) => env,
        Ok(None) => {
            tracing::debug!(path = %path.display(), "Claude CLI settings not found");
            ClaudeCliEnv::default()
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to load Claude CLI settings");
            ClaudeCliEnv::default()
        }
    }
}

pub fn load_local_settings(path: Option<&Path>) -> LocalSettings {
    let Some(path) = path else {
        return LocalSettings::default();
    };

    match read_local_settings(path) {
        Ok(Some(local)) => local,
        Ok(None) => LocalSettings::default(),
        Err(e) => {
            tracing::error!(error = %e, "failed to load local settings");
            LocalSettings::default()
        }
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, SettingsError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(SettingsError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
