//! Configuration file utilities
//!
//! Provides helper functions for reading and writing the bridge
//! configuration. All config files are stored in the platform-specific
//! config directory under "batch-uploader/".

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::registry::VariantRegistry;

const APP_DIR_NAME: &str = "batch-uploader";
const CONFIG_FILE_NAME: &str = "config.json";

fn default_timeout_secs() -> u64 {
    60
}

/// Connection settings for the reporting platform plus an optional path to
/// a variant registry document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploaderConfig {
    pub base_url: String,
    pub access_token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_file: Option<PathBuf>,
}

impl UploaderConfig {
    /// Load the saved configuration, if any.
    ///
    /// # Returns
    /// * `Ok(Some(config))` if a config file exists and parsed
    /// * `Ok(None)` if no config has been saved yet
    pub fn load() -> Result<Option<Self>, String> {
        load_config_file(CONFIG_FILE_NAME)
    }

    /// Persist this configuration to the config directory.
    ///
    /// # Returns
    /// The path where the file was saved
    pub fn save(&self) -> Result<PathBuf, String> {
        save_config_file(CONFIG_FILE_NAME, self)
    }
}

/// Get the app's config directory path.
///
/// Returns: `~/.config/batch-uploader` (Linux)
///          `~/Library/Application Support/batch-uploader` (macOS)
///          `C:\Users\<User>\AppData\Roaming\batch-uploader` (Windows)
pub fn get_config_dir() -> Result<PathBuf, String> {
    let config_dir = dirs::config_dir().ok_or("Could not find config directory")?;
    Ok(config_dir.join(APP_DIR_NAME))
}

/// Get the full path to a config file.
pub fn config_file_path(filename: &str) -> Result<PathBuf, String> {
    Ok(get_config_dir()?.join(filename))
}

/// Ensure the config directory exists.
pub fn ensure_config_dir() -> Result<PathBuf, String> {
    let dir = get_config_dir()?;
    fs::create_dir_all(&dir).map_err(|e| format!("Failed to create config directory: {}", e))?;
    Ok(dir)
}

/// Save data to a config file as JSON.
///
/// # Returns
/// The path where the file was saved
pub fn save_config_file<T: Serialize>(filename: &str, data: &T) -> Result<PathBuf, String> {
    let config_dir = ensure_config_dir()?;
    let config_file = config_dir.join(filename);

    let json = serde_json::to_string_pretty(data)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    fs::write(&config_file, json).map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(config_file)
}

/// Load data from a config file.
///
/// # Returns
/// * `Ok(Some(data))` if file exists and was parsed successfully
/// * `Ok(None)` if file doesn't exist
/// * `Err(...)` if file exists but couldn't be read/parsed
pub fn load_config_file<T: DeserializeOwned>(filename: &str) -> Result<Option<T>, String> {
    let config_file = config_file_path(filename)?;

    if !config_file.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&config_file)
        .map_err(|e| format!("Failed to read config file: {}", e))?;

    let data =
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))?;

    Ok(Some(data))
}

/// Load a variant registry document from an explicit path.
pub fn load_registry(path: &Path) -> Result<VariantRegistry, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read registry file {}: {}", path.display(), e))?;
    VariantRegistry::from_json(&contents)
        .map_err(|e| format!("Failed to parse registry file {}: {}", path.display(), e))
}
