//! # Configuration Utilities
//!
//! TOML configuration for the web service, plus the generic loader shared
//! by the binaries.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: WebConfig = load_config("config/web.toml")?;
/// ```
pub fn load_config<T>(path: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Complete web service configuration.
///
/// Every section and field is optional in the file; missing values fall
/// back to the defaults below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Listener settings
    pub server: ServerSection,
    /// Where uploads and results are stored
    pub uploads: UploadsSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Address to bind (e.g., "0.0.0.0:8081")
    pub address: String,
    /// Largest accepted request body (bytes)
    pub max_upload_bytes: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            address: "0.0.0.0:8081".to_string(),
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadsSection {
    /// Original uploads, messages and encoded PNGs
    pub encode_dir: PathBuf,
    /// Uploaded encoded images and recovered messages
    pub decode_dir: PathBuf,
}

impl Default for UploadsSection {
    fn default() -> Self {
        Self {
            encode_dir: PathBuf::from("./uploads/encode"),
            decode_dir: PathBuf::from("./uploads/decode"),
        }
    }
}

impl WebConfig {
    /// Create both upload directories if they do not exist yet.
    pub fn ensure_upload_dirs(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.uploads.encode_dir)?;
        fs::create_dir_all(&self.uploads.decode_dir)?;
        Ok(())
    }
}
