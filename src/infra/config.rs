//! Configuration management infrastructure.
//!
//! Persists CLI preferences (output format, length enforcement, verbosity)
//! as TOML. Extension OIDs are protocol constants, not
//! configuration.

use crate::infra::error::{HybridError, HybridResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Output format for inspection results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {other}")),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridConfiguration {
    /// Treat a secondary signature whose length disagrees with the registry as invalid
    pub enforce_signature_length: bool,

    /// Default output format for `inspect`
    pub default_output_format: OutputFormat,

    /// Whether to show verbose output
    pub verbose: bool,
}

impl Default for HybridConfiguration {
    fn default() -> Self {
        Self {
            enforce_signature_length: true,
            default_output_format: OutputFormat::Text,
            verbose: false,
        }
    }
}

/// Configuration export formats
#[derive(Debug, Clone, Copy)]
pub enum ExportFormat {
    Toml,
    Json,
}

/// Configuration manager for handling config files
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new configuration manager with default path
    pub fn new() -> HybridResult<Self> {
        let config_path = Self::default_config_path()?;
        Ok(Self { config_path })
    }

    /// Create a configuration manager with custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> HybridResult<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            Ok(config_dir.join("hybrid-x509").join("config.toml"))
        } else {
            Ok(PathBuf::from("hybrid-x509-config.toml"))
        }
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub fn load_or_create_default(&self) -> HybridResult<HybridConfiguration> {
        if self.config_path.exists() {
            self.load()
        } else {
            log::info!(
                "Configuration file not found, creating default: {}",
                self.config_path.display()
            );
            let default_config = HybridConfiguration::default();
            self.save(&default_config)?;
            Ok(default_config)
        }
    }

    /// Load configuration from file, falling back to defaults without writing
    pub fn load_or_default(&self) -> HybridResult<HybridConfiguration> {
        if self.config_path.exists() {
            self.load()
        } else {
            log::debug!(
                "No configuration at {}, using defaults",
                self.config_path.display()
            );
            Ok(HybridConfiguration::default())
        }
    }

    /// Load configuration from file
    pub fn load(&self) -> HybridResult<HybridConfiguration> {
        log::info!("Loading configuration from: {}", self.config_path.display());

        let content = fs::read_to_string(&self.config_path).map_err(|e| {
            HybridError::ConfigurationError(format!(
                "Failed to read config file {}: {}",
                self.config_path.display(),
                e
            ))
        })?;

        let config: HybridConfiguration = toml::from_str(&content).map_err(|e| {
            HybridError::ConfigurationError(format!("Failed to parse config file: {e}"))
        })?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, config: &HybridConfiguration) -> HybridResult<()> {
        log::info!("Saving configuration to: {}", self.config_path.display());

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                HybridError::ConfigurationError(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(config).map_err(|e| {
            HybridError::ConfigurationError(format!("Failed to serialize config: {e}"))
        })?;

        fs::write(&self.config_path, content).map_err(|e| {
            HybridError::ConfigurationError(format!(
                "Failed to write config file {}: {}",
                self.config_path.display(),
                e
            ))
        })
    }

    /// Update a specific configuration value
    pub fn update_value(&self, key: &str, value: &str) -> HybridResult<()> {
        let mut config = self.load_or_default()?;

        match key {
            "enforce_signature_length" => {
                config.enforce_signature_length = value.parse().map_err(|_| {
                    HybridError::ConfigurationError(format!("Invalid boolean value: {value}"))
                })?;
            }
            "default_output_format" => {
                config.default_output_format =
                    value.parse().map_err(HybridError::ConfigurationError)?;
            }
            "verbose" => {
                config.verbose = value.parse().map_err(|_| {
                    HybridError::ConfigurationError(format!("Invalid boolean value: {value}"))
                })?;
            }
            _ => {
                return Err(HybridError::ConfigurationError(format!(
                    "Unknown configuration key: {key}"
                )));
            }
        }

        self.save(&config)
    }

    /// Get the configuration file path
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Export configuration as a portable format
    pub fn export_config(&self, format: ExportFormat) -> HybridResult<String> {
        let config = self.load_or_default()?;

        match format {
            ExportFormat::Toml => toml::to_string_pretty(&config)
                .map_err(|e| HybridError::ConfigurationError(format!("TOML export failed: {e}"))),
            ExportFormat::Json => serde_json::to_string_pretty(&config)
                .map_err(|e| HybridError::ConfigurationError(format!("JSON export failed: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_enforces_length() {
        let config = HybridConfiguration::default();
        assert!(config.enforce_signature_length);
        assert_eq!(config.default_output_format, OutputFormat::Text);
        assert!(!config.verbose);
    }

    #[test]
    fn save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("nested").join("config.toml"));

        let created = manager.load_or_create_default().unwrap();
        assert!(manager.config_path().exists());

        manager.update_value("default_output_format", "json").unwrap();
        manager.update_value("verbose", "true").unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded.default_output_format, OutputFormat::Json);
        assert!(loaded.verbose);
        assert_eq!(
            loaded.enforce_signature_length,
            created.enforce_signature_length
        );
    }

    #[test]
    fn invalid_values_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("config.toml"));

        assert!(manager.update_value("verbose", "maybe").is_err());
        assert!(manager.update_value("default_output_format", "yaml").is_err());
        assert!(manager.update_value("no_such_key", "1").is_err());
    }

    #[test]
    fn ill_typed_value_in_file_fails_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "enforce_signature_length = \"yes\"\n").unwrap();
        let err = ConfigManager::with_path(&path).load().unwrap_err();
        assert!(matches!(err, HybridError::ConfigurationError(_)));
    }

    #[test]
    fn json_export_contains_fields() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("config.toml"));
        let json = manager.export_config(ExportFormat::Json).unwrap();
        assert!(json.contains("\"enforce_signature_length\": true"));
        assert!(json.contains("\"default_output_format\": \"text\""));
    }
}
