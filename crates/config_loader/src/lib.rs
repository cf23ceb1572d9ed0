//! # Config Loader
//!
//! Loading and validation of scenario files and engine configuration.
//!
//! Responsibilities:
//! - Parse TOML/JSON files
//! - Validate ranges and cross-field rules
//! - Produce a ready-to-run [`Scenario`] or [`EngineConfig`]
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let scenario = ConfigLoader::load_scenario(Path::new("scenario.toml")).unwrap();
//! println!("steps: {}", scenario.steps.len());
//! ```

mod parser;
mod validator;

pub use contracts::{EngineConfig, Scenario};
pub use parser::ConfigFormat;

use contracts::ContractError;
use serde::Serialize;
use std::path::Path;

/// Top-level keys that only appear in scenario files
const SCENARIO_KEYS: [&str; 5] = ["surfaces", "steps", "display", "viewport", "run_until_ms"];

/// A validated configuration file of either kind
#[derive(Debug, Clone)]
pub enum ConfigDocument {
    Scenario(Box<Scenario>),
    Engine(EngineConfig),
}

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a scenario from file path
    ///
    /// Format is detected from the file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_scenario(path: &Path) -> Result<Scenario, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::scenario_from_str(&content, format)
    }

    /// Load a scenario from string
    pub fn scenario_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<Scenario, ContractError> {
        let scenario: Scenario = parser::parse(content, format)?;
        validator::validate_scenario(&scenario)?;
        Ok(scenario)
    }

    /// Load engine configuration from file path
    pub fn load_engine_config(path: &Path) -> Result<EngineConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::engine_config_from_str(&content, format)
    }

    /// Load engine configuration from string
    pub fn engine_config_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<EngineConfig, ContractError> {
        let config: EngineConfig = parser::parse(content, format)?;
        validator::validate_engine(&config)?;
        Ok(config)
    }

    /// Load a file that may hold either a scenario or an engine configuration.
    ///
    /// A file is treated as a scenario when it has any scenario-only top-level key.
    pub fn load_any(path: &Path) -> Result<ConfigDocument, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::any_from_str(&content, format)
    }

    pub fn any_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<ConfigDocument, ContractError> {
        let keys = parser::top_level_keys(content, format)?;
        if keys.iter().any(|key| SCENARIO_KEYS.contains(&key.as_str())) {
            Self::scenario_from_str(content, format).map(|s| ConfigDocument::Scenario(Box::new(s)))
        } else {
            Self::engine_config_from_str(content, format).map(ConfigDocument::Engine)
        }
    }

    /// Validate an already-built scenario
    pub fn validate_scenario(scenario: &Scenario) -> Result<(), ContractError> {
        validator::validate_scenario(scenario)
    }

    /// Serialize to TOML string
    pub fn to_toml<T: Serialize>(value: &T) -> Result<String, ContractError> {
        toml::to_string_pretty(value)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize to JSON string
    pub fn to_json<T: Serialize>(value: &T) -> Result<String, ContractError> {
        serde_json::to_string_pretty(value)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }
}
