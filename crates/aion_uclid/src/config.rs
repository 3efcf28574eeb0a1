//! Loading and validating translator configuration.
//!
//! Configuration governs presentation and enforcement knobs only (how wide
//! an indent, whether a BMC control block is mandatory); it never changes
//! translation semantics, which stay a pure function of the circuit and the
//! primed-mode flag. This keeps `ConfigError` a strictly separate failure
//! domain from [`crate::error::TranslateError`].

use serde::Deserialize;

/// Errors that can occur when loading or validating a [`TranslatorConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Configuration controlling how the translator formats and enforces
/// presentation details of its output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// The number of spaces per indent level in emitted text.
    pub indent_width: usize,
    /// When `true`, a circuit with no `Bmc` annotation is rejected by
    /// [`crate::translate::translate`] with a `TranslateError`, rather than
    /// silently emitting no control block. `validate_config` never inspects
    /// this field: it has no circuit to check it against.
    pub require_bmc_block: bool,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            indent_width: 2,
            require_bmc_block: false,
        }
    }
}

/// Parses and validates a [`TranslatorConfig`] from a TOML string.
pub fn load_config_from_str(content: &str) -> Result<TranslatorConfig, ConfigError> {
    let config: TranslatorConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Parses and validates a [`TranslatorConfig`] from a file.
pub fn load_config(path: &std::path::Path) -> Result<TranslatorConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Validates that configuration values are internally consistent.
pub fn validate_config(config: &TranslatorConfig) -> Result<(), ConfigError> {
    if config.indent_width == 0 {
        return Err(ConfigError::ValidationError(
            "indent_width must be at least 1".to_string(),
        ));
    }
    Ok(())
}
