//! Loading and validating configuration.

use std::{env, path::Path};

use tracing::debug;

use provgate_contracts::error::{GateError, GateResult};

use crate::schema::{GateConfig, ScannerConfig, SigningConfig};

impl GateConfig {
    /// Parse `s` as TOML and validate it.
    ///
    /// Returns `GateError::ConfigError` if the TOML is malformed, does not
    /// match the schema, or holds out-of-range values.
    pub fn from_toml_str(s: &str) -> GateResult<Self> {
        let config: GateConfig = toml::from_str(s).map_err(|e| GateError::ConfigError {
            reason: format!("failed to parse gate TOML: {}", e),
        })?;
        config.scanner.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as gate configuration.
    pub fn from_file(path: &Path) -> GateResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| GateError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        let config = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }
}

impl ScannerConfig {
    /// Reject parameter combinations the scanner cannot use.
    pub fn validate(&self) -> GateResult<()> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(GateError::ConfigError {
                reason: format!("scanner.alpha must be within [0, 1], got {}", self.alpha),
            });
        }
        if !self.threshold.is_finite() {
            return Err(GateError::ConfigError {
                reason: format!("scanner.threshold must be finite, got {}", self.threshold),
            });
        }
        if self.reference_texts.iter().all(|t| t.trim().is_empty()) {
            return Err(GateError::ConfigError {
                reason: "scanner.reference_texts must hold at least one non-empty text".to_string(),
            });
        }
        Ok(())
    }
}

impl SigningConfig {
    /// Read the signing key from the configured environment variable.
    ///
    /// Fails with `GateError::ConfigError` when the variable is unset, not
    /// valid UTF-8, or empty.
    pub fn load_secret(&self) -> GateResult<Vec<u8>> {
        let value = env::var(&self.secret_env).map_err(|e| GateError::ConfigError {
            reason: format!("signing secret ${}: {}", self.secret_env, e),
        })?;
        if value.is_empty() {
            return Err(GateError::ConfigError {
                reason: format!("signing secret ${} is empty", self.secret_env),
            });
        }
        Ok(value.into_bytes())
    }
}
