//! # provgate-config
//!
//! TOML configuration for the provenance gate: where the audit log and
//! quarantine live, which environment variable holds the signing key, and
//! the reference scanner's parameters.
//!
//! ```rust,ignore
//! use provgate_config::GateConfig;
//!
//! let config = GateConfig::from_file(Path::new("provgate.toml"))?;
//! let secret = config.signing.load_secret()?;
//! ```

pub mod loader;
pub mod schema;

pub use schema::{AuditConfig, GateConfig, QuarantineConfig, ScannerConfig, SigningConfig};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::{env, path::PathBuf};

    use provgate_contracts::error::GateError;

    use crate::{
        schema::{DEFAULT_ALPHA, DEFAULT_REFERENCE_TEXT, DEFAULT_THRESHOLD},
        GateConfig, SigningConfig,
    };

    fn expect_config_error(toml: &str, needle: &str) {
        match GateConfig::from_toml_str(toml) {
            Err(GateError::ConfigError { reason }) => {
                assert!(reason.contains(needle), "expected '{needle}' in reason, got: {reason}")
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    // ── Defaults ──────────────────────────────────────────────────────────────

    /// An empty document yields the documented defaults.
    #[test]
    fn test_empty_document_uses_defaults() {
        let config = GateConfig::from_toml_str("").unwrap();

        assert_eq!(config, GateConfig::default());
        assert_eq!(config.audit.path, PathBuf::from("data/audit/audit_log.jsonl"));
        assert!(!config.audit.resume);
        assert!(config.audit.sync);
        assert_eq!(config.quarantine.root, PathBuf::from("data/quarantine"));
        assert_eq!(config.signing.secret_env, "PROVGATE_SECRET");
        assert_eq!(config.scanner.threshold, DEFAULT_THRESHOLD);
        assert_eq!(config.scanner.alpha, DEFAULT_ALPHA);
        assert_eq!(config.scanner.reference_texts, vec![DEFAULT_REFERENCE_TEXT.to_string()]);
    }

    /// A partial section overrides only what it names.
    #[test]
    fn test_partial_override() {
        let toml = r#"
            [audit]
            path = "/var/log/provgate/audit.jsonl"
            resume = true

            [scanner]
            threshold = 0.5
            reference_texts = ["API keys rotate every 90 days.", "Passwords are never logged."]
        "#;

        let config = GateConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.audit.path, PathBuf::from("/var/log/provgate/audit.jsonl"));
        assert!(config.audit.resume);
        assert!(config.audit.sync, "unset field keeps its default");
        assert_eq!(config.scanner.threshold, 0.5);
        assert_eq!(config.scanner.alpha, DEFAULT_ALPHA);
        assert_eq!(config.scanner.reference_texts.len(), 2);
    }

    // ── Rejections ────────────────────────────────────────────────────────────

    /// Malformed TOML is a configuration error.
    #[test]
    fn test_malformed_toml() {
        expect_config_error("[audit\npath = ", "failed to parse gate TOML");
    }

    /// Misspelled keys are not silently ignored.
    #[test]
    fn test_unknown_key_rejected() {
        expect_config_error("[audit]\nsynk = false\n", "synk");
    }

    /// Alpha outside [0, 1] is rejected.
    #[test]
    fn test_alpha_out_of_range() {
        expect_config_error("[scanner]\nalpha = 1.5\n", "scanner.alpha");
    }

    /// A scanner with no usable baseline is rejected.
    #[test]
    fn test_empty_reference_texts() {
        expect_config_error("[scanner]\nreference_texts = []\n", "reference_texts");
        expect_config_error("[scanner]\nreference_texts = [\"  \"]\n", "reference_texts");
    }

    /// A missing file is reported with its path.
    #[test]
    fn test_missing_file() {
        match GateConfig::from_file(std::path::Path::new("/nonexistent/provgate.toml")) {
            Err(GateError::ConfigError { reason }) => assert!(reason.contains("/nonexistent/provgate.toml")),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    // ── Secrets ───────────────────────────────────────────────────────────────

    /// The secret is read from the named variable.
    #[test]
    fn test_load_secret() {
        env::set_var("PROVGATE_TEST_SECRET_SET", "super-secret-key");
        let signing = SigningConfig {
            secret_env: "PROVGATE_TEST_SECRET_SET".to_string(),
        };
        assert_eq!(signing.load_secret().unwrap(), b"super-secret-key".to_vec());
    }

    /// Unset and empty variables are configuration errors.
    #[test]
    fn test_load_secret_missing_or_empty() {
        let unset = SigningConfig {
            secret_env: "PROVGATE_TEST_SECRET_UNSET".to_string(),
        };
        env::remove_var(&unset.secret_env);
        assert!(matches!(unset.load_secret(), Err(GateError::ConfigError { .. })));

        env::set_var("PROVGATE_TEST_SECRET_EMPTY", "");
        let empty = SigningConfig {
            secret_env: "PROVGATE_TEST_SECRET_EMPTY".to_string(),
        };
        match empty.load_secret() {
            Err(GateError::ConfigError { reason }) => assert!(reason.contains("is empty")),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }
}
