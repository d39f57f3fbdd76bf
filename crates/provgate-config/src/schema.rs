//! Configuration schema.
//!
//! Every section and every field has a default, so an empty document is a
//! complete configuration.  Unknown keys are rejected to catch typos.
//!
//! ```toml
//! [audit]
//! path = "data/audit/audit_log.jsonl"
//! resume = false
//! sync = true
//!
//! [quarantine]
//! root = "data/quarantine"
//!
//! [signing]
//! secret_env = "PROVGATE_SECRET"
//!
//! [scanner]
//! threshold = 0.35
//! alpha = 0.6
//! reference_texts = ["Default clean baseline policy text."]
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_AUDIT_PATH: &str = "data/audit/audit_log.jsonl";
pub const DEFAULT_QUARANTINE_ROOT: &str = "data/quarantine";
pub const DEFAULT_SECRET_ENV: &str = "PROVGATE_SECRET";
pub const DEFAULT_THRESHOLD: f64 = 0.35;
pub const DEFAULT_ALPHA: f64 = 0.6;
pub const DEFAULT_REFERENCE_TEXT: &str = "Default clean baseline policy text.";

/// Top-level gate configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    pub audit: AuditConfig,
    pub quarantine: QuarantineConfig,
    pub signing: SigningConfig,
    pub scanner: ScannerConfig,
}

/// Where and how the audit log is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// JSON Lines file the chain is appended to.
    pub path: PathBuf,

    /// Continue the existing chain in `path` instead of starting a new
    /// segment.  The file is verified before anything is appended.
    pub resume: bool,

    /// `fdatasync` after every entry.
    pub sync: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_AUDIT_PATH),
            resume: false,
            sync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuarantineConfig {
    /// Directory evidence bundles are created under.
    pub root: PathBuf,
}

impl Default for QuarantineConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_QUARANTINE_ROOT),
        }
    }
}

/// Where the lineage signing key comes from.
///
/// The key itself never appears in the file, only the name of the
/// environment variable holding it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SigningConfig {
    pub secret_env: String,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            secret_env: DEFAULT_SECRET_ENV.to_string(),
        }
    }
}

/// Parameters for the reference lexical scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScannerConfig {
    /// `total_score` above this is suspicious.
    pub threshold: f64,

    /// Weight of the centroid distance in `total_score`; the mean
    /// per-reference distance gets `1 - alpha`.
    pub alpha: f64,

    /// Known-clean texts the baseline is built from.
    pub reference_texts: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            alpha: DEFAULT_ALPHA,
            reference_texts: vec![DEFAULT_REFERENCE_TEXT.to_string()],
        }
    }
}
