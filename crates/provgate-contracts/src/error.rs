//! Runtime error types for the provenance gate.
//!
//! Only faults live here: storage that cannot be written, collaborators that
//! break their contract, configuration that cannot be loaded.  A document
//! failing a check is never an error; it is a quarantine verdict.

use thiserror::Error;

/// The unified error type for the provenance gate.
#[derive(Debug, Error)]
pub enum GateError {
    /// The audit log could not durably append an entry.
    ///
    /// This is fatal: a decision that cannot be audited must not be returned.
    #[error("audit write failed: {reason}")]
    AuditWriteFailed { reason: String },

    /// An existing audit log could not be read back for replay.
    #[error("audit read failed: {reason}")]
    AuditReadFailed { reason: String },

    /// Replaying an existing audit log found a broken hash chain.
    #[error("audit chain broken: {reason}")]
    ChainBroken { reason: String },

    /// An evidence bundle artifact could not be written.
    #[error("quarantine write failed: {reason}")]
    QuarantineWriteFailed { reason: String },

    /// The anomaly scorer failed or returned something unusable.
    #[error("anomaly scorer failed: {reason}")]
    ScorerFailed { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenience alias used throughout the provgate crates.
pub type GateResult<T> = Result<T, GateError>;
