//! Assembling a complete gate from real components.

use std::path::Path;

use tracing::info;

use provgate_audit::FileAuditLog;
use provgate_config::{GateConfig, ScannerConfig};
use provgate_contracts::error::GateResult;
use provgate_core::{traits::AuditSink, IngestionPipeline};
use provgate_lineage::{HmacSigner, LineageVerifier};
use provgate_quarantine::FsQuarantineStore;
use provgate_semantic::BaselineScanner;

/// Configuration shipped with the scenarios.  Its scanner baseline is the
/// corpus baseline, so the scenario outcomes hold under it.
pub const REFERENCE_CONFIG: &str = include_str!("../config/provgate.toml");

/// A wired pipeline plus the signer used to issue scenario records.
pub struct Gate {
    pub pipeline: IngestionPipeline,
    pub signer: HmacSigner,
}

impl Gate {
    /// Wire the pipeline around `audit`, quarantining under
    /// `quarantine_root`.  The scanner is built from `scanner` as given,
    /// reference texts included.
    pub fn build(
        secret: &[u8],
        scanner: &ScannerConfig,
        quarantine_root: &Path,
        audit: Box<dyn AuditSink>,
    ) -> GateResult<Self> {
        let signer = HmacSigner::new(secret);
        let scanner = BaselineScanner::from_config(scanner)?;
        let quarantine = FsQuarantineStore::new(quarantine_root)?;

        let pipeline = IngestionPipeline::new(
            Box::new(LineageVerifier::new(signer.clone())),
            Box::new(scanner),
            Box::new(quarantine),
            audit,
        );
        Ok(Self { pipeline, signer })
    }

    /// Build a gate that persists to the locations named in `config`.
    pub fn from_config(config: &GateConfig, secret: &[u8]) -> GateResult<Self> {
        let audit = if config.audit.resume {
            FileAuditLog::resume(&config.audit.path, config.audit.sync)?
        } else {
            FileAuditLog::open(&config.audit.path, config.audit.sync)?
        };
        info!(
            audit = %config.audit.path.display(),
            quarantine = %config.quarantine.root.display(),
            "gate assembled"
        );
        Self::build(secret, &config.scanner, &config.quarantine.root, Box::new(audit))
    }
}
