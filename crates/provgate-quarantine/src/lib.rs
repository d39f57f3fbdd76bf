//! # provgate-quarantine
//!
//! Evidence bundles for rejected documents.
//!
//! `FsQuarantineStore` implements the `EvidenceStore` trait from
//! `provgate-core`.  Each bundle is a directory under the quarantine root:
//!
//! ```text
//! {root}/{YYYYMMDDTHHMMSSZ}_{document_id, spaces -> '_'}/
//!     content.txt            raw document text
//!     reason.txt             why it was rejected
//!     lineage_record.json    lineage snapshot, when one was available
//!     detection_scores.json  scorer output, when the scan ran
//!     metadata.json          caller metadata, or the rejecting stage
//! ```
//!
//! Optional snapshots that are absent or empty are omitted, never written as
//! empty files.  JSON artifacts are pretty-printed with two-space indent and
//! non-ASCII text left as is.
//!
//! Two bundles for the same document within one second resolve to the same
//! directory; the later write replaces the earlier artifacts.
//!
//! Only spaces in `document_id` are rewritten.  A `/` nests the bundle in
//! subdirectories, and a `..` component after it climbs back out, so an id
//! such as `a/../../x` lands outside the root.  Callers that accept ids from
//! untrusted sources must reject path separators before ingestion.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use tracing::{debug, info};

use provgate_contracts::{
    detail::DetailValue,
    error::{GateError, GateResult},
};
use provgate_core::traits::EvidenceStore;

/// Directory-name timestamp: UTC, second precision, no separators.
pub const BUNDLE_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

pub const CONTENT_FILE: &str = "content.txt";
pub const REASON_FILE: &str = "reason.txt";
pub const LINEAGE_FILE: &str = "lineage_record.json";
pub const SCORES_FILE: &str = "detection_scores.json";
pub const METADATA_FILE: &str = "metadata.json";

/// Writes evidence bundles under a root directory.
#[derive(Debug, Clone)]
pub struct FsQuarantineStore {
    root: PathBuf,
}

impl FsQuarantineStore {
    /// Use `root` as the quarantine directory, creating it if absent.
    pub fn new(root: impl Into<PathBuf>) -> GateResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| write_failed(&root, e))?;
        info!(root = %root.display(), "quarantine store ready");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where a bundle for `document_id` written now would land.
    pub fn bundle_path(&self, document_id: &str) -> PathBuf {
        let timestamp = Utc::now().format(BUNDLE_TIMESTAMP_FORMAT);
        self.root
            .join(format!("{}_{}", timestamp, sanitize_document_id(document_id)))
    }
}

/// Spaces become underscores; nothing else is altered, path separators
/// included.
pub fn sanitize_document_id(document_id: &str) -> String {
    document_id.replace(' ', "_")
}

fn write_failed(path: &Path, e: impl std::fmt::Display) -> GateError {
    GateError::QuarantineWriteFailed {
        reason: format!("'{}': {}", path.display(), e),
    }
}

fn write_text(path: &Path, text: &str) -> GateResult<()> {
    fs::write(path, text).map_err(|e| write_failed(path, e))
}

fn write_json(path: &Path, value: &DetailValue) -> GateResult<()> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|e| write_failed(path, e))?;
    fs::write(path, bytes).map_err(|e| write_failed(path, e))
}

impl EvidenceStore for FsQuarantineStore {
    fn save_evidence_bundle(
        &self,
        document_id: &str,
        content: &str,
        reason: &str,
        lineage_record: Option<&DetailValue>,
        detection_scores: Option<&DetailValue>,
        metadata: Option<&DetailValue>,
    ) -> GateResult<PathBuf> {
        let bundle = self.bundle_path(document_id);
        fs::create_dir_all(&bundle).map_err(|e| write_failed(&bundle, e))?;

        write_text(&bundle.join(CONTENT_FILE), content)?;
        write_text(&bundle.join(REASON_FILE), reason)?;

        let snapshots = [
            (LINEAGE_FILE, lineage_record),
            (SCORES_FILE, detection_scores),
            (METADATA_FILE, metadata),
        ];
        for (name, snapshot) in snapshots {
            match snapshot {
                Some(value) if !value.is_empty() => write_json(&bundle.join(name), value)?,
                _ => debug!(artifact = name, "snapshot absent, omitted"),
            }
        }

        info!(
            document_id = %document_id,
            bundle_path = %bundle.display(),
            "evidence bundle written"
        );
        Ok(bundle)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
