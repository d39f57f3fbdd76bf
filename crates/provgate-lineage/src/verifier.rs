//! Lineage verifier: binds a record to the content it describes.
//!
//! `LineageVerifier` implements the `LineageCheck` trait from
//! `provgate-core`.  Checks run in a fixed order and stop at the first
//! failure:
//!
//! 1. **Content hash**: the record's `content_hash` equals SHA-256 of the
//!    presented content.
//! 2. **Signature**: the record carries a signature and it verifies over the
//!    core payload with the trusted key.
//!
//! `prev_hash` is not followed here.  Cross-version custody belongs to a
//! component that stores prior records.

use tracing::{debug, warn};

use provgate_contracts::{ingest::LineageReport, lineage::LineageRecord};
use provgate_core::traits::LineageCheck;

use crate::signer::HmacSigner;

pub const REASON_HASH_MISMATCH: &str = "Content hash mismatch.";
pub const REASON_BAD_SIGNATURE: &str = "Invalid signature.";
pub const REASON_VERIFIED: &str = "Lineage and integrity verified.";

/// Verifies lineage records against a trusted signer.
#[derive(Debug, Clone)]
pub struct LineageVerifier {
    signer: HmacSigner,
}

impl LineageVerifier {
    pub fn new(signer: HmacSigner) -> Self {
        Self { signer }
    }

    /// Exact equality of the stored hash with SHA-256 of `content`.
    pub fn verify_content_hash(&self, record: &LineageRecord, content: &str) -> bool {
        LineageRecord::compute_content_hash(content) == record.content_hash
    }

    /// `false` when unsigned; otherwise the signer's verdict over the core
    /// payload.
    pub fn verify_signature(&self, record: &LineageRecord) -> bool {
        match &record.signature {
            None => false,
            Some(signature) => self.signer.verify(&record.core_payload_bytes(), signature),
        }
    }
}

impl LineageCheck for LineageVerifier {
    fn verify_record(&self, record: &LineageRecord, content: &str) -> LineageReport {
        if !self.verify_content_hash(record, content) {
            warn!(document_id = %record.document_id, "lineage content hash mismatch");
            return LineageReport::fail(REASON_HASH_MISMATCH);
        }

        if !self.verify_signature(record) {
            warn!(document_id = %record.document_id, "lineage signature rejected");
            return LineageReport::fail(REASON_BAD_SIGNATURE);
        }

        debug!(
            document_id = %record.document_id,
            version = record.version,
            "lineage verified"
        );
        LineageReport::pass(REASON_VERIFIED)
    }
}
