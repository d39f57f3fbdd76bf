//! Collaborator trait definitions for the ingestion pipeline.
//!
//! These four traits define the complete trust boundary:
//!
//! - `LineageCheck`: trusted checker (content hash + keyed signature)
//! - `AnomalyScorer`: external collaborator (opaque semantic scoring)
//! - `EvidenceStore`: trusted sink for rejected documents
//! - `AuditSink`: trusted sink (records every decision immutably)
//!
//! The pipeline wires them together in a fixed order.  Each trait is also
//! implemented for `Arc<T>` so a caller can keep an inspectable handle after
//! handing one to the pipeline.

use std::{path::PathBuf, sync::Arc};

use provgate_contracts::{
    detail::{DetailValue, Details},
    error::GateResult,
    ingest::{LineageReport, ScanVerdict},
    lineage::LineageRecord,
};

/// Verifies a lineage record against the content it claims to describe.
///
/// Implementations must fail fast on a content-hash mismatch and only then
/// check the signature, so the report names the more specific failure.
pub trait LineageCheck: Send + Sync {
    fn verify_record(&self, record: &LineageRecord, content: &str) -> LineageReport;
}

/// The external semantic-anomaly scorer.
///
/// Must behave as a pure function of `text` (and its own configured
/// baseline) from the pipeline's point of view.  An `Err` is a contract
/// violation and aborts the ingestion call.
pub trait AnomalyScorer: Send + Sync {
    fn detect(&self, text: &str) -> GateResult<ScanVerdict>;
}

/// Durable, write-once storage for evidence bundles.
///
/// A failed write is fatal: an evidence artifact that silently went missing
/// would itself be a security defect.
pub trait EvidenceStore: Send + Sync {
    /// Persist one bundle and return where it landed.
    ///
    /// Each present snapshot becomes its own artifact; `None` (or an empty
    /// mapping) means the artifact is omitted.
    fn save_evidence_bundle(
        &self,
        document_id: &str,
        content: &str,
        reason: &str,
        lineage_record: Option<&DetailValue>,
        detection_scores: Option<&DetailValue>,
        metadata: Option<&DetailValue>,
    ) -> GateResult<PathBuf>;
}

/// The append-only, hash-chained audit log.
///
/// Every pipeline transition produces exactly one call.  A failed write is
/// fatal and surfaces as `GateError::AuditWriteFailed`.
pub trait AuditSink: Send + Sync {
    /// Append one event and return the index it was assigned.
    fn write_event(
        &self,
        event_type: &str,
        document_id: &str,
        stage: &str,
        status: &str,
        reason: &str,
        details: Details,
    ) -> GateResult<u64>;
}

// ── Arc pass-through impls ────────────────────────────────────────────────────

impl<T: LineageCheck + ?Sized> LineageCheck for Arc<T> {
    fn verify_record(&self, record: &LineageRecord, content: &str) -> LineageReport {
        (**self).verify_record(record, content)
    }
}

impl<T: AnomalyScorer + ?Sized> AnomalyScorer for Arc<T> {
    fn detect(&self, text: &str) -> GateResult<ScanVerdict> {
        (**self).detect(text)
    }
}

impl<T: EvidenceStore + ?Sized> EvidenceStore for Arc<T> {
    fn save_evidence_bundle(
        &self,
        document_id: &str,
        content: &str,
        reason: &str,
        lineage_record: Option<&DetailValue>,
        detection_scores: Option<&DetailValue>,
        metadata: Option<&DetailValue>,
    ) -> GateResult<PathBuf> {
        (**self).save_evidence_bundle(
            document_id,
            content,
            reason,
            lineage_record,
            detection_scores,
            metadata,
        )
    }
}

impl<T: AuditSink + ?Sized> AuditSink for Arc<T> {
    fn write_event(
        &self,
        event_type: &str,
        document_id: &str,
        stage: &str,
        status: &str,
        reason: &str,
        details: Details,
    ) -> GateResult<u64> {
        (**self).write_event(event_type, document_id, stage, status, reason, details)
    }
}
