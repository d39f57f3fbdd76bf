//! The ingestion pipeline: the linear decision flow for one document.
//!
//! The pipeline enforces the gate's execution model:
//!
//!   Start → Lineage normalize → Lineage verify → Semantic scan → Accept
//!
//! Every transition writes exactly one audit event.  Any failed check ends the
//! call with a quarantine verdict and at most one evidence bundle.  Validation
//! failures are verdicts, never errors; only storage faults and scorer
//! contract violations surface as `Err`.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use provgate_contracts::{
    detail::{DetailValue, Details},
    error::GateResult,
    ingest::{
        IngestEvent, IngestStage, IngestStatus, LineageInput, PipelineVerdict, ScanVerdict,
    },
    lineage::LineageRecord,
};

use crate::traits::{AnomalyScorer, AuditSink, EvidenceStore, LineageCheck};

/// Verdict reason when a supplied lineage payload cannot be parsed.
pub const REASON_INVALID_LINEAGE: &str = "Invalid lineage record structure.";

/// Verdict reason when the scorer flags the content.
pub const REASON_SEMANTIC_ANOMALY: &str = "Semantic anomaly detected.";

/// Verdict reason for an accepted document.
pub const REASON_ACCEPTED: &str = "Clean document.";

/// Everything needed to close a call out as quarantined.
struct Rejection {
    event: IngestEvent,
    stage: IngestStage,
    reason: String,
    audit_details: Details,
    lineage: Option<DetailValue>,
    scores: Option<ScanVerdict>,
}

/// Orchestrates verification, scoring, quarantine, and auditing.
///
/// Holds no per-document state, so one pipeline may serve many threads; the
/// audit sink is responsible for serializing its own chain head.
pub struct IngestionPipeline {
    verifier: Box<dyn LineageCheck>,
    scorer: Box<dyn AnomalyScorer>,
    quarantine: Box<dyn EvidenceStore>,
    audit: Box<dyn AuditSink>,
}

impl IngestionPipeline {
    /// Create a pipeline from its four collaborators.
    pub fn new(
        verifier: Box<dyn LineageCheck>,
        scorer: Box<dyn AnomalyScorer>,
        quarantine: Box<dyn EvidenceStore>,
        audit: Box<dyn AuditSink>,
    ) -> Self {
        Self { verifier, scorer, quarantine, audit }
    }

    /// Run one document through the gate.
    ///
    /// # Pipeline
    ///
    /// 1. Log `ingest_start`
    /// 2. If lineage was supplied as a loose mapping, parse it; a parse
    ///    failure quarantines with "Invalid lineage record structure."
    /// 3. If a record exists, verify it; failure quarantines with the
    ///    verifier's reason, success logs `lineage_ok`
    /// 4. Score the content; suspicious content quarantines with
    ///    "Semantic anomaly detected.", otherwise log `semantic_ok`
    /// 5. Log `accept`
    ///
    /// # Errors
    ///
    /// Returns `Err` only when the audit log or quarantine store cannot be
    /// written, or when the scorer fails.
    pub fn process_document(
        &self,
        document_id: &str,
        content: &str,
        lineage: Option<LineageInput>,
        metadata: Option<Details>,
    ) -> GateResult<PipelineVerdict> {
        debug!(document_id = %document_id, "ingest starting");

        // ── Step 1: Start ────────────────────────────────────────────────────
        self.audit.write_event(
            IngestEvent::IngestStart.as_str(),
            document_id,
            IngestStage::Start.as_str(),
            IngestStatus::Processing.as_str(),
            "Document ingest started",
            Details::from([(
                "metadata".to_string(),
                DetailValue::Map(metadata.clone().unwrap_or_default()),
            )]),
        )?;

        // ── Step 2: Lineage normalize ────────────────────────────────────────
        //
        // No lineage at all means no claim to verify, not a failure.
        let record = match lineage {
            None => None,
            Some(LineageInput::Record(record)) => Some(record),
            Some(LineageInput::Raw(raw)) => match LineageRecord::parse(&raw) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(
                        document_id = %document_id,
                        error = %err,
                        "lineage payload failed to parse"
                    );
                    return self.reject(
                        document_id,
                        content,
                        metadata.as_ref(),
                        Rejection {
                            event: IngestEvent::LineageFail,
                            stage: IngestStage::LineageDeserialization,
                            reason: REASON_INVALID_LINEAGE.to_string(),
                            audit_details: Details::from([
                                ("raw_lineage".to_string(), raw.clone()),
                                ("parse_error".to_string(), DetailValue::from(err.to_string())),
                            ]),
                            lineage: Some(raw),
                            scores: None,
                        },
                    );
                }
            },
        };

        // ── Step 3: Lineage verify ───────────────────────────────────────────
        if let Some(record) = &record {
            let report = self.verifier.verify_record(record, content);
            if !report.passed {
                warn!(
                    document_id = %document_id,
                    reason = %report.reason,
                    "lineage verification failed"
                );
                return self.reject(
                    document_id,
                    content,
                    metadata.as_ref(),
                    Rejection {
                        event: IngestEvent::LineageFail,
                        stage: IngestStage::Lineage,
                        reason: report.reason,
                        audit_details: Details::from([(
                            "lineage_record".to_string(),
                            record.to_detail(),
                        )]),
                        lineage: Some(record.to_detail()),
                        scores: None,
                    },
                );
            }

            self.audit.write_event(
                IngestEvent::LineageOk.as_str(),
                document_id,
                IngestStage::Lineage.as_str(),
                IngestStatus::Accepted.as_str(),
                "Lineage valid",
                Details::from([("version".to_string(), DetailValue::from(record.version))]),
            )?;
            debug!(
                document_id = %document_id,
                version = record.version,
                "lineage verified"
            );
        }

        // ── Step 4: Semantic scan ────────────────────────────────────────────
        let scan = self.scorer.detect(content)?;
        let scan_detail = scan.to_detail();

        if scan.is_suspicious {
            warn!(document_id = %document_id, "semantic anomaly detected");
            return self.reject(
                document_id,
                content,
                metadata.as_ref(),
                Rejection {
                    event: IngestEvent::SemanticFail,
                    stage: IngestStage::Semantic,
                    reason: REASON_SEMANTIC_ANOMALY.to_string(),
                    audit_details: Details::from([("scores".to_string(), scan_detail)]),
                    lineage: record.as_ref().map(LineageRecord::to_detail),
                    scores: Some(scan),
                },
            );
        }

        self.audit.write_event(
            IngestEvent::SemanticOk.as_str(),
            document_id,
            IngestStage::Semantic.as_str(),
            IngestStatus::Accepted.as_str(),
            "Semantic clean",
            Details::from([("scores".to_string(), scan_detail.clone())]),
        )?;

        // ── Step 5: Accept ───────────────────────────────────────────────────
        self.audit.write_event(
            IngestEvent::Accept.as_str(),
            document_id,
            IngestStage::PipelineEnd.as_str(),
            IngestStatus::Accepted.as_str(),
            "Document fully clean",
            Details::from([("scores".to_string(), scan_detail)]),
        )?;

        info!(document_id = %document_id, "document accepted");

        Ok(PipelineVerdict {
            status: IngestStatus::Accepted,
            reason: REASON_ACCEPTED.to_string(),
            bundle_path: None,
            scores: Some(scan),
        })
    }

    /// Log the terminal failure event, write the evidence bundle, and build
    /// the quarantine verdict.
    fn reject(
        &self,
        document_id: &str,
        content: &str,
        metadata: Option<&Details>,
        rejection: Rejection,
    ) -> GateResult<PipelineVerdict> {
        self.audit.write_event(
            rejection.event.as_str(),
            document_id,
            rejection.stage.as_str(),
            IngestStatus::Quarantined.as_str(),
            &rejection.reason,
            rejection.audit_details,
        )?;

        // Without caller metadata the bundle still records where it was cut.
        let metadata = match metadata {
            Some(m) if !m.is_empty() => DetailValue::Map(m.clone()),
            _ => DetailValue::map([("stage", rejection.stage.as_str())]),
        };
        let scores_detail = rejection.scores.as_ref().map(ScanVerdict::to_detail);

        let bundle_path: PathBuf = self.quarantine.save_evidence_bundle(
            document_id,
            content,
            &rejection.reason,
            rejection.lineage.as_ref(),
            scores_detail.as_ref(),
            Some(&metadata),
        )?;

        warn!(
            document_id = %document_id,
            stage = rejection.stage.as_str(),
            reason = %rejection.reason,
            bundle_path = %bundle_path.display(),
            "document quarantined"
        );

        Ok(PipelineVerdict {
            status: IngestStatus::Quarantined,
            reason: rejection.reason,
            bundle_path: Some(bundle_path),
            scores: rejection.scores,
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
