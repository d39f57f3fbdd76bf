//! Ingestion inputs, collaborator outputs, and the pipeline verdict.

use std::{collections::BTreeMap, fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    detail::{DetailValue, Details},
    lineage::LineageRecord,
};

/// Status strings written to the audit log and returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestStatus {
    /// Not terminal; only used for the `ingest_start` audit event.
    Processing,
    Accepted,
    Quarantined,
}

impl IngestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestStatus::Processing => "processing",
            IngestStatus::Accepted => "accepted",
            IngestStatus::Quarantined => "quarantined",
        }
    }
}

impl fmt::Display for IngestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit `event_type` values emitted by the ingestion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IngestEvent {
    IngestStart,
    LineageFail,
    LineageOk,
    SemanticFail,
    SemanticOk,
    Accept,
}

impl IngestEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestEvent::IngestStart => "ingest_start",
            IngestEvent::LineageFail => "lineage_fail",
            IngestEvent::LineageOk => "lineage_ok",
            IngestEvent::SemanticFail => "semantic_fail",
            IngestEvent::SemanticOk => "semantic_ok",
            IngestEvent::Accept => "accept",
        }
    }
}

/// Audit `stage` values emitted by the ingestion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IngestStage {
    Start,
    LineageDeserialization,
    Lineage,
    Semantic,
    PipelineEnd,
}

impl IngestStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestStage::Start => "start",
            IngestStage::LineageDeserialization => "lineage_deserialization",
            IngestStage::Lineage => "lineage",
            IngestStage::Semantic => "semantic",
            IngestStage::PipelineEnd => "pipeline_end",
        }
    }
}

/// Lineage as handed to the pipeline: already typed, or a loose mapping that
/// still has to survive [`LineageRecord::parse`].
#[derive(Debug, Clone, PartialEq)]
pub enum LineageInput {
    Record(LineageRecord),
    Raw(DetailValue),
}

impl From<LineageRecord> for LineageInput {
    fn from(record: LineageRecord) -> Self {
        LineageInput::Record(record)
    }
}

impl From<DetailValue> for LineageInput {
    fn from(raw: DetailValue) -> Self {
        LineageInput::Raw(raw)
    }
}

impl LineageInput {
    /// Snapshot of whatever the caller supplied, for audit and evidence.
    pub fn to_detail(&self) -> DetailValue {
        match self {
            LineageInput::Record(record) => record.to_detail(),
            LineageInput::Raw(raw) => raw.clone(),
        }
    }
}

/// Result of a lineage verification run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageReport {
    /// True only if both the content hash and the signature checked out.
    pub passed: bool,
    /// Human-readable outcome, written to the audit log on failure.
    pub reason: String,
}

impl LineageReport {
    pub fn pass(reason: impl Into<String>) -> Self {
        Self { passed: true, reason: reason.into() }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self { passed: false, reason: reason.into() }
    }
}

/// The anomaly scorer's verdict on one document.
///
/// `scores` is opaque to the gate; it is logged and stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanVerdict {
    pub is_suspicious: bool,
    #[serde(flatten)]
    pub scores: BTreeMap<String, DetailValue>,
}

impl ScanVerdict {
    /// Flat mapping of every score plus `is_suspicious`.
    pub fn to_detail(&self) -> DetailValue {
        let mut map: Details = self.scores.clone();
        map.insert("is_suspicious".to_string(), DetailValue::Bool(self.is_suspicious));
        DetailValue::Map(map)
    }
}

/// Terminal outcome of one `process_document` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineVerdict {
    /// `Accepted` or `Quarantined`; never `Processing`.
    pub status: IngestStatus,
    pub reason: String,
    /// Present iff the document was quarantined.
    pub bundle_path: Option<PathBuf>,
    /// Present iff the semantic stage ran.
    pub scores: Option<ScanVerdict>,
}

impl PipelineVerdict {
    pub fn is_accepted(&self) -> bool {
        self.status == IngestStatus::Accepted
    }

    pub fn is_quarantined(&self) -> bool {
        self.status == IngestStatus::Quarantined
    }
}
