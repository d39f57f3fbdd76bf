//! The audit log entry and its line encoding.
//!
//! `AuditLogEntry` is a single link in the hash chain.  It is built and
//! sealed inside `write_event` and never mutated afterward.  On disk each
//! entry is one canonically encoded JSON object per line.

use serde::{Deserialize, Serialize};

use provgate_contracts::{
    canonical::to_canonical_string,
    detail::{DetailValue, Details},
};

/// Timestamp format for entries: UTC, second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One append-only record in the audit chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Position in the chain, starting at 0.
    pub index: u64,

    /// UTC time of the write, formatted with [`TIMESTAMP_FORMAT`].
    pub timestamp: String,

    /// What happened (e.g. "ingest_start", "lineage_fail").
    pub event_type: String,

    /// The document the event is about.
    pub document_id: String,

    /// Pipeline stage that emitted the event.
    pub stage: String,

    /// Status at that stage (e.g. "processing", "quarantined").
    pub status: String,

    /// Free-text explanation.
    pub reason: String,

    /// Opaque structured payload.
    pub details: Details,

    /// `entry_hash` of the previous entry, or `None` for the first entry of
    /// a chain segment.
    pub prev_hash: Option<String>,

    /// SHA-256 hex over the canonical encoding of this entry with
    /// `entry_hash` itself set to null.
    #[serde(default)]
    pub entry_hash: Option<String>,
}

impl AuditLogEntry {
    /// All ten fields as a mapping, `entry_hash` included as stored.
    pub fn to_detail(&self) -> DetailValue {
        DetailValue::map([
            ("index", DetailValue::from(self.index)),
            ("timestamp", DetailValue::from(self.timestamp.as_str())),
            ("event_type", DetailValue::from(self.event_type.as_str())),
            ("document_id", DetailValue::from(self.document_id.as_str())),
            ("stage", DetailValue::from(self.stage.as_str())),
            ("status", DetailValue::from(self.status.as_str())),
            ("reason", DetailValue::from(self.reason.as_str())),
            ("details", DetailValue::Map(self.details.clone())),
            ("prev_hash", DetailValue::from(self.prev_hash.clone())),
            ("entry_hash", DetailValue::from(self.entry_hash.clone())),
        ])
    }

    /// The mapping the entry hash is computed over: every field, with
    /// `entry_hash` present as null.
    pub fn hashing_payload(&self) -> DetailValue {
        let mut payload = self.to_detail();
        if let DetailValue::Map(map) = &mut payload {
            map.insert("entry_hash".to_string(), DetailValue::Null);
        }
        payload
    }

    /// The persisted line for this entry, without the trailing newline.
    pub fn to_line(&self) -> String {
        to_canonical_string(&self.to_detail())
    }

    /// Parse one persisted line.  Key order in the line does not matter.
    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
