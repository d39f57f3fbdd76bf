//! The lineage record: one signed provenance claim about a document version.
//!
//! Records arrive from untrusted callers, either already typed or as a loose
//! mapping.  [`LineageRecord::parse`] is the single place a mapping becomes a
//! record; anything it rejects is a [`LineageParseError`], never a panic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    canonical::to_canonical_bytes,
    detail::{DetailValue, Details},
    digest::sha256_hex,
};

/// Field names, in the order they are declared on [`LineageRecord`].
pub const LINEAGE_FIELDS: [&str; 8] = [
    "document_id",
    "version",
    "content_hash",
    "prev_hash",
    "created_at",
    "author",
    "source",
    "signature",
];

/// One version of a document's provenance claim.
///
/// Never mutated by the gate.  `prev_hash` links to a prior version's record
/// but is not checked here; cross-version custody belongs to a lineage store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageRecord {
    /// Stable identifier of the logical document.
    pub document_id: String,
    /// Monotonic version number per document.
    pub version: u64,
    /// SHA-256 hex of the raw content bytes.
    pub content_hash: String,
    /// Hash of the previous version's record, if any.
    pub prev_hash: Option<String>,
    /// Creation timestamp (UTC, ISO-8601 with a trailing `Z`).
    pub created_at: String,
    /// Who introduced or approved this version.
    pub author: String,
    /// Where the document was ingested from (e.g. "confluence").
    pub source: String,
    /// Hex HMAC over [`LineageRecord::core_payload_bytes`], once signed.
    #[serde(default)]
    pub signature: Option<String>,
}

impl LineageRecord {
    /// SHA-256 hex of `content` as UTF-8.
    pub fn compute_content_hash(content: &str) -> String {
        sha256_hex(content.as_bytes())
    }

    /// The signed subset of fields: everything except `signature`.
    pub fn core_payload(&self) -> DetailValue {
        DetailValue::map([
            ("document_id", DetailValue::from(self.document_id.as_str())),
            ("version", DetailValue::from(self.version)),
            ("content_hash", DetailValue::from(self.content_hash.as_str())),
            ("prev_hash", DetailValue::from(self.prev_hash.clone())),
            ("created_at", DetailValue::from(self.created_at.as_str())),
            ("author", DetailValue::from(self.author.as_str())),
            ("source", DetailValue::from(self.source.as_str())),
        ])
    }

    /// The exact bytes a signature covers.  Part of the wire contract.
    pub fn core_payload_bytes(&self) -> Vec<u8> {
        to_canonical_bytes(&self.core_payload())
    }

    /// Full snapshot including `signature`, for audit details and bundles.
    pub fn to_detail(&self) -> DetailValue {
        let mut map = match self.core_payload() {
            DetailValue::Map(m) => m,
            _ => Details::new(),
        };
        map.insert(
            "signature".to_string(),
            DetailValue::from(self.signature.clone()),
        );
        DetailValue::Map(map)
    }

    /// Parse an untyped mapping into a validated record.
    ///
    /// Every field except `signature` must be present; `prev_hash` may be
    /// null but not missing.  Unknown keys are rejected.
    pub fn parse(raw: &DetailValue) -> Result<Self, LineageParseError> {
        let map = raw.as_map().ok_or(LineageParseError::NotAMapping {
            found: raw.kind(),
        })?;

        if let Some(unknown) = map.keys().find(|k| !LINEAGE_FIELDS.contains(&k.as_str())) {
            return Err(LineageParseError::UnknownField {
                field: unknown.clone(),
            });
        }

        Ok(Self {
            document_id: required_str(map, "document_id")?,
            version: required_version(map)?,
            content_hash: required_str(map, "content_hash")?,
            prev_hash: nullable_str(map, "prev_hash", true)?,
            created_at: required_str(map, "created_at")?,
            author: required_str(map, "author")?,
            source: required_str(map, "source")?,
            signature: nullable_str(map, "signature", false)?,
        })
    }
}

fn required_field<'m>(
    map: &'m Details,
    field: &'static str,
) -> Result<&'m DetailValue, LineageParseError> {
    map.get(field)
        .ok_or(LineageParseError::MissingField { field })
}

fn required_str(map: &Details, field: &'static str) -> Result<String, LineageParseError> {
    match required_field(map, field)? {
        DetailValue::Str(s) => Ok(s.clone()),
        other => Err(LineageParseError::WrongType {
            field,
            expected: "string",
            found: other.kind(),
        }),
    }
}

fn nullable_str(
    map: &Details,
    field: &'static str,
    must_be_present: bool,
) -> Result<Option<String>, LineageParseError> {
    let value = match map.get(field) {
        Some(v) => v,
        None if must_be_present => return Err(LineageParseError::MissingField { field }),
        None => return Ok(None),
    };
    match value {
        DetailValue::Null => Ok(None),
        DetailValue::Str(s) => Ok(Some(s.clone())),
        other => Err(LineageParseError::WrongType {
            field,
            expected: "string or null",
            found: other.kind(),
        }),
    }
}

fn required_version(map: &Details) -> Result<u64, LineageParseError> {
    match required_field(map, "version")? {
        DetailValue::Int(i) => u64::try_from(*i).map_err(|_| LineageParseError::InvalidValue {
            field: "version",
            reason: format!("must be non-negative, got {i}"),
        }),
        DetailValue::UInt(u) => Ok(*u),
        other => Err(LineageParseError::WrongType {
            field: "version",
            expected: "integer",
            found: other.kind(),
        }),
    }
}

/// Why an untyped lineage payload could not become a [`LineageRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineageParseError {
    #[error("lineage payload must be a mapping, got {found}")]
    NotAMapping { found: &'static str },

    #[error("lineage payload is missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("lineage payload has unknown field '{field}'")]
    UnknownField { field: String },

    #[error("lineage field '{field}' must be {expected}, got {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("lineage field '{field}' is invalid: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
