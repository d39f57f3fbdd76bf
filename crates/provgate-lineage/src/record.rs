//! Creating and signing lineage records.

use chrono::Utc;
use tracing::debug;

use provgate_contracts::lineage::LineageRecord;

use crate::signer::HmacSigner;

/// `created_at` format: UTC with microseconds and a trailing `Z`.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Build an unsigned record for `content`, stamped with the current time.
///
/// `version` starts at 1 for a new document.  `prev_hash` is carried as
/// given; nothing here checks it against an earlier record.
pub fn create_lineage_record(
    document_id: &str,
    content: &str,
    author: &str,
    source: &str,
    prev_hash: Option<String>,
    version: u64,
) -> LineageRecord {
    LineageRecord {
        document_id: document_id.to_string(),
        version,
        content_hash: LineageRecord::compute_content_hash(content),
        prev_hash,
        created_at: Utc::now().format(CREATED_AT_FORMAT).to_string(),
        author: author.to_string(),
        source: source.to_string(),
        signature: None,
    }
}

/// Sign the record's core payload, replacing any existing signature.
pub fn sign_record(signer: &HmacSigner, record: &mut LineageRecord) {
    let signature = signer.sign(&record.core_payload_bytes());
    debug!(
        document_id = %record.document_id,
        version = record.version,
        "lineage record signed"
    );
    record.signature = Some(signature);
}

/// Convenience for the common create-then-sign sequence.
pub fn create_signed_record(
    signer: &HmacSigner,
    document_id: &str,
    content: &str,
    author: &str,
    source: &str,
    prev_hash: Option<String>,
    version: u64,
) -> LineageRecord {
    let mut record = create_lineage_record(document_id, content, author, source, prev_hash, version);
    sign_record(signer, &mut record);
    record
}
