//! Hash-chain primitives: sealing entries and verifying chain integrity.
//!
//! Hash input: the canonical encoding (see `provgate_contracts::canonical`)
//! of the full entry mapping, with `entry_hash` present and set to null.
//! Existing chains were hashed over that exact form and must keep
//! verifying, so the placeholder stays in the payload.

use chrono::Utc;
use thiserror::Error;

use provgate_contracts::{canonical::to_canonical_bytes, detail::Details, digest::sha256_hex};

use crate::event::{AuditLogEntry, TIMESTAMP_FORMAT};

/// Compute the SHA-256 hash for a single entry.
///
/// Whatever is stored in `entry.entry_hash` is ignored; the payload always
/// carries a null placeholder there.  Returns a lowercase 64-character hex
/// string.
pub fn hash_entry(entry: &AuditLogEntry) -> String {
    sha256_hex(to_canonical_bytes(&entry.hashing_payload()))
}

/// The fields a caller supplies for one event.  Index, timestamp, and both
/// hashes are assigned by the chain.
#[derive(Debug, Clone)]
pub struct EventDraft<'a> {
    pub event_type: &'a str,
    pub document_id: &'a str,
    pub stage: &'a str,
    pub status: &'a str,
    pub reason: &'a str,
    pub details: Details,
}

/// The single-writer head of a chain: the next index and the last hash.
///
/// Owners keep this behind a lock together with the durable append so the
/// read-seal-append-advance sequence is atomic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainHead {
    /// The index the next entry will receive.
    pub counter: u64,
    /// `entry_hash` of the last entry written, or `None` before the first.
    pub last_hash: Option<String>,
}

impl ChainHead {
    /// A head positioned after `entry`, for resuming an existing chain.
    pub fn after(entry: &AuditLogEntry) -> Self {
        Self {
            counter: entry.index + 1,
            last_hash: entry.entry_hash.clone(),
        }
    }

    /// Build and seal the next entry without advancing the head.
    pub fn seal_next(&self, draft: EventDraft<'_>) -> AuditLogEntry {
        let mut entry = AuditLogEntry {
            index: self.counter,
            timestamp: Utc::now().format(TIMESTAMP_FORMAT).to_string(),
            event_type: draft.event_type.to_string(),
            document_id: draft.document_id.to_string(),
            stage: draft.stage.to_string(),
            status: draft.status.to_string(),
            reason: draft.reason.to_string(),
            details: draft.details,
            prev_hash: self.last_hash.clone(),
            entry_hash: None,
        };
        entry.entry_hash = Some(hash_entry(&entry));
        entry
    }

    /// Move the head past a durably written entry.
    pub fn advance(&mut self, entry: &AuditLogEntry) {
        self.counter = entry.index + 1;
        self.last_hash = entry.entry_hash.clone();
    }
}

/// Summary of a successfully verified chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainReport {
    /// Number of entries checked.
    pub entries: usize,
    /// Number of segments: runs starting at index 0 with no predecessor.
    /// More than one means the writer restarted without resuming.
    pub segments: usize,
    /// `entry_hash` of the final entry.
    pub head_hash: Option<String>,
}

/// The first integrity violation found while replaying a chain.
///
/// `position` is the 0-based line position in the replayed sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("entry at position {position} (index {index}) has no entry_hash")]
    MissingHash { position: usize, index: u64 },

    #[error("entry at position {position} (index {index}) hash mismatch: stored {stored}, recomputed {recomputed}")]
    HashMismatch {
        position: usize,
        index: u64,
        stored: String,
        recomputed: String,
    },

    #[error("entry at position {position} (index {index}) prev_hash {found:?} does not match previous entry_hash {expected:?}")]
    BrokenLink {
        position: usize,
        index: u64,
        expected: Option<String>,
        found: Option<String>,
    },

    #[error("entry at position {position} has index {found}, expected {expected}")]
    IndexGap {
        position: usize,
        expected: u64,
        found: u64,
    },
}

/// Verify the integrity of a replayed chain, in file order.
///
/// Rules:
///
/// 1. **Segment start**: an entry with index 0 and no `prev_hash` starts a
///    new segment.  The first entry must be one.
/// 2. **Index continuity**: otherwise the index is one past the previous one.
/// 3. **Prev-hash linkage**: otherwise `prev_hash` equals the previous
///    entry's `entry_hash`.
/// 4. **Hash correctness**: `entry_hash` matches the recomputed value.
///
/// An empty chain is valid.
pub fn verify_chain(entries: &[AuditLogEntry]) -> Result<ChainReport, ChainError> {
    let mut previous: Option<&AuditLogEntry> = None;
    let mut segments = 0;

    for (position, entry) in entries.iter().enumerate() {
        let starts_segment = entry.index == 0 && entry.prev_hash.is_none();

        if starts_segment {
            segments += 1;
        } else {
            match previous {
                None => {
                    return Err(ChainError::BrokenLink {
                        position,
                        index: entry.index,
                        expected: None,
                        found: entry.prev_hash.clone(),
                    });
                }
                Some(prev) => {
                    if entry.index != prev.index + 1 {
                        return Err(ChainError::IndexGap {
                            position,
                            expected: prev.index + 1,
                            found: entry.index,
                        });
                    }
                    if entry.prev_hash != prev.entry_hash {
                        return Err(ChainError::BrokenLink {
                            position,
                            index: entry.index,
                            expected: prev.entry_hash.clone(),
                            found: entry.prev_hash.clone(),
                        });
                    }
                }
            }
        }

        let stored = entry.entry_hash.as_deref().ok_or(ChainError::MissingHash {
            position,
            index: entry.index,
        })?;
        let recomputed = hash_entry(entry);
        if stored != recomputed {
            return Err(ChainError::HashMismatch {
                position,
                index: entry.index,
                stored: stored.to_string(),
                recomputed,
            });
        }

        previous = Some(entry);
    }

    Ok(ChainReport {
        entries: entries.len(),
        segments,
        head_hash: previous.and_then(|e| e.entry_hash.clone()),
    })
}
