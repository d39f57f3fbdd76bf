//! # provgate-audit
//!
//! Append-only, SHA-256 hash-chained audit log for the ingestion gate.
//!
//! ## Overview
//!
//! Every pipeline transition is recorded as an `AuditLogEntry` that links to
//! the previous entry through its hash.  Editing any field of any entry,
//! even a single byte, breaks the chain and is detected by `verify_chain`.
//!
//! Two sinks are provided:
//!
//! - `FileAuditLog`: JSON Lines on disk, optionally fsync'd per entry
//! - `InMemoryAuditLog`: a `Vec` behind a mutex, for tests and inspection
//!
//! ## Usage
//!
//! ```rust,ignore
//! use provgate_audit::{verify_log_file, FileAuditLog};
//! use provgate_core::traits::AuditSink;
//!
//! let log = FileAuditLog::resume("data/audit/audit_log.jsonl", true)?;
//! log.write_event("ingest_start", "doc-1", "start", "processing", "Document ingest started", details)?;
//!
//! let report = verify_log_file("data/audit/audit_log.jsonl")?;
//! ```

pub mod chain;
pub mod event;
pub mod file;
pub mod memory;

pub use chain::{hash_entry, verify_chain, ChainError, ChainHead, ChainReport, EventDraft};
pub use event::{AuditLogEntry, TIMESTAMP_FORMAT};
pub use file::{read_log, verify_log_file, FileAuditLog};
pub use memory::InMemoryAuditLog;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use provgate_contracts::detail::{DetailValue, Details};
    use provgate_core::traits::AuditSink;

    use super::{hash_entry, verify_chain, AuditLogEntry, ChainError, InMemoryAuditLog};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn details(text: &str) -> Details {
        [("text".to_string(), DetailValue::from(text))].into()
    }

    fn write_three(log: &InMemoryAuditLog) {
        log.write_event("ingest_start", "doc-1", "start", "processing", "Document ingest started", details("a"))
            .unwrap();
        log.write_event("lineage_ok", "doc-1", "lineage", "processing", "Lineage valid", details("b"))
            .unwrap();
        log.write_event("accept", "doc-1", "pipeline_end", "accepted", "Document fully clean", details("c"))
            .unwrap();
    }

    /// Two lines produced by an earlier writer.  Both must still verify and
    /// re-encode byte for byte.
    const HISTORIC_LINES: [&str; 2] = [
        r#"{"details": {"metadata": {"scenario": "clean"}}, "document_id": "doc-clean", "entry_hash": "549941b11b90c8d2a4f70353b59089867c37052bd454e8d87dd027daa8fcc3d0", "event_type": "ingest_start", "index": 0, "prev_hash": null, "reason": "Document ingest started", "stage": "start", "status": "processing", "timestamp": "2024-05-01T12:00:00Z"}"#,
        r#"{"details": {"scores": {"cluster_distance": 1e-05, "is_suspicious": false, "note": "caf\u00e9", "semantic_score": 0.12345678901234, "total_score": 0.3}}, "document_id": "doc-clean", "entry_hash": "45da4a950d54c50fab07a586d4d24e4c18ae7a9f6d16039ba36e825681824084", "event_type": "semantic_ok", "index": 1, "prev_hash": "549941b11b90c8d2a4f70353b59089867c37052bd454e8d87dd027daa8fcc3d0", "reason": "Semantic clean", "stage": "semantic", "status": "accepted", "timestamp": "2024-05-01T12:00:01Z"}"#,
    ];

    // ── Tests ─────────────────────────────────────────────────────────────────

    /// Writing three events and verifying produces a valid chain.
    #[test]
    fn test_hash_chain_integrity() {
        let log = InMemoryAuditLog::new();
        write_three(&log);

        assert!(log.verify_integrity(), "chain must be valid after sequential writes");
        let report = verify_chain(&log.entries()).unwrap();
        assert_eq!(report.entries, 3);
        assert_eq!(report.segments, 1);
    }

    /// Mutating any stored field breaks the chain.
    #[test]
    fn test_tamper_detection() {
        let tampers: [fn(&mut AuditLogEntry); 4] = [
            |e| e.reason = "Clean document.".to_string(),
            |e| e.status = "accepted".to_string(),
            |e| e.timestamp = "1999-01-01T00:00:00Z".to_string(),
            |e| {
                e.details.insert("text".to_string(), DetailValue::from("TAMPERED"));
            },
        ];

        for tamper in tampers {
            let log = InMemoryAuditLog::new();
            write_three(&log);
            {
                let mut state = log.state.lock().unwrap();
                tamper(&mut state.entries[1]);
            }
            assert!(
                !log.verify_integrity(),
                "chain must detect tampering with a stored entry"
            );
        }
    }

    /// Re-sealing a tampered entry still breaks the link to its successor.
    #[test]
    fn test_resealed_tamper_breaks_link() {
        let log = InMemoryAuditLog::new();
        write_three(&log);
        let mut entries = log.entries();

        entries[1].reason = "rewritten".to_string();
        entries[1].entry_hash = Some(hash_entry(&entries[1]));

        match verify_chain(&entries) {
            Err(ChainError::BrokenLink { position, .. }) => assert_eq!(position, 2),
            other => panic!("expected BrokenLink, got {:?}", other),
        }
    }

    /// Dropping an entry from the middle is reported as an index gap.
    #[test]
    fn test_deleted_entry_detected() {
        let log = InMemoryAuditLog::new();
        write_three(&log);
        let mut entries = log.entries();
        entries.remove(1);

        assert!(matches!(
            verify_chain(&entries),
            Err(ChainError::IndexGap { position: 1, expected: 1, found: 2 })
        ));
    }

    /// The first entry has no predecessor.
    #[test]
    fn test_first_entry_has_no_prev_hash() {
        let log = InMemoryAuditLog::new();
        write_three(&log);

        let entries = log.entries();
        assert_eq!(entries[0].prev_hash, None);
        assert_eq!(entries[1].prev_hash, entries[0].entry_hash);
        assert_eq!(entries[2].prev_hash, entries[1].entry_hash);
    }

    /// Indices must be 0, 1, 2, … with no gaps or skips.
    #[test]
    fn test_index_monotonic() {
        let log = InMemoryAuditLog::new();
        write_three(&log);

        for (idx, entry) in log.entries().iter().enumerate() {
            assert_eq!(entry.index, idx as u64, "index at position {} should be {}", idx, idx);
        }
    }

    /// The hash ignores whatever is stored in `entry_hash`.
    #[test]
    fn test_hash_ignores_stored_entry_hash() {
        let log = InMemoryAuditLog::new();
        write_three(&log);
        let mut entry = log.entries().remove(0);
        let original = hash_entry(&entry);

        entry.entry_hash = Some("f".repeat(64));
        assert_eq!(hash_entry(&entry), original);
        entry.entry_hash = None;
        assert_eq!(hash_entry(&entry), original);
    }

    /// An empty chain is trivially valid.
    #[test]
    fn test_verify_empty() {
        let log = InMemoryAuditLog::new();
        assert!(log.verify_integrity(), "an empty chain must be considered valid");

        let report = verify_chain(&[]).unwrap();
        assert_eq!(report.entries, 0);
        assert_eq!(report.head_hash, None);
    }

    /// A chain that starts mid-stream is rejected.
    #[test]
    fn test_truncated_head_rejected() {
        let log = InMemoryAuditLog::new();
        write_three(&log);
        let entries = log.entries();

        assert!(matches!(
            verify_chain(&entries[1..]),
            Err(ChainError::BrokenLink { position: 0, .. })
        ));
    }

    /// Historic lines verify, recompute to the stored hashes, and re-encode
    /// to the identical bytes.
    #[test]
    fn test_historic_lines_verify() {
        let entries: Vec<AuditLogEntry> = HISTORIC_LINES
            .iter()
            .map(|line| AuditLogEntry::from_line(line).unwrap())
            .collect();

        let report = verify_chain(&entries).unwrap();
        assert_eq!(report.entries, 2);
        assert_eq!(
            report.head_hash.as_deref(),
            Some("45da4a950d54c50fab07a586d4d24e4c18ae7a9f6d16039ba36e825681824084")
        );

        for (entry, line) in entries.iter().zip(HISTORIC_LINES) {
            assert_eq!(Some(hash_entry(entry)), entry.entry_hash);
            assert_eq!(entry.to_line(), line);
        }
    }
}
