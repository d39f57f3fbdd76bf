//! In-memory implementation of `AuditSink`.
//!
//! `InMemoryAuditLog` keeps every sealed entry in a `Vec` behind the same
//! mutex as the chain head.  Used by tests, the reference scenarios, and
//! anything that wants to inspect a chain without touching disk.

use std::sync::Mutex;

use tracing::debug;

use provgate_contracts::{
    detail::Details,
    error::{GateError, GateResult},
};
use provgate_core::traits::AuditSink;

use crate::{
    chain::{verify_chain, ChainHead, EventDraft},
    event::AuditLogEntry,
};

// ── Internal mutable state ────────────────────────────────────────────────────

#[derive(Default)]
pub(crate) struct InMemoryState {
    pub(crate) head: ChainHead,
    pub(crate) entries: Vec<AuditLogEntry>,
}

// ── Public log ────────────────────────────────────────────────────────────────

/// An in-memory, append-only audit log backed by the SHA-256 hash chain.
#[derive(Default)]
pub struct InMemoryAuditLog {
    pub(crate) state: Mutex<InMemoryState>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every entry written so far, in chain order.
    pub fn entries(&self) -> Vec<AuditLogEntry> {
        match self.state.lock() {
            Ok(state) => state.entries.clone(),
            Err(poisoned) => poisoned.into_inner().entries.clone(),
        }
    }

    /// Confirm the in-memory chain has not been tampered with.
    pub fn verify_integrity(&self) -> bool {
        verify_chain(&self.entries()).is_ok()
    }
}

// ── AuditSink impl ────────────────────────────────────────────────────────────

impl AuditSink for InMemoryAuditLog {
    fn write_event(
        &self,
        event_type: &str,
        document_id: &str,
        stage: &str,
        status: &str,
        reason: &str,
        details: Details,
    ) -> GateResult<u64> {
        let mut state = self.state.lock().map_err(|e| GateError::AuditWriteFailed {
            reason: format!("audit state lock poisoned: {}", e),
        })?;

        let entry = state.head.seal_next(EventDraft {
            event_type,
            document_id,
            stage,
            status,
            reason,
            details,
        });
        let index = entry.index;

        state.head.advance(&entry);
        state.entries.push(entry);

        debug!(index, event_type = %event_type, document_id = %document_id, "audit entry recorded");
        Ok(index)
    }
}
