//! JSON Lines implementation of `AuditSink`.
//!
//! `FileAuditLog` appends one canonical line per entry.  The chain head and
//! the open file handle share one mutex, so sealing, appending, and advancing
//! happen as a single step and `index` order always equals file order.  The
//! head only advances after the line is written.  A failed append is cut back
//! to the previous file length; if that cut fails too, the log refuses every
//! later write, since the file may hold a line the head never saw.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::{debug, error, info, warn};

use provgate_contracts::{
    detail::Details,
    error::{GateError, GateResult},
};
use provgate_core::traits::AuditSink;

use crate::{
    chain::{verify_chain, ChainHead, ChainReport, EventDraft},
    event::AuditLogEntry,
};

/// The byte sink behind a `FileAuditLog`.
pub(crate) trait LogFile: Send {
    fn append(&mut self, bytes: &[u8]) -> io::Result<()>;
    fn sync(&mut self) -> io::Result<()>;
    fn byte_len(&self) -> io::Result<u64>;
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl LogFile for File {
    fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_all(bytes)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }

    fn byte_len(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

struct FileState {
    head: ChainHead,
    file: Box<dyn LogFile>,
    /// Set when a failed append could not be rolled back.
    failed: Option<String>,
}

/// An append-only audit log persisted as JSON Lines.
pub struct FileAuditLog {
    path: PathBuf,
    sync: bool,
    state: Mutex<FileState>,
}

impl FileAuditLog {
    /// Open `path` for appending and start a fresh chain segment.
    ///
    /// The first entry written by this instance has index 0 and no
    /// `prev_hash`, regardless of what the file already holds.  With `sync`
    /// set, every append is followed by `fdatasync`.
    pub fn open(path: impl AsRef<Path>, sync: bool) -> GateResult<Self> {
        Self::with_head(path.as_ref(), sync, ChainHead::default())
    }

    /// Open `path` and continue its existing chain.
    ///
    /// The whole file is replayed and verified first; a broken chain is
    /// refused with `GateError::ChainBroken` rather than extended.  A missing
    /// or empty file starts a fresh chain.
    pub fn resume(path: impl AsRef<Path>, sync: bool) -> GateResult<Self> {
        let path = path.as_ref();
        let head = if path.exists() {
            let entries = read_log(path)?;
            verify_chain(&entries).map_err(|e| GateError::ChainBroken {
                reason: format!("refusing to resume '{}': {}", path.display(), e),
            })?;
            entries.last().map(ChainHead::after).unwrap_or_default()
        } else {
            ChainHead::default()
        };

        info!(
            path = %path.display(),
            next_index = head.counter,
            "resuming audit chain"
        );
        Self::with_head(path, sync, head)
    }

    fn with_head(path: &Path, sync: bool, head: ChainHead) -> GateResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| GateError::AuditWriteFailed {
                reason: format!("cannot create audit directory '{}': {}", parent.display(), e),
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| GateError::AuditWriteFailed {
                reason: format!("cannot open audit log '{}': {}", path.display(), e),
            })?;

        Ok(Self::with_file(path, sync, head, Box::new(file)))
    }

    pub(crate) fn with_file(path: &Path, sync: bool, head: ChainHead, file: Box<dyn LogFile>) -> Self {
        Self {
            path: path.to_path_buf(),
            sync,
            state: Mutex::new(FileState {
                head,
                file,
                failed: None,
            }),
        }
    }

    /// Where this log is written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The index the next entry will receive.
    pub fn next_index(&self) -> u64 {
        match self.state.lock() {
            Ok(state) => state.head.counter,
            Err(poisoned) => poisoned.into_inner().head.counter,
        }
    }
}

impl AuditSink for FileAuditLog {
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

        if let Some(cause) = &state.failed {
            return Err(GateError::AuditWriteFailed {
                reason: format!(
                    "audit log '{}' is unusable after an earlier failed append: {}",
                    self.path.display(),
                    cause
                ),
            });
        }

        let entry = state.head.seal_next(EventDraft {
            event_type,
            document_id,
            stage,
            status,
            reason,
            details,
        });

        let mut line = entry.to_line();
        line.push('\n');

        let write_failed = |e: io::Error| GateError::AuditWriteFailed {
            reason: format!("cannot append to '{}': {}", self.path.display(), e),
        };
        let start = state.file.byte_len().map_err(write_failed)?;

        let mut appended = state.file.append(line.as_bytes());
        if appended.is_ok() && self.sync {
            appended = state.file.sync();
        }
        if let Err(e) = appended {
            match state.file.truncate(start) {
                Ok(()) => warn!(
                    path = %self.path.display(),
                    index = entry.index,
                    error = %e,
                    "audit append failed, rolled back"
                ),
                Err(t) => {
                    error!(
                        path = %self.path.display(),
                        index = entry.index,
                        error = %e,
                        rollback_error = %t,
                        "audit append failed and could not be rolled back"
                    );
                    state.failed = Some(format!("{}; truncate to {} bytes failed: {}", e, start, t));
                }
            }
            return Err(write_failed(e));
        }

        state.head.advance(&entry);

        debug!(
            index = entry.index,
            event_type = %event_type,
            document_id = %document_id,
            "audit entry appended"
        );
        Ok(entry.index)
    }
}

/// Read every entry from a JSON Lines audit log, in file order.
///
/// Blank lines are skipped.  A line that does not parse is reported with its
/// 1-based line number.
pub fn read_log(path: impl AsRef<Path>) -> GateResult<Vec<AuditLogEntry>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| GateError::AuditReadFailed {
        reason: format!("cannot open '{}': {}", path.display(), e),
    })?;

    let mut entries = Vec::new();
    for (n, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| GateError::AuditReadFailed {
            reason: format!("cannot read '{}' line {}: {}", path.display(), n + 1, e),
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let entry = AuditLogEntry::from_line(&line).map_err(|e| GateError::AuditReadFailed {
            reason: format!("malformed entry at '{}' line {}: {}", path.display(), n + 1, e),
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

/// Replay and verify a JSON Lines audit log.
pub fn verify_log_file(path: impl AsRef<Path>) -> GateResult<ChainReport> {
    let path = path.as_ref();
    let entries = read_log(path)?;
    let report = verify_chain(&entries).map_err(|e| GateError::ChainBroken {
        reason: format!("'{}': {}", path.display(), e),
    })?;

    info!(
        path = %path.display(),
        entries = report.entries,
        segments = report.segments,
        "audit chain verified"
    );
    Ok(report)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
