// crates/campus-gate-audit/src/sink.rs
// ============================================================================
// Module: Campus Gate Audit Sinks
// Description: Append-only sinks and queryable stores for audit records.
// Purpose: Route records to deployment-preferred storage without redesign.
// Dependencies: crate::record, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Sinks are intentionally lightweight so deployments can route the audit
//! trail to their preferred durable storage. The in-memory store backs tests
//! and single-process deployments; the file sink writes JSON lines in append
//! mode; the stderr sink feeds a host logging pipeline.
//!
//! Appends are single-attempt with no internal retry; the recorder owns the
//! fail-soft policy.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use thiserror::Error;

use crate::record::AuditRecord;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Audit sink failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The sink could not accept the record.
    #[error("audit sink unavailable: {0}")]
    Unavailable(String),
    /// The record could not be encoded for the sink.
    #[error("audit record could not be encoded: {0}")]
    Encode(String),
}

// ============================================================================
// SECTION: Traits
// ============================================================================

/// Append-only audit sink.
pub trait AuditSink: Send + Sync {
    /// Appends one record. A single attempt; callers own retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] when the record cannot be written.
    fn append(&self, record: &AuditRecord) -> Result<(), SinkError>;
}

/// Audit sink whose records can be read back for access-controlled queries.
pub trait AuditStore: AuditSink {
    /// Returns all records. Filtering happens at the query layer.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] when the store cannot be read.
    fn fetch(&self) -> Result<Vec<AuditRecord>, SinkError>;
}

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Mutex-guarded in-memory store for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct InMemoryAuditStore {
    /// Append-only record list.
    records: Mutex<Vec<AuditRecord>>,
}

impl InMemoryAuditStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Unavailable`] when the store lock is poisoned.
    pub fn len(&self) -> Result<usize, SinkError> {
        self.records
            .lock()
            .map(|records| records.len())
            .map_err(|err| SinkError::Unavailable(err.to_string()))
    }

    /// Returns true when no records are stored.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Unavailable`] when the store lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, SinkError> {
        Ok(self.len()? == 0)
    }
}

impl AuditSink for InMemoryAuditStore {
    fn append(&self, record: &AuditRecord) -> Result<(), SinkError> {
        self.records
            .lock()
            .map(|mut records| records.push(record.clone()))
            .map_err(|err| SinkError::Unavailable(err.to_string()))
    }
}

impl AuditStore for InMemoryAuditStore {
    fn fetch(&self) -> Result<Vec<AuditRecord>, SinkError> {
        self.records
            .lock()
            .map(|records| records.clone())
            .map_err(|err| SinkError::Unavailable(err.to_string()))
    }
}

// ============================================================================
// SECTION: File Sink
// ============================================================================

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for FileAuditSink {
    fn append(&self, record: &AuditRecord) -> Result<(), SinkError> {
        let payload =
            serde_json::to_string(record).map_err(|err| SinkError::Encode(err.to_string()))?;
        let mut file =
            self.file.lock().map_err(|err| SinkError::Unavailable(err.to_string()))?;
        writeln!(file, "{payload}").map_err(|err| SinkError::Unavailable(err.to_string()))?;
        file.flush().map_err(|err| SinkError::Unavailable(err.to_string()))
    }
}

// ============================================================================
// SECTION: Stderr and No-Op Sinks
// ============================================================================

/// Audit sink that writes JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn append(&self, record: &AuditRecord) -> Result<(), SinkError> {
        let payload =
            serde_json::to_string(record).map_err(|err| SinkError::Encode(err.to_string()))?;
        writeln!(io::stderr(), "{payload}")
            .map_err(|err| SinkError::Unavailable(err.to_string()))
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn append(&self, _record: &AuditRecord) -> Result<(), SinkError> {
        Ok(())
    }
}
