// crates/campus-gate-audit/src/lib.rs
// ============================================================================
// Module: Campus Gate Audit Library
// Description: Public API surface for the tamper-evident audit trail.
// Purpose: Expose the record schema, sinks, fail-soft recorder, and queries.
// Dependencies: crate::{query, record, recorder, sink}
// ============================================================================

//! ## Overview
//! The audit trail is append-only and write-once: records are created once,
//! never mutated, never deleted. Writing is best-effort by policy, a sink
//! failure is logged to a fallback channel and reported as `false` while the
//! triggering business operation proceeds. Reading is access-controlled per
//! role; students, staff, and faculty have no audit access at all.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod query;
pub mod record;
pub mod recorder;
pub mod sink;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use query::AuditFilter;
pub use query::AuditPage;
pub use query::AuditQueryError;
pub use query::Page;
pub use query::login_history;
pub use query::query;
pub use query::security_events;
pub use record::ActionType;
pub use record::Actor;
pub use record::AuditRecord;
pub use record::AuditRecordParams;
pub use record::RequestOrigin;
pub use record::Severity;
pub use recorder::AuditRecorder;
pub use sink::AuditSink;
pub use sink::AuditStore;
pub use sink::FileAuditSink;
pub use sink::InMemoryAuditStore;
pub use sink::NoopAuditSink;
pub use sink::SinkError;
pub use sink::StderrAuditSink;
