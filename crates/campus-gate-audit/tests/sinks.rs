// crates/campus-gate-audit/tests/sinks.rs
// ============================================================================
// Module: Audit Sink Tests
// Description: Verify append-only sink behavior and JSON-line encoding.
// Purpose: Ensure records survive round-trips through file and memory sinks.
// Dependencies: campus-gate-audit, campus-gate-core, tempfile
// ============================================================================

//! Audit sink tests.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test setup uses unwraps for clarity."
)]

use std::fs;

use campus_gate_audit::ActionType;
use campus_gate_audit::Actor;
use campus_gate_audit::AuditRecord;
use campus_gate_audit::AuditRecordParams;
use campus_gate_audit::AuditSink;
use campus_gate_audit::FileAuditSink;
use campus_gate_audit::InMemoryAuditStore;
use campus_gate_audit::RequestOrigin;
use campus_gate_audit::Severity;
use campus_gate_audit::sink::AuditStore;
use campus_gate_core::TenantId;

/// Builds a representative record.
fn sample_record() -> AuditRecord {
    AuditRecord::new(AuditRecordParams {
        tenant_id: Some(TenantId::new("t1")),
        actor: Actor::anonymous(),
        action_type: ActionType::Update,
        entity_type: "schedule".to_string(),
        entity_id: Some("sched-9".to_string()),
        entity_name: Some("Autumn timetable".to_string()),
        old_value: Some("{\"room\":\"B2\"}".to_string()),
        new_value: Some("{\"room\":\"C1\"}".to_string()),
        change_summary: Some("Moved lecture room".to_string()),
        origin: RequestOrigin::default(),
        severity: Severity::Info,
    })
}

#[test]
fn memory_store_appends_and_fetches() {
    let store = InMemoryAuditStore::new();
    assert!(store.is_empty().unwrap());
    let record = sample_record();
    store.append(&record).unwrap();
    store.append(&sample_record()).unwrap();
    assert_eq!(store.len().unwrap(), 2);

    let fetched = store.fetch().unwrap();
    assert_eq!(fetched[0], record);
}

#[test]
fn fetched_records_are_copies() {
    let store = InMemoryAuditStore::new();
    store.append(&sample_record()).unwrap();
    let mut fetched = store.fetch().unwrap();
    fetched.clear();
    // Mutating a fetched page never touches the trail itself.
    assert_eq!(store.len().unwrap(), 1);
}

#[test]
fn file_sink_writes_one_json_line_per_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    let sink = FileAuditSink::new(&path).unwrap();

    let first = sample_record();
    sink.append(&first).unwrap();
    sink.append(&sample_record()).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);

    let decoded: AuditRecord = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(decoded, first);
}

#[test]
fn file_sink_appends_across_reopens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");

    let sink = FileAuditSink::new(&path).unwrap();
    sink.append(&sample_record()).unwrap();
    drop(sink);

    let sink = FileAuditSink::new(&path).unwrap();
    sink.append(&sample_record()).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 2);
}

#[test]
fn record_serialization_uses_flat_column_names() {
    let record = sample_record();
    let value = serde_json::to_value(&record).unwrap();
    // Actor and origin flatten into the record the way the audit schema
    // names its columns.
    assert!(value.get("user_id").is_some());
    assert!(value.get("user_email").is_some());
    assert!(value.get("user_role").is_some());
    assert!(value.get("ip_address").is_some());
    assert_eq!(value.get("action_type").and_then(|v| v.as_str()), Some("UPDATE"));
    assert_eq!(value.get("severity").and_then(|v| v.as_str()), Some("INFO"));
}
