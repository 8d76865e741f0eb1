// crates/campus-gate-guard/tests/session.rs
// ============================================================================
// Module: Session Lifecycle Tests
// Description: Verify login, logout, and refresh through the gate.
// Purpose: Ensure refresh re-derives claims and logout revokes durably.
// Dependencies: campus-gate-guard, campus-gate-audit, campus-gate-core
// ============================================================================

//! Session lifecycle tests.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test setup uses unwraps for clarity."
)]

mod common;

use std::collections::BTreeMap;

use campus_gate_audit::ActionType;
use campus_gate_audit::Severity;
use campus_gate_audit::sink::AuditStore;
use campus_gate_core::Role;
use campus_gate_core::TenantId;
use campus_gate_core::UserId;
use campus_gate_credentials::CredentialError;
use campus_gate_guard::DirectoryError;
use campus_gate_guard::RefreshError;
use campus_gate_guard::SubjectDirectory;
use campus_gate_guard::SubjectRecord;
use common::NOW;
use common::member;
use common::origin;
use common::test_gate;

/// Directory fake backed by a map.
#[derive(Default)]
struct MapDirectory {
    /// Subject records by identifier.
    records: BTreeMap<String, SubjectRecord>,
}

impl MapDirectory {
    /// Inserts a record for a subject.
    fn with(mut self, record: SubjectRecord) -> Self {
        self.records.insert(record.subject.as_str().to_string(), record);
        self
    }
}

impl SubjectDirectory for MapDirectory {
    fn lookup(&self, subject: &UserId) -> Result<Option<SubjectRecord>, DirectoryError> {
        Ok(self.records.get(subject.as_str()).cloned())
    }
}

/// Directory fake that is always unreachable.
struct OfflineDirectory;

impl SubjectDirectory for OfflineDirectory {
    fn lookup(&self, _subject: &UserId) -> Result<Option<SubjectRecord>, DirectoryError> {
        Err(DirectoryError::Unavailable("connection refused".to_string()))
    }
}

#[test]
fn issue_session_mints_a_pair_and_records_login() {
    let (gate, _, audit) = test_gate();
    let principal = member(Role::CollegeAdmin, "c1", "u1");
    let tokens = gate.issue_session(&principal, &origin(), NOW).unwrap();
    assert_ne!(tokens.access_token, tokens.refresh_token);

    let records = audit.fetch().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].action_type, ActionType::Login);
    assert_eq!(records[0].severity, Severity::Info);
    assert_eq!(records[0].tenant_id, Some(TenantId::new("c1")));
}

#[test]
fn failed_login_is_recorded_as_warning() {
    let (gate, _, audit) = test_gate();
    assert!(gate.record_failed_login(&UserId::new("u1"), "u1@c1.edu", None, &origin()));
    let records = audit.fetch().unwrap();
    assert_eq!(records[0].action_type, ActionType::LoginFailed);
    assert_eq!(records[0].severity, Severity::Warning);
}

#[test]
fn revoke_blocks_the_credential_and_records_logout() {
    let (gate, _, audit) = test_gate();
    let principal = member(Role::Faculty, "c1", "u2");
    let tokens = gate.issue_session(&principal, &origin(), NOW).unwrap();

    assert!(gate.revoke(&tokens.access_token, &principal, &origin()));
    assert!(gate.monitor().is_blocked(&tokens.access_token));

    let actions: Vec<ActionType> =
        audit.fetch().unwrap().iter().map(|record| record.action_type).collect();
    // Login, then the block's security event, then the logout.
    assert_eq!(
        actions,
        vec![ActionType::Login, ActionType::SecurityViolation, ActionType::Logout]
    );
}

#[test]
fn refresh_rederives_role_and_tenant_from_the_directory() {
    let (gate, _, _) = test_gate();
    let principal = member(Role::Faculty, "c1", "u3");
    let tokens = gate.issue_session(&principal, &origin(), NOW).unwrap();

    // The subject was promoted and moved since the refresh token was minted.
    let directory = MapDirectory::default().with(SubjectRecord {
        subject: UserId::new("u3"),
        email: "u3@c2.edu".to_string(),
        role_code: "COLLEGE_ADMIN".to_string(),
        tenant_id: Some(TenantId::new("c2")),
    });

    let access = gate.refresh(&tokens.refresh_token, &directory, NOW + 60).unwrap();
    let refreshed = gate.authenticate(Some(&access), &origin(), NOW + 120).unwrap();
    assert_eq!(refreshed.role, Role::CollegeAdmin);
    assert_eq!(refreshed.tenant_id, Some(TenantId::new("c2")));
    assert_eq!(refreshed.email, "u3@c2.edu");
}

#[test]
fn revoked_refresh_credential_is_rejected() {
    let (gate, _, _) = test_gate();
    let principal = member(Role::Faculty, "c1", "u4");
    let tokens = gate.issue_session(&principal, &origin(), NOW).unwrap();
    gate.monitor().block(&tokens.refresh_token, "logout");

    let directory = MapDirectory::default();
    let error = gate.refresh(&tokens.refresh_token, &directory, NOW + 60).unwrap_err();
    assert_eq!(error, RefreshError::Credential(CredentialError::Revoked));
}

#[test]
fn access_credential_cannot_be_used_to_refresh() {
    let (gate, _, _) = test_gate();
    let principal = member(Role::Faculty, "c1", "u5");
    let tokens = gate.issue_session(&principal, &origin(), NOW).unwrap();

    let directory = MapDirectory::default();
    let error = gate.refresh(&tokens.access_token, &directory, NOW + 60).unwrap_err();
    assert_eq!(error, RefreshError::Credential(CredentialError::Malformed));
}

#[test]
fn departed_subjects_cannot_refresh() {
    let (gate, _, _) = test_gate();
    let principal = member(Role::Staff, "c1", "u6");
    let tokens = gate.issue_session(&principal, &origin(), NOW).unwrap();

    let directory = MapDirectory::default();
    let error = gate.refresh(&tokens.refresh_token, &directory, NOW + 60).unwrap_err();
    assert_eq!(error, RefreshError::UnknownSubject(UserId::new("u6")));
}

#[test]
fn corrupt_directory_role_codes_fail_closed() {
    let (gate, _, _) = test_gate();
    let principal = member(Role::Staff, "c1", "u7");
    let tokens = gate.issue_session(&principal, &origin(), NOW).unwrap();

    let directory = MapDirectory::default().with(SubjectRecord {
        subject: UserId::new("u7"),
        email: "u7@c1.edu".to_string(),
        role_code: "JANITOR".to_string(),
        tenant_id: Some(TenantId::new("c1")),
    });
    let error = gate.refresh(&tokens.refresh_token, &directory, NOW + 60).unwrap_err();
    assert_eq!(error, RefreshError::UnknownRole("JANITOR".to_string()));
}

#[test]
fn unreachable_directory_surfaces_a_directory_error() {
    let (gate, _, _) = test_gate();
    let principal = member(Role::Staff, "c1", "u8");
    let tokens = gate.issue_session(&principal, &origin(), NOW).unwrap();

    let error = gate.refresh(&tokens.refresh_token, &OfflineDirectory, NOW + 60).unwrap_err();
    assert!(matches!(error, RefreshError::Directory(DirectoryError::Unavailable(_))));
}

#[test]
fn expired_refresh_credential_is_rejected() {
    let (gate, _, _) = test_gate();
    let principal = member(Role::Staff, "c1", "u9");
    let tokens = gate.issue_session(&principal, &origin(), NOW).unwrap();

    let directory = MapDirectory::default();
    let error = gate.refresh(&tokens.refresh_token, &directory, NOW + 86_400).unwrap_err();
    assert_eq!(error, RefreshError::Credential(CredentialError::Expired));
}
