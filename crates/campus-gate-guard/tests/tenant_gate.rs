// crates/campus-gate-guard/tests/tenant_gate.rs
// ============================================================================
// Module: Tenant Gate Tests
// Description: Verify tenant scoping through the gate with audit emission.
// Purpose: Ensure cross-tenant attempts leave a WARNING trail on the way out.
// Dependencies: campus-gate-guard, campus-gate-audit, campus-gate-core
// ============================================================================

//! Tenant gate tests.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test setup uses unwraps for clarity."
)]

mod common;

use campus_gate_audit::ActionType;
use campus_gate_audit::Severity;
use campus_gate_audit::sink::AuditStore;
use campus_gate_core::DenyReason;
use campus_gate_core::Role;
use campus_gate_core::TenantHint;
use campus_gate_core::TenantId;
use common::member;
use common::operator;
use common::origin;
use common::test_gate;

/// Builds a hint addressing one tenant via the header carrier.
fn header_hint(tenant: &str) -> TenantHint {
    TenantHint {
        header: Some(tenant.to_string()),
        ..TenantHint::default()
    }
}

#[test]
fn own_tenant_resolves_writable() {
    let (gate, _, audit) = test_gate();
    let principal = member(Role::CollegeAdmin, "t1", "admin-1");
    let context = gate.resolve_tenant(&principal, &header_hint("t1"), &origin()).unwrap();
    assert_eq!(context.tenant_id, Some(TenantId::new("t1")));
    assert!(context.can_write);
    assert!(audit.is_empty().unwrap());
}

#[test]
fn cross_tenant_attempt_is_denied_and_audited() {
    let (gate, _, audit) = test_gate();
    let principal = member(Role::CollegeAdmin, "t1", "admin-1");

    let error = gate.resolve_tenant(&principal, &header_hint("t2"), &origin()).unwrap_err();
    assert_eq!(error.code(), "CROSS_TENANT_DENIED");

    let records = audit.fetch().unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.action_type, ActionType::CrossTenantViolation);
    assert_eq!(record.severity, Severity::Warning);
    assert_eq!(record.tenant_id, Some(TenantId::new("t1")));
    assert_eq!(record.entity_name.as_deref(), Some("t2"));
    assert_eq!(record.actor.user_role.as_deref(), Some("COLLEGE_ADMIN"));
    assert_eq!(record.origin.ip_address.as_deref(), Some("203.0.113.9"));
}

#[test]
fn tenantless_member_is_denied_with_a_warning_event() {
    let (gate, _, audit) = test_gate();
    let mut principal = member(Role::Faculty, "t1", "u1");
    principal.tenant_id = None;

    let error = gate.resolve_tenant(&principal, &TenantHint::default(), &origin()).unwrap_err();
    assert_eq!(error.code(), "NO_TENANT_ASSOCIATION");

    let records = audit.fetch().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].action_type, ActionType::SecurityViolation);
    assert_eq!(records[0].severity, Severity::Warning);
    assert_eq!(records[0].entity_name.as_deref(), Some("NO_TENANT_ASSOCIATION"));
}

#[test]
fn operator_scope_is_read_only_and_unaudited() {
    let (gate, _, audit) = test_gate();
    let context = gate.resolve_tenant(&operator(), &header_hint("t2"), &origin()).unwrap();
    assert!(context.is_super_admin);
    assert!(!context.can_write);
    assert!(audit.is_empty().unwrap());
}

#[test]
fn mutation_gate_enforces_read_only_scopes() {
    let (gate, _, _) = test_gate();
    let operator_scope = gate.resolve_tenant(&operator(), &header_hint("t2"), &origin()).unwrap();
    let decision = gate.authorize_mutation(&operator_scope);
    assert_eq!(decision.deny_reason(), Some(DenyReason::PermissionDenied));

    let member_scope = gate
        .resolve_tenant(&member(Role::CollegeAdmin, "t1", "admin-1"), &TenantHint::default(), &origin())
        .unwrap();
    assert!(gate.authorize_mutation(&member_scope).is_allowed());
}

#[test]
fn body_carrier_is_consulted_last() {
    let (gate, _, audit) = test_gate();
    let principal = member(Role::Staff, "t1", "u2");
    let hint = TenantHint {
        header: None,
        path_param: None,
        query_param: None,
        body: Some("t2".to_string()),
    };
    let error = gate.resolve_tenant(&principal, &hint, &origin()).unwrap_err();
    assert_eq!(error.code(), "CROSS_TENANT_DENIED");
    assert_eq!(audit.fetch().unwrap().len(), 1);
}

#[test]
fn unauthenticated_callers_hit_the_auth_gate() {
    let (gate, _, _) = test_gate();
    let decision = gate.authorize(None, "schedules", "read");
    assert_eq!(decision.deny_reason(), Some(DenyReason::AuthRequired));
    let decision = gate.authorize_role_route(None, &[Role::CollegeAdmin]);
    assert_eq!(decision.deny_reason(), Some(DenyReason::AuthRequired));
    let decision = gate.authorize_role_change(None, "FACULTY", "STAFF");
    assert_eq!(decision.deny_reason(), Some(DenyReason::AuthRequired));
}

#[test]
fn gate_authorization_matches_core_policy() {
    let (gate, _, _) = test_gate();
    let faculty = member(Role::Faculty, "t1", "u3");
    let decision = gate.authorize(Some(&faculty), "schedules", "create");
    assert_eq!(decision.deny_reason(), Some(DenyReason::PermissionDenied));
    assert!(gate.authorize(Some(&faculty), "schedules", "read_assigned").is_allowed());
}
