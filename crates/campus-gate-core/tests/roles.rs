// crates/campus-gate-core/tests/roles.rs
// ============================================================================
// Module: Role Hierarchy Tests
// Description: Verify rank ordering, strict dominance, and code parsing.
// Purpose: Ensure unknown role codes fail closed at rank zero.
// Dependencies: campus-gate-core
// ============================================================================

//! Role hierarchy tests.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test setup uses unwraps for clarity."
)]

use campus_gate_core::Role;
use campus_gate_core::rank_code;
use campus_gate_core::roles::ALL_ROLES;

#[test]
fn ranks_are_totally_ordered() {
    let ranks: Vec<u32> = ALL_ROLES.iter().map(|role| role.rank()).collect();
    assert_eq!(ranks, vec![100, 50, 10, 5, 1]);
    for pair in ranks.windows(2) {
        assert!(pair[0] > pair[1]);
    }
}

#[test]
fn dominance_is_strict() {
    assert!(Role::SuperAdmin.dominates(Role::CollegeAdmin));
    assert!(Role::CollegeAdmin.dominates(Role::Faculty));
    assert!(Role::Faculty.dominates(Role::Staff));
    assert!(Role::Staff.dominates(Role::Student));
    for role in ALL_ROLES {
        assert!(!role.dominates(role), "{role} must not dominate itself");
    }
    assert!(!Role::Student.dominates(Role::SuperAdmin));
}

#[test]
fn parse_round_trips_stable_codes() {
    for role in ALL_ROLES {
        assert_eq!(Role::parse(role.as_str()), Some(role));
    }
}

#[test]
fn parse_rejects_unknown_and_miscased_codes() {
    assert_eq!(Role::parse("super_admin"), None);
    assert_eq!(Role::parse("ADMIN"), None);
    assert_eq!(Role::parse(""), None);
}

#[test]
fn unknown_codes_rank_zero() {
    assert_eq!(rank_code("JANITOR"), 0);
    assert_eq!(rank_code(""), 0);
    assert_eq!(rank_code("COLLEGE_ADMIN"), 50);
}

#[test]
fn serde_uses_screaming_snake_codes() {
    let encoded = serde_json::to_string(&Role::CollegeAdmin).unwrap();
    assert_eq!(encoded, "\"COLLEGE_ADMIN\"");
    let decoded: Role = serde_json::from_str("\"STAFF\"").unwrap();
    assert_eq!(decoded, Role::Staff);
}
