// crates/campus-gate-guard/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared fixtures for guard pipeline tests.
// Purpose: Provide a wired gate over in-memory stores for deterministic tests.
// Dependencies: campus-gate-audit, campus-gate-config, campus-gate-core, campus-gate-guard
// ============================================================================

//! ## Overview
//! Shared fixtures wiring a [`Gate`] over the in-memory revocation store and
//! audit store, plus sample principals and request origins.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use campus_gate_audit::InMemoryAuditStore;
use campus_gate_audit::RequestOrigin;
use campus_gate_config::AuditConfig;
use campus_gate_config::AuthConfig;
use campus_gate_config::CampusGateConfig;
use campus_gate_config::SecurityConfig;
use campus_gate_core::Principal;
use campus_gate_core::Role;
use campus_gate_core::TenantId;
use campus_gate_core::UserId;
use campus_gate_guard::Gate;
use campus_gate_guard::InMemoryRevocationStore;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Fixed test clock, an arbitrary epoch second.
pub const NOW: i64 = 1_754_000_000;

/// Suspicious-activity threshold used by test gates.
pub const TEST_THRESHOLD: u64 = 3;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Builds a gate wired over fresh in-memory stores.
pub fn test_gate() -> (Gate, Arc<InMemoryRevocationStore>, Arc<InMemoryAuditStore>) {
    let config = CampusGateConfig {
        auth: AuthConfig {
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            access_ttl_secs: 3600,
            refresh_ttl_secs: 86_400,
            super_admin_emails: vec!["ops@platform.example".to_string()],
        },
        security: SecurityConfig {
            suspicious_threshold: TEST_THRESHOLD,
        },
        audit: AuditConfig::default(),
    };
    let store = Arc::new(InMemoryRevocationStore::new());
    let audit = Arc::new(InMemoryAuditStore::new());
    let gate = Gate::from_config(&config, store.clone(), audit.clone());
    (gate, store, audit)
}

/// Builds a tenant-bound principal.
pub fn member(role: Role, tenant: &str, subject: &str) -> Principal {
    Principal {
        subject: UserId::new(subject),
        email: format!("{subject}@{tenant}.edu"),
        role,
        tenant_id: Some(TenantId::new(tenant)),
        permissions: Vec::new(),
    }
}

/// Builds the platform-operator principal.
pub fn operator() -> Principal {
    Principal {
        subject: UserId::new("op-1"),
        email: "ops@platform.example".to_string(),
        role: Role::SuperAdmin,
        tenant_id: None,
        permissions: Vec::new(),
    }
}

/// Builds a request origin with a fixed caller address.
pub fn origin() -> RequestOrigin {
    RequestOrigin::new(
        Some("203.0.113.9".to_string()),
        Some("guard-tests".to_string()),
        Some("/api/schedules".to_string()),
        Some("POST".to_string()),
    )
}
