// crates/campus-gate-core/src/principal.rs
// ============================================================================
// Module: Campus Gate Principal
// Description: Authenticated identity and claims for one request.
// Purpose: Carry verified role/tenant claims read-only through the pipeline.
// Dependencies: crate::{identifiers, roles}, serde
// ============================================================================

//! ## Overview
//! A [`Principal`] is reconstructed per-request from a verified credential and
//! never persisted. It is created only by the credential verifier and consumed
//! read-only by tenant scoping, permission evaluation, and audit recording.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::identifiers::TenantId;
use crate::identifiers::UserId;
use crate::roles::Role;

// ============================================================================
// SECTION: Principal
// ============================================================================

/// Authenticated caller identity for one request.
///
/// # Invariants
/// - `tenant_id` is `None` only for `SUPER_ADMIN` principals; the tenant
///   scope resolver hard-fails any other tenantless principal.
/// - Values are verified claims; nothing downstream re-validates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Subject identifier.
    pub subject: UserId,
    /// Subject email, denormalized into audit records at write time.
    pub email: String,
    /// Platform role.
    pub role: Role,
    /// Home tenant, when the subject belongs to one.
    pub tenant_id: Option<TenantId>,
    /// Explicit permission claims, reserved for finer-grained grants.
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Principal {
    /// Returns true for platform-operator principals.
    #[must_use]
    pub const fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }

    /// Returns true when the explicit claim list carries `permission`.
    ///
    /// The coarse role table remains authoritative; explicit claims only ever
    /// narrow future grants and are not consulted by [`crate::authorize`].
    #[must_use]
    pub fn claims_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|claim| claim == permission)
    }

    /// Returns true when `target` is the principal's own subject.
    #[must_use]
    pub fn is_self(&self, target: &UserId) -> bool {
        &self.subject == target
    }
}
