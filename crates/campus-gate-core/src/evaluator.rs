// crates/campus-gate-core/src/evaluator.rs
// ============================================================================
// Module: Campus Gate Permission Evaluator
// Description: Allow/deny decisions for resource actions and role changes.
// Purpose: Enforce the permission table plus escalation and self-access rules.
// Dependencies: crate::{identifiers, permissions, principal, roles}
// ============================================================================

//! ## Overview
//! The evaluator turns a principal, a resource, and an action into an
//! allow/deny decision with a stable reason code. It is a pure function of the
//! permission table; callers emit audit events from the decision, the
//! evaluator itself has no side effects.
//!
//! Role mutation is double-checked: the actor must strictly outrank both the
//! target's current role and the requested role. This closes both escalation
//! shapes, promoting a peer or superior and granting a role the actor could
//! not otherwise grant.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::identifiers::UserId;
use crate::permissions::permits;
use crate::principal::Principal;
use crate::roles::Role;
use crate::roles::rank_code;

// ============================================================================
// SECTION: Decision Types
// ============================================================================

/// Authorization decision outcome.
///
/// # Invariants
/// - `Deny` always carries a machine-readable reason; callers never have to
///   parse messages to distinguish denial causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "decision", content = "reason")]
pub enum Decision {
    /// Access is allowed.
    Allow,
    /// Access is denied for the given reason.
    Deny(DenyReason),
}

impl Decision {
    /// Returns true when access was allowed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Returns the deny reason, if any.
    #[must_use]
    pub const fn deny_reason(self) -> Option<DenyReason> {
        match self {
            Self::Allow => None,
            Self::Deny(reason) => Some(reason),
        }
    }
}

/// Stable denial reason codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenyReason {
    /// No authenticated principal was presented.
    AuthRequired,
    /// The caller's role is outside the route's allowed role list.
    InsufficientRole,
    /// The permission table grants no such action to the caller's role.
    PermissionDenied,
    /// The operation would modify or grant a role at or above the actor's.
    RoleEscalation,
}

impl DenyReason {
    /// Returns the stable reason code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::AuthRequired => "AUTH_REQUIRED",
            Self::InsufficientRole => "INSUFFICIENT_ROLE",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::RoleEscalation => "ROLE_ESCALATION",
        }
    }
}

// ============================================================================
// SECTION: Resource Authorization
// ============================================================================

/// Authorizes `action` on `resource` for the principal.
///
/// Super admins bypass the table; everyone else needs the action listed in
/// their role's entry for the resource.
#[must_use]
pub fn authorize(principal: &Principal, resource: &str, action: &str) -> Decision {
    if permits(principal.role, resource, action) {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::PermissionDenied)
    }
}

/// Authorizes a whole-route role gate.
///
/// The caller's role must be `SUPER_ADMIN` or a member of `allowed_roles`.
#[must_use]
pub fn authorize_role_route(principal: &Principal, allowed_roles: &[Role]) -> Decision {
    if principal.is_super_admin() || allowed_roles.contains(&principal.role) {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::InsufficientRole)
    }
}

/// Authorizes reading or updating a subject's own record.
///
/// The coarse role table is consulted with the `_own` action the caller
/// names; the decision additionally requires that `target` is the principal
/// itself. Operations must invoke this explicitly, self-access is never
/// inferred.
#[must_use]
pub fn authorize_self_access(
    principal: &Principal,
    resource: &str,
    action: &str,
    target: &UserId,
) -> Decision {
    if principal.is_super_admin() {
        return Decision::Allow;
    }
    if principal.is_self(target) && permits(principal.role, resource, action) {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::PermissionDenied)
    }
}

// ============================================================================
// SECTION: Role Mutation
// ============================================================================

/// Authorizes changing another subject's role.
///
/// `target_current` and `requested` are raw role codes as stored by the
/// directory; unknown codes rank zero. The actor must strictly outrank both,
/// except the super admin who may assign anything.
#[must_use]
pub fn authorize_role_change(actor: Role, target_current: &str, requested: &str) -> Decision {
    if actor.is_super_admin() {
        return Decision::Allow;
    }
    if rank_code(target_current) >= actor.rank() {
        return Decision::Deny(DenyReason::RoleEscalation);
    }
    if rank_code(requested) >= actor.rank() {
        return Decision::Deny(DenyReason::RoleEscalation);
    }
    Decision::Allow
}

/// Authorizes moving a subject to another tenant.
///
/// Tenant reassignment is a platform-operator capability; tenant admins stay
/// inside their own tenant no matter what the user management table grants.
#[must_use]
pub fn authorize_tenant_reassignment(actor: Role) -> Decision {
    if actor.is_super_admin() {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::PermissionDenied)
    }
}
