// crates/campus-gate-core/src/tenant.rs
// ============================================================================
// Module: Campus Gate Tenant Scoping
// Description: Effective-tenant resolution and mandatory query scoping.
// Purpose: Keep one tenant's data invisible to another tenant's users.
// Dependencies: crate::{identifiers, principal}, serde, thiserror
// ============================================================================

//! ## Overview
//! Tenant scoping turns a principal plus the tenant a request addressed into
//! the one tenant the caller may actually operate within. Non-super-admin
//! principals are pinned to their own tenant; any mismatch is a hard failure,
//! never a silent correction. Super admins may address any tenant but only
//! read it.
//!
//! The resolved [`TenantContext`] yields a [`ScopeFilter`] that data-access
//! code must AND into every tenant-scoped query.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::identifiers::TenantId;
use crate::identifiers::UserId;
use crate::principal::Principal;

// ============================================================================
// SECTION: Requested Tenant Discovery
// ============================================================================

/// Tenant identifiers found in the carriers of one request.
///
/// # Invariants
/// - Resolution order is fixed: header, then path, then query, then body.
/// - Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantHint {
    /// Value of the `X-Tenant-ID` header.
    pub header: Option<String>,
    /// `college_id` path parameter.
    pub path_param: Option<String>,
    /// `college_id` query parameter.
    pub query_param: Option<String>,
    /// `college_id` field of a JSON body.
    pub body: Option<String>,
}

impl TenantHint {
    /// Returns the addressed tenant, first non-empty carrier wins.
    #[must_use]
    pub fn resolve(&self) -> Option<TenantId> {
        [&self.header, &self.path_param, &self.query_param, &self.body]
            .into_iter()
            .flatten()
            .find(|value| !value.is_empty())
            .map(|value| TenantId::new(value.clone()))
    }
}

// ============================================================================
// SECTION: Tenant Context
// ============================================================================

/// Enforceable tenant scope for one request.
///
/// # Invariants
/// - For non-super-admin principals `tenant_id` equals the principal's own
///   tenant and `can_write` is true.
/// - For super-admin principals `can_write` is always false; elevated
///   accounts read tenant data but never silently mutate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    /// Effective tenant; `None` means platform-wide super-admin scope.
    pub tenant_id: Option<TenantId>,
    /// Whether the caller is the platform operator.
    pub is_super_admin: bool,
    /// Whether mutating operations are permitted in this scope.
    pub can_write: bool,
}

impl TenantContext {
    /// Returns the mandatory predicate for tenant-scoped queries.
    #[must_use]
    pub fn scope_filter(&self) -> ScopeFilter {
        ScopeFilter {
            tenant_id: self.tenant_id.clone(),
            exclude_deleted: true,
        }
    }
}

// ============================================================================
// SECTION: Scope Filter
// ============================================================================

/// Predicate every tenant-scoped data query must AND in.
///
/// # Invariants
/// - `tenant_id = None` (platform-wide read) occurs only for super-admin
///   contexts that addressed no tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeFilter {
    /// Required tenant equality, or `None` for no tenant restriction.
    pub tenant_id: Option<TenantId>,
    /// Whether soft-deleted rows are excluded.
    pub exclude_deleted: bool,
}

impl ScopeFilter {
    /// Evaluates the predicate against one record.
    #[must_use]
    pub fn matches(&self, record_tenant: Option<&TenantId>, is_deleted: bool) -> bool {
        if self.exclude_deleted && is_deleted {
            return false;
        }
        match &self.tenant_id {
            Some(required) => record_tenant == Some(required),
            None => true,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Tenant scope resolution failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TenantError {
    /// A non-platform account carries no tenant; upstream data integrity bug.
    #[error("account {subject} is not associated with any tenant")]
    NoTenantAssociation {
        /// Subject whose record is missing a tenant.
        subject: UserId,
    },
    /// The request addressed a tenant other than the caller's own.
    #[error("subject {subject} of tenant {own} addressed tenant {requested}")]
    CrossTenantDenied {
        /// Subject that made the request.
        subject: UserId,
        /// The caller's own tenant.
        own: TenantId,
        /// The tenant the request addressed.
        requested: TenantId,
    },
}

impl TenantError {
    /// Returns the stable machine-readable reason code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoTenantAssociation { .. } => "NO_TENANT_ASSOCIATION",
            Self::CrossTenantDenied { .. } => "CROSS_TENANT_DENIED",
        }
    }
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves the enforceable tenant scope for one request.
///
/// Rules, in order: super admins receive the requested tenant (possibly none)
/// read-only; tenantless non-super-admins hard-fail; a requested tenant that
/// differs from the caller's own hard-fails; otherwise the caller operates
/// writable inside its own tenant.
///
/// # Errors
///
/// Returns [`TenantError::NoTenantAssociation`] or
/// [`TenantError::CrossTenantDenied`] as described above.
pub fn resolve_tenant(
    principal: &Principal,
    requested: Option<&TenantId>,
) -> Result<TenantContext, TenantError> {
    let requested = requested.filter(|tenant| !tenant.is_empty());

    if principal.is_super_admin() {
        return Ok(TenantContext {
            tenant_id: requested.cloned(),
            is_super_admin: true,
            can_write: false,
        });
    }

    let Some(own) = principal.tenant_id.as_ref().filter(|tenant| !tenant.is_empty()) else {
        return Err(TenantError::NoTenantAssociation {
            subject: principal.subject.clone(),
        });
    };

    if let Some(requested) = requested
        && requested != own
    {
        return Err(TenantError::CrossTenantDenied {
            subject: principal.subject.clone(),
            own: own.clone(),
            requested: requested.clone(),
        });
    }

    Ok(TenantContext {
        tenant_id: Some(own.clone()),
        is_super_admin: false,
        can_write: true,
    })
}
