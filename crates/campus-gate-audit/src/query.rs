// crates/campus-gate-audit/src/query.rs
// ============================================================================
// Module: Campus Gate Audit Queries
// Description: Access-controlled read paths over the audit trail.
// Purpose: Scope audit visibility per role and tenant.
// Dependencies: crate::{record, sink}, campus-gate-core, thiserror, time
// ============================================================================

//! ## Overview
//! Audit records are queryable only through these access-controlled paths.
//! Students, staff, and faculty are denied outright; tenant admins see only
//! their own tenant regardless of requested filters; the platform operator
//! sees everything unless filters narrow the view. The security-events view
//! is operator-only and surfaces anomalies regardless of tenant.

// ============================================================================
// SECTION: Imports
// ============================================================================

use campus_gate_core::Principal;
use campus_gate_core::Role;
use campus_gate_core::TenantId;
use campus_gate_core::UserId;
use thiserror::Error;
use time::Duration;
use time::OffsetDateTime;

use crate::record::ActionType;
use crate::record::AuditRecord;
use crate::record::Severity;
use crate::sink::AuditStore;
use crate::sink::SinkError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default page size for audit queries.
pub const DEFAULT_PER_PAGE: usize = 50;
/// Default security-events window in days.
pub const DEFAULT_SECURITY_WINDOW_DAYS: i64 = 7;
/// Default result cap for the security-events and login-history views.
pub const DEFAULT_EVENT_LIMIT: usize = 50;

// ============================================================================
// SECTION: Filters and Pages
// ============================================================================

/// Optional filters for audit queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFilter {
    /// Restrict to one action type.
    pub action_type: Option<ActionType>,
    /// Restrict to one entity type.
    pub entity_type: Option<String>,
    /// Restrict to one severity.
    pub severity: Option<Severity>,
    /// Restrict to one tenant. Ignored for tenant admins, who are always
    /// pinned to their own tenant.
    pub tenant_id: Option<TenantId>,
    /// Inclusive lower bound on write time.
    pub from: Option<OffsetDateTime>,
    /// Inclusive upper bound on write time.
    pub to: Option<OffsetDateTime>,
}

impl AuditFilter {
    /// Evaluates the filter against one record.
    fn matches(&self, record: &AuditRecord) -> bool {
        if let Some(action) = self.action_type
            && record.action_type != action
        {
            return false;
        }
        if let Some(entity) = &self.entity_type
            && &record.entity_type != entity
        {
            return false;
        }
        if let Some(severity) = self.severity
            && record.severity != severity
        {
            return false;
        }
        if let Some(tenant) = &self.tenant_id
            && record.tenant_id.as_ref() != Some(tenant)
        {
            return false;
        }
        if let Some(from) = self.from
            && record.created_at < from
        {
            return false;
        }
        if let Some(to) = self.to
            && record.created_at > to
        {
            return false;
        }
        true
    }
}

/// Pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// One-based page number.
    pub page: usize,
    /// Records per page.
    pub per_page: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of audit records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditPage {
    /// Records on this page, newest first.
    pub items: Vec<AuditRecord>,
    /// Total matching records.
    pub total: usize,
    /// One-based page number.
    pub page: usize,
    /// Records per page.
    pub per_page: usize,
    /// Total pages.
    pub pages: usize,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Audit query failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditQueryError {
    /// The caller's role has no access to the requested records.
    #[error("access to audit records is denied")]
    AccessDenied,
    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] SinkError),
}

// ============================================================================
// SECTION: Query Paths
// ============================================================================

/// Queries the audit trail with role-based scoping.
///
/// # Errors
///
/// Returns [`AuditQueryError::AccessDenied`] for student/staff/faculty
/// callers and for tenant admins with no tenant of their own, or a store
/// error when the trail cannot be read.
pub fn query(
    store: &dyn AuditStore,
    caller: &Principal,
    mut filter: AuditFilter,
    page: Page,
) -> Result<AuditPage, AuditQueryError> {
    match caller.role {
        Role::Student | Role::Staff | Role::Faculty => return Err(AuditQueryError::AccessDenied),
        Role::CollegeAdmin => {
            // Tenant admins are pinned to their own tenant no matter what
            // filters the request carried.
            let Some(own) = caller.tenant_id.clone() else {
                return Err(AuditQueryError::AccessDenied);
            };
            filter.tenant_id = Some(own);
        }
        Role::SuperAdmin => {}
    }

    let mut records: Vec<AuditRecord> =
        store.fetch()?.into_iter().filter(|record| filter.matches(record)).collect();
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let total = records.len();
    let per_page = page.per_page.max(1);
    let current = page.page.max(1);
    let pages = total.div_ceil(per_page);
    let items = records.into_iter().skip((current - 1) * per_page).take(per_page).collect();

    Ok(AuditPage {
        items,
        total,
        page: current,
        per_page,
        pages,
    })
}

/// Returns the operator-only security-events view for a time window.
///
/// Selects records flagged WARNING or above plus every action type denoting a
/// security violation, newest first, capped at `limit`.
///
/// # Errors
///
/// Returns [`AuditQueryError::AccessDenied`] for non-operator callers, or a
/// store error when the trail cannot be read.
pub fn security_events(
    store: &dyn AuditStore,
    caller: &Principal,
    from: Option<OffsetDateTime>,
    to: Option<OffsetDateTime>,
    limit: Option<usize>,
) -> Result<Vec<AuditRecord>, AuditQueryError> {
    if caller.role != Role::SuperAdmin {
        return Err(AuditQueryError::AccessDenied);
    }

    let to = to.unwrap_or_else(OffsetDateTime::now_utc);
    let from = from.unwrap_or_else(|| to - Duration::days(DEFAULT_SECURITY_WINDOW_DAYS));
    let limit = limit.unwrap_or(DEFAULT_EVENT_LIMIT);

    let mut events: Vec<AuditRecord> = store
        .fetch()?
        .into_iter()
        .filter(|record| {
            record.is_security_event() && record.created_at >= from && record.created_at <= to
        })
        .collect();
    events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    events.truncate(limit);
    Ok(events)
}

/// Returns the login history for one subject.
///
/// Students, staff, and faculty may read only their own history; admins may
/// read anyone's.
///
/// # Errors
///
/// Returns [`AuditQueryError::AccessDenied`] when a non-admin asks for
/// another subject's history, or a store error when the trail cannot be read.
pub fn login_history(
    store: &dyn AuditStore,
    caller: &Principal,
    subject: &UserId,
    limit: Option<usize>,
) -> Result<Vec<AuditRecord>, AuditQueryError> {
    match caller.role {
        Role::Student | Role::Staff | Role::Faculty if !caller.is_self(subject) => {
            return Err(AuditQueryError::AccessDenied);
        }
        _ => {}
    }

    let limit = limit.unwrap_or(DEFAULT_EVENT_LIMIT);
    let mut history: Vec<AuditRecord> = store
        .fetch()?
        .into_iter()
        .filter(|record| {
            matches!(
                record.action_type,
                ActionType::Login | ActionType::LoginFailed | ActionType::Logout
            ) && record.actor.user_id.as_ref() == Some(subject)
        })
        .collect();
    history.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    history.truncate(limit);
    Ok(history)
}
