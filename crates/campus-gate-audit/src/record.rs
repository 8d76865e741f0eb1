// crates/campus-gate-audit/src/record.rs
// ============================================================================
// Module: Campus Gate Audit Records
// Description: Append-only audit record schema with fixed action semantics.
// Purpose: Denormalize actor identity at write time for durable history.
// Dependencies: campus-gate-core, serde, time, uuid
// ============================================================================

//! ## Overview
//! An [`AuditRecord`] captures one authorization-relevant decision or
//! mutating action: who did what to which entity, with opaque before/after
//! snapshots and the request origin. Actor identity is denormalized at write
//! time so later role changes never rewrite history. `old_value` and
//! `new_value` are opaque serialized payloads; this layer stores and returns
//! exactly what it was given.

// ============================================================================
// SECTION: Imports
// ============================================================================

use campus_gate_core::Principal;
use campus_gate_core::TenantId;
use campus_gate_core::UserId;
use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum user-agent length retained in audit records.
const MAX_USER_AGENT_LENGTH: usize = 500;

// ============================================================================
// SECTION: Severity
// ============================================================================

/// Audit record severity.
///
/// # Invariants
/// - Variants are stable for serialization and query filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Diagnostic detail.
    Debug,
    /// Routine action.
    Info,
    /// Security-relevant or integrity-relevant anomaly.
    Warning,
    /// Operation failure.
    Error,
    /// Incident requiring operator attention.
    Critical,
}

impl Severity {
    /// Returns the stable severity label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }
}

// ============================================================================
// SECTION: Action Types
// ============================================================================

/// Audited action classification.
///
/// # Invariants
/// - Variants are stable for serialization and security-event selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    /// Successful login.
    Login,
    /// Successful logout.
    Logout,
    /// Failed login attempt.
    LoginFailed,
    /// Entity creation.
    Create,
    /// Entity read.
    Read,
    /// Entity update.
    Update,
    /// Entity deletion.
    Delete,
    /// Entity approval.
    Approve,
    /// Entity suspension.
    Suspend,
    /// Detected security violation.
    SecurityViolation,
    /// Blocked cross-tenant access attempt.
    CrossTenantViolation,
}

impl ActionType {
    /// Returns the stable action label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::Logout => "LOGOUT",
            Self::LoginFailed => "LOGIN_FAILED",
            Self::Create => "CREATE",
            Self::Read => "READ",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Approve => "APPROVE",
            Self::Suspend => "SUSPEND",
            Self::SecurityViolation => "SECURITY_VIOLATION",
            Self::CrossTenantViolation => "CROSS_TENANT_VIOLATION",
        }
    }

    /// Returns true for action types that denote a security violation.
    #[must_use]
    pub const fn is_security_violation(self) -> bool {
        matches!(self, Self::SecurityViolation | Self::CrossTenantViolation | Self::LoginFailed)
    }
}

// ============================================================================
// SECTION: Actor and Origin
// ============================================================================

/// Actor identity denormalized into each record at write time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Acting subject, when authenticated.
    pub user_id: Option<UserId>,
    /// Acting subject's email at write time.
    pub user_email: Option<String>,
    /// Acting subject's role code at write time.
    pub user_role: Option<String>,
}

impl Actor {
    /// Denormalizes the acting principal.
    #[must_use]
    pub fn from_principal(principal: &Principal) -> Self {
        Self {
            user_id: Some(principal.subject.clone()),
            user_email: Some(principal.email.clone()),
            user_role: Some(principal.role.as_str().to_string()),
        }
    }

    /// Builds an anonymous actor for pre-authentication events.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Request origin captured alongside each record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOrigin {
    /// Caller network address.
    pub ip_address: Option<String>,
    /// Caller user agent, truncated at capture time.
    pub user_agent: Option<String>,
    /// Request path.
    pub request_path: Option<String>,
    /// Request method.
    pub request_method: Option<String>,
}

impl RequestOrigin {
    /// Captures a request origin, truncating the user agent.
    #[must_use]
    pub fn new(
        ip_address: Option<String>,
        user_agent: Option<String>,
        request_path: Option<String>,
        request_method: Option<String>,
    ) -> Self {
        Self {
            ip_address,
            user_agent: user_agent.map(|agent| {
                agent.chars().take(MAX_USER_AGENT_LENGTH).collect::<String>()
            }),
            request_path,
            request_method,
        }
    }
}

// ============================================================================
// SECTION: Audit Record
// ============================================================================

/// Inputs required to construct an audit record.
pub struct AuditRecordParams {
    /// Tenant context for per-tenant audit scoping.
    pub tenant_id: Option<TenantId>,
    /// Actor identity, denormalized.
    pub actor: Actor,
    /// Audited action classification.
    pub action_type: ActionType,
    /// Affected entity type.
    pub entity_type: String,
    /// Affected entity identifier.
    pub entity_id: Option<String>,
    /// Human-readable entity name.
    pub entity_name: Option<String>,
    /// Opaque serialized previous value.
    pub old_value: Option<String>,
    /// Opaque serialized new value.
    pub new_value: Option<String>,
    /// Free-text summary of the change.
    pub change_summary: Option<String>,
    /// Request origin.
    pub origin: RequestOrigin,
    /// Record severity.
    pub severity: Severity,
}

/// One append-only audit trail entry.
///
/// # Invariants
/// - Created once, never mutated, never deleted.
/// - `log_id` is unique per record; consumers must not assume ordering of
///   ids across concurrent writers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique record identifier.
    pub log_id: String,
    /// Tenant context, when the action was tenant-scoped.
    pub tenant_id: Option<TenantId>,
    /// Actor identity at write time.
    #[serde(flatten)]
    pub actor: Actor,
    /// Audited action classification.
    pub action_type: ActionType,
    /// Affected entity type.
    pub entity_type: String,
    /// Affected entity identifier.
    pub entity_id: Option<String>,
    /// Human-readable entity name.
    pub entity_name: Option<String>,
    /// Opaque serialized previous value.
    pub old_value: Option<String>,
    /// Opaque serialized new value.
    pub new_value: Option<String>,
    /// Free-text summary of the change.
    pub change_summary: Option<String>,
    /// Request origin at write time.
    #[serde(flatten)]
    pub origin: RequestOrigin,
    /// Record severity.
    pub severity: Severity,
    /// Write timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl AuditRecord {
    /// Creates a new record with a fresh id and the current write time.
    #[must_use]
    pub fn new(params: AuditRecordParams) -> Self {
        Self {
            log_id: Uuid::new_v4().to_string(),
            tenant_id: params.tenant_id,
            actor: params.actor,
            action_type: params.action_type,
            entity_type: params.entity_type,
            entity_id: params.entity_id,
            entity_name: params.entity_name,
            old_value: params.old_value,
            new_value: params.new_value,
            change_summary: params.change_summary,
            origin: params.origin,
            severity: params.severity,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Returns true when the record belongs in the security-events view.
    #[must_use]
    pub fn is_security_event(&self) -> bool {
        self.severity >= Severity::Warning || self.action_type.is_security_violation()
    }
}
