// crates/campus-gate-audit/src/recorder.rs
// ============================================================================
// Module: Campus Gate Audit Recorder
// Description: Fail-soft recording front end over any audit sink.
// Purpose: Keep audit best-effort without becoming a request failure mode.
// Dependencies: crate::{record, sink}, serde_json
// ============================================================================

//! ## Overview
//! The recorder wraps a sink with the fail-soft write policy: a failed append
//! is reported on a fallback channel and surfaced as `false`, and the
//! triggering business operation proceeds. It also owns the fixed semantics
//! of the first-class login/logout/security events.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Arc;

use campus_gate_core::TenantId;
use campus_gate_core::UserId;
use serde::Serialize;

use crate::record::ActionType;
use crate::record::Actor;
use crate::record::AuditRecord;
use crate::record::AuditRecordParams;
use crate::record::RequestOrigin;
use crate::record::Severity;
use crate::sink::AuditSink;
use crate::sink::SinkError;

// ============================================================================
// SECTION: Fallback Payload
// ============================================================================

/// Fallback-channel payload emitted when an append fails.
#[derive(Debug, Serialize)]
struct AuditFallbackEvent<'a> {
    /// Event identifier.
    event: &'static str,
    /// Sink failure description.
    error: String,
    /// Identifier of the record that could not be written.
    log_id: &'a str,
    /// Action label of the dropped record.
    action_type: &'static str,
}

/// Reports a dropped record on the fallback channel.
///
/// Operators must be able to see silent audit degradation; the fallback write
/// itself is best-effort and may not fail the caller either.
fn report_fallback(record: &AuditRecord, error: &SinkError) {
    let payload = AuditFallbackEvent {
        event: "audit_fallback",
        error: error.to_string(),
        log_id: &record.log_id,
        action_type: record.action_type.as_str(),
    };
    if let Ok(line) = serde_json::to_string(&payload) {
        let _ = writeln!(std::io::stderr(), "{line}");
    }
}

// ============================================================================
// SECTION: Recorder
// ============================================================================

/// Fail-soft audit recording front end.
#[derive(Clone)]
pub struct AuditRecorder {
    /// Destination sink for appended records.
    sink: Arc<dyn AuditSink>,
}

impl AuditRecorder {
    /// Creates a recorder over the given sink.
    #[must_use]
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self {
            sink,
        }
    }

    /// Records one audit entry.
    ///
    /// Never raises past this boundary: failures land on the fallback channel
    /// and return `false` while the caller's operation proceeds.
    pub fn record(&self, params: AuditRecordParams) -> bool {
        let record = AuditRecord::new(params);
        match self.sink.append(&record) {
            Ok(()) => true,
            Err(error) => {
                report_fallback(&record, &error);
                false
            }
        }
    }

    /// Records a login attempt. Success is INFO; failure is WARNING.
    pub fn log_login(
        &self,
        subject: &UserId,
        email: &str,
        tenant_id: Option<&TenantId>,
        origin: RequestOrigin,
        success: bool,
    ) -> bool {
        self.record(AuditRecordParams {
            tenant_id: tenant_id.cloned(),
            actor: Actor {
                user_id: Some(subject.clone()),
                user_email: Some(email.to_string()),
                user_role: None,
            },
            action_type: if success { ActionType::Login } else { ActionType::LoginFailed },
            entity_type: "session".to_string(),
            entity_id: Some(subject.as_str().to_string()),
            entity_name: Some(email.to_string()),
            old_value: None,
            new_value: None,
            change_summary: Some(
                if success {
                    "User logged in successfully"
                } else {
                    "Login attempt failed"
                }
                .to_string(),
            ),
            origin,
            severity: if success { Severity::Info } else { Severity::Warning },
        })
    }

    /// Records a successful logout at INFO.
    pub fn log_logout(
        &self,
        subject: &UserId,
        email: &str,
        tenant_id: Option<&TenantId>,
        origin: RequestOrigin,
    ) -> bool {
        self.record(AuditRecordParams {
            tenant_id: tenant_id.cloned(),
            actor: Actor {
                user_id: Some(subject.clone()),
                user_email: Some(email.to_string()),
                user_role: None,
            },
            action_type: ActionType::Logout,
            entity_type: "session".to_string(),
            entity_id: Some(subject.as_str().to_string()),
            entity_name: Some(email.to_string()),
            old_value: None,
            new_value: None,
            change_summary: Some("User logged out".to_string()),
            origin,
            severity: Severity::Info,
        })
    }

    /// Records a security event against the `security` entity.
    pub fn log_security_event(
        &self,
        event_type: &str,
        details: &str,
        tenant_id: Option<&TenantId>,
        origin: RequestOrigin,
        severity: Severity,
    ) -> bool {
        let summary: String = format!("{event_type}: {details}").chars().take(120).collect();
        self.record(AuditRecordParams {
            tenant_id: tenant_id.cloned(),
            actor: Actor::anonymous(),
            action_type: ActionType::SecurityViolation,
            entity_type: "security".to_string(),
            entity_id: None,
            entity_name: Some(event_type.to_string()),
            old_value: None,
            new_value: Some(details.to_string()),
            change_summary: Some(summary),
            origin,
            severity,
        })
    }

    /// Records a blocked cross-tenant access attempt at WARNING.
    ///
    /// Cross-tenant attempts get their own action type because they indicate
    /// either a caller bug or an active probe, and operators filter for them.
    pub fn log_cross_tenant_violation(
        &self,
        actor: Actor,
        own_tenant: &TenantId,
        requested_tenant: &TenantId,
        origin: RequestOrigin,
    ) -> bool {
        self.record(AuditRecordParams {
            tenant_id: Some(own_tenant.clone()),
            actor,
            action_type: ActionType::CrossTenantViolation,
            entity_type: "security".to_string(),
            entity_id: None,
            entity_name: Some(requested_tenant.as_str().to_string()),
            old_value: None,
            new_value: None,
            change_summary: Some(format!(
                "Cross-tenant access attempt from tenant {own_tenant} to tenant {requested_tenant}"
            )),
            origin,
            severity: Severity::Warning,
        })
    }
}
