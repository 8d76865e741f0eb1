// crates/campus-gate-guard/src/gate.rs
// ============================================================================
// Module: Campus Gate Pipeline
// Description: Request-facing guard calls in fixed pipeline order.
// Purpose: Authenticate, scope, and authorize every request, audited.
// Dependencies: crate::{directory, revocation, tamper}, campus-gate-{audit, config, core, credentials}
// ============================================================================

//! ## Overview
//! The gate composes the pure policy crates into the per-request pipeline:
//! blocklist check, credential verification, tenant scope resolution,
//! permission evaluation. Handlers invoke the guards explicitly at the top of
//! each operation and return early on the first failure.
//!
//! The blocklist is consulted before cryptographic verification so revoked or
//! attacked credentials fail fast, and every revoked/malformed presentation
//! feeds the per-origin anomaly counters. Cross-tenant attempts and
//! tenantless accounts produce WARNING audit events on their way out.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use campus_gate_audit::Actor;
use campus_gate_audit::AuditRecorder;
use campus_gate_audit::AuditSink;
use campus_gate_audit::RequestOrigin;
use campus_gate_audit::Severity;
use campus_gate_config::CampusGateConfig;
use campus_gate_core::Decision;
use campus_gate_core::DenyReason;
use campus_gate_core::Principal;
use campus_gate_core::Role;
use campus_gate_core::TenantContext;
use campus_gate_core::TenantError;
use campus_gate_core::TenantHint;
use campus_gate_core::TenantId;
use campus_gate_core::UserId;
use campus_gate_credentials::CredentialCodec;
use campus_gate_credentials::CredentialError;
use thiserror::Error;

use crate::directory::DirectoryError;
use crate::directory::SubjectDirectory;
use crate::revocation::RevocationStore;
use crate::tamper::TamperMonitor;

// ============================================================================
// SECTION: Session Tokens
// ============================================================================

/// Access/refresh credential pair minted at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTokens {
    /// Short-lived access credential.
    pub access_token: String,
    /// Long-lived refresh credential.
    pub refresh_token: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Refresh pipeline failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    /// The refresh credential itself failed verification.
    #[error(transparent)]
    Credential(#[from] CredentialError),
    /// The subject directory could not be read.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    /// The refresh credential names a subject the directory no longer knows.
    #[error("subject {0} not found")]
    UnknownSubject(UserId),
    /// The directory carries a role code outside the closed role set.
    #[error("directory role code {0} is not a known role")]
    UnknownRole(String),
}

// ============================================================================
// SECTION: Gate
// ============================================================================

/// Request-facing guard pipeline.
#[derive(Clone)]
pub struct Gate {
    /// Credential codec for issuance and verification.
    codec: Arc<CredentialCodec>,
    /// Tamper monitor feeding the reject path.
    monitor: TamperMonitor,
    /// Audit recorder for authorization-relevant decisions.
    recorder: AuditRecorder,
}

impl Gate {
    /// Creates a gate from its collaborators.
    #[must_use]
    pub fn new(codec: CredentialCodec, monitor: TamperMonitor, recorder: AuditRecorder) -> Self {
        Self {
            codec: Arc::new(codec),
            monitor,
            recorder,
        }
    }

    /// Wires a gate from configuration plus the pluggable stores.
    #[must_use]
    pub fn from_config(
        config: &CampusGateConfig,
        store: Arc<dyn RevocationStore>,
        sink: Arc<dyn AuditSink>,
    ) -> Self {
        let recorder = AuditRecorder::new(sink);
        let monitor =
            TamperMonitor::new(store, recorder.clone(), config.security.suspicious_threshold);
        let codec = CredentialCodec::new(
            config.auth.secret.as_bytes(),
            config.auth.access_ttl_secs,
            config.auth.refresh_ttl_secs,
        );
        Self::new(codec, monitor, recorder)
    }

    /// Returns the tamper monitor for direct operator use.
    #[must_use]
    pub const fn monitor(&self) -> &TamperMonitor {
        &self.monitor
    }

    /// Returns the audit recorder shared by the pipeline.
    #[must_use]
    pub const fn recorder(&self) -> &AuditRecorder {
        &self.recorder
    }

    // ------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------

    /// Authenticates a bearer credential into a [`Principal`].
    ///
    /// The revoked set is consulted before cryptographic verification, so a
    /// blocked credential fails fast regardless of its signature. Revoked and
    /// malformed presentations count against the caller's origin; the
    /// counting itself can never fail the request.
    ///
    /// # Errors
    ///
    /// Returns the typed [`CredentialError`] taxonomy: `Missing`,
    /// `Malformed`, `Expired`, `SignatureInvalid`, or `Revoked`.
    pub fn authenticate(
        &self,
        credential: Option<&str>,
        origin: &RequestOrigin,
        now: i64,
    ) -> Result<Principal, CredentialError> {
        let raw = match credential {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Err(CredentialError::Missing),
        };

        if self.monitor.is_blocked(raw) {
            self.note_origin(origin, "BLOCKED_TOKEN_USAGE");
            return Err(CredentialError::Revoked);
        }

        match self.codec.verify_access(raw, now) {
            Ok(principal) => Ok(principal),
            Err(CredentialError::Malformed) => {
                self.note_origin(origin, "MALFORMED_TOKEN");
                Err(CredentialError::Malformed)
            }
            Err(error) => Err(error),
        }
    }

    // ------------------------------------------------------------------
    // Tenant scoping
    // ------------------------------------------------------------------

    /// Resolves the enforceable tenant scope for the request.
    ///
    /// Cross-tenant attempts emit a `CROSS_TENANT_VIOLATION` audit record;
    /// tenantless non-operator accounts emit a WARNING security event, since
    /// such accounts should not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TenantError`] exactly as the core resolver decides it.
    pub fn resolve_tenant(
        &self,
        principal: &Principal,
        hint: &TenantHint,
        origin: &RequestOrigin,
    ) -> Result<TenantContext, TenantError> {
        let requested = hint.resolve();
        match campus_gate_core::resolve_tenant(principal, requested.as_ref()) {
            Ok(context) => Ok(context),
            Err(error) => {
                self.audit_tenant_failure(principal, &error, origin);
                Err(error)
            }
        }
    }

    /// Records the audit trail entry for a tenant scope failure.
    fn audit_tenant_failure(
        &self,
        principal: &Principal,
        error: &TenantError,
        origin: &RequestOrigin,
    ) {
        match error {
            TenantError::CrossTenantDenied { own, requested, .. } => {
                self.recorder.log_cross_tenant_violation(
                    Actor::from_principal(principal),
                    own,
                    requested,
                    origin.clone(),
                );
            }
            TenantError::NoTenantAssociation { subject } => {
                self.recorder.log_security_event(
                    "NO_TENANT_ASSOCIATION",
                    &format!("{{\"user_id\":\"{subject}\",\"role\":\"{}\"}}", principal.role),
                    None,
                    origin.clone(),
                    Severity::Warning,
                );
            }
        }
    }

    // ------------------------------------------------------------------
    // Authorization
    // ------------------------------------------------------------------

    /// Authorizes `action` on `resource`, requiring an authenticated caller.
    #[must_use]
    pub fn authorize(
        &self,
        principal: Option<&Principal>,
        resource: &str,
        action: &str,
    ) -> Decision {
        principal.map_or(Decision::Deny(DenyReason::AuthRequired), |principal| {
            campus_gate_core::authorize(principal, resource, action)
        })
    }

    /// Authorizes a whole-route role gate, requiring an authenticated caller.
    #[must_use]
    pub fn authorize_role_route(
        &self,
        principal: Option<&Principal>,
        allowed_roles: &[Role],
    ) -> Decision {
        principal.map_or(Decision::Deny(DenyReason::AuthRequired), |principal| {
            campus_gate_core::authorize_role_route(principal, allowed_roles)
        })
    }

    /// Authorizes changing another subject's role.
    #[must_use]
    pub fn authorize_role_change(
        &self,
        actor: Option<&Principal>,
        target_current: &str,
        requested: &str,
    ) -> Decision {
        actor.map_or(Decision::Deny(DenyReason::AuthRequired), |actor| {
            campus_gate_core::authorize_role_change(actor.role, target_current, requested)
        })
    }

    /// Gates a mutating operation on the resolved tenant scope.
    ///
    /// Mandatory for every mutating operation: super-admin access to tenant
    /// data is read-only by design, and this check is what enforces it.
    #[must_use]
    pub fn authorize_mutation(&self, context: &TenantContext) -> Decision {
        if context.can_write {
            Decision::Allow
        } else {
            Decision::Deny(DenyReason::PermissionDenied)
        }
    }

    // ------------------------------------------------------------------
    // Credential lifecycle
    // ------------------------------------------------------------------

    /// Mints the access/refresh pair for a freshly authenticated login and
    /// records the LOGIN audit entry.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Encoding`] when claim encoding fails.
    pub fn issue_session(
        &self,
        principal: &Principal,
        origin: &RequestOrigin,
        now: i64,
    ) -> Result<SessionTokens, CredentialError> {
        let access_token = self.codec.issue_access(principal, now)?;
        let refresh_token = self.codec.issue_refresh(&principal.subject, now)?;
        self.recorder.log_login(
            &principal.subject,
            &principal.email,
            principal.tenant_id.as_ref(),
            origin.clone(),
            true,
        );
        Ok(SessionTokens {
            access_token,
            refresh_token,
        })
    }

    /// Records a failed login attempt at WARNING severity.
    pub fn record_failed_login(
        &self,
        subject: &UserId,
        email: &str,
        tenant_id: Option<&TenantId>,
        origin: &RequestOrigin,
    ) -> bool {
        self.recorder.log_login(subject, email, tenant_id, origin.clone(), false)
    }

    /// Exchanges a refresh credential for a fresh access credential.
    ///
    /// Role and tenant are re-derived from the directory at exchange time;
    /// the stale refresh artifact is trusted only for the subject identity.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError`] when the credential is revoked, expired, or
    /// malformed, when the directory is unavailable, or when the subject is
    /// gone or carries an unknown role code.
    pub fn refresh(
        &self,
        refresh_credential: &str,
        directory: &dyn SubjectDirectory,
        now: i64,
    ) -> Result<String, RefreshError> {
        if self.monitor.is_blocked(refresh_credential) {
            return Err(RefreshError::Credential(CredentialError::Revoked));
        }
        let claims = self.codec.verify_refresh(refresh_credential, now)?;
        let subject = UserId::new(claims.sub);
        let record = directory
            .lookup(&subject)?
            .ok_or_else(|| RefreshError::UnknownSubject(subject.clone()))?;
        let role = Role::parse(&record.role_code)
            .ok_or_else(|| RefreshError::UnknownRole(record.role_code.clone()))?;
        let principal = Principal {
            subject: record.subject,
            email: record.email,
            role,
            tenant_id: record.tenant_id,
            permissions: Vec::new(),
        };
        Ok(self.codec.issue_access(&principal, now)?)
    }

    /// Revokes a credential at logout and records the LOGOUT audit entry.
    pub fn revoke(&self, credential: &str, principal: &Principal, origin: &RequestOrigin) -> bool {
        self.monitor.block(credential, "logout");
        self.recorder.log_logout(
            &principal.subject,
            &principal.email,
            principal.tenant_id.as_ref(),
            origin.clone(),
        )
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    /// Counts a suspicious event against the request origin, when known.
    fn note_origin(&self, origin: &RequestOrigin, kind: &str) {
        if let Some(ip) = origin.ip_address.as_deref() {
            self.monitor.note_suspicious(ip, kind);
        }
    }
}
