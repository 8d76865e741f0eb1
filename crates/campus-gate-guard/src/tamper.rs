// crates/campus-gate-guard/src/tamper.rs
// ============================================================================
// Module: Campus Gate Tamper Monitor
// Description: Credential blocking and per-origin anomaly tracking.
// Purpose: Feed the resolver's reject path without ever failing a request.
// Dependencies: crate::revocation, campus-gate-audit, campus-gate-credentials
// ============================================================================

//! ## Overview
//! The tamper monitor tracks revoked credentials by one-way fingerprint and
//! counts suspicious behavior per network origin. Crossing the configured
//! count threshold raises a WARNING audit event for operator visibility; it
//! does not itself block future requests from that origin — rate limiting on
//! the signal is a serving-layer policy.
//!
//! Failure semantics: nothing in this module fails the caller's request.
//! Store errors are reported on the fallback channel and swallowed; detection
//! must not become a new failure mode.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Arc;

use campus_gate_audit::AuditRecorder;
use campus_gate_audit::RequestOrigin;
use campus_gate_audit::Severity;
use campus_gate_credentials::fingerprint;
use serde::Serialize;

use crate::revocation::RevocationStore;
use crate::revocation::StoreError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Fingerprint prefix length used in audit details.
const FINGERPRINT_LABEL_LENGTH: usize = 16;

// ============================================================================
// SECTION: Fallback Payload
// ============================================================================

/// Fallback-channel payload for swallowed store failures.
#[derive(Debug, Serialize)]
struct MonitorFallbackEvent {
    /// Event identifier.
    event: &'static str,
    /// Failed operation label.
    operation: &'static str,
    /// Store failure description.
    error: String,
}

/// Reports a swallowed store failure on the fallback channel.
fn report_fallback(operation: &'static str, error: &StoreError) {
    let payload = MonitorFallbackEvent {
        event: "tamper_monitor_fallback",
        operation,
        error: error.to_string(),
    };
    if let Ok(line) = serde_json::to_string(&payload) {
        let _ = writeln!(std::io::stderr(), "{line}");
    }
}

// ============================================================================
// SECTION: Tamper Monitor
// ============================================================================

/// Tracks revoked credentials and suspicious per-origin behavior.
#[derive(Clone)]
pub struct TamperMonitor {
    /// Shared revocation and counter store.
    store: Arc<dyn RevocationStore>,
    /// Audit recorder for security events.
    recorder: AuditRecorder,
    /// Per-origin count at which a WARNING event is raised.
    threshold: u64,
}

impl TamperMonitor {
    /// Creates a monitor over the given store and recorder.
    #[must_use]
    pub fn new(store: Arc<dyn RevocationStore>, recorder: AuditRecorder, threshold: u64) -> Self {
        Self {
            store,
            recorder,
            threshold,
        }
    }

    /// Revokes a credential by fingerprint and emits a WARNING audit event.
    ///
    /// Idempotent: blocking the same credential twice leaves one set entry
    /// and the credential stays blocked.
    pub fn block(&self, credential: &str, reason: &str) {
        let digest = fingerprint(credential);
        if let Err(error) = self.store.add(&digest) {
            report_fallback("add", &error);
            return;
        }
        let label: String = digest.chars().take(FINGERPRINT_LABEL_LENGTH).collect();
        self.recorder.log_security_event(
            "TOKEN_BLOCKED",
            &format!("{{\"reason\":\"{reason}\",\"token_hash\":\"{label}\"}}"),
            None,
            RequestOrigin::default(),
            Severity::Warning,
        );
    }

    /// Returns true when the credential's fingerprint has been revoked.
    ///
    /// A store failure is swallowed and answers `false`; the signature check
    /// still stands between a bad credential and acceptance.
    #[must_use]
    pub fn is_blocked(&self, credential: &str) -> bool {
        match self.store.contains(&fingerprint(credential)) {
            Ok(blocked) => blocked,
            Err(error) => {
                report_fallback("contains", &error);
                false
            }
        }
    }

    /// Records one suspicious event against a network origin.
    ///
    /// Once the origin's count reaches the threshold, every further event
    /// raises a WARNING audit record so sustained probing stays visible.
    pub fn note_suspicious(&self, origin_ip: &str, kind: &str) {
        let count = match self.store.increment(origin_ip, kind) {
            Ok(count) => count,
            Err(error) => {
                report_fallback("increment", &error);
                return;
            }
        };
        if count >= self.threshold {
            self.recorder.log_security_event(
                "ORIGIN_RATE_FLAGGED",
                &format!("{{\"ip\":\"{origin_ip}\",\"count\":{count},\"kind\":\"{kind}\"}}"),
                None,
                RequestOrigin {
                    ip_address: Some(origin_ip.to_string()),
                    ..RequestOrigin::default()
                },
                Severity::Warning,
            );
        }
    }
}
