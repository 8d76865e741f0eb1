// crates/campus-gate-guard/src/directory.rs
// ============================================================================
// Module: Campus Gate Subject Directory
// Description: Collaborator seam for fresh subject lookups at refresh time.
// Purpose: Re-derive role and tenant from the store, never from stale claims.
// Dependencies: campus-gate-core, thiserror
// ============================================================================

//! ## Overview
//! Refresh credentials carry only the subject. Role and tenant can change
//! between issuance and use, so the refresh path re-reads them through this
//! seam instead of trusting the thirty-day-old artifact. The persistence
//! layer implements the trait; tests use small in-crate fakes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use campus_gate_core::TenantId;
use campus_gate_core::UserId;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Subject directory failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// The directory could not be reached.
    #[error("subject directory unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// SECTION: Subject Records
// ============================================================================

/// Current directory state for one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectRecord {
    /// Subject identifier.
    pub subject: UserId,
    /// Current email.
    pub email: String,
    /// Current role code as stored by the directory.
    pub role_code: String,
    /// Current home tenant, when the subject belongs to one.
    pub tenant_id: Option<TenantId>,
}

// ============================================================================
// SECTION: Directory Contract
// ============================================================================

/// Read-only subject lookup used by the refresh path.
pub trait SubjectDirectory: Send + Sync {
    /// Returns the subject's current record, or `None` when unknown.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the directory cannot be read.
    fn lookup(&self, subject: &UserId) -> Result<Option<SubjectRecord>, DirectoryError>;
}
