// crates/campus-gate-core/src/identifiers.rs
// ============================================================================
// Module: Campus Gate Identifiers
// Description: Canonical opaque identifiers for tenants and subjects.
// Purpose: Provide strongly typed, serializable IDs with stable string forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the canonical string-based identifiers used throughout
//! Campus Gate. Identifiers are opaque and serialize as strings. Validation is
//! handled at the request or directory boundaries rather than within these
//! simple wrappers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Tenant (college) identifier scoped to Campus Gate decisions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Creates a new tenant identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the identifier is the empty sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for TenantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TenantId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Subject (user) identifier carried by credentials and audit records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new subject identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
