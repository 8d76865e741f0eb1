// crates/campus-gate-credentials/src/claims.rs
// ============================================================================
// Module: Campus Gate Credential Claims
// Description: Wire-level claim schemas for access and refresh credentials.
// Purpose: Fix the normative claim sets so interop stays bit-stable.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Access credentials embed exactly `sub`, `email`, `college_id` (empty-string
//! sentinel for none), `role`, `iat`, and `exp`. Refresh credentials embed
//! `sub`, `type=refresh`, `iat`, and `exp` and never carry role or tenant
//! claims. Deserialization failures of either shape are structural
//! (`MALFORMED`) even when the signature verifies.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Type discriminator carried by refresh credentials.
pub const REFRESH_TYPE: &str = "refresh";

// ============================================================================
// SECTION: Claim Schemas
// ============================================================================

/// Claims of an access credential.
///
/// # Invariants
/// - `college_id` uses the empty string as the "no tenant" sentinel.
/// - `iat` and `exp` are unix epoch seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject identifier.
    pub sub: String,
    /// Subject email.
    pub email: String,
    /// Home tenant identifier, empty when the subject has none.
    pub college_id: String,
    /// Role code at issuance time.
    pub role: String,
    /// Issued-at, unix epoch seconds.
    pub iat: i64,
    /// Expiry, unix epoch seconds.
    pub exp: i64,
}

/// Claims of a refresh credential.
///
/// # Invariants
/// - Never carries role or tenant claims; those are re-derived at refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject identifier.
    pub sub: String,
    /// Fixed type discriminator, always [`REFRESH_TYPE`].
    #[serde(rename = "type")]
    pub token_type: String,
    /// Issued-at, unix epoch seconds.
    pub iat: i64,
    /// Expiry, unix epoch seconds.
    pub exp: i64,
}
