// crates/campus-gate-credentials/src/lib.rs
// ============================================================================
// Module: Campus Gate Credentials Library
// Description: Public API surface for credential issuance and verification.
// Purpose: Expose the token codec, claim schemas, and fingerprinting.
// Dependencies: crate::{claims, codec, fingerprint}
// ============================================================================

//! ## Overview
//! Campus Gate credentials are signed, three-segment compact tokens (HS256).
//! Access credentials carry the full identity claims; refresh credentials
//! carry only the subject and a type discriminator, because role and tenant
//! can change between issuance and use and must be re-derived from the
//! directory at refresh time, never trusted from the stale artifact.
//!
//! The codec never reads the wall clock; callers pass `now` explicitly so
//! expiry is deterministic and testable at the exact boundary.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod claims;
pub mod codec;
pub mod fingerprint;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use claims::AccessClaims;
pub use claims::REFRESH_TYPE;
pub use claims::RefreshClaims;
pub use codec::CredentialCodec;
pub use codec::CredentialError;
pub use codec::DEFAULT_ACCESS_TTL_SECS;
pub use codec::DEFAULT_REFRESH_TTL_SECS;
pub use fingerprint::fingerprint;
