// crates/campus-gate-credentials/src/codec.rs
// ============================================================================
// Module: Campus Gate Credential Codec
// Description: HS256 issuance and verification for access/refresh credentials.
// Purpose: Provide typed, fail-closed credential checks with explicit clocks.
// Dependencies: crate::claims, campus-gate-core, jsonwebtoken, thiserror
// ============================================================================

//! ## Overview
//! The codec signs and verifies the compact three-segment credentials that
//! stand in for re-authentication on each request. Verification is constant
//! work relative to credential size and never consults stored secrets beyond
//! the single shared signing key.
//!
//! Expiry is checked against the caller-supplied `now` with zero leeway: a
//! credential whose `exp` equals `now` is already expired. Structural
//! failures (wrong segment shape, missing claims, wrong refresh type) map to
//! [`CredentialError::Malformed`]; integrity failures map to
//! [`CredentialError::SignatureInvalid`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashSet;

use campus_gate_core::Principal;
use campus_gate_core::Role;
use campus_gate_core::TenantId;
use campus_gate_core::UserId;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use thiserror::Error;

use crate::claims::AccessClaims;
use crate::claims::REFRESH_TYPE;
use crate::claims::RefreshClaims;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default access credential lifetime, one hour.
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 60 * 60;
/// Default refresh credential lifetime, thirty days.
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 30 * 24 * 60 * 60;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Typed credential failures.
///
/// # Invariants
/// - Every variant maps to one stable reason code; calling layers distinguish
///   "no token" from "expired" from "revoked" without parsing messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// No credential was presented.
    #[error("authentication credential is required")]
    Missing,
    /// The credential has the wrong structural shape or claim set.
    #[error("malformed authentication credential")]
    Malformed,
    /// The credential's expiry is at or before the current time.
    #[error("authentication credential has expired")]
    Expired,
    /// The credential's signature does not verify.
    #[error("authentication credential signature is invalid")]
    SignatureInvalid,
    /// The credential has been revoked.
    #[error("authentication credential has been revoked")]
    Revoked,
    /// The claims could not be encoded at issuance.
    #[error("failed to encode credential: {0}")]
    Encoding(String),
}

impl CredentialError {
    /// Returns the stable machine-readable reason code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Missing => "MISSING",
            Self::Malformed => "MALFORMED",
            Self::Expired => "EXPIRED",
            Self::SignatureInvalid => "SIGNATURE_INVALID",
            Self::Revoked => "REVOKED",
            Self::Encoding(_) => "ENCODING_FAILED",
        }
    }
}

// ============================================================================
// SECTION: Codec
// ============================================================================

/// Issues and verifies signed credentials with a shared HS256 secret.
pub struct CredentialCodec {
    /// Signing key for issuance.
    encoding: EncodingKey,
    /// Verification key; same secret as `encoding`.
    decoding: DecodingKey,
    /// Access credential lifetime in seconds.
    access_ttl_secs: i64,
    /// Refresh credential lifetime in seconds.
    refresh_ttl_secs: i64,
}

impl CredentialCodec {
    /// Builds a codec with explicit lifetimes.
    #[must_use]
    pub fn new(secret: &[u8], access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    /// Builds a codec with the default one-hour / thirty-day lifetimes.
    #[must_use]
    pub fn with_default_lifetimes(secret: &[u8]) -> Self {
        Self::new(secret, DEFAULT_ACCESS_TTL_SECS, DEFAULT_REFRESH_TTL_SECS)
    }

    /// Returns the configured access credential lifetime in seconds.
    #[must_use]
    pub const fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_secs
    }

    /// Issues an access credential for the principal.
    ///
    /// The claim set is exactly `sub`, `email`, `college_id` (empty sentinel),
    /// `role`, `iat`, `exp`.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Encoding`] when claim serialization fails.
    pub fn issue_access(&self, principal: &Principal, now: i64) -> Result<String, CredentialError> {
        let claims = AccessClaims {
            sub: principal.subject.as_str().to_string(),
            email: principal.email.clone(),
            college_id: principal
                .tenant_id
                .as_ref()
                .map_or_else(String::new, |tenant| tenant.as_str().to_string()),
            role: principal.role.as_str().to_string(),
            iat: now,
            exp: now + self.access_ttl_secs,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| CredentialError::Encoding(err.to_string()))
    }

    /// Issues a refresh credential for the subject.
    ///
    /// Refresh credentials carry no role or tenant claims.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Encoding`] when claim serialization fails.
    pub fn issue_refresh(&self, subject: &UserId, now: i64) -> Result<String, CredentialError> {
        let claims = RefreshClaims {
            sub: subject.as_str().to_string(),
            token_type: REFRESH_TYPE.to_string(),
            iat: now,
            exp: now + self.refresh_ttl_secs,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| CredentialError::Encoding(err.to_string()))
    }

    /// Verifies an access credential and reconstructs the principal.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Malformed`], [`CredentialError::Expired`],
    /// or [`CredentialError::SignatureInvalid`] per the credential taxonomy.
    pub fn verify_access(&self, credential: &str, now: i64) -> Result<Principal, CredentialError> {
        let claims: AccessClaims = self.decode_claims(credential)?;
        if claims.exp <= now {
            return Err(CredentialError::Expired);
        }
        if claims.sub.is_empty() {
            return Err(CredentialError::Malformed);
        }
        let role = Role::parse(&claims.role).ok_or(CredentialError::Malformed)?;
        let tenant_id = if claims.college_id.is_empty() {
            None
        } else {
            Some(TenantId::new(claims.college_id))
        };
        Ok(Principal {
            subject: UserId::new(claims.sub),
            email: claims.email,
            role,
            tenant_id,
            permissions: Vec::new(),
        })
    }

    /// Verifies a refresh credential and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Malformed`] when the type discriminator is
    /// not `refresh`, plus the shared credential taxonomy.
    pub fn verify_refresh(
        &self,
        credential: &str,
        now: i64,
    ) -> Result<RefreshClaims, CredentialError> {
        let claims: RefreshClaims = self.decode_claims(credential)?;
        if claims.token_type != REFRESH_TYPE {
            return Err(CredentialError::Malformed);
        }
        if claims.exp <= now {
            return Err(CredentialError::Expired);
        }
        if claims.sub.is_empty() {
            return Err(CredentialError::Malformed);
        }
        Ok(claims)
    }

    /// Decodes and signature-checks a credential without expiry validation.
    ///
    /// Expiry is checked by the callers against their explicit clock; the
    /// library's wall-clock validation stays disabled.
    fn decode_claims<T: serde::de::DeserializeOwned>(
        &self,
        credential: &str,
    ) -> Result<T, CredentialError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();
        decode::<T>(credential, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    CredentialError::SignatureInvalid
                }
                ErrorKind::ExpiredSignature => CredentialError::Expired,
                _ => CredentialError::Malformed,
            })
    }
}
