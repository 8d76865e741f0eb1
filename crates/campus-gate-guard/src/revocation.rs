// crates/campus-gate-guard/src/revocation.rs
// ============================================================================
// Module: Campus Gate Revocation Store
// Description: Pluggable store for revoked credentials and origin counters.
// Purpose: Let single-process and shared-cache deployments share one contract.
// Dependencies: thiserror, time
// ============================================================================

//! ## Overview
//! The revoked-credential set and the suspicious-activity counters are the
//! only shared mutable state in the authorization core. They sit behind a
//! narrow key-value contract — `add`, `contains`, `increment` — so an
//! in-process set and an external shared cache satisfy the same trait. A
//! multi-process deployment must use a shared backend: a credential revoked
//! on one instance must be rejected by all.
//!
//! Entries are never pruned here; retention is an external policy.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Mutex;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Revocation store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing store could not be reached or its lock is poisoned.
    #[error("revocation store unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// SECTION: Store Contract
// ============================================================================

/// Narrow contract over the revocation set and origin counters.
pub trait RevocationStore: Send + Sync {
    /// Adds a credential fingerprint to the revoked set. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store cannot be written.
    fn add(&self, fingerprint: &str) -> Result<(), StoreError>;

    /// Returns true when the fingerprint has been revoked.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store cannot be read.
    fn contains(&self, fingerprint: &str) -> Result<bool, StoreError>;

    /// Increments an origin's suspicious-activity counter and returns the
    /// new count.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store cannot be written.
    fn increment(&self, origin: &str, kind: &str) -> Result<u64, StoreError>;
}

// ============================================================================
// SECTION: Origin Activity
// ============================================================================

/// Suspicious-activity bookkeeping for one origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginActivity {
    /// Total suspicious events observed from the origin.
    pub count: u64,
    /// Timestamped activity kinds, oldest first.
    pub activities: Vec<ActivityEntry>,
    /// When the origin was first observed.
    #[serde(with = "time::serde::rfc3339")]
    pub first_seen: OffsetDateTime,
}

/// One recorded suspicious event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Activity kind label.
    pub kind: String,
    /// Observation time.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Mutex-guarded in-memory store for single-process deployments and tests.
#[derive(Debug, Default)]
pub struct InMemoryRevocationStore {
    /// Revoked credential fingerprints.
    revoked: Mutex<BTreeSet<String>>,
    /// Per-origin suspicious-activity bookkeeping.
    origins: Mutex<BTreeMap<String, OriginActivity>>,
}

impl InMemoryRevocationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded activity for an origin, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the store lock is poisoned.
    pub fn activity(&self, origin: &str) -> Result<Option<OriginActivity>, StoreError> {
        self.origins
            .lock()
            .map(|origins| origins.get(origin).cloned())
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }

    /// Returns the number of revoked fingerprints.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the store lock is poisoned.
    pub fn revoked_len(&self) -> Result<usize, StoreError> {
        self.revoked
            .lock()
            .map(|revoked| revoked.len())
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }
}

impl RevocationStore for InMemoryRevocationStore {
    fn add(&self, fingerprint: &str) -> Result<(), StoreError> {
        self.revoked
            .lock()
            .map(|mut revoked| {
                revoked.insert(fingerprint.to_string());
            })
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }

    fn contains(&self, fingerprint: &str) -> Result<bool, StoreError> {
        self.revoked
            .lock()
            .map(|revoked| revoked.contains(fingerprint))
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }

    fn increment(&self, origin: &str, kind: &str) -> Result<u64, StoreError> {
        let now = OffsetDateTime::now_utc();
        self.origins
            .lock()
            .map(|mut origins| {
                let activity = origins.entry(origin.to_string()).or_insert_with(|| OriginActivity {
                    count: 0,
                    activities: Vec::new(),
                    first_seen: now,
                });
                activity.count += 1;
                activity.activities.push(ActivityEntry {
                    kind: kind.to_string(),
                    timestamp: now,
                });
                activity.count
            })
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }
}
