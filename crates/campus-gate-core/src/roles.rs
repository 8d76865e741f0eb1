// crates/campus-gate-core/src/roles.rs
// ============================================================================
// Module: Campus Gate Role Hierarchy
// Description: Closed role enumeration with a total hierarchy order.
// Purpose: Provide the single source of truth for who may manage whom.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Roles form a totally ordered hierarchy; a strictly higher rank may manage a
//! strictly lower one. The set is closed and defined at process start. Role
//! codes arriving as free-form strings (token claims, directory rows) are
//! parsed at the boundary; unknown codes rank as zero and permit nothing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Role Enumeration
// ============================================================================

/// Platform role.
///
/// # Invariants
/// - Variants are stable for serialization and audit labeling.
/// - Ranks are totally ordered; `dominates` is strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Platform operator with unrestricted access.
    SuperAdmin,
    /// Administrator of a single tenant.
    CollegeAdmin,
    /// Teaching member of a tenant.
    Faculty,
    /// Non-teaching member of a tenant.
    Staff,
    /// Enrolled student of a tenant.
    Student,
}

/// All roles in descending rank order.
pub const ALL_ROLES: [Role; 5] =
    [Role::SuperAdmin, Role::CollegeAdmin, Role::Faculty, Role::Staff, Role::Student];

impl Role {
    /// Parses a role code. Unknown codes yield `None`.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "SUPER_ADMIN" => Some(Self::SuperAdmin),
            "COLLEGE_ADMIN" => Some(Self::CollegeAdmin),
            "FACULTY" => Some(Self::Faculty),
            "STAFF" => Some(Self::Staff),
            "STUDENT" => Some(Self::Student),
            _ => None,
        }
    }

    /// Returns the stable role code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::CollegeAdmin => "COLLEGE_ADMIN",
            Self::Faculty => "FACULTY",
            Self::Staff => "STAFF",
            Self::Student => "STUDENT",
        }
    }

    /// Returns the hierarchy level. Higher ranks manage lower ones.
    #[must_use]
    pub const fn rank(self) -> u32 {
        match self {
            Self::SuperAdmin => 100,
            Self::CollegeAdmin => 50,
            Self::Faculty => 10,
            Self::Staff => 5,
            Self::Student => 1,
        }
    }

    /// Returns true for the platform operator role.
    #[must_use]
    pub const fn is_super_admin(self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    /// Returns true when this role strictly outranks `other`.
    #[must_use]
    pub const fn dominates(self, other: Self) -> bool {
        self.rank() > other.rank()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Code-Keyed Helpers
// ============================================================================

/// Returns the hierarchy level for a raw role code.
///
/// Unknown codes rank as zero, so they can never manage any real role and no
/// real role check ever fails open on them.
#[must_use]
pub fn rank_code(code: &str) -> u32 {
    Role::parse(code).map_or(0, Role::rank)
}
