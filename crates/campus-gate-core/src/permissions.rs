// crates/campus-gate-core/src/permissions.rs
// ============================================================================
// Module: Campus Gate Permission Table
// Description: Static (role, resource) to action-set policy table.
// Purpose: Enumerate allowed actions per role with a super-admin bypass.
// Dependencies: crate::roles
// ============================================================================

//! ## Overview
//! The permission table is static policy data loaded into the binary at
//! compile time. Every other component consults it through [`permits`] rather
//! than re-encoding role logic. Lookups fail closed: an unknown resource or an
//! action missing from the entry denies.
//!
//! Security posture: `SUPER_ADMIN` passes every check by explicit bypass, not
//! by table membership, so table edits can never lock the operator out.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::roles::Role;

// ============================================================================
// SECTION: Table Data
// ============================================================================

/// Returns the action set granted to a role on a resource.
///
/// The table mirrors the reference policy: tenant administrators hold full
/// CRUD inside their tenant, faculty and staff hold self/assigned reads, and
/// students hold self reads only.
#[must_use]
pub fn resource_actions(role: Role, resource: &str) -> &'static [&'static str] {
    match role {
        Role::SuperAdmin => match resource {
            "colleges" => &["create", "read", "update", "delete", "approve", "suspend"],
            "users" => &["create", "read", "update", "delete", "deactivate"],
            "faculty" | "students" | "schedules" | "classes" => {
                &["create", "read", "update", "delete"]
            }
            "results" => &["create", "read", "update", "delete", "upload"],
            "qna" => &["read", "approve", "admin"],
            "analytics" => &["read_all", "export"],
            "audit" => &["read_all"],
            _ => &[],
        },
        Role::CollegeAdmin => match resource {
            "colleges" => &["read_own"],
            "users" => &["create", "read", "update"],
            "faculty" | "students" | "schedules" | "classes" => {
                &["create", "read", "update", "delete"]
            }
            "results" => &["create", "read", "update", "delete", "upload"],
            "qna" => &["read", "approve"],
            "analytics" => &["read_own", "export_own"],
            "audit" => &["read_own"],
            _ => &[],
        },
        Role::Faculty => match resource {
            "users" => &["read_own"],
            "faculty" => &["read_own", "update_own"],
            "students" | "schedules" | "results" | "classes" => &["read_assigned"],
            "qna" => &["read", "respond"],
            _ => &[],
        },
        Role::Staff => match resource {
            "users" => &["read_own", "update_own"],
            "students" | "schedules" | "results" | "classes" => &["read_assigned"],
            "qna" => &["read"],
            _ => &[],
        },
        Role::Student => match resource {
            "users" => &["read_own", "update_own"],
            "faculty" => &["read_public"],
            "students" | "schedules" | "results" | "classes" => &["read_own"],
            "qna" => &["read"],
            _ => &[],
        },
    }
}

// ============================================================================
// SECTION: Lookup
// ============================================================================

/// Returns true when `role` may perform `action` on `resource`.
///
/// # Invariants
/// - `SUPER_ADMIN` is always allowed regardless of table contents.
/// - Unknown resources and unlisted actions deny.
#[must_use]
pub fn permits(role: Role, resource: &str, action: &str) -> bool {
    if role.is_super_admin() {
        return true;
    }
    resource_actions(role, resource).contains(&action)
}
