//! Directory permission policy.
//!
//! Every company directory is closed to "others" except the privileged
//! employee's own directory in the privileged role, which others may read.
use std::fmt;

use serde::Serialize;

use crate::registry::{EmployeeId, RoleId};

/// The employee/role pair that receives cross-role membership and the
/// elevated permission tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivilegedIdentity {
    /// Privileged employee (e.g. the CEO's account).
    pub employee: EmployeeId,
    /// Role the privileged employee holds (e.g. `CEO`).
    pub role: RoleId,
}

/// Permission tier of a provisioned directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionTier {
    /// `rwxrwx---`: owner and group only.
    Standard,
    /// `rwxrwxr--`: owner and group, read-only for others.
    Elevated,
}

impl PermissionTier {
    /// Numeric permission bits for this tier.
    #[must_use]
    pub const fn mode(self) -> u32 {
        match self {
            Self::Standard => 0o770,
            Self::Elevated => 0o774,
        }
    }
}

impl fmt::Display for PermissionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:o}", self.mode())
    }
}

/// Decide the permission tier for a directory owned by `owner` in `role`.
#[must_use]
pub fn permission_tier(
    role: &RoleId,
    owner: &EmployeeId,
    privileged: &PrivilegedIdentity,
) -> PermissionTier {
    if role == &privileged.role && owner == &privileged.employee {
        PermissionTier::Elevated
    } else {
        PermissionTier::Standard
    }
}
