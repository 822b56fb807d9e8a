//! System identity gateway: the only component that touches the host.
//!
//! The convergence engine talks to the host exclusively through
//! [`IdentityGateway`].  Every request returns an [`Outcome`] instead of an
//! error, and "already exists / already correct" is reported as
//! [`Outcome::AlreadySatisfied`], which is what makes a second run a no-op.
//!
//! - [`SystemGateway`] drives the real host via [`crate::resources`].
//! - [`InMemoryGateway`] models a host in memory for tests and previews.
mod memory;
mod outcome;
mod system;

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::registry::{EmployeeId, RoleId};

pub use memory::{DirectoryState, GatewayCall, InMemoryGateway};
pub use outcome::{Outcome, SkipReason, StepFailure};
pub use system::SystemGateway;

/// A privileged host operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// `groupadd`.
    CreateGroup,
    /// `useradd -m -G`.
    CreateUser,
    /// `usermod -aG`.
    AddGroupMember,
    /// Recursive directory creation.
    CreateDirectory,
    /// `chown owner:group`.
    SetOwnership,
    /// `chmod`.
    SetPermissionMode,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CreateGroup => "create group",
            Self::CreateUser => "create user",
            Self::AddGroupMember => "add group member",
            Self::CreateDirectory => "create directory",
            Self::SetOwnership => "set ownership",
            Self::SetPermissionMode => "set permission mode",
        };
        f.write_str(name)
    }
}

/// Privileged group, user and filesystem mutations.
///
/// Implementations must report pre-existing correct state as
/// [`Outcome::AlreadySatisfied`] and must never panic or return early on a
/// failed request: each call is independent.
pub trait IdentityGateway: fmt::Debug {
    /// Ensure a group named after `group` exists.
    fn create_group(&self, group: &RoleId) -> Outcome;

    /// Ensure `user` exists with a home directory and membership in
    /// `primary_group`.
    fn create_user(&self, user: &EmployeeId, primary_group: &RoleId) -> Outcome;

    /// Ensure `user` is a (secondary) member of `group`.
    fn add_group_member(&self, user: &EmployeeId, group: &RoleId) -> Outcome;

    /// Ensure `path` exists as a directory, creating parents as needed.
    fn create_directory(&self, path: &Path) -> Outcome;

    /// Ensure `path` is owned by `owner:group`.
    fn set_ownership(&self, path: &Path, owner: &EmployeeId, group: &RoleId) -> Outcome;

    /// Ensure the permission bits of `path` equal `mode`.
    fn set_permission_mode(&self, path: &Path, mode: u32) -> Outcome;
}
