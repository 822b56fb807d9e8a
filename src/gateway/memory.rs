//! In-memory host for tests and previews.
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{IdentityGateway, Operation, Outcome, StepFailure};
use crate::registry::{EmployeeId, RoleId};

/// Mode given to directories created by [`InMemoryGateway`].
const DEFAULT_DIRECTORY_MODE: u32 = 0o755;

/// A directory as seen by [`InMemoryGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryState {
    /// `owner:group`, or `None` while still owned by the creator.
    pub ownership: Option<(EmployeeId, RoleId)>,
    /// Permission bits.
    pub mode: u32,
}

/// One request received by [`InMemoryGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCall {
    /// Requested operation.
    pub operation: Operation,
    /// Main subject: group name, user name or path.
    pub subject: String,
}

#[derive(Debug, Default)]
struct Host {
    groups: BTreeSet<RoleId>,
    users: BTreeMap<EmployeeId, BTreeSet<RoleId>>,
    directories: BTreeMap<PathBuf, DirectoryState>,
}

/// [`IdentityGateway`] over an in-memory host.
///
/// Follows the same already-satisfied rules as the real host: repeated
/// requests for the same group, user, membership, directory, ownership or
/// mode report [`Outcome::AlreadySatisfied`].  Pre-existing state can be
/// seeded with the `with_*` builders, and [`fail_on`](Self::fail_on) forces a
/// particular request to fail.
///
/// # Examples
///
/// ```
/// use provision_cli::gateway::{IdentityGateway, InMemoryGateway, Outcome};
///
/// let gateway = InMemoryGateway::new().with_group("Legal");
/// assert_eq!(gateway.create_group(&"Legal".into()), Outcome::AlreadySatisfied);
/// assert_eq!(gateway.create_group(&"HR".into()), Outcome::Applied);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    host: Mutex<Host>,
    calls: Mutex<Vec<GatewayCall>>,
    failures: HashMap<(Operation, String), StepFailure>,
}

impl InMemoryGateway {
    /// An empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing group.
    #[must_use]
    pub fn with_group(self, group: &str) -> Self {
        self.lock_host().groups.insert(RoleId::new(group));
        self
    }

    /// Seed an existing user belonging to `groups`.
    #[must_use]
    pub fn with_user(self, user: &str, groups: &[&str]) -> Self {
        self.lock_host().users.insert(
            EmployeeId::new(user),
            groups.iter().copied().map(RoleId::new).collect(),
        );
        self
    }

    /// Seed an existing directory.
    #[must_use]
    pub fn with_directory(self, path: impl Into<PathBuf>, mode: u32) -> Self {
        self.lock_host().directories.insert(
            path.into(),
            DirectoryState {
                ownership: None,
                mode,
            },
        );
        self
    }

    /// Make every `operation` request on `subject` fail with `failure`.
    ///
    /// `subject` is the group name for group creation and membership, the
    /// user name for user creation, and the path for directory operations.
    #[must_use]
    pub fn fail_on(mut self, operation: Operation, subject: &str, failure: StepFailure) -> Self {
        self.failures
            .insert((operation, subject.to_string()), failure);
        self
    }

    /// Whether `group` exists.
    #[must_use]
    pub fn has_group(&self, group: &RoleId) -> bool {
        self.lock_host().groups.contains(group)
    }

    /// Whether `user` exists.
    #[must_use]
    pub fn has_user(&self, user: &EmployeeId) -> bool {
        self.lock_host().users.contains_key(user)
    }

    /// Whether `user` belongs to `group`.
    #[must_use]
    pub fn is_member(&self, user: &EmployeeId, group: &RoleId) -> bool {
        self.lock_host()
            .users
            .get(user)
            .is_some_and(|groups| groups.contains(group))
    }

    /// State of the directory at `path`, if it exists.
    #[must_use]
    pub fn directory(&self, path: &Path) -> Option<DirectoryState> {
        self.lock_host().directories.get(path).cloned()
    }

    /// Every request received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn lock_host(&self) -> MutexGuard<'_, Host> {
        self.host.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the call and return the injected failure, if any.
    fn record(&self, operation: Operation, subject: String) -> Option<Outcome> {
        let injected = self
            .failures
            .get(&(operation, subject.clone()))
            .cloned()
            .map(Outcome::failed);
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(GatewayCall { operation, subject });
        injected
    }
}

impl IdentityGateway for InMemoryGateway {
    fn create_group(&self, group: &RoleId) -> Outcome {
        if let Some(failed) = self.record(Operation::CreateGroup, group.to_string()) {
            return failed;
        }
        if self.lock_host().groups.insert(group.clone()) {
            Outcome::Applied
        } else {
            Outcome::AlreadySatisfied
        }
    }

    fn create_user(&self, user: &EmployeeId, primary_group: &RoleId) -> Outcome {
        if let Some(failed) = self.record(Operation::CreateUser, user.to_string()) {
            return failed;
        }
        let mut host = self.lock_host();
        if !host.groups.contains(primary_group) {
            return Outcome::failed(StepFailure::ExternalCommandFailure {
                detail: format!("group '{primary_group}' does not exist"),
            });
        }
        let groups = host.users.entry(user.clone()).or_default();
        if groups.insert(primary_group.clone()) {
            Outcome::Applied
        } else {
            Outcome::AlreadySatisfied
        }
    }

    fn add_group_member(&self, user: &EmployeeId, group: &RoleId) -> Outcome {
        if let Some(failed) = self.record(Operation::AddGroupMember, group.to_string()) {
            return failed;
        }
        let mut host = self.lock_host();
        if !host.groups.contains(group) {
            return Outcome::failed(StepFailure::ExternalCommandFailure {
                detail: format!("group '{group}' does not exist"),
            });
        }
        match host.users.get_mut(user) {
            None => Outcome::failed(StepFailure::InvalidTarget {
                reason: format!("user {user} does not exist"),
            }),
            Some(groups) => {
                if groups.insert(group.clone()) {
                    Outcome::Applied
                } else {
                    Outcome::AlreadySatisfied
                }
            }
        }
    }

    fn create_directory(&self, path: &Path) -> Outcome {
        if let Some(failed) = self.record(Operation::CreateDirectory, path.display().to_string())
        {
            return failed;
        }
        let mut host = self.lock_host();
        if host.directories.contains_key(path) {
            return Outcome::AlreadySatisfied;
        }
        host.directories.insert(
            path.to_path_buf(),
            DirectoryState {
                ownership: None,
                mode: DEFAULT_DIRECTORY_MODE,
            },
        );
        Outcome::Applied
    }

    fn set_ownership(&self, path: &Path, owner: &EmployeeId, group: &RoleId) -> Outcome {
        if let Some(failed) = self.record(Operation::SetOwnership, path.display().to_string()) {
            return failed;
        }
        let mut host = self.lock_host();
        if !host.users.contains_key(owner) {
            return Outcome::failed(StepFailure::ExternalCommandFailure {
                detail: format!("invalid user: '{owner}:{group}'"),
            });
        }
        if !host.groups.contains(group) {
            return Outcome::failed(StepFailure::ExternalCommandFailure {
                detail: format!("invalid group: '{owner}:{group}'"),
            });
        }
        let Some(directory) = host.directories.get_mut(path) else {
            return Outcome::failed(StepFailure::InvalidTarget {
                reason: format!("target does not exist: {}", path.display()),
            });
        };
        let wanted = (owner.clone(), group.clone());
        if directory.ownership.as_ref() == Some(&wanted) {
            return Outcome::AlreadySatisfied;
        }
        directory.ownership = Some(wanted);
        Outcome::Applied
    }

    fn set_permission_mode(&self, path: &Path, mode: u32) -> Outcome {
        if let Some(failed) =
            self.record(Operation::SetPermissionMode, path.display().to_string())
        {
            return failed;
        }
        let mut host = self.lock_host();
        let Some(directory) = host.directories.get_mut(path) else {
            return Outcome::failed(StepFailure::InvalidTarget {
                reason: format!("target does not exist: {}", path.display()),
            });
        };
        if directory.mode == mode {
            return Outcome::AlreadySatisfied;
        }
        directory.mode = mode;
        Outcome::Applied
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn user_requires_existing_group() {
        let gateway = InMemoryGateway::new();
        assert!(
            gateway
                .create_user(&"Julius".into(), &"Legal".into())
                .is_failure()
        );
        assert!(!gateway.has_user(&"Julius".into()));
    }

    #[test]
    fn seeded_user_in_group_is_already_satisfied() {
        let gateway = InMemoryGateway::new()
            .with_group("Legal")
            .with_user("Julius", &["Legal"]);
        assert_eq!(
            gateway.create_user(&"Julius".into(), &"Legal".into()),
            Outcome::AlreadySatisfied
        );
    }

    #[test]
    fn seeded_user_outside_group_gets_membership() {
        let gateway = InMemoryGateway::new()
            .with_group("Legal")
            .with_user("Julius", &[]);
        assert_eq!(
            gateway.create_user(&"Julius".into(), &"Legal".into()),
            Outcome::Applied
        );
        assert!(gateway.is_member(&"Julius".into(), &"Legal".into()));
    }

    #[test]
    fn membership_for_unknown_user_is_invalid_target() {
        let gateway = InMemoryGateway::new().with_group("Legal");
        assert!(matches!(
            gateway.add_group_member(&"Bach".into(), &"Legal".into()),
            Outcome::Failed {
                error: StepFailure::InvalidTarget { .. }
            }
        ));
    }

    #[test]
    fn membership_is_added_once() {
        let gateway = InMemoryGateway::new()
            .with_group("Legal")
            .with_user("Bach", &["CEO"]);
        assert_eq!(
            gateway.add_group_member(&"Bach".into(), &"Legal".into()),
            Outcome::Applied
        );
        assert!(gateway.is_member(&"Bach".into(), &"Legal".into()));
        assert_eq!(
            gateway.add_group_member(&"Bach".into(), &"Legal".into()),
            Outcome::AlreadySatisfied
        );
    }

    #[test]
    fn ownership_and_mode_are_idempotent() {
        let gateway = InMemoryGateway::new()
            .with_group("Legal")
            .with_user("Julius", &["Legal"])
            .with_directory("/c/Legal", 0o755);
        let path = Path::new("/c/Legal");

        assert_eq!(
            gateway.set_ownership(path, &"Julius".into(), &"Legal".into()),
            Outcome::Applied
        );
        assert_eq!(
            gateway.set_ownership(path, &"Julius".into(), &"Legal".into()),
            Outcome::AlreadySatisfied
        );
        assert_eq!(gateway.set_permission_mode(path, 0o770), Outcome::Applied);
        assert_eq!(
            gateway.set_permission_mode(path, 0o770),
            Outcome::AlreadySatisfied
        );
        assert_eq!(gateway.directory(path).unwrap().mode, 0o770);
    }

    #[test]
    fn injected_failure_is_returned_and_recorded() {
        let gateway = InMemoryGateway::new().fail_on(
            Operation::CreateGroup,
            "Legal",
            StepFailure::PrivilegeDenied {
                detail: "cannot lock /etc/group".to_string(),
            },
        );
        assert!(gateway.create_group(&"Legal".into()).is_failure());
        assert!(!gateway.has_group(&"Legal".into()));
        assert_eq!(
            gateway.calls(),
            vec![GatewayCall {
                operation: Operation::CreateGroup,
                subject: "Legal".to_string(),
            }]
        );
    }
}
