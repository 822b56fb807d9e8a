//! Company directory creation via `mkdir -p`.
use anyhow::Result;
use std::path::PathBuf;

use super::{Resource, ResourceChange, ResourceError, ResourceState};
use crate::exec::Executor;

/// A directory that must exist, created together with any missing parents.
///
/// Creation goes through the executor so that a sudo-wrapped executor
/// creates directories with the same privileges as every other change.
#[derive(Debug)]
pub struct DirectoryResource<'a> {
    /// Absolute directory path.
    pub path: PathBuf,
    executor: &'a dyn Executor,
}

impl<'a> DirectoryResource<'a> {
    /// Create a new directory resource.
    #[must_use]
    pub const fn new(path: PathBuf, executor: &'a dyn Executor) -> Self {
        Self { path, executor }
    }
}

impl Resource for DirectoryResource<'_> {
    fn description(&self) -> String {
        format!("directory {}", self.path.display())
    }

    fn current_state(&self) -> Result<ResourceState> {
        if self.path.is_dir() {
            Ok(ResourceState::Correct)
        } else if self.path.exists() {
            Ok(ResourceState::Invalid {
                reason: format!("{} exists and is not a directory", self.path.display()),
            })
        } else {
            Ok(ResourceState::Missing)
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        let path = self.path.to_string_lossy();
        let result = self.executor.run_unchecked("mkdir", &["-p", &path])?;
        if !result.success {
            return Err(ResourceError::from_exec("mkdir", &result).into());
        }
        Ok(ResourceChange::Applied)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::exec::{SudoExecutor, SystemExecutor};
    use crate::resources::test_helpers::{MockExecutor, MockResponse};

    #[test]
    fn missing_directory_is_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let executor = MockExecutor::with_responses(vec![]);
        let resource = DirectoryResource::new(temp_dir.path().join("Legal"), &executor);
        assert_eq!(resource.current_state().unwrap(), ResourceState::Missing);
        assert_eq!(executor.call_count(), 0);
    }

    #[test]
    fn apply_runs_mkdir_with_parents() {
        let executor = MockExecutor::ok("");
        let resource = DirectoryResource::new(PathBuf::from("/srv/company/Legal"), &executor);
        assert_eq!(resource.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(executor.calls(), vec!["mkdir -p /srv/company/Legal"]);
    }

    #[test]
    fn apply_under_sudo_is_prefixed() {
        let mock = MockExecutor::ok("");
        let sudo = SudoExecutor::new(&mock);
        let resource = DirectoryResource::new(PathBuf::from("/srv/company/Legal"), &sudo);
        assert_eq!(resource.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(mock.calls(), vec!["sudo mkdir -p /srv/company/Legal"]);
    }

    #[test]
    #[cfg(unix)]
    fn apply_creates_parents_on_disk() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("company").join("Contract-Documents");
        let resource = DirectoryResource::new(path.clone(), &SystemExecutor);

        assert_eq!(resource.apply().unwrap(), ResourceChange::Applied);
        assert!(path.is_dir());
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
    }

    #[test]
    fn regular_file_is_invalid() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("Employee-Data");
        std::fs::write(&path, "not a dir").unwrap();

        let executor = MockExecutor::with_responses(vec![]);
        let resource = DirectoryResource::new(path, &executor);
        assert!(matches!(
            resource.current_state().unwrap(),
            ResourceState::Invalid { .. }
        ));
    }

    #[test]
    fn mkdir_denied_is_privilege_error() {
        let executor = MockExecutor::with_responses(vec![MockResponse::fail(
            1,
            "mkdir: cannot create directory '/srv/company': Permission denied",
        )]);
        let resource = DirectoryResource::new(PathBuf::from("/srv/company/Legal"), &executor);
        let err = resource.apply().unwrap_err();
        let typed = err.downcast_ref::<ResourceError>().unwrap();
        assert!(typed.is_privilege_error());
    }
}
