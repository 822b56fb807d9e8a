//! Idempotent host resource primitives (check + apply pattern).
//!
//! Every user, group, directory and permission change the engine needs is
//! expressed as a [`Resource`]: it can report its [`ResourceState`] and, when
//! the state is not [`ResourceState::Correct`], apply the desired state.
pub mod chmod;
pub mod directory;
pub mod error;
pub mod group;
pub mod membership;
pub mod ownership;
pub mod user;

use anyhow::Result;

pub use error::ResourceError;

/// State of a host resource (group, user, directory, …).
///
/// # Examples
///
/// ```
/// use provision_cli::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let wrong = ResourceState::Incorrect { current: "root:root".into() };
/// let skip = ResourceState::Invalid { reason: "path is a regular file".into() };
///
/// assert_ne!(missing, correct);
/// assert_eq!(correct, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist or is not present.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Resource exists but does not match the desired state.
    Incorrect {
        /// The current value of the resource.
        current: String,
    },
    /// Resource cannot be applied (e.g. the target of a chown does not exist).
    Invalid {
        /// Reason why the resource cannot be applied.
        reason: String,
    },
}

/// Result of applying a resource change.
///
/// # Examples
///
/// ```
/// use provision_cli::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let noop = ResourceChange::AlreadyCorrect;
///
/// assert_ne!(applied, noop);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource turned out to be correct already (e.g. `groupadd` reported
    /// the group exists after the state check said it was missing).
    AlreadyCorrect,
}

impl ResourceState {
    /// Whether [`Resource::apply`] should run for a resource in this state.
    ///
    /// [`ResourceState::Invalid`] needs no change: applying it cannot
    /// succeed.
    ///
    /// # Examples
    ///
    /// ```
    /// use provision_cli::resources::ResourceState;
    ///
    /// assert!(ResourceState::Missing.needs_change());
    /// assert!(!ResourceState::Correct.needs_change());
    /// ```
    #[must_use]
    pub const fn needs_change(&self) -> bool {
        matches!(self, Self::Missing | Self::Incorrect { .. })
    }
}

/// Unified interface for host resources that can be checked and applied.
///
/// Callers check [`current_state`](Self::current_state) first and only
/// [`apply`](Self::apply) when [`ResourceState::needs_change`] says so.
pub trait Resource {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource state cannot be determined due to I/O
    /// failures, a query command that cannot be spawned, or unparsable output.
    fn current_state(&self) -> Result<ResourceState>;

    /// Apply the desired state.
    ///
    /// # Errors
    ///
    /// Returns an error (usually a [`ResourceError`]) if the underlying
    /// command or filesystem call fails.
    fn apply(&self) -> Result<ResourceChange>;
}
