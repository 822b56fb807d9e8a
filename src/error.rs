//! Error types raised outside the convergence core.
//!
//! The engine and the gateways never return errors: every step ends in an
//! [`Outcome`](crate::gateway::Outcome).  Errors only arise before a run
//! starts (loading the configuration) and in the `create-file` command.
//! Command handlers convert them to [`anyhow::Error`] with `?`.
//!
//! ```text
//! ConfigError      TOML loading and required-field checks
//! CreateFileError  request checks of the create-file command
//! ```

use thiserror::Error;

/// Errors that arise from loading the company configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path that was looked up.
        path: String,
    },

    /// An I/O error occurred while reading the configuration file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not match the expected layout.
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        /// Path to the file that could not be parsed.
        path: String,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// `company.root` is a relative path.
    #[error("company root must be an absolute path, got '{0}'")]
    RootNotAbsolute(String),

    /// A required setting is empty.
    #[error("required setting '{0}' is empty")]
    EmptyField(&'static str),
}

/// Errors that arise from a `create-file` request.
#[derive(Error, Debug)]
pub enum CreateFileError {
    /// The directory is not one of the configured company directories.
    #[error("'{0}' is not a configured company directory")]
    UnknownDirectory(String),

    /// The file name is empty or not a single path component.
    #[error("invalid file name '{0}': expected a single path component")]
    InvalidFileName(String),

    /// The configured directory name does not denote a child of the
    /// company root.
    #[error("directory '{0}' is not a single path component under the company root")]
    OutsideRoot(String),

    /// The company directory has not been provisioned yet.
    #[error("directory {0} does not exist; run `provision converge` first")]
    DirectoryMissing(String),
}
