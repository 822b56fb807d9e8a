//! Company configuration: the people, the directories, and run settings.
//!
//! The configuration is a single TOML file:
//!
//! ```toml
//! [company]
//! root = "/Kodecamp-Stores"
//! privileged_employee = "Bach"
//! privileged_role = "CEO"
//! admin_role = "System-Administrator"
//!
//! [[employees]]
//! name = "Julius"
//! role = "Legal"
//!
//! [[directories]]
//! name = "Contract-Documents"
//! role = "Legal"
//! ```
//!
//! Arrays of tables keep their declaration order, which decides directory
//! ownership when several employees share a role.
pub mod toml_loader;
pub mod validation;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::engine::EngineSettings;
use crate::error::ConfigError;
use crate::policy::PrivilegedIdentity;
use crate::registry::{EmployeeId, RoleId};

/// Configuration file used when neither `--config` nor
/// [`CONFIG_ENV_VAR`] is given.
pub const DEFAULT_CONFIG_PATH: &str = "conf/company.toml";

/// Environment variable overriding [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_ENV_VAR: &str = "PROVISION_CONFIG";

/// The `[company]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompanySettings {
    /// Absolute directory under which company directories are created.
    pub root: PathBuf,
    /// Employee added to every non-administrative role group.
    pub privileged_employee: String,
    /// Role the privileged employee is expected to hold.
    pub privileged_role: String,
    /// Role excluded from privilege escalation.
    pub admin_role: String,
    /// Prefix host commands with `sudo`.
    #[serde(default)]
    pub use_sudo: bool,
}

/// One `[[employees]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmployeeEntry {
    /// Employee and OS user name.
    pub name: String,
    /// Role and OS group name.
    pub role: String,
}

/// One `[[directories]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryEntry {
    /// Directory name relative to the company root.
    pub name: String,
    /// Role whose group owns the directory.
    pub role: String,
}

/// A loaded company configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Run settings.
    pub company: CompanySettings,
    /// Employees in declaration order.
    #[serde(default)]
    pub employees: Vec<EmployeeEntry>,
    /// Company directories in declaration order.
    #[serde(default)]
    pub directories: Vec<DirectoryEntry>,
}

impl Config {
    /// Load the configuration at `path`, optionally replacing the company
    /// root, and check the required settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if the company
    /// root is not absolute, or if a required setting is empty.
    pub fn load(path: &Path, root_override: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = toml_loader::load_config(path)?;
        tracing::debug!(
            path = %path.display(),
            employees = config.employees.len(),
            directories = config.directories.len(),
            "parsed company file"
        );
        config.finish(root_override)
    }

    /// Parse a configuration from TOML text; `origin` names it in errors.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`], except for file access.
    pub fn parse(
        content: &str,
        origin: &Path,
        root_override: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let config: Self = toml_loader::parse_config(content, origin)?;
        config.finish(root_override)
    }

    fn finish(mut self, root_override: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(root) = root_override {
            self.company.root = root.to_path_buf();
        }
        self.check_required()?;
        Ok(self)
    }

    fn check_required(&self) -> Result<(), ConfigError> {
        let company = &self.company;
        if company.root.as_os_str().is_empty() {
            return Err(ConfigError::EmptyField("company.root"));
        }
        if !company.root.is_absolute() {
            return Err(ConfigError::RootNotAbsolute(
                company.root.display().to_string(),
            ));
        }
        let required = [
            ("company.privileged_employee", &company.privileged_employee),
            ("company.privileged_role", &company.privileged_role),
            ("company.admin_role", &company.admin_role),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField(field));
            }
        }
        Ok(())
    }

    /// Run all validators; see [`validation::validate_all`].
    #[must_use]
    pub fn validate(&self) -> Vec<validation::ValidationWarning> {
        validation::validate_all(self)
    }

    /// Settings for the convergence engine.
    #[must_use]
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            company_root: self.company.root.clone(),
            privileged: PrivilegedIdentity {
                employee: EmployeeId::new(&self.company.privileged_employee),
                role: RoleId::new(&self.company.privileged_role),
            },
            admin_role: RoleId::new(&self.company.admin_role),
        }
    }
}

/// Resolve the configuration path: the explicit flag, then
/// [`CONFIG_ENV_VAR`], then [`DEFAULT_CONFIG_PATH`].
#[must_use]
pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(
        || {
            std::env::var_os(CONFIG_ENV_VAR)
                .filter(|v| !v.is_empty())
                .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
        },
        Path::to_path_buf,
    )
}
