//! Non-fatal configuration checks.
//!
//! Validators report problems that would not stop a run but would make it
//! surprising: a directory nobody can own, names the shadow tools reject, or
//! a privileged employee that does not exist.
use std::collections::HashSet;

use super::Config;
use crate::engine::is_single_component;

/// Longest user or group name accepted by the shadow tools.
const MAX_OS_NAME_LEN: usize = 32;

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration section (e.g., "employees", "directories").
    pub source: String,
    /// The specific item that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a warning about `item` in section `source`.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

/// Trait for configuration validators.
pub trait ConfigValidator {
    /// Validate the configuration and return any warnings found.
    fn validate(&self, config: &Config) -> Vec<ValidationWarning>;

    /// Return a human-readable name for this validator.
    fn name(&self) -> &'static str;
}

/// Why `name` cannot be used as a user or group name, if it cannot.
///
/// # Examples
///
/// ```
/// use provision_cli::config::validation::os_name_problem;
///
/// assert_eq!(os_name_problem("Finance-Manager"), None);
/// assert!(os_name_problem("-rf").is_some());
/// assert!(os_name_problem("Sales Manager").is_some());
/// ```
#[must_use]
pub fn os_name_problem(name: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        Some("name is empty")
    } else if name.starts_with('-') {
        Some("name starts with '-'")
    } else if name.chars().any(char::is_whitespace) {
        Some("name contains whitespace")
    } else if name.contains(':') || name.contains('/') {
        Some("name contains ':' or '/'")
    } else if name.chars().count() > MAX_OS_NAME_LEN {
        Some("name is longer than 32 characters")
    } else {
        None
    }
}

/// Validator for the `[[employees]]` list.
#[derive(Debug)]
pub struct EmployeeValidator;

impl ConfigValidator for EmployeeValidator {
    fn validate(&self, config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for employee in &config.employees {
            if !seen.insert(employee.name.as_str()) {
                warnings.push(ValidationWarning::new(
                    "employees",
                    &employee.name,
                    "duplicate employee name; the first declaration wins",
                ));
            }
            if let Some(problem) = os_name_problem(&employee.name) {
                warnings.push(ValidationWarning::new(
                    "employees",
                    &employee.name,
                    format!("unusable as a user name: {problem}"),
                ));
            }
            if let Some(problem) = os_name_problem(&employee.role) {
                warnings.push(ValidationWarning::new(
                    "employees",
                    &employee.name,
                    format!("role '{}' unusable as a group name: {problem}", employee.role),
                ));
            }
        }

        warnings
    }

    fn name(&self) -> &'static str {
        "employees"
    }
}

/// Validator for the `[[directories]]` list.
#[derive(Debug)]
pub struct DirectoryValidator;

impl ConfigValidator for DirectoryValidator {
    fn validate(&self, config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for directory in &config.directories {
            if !seen.insert(directory.name.as_str()) {
                warnings.push(ValidationWarning::new(
                    "directories",
                    &directory.name,
                    "duplicate directory name; the first declaration wins",
                ));
            }
            if !is_single_component(&directory.name) {
                warnings.push(ValidationWarning::new(
                    "directories",
                    &directory.name,
                    "directory name must be a single path component; it will not be provisioned",
                ));
            }
            if let Some(problem) = os_name_problem(&directory.role) {
                warnings.push(ValidationWarning::new(
                    "directories",
                    &directory.name,
                    format!("role '{}' unusable as a group name: {problem}", directory.role),
                ));
            }
            if !config.employees.iter().any(|e| e.role == directory.role) {
                warnings.push(ValidationWarning::new(
                    "directories",
                    &directory.name,
                    format!(
                        "no employee holds role '{}'; ownership will not be assigned",
                        directory.role
                    ),
                ));
            }
        }

        warnings
    }

    fn name(&self) -> &'static str {
        "directories"
    }
}

/// Validator for the `[company]` settings against the declared people.
#[derive(Debug)]
pub struct CompanyValidator;

impl ConfigValidator for CompanyValidator {
    fn validate(&self, config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let company = &config.company;

        match config
            .employees
            .iter()
            .find(|e| e.name == company.privileged_employee)
        {
            None => warnings.push(ValidationWarning::new(
                "company",
                &company.privileged_employee,
                "privileged employee is not declared in [[employees]]",
            )),
            Some(employee) if employee.role != company.privileged_role => {
                warnings.push(ValidationWarning::new(
                    "company",
                    &company.privileged_employee,
                    format!(
                        "privileged employee holds '{}', not privileged role '{}'",
                        employee.role, company.privileged_role
                    ),
                ));
            }
            Some(_) => {}
        }

        let admin_used = config.employees.iter().any(|e| e.role == company.admin_role)
            || config.directories.iter().any(|d| d.role == company.admin_role);
        if !admin_used {
            warnings.push(ValidationWarning::new(
                "company",
                &company.admin_role,
                "administrator role is not used by any employee or directory",
            ));
        }

        warnings
    }

    fn name(&self) -> &'static str {
        "company"
    }
}

/// Run all validators against a loaded configuration.
#[must_use]
pub fn validate_all(config: &Config) -> Vec<ValidationWarning> {
    let validators: Vec<Box<dyn ConfigValidator>> = vec![
        Box::new(CompanyValidator),
        Box::new(EmployeeValidator),
        Box::new(DirectoryValidator),
    ];

    let mut all_warnings = Vec::new();
    for validator in validators {
        let warnings = validator.validate(config);
        tracing::trace!(
            validator = validator.name(),
            count = warnings.len(),
            "validated"
        );
        all_warnings.extend(warnings);
    }

    all_warnings
}
