//! Role registry: who holds which role, and which role each directory needs.
//!
//! Employee names double as OS user names and roles double as OS group
//! names.  The two are kept apart as [`EmployeeId`] and [`RoleId`] so that a
//! user name can never be passed where a group name is expected.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Config;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw name.
            #[must_use]
            pub fn new(name: impl Into<String>) -> Self {
                Self(name.into())
            }

            /// The raw name as used by the host.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(name: &str) -> Self {
                Self::new(name)
            }
        }
    };
}

string_id!(
    /// Employee identifier; also the OS user name and home directory name.
    EmployeeId
);

string_id!(
    /// Role identifier; also the OS group name.
    RoleId
);

/// An employee and the single role they hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    /// Unique employee name.
    pub name: EmployeeId,
    /// Role held by the employee.
    pub role: RoleId,
}

/// A company directory and the role that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRequirement {
    /// Directory name relative to the company root.
    pub directory_name: String,
    /// Role whose group owns the directory.
    pub required_role: RoleId,
}

/// Static, ordered mapping of employees to roles and directories to roles.
///
/// Declaration order is preserved everywhere: it decides which employee owns
/// a directory when several share a role, and it fixes the order of report
/// entries and log lines.  Duplicate names keep their first declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleRegistry {
    employees: Vec<Employee>,
    directories: Vec<DirectoryRequirement>,
}

impl RoleRegistry {
    /// Build a registry from ordered `(employee, role)` and
    /// `(directory, role)` pairs.
    #[must_use]
    pub fn new<E, D>(employees: E, directories: D) -> Self
    where
        E: IntoIterator<Item = (EmployeeId, RoleId)>,
        D: IntoIterator<Item = (String, RoleId)>,
    {
        let mut registry = Self::default();
        for (name, role) in employees {
            if !registry.contains_employee(&name) {
                registry.employees.push(Employee { name, role });
            }
        }
        for (directory_name, required_role) in directories {
            if !registry
                .directories
                .iter()
                .any(|d| d.directory_name == directory_name)
            {
                registry.directories.push(DirectoryRequirement {
                    directory_name,
                    required_role,
                });
            }
        }
        registry
    }

    /// Build the registry declared in a loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config
                .employees
                .iter()
                .map(|e| (EmployeeId::new(&e.name), RoleId::new(&e.role))),
            config
                .directories
                .iter()
                .map(|d| (d.name.clone(), RoleId::new(&d.role))),
        )
    }

    /// All employees in declaration order.
    #[must_use]
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// All directory requirements in declaration order.
    #[must_use]
    pub fn directory_requirements(&self) -> &[DirectoryRequirement] {
        &self.directories
    }

    /// Employees holding `role`, in declaration order.
    #[must_use]
    pub fn employees_by_role(&self, role: &RoleId) -> Vec<&EmployeeId> {
        self.employees
            .iter()
            .filter(|e| &e.role == role)
            .map(|e| &e.name)
            .collect()
    }

    /// The first declared employee holding `role`, if any.
    #[must_use]
    pub fn first_employee_for_role(&self, role: &RoleId) -> Option<&EmployeeId> {
        self.employees
            .iter()
            .find(|e| &e.role == role)
            .map(|e| &e.name)
    }

    /// Role held by `employee`, if declared.
    #[must_use]
    pub fn role_of(&self, employee: &EmployeeId) -> Option<&RoleId> {
        self.employees
            .iter()
            .find(|e| &e.name == employee)
            .map(|e| &e.role)
    }

    /// Whether `employee` is declared.
    #[must_use]
    pub fn contains_employee(&self, employee: &EmployeeId) -> bool {
        self.employees.iter().any(|e| &e.name == employee)
    }

    /// Every role mentioned by an employee or a directory, deduplicated in
    /// first-seen order (employees first).
    #[must_use]
    pub fn all_roles(&self) -> Vec<RoleId> {
        let mut roles: Vec<RoleId> = Vec::new();
        let declared = self
            .employees
            .iter()
            .map(|e| &e.role)
            .chain(self.directories.iter().map(|d| &d.required_role));
        for role in declared {
            if !roles.contains(role) {
                roles.push(role.clone());
            }
        }
        roles
    }

    /// Distinct directory roles in declaration order.
    #[must_use]
    pub fn directory_roles(&self) -> Vec<&RoleId> {
        let mut roles: Vec<&RoleId> = Vec::new();
        for requirement in &self.directories {
            if !roles.contains(&&requirement.required_role) {
                roles.push(&requirement.required_role);
            }
        }
        roles
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn registry() -> RoleRegistry {
        RoleRegistry::new(
            [
                ("Andrew".into(), "System-Administrator".into()),
                ("Ogochukwu".into(), "Finance-Manager".into()),
                ("Bach".into(), "CEO".into()),
                ("Ifeoma".into(), "Finance-Manager".into()),
            ],
            [
                ("Finance-Budgets".to_string(), "Finance-Manager".into()),
                ("Marketing-Plans".to_string(), "Marketing".into()),
                ("Vision".to_string(), "CEO".into()),
                ("Forecasts".to_string(), "Finance-Manager".into()),
            ],
        )
    }

    #[test]
    fn employees_by_role_keeps_declaration_order() {
        let registry = registry();
        let names: Vec<&str> = registry
            .employees_by_role(&"Finance-Manager".into())
            .into_iter()
            .map(EmployeeId::as_str)
            .collect();
        assert_eq!(names, vec!["Ogochukwu", "Ifeoma"]);
    }

    #[test]
    fn first_employee_for_role_picks_first_declared() {
        let registry = registry();
        assert_eq!(
            registry.first_employee_for_role(&"Finance-Manager".into()),
            Some(&EmployeeId::new("Ogochukwu"))
        );
    }

    #[test]
    fn first_employee_for_unheld_role_is_none() {
        assert_eq!(registry().first_employee_for_role(&"Marketing".into()), None);
    }

    #[test]
    fn all_roles_unions_employee_and_directory_roles() {
        let roles: Vec<String> = registry()
            .all_roles()
            .into_iter()
            .map(|r| r.to_string())
            .collect();
        assert_eq!(
            roles,
            vec!["System-Administrator", "Finance-Manager", "CEO", "Marketing"]
        );
    }

    #[test]
    fn directory_roles_are_distinct() {
        let registry = registry();
        let roles: Vec<&str> = registry
            .directory_roles()
            .into_iter()
            .map(RoleId::as_str)
            .collect();
        assert_eq!(roles, vec!["Finance-Manager", "Marketing", "CEO"]);
    }

    #[test]
    fn duplicate_names_keep_first_declaration() {
        let registry = RoleRegistry::new(
            [
                ("Ada".into(), "Legal".into()),
                ("Ada".into(), "HR".into()),
            ],
            [
                ("Docs".to_string(), "Legal".into()),
                ("Docs".to_string(), "HR".into()),
            ],
        );
        assert_eq!(registry.employees().len(), 1);
        assert_eq!(registry.role_of(&"Ada".into()), Some(&RoleId::new("Legal")));
        assert_eq!(registry.directory_requirements().len(), 1);
        assert_eq!(
            registry.directory_requirements()[0].required_role,
            RoleId::new("Legal")
        );
    }

    #[test]
    fn ids_display_raw_names() {
        assert_eq!(EmployeeId::new("Bach").to_string(), "Bach");
        assert_eq!(RoleId::new("CEO").to_string(), "CEO");
    }
}
