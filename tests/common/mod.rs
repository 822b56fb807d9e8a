// Shared helpers for integration tests.
//
// Provides a temporary company configuration, a quiet logger, and a fluent
// builder so each integration test can set up an isolated environment
// without repeating TOML boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use provision_cli::config::Config;
use provision_cli::engine::{self, ConvergenceReport, EngineSettings};
use provision_cli::gateway::IdentityGateway;
use provision_cli::logging::{Log, PassStatus};
use provision_cli::registry::RoleRegistry;

/// The sample company shipped in `conf/company.toml`.
pub const SAMPLE_CONFIG: &str = include_str!("../../conf/company.toml");

/// [`Log`] that keeps every line in memory instead of printing.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryLog {
    /// Every logged line as `<level> <message>`.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("log lock").clone()
    }

    fn push(&self, level: &str, msg: &str) {
        self.lines
            .lock()
            .expect("log lock")
            .push(format!("{level} {msg}"));
    }
}

impl Log for MemoryLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn record_pass(&self, name: &str, status: PassStatus, message: Option<&str>) {
        self.push("pass", &format!("{name} {status:?} {}", message.unwrap_or("")));
    }
}

/// A loaded company: configuration, registry and engine settings.
pub struct Company {
    /// The parsed file.
    pub config: Config,
    /// Registry built from `config`.
    pub registry: RoleRegistry,
    /// Engine settings derived from `config`.
    pub settings: EngineSettings,
}

impl Company {
    /// Parse `toml` as a company configuration.
    pub fn parse(toml: &str) -> Self {
        Self::from_config(
            Config::parse(toml, Path::new("company.toml"), None).expect("parse company config"),
        )
    }

    /// The sample company from `conf/company.toml`.
    pub fn sample() -> Self {
        Self::parse(SAMPLE_CONFIG)
    }

    fn from_config(config: Config) -> Self {
        let registry = RoleRegistry::from_config(&config);
        let settings = config.engine_settings();
        Self {
            config,
            registry,
            settings,
        }
    }

    /// Run the engine against `gateway`, discarding log output.
    pub fn converge(&self, gateway: &dyn IdentityGateway) -> ConvergenceReport {
        engine::converge(&self.settings, &self.registry, gateway, &MemoryLog::default())
    }

    /// Path of the company directory `name`.
    pub fn dir(&self, name: &str) -> PathBuf {
        self.settings
            .directory_path(name)
            .expect("directory name inside the company root")
    }
}

/// Fluent builder for small company configurations.
///
/// Defaults to root `/srv/company`, privileged employee `B` in role `CEO`
/// and administrator role `System-Administrator`.
pub struct CompanyBuilder {
    root: String,
    privileged_employee: String,
    privileged_role: String,
    admin_role: String,
    employees: Vec<(String, String)>,
    directories: Vec<(String, String)>,
}

impl CompanyBuilder {
    /// Begin building an empty company.
    pub fn new() -> Self {
        Self {
            root: "/srv/company".to_string(),
            privileged_employee: "B".to_string(),
            privileged_role: "CEO".to_string(),
            admin_role: "System-Administrator".to_string(),
            employees: Vec::new(),
            directories: Vec::new(),
        }
    }

    /// Use `root` as the company root.
    pub fn root(mut self, root: &Path) -> Self {
        self.root = root.display().to_string();
        self
    }

    /// Declare the privileged employee and role.
    pub fn privileged(mut self, employee: &str, role: &str) -> Self {
        self.privileged_employee = employee.to_string();
        self.privileged_role = role.to_string();
        self
    }

    /// Declare an employee.
    pub fn employee(mut self, name: &str, role: &str) -> Self {
        self.employees.push((name.to_string(), role.to_string()));
        self
    }

    /// Declare a company directory.
    pub fn directory(mut self, name: &str, role: &str) -> Self {
        self.directories.push((name.to_string(), role.to_string()));
        self
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> String {
        let mut toml = format!(
            "[company]\nroot = {:?}\nprivileged_employee = {:?}\nprivileged_role = {:?}\nadmin_role = {:?}\n",
            self.root, self.privileged_employee, self.privileged_role, self.admin_role
        );
        for (name, role) in &self.employees {
            toml.push_str(&format!("\n[[employees]]\nname = {name:?}\nrole = {role:?}\n"));
        }
        for (name, role) in &self.directories {
            toml.push_str(&format!("\n[[directories]]\nname = {name:?}\nrole = {role:?}\n"));
        }
        toml
    }

    /// Write the configuration to `dir/company.toml` and return its path.
    pub fn write_to(&self, dir: &Path) -> PathBuf {
        let path = dir.join("company.toml");
        std::fs::write(&path, self.to_toml()).expect("write company.toml");
        path
    }

    /// Finish building and load the company.
    pub fn build(self) -> Company {
        Company::parse(&self.to_toml())
    }
}
