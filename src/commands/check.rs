//! Command: validate the configuration and preview the directory layout.
use anyhow::Result;

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::engine::{self, ProvisionedDirectory};
use crate::exec::{Executor, SystemExecutor};
use crate::logging::Logger;

/// Host programs the system gateway relies on.
pub const REQUIRED_TOOLS: &[&str] = &[
    "getent", "id", "stat", "groupadd", "useradd", "usermod", "mkdir", "chown", "chmod",
];

/// Run the `check` command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or a required
/// host program is missing.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;

    log.stage("Planned directories");
    let settings = setup.config.engine_settings();
    for directory in engine::plan(&settings, &setup.registry) {
        let line = describe(&directory);
        if directory.path.is_none() {
            log.error(&line);
        } else if directory.owner.is_some() {
            log.info(&line);
        } else {
            log.warn(&line);
        }
    }

    log.stage("Checking host tools");
    let missing = missing_tools(&SystemExecutor, setup.config.company.use_sudo);
    for tool in &missing {
        log.error(&format!("{tool} not found on PATH"));
    }
    if !missing.is_empty() {
        anyhow::bail!("missing required tools: {}", missing.join(", "));
    }
    log.info(&format!("all {} tools found", REQUIRED_TOOLS.len()));
    Ok(())
}

/// One line of the planned layout, e.g.
/// `/Kodecamp-Stores/Contract-Documents  Julius:Legal  770`.
#[must_use]
pub fn describe(directory: &ProvisionedDirectory) -> String {
    let Some(path) = &directory.path else {
        return format!(
            "{:?}  (not a single path component; will not be provisioned)",
            directory.name
        );
    };
    let path = path.display();
    match (&directory.owner, directory.tier) {
        (Some(owner), Some(tier)) => format!("{path}  {owner}:{}  {tier}", directory.group),
        _ => format!(
            "{path}  (no employee holds {}; ownership not assigned)",
            directory.group
        ),
    }
}

/// Required programs that `executor` cannot find.
#[must_use]
pub fn missing_tools(executor: &dyn Executor, use_sudo: bool) -> Vec<&'static str> {
    let sudo: &[&'static str] = if use_sudo { &["sudo"] } else { &[] };
    REQUIRED_TOOLS
        .iter()
        .chain(sudo)
        .copied()
        .filter(|tool| !executor.which(tool))
        .collect()
}
