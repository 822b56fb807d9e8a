//! Command: converge the host to the configured role map.
use anyhow::Result;

use super::CommandSetup;
use crate::cli::{ConvergeOpts, GlobalOpts, OutputFormat};
use crate::engine::{self, ConvergenceReport};
use crate::exec::{Executor, SudoExecutor, SystemExecutor};
use crate::gateway::{IdentityGateway, SystemGateway};
use crate::logging::{Log, Logger};

/// Run the `converge` command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, the report cannot
/// be serialized, or any step failed.
pub fn run(global: &GlobalOpts, opts: &ConvergeOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;

    let system = SystemExecutor;
    let sudo = SudoExecutor::new(&system);
    let executor: &dyn Executor = if setup.config.company.use_sudo {
        log.debug("running host commands through sudo");
        &sudo
    } else {
        &system
    };
    let gateway = SystemGateway::new(executor);

    let report = converge_with(&setup, &gateway, log);

    match opts.format {
        OutputFormat::Text => log.print_summary(),
        OutputFormat::Json => println!("{}", render_json(&report)?),
    }

    ensure_no_failures(&report)
}

/// Run the engine for a loaded setup against `gateway`.
#[must_use]
pub fn converge_with(
    setup: &CommandSetup,
    gateway: &dyn IdentityGateway,
    log: &dyn Log,
) -> ConvergenceReport {
    let settings = setup.config.engine_settings();
    engine::converge(&settings, &setup.registry, gateway, log)
}

/// Serialize a report as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(report: &ConvergenceReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Turn failed steps into a command error.
///
/// Skipped ownership is not an error: it was already reported as a warning.
///
/// # Errors
///
/// Returns an error naming the number of failed steps, if any.
pub fn ensure_no_failures(report: &ConvergenceReport) -> Result<()> {
    let count = report.failures().count();
    if count > 0 {
        anyhow::bail!("{count} step(s) failed");
    }
    Ok(())
}
