//! Top-level subcommand orchestration.
pub mod check;
pub mod converge;
pub mod create_file;
pub mod version;

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::config::{self, Config};
use crate::logging::Log;
use crate::registry::RoleRegistry;

/// Shared state produced by the common command setup sequence.
#[derive(Debug)]
pub struct CommandSetup {
    /// Configuration file that was loaded.
    pub config_path: PathBuf,
    /// The loaded configuration.
    pub config: Config,
    /// Role registry built from the configuration.
    pub registry: RoleRegistry,
}

impl CommandSetup {
    /// Resolve the configuration path, load the configuration, build the
    /// registry, and print validation warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    pub fn init(global: &GlobalOpts, log: &dyn Log) -> Result<Self> {
        let config_path = config::resolve_path(global.config.as_deref());

        log.stage("Loading configuration");
        let config = Config::load(&config_path, global.root.as_deref())
            .with_context(|| format!("loading {}", config_path.display()))?;
        let registry = RoleRegistry::from_config(&config);

        log.debug(&format!("config: {}", config_path.display()));
        log.info(&format!(
            "loaded {} employees, {} directories under {}",
            registry.employees().len(),
            registry.directory_requirements().len(),
            config.company.root.display()
        ));

        let warnings = config.validate();
        if !warnings.is_empty() {
            log.warn(&format!(
                "found {} configuration warning(s):",
                warnings.len()
            ));
            for warning in &warnings {
                log.warn(&format!(
                    "  {} [{}]: {}",
                    warning.source, warning.item, warning.message
                ));
            }
        }

        Ok(Self {
            config_path,
            config,
            registry,
        })
    }
}
