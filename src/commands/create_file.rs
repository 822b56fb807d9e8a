//! Command: create a file inside a provisioned company directory.
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::CommandSetup;
use crate::cli::{CreateFileOpts, GlobalOpts};
use crate::engine::{EngineSettings, is_single_component};
use crate::error::CreateFileError;
use crate::logging::Logger;
use crate::registry::RoleRegistry;

/// Content written to every new file.
pub const NEW_FILE_CONTENT: &str = "This is a new file.\n";

/// Run the `create-file` command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, the request is
/// invalid, or the file cannot be written.
pub fn run(global: &GlobalOpts, opts: &CreateFileOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let settings = setup.config.engine_settings();

    log.stage("Creating file");
    let path = create_file(&settings, &setup.registry, &opts.directory, &opts.name)?;
    log.info(&format!("created {}", path.display()));
    Ok(())
}

/// Write [`NEW_FILE_CONTENT`] to `<company_root>/<directory>/<name>`,
/// replacing any existing file.
///
/// # Errors
///
/// Returns an error if `directory` is not configured or not yet created,
/// `name` is not a single path component, or the write fails.
pub fn create_file(
    settings: &EngineSettings,
    registry: &RoleRegistry,
    directory: &str,
    name: &str,
) -> Result<PathBuf> {
    if !registry
        .directory_requirements()
        .iter()
        .any(|d| d.directory_name == directory)
    {
        return Err(CreateFileError::UnknownDirectory(directory.to_string()).into());
    }
    if !is_single_component(name) {
        return Err(CreateFileError::InvalidFileName(name.to_string()).into());
    }

    let dir = settings
        .directory_path(directory)
        .ok_or_else(|| CreateFileError::OutsideRoot(directory.to_string()))?;
    if !dir.is_dir() {
        return Err(CreateFileError::DirectoryMissing(dir.display().to_string()).into());
    }

    let path = dir.join(name);
    std::fs::write(&path, NEW_FILE_CONTENT)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
