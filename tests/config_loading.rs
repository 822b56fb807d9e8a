#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
//! Integration tests for loading company files and running commands on
//! them.

mod common;

use std::path::{Path, PathBuf};

use common::{CompanyBuilder, MemoryLog, SAMPLE_CONFIG};
use provision_cli::cli::GlobalOpts;
use provision_cli::commands::CommandSetup;
use provision_cli::commands::converge::{converge_with, ensure_no_failures, render_json};
use provision_cli::commands::create_file::{NEW_FILE_CONTENT, create_file};
use provision_cli::config::Config;
use provision_cli::error::ConfigError;
use provision_cli::gateway::InMemoryGateway;

fn opts(config: &Path, root: Option<PathBuf>) -> GlobalOpts {
    GlobalOpts {
        config: Some(config.to_path_buf()),
        root,
    }
}

#[test]
fn sample_config_is_clean() {
    let config = Config::parse(SAMPLE_CONFIG, Path::new("conf/company.toml"), None).unwrap();
    assert_eq!(config.employees.len(), 8);
    assert_eq!(config.directories.len(), 7);
    assert!(config.company.use_sudo);
    assert!(config.validate().is_empty(), "{:?}", config.validate());
}

#[test]
fn missing_file_is_reported() {
    let temp = tempfile::tempdir().unwrap();
    let err = Config::load(&temp.path().join("company.toml"), None).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }));
}

#[test]
fn setup_loads_written_file_with_root_override() {
    let temp = tempfile::tempdir().unwrap();
    let path = CompanyBuilder::new()
        .employee("A", "Legal")
        .employee("B", "CEO")
        .directory("Contract-Documents", "Legal")
        .write_to(temp.path());

    let log = MemoryLog::default();
    let setup = CommandSetup::init(&opts(&path, Some(temp.path().join("root"))), &log).unwrap();

    assert_eq!(setup.config_path, path);
    assert_eq!(setup.config.company.root, temp.path().join("root"));
    assert_eq!(setup.registry.employees().len(), 2);
    assert!(
        log.lines()
            .iter()
            .any(|l| l.starts_with("info loaded 2 employees, 1 directories"))
    );
}

#[test]
fn setup_warns_about_unheld_roles() {
    let temp = tempfile::tempdir().unwrap();
    let path = CompanyBuilder::new()
        .employee("B", "CEO")
        .employee("Andrew", "System-Administrator")
        .directory("Marketing-Plans", "Marketing")
        .write_to(temp.path());

    let log = MemoryLog::default();
    CommandSetup::init(&opts(&path, None), &log).unwrap();

    let warnings: Vec<String> = log
        .lines()
        .into_iter()
        .filter(|l| l.starts_with("warn "))
        .collect();
    assert_eq!(warnings.len(), 2, "{warnings:?}");
    assert!(warnings[1].contains("directories [Marketing-Plans]"));
}

#[test]
fn setup_rejects_relative_root() {
    let temp = tempfile::tempdir().unwrap();
    let path = CompanyBuilder::new()
        .root(Path::new("relative/root"))
        .employee("B", "CEO")
        .write_to(temp.path());

    let err = CommandSetup::init(&opts(&path, None), &MemoryLog::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::RootNotAbsolute(_))
    ));
}

#[test]
fn converge_then_create_file() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("company");
    let path = CompanyBuilder::new()
        .root(&root)
        .employee("A", "Legal")
        .employee("B", "CEO")
        .directory("Contract-Documents", "Legal")
        .write_to(temp.path());
    let setup = CommandSetup::init(&opts(&path, None), &MemoryLog::default()).unwrap();

    let gateway = InMemoryGateway::new();
    let report = converge_with(&setup, &gateway, &MemoryLog::default());
    ensure_no_failures(&report).unwrap();
    let json: serde_json::Value = serde_json::from_str(&render_json(&report).unwrap()).unwrap();
    assert_eq!(
        json["entries"].as_array().unwrap().len(),
        report.entries().len()
    );

    // The in-memory host does not touch the disk.
    let settings = setup.config.engine_settings();
    assert!(create_file(&settings, &setup.registry, "Contract-Documents", "nda.txt").is_err());

    std::fs::create_dir_all(root.join("Contract-Documents")).unwrap();
    let file = create_file(&settings, &setup.registry, "Contract-Documents", "nda.txt").unwrap();
    assert_eq!(file, root.join("Contract-Documents").join("nda.txt"));
    assert_eq!(std::fs::read_to_string(file).unwrap(), NEW_FILE_CONTENT);
}
