//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Top-level CLI entry point for the provisioning engine.
#[derive(Parser, Debug)]
#[command(
    name = "provision",
    about = "Converge company users, groups and directories to a declared role map",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Company configuration file (default: $PROVISION_CONFIG or conf/company.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the company root directory
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create groups, users and directories, then assign ownership and permissions
    Converge(ConvergeOpts),
    /// Validate the configuration and show the planned directory layout
    Check,
    /// Create a file inside a company directory
    CreateFile(CreateFileOpts),
    /// Print version information
    Version,
}

/// Report rendering for `converge`.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One log line per step and a summary.
    #[default]
    Text,
    /// The full report as JSON on stdout.
    Json,
}

/// Options for the `converge` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ConvergeOpts {
    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Options for the `create-file` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CreateFileOpts {
    /// Company directory to create the file in
    #[arg(short, long)]
    pub directory: String,

    /// Name of the file to create
    #[arg(short, long)]
    pub name: String,
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_converge_defaults_to_text() {
        let cli = Cli::parse_from(["provision", "converge"]);
        assert!(
            matches!(cli.command, Command::Converge(ref opts) if opts.format == OutputFormat::Text)
        );
        assert!(cli.global.config.is_none());
    }

    #[test]
    fn parse_converge_json() {
        let cli = Cli::parse_from(["provision", "converge", "--format", "json"]);
        assert!(
            matches!(cli.command, Command::Converge(ref opts) if opts.format == OutputFormat::Json)
        );
    }

    #[test]
    fn parse_global_opts_after_subcommand() {
        let cli = Cli::parse_from([
            "provision",
            "check",
            "--config",
            "/etc/company.toml",
            "--root",
            "/srv/company",
            "-v",
        ]);
        assert!(matches!(cli.command, Command::Check));
        assert_eq!(cli.global.config, Some(PathBuf::from("/etc/company.toml")));
        assert_eq!(cli.global.root, Some(PathBuf::from("/srv/company")));
        assert!(cli.verbose);
    }

    #[test]
    fn parse_create_file() {
        let cli = Cli::parse_from([
            "provision",
            "create-file",
            "--directory",
            "Employee-Data",
            "--name",
            "notes.txt",
        ]);
        let Command::CreateFile(opts) = cli.command else {
            panic!("expected create-file");
        };
        assert_eq!(opts.directory, "Employee-Data");
        assert_eq!(opts.name, "notes.txt");
    }

    #[test]
    fn create_file_requires_both_flags() {
        assert!(Cli::try_parse_from(["provision", "create-file", "--directory", "x"]).is_err());
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["provision", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }
}
