//! Command-line entry point for the provision tool.

use anyhow::Result;
use clap::Parser;

use provision_cli::cli::{self, Command, OutputFormat};
use provision_cli::{commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    let (name, quiet) = match &args.command {
        Command::Converge(opts) => ("converge", opts.format == OutputFormat::Json),
        Command::Check => ("check", false),
        Command::CreateFile(_) => ("create-file", false),
        Command::Version => {
            commands::version::run();
            return Ok(());
        }
    };
    logging::init_subscriber(args.verbose, quiet, name);
    let log = logging::Logger::new(name);

    match args.command {
        Command::Converge(opts) => commands::converge::run(&args.global, &opts, &log),
        Command::Check => commands::check::run(&args.global, &log),
        Command::CreateFile(opts) => commands::create_file::run(&args.global, &opts, &log),
        Command::Version => Ok(()),
    }
}
