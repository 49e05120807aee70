use tcisd_core::{CliArgs, Command, Config, Mode, StripperRegistry, process};
mod summary;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use console::style;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn print_completions_cli(shell: clap_complete::Shell) {
    let mut cmd = CliArgs::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(mut config: Config, show: bool) -> Result<ExitCode> {
    if let Err(e) = config.validate() {
        eprintln!("{}", style(format!("Error: {}", e)).red());
        return Ok(ExitCode::FAILURE);
    }

    if show {
        print!("{}", serde_yaml::to_string(&config)?);
        return Ok(ExitCode::SUCCESS);
    }

    let registry = StripperRegistry::with_builtins();
    let report = match process(&config, &registry) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", style(format!("Error: {}", e)).red());
            return Ok(ExitCode::FAILURE);
        }
    };

    summary::print_report(&report);

    if report.outcome().is_failure() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn main() -> Result<ExitCode> {
    let cli: CliArgs = CliArgs::parse();
    init_logging(cli.verbose);

    let (config, show) = match cli.command {
        Command::Completion(args) => {
            print_completions_cli(args.shell);
            return Ok(ExitCode::SUCCESS);
        }
        Command::Lint(args) => {
            let show = args.show;
            (args.into_config(Mode::Lint), show)
        }
        Command::Format(args) => {
            let show = args.scan.show;
            (args.into_config(), show)
        }
    };

    run(config, show)
}
