//! # local-backup
//!

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};

use chrono::Local;
use clap::Parser;
use local_backup::{
    cli::Cli,
    operations::{Outcome, execute},
    runner::ProcessRunner,
    startup::{StartupError, StartupFailure, load_config, start_logger},
};
use mimalloc::MiMalloc;
use tracing::{debug, error, info};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, _logger) = match load_config(&cli)
        .and_then(|config| start_logger(&config).map(|guards| (config, guards)))
    {
        Ok(started) => started,
        Err(error) => return startup_failed(&cli, &error),
    };

    let invocation = cli.invocation(&config, io::stdin().is_terminal());
    let mode = cli.mode(&config);
    debug!("{mode:?} with {invocation:?}");
    if let Ok(prefix) = invocation.prefix() {
        info!("Container command: {prefix}");
    }

    match execute(&mode, &invocation, &mut ProcessRunner, &Local::now()) {
        Ok(Outcome::Completed) => ExitCode::SUCCESS,

        Ok(Outcome::Checked(freshness)) => {
            println!("{freshness}");
            ExitCode::from(freshness.verdict().exit_code())
        }

        Err(error) => {
            error!("{error}");
            ExitCode::from(error.exit_code())
        }
    }
}

fn startup_failed(cli: &Cli, error: &StartupError) -> ExitCode {
    let failure = StartupFailure::new(cli, error);

    match &failure {
        StartupFailure::Check(freshness) => println!("{freshness}"),
        StartupFailure::Abort(message) => eprintln!("{message}"),
    }

    ExitCode::from(failure.exit_code())
}
