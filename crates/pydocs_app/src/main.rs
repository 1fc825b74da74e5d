mod cli;
mod logging;
mod runner;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use pydocs_engine::TerminalProgressSink;
use pydocs_logging::{pydocs_error, pydocs_info};

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match runner::load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    let progress = TerminalProgressSink::new();
    logging::initialize(&config.log_file(), cli.log_level(), progress.bar());

    pydocs_info!("Parser started");
    let code = match runner::run(&cli, &config, &progress, &mut io::stdout()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            pydocs_error!("Parser failed: {err:#}");
            ExitCode::from(runner::exit_code(&err))
        }
    };
    pydocs_info!("Parser finished");
    code
}
