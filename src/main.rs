use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

mod cli;
use cli::{USAGE, parse_command, run_command};

use gridcal::{session::Session, storage::config::Config};

fn main() -> ExitCode {
    let config = match Config::load_or_create() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::FAILURE;
        }
    };
    setup_logging(&config);

    let command = match parse_command(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("Error: {}", err);
            println!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    match run(&config, command) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            tracing::error!("Command failed: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, command: cli::Command) -> anyhow::Result<String> {
    let mut session = Session::open(config)?;
    run_command(command, &mut session)
}

fn setup_logging(config: &Config) {
    let log_dir = Config::config_dir();

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, "gridcal.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    std::mem::forget(_guard);

    tracing::info!("gridcal started");
}
