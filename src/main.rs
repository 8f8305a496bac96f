use clap::Parser;
use eyre::{Context, Result};
use mounttool::{
    cli::{self, Cli},
    ToggleError,
};
use std::io::Write;
use std::process::ExitCode;
use tracing::{debug, error, info, trace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn print_usage() -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "usage: {}", cli::USAGE).wrap_err("Failed to print usage")?;
    stdout.flush()?;
    Ok(())
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();
    trace!("Starting up mounttool");

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if cli::is_usage_error(&e) => {
            debug!("Invalid arguments: {e}");
            print_usage()?;
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => {
            e.print().wrap_err("Failed to print help")?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    let tools = cli.tools();
    let result = cli
        .invocation()
        .and_then(|inv| mounttool::toggle(&inv, &tools));
    match result {
        Ok(outcome) => {
            info!(?outcome, "Done");
            Ok(ExitCode::SUCCESS)
        }
        Err(e @ ToggleError::Usage(_)) => {
            debug!("{e}");
            print_usage()?;
            Ok(ExitCode::from(e.exit_code() as u8))
        }
        Err(e) => {
            error!("{e}");
            Ok(ExitCode::from(e.exit_code() as u8))
        }
    }
}
