//! syncstat - Generate usage profiles from sync server transaction logs

use clap::Parser;
use std::process::ExitCode;
use syncstat::{Result, VERSION, cli::Cli, generate_profile, get_formatter};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn run(cli: &Cli) -> Result<String> {
    cli.validate()?;

    info!("syncstat {VERSION}: profiling {} log files", cli.logs.len());
    let report = generate_profile(&cli.logs, cli.data.as_deref(), cli.show_progress())?;
    get_formatter(cli.json).format_profile(&report)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging. The --verbose flag overrides RUST_LOG.
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new(
            "syncstat=info,syncstat_core=info,syncstat_provider_taskd=info",
        )
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(&cli) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
