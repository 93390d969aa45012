use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use nios_lib::NiosClient;

/// Read raw samples from a NIOS acquisition server and print them as hex.
#[derive(Parser, Debug)]
#[command(name = "nios", version, about, long_about = None)]
struct Cli {
    /// Server hostname or address.
    hostname: String,
    /// Server TCP port.
    port: u16,
    /// Acquisition channel. Channels start at 1!
    #[arg(value_parser = clap::value_parser!(u8).range(1..=8))]
    channel: u8,
    /// Number of 350-record chunks to request.
    chunks: u32,
    /// Optional path to a file to write logs to, in addition to the console.
    #[arg(short, long)]
    log_file: Option<PathBuf>,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn setup_logging(
    log_file_path: Option<PathBuf>,
    verbosity: &Verbosity<InfoLevel>,
) -> Result<Option<WorkerGuard>> {
    // Sample data owns stdout; all logging goes to stderr.
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let (file_layer, guard) = if let Some(ref path) = log_file_path {
        let log_file = File::create(path)
            .with_context(|| format!("Failed to create log file at: {:?}", path))?;
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(log_file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking_writer)
            .with_ansi(false)
            .with_target(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let filter = EnvFilter::builder()
        .with_default_directive(verbosity.tracing_level_filter().into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_logging(cli.log_file.clone(), &cli.verbose)?;

    if let Err(e) = run(&cli).await {
        error!("Acquisition failed: {e:#}");
        process::exit(1);
    }

    Ok(())
}

async fn run(cli: &Cli) -> Result<()> {
    let mut client = NiosClient::connect(&cli.hostname, cli.port).await?;

    // The wire protocol counts channels from 0.
    let channel = cli.channel - 1;
    let acquisition = client.acquire(channel, cli.chunks).await?;

    if !acquisition.is_contiguous() {
        info!(
            "{} loss events detected across {} records",
            acquisition.loss_events(),
            acquisition.len()
        );
    }

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(acquisition.to_hex().as_bytes())?;
    stdout.write_all(b"\n")?;

    Ok(())
}
