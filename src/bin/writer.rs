use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use template_sql::{
    Metric, SqlOutput,
    actors::output::OutputHandle,
    config::read_config_file,
    sql::{DriverRegistry, any::SqlxDriver, registry},
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, level_filters::LevelFilter, trace, warn};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

/// Number of parsed metrics forwarded to the writer at once
const FORWARD_CHUNK: usize = 64;

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file (.toml or .json)
    #[arg(short)]
    file: PathBuf,

    /// Read metrics from this file instead of stdin (one JSON object per line)
    #[arg(long)]
    input: Option<PathBuf>,
}

fn init() {
    let filter =
        filter::Targets::new().with_targets(vec![("template_sql", LevelFilter::DEBUG)]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let config = read_config_file(&args.file)?;

    let mut drivers = DriverRegistry::new();
    SqlxDriver::register_all(&mut drivers);
    registry::install_global(drivers)?;
    let drivers = registry::global().context("driver registry not installed")?;

    let mut output = SqlOutput::new(config)?;
    output.connect(drivers).await?;

    let handle = OutputHandle::spawn_configured(output);

    let forwarded = match &args.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?;
            forward_metrics(BufReader::new(file), &handle).await?
        }
        None => forward_metrics(BufReader::new(tokio::io::stdin()), &handle).await?,
    };

    if let Err(e) = handle.flush().await {
        warn!("final flush failed: {e}");
    }
    if let Some(stats) = handle.get_stats().await {
        info!(
            "read {forwarded} metrics, wrote {}, dropped {} in {} failed batches",
            stats.written, stats.dropped, stats.failed_batches
        );
    }
    handle.shutdown().await;

    Ok(())
}

async fn forward_metrics<R>(reader: R, handle: &OutputHandle) -> anyhow::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut chunk = Vec::with_capacity(FORWARD_CHUNK);
    let mut forwarded = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<Metric>(line) {
            Ok(metric) => chunk.push(metric),
            Err(e) => {
                warn!("skipping malformed metric line: {e}");
                continue;
            }
        }

        if chunk.len() >= FORWARD_CHUNK {
            forwarded += chunk.len();
            handle.write(std::mem::take(&mut chunk)).await?;
        }
    }

    if !chunk.is_empty() {
        forwarded += chunk.len();
        handle.write(chunk).await?;
    }

    Ok(forwarded)
}
