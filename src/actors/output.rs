//! OutputActor - Batches metrics and writes them through SqlOutput
//!
//! ## Batching Strategy
//!
//! Metrics are buffered and written in batches:
//! - **Size trigger**: flush once `batch_size` metrics are buffered
//! - **Time trigger**: flush every `flush_interval`
//! - **Shutdown**: the remaining buffer is flushed before the connection closes
//!
//! A failed flush is logged and counted; the batch is dropped.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time;
use tracing::{debug, error, instrument, trace, warn};

use super::messages::{OutputCommand, OutputStats};
use crate::metric::Metric;
use crate::output::SqlOutput;

/// Shortest accepted time trigger
pub const MIN_FLUSH_INTERVAL: Duration = Duration::from_millis(10);

pub struct OutputActor {
    output: SqlOutput,

    /// Metrics waiting to be flushed
    buffer: Vec<Metric>,

    batch_size: usize,

    flush_interval: Duration,

    command_rx: mpsc::Receiver<OutputCommand>,

    stats: OutputStats,
}

impl OutputActor {
    pub fn new(
        output: SqlOutput,
        command_rx: mpsc::Receiver<OutputCommand>,
        batch_size: usize,
        flush_interval: Duration,
    ) -> Self {
        debug!("creating output actor (batch size {batch_size}, interval {flush_interval:?})");

        if flush_interval < MIN_FLUSH_INTERVAL {
            warn!("flush interval {flush_interval:?} too short, using {MIN_FLUSH_INTERVAL:?}");
        }

        Self {
            output,
            buffer: Vec::with_capacity(batch_size),
            batch_size: batch_size.max(1),
            flush_interval: flush_interval.max(MIN_FLUSH_INTERVAL),
            command_rx,
            stats: OutputStats::default(),
        }
    }

    /// Run the actor's main loop
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!("starting output actor");

        let mut flush_interval = time::interval(self.flush_interval);
        let mut shutdown_ack: Option<oneshot::Sender<()>> = None;

        loop {
            tokio::select! {
                _ = flush_interval.tick() => {
                    if !self.buffer.is_empty() {
                        trace!("time-based flush triggered ({} metrics)", self.buffer.len());
                        let _ = self.flush().await;
                    }
                }

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(OutputCommand::Write { metrics }) => {
                            self.buffer.extend(metrics);
                            if self.buffer.len() >= self.batch_size {
                                trace!("size-based flush triggered ({} metrics)", self.buffer.len());
                                let _ = self.flush().await;
                            }
                        }
                        Some(OutputCommand::Flush { respond_to }) => {
                            let result = self.flush().await;
                            let _ = respond_to.send(result);
                        }
                        Some(OutputCommand::GetStats { respond_to }) => {
                            let _ = respond_to.send(self.current_stats());
                        }
                        Some(OutputCommand::Shutdown { respond_to }) => {
                            shutdown_ack = Some(respond_to);
                            break;
                        }
                        None => {
                            warn!("command channel closed, shutting down");
                            break;
                        }
                    }
                }
            }
        }

        if !self.buffer.is_empty() {
            debug!("final flush before shutdown ({} metrics)", self.buffer.len());
            let _ = self.flush().await;
        }

        if let Err(e) = self.output.close().await {
            error!("error closing output: {}", e);
        }

        debug!("output actor stopped");
        if let Some(ack) = shutdown_ack {
            let _ = ack.send(());
        }
    }

    /// Write the buffered metrics
    ///
    /// Metrics are written in order. The first failure drops the failing
    /// metric and everything after it; metrics before it stay written.
    async fn flush(&mut self) -> anyhow::Result<()> {
        self.stats.flush_count += 1;
        if self.buffer.is_empty() {
            return Ok(());
        }

        let batch: Vec<Metric> = self.buffer.drain(..).collect();
        debug!("flushing {} metrics", batch.len());

        for (written, metric) in batch.iter().enumerate() {
            if let Err(e) = self.output.write_metric(metric).await {
                let dropped = batch.len() - written;
                error!(
                    "failed to write batch of {} metrics after {written}, dropping {dropped}: {e}",
                    batch.len()
                );
                self.stats.written += written as u64;
                self.stats.dropped += dropped as u64;
                self.stats.failed_batches += 1;
                return Err(e.into());
            }
        }

        self.stats.written += batch.len() as u64;
        trace!("flush #{} complete", self.stats.flush_count);
        Ok(())
    }

    fn current_stats(&self) -> OutputStats {
        OutputStats {
            buffered: self.buffer.len(),
            ..self.stats.clone()
        }
    }
}

/// Handle for controlling the OutputActor
#[derive(Clone)]
pub struct OutputHandle {
    sender: mpsc::Sender<OutputCommand>,
}

impl OutputHandle {
    /// Spawn a new output actor that owns `output`
    pub fn spawn(output: SqlOutput, batch_size: usize, flush_interval: Duration) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let actor = OutputActor::new(output, cmd_rx, batch_size, flush_interval);
        tokio::spawn(actor.run());

        Self { sender: cmd_tx }
    }

    /// Spawn with the batching parameters from the output's configuration
    pub fn spawn_configured(output: SqlOutput) -> Self {
        let batch_size = output.config().batch_size;
        let flush_interval = Duration::from_secs(output.config().flush_interval);
        Self::spawn(output, batch_size, flush_interval)
    }

    pub async fn write(&self, metrics: Vec<Metric>) -> anyhow::Result<()> {
        self.sender.send(OutputCommand::Write { metrics }).await?;
        Ok(())
    }

    /// Manually flush the write buffer
    pub async fn flush(&self) -> anyhow::Result<()> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(OutputCommand::Flush { respond_to: tx })
            .await?;

        rx.await??;
        Ok(())
    }

    /// Get output statistics
    pub async fn get_stats(&self) -> Option<OutputStats> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(OutputCommand::GetStats { respond_to: tx })
            .await
            .ok()?;

        rx.await.ok()
    }

    /// Flush, close the connection and wait for the actor to stop
    pub async fn shutdown(&self) {
        let (tx, rx) = oneshot::channel();
        if self
            .sender
            .send(OutputCommand::Shutdown { respond_to: tx })
            .await
            .is_ok()
        {
            let _ = rx.await;
        }
    }
}
