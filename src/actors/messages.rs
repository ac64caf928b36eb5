//! Message types for the output actor

use tokio::sync::oneshot;

use crate::metric::Metric;

/// Commands that can be sent to the OutputActor
#[derive(Debug)]
pub enum OutputCommand {
    /// Buffer metrics for the next flush
    Write { metrics: Vec<Metric> },

    /// Write the buffer to the database now
    Flush {
        respond_to: oneshot::Sender<anyhow::Result<()>>,
    },

    /// Get output statistics
    GetStats {
        respond_to: oneshot::Sender<OutputStats>,
    },

    /// Flush, close the connection and stop
    ///
    /// `respond_to` fires once the connection is closed.
    Shutdown { respond_to: oneshot::Sender<()> },
}

/// Output statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputStats {
    /// Metrics waiting in the write buffer
    pub buffered: usize,

    /// Metrics written successfully
    pub written: u64,

    /// Metrics discarded by failed flushes, including the failing one
    pub dropped: u64,

    /// Flushes that failed
    pub failed_batches: u64,

    /// Number of flush operations performed
    pub flush_count: u64,
}
