//! Actor-based batching writer
//!
//! The [`OutputActor`](output::OutputActor) owns the [`SqlOutput`](crate::output::SqlOutput)
//! and runs as its own Tokio task. Producers talk to it through a cloneable
//! [`OutputHandle`](output::OutputHandle) over an mpsc command channel;
//! request/response commands carry a oneshot sender.
//!
//! ```text
//!   producer ──┐
//!   producer ──┼── mpsc ──► OutputActor ──► SqlOutput ──► database
//!   producer ──┘              (buffer)
//! ```

pub mod messages;
pub mod output;
