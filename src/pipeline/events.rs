//! Progress and result notifications for whoever drives a run.

use crate::skupszop::ResultRow;
use anyhow::{anyhow, Result};
use serde::Serialize;
use tokio::sync::mpsc;

/// Emitted when a query starts processing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    /// 1-based position of the query in the input list
    pub index: usize,
    pub total: usize,
    pub title: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PipelineEvent {
    Progress(ProgressEvent),
    Result(ResultRow),
}

/// Receives run notifications. Errors returned here are logged and never
/// stop the run.
pub trait Observer: Send + Sync {
    fn on_progress(&self, _event: &ProgressEvent) -> Result<()> {
        Ok(())
    }

    fn on_result(&self, _row: &ResultRow) -> Result<()> {
        Ok(())
    }
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Forwards events over an unbounded channel, e.g. to a UI task.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<PipelineEvent>,
}

impl ChannelObserver {
    /// Creates the observer and the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PipelineEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: PipelineEvent) -> Result<()> {
        self.tx.send(event).map_err(|_| anyhow!("Event receiver dropped"))
    }
}

impl Observer for ChannelObserver {
    fn on_progress(&self, event: &ProgressEvent) -> Result<()> {
        self.send(PipelineEvent::Progress(event.clone()))
    }

    fn on_result(&self, row: &ResultRow) -> Result<()> {
        self.send(PipelineEvent::Result(row.clone()))
    }
}
