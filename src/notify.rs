use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::info;

use crate::advisory::Advisory;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification channel closed")]
    Closed,
}

/// Destination for composed advisories. Actual delivery to a device happens
/// on the other side of this trait.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, advisory: Advisory) -> Result<(), NotifyError>;
}

/// Writes every advisory to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn deliver(&self, advisory: Advisory) -> Result<(), NotifyError> {
        info!(
            title = %advisory.title,
            lines = advisory.lines.len(),
            deliver_after_secs = advisory.deliver_after.as_secs(),
            body = %advisory.body(),
            "Advisory ready"
        );
        Ok(())
    }
}

/// Forwards advisories into an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Advisory>,
}

impl ChannelSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Advisory>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl NotificationSink for ChannelSink {
    async fn deliver(&self, advisory: Advisory) -> Result<(), NotifyError> {
        self.tx.send(advisory).map_err(|_| NotifyError::Closed)
    }
}
