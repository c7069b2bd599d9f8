use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::domain::{FormPayload, SubmissionSink};

/// Diagnostic sink: logs each validated payload as JSON.
#[derive(Debug, Default)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

impl SubmissionSink for LogSink {
    fn deliver(&self, payload: &FormPayload) {
        info!(fields = payload.len(), payload = %payload.to_json(), "profile submitted");
    }
}

/// Forwards payloads to a channel, for callers that consume submissions
/// asynchronously.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<FormPayload>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<FormPayload>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl SubmissionSink for ChannelSink {
    fn deliver(&self, payload: &FormPayload) {
        if self.tx.send(payload.clone()).is_err() {
            warn!("submission receiver dropped, payload discarded");
        }
    }
}
