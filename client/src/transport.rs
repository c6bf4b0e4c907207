//! The outbound relay interface.
//!
//! The session never touches a socket directly: it hands envelopes to a
//! [`RelaySink`], which must be non-blocking — presence and drag traffic is
//! emitted per input frame and may never stall the UI thread.

use tokio::sync::mpsc;
use tracing::warn;

use wire::Envelope;

/// Non-blocking path toward the relay.
pub trait RelaySink: Send + Sync {
    /// Hand an envelope to the transport. Returns false when it was dropped
    /// (queue full, connection down); senders treat that as best-effort
    /// loss, exactly like the relay's own fan-out.
    fn send(&self, envelope: Envelope) -> bool;
}

/// Channel-backed sink feeding a socket writer task.
pub struct ChannelSink {
    tx: mpsc::Sender<Envelope>,
}

impl ChannelSink {
    #[must_use]
    pub fn new(tx: mpsc::Sender<Envelope>) -> Self {
        Self { tx }
    }
}

impl RelaySink for ChannelSink {
    fn send(&self, envelope: Envelope) -> bool {
        match self.tx.try_send(envelope) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "relay sink dropped envelope");
                false
            }
        }
    }
}
