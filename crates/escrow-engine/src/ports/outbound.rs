//! # Outbound Ports
//!
//! Trait for the host environment that carries outbound messages. Sends
//! are fire-and-forget: the account model offers no synchronous
//! acknowledgment and the contract never observes downstream failure.

use crate::events::outbound::OutboundMessage;
use parking_lot::RwLock;

/// Outbound message carrier - outbound port.
pub trait MessageSender: Send + Sync {
    /// Hand a message to the host environment for delivery.
    fn send(&self, message: OutboundMessage);
}

// =============================================================================
// Mock Implementation for Testing
// =============================================================================

/// Sender that records every message for inspection.
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: RwLock<Vec<OutboundMessage>>,
}

impl RecordingSender {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, in order.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.read().clone()
    }

    /// Number of messages sent.
    pub fn sent_count(&self) -> usize {
        self.sent.read().len()
    }
}

impl MessageSender for RecordingSender {
    fn send(&self, message: OutboundMessage) {
        self.sent.write().push(message);
    }
}
