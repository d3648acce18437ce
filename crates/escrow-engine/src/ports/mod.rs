//! # Ports
//!
//! Inbound API trait and outbound host traits, with a recording mock for
//! tests.

pub mod inbound;
pub mod outbound;

pub use inbound::{EscrowApi, HandleOutcome};
pub use outbound::{MessageSender, RecordingSender};
