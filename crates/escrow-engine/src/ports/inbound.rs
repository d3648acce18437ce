//! # Inbound Ports
//!
//! API trait defining what the escrow account can do: handle one inbound
//! message to completion, and answer read-only queries.

use crate::domain::entities::DealRecord;
use crate::domain::errors::EscrowError;
use crate::domain::value_objects::{Coins, DealState};
use crate::events::inbound::InboundMessage;
use crate::events::outbound::OutboundMessage;

/// Result of a successfully handled message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandleOutcome {
    /// Outbound transfers emitted, in order.
    pub outbound: Vec<OutboundMessage>,
    /// Whether handling ended with account destruction.
    pub destroyed: bool,
}

impl HandleOutcome {
    /// An outcome with no outbound effects.
    pub fn none() -> Self {
        Self {
            outbound: Vec::new(),
            destroyed: false,
        }
    }
}

/// Escrow account API - inbound port.
///
/// Execution is run-to-completion per message: a call either commits and
/// returns the outcome, or aborts with an error and no observable state
/// change.
pub trait EscrowApi: Send + Sync {
    /// Handle one inbound message.
    ///
    /// `balance` is the account's full balance at execution time, inbound
    /// value already credited.
    fn handle_message(
        &mut self,
        message: &InboundMessage,
        balance: Coins,
    ) -> Result<HandleOutcome, EscrowError>;

    /// Current lifecycle state.
    fn deal_state(&self) -> Result<DealState, EscrowError>;

    /// Computed guarantor royalty for the current parameters.
    fn royalty_amount(&self) -> Result<Coins, EscrowError>;

    /// Snapshot of the full deal record.
    fn deal_record(&self) -> Result<DealRecord, EscrowError>;
}
