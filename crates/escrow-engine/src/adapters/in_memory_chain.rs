//! # In-Memory Chain Host
//!
//! Single-account host simulation for tests: credits inbound value,
//! executes messages run-to-completion, applies outbound debits, and
//! honors the remainder+destroy send mode by deleting the account.
//!
//! The simulation tracks value movement only; gas burn is not modeled.

use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::entities::{DealConfig, DealRecord};
use crate::domain::errors::{EscrowError, ExitCode};
use crate::domain::value_objects::{Coins, DealState, MsgAddress, SendMode};
use crate::events::inbound::InboundMessage;
use crate::events::outbound::OutboundMessage;
use crate::ports::inbound::{EscrowApi, HandleOutcome};
use crate::ports::outbound::RecordingSender;
use crate::service::{DeployError, EscrowService};

/// Host-level delivery errors.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The account was destroyed by a prior settlement.
    #[error("account no longer exists")]
    AccountDestroyed,
    /// The message aborted with an escrow exit code.
    #[error(transparent)]
    Escrow(#[from] EscrowError),
}

impl ChainError {
    /// Exit code as surfaced on the chain's public record, if any.
    pub fn exit_code(&self) -> Option<ExitCode> {
        match self {
            ChainError::AccountDestroyed => None,
            ChainError::Escrow(err) => Some(err.exit_code()),
        }
    }
}

/// In-memory escrow account host.
pub struct InMemoryChain {
    service: RwLock<EscrowService<RecordingSender>>,
    sender: Arc<RecordingSender>,
    balance: RwLock<Coins>,
    destroyed: RwLock<bool>,
}

impl InMemoryChain {
    /// Deploy a deal account with an initial balance.
    pub fn deploy(
        config: DealConfig,
        own_address: MsgAddress,
        initial_balance: Coins,
    ) -> Result<Self, DeployError> {
        let sender = Arc::new(RecordingSender::new());
        let service = EscrowService::deploy(config, own_address, Arc::clone(&sender))?;
        Ok(Self {
            service: RwLock::new(service),
            sender,
            balance: RwLock::new(initial_balance),
            destroyed: RwLock::new(false),
        })
    }

    /// Deliver one inbound message to the account.
    ///
    /// The attached value is credited before execution and stays with the
    /// account even when the message aborts; aborted messages leave
    /// storage untouched.
    pub fn send(&self, message: InboundMessage) -> Result<HandleOutcome, ChainError> {
        if *self.destroyed.read() {
            return Err(ChainError::AccountDestroyed);
        }
        *self.balance.write() += message.value;
        let balance = *self.balance.read();

        match self.service.write().handle_message(&message, balance) {
            Ok(outcome) => {
                self.apply_outbound(&outcome);
                Ok(outcome)
            }
            Err(err) => {
                warn!(
                    "[chain] message from {} aborted with exit code {}",
                    message.sender,
                    err.exit_code()
                );
                Err(err.into())
            }
        }
    }

    fn apply_outbound(&self, outcome: &HandleOutcome) {
        let mut balance = self.balance.write();
        for transfer in &outcome.outbound {
            if transfer.mode().contains(SendMode::CARRY_ALL_BALANCE) {
                *balance = 0;
            } else {
                *balance = balance.saturating_sub(transfer.attached_value());
            }
        }
        if outcome.destroyed {
            *balance = 0;
            *self.destroyed.write() = true;
            info!("[chain] account destroyed, balance and storage reclaimed");
        }
    }

    /// Current account balance.
    pub fn balance(&self) -> Coins {
        *self.balance.read()
    }

    /// Whether settlement destroyed the account.
    pub fn is_destroyed(&self) -> bool {
        *self.destroyed.read()
    }

    /// Every outbound message emitted over the account's lifetime.
    pub fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sender.sent()
    }

    /// Read-only state query.
    pub fn deal_state(&self) -> Result<DealState, ChainError> {
        self.guard_exists()?;
        Ok(self.service.read().deal_state()?)
    }

    /// Read-only royalty query.
    pub fn royalty_amount(&self) -> Result<Coins, ChainError> {
        self.guard_exists()?;
        Ok(self.service.read().royalty_amount()?)
    }

    /// Read-only record snapshot.
    pub fn deal_record(&self) -> Result<DealRecord, ChainError> {
        self.guard_exists()?;
        Ok(self.service.read().deal_record()?)
    }

    fn guard_exists(&self) -> Result<(), ChainError> {
        if *self.destroyed.read() {
            return Err(ChainError::AccountDestroyed);
        }
        Ok(())
    }
}
