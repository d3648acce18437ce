//! # Escrow Engine
//!
//! Deterministic guarantor-mediated deal escrow for an account-model
//! blockchain VM.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! One account per deal. A Buyer funds the deal in the configured asset
//! (native currency or a notification-based fungible token), a Guarantor
//! resolves it:
//! - **approve** releases funds to the Seller minus a capped royalty
//! - **cancel** refunds the Buyer in full
//!
//! Either resolution ends with the account destroyed; there is no stored
//! terminal state.
//!
//! ## Security Properties
//!
//! | Defense | Description |
//! |---------|-------------|
//! | Sender gating | Only the guarantor resolves, only the seller swaps wallet code |
//! | Exact funding | Deficient native funding and inexact token funding rejected |
//! | Spoof defense | Token notifications must come from the derived wallet |
//! | Royalty cap | Effective royalty never exceeds 90% of the deal |
//! | Fee guard | Settlement aborts recoverably when balance cannot carry it |
//!
//! ## Module Structure
//!
//! ```text
//! escrow-engine/
//! ├── domain/          # DealRecord, value objects, invariants, cell codec
//! ├── events/          # Inbound ops and outbound transfer instructions
//! ├── algorithms/      # Royalty split, settlement planning, wallet derivation
//! ├── ports/           # EscrowApi, MessageSender
//! ├── adapters/        # In-memory chain host
//! └── service.rs       # Dispatcher
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{ChainError, InMemoryChain};
pub use algorithms::{
    derive_wallet_address, plan_settlement, reserved_balance, royalty_amount, split_deal,
    Resolution, RoyaltySplit, SettlementPlan, ROYALTY_CAP_RAW, SETTLEMENT_FEE_PER_MESSAGE,
};
pub use domain::{
    decode_record, encode_record, Asset, CellError, Coins, ConfigError, DealConfig, DealRecord,
    DealState, EscrowError, ExitCode, MsgAddress, RoyaltyRate, SendMode, WalletCode,
};
pub use events::{
    ChangeWalletCode, InboundKind, InboundMessage, OutboundMessage, TransferNotification,
    OP_APPROVE, OP_BUYER_TRANSFER, OP_CANCEL, OP_CHANGE_WALLET_CODE, OP_TOP_UP,
    OP_TRANSFER_NOTIFICATION,
};
pub use ports::{EscrowApi, HandleOutcome, MessageSender, RecordingSender};
pub use service::{DeployError, EscrowService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
