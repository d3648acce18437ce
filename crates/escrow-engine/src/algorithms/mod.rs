//! # Algorithms
//!
//! Pure computation behind the state machine: royalty arithmetic,
//! settlement planning, and deterministic wallet derivation.

pub mod royalty;
pub mod settlement;
pub mod wallet;

pub use royalty::{royalty_amount, split_deal, RoyaltySplit, ROYALTY_CAP_RAW, ROYALTY_DIVISOR};
pub use settlement::{
    plan_settlement, reserved_balance, Resolution, SettlementPlan, SETTLEMENT_FEE_PER_MESSAGE,
};
pub use wallet::derive_wallet_address;
