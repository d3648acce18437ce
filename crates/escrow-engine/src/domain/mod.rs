//! # Domain Layer
//!
//! Entities, value objects, invariants, errors, and the binary cell codec
//! for the escrow deal state machine.

pub mod cell;
pub mod codec;
pub mod entities;
pub mod errors;
pub mod invariants;
pub mod value_objects;

pub use cell::{CellBuilder, CellSlice};
pub use codec::{decode_record, encode_record};
pub use entities::{DealConfig, DealRecord};
pub use errors::{CellError, ConfigError, EscrowError, ExitCode};
pub use invariants::{
    invariant_deal_funded, invariant_expected_wallet, invariant_fee_coverage,
    invariant_guarantor_authorized, invariant_native_funding_amount, invariant_seller_authorized,
    invariant_token_funding_amount,
};
pub use value_objects::{
    AccountHash, Asset, Coins, DealState, MsgAddress, RoyaltyRate, SendMode, WalletCode,
};
