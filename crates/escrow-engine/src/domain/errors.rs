//! # Domain Errors
//!
//! Failure taxonomy for the escrow state machine. Every failure aborts the
//! current message atomically and surfaces a numeric exit code on the
//! chain's public record; the code is the only error channel callers get.

use super::value_objects::{Coins, MsgAddress};
use thiserror::Error;

/// Numeric exit code surfaced to callers.
pub type ExitCode = u32;

/// Escrow message-handling errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EscrowError {
    /// Wrong asset kind, double funding, or post-funding code-change attempt.
    #[error("message does not apply to this deal's asset kind or remaining lifecycle")]
    WrongAsset,

    /// Funding amount mismatch.
    #[error("incorrect funding amount: expected {expected}, got {got}")]
    IncorrectFundAmount {
        /// Required deal amount.
        expected: Coins,
        /// Amount the funding attempt carried.
        got: Coins,
    },

    /// Funding notification from an unexpected source wallet.
    #[error("funding notification from unexpected wallet: expected {expected}, got {got}")]
    IncorrectTokenWallet {
        /// Deterministically derived wallet address.
        expected: MsgAddress,
        /// Address the notification actually came from.
        got: MsgAddress,
    },

    /// Unauthorized approve/cancel/code-change, or resolution before funding.
    #[error("sender is not authorized for this operation")]
    IncorrectGuarantor,

    /// Insufficient spendable balance to cover settlement message fees.
    #[error("balance too low for settlement fees: need {required}, spendable {spendable}")]
    LowFeeBalance {
        /// Fee amount the settlement needs.
        required: Coins,
        /// Balance left after reserving deal funds.
        spendable: Coins,
    },

    /// Unrecognized leading operation tag. Fatal to the message only.
    #[error("unrecognized operation tag 0x{0:08x}")]
    UnknownOperation(u32),

    /// Malformed message body or storage image.
    #[error("cell error: {0}")]
    Cell(#[from] CellError),
}

impl EscrowError {
    /// Exit code surfaced on the chain's public record.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            EscrowError::WrongAsset => 400,
            EscrowError::IncorrectFundAmount { .. } => 401,
            EscrowError::IncorrectTokenWallet { .. } => 402,
            EscrowError::IncorrectGuarantor => 403,
            EscrowError::LowFeeBalance { .. } => 404,
            EscrowError::UnknownOperation(_) => 0xffff,
            EscrowError::Cell(_) => 9,
        }
    }

    /// Whether retrying the identical message can succeed after a top-up.
    ///
    /// Only fee starvation is caller-recoverable; every other failure
    /// requires a corrected input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EscrowError::LowFeeBalance { .. })
    }
}

/// Bit-level cell codec errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CellError {
    /// Read past the end of the cell.
    #[error("cell underflow: requested {requested} bits, {remaining} remaining")]
    Underflow {
        /// Bits the read asked for.
        requested: usize,
        /// Bits left in the slice.
        remaining: usize,
    },

    /// Value does not fit the declared field width.
    #[error("value {value} does not fit in {bits} bits")]
    ValueTooWide {
        /// Value being stored.
        value: u64,
        /// Declared field width.
        bits: usize,
    },

    /// Decoded discriminant has no meaning for the field.
    #[error("invalid {field} value: {value}")]
    InvalidValue {
        /// Field being decoded.
        field: &'static str,
        /// Offending discriminant.
        value: u64,
    },
}

/// Deployment configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Token-kind deals must carry a wallet code template at construction;
    /// without one no funding notification could ever be validated.
    #[error("token deal configured without a wallet code template")]
    MissingWalletCode,

    /// A deal for nothing cannot be funded or settled.
    #[error("deal amount must be positive")]
    ZeroDealAmount,
}
