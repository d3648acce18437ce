//! # Domain Invariants
//!
//! Pure guard functions the dispatcher applies before any state mutation.
//! Validate-before-mutate ordering is strict: a failed guard aborts the
//! message with no observable partial update.

use super::errors::EscrowError;
use super::value_objects::{Coins, DealState, MsgAddress};

/// Invariant: only the configured guarantor may resolve a deal.
pub fn invariant_guarantor_authorized(
    sender: &MsgAddress,
    guarantor: &MsgAddress,
) -> Result<(), EscrowError> {
    if sender != guarantor {
        return Err(EscrowError::IncorrectGuarantor);
    }
    Ok(())
}

/// Invariant: resolution requires a funded deal.
///
/// Funding-not-complete is modeled as the same rejection as wrong
/// authority.
pub fn invariant_deal_funded(state: DealState) -> Result<(), EscrowError> {
    if !state.is_funded() {
        return Err(EscrowError::IncorrectGuarantor);
    }
    Ok(())
}

/// Invariant: only the seller may replace the token wallet code.
pub fn invariant_seller_authorized(
    sender: &MsgAddress,
    seller: &MsgAddress,
) -> Result<(), EscrowError> {
    if sender != seller {
        return Err(EscrowError::IncorrectGuarantor);
    }
    Ok(())
}

/// Invariant: native funding may not be deficient.
///
/// Surplus over the deal amount is attributed to gas and accepted; the
/// token path uses [`invariant_token_funding_amount`] instead.
pub fn invariant_native_funding_amount(
    attached: Coins,
    deal_amount: Coins,
) -> Result<(), EscrowError> {
    if attached < deal_amount {
        return Err(EscrowError::IncorrectFundAmount {
            expected: deal_amount,
            got: attached,
        });
    }
    Ok(())
}

/// Invariant: token funding must equal the deal amount exactly.
pub fn invariant_token_funding_amount(
    amount: Coins,
    deal_amount: Coins,
) -> Result<(), EscrowError> {
    if amount != deal_amount {
        return Err(EscrowError::IncorrectFundAmount {
            expected: deal_amount,
            got: amount,
        });
    }
    Ok(())
}

/// Invariant: a funding notification must come from the derived wallet.
///
/// Defeats spoofed notifications from arbitrary contracts.
pub fn invariant_expected_wallet(
    declared: &MsgAddress,
    expected: &MsgAddress,
) -> Result<(), EscrowError> {
    if declared != expected {
        return Err(EscrowError::IncorrectTokenWallet {
            expected: *expected,
            got: *declared,
        });
    }
    Ok(())
}

/// Invariant: spendable balance must cover settlement fees.
///
/// Spendable is the account balance minus the deal funds logically
/// reserved for settlement. State is left untouched on failure so a
/// top-up followed by a retry succeeds.
pub fn invariant_fee_coverage(
    balance: Coins,
    reserved: Coins,
    required: Coins,
) -> Result<(), EscrowError> {
    let spendable = balance.saturating_sub(reserved);
    if spendable < required {
        return Err(EscrowError::LowFeeBalance {
            required,
            spendable,
        });
    }
    Ok(())
}
