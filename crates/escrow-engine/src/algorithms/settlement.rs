//! # Settlement Engine
//!
//! Pure planning of the outbound transfers for a resolved deal. The plan
//! is computed before anything is emitted; the service executes it against
//! the outbound port and invokes destruction exactly once as the terminal
//! step. There is no path where planning succeeds but destruction is
//! skipped.

use super::royalty::split_deal;
use super::wallet::derive_wallet_address;
use crate::domain::entities::DealRecord;
use crate::domain::errors::EscrowError;
use crate::domain::value_objects::{Asset, Coins, MsgAddress, SendMode};
use crate::events::outbound::OutboundMessage;

/// Fee provision per outbound settlement message.
pub const SETTLEMENT_FEE_PER_MESSAGE: Coins = 50_000_000;

/// The guarantor's binary decision on a funded deal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Release funds to the seller, minus the royalty.
    Approve,
    /// Refund the buyer in full.
    Cancel,
}

/// Ordered transfers plus the terminal destruction directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlementPlan {
    /// Transfers to emit, in order.
    pub transfers: Vec<OutboundMessage>,
    /// Always true: settlement ends with account destruction.
    pub destroys_account: bool,
}

impl SettlementPlan {
    /// Fees the account must be able to spend to emit this plan.
    pub fn required_fee(&self) -> Coins {
        self.transfers.len() as Coins * SETTLEMENT_FEE_PER_MESSAGE
    }
}

/// Deal funds logically reserved out of the account balance.
///
/// A funded native deal holds the buyer's funds on its own balance; token
/// deal funds sit in the wallet sub-contract, so nothing is reserved.
pub fn reserved_balance(record: &DealRecord) -> Coins {
    match record.asset {
        Asset::Native if record.state.is_funded() => record.deal_amount,
        _ => 0,
    }
}

/// Plan the settlement for a funded deal.
///
/// Callers gate on the guard layer first; an unfunded record (no buyer)
/// is rejected the same way the funded-state guard rejects it.
pub fn plan_settlement(
    record: &DealRecord,
    own_address: &MsgAddress,
    resolution: Resolution,
) -> Result<SettlementPlan, EscrowError> {
    let buyer = record.buyer.ok_or(EscrowError::IncorrectGuarantor)?;
    let transfers = match (&record.asset, resolution) {
        (Asset::Native, Resolution::Approve) => {
            let split = split_deal(record.deal_amount, record.royalty);
            vec![
                OutboundMessage::NativeTransfer {
                    to: record.seller,
                    value: split.seller_amount,
                    mode: SendMode::PAY_FEES_SEPARATELY,
                },
                OutboundMessage::NativeTransfer {
                    to: record.guarantor,
                    value: split.royalty_amount,
                    mode: SendMode::remainder_and_destroy(),
                },
            ]
        }
        (
            Asset::Token {
                minter,
                wallet_code,
            },
            Resolution::Approve,
        ) => {
            let split = split_deal(record.deal_amount, record.royalty);
            let wallet = derive_wallet_address(own_address, minter, wallet_code);
            vec![
                OutboundMessage::TokenTransfer {
                    wallet,
                    amount: split.seller_amount,
                    destination: record.seller,
                    value: SETTLEMENT_FEE_PER_MESSAGE,
                    mode: SendMode::PAY_FEES_SEPARATELY,
                },
                OutboundMessage::TokenTransfer {
                    wallet,
                    amount: split.royalty_amount,
                    destination: record.guarantor,
                    value: 0,
                    mode: SendMode::remainder_and_destroy(),
                },
            ]
        }
        (Asset::Native, Resolution::Cancel) => {
            // No royalty on cancellation; the whole balance rides along.
            vec![OutboundMessage::NativeTransfer {
                to: buyer,
                value: 0,
                mode: SendMode::remainder_and_destroy(),
            }]
        }
        (
            Asset::Token {
                minter,
                wallet_code,
            },
            Resolution::Cancel,
        ) => {
            let wallet = derive_wallet_address(own_address, minter, wallet_code);
            vec![OutboundMessage::TokenTransfer {
                wallet,
                amount: record.deal_amount,
                destination: buyer,
                value: 0,
                mode: SendMode::remainder_and_destroy(),
            }]
        }
    };
    Ok(SettlementPlan {
        transfers,
        destroys_account: true,
    })
}
