//! # Domain Entities
//!
//! The Deal Record - the sole persistent entity, one per contract account -
//! and the write-once deployment configuration it is constructed from.

use super::errors::{ConfigError, EscrowError};
use super::value_objects::{Asset, Coins, DealState, MsgAddress, RoyaltyRate, WalletCode};
use serde::{Deserialize, Serialize};

/// Write-once deployment configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealConfig {
    /// Opaque caller-assigned identifier; uniqueness is the creator's job.
    pub context_id: u32,
    /// Settlement recipient on approval.
    pub seller: MsgAddress,
    /// Sole approve/cancel authority.
    pub guarantor: MsgAddress,
    /// Required funding quantity in smallest asset units.
    pub deal_amount: Coins,
    /// Asset kind the deal is denominated in.
    pub asset: Asset,
    /// Guarantor royalty rate.
    pub royalty: RoyaltyRate,
}

impl DealConfig {
    /// Validate construction-time invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.deal_amount == 0 {
            return Err(ConfigError::ZeroDealAmount);
        }
        if let Asset::Token { wallet_code, .. } = &self.asset {
            if wallet_code.as_bytes().is_empty() {
                return Err(ConfigError::MissingWalletCode);
            }
        }
        Ok(())
    }
}

/// The persistent deal record.
///
/// All fields except `buyer`, `state`, and the token wallet code are fixed
/// at construction. Once `state` is [`DealState::Funded`] the record is
/// immutable until approve or cancel destroys the account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealRecord {
    /// Caller-assigned deal identifier.
    pub context_id: u32,
    /// Settlement recipient on approval.
    pub seller: MsgAddress,
    /// Sole approve/cancel authority.
    pub guarantor: MsgAddress,
    /// Required funding quantity.
    pub deal_amount: Coins,
    /// Asset kind.
    pub asset: Asset,
    /// Guarantor royalty rate.
    pub royalty: RoyaltyRate,
    /// Funder identity; unset until funding succeeds, then set exactly once.
    pub buyer: Option<MsgAddress>,
    /// Lifecycle state.
    pub state: DealState,
}

impl DealRecord {
    /// Build the initial record from a validated deployment configuration.
    pub fn new(config: DealConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            context_id: config.context_id,
            seller: config.seller,
            guarantor: config.guarantor,
            deal_amount: config.deal_amount,
            asset: config.asset,
            royalty: config.royalty,
            buyer: None,
            state: DealState::Init,
        })
    }

    /// Record a successful funding: set the buyer and move to FUNDED.
    ///
    /// The buyer assignment and the state transition are one atomic step; a
    /// second funding attempt no longer applies to the deal's remaining
    /// lifecycle and is rejected as a wrong-asset message.
    pub fn mark_funded(&mut self, buyer: MsgAddress) -> Result<(), EscrowError> {
        if !self.state.can_transition_to(DealState::Funded) {
            return Err(EscrowError::WrongAsset);
        }
        self.buyer = Some(buyer);
        self.state = DealState::Funded;
        Ok(())
    }

    /// Replace the token wallet code template in place.
    ///
    /// Permitted only while INIT and only for token-kind deals; no other
    /// field changes. Sender authorization is the dispatcher's concern.
    pub fn replace_wallet_code(&mut self, code: WalletCode) -> Result<(), EscrowError> {
        if self.state.is_funded() {
            return Err(EscrowError::WrongAsset);
        }
        match &mut self.asset {
            Asset::Token { wallet_code, .. } => {
                *wallet_code = code;
                Ok(())
            }
            Asset::Native => Err(EscrowError::WrongAsset),
        }
    }
}
