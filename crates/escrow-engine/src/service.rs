//! # Escrow Service
//!
//! The dispatcher: classifies each inbound message, applies the guard
//! layer, and runs the matching handler against the persistent account
//! image.
//!
//! ## Ordering
//!
//! Every handler validates fully before mutating. The record is decoded
//! into a working copy, mutated there, and only persisted once the
//! handler has succeeded, so an aborted message leaves no observable
//! partial update. Settlement replaces persistence with destruction.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::algorithms::wallet::derive_wallet_address;
use crate::algorithms::{plan_settlement, reserved_balance, royalty_amount, Resolution};
use crate::domain::codec::{decode_record, encode_record};
use crate::domain::entities::{DealConfig, DealRecord};
use crate::domain::errors::{CellError, ConfigError, EscrowError};
use crate::domain::invariants::{
    invariant_deal_funded, invariant_expected_wallet, invariant_fee_coverage,
    invariant_guarantor_authorized, invariant_native_funding_amount, invariant_seller_authorized,
    invariant_token_funding_amount,
};
use crate::domain::value_objects::{Asset, Coins, DealState, MsgAddress};
use crate::events::inbound::{
    ChangeWalletCode, InboundKind, InboundMessage, TransferNotification, OP_APPROVE,
    OP_BUYER_TRANSFER, OP_CANCEL, OP_CHANGE_WALLET_CODE, OP_TOP_UP, OP_TRANSFER_NOTIFICATION,
};
use crate::ports::inbound::{EscrowApi, HandleOutcome};
use crate::ports::outbound::MessageSender;

/// Deployment failures: invalid configuration or an unencodable record.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Construction-time validation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Initial record could not be encoded.
    #[error(transparent)]
    Cell(#[from] CellError),
}

/// Escrow account service.
///
/// Owns the persistent account image and a handle to the outbound
/// message carrier. One instance is one deployed deal account.
pub struct EscrowService<S: MessageSender> {
    /// This account's own address; token wallet derivation keys off it.
    own_address: MsgAddress,
    /// Encoded account image, the sole persistent state.
    storage: Vec<u8>,
    /// Outbound message carrier.
    sender: Arc<S>,
}

impl<S: MessageSender> EscrowService<S> {
    /// Deploy a new deal account from a write-once configuration.
    pub fn deploy(
        config: DealConfig,
        own_address: MsgAddress,
        sender: Arc<S>,
    ) -> Result<Self, DeployError> {
        let record = DealRecord::new(config)?;
        let storage = encode_record(&record)?;
        info!(
            "[escrow] deployed deal {} at {} for {} units",
            record.context_id, own_address, record.deal_amount
        );
        Ok(Self {
            own_address,
            storage,
            sender,
        })
    }

    /// This account's own address.
    pub fn own_address(&self) -> MsgAddress {
        self.own_address
    }

    fn handle_native_funding(
        &self,
        record: &mut DealRecord,
        message: &InboundMessage,
    ) -> Result<HandleOutcome, EscrowError> {
        if record.state.is_funded() {
            return Err(EscrowError::WrongAsset);
        }
        if !record.asset.is_native() {
            return Err(EscrowError::WrongAsset);
        }
        invariant_native_funding_amount(message.value, record.deal_amount)?;
        record.mark_funded(message.sender)?;
        info!(
            "[escrow] deal {} funded by {} with {}",
            record.context_id, message.sender, message.value
        );
        Ok(HandleOutcome::none())
    }

    fn handle_token_funding(
        &self,
        record: &mut DealRecord,
        message: &InboundMessage,
    ) -> Result<HandleOutcome, EscrowError> {
        if record.state.is_funded() {
            return Err(EscrowError::WrongAsset);
        }
        let expected = match &record.asset {
            Asset::Token {
                minter,
                wallet_code,
            } => derive_wallet_address(&self.own_address, minter, wallet_code),
            Asset::Native => return Err(EscrowError::WrongAsset),
        };
        invariant_expected_wallet(&message.sender, &expected)?;
        let notification = TransferNotification::decode(&message.body)?;
        invariant_token_funding_amount(notification.amount, record.deal_amount)?;
        // The buyer is the original sender behind the wallet, not the wallet.
        record.mark_funded(notification.origin)?;
        info!(
            "[escrow] deal {} token-funded by {} (query {})",
            record.context_id, notification.origin, notification.query_id
        );
        Ok(HandleOutcome::none())
    }

    fn handle_resolution(
        &self,
        record: &DealRecord,
        message: &InboundMessage,
        balance: Coins,
        resolution: Resolution,
    ) -> Result<HandleOutcome, EscrowError> {
        invariant_guarantor_authorized(&message.sender, &record.guarantor)?;
        invariant_deal_funded(record.state)?;
        let plan = plan_settlement(record, &self.own_address, resolution)?;
        invariant_fee_coverage(balance, reserved_balance(record), plan.required_fee())?;
        for transfer in &plan.transfers {
            self.sender.send(transfer.clone());
        }
        info!(
            "[escrow] deal {} resolved {:?}: {} transfers, account destroyed",
            record.context_id,
            resolution,
            plan.transfers.len()
        );
        Ok(HandleOutcome {
            outbound: plan.transfers,
            destroyed: plan.destroys_account,
        })
    }

    fn handle_change_wallet_code(
        &self,
        record: &mut DealRecord,
        message: &InboundMessage,
    ) -> Result<HandleOutcome, EscrowError> {
        invariant_seller_authorized(&message.sender, &record.seller)?;
        if record.state.is_funded() {
            return Err(EscrowError::WrongAsset);
        }
        let request = ChangeWalletCode::decode(&message.body)?;
        record.replace_wallet_code(request.code)?;
        debug!("[escrow] deal {} wallet code replaced", record.context_id);
        Ok(HandleOutcome::none())
    }
}

impl<S: MessageSender> EscrowApi for EscrowService<S> {
    fn handle_message(
        &mut self,
        message: &InboundMessage,
        balance: Coins,
    ) -> Result<HandleOutcome, EscrowError> {
        let mut record = decode_record(&self.storage)?;
        let outcome = match message.kind()? {
            InboundKind::PlainTransfer => self.handle_native_funding(&mut record, message)?,
            InboundKind::Op(OP_BUYER_TRANSFER) => {
                self.handle_native_funding(&mut record, message)?
            }
            InboundKind::Op(OP_TRANSFER_NOTIFICATION) => {
                self.handle_token_funding(&mut record, message)?
            }
            InboundKind::Op(OP_APPROVE) => {
                self.handle_resolution(&record, message, balance, Resolution::Approve)?
            }
            InboundKind::Op(OP_CANCEL) => {
                self.handle_resolution(&record, message, balance, Resolution::Cancel)?
            }
            InboundKind::Op(OP_TOP_UP) => {
                debug!(
                    "[escrow] deal {} topped up with {}",
                    record.context_id, message.value
                );
                HandleOutcome::none()
            }
            InboundKind::Op(OP_CHANGE_WALLET_CODE) => {
                self.handle_change_wallet_code(&mut record, message)?
            }
            InboundKind::Op(tag) => return Err(EscrowError::UnknownOperation(tag)),
        };
        if outcome.destroyed {
            self.storage.clear();
        } else {
            self.storage = encode_record(&record)?;
        }
        Ok(outcome)
    }

    fn deal_state(&self) -> Result<DealState, EscrowError> {
        Ok(decode_record(&self.storage)?.state)
    }

    fn royalty_amount(&self) -> Result<Coins, EscrowError> {
        let record = decode_record(&self.storage)?;
        Ok(royalty_amount(record.deal_amount, record.royalty))
    }

    fn deal_record(&self) -> Result<DealRecord, EscrowError> {
        Ok(decode_record(&self.storage)?)
    }
}
