//! # Inbound Messages
//!
//! Wire model for messages arriving at the escrow account: an envelope
//! (sender, attached value, raw body) plus typed payloads parsed with the
//! cell codec. A body, when present, leads with a 32-bit operation tag.

use crate::domain::cell::{CellBuilder, CellSlice};
use crate::domain::errors::CellError;
use crate::domain::value_objects::{Coins, MsgAddress, WalletCode};
use serde::{Deserialize, Serialize};

/// Guarantor resolves the deal, paying Seller and Guarantor.
pub const OP_APPROVE: u32 = 0xe8c1_5681;
/// Guarantor resolves the deal, refunding Buyer.
pub const OP_CANCEL: u32 = 0xcc0f_2526;
/// Native-currency funding marker; carries no payload.
pub const OP_BUYER_TRANSFER: u32 = 0x9451_eca9;
/// Raise the account balance ahead of settlement; no state change.
pub const OP_TOP_UP: u32 = 0xae98_db22;
/// Seller replaces the token wallet code template (INIT only).
pub const OP_CHANGE_WALLET_CODE: u32 = 0x9eac_de91;
/// Token-standard transfer notification from the deal's token wallet.
pub const OP_TRANSFER_NOTIFICATION: u32 = 0x7362_d09c;

/// Inbound message envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Message sender as authenticated by the chain.
    pub sender: MsgAddress,
    /// Native value attached to the message.
    pub value: Coins,
    /// Raw message body; empty for a plain transfer.
    pub body: Vec<u8>,
}

/// Structural classification of an inbound message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InboundKind {
    /// No body: a plain value transfer.
    PlainTransfer,
    /// Body with a leading 32-bit operation tag.
    Op(u32),
}

impl InboundMessage {
    /// A bodyless value transfer.
    pub fn plain(sender: MsgAddress, value: Coins) -> Self {
        Self {
            sender,
            value,
            body: Vec::new(),
        }
    }

    /// A message carrying only an operation tag.
    pub fn tagged(sender: MsgAddress, value: Coins, op: u32) -> Self {
        let mut builder = CellBuilder::new();
        // A 32-bit store of a u32 cannot overflow its width.
        let _ = builder.store_uint(op as u64, 32);
        Self {
            sender,
            value,
            body: builder.finish(),
        }
    }

    /// A transfer notification as sent by a token wallet.
    pub fn transfer_notification(
        wallet: MsgAddress,
        value: Coins,
        notification: &TransferNotification,
    ) -> Result<Self, CellError> {
        Ok(Self {
            sender: wallet,
            value,
            body: notification.encode()?,
        })
    }

    /// A change-wallet-code request.
    pub fn change_wallet_code(
        sender: MsgAddress,
        value: Coins,
        code: &WalletCode,
    ) -> Result<Self, CellError> {
        Ok(Self {
            sender,
            value,
            body: ChangeWalletCode { code: code.clone() }.encode()?,
        })
    }

    /// Classify the message by body shape.
    pub fn kind(&self) -> Result<InboundKind, CellError> {
        if self.body.is_empty() {
            return Ok(InboundKind::PlainTransfer);
        }
        let mut slice = CellSlice::new(&self.body);
        Ok(InboundKind::Op(slice.load_uint(32)? as u32))
    }
}

/// Token-standard funding signal.
///
/// Sent by the receiving wallet contract after tokens land on it; carries
/// the transferred amount and the original sender, which is the identity
/// recorded as the buyer (the wallet contract itself is not).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferNotification {
    /// Correlation id assigned by the transfer initiator.
    pub query_id: u64,
    /// Token amount transferred, in smallest units.
    pub amount: Coins,
    /// Original sender embedded in the notification payload.
    pub origin: MsgAddress,
}

impl TransferNotification {
    /// Encode to a message body, leading tag included.
    pub fn encode(&self) -> Result<Vec<u8>, CellError> {
        let mut builder = CellBuilder::new();
        builder.store_uint(OP_TRANSFER_NOTIFICATION as u64, 32)?;
        builder.store_uint(self.query_id, 64)?;
        builder.store_uint(self.amount, 64)?;
        builder.store_address(&self.origin);
        Ok(builder.finish())
    }

    /// Decode from a message body, skipping the leading tag.
    pub fn decode(body: &[u8]) -> Result<Self, CellError> {
        let mut slice = CellSlice::new(body);
        slice.load_uint(32)?;
        Ok(Self {
            query_id: slice.load_uint(64)?,
            amount: slice.load_uint(64)?,
            origin: slice.load_address()?,
        })
    }
}

/// Seller's request to replace the token wallet code template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeWalletCode {
    /// Replacement template.
    pub code: WalletCode,
}

impl ChangeWalletCode {
    /// Encode to a message body, leading tag included.
    pub fn encode(&self) -> Result<Vec<u8>, CellError> {
        let mut builder = CellBuilder::new();
        builder.store_uint(OP_CHANGE_WALLET_CODE as u64, 32)?;
        builder.store_uint(self.code.as_bytes().len() as u64, 16)?;
        builder.store_bytes(self.code.as_bytes());
        Ok(builder.finish())
    }

    /// Decode from a message body, skipping the leading tag.
    pub fn decode(body: &[u8]) -> Result<Self, CellError> {
        let mut slice = CellSlice::new(body);
        slice.load_uint(32)?;
        let len = slice.load_uint(16)? as usize;
        let code = slice.load_bytes(len)?;
        Ok(Self {
            code: WalletCode::new(code),
        })
    }
}
