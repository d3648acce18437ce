//! # Events
//!
//! Inbound message envelope and typed payloads, plus the outbound transfer
//! instructions settlement emits.

pub mod inbound;
pub mod outbound;

pub use inbound::{
    ChangeWalletCode, InboundKind, InboundMessage, TransferNotification, OP_APPROVE,
    OP_BUYER_TRANSFER, OP_CANCEL, OP_CHANGE_WALLET_CODE, OP_TOP_UP, OP_TRANSFER_NOTIFICATION,
};
pub use outbound::OutboundMessage;
