//! # Outbound Messages
//!
//! Transfers the settlement engine emits. Fire-and-forget: the contract
//! has no channel to observe downstream failure of an emitted transfer.

use crate::domain::value_objects::{Coins, MsgAddress, SendMode};
use serde::{Deserialize, Serialize};

/// An outbound transfer instruction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutboundMessage {
    /// Plain native-currency transfer.
    NativeTransfer {
        /// Recipient account.
        to: MsgAddress,
        /// Attached value.
        value: Coins,
        /// Send-mode flags.
        mode: SendMode,
    },
    /// Instruction to the deal's token wallet to forward holdings.
    TokenTransfer {
        /// The wallet sub-contract being instructed.
        wallet: MsgAddress,
        /// Token amount to forward, in smallest units.
        amount: Coins,
        /// Final recipient of the tokens.
        destination: MsgAddress,
        /// Native value attached to carry the instruction.
        value: Coins,
        /// Send-mode flags.
        mode: SendMode,
    },
}

impl OutboundMessage {
    /// Send-mode flags of the message.
    pub fn mode(&self) -> SendMode {
        match self {
            OutboundMessage::NativeTransfer { mode, .. }
            | OutboundMessage::TokenTransfer { mode, .. } => *mode,
        }
    }

    /// Native value attached to the message.
    pub fn attached_value(&self) -> Coins {
        match self {
            OutboundMessage::NativeTransfer { value, .. }
            | OutboundMessage::TokenTransfer { value, .. } => *value,
        }
    }

    /// Whether sending this message deletes the sender account.
    pub fn destroys_sender(&self) -> bool {
        self.mode().destroys_sender()
    }
}
