//! # Domain Value Objects
//!
//! Immutable value types for the escrow deal state machine.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Smallest-unit amount of the configured asset.
pub type Coins = u64;

/// 256-bit account hash part of an address.
pub type AccountHash = [u8; 32];

/// Chain-native address: signed 8-bit workchain plus 256-bit account hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MsgAddress {
    /// Workchain the account lives in.
    pub workchain: i8,
    /// Account hash within the workchain.
    pub hash: AccountHash,
}

impl MsgAddress {
    /// Create a new address.
    pub fn new(workchain: i8, hash: AccountHash) -> Self {
        Self { workchain, hash }
    }
}

impl fmt::Display for MsgAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.workchain, hex::encode(self.hash))
    }
}

impl fmt::Debug for MsgAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MsgAddress({self})")
    }
}

/// Deal lifecycle state machine.
///
/// There is no stored terminal state: a successful approve or cancel
/// destroys the account instead of writing a flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealState {
    /// Deployed, awaiting funding.
    #[default]
    Init,
    /// Funded by exactly one buyer, awaiting guarantor resolution.
    Funded,
}

impl DealState {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: DealState) -> bool {
        matches!((self, next), (Self::Init, Self::Funded))
    }

    /// Check whether funding has completed.
    pub fn is_funded(&self) -> bool {
        matches!(self, Self::Funded)
    }
}

/// Token-wallet code template.
///
/// Opaque binary blob used to derive the deal's token wallet address.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletCode(Vec<u8>);

impl WalletCode {
    /// Wrap a raw code blob.
    pub fn new(code: Vec<u8>) -> Self {
        Self(code)
    }

    /// Raw code bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// SHA-256 of the code blob.
    pub fn hash(&self) -> AccountHash {
        let mut hasher = Sha256::new();
        hasher.update(&self.0);
        hasher.finalize().into()
    }
}

impl fmt::Debug for WalletCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletCode({} bytes)", self.0.len())
    }
}

/// Asset kind behind the single escrow interface.
///
/// The native kind settles by plain value transfer; the token kind settles
/// through the deal's per-holder wallet sub-contract and its
/// notification-based transfer protocol.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Asset {
    /// The chain's base currency.
    Native,
    /// A fungible-token-standard asset.
    Token {
        /// Token issuer (minter) contract address.
        minter: MsgAddress,
        /// Wallet code template used to derive per-holder wallet addresses.
        wallet_code: WalletCode,
    },
}

impl Asset {
    /// Check whether this is the native-currency kind.
    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }
}

/// Guarantor royalty rate, fixed-point with three implied decimal digits.
///
/// Stored value `1000` means `1.000%`. The settlement engine caps the
/// effective rate at 90% regardless of the stored value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoyaltyRate(u32);

impl RoyaltyRate {
    /// Raw units per percent (three implied decimal digits).
    pub const UNITS_PER_PERCENT: u32 = 1_000;

    /// Construct from the raw fixed-point encoding.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Construct from a whole-percent value.
    pub fn from_percent(percent: u32) -> Self {
        Self(percent * Self::UNITS_PER_PERCENT)
    }

    /// Raw fixed-point value.
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// Outbound message mode bitflags.
///
/// Matches the host chain's send-mode encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMode(u8);

impl SendMode {
    /// Fees are paid on top of the message value instead of deducted from it.
    pub const PAY_FEES_SEPARATELY: SendMode = SendMode(1);
    /// Attach the sender account's entire remaining balance to the message.
    pub const CARRY_ALL_BALANCE: SendMode = SendMode(128);
    /// Delete the sender account once its balance reaches zero.
    pub const DESTROY_IF_ZERO: SendMode = SendMode(32);

    /// Plain send: fees deducted from the message value.
    pub fn ordinary() -> Self {
        SendMode(0)
    }

    /// Remainder + destroy: carry the full residual balance and delete the
    /// sender account.
    pub fn remainder_and_destroy() -> Self {
        Self::CARRY_ALL_BALANCE | Self::DESTROY_IF_ZERO
    }

    /// Raw flag byte.
    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Check whether all of `other`'s flags are set.
    pub fn contains(&self, other: SendMode) -> bool {
        self.0 & other.0 == other.0
    }

    /// Check whether this mode destroys the sending account.
    pub fn destroys_sender(&self) -> bool {
        self.contains(Self::CARRY_ALL_BALANCE | Self::DESTROY_IF_ZERO)
    }
}

impl std::ops::BitOr for SendMode {
    type Output = SendMode;

    fn bitor(self, rhs: SendMode) -> SendMode {
        SendMode(self.0 | rhs.0)
    }
}
