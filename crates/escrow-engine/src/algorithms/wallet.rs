//! # Token Wallet Derivation
//!
//! The token standard gives every holder a wallet sub-contract whose
//! address is a pure function of (holder, minter, wallet code template).
//! The escrow uses this to validate that a funding notification really
//! came from its own wallet, and to address settlement instructions.

use crate::domain::value_objects::{MsgAddress, WalletCode};
use sha2::{Digest, Sha256};

/// Derive the deterministic wallet address for a holder.
///
/// The account hash commits to the code template, the minter, and the
/// holder; the wallet lives in the minter's workchain.
pub fn derive_wallet_address(
    holder: &MsgAddress,
    minter: &MsgAddress,
    wallet_code: &WalletCode,
) -> MsgAddress {
    let mut hasher = Sha256::new();
    hasher.update(wallet_code.hash());
    hasher.update([minter.workchain as u8]);
    hasher.update(minter.hash);
    hasher.update([holder.workchain as u8]);
    hasher.update(holder.hash);
    MsgAddress::new(minter.workchain, hasher.finalize().into())
}
