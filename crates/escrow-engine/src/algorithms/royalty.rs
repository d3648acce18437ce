//! # Royalty Arithmetic
//!
//! Capped fixed-point royalty split. The stored rate has three implied
//! decimal digits of percent (raw `1000` = `1.000%`), so converting a rate
//! to a fraction of the deal divides by 100_000. The effective rate is
//! capped at 90% regardless of configuration, protecting the seller from a
//! misconfigured or malicious 100%+ royalty.

use crate::domain::value_objects::{Coins, RoyaltyRate};

/// Maximum effective raw rate: 90%.
pub const ROYALTY_CAP_RAW: u32 = 90_000;

/// Raw-rate units in a whole deal (percent units x 100).
pub const ROYALTY_DIVISOR: u128 = 100_000;

/// Guarantor royalty for a deal amount at a stored rate, cap applied.
pub fn royalty_amount(deal_amount: Coins, rate: RoyaltyRate) -> Coins {
    let capped = rate.raw().min(ROYALTY_CAP_RAW) as u128;
    // 128-bit intermediate: deal_amount * rate cannot overflow.
    (deal_amount as u128 * capped / ROYALTY_DIVISOR) as Coins
}

/// Settlement split of a deal amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoyaltySplit {
    /// Amount released to the seller.
    pub seller_amount: Coins,
    /// Amount retained by the guarantor.
    pub royalty_amount: Coins,
}

/// Split a deal amount into seller and guarantor shares.
///
/// The cap is applied before the seller share is derived, so
/// `seller_amount + royalty_amount == deal_amount` always holds.
pub fn split_deal(deal_amount: Coins, rate: RoyaltyRate) -> RoyaltySplit {
    let royalty_amount = royalty_amount(deal_amount, rate);
    RoyaltySplit {
        seller_amount: deal_amount - royalty_amount,
        royalty_amount,
    }
}
