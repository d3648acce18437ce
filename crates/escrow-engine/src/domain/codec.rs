//! # Storage Codec
//!
//! Bijective mapping between the [`DealRecord`] and its binary account
//! image. Pure (de)serialization: no validation lives here.
//!
//! Layout, in order:
//!
//! ```text
//! context_id   : 32 bits
//! state        : 2 bits          (0 = INIT, 1 = FUNDED)
//! deal_amount  : 64 bits
//! royalty      : 32 bits         (fixed-point, percent x 1000)
//! seller       : 8 + 256 bits
//! guarantor    : 8 + 256 bits
//! buyer        : 1 presence bit [+ 8 + 256 bits]
//! asset        : 1 kind bit      (0 = native, 1 = token)
//!   minter     : 8 + 256 bits          } token kind only
//!   code_len   : 16 bits               }
//!   code       : code_len x 8 bits     }
//! ```

use super::cell::{CellBuilder, CellSlice};
use super::entities::DealRecord;
use super::errors::CellError;
use super::value_objects::{Asset, DealState, RoyaltyRate, WalletCode};

const STATE_INIT: u64 = 0;
const STATE_FUNDED: u64 = 1;

/// Encode a deal record into its account image.
pub fn encode_record(record: &DealRecord) -> Result<Vec<u8>, CellError> {
    let mut builder = CellBuilder::new();
    builder.store_uint(record.context_id as u64, 32)?;
    let state = match record.state {
        DealState::Init => STATE_INIT,
        DealState::Funded => STATE_FUNDED,
    };
    builder.store_uint(state, 2)?;
    builder.store_uint(record.deal_amount, 64)?;
    builder.store_uint(record.royalty.raw() as u64, 32)?;
    builder.store_address(&record.seller);
    builder.store_address(&record.guarantor);
    builder.store_maybe_address(record.buyer.as_ref());
    match &record.asset {
        Asset::Native => {
            builder.store_bit(false);
        }
        Asset::Token {
            minter,
            wallet_code,
        } => {
            builder.store_bit(true);
            builder.store_address(minter);
            builder.store_uint(wallet_code.as_bytes().len() as u64, 16)?;
            builder.store_bytes(wallet_code.as_bytes());
        }
    }
    Ok(builder.finish())
}

/// Decode a deal record from its account image.
pub fn decode_record(image: &[u8]) -> Result<DealRecord, CellError> {
    let mut slice = CellSlice::new(image);
    let context_id = slice.load_uint(32)? as u32;
    let state = match slice.load_uint(2)? {
        STATE_INIT => DealState::Init,
        STATE_FUNDED => DealState::Funded,
        value => {
            return Err(CellError::InvalidValue {
                field: "state",
                value,
            })
        }
    };
    let deal_amount = slice.load_uint(64)?;
    let royalty = RoyaltyRate::from_raw(slice.load_uint(32)? as u32);
    let seller = slice.load_address()?;
    let guarantor = slice.load_address()?;
    let buyer = slice.load_maybe_address()?;
    let asset = if slice.load_bit()? {
        let minter = slice.load_address()?;
        let code_len = slice.load_uint(16)? as usize;
        let code = slice.load_bytes(code_len)?;
        Asset::Token {
            minter,
            wallet_code: WalletCode::new(code),
        }
    } else {
        Asset::Native
    };
    Ok(DealRecord {
        context_id,
        seller,
        guarantor,
        deal_amount,
        asset,
        royalty,
        buyer,
        state,
    })
}
