//! # Cell Codec
//!
//! Bit-level writer/reader for the account's binary cell layout. Fields use
//! bounded widths and optional fields are guarded by presence bits; the
//! storage and message layouts above this module are bijective by
//! construction.

use super::errors::CellError;
use super::value_objects::MsgAddress;

/// Bit-level cell writer.
///
/// Bits are appended MSB-first within each byte.
#[derive(Clone, Debug, Default)]
pub struct CellBuilder {
    data: Vec<u8>,
    bit_len: usize,
}

impl CellBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bits written so far.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Append a single bit.
    pub fn store_bit(&mut self, bit: bool) -> &mut Self {
        let byte_idx = self.bit_len / 8;
        if byte_idx == self.data.len() {
            self.data.push(0);
        }
        if bit {
            self.data[byte_idx] |= 0x80 >> (self.bit_len % 8);
        }
        self.bit_len += 1;
        self
    }

    /// Append the low `bits` bits of `value`, MSB-first.
    pub fn store_uint(&mut self, value: u64, bits: usize) -> Result<&mut Self, CellError> {
        debug_assert!(bits <= 64);
        if bits < 64 && value >> bits != 0 {
            return Err(CellError::ValueTooWide { value, bits });
        }
        for i in (0..bits).rev() {
            self.store_bit(value >> i & 1 == 1);
        }
        Ok(self)
    }

    /// Append whole bytes (8 bits each).
    pub fn store_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        for &b in bytes {
            for i in (0..8).rev() {
                self.store_bit(b >> i & 1 == 1);
            }
        }
        self
    }

    /// Append an address: 8-bit workchain, 256-bit account hash.
    pub fn store_address(&mut self, addr: &MsgAddress) -> &mut Self {
        self.store_bytes(&[addr.workchain as u8]);
        self.store_bytes(&addr.hash)
    }

    /// Append an optional address behind a presence bit.
    pub fn store_maybe_address(&mut self, addr: Option<&MsgAddress>) -> &mut Self {
        match addr {
            Some(addr) => {
                self.store_bit(true);
                self.store_address(addr)
            }
            None => self.store_bit(false),
        }
    }

    /// Finish and return the backing bytes, zero-padded to a byte boundary.
    pub fn finish(self) -> Vec<u8> {
        self.data
    }
}

/// Bit-level cell reader over an encoded byte image.
#[derive(Clone, Debug)]
pub struct CellSlice<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> CellSlice<'a> {
    /// Wrap an encoded image for reading.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    /// Bits remaining before the end of the image.
    pub fn remaining_bits(&self) -> usize {
        self.data.len() * 8 - self.bit_pos
    }

    fn ensure(&self, bits: usize) -> Result<(), CellError> {
        if self.remaining_bits() < bits {
            return Err(CellError::Underflow {
                requested: bits,
                remaining: self.remaining_bits(),
            });
        }
        Ok(())
    }

    /// Read a single bit.
    pub fn load_bit(&mut self) -> Result<bool, CellError> {
        self.ensure(1)?;
        let byte = self.data[self.bit_pos / 8];
        let bit = byte >> (7 - self.bit_pos % 8) & 1 == 1;
        self.bit_pos += 1;
        Ok(bit)
    }

    /// Read an unsigned integer of `bits` bits, MSB-first.
    pub fn load_uint(&mut self, bits: usize) -> Result<u64, CellError> {
        debug_assert!(bits <= 64);
        self.ensure(bits)?;
        let mut value = 0u64;
        for _ in 0..bits {
            value = value << 1 | self.load_bit()? as u64;
        }
        Ok(value)
    }

    /// Read `len` whole bytes.
    pub fn load_bytes(&mut self, len: usize) -> Result<Vec<u8>, CellError> {
        self.ensure(len * 8)?;
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            out.push(self.load_uint(8)? as u8);
        }
        Ok(out)
    }

    /// Read an address: 8-bit workchain, 256-bit account hash.
    pub fn load_address(&mut self) -> Result<MsgAddress, CellError> {
        let workchain = self.load_uint(8)? as u8 as i8;
        let raw = self.load_bytes(32)?;
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&raw);
        Ok(MsgAddress::new(workchain, hash))
    }

    /// Read an optional address behind a presence bit.
    pub fn load_maybe_address(&mut self) -> Result<Option<MsgAddress>, CellError> {
        if self.load_bit()? {
            Ok(Some(self.load_address()?))
        } else {
            Ok(None)
        }
    }
}
