use num_bigint::BigUint;

use crate::cell::{Cell, CellBuilder, HashBytes};
use crate::error::Error;

/// A read-only view for a subrange of a cell.
#[derive(Debug, Clone, Copy)]
pub struct CellSlice<'a> {
    cell: &'a Cell,
    bits_window_start: u16,
    bits_window_end: u16,
    refs_window_start: u8,
    refs_window_end: u8,
}

impl<'a> CellSlice<'a> {
    /// Constructs a new cell slice from the specified cell.
    pub fn new(cell: &'a Cell) -> Self {
        Self {
            bits_window_start: 0,
            bits_window_end: cell.bit_len(),
            refs_window_start: 0,
            refs_window_end: cell.reference_count(),
            cell,
        }
    }

    /// Returns a reference to the underlying cell.
    #[inline]
    pub fn cell(&self) -> &'a Cell {
        self.cell
    }

    /// Returns whether there are no data bits left.
    #[inline]
    pub fn is_data_empty(&self) -> bool {
        self.bits_window_start >= self.bits_window_end
    }

    /// Returns whether there are no references left.
    #[inline]
    pub fn is_refs_empty(&self) -> bool {
        self.refs_window_start >= self.refs_window_end
    }

    /// Returns the number of remaining references in the slice.
    #[inline]
    pub fn remaining_refs(&self) -> u8 {
        self.refs_window_end.saturating_sub(self.refs_window_start)
    }

    /// Returns the number of remaining bits of data in the slice.
    #[inline]
    pub fn remaining_bits(&self) -> u16 {
        self.bits_window_end.saturating_sub(self.bits_window_start)
    }

    /// Returns the start of the data window.
    #[inline]
    pub fn offset_bits(&self) -> u16 {
        self.bits_window_start
    }

    /// Returns true if the slice contains at least `bits` and `refs`.
    #[inline]
    pub fn has_remaining(&self, bits: u16, refs: u8) -> bool {
        self.bits_window_start as usize + bits as usize <= self.bits_window_end as usize
            && self.refs_window_start as usize + refs as usize <= self.refs_window_end as usize
    }

    /// Tries to advance the start of data and refs windows,
    /// returns `false` if `bits` or `refs` are greater than the remainder.
    pub fn try_advance(&mut self, bits: u16, refs: u8) -> bool {
        if self.has_remaining(bits, refs) {
            self.bits_window_start += bits;
            self.refs_window_start += refs;
            true
        } else {
            false
        }
    }

    /// Advances the start of data and refs windows.
    pub fn skip_first(&mut self, bits: u16, refs: u8) -> Result<(), Error> {
        if self.try_advance(bits, refs) {
            Ok(())
        } else {
            Err(Error::CellUnderflow)
        }
    }

    /// Returns a subslice with the first `bits` and `refs` of this slice.
    pub fn get_prefix(&self, bits: u16, refs: u8) -> Result<Self, Error> {
        if self.has_remaining(bits, refs) {
            Ok(Self {
                bits_window_end: self.bits_window_start + bits,
                refs_window_end: self.refs_window_start + refs,
                ..*self
            })
        } else {
            Err(Error::CellUnderflow)
        }
    }

    /// Tries to read the bit at the specified offset (relative to the current bits window).
    pub fn get_bit(&self, offset: u16) -> Result<bool, Error> {
        if self.bits_window_start as usize + offset as usize >= self.bits_window_end as usize {
            return Err(Error::CellUnderflow);
        }

        let index = self.bits_window_start + offset;
        match self.cell.data().get((index / 8) as usize) {
            Some(byte) => Ok((byte >> (7 - index % 8)) & 1 != 0),
            None => Err(Error::CellUnderflow),
        }
    }

    /// Tries to read the next bit, incrementing the bits window start.
    pub fn load_bit(&mut self) -> Result<bool, Error> {
        let bit = ok!(self.get_bit(0));
        self.bits_window_start += 1;
        Ok(bit)
    }

    /// Reads `bits` (0..=64) starting from the `offset` as an unsigned integer.
    pub fn get_uint(&self, offset: u16, bits: u16) -> Result<u64, Error> {
        if bits == 0 {
            return Ok(0);
        }
        if bits > 64 {
            return Err(Error::IntOverflow);
        }
        if !self.has_remaining(offset.saturating_add(bits), 0) {
            return Err(Error::CellUnderflow);
        }

        let index = self.bits_window_start + offset;
        let q = (index / 8) as usize;
        let r = (index % 8) as u32;

        // At most 9 bytes are needed for 64 bits with an offset
        let data = self.cell.data();
        let available = std::cmp::min(data.len().saturating_sub(q), 9);
        let mut bytes = [0u8; 16];
        bytes[..available].copy_from_slice(&data[q..q + available]);

        let value = u128::from_be_bytes(bytes);
        Ok(((value << r) >> (128 - bits as u32)) as u64)
    }

    /// Tries to read the next `bits` (0..=64) as an unsigned integer,
    /// incrementing the bits window start.
    pub fn load_uint(&mut self, bits: u16) -> Result<u64, Error> {
        let value = ok!(self.get_uint(0, bits));
        self.bits_window_start += bits;
        Ok(value)
    }

    /// Tries to read the next small subset of `bits` (0..=8).
    #[inline]
    pub fn load_small_uint(&mut self, bits: u16) -> Result<u8, Error> {
        debug_assert!(bits <= 8);
        match self.load_uint(bits) {
            Ok(value) => Ok(value as u8),
            Err(e) => Err(e),
        }
    }

    /// Tries to read the next `u8`.
    #[inline]
    pub fn load_u8(&mut self) -> Result<u8, Error> {
        self.load_small_uint(8)
    }

    /// Tries to read the next `u16`.
    #[inline]
    pub fn load_u16(&mut self) -> Result<u16, Error> {
        match self.load_uint(16) {
            Ok(value) => Ok(value as u16),
            Err(e) => Err(e),
        }
    }

    /// Tries to read the next `u32`.
    #[inline]
    pub fn load_u32(&mut self) -> Result<u32, Error> {
        match self.load_uint(32) {
            Ok(value) => Ok(value as u32),
            Err(e) => Err(e),
        }
    }

    /// Tries to read the next `u64`.
    #[inline]
    pub fn load_u64(&mut self) -> Result<u64, Error> {
        self.load_uint(64)
    }

    /// Tries to read the next 32 bytes.
    pub fn load_u256(&mut self) -> Result<HashBytes, Error> {
        let mut result = HashBytes::ZERO;
        ok!(self.load_raw(&mut result.0, 256));
        Ok(result)
    }

    /// Tries to read the next `bits` into the left-aligned target buffer.
    pub fn load_raw<'b>(&mut self, target: &'b mut [u8], bits: u16) -> Result<&'b [u8], Error> {
        let byte_len = bits.div_ceil(8) as usize;
        if target.len() < byte_len {
            return Err(Error::InvalidData);
        }
        if !self.has_remaining(bits, 0) {
            return Err(Error::CellUnderflow);
        }

        for (i, byte) in target[..byte_len].iter_mut().enumerate() {
            let offset = i as u16 * 8;
            let chunk = std::cmp::min(8, bits - offset);
            let value = ok!(self.get_uint(offset, chunk)) as u8;
            *byte = value << (8 - chunk);
        }

        self.bits_window_start += bits;
        Ok(&target[..byte_len])
    }

    /// Tries to read the next `bits` as an arbitrary unsigned integer.
    pub fn load_biguint(&mut self, bits: u16) -> Result<BigUint, Error> {
        let mut buffer = [0u8; 128];
        let byte_len = bits.div_ceil(8) as usize;
        let data = ok!(self.load_raw(&mut buffer, bits));
        let value = BigUint::from_bytes_be(data);
        Ok(value >> (byte_len * 8 - bits as usize))
    }

    /// Returns `Some(bit)` if all remaining data bits are equal to `bit`.
    pub fn test_uniform(&self) -> Option<bool> {
        if self.is_data_empty() {
            return None;
        }

        let first = self.get_bit(0).ok()?;
        let bits = self.remaining_bits();
        let mut offset = 0;
        while offset < bits {
            let chunk = std::cmp::min(64, bits - offset);
            let value = self.get_uint(offset, chunk).ok()?;
            let expected = if first {
                u64::MAX >> (64 - chunk)
            } else {
                0
            };
            if value != expected {
                return None;
            }
            offset += chunk;
        }
        Some(first)
    }

    /// Returns a reference to the Nth child cell (relative to this slice's refs window).
    pub fn get_reference(&self, index: u8) -> Result<&'a Cell, Error> {
        if self.refs_window_start as usize + (index as usize) < self.refs_window_end as usize {
            match self.cell.reference(self.refs_window_start + index) {
                Some(cell) => Ok(cell),
                None => Err(Error::CellUnderflow),
            }
        } else {
            Err(Error::CellUnderflow)
        }
    }

    /// Returns the next child cell, incrementing the refs window start.
    pub fn load_reference(&mut self) -> Result<&'a Cell, Error> {
        let cell = ok!(self.get_reference(0));
        self.refs_window_start += 1;
        Ok(cell)
    }

    /// Returns the next child cell as an owned value.
    #[inline]
    pub fn load_reference_cloned(&mut self) -> Result<Cell, Error> {
        match self.load_reference() {
            Ok(cell) => Ok(cell.clone()),
            Err(e) => Err(e),
        }
    }

    /// Returns the next child cell as a slice.
    #[inline]
    pub fn load_reference_as_slice(&mut self) -> Result<CellSlice<'a>, Error> {
        match self.load_reference() {
            Ok(cell) => Ok(cell.as_slice()),
            Err(e) => Err(e),
        }
    }

    /// Copies the remaining data and references into a new cell
    /// and consumes them from this slice.
    pub fn load_remaining(&mut self) -> Result<Cell, Error> {
        let mut builder = CellBuilder::new();
        ok!(builder.store_slice(self));
        let cell = ok!(builder.build());
        self.bits_window_start = self.bits_window_end;
        self.refs_window_start = self.refs_window_end;
        Ok(cell)
    }

    /// Loads a value of `T` from the current position.
    #[inline]
    pub fn load<T: crate::cell::Load<'a>>(&mut self) -> Result<T, Error> {
        T::load_from(self)
    }
}
