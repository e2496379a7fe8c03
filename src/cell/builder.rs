use num_bigint::BigUint;
use smallvec::SmallVec;

use crate::cell::{Cell, CellSlice, HashBytes, Store, MAX_BIT_LEN, MAX_REF_COUNT};
use crate::error::Error;
use crate::util::unlikely;

/// Builder for constructing cells with densely packed data.
#[derive(Clone)]
pub struct CellBuilder {
    data: [u8; 128],
    bit_len: u16,
    references: SmallVec<[Cell; MAX_REF_COUNT]>,
}

impl Default for CellBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CellBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let byte_len = self.bit_len.div_ceil(8) as usize;
        f.debug_struct("CellBuilder")
            .field("bits", &self.bit_len)
            .field("refs", &self.references.len())
            .field("data", &hex::encode(&self.data[..byte_len]))
            .finish()
    }
}

impl CellBuilder {
    /// Creates an empty cell builder.
    pub fn new() -> Self {
        Self {
            data: [0; 128],
            bit_len: 0,
            references: SmallVec::new(),
        }
    }

    /// Builds a new cell from the specified data using the default finalizer.
    pub fn build_from<T: Store + ?Sized>(data: &T) -> Result<Cell, Error> {
        let mut builder = Self::new();
        ok!(data.store_into(&mut builder));
        builder.build()
    }

    /// Returns the data size of this cell in bits.
    #[inline]
    pub fn bit_len(&self) -> u16 {
        self.bit_len
    }

    /// Returns the number of stored references.
    #[inline]
    pub fn reference_count(&self) -> u8 {
        self.references.len() as u8
    }

    /// Returns remaining data capacity in bits.
    #[inline]
    pub fn spare_bits_capacity(&self) -> u16 {
        MAX_BIT_LEN - self.bit_len
    }

    /// Returns remaining references capacity.
    #[inline]
    pub fn spare_refs_capacity(&self) -> u8 {
        (MAX_REF_COUNT - self.references.len()) as u8
    }

    /// Returns true if there is enough remaining capacity to fit `bits` and `refs`.
    #[inline]
    pub fn has_capacity(&self, bits: u16, refs: u8) -> bool {
        self.bit_len as usize + bits as usize <= MAX_BIT_LEN as usize
            && self.references.len() + refs as usize <= MAX_REF_COUNT
    }

    /// Tries to store the specified number of zero bits.
    pub fn store_zeros(&mut self, bits: u16) -> Result<(), Error> {
        if self.has_capacity(bits, 0) {
            self.bit_len += bits;
            Ok(())
        } else {
            Err(Error::CellOverflow)
        }
    }

    /// Tries to store one zero bit.
    #[inline]
    pub fn store_bit_zero(&mut self) -> Result<(), Error> {
        self.store_zeros(1)
    }

    /// Tries to store one non-zero bit.
    pub fn store_bit_one(&mut self) -> Result<(), Error> {
        if self.bit_len < MAX_BIT_LEN {
            let q = (self.bit_len / 8) as usize;
            let r = self.bit_len % 8;
            self.data[q] |= 1 << (7 - r);
            self.bit_len += 1;
            Ok(())
        } else {
            Err(Error::CellOverflow)
        }
    }

    /// Tries to store one bit.
    #[inline]
    pub fn store_bit(&mut self, value: bool) -> Result<(), Error> {
        if value {
            self.store_bit_one()
        } else {
            self.store_bit_zero()
        }
    }

    /// Tries to store `u8` in the cell.
    #[inline]
    pub fn store_u8(&mut self, value: u8) -> Result<(), Error> {
        self.store_raw(&[value], 8)
    }

    /// Tries to store `u16` in the cell.
    #[inline]
    pub fn store_u16(&mut self, value: u16) -> Result<(), Error> {
        self.store_raw(&value.to_be_bytes(), 16)
    }

    /// Tries to store `u32` in the cell.
    #[inline]
    pub fn store_u32(&mut self, value: u32) -> Result<(), Error> {
        self.store_raw(&value.to_be_bytes(), 32)
    }

    /// Tries to store `u64` in the cell.
    #[inline]
    pub fn store_u64(&mut self, value: u64) -> Result<(), Error> {
        self.store_raw(&value.to_be_bytes(), 64)
    }

    /// Tries to store 32 bytes in the cell.
    #[inline]
    pub fn store_u256(&mut self, value: &HashBytes) -> Result<(), Error> {
        self.store_raw(value.as_slice(), 256)
    }

    /// Tries to store `bits` lowest bits of the `u8`.
    ///
    /// Fails with [`Error::IntOverflow`] if the value has non-zero bits above `bits`.
    pub fn store_small_uint(&mut self, value: u8, bits: u16) -> Result<(), Error> {
        self.store_uint(value as u64, bits)
    }

    /// Tries to store `bits` lowest bits of the `u64`.
    ///
    /// Widths above 64 bits are padded with leading zeros.
    /// Fails with [`Error::IntOverflow`] if the value has non-zero bits above `bits`.
    pub fn store_uint(&mut self, value: u64, bits: u16) -> Result<(), Error> {
        if bits == 0 {
            return if value == 0 {
                Ok(())
            } else {
                Err(Error::IntOverflow)
            };
        }
        if unlikely(!self.has_capacity(bits, 0)) {
            return Err(Error::CellOverflow);
        }
        if bits > 64 {
            ok!(self.store_zeros(bits - 64));
            return self.store_u64(value);
        }
        if bits < 64 && value >> bits != 0 {
            return Err(Error::IntOverflow);
        }

        let value = value << (64 - bits);
        self.store_raw(&value.to_be_bytes(), bits)
    }

    /// Tries to store an arbitrary unsigned integer in exactly `bits` bits.
    pub fn store_biguint(&mut self, value: &BigUint, bits: u16) -> Result<(), Error> {
        if value.bits() > bits as u64 {
            return Err(Error::IntOverflow);
        }
        if unlikely(!self.has_capacity(bits, 0)) {
            return Err(Error::CellOverflow);
        }

        // Align value to the left edge of the byte buffer
        let byte_len = bits.div_ceil(8) as usize;
        let shifted = value << (byte_len * 8 - bits as usize);
        let bytes = shifted.to_bytes_be();
        let mut buffer = vec![0u8; byte_len];
        if *value != BigUint::default() {
            buffer[byte_len - bytes.len()..].copy_from_slice(&bytes);
        }
        self.store_raw(&buffer, bits)
    }

    /// Tries to store `bits` of the left-aligned `value` bytes.
    pub fn store_raw(&mut self, value: &[u8], bits: u16) -> Result<(), Error> {
        if bits == 0 {
            return Ok(());
        }
        if unlikely(!self.has_capacity(bits, 0)) {
            return Err(Error::CellOverflow);
        }

        let byte_len = bits.div_ceil(8) as usize;
        let Some(value) = value.get(..byte_len) else {
            return Err(Error::CellUnderflow);
        };

        let q = (self.bit_len / 8) as usize;
        let r = self.bit_len % 8;
        if r == 0 {
            // xxxxxxxx|yyyyyyyy
            self.data[q..q + byte_len].copy_from_slice(value);
        } else {
            // ___xxxxx|xxxyyyyy|yyy_____
            for (i, byte) in value.iter().enumerate() {
                self.data[q + i] |= byte >> r;
                if let Some(next) = self.data.get_mut(q + i + 1) {
                    *next = byte << (8 - r);
                }
            }
        }

        self.bit_len += bits;

        // Keep all bits after `bit_len` zeroed
        let rem = self.bit_len % 8;
        let mut tail = (self.bit_len / 8) as usize;
        if rem != 0 {
            self.data[tail] &= 0xff << (8 - rem);
            tail += 1;
        }
        let dirty_end = std::cmp::min(q + byte_len + 1, self.data.len());
        if tail < dirty_end {
            self.data[tail..dirty_end].fill(0);
        }

        Ok(())
    }

    /// Tries to store a child in the cell.
    pub fn store_reference(&mut self, cell: Cell) -> Result<(), Error> {
        if self.references.len() < MAX_REF_COUNT {
            self.references.push(cell);
            Ok(())
        } else {
            Err(Error::CellOverflow)
        }
    }

    /// Tries to store the remaining slice data in the cell.
    pub fn store_slice_data(&mut self, slice: &CellSlice<'_>) -> Result<(), Error> {
        let bits = slice.remaining_bits();
        if unlikely(!self.has_capacity(bits, 0)) {
            return Err(Error::CellOverflow);
        }

        let mut buffer = [0u8; 128];
        let mut slice = *slice;
        let data = ok!(slice.load_raw(&mut buffer, bits));
        self.store_raw(data, bits)
    }

    /// Tries to store the remaining slice data and references in the cell.
    pub fn store_slice(&mut self, slice: &CellSlice<'_>) -> Result<(), Error> {
        if unlikely(!self.has_capacity(slice.remaining_bits(), slice.remaining_refs())) {
            return Err(Error::CellOverflow);
        }

        ok!(self.store_slice_data(slice));
        let mut slice = *slice;
        while !slice.is_refs_empty() {
            let child = ok!(slice.load_reference_cloned());
            ok!(self.store_reference(child));
        }
        Ok(())
    }

    /// Tries to build a new cell.
    pub fn build(mut self) -> Result<Cell, Error> {
        debug_assert!(self.bit_len <= MAX_BIT_LEN);
        debug_assert!(self.references.len() <= MAX_REF_COUNT);

        let rem = self.bit_len % 8;
        let last_byte = (self.bit_len / 8) as usize;
        if rem > 0 {
            let last_byte = &mut self.data[last_byte];

            // x0000000 - rem=1, tag_mask=01000000, data_mask=11000000
            // xx000000 - rem=2, tag_mask=00100000, data_mask=11100000
            // ...
            // xxxxxxx0 - rem=7, tag_mask=00000001, data_mask=11111111
            let tag_mask: u8 = 1 << (7 - rem);
            let data_mask = !(tag_mask - 1);

            // xxxxyyyy & data_mask -> xxxxy000 | tag_mask -> xxxx1000
            *last_byte = (*last_byte & data_mask) | tag_mask;
        }

        let byte_len = self.bit_len.div_ceil(8) as usize;
        Cell::from_parts(self.bit_len, &self.data[..byte_len], self.references)
    }
}
