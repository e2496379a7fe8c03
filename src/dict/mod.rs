//! Dictionary implementation.
//!
//! Dictionaries are serialized as TVM `HashmapE` with fixed-width
//! unsigned keys (up to 64 bits) and values stored inline in leaves:
//!
//! ```text
//! hm_edge#_ {n:#} {X:Type} {l:#} {m:#} label:(HmLabel ~l n)
//!           {n = (~m) + l} node:(HashmapNode m X) = Hashmap n X;
//!
//! hmn_leaf#_ {X:Type} value:X = HashmapNode 0 X;
//! hmn_fork#_ {n:#} {X:Type} left:^(Hashmap n X)
//!            right:^(Hashmap n X) = HashmapNode (n + 1) X;
//!
//! hml_short$0 {m:#} {n:#} len:(Unary ~n) {n <= m} s:(n * Bit) = HmLabel ~n m;
//! hml_long$10 {m:#} n:(#<= m) s:(n * Bit) = HmLabel ~n m;
//! hml_same$11 {m:#} v:Bit n:(#<= m) = HmLabel ~n m;
//! ```

use std::collections::BTreeMap;

use crate::cell::*;
use crate::error::{DexError, Error};
use crate::util::unlikely;

/// The widest supported key.
pub const MAX_KEY_BITS: u16 = 64;

/// Builds a dictionary root from the specified entries.
///
/// Returns `None` for an empty input. Entries are sorted by key before
/// building, duplicate keys are rejected.
pub fn encode_dict<I>(key_bits: u16, entries: I) -> Result<Option<Cell>, DexError>
where
    I: IntoIterator<Item = (u64, Cell)>,
{
    if unlikely(key_bits > MAX_KEY_BITS) {
        return Err(DexError::Cell(Error::IntOverflow));
    }

    let mut entries = entries.into_iter().collect::<Vec<_>>();
    if entries.is_empty() {
        return Ok(None);
    }

    for (key, _) in &entries {
        if *key & !mask(key_bits) != 0 {
            return Err(DexError::FieldOverflow {
                field: "dict key",
                bits: key_bits,
            });
        }
    }

    entries.sort_unstable_by_key(|(key, _)| *key);
    if entries.windows(2).any(|pair| pair[0].0 == pair[1].0) {
        return Err(DexError::Cell(Error::InvalidData));
    }

    match build_node(&entries, key_bits) {
        Ok(root) => Ok(Some(root)),
        Err(e) => Err(DexError::Cell(e)),
    }
}

/// Builds a dictionary root from values which can be stored into a cell.
pub fn encode_dict_typed<I, V>(key_bits: u16, entries: I) -> Result<Option<Cell>, DexError>
where
    I: IntoIterator<Item = (u64, V)>,
    V: Store,
{
    let mut cells = Vec::new();
    for (key, value) in entries {
        cells.push((key, CellBuilder::build_from(&value)?));
    }
    encode_dict(key_bits, cells)
}

/// Reads all entries of the dictionary.
///
/// An absent dictionary is an empty map.
pub fn decode_dict(root: Option<&Cell>, key_bits: u16) -> Result<BTreeMap<u64, Cell>, DexError> {
    if unlikely(key_bits > MAX_KEY_BITS) {
        return Err(DexError::Cell(Error::IntOverflow));
    }

    let mut result = BTreeMap::new();
    if let Some(root) = root {
        ok!(read_node(root, key_bits, 0, &mut result));
    }
    Ok(result)
}

/// Reads all entries of the dictionary and parses each value as `V`.
pub fn decode_dict_typed<V>(
    root: Option<&Cell>,
    key_bits: u16,
) -> Result<BTreeMap<u64, V>, DexError>
where
    for<'a> V: Load<'a>,
{
    let cells = ok!(decode_dict(root, key_bits));

    let mut result = BTreeMap::new();
    for (key, cell) in &cells {
        result.insert(*key, cell.parse::<V>()?);
    }
    Ok(result)
}

/// Builds an edge for the sorted entries with `m` remaining key bits.
fn build_node(entries: &[(u64, Cell)], m: u16) -> Result<Cell, Error> {
    let mut builder = CellBuilder::new();

    if let [(key, value)] = entries {
        ok!(write_label(*key & mask(m), m, m, &mut builder));
        ok!(builder.store_slice(&value.as_slice()));
        return builder.build();
    }

    let (Some((first, _)), Some((last, _))) = (entries.first(), entries.last()) else {
        return Err(Error::InvalidData);
    };
    let first = *first & mask(m);

    // Entries are sorted, so the common prefix of the first and
    // the last key is shared by all of them
    let diff = first ^ (*last & mask(m));
    if diff == 0 {
        return Err(Error::InvalidData);
    }
    let lcp = (diff.leading_zeros() - (64 - m as u32)) as u16;

    ok!(write_label(shr(first, m - lcp), lcp, m, &mut builder));

    // Fork on the bit right after the common prefix
    let rest = m - lcp - 1;
    let split = entries.partition_point(|(key, _)| (*key >> rest) & 1 == 0);
    let (left, right) = entries.split_at(split);

    ok!(builder.store_reference(ok!(build_node(left, rest))));
    ok!(builder.store_reference(ok!(build_node(right, rest))));
    builder.build()
}

fn read_node(
    cell: &Cell,
    m: u16,
    prefix: u64,
    result: &mut BTreeMap<u64, Cell>,
) -> Result<(), DexError> {
    let mut slice = cell.as_slice();
    let (label, len) = read_label(&mut slice, m)?;
    let key = shl(prefix, len) | label;

    if len == m {
        let value = slice.load_remaining()?;
        if result.insert(key, value).is_some() {
            return Err(DexError::Cell(Error::InvalidData));
        }
        return Ok(());
    }

    if !slice.is_data_empty() || slice.remaining_refs() != 2 {
        return Err(DexError::Cell(Error::InvalidData));
    }

    let rest = m - len - 1;
    for bit in 0..2u64 {
        let child = slice.load_reference()?;
        ok!(read_node(child, rest, (key << 1) | bit, result));
    }
    Ok(())
}

/// Writes the label with the shortest representation.
fn write_label(value: u64, len: u16, m: u16, label: &mut CellBuilder) -> Result<(), Error> {
    debug_assert!(len <= m && m <= MAX_KEY_BITS);

    if m == 0 || len == 0 {
        return write_hml_empty(label);
    }

    let bits_for_len = bits_for_len(m);

    let hml_short_len = 2 + 2 * len;
    let hml_long_len = 2 + bits_for_len + len;
    let hml_same_len = 3 + bits_for_len;

    if hml_same_len < hml_long_len && hml_same_len < hml_short_len {
        if value == 0 {
            return write_hml_same(false, len, bits_for_len, label);
        } else if value == mask(len) {
            return write_hml_same(true, len, bits_for_len, label);
        }
    }

    if hml_short_len <= MAX_BIT_LEN && hml_short_len <= hml_long_len {
        ok!(write_hml_short_tag(len, label));
    } else {
        ok!(write_hml_long_tag(len, bits_for_len, label));
    }
    label.store_uint(value, len)
}

/// Reads the label and returns its bits with their length.
fn read_label(label: &mut CellSlice<'_>, m: u16) -> Result<(u64, u16), Error> {
    let bits_for_len = bits_for_len(m);

    let (value, len) = if !ok!(label.load_bit()) {
        // hml_short$0
        let mut len = 0;
        while ok!(label.load_bit()) {
            len += 1;
            if unlikely(len > m) {
                return Err(Error::InvalidData);
            }
        }
        (ok!(label.load_uint(len)), len)
    } else if !ok!(label.load_bit()) {
        // hml_long$10
        let len = ok!(label.load_uint(bits_for_len)) as u16;
        if unlikely(len > m) {
            return Err(Error::InvalidData);
        }
        (ok!(label.load_uint(len)), len)
    } else {
        // hml_same$11
        let bit = ok!(label.load_bit());
        let len = ok!(label.load_uint(bits_for_len)) as u16;
        if unlikely(len > m) {
            return Err(Error::InvalidData);
        }
        (if bit { mask(len) } else { 0 }, len)
    };

    Ok((value, len))
}

fn write_hml_empty(label: &mut CellBuilder) -> Result<(), Error> {
    label.store_zeros(2)
}

fn write_hml_short_tag(len: u16, label: &mut CellBuilder) -> Result<(), Error> {
    ok!(label.store_bit_zero());

    for _ in 0..len / 32 {
        ok!(label.store_u32(u32::MAX));
    }

    let rem = len % 32;
    if rem != 0 {
        ok!(label.store_uint(mask(rem), rem));
    }
    label.store_bit_zero()
}

fn write_hml_long_tag(len: u16, bits_for_len: u16, label: &mut CellBuilder) -> Result<(), Error> {
    ok!(label.store_bit_one());
    ok!(label.store_bit_zero());
    label.store_uint(len as u64, bits_for_len)
}

fn write_hml_same(
    bit: bool,
    len: u16,
    bits_for_len: u16,
    label: &mut CellBuilder,
) -> Result<(), Error> {
    ok!(label.store_small_uint(0b110 | bit as u8, 3));
    label.store_uint(len as u64, bits_for_len)
}

#[inline]
const fn bits_for_len(m: u16) -> u16 {
    (16 - m.leading_zeros()) as u16
}

#[inline]
const fn mask(bits: u16) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

#[inline]
const fn shr(value: u64, bits: u16) -> u64 {
    if bits >= 64 {
        0
    } else {
        value >> bits
    }
}

#[inline]
const fn shl(value: u64, bits: u16) -> u64 {
    if bits >= 64 {
        0
    } else {
        value << bits
    }
}
