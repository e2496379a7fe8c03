use num_bigint::BigUint;

use super::*;

#[test]
fn empty_cell_hash() {
    let cell = Cell::empty_cell();
    assert!(cell.is_empty());
    assert_eq!(cell.repr_depth(), 0);
    assert_eq!(
        cell.repr_hash().to_string(),
        "96a296d224f285c67bee93c30f8a309157f0daa35dc5b87e410b78630a09cfc7"
    );
}

#[test]
fn descriptor_bytes() {
    let d = CellDescriptor::new(2, 17);
    assert_eq!(d.d1, 2);
    assert_eq!(d.d2, 5);
    assert_eq!(d.byte_len(), 3);
    assert!(!d.is_aligned());

    let d = CellDescriptor::new(0, 1023);
    assert_eq!(d.d2, 255);
    assert_eq!(d.byte_len(), 128);

    let d = CellDescriptor::new(4, 256);
    assert_eq!(d.d2, 64);
    assert!(d.is_aligned());
    assert_eq!(d.reference_count(), 4);
}

#[test]
fn completion_tag() -> anyhow::Result<()> {
    let mut builder = CellBuilder::new();
    builder.store_small_uint(0b101, 3)?;
    let cell = builder.build()?;
    assert_eq!(cell.data(), &[0b1011_0000]);
    assert_eq!(cell.bit_len(), 3);
    Ok(())
}

#[test]
fn unaligned_stores() -> anyhow::Result<()> {
    let mut builder = CellBuilder::new();
    builder.store_bit_one()?;
    builder.store_u32(0xdeadbeef)?;
    builder.store_uint(0x1f, 5)?;
    builder.store_u256(&HashBytes([0xaa; 32]))?;
    let cell = builder.build()?;
    assert_eq!(cell.bit_len(), 1 + 32 + 5 + 256);

    let mut slice = cell.as_slice();
    assert!(slice.load_bit()?);
    assert_eq!(slice.load_u32()?, 0xdeadbeef);
    assert_eq!(slice.load_uint(5)?, 0x1f);
    assert_eq!(slice.load_u256()?, HashBytes([0xaa; 32]));
    assert!(slice.is_data_empty());
    Ok(())
}

#[test]
fn uint_overflow() {
    let mut builder = CellBuilder::new();
    assert_eq!(builder.store_uint(256, 8), Err(Error::IntOverflow));
    assert_eq!(builder.store_uint(1, 0), Err(Error::IntOverflow));
    assert_eq!(builder.bit_len(), 0);
    assert!(builder.store_uint(255, 8).is_ok());
}

#[test]
fn wide_uint() -> anyhow::Result<()> {
    let mut builder = CellBuilder::new();
    builder.store_uint(u64::MAX, 150)?;
    let value = BigUint::from(u64::MAX) << 70usize;
    builder.store_biguint(&value, 150)?;
    let cell = builder.build()?;

    let mut slice = cell.as_slice();
    assert_eq!(slice.load_biguint(150)?, BigUint::from(u64::MAX));
    assert_eq!(slice.load_biguint(150)?, value);
    assert!(slice.is_data_empty());

    let mut builder = CellBuilder::new();
    let too_big = BigUint::from(1u8) << 150usize;
    assert_eq!(builder.store_biguint(&too_big, 150), Err(Error::IntOverflow));
    Ok(())
}

#[test]
fn cell_bounds() -> anyhow::Result<()> {
    let mut builder = CellBuilder::new();
    builder.store_zeros(MAX_BIT_LEN)?;
    assert_eq!(builder.store_bit_one(), Err(Error::CellOverflow));
    assert_eq!(builder.store_bit_zero(), Err(Error::CellOverflow));

    for _ in 0..MAX_REF_COUNT {
        builder.store_reference(Cell::empty_cell())?;
    }
    assert_eq!(
        builder.store_reference(Cell::empty_cell()),
        Err(Error::CellOverflow)
    );

    let cell = builder.build()?;
    assert_eq!(cell.bit_len(), MAX_BIT_LEN);
    assert_eq!(cell.reference_count(), 4);
    assert_eq!(cell.repr_depth(), 1);
    Ok(())
}

#[test]
fn slice_windows() -> anyhow::Result<()> {
    let child = Cell::build(&0xabu8)?;
    let mut builder = CellBuilder::new();
    builder.store_u16(0x1234)?;
    builder.store_reference(child.clone())?;
    let cell = builder.build()?;

    let mut slice = cell.as_slice();
    let prefix = slice.get_prefix(8, 0)?;
    assert_eq!(prefix.remaining_bits(), 8);
    assert_eq!(prefix.remaining_refs(), 0);
    assert_eq!(slice.get_uint(4, 8)?, 0x23);

    slice.skip_first(8, 0)?;
    assert_eq!(slice.load_u8()?, 0x34);
    assert_eq!(slice.load_reference()?, &child);
    assert!(slice.load_reference().is_err());
    assert!(slice.skip_first(1, 0).is_err());
    Ok(())
}

#[test]
fn load_remaining_copies_tail() -> anyhow::Result<()> {
    let mut builder = CellBuilder::new();
    builder.store_u8(1)?;
    builder.store_small_uint(0b11, 2)?;
    builder.store_reference(Cell::empty_cell())?;
    let cell = builder.build()?;

    let mut slice = cell.as_slice();
    slice.load_u8()?;
    let tail = slice.load_remaining()?;
    assert_eq!(tail.bit_len(), 2);
    assert_eq!(tail.reference_count(), 1);
    assert!(slice.is_data_empty() && slice.is_refs_empty());
    Ok(())
}

#[test]
fn uniform_data() -> anyhow::Result<()> {
    let mut builder = CellBuilder::new();
    builder.store_uint(u64::MAX, 64)?;
    builder.store_small_uint(0b111, 3)?;
    let ones = builder.build()?;
    assert_eq!(ones.as_slice().test_uniform(), Some(true));

    let zeros = Cell::build(&0u16)?;
    assert_eq!(zeros.as_slice().test_uniform(), Some(false));

    let mixed = Cell::build(&1u16)?;
    assert_eq!(mixed.as_slice().test_uniform(), None);
    Ok(())
}

#[test]
fn parse_requires_full_consumption() -> anyhow::Result<()> {
    let cell = Cell::build(&0x0102u16)?;
    assert_eq!(cell.parse::<u16>()?, 0x0102);
    assert_eq!(cell.parse::<u8>(), Err(Error::InvalidData));

    let maybe: Option<u32> = Some(7);
    let cell = Cell::build(&maybe)?;
    assert_eq!(cell.bit_len(), 33);
    assert_eq!(cell.parse::<Option<u32>>()?, Some(7));
    Ok(())
}

#[test]
fn hash_bytes_from_str() -> anyhow::Result<()> {
    let s = "0101010101010101010101010101010101010101010101010101010101010101";
    let hash: HashBytes = s.parse()?;
    assert_eq!(hash, HashBytes([1; 32]));
    assert_eq!(format!("0x{s}").parse::<HashBytes>()?, hash);
    assert!("0101".parse::<HashBytes>().is_err());
    Ok(())
}

#[test]
fn equal_content_equal_cells() -> anyhow::Result<()> {
    let a = Cell::build(&(1u32, 2u8))?;
    let b = Cell::build(&(1u32, 2u8))?;
    assert_eq!(a, b);
    assert_eq!(a.repr_hash(), b.repr_hash());
    Ok(())
}
