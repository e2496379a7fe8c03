use super::*;
use crate::cell::{CellBuilder, HashBytes};

const EMPTY_CELL_BOC: &str = "b5ee9c72010101010002000000";

#[test]
fn empty_cell() -> anyhow::Result<()> {
    let cell = Cell::empty_cell();
    let boc = Boc::encode(&cell);
    assert_eq!(hex::encode(&boc), EMPTY_CELL_BOC);
    assert_eq!(Boc::encode_base64(&cell), "te6ccgEBAQEAAgAAAA==");

    let decoded = Boc::decode(hex::decode(EMPTY_CELL_BOC)?)?;
    assert_eq!(decoded, cell);
    Ok(())
}

#[test]
fn boc_with_crc() -> anyhow::Result<()> {
    let cell = build_tree()?;

    let boc = Boc::encode_with_crc(&cell);
    assert_eq!(boc[4] & 0b0100_0000, 0b0100_0000);
    assert_eq!(Boc::decode(&boc)?, cell);

    let mut broken = boc.clone();
    let last = broken.len() - 1;
    broken[last] ^= 0xff;
    assert_eq!(Boc::decode(&broken).unwrap_err(), de::Error::InvalidChecksum);
    Ok(())
}

#[test]
fn shared_cells_are_stored_once() -> anyhow::Result<()> {
    let shared = CellBuilder::build_from(&0xdeadbeefu32)?;

    let mut builder = CellBuilder::new();
    builder.store_reference(shared.clone())?;
    builder.store_reference(shared.clone())?;
    let root = builder.build()?;

    let boc = Boc::encode(&root);
    let header = de::BocHeader::decode(&boc)?;
    assert_eq!(header.cells().len(), 2);
    assert_eq!(header.ref_size(), 1);

    let decoded = header.finalize()?;
    assert_eq!(decoded.repr_hash(), root.repr_hash());
    assert_eq!(decoded.reference(0), decoded.reference(1));
    Ok(())
}

#[test]
fn deterministic_encoding() -> anyhow::Result<()> {
    let cell = build_tree()?;
    assert_eq!(Boc::encode(&cell), Boc::encode(&cell));

    let decoded = Boc::decode_base64(Boc::encode_base64(&cell))?;
    assert_eq!(decoded, cell);
    assert_eq!(decoded.repr_depth(), 2);
    Ok(())
}

#[test]
fn invalid_bocs() {
    assert_eq!(Boc::decode([0u8; 0]).unwrap_err(), de::Error::UnexpectedEof);
    assert_eq!(
        Boc::decode([0u8; 16]).unwrap_err(),
        de::Error::UnknownBocTag
    );

    let mut boc = hex::decode(EMPTY_CELL_BOC).unwrap();
    boc.pop();
    assert!(Boc::decode(&boc).is_err());

    // Zero ref size
    let mut boc = hex::decode(EMPTY_CELL_BOC).unwrap();
    boc[4] = 0;
    assert_eq!(Boc::decode(&boc).unwrap_err(), de::Error::InvalidRefSize);

    assert!(Boc::decode_base64("not a boc").is_err());
}

#[test]
fn child_before_parent_is_rejected() {
    // Two cells where the root (index 0) is referenced by the cell 1
    let boc = [
        0xb5, 0xee, 0x9c, 0x72, // tag
        0x01, 0x01, // flags, offset size
        0x02, 0x01, 0x00, // cells, roots, absent
        0x05, // total cells size
        0x01, // root index
        0x00, 0x00, // cell 0: empty
        0x01, 0x00, 0x00, // cell 1: one ref to cell 0
    ];
    assert_eq!(Boc::decode(boc).unwrap_err(), de::Error::InvalidRefOrder);
}

fn build_tree() -> anyhow::Result<Cell> {
    let leaf = CellBuilder::build_from(&HashBytes([0x55; 32]))?;

    let mut middle = CellBuilder::new();
    middle.store_small_uint(0b101, 3)?;
    middle.store_reference(leaf)?;
    let middle = middle.build()?;

    let mut root = CellBuilder::new();
    root.store_u32(0x0f8a7ea5)?;
    root.store_reference(middle)?;
    root.store_reference(Cell::empty_cell())?;
    Ok(root.build()?)
}
