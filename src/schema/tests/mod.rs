use super::*;
use crate::cell::HashBytes;

fn addr(byte: u8) -> StdAddr {
    StdAddr::new(0, HashBytes([byte; 32]))
}

fn sample_value(kind: FieldKind, seed: u8) -> FieldValue {
    match kind {
        FieldKind::Uint(bits) => FieldValue::Uint(if bits >= 8 { seed as u64 } else { 1 }),
        FieldKind::Coins => FieldValue::Coins(Tokens::new(1_000_000_000 + seed as u128)),
        FieldKind::Address => FieldValue::Address(addr(seed)),
        FieldKind::AddressOrNone if seed % 2 == 0 => FieldValue::AddressOrNone(None),
        FieldKind::AddressOrNone => FieldValue::AddressOrNone(Some(addr(seed))),
        FieldKind::MaybeAddress => FieldValue::MaybeAddress(Some(addr(seed))),
        FieldKind::Bit => FieldValue::Bit(seed % 2 == 1),
        FieldKind::MaybeRef if seed % 2 == 0 => FieldValue::MaybeRef(None),
        FieldKind::MaybeRef => FieldValue::MaybeRef(Some(Cell::empty_cell())),
        FieldKind::Ref(RefKind::Nested(schema)) => FieldValue::Nested(sample_fields(schema)),
        FieldKind::Ref(RefKind::Any) => FieldValue::Ref(Cell::empty_cell()),
    }
}

fn sample_fields(schema: &Schema) -> Fields {
    schema
        .fields
        .iter()
        .enumerate()
        .map(|(i, desc)| (desc.name, sample_value(desc.kind, i as u8 + 1)))
        .collect()
}

#[test]
fn every_schema_round_trips() -> anyhow::Result<()> {
    for schema in all_schemas() {
        let fields = sample_fields(schema);
        let cell = schema.encode(&fields)?;
        assert_eq!(schema.decode(&cell)?, fields, "{}", schema.name);

        // Same input, same bytes
        let other = schema.encode(&fields)?;
        assert_eq!(cell.repr_hash(), other.repr_hash(), "{}", schema.name);
    }
    Ok(())
}

#[test]
fn opcodes_are_unique_per_layout() {
    let mut seen = std::collections::BTreeMap::<u32, &str>::new();
    for schema in all_schemas() {
        let Some(opcode) = schema.opcode else {
            continue;
        };
        if let Some(prev) = seen.insert(opcode, schema.name) {
            // Farm stake and claim layouts share opcodes between versions
            assert!(
                matches!(opcode, opcodes::STAKE | opcodes::CLAIM_REWARDS),
                "{prev} and {} share {opcode:#x}",
                schema.name
            );
        }
    }
}

#[test]
fn swap_v1_layout() -> anyhow::Result<()> {
    let fields = Fields::new()
        .with("ask_jetton_wallet", addr(0xaa))
        .with("min_ask_amount", Tokens::ZERO)
        .with("user_wallet", addr(0xbb))
        .with("referral", FieldValue::MaybeAddress(None));
    let cell = SWAP_V1.encode(&fields)?;
    assert_eq!(cell.bit_len(), 32 + 267 + 4 + 267 + 1);
    assert_eq!(cell.reference_count(), 0);

    let mut expected = CellBuilder::new();
    expected.store_u32(0x25938561)?;
    expected.store_small_uint(0b100, 3)?;
    expected.store_u8(0)?;
    expected.store_u256(&HashBytes([0xaa; 32]))?;
    expected.store_small_uint(0, 4)?;
    expected.store_small_uint(0b100, 3)?;
    expected.store_u8(0)?;
    expected.store_u256(&HashBytes([0xbb; 32]))?;
    expected.store_bit_zero()?;
    assert_eq!(cell, expected.build()?);
    Ok(())
}

#[test]
fn field_overflow() {
    let fields = Fields::new()
        .with("query_id", 0u64)
        .with("claim_all", false)
        .with("pool_index", 256u64);
    assert!(matches!(
        CLAIM_REWARDS_V3.encode(&fields),
        Err(DexError::FieldOverflow {
            field: "pool_index",
            bits: 8
        })
    ));

    let fields = SWAP_V2_ADDITIONAL_DATA
        .fields
        .iter()
        .map(|desc| (desc.name, sample_value(desc.kind, 3)))
        .collect::<Fields>()
        .with("min_ask_amount", Tokens::new(1 << 120));
    assert!(matches!(
        SWAP_V2_ADDITIONAL_DATA.encode(&fields),
        Err(DexError::FieldOverflow {
            field: "min_ask_amount",
            ..
        })
    ));
}

#[test]
fn cell_overflow_names_the_field() {
    static TOO_WIDE: Schema = Schema {
        name: "too_wide",
        opcode: Some(1),
        fields: &[
            FieldDesc::new("a0", FieldKind::Address),
            FieldDesc::new("a1", FieldKind::Address),
            FieldDesc::new("a2", FieldKind::Address),
            FieldDesc::new("a3", FieldKind::Address),
        ],
    };

    let fields = sample_fields(&TOO_WIDE);
    assert!(matches!(
        TOO_WIDE.encode(&fields),
        Err(DexError::CellOverflow { field: "a3" })
    ));
}

#[test]
fn missing_and_mismatched_fields() {
    let fields = Fields::new().with("query_id", 1u64);
    assert!(matches!(
        REFUND_ME_V2.encode(&fields),
        Err(DexError::MissingField("left_payload"))
    ));

    let fields = Fields::new().with("query_id", Tokens::new(1));
    assert!(matches!(
        RESET_GAS_V2.encode(&fields),
        Err(DexError::FieldTypeMismatch("query_id"))
    ));
}

#[test]
fn strict_decoding() -> anyhow::Result<()> {
    let fields = Fields::new().with("query_id", 123u64);
    let cell = UNSTAKE.encode(&fields)?;

    // Same opcode, but the destroy layout expects another one
    assert!(matches!(
        DESTROY.decode(&cell),
        Err(DexError::InvalidOpcode {
            expected: opcodes::DESTROY,
            found: opcodes::UNSTAKE,
        })
    ));

    // Extra bits
    let mut builder = CellBuilder::new();
    builder.store_slice(&cell.as_slice())?;
    builder.store_bit_one()?;
    let longer = builder.build()?;
    assert!(matches!(
        UNSTAKE.decode(&longer),
        Err(DexError::TrailingData { bits: 1, refs: 0 })
    ));

    // Extra refs
    let mut builder = CellBuilder::new();
    builder.store_slice(&cell.as_slice())?;
    builder.store_reference(Cell::empty_cell())?;
    let with_ref = builder.build()?;
    assert!(matches!(
        UNSTAKE.decode(&with_ref),
        Err(DexError::TrailingData { bits: 0, refs: 1 })
    ));

    // Truncated
    let mut builder = CellBuilder::new();
    builder.store_u32(opcodes::UNSTAKE)?;
    builder.store_u32(0)?;
    let short = builder.build()?;
    assert!(matches!(
        UNSTAKE.decode(&short),
        Err(DexError::UnexpectedEnd { field: "query_id" })
    ));
    Ok(())
}

#[test]
fn nested_cells_are_strict() -> anyhow::Result<()> {
    let mut fields = sample_fields(&PROVIDE_LP_V2);
    let cell = PROVIDE_LP_V2.encode(&fields)?;
    assert_eq!(cell.reference_count(), 1);

    // Rebuild the same root with a longer child
    let child = cell.reference(0).cloned().unwrap_or_default();
    let mut builder = CellBuilder::new();
    builder.store_slice(&child.as_slice())?;
    builder.store_u8(0)?;
    let child = builder.build()?;

    let mut builder = CellBuilder::new();
    builder.store_slice_data(&cell.as_slice())?;
    builder.store_reference(child)?;
    let broken = builder.build()?;

    assert!(matches!(
        PROVIDE_LP_V2.decode(&broken),
        Err(DexError::TrailingData { bits: 8, refs: 0 })
    ));

    // Nested layouts accept only structured fields
    fields.insert("additional_data", FieldValue::Ref(Cell::empty_cell()));
    assert!(matches!(
        PROVIDE_LP_V2.encode(&fields),
        Err(DexError::FieldTypeMismatch("additional_data"))
    ));
    Ok(())
}

#[test]
fn address_or_none_differs_from_maybe_address() -> anyhow::Result<()> {
    let fields = Fields::new().with("owner", FieldValue::AddressOrNone(None));
    let cell = STAKE_V3.encode(&fields)?;
    assert_eq!(cell.bit_len(), 32 + 2);
    assert_eq!(STAKE_V3.decode(&cell)?.get_address_or_none("owner")?, None);

    let fields = Fields::new().with("owner", FieldValue::AddressOrNone(Some(addr(0))));
    let cell = STAKE_V3.encode(&fields)?;
    assert_eq!(cell.bit_len(), 32 + 267);
    assert_eq!(
        STAKE_V3.decode(&cell)?.get_address_or_none("owner")?,
        Some(addr(0))
    );
    Ok(())
}

#[test]
fn typed_getters() -> anyhow::Result<()> {
    let fields = sample_fields(&JETTON_TRANSFER);
    assert_eq!(fields.len(), JETTON_TRANSFER.fields.len());
    assert_eq!(fields.get_uint("query_id")?, 1);
    assert_eq!(fields.get_address("destination")?, addr(3));
    assert!(matches!(
        fields.get_coins("destination"),
        Err(DexError::FieldTypeMismatch("destination"))
    ));
    assert!(matches!(
        fields.get_bit("unknown"),
        Err(DexError::MissingField("unknown"))
    ));
    assert_eq!(
        JETTON_TRANSFER.field("amount").map(|f| f.kind),
        Some(FieldKind::Coins)
    );
    Ok(())
}
