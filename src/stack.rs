//! Getter response stacks.

use std::collections::BTreeMap;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, ToPrimitive, Zero};

use crate::cell::{Cell, CellBuilder};
use crate::dict::decode_dict;
use crate::error::{DexError, Error};
use crate::models::StdAddr;
use crate::num::Tokens;

/// TVM stack entry.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum StackValue {
    /// Null value.
    Null,
    /// 257-bit signed integer.
    Int(BigInt),
    /// Cell.
    Cell(Cell),
    /// Cell slice, represented as the cell with its remaining data.
    Slice(Cell),
    /// Tuple of values.
    Tuple(Vec<StackValue>),
}

impl StackValue {
    /// Creates an integer entry.
    pub fn int<T: Into<BigInt>>(value: T) -> Self {
        Self::Int(value.into())
    }

    /// Creates a boolean entry (`-1` for `true`).
    pub fn bool(value: bool) -> Self {
        Self::Int(if value { -BigInt::one() } else { BigInt::zero() })
    }

    /// Creates a slice entry with the stored address.
    pub fn address(addr: &StdAddr) -> Result<Self, Error> {
        CellBuilder::build_from(addr).map(Self::Slice)
    }

    /// Returns the name of the entry type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int(_) => "int",
            Self::Cell(_) => "cell",
            Self::Slice(_) => "slice",
            Self::Tuple(_) => "tuple",
        }
    }

    fn as_int(&self, field: &str) -> Result<&BigInt, DexError> {
        match self {
            Self::Int(int) => Ok(int),
            other => Err(unexpected_type(field, "int", other)),
        }
    }

    fn as_cell(&self, field: &str) -> Result<&Cell, DexError> {
        match self {
            Self::Cell(cell) | Self::Slice(cell) => Ok(cell),
            other => Err(unexpected_type(field, "cell or slice", other)),
        }
    }
}

impl From<Tokens> for StackValue {
    #[inline]
    fn from(value: Tokens) -> Self {
        Self::Int(value.into())
    }
}

fn unexpected_type(field: &str, expected: &str, value: &StackValue) -> DexError {
    DexError::malformed(format!(
        "`{field}`: expected {expected}, got {}",
        value.type_name()
    ))
}

/// Kind of the getter record field.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RecordFieldKind {
    /// Non-negative integer which fits into the specified number of bits.
    Uint(u16),
    /// Any integer.
    Int,
    /// Non-negative amount of coins.
    Coins,
    /// `-1` for `true`, `0` for `false`.
    Bool,
    /// Slice with a standard address.
    Address,
    /// Slice with a standard address or `addr_none`.
    AddressOrNone,
    /// Cell or slice.
    Cell,
    /// Cell or null.
    MaybeCell,
    /// Dictionary root or null.
    Dict(u16),
}

/// Named field of the getter record.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RecordField {
    /// Field name.
    pub name: &'static str,
    /// Field kind.
    pub kind: RecordFieldKind,
}

impl RecordField {
    /// Creates a new record field.
    pub const fn new(name: &'static str, kind: RecordFieldKind) -> Self {
        Self { name, kind }
    }
}

/// Layout of the getter response.
#[derive(Debug, Eq, PartialEq)]
pub struct RecordSchema {
    /// Getter name.
    pub name: &'static str,
    /// Positional fields.
    pub fields: &'static [RecordField],
    /// Whether extra stack entries are an error.
    pub exact: bool,
}

/// Decodes a getter response using the record schema.
///
/// A shorter stack is always an error, extra entries are ignored unless
/// the schema is exact.
pub fn decode_response(stack: &[StackValue], schema: &RecordSchema) -> Result<Record, DexError> {
    if stack.len() < schema.fields.len() {
        tracing::warn!(
            getter = schema.name,
            expected = schema.fields.len(),
            actual = stack.len(),
            "short getter response"
        );
        return Err(DexError::malformed(format!(
            "`{}`: expected {} stack entries, got {}",
            schema.name,
            schema.fields.len(),
            stack.len()
        )));
    }
    if schema.exact && stack.len() > schema.fields.len() {
        return Err(DexError::malformed(format!(
            "`{}`: expected exactly {} stack entries, got {}",
            schema.name,
            schema.fields.len(),
            stack.len()
        )));
    }

    let mut record = Record::default();
    for (field, value) in schema.fields.iter().zip(stack) {
        let value = ok!(decode_value(field, value));
        record.0.insert(field.name, value);
    }
    Ok(record)
}

fn decode_value(field: &RecordField, value: &StackValue) -> Result<RecordValue, DexError> {
    let name = field.name;
    Ok(match field.kind {
        RecordFieldKind::Uint(bits) => {
            let int = ok!(value.as_int(name));
            match int.to_biguint() {
                Some(uint) if uint.bits() <= bits as u64 => RecordValue::Uint(uint),
                _ => {
                    return Err(DexError::malformed(format!(
                        "`{name}`: {int} is not a {bits}-bit unsigned integer"
                    )))
                }
            }
        }
        RecordFieldKind::Int => RecordValue::Int(ok!(value.as_int(name)).clone()),
        RecordFieldKind::Coins => {
            let int = ok!(value.as_int(name));
            if int.sign() == Sign::Minus {
                return Err(DexError::NegativeCoins(name));
            }
            match Tokens::try_from(int) {
                Ok(tokens) => RecordValue::Coins(tokens),
                Err(_) => {
                    return Err(DexError::malformed(format!(
                        "`{name}`: {int} does not fit into coins"
                    )))
                }
            }
        }
        RecordFieldKind::Bool => {
            let int = ok!(value.as_int(name));
            if int.is_zero() {
                RecordValue::Bool(false)
            } else if *int == -BigInt::one() {
                RecordValue::Bool(true)
            } else {
                return Err(DexError::malformed(format!(
                    "`{name}`: {int} is not a boolean"
                )));
            }
        }
        RecordFieldKind::Address => {
            let cell = ok!(value.as_cell(name));
            RecordValue::Address(ok!(parse_address(name, cell)))
        }
        RecordFieldKind::AddressOrNone => {
            let cell = ok!(value.as_cell(name));
            let mut slice = cell.as_slice();
            let addr = ok!(StdAddr::load_or_none(&mut slice).map_err(|e| invalid_address(name, e)));
            if !slice.is_data_empty() || !slice.is_refs_empty() {
                return Err(invalid_address(name, Error::InvalidData));
            }
            RecordValue::AddressOrNone(addr)
        }
        RecordFieldKind::Cell => RecordValue::Cell(ok!(value.as_cell(name)).clone()),
        RecordFieldKind::MaybeCell => match value {
            StackValue::Null => RecordValue::MaybeCell(None),
            value => RecordValue::MaybeCell(Some(ok!(value.as_cell(name)).clone())),
        },
        RecordFieldKind::Dict(key_bits) => {
            let root = match value {
                StackValue::Null => None,
                value => Some(ok!(value.as_cell(name))),
            };
            RecordValue::Dict(ok!(decode_dict(root, key_bits)))
        }
    })
}

fn parse_address(name: &str, cell: &Cell) -> Result<StdAddr, DexError> {
    cell.parse::<StdAddr>().map_err(|e| invalid_address(name, e))
}

fn invalid_address(name: &str, error: Error) -> DexError {
    DexError::malformed(format!("`{name}`: invalid address ({error})"))
}

/// Decoded value of the getter record field.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum RecordValue {
    /// Non-negative integer.
    Uint(BigUint),
    /// Signed integer.
    Int(BigInt),
    /// Amount of coins.
    Coins(Tokens),
    /// Boolean flag.
    Bool(bool),
    /// Standard address.
    Address(StdAddr),
    /// Standard address or an explicit absence.
    AddressOrNone(Option<StdAddr>),
    /// Cell.
    Cell(Cell),
    /// Optional cell.
    MaybeCell(Option<Cell>),
    /// Dictionary entries.
    Dict(BTreeMap<u64, Cell>),
}

/// Decoded getter response.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Record(BTreeMap<&'static str, RecordValue>);

macro_rules! impl_record_getters {
    ($($(#[doc = $doc:expr])* $name:ident => $variant:ident($ty:ty)),*$(,)?) => {$(
        $(#[doc = $doc])*
        pub fn $name(&self, name: &str) -> Result<&$ty, DexError> {
            match self.0.get(name) {
                Some(RecordValue::$variant(value)) => Ok(value),
                Some(_) => Err(DexError::malformed(format!("`{name}` has unexpected type"))),
                None => Err(DexError::malformed(format!("`{name}` is missing"))),
            }
        }
    )*};
}

impl Record {
    /// Returns a raw field value.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&RecordValue> {
        self.0.get(name)
    }

    /// Returns the number of fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over fields sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &RecordValue)> {
        self.0.iter().map(|(name, value)| (*name, value))
    }

    /// Returns an unsigned integer field which fits into `u64`.
    pub fn get_u64(&self, name: &str) -> Result<u64, DexError> {
        let value = ok!(self.get_uint(name));
        value
            .to_u64()
            .ok_or_else(|| DexError::malformed(format!("`{name}` does not fit into u64")))
    }

    impl_record_getters! {
        /// Returns an unsigned integer field.
        get_uint => Uint(BigUint),
        /// Returns a signed integer field.
        get_int => Int(BigInt),
        /// Returns a coins field.
        get_coins => Coins(Tokens),
        /// Returns a boolean field.
        get_bool => Bool(bool),
        /// Returns an address field.
        get_address => Address(StdAddr),
        /// Returns an address or none field.
        get_address_or_none => AddressOrNone(Option<StdAddr>),
        /// Returns a cell field.
        get_cell => Cell(Cell),
        /// Returns an optional cell field.
        get_maybe_cell => MaybeCell(Option<Cell>),
        /// Returns dictionary entries.
        get_dict => Dict(BTreeMap<u64, Cell>),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::HashBytes;
    use crate::dict::encode_dict_typed;

    static SAMPLE: RecordSchema = RecordSchema {
        name: "sample",
        fields: &[
            RecordField::new("seqno", RecordFieldKind::Uint(32)),
            RecordField::new("delta", RecordFieldKind::Int),
            RecordField::new("balance", RecordFieldKind::Coins),
            RecordField::new("active", RecordFieldKind::Bool),
            RecordField::new("owner", RecordFieldKind::Address),
            RecordField::new("admin", RecordFieldKind::AddressOrNone),
            RecordField::new("code", RecordFieldKind::Cell),
            RecordField::new("extra", RecordFieldKind::MaybeCell),
            RecordField::new("pools", RecordFieldKind::Dict(8)),
        ],
        exact: false,
    };

    fn addr(byte: u8) -> StdAddr {
        StdAddr::new(0, HashBytes([byte; 32]))
    }

    fn sample_stack() -> anyhow::Result<Vec<StackValue>> {
        let none = {
            let mut builder = CellBuilder::new();
            StdAddr::store_or_none(None, &mut builder)?;
            builder.build()?
        };

        Ok(vec![
            StackValue::int(42u32),
            StackValue::int(-7),
            StackValue::from(Tokens::new(1_000)),
            StackValue::bool(true),
            StackValue::address(&addr(1))?,
            StackValue::Slice(none),
            StackValue::Cell(Cell::empty_cell()),
            StackValue::Null,
            StackValue::Null,
        ])
    }

    fn none_with_ref() -> anyhow::Result<Cell> {
        let mut builder = CellBuilder::new();
        StdAddr::store_or_none(None, &mut builder)?;
        builder.store_reference(Cell::empty_cell())?;
        Ok(builder.build()?)
    }

    #[test]
    fn decode_all_kinds() -> anyhow::Result<()> {
        let record = decode_response(&sample_stack()?, &SAMPLE)?;
        assert_eq!(record.len(), SAMPLE.fields.len());
        assert_eq!(record.get_u64("seqno")?, 42);
        assert_eq!(record.get_int("delta")?, &BigInt::from(-7));
        assert_eq!(record.get_coins("balance")?, &Tokens::new(1_000));
        assert!(*record.get_bool("active")?);
        assert_eq!(record.get_address("owner")?, &addr(1));
        assert_eq!(record.get_address_or_none("admin")?, &None);
        assert_eq!(record.get_cell("code")?, &Cell::empty_cell());
        assert_eq!(record.get_maybe_cell("extra")?, &None);
        assert!(record.get_dict("pools")?.is_empty());
        Ok(())
    }

    #[test]
    fn stack_length() -> anyhow::Result<()> {
        let mut stack = sample_stack()?;
        stack.push(StackValue::Null);
        assert!(decode_response(&stack, &SAMPLE).is_ok());

        let exact = RecordSchema {
            exact: true,
            ..SAMPLE
        };
        assert!(matches!(
            decode_response(&stack, &exact),
            Err(DexError::MalformedResponse(_))
        ));

        stack.truncate(3);
        assert!(matches!(
            decode_response(&stack, &SAMPLE),
            Err(DexError::MalformedResponse(_))
        ));
        Ok(())
    }

    #[test]
    fn negative_coins() -> anyhow::Result<()> {
        let mut stack = sample_stack()?;
        stack[2] = StackValue::int(-1);
        assert!(matches!(
            decode_response(&stack, &SAMPLE),
            Err(DexError::NegativeCoins("balance"))
        ));
        Ok(())
    }

    #[test]
    fn malformed_values() -> anyhow::Result<()> {
        let cases = [
            (0, StackValue::int(1u64 << 32)),
            (0, StackValue::int(-1)),
            (3, StackValue::int(1)),
            (4, StackValue::Null),
            (4, StackValue::Cell(Cell::empty_cell())),
            (6, StackValue::Tuple(Vec::new())),
            (5, StackValue::Slice(none_with_ref()?)),
        ];

        for (index, value) in cases {
            let mut stack = sample_stack()?;
            stack[index] = value;
            assert!(
                matches!(
                    decode_response(&stack, &SAMPLE),
                    Err(DexError::MalformedResponse(_))
                ),
                "case {index}"
            );
        }
        Ok(())
    }

    #[test]
    fn dictionary_field() -> anyhow::Result<()> {
        let root = encode_dict_typed(8, [(0u64, 10u32), (3, 30)])?;
        let mut stack = sample_stack()?;
        stack[8] = StackValue::Cell(root.unwrap_or_default());

        let record = decode_response(&stack, &SAMPLE)?;
        let dict = record.get_dict("pools")?;
        assert_eq!(dict.len(), 2);
        assert_eq!(dict[&3].parse::<u32>()?, 30);
        Ok(())
    }
}
