//! Field layouts of contract messages.
//!
//! A [`Schema`] is a static description of a message body: an optional
//! 32-bit opcode followed by typed fields. Values are passed around as
//! [`Fields`], where every optional field carries an explicit presence.

use std::collections::BTreeMap;

use crate::cell::{Cell, CellBuilder, CellSlice, Load, Store};
use crate::error::{DexError, Error};
use crate::models::StdAddr;
use crate::num::Tokens;

pub use self::registry::*;

mod registry;

/// Field encoding.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FieldKind {
    /// Unsigned integer of the specified width (at most 64 bits).
    Uint(u16),
    /// Variable-length amount of coins.
    Coins,
    /// Standard address.
    Address,
    /// Standard address or `addr_none$00`.
    AddressOrNone,
    /// Presence bit followed by an optional standard address.
    MaybeAddress,
    /// Single bit flag.
    Bit,
    /// Presence bit followed by an optional child cell.
    MaybeRef,
    /// Child cell.
    Ref(RefKind),
}

/// Child cell layout.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RefKind {
    /// Child cell is laid out by the sub-schema.
    Nested(&'static Schema),
    /// Opaque child cell.
    Any,
}

/// Named field of the schema.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FieldDesc {
    /// Field name.
    pub name: &'static str,
    /// Field encoding.
    pub kind: FieldKind,
}

impl FieldDesc {
    /// Creates a new field descriptor.
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Message body layout.
#[derive(Debug, Eq, PartialEq)]
pub struct Schema {
    /// Schema name.
    pub name: &'static str,
    /// Opcode which is stored before all fields.
    pub opcode: Option<u32>,
    /// Ordered fields.
    pub fields: &'static [FieldDesc],
}

impl Schema {
    /// Name of the opcode field in errors.
    pub const OP_FIELD: &'static str = "op";

    /// Returns a field descriptor by name.
    pub fn field(&self, name: &str) -> Option<&'static FieldDesc> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Encodes fields into a new cell.
    pub fn encode(&self, fields: &Fields) -> Result<Cell, DexError> {
        let mut builder = CellBuilder::new();
        ok!(self.encode_into(fields, &mut builder));
        builder.build().map_err(|_| DexError::CellOverflow { field: self.name })
    }

    /// Appends encoded fields to the builder.
    pub fn encode_into(&self, fields: &Fields, builder: &mut CellBuilder) -> Result<(), DexError> {
        if let Some(opcode) = self.opcode {
            if builder.store_u32(opcode).is_err() {
                return Err(DexError::CellOverflow {
                    field: Self::OP_FIELD,
                });
            }
        }

        for desc in self.fields {
            let Some(value) = fields.get(desc.name) else {
                return Err(DexError::MissingField(desc.name));
            };
            ok!(store_field(desc, value, builder));
        }

        Ok(())
    }

    /// Decodes a cell, requiring all of its bits and refs to be consumed.
    pub fn decode(&self, cell: &Cell) -> Result<Fields, DexError> {
        let mut slice = cell.as_slice();
        let fields = ok!(self.decode_from(&mut slice));

        if !slice.is_data_empty() || !slice.is_refs_empty() {
            return Err(DexError::TrailingData {
                bits: slice.remaining_bits(),
                refs: slice.remaining_refs(),
            });
        }
        Ok(fields)
    }

    /// Reads the schema fields from the slice.
    pub fn decode_from(&self, slice: &mut CellSlice<'_>) -> Result<Fields, DexError> {
        if let Some(expected) = self.opcode {
            let found = ok!(slice.load_u32().map_err(|e| load_error(Self::OP_FIELD, e)));
            if found != expected {
                return Err(DexError::InvalidOpcode { expected, found });
            }
        }

        let mut fields = Fields::new();
        for desc in self.fields {
            let value = ok!(load_field(desc, slice));
            fields.insert(desc.name, value);
        }
        Ok(fields)
    }
}

fn store_field(
    desc: &FieldDesc,
    value: &FieldValue,
    builder: &mut CellBuilder,
) -> Result<(), DexError> {
    let field = desc.name;
    let res = match (desc.kind, value) {
        (FieldKind::Uint(bits), FieldValue::Uint(value)) => {
            if bits > 64 || (bits < 64 && value >> bits != 0) {
                return Err(DexError::FieldOverflow { field, bits });
            }
            builder.store_uint(*value, bits)
        }
        (FieldKind::Coins, FieldValue::Coins(value)) => {
            if !value.is_valid() {
                return Err(DexError::FieldOverflow {
                    field,
                    bits: Tokens::MAX_BITS,
                });
            }
            value.store_into(builder)
        }
        (FieldKind::Address, FieldValue::Address(addr)) => addr.store_into(builder),
        (FieldKind::AddressOrNone, FieldValue::AddressOrNone(addr)) => {
            StdAddr::store_or_none(addr.as_ref(), builder)
        }
        (FieldKind::MaybeAddress, FieldValue::MaybeAddress(addr)) => addr.store_into(builder),
        (FieldKind::Bit, FieldValue::Bit(bit)) => builder.store_bit(*bit),
        (FieldKind::MaybeRef, FieldValue::MaybeRef(cell)) => cell.store_into(builder),
        (FieldKind::Ref(RefKind::Nested(schema)), FieldValue::Nested(fields)) => {
            let child = ok!(schema.encode(fields));
            builder.store_reference(child)
        }
        (FieldKind::Ref(RefKind::Any), FieldValue::Ref(cell)) => {
            builder.store_reference(cell.clone())
        }
        _ => return Err(DexError::FieldTypeMismatch(field)),
    };

    res.map_err(|e| match e {
        Error::IntOverflow => DexError::FieldOverflow {
            field,
            bits: match desc.kind {
                FieldKind::Uint(bits) => bits,
                _ => Tokens::MAX_BITS,
            },
        },
        _ => DexError::CellOverflow { field },
    })
}

fn load_field(desc: &FieldDesc, slice: &mut CellSlice<'_>) -> Result<FieldValue, DexError> {
    let field = desc.name;
    let res = match desc.kind {
        FieldKind::Uint(bits) => slice.load_uint(bits).map(FieldValue::Uint),
        FieldKind::Coins => Tokens::load_from(slice).map(FieldValue::Coins),
        FieldKind::Address => StdAddr::load_from(slice).map(FieldValue::Address),
        FieldKind::AddressOrNone => StdAddr::load_or_none(slice).map(FieldValue::AddressOrNone),
        FieldKind::MaybeAddress => {
            <Option<StdAddr>>::load_from(slice).map(FieldValue::MaybeAddress)
        }
        FieldKind::Bit => slice.load_bit().map(FieldValue::Bit),
        FieldKind::MaybeRef => <Option<Cell>>::load_from(slice).map(FieldValue::MaybeRef),
        FieldKind::Ref(RefKind::Nested(schema)) => {
            let child = ok!(slice.load_reference().map_err(|e| load_error(field, e)));
            return schema.decode(child).map(FieldValue::Nested);
        }
        FieldKind::Ref(RefKind::Any) => slice.load_reference_cloned().map(FieldValue::Ref),
    };
    res.map_err(|e| load_error(field, e))
}

fn load_error(field: &'static str, error: Error) -> DexError {
    match error {
        Error::CellUnderflow => DexError::UnexpectedEnd { field },
        e => DexError::Cell(e),
    }
}

/// Value of the schema field.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FieldValue {
    /// Unsigned integer.
    Uint(u64),
    /// Amount of coins.
    Coins(Tokens),
    /// Standard address.
    Address(StdAddr),
    /// Standard address or an explicit absence.
    AddressOrNone(Option<StdAddr>),
    /// Optional address with a presence bit.
    MaybeAddress(Option<StdAddr>),
    /// Single bit flag.
    Bit(bool),
    /// Optional child cell.
    MaybeRef(Option<Cell>),
    /// Opaque child cell.
    Ref(Cell),
    /// Child cell with its own layout.
    Nested(Fields),
}

impl From<u64> for FieldValue {
    #[inline]
    fn from(value: u64) -> Self {
        Self::Uint(value)
    }
}

impl From<Tokens> for FieldValue {
    #[inline]
    fn from(value: Tokens) -> Self {
        Self::Coins(value)
    }
}

impl From<StdAddr> for FieldValue {
    #[inline]
    fn from(value: StdAddr) -> Self {
        Self::Address(value)
    }
}

impl From<bool> for FieldValue {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bit(value)
    }
}

impl From<Option<Cell>> for FieldValue {
    #[inline]
    fn from(value: Option<Cell>) -> Self {
        Self::MaybeRef(value)
    }
}

impl From<Cell> for FieldValue {
    #[inline]
    fn from(value: Cell) -> Self {
        Self::Ref(value)
    }
}

impl From<Fields> for FieldValue {
    #[inline]
    fn from(value: Fields) -> Self {
        Self::Nested(value)
    }
}

/// Named field values of a single message.
///
/// Equality does not depend on the insertion order.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Fields(BTreeMap<&'static str, FieldValue>);

macro_rules! impl_field_getters {
    ($($(#[doc = $doc:expr])* $name:ident => $variant:ident($ty:ty)),*$(,)?) => {$(
        $(#[doc = $doc])*
        pub fn $name(&self, name: &'static str) -> Result<$ty, DexError> {
            match self.0.get(name) {
                Some(FieldValue::$variant(value)) => Ok(value.clone()),
                Some(_) => Err(DexError::FieldTypeMismatch(name)),
                None => Err(DexError::MissingField(name)),
            }
        }
    )*};
}

impl Fields {
    /// Creates an empty set of fields.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the field value and returns the updated set.
    #[inline]
    pub fn with<V: Into<FieldValue>>(mut self, name: &'static str, value: V) -> Self {
        self.0.insert(name, value.into());
        self
    }

    /// Inserts the field value.
    #[inline]
    pub fn insert(&mut self, name: &'static str, value: FieldValue) -> Option<FieldValue> {
        self.0.insert(name, value)
    }

    /// Returns a raw field value.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
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
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.0.iter().map(|(name, value)| (*name, value))
    }

    impl_field_getters! {
        /// Returns an unsigned integer field.
        get_uint => Uint(u64),
        /// Returns a coins field.
        get_coins => Coins(Tokens),
        /// Returns an address field.
        get_address => Address(StdAddr),
        /// Returns an address or none field.
        get_address_or_none => AddressOrNone(Option<StdAddr>),
        /// Returns an optional address field.
        get_maybe_address => MaybeAddress(Option<StdAddr>),
        /// Returns a bit field.
        get_bit => Bit(bool),
        /// Returns an optional child cell field.
        get_maybe_ref => MaybeRef(Option<Cell>),
        /// Returns a child cell field.
        get_ref => Ref(Cell),
        /// Returns a nested fields.
        get_nested => Nested(Fields),
    }
}

impl FromIterator<(&'static str, FieldValue)> for Fields {
    fn from_iter<T: IntoIterator<Item = (&'static str, FieldValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests;
