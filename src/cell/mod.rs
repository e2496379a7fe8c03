//! Cell tree implementation.

use std::str::FromStr;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use smallvec::SmallVec;

use crate::error::{Error, ParseHashBytesError};

pub use self::builder::CellBuilder;
pub use self::slice::CellSlice;

mod builder;
mod slice;

#[cfg(test)]
mod tests;

/// Maximum number of data bits in a cell.
pub const MAX_BIT_LEN: u16 = 1023;

/// Maximum number of child references in a cell.
pub const MAX_REF_COUNT: usize = 4;

/// A data structure that can be serialized into cells.
pub trait Store {
    /// Tries to store itself into the cell builder.
    fn store_into(&self, builder: &mut CellBuilder) -> Result<(), Error>;
}

impl<T: Store + ?Sized> Store for &T {
    #[inline]
    fn store_into(&self, builder: &mut CellBuilder) -> Result<(), Error> {
        <T as Store>::store_into(self, builder)
    }
}

impl<T: Store + ?Sized> Store for Box<T> {
    #[inline]
    fn store_into(&self, builder: &mut CellBuilder) -> Result<(), Error> {
        <T as Store>::store_into(self.as_ref(), builder)
    }
}

/// A data structure that can be deserialized from cells.
pub trait Load<'a>: Sized {
    /// Tries to load itself from a cell slice.
    fn load_from(slice: &mut CellSlice<'a>) -> Result<Self, Error>;
}

impl<'a, T: Load<'a>> Load<'a> for Box<T> {
    #[inline]
    fn load_from(slice: &mut CellSlice<'a>) -> Result<Self, Error> {
        match <T as Load>::load_from(slice) {
            Ok(value) => Ok(Box::new(value)),
            Err(e) => Err(e),
        }
    }
}

/// `Maybe X` is stored as a presence bit followed by `X`.
impl<T: Store> Store for Option<T> {
    fn store_into(&self, builder: &mut CellBuilder) -> Result<(), Error> {
        match self {
            Some(value) => {
                ok!(builder.store_bit_one());
                value.store_into(builder)
            }
            None => builder.store_bit_zero(),
        }
    }
}

impl<'a, T: Load<'a>> Load<'a> for Option<T> {
    fn load_from(slice: &mut CellSlice<'a>) -> Result<Self, Error> {
        if ok!(slice.load_bit()) {
            match T::load_from(slice) {
                Ok(value) => Ok(Some(value)),
                Err(e) => Err(e),
            }
        } else {
            Ok(None)
        }
    }
}

macro_rules! impl_primitive_loads {
    ($($type:ty => |$s:ident| $expr:expr),*$(,)?) => {
        $(impl Load<'_> for $type {
            #[inline]
            fn load_from($s: &mut CellSlice) -> Result<Self, Error> {
                $expr
            }
        })*
    };
}

impl_primitive_loads! {
    bool => |s| s.load_bit(),
    u8 => |s| s.load_u8(),
    i8 => |s| Ok(ok!(s.load_u8()) as i8),
    u16 => |s| s.load_u16(),
    u32 => |s| s.load_u32(),
    i32 => |s| Ok(ok!(s.load_u32()) as i32),
    u64 => |s| s.load_u64(),
    HashBytes => |s| s.load_u256(),
}

macro_rules! impl_primitive_stores {
    ($($type:ty => |$b:ident, $v:ident| $expr:expr),*$(,)?) => {
        $(impl Store for $type {
            #[inline]
            fn store_into(&self, $b: &mut CellBuilder) -> Result<(), Error> {
                let $v = self;
                $expr
            }
        })*
    };
}

impl_primitive_stores! {
    bool => |b, v| b.store_bit(*v),
    u8 => |b, v| b.store_u8(*v),
    i8 => |b, v| b.store_u8(*v as u8),
    u16 => |b, v| b.store_u16(*v),
    u32 => |b, v| b.store_u32(*v),
    i32 => |b, v| b.store_u32(*v as u32),
    u64 => |b, v| b.store_u64(*v),
    HashBytes => |b, v| b.store_u256(v),
}

macro_rules! impl_store_for_tuples {
    ($( ($($tt:tt: $t:ident),+) ),*$(,)?) => {$(
        impl<$($t: Store),+> Store for ($($t),*,) {
            fn store_into(&self, builder: &mut CellBuilder) -> Result<(), Error> {
                $(ok!(self.$tt.store_into(builder)));*;
                Ok(())
            }
        }
    )*};
}

impl_store_for_tuples! {
    (0: T0, 1: T1),
    (0: T0, 1: T1, 2: T2),
    (0: T0, 1: T1, 2: T2, 3: T3),
}

/// A cell is stored as a child reference.
impl Store for Cell {
    #[inline]
    fn store_into(&self, builder: &mut CellBuilder) -> Result<(), Error> {
        builder.store_reference(self.clone())
    }
}

impl<'a> Load<'a> for Cell {
    #[inline]
    fn load_from(slice: &mut CellSlice<'a>) -> Result<Self, Error> {
        slice.load_reference_cloned()
    }
}

/// Cell descriptor bytes.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct CellDescriptor {
    /// First descriptor byte with a generic info about the cell.
    pub d1: u8,
    /// Second descriptor byte with a packed data size.
    pub d2: u8,
}

impl CellDescriptor {
    /// Bit mask to store the number of references in the descriptor.
    pub const REF_COUNT_MASK: u8 = 0b0000_0111;
    /// Bit mask to store the `is_exotic` flag in the descriptor.
    pub const IS_EXOTIC_MASK: u8 = 0b0000_1000;

    /// Computes d1 descriptor byte for an ordinary level-0 cell.
    #[inline]
    pub const fn compute_d1(ref_count: u8) -> u8 {
        ref_count & Self::REF_COUNT_MASK
    }

    /// Computes d2 descriptor byte from the cell length in bits.
    #[inline]
    pub const fn compute_d2(bit_len: u16) -> u8 {
        (((bit_len >> 2) as u8) & !0b1) | ((bit_len % 8 != 0) as u8)
    }

    /// Constructs cell descriptor bytes for an ordinary cell.
    #[inline]
    pub const fn new(ref_count: u8, bit_len: u16) -> Self {
        Self {
            d1: Self::compute_d1(ref_count),
            d2: Self::compute_d2(bit_len),
        }
    }

    /// Returns the number of child references.
    #[inline]
    pub const fn reference_count(self) -> u8 {
        self.d1 & Self::REF_COUNT_MASK
    }

    /// Returns whether the cell is not [`Ordinary`].
    ///
    /// [`Ordinary`]: https://docs.ton.org/develop/data-formats/exotic-cells
    #[inline]
    pub const fn is_exotic(self) -> bool {
        self.d1 & Self::IS_EXOTIC_MASK != 0
    }

    /// Returns the level mask bits.
    #[inline]
    pub const fn level_mask(self) -> u8 {
        self.d1 >> 5
    }

    /// Returns the number of data bytes (including the completion tag).
    #[inline]
    pub const fn byte_len(self) -> u8 {
        (self.d2 & 1) + (self.d2 >> 1)
    }

    /// Returns whether the data is a whole number of bytes.
    #[inline]
    pub const fn is_aligned(self) -> bool {
        self.d2 & 1 == 0
    }
}

/// Immutable cell with up to 1023 bits of data and up to 4 references.
#[derive(Clone)]
pub struct Cell(Arc<CellInner>);

struct CellInner {
    descriptor: CellDescriptor,
    bit_len: u16,
    data: Box<[u8]>,
    references: SmallVec<[Cell; MAX_REF_COUNT]>,
    hash: HashBytes,
    depth: u16,
}

impl Cell {
    /// Creates an ordinary cell from data which already contains a completion tag.
    pub(crate) fn from_parts(
        bit_len: u16,
        data: &[u8],
        references: SmallVec<[Cell; MAX_REF_COUNT]>,
    ) -> Result<Self, Error> {
        if bit_len > MAX_BIT_LEN || references.len() > MAX_REF_COUNT {
            return Err(Error::CellOverflow);
        }

        let descriptor = CellDescriptor::new(references.len() as u8, bit_len);
        let byte_len = descriptor.byte_len() as usize;
        let Some(data) = data.get(..byte_len) else {
            return Err(Error::InvalidCell);
        };

        let mut depth = 0u16;
        let mut hasher = Sha256::new();
        hasher.update([descriptor.d1, descriptor.d2]);
        hasher.update(data);
        for child in &references {
            let child_depth = child.repr_depth();
            depth = std::cmp::max(depth, child_depth.saturating_add(1));
            hasher.update(child_depth.to_be_bytes());
        }
        for child in &references {
            hasher.update(child.repr_hash().as_slice());
        }

        Ok(Self(Arc::new(CellInner {
            descriptor,
            bit_len,
            data: data.into(),
            references,
            hash: HashBytes(hasher.finalize().into()),
            depth,
        })))
    }

    /// Returns an empty ordinary cell.
    pub fn empty_cell() -> Self {
        match Self::from_parts(0, &[], SmallVec::new()) {
            Ok(cell) => cell,
            Err(_) => unreachable!("an empty cell is always valid"),
        }
    }

    /// Builds a new cell from the specified value.
    #[inline]
    pub fn build<T: Store + ?Sized>(value: &T) -> Result<Self, Error> {
        CellBuilder::build_from(value)
    }

    /// Returns cell descriptor bytes.
    #[inline]
    pub fn descriptor(&self) -> CellDescriptor {
        self.0.descriptor
    }

    /// Returns the data size of this cell in bits.
    #[inline]
    pub fn bit_len(&self) -> u16 {
        self.0.bit_len
    }

    /// Returns raw cell data (including the completion tag).
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.0.data
    }

    /// Returns the number of child references.
    #[inline]
    pub fn reference_count(&self) -> u8 {
        self.0.references.len() as u8
    }

    /// Returns a reference to the Nth child cell.
    #[inline]
    pub fn reference(&self, index: u8) -> Option<&Cell> {
        self.0.references.get(index as usize)
    }

    /// Returns all child references.
    #[inline]
    pub fn references(&self) -> &[Cell] {
        &self.0.references
    }

    /// Returns the representation hash of the cell.
    #[inline]
    pub fn repr_hash(&self) -> &HashBytes {
        &self.0.hash
    }

    /// Returns the representation depth of the cell.
    #[inline]
    pub fn repr_depth(&self) -> u16 {
        self.0.depth
    }

    /// Returns `true` if the cell has no data and no references.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.bit_len == 0 && self.0.references.is_empty()
    }

    /// Returns a read-only view of the whole cell.
    #[inline]
    pub fn as_slice(&self) -> CellSlice<'_> {
        CellSlice::new(self)
    }

    /// Parses the whole cell as `T`, requiring all data to be consumed.
    pub fn parse<'a, T: Load<'a>>(&'a self) -> Result<T, Error> {
        let mut slice = self.as_slice();
        let value = ok!(T::load_from(&mut slice));
        if slice.is_data_empty() && slice.is_refs_empty() {
            Ok(value)
        } else {
            Err(Error::InvalidData)
        }
    }

    /// Returns an object which will display the whole tree of cells.
    #[inline]
    pub fn display_tree(&self) -> DisplayCellTree<'_> {
        DisplayCellTree(self)
    }
}

impl Eq for Cell {}

impl PartialEq for Cell {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.repr_hash() == other.repr_hash()
    }
}

impl std::hash::Hash for Cell {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.repr_hash().hash(state)
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::empty_cell()
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("bits", &self.bit_len())
            .field("refs", &self.reference_count())
            .field("data", &hex::encode(self.data()))
            .field("hash", self.repr_hash())
            .finish()
    }
}

/// Helper struct to print the cell tree.
#[derive(Clone, Copy)]
pub struct DisplayCellTree<'a>(&'a Cell);

impl std::fmt::Display for DisplayCellTree<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut stack = vec![(0usize, self.0)];

        while let Some((level, cell)) = stack.pop() {
            ok!(writeln!(
                f,
                "{:level$}{} (bits: {}, refs: {})",
                "",
                hex::encode(cell.data()),
                cell.bit_len(),
                cell.reference_count(),
                level = level * 2,
            ));

            for child in cell.references().iter().rev() {
                stack.push((level + 1, child));
            }
        }

        Ok(())
    }
}

/// Type alias for a cell hash.
#[derive(Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HashBytes(pub [u8; 32]);

impl HashBytes {
    /// Array of zero bytes.
    pub const ZERO: Self = Self([0; 32]);

    /// Converts slice to a hash bytes.
    ///
    /// # Panics
    ///
    /// Panics if the length of the slice is not 32 bytes.
    #[inline]
    pub fn from_slice(slice: &[u8]) -> Self {
        Self(slice.try_into().expect("slice with incorrect length"))
    }

    /// Returns a byte slice of the hash.
    #[inline]
    pub const fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Returns an internal array.
    #[inline]
    pub const fn as_array(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for HashBytes {
    #[inline]
    fn from(value: [u8; 32]) -> Self {
        Self(value)
    }
}

impl AsRef<[u8]> for HashBytes {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for HashBytes {
    type Err = ParseHashBytesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut result = Self::default();
        match s.len() {
            64 => ok!(hex::decode_to_slice(s, &mut result.0).map_err(ParseHashBytesError::InvalidHex)),
            66 => ok!(hex::decode_to_slice(&s[2..], &mut result.0).map_err(ParseHashBytesError::InvalidHex)),
            _ => return Err(ParseHashBytesError::UnexpectedStringLength),
        }
        Ok(result)
    }
}

impl std::fmt::Display for HashBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl std::fmt::Debug for HashBytes {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for HashBytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            self.0.serialize(serializer)
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for HashBytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        if deserializer.is_human_readable() {
            let s = ok!(<std::borrow::Cow<'de, str>>::deserialize(deserializer));
            Self::from_str(&s).map_err(Error::custom)
        } else {
            <[u8; 32]>::deserialize(deserializer).map(Self)
        }
    }
}
