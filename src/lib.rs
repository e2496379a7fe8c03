//! Message payloads and getter decoders for the STON.fi DEX and farm contracts.
//!
//! ## `Cell` vs `CellSlice` vs `CellBuilder`
//!
//! - [`Cell`] is an immutable tree of at most 1023 bits of data and
//!   4 references, shared behind an `Arc`.
//! - [`CellSlice`] is a read-only view of a cell which is used to load
//!   fields one after another.
//! - [`CellBuilder`] is used to create a new cell. Any overflow of the
//!   cell bounds is reported as an error instead of being truncated.
//!
//! ## Operations
//!
//! Every contract interaction is described by a static [`Schema`]. Builder
//! sets for a concrete router, pTON or farm version are resolved with the
//! functions from the [`dispatch`] module:
//!
//! ```
//! use stonfi_types::prelude::*;
//!
//! let set = resolve_operation_set(VersionTag::new(2, 1)).unwrap();
//! assert!(set.single_side_provide);
//! assert!(resolve_operation_set(VersionTag::new(3, 0)).is_err());
//! ```
//!
//! [`Cell`]: cell::Cell
//! [`CellSlice`]: cell::CellSlice
//! [`CellBuilder`]: cell::CellBuilder
//! [`Schema`]: schema::Schema

#![warn(missing_docs)]

/// Early return on error, keeps hot codec paths free of `?` conversions.
macro_rules! ok {
    ($e:expr $(,)?) => {
        match $e {
            core::result::Result::Ok(val) => val,
            core::result::Result::Err(err) => return core::result::Result::Err(err),
        }
    };
}

pub mod boc;
pub mod cell;
pub mod dict;
pub mod dispatch;
pub mod error;
pub mod gas;
pub mod models;
pub mod num;
pub mod ops;
pub mod prelude;
pub mod schema;
pub mod stack;
pub mod util;

#[cfg(feature = "client")]
pub mod client;

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn cell_slices() -> anyhow::Result<()> {
        let mut builder = CellBuilder::new();
        builder.store_u8(123)?;
        builder.store_u8(111)?;
        builder.store_bit_one()?;
        let cell = builder.build()?;

        let mut slice = cell.as_slice();
        assert!(!slice.is_data_empty());
        assert_eq!(slice.remaining_bits(), 17);
        assert!(slice.is_refs_empty());
        assert_eq!(slice.remaining_refs(), 0);

        assert_eq!(slice.get_bit(0)?, false);
        assert_eq!(slice.load_u8()?, 123);
        assert_eq!(slice.load_u8()?, 111);
        assert!(slice.load_bit()?);
        assert!(slice.load_bit().is_err());
        Ok(())
    }

    #[test]
    fn payload_survives_boc() -> anyhow::Result<()> {
        let set = resolve_operation_set(VersionTag::new(1, 0))?;
        let user = StdAddr::new(0, HashBytes([2; 32]));

        let mut swap = SwapBody::new(StdAddr::new(0, HashBytes([1; 32])), Tokens::ZERO, user);
        swap.deadline = Some(0);
        let body = set.swap_body(&swap, &user)?;

        let boc = Boc::encode(&body);
        let decoded = Boc::decode(&boc)?;
        assert_eq!(decoded, body);
        assert_eq!(decoded.repr_hash(), body.repr_hash());
        Ok(())
    }
}
