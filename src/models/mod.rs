//! Contract-level models.

pub use self::address::*;
pub use self::asset::*;

mod address;
mod asset;
