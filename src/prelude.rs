//! The `stonfi-types` prelude.
//!
//! This brings into scope a number of traits and commonly used types.

pub use crate::boc::Boc;
pub use crate::cell::{Cell, CellBuilder, CellSlice, HashBytes, Load, Store};
pub use crate::dispatch::{
    check_pton_compat, resolve_farm, resolve_operation_set, resolve_pton, DexType, VersionTag,
};
pub use crate::error::DexError;
pub use crate::gas::{GasOverrides, GasSpec};
pub use crate::models::{Asset, StdAddr};
pub use crate::num::Tokens;
pub use crate::ops::{
    ClaimRewardsParams, ClaimTarget, DexBuilderSet, DexOperation, FarmOperation, FarmSet, Getter,
    ProvideLiquidityBody, ProvideLiquidityParams, PtonOperation, PtonSet, StakeParams, SwapBody,
    SwapParams, TxParams,
};
pub use crate::schema::{FieldValue, Fields, Schema};
pub use crate::stack::{Record, StackValue};

#[cfg(feature = "client")]
pub use crate::client::{AddressResolver, DexClient, Transport};
