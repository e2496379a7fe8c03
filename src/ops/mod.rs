//! Operation builders.
//!
//! Builder sets take resolved addresses and amounts, validate them, and
//! produce the message which must be sent to start the operation.

use crate::boc::Boc;
use crate::cell::Cell;
use crate::dispatch::VersionTag;
use crate::error::DexError;
use crate::models::StdAddr;
use crate::num::Tokens;
use crate::schema::{Fields, Schema};
use crate::util::now_sec;

pub use self::farm::{
    ClaimRewardsParams, ClaimTarget, DestroyParams, FarmFamily, FarmGetter, FarmOperation,
    FarmSet, StakeParams, UnstakeParams,
};
pub use self::getters::{
    ExpectedOutputs, FarmAccruedState, FarmMinterDataV3, FarmPoolParameters, Getter,
    JettonWalletData, LpAccountData,
};
pub use self::jetton::{JettonBurn, JettonTransfer};
pub use self::lp_account::{DirectAddLiquidityParams, RefundParams, ResetGasParams};
pub use self::pool::{BurnParams, CollectFeesParams};
pub use self::pton::{DeployWalletParams, PtonFamily, PtonOperation, PtonSet, TonTransferParams};
pub use self::router::{
    DexBuilderSet, DexOperation, ProvideLiquidityBody, ProvideLiquidityParams, RouterFamily,
    SwapBody, SwapParams,
};
pub use self::vault::WithdrawFeeParams;

pub mod farm;
pub mod getters;
pub mod jetton;
pub mod lp_account;
pub mod pool;
pub mod pton;
pub mod router;
pub mod vault;

/// Referral fee in basis points when it is not specified.
pub const DEFAULT_REFERRAL_VALUE: u16 = 10;

/// The largest allowed referral fee in basis points.
pub const MAX_REFERRAL_VALUE: u16 = 100;

/// Default time to live of swaps and liquidity provisions.
pub const DEFAULT_DEADLINE_SECS: u64 = 900;

/// Message which must be sent to perform an operation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TxParams {
    /// Destination contract.
    pub to: StdAddr,
    /// Attached value in nanotons.
    pub value: Tokens,
    /// Message body.
    pub body: Cell,
}

impl TxParams {
    /// Encodes the body as a BOC.
    pub fn body_boc(&self) -> Vec<u8> {
        Boc::encode(&self.body)
    }

    /// Encodes the body as a base64 encoded BOC.
    #[cfg(feature = "base64")]
    pub fn body_base64(&self) -> String {
        Boc::encode_base64(&self.body)
    }
}

pub(crate) fn check_referral_value(value: Option<u16>) -> Result<u16, DexError> {
    match value {
        None => Ok(DEFAULT_REFERRAL_VALUE),
        Some(value) if value <= MAX_REFERRAL_VALUE => Ok(value),
        Some(value) => {
            tracing::warn!(value, "referral value is out of range");
            Err(DexError::InvalidReferralValue(value))
        }
    }
}

pub(crate) fn deadline_or_default(deadline: Option<u64>) -> u64 {
    match deadline {
        Some(deadline) => deadline,
        None => now_sec() + DEFAULT_DEADLINE_SECS,
    }
}

pub(crate) fn attach(value: Tokens, extra: Tokens) -> Result<Tokens, DexError> {
    match value.checked_add(extra) {
        Some(total) if total.is_valid() => Ok(total),
        _ => Err(DexError::FieldOverflow {
            field: "value",
            bits: Tokens::MAX_BITS,
        }),
    }
}

pub(crate) fn unsupported(operation: &'static str, version: VersionTag) -> DexError {
    tracing::warn!(operation, %version, "unsupported operation");
    DexError::UnsupportedOperation { operation, version }
}

pub(crate) fn finish(
    operation: &'static str,
    version: VersionTag,
    to: StdAddr,
    value: Tokens,
    body: Cell,
) -> TxParams {
    tracing::debug!(
        operation,
        %version,
        %to,
        %value,
        bits = body.bit_len(),
        refs = body.reference_count(),
        "built payload"
    );
    TxParams { to, value, body }
}

pub(crate) fn decode_by_opcode(
    layouts: &'static [&'static Schema],
    cell: &Cell,
    contract: &'static str,
    version: VersionTag,
) -> Result<(&'static Schema, Fields), DexError> {
    let found = match cell.as_slice().get_uint(0, 32) {
        Ok(opcode) => opcode as u32,
        Err(_) => {
            return Err(DexError::UnexpectedEnd {
                field: Schema::OP_FIELD,
            })
        }
    };

    match layouts.iter().find(|s| s.opcode == Some(found)) {
        Some(schema) => Ok((*schema, ok!(schema.decode(cell)))),
        None => Err(DexError::malformed(format!(
            "unknown opcode {found:#010x} for {contract} {version}"
        ))),
    }
}

#[cfg(test)]
mod tests;
