//! Vault messages.

use crate::error::DexError;
use crate::gas::GasOverrides;
use crate::models::StdAddr;
use crate::schema::{Fields, WITHDRAW_FEE_V2};

use super::router::DexBuilderSet;
use super::{finish, unsupported, TxParams};

/// Vault fee withdrawal parameters.
#[derive(Debug, Clone)]
pub struct WithdrawFeeParams {
    /// Vault address.
    pub vault: StdAddr,
    /// Arbitrary request id.
    pub query_id: u64,
    /// Gas overrides.
    pub gas: GasOverrides,
}

impl DexBuilderSet {
    pub(super) fn build_withdraw_fee(
        &self,
        params: &WithdrawFeeParams,
    ) -> Result<TxParams, DexError> {
        let Some(spec) = self.gas.withdraw_fee else {
            return Err(unsupported("withdraw_fee", self.version));
        };
        let gas = spec.apply(&params.gas);

        let fields = Fields::new().with("query_id", params.query_id);
        let body = ok!(WITHDRAW_FEE_V2.encode(&fields));
        Ok(finish(
            "withdraw_fee",
            self.version,
            params.vault,
            gas.gas_amount,
            body,
        ))
    }
}
