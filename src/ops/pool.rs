//! Pool and LP wallet messages.

use crate::error::DexError;
use crate::gas::GasOverrides;
use crate::models::StdAddr;
use crate::num::Tokens;
use crate::schema::{Fields, COLLECT_FEES_V1};

use super::jetton::JettonBurn;
use super::router::DexBuilderSet;
use super::{finish, unsupported, TxParams};

/// LP tokens burn parameters.
#[derive(Debug, Clone)]
pub struct BurnParams {
    /// User LP wallet of the pool.
    pub lp_wallet: StdAddr,
    /// Amount of LP tokens.
    pub amount: Tokens,
    /// Owner of the LP wallet, receives the excess gas.
    pub user: StdAddr,
    /// Arbitrary request id.
    pub query_id: u64,
    /// Gas overrides.
    pub gas: GasOverrides,
}

/// Protocol fees collection parameters.
#[derive(Debug, Clone)]
pub struct CollectFeesParams {
    /// Pool address.
    pub pool: StdAddr,
    /// Arbitrary request id.
    pub query_id: u64,
    /// Gas overrides.
    pub gas: GasOverrides,
}

impl DexBuilderSet {
    pub(super) fn build_burn(&self, params: &BurnParams) -> Result<TxParams, DexError> {
        let gas = self.gas.lp_burn.apply(&params.gas);
        let body = ok!(JettonBurn {
            query_id: params.query_id,
            amount: params.amount,
            response_destination: params.user,
            custom_payload: None,
        }
        .encode());
        Ok(finish("burn", self.version, params.lp_wallet, gas.gas_amount, body))
    }

    pub(super) fn build_collect_fees(
        &self,
        params: &CollectFeesParams,
    ) -> Result<TxParams, DexError> {
        let Some(spec) = self.gas.collect_fees else {
            return Err(unsupported("collect_fees", self.version));
        };
        let gas = spec.apply(&params.gas);

        let fields = Fields::new().with("query_id", params.query_id);
        let body = ok!(COLLECT_FEES_V1.encode(&fields));
        Ok(finish(
            "collect_fees",
            self.version,
            params.pool,
            gas.gas_amount,
            body,
        ))
    }
}
