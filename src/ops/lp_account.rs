//! LP account messages.

use crate::cell::Cell;
use crate::error::DexError;
use crate::gas::GasOverrides;
use crate::models::StdAddr;
use crate::num::Tokens;
use crate::schema::{self, Fields};

use super::router::{DexBuilderSet, RouterFamily};
use super::{finish, unsupported, TxParams};

/// LP account refund parameters.
#[derive(Debug, Clone)]
pub struct RefundParams {
    /// LP account address.
    pub lp_account: StdAddr,
    /// Payload sent with the first token (v2 only).
    pub left_payload: Option<Cell>,
    /// Payload sent with the second token (v2 only).
    pub right_payload: Option<Cell>,
    /// Arbitrary request id.
    pub query_id: u64,
    /// Gas overrides.
    pub gas: GasOverrides,
}

/// Direct liquidity addition parameters.
#[derive(Debug, Clone)]
pub struct DirectAddLiquidityParams {
    /// LP account address.
    pub lp_account: StdAddr,
    /// Amount of the first token.
    pub amount0: Tokens,
    /// Amount of the second token.
    pub amount1: Tokens,
    /// Minimal amount of LP tokens.
    pub min_lp_out: Tokens,
    /// Receiver of LP tokens (v2 only).
    pub user: StdAddr,
    /// Receiver of the refund. The user by default.
    pub refund: Option<StdAddr>,
    /// Receiver of the excess gas. The refund address by default.
    pub excesses: Option<StdAddr>,
    /// Payload which is sent to the user on success (v2 only).
    pub custom_payload: Option<Cell>,
    /// Gas attached to the custom payload (v2 only).
    pub custom_payload_forward_gas: Option<Tokens>,
    /// Arbitrary request id.
    pub query_id: u64,
    /// Gas overrides.
    pub gas: GasOverrides,
}

/// LP account gas reset parameters.
#[derive(Debug, Clone)]
pub struct ResetGasParams {
    /// LP account address.
    pub lp_account: StdAddr,
    /// Arbitrary request id.
    pub query_id: u64,
    /// Gas overrides.
    pub gas: GasOverrides,
}

impl DexBuilderSet {
    pub(super) fn build_refund(&self, params: &RefundParams) -> Result<TxParams, DexError> {
        let gas = self.gas.refund.apply(&params.gas);

        let query_id = Fields::new().with("query_id", params.query_id);
        let body = ok!(match self.family {
            RouterFamily::V1 => {
                if params.left_payload.is_some() || params.right_payload.is_some() {
                    return Err(unsupported("refund_payload", self.version));
                }
                schema::REFUND_ME_V1.encode(&query_id)
            }
            RouterFamily::V2 => schema::REFUND_ME_V2.encode(
                &query_id
                    .with("left_payload", params.left_payload.clone())
                    .with("right_payload", params.right_payload.clone()),
            ),
        });
        Ok(finish(
            "refund",
            self.version,
            params.lp_account,
            gas.gas_amount,
            body,
        ))
    }

    pub(super) fn build_direct_add_liquidity(
        &self,
        params: &DirectAddLiquidityParams,
    ) -> Result<TxParams, DexError> {
        let gas = self.gas.direct_add_lp.apply(&params.gas);

        let fields = Fields::new()
            .with("query_id", params.query_id)
            .with("amount0", params.amount0)
            .with("amount1", params.amount1)
            .with("min_lp_out", params.min_lp_out);

        let body = ok!(match self.family {
            RouterFamily::V1 => {
                if params.custom_payload.is_some() {
                    return Err(unsupported("direct_add_custom_payload", self.version));
                }
                schema::DIRECT_ADD_LIQUIDITY_V1.encode(&fields)
            }
            RouterFamily::V2 => {
                let refund = params.refund.unwrap_or(params.user);
                let excesses = params.excesses.unwrap_or(refund);
                let addresses = Fields::new()
                    .with("refund", refund)
                    .with("excesses", excesses);

                schema::DIRECT_ADD_LIQUIDITY_V2.encode(
                    &fields
                        .with(
                            "custom_payload_forward_gas",
                            params.custom_payload_forward_gas.unwrap_or_default(),
                        )
                        .with("user", params.user)
                        .with("custom_payload", params.custom_payload.clone())
                        .with("addresses", addresses),
                )
            }
        });
        Ok(finish(
            "direct_add_liquidity",
            self.version,
            params.lp_account,
            gas.gas_amount,
            body,
        ))
    }

    pub(super) fn build_reset_gas(&self, params: &ResetGasParams) -> Result<TxParams, DexError> {
        let gas = self.gas.reset_gas.apply(&params.gas);

        let fields = Fields::new().with("query_id", params.query_id);
        let body = ok!(match self.family {
            RouterFamily::V1 => schema::RESET_GAS_V1.encode(&fields),
            RouterFamily::V2 => schema::RESET_GAS_V2.encode(&fields),
        });
        Ok(finish(
            "reset_gas",
            self.version,
            params.lp_account,
            gas.gas_amount,
            body,
        ))
    }
}
