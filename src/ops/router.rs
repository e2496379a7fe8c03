//! Router swaps and liquidity provision.

use crate::cell::Cell;
use crate::dispatch::{check_pton_compat, resolve_pton, DexType, VersionTag};
use crate::error::DexError;
use crate::gas::{GasOverrides, GasSpec, RouterGas, ROUTER_V1_GAS, ROUTER_V2_GAS};
use crate::models::{Asset, StdAddr};
use crate::num::Tokens;
use crate::schema::{self, FieldValue, Fields, Schema};
use crate::stack::{decode_response, Record, StackValue};

use super::getters::{
    Getter, RouterGetters, ROUTER_V1_GETTERS, ROUTER_V2_GETTERS, ROUTER_V2_STABLE_GETTERS,
    ROUTER_V2_WCPI_GETTERS, ROUTER_V2_WSTABLE_GETTERS,
};
use super::jetton::JettonTransfer;
use super::lp_account::{DirectAddLiquidityParams, RefundParams, ResetGasParams};
use super::pool::{BurnParams, CollectFeesParams};
use super::pton::{PtonSet, TonTransferParams};
use super::vault::WithdrawFeeParams;
use super::{
    attach, check_referral_value, decode_by_opcode, deadline_or_default, finish, unsupported,
    TxParams,
};

/// Message layouts of the router.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RouterFamily {
    /// Router v1.
    V1,
    /// Router v2.x.
    V2,
}

/// Builders and decoders of a single router version.
#[derive(Debug)]
pub struct DexBuilderSet {
    /// Router version with the pool type.
    pub version: VersionTag,
    /// Message layouts.
    pub family: RouterFamily,
    /// Default gas amounts.
    pub gas: &'static RouterGas,
    /// pTON version which is used for native offers.
    pub expected_pton: (u16, u16),
    /// Whether liquidity can be provided with a single token.
    pub single_side_provide: bool,
    /// Getter record layouts.
    pub getters: &'static RouterGetters,
}

macro_rules! router_v1 {
    ($version:expr) => {
        DexBuilderSet {
            version: $version,
            family: RouterFamily::V1,
            gas: &ROUTER_V1_GAS,
            expected_pton: (1, 0),
            single_side_provide: false,
            getters: &ROUTER_V1_GETTERS,
        }
    };
}

macro_rules! router_v2 {
    ($version:expr, $getters:expr) => {
        DexBuilderSet {
            version: $version,
            family: RouterFamily::V2,
            gas: &ROUTER_V2_GAS,
            expected_pton: (2, 1),
            single_side_provide: true,
            getters: $getters,
        }
    };
}

const V1_0: VersionTag = VersionTag::new(1, 0);
const V2_1: VersionTag = VersionTag::new(2, 1);
const V2_2: VersionTag = VersionTag::new(2, 2);

/// Router v1.0.
pub static ROUTER_V1: DexBuilderSet = router_v1!(V1_0);
/// Constant product router v1.0.
pub static ROUTER_V1_CPI: DexBuilderSet =
    router_v1!(V1_0.with_sub_type(DexType::ConstantProduct));

/// Router v2.1.
pub static ROUTER_V2_1: DexBuilderSet = router_v2!(V2_1, &ROUTER_V2_GETTERS);
/// Constant product router v2.1.
pub static ROUTER_V2_1_CPI: DexBuilderSet = router_v2!(
    V2_1.with_sub_type(DexType::ConstantProduct),
    &ROUTER_V2_GETTERS
);
/// Stable swap router v2.1.
pub static ROUTER_V2_1_STABLE: DexBuilderSet = router_v2!(
    V2_1.with_sub_type(DexType::StableSwap),
    &ROUTER_V2_STABLE_GETTERS
);
/// Weighted constant product router v2.1.
pub static ROUTER_V2_1_WCPI: DexBuilderSet = router_v2!(
    V2_1.with_sub_type(DexType::WeightedConstProduct),
    &ROUTER_V2_WCPI_GETTERS
);

/// Router v2.2.
pub static ROUTER_V2_2: DexBuilderSet = router_v2!(V2_2, &ROUTER_V2_GETTERS);
/// Constant product router v2.2.
pub static ROUTER_V2_2_CPI: DexBuilderSet = router_v2!(
    V2_2.with_sub_type(DexType::ConstantProduct),
    &ROUTER_V2_GETTERS
);
/// Stable swap router v2.2.
pub static ROUTER_V2_2_STABLE: DexBuilderSet = router_v2!(
    V2_2.with_sub_type(DexType::StableSwap),
    &ROUTER_V2_STABLE_GETTERS
);
/// Weighted constant product router v2.2.
pub static ROUTER_V2_2_WCPI: DexBuilderSet = router_v2!(
    V2_2.with_sub_type(DexType::WeightedConstProduct),
    &ROUTER_V2_WCPI_GETTERS
);
/// Weighted stable swap router v2.2.
pub static ROUTER_V2_2_WSTABLE: DexBuilderSet = router_v2!(
    V2_2.with_sub_type(DexType::WeightedStableSwap),
    &ROUTER_V2_WSTABLE_GETTERS
);

static V1_LAYOUTS: [&Schema; 8] = [
    &schema::SWAP_V1,
    &schema::PROVIDE_LP_V1,
    &schema::REFUND_ME_V1,
    &schema::DIRECT_ADD_LIQUIDITY_V1,
    &schema::RESET_GAS_V1,
    &schema::COLLECT_FEES_V1,
    &schema::JETTON_TRANSFER,
    &schema::JETTON_BURN,
];

static V2_LAYOUTS: [&Schema; 9] = [
    &schema::SWAP_V2,
    &schema::CROSS_SWAP_V2,
    &schema::PROVIDE_LP_V2,
    &schema::REFUND_ME_V2,
    &schema::DIRECT_ADD_LIQUIDITY_V2,
    &schema::RESET_GAS_V2,
    &schema::WITHDRAW_FEE_V2,
    &schema::JETTON_TRANSFER,
    &schema::JETTON_BURN,
];

/// Router operation.
#[derive(Debug, Clone)]
pub enum DexOperation {
    /// Swap one asset for another.
    Swap(SwapParams),
    /// Provide liquidity into a pool.
    ProvideLiquidity(ProvideLiquidityParams),
    /// Burn LP tokens.
    Burn(BurnParams),
    /// Refund tokens from the LP account.
    Refund(RefundParams),
    /// Add liquidity from the LP account.
    DirectAddLiquidity(DirectAddLiquidityParams),
    /// Reset LP account gas.
    ResetGas(ResetGasParams),
    /// Collect protocol fees of the pool.
    CollectFees(CollectFeesParams),
    /// Withdraw fees from the vault.
    WithdrawFee(WithdrawFeeParams),
}

impl DexOperation {
    /// Returns the operation name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Swap(_) => "swap",
            Self::ProvideLiquidity(_) => "provide_liquidity",
            Self::Burn(_) => "burn",
            Self::Refund(_) => "refund",
            Self::DirectAddLiquidity(_) => "direct_add_liquidity",
            Self::ResetGas(_) => "reset_gas",
            Self::CollectFees(_) => "collect_fees",
            Self::WithdrawFee(_) => "withdraw_fee",
        }
    }
}

/// Forward payload of the swap.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SwapBody {
    /// Router wallet of the ask asset.
    pub ask_jetton_wallet: StdAddr,
    /// Minimal amount of the ask asset.
    pub min_ask_amount: Tokens,
    /// Receiver of the ask asset.
    pub receiver: StdAddr,
    /// Receiver of the refund. The user by default.
    pub refund: Option<StdAddr>,
    /// Receiver of the excess gas. The refund address by default.
    pub excesses: Option<StdAddr>,
    /// Referral address.
    pub referral: Option<StdAddr>,
    /// Referral fee in basis points.
    pub referral_value: Option<u16>,
    /// Unix time after which the swap fails. Now plus 15 minutes by default.
    pub deadline: Option<u64>,
    /// Payload which is sent to the receiver on success.
    pub custom_payload: Option<Cell>,
    /// Gas attached to the custom payload.
    pub custom_payload_forward_gas: Option<Tokens>,
    /// Payload which is sent to the refund address on failure.
    pub refund_payload: Option<Cell>,
    /// Gas attached to the refund payload.
    pub refund_forward_gas: Option<Tokens>,
}

impl SwapBody {
    /// Creates a swap body with default optional fields.
    pub fn new(ask_jetton_wallet: StdAddr, min_ask_amount: Tokens, receiver: StdAddr) -> Self {
        Self {
            ask_jetton_wallet,
            min_ask_amount,
            receiver,
            refund: None,
            excesses: None,
            referral: None,
            referral_value: None,
            deadline: None,
            custom_payload: None,
            custom_payload_forward_gas: None,
            refund_payload: None,
            refund_forward_gas: None,
        }
    }
}

/// Swap parameters.
#[derive(Debug, Clone)]
pub struct SwapParams {
    /// Router address.
    pub router: StdAddr,
    /// Sender of the swap.
    pub user: StdAddr,
    /// Offered asset.
    pub offer_asset: Asset,
    /// Requested asset.
    pub ask_asset: Asset,
    /// User wallet of the offered jetton or the router pTON wallet.
    pub offer_wallet: StdAddr,
    /// Offered amount.
    pub offer_amount: Tokens,
    /// Forward payload.
    pub body: SwapBody,
    /// Arbitrary request id.
    pub query_id: u64,
    /// Gas overrides.
    pub gas: GasOverrides,
    /// pTON version for native offers. The router default if not set.
    pub pton: Option<&'static PtonSet>,
}

/// Forward payload of the liquidity provision.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ProvideLiquidityBody {
    /// Router wallet of the other pool asset.
    pub router_wallet: StdAddr,
    /// Minimal amount of LP tokens.
    pub min_lp_out: Tokens,
    /// Receiver of LP tokens. The user by default.
    pub receiver: Option<StdAddr>,
    /// Receiver of the refund. The user by default.
    pub refund: Option<StdAddr>,
    /// Receiver of the excess gas. The refund address by default.
    pub excesses: Option<StdAddr>,
    /// Unix time after which the provision fails.
    pub deadline: Option<u64>,
    /// Whether liquidity is provided with a single asset.
    pub single_side: bool,
    /// Payload which is sent to the receiver on success.
    pub custom_payload: Option<Cell>,
    /// Gas attached to the custom payload.
    pub custom_payload_forward_gas: Option<Tokens>,
}

impl ProvideLiquidityBody {
    /// Creates a two-sided provision body with default optional fields.
    pub fn new(router_wallet: StdAddr, min_lp_out: Tokens) -> Self {
        Self {
            router_wallet,
            min_lp_out,
            receiver: None,
            refund: None,
            excesses: None,
            deadline: None,
            single_side: false,
            custom_payload: None,
            custom_payload_forward_gas: None,
        }
    }
}

/// Liquidity provision parameters.
#[derive(Debug, Clone)]
pub struct ProvideLiquidityParams {
    /// Router address.
    pub router: StdAddr,
    /// Liquidity provider.
    pub user: StdAddr,
    /// Provided asset.
    pub offer_asset: Asset,
    /// The other asset of the pool.
    pub other_asset: Asset,
    /// User wallet of the provided jetton or the router pTON wallet.
    pub offer_wallet: StdAddr,
    /// Provided amount.
    pub offer_amount: Tokens,
    /// Forward payload.
    pub body: ProvideLiquidityBody,
    /// Arbitrary request id.
    pub query_id: u64,
    /// Gas overrides.
    pub gas: GasOverrides,
    /// pTON version for native offers. The router default if not set.
    pub pton: Option<&'static PtonSet>,
}

impl DexBuilderSet {
    /// Builds the message of the operation.
    pub fn build(&self, operation: &DexOperation) -> Result<TxParams, DexError> {
        match operation {
            DexOperation::Swap(params) => self.build_swap(params),
            DexOperation::ProvideLiquidity(params) => self.build_provide_liquidity(params),
            DexOperation::Burn(params) => self.build_burn(params),
            DexOperation::Refund(params) => self.build_refund(params),
            DexOperation::DirectAddLiquidity(params) => self.build_direct_add_liquidity(params),
            DexOperation::ResetGas(params) => self.build_reset_gas(params),
            DexOperation::CollectFees(params) => self.build_collect_fees(params),
            DexOperation::WithdrawFee(params) => self.build_withdraw_fee(params),
        }
    }

    /// Decodes the getter response.
    pub fn decode(&self, getter: Getter, stack: &[StackValue]) -> Result<Record, DexError> {
        match self.getters.schema(getter) {
            Some(schema) => decode_response(stack, schema),
            None => Err(unsupported(getter.method_name(), self.version)),
        }
    }

    /// Returns all message layouts of the router family.
    pub fn layouts(&self) -> &'static [&'static Schema] {
        match self.family {
            RouterFamily::V1 => &V1_LAYOUTS,
            RouterFamily::V2 => &V2_LAYOUTS,
        }
    }

    /// Finds the layout by the payload opcode and decodes the payload.
    pub fn decode_payload(&self, cell: &Cell) -> Result<(&'static Schema, Fields), DexError> {
        decode_by_opcode(self.layouts(), cell, "router", self.version)
    }

    /// Builds the swap forward payload.
    pub fn swap_body(&self, body: &SwapBody, user: &StdAddr) -> Result<Cell, DexError> {
        self.encode_swap(&schema::SWAP_V2, body, user)
    }

    /// Builds the cross swap payload which can be used as a custom payload of
    /// another swap.
    pub fn cross_swap_body(&self, body: &SwapBody, user: &StdAddr) -> Result<Cell, DexError> {
        if self.family == RouterFamily::V1 {
            return Err(unsupported("cross_swap", self.version));
        }
        self.encode_swap(&schema::CROSS_SWAP_V2, body, user)
    }

    fn encode_swap(
        &self,
        v2_layout: &'static Schema,
        body: &SwapBody,
        user: &StdAddr,
    ) -> Result<Cell, DexError> {
        match self.family {
            RouterFamily::V1 => {
                if body.referral_value.is_some() {
                    return Err(unsupported("referral_value", self.version));
                }
                let fields = Fields::new()
                    .with("ask_jetton_wallet", body.ask_jetton_wallet)
                    .with("min_ask_amount", body.min_ask_amount)
                    .with("user_wallet", body.receiver)
                    .with("referral", FieldValue::MaybeAddress(body.referral));
                schema::SWAP_V1.encode(&fields)
            }
            RouterFamily::V2 => {
                let referral_value = ok!(check_referral_value(body.referral_value));
                let refund = body.refund.unwrap_or(*user);
                let excesses = body.excesses.unwrap_or(refund);

                let additional = Fields::new()
                    .with("min_ask_amount", body.min_ask_amount)
                    .with("receiver", body.receiver)
                    .with(
                        "custom_payload_forward_gas",
                        body.custom_payload_forward_gas.unwrap_or_default(),
                    )
                    .with("custom_payload", body.custom_payload.clone())
                    .with(
                        "refund_forward_gas",
                        body.refund_forward_gas.unwrap_or_default(),
                    )
                    .with("refund_payload", body.refund_payload.clone())
                    .with("referral_value", referral_value as u64)
                    .with("referral", FieldValue::AddressOrNone(body.referral));

                let fields = Fields::new()
                    .with("ask_jetton_wallet", body.ask_jetton_wallet)
                    .with("refund", refund)
                    .with("excesses", excesses)
                    .with("deadline", deadline_or_default(body.deadline))
                    .with("additional_data", additional);
                v2_layout.encode(&fields)
            }
        }
    }

    /// Builds the liquidity provision forward payload.
    pub fn provide_liquidity_body(
        &self,
        body: &ProvideLiquidityBody,
        user: &StdAddr,
    ) -> Result<Cell, DexError> {
        if body.single_side && !self.single_side_provide {
            return Err(unsupported("single_side_provide_liquidity", self.version));
        }

        match self.family {
            RouterFamily::V1 => {
                let fields = Fields::new()
                    .with("router_wallet", body.router_wallet)
                    .with("min_lp_out", body.min_lp_out);
                schema::PROVIDE_LP_V1.encode(&fields)
            }
            RouterFamily::V2 => {
                let refund = body.refund.unwrap_or(*user);
                let excesses = body.excesses.unwrap_or(refund);

                let additional = Fields::new()
                    .with("min_lp_out", body.min_lp_out)
                    .with("receiver", body.receiver.unwrap_or(*user))
                    .with("both_positive", !body.single_side)
                    .with(
                        "custom_payload_forward_gas",
                        body.custom_payload_forward_gas.unwrap_or_default(),
                    )
                    .with("custom_payload", body.custom_payload.clone());

                let fields = Fields::new()
                    .with("router_wallet", body.router_wallet)
                    .with("refund", refund)
                    .with("excesses", excesses)
                    .with("deadline", deadline_or_default(body.deadline))
                    .with("additional_data", additional);
                schema::PROVIDE_LP_V2.encode(&fields)
            }
        }
    }

    fn build_swap(&self, params: &SwapParams) -> Result<TxParams, DexError> {
        if params.offer_asset == params.ask_asset {
            return Err(DexError::DuplicateAsset);
        }

        if params.offer_asset.is_native() {
            let pton = ok!(self.pton_for(params.pton));
            let gas = self.gas.swap_ton_to_jetton.apply(&params.gas);
            let payload = ok!(self.swap_body(&params.body, &params.user));
            return self.send_native("swap", pton, TonTransferParams {
                proxy_wallet: params.offer_wallet,
                query_id: params.query_id,
                ton_amount: params.offer_amount,
                destination: params.router,
                refund: params.body.refund.unwrap_or(params.user),
                forward_ton_amount: gas.forward_gas_amount,
                forward_payload: Some(payload),
            });
        }

        let gas = if params.ask_asset.is_native() {
            self.gas.swap_jetton_to_ton
        } else {
            self.gas.swap_jetton_to_jetton
        }
        .apply(&params.gas);

        let payload = ok!(self.swap_body(&params.body, &params.user));
        self.send_jetton(
            "swap",
            params.offer_wallet,
            params.query_id,
            params.offer_amount,
            params.router,
            params.user,
            gas,
            payload,
        )
    }

    fn build_provide_liquidity(
        &self,
        params: &ProvideLiquidityParams,
    ) -> Result<TxParams, DexError> {
        if params.offer_asset == params.other_asset {
            return Err(DexError::DuplicateAsset);
        }
        if params.body.single_side && !self.single_side_provide {
            return Err(unsupported("single_side_provide_liquidity", self.version));
        }

        let single_side = params.body.single_side;
        let spec = if params.offer_asset.is_native() {
            if single_side {
                self.gas.single_side_provide_lp_ton
            } else {
                Some(self.gas.provide_lp_ton)
            }
        } else if single_side {
            self.gas.single_side_provide_lp_jetton
        } else {
            Some(self.gas.provide_lp_jetton)
        };
        let Some(spec) = spec else {
            return Err(unsupported("single_side_provide_liquidity", self.version));
        };
        let gas = spec.apply(&params.gas);

        if params.offer_asset.is_native() {
            let pton = ok!(self.pton_for(params.pton));
            let payload = ok!(self.provide_liquidity_body(&params.body, &params.user));
            return self.send_native("provide_liquidity", pton, TonTransferParams {
                proxy_wallet: params.offer_wallet,
                query_id: params.query_id,
                ton_amount: params.offer_amount,
                destination: params.router,
                refund: params.body.refund.unwrap_or(params.user),
                forward_ton_amount: gas.forward_gas_amount,
                forward_payload: Some(payload),
            });
        }

        let payload = ok!(self.provide_liquidity_body(&params.body, &params.user));
        self.send_jetton(
            "provide_liquidity",
            params.offer_wallet,
            params.query_id,
            params.offer_amount,
            params.router,
            params.user,
            gas,
            payload,
        )
    }

    fn pton_for(&self, pton: Option<&'static PtonSet>) -> Result<&'static PtonSet, DexError> {
        let pton = match pton {
            Some(pton) => pton,
            None => ok!(resolve_pton(self.expected_pton.0, self.expected_pton.1)),
        };
        ok!(check_pton_compat(self, pton));
        Ok(pton)
    }

    fn send_native(
        &self,
        operation: &'static str,
        pton: &PtonSet,
        transfer: TonTransferParams,
    ) -> Result<TxParams, DexError> {
        let body = ok!(pton.ton_transfer_body(&transfer));
        let value = ok!(attach(transfer.ton_amount, transfer.forward_ton_amount));
        Ok(finish(operation, self.version, transfer.proxy_wallet, value, body))
    }

    #[allow(clippy::too_many_arguments)]
    fn send_jetton(
        &self,
        operation: &'static str,
        wallet: StdAddr,
        query_id: u64,
        amount: Tokens,
        destination: StdAddr,
        response: StdAddr,
        gas: GasSpec,
        payload: Cell,
    ) -> Result<TxParams, DexError> {
        let body = ok!(JettonTransfer {
            query_id,
            amount,
            destination,
            response_destination: Some(response),
            custom_payload: None,
            forward_ton_amount: gas.forward_gas_amount,
            forward_payload: Some(payload),
        }
        .encode());
        Ok(finish(operation, self.version, wallet, gas.gas_amount, body))
    }
}
