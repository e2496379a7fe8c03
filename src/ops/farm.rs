//! Farm staking messages.

use crate::cell::Cell;
use crate::dispatch::VersionTag;
use crate::error::DexError;
use crate::gas::{FarmGas, GasOverrides, FARM_V1_GAS, FARM_V3_GAS};
use crate::models::StdAddr;
use crate::num::Tokens;
use crate::schema::{self, FieldValue, Fields, Schema};
use crate::stack::{decode_response, Record, StackValue};

use super::getters::{FarmGetters, FARM_V1_GETTERS, FARM_V2_GETTERS, FARM_V3_GETTERS};
use super::jetton::JettonTransfer;
use super::{decode_by_opcode, finish, unsupported, TxParams};

/// Message layouts of the farm.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FarmFamily {
    /// Farm v1.
    V1,
    /// Farm v2.
    V2,
    /// Farm v3, with multiple reward pools.
    V3,
}

/// Builders and decoders of a single farm version.
#[derive(Debug)]
pub struct FarmSet {
    /// Farm version.
    pub version: VersionTag,
    /// Message layouts.
    pub family: FarmFamily,
    /// Default gas amounts.
    pub gas: &'static FarmGas,
    /// Getter record layouts.
    pub getters: &'static FarmGetters,
}

/// Farm v1.0.
pub static FARM_V1: FarmSet = FarmSet {
    version: VersionTag::new(1, 0),
    family: FarmFamily::V1,
    gas: &FARM_V1_GAS,
    getters: &FARM_V1_GETTERS,
};

/// Farm v2.0.
pub static FARM_V2: FarmSet = FarmSet {
    version: VersionTag::new(2, 0),
    family: FarmFamily::V2,
    gas: &FARM_V1_GAS,
    getters: &FARM_V2_GETTERS,
};

/// Farm v3.0.
pub static FARM_V3: FarmSet = FarmSet {
    version: VersionTag::new(3, 0),
    family: FarmFamily::V3,
    gas: &FARM_V3_GAS,
    getters: &FARM_V3_GETTERS,
};

static V1_LAYOUTS: [&Schema; 4] = [
    &schema::STAKE_V1,
    &schema::CLAIM_REWARDS_V1,
    &schema::UNSTAKE,
    &schema::DESTROY,
];
static V3_LAYOUTS: [&Schema; 4] = [
    &schema::STAKE_V3,
    &schema::CLAIM_REWARDS_V3,
    &schema::UNSTAKE,
    &schema::DESTROY,
];

/// Stake parameters.
#[derive(Debug, Clone)]
pub struct StakeParams {
    /// User wallet of the staked jetton.
    pub user_wallet: StdAddr,
    /// Farm minter address.
    pub minter: StdAddr,
    /// Amount of staked jettons.
    pub amount: Tokens,
    /// Owner of the minted NFT (v3 only). The user by default.
    pub owner: Option<StdAddr>,
    /// Sender, receives the excess gas.
    pub user: StdAddr,
    /// Arbitrary request id.
    pub query_id: u64,
    /// Gas overrides.
    pub gas: GasOverrides,
}

/// Reward pools to claim.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum ClaimTarget {
    /// All pools of the farm.
    #[default]
    All,
    /// A single pool (v3 only).
    Pool(u8),
}

/// Rewards claim parameters.
#[derive(Debug, Clone)]
pub struct ClaimRewardsParams {
    /// Farm NFT address.
    pub nft: StdAddr,
    /// Pools to claim.
    pub target: ClaimTarget,
    /// Number of reward pools of the farm.
    pub pool_count: u32,
    /// Arbitrary request id.
    pub query_id: u64,
    /// Gas overrides.
    pub gas: GasOverrides,
}

/// Unstake parameters.
#[derive(Debug, Clone)]
pub struct UnstakeParams {
    /// Farm NFT address.
    pub nft: StdAddr,
    /// Number of reward pools of the farm.
    pub pool_count: u32,
    /// Arbitrary request id.
    pub query_id: u64,
    /// Gas overrides.
    pub gas: GasOverrides,
}

/// Farm NFT destruction parameters.
#[derive(Debug, Clone)]
pub struct DestroyParams {
    /// Farm NFT address.
    pub nft: StdAddr,
    /// Arbitrary request id.
    pub query_id: u64,
    /// Gas overrides.
    pub gas: GasOverrides,
}

/// Farm operation.
#[derive(Debug, Clone)]
pub enum FarmOperation {
    /// Staked jetton transfer to the minter.
    Stake(StakeParams),
    /// Rewards claim.
    ClaimRewards(ClaimRewardsParams),
    /// Unstake.
    Unstake(UnstakeParams),
    /// NFT destruction.
    Destroy(DestroyParams),
}

/// Farm get-method.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum FarmGetter {
    /// `get_farming_minter_data`.
    MinterData,
    /// `get_farming_data`.
    NftData,
}

impl FarmGetter {
    /// Returns the get-method name.
    pub const fn method_name(&self) -> &'static str {
        match self {
            Self::MinterData => "get_farming_minter_data",
            Self::NftData => "get_farming_data",
        }
    }
}

impl FarmSet {
    /// Builds the message of the operation.
    pub fn build(&self, operation: &FarmOperation) -> Result<TxParams, DexError> {
        match operation {
            FarmOperation::Stake(params) => self.build_stake(params),
            FarmOperation::ClaimRewards(params) => self.build_claim_rewards(params),
            FarmOperation::Unstake(params) => self.build_unstake(params),
            FarmOperation::Destroy(params) => self.build_destroy(params),
        }
    }

    /// Decodes the getter response.
    pub fn decode(&self, getter: FarmGetter, stack: &[StackValue]) -> Result<Record, DexError> {
        let schema = match getter {
            FarmGetter::MinterData => self.getters.minter_data,
            FarmGetter::NftData => self.getters.nft_data,
        };
        decode_response(stack, schema)
    }

    /// Returns all message layouts of the farm family.
    pub fn layouts(&self) -> &'static [&'static Schema] {
        match self.family {
            FarmFamily::V1 | FarmFamily::V2 => &V1_LAYOUTS,
            FarmFamily::V3 => &V3_LAYOUTS,
        }
    }

    /// Finds the layout by the payload opcode and decodes the payload.
    pub fn decode_payload(&self, cell: &Cell) -> Result<(&'static Schema, Fields), DexError> {
        decode_by_opcode(self.layouts(), cell, "farm", self.version)
    }

    /// Whether the farm has multiple reward pools.
    pub fn has_pools(&self) -> bool {
        self.family == FarmFamily::V3
    }

    /// Builds the stake forward payload.
    pub fn stake_body(&self, owner: Option<StdAddr>) -> Result<Cell, DexError> {
        match self.family {
            FarmFamily::V1 | FarmFamily::V2 => {
                if owner.is_some() {
                    return Err(unsupported("stake_for_owner", self.version));
                }
                schema::STAKE_V1.encode(&Fields::new())
            }
            FarmFamily::V3 => schema::STAKE_V3
                .encode(&Fields::new().with("owner", FieldValue::AddressOrNone(owner))),
        }
    }

    fn build_stake(&self, params: &StakeParams) -> Result<TxParams, DexError> {
        let gas = self.gas.stake.apply(&params.gas);
        let payload = ok!(self.stake_body(params.owner));

        let body = ok!(JettonTransfer {
            query_id: params.query_id,
            amount: params.amount,
            destination: params.minter,
            response_destination: Some(params.user),
            custom_payload: None,
            forward_ton_amount: gas.forward_gas_amount,
            forward_payload: Some(payload),
        }
        .encode());
        Ok(finish(
            "stake",
            self.version,
            params.user_wallet,
            gas.gas_amount,
            body,
        ))
    }

    fn build_claim_rewards(&self, params: &ClaimRewardsParams) -> Result<TxParams, DexError> {
        let gas = self.gas.claim_rewards.apply(&params.gas);
        let fields = Fields::new().with("query_id", params.query_id);

        let (body, units) = match (self.family, params.target) {
            (FarmFamily::V1 | FarmFamily::V2, ClaimTarget::Pool(_)) => {
                return Err(unsupported("claim_rewards_pool", self.version));
            }
            (FarmFamily::V1 | FarmFamily::V2, ClaimTarget::All) => {
                (schema::CLAIM_REWARDS_V1.encode(&fields), 1)
            }
            (FarmFamily::V3, ClaimTarget::All) => (
                schema::CLAIM_REWARDS_V3.encode(
                    &fields
                        .with("claim_all", true)
                        .with("pool_index", 0u64),
                ),
                params.pool_count,
            ),
            (FarmFamily::V3, ClaimTarget::Pool(index)) => (
                schema::CLAIM_REWARDS_V3.encode(
                    &fields
                        .with("claim_all", false)
                        .with("pool_index", index as u64),
                ),
                1,
            ),
        };
        let body = ok!(body);
        Ok(finish(
            "claim_rewards",
            self.version,
            params.nft,
            gas.compute_value(units),
            body,
        ))
    }

    fn build_unstake(&self, params: &UnstakeParams) -> Result<TxParams, DexError> {
        let gas = self.gas.unstake.apply(&params.gas);

        let fields = Fields::new().with("query_id", params.query_id);
        let body = ok!(schema::UNSTAKE.encode(&fields));
        Ok(finish(
            "unstake",
            self.version,
            params.nft,
            gas.compute_value(params.pool_count),
            body,
        ))
    }

    fn build_destroy(&self, params: &DestroyParams) -> Result<TxParams, DexError> {
        let gas = self.gas.destroy.apply(&params.gas);

        let fields = Fields::new().with("query_id", params.query_id);
        let body = ok!(schema::DESTROY.encode(&fields));
        Ok(finish(
            "destroy",
            self.version,
            params.nft,
            gas.gas_amount,
            body,
        ))
    }
}
