//! Getter record layouts and typed views of common records.

use std::collections::BTreeMap;

use num_bigint::BigUint;

use crate::cell::{CellBuilder, CellSlice, Load, Store};
use crate::error::{DexError, Error};
use crate::models::StdAddr;
use crate::num::Tokens;
use crate::stack::{Record, RecordField, RecordFieldKind as K, RecordSchema};

/// Router getters.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Getter {
    /// `get_router_data`.
    RouterData,
    /// `get_pool_data`.
    PoolData,
    /// `get_expected_outputs`.
    ExpectedOutputs,
    /// `get_expected_tokens`.
    ExpectedTokens,
    /// `get_expected_liquidity`.
    ExpectedLiquidity,
    /// `get_lp_account_data`.
    LpAccountData,
    /// `get_vault_data`.
    VaultData,
    /// `get_wallet_data`.
    JettonWalletData,
    /// `get_wallet_address`.
    WalletAddress,
}

impl Getter {
    /// Returns the getter method name.
    pub const fn method_name(&self) -> &'static str {
        match self {
            Self::RouterData => "get_router_data",
            Self::PoolData => "get_pool_data",
            Self::ExpectedOutputs => "get_expected_outputs",
            Self::ExpectedTokens => "get_expected_tokens",
            Self::ExpectedLiquidity => "get_expected_liquidity",
            Self::LpAccountData => "get_lp_account_data",
            Self::VaultData => "get_vault_data",
            Self::JettonWalletData => "get_wallet_data",
            Self::WalletAddress => "get_wallet_address",
        }
    }
}

/// Record layouts of the router family.
#[derive(Debug)]
pub struct RouterGetters {
    /// Router state.
    pub router_data: &'static RecordSchema,
    /// Pool state.
    pub pool_data: &'static RecordSchema,
    /// Swap simulation.
    pub expected_outputs: &'static RecordSchema,
    /// LP tokens for the provided amounts.
    pub expected_tokens: &'static RecordSchema,
    /// Amounts for the burned LP tokens.
    pub expected_liquidity: &'static RecordSchema,
    /// LP account state.
    pub lp_account_data: &'static RecordSchema,
    /// Vault state.
    pub vault_data: Option<&'static RecordSchema>,
}

impl RouterGetters {
    /// Returns the record layout of the getter.
    pub fn schema(&self, getter: Getter) -> Option<&'static RecordSchema> {
        Some(match getter {
            Getter::RouterData => self.router_data,
            Getter::PoolData => self.pool_data,
            Getter::ExpectedOutputs => self.expected_outputs,
            Getter::ExpectedTokens => self.expected_tokens,
            Getter::ExpectedLiquidity => self.expected_liquidity,
            Getter::LpAccountData => self.lp_account_data,
            Getter::VaultData => return self.vault_data,
            Getter::JettonWalletData => &JETTON_WALLET_DATA,
            Getter::WalletAddress => &WALLET_ADDRESS,
        })
    }
}

macro_rules! record {
    ($name:literal, exact: $exact:literal, { $($field:literal: $kind:expr),*$(,)? }) => {
        RecordSchema {
            name: $name,
            fields: &[$(RecordField::new($field, $kind)),*],
            exact: $exact,
        }
    };
}

macro_rules! pool_data_v2 {
    ($name:literal, { $($field:literal: $kind:expr),*$(,)? }) => {
        record!($name, exact: false, {
            "is_locked": K::Bool,
            "router_address": K::Address,
            "total_supply_lp": K::Coins,
            "reserve0": K::Coins,
            "reserve1": K::Coins,
            "token0_wallet_address": K::Address,
            "token1_wallet_address": K::Address,
            "lp_fee": K::Uint(16),
            "protocol_fee": K::Uint(16),
            "protocol_fee_address": K::AddressOrNone,
            "collected_token0_protocol_fee": K::Coins,
            "collected_token1_protocol_fee": K::Coins,
            $($field: $kind),*
        })
    };
}

/// `get_wallet_data` of a jetton wallet.
pub static JETTON_WALLET_DATA: RecordSchema = record!("get_wallet_data", exact: false, {
    "balance": K::Coins,
    "owner": K::Address,
    "jetton": K::Address,
    "jetton_wallet_code": K::Cell,
});

/// `get_wallet_address` of a jetton minter.
pub static WALLET_ADDRESS: RecordSchema = record!("get_wallet_address", exact: false, {
    "wallet_address": K::Address,
});

/// Router v1 `get_router_data`.
pub static ROUTER_DATA_V1: RecordSchema = record!("get_router_data", exact: false, {
    "is_locked": K::Bool,
    "admin_address": K::Address,
    "temp_upgrade": K::Cell,
    "pool_code": K::Cell,
    "jetton_lp_wallet_code": K::Cell,
    "lp_account_code": K::Cell,
});

/// Router v2 `get_router_data`.
pub static ROUTER_DATA_V2: RecordSchema = record!("get_router_data", exact: false, {
    "router_id": K::Uint(32),
    "dex_type": K::Cell,
    "is_locked": K::Bool,
    "admin_address": K::Address,
    "temp_upgrade": K::Cell,
    "pool_code": K::Cell,
    "jetton_lp_wallet_code": K::Cell,
    "lp_account_code": K::Cell,
    "vault_code": K::Cell,
});

/// Pool v1 `get_pool_data`.
pub static POOL_DATA_V1: RecordSchema = record!("get_pool_data", exact: false, {
    "reserve0": K::Coins,
    "reserve1": K::Coins,
    "token0_wallet_address": K::Address,
    "token1_wallet_address": K::Address,
    "lp_fee": K::Uint(8),
    "protocol_fee": K::Uint(8),
    "ref_fee": K::Uint(8),
    "protocol_fee_address": K::AddressOrNone,
    "collected_token0_protocol_fee": K::Coins,
    "collected_token1_protocol_fee": K::Coins,
});

/// Constant product pool v2 `get_pool_data`.
pub static POOL_DATA_V2: RecordSchema = pool_data_v2!("get_pool_data", {});

/// Stable swap pool v2 `get_pool_data`.
pub static POOL_DATA_V2_STABLE: RecordSchema = pool_data_v2!("get_pool_data", {
    "amp": K::Uint(32),
});

/// Weighted constant product pool v2 `get_pool_data`.
pub static POOL_DATA_V2_WCPI: RecordSchema = pool_data_v2!("get_pool_data", {
    "w0": K::Uint(128),
});

/// Weighted stable swap pool v2 `get_pool_data`.
pub static POOL_DATA_V2_WSTABLE: RecordSchema = pool_data_v2!("get_pool_data", {
    "amp": K::Uint(32),
    "rate": K::Uint(128),
    "w0": K::Uint(128),
    "rate_setter": K::AddressOrNone,
});

/// Pool v1 `get_expected_outputs`.
pub static EXPECTED_OUTPUTS_V1: RecordSchema = record!("get_expected_outputs", exact: false, {
    "jetton_to_receive": K::Coins,
    "protocol_fee_paid": K::Coins,
    "ref_fee_paid": K::Coins,
});

/// Pool v2 `get_expected_outputs`.
pub static EXPECTED_OUTPUTS_V2: RecordSchema = record!("get_expected_outputs", exact: false, {
    "jetton_to_receive": K::Coins,
    "protocol_fee_paid": K::Coins,
});

/// Pool `get_expected_tokens`.
pub static EXPECTED_TOKENS: RecordSchema = record!("get_expected_tokens", exact: false, {
    "expected_tokens": K::Coins,
});

/// Pool `get_expected_liquidity`.
pub static EXPECTED_LIQUIDITY: RecordSchema = record!("get_expected_liquidity", exact: false, {
    "amount0": K::Coins,
    "amount1": K::Coins,
});

/// LP account `get_lp_account_data`.
pub static LP_ACCOUNT_DATA: RecordSchema = record!("get_lp_account_data", exact: false, {
    "user_address": K::Address,
    "pool_address": K::Address,
    "amount0": K::Coins,
    "amount1": K::Coins,
});

/// Vault `get_vault_data`.
pub static VAULT_DATA: RecordSchema = record!("get_vault_data", exact: false, {
    "owner_address": K::Address,
    "token_address": K::Address,
    "router_address": K::Address,
    "deposit_amount": K::Coins,
});

/// Router v1 getters.
pub static ROUTER_V1_GETTERS: RouterGetters = RouterGetters {
    router_data: &ROUTER_DATA_V1,
    pool_data: &POOL_DATA_V1,
    expected_outputs: &EXPECTED_OUTPUTS_V1,
    expected_tokens: &EXPECTED_TOKENS,
    expected_liquidity: &EXPECTED_LIQUIDITY,
    lp_account_data: &LP_ACCOUNT_DATA,
    vault_data: None,
};

macro_rules! router_v2_getters {
    ($pool_data:expr) => {
        RouterGetters {
            router_data: &ROUTER_DATA_V2,
            pool_data: $pool_data,
            expected_outputs: &EXPECTED_OUTPUTS_V2,
            expected_tokens: &EXPECTED_TOKENS,
            expected_liquidity: &EXPECTED_LIQUIDITY,
            lp_account_data: &LP_ACCOUNT_DATA,
            vault_data: Some(&VAULT_DATA),
        }
    };
}

/// Constant product router v2 getters.
pub static ROUTER_V2_GETTERS: RouterGetters = router_v2_getters!(&POOL_DATA_V2);

/// Stable swap router v2 getters.
pub static ROUTER_V2_STABLE_GETTERS: RouterGetters = router_v2_getters!(&POOL_DATA_V2_STABLE);

/// Weighted constant product router v2 getters.
pub static ROUTER_V2_WCPI_GETTERS: RouterGetters = router_v2_getters!(&POOL_DATA_V2_WCPI);

/// Weighted stable swap router v2 getters.
pub static ROUTER_V2_WSTABLE_GETTERS: RouterGetters = router_v2_getters!(&POOL_DATA_V2_WSTABLE);

/// Record layouts of the farm family.
#[derive(Debug)]
pub struct FarmGetters {
    /// Farm minter state.
    pub minter_data: &'static RecordSchema,
    /// Farm NFT state.
    pub nft_data: &'static RecordSchema,
}

/// Farm v1 `get_farming_minter_data`.
pub static FARM_MINTER_DATA_V1: RecordSchema = record!("get_farming_minter_data", exact: false, {
    "next_item_index": K::Uint(64),
    "last_update_time": K::Uint(64),
    "status": K::Uint(8),
    "pool_count": K::Uint(8),
    "current_staked_tokens": K::Coins,
    "contract_unique_id": K::Uint(64),
    "min_stake_time": K::Uint(64),
    "staking_token_wallet": K::Address,
    "reward_token_wallet": K::Address,
    "deposited_nanorewards": K::Uint(150),
    "accrued_per_unit_nanorewards": K::Uint(150),
    "accrued_fee_nanorewards": K::Uint(150),
    "claimed_nanorewards": K::Uint(150),
    "claimed_fee_nanorewards": K::Uint(150),
    "accrued_nanorewards": K::Uint(150),
    "admin_fee": K::Uint(16),
    "nanorewards_per_24h": K::Uint(150),
    "unrestricted_deposit_rewards": K::Bool,
});

/// Farm v2 `get_farming_minter_data`.
pub static FARM_MINTER_DATA_V2: RecordSchema = record!("get_farming_minter_data", exact: false, {
    "next_item_index": K::Uint(64),
    "last_update_time": K::Uint(64),
    "status": K::Uint(8),
    "pool_count": K::Uint(8),
    "current_staked_tokens": K::Coins,
    "contract_unique_id": K::Uint(64),
    "min_stake_time": K::Uint(64),
    "staking_token_wallet": K::Address,
    "reward_token_wallet": K::Address,
    "deposited_nanorewards": K::Uint(150),
    "accrued_per_unit_nanorewards": K::Uint(150),
    "accrued_fee_nanorewards": K::Uint(150),
    "claimed_nanorewards": K::Uint(150),
    "claimed_fee_nanorewards": K::Uint(150),
    "accrued_nanorewards": K::Uint(150),
    "admin_fee": K::Uint(16),
    "nanorewards_per_24h": K::Uint(150),
    "unrestricted_deposit_rewards": K::Bool,
    "can_change_custodian": K::Bool,
    "can_send_raw_msg": K::Bool,
    "can_change_fee": K::Bool,
});

/// Farm v3 `get_farming_minter_data`.
pub static FARM_MINTER_DATA_V3: RecordSchema = record!("get_farming_minter_data", exact: false, {
    "next_item_index": K::Uint(64),
    "status": K::Uint(8),
    "pool_count": K::Uint(8),
    "current_staked_tokens": K::Coins,
    "contract_unique_id": K::Uint(64),
    "min_stake_time": K::Uint(64),
    "staking_token_wallet": K::Address,
    "custodian_address": K::AddressOrNone,
    "can_change_custodian": K::Bool,
    "can_send_raw_msg": K::Bool,
    "farm_data_accrued": K::Dict(8),
    "farm_data_parameters": K::Dict(8),
});

/// Farm v1 and v2 `get_farming_data` of the NFT.
pub static FARM_NFT_DATA_V1: RecordSchema = record!("get_farming_data", exact: false, {
    "status": K::Uint(8),
    "revoke_time": K::Uint(64),
    "staked_tokens": K::Coins,
    "claimed_per_unit_nanorewards": K::Uint(150),
    "stake_date": K::Uint(64),
});

/// Farm v2 `get_farming_data` of the NFT.
pub static FARM_NFT_DATA_V2: RecordSchema = record!("get_farming_data", exact: false, {
    "status": K::Uint(8),
    "revoke_time": K::Uint(64),
    "staked_tokens": K::Coins,
    "claimed_per_unit_nanorewards": K::Uint(150),
    "stake_date": K::Uint(64),
    "owner_address": K::Address,
});

/// Farm v3 `get_farming_data` of the NFT.
pub static FARM_NFT_DATA_V3: RecordSchema = record!("get_farming_data", exact: false, {
    "status": K::Uint(8),
    "revoke_time": K::Uint(64),
    "staked_tokens": K::Coins,
    "stake_date": K::Uint(64),
    "claimed_per_unit": K::Dict(8),
    "owner_address": K::Address,
});

/// Farm v1 getters.
pub static FARM_V1_GETTERS: FarmGetters = FarmGetters {
    minter_data: &FARM_MINTER_DATA_V1,
    nft_data: &FARM_NFT_DATA_V1,
};

/// Farm v2 getters.
pub static FARM_V2_GETTERS: FarmGetters = FarmGetters {
    minter_data: &FARM_MINTER_DATA_V2,
    nft_data: &FARM_NFT_DATA_V2,
};

/// Farm v3 getters.
pub static FARM_V3_GETTERS: FarmGetters = FarmGetters {
    minter_data: &FARM_MINTER_DATA_V3,
    nft_data: &FARM_NFT_DATA_V3,
};

// === Typed views ===

/// Jetton wallet state.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct JettonWalletData {
    /// Wallet balance.
    pub balance: Tokens,
    /// Wallet owner.
    pub owner: StdAddr,
    /// Jetton minter.
    pub jetton: StdAddr,
}

impl TryFrom<&Record> for JettonWalletData {
    type Error = DexError;

    fn try_from(record: &Record) -> Result<Self, Self::Error> {
        Ok(Self {
            balance: *ok!(record.get_coins("balance")),
            owner: *ok!(record.get_address("owner")),
            jetton: *ok!(record.get_address("jetton")),
        })
    }
}

/// LP account state.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LpAccountData {
    /// LP account owner.
    pub user_address: StdAddr,
    /// Pool of the account.
    pub pool_address: StdAddr,
    /// Deposited amount of the first token.
    pub amount0: Tokens,
    /// Deposited amount of the second token.
    pub amount1: Tokens,
}

impl TryFrom<&Record> for LpAccountData {
    type Error = DexError;

    fn try_from(record: &Record) -> Result<Self, Self::Error> {
        Ok(Self {
            user_address: *ok!(record.get_address("user_address")),
            pool_address: *ok!(record.get_address("pool_address")),
            amount0: *ok!(record.get_coins("amount0")),
            amount1: *ok!(record.get_coins("amount1")),
        })
    }
}

/// Swap simulation result.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ExpectedOutputs {
    /// Amount of the ask asset.
    pub jetton_to_receive: Tokens,
    /// Protocol fee.
    pub protocol_fee_paid: Tokens,
    /// Referral fee, if reported by the pool.
    pub ref_fee_paid: Option<Tokens>,
}

impl TryFrom<&Record> for ExpectedOutputs {
    type Error = DexError;

    fn try_from(record: &Record) -> Result<Self, Self::Error> {
        let ref_fee_paid = match record.get("ref_fee_paid") {
            Some(_) => Some(*ok!(record.get_coins("ref_fee_paid"))),
            None => None,
        };
        Ok(Self {
            jetton_to_receive: *ok!(record.get_coins("jetton_to_receive")),
            protocol_fee_paid: *ok!(record.get_coins("protocol_fee_paid")),
            ref_fee_paid,
        })
    }
}

/// Accrued rewards of a single farm v3 pool.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FarmAccruedState {
    /// Total deposited rewards.
    pub deposited_nanorewards: BigUint,
    /// Accumulated rewards per staked unit.
    pub accrued_per_unit_nanorewards: BigUint,
    /// Accrued admin fee.
    pub accrued_fee_nanorewards: BigUint,
    /// Claimed rewards.
    pub claimed_nanorewards: BigUint,
    /// Claimed admin fee.
    pub claimed_fee_nanorewards: BigUint,
    /// Accrued rewards.
    pub accrued_nanorewards: BigUint,
    /// Unix time of the last update.
    pub last_update_time: u64,
}

impl FarmAccruedState {
    const AMOUNT_BITS: u16 = 150;
}

impl Store for FarmAccruedState {
    fn store_into(&self, builder: &mut CellBuilder) -> Result<(), Error> {
        for amount in [
            &self.deposited_nanorewards,
            &self.accrued_per_unit_nanorewards,
            &self.accrued_fee_nanorewards,
            &self.claimed_nanorewards,
            &self.claimed_fee_nanorewards,
            &self.accrued_nanorewards,
        ] {
            ok!(builder.store_biguint(amount, Self::AMOUNT_BITS));
        }
        builder.store_u64(self.last_update_time)
    }
}

impl<'a> Load<'a> for FarmAccruedState {
    fn load_from(slice: &mut CellSlice<'a>) -> Result<Self, Error> {
        Ok(Self {
            deposited_nanorewards: ok!(slice.load_biguint(Self::AMOUNT_BITS)),
            accrued_per_unit_nanorewards: ok!(slice.load_biguint(Self::AMOUNT_BITS)),
            accrued_fee_nanorewards: ok!(slice.load_biguint(Self::AMOUNT_BITS)),
            claimed_nanorewards: ok!(slice.load_biguint(Self::AMOUNT_BITS)),
            claimed_fee_nanorewards: ok!(slice.load_biguint(Self::AMOUNT_BITS)),
            accrued_nanorewards: ok!(slice.load_biguint(Self::AMOUNT_BITS)),
            last_update_time: ok!(slice.load_u64()),
        })
    }
}

/// Parameters of a single farm v3 pool.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FarmPoolParameters {
    /// Admin fee in basis points.
    pub admin_fee: u16,
    /// Rewards distributed per day.
    pub nanorewards_per_24h: BigUint,
    /// Whether rewards are accrued for deposits without stakers.
    pub unrestricted_deposit_rewards: bool,
    /// Minter wallet of the reward token.
    pub reward_token_wallet: StdAddr,
    /// Whether the admin fee can be changed.
    pub can_change_fee: bool,
    /// Pool status.
    pub status: u8,
}

impl Store for FarmPoolParameters {
    fn store_into(&self, builder: &mut CellBuilder) -> Result<(), Error> {
        ok!(builder.store_u16(self.admin_fee));
        ok!(builder.store_biguint(&self.nanorewards_per_24h, 150));
        ok!(builder.store_bit(self.unrestricted_deposit_rewards));
        ok!(self.reward_token_wallet.store_into(builder));
        ok!(builder.store_bit(self.can_change_fee));
        builder.store_u8(self.status)
    }
}

impl<'a> Load<'a> for FarmPoolParameters {
    fn load_from(slice: &mut CellSlice<'a>) -> Result<Self, Error> {
        Ok(Self {
            admin_fee: ok!(slice.load_u16()),
            nanorewards_per_24h: ok!(slice.load_biguint(150)),
            unrestricted_deposit_rewards: ok!(slice.load_bit()),
            reward_token_wallet: ok!(StdAddr::load_from(slice)),
            can_change_fee: ok!(slice.load_bit()),
            status: ok!(slice.load_u8()),
        })
    }
}

/// Farm v3 minter state.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FarmMinterDataV3 {
    /// Index of the next NFT.
    pub next_item_index: u64,
    /// Minter status.
    pub status: u8,
    /// Number of reward pools.
    pub pool_count: u8,
    /// Currently staked amount.
    pub current_staked_tokens: Tokens,
    /// Unique id of the farm.
    pub contract_unique_id: u64,
    /// Minimal staking time in seconds.
    pub min_stake_time: u64,
    /// Minter wallet of the staked token.
    pub staking_token_wallet: StdAddr,
    /// Custodian of the farm.
    pub custodian_address: Option<StdAddr>,
    /// Whether the custodian can be changed.
    pub can_change_custodian: bool,
    /// Whether the custodian can send raw messages.
    pub can_send_raw_msg: bool,
    /// Accrued state by pool index.
    pub accrued: BTreeMap<u8, FarmAccruedState>,
    /// Parameters by pool index.
    pub parameters: BTreeMap<u8, FarmPoolParameters>,
}

impl TryFrom<&Record> for FarmMinterDataV3 {
    type Error = DexError;

    fn try_from(record: &Record) -> Result<Self, Self::Error> {
        Ok(Self {
            next_item_index: ok!(record.get_u64("next_item_index")),
            status: ok!(record.get_u64("status")) as u8,
            pool_count: ok!(record.get_u64("pool_count")) as u8,
            current_staked_tokens: *ok!(record.get_coins("current_staked_tokens")),
            contract_unique_id: ok!(record.get_u64("contract_unique_id")),
            min_stake_time: ok!(record.get_u64("min_stake_time")),
            staking_token_wallet: *ok!(record.get_address("staking_token_wallet")),
            custodian_address: *ok!(record.get_address_or_none("custodian_address")),
            can_change_custodian: *ok!(record.get_bool("can_change_custodian")),
            can_send_raw_msg: *ok!(record.get_bool("can_send_raw_msg")),
            accrued: ok!(pool_entries(record, "farm_data_accrued")),
            parameters: ok!(pool_entries(record, "farm_data_parameters")),
        })
    }
}

fn pool_entries<V>(record: &Record, name: &str) -> Result<BTreeMap<u8, V>, DexError>
where
    for<'a> V: Load<'a>,
{
    let entries = ok!(record.get_dict(name));

    let mut result = BTreeMap::new();
    for (key, cell) in entries {
        let value = ok!(cell
            .parse::<V>()
            .map_err(|e| DexError::malformed(format!("`{name}` entry {key}: {e}"))));
        result.insert(*key as u8, value);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Cell, HashBytes};
    use crate::dict::encode_dict_typed;
    use crate::stack::{decode_response, StackValue};

    fn accrued(seed: u32) -> FarmAccruedState {
        FarmAccruedState {
            deposited_nanorewards: BigUint::from(seed) << 120u32,
            accrued_per_unit_nanorewards: BigUint::from(seed + 1),
            accrued_fee_nanorewards: BigUint::from(seed + 2),
            claimed_nanorewards: BigUint::from(seed + 3),
            claimed_fee_nanorewards: BigUint::from(seed + 4),
            accrued_nanorewards: BigUint::from(seed + 5),
            last_update_time: 1_700_000_000 + seed as u64,
        }
    }

    fn parameters(seed: u8) -> FarmPoolParameters {
        FarmPoolParameters {
            admin_fee: 100 * seed as u16,
            nanorewards_per_24h: BigUint::from(1u8) << 140u32,
            unrestricted_deposit_rewards: seed % 2 == 0,
            reward_token_wallet: StdAddr::new(0, HashBytes([seed; 32])),
            can_change_fee: true,
            status: 1,
        }
    }

    #[test]
    fn farm_minter_v3() -> anyhow::Result<()> {
        let accrued_dict = encode_dict_typed(8, [(0u64, accrued(10)), (1, accrued(20))])?;
        let parameters_dict = encode_dict_typed(8, [(0u64, parameters(1)), (1, parameters(2))])?;

        let cell = |root: Option<Cell>| match root {
            Some(root) => StackValue::Cell(root),
            None => StackValue::Null,
        };

        let stack = vec![
            StackValue::int(5u32),
            StackValue::int(1u32),
            StackValue::int(2u32),
            StackValue::int(1_000u32),
            StackValue::int(42u32),
            StackValue::int(3600u32),
            StackValue::address(&StdAddr::new(0, HashBytes([9; 32])))?,
            StackValue::Slice(CellBuilder::build_from(&(false, false))?),
            StackValue::bool(false),
            StackValue::bool(true),
            cell(accrued_dict),
            cell(parameters_dict),
        ];

        let record = decode_response(&stack, &FARM_MINTER_DATA_V3)?;
        let data = FarmMinterDataV3::try_from(&record)?;
        assert_eq!(data.pool_count, 2);
        assert_eq!(data.custodian_address, None);
        assert!(data.can_send_raw_msg);
        assert_eq!(data.accrued.len(), 2);
        assert_eq!(data.accrued[&1], accrued(20));
        assert_eq!(data.parameters[&0], parameters(1));
        assert_eq!(data.parameters[&1].admin_fee, 200);
        Ok(())
    }

    #[test]
    fn empty_pool_dicts() -> anyhow::Result<()> {
        let stack = vec![
            StackValue::int(0u32),
            StackValue::int(0u32),
            StackValue::int(0u32),
            StackValue::int(0u32),
            StackValue::int(1u32),
            StackValue::int(0u32),
            StackValue::address(&StdAddr::new(0, HashBytes([9; 32])))?,
            StackValue::Slice(CellBuilder::build_from(&(false, false))?),
            StackValue::bool(false),
            StackValue::bool(false),
            StackValue::Null,
            StackValue::Null,
        ];

        let record = decode_response(&stack, &FARM_MINTER_DATA_V3)?;
        let data = FarmMinterDataV3::try_from(&record)?;
        assert!(data.accrued.is_empty());
        assert!(data.parameters.is_empty());
        Ok(())
    }

    #[test]
    fn accrued_state_fits_into_cell() -> anyhow::Result<()> {
        let cell = CellBuilder::build_from(&accrued(u32::MAX >> 2))?;
        assert_eq!(cell.bit_len(), 6 * 150 + 64);
        assert_eq!(cell.parse::<FarmAccruedState>()?, accrued(u32::MAX >> 2));
        Ok(())
    }

    #[test]
    fn typed_views() -> anyhow::Result<()> {
        let owner = StdAddr::new(0, HashBytes([1; 32]));
        let jetton = StdAddr::new(0, HashBytes([2; 32]));
        let stack = vec![
            StackValue::from(Tokens::new(10)),
            StackValue::address(&owner)?,
            StackValue::address(&jetton)?,
            StackValue::Cell(Cell::empty_cell()),
        ];
        let record = decode_response(&stack, &JETTON_WALLET_DATA)?;
        let data = JettonWalletData::try_from(&record)?;
        assert_eq!(data.balance, 10);
        assert_eq!(data.owner, owner);
        assert_eq!(data.jetton, jetton);

        let stack = vec![
            StackValue::from(Tokens::new(90)),
            StackValue::from(Tokens::new(1)),
        ];
        let outputs = ExpectedOutputs::try_from(&decode_response(&stack, &EXPECTED_OUTPUTS_V2)?)?;
        assert_eq!(outputs.jetton_to_receive, 90);
        assert_eq!(outputs.ref_fee_paid, None);
        Ok(())
    }

    #[test]
    fn pool_data_extensions() {
        let base = POOL_DATA_V2.fields.len();
        assert_eq!(POOL_DATA_V2_STABLE.fields.len(), base + 1);
        assert_eq!(POOL_DATA_V2_WCPI.fields.len(), base + 1);
        assert_eq!(POOL_DATA_V2_WSTABLE.fields.len(), base + 4);
        assert!(ROUTER_V1_GETTERS.schema(Getter::VaultData).is_none());
        assert!(ROUTER_V2_GETTERS.schema(Getter::VaultData).is_some());
    }
}
