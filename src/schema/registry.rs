use super::{FieldDesc, FieldKind, RefKind, Schema};

/// Message opcodes.
pub mod opcodes {
    /// Jetton transfer (TEP-74).
    pub const JETTON_TRANSFER: u32 = 0x0f8a7ea5;
    /// Jetton burn (TEP-74).
    pub const JETTON_BURN: u32 = 0x595f07bc;

    /// Router v1 swap.
    pub const SWAP_V1: u32 = 0x25938561;
    /// Router v1 provide liquidity.
    pub const PROVIDE_LP_V1: u32 = 0xfcf9e58f;
    /// LP account v1 refund.
    pub const REFUND_ME_V1: u32 = 0x0bf3f447;
    /// LP account v1 direct add liquidity.
    pub const DIRECT_ADD_LIQUIDITY_V1: u32 = 0x4cf82803;
    /// LP account v1 reset gas.
    pub const RESET_GAS_V1: u32 = 0x42a0fb43;
    /// Pool v1 collect fees.
    pub const COLLECT_FEES_V1: u32 = 0x1fcb7d3d;

    /// Router v2 swap.
    pub const SWAP_V2: u32 = 0x6664de2a;
    /// Router v2 cross swap.
    pub const CROSS_SWAP_V2: u32 = 0x69cf1a5b;
    /// Router v2 provide liquidity.
    pub const PROVIDE_LP_V2: u32 = 0x37c096df;
    /// LP account v2 refund.
    pub const REFUND_ME_V2: u32 = 0x132b9a2c;
    /// LP account v2 direct add liquidity.
    pub const DIRECT_ADD_LIQUIDITY_V2: u32 = 0x0ff8bfc6;
    /// LP account v2 reset gas.
    pub const RESET_GAS_V2: u32 = 0x29d22935;
    /// Vault v2 withdraw fee.
    pub const WITHDRAW_FEE_V2: u32 = 0x354bcdf4;

    /// pTON v1 deploy wallet.
    pub const DEPLOY_WALLET_V1: u32 = 0x6cc43573;
    /// pTON v2 ton transfer.
    pub const TON_TRANSFER_V2: u32 = 0x01f3835d;
    /// pTON v2 deploy wallet.
    pub const DEPLOY_WALLET_V2: u32 = 0x4f5f4313;

    /// Farm stake forward payload.
    pub const STAKE: u32 = 0x6ec9dc65;
    /// Farm NFT claim rewards.
    pub const CLAIM_REWARDS: u32 = 0x78d9f109;
    /// Farm NFT unstake.
    pub const UNSTAKE: u32 = 0xb92965a0;
    /// Farm NFT destroy.
    pub const DESTROY: u32 = 0x1f04537a;
}

macro_rules! fields {
    ($($name:literal: $kind:expr),*$(,)?) => {
        &[$(FieldDesc::new($name, $kind)),*]
    };
}

const fn nested(schema: &'static Schema) -> FieldKind {
    FieldKind::Ref(RefKind::Nested(schema))
}

const QUERY_ID: FieldKind = FieldKind::Uint(64);
const DEADLINE: FieldKind = FieldKind::Uint(64);

/// Jetton transfer.
pub static JETTON_TRANSFER: Schema = Schema {
    name: "jetton_transfer",
    opcode: Some(opcodes::JETTON_TRANSFER),
    fields: fields! {
        "query_id": QUERY_ID,
        "amount": FieldKind::Coins,
        "destination": FieldKind::Address,
        "response_destination": FieldKind::AddressOrNone,
        "custom_payload": FieldKind::MaybeRef,
        "forward_ton_amount": FieldKind::Coins,
        "forward_payload": FieldKind::MaybeRef,
    },
};

/// Jetton burn.
pub static JETTON_BURN: Schema = Schema {
    name: "jetton_burn",
    opcode: Some(opcodes::JETTON_BURN),
    fields: fields! {
        "query_id": QUERY_ID,
        "amount": FieldKind::Coins,
        "response_destination": FieldKind::Address,
        "custom_payload": FieldKind::MaybeRef,
    },
};

// === Router v1 ===

/// Router v1 swap forward payload.
pub static SWAP_V1: Schema = Schema {
    name: "swap_v1",
    opcode: Some(opcodes::SWAP_V1),
    fields: fields! {
        "ask_jetton_wallet": FieldKind::Address,
        "min_ask_amount": FieldKind::Coins,
        "user_wallet": FieldKind::Address,
        "referral": FieldKind::MaybeAddress,
    },
};

/// Router v1 provide liquidity forward payload.
pub static PROVIDE_LP_V1: Schema = Schema {
    name: "provide_lp_v1",
    opcode: Some(opcodes::PROVIDE_LP_V1),
    fields: fields! {
        "router_wallet": FieldKind::Address,
        "min_lp_out": FieldKind::Coins,
    },
};

/// LP account v1 refund.
pub static REFUND_ME_V1: Schema = Schema {
    name: "refund_me_v1",
    opcode: Some(opcodes::REFUND_ME_V1),
    fields: fields! {
        "query_id": QUERY_ID,
    },
};

/// LP account v1 direct add liquidity.
pub static DIRECT_ADD_LIQUIDITY_V1: Schema = Schema {
    name: "direct_add_liquidity_v1",
    opcode: Some(opcodes::DIRECT_ADD_LIQUIDITY_V1),
    fields: fields! {
        "query_id": QUERY_ID,
        "amount0": FieldKind::Coins,
        "amount1": FieldKind::Coins,
        "min_lp_out": FieldKind::Coins,
    },
};

/// LP account v1 reset gas.
pub static RESET_GAS_V1: Schema = Schema {
    name: "reset_gas_v1",
    opcode: Some(opcodes::RESET_GAS_V1),
    fields: fields! {
        "query_id": QUERY_ID,
    },
};

/// Pool v1 collect fees.
pub static COLLECT_FEES_V1: Schema = Schema {
    name: "collect_fees_v1",
    opcode: Some(opcodes::COLLECT_FEES_V1),
    fields: fields! {
        "query_id": QUERY_ID,
    },
};

// === Router v2 ===

/// Additional data of the router v2 swap.
pub static SWAP_V2_ADDITIONAL_DATA: Schema = Schema {
    name: "swap_v2_additional_data",
    opcode: None,
    fields: fields! {
        "min_ask_amount": FieldKind::Coins,
        "receiver": FieldKind::Address,
        "custom_payload_forward_gas": FieldKind::Coins,
        "custom_payload": FieldKind::MaybeRef,
        "refund_forward_gas": FieldKind::Coins,
        "refund_payload": FieldKind::MaybeRef,
        "referral_value": FieldKind::Uint(16),
        "referral": FieldKind::AddressOrNone,
    },
};

macro_rules! swap_v2_fields {
    () => {
        fields! {
            "ask_jetton_wallet": FieldKind::Address,
            "refund": FieldKind::Address,
            "excesses": FieldKind::Address,
            "deadline": DEADLINE,
            "additional_data": nested(&SWAP_V2_ADDITIONAL_DATA),
        }
    };
}

/// Router v2 swap forward payload.
pub static SWAP_V2: Schema = Schema {
    name: "swap_v2",
    opcode: Some(opcodes::SWAP_V2),
    fields: swap_v2_fields!(),
};

/// Router v2 cross swap, used as a custom payload of the swap.
pub static CROSS_SWAP_V2: Schema = Schema {
    name: "cross_swap_v2",
    opcode: Some(opcodes::CROSS_SWAP_V2),
    fields: swap_v2_fields!(),
};

/// Additional data of the router v2 liquidity provision.
pub static PROVIDE_LP_V2_ADDITIONAL_DATA: Schema = Schema {
    name: "provide_lp_v2_additional_data",
    opcode: None,
    fields: fields! {
        "min_lp_out": FieldKind::Coins,
        "receiver": FieldKind::Address,
        "both_positive": FieldKind::Bit,
        "custom_payload_forward_gas": FieldKind::Coins,
        "custom_payload": FieldKind::MaybeRef,
    },
};

/// Router v2 provide liquidity forward payload.
pub static PROVIDE_LP_V2: Schema = Schema {
    name: "provide_lp_v2",
    opcode: Some(opcodes::PROVIDE_LP_V2),
    fields: fields! {
        "router_wallet": FieldKind::Address,
        "refund": FieldKind::Address,
        "excesses": FieldKind::Address,
        "deadline": DEADLINE,
        "additional_data": nested(&PROVIDE_LP_V2_ADDITIONAL_DATA),
    },
};

/// LP account v2 refund.
pub static REFUND_ME_V2: Schema = Schema {
    name: "refund_me_v2",
    opcode: Some(opcodes::REFUND_ME_V2),
    fields: fields! {
        "query_id": QUERY_ID,
        "left_payload": FieldKind::MaybeRef,
        "right_payload": FieldKind::MaybeRef,
    },
};

/// Addresses of the LP account v2 direct add liquidity.
pub static DIRECT_ADD_LIQUIDITY_V2_ADDRESSES: Schema = Schema {
    name: "direct_add_liquidity_v2_addresses",
    opcode: None,
    fields: fields! {
        "refund": FieldKind::Address,
        "excesses": FieldKind::Address,
    },
};

/// LP account v2 direct add liquidity.
pub static DIRECT_ADD_LIQUIDITY_V2: Schema = Schema {
    name: "direct_add_liquidity_v2",
    opcode: Some(opcodes::DIRECT_ADD_LIQUIDITY_V2),
    fields: fields! {
        "query_id": QUERY_ID,
        "amount0": FieldKind::Coins,
        "amount1": FieldKind::Coins,
        "min_lp_out": FieldKind::Coins,
        "custom_payload_forward_gas": FieldKind::Coins,
        "user": FieldKind::Address,
        "custom_payload": FieldKind::MaybeRef,
        "addresses": nested(&DIRECT_ADD_LIQUIDITY_V2_ADDRESSES),
    },
};

/// LP account v2 reset gas.
pub static RESET_GAS_V2: Schema = Schema {
    name: "reset_gas_v2",
    opcode: Some(opcodes::RESET_GAS_V2),
    fields: fields! {
        "query_id": QUERY_ID,
    },
};

/// Vault v2 withdraw fee.
pub static WITHDRAW_FEE_V2: Schema = Schema {
    name: "withdraw_fee_v2",
    opcode: Some(opcodes::WITHDRAW_FEE_V2),
    fields: fields! {
        "query_id": QUERY_ID,
    },
};

// === pTON ===

/// pTON v1 deploy wallet.
pub static DEPLOY_WALLET_V1: Schema = Schema {
    name: "deploy_wallet_v1",
    opcode: Some(opcodes::DEPLOY_WALLET_V1),
    fields: fields! {
        "query_id": QUERY_ID,
        "owner": FieldKind::Address,
    },
};

/// pTON v2 ton transfer.
pub static TON_TRANSFER_V2: Schema = Schema {
    name: "ton_transfer_v2",
    opcode: Some(opcodes::TON_TRANSFER_V2),
    fields: fields! {
        "query_id": QUERY_ID,
        "ton_amount": FieldKind::Coins,
        "refund": FieldKind::Address,
        "forward_payload": FieldKind::MaybeRef,
    },
};

/// pTON v2 deploy wallet.
pub static DEPLOY_WALLET_V2: Schema = Schema {
    name: "deploy_wallet_v2",
    opcode: Some(opcodes::DEPLOY_WALLET_V2),
    fields: fields! {
        "query_id": QUERY_ID,
        "owner": FieldKind::Address,
        "excesses": FieldKind::Address,
    },
};

// === Farm ===

/// Farm v1 and v2 stake forward payload.
pub static STAKE_V1: Schema = Schema {
    name: "stake_v1",
    opcode: Some(opcodes::STAKE),
    fields: &[],
};

/// Farm v3 stake forward payload.
pub static STAKE_V3: Schema = Schema {
    name: "stake_v3",
    opcode: Some(opcodes::STAKE),
    fields: fields! {
        "owner": FieldKind::AddressOrNone,
    },
};

/// Farm v1 and v2 claim rewards.
pub static CLAIM_REWARDS_V1: Schema = Schema {
    name: "claim_rewards_v1",
    opcode: Some(opcodes::CLAIM_REWARDS),
    fields: fields! {
        "query_id": QUERY_ID,
    },
};

/// Farm v3 claim rewards.
pub static CLAIM_REWARDS_V3: Schema = Schema {
    name: "claim_rewards_v3",
    opcode: Some(opcodes::CLAIM_REWARDS),
    fields: fields! {
        "query_id": QUERY_ID,
        "claim_all": FieldKind::Bit,
        "pool_index": FieldKind::Uint(8),
    },
};

/// Farm unstake.
pub static UNSTAKE: Schema = Schema {
    name: "unstake",
    opcode: Some(opcodes::UNSTAKE),
    fields: fields! {
        "query_id": QUERY_ID,
    },
};

/// Farm NFT destroy.
pub static DESTROY: Schema = Schema {
    name: "destroy",
    opcode: Some(opcodes::DESTROY),
    fields: fields! {
        "query_id": QUERY_ID,
    },
};

/// Returns all top-level message schemas.
pub fn all_schemas() -> &'static [&'static Schema] {
    static ALL: &[&Schema] = &[
        &JETTON_TRANSFER,
        &JETTON_BURN,
        &SWAP_V1,
        &PROVIDE_LP_V1,
        &REFUND_ME_V1,
        &DIRECT_ADD_LIQUIDITY_V1,
        &RESET_GAS_V1,
        &COLLECT_FEES_V1,
        &SWAP_V2,
        &CROSS_SWAP_V2,
        &PROVIDE_LP_V2,
        &REFUND_ME_V2,
        &DIRECT_ADD_LIQUIDITY_V2,
        &RESET_GAS_V2,
        &WITHDRAW_FEE_V2,
        &DEPLOY_WALLET_V1,
        &TON_TRANSFER_V2,
        &DEPLOY_WALLET_V2,
        &STAKE_V1,
        &STAKE_V3,
        &CLAIM_REWARDS_V1,
        &CLAIM_REWARDS_V3,
        &UNSTAKE,
        &DESTROY,
    ];
    ALL
}
