use super::*;
use crate::cell::{HashBytes, Load};
use crate::dispatch::{resolve_farm, resolve_operation_set, resolve_pton, DexType};
use crate::gas::GasOverrides;
use crate::models::Asset;
use crate::schema;

fn addr(byte: u8) -> StdAddr {
    StdAddr::new(0, HashBytes([byte; 32]))
}

const ROUTER: u8 = 1;
const USER: u8 = 2;
const OFFER_WALLET: u8 = 3;
const ASK_WALLET: u8 = 4;
const REFERRAL: u8 = 5;

fn swap_params(offer_asset: Asset, ask_asset: Asset) -> SwapParams {
    let mut body = SwapBody::new(addr(ASK_WALLET), Tokens::new(1_000_000), addr(USER));
    body.deadline = Some(1_700_000_000);

    SwapParams {
        router: addr(ROUTER),
        user: addr(USER),
        offer_asset,
        ask_asset,
        offer_wallet: addr(OFFER_WALLET),
        offer_amount: Tokens::new(1_000_000_000),
        body,
        query_id: 0,
        gas: GasOverrides::NONE,
        pton: None,
    }
}

fn jetton(byte: u8) -> Asset {
    Asset::Jetton(addr(byte))
}

fn v2_1() -> &'static DexBuilderSet {
    resolve_operation_set(VersionTag::new(2, 1)).unwrap()
}

fn v1() -> &'static DexBuilderSet {
    resolve_operation_set(VersionTag::new(1, 0)).unwrap()
}

#[test]
fn v1_jetton_swap_layout() -> anyhow::Result<()> {
    let mut params = swap_params(jetton(10), jetton(11));
    params.body.referral = Some(addr(REFERRAL));

    let tx = v1().build(&DexOperation::Swap(params))?;
    assert_eq!(tx.to, addr(OFFER_WALLET));
    assert_eq!(tx.value, 220_000_000);

    let transfer = JettonTransfer::decode(&tx.body)?;
    assert_eq!(transfer.amount, 1_000_000_000);
    assert_eq!(transfer.destination, addr(ROUTER));
    assert_eq!(transfer.response_destination, Some(addr(USER)));
    assert_eq!(transfer.forward_ton_amount, 175_000_000);

    let payload = transfer.forward_payload.unwrap();
    // op + ask wallet + coins(1_000_000) + user + referral flag + referral
    assert_eq!(payload.bit_len(), 32 + 267 + (4 + 24) + 267 + 1 + 267);
    assert_eq!(payload.reference_count(), 0);

    let mut slice = payload.as_slice();
    assert_eq!(slice.load_u32()?, schema::opcodes::SWAP_V1);
    assert_eq!(StdAddr::load_from(&mut slice)?, addr(ASK_WALLET));
    assert_eq!(Tokens::load_from(&mut slice)?, 1_000_000);
    assert_eq!(StdAddr::load_from(&mut slice)?, addr(USER));
    assert!(slice.load_bit()?);
    assert_eq!(StdAddr::load_from(&mut slice)?, addr(REFERRAL));
    assert!(slice.is_data_empty());
    Ok(())
}

#[test]
fn v2_jetton_swap_payload() -> anyhow::Result<()> {
    let mut params = swap_params(jetton(10), Asset::Native);
    params.body.referral_value = Some(50);

    let set = v2_1();
    let tx = set.build(&DexOperation::Swap(params))?;
    assert_eq!(tx.value, 300_000_000);

    let transfer = JettonTransfer::decode(&tx.body)?;
    assert_eq!(transfer.forward_ton_amount, 240_000_000);

    let (layout, fields) = set.decode_payload(&transfer.forward_payload.unwrap())?;
    assert_eq!(layout.name, schema::SWAP_V2.name);
    assert_eq!(fields.get_address("ask_jetton_wallet")?, addr(ASK_WALLET));
    assert_eq!(fields.get_address("refund")?, addr(USER));
    assert_eq!(fields.get_address("excesses")?, addr(USER));
    assert_eq!(fields.get_uint("deadline")?, 1_700_000_000);

    let additional = fields.get_nested("additional_data")?;
    assert_eq!(additional.get_coins("min_ask_amount")?, 1_000_000);
    assert_eq!(additional.get_uint("referral_value")?, 50);
    assert_eq!(additional.get_address_or_none("referral")?, None);
    Ok(())
}

#[test]
fn default_deadline() -> anyhow::Result<()> {
    let body = SwapBody::new(addr(ASK_WALLET), Tokens::ZERO, addr(USER));
    let before = crate::util::now_sec();
    let cell = v2_1().swap_body(&body, &addr(USER))?;
    let fields = schema::SWAP_V2.decode(&cell)?;

    let deadline = fields.get_uint("deadline")?;
    assert!(deadline >= before + DEFAULT_DEADLINE_SECS);
    assert!(deadline <= crate::util::now_sec() + DEFAULT_DEADLINE_SECS);

    let additional = fields.get_nested("additional_data")?;
    assert_eq!(
        additional.get_uint("referral_value")?,
        DEFAULT_REFERRAL_VALUE as u64
    );
    Ok(())
}

#[test]
fn referral_value_is_bounded() {
    let mut params = swap_params(jetton(10), jetton(11));
    params.body.referral_value = Some(150);
    assert!(matches!(
        v2_1().build(&DexOperation::Swap(params)),
        Err(DexError::InvalidReferralValue(150))
    ));

    let mut params = swap_params(jetton(10), jetton(11));
    params.body.referral_value = Some(MAX_REFERRAL_VALUE);
    assert!(v2_1().build(&DexOperation::Swap(params)).is_ok());
}

#[test]
fn v1_rejects_referral_value() {
    for value in [50, 150] {
        let mut params = swap_params(jetton(10), jetton(11));
        params.body.referral_value = Some(value);
        assert!(matches!(
            v1().build(&DexOperation::Swap(params)),
            Err(DexError::UnsupportedOperation {
                operation: "referral_value",
                ..
            })
        ));
    }

    let mut params = swap_params(jetton(10), jetton(11));
    params.body.referral = Some(addr(5));
    assert!(v1().build(&DexOperation::Swap(params)).is_ok());
}

#[test]
fn native_offer_goes_through_pton() -> anyhow::Result<()> {
    let set = v2_1();
    let tx = set.build(&DexOperation::Swap(swap_params(Asset::Native, jetton(11))))?;

    assert_eq!(tx.to, addr(OFFER_WALLET));
    assert_eq!(tx.value, 1_000_000_000 + 300_000_000);

    let pton = resolve_pton(2, 1)?;
    let (layout, fields) = pton.decode_payload(&tx.body)?;
    assert_eq!(layout.name, schema::TON_TRANSFER_V2.name);
    assert_eq!(fields.get_coins("ton_amount")?, 1_000_000_000);
    assert_eq!(fields.get_address("refund")?, addr(USER));

    let payload = fields.get_maybe_ref("forward_payload")?.unwrap();
    let (layout, _) = set.decode_payload(&payload)?;
    assert_eq!(layout.name, schema::SWAP_V2.name);
    Ok(())
}

#[test]
fn native_offer_on_v1() -> anyhow::Result<()> {
    let tx = v1().build(&DexOperation::Swap(swap_params(Asset::Native, jetton(11))))?;
    assert_eq!(tx.value, 1_000_000_000 + 185_000_000);

    let transfer = JettonTransfer::decode(&tx.body)?;
    assert_eq!(transfer.amount, 1_000_000_000);
    assert_eq!(transfer.destination, addr(ROUTER));
    assert_eq!(transfer.response_destination, None);
    assert_eq!(transfer.forward_ton_amount, 185_000_000);
    Ok(())
}

#[test]
fn pton_version_mismatch() {
    let mut params = swap_params(Asset::Native, jetton(11));
    params.pton = Some(&pton::PTON_V1);

    let err = v2_1().build(&DexOperation::Swap(params)).unwrap_err();
    assert!(matches!(
        err,
        DexError::VersionMismatch { expected, actual }
            if expected == VersionTag::new(2, 1) && actual == VersionTag::new(1, 0)
    ));
}

#[test]
fn duplicate_assets() {
    for (offer, ask) in [(jetton(10), jetton(10)), (Asset::Native, Asset::Native)] {
        let params = swap_params(offer, ask);
        assert!(matches!(
            v2_1().build(&DexOperation::Swap(params)),
            Err(DexError::DuplicateAsset)
        ));

        let params = ProvideLiquidityParams {
            router: addr(ROUTER),
            user: addr(USER),
            offer_asset: offer,
            other_asset: ask,
            offer_wallet: addr(OFFER_WALLET),
            offer_amount: Tokens::new(1_000),
            body: ProvideLiquidityBody::new(addr(ASK_WALLET), Tokens::new(1)),
            query_id: 0,
            gas: GasOverrides::NONE,
            pton: None,
        };
        assert!(matches!(
            v1().build(&DexOperation::ProvideLiquidity(params)),
            Err(DexError::DuplicateAsset)
        ));
    }
}

fn provide_params(single_side: bool) -> ProvideLiquidityParams {
    let mut body = ProvideLiquidityBody::new(addr(ASK_WALLET), Tokens::new(1));
    body.single_side = single_side;
    body.deadline = Some(1_700_000_000);

    ProvideLiquidityParams {
        router: addr(ROUTER),
        user: addr(USER),
        offer_asset: jetton(10),
        other_asset: jetton(11),
        offer_wallet: addr(OFFER_WALLET),
        offer_amount: Tokens::new(1_000),
        body,
        query_id: 0,
        gas: GasOverrides::NONE,
        pton: None,
    }
}

#[test]
fn provide_liquidity() -> anyhow::Result<()> {
    let set = v2_1();

    let tx = set.build(&DexOperation::ProvideLiquidity(provide_params(false)))?;
    assert_eq!(tx.value, 300_000_000);
    let transfer = JettonTransfer::decode(&tx.body)?;
    assert_eq!(transfer.forward_ton_amount, 235_000_000);
    let (_, fields) = set.decode_payload(&transfer.forward_payload.unwrap())?;
    let additional = fields.get_nested("additional_data")?;
    assert!(additional.get_bit("both_positive")?);
    assert_eq!(additional.get_address("receiver")?, addr(USER));

    let tx = set.build(&DexOperation::ProvideLiquidity(provide_params(true)))?;
    assert_eq!(tx.value, 1_000_000_000);
    let transfer = JettonTransfer::decode(&tx.body)?;
    let (_, fields) = set.decode_payload(&transfer.forward_payload.unwrap())?;
    let additional = fields.get_nested("additional_data")?;
    assert!(!additional.get_bit("both_positive")?);
    Ok(())
}

#[test]
fn single_side_provide_requires_capability() {
    let err = v1()
        .build(&DexOperation::ProvideLiquidity(provide_params(true)))
        .unwrap_err();
    assert!(matches!(
        err,
        DexError::UnsupportedOperation {
            operation: "single_side_provide_liquidity",
            ..
        }
    ));
}

#[test]
fn operations_missing_from_version() {
    let collect = DexOperation::CollectFees(CollectFeesParams {
        pool: addr(6),
        query_id: 0,
        gas: GasOverrides::NONE,
    });
    assert!(v1().build(&collect).is_ok());
    assert!(matches!(
        v2_1().build(&collect),
        Err(DexError::UnsupportedOperation {
            operation: "collect_fees",
            ..
        })
    ));

    let withdraw = DexOperation::WithdrawFee(WithdrawFeeParams {
        vault: addr(7),
        query_id: 0,
        gas: GasOverrides::NONE,
    });
    assert!(v2_1().build(&withdraw).is_ok());
    assert!(matches!(
        v1().build(&withdraw),
        Err(DexError::UnsupportedOperation {
            operation: "withdraw_fee",
            ..
        })
    ));

    let body = SwapBody::new(addr(ASK_WALLET), Tokens::ZERO, addr(USER));
    assert!(v2_1().cross_swap_body(&body, &addr(USER)).is_ok());
    assert!(matches!(
        v1().cross_swap_body(&body, &addr(USER)),
        Err(DexError::UnsupportedOperation {
            operation: "cross_swap",
            ..
        })
    ));
}

#[test]
fn lp_account_operations() -> anyhow::Result<()> {
    let refund = RefundParams {
        lp_account: addr(8),
        left_payload: Some(Cell::empty_cell()),
        right_payload: None,
        query_id: 5,
        gas: GasOverrides::NONE,
    };

    let tx = v2_1().build(&DexOperation::Refund(refund.clone()))?;
    assert_eq!(tx.to, addr(8));
    assert_eq!(tx.value, 800_000_000);
    let fields = schema::REFUND_ME_V2.decode(&tx.body)?;
    assert_eq!(fields.get_uint("query_id")?, 5);
    assert!(fields.get_maybe_ref("left_payload")?.is_some());

    assert!(v1().build(&DexOperation::Refund(refund)).is_err());

    let direct = DirectAddLiquidityParams {
        lp_account: addr(8),
        amount0: Tokens::new(10),
        amount1: Tokens::new(20),
        min_lp_out: Tokens::new(1),
        user: addr(USER),
        refund: Some(addr(9)),
        excesses: None,
        custom_payload: None,
        custom_payload_forward_gas: None,
        query_id: 0,
        gas: GasOverrides::NONE,
    };
    let tx = v2_1().build(&DexOperation::DirectAddLiquidity(direct.clone()))?;
    let fields = schema::DIRECT_ADD_LIQUIDITY_V2.decode(&tx.body)?;
    let addresses = fields.get_nested("addresses")?;
    assert_eq!(addresses.get_address("refund")?, addr(9));
    assert_eq!(addresses.get_address("excesses")?, addr(9));

    let tx = v1().build(&DexOperation::DirectAddLiquidity(direct))?;
    let fields = schema::DIRECT_ADD_LIQUIDITY_V1.decode(&tx.body)?;
    assert_eq!(fields.get_coins("amount1")?, 20);

    let reset = DexOperation::ResetGas(ResetGasParams {
        lp_account: addr(8),
        query_id: 0,
        gas: GasOverrides {
            gas_amount: Some(Tokens::new(42)),
            ..GasOverrides::NONE
        },
    });
    assert_eq!(v2_1().build(&reset)?.value, 42);
    Ok(())
}

#[test]
fn lp_burn() -> anyhow::Result<()> {
    let tx = v1().build(&DexOperation::Burn(BurnParams {
        lp_wallet: addr(12),
        amount: Tokens::new(500),
        user: addr(USER),
        query_id: 1,
        gas: GasOverrides::NONE,
    }))?;
    assert_eq!(tx.to, addr(12));
    assert_eq!(tx.value, 500_000_000);

    let burn = JettonBurn::decode(&tx.body)?;
    assert_eq!(burn.amount, 500);
    assert_eq!(burn.response_destination, addr(USER));
    Ok(())
}

#[test]
fn every_router_sub_type_builds() -> anyhow::Result<()> {
    for sub_type in DexType::ALL {
        let tag = VersionTag::new(2, 2).with_sub_type(sub_type);
        let set = resolve_operation_set(tag)?;
        let tx = set.build(&DexOperation::Swap(swap_params(jetton(10), jetton(11))))?;
        let transfer = JettonTransfer::decode(&tx.body)?;
        set.decode_payload(&transfer.forward_payload.unwrap())?;
    }
    Ok(())
}

#[test]
fn unknown_payload_opcode() {
    let cell = crate::cell::CellBuilder::build_from(&0xdeadbeefu32).unwrap();
    assert!(matches!(
        v2_1().decode_payload(&cell),
        Err(DexError::MalformedResponse(_))
    ));
    assert!(matches!(
        v2_1().decode_payload(&Cell::empty_cell()),
        Err(DexError::UnexpectedEnd { .. })
    ));
}

#[test]
fn pton_deploy_wallet() -> anyhow::Result<()> {
    let params = DeployWalletParams {
        proxy_ton: addr(20),
        owner: addr(USER),
        excesses: None,
        query_id: 3,
        gas: GasOverrides::NONE,
    };

    let v1 = resolve_pton(1, 0)?;
    let tx = v1.build(&PtonOperation::DeployWallet(params.clone()))?;
    assert_eq!(tx.value, 1_050_000_000);
    let (layout, fields) = v1.decode_payload(&tx.body)?;
    assert_eq!(layout.name, schema::DEPLOY_WALLET_V1.name);
    assert_eq!(fields.get_address("owner")?, addr(USER));

    let v2 = resolve_pton(2, 1)?;
    let tx = v2.build(&PtonOperation::DeployWallet(params))?;
    assert_eq!(tx.value, 100_000_000);
    let fields = schema::DEPLOY_WALLET_V2.decode(&tx.body)?;
    assert_eq!(fields.get_address("excesses")?, addr(USER));
    Ok(())
}

#[test]
fn v3_claim_encodings() -> anyhow::Result<()> {
    let farm = resolve_farm(3, 0)?;

    let claim = |target| {
        farm.build(&FarmOperation::ClaimRewards(ClaimRewardsParams {
            nft: addr(30),
            target,
            pool_count: 3,
            query_id: 0,
            gas: GasOverrides::NONE,
        }))
    };

    let tx = claim(ClaimTarget::All)?;
    assert_eq!(tx.value, 300_000_000 + 2 * 130_000_000);
    let fields = schema::CLAIM_REWARDS_V3.decode(&tx.body)?;
    assert!(fields.get_bit("claim_all")?);
    assert_eq!(fields.get_uint("pool_index")?, 0);

    let tx = claim(ClaimTarget::Pool(2))?;
    assert_eq!(tx.value, 300_000_000);
    let fields = schema::CLAIM_REWARDS_V3.decode(&tx.body)?;
    assert!(!fields.get_bit("claim_all")?);
    assert_eq!(fields.get_uint("pool_index")?, 2);
    Ok(())
}

#[test]
fn farm_versions() -> anyhow::Result<()> {
    let v1 = resolve_farm(1, 0)?;
    let v3 = resolve_farm(3, 0)?;

    let claim_pool = FarmOperation::ClaimRewards(ClaimRewardsParams {
        nft: addr(30),
        target: ClaimTarget::Pool(1),
        pool_count: 1,
        query_id: 0,
        gas: GasOverrides::NONE,
    });
    assert!(v1.build(&claim_pool).is_err());

    let unstake = FarmOperation::Unstake(UnstakeParams {
        nft: addr(30),
        pool_count: 2,
        query_id: 0,
        gas: GasOverrides::NONE,
    });
    assert_eq!(v1.build(&unstake)?.value, 400_000_000);
    assert_eq!(v3.build(&unstake)?.value, 530_000_000);

    let stake = StakeParams {
        user_wallet: addr(31),
        minter: addr(32),
        amount: Tokens::new(1_000),
        owner: Some(addr(33)),
        user: addr(USER),
        query_id: 0,
        gas: GasOverrides::NONE,
    };
    assert!(v1.build(&FarmOperation::Stake(stake.clone())).is_err());

    let tx = v3.build(&FarmOperation::Stake(stake))?;
    assert_eq!(tx.to, addr(31));
    assert_eq!(tx.value, 300_000_000);
    let transfer = JettonTransfer::decode(&tx.body)?;
    assert_eq!(transfer.destination, addr(32));
    assert_eq!(transfer.forward_ton_amount, 250_000_000);

    let (layout, fields) = v3.decode_payload(&transfer.forward_payload.unwrap())?;
    assert_eq!(layout.name, schema::STAKE_V3.name);
    assert_eq!(fields.get_address_or_none("owner")?, Some(addr(33)));
    Ok(())
}

#[test]
fn body_boc_is_deterministic() -> anyhow::Result<()> {
    let build = || v2_1().build(&DexOperation::Swap(swap_params(jetton(10), jetton(11))));
    let first = build()?;
    let second = build()?;
    assert_eq!(first.body_boc(), second.body_boc());
    assert_eq!(crate::boc::Boc::decode(first.body_boc())?, first.body);
    Ok(())
}
