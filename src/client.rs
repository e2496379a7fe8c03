//! Async collaborators and a client which resolves addresses before building.

use async_trait::async_trait;

use crate::dispatch::{resolve_operation_set, VersionTag};
use crate::error::DexError;
use crate::gas::GasOverrides;
use crate::models::{Asset, StdAddr};
use crate::num::Tokens;
use crate::ops::getters::WALLET_ADDRESS;
use crate::ops::{
    ClaimRewardsParams, ClaimTarget, DexBuilderSet, DexOperation, FarmGetter, FarmOperation,
    FarmSet, Getter, ProvideLiquidityBody, ProvideLiquidityParams, SwapBody, SwapParams, TxParams,
    UnstakeParams,
};
use crate::stack::{decode_response, Record, StackValue};

/// Blockchain access.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends an internal message from the user wallet.
    async fn send_message(&self, tx: &TxParams) -> anyhow::Result<()>;

    /// Runs a get-method of the account and returns the result stack.
    async fn run_get_method(
        &self,
        address: &StdAddr,
        method: &str,
        args: Vec<StackValue>,
    ) -> anyhow::Result<Vec<StackValue>>;
}

/// Jetton wallet lookup.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Returns the wallet of `owner` for the jetton with the `asset` minter.
    ///
    /// The pTON minter is used for the native currency.
    async fn resolve_counterpart_wallet(
        &self,
        owner: &StdAddr,
        asset: &StdAddr,
    ) -> Result<StdAddr, DexError>;
}

#[async_trait]
impl<T: Transport + ?Sized> AddressResolver for T {
    async fn resolve_counterpart_wallet(
        &self,
        owner: &StdAddr,
        asset: &StdAddr,
    ) -> Result<StdAddr, DexError> {
        let args = vec![StackValue::address(owner)?];
        let stack = self
            .run_get_method(asset, Getter::WalletAddress.method_name(), args)
            .await
            .map_err(DexError::Transport)?;

        let record = decode_response(&stack, &WALLET_ADDRESS)?;
        let wallet = *record.get_address("wallet_address")?;
        tracing::debug!(%owner, %asset, %wallet, "resolved jetton wallet");
        Ok(wallet)
    }
}

/// Swap request with addresses which are not yet resolved.
#[derive(Debug, Clone)]
pub struct SwapRequest {
    /// Sender of the swap.
    pub user: StdAddr,
    /// Offered asset.
    pub offer_asset: Asset,
    /// Requested asset.
    pub ask_asset: Asset,
    /// Offered amount.
    pub offer_amount: Tokens,
    /// Minimal amount of the ask asset.
    pub min_ask_amount: Tokens,
    /// Receiver of the ask asset. The user by default.
    pub receiver: Option<StdAddr>,
    /// Referral address.
    pub referral: Option<StdAddr>,
    /// Referral fee in basis points.
    pub referral_value: Option<u16>,
    /// Unix time after which the swap fails.
    pub deadline: Option<u64>,
    /// Arbitrary request id.
    pub query_id: u64,
    /// Gas overrides.
    pub gas: GasOverrides,
}

/// Liquidity provision request with addresses which are not yet resolved.
#[derive(Debug, Clone)]
pub struct ProvideLiquidityRequest {
    /// Liquidity provider.
    pub user: StdAddr,
    /// Provided asset.
    pub offer_asset: Asset,
    /// The other asset of the pool.
    pub other_asset: Asset,
    /// Provided amount.
    pub offer_amount: Tokens,
    /// Minimal amount of LP tokens.
    pub min_lp_out: Tokens,
    /// Whether liquidity is provided with a single asset.
    pub single_side: bool,
    /// Unix time after which the provision fails.
    pub deadline: Option<u64>,
    /// Arbitrary request id.
    pub query_id: u64,
    /// Gas overrides.
    pub gas: GasOverrides,
}

/// Router client.
pub struct DexClient<T> {
    transport: T,
    router: StdAddr,
    proxy_ton: StdAddr,
    set: &'static DexBuilderSet,
}

impl<T: Transport> DexClient<T> {
    /// Creates a client for the router of the specified version.
    pub fn new(
        transport: T,
        router: StdAddr,
        version: VersionTag,
        proxy_ton: StdAddr,
    ) -> Result<Self, DexError> {
        Ok(Self {
            transport,
            router,
            proxy_ton,
            set: ok!(resolve_operation_set(version)),
        })
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the builder set of the router.
    pub fn builder_set(&self) -> &'static DexBuilderSet {
        self.set
    }

    /// Sends the built message.
    pub async fn send(&self, tx: &TxParams) -> Result<(), DexError> {
        self.transport
            .send_message(tx)
            .await
            .map_err(DexError::Transport)
    }

    /// Runs the router family getter and decodes the response.
    pub async fn get(
        &self,
        address: &StdAddr,
        getter: Getter,
        args: Vec<StackValue>,
    ) -> Result<Record, DexError> {
        let stack = self
            .transport
            .run_get_method(address, getter.method_name(), args)
            .await
            .map_err(DexError::Transport)?;
        self.set.decode(getter, &stack)
    }

    /// Resolves the wallets and builds the swap.
    pub async fn swap(&self, request: &SwapRequest) -> Result<TxParams, DexError> {
        if request.offer_asset == request.ask_asset {
            return Err(DexError::DuplicateAsset);
        }

        let (offer_wallet, ask_wallet) = tokio::try_join!(
            self.offer_wallet(&request.user, &request.offer_asset),
            self.router_wallet(&request.ask_asset),
        )?;

        let mut body = SwapBody::new(
            ask_wallet,
            request.min_ask_amount,
            request.receiver.unwrap_or(request.user),
        );
        body.referral = request.referral;
        body.referral_value = request.referral_value;
        body.deadline = request.deadline;

        self.set.build(&DexOperation::Swap(SwapParams {
            router: self.router,
            user: request.user,
            offer_asset: request.offer_asset,
            ask_asset: request.ask_asset,
            offer_wallet,
            offer_amount: request.offer_amount,
            body,
            query_id: request.query_id,
            gas: request.gas,
            pton: None,
        }))
    }

    /// Resolves the wallets and builds the liquidity provision.
    pub async fn provide_liquidity(
        &self,
        request: &ProvideLiquidityRequest,
    ) -> Result<TxParams, DexError> {
        if request.offer_asset == request.other_asset {
            return Err(DexError::DuplicateAsset);
        }

        let (offer_wallet, router_wallet) = tokio::try_join!(
            self.offer_wallet(&request.user, &request.offer_asset),
            self.router_wallet(&request.other_asset),
        )?;

        let mut body = ProvideLiquidityBody::new(router_wallet, request.min_lp_out);
        body.single_side = request.single_side;
        body.deadline = request.deadline;

        self.set
            .build(&DexOperation::ProvideLiquidity(ProvideLiquidityParams {
                router: self.router,
                user: request.user,
                offer_asset: request.offer_asset,
                other_asset: request.other_asset,
                offer_wallet,
                offer_amount: request.offer_amount,
                body,
                query_id: request.query_id,
                gas: request.gas,
                pton: None,
            }))
    }

    /// Returns the number of reward pools of the farm.
    ///
    /// Farms without pools always have one. A failed lookup is returned as is.
    pub async fn farm_pool_count(&self, farm: &FarmSet, minter: &StdAddr) -> Result<u32, DexError> {
        if !farm.has_pools() {
            return Ok(1);
        }

        let getter = FarmGetter::MinterData;
        let stack = self
            .transport
            .run_get_method(minter, getter.method_name(), Vec::new())
            .await
            .map_err(DexError::Transport)?;

        let record = farm.decode(getter, &stack)?;
        let pool_count = record.get_u64("pool_count")?;
        Ok(pool_count as u32)
    }

    /// Looks up the pool count and builds the rewards claim.
    pub async fn claim_rewards(
        &self,
        farm: &FarmSet,
        minter: &StdAddr,
        nft: StdAddr,
        target: ClaimTarget,
        query_id: u64,
        gas: GasOverrides,
    ) -> Result<TxParams, DexError> {
        let pool_count = ok!(self.farm_pool_count(farm, minter).await);
        farm.build(&FarmOperation::ClaimRewards(ClaimRewardsParams {
            nft,
            target,
            pool_count,
            query_id,
            gas,
        }))
    }

    /// Looks up the pool count and builds the unstake.
    pub async fn unstake(
        &self,
        farm: &FarmSet,
        minter: &StdAddr,
        nft: StdAddr,
        query_id: u64,
        gas: GasOverrides,
    ) -> Result<TxParams, DexError> {
        let pool_count = ok!(self.farm_pool_count(farm, minter).await);
        farm.build(&FarmOperation::Unstake(UnstakeParams {
            nft,
            pool_count,
            query_id,
            gas,
        }))
    }

    fn minter<'a>(&'a self, asset: &'a Asset) -> &'a StdAddr {
        match asset {
            Asset::Native => &self.proxy_ton,
            Asset::Jetton(minter) => minter,
        }
    }

    // The native offer is sent to the router pTON wallet directly.
    async fn offer_wallet(&self, user: &StdAddr, asset: &Asset) -> Result<StdAddr, DexError> {
        let owner = if asset.is_native() { &self.router } else { user };
        self.transport
            .resolve_counterpart_wallet(owner, self.minter(asset))
            .await
    }

    async fn router_wallet(&self, asset: &Asset) -> Result<StdAddr, DexError> {
        self.transport
            .resolve_counterpart_wallet(&self.router, self.minter(asset))
            .await
    }
}
