//! Gas amounts attached to contract messages.

use crate::num::Tokens;

/// Gas attached to a single operation, in nanotons.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GasSpec {
    /// Value attached to the outgoing message.
    pub gas_amount: Tokens,
    /// Value forwarded with the transfer notification.
    pub forward_gas_amount: Tokens,
    /// Additional value for each unit (e.g. farm pool) after the first one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub per_unit: Tokens,
}

impl GasSpec {
    /// Creates a spec without a forward amount.
    pub const fn new(gas_amount: u128) -> Self {
        Self {
            gas_amount: Tokens::new(gas_amount),
            forward_gas_amount: Tokens::ZERO,
            per_unit: Tokens::ZERO,
        }
    }

    /// Creates a spec with a forward amount.
    pub const fn with_forward(gas_amount: u128, forward_gas_amount: u128) -> Self {
        Self {
            gas_amount: Tokens::new(gas_amount),
            forward_gas_amount: Tokens::new(forward_gas_amount),
            per_unit: Tokens::ZERO,
        }
    }

    /// Creates a spec which only forwards value (native offers).
    pub const fn forward_only(forward_gas_amount: u128) -> Self {
        Self::with_forward(0, forward_gas_amount)
    }

    /// Sets an additional amount per unit after the first one.
    pub const fn per_unit(mut self, per_unit: u128) -> Self {
        self.per_unit = Tokens::new(per_unit);
        self
    }

    /// Computes the value for the specified number of units.
    ///
    /// `0` units is treated like a single unit.
    pub fn compute_value(&self, units: u32) -> Tokens {
        let extra = units.saturating_sub(1) as u128;
        Tokens::new(
            self.gas_amount
                .into_inner()
                .saturating_add(self.per_unit.into_inner().saturating_mul(extra)),
        )
    }

    /// Returns a copy with overridden amounts.
    pub fn apply(mut self, overrides: &GasOverrides) -> Self {
        if let Some(gas_amount) = overrides.gas_amount {
            self.gas_amount = gas_amount;
        }
        if let Some(forward_gas_amount) = overrides.forward_gas_amount {
            self.forward_gas_amount = forward_gas_amount;
        }
        if let Some(per_unit) = overrides.per_unit {
            self.per_unit = per_unit;
        }
        self
    }
}

/// Caller supplied amounts which replace defaults.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GasOverrides {
    /// Replaces [`GasSpec::gas_amount`].
    pub gas_amount: Option<Tokens>,
    /// Replaces [`GasSpec::forward_gas_amount`].
    pub forward_gas_amount: Option<Tokens>,
    /// Replaces the per unit amount of [`GasSpec`].
    pub per_unit: Option<Tokens>,
}

impl GasOverrides {
    /// No overrides.
    pub const NONE: Self = Self {
        gas_amount: None,
        forward_gas_amount: None,
        per_unit: None,
    };

    /// Returns `true` if no amount is overridden.
    pub const fn is_empty(&self) -> bool {
        self.gas_amount.is_none() && self.forward_gas_amount.is_none() && self.per_unit.is_none()
    }
}

/// Default gas of the router family.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RouterGas {
    /// Jetton to jetton swap.
    pub swap_jetton_to_jetton: GasSpec,
    /// Jetton to TON swap.
    pub swap_jetton_to_ton: GasSpec,
    /// TON to jetton swap.
    pub swap_ton_to_jetton: GasSpec,
    /// Two-sided liquidity provision with a jetton.
    pub provide_lp_jetton: GasSpec,
    /// Two-sided liquidity provision with TON.
    pub provide_lp_ton: GasSpec,
    /// Single-sided liquidity provision with a jetton.
    pub single_side_provide_lp_jetton: Option<GasSpec>,
    /// Single-sided liquidity provision with TON.
    pub single_side_provide_lp_ton: Option<GasSpec>,
    /// LP tokens burn.
    pub lp_burn: GasSpec,
    /// Pool fees collection.
    pub collect_fees: Option<GasSpec>,
    /// LP account refund.
    pub refund: GasSpec,
    /// LP account direct liquidity addition.
    pub direct_add_lp: GasSpec,
    /// LP account gas reset.
    pub reset_gas: GasSpec,
    /// Vault fee withdrawal.
    pub withdraw_fee: Option<GasSpec>,
}

/// Router v1 gas.
pub const ROUTER_V1_GAS: RouterGas = RouterGas {
    swap_jetton_to_jetton: GasSpec::with_forward(220_000_000, 175_000_000),
    swap_jetton_to_ton: GasSpec::with_forward(170_000_000, 125_000_000),
    swap_ton_to_jetton: GasSpec::forward_only(185_000_000),
    provide_lp_jetton: GasSpec::with_forward(300_000_000, 240_000_000),
    provide_lp_ton: GasSpec::forward_only(260_000_000),
    single_side_provide_lp_jetton: None,
    single_side_provide_lp_ton: None,
    lp_burn: GasSpec::new(500_000_000),
    collect_fees: Some(GasSpec::new(1_100_000_000)),
    refund: GasSpec::new(300_000_000),
    direct_add_lp: GasSpec::new(300_000_000),
    reset_gas: GasSpec::new(300_000_000),
    withdraw_fee: None,
};

/// Router v2 gas.
pub const ROUTER_V2_GAS: RouterGas = RouterGas {
    swap_jetton_to_jetton: GasSpec::with_forward(300_000_000, 240_000_000),
    swap_jetton_to_ton: GasSpec::with_forward(300_000_000, 240_000_000),
    swap_ton_to_jetton: GasSpec::forward_only(300_000_000),
    provide_lp_jetton: GasSpec::with_forward(300_000_000, 235_000_000),
    provide_lp_ton: GasSpec::forward_only(300_000_000),
    single_side_provide_lp_jetton: Some(GasSpec::with_forward(1_000_000_000, 800_000_000)),
    single_side_provide_lp_ton: Some(GasSpec::forward_only(800_000_000)),
    lp_burn: GasSpec::new(800_000_000),
    collect_fees: None,
    refund: GasSpec::new(800_000_000),
    direct_add_lp: GasSpec::new(300_000_000),
    reset_gas: GasSpec::new(20_000_000),
    withdraw_fee: Some(GasSpec::new(300_000_000)),
};

/// Default gas of the pTON family.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PtonGas {
    /// Proxy wallet deployment.
    pub deploy_wallet: GasSpec,
}

/// pTON v1 gas.
pub const PTON_V1_GAS: PtonGas = PtonGas {
    deploy_wallet: GasSpec::new(1_050_000_000),
};

/// pTON v2 gas.
pub const PTON_V2_GAS: PtonGas = PtonGas {
    deploy_wallet: GasSpec::new(100_000_000),
};

/// Default gas of the farm family.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FarmGas {
    /// Stake transfer.
    pub stake: GasSpec,
    /// Rewards claim.
    pub claim_rewards: GasSpec,
    /// Unstake.
    pub unstake: GasSpec,
    /// NFT destruction.
    pub destroy: GasSpec,
}

/// Farm v1 and v2 gas.
pub const FARM_V1_GAS: FarmGas = FarmGas {
    stake: GasSpec::with_forward(300_000_000, 250_000_000),
    claim_rewards: GasSpec::new(300_000_000),
    unstake: GasSpec::new(400_000_000),
    destroy: GasSpec::new(50_000_000),
};

/// Farm v3 gas.
pub const FARM_V3_GAS: FarmGas = FarmGas {
    stake: GasSpec::with_forward(300_000_000, 250_000_000),
    claim_rewards: GasSpec::new(300_000_000).per_unit(130_000_000),
    unstake: GasSpec::new(400_000_000).per_unit(130_000_000),
    destroy: GasSpec::new(50_000_000),
};
