//! Proxy TON (pTON) messages.

use crate::cell::Cell;
use crate::dispatch::VersionTag;
use crate::error::DexError;
use crate::gas::{GasOverrides, PtonGas, PTON_V1_GAS, PTON_V2_GAS};
use crate::models::StdAddr;
use crate::num::Tokens;
use crate::schema::{self, Fields, Schema};

use super::jetton::JettonTransfer;
use super::{attach, decode_by_opcode, finish, TxParams};

/// Message layouts of the pTON.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PtonFamily {
    /// pTON v1, native coins are sent as a jetton transfer.
    V1,
    /// pTON v2.x.
    V2,
}

/// Builders and decoders of a single pTON version.
#[derive(Debug)]
pub struct PtonSet {
    /// pTON version.
    pub version: VersionTag,
    /// Message layouts.
    pub family: PtonFamily,
    /// Default gas amounts.
    pub gas: &'static PtonGas,
}

/// pTON v1.0.
pub static PTON_V1: PtonSet = PtonSet {
    version: VersionTag::new(1, 0),
    family: PtonFamily::V1,
    gas: &PTON_V1_GAS,
};

/// pTON v2.1.
pub static PTON_V2_1: PtonSet = PtonSet {
    version: VersionTag::new(2, 1),
    family: PtonFamily::V2,
    gas: &PTON_V2_GAS,
};

static V1_LAYOUTS: [&Schema; 2] = [&schema::JETTON_TRANSFER, &schema::DEPLOY_WALLET_V1];
static V2_LAYOUTS: [&Schema; 2] = [&schema::TON_TRANSFER_V2, &schema::DEPLOY_WALLET_V2];

/// Native coins transfer through the proxy wallet.
#[derive(Debug, Clone)]
pub struct TonTransferParams {
    /// Proxy wallet of the destination.
    pub proxy_wallet: StdAddr,
    /// Arbitrary request id.
    pub query_id: u64,
    /// Amount of native coins.
    pub ton_amount: Tokens,
    /// Owner of the proxy wallet which receives the notification.
    pub destination: StdAddr,
    /// Where to return the coins on failure (v2 only).
    pub refund: StdAddr,
    /// Value forwarded with the notification.
    pub forward_ton_amount: Tokens,
    /// Payload of the notification.
    pub forward_payload: Option<Cell>,
}

/// Proxy wallet deployment parameters.
#[derive(Debug, Clone)]
pub struct DeployWalletParams {
    /// pTON minter address.
    pub proxy_ton: StdAddr,
    /// Owner of the new wallet.
    pub owner: StdAddr,
    /// Receiver of the excess gas (v2 only). The owner by default.
    pub excesses: Option<StdAddr>,
    /// Arbitrary request id.
    pub query_id: u64,
    /// Gas overrides.
    pub gas: GasOverrides,
}

/// pTON operation.
#[derive(Debug, Clone)]
pub enum PtonOperation {
    /// Native coins transfer.
    TonTransfer(TonTransferParams),
    /// Proxy wallet deployment.
    DeployWallet(DeployWalletParams),
}

impl PtonSet {
    /// Builds the message of the operation.
    pub fn build(&self, operation: &PtonOperation) -> Result<TxParams, DexError> {
        match operation {
            PtonOperation::TonTransfer(params) => {
                let body = ok!(self.ton_transfer_body(params));
                let value = ok!(attach(params.ton_amount, params.forward_ton_amount));
                Ok(finish(
                    "ton_transfer",
                    self.version,
                    params.proxy_wallet,
                    value,
                    body,
                ))
            }
            PtonOperation::DeployWallet(params) => self.build_deploy_wallet(params),
        }
    }

    /// Encodes the native coins transfer body.
    pub fn ton_transfer_body(&self, params: &TonTransferParams) -> Result<Cell, DexError> {
        match self.family {
            PtonFamily::V1 => JettonTransfer {
                query_id: params.query_id,
                amount: params.ton_amount,
                destination: params.destination,
                response_destination: None,
                custom_payload: None,
                forward_ton_amount: params.forward_ton_amount,
                forward_payload: params.forward_payload.clone(),
            }
            .encode(),
            PtonFamily::V2 => {
                let fields = Fields::new()
                    .with("query_id", params.query_id)
                    .with("ton_amount", params.ton_amount)
                    .with("refund", params.refund)
                    .with("forward_payload", params.forward_payload.clone());
                schema::TON_TRANSFER_V2.encode(&fields)
            }
        }
    }

    /// Returns all message layouts of the pTON family.
    pub fn layouts(&self) -> &'static [&'static Schema] {
        match self.family {
            PtonFamily::V1 => &V1_LAYOUTS,
            PtonFamily::V2 => &V2_LAYOUTS,
        }
    }

    /// Finds the layout by the payload opcode and decodes the payload.
    pub fn decode_payload(&self, cell: &Cell) -> Result<(&'static Schema, Fields), DexError> {
        decode_by_opcode(self.layouts(), cell, "pTON", self.version)
    }

    fn build_deploy_wallet(&self, params: &DeployWalletParams) -> Result<TxParams, DexError> {
        let gas = self.gas.deploy_wallet.apply(&params.gas);

        let fields = Fields::new()
            .with("query_id", params.query_id)
            .with("owner", params.owner);
        let body = ok!(match self.family {
            PtonFamily::V1 => schema::DEPLOY_WALLET_V1.encode(&fields),
            PtonFamily::V2 => schema::DEPLOY_WALLET_V2
                .encode(&fields.with("excesses", params.excesses.unwrap_or(params.owner))),
        });
        Ok(finish(
            "deploy_wallet",
            self.version,
            params.proxy_ton,
            gas.gas_amount,
            body,
        ))
    }
}
