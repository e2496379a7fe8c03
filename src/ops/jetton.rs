//! Jetton messages (TEP-74).

use crate::cell::Cell;
use crate::error::DexError;
use crate::models::StdAddr;
use crate::num::Tokens;
use crate::schema::{Fields, FieldValue, JETTON_BURN, JETTON_TRANSFER};

/// Jetton transfer message body.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct JettonTransfer {
    /// Arbitrary request id.
    pub query_id: u64,
    /// Amount of jettons to transfer.
    pub amount: Tokens,
    /// Owner of the receiving wallet.
    pub destination: StdAddr,
    /// Where to send the excess TON.
    pub response_destination: Option<StdAddr>,
    /// Optional payload for the sender wallet.
    pub custom_payload: Option<Cell>,
    /// Value forwarded to the destination with the notification.
    pub forward_ton_amount: Tokens,
    /// Payload of the transfer notification.
    pub forward_payload: Option<Cell>,
}

impl JettonTransfer {
    /// Encodes the message body.
    pub fn encode(&self) -> Result<Cell, DexError> {
        JETTON_TRANSFER.encode(&self.to_fields())
    }

    /// Decodes the message body.
    pub fn decode(cell: &Cell) -> Result<Self, DexError> {
        let fields = ok!(JETTON_TRANSFER.decode(cell));
        Ok(Self {
            query_id: ok!(fields.get_uint("query_id")),
            amount: ok!(fields.get_coins("amount")),
            destination: ok!(fields.get_address("destination")),
            response_destination: ok!(fields.get_address_or_none("response_destination")),
            custom_payload: ok!(fields.get_maybe_ref("custom_payload")),
            forward_ton_amount: ok!(fields.get_coins("forward_ton_amount")),
            forward_payload: ok!(fields.get_maybe_ref("forward_payload")),
        })
    }

    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("query_id", self.query_id)
            .with("amount", self.amount)
            .with("destination", self.destination)
            .with(
                "response_destination",
                FieldValue::AddressOrNone(self.response_destination),
            )
            .with("custom_payload", self.custom_payload.clone())
            .with("forward_ton_amount", self.forward_ton_amount)
            .with("forward_payload", self.forward_payload.clone())
    }
}

/// Jetton burn message body.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct JettonBurn {
    /// Arbitrary request id.
    pub query_id: u64,
    /// Amount of jettons to burn.
    pub amount: Tokens,
    /// Where to send the excess TON.
    pub response_destination: StdAddr,
    /// Optional payload for the wallet.
    pub custom_payload: Option<Cell>,
}

impl JettonBurn {
    /// Encodes the message body.
    pub fn encode(&self) -> Result<Cell, DexError> {
        let fields = Fields::new()
            .with("query_id", self.query_id)
            .with("amount", self.amount)
            .with("response_destination", self.response_destination)
            .with("custom_payload", self.custom_payload.clone());
        JETTON_BURN.encode(&fields)
    }

    /// Decodes the message body.
    pub fn decode(cell: &Cell) -> Result<Self, DexError> {
        let fields = ok!(JETTON_BURN.decode(cell));
        Ok(Self {
            query_id: ok!(fields.get_uint("query_id")),
            amount: ok!(fields.get_coins("amount")),
            response_destination: ok!(fields.get_address("response_destination")),
            custom_payload: ok!(fields.get_maybe_ref("custom_payload")),
        })
    }
}
