//! Common error types.

use crate::dispatch::VersionTag;

/// Error type for cell related errors.
#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// There were not enough bits or refs in the cell slice.
    #[error("cell underflow")]
    CellUnderflow,
    /// There were not enough bits or refs capacity in the cell builder.
    #[error("cell overflow")]
    CellOverflow,
    /// Cell contains invalid descriptor or data.
    #[error("invalid cell")]
    InvalidCell,
    /// Data does not satisfy some constraints.
    #[error("invalid data")]
    InvalidData,
    /// Unknown TLB tag.
    #[error("invalid tag")]
    InvalidTag,
    /// Underlying integer type does not fit into the target type.
    #[error("underlying integer is too large to fit in target type")]
    IntOverflow,
}

/// Error type for building and parsing contract messages.
#[derive(Debug, thiserror::Error)]
pub enum DexError {
    /// Field value requires more bits than its declared width.
    #[error("value of `{field}` does not fit into {bits} bits")]
    FieldOverflow {
        /// Field name.
        field: &'static str,
        /// Declared width in bits.
        bits: u16,
    },
    /// Composed structure exceeds the cell bounds.
    #[error("cell overflow while storing `{field}`")]
    CellOverflow {
        /// The field which did not fit.
        field: &'static str,
    },
    /// Referral value is out of the allowed basis-point range.
    #[error("referral value {0} is out of range [0, 100]")]
    InvalidReferralValue(u16),
    /// There is no builder set for the requested version.
    #[error("unsupported version {version}")]
    UnsupportedVersion {
        /// Requested version with an optional sub-type.
        version: VersionTag,
    },
    /// The resolved builder set does not support the operation.
    #[error("operation `{operation}` is not supported by {version}")]
    UnsupportedOperation {
        /// Operation name.
        operation: &'static str,
        /// Version of the builder set.
        version: VersionTag,
    },
    /// Two contracts which must share a version disagree.
    #[error("version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Version required by the router.
        expected: VersionTag,
        /// Version declared by the helper.
        actual: VersionTag,
    },
    /// Getter response does not match the record schema.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    /// Cell contains more data than the schema declares.
    #[error("trailing data: {bits} bits and {refs} refs left")]
    TrailingData {
        /// Remaining bits.
        bits: u16,
        /// Remaining refs.
        refs: u8,
    },
    /// Cell ended before the schema was fully read.
    #[error("unexpected end of cell while reading `{field}`")]
    UnexpectedEnd {
        /// The field which could not be read.
        field: &'static str,
    },
    /// Both sides of a swap or a liquidity provision are the same asset.
    #[error("offer and ask assets are the same")]
    DuplicateAsset,
    /// Coins can't be negative.
    #[error("negative coins value in `{0}`")]
    NegativeCoins(&'static str),
    /// Required field was not provided.
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    /// Field value kind differs from the schema.
    #[error("field `{0}` has unexpected type")]
    FieldTypeMismatch(&'static str),
    /// Message starts with an unexpected opcode.
    #[error("invalid opcode: expected {expected:#010x}, found {found:#010x}")]
    InvalidOpcode {
        /// Opcode from the schema.
        expected: u32,
        /// Opcode from the cell.
        found: u32,
    },
    /// Low-level cell error.
    #[error(transparent)]
    Cell(#[from] Error),
    /// Error reported by a collaborator.
    #[cfg(feature = "client")]
    #[error("transport error")]
    Transport(#[source] anyhow::Error),
}

impl DexError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }
}

/// Error type for integer parsing related errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseIntError {
    /// Error while parsing underlying type.
    #[error("cannot parse underlying integer")]
    InvalidString(#[source] std::num::ParseIntError),
    /// Underlying integer type does not fit into the target type.
    #[error("underlying integer is too large to fit in target type")]
    Overflow,
}

/// Error type for hash bytes parsing related errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseHashBytesError {
    /// Failed to parse hex encoded bytes.
    #[error("invalid hex string")]
    InvalidHex(#[from] hex::FromHexError),
    /// Error for an unexpected string length.
    #[error("expected string of 64 bytes")]
    UnexpectedStringLength,
}

/// Error type for address parsing related errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseAddrError {
    /// Tried to parse an empty string.
    #[error("cannot parse address from an empty string")]
    Empty,
    /// Workchain id is too large.
    #[error("workchain id is too large to fit in target type")]
    InvalidWorkchain,
    /// Invalid account id hex.
    #[error("cannot parse account id")]
    InvalidAccountId,
    /// Too many address parts.
    #[error("unexpected address part")]
    UnexpectedPart,
    /// Unexpected or invalid address format.
    #[error("invalid address format")]
    BadFormat,
    /// User-friendly address checksum mismatch.
    #[error("invalid address checksum")]
    InvalidChecksum,
}
