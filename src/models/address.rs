use std::str::FromStr;

use crate::cell::*;
use crate::error::{Error, ParseAddrError};
use crate::util::unlikely;

/// Standard internal address.
///
/// ```text
/// addr_std$10 anycast:(Maybe Anycast) workchain_id:int8 address:bits256 = MsgAddressInt;
/// ```
///
/// Only addresses without anycast are supported.
#[derive(Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct StdAddr {
    /// Workchain id (one-byte range).
    pub workchain: i8,
    /// Account id.
    pub address: HashBytes,
}

impl std::fmt::Debug for StdAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdAddr")
            .field("workchain", &self.workchain)
            .field("address", &self.address)
            .finish()
    }
}

impl StdAddr {
    /// The number of data bits that address without anycast occupies.
    ///
    /// - 2 bits id (`0b10`)
    /// - 1 bit Maybe None
    /// - 8 bits workchain
    /// - 256 bits address
    pub const BITS: u16 = 2 + 1 + 8 + 256;

    /// The number of data bits of `addr_none$00`.
    pub const NONE_BITS: u16 = 2;

    /// Masterchain workchain id.
    pub const MASTERCHAIN: i8 = -1;

    /// Basechain workchain id.
    pub const BASECHAIN: i8 = 0;

    /// Constructs a new standard address.
    #[inline]
    pub const fn new(workchain: i8, address: HashBytes) -> Self {
        Self { workchain, address }
    }

    /// Stores `addr_none$00` when the address is `None`.
    pub fn store_or_none(addr: Option<&Self>, builder: &mut CellBuilder) -> Result<(), Error> {
        match addr {
            Some(addr) => addr.store_into(builder),
            None => builder.store_zeros(Self::NONE_BITS),
        }
    }

    /// Loads either a standard address or `addr_none$00`.
    pub fn load_or_none(slice: &mut CellSlice<'_>) -> Result<Option<Self>, Error> {
        if ok!(slice.get_uint(0, 2)) == 0 {
            ok!(slice.skip_first(Self::NONE_BITS, 0));
            Ok(None)
        } else {
            match Self::load_from(slice) {
                Ok(addr) => Ok(Some(addr)),
                Err(e) => Err(e),
            }
        }
    }

    /// Returns a user-friendly base64url representation of the address.
    #[cfg(feature = "base64")]
    pub fn display_base64(&self, bounceable: bool, testnet: bool) -> String {
        use base64::Engine;

        let buffer = self.friendly_bytes(bounceable, testnet);
        base64::engine::general_purpose::URL_SAFE.encode(buffer)
    }

    #[cfg(any(feature = "base64", test))]
    fn friendly_bytes(&self, bounceable: bool, testnet: bool) -> [u8; 36] {
        let mut tag = if bounceable {
            FRIENDLY_BOUNCEABLE
        } else {
            FRIENDLY_NON_BOUNCEABLE
        };
        if testnet {
            tag |= FRIENDLY_TESTNET;
        }

        let mut buffer = [0u8; 36];
        buffer[0] = tag;
        buffer[1] = self.workchain as u8;
        buffer[2..34].copy_from_slice(self.address.as_slice());
        let crc = crate::util::crc_16(&buffer[..34]);
        buffer[34..].copy_from_slice(&crc.to_be_bytes());
        buffer
    }

    /// Parses a user-friendly address and returns it with its
    /// `(bounceable, testnet)` flags.
    #[cfg(feature = "base64")]
    pub fn from_str_base64(s: &str) -> Result<(Self, bool, bool), ParseAddrError> {
        use base64::Engine;

        if s.len() != 48 {
            return Err(ParseAddrError::BadFormat);
        }

        let decoded = if s.contains(['-', '_']) {
            base64::engine::general_purpose::URL_SAFE.decode(s)
        } else {
            base64::engine::general_purpose::STANDARD.decode(s)
        };
        let buffer: [u8; 36] = match decoded {
            Ok(bytes) => match bytes.try_into() {
                Ok(buffer) => buffer,
                Err(_) => return Err(ParseAddrError::BadFormat),
            },
            Err(_) => return Err(ParseAddrError::BadFormat),
        };

        let crc = crate::util::crc_16(&buffer[..34]);
        if crc.to_be_bytes() != buffer[34..] {
            return Err(ParseAddrError::InvalidChecksum);
        }

        let testnet = buffer[0] & FRIENDLY_TESTNET != 0;
        let bounceable = match buffer[0] & !FRIENDLY_TESTNET {
            FRIENDLY_BOUNCEABLE => true,
            FRIENDLY_NON_BOUNCEABLE => false,
            _ => return Err(ParseAddrError::BadFormat),
        };

        let addr = Self::new(buffer[1] as i8, HashBytes::from_slice(&buffer[2..34]));
        Ok((addr, bounceable, testnet))
    }
}

const FRIENDLY_BOUNCEABLE: u8 = 0x11;
const FRIENDLY_NON_BOUNCEABLE: u8 = 0x51;
const FRIENDLY_TESTNET: u8 = 0x80;

impl std::fmt::Display for StdAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}:{}", self.workchain, self.address))
    }
}

impl FromStr for StdAddr {
    type Err = ParseAddrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseAddrError::Empty);
        }

        #[cfg(feature = "base64")]
        if !s.contains(':') {
            return match Self::from_str_base64(s) {
                Ok((addr, _, _)) => Ok(addr),
                Err(e) => Err(e),
            };
        }

        let mut result = Self::default();

        let mut parts = s.split(':');
        match parts.next() {
            Some(part) => match part.parse() {
                Ok(workchain) => result.workchain = workchain,
                Err(_) => return Err(ParseAddrError::InvalidWorkchain),
            },
            None => return Err(ParseAddrError::Empty),
        }

        match parts.next() {
            Some(part) => match hex::decode_to_slice(part, &mut result.address.0) {
                Ok(()) => {}
                Err(_) => return Err(ParseAddrError::InvalidAccountId),
            },
            None => return Err(ParseAddrError::InvalidAccountId),
        }

        if parts.next().is_none() {
            Ok(result)
        } else {
            Err(ParseAddrError::UnexpectedPart)
        }
    }
}

impl Store for StdAddr {
    fn store_into(&self, builder: &mut CellBuilder) -> Result<(), Error> {
        if unlikely(!builder.has_capacity(Self::BITS, 0)) {
            return Err(Error::CellOverflow);
        }
        ok!(builder.store_small_uint(0b100, 3));
        ok!(builder.store_u8(self.workchain as u8));
        builder.store_u256(&self.address)
    }
}

impl<'a> Load<'a> for StdAddr {
    fn load_from(slice: &mut CellSlice<'a>) -> Result<Self, Error> {
        // `addr_std$10` without anycast
        if ok!(slice.load_small_uint(2)) != 0b10 || ok!(slice.load_bit()) {
            return Err(Error::InvalidTag);
        }

        Ok(Self {
            workchain: ok!(slice.load_u8()) as i8,
            address: ok!(slice.load_u256()),
        })
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for StdAddr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            (self.workchain, &self.address).serialize(serializer)
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for StdAddr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        if deserializer.is_human_readable() {
            let s = ok!(<std::borrow::Cow<'de, str>>::deserialize(deserializer));
            Self::from_str(&s).map_err(Error::custom)
        } else {
            let (workchain, address) = ok!(<(i8, HashBytes)>::deserialize(deserializer));
            Ok(Self::new(workchain, address))
        }
    }
}
