//! Integer types used in contract messages.

use num_bigint::{BigInt, BigUint, Sign};

use crate::cell::*;
use crate::error::{Error, ParseIntError};
use crate::util::unlikely;

/// Variable-length 120-bit integer. Used for native currencies and jettons.
///
/// Stored as 4 bits of `len` (`0..=15`), followed by `len` bytes.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Tokens(u128);

impl Tokens {
    /// The additive identity for this integer type, i.e. `0`.
    pub const ZERO: Self = Tokens(0);

    /// The largest value that can be represented by this integer type.
    pub const MAX: Self = Tokens((1u128 << (Self::MAX_BYTES as u32 * 8)) - 1);

    const MAX_BYTES: u8 = 15;

    /// The number of data bits that the length occupies.
    pub const LEN_BITS: u16 = 4;

    /// The maximum number of data bits that this struct occupies.
    pub const MAX_BITS: u16 = Self::LEN_BITS + Self::MAX_BYTES as u16 * 8;

    /// Creates a new integer value from a primitive integer.
    #[inline]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Converts integer into an underlying primitive integer.
    #[inline]
    pub const fn into_inner(self) -> u128 {
        self.0
    }

    /// Returns `true` if an underlying primitive integer is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if an underlying primitive integer fits into the repr.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0 <= Self::MAX.0
    }

    const fn byte_len(&self) -> u8 {
        (16 - self.0.leading_zeros() / 8) as u8
    }

    /// Returns number of data bits that this struct occupies.
    /// Returns `None` if an underlying primitive integer is too large.
    pub const fn bit_len(&self) -> Option<u16> {
        let bytes = self.byte_len();
        if unlikely(bytes > Self::MAX_BYTES) {
            None
        } else {
            Some(Self::LEN_BITS + bytes as u16 * 8)
        }
    }

    /// Checked integer addition. Computes `self + rhs`, returning `None` if overflow occurred.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(value) if value <= Self::MAX.0 => Some(Tokens(value)),
            _ => None,
        }
    }

    /// Checked integer subtraction. Computes `self - rhs`, returning `None` if overflow occurred.
    #[inline]
    #[must_use]
    pub const fn checked_sub(self, rhs: Self) -> Option<Self> {
        match self.0.checked_sub(rhs.0) {
            Some(value) => Some(Tokens(value)),
            None => None,
        }
    }

    /// Checked integer multiplication. Computes `self * rhs`, returning `None` if overflow occurred.
    #[inline]
    #[must_use]
    pub const fn checked_mul(self, rhs: Self) -> Option<Self> {
        match self.0.checked_mul(rhs.0) {
            Some(value) if value <= Self::MAX.0 => Some(Tokens(value)),
            _ => None,
        }
    }

    /// Tries to add an other value to the current one.
    pub fn try_add_assign(&mut self, other: Self) -> Result<(), Error> {
        match self.checked_add(other) {
            Some(new_value) => {
                *self = new_value;
                Ok(())
            }
            None => Err(Error::IntOverflow),
        }
    }
}

impl From<Tokens> for u128 {
    #[inline]
    fn from(value: Tokens) -> Self {
        value.0
    }
}

impl From<u64> for Tokens {
    #[inline]
    fn from(value: u64) -> Self {
        Self(value as u128)
    }
}

impl TryFrom<u128> for Tokens {
    type Error = Error;

    #[inline]
    fn try_from(inner: u128) -> Result<Self, Self::Error> {
        let result = Self::new(inner);
        if result.is_valid() {
            Ok(result)
        } else {
            Err(Error::IntOverflow)
        }
    }
}

impl TryFrom<&BigUint> for Tokens {
    type Error = Error;

    fn try_from(value: &BigUint) -> Result<Self, Self::Error> {
        if value.bits() > Self::MAX_BYTES as u64 * 8 {
            return Err(Error::IntOverflow);
        }
        let mut bytes = [0u8; 16];
        let digits = value.to_bytes_be();
        bytes[16 - digits.len()..].copy_from_slice(&digits);
        Ok(Self(u128::from_be_bytes(bytes)))
    }
}

/// Negative values are rejected with [`Error::IntOverflow`].
impl TryFrom<&BigInt> for Tokens {
    type Error = Error;

    fn try_from(value: &BigInt) -> Result<Self, Self::Error> {
        match value.sign() {
            Sign::Minus => Err(Error::IntOverflow),
            _ => Self::try_from(value.magnitude()),
        }
    }
}

impl From<Tokens> for BigInt {
    #[inline]
    fn from(value: Tokens) -> Self {
        BigInt::from(value.0)
    }
}

impl std::str::FromStr for Tokens {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<u128>() {
            Ok(inner) => match Self::try_from(inner) {
                Ok(value) => Ok(value),
                Err(_) => Err(ParseIntError::Overflow),
            },
            Err(e) => Err(ParseIntError::InvalidString(e)),
        }
    }
}

impl PartialEq<u128> for Tokens {
    #[inline]
    fn eq(&self, other: &u128) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for Tokens {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::ops::Add for Tokens {
    type Output = Self;

    #[inline]
    fn add(mut self, rhs: Self) -> Self::Output {
        self.0 += rhs.0;
        self
    }
}

impl std::ops::Add<u128> for Tokens {
    type Output = Self;

    #[inline]
    fn add(mut self, rhs: u128) -> Self::Output {
        self.0 += rhs;
        self
    }
}

impl std::ops::AddAssign for Tokens {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::Mul<u128> for Tokens {
    type Output = Self;

    #[inline]
    fn mul(mut self, rhs: u128) -> Self::Output {
        self.0 *= rhs;
        self
    }
}

impl std::iter::Sum for Tokens {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, item| acc + item)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Tokens {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.collect_str(&self.0)
        } else {
            self.0.serialize(serializer)
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Tokens {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{Error, Unexpected, Visitor};

        struct Expected;

        impl serde::de::Expected for Expected {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("Tokens")
            }
        }

        struct TokensVisitor;

        impl Visitor<'_> for TokensVisitor {
            type Value = u128;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a string or an integer with a number")
            }

            fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(v as u128)
            }
        }

        let res = Self::new(ok!(if deserializer.is_human_readable() {
            deserializer.deserialize_any(TokensVisitor)
        } else {
            u128::deserialize(deserializer)
        }));

        if res.is_valid() {
            Ok(res)
        } else {
            Err(D::Error::invalid_type(
                Unexpected::Other("big number"),
                &Expected,
            ))
        }
    }
}

impl Store for Tokens {
    fn store_into(&self, builder: &mut CellBuilder) -> Result<(), Error> {
        let bytes = self.byte_len();
        let bits = bytes as u16 * 8;

        if unlikely(bytes > Self::MAX_BYTES) {
            return Err(Error::IntOverflow);
        }
        if unlikely(!builder.has_capacity(Self::LEN_BITS + bits, 0)) {
            return Err(Error::CellOverflow);
        }

        ok!(builder.store_small_uint(bytes, Self::LEN_BITS));
        let be = self.0.to_be_bytes();
        builder.store_raw(&be[16 - bytes as usize..], bits)
    }
}

impl<'a> Load<'a> for Tokens {
    fn load_from(slice: &mut CellSlice<'a>) -> Result<Self, Error> {
        let bytes = ok!(slice.load_small_uint(Self::LEN_BITS)) as usize;
        let mut buffer = [0u8; 16];
        ok!(slice.load_raw(&mut buffer[16 - bytes..], bytes as u16 * 8));
        Ok(Self(u128::from_be_bytes(buffer)))
    }
}
