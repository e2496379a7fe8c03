use std::str::FromStr;

use crate::error::ParseAddrError;
use crate::models::StdAddr;

/// Asset traded by the DEX.
///
/// The native currency is routed through the pTON proxy, every other
/// asset is identified by its jetton minter address.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Asset {
    /// Native currency.
    Native,
    /// Jetton with the specified minter.
    Jetton(StdAddr),
}

impl Asset {
    /// Returns `true` for the native currency.
    #[inline]
    pub const fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }

    /// Returns the jetton minter address.
    #[inline]
    pub const fn as_jetton(&self) -> Option<&StdAddr> {
        match self {
            Self::Native => None,
            Self::Jetton(minter) => Some(minter),
        }
    }
}

impl From<StdAddr> for Asset {
    #[inline]
    fn from(value: StdAddr) -> Self {
        Self::Jetton(value)
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native => f.write_str("native"),
            Self::Jetton(minter) => std::fmt::Display::fmt(minter, f),
        }
    }
}

impl FromStr for Asset {
    type Err = ParseAddrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("native") || s.eq_ignore_ascii_case("ton") {
            Ok(Self::Native)
        } else {
            match StdAddr::from_str(s) {
                Ok(minter) => Ok(Self::Jetton(minter)),
                Err(e) => Err(e),
            }
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Asset {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Asset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let s = ok!(<std::borrow::Cow<'de, str>>::deserialize(deserializer));
        Self::from_str(&s).map_err(Error::custom)
    }
}
