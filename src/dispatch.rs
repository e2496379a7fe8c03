//! Version and pool type dispatch.
//!
//! Every supported contract version is described by a static builder set.
//! Resolution is an exact match on `(major, minor)` and then on the
//! optional pool sub-type. Unknown combinations are always rejected.

use std::str::FromStr;

use crate::error::DexError;
use crate::ops::farm::{FarmSet, FARM_V1, FARM_V2, FARM_V3};
use crate::ops::pton::{PtonSet, PTON_V1, PTON_V2_1};
use crate::ops::router::{
    DexBuilderSet, ROUTER_V1, ROUTER_V1_CPI, ROUTER_V2_1, ROUTER_V2_1_CPI, ROUTER_V2_1_STABLE,
    ROUTER_V2_1_WCPI, ROUTER_V2_2, ROUTER_V2_2_CPI, ROUTER_V2_2_STABLE, ROUTER_V2_2_WCPI,
    ROUTER_V2_2_WSTABLE,
};

/// Pool invariant of the router.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DexType {
    /// `x * y = k`.
    ConstantProduct,
    /// Curve-like stable swap.
    #[cfg_attr(feature = "serde", serde(rename = "stableswap"))]
    StableSwap,
    /// Weighted constant product.
    WeightedConstProduct,
    /// Weighted stable swap.
    #[cfg_attr(feature = "serde", serde(rename = "weighted_stableswap"))]
    WeightedStableSwap,
}

impl DexType {
    /// All pool types.
    pub const ALL: [Self; 4] = [
        Self::ConstantProduct,
        Self::StableSwap,
        Self::WeightedConstProduct,
        Self::WeightedStableSwap,
    ];

    /// Returns the name which is used by contracts.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ConstantProduct => "constant_product",
            Self::StableSwap => "stableswap",
            Self::WeightedConstProduct => "weighted_const_product",
            Self::WeightedStableSwap => "weighted_stableswap",
        }
    }
}

impl std::fmt::Display for DexType {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DexType {
    type Err = DexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::ALL.into_iter().find(|ty| ty.as_str() == s) {
            Some(ty) => Ok(ty),
            None => Err(DexError::malformed(format!("unknown dex type `{s}`"))),
        }
    }
}

/// Contract version with an optional pool type.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VersionTag {
    /// Major version.
    pub major: u16,
    /// Minor version.
    pub minor: u16,
    /// Pool type.
    #[cfg_attr(feature = "serde", serde(default))]
    pub sub_type: Option<DexType>,
}

impl VersionTag {
    /// Creates a version without a pool type.
    #[inline]
    pub const fn new(major: u16, minor: u16) -> Self {
        Self {
            major,
            minor,
            sub_type: None,
        }
    }

    /// Returns the same version with the specified pool type.
    #[inline]
    pub const fn with_sub_type(mut self, sub_type: DexType) -> Self {
        self.sub_type = Some(sub_type);
        self
    }

    /// Returns `(major, minor)` pair.
    #[inline]
    pub const fn pair(&self) -> (u16, u16) {
        (self.major, self.minor)
    }
}

impl std::fmt::Display for VersionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)?;
        if let Some(sub_type) = &self.sub_type {
            write!(f, "/{sub_type}")?;
        }
        Ok(())
    }
}

static ROUTERS: [&DexBuilderSet; 11] = [
    &ROUTER_V1,
    &ROUTER_V1_CPI,
    &ROUTER_V2_1,
    &ROUTER_V2_1_CPI,
    &ROUTER_V2_1_STABLE,
    &ROUTER_V2_1_WCPI,
    &ROUTER_V2_2,
    &ROUTER_V2_2_CPI,
    &ROUTER_V2_2_STABLE,
    &ROUTER_V2_2_WCPI,
    &ROUTER_V2_2_WSTABLE,
];

static PTONS: [&PtonSet; 2] = [&PTON_V1, &PTON_V2_1];

static FARMS: [&FarmSet; 3] = [&FARM_V1, &FARM_V2, &FARM_V3];

/// Returns the router builder set for the specified version.
pub fn resolve_operation_set(tag: VersionTag) -> Result<&'static DexBuilderSet, DexError> {
    match ROUTERS.iter().copied().find(|set| set.version == tag) {
        Some(set) => {
            tracing::debug!(version = %tag, "resolved router builder set");
            Ok(set)
        }
        None => {
            let known_pair = ROUTERS.iter().any(|set| set.version.pair() == tag.pair());
            tracing::warn!(version = %tag, known_pair, "unsupported router version");
            Err(DexError::UnsupportedVersion { version: tag })
        }
    }
}

/// Returns the pTON builder set for the specified version.
pub fn resolve_pton(major: u16, minor: u16) -> Result<&'static PtonSet, DexError> {
    let tag = VersionTag::new(major, minor);
    match PTONS.iter().copied().find(|set| set.version == tag) {
        Some(set) => {
            tracing::debug!(version = %tag, "resolved pTON builder set");
            Ok(set)
        }
        None => {
            tracing::warn!(version = %tag, "unsupported pTON version");
            Err(DexError::UnsupportedVersion { version: tag })
        }
    }
}

/// Returns the farm builder set for the specified version.
pub fn resolve_farm(major: u16, minor: u16) -> Result<&'static FarmSet, DexError> {
    let tag = VersionTag::new(major, minor);
    match FARMS.iter().copied().find(|set| set.version == tag) {
        Some(set) => {
            tracing::debug!(version = %tag, "resolved farm builder set");
            Ok(set)
        }
        None => {
            tracing::warn!(version = %tag, "unsupported farm version");
            Err(DexError::UnsupportedVersion { version: tag })
        }
    }
}

/// Checks that the pTON version matches the one expected by the router.
pub fn check_pton_compat(router: &DexBuilderSet, pton: &PtonSet) -> Result<(), DexError> {
    let expected = VersionTag::new(router.expected_pton.0, router.expected_pton.1);
    if pton.version == expected {
        Ok(())
    } else {
        tracing::warn!(
            router = %router.version,
            %expected,
            actual = %pton.version,
            "pTON version mismatch"
        );
        Err(DexError::VersionMismatch {
            expected,
            actual: pton.version,
        })
    }
}

/// Enumerates all supported router versions.
pub fn declared_versions() -> impl Iterator<Item = VersionTag> {
    ROUTERS.iter().map(|set| set.version)
}

/// Enumerates all supported pTON versions.
pub fn declared_pton_versions() -> impl Iterator<Item = VersionTag> {
    PTONS.iter().map(|set| set.version)
}

/// Enumerates all supported farm versions.
pub fn declared_farm_versions() -> impl Iterator<Item = VersionTag> {
    FARMS.iter().map(|set| set.version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_declared_version_resolves() -> anyhow::Result<()> {
        let mut count = 0;
        for tag in declared_versions() {
            let set = resolve_operation_set(tag)?;
            assert_eq!(set.version, tag);
            resolve_pton(set.expected_pton.0, set.expected_pton.1)?;
            count += 1;
        }
        assert_eq!(count, ROUTERS.len());

        for tag in declared_pton_versions() {
            assert_eq!(resolve_pton(tag.major, tag.minor)?.version, tag);
        }
        for tag in declared_farm_versions() {
            assert_eq!(resolve_farm(tag.major, tag.minor)?.version, tag);
        }
        Ok(())
    }

    #[test]
    fn versions_are_unique() {
        let mut versions = declared_versions().collect::<Vec<_>>();
        let total = versions.len();
        versions.sort();
        versions.dedup();
        assert_eq!(versions.len(), total);
    }

    #[test]
    fn unknown_versions_fail_closed() {
        for tag in [
            VersionTag::new(3, 0),
            VersionTag::new(2, 0),
            VersionTag::new(1, 1),
            VersionTag::new(1, 0).with_sub_type(DexType::StableSwap),
            VersionTag::new(2, 1).with_sub_type(DexType::WeightedStableSwap),
        ] {
            assert!(
                matches!(
                    resolve_operation_set(tag),
                    Err(DexError::UnsupportedVersion { version }) if version == tag
                ),
                "{tag}"
            );
        }

        assert!(resolve_pton(2, 0).is_err());
        assert!(resolve_farm(4, 0).is_err());
    }

    #[test]
    fn pool_types_per_version() -> anyhow::Result<()> {
        for ty in DexType::ALL {
            let v22 = VersionTag::new(2, 2).with_sub_type(ty);
            assert_eq!(resolve_operation_set(v22)?.version.sub_type, Some(ty));
        }

        let v1 = VersionTag::new(1, 0).with_sub_type(DexType::ConstantProduct);
        assert!(resolve_operation_set(v1).is_ok());
        Ok(())
    }

    #[test]
    fn pton_compatibility() -> anyhow::Result<()> {
        let v1 = resolve_operation_set(VersionTag::new(1, 0))?;
        let v2 = resolve_operation_set(VersionTag::new(2, 1))?;
        let pton_v1 = resolve_pton(1, 0)?;
        let pton_v2 = resolve_pton(2, 1)?;

        check_pton_compat(v1, pton_v1)?;
        check_pton_compat(v2, pton_v2)?;
        assert!(matches!(
            check_pton_compat(v2, pton_v1),
            Err(DexError::VersionMismatch { expected, actual })
                if expected == VersionTag::new(2, 1) && actual == VersionTag::new(1, 0)
        ));
        Ok(())
    }

    #[test]
    fn version_display() {
        assert_eq!(VersionTag::new(1, 0).to_string(), "v1.0");
        assert_eq!(
            VersionTag::new(2, 2)
                .with_sub_type(DexType::WeightedStableSwap)
                .to_string(),
            "v2.2/weighted_stableswap"
        );
        assert_eq!(
            "stableswap".parse::<DexType>().ok(),
            Some(DexType::StableSwap)
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn version_serde() -> anyhow::Result<()> {
        let tag: VersionTag =
            serde_json::from_str(r#"{"major":2,"minor":2,"sub_type":"weighted_const_product"}"#)?;
        assert_eq!(
            tag,
            VersionTag::new(2, 2).with_sub_type(DexType::WeightedConstProduct)
        );

        let tag: VersionTag = serde_json::from_str(r#"{"major":1,"minor":0}"#)?;
        assert_eq!(tag, VersionTag::new(1, 0));
        Ok(())
    }
}
