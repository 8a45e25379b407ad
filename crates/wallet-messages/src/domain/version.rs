//! # Wallet Versions
//!
//! Every deployed wallet contract revision, and the wire layout (generation)
//! each one uses. The version is always supplied by the caller; it is never
//! inferred from message bytes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::MessageError;

/// A wallet contract revision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WalletVersion {
    V1R1,
    V1R2,
    V1R3,
    V2R1,
    V2R2,
    V3R1,
    V3R2,
    V4R1,
    V4R2,
    V5Beta,
    V5R1,
    HighloadV1R1,
    HighloadV1R2,
    HighloadV2,
    HighloadV2R1,
    HighloadV2R2,
}

/// External message layout shared by a group of wallet versions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Generation {
    /// Signed envelope, `subwallet + valid_until + seqno`, up to 4 refs
    V3,
    /// As [`Generation::V3`] with an extra 8-bit op selector
    V4,
    /// Signed envelope, `subwallet + query_id`, dictionary of up to 254
    HighloadV2,
    /// Tagged signed request with a trailing signature and an action chain
    V5,
}

impl WalletVersion {
    /// All known versions.
    pub const ALL: [WalletVersion; 16] = [
        Self::V1R1,
        Self::V1R2,
        Self::V1R3,
        Self::V2R1,
        Self::V2R2,
        Self::V3R1,
        Self::V3R2,
        Self::V4R1,
        Self::V4R2,
        Self::V5Beta,
        Self::V5R1,
        Self::HighloadV1R1,
        Self::HighloadV1R2,
        Self::HighloadV2,
        Self::HighloadV2R1,
        Self::HighloadV2R2,
    ];

    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::V1R1 => "v1r1",
            Self::V1R2 => "v1r2",
            Self::V1R3 => "v1r3",
            Self::V2R1 => "v2r1",
            Self::V2R2 => "v2r2",
            Self::V3R1 => "v3r1",
            Self::V3R2 => "v3r2",
            Self::V4R1 => "v4r1",
            Self::V4R2 => "v4r2",
            Self::V5Beta => "v5beta",
            Self::V5R1 => "v5r1",
            Self::HighloadV1R1 => "highload_v1r1",
            Self::HighloadV1R2 => "highload_v1r2",
            Self::HighloadV2 => "highload_v2",
            Self::HighloadV2R1 => "highload_v2r1",
            Self::HighloadV2R2 => "highload_v2r2",
        }
    }

    /// The layout this version's external messages use.
    pub fn generation(&self) -> Result<Generation, MessageError> {
        match self {
            Self::V3R1 | Self::V3R2 => Ok(Generation::V3),
            Self::V4R1 | Self::V4R2 => Ok(Generation::V4),
            Self::HighloadV2R2 => Ok(Generation::HighloadV2),
            Self::V5R1 => Ok(Generation::V5),
            other => Err(MessageError::UnsupportedGeneration(other.name().to_string())),
        }
    }
}

impl fmt::Display for WalletVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WalletVersion {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|version| version.name() == wanted)
            .ok_or_else(|| MessageError::UnsupportedGeneration(s.to_string()))
    }
}

impl TryFrom<String> for WalletVersion {
    type Error = MessageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WalletVersion> for String {
    fn from(version: WalletVersion) -> Self {
        version.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for version in WalletVersion::ALL {
            assert_eq!(version.name().parse::<WalletVersion>().unwrap(), version);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "V4R2".parse::<WalletVersion>().unwrap(),
            WalletVersion::V4R2
        );
        assert_eq!(
            " Highload_V2R2 ".parse::<WalletVersion>().unwrap(),
            WalletVersion::HighloadV2R2
        );
    }

    #[test]
    fn test_unknown_name_is_unsupported() {
        assert_eq!(
            "v9r9".parse::<WalletVersion>(),
            Err(MessageError::UnsupportedGeneration("v9r9".to_string()))
        );
    }

    #[test]
    fn test_generation_mapping() {
        assert_eq!(WalletVersion::V3R1.generation(), Ok(Generation::V3));
        assert_eq!(WalletVersion::V3R2.generation(), Ok(Generation::V3));
        assert_eq!(WalletVersion::V4R1.generation(), Ok(Generation::V4));
        assert_eq!(WalletVersion::V4R2.generation(), Ok(Generation::V4));
        assert_eq!(
            WalletVersion::HighloadV2R2.generation(),
            Ok(Generation::HighloadV2)
        );
        assert_eq!(WalletVersion::V5R1.generation(), Ok(Generation::V5));
    }

    #[test]
    fn test_legacy_versions_unsupported() {
        for version in [
            WalletVersion::V1R1,
            WalletVersion::V2R2,
            WalletVersion::V5Beta,
            WalletVersion::HighloadV1R2,
            WalletVersion::HighloadV2,
        ] {
            assert!(matches!(
                version.generation(),
                Err(MessageError::UnsupportedGeneration(_))
            ));
        }
    }

    #[test]
    fn test_serde_uses_canonical_name() {
        let json = serde_json::to_string(&WalletVersion::HighloadV2R2).unwrap();
        assert_eq!(json, "\"highload_v2r2\"");

        let parsed: WalletVersion = serde_json::from_str("\"v5r1\"").unwrap();
        assert_eq!(parsed, WalletVersion::V5R1);

        assert!(serde_json::from_str::<WalletVersion>("\"v0\"").is_err());
    }
}
