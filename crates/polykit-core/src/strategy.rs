//! Corner handling policy for polygon offsetting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the offset engine joins two offset edges at a corner.
///
/// "Acute" variants only apply their special join when the corner, seen from
/// the side being offset, is sharper than 90 degrees; every other corner is
/// mitred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CornerStrategy {
    /// Mitre every corner (subject to the mitre limit)
    AllowAcuteCorners,
    /// Chamfer acute corners, mitre the rest
    ChamferAcuteCorners,
    /// Round acute corners, mitre the rest
    RoundAcuteCorners,
    /// Chamfer every corner
    ChamferAllCorners,
    /// Round every corner
    #[default]
    RoundAllCorners,
}

impl CornerStrategy {
    /// All strategies, in declaration order.
    pub const ALL: [CornerStrategy; 5] = [
        Self::AllowAcuteCorners,
        Self::ChamferAcuteCorners,
        Self::RoundAcuteCorners,
        Self::ChamferAllCorners,
        Self::RoundAllCorners,
    ];

    /// Whether the strategy only treats acute corners specially.
    pub fn acute_only(self) -> bool {
        matches!(
            self,
            Self::AllowAcuteCorners | Self::ChamferAcuteCorners | Self::RoundAcuteCorners
        )
    }
}

impl fmt::Display for CornerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllowAcuteCorners => write!(f, "allow_acute_corners"),
            Self::ChamferAcuteCorners => write!(f, "chamfer_acute_corners"),
            Self::RoundAcuteCorners => write!(f, "round_acute_corners"),
            Self::ChamferAllCorners => write!(f, "chamfer_all_corners"),
            Self::RoundAllCorners => write!(f, "round_all_corners"),
        }
    }
}

impl FromStr for CornerStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "allow_acute_corners" | "mitre" | "miter" => Ok(Self::AllowAcuteCorners),
            "chamfer_acute_corners" => Ok(Self::ChamferAcuteCorners),
            "round_acute_corners" => Ok(Self::RoundAcuteCorners),
            "chamfer_all_corners" | "chamfer" => Ok(Self::ChamferAllCorners),
            "round_all_corners" | "round" => Ok(Self::RoundAllCorners),
            _ => Err(format!("Unknown corner strategy: {}", s)),
        }
    }
}
