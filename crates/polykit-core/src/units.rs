//! Unit conversion utilities
//!
//! The engine works in integer internal units (IU) of one nanometre.
//! These helpers convert user-facing lengths to and from that space.

use crate::constants::IU_PER_MM;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length unit used when reading or presenting coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Internal units (nanometres)
    Nanometer,
    /// Micrometres
    Micrometer,
    /// Millimetres
    #[default]
    Millimeter,
    /// Inches
    Inch,
}

impl LengthUnit {
    /// Internal units per one of this unit.
    pub fn iu_per_unit(self) -> f64 {
        match self {
            Self::Nanometer => 1.0,
            Self::Micrometer => 1_000.0,
            Self::Millimeter => IU_PER_MM,
            Self::Inch => IU_PER_MM * 25.4,
        }
    }

    /// Convert a value in this unit to internal units, rounding to nearest.
    pub fn to_iu(self, value: f64) -> i32 {
        round_to_iu(value * self.iu_per_unit())
    }

    /// Convert internal units to this unit.
    pub fn from_iu(self, iu: i64) -> f64 {
        iu as f64 / self.iu_per_unit()
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nanometer => write!(f, "nm"),
            Self::Micrometer => write!(f, "um"),
            Self::Millimeter => write!(f, "mm"),
            Self::Inch => write!(f, "in"),
        }
    }
}

impl FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nm" | "nanometer" | "iu" => Ok(Self::Nanometer),
            "um" | "micrometer" | "micron" => Ok(Self::Micrometer),
            "mm" | "millimeter" => Ok(Self::Millimeter),
            "in" | "inch" | "\"" => Ok(Self::Inch),
            _ => Err(format!("Unknown length unit: {}", s)),
        }
    }
}

/// Millimetres to internal units.
pub fn mm_to_iu(mm: f64) -> i32 {
    LengthUnit::Millimeter.to_iu(mm)
}

/// Round a floating point coordinate into the i32 internal-unit range.
pub fn round_to_iu(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_conversion() {
        assert_eq!(mm_to_iu(1.0), 1_000_000);
        assert_eq!(mm_to_iu(0.005), 5_000);
        assert!((LengthUnit::Millimeter.from_iu(2_500_000) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_inch_conversion() {
        assert_eq!(LengthUnit::Inch.to_iu(1.0), 25_400_000);
    }

    #[test]
    fn test_round_to_iu_saturates() {
        assert_eq!(round_to_iu(1e20), i32::MAX);
        assert_eq!(round_to_iu(-1e20), i32::MIN);
        assert_eq!(round_to_iu(f64::NAN), 0);
        assert_eq!(round_to_iu(2.5), 3);
    }

    #[test]
    fn test_unit_parse() {
        assert_eq!("MM".parse::<LengthUnit>().unwrap(), LengthUnit::Millimeter);
        assert_eq!("iu".parse::<LengthUnit>().unwrap(), LengthUnit::Nanometer);
        assert!("furlong".parse::<LengthUnit>().is_err());
    }
}
