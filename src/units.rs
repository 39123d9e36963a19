//! Length and colour units used by DrawingML.
//!
//! Positions and sizes in a presentation are stored in English Metric Units
//! (EMU): 914400 per inch, 12700 per point.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// EMUs per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// EMUs per typographic point.
pub const EMU_PER_POINT: i64 = 12_700;

/// A length in English Metric Units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Emu(pub i64);

impl Emu {
    /// Convert inches to EMU, truncating toward zero.
    pub fn from_inches(inches: f64) -> Self {
        Emu((inches * EMU_PER_INCH as f64) as i64)
    }

    /// Convert points to EMU, truncating toward zero.
    pub fn from_points(points: f64) -> Self {
        Emu((points * EMU_PER_POINT as f64) as i64)
    }

    /// Raw EMU value.
    pub fn get(self) -> i64 {
        self.0
    }

    /// Value in inches.
    pub fn inches(self) -> f64 {
        self.0 as f64 / EMU_PER_INCH as f64
    }
}

impl std::ops::Add for Emu {
    type Output = Emu;

    fn add(self, rhs: Emu) -> Emu {
        Emu(self.0 + rhs.0)
    }
}

impl fmt::Display for Emu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shorthand for [`Emu::from_inches`].
pub fn inches(value: f64) -> Emu {
    Emu::from_inches(value)
}

/// A 24-bit sRGB colour, written as `RRGGBB` in DrawingML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const WHITE: RgbColor = RgbColor::new(255, 255, 255);
    pub const BLACK: RgbColor = RgbColor::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Upper-case hex form used in `<a:srgbClr val="..."/>`.
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for RgbColor {
    type Err = Error;

    /// Parse `RRGGBB`, with or without a leading `#`.
    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidData(format!("invalid RGB colour: {:?}", s)));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| Error::InvalidData(format!("invalid RGB colour {:?}: {}", s, e)))
        };
        Ok(RgbColor::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for RgbColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("#{}", self.to_hex()))
    }
}

impl<'de> Deserialize<'de> for RgbColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inch_conversion() {
        assert_eq!(inches(1.0), Emu(914_400));
        assert_eq!(inches(0.5), Emu(457_200));
        // 13.33in widescreen canvas
        assert_eq!(inches(13.33), Emu(12_188_952));
        assert_eq!(inches(7.5), Emu(6_858_000));
    }

    #[test]
    fn test_point_conversion() {
        assert_eq!(Emu::from_points(1.0), Emu(12_700));
        assert_eq!(Emu::from_points(72.0), inches(1.0));
    }

    #[test]
    fn test_color_hex() {
        let navy = RgbColor::new(0, 51, 102);
        assert_eq!(navy.to_hex(), "003366");
        assert_eq!(navy.to_string(), "003366");
        assert_eq!("#003366".parse::<RgbColor>().unwrap(), navy);
        assert_eq!("dddddd".parse::<RgbColor>().unwrap(), RgbColor::new(221, 221, 221));
    }

    #[test]
    fn test_color_rejects_garbage() {
        assert!("#0033".parse::<RgbColor>().is_err());
        assert!("zz3366".parse::<RgbColor>().is_err());
    }

    #[test]
    fn test_color_serde() {
        let json = serde_json::to_string(&RgbColor::WHITE).unwrap();
        assert_eq!(json, "\"#FFFFFF\"");
        let back: RgbColor = serde_json::from_str("\"#003366\"").unwrap();
        assert_eq!(back, RgbColor::new(0, 51, 102));
    }
}
