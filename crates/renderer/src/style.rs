//! Colors and palette configuration for risk rendering.

use risk_common::{RiskError, RiskResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional, case-insensitive).
    pub fn from_hex(hex: &str) -> RiskResult<Self> {
        hex_to_rgb(hex)
            .map(|(r, g, b)| Rgb::new(r, g, b))
            .ok_or_else(|| RiskError::InvalidColor(hex.to_string()))
    }

    /// Lower-case `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Mix with white: `c + (255 - c) * factor`, truncated.
    pub fn lighten(&self, factor: f64) -> Rgb {
        let mix = |c: u8| (c as f64 + (255.0 - c as f64) * factor) as u8;
        Rgb::new(mix(self.r), mix(self.g), mix(self.b))
    }

    /// Mix with black: `c * (1 - factor)`, truncated.
    pub fn darken(&self, factor: f64) -> Rgb {
        let mix = |c: u8| (c as f64 * (1.0 - factor)) as u8;
        Rgb::new(mix(self.r), mix(self.g), mix(self.b))
    }

    pub fn to_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

/// Lighten a hex color, returning lower-case hex.
pub fn lighten(hex: &str, factor: f64) -> RiskResult<String> {
    Ok(Rgb::from_hex(hex)?.lighten(factor).to_hex())
}

/// Darken a hex color, returning lower-case hex.
pub fn darken(hex: &str, factor: f64) -> RiskResult<String> {
    Ok(Rgb::from_hex(hex)?.darken(factor).to_hex())
}

/// Lighten/darken factors used to derive a gradient from its base color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientFactors {
    pub lighten: f64,
    pub darken: f64,
}

impl GradientFactors {
    /// Factors used for the composite risk map.
    pub const RISK: GradientFactors = GradientFactors {
        lighten: 0.8,
        darken: 0.3,
    };

    /// Factors used for single input layers.
    pub const LAYER: GradientFactors = GradientFactors {
        lighten: 0.7,
        darken: 0.6,
    };

    pub fn validate(&self) -> RiskResult<()> {
        for (param, value) in [("lighten", self.lighten), ("darken", self.darken)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(RiskError::InvalidParameter {
                    param: param.to_string(),
                    message: format!("factor {} is outside [0, 1]", value),
                });
            }
        }
        Ok(())
    }
}

impl Default for GradientFactors {
    fn default() -> Self {
        GradientFactors::RISK
    }
}

/// Colors used when rendering a risk grid and its legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskPalette {
    /// Base of the light-base-dark gradient for levels 1..10
    pub base_color: String,
    pub color_name: String,
    /// Fixed color for cells equal to 0
    pub zero_color: String,
    /// Fixed color for no-data cells
    pub no_data_color: String,
    pub factors: GradientFactors,
}

impl Default for RiskPalette {
    fn default() -> Self {
        Self {
            base_color: "#E43700".to_string(),
            color_name: "Rocket Red".to_string(),
            zero_color: "#eafe07".to_string(),
            no_data_color: "#0042A6".to_string(),
            factors: GradientFactors::RISK,
        }
    }
}

impl RiskPalette {
    pub fn zero(&self) -> RiskResult<Rgb> {
        Rgb::from_hex(&self.zero_color)
    }

    pub fn no_data(&self) -> RiskResult<Rgb> {
        Rgb::from_hex(&self.no_data_color)
    }

    /// Check every color parses and the factors are in range.
    pub fn validate(&self) -> RiskResult<()> {
        Rgb::from_hex(&self.base_color)?;
        self.zero()?;
        self.no_data()?;
        self.factors.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#FF0000"), Some((255, 0, 0)));
        assert_eq!(hex_to_rgb("#00FF00"), Some((0, 255, 0)));
        assert_eq!(hex_to_rgb("#0000FF"), Some((0, 0, 255)));
        assert_eq!(hex_to_rgb("FF0000"), Some((255, 0, 0)));
        assert_eq!(hex_to_rgb("#GGGGGG"), None);
        assert_eq!(hex_to_rgb("#FFF"), None);
    }

    #[test]
    fn test_to_hex_is_lower_case() {
        assert_eq!(Rgb::from_hex("#E43700").unwrap().to_hex(), "#e43700");
    }

    #[test]
    fn test_lighten_truncates() {
        // 228 + 27 * 0.8 = 249.6, 55 + 200 * 0.8 = 215.0, 0 + 255 * 0.8 = 204.0
        assert_eq!(lighten("#E43700", 0.8).unwrap(), "#f9d7cc");
    }

    #[test]
    fn test_darken_truncates() {
        // 228 * 0.7 = 159.6, 55 * 0.7 = 38.5
        assert_eq!(darken("#E43700", 0.3).unwrap(), "#9f2600");
    }

    #[test]
    fn test_identity_and_extreme_factors() {
        for hex in ["#e43700", "#0042a6", "#666666", "#ff6b35"] {
            assert_eq!(lighten(hex, 0.0).unwrap(), hex);
            assert_eq!(darken(hex, 0.0).unwrap(), hex);
            assert_eq!(lighten(hex, 1.0).unwrap(), "#ffffff");
            assert_eq!(darken(hex, 1.0).unwrap(), "#000000");
        }
    }

    #[test]
    fn test_invalid_color() {
        assert!(matches!(lighten("red", 0.5), Err(RiskError::InvalidColor(_))));
    }

    #[test]
    fn test_factors_validation() {
        assert!(GradientFactors::LAYER.validate().is_ok());
        let bad = GradientFactors {
            lighten: 1.5,
            darken: 0.2,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_default_palette_is_valid() {
        assert!(RiskPalette::default().validate().is_ok());
    }
}
