//! Three-stop light → base → dark color gradients.

use risk_common::RiskResult;

use crate::style::{GradientFactors, Rgb};

/// Number of discrete legend levels sampled from the gradient (1..=10).
pub const GRADIENT_LEVELS: u8 = 10;

/// A gradient derived from a single base color.
///
/// `color_at(0)` is the light stop, `color_at(0.5)` the base and
/// `color_at(1)` the dark stop; colors in between are linear in RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    pub light: Rgb,
    pub base: Rgb,
    pub dark: Rgb,
}

impl Gradient {
    /// Derive a gradient from `base` using the given factors.
    pub fn from_base(base: Rgb, factors: GradientFactors) -> Self {
        Self {
            light: base.lighten(factors.lighten),
            base,
            dark: base.darken(factors.darken),
        }
    }

    /// Color at `t`, clamped to `[0, 1]`.
    pub fn color_at(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if t <= 0.5 {
            interpolate_color(self.light, self.base, t / 0.5)
        } else {
            interpolate_color(self.base, self.dark, (t - 0.5) / 0.5)
        }
    }

    /// Color for `value` on the continuous domain `[min, max]`.
    ///
    /// A degenerate domain maps everything to the midpoint.
    pub fn color_for_value(&self, value: f64, min: f64, max: f64) -> Rgb {
        let range = max - min;
        if range == 0.0 {
            return self.color_at(0.5);
        }
        self.color_at((value - min) / range)
    }

    /// Color of a discrete level in `1..=10`, sampled at `(level - 1) / 9`.
    pub fn level_color(&self, level: u8) -> Rgb {
        let level = level.clamp(1, GRADIENT_LEVELS);
        self.color_at((level - 1) as f64 / (GRADIENT_LEVELS - 1) as f64)
    }

    /// Colors for levels 1..=10 in order.
    pub fn level_colors(&self) -> Vec<(u8, Rgb)> {
        (1..=GRADIENT_LEVELS)
            .map(|level| (level, self.level_color(level)))
            .collect()
    }
}

/// Build a gradient from a hex base color.
pub fn make_gradient(base_hex: &str, factors: GradientFactors) -> RiskResult<Gradient> {
    let base = Rgb::from_hex(base_hex)?;
    factors.validate()?;
    Ok(Gradient::from_base(base, factors))
}

/// Linear color interpolation, truncating each channel.
///
/// A channel equal in both colors stays exactly that value for every `t`.
pub fn interpolate_color(color1: Rgb, color2: Rgb, t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t) as u8;

    Rgb::new(
        lerp(color1.r, color2.r),
        lerp(color1.g, color2.g),
        lerp(color1.b, color2.b),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_endpoints() {
        let a = Rgb::new(10, 20, 30);
        let b = Rgb::new(200, 100, 0);
        assert_eq!(interpolate_color(a, b, 0.0), a);
        assert_eq!(interpolate_color(a, b, 1.0), b);
        assert_eq!(interpolate_color(a, b, 0.5), Rgb::new(105, 60, 15));
    }

    #[test]
    fn test_color_at_clamps() {
        let g = make_gradient("#E43700", GradientFactors::RISK).unwrap();
        assert_eq!(g.color_at(-3.0), g.light);
        assert_eq!(g.color_at(7.0), g.dark);
        assert_eq!(g.color_at(f64::NAN), g.light);
    }

    #[test]
    fn test_degenerate_domain_is_midpoint() {
        let g = make_gradient("#666666", GradientFactors::LAYER).unwrap();
        assert_eq!(g.color_for_value(3.0, 3.0, 3.0), g.base);
    }
}
