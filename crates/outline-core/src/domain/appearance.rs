//! Outline and spotlight appearance.
//!
//! Appearance values come from the external settings collaborator as plain
//! numbers.  They are not interpreted beyond clamping: every constructor here
//! forces its inputs into a sane range so a corrupt settings file can never
//! produce a zero-width stroke or a spotlight larger than the screen.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Allowed outline stroke thickness in points.
pub const OUTLINE_THICKNESS_RANGE: RangeInclusive<f64> = 1.0..=12.0;
/// Allowed spotlight hole radius in points.
pub const SPOTLIGHT_RADIUS_RANGE: RangeInclusive<f64> = 60.0..=280.0;

pub const DEFAULT_OUTLINE_THICKNESS: f64 = 4.0;
pub const DEFAULT_SPOTLIGHT_RADIUS: f64 = 120.0;

/// Alpha applied to the outline stroke.
const STROKE_ALPHA: f64 = 0.95;
/// Alpha and blur radius of the glow drawn around the stroke.
const GLOW_ALPHA: f64 = 0.55;
pub const GLOW_RADIUS: f64 = 10.0;
/// Opacity of the dimmed area around the spotlight hole.
const DIM_ALPHA: f64 = 0.34;

fn clamp_to(value: f64, range: &RangeInclusive<f64>) -> f64 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}

/// An RGBA colour with unit-range components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Rgba {
    /// Creates a colour, clamping every component to `0.0..=1.0`.
    pub fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        let unit = 0.0..=1.0;
        Self {
            red: clamp_to(red, &unit),
            green: clamp_to(green, &unit),
            blue: clamp_to(blue, &unit),
            alpha: clamp_to(alpha, &unit),
        }
    }

    /// The system accent blue used when no colour is configured.
    pub fn accent() -> Self {
        Self::new(0.0, 0.478, 1.0, 1.0)
    }

    pub fn black() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        Self::new(self.red, self.green, self.blue, alpha)
    }

    /// Packs the colour into 8-bit channels `(r, g, b, a)`.
    pub fn to_rgba8(self) -> (u8, u8, u8, u8) {
        let q = |c: f64| (c * 255.0).round() as u8;
        (q(self.red), q(self.green), q(self.blue), q(self.alpha))
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::accent()
    }
}

/// How the active display's outline is stroked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineStyle {
    pub color: Rgba,
    thickness: f64,
}

impl OutlineStyle {
    /// Creates a style with `thickness` clamped to [`OUTLINE_THICKNESS_RANGE`].
    pub fn new(color: Rgba, thickness: f64) -> Self {
        Self {
            color,
            thickness: clamp_to(thickness, &OUTLINE_THICKNESS_RANGE),
        }
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn stroke_color(&self) -> Rgba {
        self.color.with_alpha(STROKE_ALPHA)
    }

    pub fn glow_color(&self) -> Rgba {
        self.color.with_alpha(GLOW_ALPHA)
    }
}

impl Default for OutlineStyle {
    fn default() -> Self {
        Self::new(Rgba::accent(), DEFAULT_OUTLINE_THICKNESS)
    }
}

/// How the spotlight vignette is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotlightStyle {
    radius: f64,
    pub dim_color: Rgba,
}

impl SpotlightStyle {
    /// Creates a style with `radius` clamped to [`SPOTLIGHT_RADIUS_RANGE`].
    pub fn new(radius: f64) -> Self {
        Self {
            radius: clamp_to(radius, &SPOTLIGHT_RADIUS_RANGE),
            dim_color: Rgba::black().with_alpha(DIM_ALPHA),
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Default for SpotlightStyle {
    fn default() -> Self {
        Self::new(DEFAULT_SPOTLIGHT_RADIUS)
    }
}

/// The complete appearance consumed by the overlay engine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Appearance {
    pub outline: OutlineStyle,
    pub spotlight: SpotlightStyle,
}

impl Appearance {
    /// Builds an appearance from raw settings values, clamping each one.
    pub fn new(color: Rgba, thickness: f64, spotlight_radius: f64) -> Self {
        Self {
            outline: OutlineStyle::new(color, thickness),
            spotlight: SpotlightStyle::new(spotlight_radius),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thickness_is_clamped_into_range() {
        assert_eq!(OutlineStyle::new(Rgba::accent(), 0.0).thickness(), 1.0);
        assert_eq!(OutlineStyle::new(Rgba::accent(), 40.0).thickness(), 12.0);
        assert_eq!(OutlineStyle::new(Rgba::accent(), 6.5).thickness(), 6.5);
    }

    #[test]
    fn test_nan_thickness_falls_back_to_minimum() {
        assert_eq!(OutlineStyle::new(Rgba::accent(), f64::NAN).thickness(), 1.0);
    }

    #[test]
    fn test_radius_is_clamped_into_range() {
        assert_eq!(SpotlightStyle::new(10.0).radius(), 60.0);
        assert_eq!(SpotlightStyle::new(1000.0).radius(), 280.0);
        assert_eq!(SpotlightStyle::new(150.0).radius(), 150.0);
    }

    #[test]
    fn test_colour_components_are_clamped() {
        let c = Rgba::new(-1.0, 2.0, 0.5, 1.5);
        assert_eq!(c, Rgba::new(0.0, 1.0, 0.5, 1.0));
    }

    #[test]
    fn test_defaults_match_documented_values() {
        let a = Appearance::default();
        assert_eq!(a.outline.thickness(), DEFAULT_OUTLINE_THICKNESS);
        assert_eq!(a.spotlight.radius(), DEFAULT_SPOTLIGHT_RADIUS);
        assert_eq!(a.spotlight.dim_color.alpha, 0.34);
    }

    #[test]
    fn test_stroke_and_glow_keep_hue_and_change_alpha() {
        let style = OutlineStyle::new(Rgba::new(1.0, 0.0, 0.0, 1.0), 4.0);
        assert_eq!(style.stroke_color(), Rgba::new(1.0, 0.0, 0.0, 0.95));
        assert_eq!(style.glow_color(), Rgba::new(1.0, 0.0, 0.0, 0.55));
    }

    #[test]
    fn test_to_rgba8_rounds_channels() {
        assert_eq!(Rgba::new(1.0, 0.5, 0.0, 1.0).to_rgba8(), (255, 128, 0, 255));
    }
}
