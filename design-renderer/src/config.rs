//! Render configuration.

use design_core::defaults::palette;
use design_core::{Color, FontFamily, FontWeight};

/// Knobs of the render engine.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Fill used for image placeholders and failed image fetches.
    pub placeholder_color: Color,
    /// Alpha applied to shadow colors that carry none.
    pub shadow_alpha: f32,
    /// Gradient angle in degrees when a gradient has none.
    pub default_gradient_angle: f64,
    /// Fonts loaded best-effort before traversal.
    pub preload_fonts: Vec<(FontFamily, FontWeight)>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            placeholder_color: Color::parse(palette::BORDER).unwrap_or_else(Color::fallback),
            shadow_alpha: 0.25,
            default_gradient_angle: 180.0,
            preload_fonts: vec![
                (FontFamily::Inter, FontWeight::Regular),
                (FontFamily::Inter, FontWeight::Medium),
                (FontFamily::Inter, FontWeight::Semibold),
                (FontFamily::Inter, FontWeight::Bold),
            ],
        }
    }
}
