//! Default design values shared by the sanitizer, the renderer and the prompt.

use crate::document::{Canvas, FontFamily, FontWeight, Typography};

/// Metadata name injected when the generator omits one.
pub const DEFAULT_DESIGN_NAME: &str = "Generated Design";

/// Family substituted for missing or unavailable fonts.
pub const DEFAULT_FONT_FAMILY: FontFamily = FontFamily::Inter;

/// Weight substituted for missing typography weights.
pub const DEFAULT_FONT_WEIGHT: FontWeight = FontWeight::Regular;

/// Size substituted for missing typography sizes.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Suggested line height multiplier.
pub const DEFAULT_LINE_HEIGHT: f64 = 1.5;

/// Default typography preset.
#[must_use]
pub fn typography() -> Typography {
    Typography {
        family: DEFAULT_FONT_FAMILY,
        weight: DEFAULT_FONT_WEIGHT,
        size: DEFAULT_FONT_SIZE,
        line_height: Some(DEFAULT_LINE_HEIGHT),
    }
}

/// Spacing scale, smallest first.
pub const SPACING_SCALE: [(&str, f64); 7] = [
    ("xs", 4.0),
    ("sm", 8.0),
    ("md", 16.0),
    ("lg", 24.0),
    ("xl", 32.0),
    ("2xl", 48.0),
    ("3xl", 64.0),
];

/// Named palette colors.
pub mod palette {
    /// Page background.
    pub const BACKGROUND: &str = "#FFFFFF";
    /// Body text.
    pub const TEXT: &str = "#1F2937";
    /// Primary accent.
    pub const PRIMARY: &str = "#3B82F6";
    /// Secondary text.
    pub const SECONDARY: &str = "#6B7280";
    /// Borders and image placeholders.
    pub const BORDER: &str = "#E5E7EB";
}

/// Desktop canvas, also the size injected when a document has none.
pub const DESKTOP_CANVAS: Canvas = Canvas {
    width: 1440.0,
    height: 900.0,
};

/// Tablet canvas.
pub const TABLET_CANVAS: Canvas = Canvas {
    width: 768.0,
    height: 1024.0,
};

/// Mobile canvas.
pub const MOBILE_CANVAS: Canvas = Canvas {
    width: 375.0,
    height: 812.0,
};

/// Look up a value of the spacing scale by name.
#[must_use]
pub fn spacing(name: &str) -> Option<f64> {
    SPACING_SCALE
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| *value)
}
