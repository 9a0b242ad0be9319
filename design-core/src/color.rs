//! Hex colors as they appear in design documents.
//!
//! Documents carry colors as `#RRGGBB` or `#RRGGBBAA` strings. Input is
//! case-insensitive; the canonical form is uppercase.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Color substituted when a generator emits something that cannot be repaired.
pub const FALLBACK_COLOR: &str = "#000000";

/// A validated, canonical (uppercase) hex color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

/// Linear RGBA components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Parse a strict hex color (`#` followed by 6 or 8 hex digits, any case).
    ///
    /// Returns `None` for anything else, including 3-digit shorthand; repairs
    /// are the sanitizer's job, see [`normalize`].
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let digits = input.strip_prefix('#')?;
        if !matches!(digits.len(), 6 | 8) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(format!("#{}", digits.to_ascii_uppercase())))
    }

    /// The fallback color (`#000000`).
    #[must_use]
    pub fn fallback() -> Self {
        Self(FALLBACK_COLOR.to_string())
    }

    /// The canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the color carries an explicit alpha channel.
    #[must_use]
    pub fn has_alpha(&self) -> bool {
        self.0.len() == 9
    }

    /// Convert to RGBA components. Colors without alpha are fully opaque.
    #[must_use]
    pub fn to_rgba(&self) -> Rgba {
        let channel = |index: usize| {
            let start = 1 + index * 2;
            self.0
                .get(start..start + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .map_or(0.0, |v| f32::from(v) / 255.0)
        };

        Rgba {
            r: channel(0),
            g: channel(1),
            b: channel(2),
            a: if self.has_alpha() { channel(3) } else { 1.0 },
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid hex color: {value}"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

/// Outcome of [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// The repaired color (or the fallback).
    pub color: Color,
    /// True when the input was unrecoverable and [`FALLBACK_COLOR`] was used.
    pub substituted: bool,
}

/// Best-effort repair of a near-valid color string.
///
/// Trims whitespace, prepends a missing `#`, and expands `#RGB` shorthand to
/// `#RRGGBB`. Anything still not matching the canonical pattern becomes
/// [`FALLBACK_COLOR`] with `substituted` set. Never fails.
#[must_use]
pub fn normalize(input: &str) -> Normalized {
    let trimmed = input.trim();
    let mut hex = if trimmed.starts_with('#') {
        trimmed.to_string()
    } else {
        format!("#{trimmed}")
    };

    if hex.len() == 4 {
        let expanded: String = hex.chars().skip(1).flat_map(|c| [c, c]).collect();
        hex = format!("#{expanded}");
    }

    match Color::parse(&hex) {
        Some(color) => Normalized {
            color,
            substituted: false,
        },
        None => Normalized {
            color: Color::fallback(),
            substituted: true,
        },
    }
}
