//! Positioned text runs and colours.

use serde::{Deserialize, Serialize};

/// A six-digit uppercase RGB hex colour, stored with a leading `#`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RgbHex(String);

impl RgbHex {
    /// Black (`#000000`), used when no fill colour is known.
    pub fn black() -> Self {
        Self("#000000".to_string())
    }

    /// Build from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self(format!("#{:02X}{:02X}{:02X}", r, g, b))
    }

    /// Build from a PDF DeviceRGB triple (components in 0..=1).
    pub fn from_unit_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::from_rgb8(unit_to_u8(r), unit_to_u8(g), unit_to_u8(b))
    }

    /// Build from a DeviceGray component.
    pub fn from_gray(gray: f32) -> Self {
        Self::from_unit_rgb(gray, gray, gray)
    }

    /// Build from a DeviceCMYK quadruple using the naive conversion.
    pub fn from_cmyk(c: f32, m: f32, y: f32, k: f32) -> Self {
        let k = k.clamp(0.0, 1.0);
        Self::from_unit_rgb(
            (1.0 - c.clamp(0.0, 1.0)) * (1.0 - k),
            (1.0 - m.clamp(0.0, 1.0)) * (1.0 - k),
            (1.0 - y.clamp(0.0, 1.0)) * (1.0 - k),
        )
    }

    /// Parse `#RRGGBB` or `RRGGBB` (any case).
    pub fn parse(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(format!("#{}", hex.to_ascii_uppercase())))
    }

    /// The colour as `#RRGGBB`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The colour without the leading `#`, as Word expects it.
    pub fn as_docx(&self) -> &str {
        self.0.strip_prefix('#').unwrap_or(&self.0)
    }
}

impl TryFrom<String> for RgbHex {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        Self::parse(&s).ok_or_else(|| format!("invalid RGB hex colour {:?}", s))
    }
}

impl From<RgbHex> for String {
    fn from(color: RgbHex) -> Self {
        color.0
    }
}

impl Default for RgbHex {
    fn default() -> Self {
        Self::black()
    }
}

impl std::fmt::Display for RgbHex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn unit_to_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// A contiguous glyph run with page coordinates and font metadata.
///
/// Coordinates are in PDF user-space units with the origin at the top-left
/// corner of the page; `y` is the baseline measured downward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedTextRun {
    /// The text content
    pub text: String,
    /// Left edge
    pub x: f32,
    /// Baseline, measured from the top of the page
    pub y: f32,
    /// Advance width of the run
    pub width: f32,
    /// Glyph box height (the effective font size)
    pub height: f32,
    /// Effective font size in points
    pub font_size: f32,
    /// Whether the font name suggests a bold face
    pub bold: bool,
    /// Whether the font name suggests an italic face
    pub italic: bool,
    /// Fill colour
    pub color: RgbHex,
}

impl PositionedTextRun {
    /// Create a plain black run whose height equals its font size.
    pub fn new(text: impl Into<String>, x: f32, y: f32, width: f32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            height: font_size,
            font_size,
            bold: false,
            italic: false,
            color: RgbHex::black(),
        }
    }

    /// Mark the run bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Mark the run italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Set the fill colour.
    pub fn with_color(mut self, color: RgbHex) -> Self {
        self.color = color;
        self
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Vertical centre of the glyph box (above the baseline).
    pub fn center_y(&self) -> f32 {
        self.y - self.height / 2.0
    }

    /// Horizontal centre.
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Number of characters in the run.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}
