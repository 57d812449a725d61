//! Classified line styles.

use super::{Line, RgbHex};
use serde::{Deserialize, Serialize};

/// Structural role assigned to a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// Top-level section heading
    Heading1,
    /// Sub-heading
    Heading2,
    /// List item
    Bullet,
    /// Body text
    Normal,
}

impl LineKind {
    /// Short label used in debug output.
    pub fn label(&self) -> &'static str {
        match self {
            LineKind::Heading1 => "heading1",
            LineKind::Heading2 => "heading2",
            LineKind::Bullet => "bullet",
            LineKind::Normal => "normal",
        }
    }
}

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}

/// Formatting decided for one line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// Structural role
    pub kind: LineKind,
    /// Font size in half-points
    pub size: u32,
    /// Bold flag
    pub bold: bool,
    /// Italic flag
    pub italic: bool,
    /// Text colour
    pub color: RgbHex,
    /// Paragraph alignment
    pub alignment: Alignment,
}

impl LineStyle {
    /// Font size in points.
    pub fn size_points(&self) -> f32 {
        self.size as f32 / 2.0
    }
}

/// A line paired with its style and source page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledLine {
    /// The grouped line
    pub line: Line,
    /// Its classification
    pub style: LineStyle,
    /// Page number (1-indexed)
    pub page: u32,
}

impl StyledLine {
    /// Trimmed text of the line.
    pub fn text(&self) -> String {
        self.line.text()
    }
}
