//! Document building options.

use crate::model::{LineKind, RgbHex};

/// Paragraph spacing in twips (1/20 pt).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spacing {
    /// Space before the paragraph
    pub before: u32,
    /// Space after the paragraph
    pub after: u32,
}

impl Spacing {
    /// Create a spacing pair.
    pub const fn new(before: u32, after: u32) -> Self {
        Self { before, after }
    }
}

/// Options for turning styled lines into an [`OutputDocument`](crate::model::OutputDocument).
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    /// Spacing for heading 1 paragraphs
    pub heading1_spacing: Spacing,

    /// Spacing for heading 2 paragraphs
    pub heading2_spacing: Spacing,

    /// Spacing for bullet paragraphs
    pub bullet_spacing: Spacing,

    /// Spacing for normal paragraphs
    pub normal_spacing: Spacing,

    /// Label of the paragraph preceding the link list
    pub links_heading: String,

    /// Font size of the links label, in half-points
    pub links_heading_size: u32,

    /// Spacing for the links label
    pub links_heading_spacing: Spacing,

    /// Font size of hyperlink runs, in half-points
    pub hyperlink_size: u32,

    /// Colour of hyperlink runs
    pub hyperlink_color: RgbHex,

    /// Spacing for hyperlink paragraphs
    pub hyperlink_spacing: Spacing,

    /// Whether to append the link list at all
    pub include_links: bool,

    /// Insert a page break where a new source page starts
    pub page_breaks: bool,
}

impl BuildOptions {
    /// Create build options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable page breaks between source pages.
    pub fn with_page_breaks(mut self, enabled: bool) -> Self {
        self.page_breaks = enabled;
        self
    }

    /// Enable or disable the trailing link list.
    pub fn with_links(mut self, enabled: bool) -> Self {
        self.include_links = enabled;
        self
    }

    /// Set the links label.
    pub fn with_links_heading(mut self, text: impl Into<String>) -> Self {
        self.links_heading = text.into();
        self
    }

    /// Set the hyperlink colour.
    pub fn with_hyperlink_color(mut self, color: RgbHex) -> Self {
        self.hyperlink_color = color;
        self
    }

    /// Set the spacing for one line kind.
    pub fn with_spacing(mut self, kind: LineKind, spacing: Spacing) -> Self {
        match kind {
            LineKind::Heading1 => self.heading1_spacing = spacing,
            LineKind::Heading2 => self.heading2_spacing = spacing,
            LineKind::Bullet => self.bullet_spacing = spacing,
            LineKind::Normal => self.normal_spacing = spacing,
        }
        self
    }

    /// Spacing for a line kind.
    pub fn spacing_for(&self, kind: LineKind) -> Spacing {
        match kind {
            LineKind::Heading1 => self.heading1_spacing,
            LineKind::Heading2 => self.heading2_spacing,
            LineKind::Bullet => self.bullet_spacing,
            LineKind::Normal => self.normal_spacing,
        }
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            heading1_spacing: Spacing::new(240, 120),
            heading2_spacing: Spacing::new(180, 90),
            bullet_spacing: Spacing::new(0, 40),
            normal_spacing: Spacing::new(0, 60),
            links_heading: "Links:".to_string(),
            links_heading_size: 24,
            links_heading_spacing: Spacing::new(240, 60),
            hyperlink_size: 22,
            hyperlink_color: RgbHex::from_rgb8(0x05, 0x63, 0xC1),
            hyperlink_spacing: Spacing::new(0, 40),
            include_links: true,
            page_breaks: false,
        }
    }
}
