//! Page-level extraction output.

use super::{Metadata, PositionedTextRun};
use serde::{Deserialize, Serialize};

/// A hyperlink found in a page's link annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Target URI
    pub url: String,
    /// Visible text under the annotation (falls back to the URL)
    pub text: String,
}

impl Link {
    /// Create a link.
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
        }
    }

    /// Create a link whose text is its URL.
    pub fn bare(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            text: url.clone(),
            url,
        }
    }

    /// Text to display for this link.
    pub fn display_text(&self) -> &str {
        if self.text.trim().is_empty() {
            &self.url
        } else {
            &self.text
        }
    }
}

/// Runs and links extracted from one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedPage {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Text runs, sorted top-to-bottom then left-to-right
    pub runs: Vec<PositionedTextRun>,

    /// Link annotations in page order
    pub links: Vec<Link>,
}

impl ExtractedPage {
    /// Create an empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            runs: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Create an empty US Letter page.
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Check if the page carries no text.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Everything the extractor produced for one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Extraction {
    /// Document metadata
    pub metadata: Metadata,

    /// Extracted pages, in page order
    pub pages: Vec<ExtractedPage>,
}

impl Extraction {
    /// Number of extracted pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// All links across pages, in page then annotation order.
    pub fn all_links(&self) -> Vec<Link> {
        self.pages
            .iter()
            .flat_map(|p| p.links.iter().cloned())
            .collect()
    }

    /// Total number of runs across pages.
    pub fn run_count(&self) -> usize {
        self.pages.iter().map(|p| p.runs.len()).sum()
    }
}
