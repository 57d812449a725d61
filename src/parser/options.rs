//! Extraction options and configuration.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};

/// Runs whose baselines differ by at most this many units share a row.
pub const DEFAULT_SAME_ROW_THRESHOLD: f32 = 5.0;

/// Options for extracting positioned text from PDF documents.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Page selection (which pages to extract)
    pub pages: PageSelection,

    /// Password for encrypted documents
    pub password: Option<String>,

    /// Whether to extract pages in parallel
    pub parallel: bool,

    /// Baseline tolerance for ordering runs into rows
    pub same_row_threshold: f32,

    /// Font-name markers for bold/italic detection
    pub fonts: FontHeuristics,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip pages that fail).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable parallel page extraction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel page extraction.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set password for encrypted documents.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the same-row baseline tolerance.
    pub fn with_same_row_threshold(mut self, threshold: f32) -> Self {
        self.same_row_threshold = threshold.max(0.0);
        self
    }

    /// Set font heuristics.
    pub fn with_fonts(mut self, fonts: FontHeuristics) -> Self {
        self.fonts = fonts;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            pages: PageSelection::All,
            password: None,
            parallel: true,
            same_row_threshold: DEFAULT_SAME_ROW_THRESHOLD,
            fonts: FontHeuristics::default(),
        }
    }
}

/// Error handling mode during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Log the failing page, emit it empty and continue
    Lenient,
}

/// Page selection for extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-3", "1,3,5-7").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        let invalid = || Error::InvalidPageRange(s.to_string());
        let number = |v: &str| -> Result<u32> {
            match v.trim().parse::<u32>() {
                Ok(0) | Err(_) => Err(invalid()),
                Ok(n) => Ok(n),
            }
        };

        if !s.contains(',') {
            if let Some((start, end)) = s.split_once('-') {
                let (start, end) = (number(start)?, number(end)?);
                if start > end {
                    return Err(invalid());
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            if let Some((start, end)) = part.split_once('-') {
                let (start, end) = (number(start)?, number(end)?);
                if start > end {
                    return Err(invalid());
                }
                pages.extend(start..=end);
            } else {
                pages.push(number(part)?);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

/// Substring markers used to infer bold and italic faces from font names.
///
/// Matching is case-insensitive. Fonts whose names carry no marker (or
/// embedded subsets with opaque names) are treated as regular.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontHeuristics {
    /// Markers for bold faces
    pub bold_markers: Vec<String>,
    /// Markers for italic faces
    pub italic_markers: Vec<String>,
}

impl FontHeuristics {
    /// Whether the font name suggests a bold face.
    pub fn is_bold(&self, font_name: &str) -> bool {
        contains_any(font_name, &self.bold_markers)
    }

    /// Whether the font name suggests an italic face.
    pub fn is_italic(&self, font_name: &str) -> bool {
        contains_any(font_name, &self.italic_markers)
    }
}

impl Default for FontHeuristics {
    fn default() -> Self {
        Self {
            bold_markers: vec!["Bold".into(), "Black".into(), "Heavy".into()],
            italic_markers: vec!["Italic".into(), "Oblique".into()],
        }
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    needles
        .iter()
        .any(|n| !n.is_empty() && haystack.contains(&n.to_lowercase()))
}
