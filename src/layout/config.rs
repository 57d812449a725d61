//! Heuristic constants for grouping and classification.

/// Default numbered-item pattern (`1. `, `12. `).
pub const DEFAULT_NUMBERED_PATTERN: &str = r"^\d+\.\s";

/// Configuration for grouping runs into lines.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupingConfig {
    /// Vertical tolerance as a fraction of the larger font size
    pub line_tolerance: f32,

    /// Largest horizontal gap (points) bridged within one line
    pub max_horizontal_gap: f32,
}

impl GroupingConfig {
    /// Create grouping config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the vertical tolerance factor.
    pub fn with_line_tolerance(mut self, factor: f32) -> Self {
        self.line_tolerance = factor.max(0.0);
        self
    }

    /// Set the maximum horizontal gap.
    pub fn with_max_gap(mut self, gap: f32) -> Self {
        self.max_horizontal_gap = gap.max(0.0);
        self
    }
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            line_tolerance: 0.3,
            max_horizontal_gap: 50.0,
        }
    }
}

/// Configuration for line classification.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleConfig {
    /// Body text size in points that headings are measured against
    pub body_size: f32,

    /// Average size above `body_size * h1_size_ratio` suggests a heading
    pub h1_size_ratio: f32,

    /// Heading 1 text must be shorter than this
    pub h1_max_chars: usize,

    /// Heading 2 text must be shorter than this
    pub h2_max_chars: usize,

    /// Minimum heading 1 size in points
    pub h1_min_size: f32,

    /// Minimum heading 2 size in points
    pub h2_min_size: f32,

    /// Glyphs that start a bullet when followed by whitespace
    pub bullet_markers: Vec<char>,

    /// Glyphs that start a bullet even without trailing whitespace
    pub bare_bullet_markers: Vec<char>,

    /// Whether numbered items count as bullets
    pub numbered_lists: bool,

    /// Pattern matching a numbered item at the start of a line
    pub numbered_pattern: String,
}

impl StyleConfig {
    /// Create style config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set body text size.
    pub fn with_body_size(mut self, size: f32) -> Self {
        self.body_size = size;
        self
    }

    /// Set heading 1 size ratio.
    pub fn with_h1_ratio(mut self, ratio: f32) -> Self {
        self.h1_size_ratio = ratio;
        self
    }

    /// Set the numbered-item pattern.
    pub fn with_numbered_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.numbered_pattern = pattern.into();
        self
    }

    /// Enable or disable numbered-list detection.
    pub fn with_numbered_lists(mut self, enabled: bool) -> Self {
        self.numbered_lists = enabled;
        self
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            body_size: 12.0,
            h1_size_ratio: 1.2,
            h1_max_chars: 50,
            h2_max_chars: 100,
            h1_min_size: 16.0,
            h2_min_size: 13.0,
            bullet_markers: vec!['•', '·', '-', '*'],
            bare_bullet_markers: vec!['•', '·'],
            numbered_lists: true,
            numbered_pattern: DEFAULT_NUMBERED_PATTERN.to_string(),
        }
    }
}

/// Grouping and classification configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutConfig {
    /// Line grouping
    pub grouping: GroupingConfig,
    /// Line classification
    pub style: StyleConfig,
}

impl LayoutConfig {
    /// Create layout config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set grouping config.
    pub fn with_grouping(mut self, grouping: GroupingConfig) -> Self {
        self.grouping = grouping;
        self
    }

    /// Set style config.
    pub fn with_style(mut self, style: StyleConfig) -> Self {
        self.style = style;
        self
    }
}
