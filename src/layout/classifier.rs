//! Line style classification.
//!
//! Each line is labelled heading 1, heading 2, bullet or normal from its
//! aggregate font metrics and text. Checks run in that priority order:
//! bullet, heading 1, heading 2, then normal as the fallback. The rules are
//! heuristics tuned for single-column résumés; unusual layouts will be
//! misclassified.

use regex::Regex;

use super::StyleConfig;
use crate::error::{Error, Result};
use crate::model::{Alignment, Line, LineKind, LineStyle, RgbHex, StyledLine};

/// Classifies lines into [`LineStyle`]s.
#[derive(Debug, Clone)]
pub struct StyleClassifier {
    config: StyleConfig,
    numbered: Option<Regex>,
}

impl StyleClassifier {
    /// Create a classifier, compiling the numbered-item pattern.
    pub fn new(config: StyleConfig) -> Result<Self> {
        let numbered = if config.numbered_lists {
            let re = Regex::new(&config.numbered_pattern).map_err(|e| {
                Error::Config(format!(
                    "invalid numbered-list pattern {:?}: {}",
                    config.numbered_pattern, e
                ))
            })?;
            Some(re)
        } else {
            None
        };
        Ok(Self { config, numbered })
    }

    /// The style configuration.
    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    /// Classify one line.
    pub fn classify(&self, line: &Line) -> LineStyle {
        let text = line.text();
        let avg = line.average_font_size();
        let chars = text.chars().count();
        let any_bold = line.any_bold();
        let color = line
            .dominant_run()
            .map(|r| r.color.clone())
            .unwrap_or_else(RgbHex::black);

        let style = if self.is_bullet(&text) {
            LineStyle {
                kind: LineKind::Bullet,
                size: half_points(avg, 0.0),
                bold: any_bold,
                italic: line.any_italic(),
                color,
                alignment: Alignment::Left,
            }
        } else if (avg > self.config.body_size * self.config.h1_size_ratio || any_bold)
            && line.is_uppercase()
            && chars < self.config.h1_max_chars
        {
            LineStyle {
                kind: LineKind::Heading1,
                size: half_points(avg, self.config.h1_min_size),
                bold: true,
                italic: false,
                color,
                alignment: Alignment::Center,
            }
        } else if any_bold && chars < self.config.h2_max_chars {
            LineStyle {
                kind: LineKind::Heading2,
                size: half_points(avg, self.config.h2_min_size),
                bold: true,
                italic: false,
                color,
                alignment: Alignment::Left,
            }
        } else {
            let dominant = line.dominant_run();
            LineStyle {
                kind: LineKind::Normal,
                size: half_points(avg, 0.0),
                bold: dominant.is_some_and(|r| r.bold),
                italic: dominant.is_some_and(|r| r.italic),
                color,
                alignment: Alignment::Left,
            }
        };

        log::debug!(
            "{:<8} {:>3}hp {:?}",
            style.kind.label(),
            style.size,
            truncate(&text, 40)
        );
        style
    }

    /// Classify the lines of one page.
    pub fn classify_lines(&self, lines: Vec<Line>, page: u32) -> Vec<StyledLine> {
        lines
            .into_iter()
            .map(|line| StyledLine {
                style: self.classify(&line),
                line,
                page,
            })
            .collect()
    }

    /// Whether text starts with a bullet glyph or a numbered-item prefix.
    pub fn is_bullet(&self, text: &str) -> bool {
        let text = text.trim_start();
        let mut chars = text.chars();
        if let Some(first) = chars.next() {
            if self.config.bare_bullet_markers.contains(&first) {
                return true;
            }
            if self.config.bullet_markers.contains(&first)
                && chars.next().is_some_and(char::is_whitespace)
            {
                return true;
            }
        }
        self.numbered.as_ref().is_some_and(|re| re.is_match(text))
    }
}

/// Point size to half-points, rounded and raised to `min_points`.
fn half_points(points: f32, min_points: f32) -> u32 {
    let size = (points.max(min_points) * 2.0).round();
    if size.is_finite() && size >= 1.0 {
        size as u32
    } else {
        1
    }
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
