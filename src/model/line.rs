//! Visual lines assembled from positioned runs.

use super::PositionedTextRun;
use serde::{Deserialize, Serialize};

/// Gap between runs, relative to font size, that reads as a word break.
const WORD_GAP_RATIO: f32 = 0.2;

/// An ordered sequence of runs that read as one visual line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Member runs, in reading order
    pub runs: Vec<PositionedTextRun>,
}

impl Line {
    /// Create a line from runs.
    pub fn new(runs: Vec<PositionedTextRun>) -> Self {
        Self { runs }
    }

    /// Create a line holding a single run.
    pub fn from_run(run: PositionedTextRun) -> Self {
        Self { runs: vec![run] }
    }

    /// Append a run to the line.
    pub fn push(&mut self, run: PositionedTextRun) {
        self.runs.push(run);
    }

    /// Whether the line has no runs.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// First run of the line, used as the grouping reference.
    pub fn first(&self) -> Option<&PositionedTextRun> {
        self.runs.first()
    }

    /// Last run of the line.
    pub fn last(&self) -> Option<&PositionedTextRun> {
        self.runs.last()
    }

    /// Text of all runs, trimmed.
    ///
    /// A space is inserted between adjacent runs when the horizontal gap
    /// exceeds a fifth of the font size and neither side already carries
    /// whitespace. Scripts written without word spaces never get one.
    pub fn text(&self) -> String {
        let mut result = String::new();
        let mut prev: Option<&PositionedTextRun> = None;

        for run in &self.runs {
            if let Some(p) = prev {
                let gap = run.x - p.right();
                let threshold = p.font_size.max(run.font_size) * WORD_GAP_RATIO;
                let needs_space = gap > threshold
                    && !result.ends_with(char::is_whitespace)
                    && !run.text.starts_with(char::is_whitespace);
                let spaceless = result.chars().last().is_some_and(is_spaceless_script_char)
                    && run.text.chars().next().is_some_and(is_spaceless_script_char);
                if needs_space && !spaceless {
                    result.push(' ');
                }
            }
            result.push_str(&run.text);
            prev = Some(run);
        }

        result.trim().to_string()
    }

    /// Character count of the trimmed text.
    pub fn char_count(&self) -> usize {
        self.text().chars().count()
    }

    /// Arithmetic mean of member run font sizes (0 for an empty line).
    pub fn average_font_size(&self) -> f32 {
        if self.runs.is_empty() {
            return 0.0;
        }
        self.runs.iter().map(|r| r.font_size).sum::<f32>() / self.runs.len() as f32
    }

    /// Largest member run font size.
    pub fn max_font_size(&self) -> f32 {
        self.runs.iter().map(|r| r.font_size).fold(0.0, f32::max)
    }

    /// Whether any member run is bold.
    pub fn any_bold(&self) -> bool {
        self.runs.iter().any(|r| r.bold)
    }

    /// Whether any member run is italic.
    pub fn any_italic(&self) -> bool {
        self.runs.iter().any(|r| r.italic)
    }

    /// The run carrying the most characters; the first wins ties.
    pub fn dominant_run(&self) -> Option<&PositionedTextRun> {
        let mut best: Option<&PositionedTextRun> = None;
        for run in &self.runs {
            match best {
                Some(b) if b.char_count() >= run.char_count() => {}
                _ => best = Some(run),
            }
        }
        best
    }

    /// Whether the text contains a letter and no lowercase letters.
    pub fn is_uppercase(&self) -> bool {
        let text = self.text();
        text.chars().any(|c| c.is_alphabetic()) && !text.chars().any(|c| c.is_lowercase())
    }

    /// Left edge of the line.
    pub fn left(&self) -> f32 {
        self.runs.iter().map(|r| r.x).fold(f32::INFINITY, f32::min)
    }

    /// Right edge of the line.
    pub fn right(&self) -> f32 {
        self.runs
            .iter()
            .map(|r| r.right())
            .fold(f32::NEG_INFINITY, f32::max)
    }
}

/// Whether a character belongs to a script that does not separate words
/// with spaces (Han ideographs, kana, CJK punctuation). Hangul is excluded.
pub(crate) fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        || (0x3040..=0x30FF).contains(&code)
        || (0x3000..=0x303F).contains(&code)
}
