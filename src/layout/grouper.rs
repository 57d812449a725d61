//! Grouping sorted runs into visual lines.

use super::GroupingConfig;
use crate::model::{Line, PositionedTextRun};

/// Group the sorted runs of one page into lines.
///
/// A run extends the current line when its vertical centre is within
/// `max(font sizes) * line_tolerance` of the line's first run and its left
/// edge is less than `max_horizontal_gap` past the previous run's right
/// edge. Otherwise it starts a new line.
pub fn group_lines(runs: &[PositionedTextRun], config: &GroupingConfig) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::new();
    let mut current = Line::default();

    for run in runs {
        let joins = match (current.first(), current.last()) {
            (Some(reference), Some(prev)) => {
                let tolerance = reference.font_size.max(run.font_size) * config.line_tolerance;
                let same_row = (run.center_y() - reference.center_y()).abs() <= tolerance;
                let close = run.x - prev.right() < config.max_horizontal_gap;
                same_row && close
            }
            _ => false,
        };

        if !joins && !current.is_empty() {
            lines.push(finish(std::mem::take(&mut current)));
        }
        current.push(run.clone());
    }

    if !current.is_empty() {
        lines.push(finish(current));
    }

    log::debug!("Grouped {} runs into {} lines", runs.len(), lines.len());
    lines
}

fn finish(mut line: Line) -> Line {
    line.runs.sort_by(|a, b| a.x.total_cmp(&b.x));
    line
}
