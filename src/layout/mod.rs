//! Layout analysis: grouping runs into lines and classifying them.

mod classifier;
mod config;
mod grouper;

pub use classifier::StyleClassifier;
pub use config::{GroupingConfig, LayoutConfig, StyleConfig, DEFAULT_NUMBERED_PATTERN};
pub use grouper::group_lines;

use crate::error::Result;
use crate::model::{Extraction, StyledLine};

/// Group and classify every page of an extraction, in page order.
pub fn analyze(extraction: &Extraction, config: &LayoutConfig) -> Result<Vec<StyledLine>> {
    let classifier = StyleClassifier::new(config.style.clone())?;
    let mut styled = Vec::new();
    for page in &extraction.pages {
        let lines = group_lines(&page.runs, &config.grouping);
        styled.extend(classifier.classify_lines(lines, page.number));
    }
    Ok(styled)
}
