//! PDF text extraction module.

pub mod backend;
mod content;
mod extractor;
mod options;

pub use backend::{LopdfBackend, PageBox, PdfBackend};
pub use content::{ContentInterpreter, Matrix, PageFont};
pub use extractor::{sort_runs, PdfExtractor};
pub use options::{
    ErrorMode, ExtractOptions, FontHeuristics, PageSelection, DEFAULT_SAME_ROW_THRESHOLD,
};
