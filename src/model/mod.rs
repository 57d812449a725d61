//! Data model shared by the conversion stages.
//!
//! Extraction produces [`Extraction`] (pages of [`PositionedTextRun`]s and
//! [`Link`]s). Grouping turns runs into [`Line`]s, classification attaches
//! a [`LineStyle`], and building yields an [`OutputDocument`] that the
//! renderers serialize.

mod document;
mod line;
mod page;
mod run;
mod style;

pub use document::{
    parse_pdf_date, Metadata, OutputDocument, OutputParagraph, OutputRun, ParagraphKind,
};
pub use line::Line;
pub(crate) use line::is_spaceless_script_char;
pub use page::{ExtractedPage, Extraction, Link};
pub use run::{PositionedTextRun, RgbHex};
pub use style::{Alignment, LineKind, LineStyle, StyledLine};
