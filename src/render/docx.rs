//! DOCX serialization.

use std::io::Cursor;

use docx_rs::{
    AlignmentType, BreakType, Docx, Hyperlink, HyperlinkType, LineSpacing, Paragraph, Run,
};

use crate::error::{Error, Result};
use crate::model::{Alignment, OutputDocument, OutputParagraph, OutputRun, ParagraphKind};

/// Serialize a document to DOCX bytes.
pub fn to_docx(doc: &OutputDocument) -> Result<Vec<u8>> {
    let mut docx = Docx::new();
    for paragraph in &doc.paragraphs {
        docx = docx.add_paragraph(paragraph_to_docx(paragraph));
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| Error::DocxWrite(format!("failed to pack document: {}", e)))?;
    Ok(buffer.into_inner())
}

fn paragraph_to_docx(paragraph: &OutputParagraph) -> Paragraph {
    let mut out = Paragraph::new()
        .align(alignment_type(paragraph.alignment))
        .line_spacing(
            LineSpacing::new()
                .before(paragraph.spacing_before)
                .after(paragraph.spacing_after),
        );

    if paragraph.page_break_before {
        out = out.add_run(Run::new().add_break(BreakType::Page));
    }

    match &paragraph.kind {
        ParagraphKind::Hyperlink { url } => {
            let mut link = Hyperlink::new(url.as_str(), HyperlinkType::External);
            for run in &paragraph.runs {
                link = link.add_run(run_to_docx(run));
            }
            out.add_hyperlink(link)
        }
        _ => paragraph
            .runs
            .iter()
            .fold(out, |p, run| p.add_run(run_to_docx(run))),
    }
}

fn run_to_docx(run: &OutputRun) -> Run {
    let mut out = Run::new()
        .add_text(run.text.as_str())
        .size(run.size as usize)
        .color(run.color.as_docx());
    if run.bold {
        out = out.bold();
    }
    if run.italic {
        out = out.italic();
    }
    if run.underline {
        out = out.underline("single");
    }
    out
}

fn alignment_type(alignment: Alignment) -> AlignmentType {
    match alignment {
        Alignment::Left => AlignmentType::Left,
        Alignment::Center => AlignmentType::Center,
        Alignment::Right => AlignmentType::Right,
        Alignment::Justify => AlignmentType::Both,
    }
}
