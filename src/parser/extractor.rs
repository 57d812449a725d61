//! Positioned text extraction.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use super::backend::{LinkAnnotation, LopdfBackend, PageBox, PageId, PdfBackend};
use super::content::{ContentInterpreter, PageFont};
use super::options::{ErrorMode, ExtractOptions, PageSelection};
use crate::convert::{AbortSignal, ProgressTracker, Stage};
use crate::detect::{detect_format_from_bytes, SourceFormat};
use crate::error::{Error, Result};
use crate::model::{ExtractedPage, Extraction, Line, Link, PositionedTextRun};

/// Extracts pages of positioned text runs and links from a PDF.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor {
    options: ExtractOptions,
}

impl PdfExtractor {
    /// Create an extractor.
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// The extraction options.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract from a file.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<Extraction> {
        let data = std::fs::read(path)?;
        self.extract_bytes(&data)
    }

    /// Extract from bytes without progress reporting.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<Extraction> {
        self.extract_bytes_with(data, &ProgressTracker::noop(), &AbortSignal::new())
    }

    /// Extract from bytes, reporting into the 0-40 band and honouring `abort`.
    pub fn extract_bytes_with(
        &self,
        data: &[u8],
        progress: &ProgressTracker,
        abort: &AbortSignal,
    ) -> Result<Extraction> {
        match detect_format_from_bytes(data)? {
            SourceFormat::Pdf { .. } => {}
            SourceFormat::Docx => return Err(Error::UnknownFormat),
        }
        abort.check()?;

        let backend = LopdfBackend::load_bytes(data, self.options.password.as_deref())?;
        self.extract_backend(&backend, progress, abort)
    }

    /// Extract from any backend.
    pub fn extract_backend<B: PdfBackend + Sync>(
        &self,
        backend: &B,
        progress: &ProgressTracker,
        abort: &AbortSignal,
    ) -> Result<Extraction> {
        let metadata = backend.metadata();
        let all_pages = backend.pages();
        let total_pages = all_pages.len() as u32;

        let selected: Vec<(u32, PageId)> = all_pages
            .into_iter()
            .filter(|(num, _)| self.options.pages.includes(*num))
            .collect();

        if selected.is_empty() && total_pages > 0 {
            let requested = match &self.options.pages {
                PageSelection::All => 1,
                PageSelection::Range(r) => *r.start(),
                PageSelection::Pages(p) => p.first().copied().unwrap_or(1),
            };
            return Err(Error::PageOutOfRange(requested, total_pages));
        }

        progress.start(Stage::Extracting);
        let total = selected.len();
        let done = AtomicUsize::new(0);

        let extract_one = |&(num, id): &(u32, PageId)| -> Result<ExtractedPage> {
            abort.check()?;
            let page = self.extract_page_lenient(backend, num, id)?;
            let finished = done.fetch_add(1, Ordering::SeqCst) + 1;
            progress.report_fraction(Stage::Extracting, finished, total);
            Ok(page)
        };

        let pages: Vec<ExtractedPage> = if self.options.parallel && total > 1 {
            selected.par_iter().map(extract_one).collect::<Result<_>>()?
        } else {
            selected.iter().map(extract_one).collect::<Result<_>>()?
        };

        abort.check()?;
        progress.complete(Stage::Extracting);

        log::debug!(
            "Extracted {} of {} pages ({} runs)",
            pages.len(),
            total_pages,
            pages.iter().map(|p| p.runs.len()).sum::<usize>()
        );

        Ok(Extraction { metadata, pages })
    }

    fn extract_page_lenient<B: PdfBackend>(
        &self,
        backend: &B,
        num: u32,
        id: PageId,
    ) -> Result<ExtractedPage> {
        match self.extract_page(backend, num, id) {
            Ok(page) => Ok(page),
            Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                log::warn!("Skipping page {}: {}", num, e);
                let page_box = backend.page_box(id);
                Ok(ExtractedPage::new(num, page_box.width(), page_box.height()))
            }
            Err(e) => Err(e),
        }
    }

    /// Extract one page.
    pub fn extract_page<B: PdfBackend>(
        &self,
        backend: &B,
        num: u32,
        id: PageId,
    ) -> Result<ExtractedPage> {
        let page_box = backend.page_box(id);

        let fonts: HashMap<Vec<u8>, PageFont> = backend
            .page_fonts(id)?
            .into_iter()
            .map(|f| {
                let font = PageFont {
                    bold: self.options.fonts.is_bold(&f.base_font),
                    italic: self.options.fonts.is_italic(&f.base_font),
                    base_font: f.base_font,
                    metrics: f.metrics,
                };
                (f.name, font)
            })
            .collect();

        let content = backend.page_content(id)?;
        let ops = backend
            .decode_content(&content)
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", num, e)))?;

        let decode = |font: &[u8], bytes: &[u8]| backend.decode_text(id, font, bytes);
        let mut runs = ContentInterpreter::new(&fonts, &decode, page_box).run(&ops);
        sort_runs(&mut runs, self.options.same_row_threshold);

        let links = backend
            .page_links(id)?
            .iter()
            .map(|annot| link_with_text(annot, &runs, &page_box))
            .collect::<Vec<_>>();

        log::debug!(
            "Page {}: {} runs, {} fonts, {} links",
            num,
            runs.len(),
            fonts.len(),
            links.len()
        );

        Ok(ExtractedPage {
            number: num,
            width: page_box.width(),
            height: page_box.height(),
            runs,
            links,
        })
    }
}

/// Order runs top-to-bottom, then left-to-right within rows.
///
/// Runs are sorted by baseline and bucketed into rows: a run joins the
/// current row while its baseline is within `threshold` of the row's first
/// run. Each row is then ordered by `x`.
pub fn sort_runs(runs: &mut Vec<PositionedTextRun>, threshold: f32) {
    runs.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    let mut sorted = Vec::with_capacity(runs.len());
    let mut row: Vec<PositionedTextRun> = Vec::new();
    let mut anchor = f32::NEG_INFINITY;

    for run in runs.drain(..) {
        if !row.is_empty() && run.y - anchor > threshold {
            row.sort_by(|a, b| a.x.total_cmp(&b.x));
            sorted.append(&mut row);
        }
        if row.is_empty() {
            anchor = run.y;
        }
        row.push(run);
    }
    row.sort_by(|a, b| a.x.total_cmp(&b.x));
    sorted.append(&mut row);

    *runs = sorted;
}

/// Resolve the visible text of a link from the runs under its rectangle.
fn link_with_text(annot: &LinkAnnotation, runs: &[PositionedTextRun], page_box: &PageBox) -> Link {
    let left = annot.rect.left - page_box.left;
    let right = annot.rect.right - page_box.left;
    let top = page_box.top - annot.rect.top;
    let bottom = page_box.top - annot.rect.bottom;

    let covered: Vec<PositionedTextRun> = runs
        .iter()
        .filter(|r| {
            let (cx, cy) = (r.center_x(), r.center_y());
            cx >= left && cx <= right && cy >= top && cy <= bottom
        })
        .cloned()
        .collect();

    let text = Line::new(covered).text();
    if text.is_empty() {
        Link::bare(annot.uri.clone())
    } else {
        Link::new(annot.uri.clone(), text)
    }
}
