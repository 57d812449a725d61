//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for PDF operations, isolating
//! the concrete PDF library (lopdf) from the extraction logic.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};
use crate::model::{parse_pdf_date, Metadata};

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// Glyph width used when a font carries no metrics (1/1000 em).
pub const DEFAULT_GLYPH_WIDTH: f32 = 500.0;

/// Maximum depth followed through `/Parent` when resolving inherited keys.
const MAX_INHERIT_DEPTH: usize = 32;

/// Page rectangle in default user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    /// Lower-left x
    pub left: f32,
    /// Lower-left y
    pub bottom: f32,
    /// Upper-right x
    pub right: f32,
    /// Upper-right y
    pub top: f32,
}

impl PageBox {
    /// US Letter, used when a page declares no MediaBox.
    pub const LETTER: PageBox = PageBox {
        left: 0.0,
        bottom: 0.0,
        right: 612.0,
        top: 792.0,
    };

    /// Build from two corners in any order.
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            left: x0.min(x1),
            bottom: y0.min(y1),
            right: x0.max(x1),
            top: y0.max(y1),
        }
    }

    /// Width in points.
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height in points.
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }
}

/// Glyph advance widths of a font.
#[derive(Debug, Clone, Default)]
pub struct FontMetrics {
    /// First character code covered by `widths`
    pub first_char: u32,
    /// Simple-font widths starting at `first_char` (1/1000 em)
    pub widths: Vec<f32>,
    /// Width for codes outside `widths`
    pub missing_width: Option<f32>,
    /// Whether the font uses two-byte codes (Type0)
    pub composite: bool,
    /// Per-CID widths from a descendant font's `/W` array
    pub cid_widths: HashMap<u32, f32>,
    /// Descendant font `/DW`
    pub default_cid_width: Option<f32>,
}

impl FontMetrics {
    /// Split a shown string into character codes.
    pub fn codes(&self, bytes: &[u8]) -> Vec<u32> {
        if self.composite {
            bytes
                .chunks(2)
                .map(|c| match c {
                    [hi, lo] => u32::from(*hi) << 8 | u32::from(*lo),
                    [b] => u32::from(*b),
                    _ => 0,
                })
                .collect()
        } else {
            bytes.iter().map(|&b| u32::from(b)).collect()
        }
    }

    /// Advance width of a character code in 1/1000 em.
    pub fn width_of(&self, code: u32) -> f32 {
        if self.composite {
            return self
                .cid_widths
                .get(&code)
                .copied()
                .or(self.default_cid_width)
                .unwrap_or(1000.0);
        }
        code.checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize))
            .copied()
            .filter(|w| *w > 0.0)
            .or(self.missing_width)
            .unwrap_or(DEFAULT_GLYPH_WIDTH)
    }
}

/// Font information returned by the backend.
#[derive(Debug, Clone)]
pub struct BackendFontInfo {
    /// Font resource name (key in the page's font dictionary).
    pub name: Vec<u8>,
    /// Base font name (e.g., "Helvetica-Bold").
    pub base_font: String,
    /// Font subtype (e.g., "Type1", "TrueType", "Type0").
    pub subtype: String,
    /// Advance widths.
    pub metrics: FontMetrics,
}

/// A link annotation with a URI action.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkAnnotation {
    /// Target URI
    pub uri: String,
    /// Annotation rectangle in user space
    pub rect: PageBox,
}

/// A value from a PDF content stream operand.
#[derive(Debug, Clone)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

/// Abstract interface for PDF document access.
///
/// Implementations provide page enumeration, geometry, fonts, content
/// decoding, link annotations and metadata without exposing any concrete
/// PDF library types.
pub trait PdfBackend {
    /// Return all pages as (page_number → PageId).
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Return the page's MediaBox, following `/Parent` inheritance.
    fn page_box(&self, page: PageId) -> PageBox;

    /// Return font info for a given page.
    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>>;

    /// Return the raw (decompressed) content stream bytes for a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Parse raw content stream bytes into a sequence of operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Decode a text byte sequence using the font's encoding on the given page.
    /// Falls back to simple decoding if the font or encoding is unavailable.
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;

    /// Return URI link annotations of a page, in annotation order.
    fn page_links(&self, page: PageId) -> Result<Vec<LinkAnnotation>>;

    /// Return the document Info metadata.
    fn metadata(&self) -> Metadata;
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        return decode_utf16be(&bytes[2..]);
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

fn decode_utf16be(bytes: &[u8]) -> String {
    let utf16: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .collect();
    String::from_utf16_lossy(&utf16)
}

// ---------------------------------------------------------------------------
// LopdfBackend: concrete implementation backed by lopdf
// ---------------------------------------------------------------------------

use lopdf::{Dictionary, Document as LopdfDocument, Object};

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
    was_encrypted: bool,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<std::path::Path>>(path: P, password: Option<&str>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::load_bytes(&data, password)
    }

    /// Load from an in-memory byte slice, decrypting if needed.
    ///
    /// Without a password the empty user password is tried; failure is
    /// [`Error::Encrypted`]. A wrong explicit password is
    /// [`Error::InvalidPassword`].
    pub fn load_bytes(data: &[u8], password: Option<&str>) -> Result<Self> {
        let mut doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        let was_encrypted = doc.is_encrypted();
        if was_encrypted {
            match password {
                Some(pw) => doc.decrypt(pw).map_err(|e| {
                    log::debug!("Decryption with supplied password failed: {}", e);
                    Error::InvalidPassword
                })?,
                None => doc.decrypt("").map_err(|e| {
                    log::debug!("Decryption with empty password failed: {}", e);
                    Error::Encrypted
                })?,
            }
            log::debug!("Decrypted encrypted document");
        }

        Ok(Self { doc, was_encrypted })
    }

    /// Load from a reader.
    pub fn load_reader<R: std::io::Read>(mut reader: R, password: Option<&str>) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::load_bytes(&data, password)
    }

    /// Whether the source document was encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.was_encrypted
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).ok(),
            other => Some(other),
        }
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        self.resolve(obj).and_then(|o| o.as_dict().ok())
    }

    fn resolve_number(&self, obj: &Object) -> Option<f32> {
        self.resolve(obj).and_then(object_number)
    }

    /// Look up a page attribute, walking up the page tree.
    fn inherited<'a>(&'a self, page: PageId, key: &[u8]) -> Option<&'a Object> {
        let mut dict = self.doc.get_dictionary(page).ok()?;
        for _ in 0..MAX_INHERIT_DEPTH {
            if let Ok(value) = dict.get(key) {
                return self.resolve(value);
            }
            let parent = dict.get(b"Parent").ok()?;
            dict = self.resolve_dict(parent)?;
        }
        None
    }

    fn font_metrics(&self, font: &Dictionary, subtype: &str) -> FontMetrics {
        let mut metrics = FontMetrics::default();

        if subtype == "Type0" {
            metrics.composite = true;
            let descendant = font
                .get(b"DescendantFonts")
                .ok()
                .and_then(|o| self.resolve(o))
                .and_then(|o| o.as_array().ok())
                .and_then(|arr| arr.first())
                .and_then(|o| self.resolve_dict(o));
            if let Some(desc) = descendant {
                metrics.default_cid_width = desc.get(b"DW").ok().and_then(|o| self.resolve_number(o));
                if let Some(w) = desc
                    .get(b"W")
                    .ok()
                    .and_then(|o| self.resolve(o))
                    .and_then(|o| o.as_array().ok())
                {
                    metrics.cid_widths = self.parse_cid_widths(w);
                }
            }
            return metrics;
        }

        metrics.first_char = font
            .get(b"FirstChar")
            .ok()
            .and_then(|o| self.resolve_number(o))
            .map(|n| n.max(0.0) as u32)
            .unwrap_or(0);
        if let Some(widths) = font
            .get(b"Widths")
            .ok()
            .and_then(|o| self.resolve(o))
            .and_then(|o| o.as_array().ok())
        {
            metrics.widths = widths
                .iter()
                .map(|w| self.resolve_number(w).unwrap_or(0.0))
                .collect();
        }
        metrics.missing_width = font
            .get(b"FontDescriptor")
            .ok()
            .and_then(|o| self.resolve_dict(o))
            .and_then(|d| d.get(b"MissingWidth").ok())
            .and_then(|o| self.resolve_number(o))
            .filter(|w| *w > 0.0);

        metrics
    }

    /// Parse a CID `/W` array: `c [w1 w2 ...]` or `c_first c_last w`.
    fn parse_cid_widths(&self, w: &[Object]) -> HashMap<u32, f32> {
        let mut widths = HashMap::new();
        let mut i = 0;
        while i < w.len() {
            let Some(start) = self.resolve_number(&w[i]) else {
                break;
            };
            let start = start.max(0.0) as u32;
            match w.get(i + 1).and_then(|o| self.resolve(o)) {
                Some(Object::Array(list)) => {
                    for (offset, width) in list.iter().enumerate() {
                        let Some(cid) = u32::try_from(offset)
                            .ok()
                            .and_then(|o| start.checked_add(o))
                        else {
                            break;
                        };
                        if let Some(width) = self.resolve_number(width) {
                            widths.insert(cid, width);
                        }
                    }
                    i += 2;
                }
                Some(end) => {
                    let end = object_number(end).unwrap_or(0.0).max(0.0) as u32;
                    let width = w.get(i + 2).and_then(|o| self.resolve_number(o));
                    if let Some(width) = width {
                        for cid in start..=end.min(start.saturating_add(0xFFFF)) {
                            widths.insert(cid, width);
                        }
                    }
                    i += 3;
                }
                None => break,
            }
        }
        widths
    }

    fn info_string(&self, info: &Dictionary, key: &[u8]) -> Option<String> {
        match info.get(key).ok().and_then(|o| self.resolve(o))? {
            Object::String(bytes, _) => {
                let s = decode_text_simple(bytes);
                let s = s.trim().to_string();
                (!s.is_empty()).then_some(s)
            }
            Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).to_string()),
            _ => None,
        }
    }

    fn link_uri(&self, annot: &Dictionary) -> Option<String> {
        let action = self.resolve_dict(annot.get(b"A").ok()?)?;
        match action.get(b"S").ok().and_then(|o| self.resolve(o)) {
            Some(Object::Name(name)) if name.as_slice() == b"URI" => {}
            _ => return None,
        }
        match self.resolve(action.get(b"URI").ok()?)? {
            Object::String(bytes, _) => {
                let uri = decode_text_simple(bytes).trim().to_string();
                (!uri.is_empty()).then_some(uri)
            }
            _ => None,
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_box(&self, page: PageId) -> PageBox {
        let numbers: Option<Vec<f32>> = self
            .inherited(page, b"MediaBox")
            .and_then(|o| o.as_array().ok())
            .map(|arr| arr.iter().filter_map(|v| self.resolve_number(v)).collect());

        match numbers.as_deref() {
            Some([x0, y0, x1, y1, ..]) => {
                let b = PageBox::from_corners(*x0, *y0, *x1, *y1);
                if b.width() > 0.0 && b.height() > 0.0 {
                    b
                } else {
                    PageBox::LETTER
                }
            }
            _ => PageBox::LETTER,
        }
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>> {
        let lopdf_fonts = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut result = Vec::with_capacity(lopdf_fonts.len());
        for (name, font_dict) in &lopdf_fonts {
            let base_font = font_dict
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            let subtype = font_dict
                .get(b"Subtype")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_default();
            let metrics = self.font_metrics(font_dict, &subtype);
            result.push(BackendFontInfo {
                name: name.clone(),
                base_font,
                subtype,
                metrics,
            });
        }
        Ok(result)
    }

    fn page_content(&self, page_id: PageId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(c) => c,
            // A page without content is blank, not broken
            Err(_) => return Ok(Vec::new()),
        };

        let stream_bytes = |obj: &Object| -> Option<Vec<u8>> {
            match self.resolve(obj)? {
                Object::Stream(s) => s.decompressed_content().ok().or_else(|| Some(s.content.clone())),
                _ => None,
            }
        };

        match self.resolve(contents) {
            Some(Object::Array(arr)) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Some(data) = stream_bytes(obj) {
                        content.extend_from_slice(&data);
                        content.push(b' ');
                    }
                }
                Ok(content)
            }
            Some(Object::Stream(_)) => stream_bytes(contents)
                .ok_or_else(|| Error::PdfParse("Invalid content stream".to_string())),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content =
            lopdf::content::Content::decode(data).map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        if let Ok(lopdf_fonts) = self.doc.get_page_fonts(page) {
            if let Some(font_dict) = lopdf_fonts.get(font_name) {
                if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                    if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                        return text;
                    }
                }
            }
        }
        decode_text_simple(bytes)
    }

    fn page_links(&self, page: PageId) -> Result<Vec<LinkAnnotation>> {
        let page_dict = self
            .doc
            .get_dictionary(page)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let annots = match page_dict.get(b"Annots").ok().and_then(|o| self.resolve(o)) {
            Some(Object::Array(arr)) => arr,
            _ => return Ok(Vec::new()),
        };

        let mut links = Vec::new();
        for entry in annots {
            let Some(annot) = self.resolve_dict(entry) else {
                continue;
            };
            match annot.get(b"Subtype").ok().and_then(|o| self.resolve(o)) {
                Some(Object::Name(name)) if name.as_slice() == b"Link" => {}
                _ => continue,
            }
            let rect: Vec<f32> = match annot.get(b"Rect").ok().and_then(|o| self.resolve(o)) {
                Some(Object::Array(arr)) => {
                    arr.iter().filter_map(|v| self.resolve_number(v)).collect()
                }
                _ => continue,
            };
            let [x0, y0, x1, y1] = rect[..] else {
                continue;
            };
            if let Some(uri) = self.link_uri(annot) {
                links.push(LinkAnnotation {
                    uri,
                    rect: PageBox::from_corners(x0, y0, x1, y1),
                });
            }
        }
        Ok(links)
    }

    fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::with_version(self.version());
        metadata.page_count = self.doc.get_pages().len() as u32;
        metadata.encrypted = self.was_encrypted;

        let info = self
            .doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|o| self.resolve_dict(o));
        if let Some(info) = info {
            metadata.title = self.info_string(info, b"Title");
            metadata.author = self.info_string(info, b"Author");
            metadata.subject = self.info_string(info, b"Subject");
            metadata.keywords = self.info_string(info, b"Keywords");
            metadata.creator = self.info_string(info, b"Creator");
            metadata.producer = self.info_string(info, b"Producer");
            metadata.created = self
                .info_string(info, b"CreationDate")
                .and_then(|d| parse_pdf_date(&d));
            metadata.modified = self
                .info_string(info, b"ModDate")
                .and_then(|d| parse_pdf_date(&d));
        }

        metadata
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

fn object_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Helper: extract a number from a [`PdfValue`].
pub fn get_number_from_value(val: &PdfValue) -> Option<f32> {
    match val {
        PdfValue::Integer(i) => Some(*i as f32),
        PdfValue::Real(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_text_simple_latin1() {
        // 0xE9 = 'é' in Latin-1
        let bytes = vec![0x48, 0x65, 0x6C, 0x6C, 0xE9];
        assert_eq!(decode_text_simple(&bytes), "Hellé");
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        let bytes = vec![0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }

    #[test]
    fn test_get_number_from_value() {
        assert_eq!(get_number_from_value(&PdfValue::Integer(42)), Some(42.0));
        assert_eq!(get_number_from_value(&PdfValue::Real(2.5)), Some(2.5));
        assert_eq!(get_number_from_value(&PdfValue::Other), None);
    }

    #[test]
    fn test_page_box_from_corners() {
        let b = PageBox::from_corners(612.0, 792.0, 0.0, 0.0);
        assert_eq!(b.width(), 612.0);
        assert_eq!(b.height(), 792.0);
        assert_eq!(b.bottom, 0.0);
    }

    #[test]
    fn test_simple_font_widths() {
        let metrics = FontMetrics {
            first_char: 65,
            widths: vec![600.0, 0.0, 700.0],
            missing_width: Some(250.0),
            ..Default::default()
        };
        assert_eq!(metrics.width_of(65), 600.0);
        assert_eq!(metrics.width_of(66), 250.0);
        assert_eq!(metrics.width_of(67), 700.0);
        assert_eq!(metrics.width_of(10), 250.0);
        assert_eq!(FontMetrics::default().width_of(65), DEFAULT_GLYPH_WIDTH);
    }

    #[test]
    fn test_composite_font_codes() {
        let mut metrics = FontMetrics {
            composite: true,
            default_cid_width: Some(1000.0),
            ..Default::default()
        };
        metrics.cid_widths.insert(0x0102, 480.0);
        assert_eq!(metrics.codes(&[0x01, 0x02, 0x00, 0x03]), vec![0x0102, 0x0003]);
        assert_eq!(metrics.width_of(0x0102), 480.0);
        assert_eq!(metrics.width_of(0x0003), 1000.0);
    }

    #[test]
    fn test_parse_cid_widths_both_forms() {
        let backend = LopdfBackend {
            doc: LopdfDocument::with_version("1.7"),
            was_encrypted: false,
        };
        let w = vec![
            Object::Integer(1),
            Object::Array(vec![Object::Integer(500), Object::Integer(600)]),
            Object::Integer(10),
            Object::Integer(12),
            Object::Real(300.0),
        ];
        let widths = backend.parse_cid_widths(&w);
        assert_eq!(widths.get(&1), Some(&500.0));
        assert_eq!(widths.get(&2), Some(&600.0));
        assert_eq!(widths.get(&11), Some(&300.0));
        assert_eq!(widths.get(&13), None);

        // A start at the top of the CID space keeps the first width and
        // drops the ones that would wrap.
        let w = vec![
            Object::Integer(u32::MAX as i64),
            Object::Array(vec![Object::Integer(500), Object::Integer(600)]),
        ];
        let widths = backend.parse_cid_widths(&w);
        assert_eq!(widths.len(), 1);
        assert_eq!(widths.get(&u32::MAX), Some(&500.0));
        assert_eq!(widths.get(&0), None);
    }

    #[test]
    fn test_inherited_media_box() {
        let mut doc = LopdfDocument::with_version("1.7");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::from(page_id)],
                "Count" => 1i64,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );

        let backend = LopdfBackend {
            doc,
            was_encrypted: false,
        };
        let b = backend.page_box(page_id);
        assert_eq!(b.width(), 595.0);
        assert_eq!(b.height(), 842.0);
    }
}
