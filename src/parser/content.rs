//! Content-stream interpretation into positioned text runs.
//!
//! Tracks the graphics state stack (`q`/`Q`, `cm`), fill colour and the
//! text state (`Tf`, `Tc`, `Tw`, `Tz`, `TL`, `Ts`, text and line matrices).
//! Each show operator yields one run positioned at the text rendering
//! matrix's origin, converted to top-down page coordinates.

use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;

use super::backend::{get_number_from_value, ContentOp, FontMetrics, PageBox, PdfValue};
use crate::model::{PositionedTextRun, RgbHex};

/// TJ adjustments beyond this (1/1000 em, leftward) read as a word space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Font size assumed before any `Tf`.
const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Runs smaller than this are treated as invisible.
const MIN_FONT_SIZE: f32 = 0.1;

/// Nesting limit for `q` so malformed streams cannot grow the stack unbounded.
const MAX_STATE_DEPTH: usize = 256;

/// A page font as seen by the interpreter.
#[derive(Debug, Clone, Default)]
pub struct PageFont {
    /// Base font name
    pub base_font: String,
    /// Advance widths
    pub metrics: FontMetrics,
    /// Bold face inferred from the name
    pub bold: bool,
    /// Italic face inferred from the name
    pub italic: bool,
}

/// A 2D affine transform `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Matrix {
    /// The identity transform.
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Build from six components.
    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// A translation.
    pub fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self × other` (apply `self` first, then `other`).
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Transform a point.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Length of the transformed unit x vector.
    pub fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    /// Length of the transformed unit y vector.
    pub fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    fill: RgbHex,
    font: Option<Vec<u8>>,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scaling: f32,
    leading: f32,
    rise: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            fill: RgbHex::black(),
            font: None,
            font_size: DEFAULT_FONT_SIZE,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scaling: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

/// Pending text collected across the strings of one show operator.
struct ShowRun {
    text: String,
    origin: Matrix,
    advance: f32,
}

/// Interprets decoded content operations for one page.
pub struct ContentInterpreter<'a> {
    fonts: &'a HashMap<Vec<u8>, PageFont>,
    decode: &'a dyn Fn(&[u8], &[u8]) -> String,
    page_box: PageBox,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    in_text: bool,
    runs: Vec<PositionedTextRun>,
}

impl<'a> ContentInterpreter<'a> {
    /// Create an interpreter.
    ///
    /// `decode` maps `(font resource name, string bytes)` to Unicode text.
    pub fn new(
        fonts: &'a HashMap<Vec<u8>, PageFont>,
        decode: &'a dyn Fn(&[u8], &[u8]) -> String,
        page_box: PageBox,
    ) -> Self {
        Self {
            fonts,
            decode,
            page_box,
            state: GraphicsState::default(),
            stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            in_text: false,
            runs: Vec::new(),
        }
    }

    /// Run all operations and return the runs in stream order.
    pub fn run(mut self, ops: &[ContentOp]) -> Vec<PositionedTextRun> {
        for op in ops {
            self.execute(op);
        }
        self.runs
    }

    fn execute(&mut self, op: &ContentOp) {
        let nums: Vec<f32> = op
            .operands
            .iter()
            .filter_map(get_number_from_value)
            .collect();

        match op.operator.as_str() {
            "q" => {
                if self.stack.len() < MAX_STATE_DEPTH {
                    self.stack.push(self.state.clone());
                }
            }
            "Q" => {
                if let Some(saved) = self.stack.pop() {
                    self.state = saved;
                }
            }
            "cm" => {
                if let [a, b, c, d, e, f, ..] = nums[..] {
                    self.state.ctm = Matrix::new(a, b, c, d, e, f).multiply(&self.state.ctm);
                }
            }
            "rg" => {
                if let [r, g, b, ..] = nums[..] {
                    self.state.fill = RgbHex::from_unit_rgb(r, g, b);
                }
            }
            "g" => {
                if let [gray, ..] = nums[..] {
                    self.state.fill = RgbHex::from_gray(gray);
                }
            }
            "k" => {
                if let [c, m, y, k, ..] = nums[..] {
                    self.state.fill = RgbHex::from_cmyk(c, m, y, k);
                }
            }
            "sc" | "scn" => match nums[..] {
                [gray] => self.state.fill = RgbHex::from_gray(gray),
                [r, g, b] => self.state.fill = RgbHex::from_unit_rgb(r, g, b),
                [c, m, y, k] => self.state.fill = RgbHex::from_cmyk(c, m, y, k),
                // Pattern or indexed colour: keep the current fill
                _ => {}
            },
            "BT" => {
                self.in_text = true;
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "ET" => {
                self.in_text = false;
            }
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    self.state.font = Some(name.clone());
                }
                if let Some(size) = op.operands.get(1).and_then(get_number_from_value) {
                    self.state.font_size = size;
                }
            }
            "Tc" => {
                if let [v, ..] = nums[..] {
                    self.state.char_spacing = v;
                }
            }
            "Tw" => {
                if let [v, ..] = nums[..] {
                    self.state.word_spacing = v;
                }
            }
            "Tz" => {
                if let [v, ..] = nums[..] {
                    self.state.horizontal_scaling = v / 100.0;
                }
            }
            "TL" => {
                if let [v, ..] = nums[..] {
                    self.state.leading = v;
                }
            }
            "Ts" => {
                if let [v, ..] = nums[..] {
                    self.state.rise = v;
                }
            }
            "Td" => {
                if let [tx, ty, ..] = nums[..] {
                    self.move_line(tx, ty);
                }
            }
            "TD" => {
                if let [tx, ty, ..] = nums[..] {
                    self.state.leading = -ty;
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let [a, b, c, d, e, f, ..] = nums[..] {
                    self.line_matrix = Matrix::new(a, b, c, d, e, f);
                    self.text_matrix = self.line_matrix;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    self.show(&[PdfValue::Str(bytes.clone())]);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    self.show(items);
                }
            }
            "'" => {
                self.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    self.show(&[PdfValue::Str(bytes.clone())]);
                }
            }
            "\"" => {
                if let [aw, ac, ..] = nums[..] {
                    self.state.word_spacing = aw;
                    self.state.char_spacing = ac;
                }
                self.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.get(2) {
                    self.show(&[PdfValue::Str(bytes.clone())]);
                }
            }
            _ => {}
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).multiply(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.state.leading;
        self.move_line(0.0, -leading);
    }

    /// Show strings and TJ adjustments as one run.
    fn show(&mut self, items: &[PdfValue]) {
        if !self.in_text {
            return;
        }

        let font_name = self.state.font.clone().unwrap_or_default();
        let font = self.fonts.get(&font_name).cloned().unwrap_or_default();
        let fs = self.state.font_size;
        let th = self.state.horizontal_scaling;

        let mut pending = ShowRun {
            text: String::new(),
            origin: self.text_matrix,
            advance: 0.0,
        };

        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    let decoded = (self.decode)(font_name.as_slice(), bytes);
                    pending.text.push_str(&decoded);

                    let mut tx = 0.0;
                    for code in font.metrics.codes(bytes) {
                        let w0 = font.metrics.width_of(code) / 1000.0;
                        let word = if !font.metrics.composite && code == 32 {
                            self.state.word_spacing
                        } else {
                            0.0
                        };
                        tx += (w0 * fs + self.state.char_spacing + word) * th;
                    }
                    self.advance(tx);
                    pending.advance += tx;
                }
                PdfValue::Integer(_) | PdfValue::Real(_) => {
                    let n = get_number_from_value(item).unwrap_or(0.0);
                    let tx = -n / 1000.0 * fs * th;
                    self.advance(tx);
                    pending.advance += tx;

                    if -n > TJ_SPACE_THRESHOLD
                        && !pending.text.is_empty()
                        && !pending.text.ends_with(char::is_whitespace)
                        && !pending
                            .text
                            .chars()
                            .last()
                            .is_some_and(crate::model::is_spaceless_script_char)
                    {
                        pending.text.push(' ');
                    }
                }
                _ => {}
            }
        }

        self.emit(pending, &font);
    }

    fn advance(&mut self, tx: f32) {
        self.text_matrix = Matrix::translation(tx, 0.0).multiply(&self.text_matrix);
    }

    fn emit(&mut self, pending: ShowRun, font: &PageFont) {
        let text: String = pending.text.nfkc().collect();
        if text.trim().is_empty() {
            return;
        }

        let trm = pending.origin.multiply(&self.state.ctm);
        let size = (self.state.font_size * trm.vertical_scale()).abs();
        if size < MIN_FONT_SIZE {
            return;
        }

        let (dx, dy) = trm.apply(0.0, self.state.rise);
        let width = (pending.advance * trm.horizontal_scale()).abs();

        let mut run = PositionedTextRun::new(
            text,
            dx - self.page_box.left,
            self.page_box.top - dy,
            width,
            size,
        )
        .with_color(self.state.fill.clone());
        run.bold = font.bold;
        run.italic = font.italic;
        self.runs.push(run);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(operator: &str, operands: Vec<PdfValue>) -> ContentOp {
        ContentOp {
            operator: operator.to_string(),
            operands,
        }
    }

    fn num(v: f32) -> PdfValue {
        PdfValue::Real(v)
    }

    fn s(text: &str) -> PdfValue {
        PdfValue::Str(text.as_bytes().to_vec())
    }

    fn fonts() -> HashMap<Vec<u8>, PageFont> {
        let mut fonts = HashMap::new();
        fonts.insert(
            b"F1".to_vec(),
            PageFont {
                base_font: "Helvetica".into(),
                ..Default::default()
            },
        );
        fonts.insert(
            b"F2".to_vec(),
            PageFont {
                base_font: "Helvetica-Bold".into(),
                bold: true,
                ..Default::default()
            },
        );
        fonts
    }

    fn interpret(ops: Vec<ContentOp>) -> Vec<PositionedTextRun> {
        let fonts = fonts();
        let decode = |_: &[u8], bytes: &[u8]| String::from_utf8_lossy(bytes).to_string();
        ContentInterpreter::new(&fonts, &decode, PageBox::LETTER).run(&ops)
    }

    #[test]
    fn test_matrix_multiply_translation() {
        let m = Matrix::translation(10.0, 20.0).multiply(&Matrix::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0));
        assert_eq!(m.apply(0.0, 0.0), (20.0, 40.0));
        assert_eq!(m.vertical_scale(), 2.0);
    }

    #[test]
    fn test_simple_show_position_and_width() {
        let runs = interpret(vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F2".to_vec()), num(16.0)]),
            op("Td", vec![num(72.0), num(700.0)]),
            op("Tj", vec![s("RESUME")]),
            op("ET", vec![]),
        ]);

        assert_eq!(runs.len(), 1);
        let run = &runs[0];
        assert_eq!(run.text, "RESUME");
        assert_eq!(run.x, 72.0);
        assert_eq!(run.y, 92.0);
        assert_eq!(run.font_size, 16.0);
        assert!(run.bold);
        // 6 glyphs at the default half-em width
        assert_eq!(run.width, 48.0);
    }

    #[test]
    fn test_consecutive_shows_advance() {
        let runs = interpret(vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F1".to_vec()), num(10.0)]),
            op("Td", vec![num(0.0), num(700.0)]),
            op("Tj", vec![s("ab")]),
            op("Tj", vec![s("cd")]),
            op("ET", vec![]),
        ]);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].x, 10.0);
    }

    #[test]
    fn test_tj_kerning_inserts_space() {
        let runs = interpret(vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F1".to_vec()), num(10.0)]),
            op(
                "TJ",
                vec![PdfValue::Array(vec![
                    s("Jane"),
                    PdfValue::Integer(-250),
                    s("Doe"),
                    PdfValue::Integer(-50),
                    s("s"),
                ])],
            ),
            op("ET", vec![]),
        ]);
        assert_eq!(runs[0].text, "Jane Does");
    }

    #[test]
    fn test_fill_colour_and_state_stack() {
        let runs = interpret(vec![
            op("q", vec![]),
            op("rg", vec![num(1.0), num(0.0), num(0.0)]),
            op("BT", vec![]),
            op("Tj", vec![s("red")]),
            op("ET", vec![]),
            op("Q", vec![]),
            op("BT", vec![]),
            op("Tj", vec![s("black")]),
            op("ET", vec![]),
        ]);
        assert_eq!(runs[0].color.as_str(), "#FF0000");
        assert_eq!(runs[1].color.as_str(), "#000000");
    }

    #[test]
    fn test_ctm_scales_font_size() {
        let runs = interpret(vec![
            op("cm", vec![num(2.0), num(0.0), num(0.0), num(2.0), num(0.0), num(0.0)]),
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F1".to_vec()), num(8.0)]),
            op("Tm", vec![num(1.0), num(0.0), num(0.0), num(1.0), num(10.0), num(300.0)]),
            op("Tj", vec![s("x")]),
            op("ET", vec![]),
        ]);
        assert_eq!(runs[0].font_size, 16.0);
        assert_eq!(runs[0].x, 20.0);
        assert_eq!(runs[0].y, 192.0);
    }

    #[test]
    fn test_next_line_uses_leading() {
        let runs = interpret(vec![
            op("BT", vec![]),
            op("TL", vec![num(14.0)]),
            op("Td", vec![num(50.0), num(700.0)]),
            op("Tj", vec![s("one")]),
            op("'", vec![s("two")]),
            op("ET", vec![]),
        ]);
        assert_eq!(runs[1].y - runs[0].y, 14.0);
        assert_eq!(runs[1].x, 50.0);
    }

    #[test]
    fn test_whitespace_and_outside_bt_are_dropped() {
        let runs = interpret(vec![
            op("Tj", vec![s("outside")]),
            op("BT", vec![]),
            op("Tj", vec![s("   ")]),
            op("ET", vec![]),
        ]);
        assert!(runs.is_empty());
    }

    #[test]
    fn test_ligatures_are_normalized() {
        let runs = interpret(vec![
            op("BT", vec![]),
            op("Tj", vec![s("\u{FB01}nance")]),
            op("ET", vec![]),
        ]);
        assert_eq!(runs[0].text, "finance");
    }
}
