//! Deterministic engine and renderer for tests.

use super::engine::{CharacterOffsets, FONT_ENGINE_VERSION, FontEngine, FontRequest, Renderer};
use super::types::{FontFamily, FontStyle};
use crate::common::{Color, Point, Rect};
use std::cell::RefCell;
use std::rc::Rc;

/// Pixels per character.
pub const ADVANCE: i32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestFont {
    pub serial: usize,
    pub name: String,
    pub family: FontFamily,
    pub charset: i32,
    pub size: i32,
    pub style: FontStyle,
}

#[derive(Debug, Default)]
struct Counters {
    created: usize,
    freed: Vec<usize>,
}

/// Every character is `ADVANCE` pixels wide and the line spacing equals the
/// point size. Counters are shared between clones so a test can keep a
/// handle after moving the engine into a context.
#[derive(Debug, Clone)]
pub struct FixedPitchEngine {
    version: u32,
    fallback: bool,
    truncate_offsets: bool,
    counters: Rc<RefCell<Counters>>,
}

impl Default for FixedPitchEngine {
    fn default() -> Self {
        Self {
            version: FONT_ENGINE_VERSION,
            fallback: true,
            truncate_offsets: false,
            counters: Rc::default(),
        }
    }
}

impl FixedPitchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse requests with an empty font name.
    pub fn without_fallback(mut self) -> Self {
        self.fallback = false;
        self
    }

    /// Measure text without the final boundary entry.
    pub fn with_truncated_offsets(mut self) -> Self {
        self.truncate_offsets = true;
        self
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn created(&self) -> usize {
        self.counters.borrow().created
    }

    pub fn freed(&self) -> usize {
        self.counters.borrow().freed.len()
    }
}

impl FontEngine for FixedPitchEngine {
    type Font = TestFont;
    type GlyphRun = (String, Color);

    fn version(&self) -> u32 {
        self.version
    }

    fn create_font(&mut self, request: &FontRequest<'_>) -> Option<TestFont> {
        if request.name.is_empty() && !self.fallback {
            return None;
        }
        let mut counters = self.counters.borrow_mut();
        counters.created += 1;
        Some(TestFont {
            serial: counters.created,
            name: request.name.to_owned(),
            family: request.family,
            charset: request.charset,
            size: request.size,
            style: request.style,
        })
    }

    fn free_font(&mut self, font: TestFont) {
        let mut counters = self.counters.borrow_mut();
        assert!(
            !counters.freed.contains(&font.serial),
            "font {} freed twice",
            font.serial
        );
        counters.freed.push(font.serial);
    }

    fn line_spacing(&self, font: &TestFont) -> i32 {
        font.size
    }

    fn character_offsets(&self, _font: &TestFont, text: &str) -> CharacterOffsets {
        let mut offsets = CharacterOffsets::default();
        let mut width = 0;
        for (index, _) in text.char_indices() {
            offsets.bytes.push(index);
            offsets.pixels.push(width);
            width += ADVANCE;
        }
        if !self.truncate_offsets {
            offsets.bytes.push(text.len());
            offsets.pixels.push(width);
        }
        offsets
    }

    fn render_text(&mut self, _font: &TestFont, text: &str, color: Color) -> Option<(String, Color)> {
        Some((text.to_owned(), color))
    }
}

/// Records every draw call.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub viewport: Rect,
    pub draws: Vec<(String, Point, Rect)>,
}

impl RecordingRenderer {
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport,
            draws: Vec::new(),
        }
    }
}

impl Renderer<(String, Color)> for RecordingRenderer {
    fn viewport(&self) -> Rect {
        self.viewport
    }

    fn draw(&mut self, glyphs: &(String, Color), position: Point, clip: Rect) {
        self.draws.push((glyphs.0.clone(), position, clip));
    }
}
