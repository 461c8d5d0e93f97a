//! Capabilities supplied by the embedding application.
//!
//! The layout core never rasterizes glyphs or touches pixels. It asks a
//! [`FontEngine`] to create fonts and measure text, and hands opaque glyph
//! runs to a [`Renderer`] along with a position and clip rectangle.

use super::types::{FontFamily, FontStyle};
use crate::common::{Color, Point, Rect};

/// Font engine interface version this crate is written against.
pub const FONT_ENGINE_VERSION: u32 = 1;

/// Parameters for realizing a font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontRequest<'a> {
    /// Face name from the font table; empty when asking for a fallback
    pub name: &'a str,
    pub family: FontFamily,
    /// Windows character set number (`\fcharset`)
    pub charset: i32,
    /// Size in points
    pub size: i32,
    pub style: FontStyle,
}

/// Cumulative offsets for each character boundary of a text.
///
/// Both vectors hold one entry per character plus a final entry: the first
/// entry is 0 and the last is the total byte length (respectively total
/// pixel width). Values never decrease.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharacterOffsets {
    pub bytes: Vec<usize>,
    pub pixels: Vec<i32>,
}

impl CharacterOffsets {
    /// Number of characters measured.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len().saturating_sub(1)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total pixel width.
    #[inline]
    pub fn width(&self) -> i32 {
        self.pixels.last().copied().unwrap_or(0)
    }

    /// Whether these offsets describe `text`: matching lengths, both starting
    /// at 0, never decreasing, bytes on character boundaries and ending at
    /// `text.len()`.
    pub fn is_valid_for(&self, text: &str) -> bool {
        if self.bytes.len() != self.pixels.len()
            || self.bytes.first() != Some(&0)
            || self.pixels.first() != Some(&0)
            || self.bytes.last() != Some(&text.len())
        {
            return false;
        }
        self.bytes.windows(2).all(|pair| pair[0] <= pair[1])
            && self.pixels.windows(2).all(|pair| pair[0] <= pair[1])
            && self.bytes.iter().all(|&index| text.is_char_boundary(index))
    }
}

/// Creates, measures and renders fonts.
pub trait FontEngine {
    /// A realized font handle. Handles are resources: every handle returned
    /// by [`create_font`](FontEngine::create_font) is passed back to
    /// [`free_font`](FontEngine::free_font) exactly once.
    type Font;
    /// Renderable text produced by [`render_text`](FontEngine::render_text).
    type GlyphRun;

    /// Interface version implemented. Must equal [`FONT_ENGINE_VERSION`].
    fn version(&self) -> u32;

    /// Realize a font, or `None` if no matching font exists.
    fn create_font(&mut self, request: &FontRequest<'_>) -> Option<Self::Font>;

    /// Release a font created by this engine.
    fn free_font(&mut self, font: Self::Font);

    /// Line height in pixels.
    fn line_spacing(&self, font: &Self::Font) -> i32;

    /// Measure every character boundary of `text`.
    fn character_offsets(&self, font: &Self::Font, text: &str) -> CharacterOffsets;

    /// Render `text` for drawing. `None` skips the segment.
    fn render_text(&mut self, font: &Self::Font, text: &str, color: Color)
    -> Option<Self::GlyphRun>;
}

/// Draws glyph runs produced by a [`FontEngine`].
pub trait Renderer<G> {
    /// Area used when rendering without an explicit rectangle.
    fn viewport(&self) -> Rect;

    /// Draw `glyphs` with its top-left corner at `position`, clipped to `clip`.
    fn draw(&mut self, glyphs: &G, position: Point, clip: Rect);
}
