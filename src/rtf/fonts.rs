//! Font and color tables.
//!
//! Font handles realized through the [`FontEngine`] live in an arena owned by
//! the [`FontTable`]; text runs refer to them by [`FontId`]. Clearing the
//! table hands every handle back to the engine.

use super::engine::{FontEngine, FontRequest};
use super::error::{RtfError, RtfResult};
use super::types::{FontFamily, FontStyle};
use crate::common::Color;
use smallvec::SmallVec;

/// Index of a realized font in its [`FontTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(usize);

#[derive(Debug, Clone, Copy)]
struct CachedFont {
    size: i32,
    style: FontStyle,
    id: FontId,
}

type FontCache = SmallVec<[CachedFont; 4]>;

fn cached(cache: &FontCache, size: i32, style: FontStyle) -> Option<FontId> {
    cache
        .iter()
        .find(|font| font.size == size && font.style == style)
        .map(|font| font.id)
}

/// One `\fonttbl` entry.
#[derive(Debug, Clone)]
pub struct FontEntry {
    /// Font number referenced by `\f`
    pub id: i32,
    pub name: String,
    pub family: FontFamily,
    pub charset: i32,
    cache: FontCache,
}

impl FontEntry {
    pub fn new(id: i32, name: impl Into<String>, family: FontFamily, charset: i32) -> Self {
        Self {
            id,
            name: name.into(),
            family,
            charset,
            cache: SmallVec::new(),
        }
    }
}

/// Fonts declared by the document plus every handle realized from them.
#[derive(Debug)]
pub struct FontTable<F> {
    entries: Vec<FontEntry>,
    fallback: FontCache,
    handles: Vec<F>,
}

impl<F> Default for FontTable<F> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            fallback: SmallVec::new(),
            handles: Vec::new(),
        }
    }
}

impl<F> FontTable<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: FontEntry) {
        log::debug!(
            "font {} = {:?} ({:?}, charset {})",
            entry.id,
            entry.name,
            entry.family,
            entry.charset
        );
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[FontEntry] {
        &self.entries
    }

    /// Number of realized handles.
    #[inline]
    pub fn realized(&self) -> usize {
        self.handles.len()
    }

    #[inline]
    pub fn get(&self, id: FontId) -> Option<&F> {
        self.handles.get(id.0)
    }

    /// Entry used for font number `id`: the entry itself, else the first
    /// default-family entry, else the first entry.
    fn entry_index(&self, id: i32) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.id == id)
            .or_else(|| {
                self.entries
                    .iter()
                    .position(|entry| entry.family == FontFamily::Default)
            })
            .or_else(|| (!self.entries.is_empty()).then_some(0))
    }

    /// Realized handle for font number `id` at `size` points and `style`,
    /// creating it on first use.
    pub fn resolve<E>(
        &mut self,
        engine: &mut E,
        id: i32,
        size: i32,
        style: FontStyle,
    ) -> RtfResult<FontId>
    where
        E: FontEngine<Font = F>,
    {
        match self.entry_index(id) {
            Some(index) => {
                if let Some(found) = cached(&self.entries[index].cache, size, style) {
                    return Ok(found);
                }
                let entry = &self.entries[index];
                let request = FontRequest {
                    name: &entry.name,
                    family: entry.family,
                    charset: entry.charset,
                    size,
                    style,
                };
                let font = engine.create_font(&request).ok_or(RtfError::FontNotFound)?;
                let font_id = self.store(font);
                self.entries[index].cache.push(CachedFont {
                    size,
                    style,
                    id: font_id,
                });
                Ok(font_id)
            },
            None => {
                if let Some(found) = cached(&self.fallback, size, style) {
                    return Ok(found);
                }
                let request = FontRequest {
                    name: "",
                    family: FontFamily::Default,
                    charset: 0,
                    size,
                    style,
                };
                let font = engine.create_font(&request).ok_or(RtfError::FontNotFound)?;
                log::debug!("no font table; using engine fallback at {size}pt");
                let font_id = self.store(font);
                self.fallback.push(CachedFont {
                    size,
                    style,
                    id: font_id,
                });
                Ok(font_id)
            },
        }
    }

    fn store(&mut self, font: F) -> FontId {
        self.handles.push(font);
        FontId(self.handles.len() - 1)
    }

    /// Drop every entry and free every realized handle through `engine`.
    pub fn clear<E>(&mut self, engine: &mut E)
    where
        E: FontEngine<Font = F>,
    {
        log::debug!("releasing {} font handles", self.realized());
        for font in self.handles.drain(..) {
            engine.free_font(font);
        }
        self.entries.clear();
        self.fallback.clear();
    }
}

/// `\colortbl` entries in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorTable {
    colors: Vec<Color>,
}

impl ColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, color: Color) {
        self.colors.push(color);
    }

    /// Color at `index`; black when out of range.
    pub fn get(&self, index: u8) -> Color {
        match self.colors.get(usize::from(index)) {
            Some(color) => *color,
            None => {
                if !self.colors.is_empty() {
                    log::warn!(
                        "color index {index} out of range ({} colors); using black",
                        self.colors.len()
                    );
                }
                Color::black()
            },
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn clear(&mut self) {
        self.colors.clear();
    }
}
