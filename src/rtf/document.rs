//! Document model.
//!
//! A [`Document`] is an ordered list of [`Line`]s (one per paragraph or
//! line break), each holding the styled [`TextRun`]s added to it, plus the
//! info strings and the font and color tables. Layout fields on each line
//! are filled in by the reflow pass.

use super::engine::{CharacterOffsets, FontEngine};
use super::error::{RtfError, RtfResult};
use super::fonts::{ColorTable, FontEntry, FontId, FontTable};
use super::types::{CharacterFormat, ParagraphFormat};
use crate::common::Color;
use crate::common::unit::half_points_to_points;

/// A run of text sharing one realized font and color.
#[derive(Debug, Clone)]
pub struct TextRun {
    pub(super) text: String,
    pub(super) font: FontId,
    pub(super) color: Color,
    pub(super) tabs: u32,
    pub(super) offsets: CharacterOffsets,
    pub(super) line_height: i32,
    pub(super) format: CharacterFormat,
}

impl TextRun {
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn font(&self) -> FontId {
        self.font
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Tab stops to advance past before this run.
    #[inline]
    pub fn tabs(&self) -> u32 {
        self.tabs
    }

    #[inline]
    pub fn offsets(&self) -> &CharacterOffsets {
        &self.offsets
    }

    /// Native line height of the run's font, in pixels.
    #[inline]
    pub fn line_height(&self) -> i32 {
        self.line_height
    }

    /// Character format in effect when the run was added.
    #[inline]
    pub fn format(&self) -> &CharacterFormat {
        &self.format
    }

    /// Number of characters in the run.
    #[inline]
    pub fn char_count(&self) -> usize {
        self.offsets.len()
    }

    /// Text of characters `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> &str {
        let bytes = &self.offsets.bytes;
        match (bytes.get(start), bytes.get(end)) {
            (Some(&from), Some(&to)) => self.text.get(from..to).unwrap_or(""),
            _ => "",
        }
    }
}

/// A positioned piece of a run produced by reflow.
///
/// `x` is relative to the left edge of the layout area, `y` to the top of
/// the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Index of the run within its line
    pub run: usize,
    /// First character of the run covered
    pub start: usize,
    /// One past the last character covered
    pub end: usize,
    pub x: i32,
    pub y: i32,
}

/// Reflow results for one line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct LineLayout {
    pub(super) width: i32,
    pub(super) height: i32,
    pub(super) segments: Vec<Segment>,
}

/// One paragraph or line-break-delimited line of text.
#[derive(Debug, Clone)]
pub struct Line {
    pub(super) paragraph: ParagraphFormat,
    pub(super) base_height: i32,
    pub(super) pending_tabs: u32,
    pub(super) runs: Vec<TextRun>,
    pub(super) layout: LineLayout,
}

impl Line {
    fn new(paragraph: ParagraphFormat, base_height: i32) -> Self {
        Self {
            paragraph,
            base_height,
            pending_tabs: 0,
            runs: Vec::new(),
            layout: LineLayout {
                height: base_height,
                ..LineLayout::default()
            },
        }
    }

    #[inline]
    pub fn paragraph(&self) -> &ParagraphFormat {
        &self.paragraph
    }

    #[inline]
    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Line spacing of the font in effect when the line was opened.
    #[inline]
    pub fn base_height(&self) -> i32 {
        self.base_height
    }

    /// Widest row from the last reflow, in pixels.
    #[inline]
    pub fn width(&self) -> i32 {
        self.layout.width
    }

    /// Sum of row heights from the last reflow, in pixels.
    #[inline]
    pub fn height(&self) -> i32 {
        self.layout.height
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.layout.segments
    }

    /// Text covered by a segment of this line.
    pub fn segment_text(&self, segment: &Segment) -> &str {
        self.runs
            .get(segment.run)
            .map(|run| run.slice(segment.start, segment.end))
            .unwrap_or("")
    }
}

/// `\info` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    pub title: String,
    pub subject: String,
    pub author: String,
}

/// Parsed document plus its cached layout.
#[derive(Debug)]
pub struct Document<F> {
    pub(super) lines: Vec<Line>,
    pub(super) info: DocumentInfo,
    pub(super) fonts: FontTable<F>,
    pub(super) colors: ColorTable,
    pub(super) default_font_size: i32,
    pub(super) layout_width: Option<i32>,
    pub(super) height: i32,
}

impl<F> Document<F> {
    pub fn new(default_font_size: i32) -> Self {
        Self {
            lines: Vec::new(),
            info: DocumentInfo::default(),
            fonts: FontTable::new(),
            colors: ColorTable::new(),
            default_font_size,
            layout_width: None,
            height: 0,
        }
    }

    #[inline]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    #[inline]
    pub fn info(&self) -> &DocumentInfo {
        &self.info
    }

    #[inline]
    pub fn fonts(&self) -> &FontTable<F> {
        &self.fonts
    }

    #[inline]
    pub fn colors(&self) -> &ColorTable {
        &self.colors
    }

    /// Width the current layout was computed for, if any.
    #[inline]
    pub fn layout_width(&self) -> Option<i32> {
        self.layout_width
    }

    pub(super) fn add_font(&mut self, entry: FontEntry) {
        self.fonts.add(entry);
    }

    pub(super) fn add_color(&mut self, color: Color) {
        self.colors.push(color);
    }

    pub(super) fn set_default_font_size(&mut self, half_points: i32) {
        self.default_font_size = half_points;
    }

    fn resolve_font<E>(&mut self, engine: &mut E, chp: &CharacterFormat) -> RtfResult<FontId>
    where
        E: FontEngine<Font = F>,
    {
        let half_points = if chp.font_size > 0 {
            chp.font_size
        } else {
            self.default_font_size
        };
        self.fonts.resolve(
            engine,
            chp.font,
            half_points_to_points(half_points),
            chp.font_style(),
        )
    }

    fn font_handle(&self, id: FontId) -> RtfResult<&F> {
        self.fonts.get(id).ok_or(RtfError::FontNotFound)
    }

    /// Start a new line with the current paragraph format.
    pub fn add_line<E>(
        &mut self,
        engine: &mut E,
        chp: &CharacterFormat,
        pap: &ParagraphFormat,
    ) -> RtfResult<()>
    where
        E: FontEngine<Font = F>,
    {
        let id = self.resolve_font(engine, chp)?;
        let base_height = engine.line_spacing(self.font_handle(id)?);
        log::debug!("line {} added", self.lines.len());
        self.lines.push(Line::new(*pap, base_height));
        self.layout_width = None;
        Ok(())
    }

    /// Make sure a line is open to receive text.
    pub fn ensure_line<E>(
        &mut self,
        engine: &mut E,
        chp: &CharacterFormat,
        pap: &ParagraphFormat,
    ) -> RtfResult<()>
    where
        E: FontEngine<Font = F>,
    {
        if self.lines.is_empty() {
            self.add_line(engine, chp, pap)?;
        }
        Ok(())
    }

    /// Append a run of `text` to the open line.
    pub fn add_text<E>(
        &mut self,
        engine: &mut E,
        text: &str,
        chp: &CharacterFormat,
        pap: &ParagraphFormat,
    ) -> RtfResult<()>
    where
        E: FontEngine<Font = F>,
    {
        let font = self.resolve_font(engine, chp)?;
        self.ensure_line(engine, chp, pap)?;

        let handle = self.font_handle(font)?;
        let offsets = engine.character_offsets(handle, text);
        if !offsets.is_valid_for(text) {
            log::warn!("font engine offsets do not match {text:?}");
            return Err(RtfError::InvalidOffsets);
        }
        let line_height = engine.line_spacing(handle);
        let color = self.colors.get(chp.fg_color);

        let Some(line) = self.lines.last_mut() else {
            return Ok(());
        };
        log::debug!("text run added: {text:?} ({} tabs)", line.pending_tabs);
        line.runs.push(TextRun {
            text: text.to_owned(),
            font,
            color,
            tabs: line.pending_tabs,
            offsets,
            line_height,
            format: *chp,
        });
        line.paragraph = *pap;
        line.pending_tabs = 0;
        self.layout_width = None;
        Ok(())
    }

    /// Count a tab before the next run on the open line.
    pub fn add_tab<E>(
        &mut self,
        engine: &mut E,
        chp: &CharacterFormat,
        pap: &ParagraphFormat,
    ) -> RtfResult<()>
    where
        E: FontEngine<Font = F>,
    {
        self.ensure_line(engine, chp, pap)?;
        if let Some(line) = self.lines.last_mut() {
            line.pending_tabs += 1;
        }
        Ok(())
    }

    /// Set one of the `\info` strings.
    pub(super) fn set_info(&mut self, field: InfoField, text: String) {
        log::debug!("{field:?} = {text:?}");
        match field {
            InfoField::Title => self.info.title = text,
            InfoField::Subject => self.info.subject = text,
            InfoField::Author => self.info.author = text,
        }
    }

    /// Remove all content, releasing every realized font through `engine`.
    pub fn clear<E>(&mut self, engine: &mut E)
    where
        E: FontEngine<Font = F>,
    {
        self.lines.clear();
        self.info = DocumentInfo::default();
        self.fonts.clear(engine);
        self.colors.clear();
        self.layout_width = None;
        self.height = 0;
    }
}

/// Which `\info` string a destination fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum InfoField {
    Title,
    Subject,
    Author,
}
