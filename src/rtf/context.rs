//! Public entry point: load, query, lay out and render a document.

use super::document::Document;
use super::engine::{FONT_ENGINE_VERSION, FontEngine, Renderer};
use super::parser;
use super::render;
use crate::common::{Error, LayoutOptions, Rect, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// An RTF document bound to a font engine.
///
/// A context holds at most one document at a time. Loading replaces the
/// previous document and releases its fonts; dropping the context releases
/// the rest.
///
/// # Examples
///
/// ```rust,ignore
/// use rtflow::rtf::Context;
///
/// let mut ctx = Context::new(my_engine)?;
/// ctx.load_bytes(br"{\rtf1\ansi{\info{\title Notes}} Hello world}")?;
/// assert_eq!(ctx.title(), "Notes");
///
/// let height = ctx.height(640);
/// ctx.render(&mut my_renderer, None, 0);
/// ```
pub struct Context<E: FontEngine> {
    engine: E,
    options: LayoutOptions,
    doc: Document<E::Font>,
}

impl<E: FontEngine> Context<E> {
    /// Create a context with default layout options.
    ///
    /// Fails if the engine implements a different interface version.
    pub fn new(engine: E) -> Result<Self> {
        Self::with_options(engine, LayoutOptions::default())
    }

    pub fn with_options(engine: E, options: LayoutOptions) -> Result<Self> {
        let found = engine.version();
        if found != FONT_ENGINE_VERSION {
            return Err(Error::FontEngineVersion {
                expected: FONT_ENGINE_VERSION,
                found,
            });
        }

        Ok(Self {
            engine,
            options,
            doc: Document::new(options.default_font_size),
        })
    }

    #[inline]
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Replace the layout options.
    ///
    /// The next reflow recomputes the layout. `default_font_size` applies
    /// from the next load, since runs are measured when they are parsed.
    pub fn set_options(&mut self, options: LayoutOptions) {
        self.options = options;
        self.doc.invalidate_layout();
    }

    #[inline]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[inline]
    pub fn document(&self) -> &Document<E::Font> {
        &self.doc
    }

    /// Load an RTF file.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let file = File::open(path.as_ref())?;
        self.load_reader(BufReader::new(file))
    }

    /// Load RTF from `reader`, which is dropped when parsing finishes.
    ///
    /// Pass `&mut reader` to keep using the stream afterwards. On failure
    /// the text parsed before the error stays loaded and the context can be
    /// reused.
    pub fn load_reader<R: Read>(&mut self, reader: R) -> Result<()> {
        self.doc.clear(&mut self.engine);
        self.doc.set_default_font_size(self.options.default_font_size);

        match parser::parse(reader, &mut self.engine, &mut self.doc) {
            Ok(()) => {
                log::debug!("loaded {} lines", self.doc.lines().len());
                Ok(())
            },
            Err(e) => {
                log::warn!("RTF load failed: {e}");
                Err(e.into())
            },
        }
    }

    /// Load RTF from memory.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.load_reader(bytes)
    }

    /// Document title, or an empty string.
    #[inline]
    pub fn title(&self) -> &str {
        &self.doc.info().title
    }

    #[inline]
    pub fn subject(&self) -> &str {
        &self.doc.info().subject
    }

    #[inline]
    pub fn author(&self) -> &str {
        &self.doc.info().author
    }

    /// Height of the document laid out `width` pixels wide.
    pub fn height(&mut self, width: i32) -> i32 {
        self.doc.reflow(width, &self.options)
    }

    /// Draw the part of the document visible in `rect`, scrolled down by
    /// `y_offset` pixels. Uses the renderer's viewport when `rect` is `None`.
    pub fn render<R>(&mut self, renderer: &mut R, rect: Option<Rect>, y_offset: i32)
    where
        R: Renderer<E::GlyphRun>,
    {
        let rect = rect.unwrap_or_else(|| renderer.viewport());
        self.doc.reflow(rect.w, &self.options);

        for instruction in render::project(&self.doc, rect, y_offset) {
            let Some(line) = self.doc.lines().get(instruction.line) else {
                continue;
            };
            let Some(segment) = line.segments().get(instruction.segment) else {
                continue;
            };
            let Some(run) = line.runs().get(segment.run) else {
                continue;
            };
            let Some(font) = self.doc.fonts().get(run.font()) else {
                continue;
            };

            let text = line.segment_text(segment);
            if let Some(glyphs) = self.engine.render_text(font, text, run.color()) {
                renderer.draw(&glyphs, instruction.position, rect);
            }
        }
    }
}

impl<E: FontEngine> Drop for Context<E> {
    fn drop(&mut self) {
        self.doc.clear(&mut self.engine);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Point, TwipsRounding};
    use crate::rtf::error::RtfError;
    use crate::rtf::testing::{FixedPitchEngine, RecordingRenderer};
    use std::io::{Cursor, Write};

    fn context() -> (Context<FixedPitchEngine>, FixedPitchEngine) {
        let engine = FixedPitchEngine::new();
        let observer = engine.clone();
        (Context::new(engine).unwrap(), observer)
    }

    #[test]
    fn test_version_mismatch() {
        let engine = FixedPitchEngine::new().with_version(2);
        let err = Context::new(engine).err().unwrap();
        assert!(matches!(
            err,
            Error::FontEngineVersion {
                expected: 1,
                found: 2
            }
        ));
    }

    #[test]
    fn test_hello_world() {
        let (mut ctx, _) = context();
        ctx.load_bytes(br"{\rtf1\ansi Hello world}").unwrap();
        assert_eq!(ctx.title(), "");
        assert_eq!(ctx.subject(), "");
        assert_eq!(ctx.author(), "");

        let lines = ctx.document().lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].runs().len(), 1);
        assert_eq!(lines[0].runs()[0].text(), "Hello world");
        assert_eq!(ctx.height(500), 12);
    }

    #[test]
    fn test_info() {
        let (mut ctx, _) = context();
        ctx.load_bytes(br"{\rtf1{\info{\title T}{\subject S}{\author A}}x}")
            .unwrap();
        assert_eq!(ctx.title(), "T");
        assert_eq!(ctx.subject(), "S");
        assert_eq!(ctx.author(), "A");
    }

    #[test]
    fn test_failed_load_then_reload() {
        let (mut ctx, _) = context();
        let err = ctx.load_bytes(br"{\rtf1 unterminated").unwrap_err();
        assert!(matches!(err, Error::Rtf(RtfError::UnmatchedBrace)));
        assert_eq!(err.to_string(), "RTF ended during an open group");

        ctx.load_bytes(br"{\rtf1 fine}").unwrap();
        assert_eq!(ctx.document().lines()[0].runs()[0].text(), "fine");
    }

    #[test]
    fn test_stack_underflow() {
        let (mut ctx, _) = context();
        let err = ctx.load_bytes(b"{a}}").unwrap_err();
        assert!(matches!(err, Error::Rtf(RtfError::StackUnderflow)));
        assert_eq!(ctx.document().lines().len(), 1);
    }

    #[test]
    fn test_fonts_released_once() {
        let (mut ctx, observer) = context();
        ctx.load_bytes(br"{\rtf1{\fonttbl{\f0 A;}{\f1 B;}}a\f1 b\b c}").unwrap();
        assert_eq!(observer.created(), 3);
        assert_eq!(observer.freed(), 0);

        ctx.load_bytes(br"{x}").unwrap();
        assert_eq!(observer.freed(), 3);
        assert_eq!(observer.created(), 4);

        drop(ctx);
        assert_eq!(observer.freed(), 4);
    }

    #[test]
    fn test_center_scenario() {
        let (mut ctx, _) = context();
        ctx.load_bytes(br"{\qc Hi}").unwrap();

        let mut renderer = RecordingRenderer::new(Rect::new(0, 0, 100, 50));
        ctx.render(&mut renderer, None, 0);
        assert_eq!(renderer.draws.len(), 1);
        let (text, position, clip) = &renderer.draws[0];
        assert_eq!(text, "Hi");
        assert_eq!(*position, Point::new((100 - 20) / 2, 0));
        assert_eq!(*clip, Rect::new(0, 0, 100, 50));
    }

    #[test]
    fn test_tab_scenario() {
        let (mut ctx, _) = context();
        ctx.load_bytes(br"{a\tab b}").unwrap();
        ctx.height(400);
        let line = &ctx.document().lines()[0];
        assert_eq!(line.runs()[1].tabs(), 1);
        assert_eq!(line.segments()[1].x, 36);

        ctx.set_options(LayoutOptions::new().with_tab_stop_twips(1440));
        ctx.height(400);
        assert_eq!(ctx.document().lines()[0].segments()[1].x, 72);
    }

    #[test]
    fn test_render_wraps_and_scrolls() {
        let (mut ctx, _) = context();
        ctx.load_bytes(br"{aaaa bbbb\par cc}").unwrap();

        let mut renderer = RecordingRenderer::new(Rect::default());
        ctx.render(&mut renderer, Some(Rect::new(10, 20, 70, 100)), 0);
        let drawn: Vec<(&str, Point)> = renderer
            .draws
            .iter()
            .map(|(text, position, _)| (text.as_str(), *position))
            .collect();
        assert_eq!(
            drawn,
            vec![
                ("aaaa ", Point::new(10, 20)),
                ("bbbb", Point::new(10, 32)),
                ("cc", Point::new(10, 44)),
            ]
        );
        assert_eq!(ctx.height(70), 36);

        let mut renderer = RecordingRenderer::new(Rect::new(0, 0, 70, 100));
        ctx.render(&mut renderer, None, 24);
        assert_eq!(renderer.draws.len(), 1);
        assert_eq!(renderer.draws[0].0, "cc");
        assert_eq!(renderer.draws[0].1, Point::new(0, 0));
    }

    #[test]
    fn test_options_rounding() {
        let engine = FixedPitchEngine::new();
        let options = LayoutOptions::new().with_twips_rounding(TwipsRounding::Truncate);
        let mut ctx = Context::with_options(engine, options).unwrap();
        ctx.load_bytes(br"{\li39 x}").unwrap();
        ctx.height(100);
        assert_eq!(ctx.document().lines()[0].segments()[0].x, 1);
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br"{\rtf1{\info{\author Someone}}From disk}")
            .unwrap();
        file.flush().unwrap();

        let (mut ctx, _) = context();
        ctx.load_file(file.path()).unwrap();
        assert_eq!(ctx.author(), "Someone");
        assert_eq!(ctx.document().lines()[0].runs()[0].text(), "From disk");

        let missing = ctx.load_file(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(Error::Io(_))));
    }

    #[test]
    fn test_load_reader_borrowed_stays_open() {
        let (mut ctx, _) = context();
        let mut cursor = Cursor::new(b"{one}".to_vec());
        ctx.load_reader(&mut cursor).unwrap();
        assert_eq!(cursor.position(), 5);
        cursor.set_position(0);
        ctx.load_reader(&mut cursor).unwrap();
        assert_eq!(ctx.document().lines()[0].runs()[0].text(), "one");
    }
}
