//! RTF (Rich Text Format) parsing and layout.
//!
//! Parsing is a single streaming pass over the input bytes. Control words
//! are dispatched through a static keyword table, groups save and restore
//! formatting state, and body text is committed to a [`Document`] as styled
//! text runs measured by the caller's [`FontEngine`]. Layout wraps those runs
//! to a width on demand and is cached until the width changes.
//!
//! # Architecture
//!
//! - **Source / Lexer**: byte source with one byte of pushback, control word reader
//! - **Tables**: keyword and property tables
//! - **Parser**: group stack, destination routing and property changes
//! - **Document**: lines, text runs, font and color tables
//! - **Reflow / Render**: word wrapping, justification and viewport projection
//! - **Context**: load, query and render entry points
//!
//! # Example
//!
//! ```rust,ignore
//! use rtflow::rtf::Context;
//!
//! let mut ctx = Context::new(engine)?;
//! ctx.load_file("notes.rtf")?;
//! println!("{} by {}", ctx.title(), ctx.author());
//! ctx.render(&mut renderer, None, scroll);
//! ```

mod context;
mod document;
mod engine;
mod error;
mod fonts;
mod lexer;
mod parser;
mod reflow;
mod render;
mod source;
mod state;
mod tables;
#[cfg(test)]
pub(crate) mod testing;
mod types;

// Re-exports
pub use context::Context;
pub use document::{Document, DocumentInfo, Line, Segment, TextRun};
pub use engine::{CharacterOffsets, FONT_ENGINE_VERSION, FontEngine, FontRequest, Renderer};
pub use error::{RtfError, RtfResult};
pub use fonts::{ColorTable, FontEntry, FontId, FontTable};
pub use parser::parse;
pub use render::{DrawInstruction, project};
pub use types::{
    CharacterFormat, DocumentFormat, FontFamily, FontStyle, Justification, PageNumberFormat,
    ParagraphFormat, SectionBreak, SectionFormat,
};
