//! rtflow - RTF parsing and word-wrapping layout
//!
//! This library parses Rich Text Format documents into styled text runs and
//! lays them out for any width, producing positioned segments for an
//! external renderer. Font metrics and drawing are supplied by the caller
//! through the [`FontEngine`](rtf::FontEngine) and
//! [`Renderer`](rtf::Renderer) traits, so the crate does not depend on any
//! graphics library.
//!
//! # Features
//!
//! - **Streaming parser**: one pass over any `Read` source, one byte of lookahead
//! - **Formatting**: fonts, sizes, bold/italic/underline, colors, indents, justification
//! - **Document info**: title, subject and author
//! - **Layout**: word wrapping, tab stops, centered and right-aligned paragraphs
//! - **Incremental**: layout is recomputed only when the width changes
//!
//! # Example
//!
//! ```rust,ignore
//! use rtflow::Context;
//! use rtflow::common::Rect;
//!
//! let mut ctx = Context::new(engine)?;
//! ctx.load_bytes(br"{\rtf1\ansi{\fonttbl\f0\fswiss Helvetica;}\f0\pard Hello World!\par}")?;
//!
//! let height = ctx.height(480);
//! ctx.render(&mut renderer, Some(Rect::new(0, 0, 480, 320)), 0);
//! ```

/// Shared types: errors, options, units and geometry
pub mod common;

/// RTF parser, document model and layout
pub mod rtf;

pub use common::{Error, LayoutOptions, Result};
pub use rtf::{Context, FontEngine, Renderer};
