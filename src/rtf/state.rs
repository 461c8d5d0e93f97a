//! Parser state that is saved and restored across groups.

use super::error::{RtfError, RtfResult};
use super::types::{CharacterFormat, DocumentFormat, ParagraphFormat, SectionFormat};

/// Where decoded characters go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Destination {
    /// Document body text
    #[default]
    Body,
    /// Discard everything
    Skip,
    FontTable,
    ColorTable,
    Info,
    Title,
    Subject,
    Author,
}

/// How the next raw bytes are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// `\binN` payload with this many bytes left
    Binary { remaining: i32 },
    /// `\'hh` escape with `nibbles` digits still to read
    Hex { nibbles: u8, value: u8 },
}

/// Everything a `{` saves and the matching `}` restores.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SaveFrame {
    pub chp: CharacterFormat,
    pub pap: ParagraphFormat,
    pub sep: SectionFormat,
    pub dop: DocumentFormat,
    pub destination: Destination,
    pub input: InputMode,
}

/// Stack of saved frames, one per open group.
#[derive(Debug, Default)]
pub struct GroupStack {
    frames: Vec<SaveFrame>,
}

impl GroupStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a frame. Fails with `StackOverflow` when memory runs out.
    pub fn push(&mut self, frame: SaveFrame) -> RtfResult<()> {
        self.frames
            .try_reserve(1)
            .map_err(|_| RtfError::StackOverflow)?;
        self.frames.push(frame);
        Ok(())
    }

    /// Restore the most recent frame. Fails with `StackUnderflow` when no
    /// group is open.
    pub fn pop(&mut self) -> RtfResult<SaveFrame> {
        self.frames.pop().ok_or(RtfError::StackUnderflow)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
