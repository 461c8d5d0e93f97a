//! Byte source with one byte of pushback.

use std::io::{ErrorKind, Read};

/// Pulls bytes one at a time from a reader.
///
/// The parser never needs more than one byte of lookahead, which is
/// satisfied by [`CharSource::pushback`]. Wrap unbuffered readers (files,
/// sockets) in a `BufReader` before handing them over.
pub struct CharSource<R> {
    reader: R,
    pending: Option<u8>,
}

impl<R: Read> CharSource<R> {
    #[inline]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: None,
        }
    }

    /// Next byte, or `None` at end of input.
    pub fn next(&mut self) -> std::io::Result<Option<u8>> {
        if let Some(byte) = self.pending.take() {
            return Ok(Some(byte));
        }

        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Store a byte to be returned by the next call to [`CharSource::next`].
    ///
    /// Overwrites any byte pushed back earlier.
    #[inline]
    pub fn pushback(&mut self, byte: u8) {
        self.pending = Some(byte);
    }
}
