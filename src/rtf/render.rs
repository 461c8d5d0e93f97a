//! Viewport projection.
//!
//! Walks the laid-out lines for a viewport and scroll offset and reports
//! where each visible segment goes. Drawing itself happens in
//! [`Context::render`](super::Context::render).

use super::document::Document;
use crate::common::{Point, Rect};

/// One segment to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawInstruction {
    /// Index into [`Document::lines`]
    pub line: usize,
    /// Index into the line's segments
    pub segment: usize,
    /// Top-left corner of the segment on the target surface
    pub position: Point,
}

/// Segments of `doc` visible in `rect` when scrolled down by `scroll` pixels.
///
/// Uses the current layout; reflow to `rect.w` first.
pub fn project<F>(doc: &Document<F>, rect: Rect, scroll: i32) -> Vec<DrawInstruction> {
    let mut instructions = Vec::new();
    let mut y = -scroll;

    for (line_index, line) in doc.lines().iter().enumerate() {
        if y >= rect.h {
            break;
        }
        if y + line.height() > 0 {
            instructions.extend(line.segments().iter().enumerate().map(|(index, segment)| {
                DrawInstruction {
                    line: line_index,
                    segment: index,
                    position: Point::new(rect.x + segment.x, rect.y + y + segment.y),
                }
            }));
        }
        y += line.height();
    }

    instructions
}
