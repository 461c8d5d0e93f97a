//! Word wrapping and justification.
//!
//! Reflow turns each line's text runs into positioned [`Segment`]s for a
//! given width. It only reads the offset arrays measured when the runs were
//! added, so no font engine calls happen here. Results are cached per width.

use super::document::{Document, Line, LineLayout, Segment, TextRun};
use super::types::Justification;
use crate::common::LayoutOptions;

/// How much of a run fits on the current row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fit {
    /// Characters to place
    count: usize,
    /// The row must be finalized after placing them
    wrapped: bool,
}

#[inline]
fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

/// Fit characters of `run` starting at `offset` into `width` pixels.
///
/// Wraps after the last whitespace inside the fitting span. Without one,
/// a row that already holds text is finalized first; an empty row takes the
/// greedy fit, and always at least one character.
fn fit_chars(run: &TextRun, offset: usize, width: i32, row_has_content: bool) -> Fit {
    let pixels = &run.offsets.pixels;
    let total = run.char_count();
    let base = pixels[offset];
    if run.offsets.width() - base <= width {
        return Fit {
            count: total - offset,
            wrapped: false,
        };
    }

    let mut count = 0;
    while offset + count < total && pixels[offset + count + 1] - base <= width {
        count += 1;
    }
    if offset + count == total {
        return Fit {
            count,
            wrapped: false,
        };
    }

    let text = run.text.as_bytes();
    let wrap_at = (offset..offset + count)
        .rev()
        .find(|&index| text.get(run.offsets.bytes[index]).copied().is_some_and(is_space));
    if let Some(index) = wrap_at {
        return Fit {
            count: index - offset + 1,
            wrapped: true,
        };
    }

    if row_has_content {
        Fit {
            count: 0,
            wrapped: true,
        }
    } else {
        Fit {
            count: count.max(1),
            wrapped: true,
        }
    }
}

/// Row state while a line is laid out.
struct RowBuilder {
    left_margin: i32,
    width: i32,
    justification: Justification,
    x: i32,
    row_height: i32,
    row_start: usize,
    layout: LineLayout,
}

impl RowBuilder {
    fn row_has_content(&self) -> bool {
        self.layout.segments.len() > self.row_start
    }

    fn place(&mut self, run_index: usize, run: &TextRun, start: usize, count: usize) {
        self.layout.segments.push(Segment {
            run: run_index,
            start,
            end: start + count,
            x: self.left_margin + self.x,
            y: self.layout.height,
        });
        self.row_height = self.row_height.max(run.line_height);
        let pixels = &run.offsets.pixels;
        self.x += pixels[start + count] - pixels[start];
    }

    fn finalize_row(&mut self) {
        self.layout.width = self.layout.width.max(self.x);
        self.layout.height += self.row_height;

        let shift = match self.justification {
            Justification::Center => (self.width - self.x) / 2,
            Justification::Right => self.left_margin + self.width - self.x,
            Justification::Left | Justification::Justify => 0,
        };
        if shift != 0 {
            for segment in &mut self.layout.segments[self.row_start..] {
                segment.x += shift;
            }
        }

        self.row_start = self.layout.segments.len();
        self.x = 0;
        self.row_height = 0;
    }
}

/// Lay out one line for `width` pixels and return its height.
pub(super) fn reflow_line(line: &mut Line, width: i32, options: &LayoutOptions) -> i32 {
    if line.runs.is_empty() {
        line.layout = LineLayout {
            height: line.base_height,
            ..LineLayout::default()
        };
        return line.base_height;
    }

    let left_margin = options.pixels(line.paragraph.left_indent);
    let right_margin = options.pixels(line.paragraph.right_indent);
    let tab_stop = options.tab_stop_pixels();

    let mut rows = RowBuilder {
        left_margin,
        width: width - left_margin - right_margin,
        justification: line.paragraph.justification,
        x: options.pixels(line.paragraph.first_indent),
        row_height: 0,
        row_start: 0,
        layout: LineLayout::default(),
    };

    for (index, run) in line.runs.iter().enumerate() {
        for _ in 0..run.tabs {
            rows.x = (rows.x.div_euclid(tab_stop) + 1) * tab_stop;
        }

        let mut offset = 0;
        while offset < run.char_count() {
            let available = rows.width - rows.x;
            let fit = fit_chars(run, offset, available, rows.row_has_content());
            if fit.count > 0 {
                rows.place(index, run, offset, fit.count);
                offset += fit.count;
            }
            if fit.wrapped {
                rows.finalize_row();
            }
        }
    }
    rows.finalize_row();

    line.layout = rows.layout;
    line.layout.height
}

impl<F> Document<F> {
    /// Lay out every line for `width` pixels and return the total height.
    ///
    /// Does nothing when the layout is already computed for `width`.
    pub fn reflow(&mut self, width: i32, options: &LayoutOptions) -> i32 {
        if self.layout_width == Some(width) {
            return self.height;
        }

        log::debug!("reflowing {} lines to {width}px", self.lines.len());
        self.height = self
            .lines
            .iter_mut()
            .map(|line| reflow_line(line, width, options))
            .sum();
        self.layout_width = Some(width);
        self.height
    }

    /// Force the next [`reflow`](Document::reflow) to recompute.
    pub fn invalidate_layout(&mut self) {
        self.layout_width = None;
    }

    /// Total height from the last reflow.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }
}
