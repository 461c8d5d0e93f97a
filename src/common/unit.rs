//! Unit conversion utilities.
//!
//! RTF measures margins, indents and tab stops in twips (1/20 of a point).
//! Layout happens in pixels at 72 dpi, so one point is one pixel.

use serde::{Deserialize, Serialize};

pub const TWIPS_PER_POINT: i32 = 20;
pub const DEFAULT_TAB_STOP_TWIPS: i32 = 720;

/// How twips are rounded when converted to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TwipsRounding {
    /// Plain integer division by 20.
    Truncate,
    /// Fixed-point conversion carried out at 64x precision before the
    /// final division, as used by the rendering path.
    #[default]
    Scaled,
}

#[inline]
pub fn twips_to_pixels_truncate(twips: i32) -> i32 {
    twips / TWIPS_PER_POINT
}

#[inline]
pub fn twips_to_pixels_scaled(twips: i32) -> i32 {
    let scaled = i64::from(twips) * 64 * 72 + (36 + 32 * 72);
    ((scaled / 72) / i64::from(TWIPS_PER_POINT) / 64) as i32
}

#[inline]
pub fn twips_to_pixels(twips: i32, rounding: TwipsRounding) -> i32 {
    match rounding {
        TwipsRounding::Truncate => twips_to_pixels_truncate(twips),
        TwipsRounding::Scaled => twips_to_pixels_scaled(twips),
    }
}

/// Convert RTF half-points (`\fs`) to whole points.
#[inline]
pub fn half_points_to_points(half_points: i32) -> i32 {
    half_points / 2
}
