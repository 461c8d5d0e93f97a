//! Layout configuration.

use super::unit::{DEFAULT_TAB_STOP_TWIPS, TwipsRounding, twips_to_pixels};
use serde::{Deserialize, Serialize};

/// Configuration options for layout.
///
/// # Examples
///
/// ```rust
/// use rtflow::common::{LayoutOptions, TwipsRounding};
///
/// let options = LayoutOptions::new()
///     .with_twips_rounding(TwipsRounding::Truncate)
///     .with_tab_stop_twips(1440);
/// assert_eq!(options.tab_stop_twips, 1440);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Rounding used when indents and tab stops are converted to pixels
    pub twips_rounding: TwipsRounding,
    /// Distance between default tab stops, in twips
    pub tab_stop_twips: i32,
    /// Font size in half-points used while no `\fs` is in effect
    pub default_font_size: i32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            twips_rounding: TwipsRounding::default(),
            tab_stop_twips: DEFAULT_TAB_STOP_TWIPS,
            default_font_size: 24,
        }
    }
}

impl LayoutOptions {
    /// Create a new `LayoutOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the twips-to-pixels rounding mode.
    #[inline]
    pub fn with_twips_rounding(mut self, rounding: TwipsRounding) -> Self {
        self.twips_rounding = rounding;
        self
    }

    /// Set the default tab stop width in twips.
    ///
    /// A width that converts to less than one pixel is treated as one pixel,
    /// so tab advancement always moves forward.
    #[inline]
    pub fn with_tab_stop_twips(mut self, twips: i32) -> Self {
        self.tab_stop_twips = twips;
        self
    }

    /// Set the font size (half-points) used when the document sets none.
    #[inline]
    pub fn with_default_font_size(mut self, half_points: i32) -> Self {
        self.default_font_size = half_points;
        self
    }

    #[inline]
    pub(crate) fn pixels(&self, twips: i32) -> i32 {
        twips_to_pixels(twips, self.twips_rounding)
    }

    #[inline]
    pub(crate) fn tab_stop_pixels(&self) -> i32 {
        self.pixels(self.tab_stop_twips).max(1)
    }
}
