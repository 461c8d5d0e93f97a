use serde::{Deserialize, Serialize};
use std::fmt;

/// RGB color representation.
///
/// Color table entries and text run colors use this type. Each component is
/// in the range 0-255.
///
/// # Examples
///
/// ```rust
/// use rtflow::common::Color;
///
/// let orange = Color::new(255, 128, 0);
/// assert_eq!(orange.to_string(), "#FF8000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    /// Red component (0-255)
    pub red: u8,
    /// Green component (0-255)
    pub green: u8,
    /// Blue component (0-255)
    pub blue: u8,
}

impl Color {
    /// Create a new color.
    #[inline]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Black color.
    #[inline]
    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }

    /// Build a color from the raw `\red`/`\green`/`\blue` parameters.
    ///
    /// RTF writers are not required to stay within 0-255, so the components
    /// are clamped.
    #[inline]
    pub fn from_components(red: i32, green: i32, blue: i32) -> Self {
        let clamp = |v: i32| v.clamp(0, 255) as u8;
        Self::new(clamp(red), clamp(green), clamp(blue))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}
