//! RTF formatting state.
//!
//! These are the four property groups the parser saves and restores across
//! `{ }` groups. Character and paragraph formats are copied into the
//! document model as text arrives; section and document formats are tracked
//! for renderers that paginate but are not consumed by layout.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Font family categories, numbered as the `\fnil`..`\fbidi` keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontFamily {
    /// Nil (unknown or default)
    #[default]
    Default,
    /// Proportionally spaced serif fonts
    Roman,
    /// Proportionally spaced sans serif fonts
    Swiss,
    /// Fixed pitch fonts
    Modern,
    /// Script fonts
    Script,
    /// Decorative fonts
    Decor,
    /// Technical, symbol, and mathematical fonts
    Tech,
    /// Bidirectional fonts
    Bidi,
}

impl FontFamily {
    /// Map a pending `\f<family>` value. Unknown values fall back to `Default`.
    #[inline]
    pub fn from_index(index: i32) -> Self {
        match index {
            1 => Self::Roman,
            2 => Self::Swiss,
            3 => Self::Modern,
            4 => Self::Script,
            5 => Self::Decor,
            6 => Self::Tech,
            7 => Self::Bidi,
            _ => Self::Default,
        }
    }
}

bitflags! {
    /// Style requested from the font engine.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct FontStyle: u8 {
        const BOLD = 0x01;
        const ITALIC = 0x02;
        const UNDERLINE = 0x04;
    }
}

impl FontStyle {
    pub const NORMAL: Self = Self::empty();
}

/// Paragraph justification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Justification {
    #[default]
    Left,
    Right,
    Center,
    /// Recognized, but laid out exactly like `Left`
    Justify,
}

impl Justification {
    #[inline]
    pub fn from_byte(value: u8) -> Self {
        match value {
            1 => Self::Right,
            2 => Self::Center,
            3 => Self::Justify,
            _ => Self::Left,
        }
    }
}

/// Section break type (`\sbk*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SectionBreak {
    #[default]
    None,
    Column,
    Even,
    Odd,
    Page,
}

impl SectionBreak {
    #[inline]
    pub fn from_byte(value: u8) -> Self {
        match value {
            1 => Self::Column,
            2 => Self::Even,
            3 => Self::Odd,
            4 => Self::Page,
            _ => Self::None,
        }
    }
}

/// Page number format (`\pgn*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageNumberFormat {
    #[default]
    Decimal,
    UpperRoman,
    LowerRoman,
    UpperLetter,
    LowerLetter,
}

impl PageNumberFormat {
    #[inline]
    pub fn from_byte(value: u8) -> Self {
        match value {
            1 => Self::UpperRoman,
            2 => Self::LowerRoman,
            3 => Self::UpperLetter,
            4 => Self::LowerLetter,
            _ => Self::Decimal,
        }
    }
}

/// Character formatting properties.
///
/// The all-zero value is what `\plain` resets to. A font size of 0 means
/// "use the configured default size".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharacterFormat {
    /// Font id (`\f`)
    pub font: i32,
    /// Font size in half-points (`\fs`)
    pub font_size: i32,
    /// Windows character set (`\fcharset`)
    pub font_charset: i32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    /// Foreground color index (`\cf`)
    pub fg_color: u8,
    /// Background color index (`\cb`)
    pub bg_color: u8,
}

impl CharacterFormat {
    /// Style flags requested from the font engine for this format.
    #[inline]
    pub fn font_style(&self) -> FontStyle {
        let mut style = FontStyle::NORMAL;
        style.set(FontStyle::BOLD, self.bold);
        style.set(FontStyle::ITALIC, self.italic);
        style.set(FontStyle::UNDERLINE, self.underline);
        style
    }
}

/// Paragraph properties. Indents are in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParagraphFormat {
    /// Left indent (`\li`)
    pub left_indent: i32,
    /// Right indent (`\ri`)
    pub right_indent: i32,
    /// First line indent (`\fi`)
    pub first_indent: i32,
    pub justification: Justification,
}

/// Section properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SectionFormat {
    /// Number of columns (`\cols`)
    pub columns: i32,
    pub break_type: SectionBreak,
    /// Page number position in twips (`\pgnx`, `\pgny`)
    pub page_number_x: i32,
    pub page_number_y: i32,
    pub page_number_format: PageNumberFormat,
}

/// Document properties. Lengths are in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFormat {
    pub page_width: i32,
    pub page_height: i32,
    pub margin_left: i32,
    pub margin_right: i32,
    pub margin_top: i32,
    pub margin_bottom: i32,
    pub page_number_start: i32,
    pub facing_pages: bool,
    pub landscape: bool,
}

impl Default for DocumentFormat {
    fn default() -> Self {
        Self {
            page_width: 12240,
            page_height: 15480,
            margin_left: 1800,
            margin_right: 1800,
            margin_top: 1440,
            margin_bottom: 1440,
            page_number_start: 1,
            facing_pages: false,
            landscape: false,
        }
    }
}
