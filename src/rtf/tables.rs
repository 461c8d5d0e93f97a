//! Keyword and property tables.
//!
//! `KEYWORDS` maps every recognized control word (or control symbol) to what
//! the parser should do with it. Property keywords point into `PROPERTIES`,
//! which records the action width and the format struct a property lives in.
//! Both tables are compile-time constants shared by every context.

use super::types::{
    CharacterFormat, DocumentFormat, Justification, PageNumberFormat, ParagraphFormat,
    SectionBreak, SectionFormat,
};
use phf::{Map, phf_map};

/// Formatting properties that keywords can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    FontFamily,
    FontCharset,
    ColorRed,
    ColorGreen,
    ColorBlue,
    Font,
    FontSize,
    BgColor,
    FgColor,
    Bold,
    Italic,
    Underline,
    LeftIndent,
    RightIndent,
    FirstIndent,
    Columns,
    PageNumberX,
    PageNumberY,
    PageWidth,
    PageHeight,
    MarginLeft,
    MarginRight,
    MarginTop,
    MarginBottom,
    PageNumberStart,
    SectionBreak,
    PageNumberFormat,
    FacingPages,
    Landscape,
    Justification,
    ParagraphDefaults,
    PlainText,
    SectionDefaults,
}

impl Property {
    /// Table entry describing how this property is stored.
    #[inline]
    pub fn descriptor(self) -> &'static PropertyDescriptor {
        &PROPERTIES[self as usize]
    }
}

/// How a property value is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Store the low byte of the parameter
    Byte,
    /// Store the full parameter
    Word,
    /// Needs code: pending table values or a structural reset
    Special,
}

/// Which format struct a property belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Character,
    Paragraph,
    Section,
    Document,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub action: Action,
    pub target: Target,
}

const fn prop(action: Action, target: Target) -> PropertyDescriptor {
    PropertyDescriptor { action, target }
}

/// Indexed by `Property as usize`; keep in declaration order.
static PROPERTIES: [PropertyDescriptor; 33] = [
    prop(Action::Special, Target::Character),  // FontFamily
    prop(Action::Word, Target::Character),     // FontCharset
    prop(Action::Special, Target::Character),  // ColorRed
    prop(Action::Special, Target::Character),  // ColorGreen
    prop(Action::Special, Target::Character),  // ColorBlue
    prop(Action::Word, Target::Character),     // Font
    prop(Action::Word, Target::Character),     // FontSize
    prop(Action::Byte, Target::Character),     // BgColor
    prop(Action::Byte, Target::Character),     // FgColor
    prop(Action::Byte, Target::Character),     // Bold
    prop(Action::Byte, Target::Character),     // Italic
    prop(Action::Byte, Target::Character),     // Underline
    prop(Action::Word, Target::Paragraph),     // LeftIndent
    prop(Action::Word, Target::Paragraph),     // RightIndent
    prop(Action::Word, Target::Paragraph),     // FirstIndent
    prop(Action::Word, Target::Section),       // Columns
    prop(Action::Word, Target::Section),       // PageNumberX
    prop(Action::Word, Target::Section),       // PageNumberY
    prop(Action::Word, Target::Document),      // PageWidth
    prop(Action::Word, Target::Document),      // PageHeight
    prop(Action::Word, Target::Document),      // MarginLeft
    prop(Action::Word, Target::Document),      // MarginRight
    prop(Action::Word, Target::Document),      // MarginTop
    prop(Action::Word, Target::Document),      // MarginBottom
    prop(Action::Word, Target::Document),      // PageNumberStart
    prop(Action::Byte, Target::Section),       // SectionBreak
    prop(Action::Byte, Target::Section),       // PageNumberFormat
    prop(Action::Byte, Target::Document),      // FacingPages
    prop(Action::Byte, Target::Document),      // Landscape
    prop(Action::Byte, Target::Paragraph),     // Justification
    prop(Action::Special, Target::Paragraph),  // ParagraphDefaults
    prop(Action::Special, Target::Character),  // PlainText
    prop(Action::Special, Target::Section),    // SectionDefaults
];

/// Destinations a keyword can switch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationChange {
    FontTable,
    ColorTable,
    Info,
    Title,
    Subject,
    Author,
    Skip,
}

/// Keywords handled by dedicated code in the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialAction {
    /// `\binN`: the next N bytes are raw data
    Binary,
    /// `\*`: skip the following destination if it is unknown
    SkipDestination,
    /// `\'hh`: one byte written as two hex digits
    Hex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordKind {
    Property(Property),
    Character(u8),
    Destination(DestinationChange),
    Special(SpecialAction),
}

/// One keyword table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    /// Parameter used when the keyword has none (or always, if forced)
    pub default: i32,
    /// Ignore any supplied parameter and use `default`
    pub force_default: bool,
    pub kind: KeywordKind,
}

impl Symbol {
    /// Effective parameter for a keyword occurrence.
    #[inline]
    pub fn parameter(&self, supplied: Option<i32>) -> i32 {
        match supplied {
            Some(value) if !self.force_default => value,
            _ => self.default,
        }
    }
}

const fn property(default: i32, force_default: bool, property: Property) -> Symbol {
    Symbol {
        default,
        force_default,
        kind: KeywordKind::Property(property),
    }
}

const fn character(value: u8) -> Symbol {
    Symbol {
        default: 0,
        force_default: false,
        kind: KeywordKind::Character(value),
    }
}

const fn destination(change: DestinationChange) -> Symbol {
    Symbol {
        default: 0,
        force_default: false,
        kind: KeywordKind::Destination(change),
    }
}

const fn special(action: SpecialAction) -> Symbol {
    Symbol {
        default: 0,
        force_default: false,
        kind: KeywordKind::Special(action),
    }
}

/// Every control word and control symbol the parser recognizes.
pub static KEYWORDS: Map<&'static str, Symbol> = phf_map! {
    // Font table
    "fonttbl" => destination(DestinationChange::FontTable),
    "fnil" => property(0, true, Property::FontFamily),
    "froman" => property(1, true, Property::FontFamily),
    "fswiss" => property(2, true, Property::FontFamily),
    "fmodern" => property(3, true, Property::FontFamily),
    "fscript" => property(4, true, Property::FontFamily),
    "fdecor" => property(5, true, Property::FontFamily),
    "ftech" => property(6, true, Property::FontFamily),
    "fbidi" => property(7, true, Property::FontFamily),
    "fcharset" => property(0, false, Property::FontCharset),

    // Color table
    "colortbl" => destination(DestinationChange::ColorTable),
    "red" => property(0, false, Property::ColorRed),
    "green" => property(0, false, Property::ColorGreen),
    "blue" => property(0, false, Property::ColorBlue),

    // Document info
    "info" => destination(DestinationChange::Info),
    "title" => destination(DestinationChange::Title),
    "subject" => destination(DestinationChange::Subject),
    "author" => destination(DestinationChange::Author),

    // Character formatting
    "f" => property(0, false, Property::Font),
    "fs" => property(24, false, Property::FontSize),
    "cb" => property(1, false, Property::BgColor),
    "cf" => property(1, false, Property::FgColor),
    "b" => property(1, false, Property::Bold),
    "ul" => property(1, false, Property::Underline),
    "ulnone" => property(0, true, Property::Underline),
    "i" => property(1, false, Property::Italic),
    "plain" => property(0, false, Property::PlainText),

    // Paragraph formatting
    "li" => property(0, false, Property::LeftIndent),
    "ri" => property(0, false, Property::RightIndent),
    "fi" => property(0, false, Property::FirstIndent),
    "qc" => property(2, true, Property::Justification),
    "ql" => property(0, true, Property::Justification),
    "qr" => property(1, true, Property::Justification),
    "qj" => property(3, true, Property::Justification),
    "pard" => property(0, false, Property::ParagraphDefaults),

    // Section formatting
    "cols" => property(1, false, Property::Columns),
    "sbknone" => property(0, true, Property::SectionBreak),
    "sbkcol" => property(1, true, Property::SectionBreak),
    "sbkeven" => property(2, true, Property::SectionBreak),
    "sbkodd" => property(3, true, Property::SectionBreak),
    "sbkpage" => property(4, true, Property::SectionBreak),
    "pgnx" => property(0, false, Property::PageNumberX),
    "pgny" => property(0, false, Property::PageNumberY),
    "pgndec" => property(0, true, Property::PageNumberFormat),
    "pgnucrm" => property(1, true, Property::PageNumberFormat),
    "pgnlcrm" => property(2, true, Property::PageNumberFormat),
    "pgnucltr" => property(3, true, Property::PageNumberFormat),
    "pgnlcltr" => property(4, true, Property::PageNumberFormat),
    "sectd" => property(0, false, Property::SectionDefaults),

    // Document formatting
    "paperw" => property(12240, false, Property::PageWidth),
    "paperh" => property(15480, false, Property::PageHeight),
    "margl" => property(1800, false, Property::MarginLeft),
    "margr" => property(1800, false, Property::MarginRight),
    "margt" => property(1440, false, Property::MarginTop),
    "margb" => property(1440, false, Property::MarginBottom),
    "pgnstart" => property(1, true, Property::PageNumberStart),
    "facingp" => property(1, true, Property::FacingPages),
    "landscape" => property(1, true, Property::Landscape),

    // Characters
    "line" => character(b'\n'),
    "par" => character(b'\n'),
    "\n" => character(b'\n'),
    "\r" => character(b'\n'),
    "tab" => character(b'\t'),
    "ldblquote" => character(b'"'),
    "rdblquote" => character(b'"'),
    "{" => character(b'{'),
    "}" => character(b'}'),
    "\\" => character(b'\\'),

    // Special handling
    "bin" => special(SpecialAction::Binary),
    "*" => special(SpecialAction::SkipDestination),
    "'" => special(SpecialAction::Hex),

    // Destinations that are recognized only to be skipped
    "bkmkend" => destination(DestinationChange::Skip),
    "bkmkstart" => destination(DestinationChange::Skip),
    "buptim" => destination(DestinationChange::Skip),
    "comment" => destination(DestinationChange::Skip),
    "creatim" => destination(DestinationChange::Skip),
    "doccomm" => destination(DestinationChange::Skip),
    "footer" => destination(DestinationChange::Skip),
    "footerf" => destination(DestinationChange::Skip),
    "footerl" => destination(DestinationChange::Skip),
    "footerr" => destination(DestinationChange::Skip),
    "footnote" => destination(DestinationChange::Skip),
    "ftncn" => destination(DestinationChange::Skip),
    "ftnsep" => destination(DestinationChange::Skip),
    "ftnsepc" => destination(DestinationChange::Skip),
    "header" => destination(DestinationChange::Skip),
    "headerf" => destination(DestinationChange::Skip),
    "headerl" => destination(DestinationChange::Skip),
    "headerr" => destination(DestinationChange::Skip),
    "keywords" => destination(DestinationChange::Skip),
    "operator" => destination(DestinationChange::Skip),
    "pict" => destination(DestinationChange::Skip),
    "printim" => destination(DestinationChange::Skip),
    "private1" => destination(DestinationChange::Skip),
    "revtim" => destination(DestinationChange::Skip),
    "rxe" => destination(DestinationChange::Skip),
    "stylesheet" => destination(DestinationChange::Skip),
    "tc" => destination(DestinationChange::Skip),
    "txe" => destination(DestinationChange::Skip),
    "xe" => destination(DestinationChange::Skip),
};

/// Look up a keyword.
#[inline]
pub fn lookup(keyword: &str) -> Option<&'static Symbol> {
    KEYWORDS.get(keyword)
}

/// Format structs that byte and word properties can be written into.
///
/// The setters return `false` when the property has no field of that width
/// in the struct, which indicates a table defect.
pub trait PropertyTarget {
    fn set_byte(&mut self, property: Property, value: u8) -> bool;
    fn set_word(&mut self, property: Property, value: i32) -> bool;
}

impl PropertyTarget for CharacterFormat {
    fn set_byte(&mut self, property: Property, value: u8) -> bool {
        match property {
            Property::BgColor => self.bg_color = value,
            Property::FgColor => self.fg_color = value,
            Property::Bold => self.bold = value != 0,
            Property::Italic => self.italic = value != 0,
            Property::Underline => self.underline = value != 0,
            _ => return false,
        }
        true
    }

    fn set_word(&mut self, property: Property, value: i32) -> bool {
        match property {
            Property::FontCharset => self.font_charset = value,
            Property::Font => self.font = value,
            Property::FontSize => self.font_size = value,
            _ => return false,
        }
        true
    }
}

impl PropertyTarget for ParagraphFormat {
    fn set_byte(&mut self, property: Property, value: u8) -> bool {
        match property {
            Property::Justification => self.justification = Justification::from_byte(value),
            _ => return false,
        }
        true
    }

    fn set_word(&mut self, property: Property, value: i32) -> bool {
        match property {
            Property::LeftIndent => self.left_indent = value,
            Property::RightIndent => self.right_indent = value,
            Property::FirstIndent => self.first_indent = value,
            _ => return false,
        }
        true
    }
}

impl PropertyTarget for SectionFormat {
    fn set_byte(&mut self, property: Property, value: u8) -> bool {
        match property {
            Property::SectionBreak => self.break_type = SectionBreak::from_byte(value),
            Property::PageNumberFormat => {
                self.page_number_format = PageNumberFormat::from_byte(value)
            },
            _ => return false,
        }
        true
    }

    fn set_word(&mut self, property: Property, value: i32) -> bool {
        match property {
            Property::Columns => self.columns = value,
            Property::PageNumberX => self.page_number_x = value,
            Property::PageNumberY => self.page_number_y = value,
            _ => return false,
        }
        true
    }
}

impl PropertyTarget for DocumentFormat {
    fn set_byte(&mut self, property: Property, value: u8) -> bool {
        match property {
            Property::FacingPages => self.facing_pages = value != 0,
            Property::Landscape => self.landscape = value != 0,
            _ => return false,
        }
        true
    }

    fn set_word(&mut self, property: Property, value: i32) -> bool {
        match property {
            Property::PageWidth => self.page_width = value,
            Property::PageHeight => self.page_height = value,
            Property::MarginLeft => self.margin_left = value,
            Property::MarginRight => self.margin_right = value,
            Property::MarginTop => self.margin_top = value,
            Property::MarginBottom => self.margin_bottom = value,
            Property::PageNumberStart => self.page_number_start = value,
            _ => return false,
        }
        true
    }
}
