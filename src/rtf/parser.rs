//! RTF parser.
//!
//! A byte-at-a-time state machine. Braces push and pop formatting state,
//! control words are looked up in the keyword table and dispatched, and
//! every other byte is routed to the current destination. Body text is
//! buffered and committed to the [`Document`] as a text run whenever the
//! formatting is about to change.

use super::document::{Document, InfoField};
use super::engine::FontEngine;
use super::error::{RtfError, RtfResult};
use super::fonts::FontEntry;
use super::lexer::{ControlWord, read_control_word};
use super::source::CharSource;
use super::state::{Destination, GroupStack, InputMode, SaveFrame};
use super::tables::{
    self, Action, DestinationChange, KeywordKind, Property, PropertyTarget, SpecialAction, Target,
};
use super::types::{CharacterFormat, DocumentFormat, FontFamily, ParagraphFormat, SectionFormat};
use crate::common::Color;
use encoding_rs::WINDOWS_1252;
use std::io::Read;

/// Parse RTF from `reader` into `doc`.
///
/// `doc` should be empty. On failure the runs committed before the error
/// stay in `doc`.
pub fn parse<R, E>(reader: R, engine: &mut E, doc: &mut Document<E::Font>) -> RtfResult<()>
where
    R: Read,
    E: FontEngine,
{
    let mut source = CharSource::new(reader);
    let mut parser = Parser::new(engine, doc);
    let result = parser.run(&mut source);
    if result.is_err() {
        parser.unwind();
    }
    result
}

struct Parser<'a, E: FontEngine> {
    engine: &'a mut E,
    doc: &'a mut Document<E::Font>,
    chp: CharacterFormat,
    pap: ParagraphFormat,
    sep: SectionFormat,
    dop: DocumentFormat,
    destination: Destination,
    input: InputMode,
    stack: GroupStack,
    /// Set by `\*`: skip the destination if the next keyword is unknown
    skip_unknown: bool,
    /// Pending font family or color components
    values: [i32; 3],
    /// Literal text not yet committed
    data: String,
}

impl<'a, E: FontEngine> Parser<'a, E> {
    fn new(engine: &'a mut E, doc: &'a mut Document<E::Font>) -> Self {
        Self {
            engine,
            doc,
            chp: CharacterFormat::default(),
            pap: ParagraphFormat::default(),
            sep: SectionFormat::default(),
            dop: DocumentFormat::default(),
            destination: Destination::Body,
            input: InputMode::Normal,
            stack: GroupStack::new(),
            skip_unknown: false,
            values: [0; 3],
            data: String::new(),
        }
    }

    fn run<R: Read>(&mut self, source: &mut CharSource<R>) -> RtfResult<()> {
        while let Some(ch) = source.next()? {
            if matches!(self.input, InputMode::Binary { .. }) {
                self.parse_char(ch)?;
                continue;
            }

            match ch {
                b'{' => self.push()?,
                b'}' => self.pop()?,
                b'\\' => {
                    let word = read_control_word(source)?;
                    self.translate_keyword(&word)?;
                },
                // Noise outside binary data
                b'\r' | b'\n' => {},
                _ => match self.input {
                    InputMode::Normal => self.parse_char(ch)?,
                    InputMode::Hex { .. } => self.parse_hex(ch)?,
                    InputMode::Binary { .. } => return Err(RtfError::Assertion),
                },
            }
        }

        if self.input != InputMode::Normal {
            return Err(RtfError::EndOfFile);
        }
        if !self.stack.is_empty() {
            return Err(RtfError::UnmatchedBrace);
        }
        if self.destination == Destination::Body {
            self.flush_text()?;
        }
        Ok(())
    }

    fn push(&mut self) -> RtfResult<()> {
        if self.destination == Destination::Body {
            self.flush_text()?;
        }
        self.stack.push(SaveFrame {
            chp: self.chp,
            pap: self.pap,
            sep: self.sep,
            dop: self.dop,
            destination: self.destination,
            input: self.input,
        })?;
        self.input = InputMode::Normal;
        Ok(())
    }

    fn pop(&mut self) -> RtfResult<()> {
        let frame = self.stack.pop()?;

        if self.destination == Destination::Body {
            self.flush_text()?;
        } else if self.destination != frame.destination {
            self.end_group_action();
            self.data.clear();
        }

        self.restore(frame);
        Ok(())
    }

    fn restore(&mut self, frame: SaveFrame) {
        self.chp = frame.chp;
        self.pap = frame.pap;
        self.sep = frame.sep;
        self.dop = frame.dop;
        self.destination = frame.destination;
        self.input = frame.input;
    }

    /// Pop every open group after a failure, finishing destinations on the
    /// way out. Buffered text is dropped.
    fn unwind(&mut self) {
        while let Ok(frame) = self.stack.pop() {
            if self.destination != frame.destination {
                self.end_group_action();
            }
            self.data.clear();
            self.restore(frame);
        }
    }

    /// The current destination is closing.
    fn end_group_action(&mut self) {
        let field = match self.destination {
            Destination::Title => InfoField::Title,
            Destination::Subject => InfoField::Subject,
            Destination::Author => InfoField::Author,
            _ => return,
        };
        let text = std::mem::take(&mut self.data);
        self.doc.set_info(field, text);
    }

    fn translate_keyword(&mut self, word: &ControlWord) -> RtfResult<()> {
        let Some(symbol) = word.keyword_str().and_then(tables::lookup) else {
            log::debug!(
                "ignoring unknown keyword \\{}",
                String::from_utf8_lossy(word.keyword())
            );
            if self.skip_unknown {
                log::debug!("skipping unknown destination");
                if self.destination == Destination::Body {
                    self.flush_text()?;
                }
                self.destination = Destination::Skip;
            }
            self.skip_unknown = false;
            return Ok(());
        };

        self.skip_unknown = false;
        match symbol.kind {
            KeywordKind::Property(property) => {
                self.apply_property(property, symbol.parameter(word.parameter))
            },
            KeywordKind::Character(ch) => self.parse_char(ch),
            KeywordKind::Destination(change) => self.change_destination(change),
            KeywordKind::Special(action) => self.special_keyword(action, word.parameter),
        }
    }

    fn apply_property(&mut self, property: Property, value: i32) -> RtfResult<()> {
        match self.destination {
            Destination::Skip => return Ok(()),
            Destination::Body => self.flush_text()?,
            _ => {},
        }

        let descriptor = property.descriptor();
        let stored = match descriptor.action {
            Action::Special => return self.special_property(property, value),
            Action::Byte => {
                let byte = value as u8;
                match descriptor.target {
                    Target::Character => self.chp.set_byte(property, byte),
                    Target::Paragraph => self.pap.set_byte(property, byte),
                    Target::Section => self.sep.set_byte(property, byte),
                    Target::Document => self.dop.set_byte(property, byte),
                }
            },
            Action::Word => match descriptor.target {
                Target::Character => self.chp.set_word(property, value),
                Target::Paragraph => self.pap.set_word(property, value),
                Target::Section => self.sep.set_word(property, value),
                Target::Document => self.dop.set_word(property, value),
            },
        };

        if stored { Ok(()) } else { Err(RtfError::BadTable) }
    }

    fn special_property(&mut self, property: Property, value: i32) -> RtfResult<()> {
        match property {
            Property::FontFamily | Property::ColorRed => self.values[0] = value,
            Property::ColorGreen => self.values[1] = value,
            Property::ColorBlue => self.values[2] = value,
            Property::ParagraphDefaults => self.pap = ParagraphFormat::default(),
            Property::PlainText => self.chp = CharacterFormat::default(),
            Property::SectionDefaults => self.sep = SectionFormat::default(),
            _ => return Err(RtfError::BadTable),
        }
        Ok(())
    }

    fn change_destination(&mut self, change: DestinationChange) -> RtfResult<()> {
        match self.destination {
            Destination::Skip => return Ok(()),
            Destination::Body => self.flush_text()?,
            _ => {},
        }

        self.destination = match change {
            DestinationChange::FontTable => Destination::FontTable,
            DestinationChange::ColorTable => {
                self.values = [0; 3];
                Destination::ColorTable
            },
            DestinationChange::Info => Destination::Info,
            DestinationChange::Title => Destination::Title,
            DestinationChange::Subject => Destination::Subject,
            DestinationChange::Author => Destination::Author,
            DestinationChange::Skip => {
                log::debug!("skipping destination");
                Destination::Skip
            },
        };
        self.data.clear();
        Ok(())
    }

    fn special_keyword(&mut self, action: SpecialAction, parameter: Option<i32>) -> RtfResult<()> {
        if self.destination == Destination::Skip && action != SpecialAction::Binary {
            return Ok(());
        }

        match action {
            SpecialAction::Binary => {
                let remaining = parameter.unwrap_or(0);
                if remaining > 0 {
                    self.input = InputMode::Binary { remaining };
                }
            },
            SpecialAction::SkipDestination => self.skip_unknown = true,
            SpecialAction::Hex => {
                self.input = InputMode::Hex {
                    nibbles: 2,
                    value: 0,
                }
            },
        }
        Ok(())
    }

    fn parse_hex(&mut self, ch: u8) -> RtfResult<()> {
        let InputMode::Hex { nibbles, value } = self.input else {
            return Err(RtfError::Assertion);
        };
        let digit = char::from(ch).to_digit(16).ok_or(RtfError::InvalidHex)? as u8;
        let value = (value << 4) | digit;

        if nibbles > 1 {
            self.input = InputMode::Hex {
                nibbles: nibbles - 1,
                value,
            };
            Ok(())
        } else {
            self.input = InputMode::Normal;
            self.parse_char(value)
        }
    }

    /// Route one character to the current destination.
    fn parse_char(&mut self, ch: u8) -> RtfResult<()> {
        if let InputMode::Binary { remaining } = self.input {
            self.input = if remaining > 1 {
                InputMode::Binary {
                    remaining: remaining - 1,
                }
            } else {
                InputMode::Normal
            };
        }

        match self.destination {
            Destination::Body => match ch {
                b'\t' => {
                    self.flush_text()?;
                    self.doc.add_tab(self.engine, &self.chp, &self.pap)
                },
                b'\r' | b'\n' => {
                    self.flush_text()?;
                    self.doc.add_line(self.engine, &self.chp, &self.pap)
                },
                _ => {
                    self.print_char(ch);
                    Ok(())
                },
            },
            Destination::Skip | Destination::Info => Ok(()),
            Destination::FontTable => {
                if ch == b';' {
                    self.commit_font();
                } else {
                    self.print_char(ch);
                }
                Ok(())
            },
            Destination::ColorTable => {
                if ch == b';' {
                    let [red, green, blue] = self.values;
                    self.doc.add_color(Color::from_components(red, green, blue));
                    self.values = [0; 3];
                }
                Ok(())
            },
            Destination::Title | Destination::Subject | Destination::Author => {
                self.print_char(ch);
                Ok(())
            },
        }
    }

    fn commit_font(&mut self) {
        let name = self.data.trim();
        self.doc.add_font(FontEntry::new(
            self.chp.font,
            name,
            FontFamily::from_index(self.values[0]),
            self.chp.font_charset,
        ));
        self.data.clear();
        self.values[0] = 0;
    }

    /// Append a Windows-1252 character to the text buffer.
    fn print_char(&mut self, ch: u8) {
        // Curly quotes are missing from many font maps
        if ch == 147 || ch == 148 {
            self.data.push('"');
            return;
        }
        let bytes = [ch];
        let (decoded, _) = WINDOWS_1252.decode_without_bom_handling(&bytes);
        self.data.push_str(&decoded);
    }

    /// Commit buffered body text as a run.
    fn flush_text(&mut self) -> RtfResult<()> {
        if self.data.is_empty() {
            return Ok(());
        }
        let text = std::mem::take(&mut self.data);
        self.doc.add_text(self.engine, &text, &self.chp, &self.pap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::testing::{FixedPitchEngine, TestFont};
    use crate::rtf::types::Justification;

    fn parse_str(input: &str) -> (RtfResult<()>, Document<TestFont>) {
        let mut engine = FixedPitchEngine::new();
        let mut doc = Document::new(24);
        let result = parse(input.as_bytes(), &mut engine, &mut doc);
        (result, doc)
    }

    fn texts(doc: &Document<TestFont>) -> Vec<Vec<String>> {
        doc.lines()
            .iter()
            .map(|line| line.runs().iter().map(|run| run.text().to_owned()).collect())
            .collect()
    }

    #[test]
    fn test_plain_document() {
        let (result, doc) = parse_str(r"{\rtf1\ansi Hello world}");
        result.unwrap();
        assert_eq!(texts(&doc), vec![vec!["Hello world"]]);
        assert_eq!(doc.info().title, "");
        assert_eq!(doc.info().author, "");
        assert_eq!(doc.info().subject, "");
    }

    #[test]
    fn test_bold_runs() {
        let (result, doc) = parse_str(r"{\b bold\b0  plain}");
        result.unwrap();
        let runs = doc.lines()[0].runs();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text(), "bold");
        assert!(runs[0].format().bold);
        assert_eq!(runs[1].text(), " plain");
        assert!(!runs[1].format().bold);
    }

    #[test]
    fn test_group_restores_format() {
        let (result, doc) = parse_str(r"{a{\i b}c}");
        result.unwrap();
        let runs = doc.lines()[0].runs();
        let italic: Vec<bool> = runs.iter().map(|run| run.format().italic).collect();
        assert_eq!(texts(&doc), vec![vec!["a", "b", "c"]]);
        assert_eq!(italic, vec![false, true, false]);
    }

    #[test]
    fn test_tab_counts() {
        let (result, doc) = parse_str(r"{a\tab b}");
        result.unwrap();
        let runs = doc.lines()[0].runs();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].text(), "b");
        assert_eq!(runs[1].tabs(), 1);
    }

    #[test]
    fn test_paragraphs() {
        let (result, doc) = parse_str("{one\\par two\\line\r\nthree}");
        result.unwrap();
        assert_eq!(texts(&doc), vec![vec!["one"], vec!["two"], vec!["three"]]);
    }

    #[test]
    fn test_tables_and_info() {
        let input = concat!(
            r"{\rtf1{\fonttbl{\f0\froman\fcharset0 Times;}{\f1\fswiss Arial;}}",
            r"{\colortbl;\red255\green0\blue0;}",
            r"{\info{\title My Doc}{\author Jo}{\subject Tests}}",
            r"\f1\cf1 red text}"
        );
        let (result, doc) = parse_str(input);
        result.unwrap();

        let fonts = doc.fonts().entries();
        assert_eq!(fonts.len(), 2);
        assert_eq!(fonts[0].name, "Times");
        assert_eq!(fonts[0].family, FontFamily::Roman);
        assert_eq!(fonts[1].id, 1);
        assert_eq!(fonts[1].family, FontFamily::Swiss);

        assert_eq!(doc.colors().len(), 2);
        assert_eq!(doc.colors().get(1), Color::new(255, 0, 0));

        assert_eq!(doc.info().title, "My Doc");
        assert_eq!(doc.info().author, "Jo");
        assert_eq!(doc.info().subject, "Tests");

        let run = &doc.lines()[0].runs()[0];
        assert_eq!(run.text(), "red text");
        assert_eq!(run.color(), Color::new(255, 0, 0));
        assert_eq!(doc.fonts().get(run.font()).unwrap().name, "Arial");
    }

    #[test]
    fn test_skip_unknown_destination() {
        let (result, doc) = parse_str(r"{a{\*\unknowndest hidden {nested} text}b}");
        result.unwrap();
        assert_eq!(texts(&doc), vec![vec!["a", "b"]]);
    }

    #[test]
    fn test_text_before_skipped_destination_is_kept() {
        let (result, doc) = parse_str(r"{x{a\*\foo hidden}b}");
        result.unwrap();
        assert_eq!(texts(&doc), vec![vec!["x", "a", "b"]]);
    }

    #[test]
    fn test_known_destination_after_marker_is_kept() {
        let (result, doc) = parse_str(r"{{\*\title Kept}x}");
        result.unwrap();
        assert_eq!(doc.info().title, "Kept");
        assert_eq!(texts(&doc), vec![vec!["x"]]);
    }

    #[test]
    fn test_unknown_keyword_ignored() {
        let (result, doc) = parse_str(r"{a\foo b}");
        result.unwrap();
        assert_eq!(texts(&doc), vec![vec!["ab"]]);
    }

    #[test]
    fn test_skipped_destinations() {
        let (result, doc) = parse_str(r"{a{\pict 0123abcd}{\footnote note}b}");
        result.unwrap();
        assert_eq!(texts(&doc), vec![vec!["a", "b"]]);
    }

    #[test]
    fn test_hex_escape() {
        let (result, doc) = parse_str(r"{caf\'e9 \'93q\'94}");
        result.unwrap();
        assert_eq!(texts(&doc), vec![vec!["caf\u{e9} \"q\""]]);
    }

    #[test]
    fn test_windows_1252_punctuation() {
        let (result, doc) = parse_str(r"{a\'96b\'85\'80}");
        result.unwrap();
        assert_eq!(texts(&doc), vec![vec!["a\u{2013}b\u{2026}\u{20ac}"]]);
    }

    #[test]
    fn test_invalid_hex() {
        let (result, _) = parse_str(r"{\'zz}");
        assert!(matches!(result, Err(RtfError::InvalidHex)));
    }

    #[test]
    fn test_binary_bypasses_control_parsing() {
        let (result, doc) = parse_str(r"{\bin3 {}\x}");
        result.unwrap();
        assert_eq!(texts(&doc), vec![vec!["{}\\x"]]);

        let (result, doc) = parse_str(r"{\bin0 a}");
        result.unwrap();
        assert_eq!(texts(&doc), vec![vec!["a"]]);
    }

    #[test]
    fn test_binary_allowed_while_skipping() {
        let (result, doc) = parse_str(r"{{\pict\bin2 }}}a}");
        result.unwrap();
        assert_eq!(texts(&doc), vec![vec!["a"]]);
    }

    #[test]
    fn test_eof_inside_binary() {
        let (result, _) = parse_str(r"{\bin10 ab");
        assert!(matches!(result, Err(RtfError::EndOfFile)));
    }

    #[test]
    fn test_eof_inside_keyword() {
        let (result, _) = parse_str(r"{\par");
        assert!(matches!(result, Err(RtfError::EndOfFile)));
    }

    #[test]
    fn test_unmatched_close() {
        let (result, doc) = parse_str(r"{a}}");
        assert!(matches!(result, Err(RtfError::StackUnderflow)));
        assert_eq!(texts(&doc), vec![vec!["a"]]);
    }

    #[test]
    fn test_unterminated_group() {
        let (result, _) = parse_str(r"{\rtf1 unterminated");
        assert!(matches!(result, Err(RtfError::UnmatchedBrace)));
    }

    #[test]
    fn test_unwind_finishes_destinations() {
        let (result, _) = parse_str(r"{\info{\title Partial");
        assert!(result.is_err());
        let (result, doc) = parse_str(r"{\info{\title Partial \'zz}}");
        assert!(matches!(result, Err(RtfError::InvalidHex)));
        assert_eq!(doc.info().title, "Partial ");
    }

    #[test]
    fn test_paragraph_properties() {
        let (result, doc) = parse_str(r"{\qc\li720 centered\par\pard left}");
        result.unwrap();
        let lines = doc.lines();
        assert_eq!(lines[0].paragraph().justification, Justification::Center);
        assert_eq!(lines[0].paragraph().left_indent, 720);
        assert_eq!(lines[1].paragraph().justification, Justification::Left);
    }

    #[test]
    fn test_plain_resets_character_format() {
        let (result, doc) = parse_str(r"{\b\i\fs36 a\plain b}");
        result.unwrap();
        let runs = doc.lines()[0].runs();
        assert_eq!(runs[0].line_height(), 18);
        assert!(runs[0].format().italic);
        assert_eq!(*runs[1].format(), CharacterFormat::default());
        assert_eq!(runs[1].line_height(), 12);
    }

    #[test]
    fn test_empty_font_table_without_fallback() {
        let mut engine = FixedPitchEngine::new().without_fallback();
        let mut doc = Document::new(24);
        let result = parse(&b"{text}"[..], &mut engine, &mut doc);
        assert!(matches!(result, Err(RtfError::FontNotFound)));
    }

    #[cfg(test)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn keyword_strategy() -> impl Strategy<Value = &'static str> {
            prop_oneof![
                Just(r"\b"),
                Just(r"\i0"),
                Just(r"\ul"),
                Just(r"\fs40"),
                Just(r"\f2"),
                Just(r"\cf3"),
                Just(r"\qc"),
                Just(r"\li360"),
                Just(r"\pard"),
                Just(r"\plain"),
                Just(r"\cols2"),
                Just(r"\landscape"),
                Just(r"\margl100"),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            #[test]
            fn prop_groups_restore_state(
                depth in 1usize..20,
                keywords in prop::collection::vec(keyword_strategy(), 1..20),
            ) {
                let mut engine = FixedPitchEngine::new();
                let mut doc = Document::new(24);
                let mut parser = Parser::new(&mut engine, &mut doc);
                parser.chp.underline = true;
                parser.pap.right_indent = 99;

                let before = (parser.chp, parser.pap, parser.sep, parser.dop, parser.destination);

                let mut input = String::new();
                for level in 0..depth {
                    input.push('{');
                    input.push_str(keywords[level % keywords.len()]);
                    input.push(' ');
                }
                input.push_str(&"}".repeat(depth));

                let mut source = CharSource::new(input.as_bytes());
                prop_assert!(parser.run(&mut source).is_ok());
                let after = (parser.chp, parser.pap, parser.sep, parser.dop, parser.destination);
                prop_assert_eq!(before, after);
                prop_assert!(parser.stack.is_empty());
            }
        }
    }
}
