//! Control word reader.
//!
//! The parser hands over to this module right after it consumes a `\`. A
//! control word is a run of ASCII letters with an optional signed decimal
//! parameter; anything else after the backslash is a one-byte control
//! symbol. A single space ends a control word and is consumed; any other
//! terminator is pushed back for the parser.

use super::error::{RtfError, RtfResult};
use super::source::CharSource;
use smallvec::SmallVec;
use std::io::Read;

/// Longest keyword kept; further letters terminate the keyword.
pub const MAX_KEYWORD_LEN: usize = 30;

/// Longest parameter kept; further digits are read and dropped.
pub const MAX_PARAM_DIGITS: usize = 20;

/// A control word or control symbol with its optional parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlWord {
    keyword: SmallVec<[u8; 32]>,
    /// Parameter clamped to the `i32` range
    pub parameter: Option<i32>,
}

impl ControlWord {
    /// Keyword bytes without the leading backslash.
    #[inline]
    pub fn keyword(&self) -> &[u8] {
        &self.keyword
    }

    /// Keyword as text, if it is valid UTF-8. Control words always are;
    /// control symbols above 0x7F are not.
    #[inline]
    pub fn keyword_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.keyword).ok()
    }
}

#[inline]
fn next_or_eof<R: Read>(source: &mut CharSource<R>) -> RtfResult<u8> {
    source.next()?.ok_or(RtfError::EndOfFile)
}

/// Read one control word. The backslash must already be consumed.
pub fn read_control_word<R: Read>(source: &mut CharSource<R>) -> RtfResult<ControlWord> {
    let mut ch = next_or_eof(source)?;

    if !ch.is_ascii_alphabetic() {
        let mut keyword = SmallVec::new();
        keyword.push(ch);
        return Ok(ControlWord {
            keyword,
            parameter: None,
        });
    }

    let mut keyword: SmallVec<[u8; 32]> = SmallVec::new();
    while keyword.len() < MAX_KEYWORD_LEN && ch.is_ascii_alphabetic() {
        keyword.push(ch);
        ch = next_or_eof(source)?;
    }

    let negative = ch == b'-';
    if negative {
        ch = next_or_eof(source)?;
    }

    let mut parameter = None;
    if ch.is_ascii_digit() {
        let mut digits: SmallVec<[u8; MAX_PARAM_DIGITS]> = SmallVec::new();
        while digits.len() < MAX_PARAM_DIGITS && ch.is_ascii_digit() {
            digits.push(ch);
            ch = next_or_eof(source)?;
        }
        // Already saturated
        while ch.is_ascii_digit() {
            ch = next_or_eof(source)?;
        }
        parameter = Some(parse_parameter(&digits, negative));
    }

    if ch != b' ' {
        source.pushback(ch);
    }

    Ok(ControlWord { keyword, parameter })
}

/// Parse decimal digits, saturating at the `i32` bounds.
fn parse_parameter(digits: &[u8], negative: bool) -> i32 {
    let magnitude = atoi_simd::parse::<i64>(digits).unwrap_or(i64::MAX);
    let value = if negative { -magnitude } else { magnitude };
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(input: &[u8]) -> (ControlWord, Option<u8>) {
        let mut source = CharSource::new(input);
        let word = read_control_word(&mut source).unwrap();
        let next = source.next().unwrap();
        (word, next)
    }

    #[test]
    fn test_word_with_parameter() {
        let (word, next) = read(b"fs24 text");
        assert_eq!(word.keyword(), b"fs");
        assert_eq!(word.parameter, Some(24));
        assert_eq!(next, Some(b't'));
    }

    #[test]
    fn test_negative_parameter() {
        let (word, next) = read(b"li-360\\par");
        assert_eq!(word.keyword_str(), Some("li"));
        assert_eq!(word.parameter, Some(-360));
        assert_eq!(next, Some(b'\\'));
    }

    #[test]
    fn test_terminator_pushed_back() {
        let (word, next) = read(b"b}");
        assert_eq!(word.keyword(), b"b");
        assert_eq!(word.parameter, None);
        assert_eq!(next, Some(b'}'));
    }

    #[test]
    fn test_only_one_space_consumed() {
        let (_, next) = read(b"par  x");
        assert_eq!(next, Some(b' '));
    }

    #[test]
    fn test_control_symbol() {
        let (word, next) = read(b"{rest");
        assert_eq!(word.keyword(), b"{");
        assert_eq!(word.parameter, None);
        assert_eq!(next, Some(b'r'));

        let (word, _) = read(b"\xe9");
        assert_eq!(word.keyword(), b"\xe9");
        assert_eq!(word.keyword_str(), None);
    }

    #[test]
    fn test_keyword_length_bound() {
        let input = [b'a'; 40];
        let (word, next) = read(&input);
        assert_eq!(word.keyword().len(), MAX_KEYWORD_LEN);
        assert_eq!(next, Some(b'a'));
    }

    #[test]
    fn test_parameter_saturates() {
        let (word, _) = read(b"fs99999999999 ");
        assert_eq!(word.parameter, Some(i32::MAX));
        let (word, _) = read(b"fs-99999999999 ");
        assert_eq!(word.parameter, Some(i32::MIN));
    }

    #[test]
    fn test_overlong_parameter_consumed() {
        let (word, next) = read(b"fs123456789012345678901234 x");
        assert_eq!(word.keyword(), b"fs");
        assert_eq!(word.parameter, Some(i32::MAX));
        assert_eq!(next, Some(b'x'));
    }

    #[test]
    fn test_eof_mid_token() {
        let mut source = CharSource::new(&b"par"[..]);
        assert!(matches!(
            read_control_word(&mut source),
            Err(RtfError::EndOfFile)
        ));

        let mut source = CharSource::new(&b""[..]);
        assert!(matches!(
            read_control_word(&mut source),
            Err(RtfError::EndOfFile)
        ));
    }
}
