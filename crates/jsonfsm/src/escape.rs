//! String escape handling.
//!
//! The parser only validates and delimits escapes: `\uXXXX` digits are
//! accumulated one byte at a time by [`HexAccumulator`] and reported as a
//! UTF-16 code unit. Turning a raw span into text is the host's job;
//! [`Unescape`] does it without allocating.

use bstr::ByteSlice;
use thiserror::Error;

/// Accumulates exactly four hexadecimal digits into a UTF-16 code unit.
///
/// Digits may arrive across chunk boundaries. After the fourth digit the
/// accumulator resets itself for the next escape.
#[derive(Debug, Default)]
pub(crate) struct HexAccumulator {
    acc: u16,
    len: u8,
}

/// Reasons for a bad digit, one per position in the escape.
const HEX_POSITION_REASONS: [&str; 4] = [
    "Invalid hexadecimal digit at position 1 of unicode escape",
    "Invalid hexadecimal digit at position 2 of unicode escape",
    "Invalid hexadecimal digit at position 3 of unicode escape",
    "Invalid hexadecimal digit at position 4 of unicode escape",
];

impl HexAccumulator {
    pub(crate) fn reset(&mut self) {
        self.acc = 0;
        self.len = 0;
    }

    /// Value of one ASCII hex digit. Case is folded before matching.
    #[inline]
    fn hex_val(byte: u8) -> Option<u16> {
        match byte.to_ascii_lowercase() {
            b @ b'0'..=b'9' => Some(u16::from(b - b'0')),
            b @ b'a'..=b'f' => Some(u16::from(b - b'a' + 10)),
            _ => None,
        }
    }

    /// Feeds one digit.
    ///
    /// - `Ok(None)` while fewer than four digits have been seen.
    /// - `Ok(Some(unit))` on the fourth digit.
    /// - `Err(reason)` naming the position of a non-hex byte.
    pub(crate) fn feed(&mut self, byte: u8) -> Result<Option<u16>, &'static str> {
        let Some(digit) = Self::hex_val(byte) else {
            let reason = HEX_POSITION_REASONS[usize::from(self.len.min(3))];
            self.reset();
            return Err(reason);
        };
        self.acc = (self.acc << 4) | digit;
        self.len += 1;
        if self.len < 4 {
            return Ok(None);
        }
        let unit = self.acc;
        self.reset();
        Ok(Some(unit))
    }
}

/// Error decoding a raw string span.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UnescapeError {
    /// Bytes at this offset of the span are not valid UTF-8.
    #[error("invalid UTF-8 at offset {0}")]
    InvalidUtf8(usize),
    /// An escape sequence at this offset is malformed or truncated.
    #[error("invalid escape sequence at offset {0}")]
    InvalidEscape(usize),
    /// A surrogate code unit was not part of a valid pair.
    #[error("unpaired surrogate \\u{0:04X}")]
    UnpairedSurrogate(u16),
}

/// Decodes the raw content of a JSON string into `char`s.
///
/// Feed it the bytes covered by a [`Span`](crate::Span) (escape sequences
/// verbatim). Surrogate pairs written as two `\uXXXX` escapes are combined.
///
/// ```rust
/// use jsonfsm::escape::Unescape;
///
/// let text: String = Unescape::new(br#"a\n\u00e9\uD83D\uDE00"#)
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(text, "a\n\u{e9}\u{1F600}");
/// ```
#[derive(Debug, Clone)]
pub struct Unescape<'a> {
    raw: &'a [u8],
    pos: usize,
}

impl<'a> Unescape<'a> {
    /// Starts decoding `raw`.
    #[must_use]
    pub fn new(raw: &'a [u8]) -> Self {
        Self { raw, pos: 0 }
    }

    fn unit_at(&self, at: usize) -> Option<u16> {
        let digits = self.raw.get(at..at + 4)?;
        let mut acc = HexAccumulator::default();
        let mut unit = None;
        for &b in digits {
            unit = acc.feed(b).ok()?;
        }
        unit
    }

    fn escape(&mut self) -> Result<char, UnescapeError> {
        let at = self.pos;
        let Some(&kind) = self.raw.get(at + 1) else {
            return Err(UnescapeError::InvalidEscape(at));
        };
        self.pos += 2;
        let ch = match kind {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{8}',
            b'f' => '\u{c}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => return self.unicode(at),
            _ => return Err(UnescapeError::InvalidEscape(at)),
        };
        Ok(ch)
    }

    fn unicode(&mut self, at: usize) -> Result<char, UnescapeError> {
        let high = self
            .unit_at(self.pos)
            .ok_or(UnescapeError::InvalidEscape(at))?;
        self.pos += 4;
        match high {
            0xD800..=0xDBFF => {
                let rest = &self.raw[self.pos..];
                if !rest.starts_with(b"\\u") {
                    return Err(UnescapeError::UnpairedSurrogate(high));
                }
                let low = self
                    .unit_at(self.pos + 2)
                    .ok_or(UnescapeError::InvalidEscape(self.pos))?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(UnescapeError::UnpairedSurrogate(high));
                }
                self.pos += 6;
                let code = 0x1_0000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                char::from_u32(code).ok_or(UnescapeError::UnpairedSurrogate(high))
            }
            0xDC00..=0xDFFF => Err(UnescapeError::UnpairedSurrogate(high)),
            _ => char::from_u32(u32::from(high)).ok_or(UnescapeError::UnpairedSurrogate(high)),
        }
    }
}

impl Iterator for Unescape<'_> {
    type Item = Result<char, UnescapeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.raw.get(self.pos..)?;
        if rest.is_empty() {
            return None;
        }
        if rest[0] == b'\\' {
            let item = self.escape();
            if item.is_err() {
                // stop after the first error
                self.pos = self.raw.len();
            }
            return Some(item);
        }
        let (ch, size) = bstr::decode_utf8(rest);
        match ch {
            Some(ch) => {
                self.pos += size;
                Some(Ok(ch))
            }
            None => {
                let at = self.pos;
                self.pos = self.raw.len();
                Some(Err(UnescapeError::InvalidUtf8(at)))
            }
        }
    }
}

/// Whether `raw` contains any escape sequence, i.e. whether it can be used
/// as text without decoding.
#[must_use]
pub fn needs_unescape(raw: &[u8]) -> bool {
    raw.find_byte(b'\\').is_some()
}
