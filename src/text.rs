//! The `Text` value type and its escape-aware code point iterator.
//!
//! Grounded in `original_source/src/text.c` and `text.h`: a `text` there is a
//! byte pointer plus a packed attribute word (size, a non-ASCII bit, an
//! unresolved-escape bit). Rust's slice already carries its own length, so
//! this crate keeps the two flag bits as plain fields rather than packing
//! them into the length the way the C struct does.

use crate::error::{CorpusError, Result};
use crate::unicode;

/// A validated, possibly JSON-escaped run of UTF-8 bytes.
///
/// Borrows its bytes; cheap to copy. `has_escape` marks that `\n`-style
/// backslash escapes (including `\uXXXX`) appear in the byte range and must
/// be resolved by [`TextIter`] rather than read directly off the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Text<'a> {
    bytes: &'a [u8],
    non_ascii: bool,
    has_escape: bool,
}

impl<'a> Text<'a> {
    /// Validates `bytes` as UTF-8 (optionally escaped) and classifies it,
    /// mirroring `text_assign`.
    pub fn assign(bytes: &'a [u8]) -> Result<Self> {
        let mut non_ascii = false;
        let mut has_escape = false;
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            if b == b'\\' {
                has_escape = true;
                i += 1;
                continue;
            }
            if b >= 0x80 {
                non_ascii = true;
            }
            i += 1;
        }
        // Validate the non-escaped bytes decode as UTF-8; escapes are
        // validated lazily by `TextIter` since `\uXXXX` never appears as raw
        // UTF-8 bytes in the first place.
        unicode::validate(bytes)?;
        Ok(Text { bytes, non_ascii, has_escape })
    }

    /// Builds a `Text` from bytes already known to be valid, skipping the
    /// scan. Used internally once a span has already been validated.
    pub(crate) fn from_validated(bytes: &'a [u8], non_ascii: bool, has_escape: bool) -> Self {
        Text { bytes, non_ascii, has_escape }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn is_ascii(&self) -> bool {
        !self.non_ascii && !self.has_escape
    }

    pub fn has_escape(&self) -> bool {
        self.has_escape
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn iter(&self) -> TextIter<'a> {
        TextIter { bytes: self.bytes, pos: 0, has_escape: self.has_escape }
    }

    /// Decodes the full value to code points. Used by the few call sites
    /// that need random or backward access (sentence suppression, casefold
    /// fixed-point expansion) rather than a forward streaming scan.
    pub fn code_points(&self) -> Result<Vec<u32>> {
        self.iter().collect()
    }
}

/// Forward iterator over the code points of a `Text`, resolving backslash
/// escapes as it goes. Grounded in `text_iter_advance`.
pub struct TextIter<'a> {
    bytes: &'a [u8],
    pos: usize,
    has_escape: bool,
}

impl<'a> TextIter<'a> {
    pub fn byte_offset(&self) -> usize {
        self.pos
    }

    fn decode_escape(&mut self) -> Result<u32> {
        // `self.bytes[self.pos]` is the byte just after the backslash.
        let start = self.pos - 1;
        let b = self.bytes[self.pos];
        self.pos += 1;
        let cp = match b {
            b'n' => 0x0A,
            b't' => 0x09,
            b'r' => 0x0D,
            b'b' => 0x08,
            b'f' => 0x0C,
            b'\\' => 0x5C,
            b'"' => 0x22,
            b'/' => 0x2F,
            b'u' => {
                let hi = self.read_hex4(start)?;
                if unicode::is_utf16_high_surrogate(hi) {
                    if self.bytes.get(self.pos) == Some(&b'\\')
                        && self.bytes.get(self.pos + 1) == Some(&b'u')
                    {
                        self.pos += 2;
                        let lo = self.read_hex4(start)?;
                        if unicode::is_utf16_low_surrogate(lo) {
                            unicode::decode_utf16_pair(hi, lo)
                        } else {
                            return Err(CorpusError::invalid_input(
                                start,
                                "unpaired UTF-16 surrogate in \\u escape",
                            ));
                        }
                    } else {
                        return Err(CorpusError::invalid_input(
                            start,
                            "unpaired UTF-16 high surrogate in \\u escape",
                        ));
                    }
                } else if unicode::is_utf16_low_surrogate(hi) {
                    return Err(CorpusError::invalid_input(
                        start,
                        "unpaired UTF-16 low surrogate in \\u escape",
                    ));
                } else {
                    hi
                }
            }
            other => {
                return Err(CorpusError::invalid_input(
                    start,
                    format!("unrecognized escape '\\{}'", other as char),
                ))
            }
        };
        Ok(cp)
    }

    fn read_hex4(&mut self, escape_start: usize) -> Result<u32> {
        if self.pos + 4 > self.bytes.len() {
            return Err(CorpusError::invalid_input(escape_start, "truncated \\u escape"));
        }
        let mut v: u32 = 0;
        for _ in 0..4 {
            let b = self.bytes[self.pos];
            self.pos += 1;
            let d = match b {
                b'0'..=b'9' => b - b'0',
                b'a'..=b'f' => b - b'a' + 10,
                b'A'..=b'F' => b - b'A' + 10,
                _ => {
                    return Err(CorpusError::invalid_input(
                        escape_start,
                        "non-hex digit in \\u escape",
                    ))
                }
            };
            v = (v << 4) | d as u32;
        }
        Ok(v)
    }
}

impl<'a> Iterator for TextIter<'a> {
    type Item = Result<u32>;

    fn next(&mut self) -> Option<Result<u32>> {
        if self.pos >= self.bytes.len() {
            return None;
        }
        if self.has_escape && self.bytes[self.pos] == b'\\' {
            self.pos += 1;
            return Some(self.decode_escape());
        }
        let (cp, len) = match unicode::decode_one(&self.bytes[self.pos..]) {
            Ok(v) => v,
            Err(e) => return Some(Err(e)),
        };
        self.pos += len;
        Some(Ok(cp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_round_trips() {
        let t = Text::assign(b"hello").unwrap();
        assert!(t.is_ascii());
        let cps: Vec<u32> = t.code_points().unwrap();
        assert_eq!(cps, vec![104, 101, 108, 108, 111]);
    }

    #[test]
    fn rejects_invalid_utf8() {
        assert!(Text::assign(&[0xFF, 0xFE]).is_err());
    }

    #[test]
    fn resolves_simple_escapes() {
        let t = Text::assign(b"a\\nb").unwrap();
        assert!(t.has_escape());
        let cps = t.code_points().unwrap();
        assert_eq!(cps, vec![b'a' as u32, 0x0A, b'b' as u32]);
    }

    #[test]
    fn resolves_unicode_escape() {
        let t = Text::assign(b"\\u00e9").unwrap();
        let cps = t.code_points().unwrap();
        assert_eq!(cps, vec![0xE9]);
    }

    #[test]
    fn resolves_surrogate_pair_escape() {
        // U+1F600 GRINNING FACE, encoded as a UTF-16 surrogate pair escape.
        let t = Text::assign(b"\\ud83d\\ude00").unwrap();
        let cps = t.code_points().unwrap();
        assert_eq!(cps, vec![0x1F600]);
    }

    #[test]
    fn rejects_unpaired_high_surrogate() {
        let t = Text::assign(b"\\ud83dx").unwrap();
        assert!(t.code_points().is_err());
    }

    #[test]
    fn non_ascii_flag_set_for_multibyte_input() {
        let t = Text::assign("café".as_bytes()).unwrap();
        assert!(!t.is_ascii());
    }
}
