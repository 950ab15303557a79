//! UTF-8 decode/validate/encode, canonical normalization, and case folding.
//!
//! Grounded in the teacher's `validate.rs`, `helpers.rs`, `cp_iter.rs`, and
//! `normalise.rs`. The bit manipulation for multi-byte decode/encode follows
//! `helpers.rs`'s `decode_double/triple/quad`/`encode` closely; the
//! normalization algorithm (decompose, canonical-order, compose with
//! blocking) follows `normalise.rs`'s `decompose`/`to_nfd`/`to_nfc` with the
//! compatibility-class bitmask from `original_source/src/unicode.h` folded
//! in so the same machinery serves both NFC and NFKC.

pub mod tables;

use crate::error::{CorpusError, Result};

pub const REPLACEMENT_CHARACTER: u32 = 0xFFFD;
pub const UNICODE_MAX: u32 = 0x10FFFF;

pub fn is_utf16_high_surrogate(u: u32) -> bool {
    (0xD800..=0xDBFF).contains(&u)
}

pub fn is_utf16_low_surrogate(u: u32) -> bool {
    (0xDC00..=0xDFFF).contains(&u)
}

pub fn decode_utf16_pair(hi: u32, lo: u32) -> u32 {
    0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00)
}

fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}

/// Validates that `bytes` is well-formed UTF-8, the way `validate.rs`'s
/// `CodeUnit`-driven scan does, reporting the offset of the first bad byte.
pub fn validate(bytes: &[u8]) -> Result<()> {
    let mut i = 0;
    while i < bytes.len() {
        let (_, len) = decode_one(&bytes[i..]).map_err(|e| match e {
            CorpusError::InvalidInput { message, .. } => CorpusError::invalid_input(i, message),
            other => other,
        })?;
        i += len;
    }
    Ok(())
}

/// Decodes one code point from the front of `bytes`, returning it with its
/// encoded length. Rejects overlong encodings, surrogate code points, and
/// out-of-range code points, mirroring `helpers.rs`'s `decode_double/triple/
/// quad` plus `is_valid_codepoint`.
pub fn decode_one(bytes: &[u8]) -> Result<(u32, usize)> {
    let b0 = *bytes
        .first()
        .ok_or_else(|| CorpusError::invalid_input(0, "empty input"))?;

    if b0 < 0x80 {
        return Ok((b0 as u32, 1));
    }
    if b0 & 0xE0 == 0xC0 {
        let b1 = *bytes.get(1).ok_or_else(|| {
            CorpusError::invalid_input(0, "incomplete two-byte UTF-8 sequence")
        })?;
        if !is_continuation(b1) {
            return Err(CorpusError::invalid_input(0, "expected UTF-8 continuation byte"));
        }
        let cp = (((b0 & 0x1F) as u32) << 6) | (b1 & 0x3F) as u32;
        if cp < 0x80 {
            return Err(CorpusError::invalid_input(0, "overlong two-byte UTF-8 encoding"));
        }
        return Ok((cp, 2));
    }
    if b0 & 0xF0 == 0xE0 {
        let b1 = *bytes.get(1).ok_or_else(|| {
            CorpusError::invalid_input(0, "incomplete three-byte UTF-8 sequence")
        })?;
        let b2 = *bytes.get(2).ok_or_else(|| {
            CorpusError::invalid_input(0, "incomplete three-byte UTF-8 sequence")
        })?;
        if !is_continuation(b1) || !is_continuation(b2) {
            return Err(CorpusError::invalid_input(0, "expected UTF-8 continuation byte"));
        }
        let cp = (((b0 & 0x0F) as u32) << 12)
            | (((b1 & 0x3F) as u32) << 6)
            | (b2 & 0x3F) as u32;
        if cp < 0x800 {
            return Err(CorpusError::invalid_input(0, "overlong three-byte UTF-8 encoding"));
        }
        if is_utf16_high_surrogate(cp) || is_utf16_low_surrogate(cp) {
            return Err(CorpusError::invalid_input(0, "surrogate code point in UTF-8"));
        }
        return Ok((cp, 3));
    }
    if b0 & 0xF8 == 0xF0 {
        let b1 = *bytes.get(1).ok_or_else(|| {
            CorpusError::invalid_input(0, "incomplete four-byte UTF-8 sequence")
        })?;
        let b2 = *bytes.get(2).ok_or_else(|| {
            CorpusError::invalid_input(0, "incomplete four-byte UTF-8 sequence")
        })?;
        let b3 = *bytes.get(3).ok_or_else(|| {
            CorpusError::invalid_input(0, "incomplete four-byte UTF-8 sequence")
        })?;
        if !is_continuation(b1) || !is_continuation(b2) || !is_continuation(b3) {
            return Err(CorpusError::invalid_input(0, "expected UTF-8 continuation byte"));
        }
        let cp = (((b0 & 0x07) as u32) << 18)
            | (((b1 & 0x3F) as u32) << 12)
            | (((b2 & 0x3F) as u32) << 6)
            | (b3 & 0x3F) as u32;
        if cp < 0x10000 {
            return Err(CorpusError::invalid_input(0, "overlong four-byte UTF-8 encoding"));
        }
        if cp > UNICODE_MAX {
            return Err(CorpusError::invalid_input(0, "code point exceeds U+10FFFF"));
        }
        return Ok((cp, 4));
    }
    Err(CorpusError::invalid_input(0, "invalid UTF-8 lead byte"))
}

/// Encodes `cp` as UTF-8, appending to `out`. Mirrors `helpers.rs`'s
/// `encode`.
pub fn encode_utf8(cp: u32, out: &mut Vec<u8>) {
    if cp < 0x80 {
        out.push(cp as u8);
    } else if cp < 0x800 {
        out.push(0xC0 | (cp >> 6) as u8);
        out.push(0x80 | (cp & 0x3F) as u8);
    } else if cp < 0x10000 {
        out.push(0xE0 | (cp >> 12) as u8);
        out.push(0x80 | ((cp >> 6) & 0x3F) as u8);
        out.push(0x80 | (cp & 0x3F) as u8);
    } else {
        out.push(0xF0 | (cp >> 18) as u8);
        out.push(0x80 | ((cp >> 12) & 0x3F) as u8);
        out.push(0x80 | ((cp >> 6) & 0x3F) as u8);
        out.push(0x80 | (cp & 0x3F) as u8);
    }
}

pub fn combining_class(cp: u32) -> u8 {
    tables::COMBINING_CLASSES.get(&cp).copied().unwrap_or(0)
}

pub fn is_starter(cp: u32) -> bool {
    combining_class(cp) == 0
}

pub fn is_default_ignorable(cp: u32) -> bool {
    tables::is_default_ignorable(cp)
}

const HANGUL_SBASE: u32 = 0xAC00;
const HANGUL_LBASE: u32 = 0x1100;
const HANGUL_VBASE: u32 = 0x1161;
const HANGUL_TBASE: u32 = 0x11A7;
const HANGUL_LCOUNT: u32 = 19;
const HANGUL_VCOUNT: u32 = 21;
const HANGUL_TCOUNT: u32 = 28;
const HANGUL_NCOUNT: u32 = HANGUL_VCOUNT * HANGUL_TCOUNT;
const HANGUL_SCOUNT: u32 = HANGUL_LCOUNT * HANGUL_NCOUNT;

fn hangul_decompose(cp: u32) -> Option<Vec<u32>> {
    if cp < HANGUL_SBASE || cp >= HANGUL_SBASE + HANGUL_SCOUNT {
        return None;
    }
    let s_index = cp - HANGUL_SBASE;
    let l = HANGUL_LBASE + s_index / HANGUL_NCOUNT;
    let v = HANGUL_VBASE + (s_index % HANGUL_NCOUNT) / HANGUL_TCOUNT;
    let t_index = s_index % HANGUL_TCOUNT;
    if t_index == 0 {
        Some(vec![l, v])
    } else {
        Some(vec![l, v, HANGUL_TBASE + t_index])
    }
}

fn hangul_compose(a: u32, b: u32) -> Option<u32> {
    if (HANGUL_LBASE..HANGUL_LBASE + HANGUL_LCOUNT).contains(&a)
        && (HANGUL_VBASE..HANGUL_VBASE + HANGUL_VCOUNT).contains(&b)
    {
        let l_index = a - HANGUL_LBASE;
        let v_index = b - HANGUL_VBASE;
        return Some(HANGUL_SBASE + (l_index * HANGUL_VCOUNT + v_index) * HANGUL_TCOUNT);
    }
    if (HANGUL_SBASE..HANGUL_SBASE + HANGUL_SCOUNT).contains(&a)
        && (a - HANGUL_SBASE) % HANGUL_TCOUNT == 0
        && (HANGUL_TBASE + 1..HANGUL_TBASE + HANGUL_TCOUNT).contains(&b)
    {
        return Some(a + (b - HANGUL_TBASE));
    }
    None
}

/// Recursively decomposes `cps`, following canonical mappings only unless
/// `compat` is set, in which case mappings flagged with any compatibility
/// bit in `original_source/src/unicode.h`'s `udecomp_type` also apply.
/// Grounded in `normalise.rs`'s `decompose`.
pub fn decompose(cps: &[u32], compat: bool) -> Vec<u32> {
    let mut out = Vec::with_capacity(cps.len());
    for &cp in cps {
        if let Some(hangul) = hangul_decompose(cp) {
            out.extend(decompose(&hangul, compat));
            continue;
        }
        if let Some((flags, seq)) = tables::DECOMPOSITION_MAPPINGS.get(&cp) {
            if *flags == 0 || compat {
                out.extend(decompose(seq, compat));
                continue;
            }
        }
        out.push(cp);
    }
    out
}

/// Canonical ordering: a stable sort of each maximal run of non-starter
/// code points by combining class, the runs being delimited by starters
/// (combining class 0). Grounded in `normalise.rs`'s `to_nfd`.
pub fn reorder(cps: &mut [u32]) {
    let mut i = 0;
    while i < cps.len() {
        if combining_class(cps[i]) == 0 {
            i += 1;
            continue;
        }
        let start = i;
        while i < cps.len() && combining_class(cps[i]) != 0 {
            i += 1;
        }
        cps[start..i].sort_by_key(|&cp| combining_class(cp));
    }
}

/// Canonical composition with the blocking rule: a starter composes with a
/// following combining mark only if no intervening code point between them
/// has an equal-or-lower (and nonzero) combining class. Grounded in
/// `normalise.rs`'s `to_nfc`.
pub fn compose(cps: &[u32]) -> Vec<u32> {
    if cps.is_empty() {
        return Vec::new();
    }
    let mut out: Vec<u32> = Vec::with_capacity(cps.len());
    out.push(cps[0]);
    let mut starter_idx = 0usize;
    let mut last_class = if combining_class(cps[0]) == 0 { 0 } else { combining_class(cps[0]) };
    for &cp in &cps[1..] {
        let cls = combining_class(cp);
        let blocked = cls != 0 && last_class != 0 && last_class >= cls;
        if !blocked {
            if let Some(&composed) = tables::PRIMARY_COMPOSITES.get(&(out[starter_idx], cp))
            {
                out[starter_idx] = composed;
                last_class = 0;
                continue;
            }
            if let Some(composed) = hangul_compose(out[starter_idx], cp) {
                out[starter_idx] = composed;
                last_class = 0;
                continue;
            }
        }
        out.push(cp);
        if cls == 0 {
            starter_idx = out.len() - 1;
            last_class = 0;
        } else {
            last_class = cls;
        }
    }
    out
}

pub fn to_nfc(cps: &[u32]) -> Vec<u32> {
    let mut d = decompose(cps, false);
    reorder(&mut d);
    compose(&d)
}

pub fn to_nfd(cps: &[u32]) -> Vec<u32> {
    let mut d = decompose(cps, false);
    reorder(&mut d);
    d
}

pub fn to_nfkc(cps: &[u32]) -> Vec<u32> {
    let mut d = decompose(cps, true);
    reorder(&mut d);
    compose(&d)
}

pub fn to_nfkd(cps: &[u32]) -> Vec<u32> {
    let mut d = decompose(cps, true);
    reorder(&mut d);
    d
}

/// Full case folding to a fixed point: each code point expands per
/// `CASE_FOLDING` (ASCII via the `ascii_fold` fast path), and the result is
/// folded again until stable, matching `case.rs`'s `case_fold` recursive
/// behavior (needed since e.g. some fold expansions are themselves cased).
pub fn casefold(cps: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(cps.len());
    for &cp in cps {
        if cp < 0x80 {
            out.push(tables::ascii_fold(cp as u8) as u32);
        } else if let Some(expansion) = tables::CASE_FOLDING.get(&cp) {
            out.extend(expansion.iter().copied());
        } else {
            out.push(cp);
        }
    }
    out
}

/// Replaces curly quotes, guillemets, and backticks with a plain ASCII
/// quote, the `MAPQUOTE` type-map transform.
pub fn quote_fold(cps: &[u32]) -> Vec<u32> {
    cps.iter()
        .map(|&cp| tables::QUOTE_FOLDING.get(&cp).copied().unwrap_or(cp))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_ascii() {
        assert_eq!(decode_one(b"A").unwrap(), (0x41, 1));
    }

    #[test]
    fn decodes_two_byte() {
        let bytes = "é".as_bytes();
        assert_eq!(decode_one(bytes).unwrap(), (0xE9, 2));
    }

    #[test]
    fn rejects_overlong() {
        assert!(decode_one(&[0xC0, 0x80]).is_err());
    }

    #[test]
    fn rejects_lone_continuation() {
        assert!(decode_one(&[0x80]).is_err());
    }

    #[test]
    fn encode_round_trips() {
        for &cp in &[0x41u32, 0xE9, 0x1F600] {
            let mut buf = Vec::new();
            encode_utf8(cp, &mut buf);
            assert_eq!(decode_one(&buf).unwrap().0, cp);
        }
    }

    #[test]
    fn nfc_composes_combining_accent() {
        let decomposed = vec![0x65u32, 0x301]; // e + combining acute
        assert_eq!(to_nfc(&decomposed), vec![0xE9]);
    }

    #[test]
    fn nfd_decomposes_precomposed() {
        assert_eq!(to_nfd(&[0xE9]), vec![0x65, 0x301]);
    }

    #[test]
    fn reorder_sorts_multiple_combining_marks_by_class() {
        // U+0328 (ogonek, ccc 202) then U+0301 (acute, ccc 230) should sort
        // to ogonek-then-acute order already; reversed input should re-sort.
        let mut cps = vec![0x61u32, 0x301, 0x328];
        reorder(&mut cps);
        assert_eq!(cps, vec![0x61, 0x328, 0x301]);
    }

    #[test]
    fn hangul_decomposes_and_recomposes() {
        let syllable = 0xAC00u32; // GA
        let d = to_nfd(&[syllable]);
        assert_eq!(d, vec![0x1100, 0x1161]);
        assert_eq!(to_nfc(&d), vec![syllable]);
    }

    #[test]
    fn casefold_is_idempotent() {
        let folded = casefold(&[0x00C9]); // É
        assert_eq!(folded, vec![0xE9]);
        assert_eq!(casefold(&folded), folded);
    }

    #[test]
    fn casefold_expands_sharp_s() {
        assert_eq!(casefold(&[0x00DF]), vec![b's' as u32, b's' as u32]);
    }

    #[test]
    fn quote_fold_normalizes_curly_quotes() {
        assert_eq!(quote_fold(&[0x201C, 0x61, 0x201D]), vec![b'"' as u32, 0x61, b'"' as u32]);
    }
}
