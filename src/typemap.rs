//! Token -> type normalization: the configurable pipeline that turns raw
//! token bytes into the canonical form symbol-table entries are keyed on.
//!
//! Grounded in `original_source/src/typemap.c`/`.h`'s `corpus_typemap_set`:
//! case folding, compatibility decomposition, quote folding, and
//! default-ignorable removal are each an independent `corpus_type_kind` bit;
//! this crate keeps them as plain `bool` fields on [`TypeMapConfig`] rather
//! than a raw bitmask, since Rust has no need for the C struct's packed
//! `kind` field to cross an ABI boundary.

use crate::error::Result;
use crate::stemmer::{self, Stemmer};
use crate::textset::TextSet;
use crate::unicode;
use crate::wordscan::{self, WordClass};

#[derive(Debug, Clone, Copy, Default)]
pub struct TypeMapConfig {
    /// `MAPCASE`: full case folding.
    pub map_case: bool,
    /// `MAPCOMPAT`: compatibility (NFKC-style) decomposition instead of
    /// canonical (NFC-style).
    pub map_compat: bool,
    /// `MAPQUOTE`: curly quotes/guillemets/backticks folded to `'`/`"`.
    pub map_quote: bool,
    /// `RMDI`: `Default_Ignorable_Code_Point`s dropped from the output.
    pub remove_default_ignorable: bool,
}

pub struct TypeMap {
    config: TypeMapConfig,
    stemmer: Option<Box<dyn Stemmer>>,
    except: TextSet,
}

impl TypeMap {
    pub fn new(config: TypeMapConfig) -> Self {
        TypeMap { config, stemmer: None, except: TextSet::new() }
    }

    /// Installs the named stemmer (one of [`stemmer::NAMES`]).
    pub fn set_stemmer(&mut self, name: &str) -> Result<()> {
        match stemmer::by_name(name) {
            Some(s) => {
                self.stemmer = Some(s);
                Ok(())
            }
            None => Err(crate::error::CorpusError::invalid_input(
                0,
                format!("unrecognized stemmer name '{name}'"),
            )),
        }
    }

    pub fn clear_stemmer(&mut self) {
        self.stemmer = None;
    }

    /// Registers a token that should never be passed to the stemmer (kept
    /// verbatim after the rest of the pipeline runs), matching
    /// `corpus_typemap_stem_except`.
    pub fn stem_except(&mut self, word: &[u8]) -> Result<()> {
        self.except.add(word)?;
        Ok(())
    }

    /// Normalizes one token's bytes into its type's canonical bytes.
    /// `class` gates stemming: only `WordClass::Letter` tokens are ever
    /// handed to the stemmer, matching `corpus_filter_term_prop`'s
    /// word-class-based decision of what counts as a stemmable term.
    pub fn normalize(&self, token: &[u8], class: WordClass) -> Result<Vec<u8>> {
        let mut cps = crate::text::Text::assign(token)?.code_points()?;

        if self.config.map_quote {
            cps = unicode::quote_fold(&cps);
        }
        cps = if self.config.map_compat { unicode::to_nfkc(&cps) } else { unicode::to_nfc(&cps) };
        if self.config.map_case {
            cps = unicode::casefold(&cps);
        }
        if self.config.remove_default_ignorable {
            cps.retain(|&cp| !unicode::is_default_ignorable(cp));
        }

        let mut out = Vec::new();
        for cp in &cps {
            unicode::encode_utf8(*cp, &mut out);
        }

        if class == WordClass::Letter && !self.except.contains(token) {
            if let Some(stemmer) = &self.stemmer {
                if let Ok(word) = std::str::from_utf8(&out) {
                    let stemmed = stemmer.stem(word);
                    if !stemmed.is_empty() {
                        let stemmed_cps = crate::text::Text::assign(stemmed.as_bytes())?.code_points()?;
                        // A stem that merges or splits the token into a
                        // different number of words (e.g. "u.s" -> "u.")
                        // is rejected; only same-word-count stems are used.
                        if wordscan::scan(&stemmed_cps).len() == wordscan::scan(&cps).len() {
                            return Ok(stemmed.into_owned().into_bytes());
                        }
                    }
                }
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_folds_when_configured() {
        let tm = TypeMap::new(TypeMapConfig { map_case: true, ..Default::default() });
        let out = tm.normalize("RUN".as_bytes(), WordClass::Letter).unwrap();
        assert_eq!(out, b"run");
    }

    #[test]
    fn leaves_case_alone_when_not_configured() {
        let tm = TypeMap::new(TypeMapConfig::default());
        let out = tm.normalize("RUN".as_bytes(), WordClass::Letter).unwrap();
        assert_eq!(out, b"RUN");
    }

    #[test]
    fn applies_stemmer_to_letter_tokens_only() {
        let mut tm = TypeMap::new(TypeMapConfig { map_case: true, ..Default::default() });
        tm.set_stemmer("english").unwrap();
        let out = tm.normalize("running".as_bytes(), WordClass::Letter).unwrap();
        assert_eq!(out, b"runn");
        let unstemmed = tm.normalize("running".as_bytes(), WordClass::None).unwrap();
        assert_eq!(unstemmed, b"running");
    }

    #[test]
    fn stem_exceptions_are_not_stemmed() {
        let mut tm = TypeMap::new(TypeMapConfig::default());
        tm.set_stemmer("english").unwrap();
        tm.stem_except(b"running").unwrap();
        let out = tm.normalize(b"running", WordClass::Letter).unwrap();
        assert_eq!(out, b"running");
    }

    #[test]
    fn quote_folding_normalizes_curly_quotes() {
        let tm = TypeMap::new(TypeMapConfig { map_quote: true, ..Default::default() });
        let out = tm.normalize("\u{201c}hi\u{201d}".as_bytes(), WordClass::Punct).unwrap();
        assert_eq!(out, b"\"hi\"");
    }

    #[test]
    fn unknown_stemmer_name_errors() {
        let mut tm = TypeMap::new(TypeMapConfig::default());
        assert!(tm.set_stemmer("klingon").is_err());
    }
}
