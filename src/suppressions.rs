//! Embedded per-language sentence-suppression abbreviation lists.
//!
//! Grounded in `original_source/src/sentfilter.h`'s
//! `corpus_sentsuppress_list`/`corpus_sentsuppress_names`.

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    static ref LISTS: HashMap<String, Vec<String>> =
        serde_json::from_str(include_str!("data/suppressions.json"))
            .expect("embedded suppressions.json is well-formed");
}

pub fn names() -> Vec<&'static str> {
    let mut v: Vec<&'static str> = LISTS.keys().map(|s| s.as_str()).collect();
    v.sort_unstable();
    v
}

pub fn list(name: &str) -> Option<Vec<&'static str>> {
    LISTS.get(name).map(|words| words.iter().map(|s| s.as_str()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_list_contains_common_abbreviations() {
        let words = list("english").unwrap();
        assert!(words.contains(&"Mr."));
        assert!(words.contains(&"etc."));
    }

    #[test]
    fn unknown_language_returns_none() {
        assert!(list("klingon").is_none());
    }
}
