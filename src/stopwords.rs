//! Embedded per-language stop word lists.
//!
//! Grounded in `original_source/src/typemap.h`'s `corpus_stopword_list`/
//! `corpus_stopword_names`, which serve the same thirteen languages the
//! stemmer registry does. Embedded as JSON via `include_str!` +
//! `lazy_static!`, matching the teacher's `ucd.rs` loading strategy.

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    static ref LISTS: HashMap<String, Vec<String>> =
        serde_json::from_str(include_str!("data/stopwords.json"))
            .expect("embedded stopwords.json is well-formed");
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
    fn english_list_contains_common_stopwords() {
        let words = list("english").unwrap();
        assert!(words.contains(&"the"));
        assert!(words.contains(&"and"));
    }

    #[test]
    fn unknown_language_returns_none() {
        assert!(list("klingon").is_none());
    }

    #[test]
    fn names_cover_thirteen_languages() {
        assert_eq!(names().len(), 13);
    }
}
