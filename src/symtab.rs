//! Symbol table: deduplicates tokens and their normalized types, assigning
//! each a dense, monotonically increasing id.
//!
//! Grounded in `original_source/src/symtab.c`/`.h`'s `struct corpus_symtab`
//! (parallel `types`/`tokens` arrays, a hash table over each for dedupe,
//! and each type tracking the token ids that map to it).

use crate::error::Result;
use crate::growth::Growable;
use crate::textset::TextSet;
use crate::typemap::TypeMap;
use crate::wordscan::WordClass;

pub const TOKEN_NONE: i64 = -1;
pub const TYPE_NONE: i64 = -1;

pub struct Symtab {
    typemap: TypeMap,
    tokens: TextSet,
    types: TextSet,
    token_type: Growable<i64>,
    type_tokens: Growable<Vec<i64>>,
}

impl Symtab {
    pub fn new(typemap: TypeMap) -> Self {
        Symtab {
            typemap,
            tokens: TextSet::new(),
            types: TextSet::new(),
            token_type: Growable::new(),
            type_tokens: Growable::new(),
        }
    }

    pub fn clear(&mut self) {
        self.tokens = TextSet::new();
        self.types = TextSet::new();
        self.token_type.clear();
        self.type_tokens.clear();
    }

    pub fn ntoken(&self) -> usize {
        self.tokens.len()
    }

    pub fn ntype(&self) -> usize {
        self.types.len()
    }

    pub fn has_token(&self, token: &[u8]) -> bool {
        self.tokens.contains(token)
    }

    pub fn has_type(&self, type_text: &[u8]) -> bool {
        self.types.contains(type_text)
    }

    pub fn token_text(&self, token_id: i64) -> &[u8] {
        self.tokens.get(token_id as usize)
    }

    pub fn type_text(&self, type_id: i64) -> &[u8] {
        self.types.get(type_id as usize)
    }

    pub fn type_of(&self, token_id: i64) -> i64 {
        self.token_type[token_id as usize]
    }

    pub fn tokens_of_type(&self, type_id: i64) -> &[i64] {
        &self.type_tokens[type_id as usize]
    }

    pub fn typemap_mut(&mut self) -> &mut TypeMap {
        &mut self.typemap
    }

    /// Interns `token`, returning its `(token_id, type_id)`. Computing the
    /// type (and therefore calling into `typemap`) only happens the first
    /// time a given token's bytes are seen.
    pub fn add_token(&mut self, token: &[u8], class: WordClass) -> Result<(i64, i64)> {
        let (token_id, created) = self.tokens.add(token)?;
        if !created {
            return Ok((token_id as i64, self.token_type[token_id]));
        }
        let type_bytes = self.typemap.normalize(token, class)?;
        let (type_id, type_created) = self.types.add(&type_bytes)?;
        if type_created {
            self.type_tokens.push(Vec::new())?;
        }
        self.type_tokens[type_id].push(token_id as i64);
        self.token_type.push(type_id as i64)?;
        Ok((token_id as i64, type_id as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typemap::TypeMapConfig;

    fn new_symtab() -> Symtab {
        Symtab::new(TypeMap::new(TypeMapConfig { map_case: true, ..Default::default() }))
    }

    #[test]
    fn repeated_tokens_dedupe_to_the_same_ids() {
        let mut s = new_symtab();
        let (t1, ty1) = s.add_token(b"Run", WordClass::Letter).unwrap();
        let (t2, ty2) = s.add_token(b"Run", WordClass::Letter).unwrap();
        assert_eq!(t1, t2);
        assert_eq!(ty1, ty2);
        assert_eq!(s.ntoken(), 1);
    }

    #[test]
    fn case_variants_share_a_type_but_not_a_token() {
        let mut s = new_symtab();
        let (t1, ty1) = s.add_token(b"Run", WordClass::Letter).unwrap();
        let (t2, ty2) = s.add_token(b"run", WordClass::Letter).unwrap();
        assert_ne!(t1, t2);
        assert_eq!(ty1, ty2);
        assert_eq!(s.ntoken(), 2);
        assert_eq!(s.ntype(), 1);
        assert_eq!(s.tokens_of_type(ty1), &[t1, t2]);
    }

    #[test]
    fn clear_resets_counts() {
        let mut s = new_symtab();
        s.add_token(b"run", WordClass::Letter).unwrap();
        s.clear();
        assert_eq!(s.ntoken(), 0);
        assert_eq!(s.ntype(), 0);
    }
}
