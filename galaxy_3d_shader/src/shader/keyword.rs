/// Shader keyword sets - the identity of one shader variant.
///
/// A keyword set is the set of `multi_compile` keywords a variant was compiled
/// with. Its identity is a 32-bit hash of the canonical name: every keyword
/// prefixed with `_`, concatenated in lexicographic order (`{B, A}` -> `"_A_B"`).
/// Equality, ordering and `Hash` use that cached value only, so a set is as cheap
/// to use as a map key as a `u32`.
///
/// Sets are immutable. Changes go through `ShaderKeywordBuilder`, whose `build()`
/// always recomputes the hash, so a set with a stale hash cannot exist.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use xxhash_rust::xxh32::xxh32;

use crate::utils::interner::{self, Symbol};

/// Seed for the canonical-name hash
const KEYWORD_HASH_SEED: u32 = 0;

// ===== KEYWORD SET =====

/// Immutable, finalized set of shader keywords
#[derive(Clone)]
pub struct ShaderKeyword {
    /// Sorted by keyword string
    keys: Vec<Symbol>,
    /// Canonical name ("_A_B", empty for the empty set)
    name: String,
    hash: u32,
}

impl ShaderKeyword {
    /// The empty keyword set
    pub fn new() -> Self {
        Self::from_sorted(Vec::new())
    }

    /// Build a set from keyword names (duplicates and empty names are ignored)
    pub fn from_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = ShaderKeywordBuilder::new();
        for keyword in keywords {
            builder.add(keyword.as_ref());
        }
        builder.build()
    }

    pub fn builder() -> ShaderKeywordBuilder {
        ShaderKeywordBuilder::new()
    }

    /// Builder pre-filled with this set's keywords
    pub fn to_builder(&self) -> ShaderKeywordBuilder {
        ShaderKeywordBuilder { keys: self.keys.clone() }
    }

    fn from_sorted(keys: Vec<Symbol>) -> Self {
        let mut name = String::new();
        for key in &keys {
            name.push('_');
            name.push_str(interner::resolve(*key));
        }
        let hash = xxh32(name.as_bytes(), KEYWORD_HASH_SEED);
        Self { keys, name, hash }
    }

    pub fn contains(&self, keyword: &str) -> bool {
        interner::get(keyword).is_some_and(|sym| self.keys.contains(&sym))
    }

    /// Keywords in canonical (lexicographic) order
    pub fn keywords(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.keys.iter().map(|key| interner::resolve(*key))
    }

    /// Canonical name the hash is computed from
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hash_code(&self) -> u32 {
        self.hash
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for ShaderKeyword {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ShaderKeyword {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_keywords(iter)
    }
}

impl PartialEq for ShaderKeyword {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for ShaderKeyword {}

impl PartialOrd for ShaderKeyword {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ShaderKeyword {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hash.cmp(&other.hash)
    }
}

impl Hash for ShaderKeyword {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash);
    }
}

impl fmt::Display for ShaderKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            f.write_str("<none>")
        } else {
            f.write_str(&self.name)
        }
    }
}

impl fmt::Debug for ShaderKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShaderKeyword({} #{:08x})", self, self.hash)
    }
}

// ===== BUILDER =====

/// Mutable staging area for a keyword set
#[derive(Debug, Clone, Default)]
pub struct ShaderKeywordBuilder {
    /// Sorted by keyword string
    keys: Vec<Symbol>,
}

impl ShaderKeywordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, keyword: &str) -> std::result::Result<usize, usize> {
        self.keys.binary_search_by(|key| interner::resolve(*key).cmp(keyword))
    }

    /// Add a keyword (no-op if present or empty)
    pub fn add(&mut self, keyword: &str) -> &mut Self {
        if !keyword.is_empty() {
            if let Err(index) = self.position(keyword) {
                self.keys.insert(index, interner::intern(keyword));
            }
        }
        self
    }

    /// Remove a keyword (no-op if absent)
    pub fn remove(&mut self, keyword: &str) -> &mut Self {
        if let Ok(index) = self.position(keyword) {
            self.keys.remove(index);
        }
        self
    }

    /// Add every keyword of `other`
    pub fn union(&mut self, other: &ShaderKeyword) -> &mut Self {
        for keyword in other.keywords() {
            self.add(keyword);
        }
        self
    }

    /// Remove every keyword of `other`
    pub fn difference(&mut self, other: &ShaderKeyword) -> &mut Self {
        for keyword in other.keywords() {
            self.remove(keyword);
        }
        self
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.position(keyword).is_ok()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Finalize: canonical name and hash are computed here
    pub fn build(&self) -> ShaderKeyword {
        ShaderKeyword::from_sorted(self.keys.clone())
    }
}

#[cfg(test)]
#[path = "keyword_tests.rs"]
mod tests;
