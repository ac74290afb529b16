//! Text relevance for plugin queries.
//!
//! A query token matches a dictionary term exactly, as a prefix, or within
//! the edit-distance tolerance. Each match is weighted by its kind and by the
//! boost of the field it was found in. Per token a document keeps its best
//! field match; token scores then add up.

use crate::index::reader::SearchIndex;
use crate::index::types::{DocId, TextField};
use rustc_hash::FxHashMap;

/// Fuzzy matching tolerance in edits
pub const DEFAULT_TOLERANCE: usize = 1;

/// Per-field weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBoosts {
    pub name: f32,
    pub owner: f32,
}

impl Default for FieldBoosts {
    fn default() -> Self {
        Self {
            name: 2.0,
            owner: 1.0,
        }
    }
}

impl FieldBoosts {
    pub fn boost(&self, field: TextField) -> f32 {
        match field {
            TextField::Name => self.name,
            TextField::Owner => self.owner,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Prefix,
    Fuzzy,
}

impl MatchKind {
    pub fn weight(&self) -> f32 {
        match self {
            MatchKind::Exact => 1.0,
            MatchKind::Prefix => 0.8,
            MatchKind::Fuzzy => 0.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scorer {
    boosts: FieldBoosts,
    tolerance: usize,
}

impl Scorer {
    pub fn new(boosts: FieldBoosts, tolerance: usize) -> Self {
        Self { boosts, tolerance }
    }

    pub fn with_defaults() -> Self {
        Self::new(FieldBoosts::default(), DEFAULT_TOLERANCE)
    }

    pub fn tolerance(&self) -> usize {
        self.tolerance
    }

    /// How `term` matches the query token, if at all
    pub fn classify(&self, token: &str, term: &str) -> Option<MatchKind> {
        if term == token {
            return Some(MatchKind::Exact);
        }
        if term.starts_with(token) {
            return Some(MatchKind::Prefix);
        }

        // A token no longer than the tolerance would fuzzy-match nearly anything
        let token_len = token.chars().count();
        if self.tolerance == 0 || token_len <= self.tolerance {
            return None;
        }
        if token_len.abs_diff(term.chars().count()) > self.tolerance {
            return None;
        }
        (strsim::levenshtein(token, term) <= self.tolerance).then_some(MatchKind::Fuzzy)
    }

    /// Score every document matching at least one query token
    pub fn score(&self, index: &SearchIndex, tokens: &[String]) -> FxHashMap<DocId, f32> {
        let mut totals: FxHashMap<DocId, f32> = FxHashMap::default();

        for token in tokens {
            let mut best: FxHashMap<DocId, f32> = FxHashMap::default();

            for field in TextField::ALL {
                let boost = self.boosts.boost(field);
                for (term, docs) in index.terms(field) {
                    let Some(kind) = self.classify(token, term) else {
                        continue;
                    };
                    let score = boost * kind.weight();
                    for doc_id in docs {
                        let slot = best.entry(doc_id).or_insert(0.0);
                        if score > *slot {
                            *slot = score;
                        }
                    }
                }
            }

            for (doc_id, score) in best {
                *totals.entry(doc_id).or_insert(0.0) += score;
            }
        }

        totals
    }
}
