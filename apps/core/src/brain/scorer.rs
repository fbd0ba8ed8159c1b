//! Keyword scoring.
//!
//! Counts how many distinct lexicon terms occur in a text. Matching is a plain
//! case-insensitive substring search: "dúvida" also matches inside "dúvidas".

use super::lexicon::KeywordLexicon;
use crate::models::Category;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Match counts for both categories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub productive: usize,
    pub unproductive: usize,
    /// Terms that matched, productive ones first
    pub matched_terms: Vec<String>,
}

impl ScoreCard {
    /// The larger of the two counts.
    pub fn dominant(&self) -> usize {
        self.productive.max(self.unproductive)
    }

    /// Category decision. Strictly more productive matches are needed to win;
    /// ties, including 0/0 on neutral text, resolve to `Unproductive`.
    pub fn category(&self) -> Category {
        if self.productive > self.unproductive {
            Category::Productive
        } else {
            Category::Unproductive
        }
    }
}

/// Count the terms of `lexicon` that occur in `text`. Each term counts at most once.
pub fn score(text: &str, lexicon: &[String]) -> usize {
    let text = text.to_lowercase();
    matching_terms(&text, lexicon).count()
}

/// The terms found in already lowercased text, in lexicon order.
fn matching_terms<'a>(
    lowercase_text: &'a str,
    terms: &'a [String],
) -> impl Iterator<Item = &'a String> + 'a {
    terms
        .iter()
        .filter(move |term| lowercase_text.contains(term.as_str()))
}

/// Scores text against a shared lexicon
#[derive(Debug, Clone)]
pub struct KeywordScorer {
    lexicon: Arc<KeywordLexicon>,
}

impl KeywordScorer {
    pub fn new(lexicon: Arc<KeywordLexicon>) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &KeywordLexicon {
        &self.lexicon
    }

    /// Score `text` against both lexicons, lowercasing it once.
    pub fn score(&self, text: &str) -> ScoreCard {
        let text = text.to_lowercase();
        let mut card = ScoreCard::default();

        for category in Category::ALL {
            let before = card.matched_terms.len();
            card.matched_terms
                .extend(matching_terms(&text, self.lexicon.terms(category)).cloned());
            let count = card.matched_terms.len() - before;
            match category {
                Category::Productive => card.productive = count,
                Category::Unproductive => card.unproductive = count,
            }
        }

        card
    }
}
