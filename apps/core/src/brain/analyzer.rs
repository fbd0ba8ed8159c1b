//! Heuristic classifier - the local path of the orchestrator.
//!
//! Scores the text against both lexicons, decides the category, estimates a
//! confidence and picks a reply template. No network, no model.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::debug;

use super::confidence::ConfidenceEstimator;
use super::lexicon::KeywordLexicon;
use super::responses::ResponseSelector;
use super::scorer::{KeywordScorer, ScoreCard};
use crate::error::AppError;
use crate::models::ClassificationResult;

/// Local keyword-based classifier
pub struct HeuristicClassifier {
    scorer: KeywordScorer,
    estimator: ConfidenceEstimator,
    selector: Arc<ResponseSelector>,
    rng: Mutex<StdRng>,
}

impl Default for HeuristicClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl HeuristicClassifier {
    /// Classifier over the built-in lexicon and templates, seeded from the OS.
    pub fn new() -> Self {
        Self::with_parts(
            Arc::new(KeywordLexicon::default()),
            Arc::new(ResponseSelector::default()),
            None,
        )
    }

    /// Classifier over injected data. A `seed` pins jitter and template choice.
    pub fn with_parts(
        lexicon: Arc<KeywordLexicon>,
        selector: Arc<ResponseSelector>,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            scorer: KeywordScorer::new(lexicon),
            estimator: ConfidenceEstimator::new(),
            selector,
            rng: Mutex::new(rng),
        }
    }

    pub fn lexicon(&self) -> &KeywordLexicon {
        self.scorer.lexicon()
    }

    pub fn selector(&self) -> &ResponseSelector {
        &self.selector
    }

    /// Score only, without drawing any randomness.
    pub fn score(&self, text: &str) -> ScoreCard {
        self.scorer.score(text)
    }

    /// Classify `text`. Fails only if the template set is defective.
    pub fn classify(&self, text: &str) -> Result<ClassificationResult, AppError> {
        let start = Instant::now();

        let card = self.scorer.score(text);
        let category = card.category();

        // Poisoning only means another classification panicked mid-draw; the
        // generator state is still usable.
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let confidence = self
            .estimator
            .estimate(card.dominant(), self.lexicon().size(), &mut *rng);
        let suggested_response = self.selector.select(category, &mut *rng)?.to_string();
        drop(rng);

        debug!(
            productive = card.productive,
            unproductive = card.unproductive,
            matched = ?card.matched_terms,
            %category,
            confidence,
            "Heuristic classification"
        );

        Ok(ClassificationResult {
            category,
            confidence,
            suggested_response,
            processing_time: start.elapsed().as_secs_f64(),
        })
    }
}
