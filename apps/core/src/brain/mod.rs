//! # Brain Module
//!
//! Local, non-network classification for Inbox Triage.
//! Used as the fallback whenever the remote classification service is unavailable.
//!
//! ## Components
//! - `lexicon`: Fixed productive / unproductive keyword sets
//! - `scorer`: Substring keyword counting and the category decision
//! - `confidence`: Bounded confidence estimate with jitter
//! - `responses`: Reply template selection
//! - `analyzer`: The heuristic classifier tying them together

pub mod analyzer;
pub mod confidence;
pub mod lexicon;
pub mod responses;
pub mod scorer;

pub use analyzer::HeuristicClassifier;
pub use confidence::{ConfidenceEstimator, MAX_CONFIDENCE, MIN_CONFIDENCE};
pub use lexicon::KeywordLexicon;
pub use responses::ResponseSelector;
pub use scorer::{KeywordScorer, ScoreCard};
