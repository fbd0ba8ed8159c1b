//! Brain Module Tests
//!
//! Keyword scoring, the category decision, confidence bounds and reply
//! selection of the local heuristic.

use crate::brain::{
    HeuristicClassifier, KeywordLexicon, KeywordScorer, ResponseSelector, MAX_CONFIDENCE,
    MIN_CONFIDENCE,
};
use crate::models::Category;
use std::sync::Arc;

fn seeded(seed: u64) -> HeuristicClassifier {
    HeuristicClassifier::with_parts(
        Arc::new(KeywordLexicon::default()),
        Arc::new(ResponseSelector::default()),
        Some(seed),
    )
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn test_support_request_is_productive() {
        let classifier = seeded(7);
        let text = "Preciso de suporte urgente, há um erro no sistema";

        let card = classifier.score(text);
        assert!(card.productive >= 3, "matched: {:?}", card.matched_terms);
        assert_eq!(card.unproductive, 0);

        let result = classifier.classify(text).unwrap();
        assert_eq!(result.category, Category::Productive);
        assert!(result.confidence >= MIN_CONFIDENCE && result.confidence <= MAX_CONFIDENCE);
    }

    #[test]
    fn test_greeting_is_unproductive() {
        let classifier = seeded(7);
        let text = "Parabéns pelo aniversário! Obrigado e um bom feriado";

        let card = classifier.score(text);
        assert!(card.unproductive >= 4, "matched: {:?}", card.matched_terms);
        assert_eq!(card.productive, 0);

        let result = classifier.classify(text).unwrap();
        assert_eq!(result.category, Category::Unproductive);
    }

    #[test]
    fn test_empty_text_is_unproductive() {
        let classifier = seeded(7);

        let result = classifier.classify("").unwrap();
        assert_eq!(result.category, Category::Unproductive);
        assert!(result.confidence >= MIN_CONFIDENCE && result.confidence <= MAX_CONFIDENCE);
        assert!(!result.suggested_response.is_empty());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;

    #[test]
    fn test_no_matches_stay_below_point_eight() {
        for seed in 0..200 {
            let result = seeded(seed)
                .classify("Segue em anexo a planilha revisada")
                .unwrap();
            assert_eq!(result.category, Category::Unproductive);
            assert!(
                result.confidence >= MIN_CONFIDENCE && result.confidence < 0.8,
                "seed {} gave {}",
                seed,
                result.confidence
            );
        }
    }

    #[test]
    fn test_confidence_bounded_for_every_draw() {
        let texts = [
            "",
            "bug",
            "Feliz natal e feliz ano novo, bom dia, boa tarde, boa noite!",
            "suporte problema erro ajuda dúvida status atualização urgente sistema falha bug \
             solicitação requisição pendente prazo documento contrato pagamento fatura \
             cobrança técnico instalação",
        ];
        for seed in 0..100 {
            let classifier = seeded(seed);
            for text in texts {
                let confidence = classifier.classify(text).unwrap().confidence;
                assert!(
                    (MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&confidence),
                    "{} out of bounds for {:?}",
                    confidence,
                    text
                );
            }
        }
    }

    #[test]
    fn test_full_match_saturates_at_max() {
        let lexicon = KeywordLexicon::new(["fatura"], ["abraço"]).unwrap();
        let classifier = HeuristicClassifier::with_parts(
            Arc::new(lexicon),
            Arc::new(ResponseSelector::default()),
            Some(11),
        );

        let result = classifier.classify("Fatura em atraso").unwrap();
        assert_eq!(result.category, Category::Productive);
        assert_eq!(result.confidence, MAX_CONFIDENCE);
    }

    #[test]
    fn test_ties_resolve_to_unproductive() {
        let lexicon = KeywordLexicon::new(["pagamento"], ["obrigado"]).unwrap();
        let classifier = HeuristicClassifier::with_parts(
            Arc::new(lexicon),
            Arc::new(ResponseSelector::default()),
            Some(3),
        );

        let result = classifier
            .classify("Obrigado, o pagamento foi feito")
            .unwrap();
        assert_eq!(result.category, Category::Unproductive);
    }

    #[test]
    fn test_replies_never_cross_categories() {
        let selector = ResponseSelector::default();
        for seed in 0..50 {
            let classifier = seeded(seed);
            for text in ["Erro no sistema de pagamento", "Feliz aniversário!"] {
                let result = classifier.classify(text).unwrap();
                assert!(
                    selector
                        .templates(result.category)
                        .contains(&result.suggested_response),
                    "reply for {:?} not from its category",
                    text
                );
            }
        }
    }
}

#[cfg(test)]
mod scorer_tests {
    use super::*;

    #[test]
    fn test_scoring_is_pure() {
        let scorer = KeywordScorer::new(Arc::new(KeywordLexicon::default()));
        let text = "Atualização do status da fatura pendente";

        let first = scorer.score(text);
        let second = scorer.score(text);
        assert_eq!(first, second);
    }

    #[test]
    fn test_repeated_term_counts_once() {
        let scorer = KeywordScorer::new(Arc::new(KeywordLexicon::default()));
        assert_eq!(scorer.score("erro erro ERRO Erro").productive, 1);
    }

    #[test]
    fn test_substring_matching_ignores_word_boundaries() {
        let scorer = KeywordScorer::new(Arc::new(KeywordLexicon::default()));
        let card = scorer.score("Tivemos problemas com os documentos");
        assert_eq!(card.productive, 2);
    }

    #[test]
    fn test_case_insensitive() {
        let scorer = KeywordScorer::new(Arc::new(KeywordLexicon::default()));
        assert_eq!(scorer.score("FELIZ NATAL").unproductive, 1);
        assert_eq!(scorer.score("BOM DIA").unproductive, 1);
    }

    #[test]
    fn test_default_lexicon_shape() {
        let lexicon = KeywordLexicon::default();
        assert!(lexicon.is_disjoint());
        assert_eq!(lexicon.size(), lexicon.terms(Category::Productive).len());
        assert!(lexicon
            .terms(Category::Unproductive)
            .iter()
            .all(|t| t == &t.to_lowercase()));
    }
}
