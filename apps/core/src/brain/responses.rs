//! Suggested reply templates.
//!
//! Five fixed, generic acknowledgments per category. Nothing from the email is
//! interpolated into them.

use crate::error::AppError;
use crate::models::Category;
use rand::seq::SliceRandom;
use rand::Rng;

const PRODUCTIVE_RESPONSES: &[&str] = &[
    "Obrigado pelo seu contato. Recebemos sua solicitação e nossa equipe técnica irá analisá-la. Retornaremos em breve com uma resposta detalhada.",
    "Agradecemos por entrar em contato conosco. Sua solicitação foi registrada e será direcionada para o setor responsável. Você receberá um retorno em até 24 horas.",
    "Recebemos sua mensagem e entendemos a importância da sua solicitação. Nossa equipe está trabalhando para resolver a questão e entraremos em contato em breve.",
    "Obrigado por nos informar sobre esta questão. Já encaminhamos sua solicitação para nossa equipe especializada, que entrará em contato para dar continuidade ao atendimento.",
    "Agradecemos seu contato. Sua solicitação foi recebida e está sendo analisada por nossa equipe. Manteremos você informado sobre o andamento.",
];

const UNPRODUCTIVE_RESPONSES: &[&str] = &[
    "Muito obrigado pela sua mensagem! Agradecemos o contato e desejamos um excelente dia.",
    "Agradecemos sua mensagem. É sempre um prazer receber seu contato. Tenha um ótimo dia!",
    "Obrigado pelo carinho! Ficamos felizes em receber sua mensagem. Desejamos tudo de bom para você.",
    "Muito obrigado! Sua mensagem nos deixou muito felizes. Tenha uma excelente semana.",
    "Agradecemos imensamente sua mensagem. É sempre bom saber de você. Um abraço!",
];

/// Picks a reply template for a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSelector {
    productive: Vec<String>,
    unproductive: Vec<String>,
}

impl Default for ResponseSelector {
    fn default() -> Self {
        Self {
            productive: PRODUCTIVE_RESPONSES.iter().map(|s| s.to_string()).collect(),
            unproductive: UNPRODUCTIVE_RESPONSES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ResponseSelector {
    /// Build a selector from custom template sets.
    ///
    /// A category without templates is a configuration defect and is rejected
    /// with [`AppError::TemplateExhaustion`]; blank templates are rejected too.
    pub fn new(productive: Vec<String>, unproductive: Vec<String>) -> Result<Self, AppError> {
        for (category, templates) in [
            (Category::Productive, &productive),
            (Category::Unproductive, &unproductive),
        ] {
            if templates.is_empty() {
                return Err(AppError::TemplateExhaustion(category.to_string()));
            }
            if templates.iter().any(|t| t.trim().is_empty()) {
                return Err(AppError::Config(format!(
                    "Blank response template for category {}",
                    category
                )));
            }
        }

        Ok(Self {
            productive,
            unproductive,
        })
    }

    pub fn templates(&self, category: Category) -> &[String] {
        match category {
            Category::Productive => &self.productive,
            Category::Unproductive => &self.unproductive,
        }
    }

    /// Uniformly pick one template of `category`. Independent across calls.
    pub fn select<R: Rng + ?Sized>(
        &self,
        category: Category,
        rng: &mut R,
    ) -> Result<&str, AppError> {
        self.templates(category)
            .choose(rng)
            .map(String::as_str)
            .ok_or_else(|| AppError::TemplateExhaustion(category.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_five_templates_per_category() {
        let selector = ResponseSelector::default();
        for category in Category::ALL {
            let templates = selector.templates(category);
            assert_eq!(templates.len(), 5);
            let unique: HashSet<&String> = templates.iter().collect();
            assert_eq!(unique.len(), 5);
        }
    }

    #[test]
    fn test_selection_never_crosses_categories() {
        let selector = ResponseSelector::default();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let reply = selector.select(Category::Productive, &mut rng).unwrap();
            assert!(PRODUCTIVE_RESPONSES.contains(&reply));
            assert!(!UNPRODUCTIVE_RESPONSES.contains(&reply));

            let reply = selector.select(Category::Unproductive, &mut rng).unwrap();
            assert!(UNPRODUCTIVE_RESPONSES.contains(&reply));
        }
    }

    #[test]
    fn test_selection_covers_all_templates() {
        let selector = ResponseSelector::default();
        let mut rng = StdRng::seed_from_u64(1);
        let seen: HashSet<&str> = (0..500)
            .map(|_| selector.select(Category::Unproductive, &mut rng).unwrap())
            .collect();
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn test_same_seed_same_choice() {
        let selector = ResponseSelector::default();
        let mut a = StdRng::seed_from_u64(9);
        let mut b = StdRng::seed_from_u64(9);
        for _ in 0..10 {
            assert_eq!(
                selector.select(Category::Productive, &mut a).unwrap(),
                selector.select(Category::Productive, &mut b).unwrap()
            );
        }
    }

    #[test]
    fn test_missing_templates_rejected() {
        let result = ResponseSelector::new(vec!["Ok".to_string()], vec![]);
        assert!(matches!(result, Err(AppError::TemplateExhaustion(c)) if c == "Unproductive"));

        let result = ResponseSelector::new(vec![" ".to_string()], vec!["Ok".to_string()]);
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
