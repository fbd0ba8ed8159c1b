//! Keyword lexicons for the heuristic classifier.
//!
//! Two fixed, disjoint vocabularies: terms that signal an email needing action,
//! and terms that signal a social or courtesy message. Terms are matched as plain
//! lowercase substrings, so multi-word entries such as "ano novo" are allowed.

use crate::error::AppError;
use crate::models::Category;
use std::collections::HashSet;

/// Terms suggesting the sender expects an action or a reply
const PRODUCTIVE_KEYWORDS: &[&str] = &[
    "suporte",
    "problema",
    "erro",
    "ajuda",
    "dúvida",
    "status",
    "atualização",
    "urgente",
    "sistema",
    "falha",
    "bug",
    "solicitação",
    "requisição",
    "pendente",
    "prazo",
    "documento",
    "contrato",
    "pagamento",
    "fatura",
    "cobrança",
    "técnico",
    "instalação",
];

/// Terms suggesting a greeting, thanks or celebration
const UNPRODUCTIVE_KEYWORDS: &[&str] = &[
    "parabéns",
    "felicitações",
    "natal",
    "ano novo",
    "aniversário",
    "obrigado",
    "agradecimento",
    "festa",
    "evento social",
    "convite",
    "bom dia",
    "boa tarde",
    "boa noite",
    "fim de semana",
    "feriado",
];

/// Immutable pair of keyword sets, one per category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordLexicon {
    productive: Vec<String>,
    unproductive: Vec<String>,
}

impl Default for KeywordLexicon {
    fn default() -> Self {
        Self {
            productive: normalize(PRODUCTIVE_KEYWORDS.iter().copied()),
            unproductive: normalize(UNPRODUCTIVE_KEYWORDS.iter().copied()),
        }
    }
}

impl KeywordLexicon {
    /// Build a lexicon from custom word lists.
    ///
    /// Terms are lowercased and de-duplicated (first occurrence wins). Blank terms,
    /// an empty list, or a term present in both lists are rejected.
    pub fn new<P, U, S>(productive: P, unproductive: U) -> Result<Self, AppError>
    where
        P: IntoIterator<Item = S>,
        U: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let productive = normalize_checked(productive, Category::Productive)?;
        let unproductive = normalize_checked(unproductive, Category::Unproductive)?;

        let productive_set: HashSet<&str> = productive.iter().map(String::as_str).collect();
        if let Some(shared) = unproductive
            .iter()
            .find(|term| productive_set.contains(term.as_str()))
        {
            return Err(AppError::Config(format!(
                "Keyword '{}' appears in both lexicons",
                shared
            )));
        }

        Ok(Self {
            productive,
            unproductive,
        })
    }

    /// Terms associated with a category, in declaration order.
    pub fn terms(&self, category: Category) -> &[String] {
        match category {
            Category::Productive => &self.productive,
            Category::Unproductive => &self.unproductive,
        }
    }

    /// Size of the larger of the two lexicons. Used to normalize match counts.
    pub fn size(&self) -> usize {
        self.productive.len().max(self.unproductive.len())
    }

    /// `true` when the two term sets share no entry.
    pub fn is_disjoint(&self) -> bool {
        let productive: HashSet<&String> = self.productive.iter().collect();
        self.unproductive.iter().all(|term| !productive.contains(term))
    }
}

fn normalize<I, S>(terms: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    terms
        .into_iter()
        .map(|term| term.as_ref().trim().to_lowercase())
        .filter(|term| seen.insert(term.clone()))
        .collect()
}

fn normalize_checked<I, S>(terms: I, category: Category) -> Result<Vec<String>, AppError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let terms = normalize(terms);
    if terms.is_empty() {
        return Err(AppError::Config(format!("Empty {} lexicon", category)));
    }
    if terms.iter().any(|term| term.is_empty()) {
        return Err(AppError::Config(format!(
            "Blank keyword in {} lexicon",
            category
        )));
    }
    Ok(terms)
}
