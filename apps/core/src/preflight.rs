//! Preflight Check System
//!
//! Verifies the classification data and checks the remote service before any
//! email is processed. An unreachable service is reported but never blocks
//! startup: the local heuristic covers for it.

use crate::actors::remote::HttpRemoteClassifier;
use crate::actors::traits::RemoteClassifier;
use crate::brain::{HeuristicClassifier, KeywordLexicon, ResponseSelector};
use crate::config::ClassifierConfig;
use crate::error::AppError;
use crate::models::Category;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// --- Constants ---
const TEMPLATES_PER_CATEGORY: usize = 5;

const CHECK_LEXICON: &str = "lexicon";
const CHECK_TEMPLATES: &str = "templates";
const CHECK_REMOTE: &str = "remote_service";

/// Result of a single check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl CheckResult {
    fn pass(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.to_string(),
            details: None,
        }
    }

    fn fail(name: &str, message: &str, details: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.to_string(),
            details,
        }
    }
}

/// Complete preflight check report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreflightReport {
    pub all_passed: bool,
    pub ready_to_start: bool,
    pub remote_available: bool,
    pub checks: Vec<CheckResult>,
    pub summary: String,
}

impl PreflightReport {
    pub fn check(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name == name)
    }
}

/// Runs every check against the production components described by `config`.
pub async fn run_preflight_checks(config: &ClassifierConfig) -> Result<PreflightReport, AppError> {
    let remote = match config.api_url.as_deref() {
        Some(url) => HttpRemoteClassifier::new(url, config.remote_timeout())?,
        None => HttpRemoteClassifier::disabled(),
    };
    let heuristic = HeuristicClassifier::new();

    Ok(run_checks(&remote, &heuristic).await)
}

/// Runs every check against the given components and returns a comprehensive report
pub async fn run_checks<R: RemoteClassifier>(
    remote: &R,
    heuristic: &HeuristicClassifier,
) -> PreflightReport {
    info!("Running preflight checks");

    let checks = vec![
        check_lexicon(heuristic.lexicon()),
        check_templates(heuristic.selector()),
        check_remote(remote).await,
    ];

    let all_passed = checks.iter().all(|c| c.passed);
    let ready_to_start = checks
        .iter()
        .filter(|c| is_critical_check(&c.name))
        .all(|c| c.passed);
    let remote_available = checks
        .iter()
        .any(|c| c.name == CHECK_REMOTE && c.passed);

    let summary = if all_passed {
        "All checks passed. Remote classification available.".to_string()
    } else if ready_to_start {
        "Remote service unavailable. Emails will be classified locally.".to_string()
    } else {
        "Critical checks failed. Classification cannot run.".to_string()
    };

    for check in &checks {
        if check.passed {
            info!("  ✅ {}: {}", check.name, check.message);
        } else {
            warn!("  ❌ {}: {}", check.name, check.message);
            if let Some(details) = &check.details {
                warn!("      Details: {}", details);
            }
        }
    }

    info!("Summary: {}", summary);

    PreflightReport {
        all_passed,
        ready_to_start,
        remote_available,
        checks,
        summary,
    }
}

fn is_critical_check(name: &str) -> bool {
    matches!(name, CHECK_LEXICON | CHECK_TEMPLATES)
}

// --- Individual Checks ---

fn check_lexicon(lexicon: &KeywordLexicon) -> CheckResult {
    let productive = lexicon.terms(Category::Productive).len();
    let unproductive = lexicon.terms(Category::Unproductive).len();

    if productive == 0 || unproductive == 0 {
        return CheckResult::fail(
            CHECK_LEXICON,
            "Empty keyword list",
            Some(format!(
                "productive: {}, unproductive: {}",
                productive, unproductive
            )),
        );
    }

    if !lexicon.is_disjoint() {
        return CheckResult::fail(CHECK_LEXICON, "Keyword lists overlap", None);
    }

    CheckResult::pass(
        CHECK_LEXICON,
        &format!(
            "Lexicon OK ({} productive, {} unproductive terms)",
            productive, unproductive
        ),
    )
}

fn check_templates(selector: &ResponseSelector) -> CheckResult {
    let wrong: Vec<String> = Category::ALL
        .iter()
        .map(|c| (c, selector.templates(*c).len()))
        .filter(|(_, count)| *count != TEMPLATES_PER_CATEGORY)
        .map(|(c, count)| format!("{}: {}", c, count))
        .collect();

    if wrong.is_empty() {
        CheckResult::pass(
            CHECK_TEMPLATES,
            &format!("{} reply templates per category", TEMPLATES_PER_CATEGORY),
        )
    } else {
        CheckResult::fail(
            CHECK_TEMPLATES,
            &format!("Expected {} templates per category", TEMPLATES_PER_CATEGORY),
            Some(wrong.join(", ")),
        )
    }
}

async fn check_remote<R: RemoteClassifier>(remote: &R) -> CheckResult {
    match remote.health_check().await {
        Ok(()) => CheckResult::pass(CHECK_REMOTE, "Classification service reachable"),
        Err(e) => CheckResult::fail(
            CHECK_REMOTE,
            "Classification service unavailable",
            Some(e.to_string()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_default_lexicon_passes() {
        let check = check_lexicon(&KeywordLexicon::default());
        assert!(check.passed, "{:?}", check);
    }

    #[test]
    fn test_template_count_mismatch_fails() {
        let selector = ResponseSelector::new(vec!["a".into()], vec!["b".into()]).unwrap();
        let check = check_templates(&selector);
        assert!(!check.passed);
        assert!(check.details.unwrap().contains("Productive: 1"));
    }

    #[tokio::test]
    async fn test_disabled_remote_is_not_critical() {
        let heuristic = HeuristicClassifier::with_parts(
            Arc::new(KeywordLexicon::default()),
            Arc::new(ResponseSelector::default()),
            Some(1),
        );
        let report = run_checks(&HttpRemoteClassifier::disabled(), &heuristic).await;

        assert!(!report.all_passed);
        assert!(report.ready_to_start);
        assert!(!report.remote_available);
        assert!(!report.check(CHECK_REMOTE).unwrap().passed);
    }
}
