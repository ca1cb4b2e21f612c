//! Severity grading.
//!
//! Level rules, in order:
//! - a found keyword is one of the condition's high-severity keywords → Severe
//! - any keyword found → Moderate
//! - no keyword but measured values present → Low
//! - otherwise → Unspecified

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{ConditionRecord, SeverityAssessment, SeverityLevel};

use super::normalizer::NormalizedText;

/// Literal markers of measured respiratory values.
const QUANTIFIED_MARKERS: [&str; 2] = ["o2 sat", "respiratory rate"];

/// Any bare percentage. Also matches unrelated numbers followed by '%'.
static PERCENTAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+%").unwrap());

/// Whether the note documents quantified clinical measurements.
pub fn is_quantified(text: &NormalizedText) -> bool {
    text.contains_any(&QUANTIFIED_MARKERS[..]) || PERCENTAGE.is_match(text.as_str())
}

/// Grade severity for the identified condition.
pub fn assess_severity(
    condition: Option<&ConditionRecord>,
    text: &NormalizedText,
) -> SeverityAssessment {
    let quantified = is_quantified(text);

    let keywords_found: Vec<String> = condition
        .map(|c| {
            c.severity_keywords
                .iter()
                .filter(|k| text.contains(k))
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    let has_high = condition.is_some_and(|c| keywords_found.iter().any(|k| c.is_high_severity(k)));

    let level = if has_high {
        SeverityLevel::Severe
    } else if !keywords_found.is_empty() {
        SeverityLevel::Moderate
    } else if quantified {
        SeverityLevel::Low
    } else {
        SeverityLevel::Unspecified
    };

    SeverityAssessment {
        level,
        quantified,
        keywords_found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Normalizer;
    use crate::knowledge::KnowledgeBase;

    fn assess(condition: &str, text: &str) -> SeverityAssessment {
        let kb = KnowledgeBase::builtin().unwrap();
        let text = Normalizer::new().normalize(text);
        assess_severity(kb.condition(condition), &text)
    }

    #[test]
    fn test_keywords_in_knowledge_base_order() {
        let result = assess("COPD", "Patient has severe respiratory failure with hypoxemia");
        assert_eq!(result.keywords_found, vec!["severe", "respiratory failure", "hypoxemia"]);
        assert_eq!(result.level, SeverityLevel::Severe);
        assert!(!result.quantified);

        // Note order differs from table order
        let result = assess("COPD", "hypoxemia, acute");
        assert_eq!(result.keywords_found, vec!["acute", "hypoxemia"]);
    }

    #[test]
    fn test_moderate_without_high_severity_keyword() {
        let result = assess("COPD", "Acute COPD exacerbation, O2 sat 88%");
        assert_eq!(result.keywords_found, vec!["acute"]);
        assert_eq!(result.level, SeverityLevel::Moderate);
        assert!(result.quantified);
    }

    #[test]
    fn test_low_when_only_quantified() {
        let result = assess("COPD", "COPD exacerbation, respiratory rate 24");
        assert!(result.keywords_found.is_empty());
        assert!(result.quantified);
        assert_eq!(result.level, SeverityLevel::Low);
    }

    #[test]
    fn test_unspecified_when_nothing_found() {
        let result = assess("COPD", "Mild COPD symptoms");
        assert!(result.keywords_found.is_empty());
        assert!(!result.quantified);
        assert_eq!(result.level, SeverityLevel::Unspecified);
    }

    #[test]
    fn test_high_severity_is_per_condition() {
        // "cardiogenic shock" is severe for CHF; "pulmonary edema" is not
        assert_eq!(assess("CHF", "CHF with cardiogenic shock").level, SeverityLevel::Severe);
        assert_eq!(assess("CHF", "CHF with pulmonary edema").level, SeverityLevel::Moderate);
    }

    #[test]
    fn test_no_condition_has_no_keywords() {
        let kb = KnowledgeBase::builtin().unwrap();
        let text = Normalizer::new().normalize("severe sepsis, SpO2 85%");

        let result = assess_severity(None, &text);
        assert!(result.keywords_found.is_empty());
        assert!(result.quantified);
        assert_eq!(result.level, SeverityLevel::Low);
        assert!(kb.condition("sepsis").is_none());
    }

    #[test]
    fn test_percentage_heuristic_false_positive() {
        let text = Normalizer::new().normalize("Family reports 50% adherence");
        assert!(is_quantified(&text));
    }
}
