//! Condition identification.

use crate::knowledge::KnowledgeBase;
use crate::models::ConditionRecord;

use super::normalizer::NormalizedText;

/// Finds the condition a note is about.
pub struct ConditionIdentifier<'a> {
    kb: &'a KnowledgeBase,
}

impl<'a> ConditionIdentifier<'a> {
    pub fn new(kb: &'a KnowledgeBase) -> Self {
        Self { kb }
    }

    /// Return the first knowledge-base condition (declaration order) whose
    /// name occurs in the note. Overlaps resolve by table order, not by
    /// match length or position in the note.
    pub fn identify(&self, text: &NormalizedText) -> Option<&'a ConditionRecord> {
        self.kb
            .conditions()
            .iter()
            .find(|condition| text.contains(&condition.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Normalizer;

    fn identify(text: &str) -> Option<String> {
        let kb = KnowledgeBase::builtin().unwrap();
        let text = Normalizer::new().normalize(text);
        ConditionIdentifier::new(&kb)
            .identify(&text)
            .map(|c| c.name.clone())
    }

    #[test]
    fn test_identifies_each_condition() {
        assert_eq!(identify("Patient has COPD exacerbation").as_deref(), Some("COPD"));
        assert_eq!(identify("Acute CHF decompensation").as_deref(), Some("CHF"));
        assert_eq!(identify("Severe pneumonia with infiltrates").as_deref(), Some("Pneumonia"));
    }

    #[test]
    fn test_unknown_condition() {
        assert_eq!(identify("Unknown condition"), None);
        assert_eq!(identify(""), None);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(identify("copd flare").as_deref(), Some("COPD"));
        assert_eq!(identify("PNEUMONIA").as_deref(), Some("Pneumonia"));
    }

    #[test]
    fn test_first_match_wins_by_table_order() {
        // CHF appears first in the note, COPD first in the table
        assert_eq!(identify("CHF exacerbation in a patient with COPD").as_deref(), Some("COPD"));
        assert_eq!(identify("pneumonia complicating CHF").as_deref(), Some("CHF"));
    }

    #[test]
    fn test_substring_match_inside_words() {
        // Literal substring semantics: no word-boundary check
        assert_eq!(identify("bronchopneumonia").as_deref(), Some("Pneumonia"));
    }
}
