//! Documentation gap detection.

use crate::knowledge::{ChecklistItem, KnowledgeBase};

use super::normalizer::NormalizedText;

/// Checklist item whose presence selects the with-CC DRG.
pub const COMORBIDITY_REQUIREMENT: &str = "comorbidities";

/// Checks a note against the documentation checklist.
pub struct GapDetector<'a> {
    kb: &'a KnowledgeBase,
}

impl<'a> GapDetector<'a> {
    pub fn new(kb: &'a KnowledgeBase) -> Self {
        Self { kb }
    }

    /// Gap descriptions for missing checklist items, in checklist order.
    pub fn detect(&self, text: &NormalizedText) -> Vec<String> {
        self.kb
            .checklist()
            .iter()
            .filter(|item| !is_documented(item, text))
            .map(|item| item.requirement.gap_description.clone())
            .collect()
    }

    /// Whether the checklist item with this id is documented.
    ///
    /// Unknown ids count as undocumented.
    pub fn is_satisfied(&self, id: &str, text: &NormalizedText) -> bool {
        self.kb
            .checklist()
            .iter()
            .find(|item| item.requirement.id == id)
            .is_some_and(|item| is_documented(item, text))
    }
}

fn is_documented(item: &ChecklistItem, text: &NormalizedText) -> bool {
    text.contains_any(item.requirement.phrases.as_slice())
        || item.patterns.iter().any(|p| p.is_match(text.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Normalizer;

    fn gaps(text: &str) -> Vec<String> {
        let kb = KnowledgeBase::builtin().unwrap();
        let text = Normalizer::new().normalize(text);
        GapDetector::new(&kb).detect(&text)
    }

    #[test]
    fn test_all_missing_in_checklist_order() {
        let found = gaps("Patient seen.");
        assert_eq!(found.len(), 4);
        assert!(found[0].starts_with("Quantified vital signs"));
        assert!(found[1].starts_with("Response to initial treatment"));
        assert!(found[2].starts_with("Admission or discharge plan"));
        assert!(found[3].starts_with("Comorbidities"));
    }

    #[test]
    fn test_complete_note_has_no_gaps() {
        let found = gaps(
            "SpO2 86%, not responding to nebulizers, expect 3 day stay, history of CKD",
        );
        assert!(found.is_empty(), "unexpected gaps: {:?}", found);
    }

    #[test]
    fn test_patterns_satisfy_requirements() {
        // "HR 110" satisfies vitals via pattern; "48-72 hours" satisfies the plan
        let found = gaps("HR 110, needs 48-72 hours inpatient");
        assert_eq!(found.len(), 2);
        assert!(found[0].starts_with("Response to initial treatment"));
        assert!(found[1].starts_with("Comorbidities"));
    }

    #[test]
    fn test_comorbidity_satisfied() {
        let kb = KnowledgeBase::builtin().unwrap();
        let detector = GapDetector::new(&kb);
        let normalizer = Normalizer::new();

        assert!(detector.is_satisfied(COMORBIDITY_REQUIREMENT, &normalizer.normalize("CKD stage 3")));
        assert!(!detector.is_satisfied(COMORBIDITY_REQUIREMENT, &normalizer.normalize("no other issues")));
        assert!(!detector.is_satisfied("no_such_item", &normalizer.normalize("CKD stage 3")));
    }
}
