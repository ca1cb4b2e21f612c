//! Admission status and 2-midnight rule evaluation.

use crate::knowledge::KnowledgeBase;
use crate::models::{
    AdmissionAssessment, AdmissionStatus, ConditionRecord, TWO_MIDNIGHT_THRESHOLD_DAYS,
};

use super::normalizer::NormalizedText;

/// Evaluates admission status against inpatient criteria.
pub struct AdmissionEvaluator<'a> {
    kb: &'a KnowledgeBase,
}

impl<'a> AdmissionEvaluator<'a> {
    pub fn new(kb: &'a KnowledgeBase) -> Self {
        Self { kb }
    }

    /// Status of the first cue, in precedence order, with a phrase in the note
    /// once that cue's exclusions are blanked out.
    pub fn current_status(&self, text: &NormalizedText) -> AdmissionStatus {
        self.kb
            .status_cues()
            .iter()
            .find(|cue| {
                text.without(cue.exclusions.as_slice())
                    .contains_any(cue.phrases.as_slice())
            })
            .map(|cue| cue.status)
            .unwrap_or(AdmissionStatus::Undetermined)
    }

    pub fn evaluate(
        &self,
        condition: Option<&ConditionRecord>,
        text: &NormalizedText,
    ) -> AdmissionAssessment {
        let current_status = self.current_status(text);

        let rule = condition.and_then(|c| self.kb.admission_rule(&c.name));
        let expected_los_days = condition.map(|c| c.avg_los_days).unwrap_or(0.0);
        let threshold = rule
            .map(|r| r.los_threshold_days)
            .unwrap_or(TWO_MIDNIGHT_THRESHOLD_DAYS);

        AdmissionAssessment {
            current_status,
            expected_los_days,
            two_midnight_rule: meets_two_midnight_rule(expected_los_days, threshold, current_status),
            inpatient_criteria: rule.map(|r| r.inpatient_criteria.clone()).unwrap_or_default(),
        }
    }
}

/// Expected stay reaches the threshold (inclusive) and the patient is not
/// held in observation.
pub fn meets_two_midnight_rule(expected_los_days: f64, threshold: f64, status: AdmissionStatus) -> bool {
    expected_los_days >= threshold && status != AdmissionStatus::Observation
}
