//! Clinical note analyzer.
//!
//! Pipeline: Normalization → Condition → Severity → Admission Status →
//! Interventions → Prior Auth → Documentation Gaps

mod admission;
mod gaps;
mod identifier;
mod interventions;
mod normalizer;
mod severity;

pub use admission::*;
pub use gaps::*;
pub use identifier::*;
pub use interventions::*;
pub use normalizer::*;
pub use severity::*;

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::knowledge::KnowledgeBase;
use crate::models::{AnalysisResult, ConditionRecord, ConditionSummary};
use crate::scoring::{DenialRiskScorer, RiskBand, RiskWeights};

/// An analysis together with its denial risk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assessment {
    pub analysis: AnalysisResult,
    pub risk_score: u8,
    pub risk_band: RiskBand,
}

/// Runs the full analysis pipeline over clinical notes.
///
/// Holds only immutable state, so one analyzer can serve many threads.
#[derive(Debug, Clone)]
pub struct Analyzer {
    kb: Arc<KnowledgeBase>,
    normalizer: Normalizer,
    scorer: DenialRiskScorer,
}

impl Analyzer {
    /// Create an analyzer with the default risk weights.
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self {
            kb,
            normalizer: Normalizer::new(),
            scorer: DenialRiskScorer::default(),
        }
    }

    /// Replace the risk weights.
    pub fn with_weights(mut self, weights: RiskWeights) -> Self {
        self.scorer = DenialRiskScorer::new(weights);
        self
    }

    /// Analyze one clinical note.
    ///
    /// Never fails: a note without a known condition yields an
    /// "Unspecified" profile.
    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let kb = self.kb.as_ref();

        // Step 1: Normalize
        let normalized = self.normalizer.normalize(text);

        // Step 2: Identify the condition; everything condition-specific hangs off it
        let condition = ConditionIdentifier::new(kb).identify(&normalized);
        tracing::debug!(
            condition = condition.map(|c| c.name.as_str()).unwrap_or("Unspecified"),
            "Condition identified"
        );

        // Step 3: Severity
        let severity = assess_severity(condition, &normalized);

        // Step 4: Admission status
        let admission_status = AdmissionEvaluator::new(kb).evaluate(condition, &normalized);

        // Step 5: Interventions and prior auth
        let detector = InterventionDetector::new(kb);
        let interventions = detector.detect(&normalized);
        let prior_auth = detector.resolve_prior_auth(&interventions);

        // Step 6: Documentation gaps
        let gap_detector = GapDetector::new(kb);
        let documentation_gaps = gap_detector.detect(&normalized);
        let has_comorbidity = gap_detector.is_satisfied(COMORBIDITY_REQUIREMENT, &normalized);

        tracing::debug!(
            severity = %severity.level,
            status = %admission_status.current_status,
            interventions = interventions.len(),
            prior_auth = prior_auth.len(),
            gaps = documentation_gaps.len(),
            "Clinical note analyzed"
        );

        AnalysisResult {
            condition: summarize(condition, has_comorbidity),
            severity,
            admission_status,
            interventions,
            prior_auth,
            documentation_gaps,
        }
    }

    /// Analyze many notes in parallel. Output order matches input order.
    pub fn analyze_batch<S>(&self, texts: &[S]) -> Vec<AnalysisResult>
    where
        S: AsRef<str> + Sync,
    {
        texts.par_iter().map(|t| self.analyze(t.as_ref())).collect()
    }

    /// Denial risk for an analysis, using this analyzer's weights.
    pub fn denial_risk(&self, analysis: &AnalysisResult) -> u8 {
        self.scorer.score(analysis)
    }

    /// Analyze a note and score it.
    pub fn assess(&self, text: &str) -> Assessment {
        let analysis = self.analyze(text);
        let risk_score = self.denial_risk(&analysis);
        Assessment {
            analysis,
            risk_score,
            risk_band: RiskBand::from_score(risk_score),
        }
    }

    /// Analyze and score many notes in parallel, preserving input order.
    pub fn assess_batch<S>(&self, texts: &[S]) -> Vec<Assessment>
    where
        S: AsRef<str> + Sync,
    {
        texts.par_iter().map(|t| self.assess(t.as_ref())).collect()
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }
}

fn summarize(condition: Option<&ConditionRecord>, has_comorbidity: bool) -> ConditionSummary {
    match condition {
        Some(c) => ConditionSummary {
            name: c.name.clone(),
            icd10: Some(c.icd10.clone()),
            drg: Some(if has_comorbidity {
                c.drg_with_cc.clone()
            } else {
                c.drg_without_cc.clone()
            }),
        },
        None => ConditionSummary::unspecified(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdmissionStatus, SeverityLevel};

    fn analyzer() -> Analyzer {
        Analyzer::new(Arc::new(KnowledgeBase::builtin().unwrap()))
    }

    #[test]
    fn test_copd_observation() {
        let result = analyzer().analyze(
            "Mr. Jones has worsening COPD exacerbation, not responding to nebulizers.\n\
             Starting prednisone 60mg, observe for 24 hours, if no improvement we may need to admit.\n\
             Patient currently on 2L O2, respiratory rate 24.",
        );

        assert_eq!(result.condition.name, "COPD");
        assert_eq!(result.condition.icd10.as_deref(), Some("J44.1"));
        assert_eq!(result.condition.drg.as_deref(), Some("192"));
        assert!(result.severity.keywords_found.is_empty());
        assert!(result.severity.quantified);
        assert_eq!(result.severity.level, SeverityLevel::Low);
        assert_eq!(result.admission_status.current_status, AdmissionStatus::Observation);
        assert_eq!(result.admission_status.expected_los_days, 2.3);
        assert!(!result.admission_status.two_midnight_rule);
        assert_eq!(
            result.interventions,
            vec!["Nebulizer treatment", "Systemic corticosteroids", "Supplemental oxygen"]
        );
        assert!(result.prior_auth.is_empty());
        assert_eq!(result.documentation_gaps.len(), 1);
    }

    #[test]
    fn test_unspecified_degrades() {
        let result = analyzer().analyze("Routine follow-up, will admit for observation.");

        assert_eq!(result.condition, ConditionSummary::unspecified());
        assert!(result.severity.keywords_found.is_empty());
        assert_eq!(result.admission_status.expected_los_days, 0.0);
        assert!(!result.admission_status.two_midnight_rule);
    }

    #[test]
    fn test_drg_with_comorbidity() {
        let result = analyzer().analyze("CHF exacerbation, history of diabetes");
        assert_eq!(result.condition.drg.as_deref(), Some("291"));
    }

    #[test]
    fn test_assess_scores() {
        let assessment = analyzer().assess("Unknown complaint");

        // Unspecified 3 + unquantified 2 + gaps capped 3 + two-midnight miss 2
        assert_eq!(assessment.risk_score, 10);
        assert_eq!(assessment.risk_band, RiskBand::High);
    }

    #[test]
    fn test_custom_weights() {
        let weights = RiskWeights {
            two_midnight_miss: 0,
            ..RiskWeights::default()
        };
        let assessment = analyzer().with_weights(weights).assess("Unknown complaint");
        assert_eq!(assessment.risk_score, 8);
    }

    #[test]
    fn test_batch_preserves_order() {
        let notes = vec!["CHF exacerbation", "no known condition", "pneumonia", "COPD"];
        let results = analyzer().analyze_batch(&notes);

        let names: Vec<&str> = results.iter().map(|r| r.condition.name.as_str()).collect();
        assert_eq!(names, vec!["CHF", "Unspecified", "Pneumonia", "COPD"]);
    }
}
