//! Analysis result models.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::knowledge::PayerCategory;

/// Name reported when no condition from the knowledge base is mentioned.
pub const UNSPECIFIED_CONDITION: &str = "Unspecified";

/// The condition identified in a note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConditionSummary {
    /// Condition name, or "Unspecified"
    pub name: String,
    /// ICD-10 code (None when unspecified)
    pub icd10: Option<String>,
    /// DRG selected from the comorbidity documentation (None when unspecified)
    pub drg: Option<String>,
}

impl ConditionSummary {
    /// The sentinel for notes that mention no known condition.
    pub fn unspecified() -> Self {
        Self {
            name: UNSPECIFIED_CONDITION.to_string(),
            icd10: None,
            drg: None,
        }
    }

    /// Whether a knowledge-base condition was identified.
    pub fn is_identified(&self) -> bool {
        self.icd10.is_some()
    }
}

/// Qualitative severity grade.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SeverityLevel {
    Low,
    Moderate,
    Severe,
    Unspecified,
}

impl SeverityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityLevel::Low => "Low",
            SeverityLevel::Moderate => "Moderate",
            SeverityLevel::Severe => "Severe",
            SeverityLevel::Unspecified => "Unspecified",
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity grading for a note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeverityAssessment {
    pub level: SeverityLevel,
    /// Whether measured clinical values were documented
    pub quantified: bool,
    /// Condition keywords present in the note, in knowledge-base order
    pub keywords_found: Vec<String>,
}

/// Admission status inferred from disposition language.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AdmissionStatus {
    /// Observation-only stay
    Observation,
    /// Note recommends inpatient admission
    InpatientRecommended,
    /// Patient is documented as admitted
    Admitted,
    /// No disposition language found
    Undetermined,
}

impl AdmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdmissionStatus::Observation => "Observation",
            AdmissionStatus::InpatientRecommended => "Inpatient Recommended",
            AdmissionStatus::Admitted => "Admitted",
            AdmissionStatus::Undetermined => "Undetermined",
        }
    }
}

impl fmt::Display for AdmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admission status versus inpatient criteria.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdmissionAssessment {
    pub current_status: AdmissionStatus,
    /// Average length of stay for the condition (0.0 when unspecified)
    pub expected_los_days: f64,
    /// Whether the stay is expected to span two midnights as an inpatient
    pub two_midnight_rule: bool,
    /// Inpatient criteria for the identified condition
    pub inpatient_criteria: Vec<String>,
}

/// Prior-authorization requirement for a detected intervention.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriorAuthRequirement {
    pub intervention: String,
    pub requirements: BTreeMap<PayerCategory, String>,
}

/// Full utilization-review profile of one clinical note.
///
/// Produced once per note by [`crate::Analyzer::analyze`] and not mutated
/// afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub condition: ConditionSummary,
    pub severity: SeverityAssessment,
    pub admission_status: AdmissionAssessment,
    /// Detected interventions, deduplicated, in knowledge-base order
    pub interventions: Vec<String>,
    pub prior_auth: Vec<PriorAuthRequirement>,
    /// Missing documentation elements, in checklist order
    pub documentation_gaps: Vec<String>,
}

impl AnalysisResult {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unspecified_condition() {
        let condition = ConditionSummary::unspecified();
        assert_eq!(condition.name, "Unspecified");
        assert!(condition.icd10.is_none());
        assert!(!condition.is_identified());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(AdmissionStatus::InpatientRecommended.to_string(), "Inpatient Recommended");
        assert_eq!(SeverityLevel::Moderate.to_string(), "Moderate");
    }

    #[test]
    fn test_unspecified_serializes_null_code() {
        let json = serde_json::to_string(&ConditionSummary::unspecified()).unwrap();
        assert_eq!(json, r#"{"name":"Unspecified","icd10":null,"drg":null}"#);
    }
}
