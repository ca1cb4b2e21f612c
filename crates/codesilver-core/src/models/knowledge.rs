//! Knowledge-base record types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::analysis::AdmissionStatus;

/// A billable condition with its coding and severity vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConditionRecord {
    /// Display name, also the text matched in notes (case-insensitive)
    pub name: String,
    /// ICD-10 diagnosis code
    pub icd10: String,
    /// DRG when a complication/comorbidity is documented
    pub drg_with_cc: String,
    /// DRG without complication/comorbidity
    pub drg_without_cc: String,
    /// Average length of stay in days
    pub avg_los_days: f64,
    /// Severity keywords, in reporting order
    pub severity_keywords: Vec<String>,
    /// Keywords that grade the note as severe (subset of `severity_keywords`)
    #[serde(default)]
    pub high_severity_keywords: Vec<String>,
}

impl ConditionRecord {
    /// Check whether a found keyword grades this condition as severe.
    pub fn is_high_severity(&self, keyword: &str) -> bool {
        self.high_severity_keywords
            .iter()
            .any(|k| k.eq_ignore_ascii_case(keyword))
    }
}

/// Inpatient criteria for a condition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdmissionRule {
    /// Name of the condition this rule belongs to
    pub condition: String,
    /// What qualifies as inpatient-level care
    pub inpatient_criteria: Vec<String>,
    /// Minimum expected stay for 2-midnight compliance
    #[serde(default = "default_los_threshold")]
    pub los_threshold_days: f64,
}

/// Two midnights.
pub const TWO_MIDNIGHT_THRESHOLD_DAYS: f64 = 2.0;

fn default_los_threshold() -> f64 {
    TWO_MIDNIGHT_THRESHOLD_DAYS
}

/// Payer category for prior-authorization requirements.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PayerCategory {
    Commercial,
    Medicare,
    Medicaid,
}

impl PayerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayerCategory::Commercial => "commercial",
            PayerCategory::Medicare => "medicare",
            PayerCategory::Medicaid => "medicaid",
        }
    }
}

impl fmt::Display for PayerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payer requirements for an intervention that needs pre-approval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriorAuthEntry {
    /// Intervention name (matches an [`InterventionDefinition`])
    pub intervention: String,
    /// Payer category → requirement description
    pub requirements: BTreeMap<PayerCategory, String>,
}

/// An intervention and the phrases that indicate it was performed.
///
/// Phrases are matched case-insensitively after the same dash and whitespace
/// folding as the note. Leading or trailing spaces are part of the phrase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterventionDefinition {
    pub name: String,
    pub phrases: Vec<String>,
}

/// Disposition language that implies an admission status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusCue {
    pub status: AdmissionStatus,
    pub phrases: Vec<String>,
    /// Blanked out of the note before `phrases` are matched
    /// (hedged wording such as "may need to admit")
    #[serde(default)]
    pub exclusions: Vec<String>,
}

/// One documentation element a reviewer expects in the note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentationRequirement {
    /// Stable identifier (e.g. "vital_signs")
    pub id: String,
    /// Reported when the element is missing
    pub gap_description: String,
    /// Literal phrases, any of which satisfies the requirement (folded like
    /// [`InterventionDefinition::phrases`])
    #[serde(default)]
    pub phrases: Vec<String>,
    /// Regex patterns matched against the normalized note
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Raw, unvalidated knowledge-base tables.
///
/// This is the serialized form; [`crate::knowledge::KnowledgeBase`] is built
/// from it after validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeTables {
    /// Conditions in match-precedence order
    pub conditions: Vec<ConditionRecord>,
    pub admission_rules: Vec<AdmissionRule>,
    /// Status cues in precedence order
    pub status_cues: Vec<StatusCue>,
    /// Interventions in reporting order
    pub interventions: Vec<InterventionDefinition>,
    pub prior_auth: Vec<PriorAuthEntry>,
    /// Documentation checklist in reporting order
    pub documentation_checklist: Vec<DocumentationRequirement>,
}
