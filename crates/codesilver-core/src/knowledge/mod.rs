//! Static knowledge base: conditions, admission rules, interventions,
//! prior-authorization requirements and the documentation checklist.
//!
//! Tables are validated once when loaded. After that the knowledge base is
//! read-only and can be shared across threads.

mod builtin;

pub use builtin::builtin_tables;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::models::{
    AdmissionRule, AdmissionStatus, ConditionRecord, DocumentationRequirement,
    InterventionDefinition, KnowledgeTables, PriorAuthEntry, StatusCue,
};

/// Knowledge-base integrity errors.
#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Condition at position {0} has an empty name")]
    EmptyConditionName(usize),

    #[error("Condition {0} has no ICD-10 code")]
    MissingIcd10(String),

    #[error("Duplicate condition: {0}")]
    DuplicateCondition(String),

    #[error("Condition {condition} has invalid average length of stay: {value}")]
    InvalidLengthOfStay { condition: String, value: f64 },

    #[error("Condition {condition}: high-severity keyword '{keyword}' is not one of its severity keywords")]
    UnknownHighSeverityKeyword { condition: String, keyword: String },

    #[error("Condition {0} has no admission rule")]
    MissingAdmissionRule(String),

    #[error("Admission rule references unknown condition: {0}")]
    OrphanAdmissionRule(String),

    #[error("Duplicate admission rule for condition: {0}")]
    DuplicateAdmissionRule(String),

    #[error("Admission rule for {condition} has invalid length-of-stay threshold: {value}")]
    InvalidThreshold { condition: String, value: f64 },

    #[error("Duplicate intervention: {0}")]
    DuplicateIntervention(String),

    #[error("Intervention {0} has no matching phrases")]
    EmptyIntervention(String),

    #[error("Prior authorization entry references unknown intervention: {0}")]
    UnknownIntervention(String),

    #[error("Prior authorization entry for {0} lists no payer requirements")]
    EmptyPriorAuth(String),

    #[error("Duplicate prior authorization entry for intervention: {0}")]
    DuplicatePriorAuth(String),

    #[error("Status cue for {0} has no phrases")]
    EmptyStatusCue(AdmissionStatus),

    #[error("Documentation requirement {0} has no phrases or patterns")]
    EmptyRequirement(String),

    #[error("Duplicate documentation requirement: {0}")]
    DuplicateRequirement(String),

    #[error("Documentation requirement {id} has an invalid pattern: {source}")]
    InvalidPattern { id: String, source: regex::Error },
}

pub type KnowledgeResult<T> = Result<T, KnowledgeError>;

/// A documentation requirement with its patterns compiled.
#[derive(Debug, Clone)]
pub struct ChecklistItem {
    pub requirement: DocumentationRequirement,
    pub patterns: Vec<Regex>,
}

/// Validated, read-only knowledge base.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    tables: KnowledgeTables,
    /// Lower-cased condition name → index into `tables.conditions`
    condition_index: HashMap<String, usize>,
    /// Lower-cased condition name → index into `tables.admission_rules`
    rule_index: HashMap<String, usize>,
    /// Lower-cased intervention name → index into `tables.prior_auth`
    prior_auth_index: HashMap<String, usize>,
    checklist: Vec<ChecklistItem>,
}

impl KnowledgeBase {
    /// Load the built-in tables.
    pub fn builtin() -> KnowledgeResult<Self> {
        Self::load(builtin_tables())
    }

    /// Load tables from a JSON document.
    pub fn from_json(json: &str) -> KnowledgeResult<Self> {
        let tables: KnowledgeTables = serde_json::from_str(json)?;
        Self::load(tables)
    }

    /// Load tables from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> KnowledgeResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Validate tables and build lookup indexes.
    pub fn load(tables: KnowledgeTables) -> KnowledgeResult<Self> {
        let kb = Self::build(tables).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected knowledge base");
        })?;

        tracing::info!(
            conditions = kb.tables.conditions.len(),
            interventions = kb.tables.interventions.len(),
            prior_auth_entries = kb.tables.prior_auth.len(),
            checklist_items = kb.checklist.len(),
            "Knowledge base loaded"
        );

        Ok(kb)
    }

    fn build(tables: KnowledgeTables) -> KnowledgeResult<Self> {
        let condition_index = index_conditions(&tables.conditions)?;
        let rule_index = index_admission_rules(&tables.admission_rules, &condition_index)?;

        for condition in &tables.conditions {
            if !rule_index.contains_key(&condition.name.to_lowercase()) {
                return Err(KnowledgeError::MissingAdmissionRule(condition.name.clone()));
            }
        }

        let interventions = check_interventions(&tables.interventions)?;
        let prior_auth_index = index_prior_auth(&tables.prior_auth, &interventions)?;

        for cue in &tables.status_cues {
            if cue.phrases.iter().all(|p| p.trim().is_empty()) {
                return Err(KnowledgeError::EmptyStatusCue(cue.status));
            }
        }

        let mut requirement_ids = HashSet::new();
        for requirement in &tables.documentation_checklist {
            if !requirement_ids.insert(requirement.id.as_str()) {
                return Err(KnowledgeError::DuplicateRequirement(requirement.id.clone()));
            }
        }

        let checklist = tables
            .documentation_checklist
            .iter()
            .map(compile_requirement)
            .collect::<KnowledgeResult<Vec<_>>>()?;

        Ok(Self {
            tables,
            condition_index,
            rule_index,
            prior_auth_index,
            checklist,
        })
    }

    /// Conditions in match-precedence (declaration) order.
    pub fn conditions(&self) -> &[ConditionRecord] {
        &self.tables.conditions
    }

    /// Look up a condition by name (case-insensitive).
    pub fn condition(&self, name: &str) -> Option<&ConditionRecord> {
        self.condition_index
            .get(&name.to_lowercase())
            .map(|&i| &self.tables.conditions[i])
    }

    /// Look up the admission rule for a condition (case-insensitive).
    pub fn admission_rule(&self, condition: &str) -> Option<&AdmissionRule> {
        self.rule_index
            .get(&condition.to_lowercase())
            .map(|&i| &self.tables.admission_rules[i])
    }

    /// Look up the prior-authorization entry for an intervention (case-insensitive).
    pub fn prior_auth(&self, intervention: &str) -> Option<&PriorAuthEntry> {
        self.prior_auth_index
            .get(&intervention.to_lowercase())
            .map(|&i| &self.tables.prior_auth[i])
    }

    /// Status cues in precedence order.
    pub fn status_cues(&self) -> &[StatusCue] {
        &self.tables.status_cues
    }

    /// Intervention definitions in reporting order.
    pub fn interventions(&self) -> &[InterventionDefinition] {
        &self.tables.interventions
    }

    /// Documentation checklist in reporting order.
    pub fn checklist(&self) -> &[ChecklistItem] {
        &self.checklist
    }

    /// The underlying tables.
    pub fn tables(&self) -> &KnowledgeTables {
        &self.tables
    }

    /// Export the tables to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.tables)
    }
}

fn index_conditions(conditions: &[ConditionRecord]) -> KnowledgeResult<HashMap<String, usize>> {
    let mut index = HashMap::new();

    for (i, condition) in conditions.iter().enumerate() {
        if condition.name.trim().is_empty() {
            return Err(KnowledgeError::EmptyConditionName(i));
        }
        if condition.icd10.trim().is_empty() {
            return Err(KnowledgeError::MissingIcd10(condition.name.clone()));
        }
        if !condition.avg_los_days.is_finite() || condition.avg_los_days < 0.0 {
            return Err(KnowledgeError::InvalidLengthOfStay {
                condition: condition.name.clone(),
                value: condition.avg_los_days,
            });
        }
        for keyword in &condition.high_severity_keywords {
            let listed = condition
                .severity_keywords
                .iter()
                .any(|k| k.eq_ignore_ascii_case(keyword));
            if !listed {
                return Err(KnowledgeError::UnknownHighSeverityKeyword {
                    condition: condition.name.clone(),
                    keyword: keyword.clone(),
                });
            }
        }
        if index.insert(condition.name.to_lowercase(), i).is_some() {
            return Err(KnowledgeError::DuplicateCondition(condition.name.clone()));
        }
    }

    Ok(index)
}

fn index_admission_rules(
    rules: &[AdmissionRule],
    conditions: &HashMap<String, usize>,
) -> KnowledgeResult<HashMap<String, usize>> {
    let mut index = HashMap::new();

    for (i, rule) in rules.iter().enumerate() {
        let key = rule.condition.to_lowercase();
        if !conditions.contains_key(&key) {
            return Err(KnowledgeError::OrphanAdmissionRule(rule.condition.clone()));
        }
        if !rule.los_threshold_days.is_finite() || rule.los_threshold_days < 0.0 {
            return Err(KnowledgeError::InvalidThreshold {
                condition: rule.condition.clone(),
                value: rule.los_threshold_days,
            });
        }
        if index.insert(key, i).is_some() {
            return Err(KnowledgeError::DuplicateAdmissionRule(rule.condition.clone()));
        }
    }

    Ok(index)
}

fn check_interventions(interventions: &[InterventionDefinition]) -> KnowledgeResult<HashSet<String>> {
    let mut names = HashSet::new();

    for intervention in interventions {
        if intervention.phrases.iter().all(|p| p.trim().is_empty()) {
            return Err(KnowledgeError::EmptyIntervention(intervention.name.clone()));
        }
        if !names.insert(intervention.name.to_lowercase()) {
            return Err(KnowledgeError::DuplicateIntervention(intervention.name.clone()));
        }
    }

    Ok(names)
}

fn index_prior_auth(
    entries: &[PriorAuthEntry],
    interventions: &HashSet<String>,
) -> KnowledgeResult<HashMap<String, usize>> {
    let mut index = HashMap::new();

    for (i, entry) in entries.iter().enumerate() {
        let key = entry.intervention.to_lowercase();
        if !interventions.contains(&key) {
            return Err(KnowledgeError::UnknownIntervention(entry.intervention.clone()));
        }
        if entry.requirements.is_empty() {
            return Err(KnowledgeError::EmptyPriorAuth(entry.intervention.clone()));
        }
        if index.insert(key, i).is_some() {
            return Err(KnowledgeError::DuplicatePriorAuth(entry.intervention.clone()));
        }
    }

    Ok(index)
}

fn compile_requirement(requirement: &DocumentationRequirement) -> KnowledgeResult<ChecklistItem> {
    let has_phrase = requirement.phrases.iter().any(|p| !p.trim().is_empty());
    if !has_phrase && requirement.patterns.is_empty() {
        return Err(KnowledgeError::EmptyRequirement(requirement.id.clone()));
    }

    let patterns = requirement
        .patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .map_err(|source| KnowledgeError::InvalidPattern {
                    id: requirement.id.clone(),
                    source,
                })
        })
        .collect::<KnowledgeResult<Vec<_>>>()?;

    Ok(ChecklistItem {
        requirement: requirement.clone(),
        patterns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PayerCategory;
    use std::io::Write;

    #[test]
    fn test_builtin_loads() {
        let kb = KnowledgeBase::builtin().unwrap();

        let names: Vec<&str> = kb.conditions().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["COPD", "CHF", "Pneumonia"]);
        assert_eq!(kb.checklist().len(), 4);
    }

    #[test]
    fn test_condition_lookup_is_case_insensitive() {
        let kb = KnowledgeBase::builtin().unwrap();

        assert_eq!(kb.condition("copd").unwrap().icd10, "J44.1");
        assert_eq!(kb.condition("COPD").unwrap().icd10, "J44.1");
        assert_eq!(kb.condition("pneumonia").unwrap().drg_with_cc, "193");
        assert!(kb.condition("asthma").is_none());
    }

    #[test]
    fn test_every_condition_has_rule() {
        let kb = KnowledgeBase::builtin().unwrap();

        for condition in kb.conditions() {
            let rule = kb.admission_rule(&condition.name).unwrap();
            assert_eq!(rule.los_threshold_days, 2.0);
            assert!(!rule.inpatient_criteria.is_empty());
        }
    }

    #[test]
    fn test_prior_auth_lookup() {
        let kb = KnowledgeBase::builtin().unwrap();

        assert!(kb.prior_auth("bipap/non-invasive ventilation").is_some());
        assert!(kb.prior_auth("Nebulizer treatment").is_none());
    }

    #[test]
    fn test_missing_admission_rule_rejected() {
        let mut tables = builtin_tables();
        tables.admission_rules.retain(|r| r.condition != "CHF");

        let err = KnowledgeBase::load(tables).unwrap_err();
        assert!(matches!(err, KnowledgeError::MissingAdmissionRule(ref c) if c == "CHF"));
    }

    #[test]
    fn test_orphan_admission_rule_rejected() {
        let mut tables = builtin_tables();
        let mut rule = tables.admission_rules[0].clone();
        rule.condition = "Asthma".into();
        tables.admission_rules.push(rule);

        let err = KnowledgeBase::load(tables).unwrap_err();
        assert!(matches!(err, KnowledgeError::OrphanAdmissionRule(_)));
    }

    #[test]
    fn test_duplicate_condition_rejected() {
        let mut tables = builtin_tables();
        let mut dup = tables.conditions[0].clone();
        dup.name = "copd".into();
        tables.conditions.push(dup);

        let err = KnowledgeBase::load(tables).unwrap_err();
        assert!(matches!(err, KnowledgeError::DuplicateCondition(_)));
    }

    #[test]
    fn test_unknown_high_severity_keyword_rejected() {
        let mut tables = builtin_tables();
        tables.conditions[1].high_severity_keywords.push("sepsis".into());

        let err = KnowledgeBase::load(tables).unwrap_err();
        assert!(matches!(
            err,
            KnowledgeError::UnknownHighSeverityKeyword { ref keyword, .. } if keyword == "sepsis"
        ));
    }

    #[test]
    fn test_invalid_length_of_stay_rejected() {
        let mut tables = builtin_tables();
        tables.conditions[0].avg_los_days = f64::NAN;

        let err = KnowledgeBase::load(tables).unwrap_err();
        assert!(matches!(err, KnowledgeError::InvalidLengthOfStay { .. }));
    }

    #[test]
    fn test_prior_auth_for_unknown_intervention_rejected() {
        let mut tables = builtin_tables();
        tables.prior_auth[0].intervention = "Heart transplant".into();

        let err = KnowledgeBase::load(tables).unwrap_err();
        assert!(matches!(err, KnowledgeError::UnknownIntervention(_)));
    }

    #[test]
    fn test_duplicate_prior_auth_rejected() {
        let mut tables = builtin_tables();
        let mut dup = tables.prior_auth[0].clone();
        dup.intervention = dup.intervention.to_uppercase();
        dup.requirements.insert(PayerCategory::Commercial, "Shadow requirement".into());
        tables.prior_auth.push(dup);

        let err = KnowledgeBase::load(tables).unwrap_err();
        assert!(matches!(err, KnowledgeError::DuplicatePriorAuth(_)));
    }

    #[test]
    fn test_duplicate_requirement_rejected() {
        let mut tables = builtin_tables();
        let dup = tables.documentation_checklist[0].clone();
        tables.documentation_checklist.push(dup);

        let err = KnowledgeBase::load(tables).unwrap_err();
        assert!(matches!(err, KnowledgeError::DuplicateRequirement(ref id) if id == "vital_signs"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let mut tables = builtin_tables();
        tables.documentation_checklist[0].patterns.push("(unclosed".into());

        let err = KnowledgeBase::load(tables).unwrap_err();
        assert!(matches!(err, KnowledgeError::InvalidPattern { .. }));
    }

    #[test]
    fn test_json_roundtrip_and_file_load() {
        let kb = KnowledgeBase::builtin().unwrap();
        let json = kb.to_json().unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = KnowledgeBase::from_path(file.path()).unwrap();
        assert_eq!(loaded.tables(), kb.tables());
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = KnowledgeBase::from_json("{\"conditions\": [").unwrap_err();
        assert!(matches!(err, KnowledgeError::Json(_)));
    }

    #[test]
    fn test_missing_file_rejected() {
        let err = KnowledgeBase::from_path("/nonexistent/codesilver-kb.json").unwrap_err();
        assert!(matches!(err, KnowledgeError::Io(_)));
    }
}
