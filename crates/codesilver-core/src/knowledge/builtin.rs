//! Built-in knowledge-base tables.
//!
//! All phrases are lower-case; notes are lower-cased before matching.

use std::collections::BTreeMap;

use crate::models::{
    AdmissionRule, AdmissionStatus, ConditionRecord, DocumentationRequirement,
    InterventionDefinition, KnowledgeTables, PayerCategory, PriorAuthEntry, StatusCue,
    TWO_MIDNIGHT_THRESHOLD_DAYS,
};

/// Build the default tables.
pub fn builtin_tables() -> KnowledgeTables {
    KnowledgeTables {
        conditions: default_conditions(),
        admission_rules: default_admission_rules(),
        status_cues: default_status_cues(),
        interventions: default_interventions(),
        prior_auth: default_prior_auth(),
        documentation_checklist: default_checklist(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Conditions in match-precedence order. The first name found in a note wins.
fn default_conditions() -> Vec<ConditionRecord> {
    vec![
        ConditionRecord {
            name: "COPD".into(),
            icd10: "J44.1".into(),
            drg_with_cc: "190".into(),
            drg_without_cc: "192".into(),
            avg_los_days: 2.3,
            severity_keywords: strings(&["severe", "acute", "respiratory failure", "hypoxemia"]),
            high_severity_keywords: strings(&["severe", "respiratory failure"]),
        },
        ConditionRecord {
            name: "CHF".into(),
            icd10: "I50.9".into(),
            drg_with_cc: "291".into(),
            drg_without_cc: "293".into(),
            avg_los_days: 3.8,
            severity_keywords: strings(&["acute", "decompensated", "pulmonary edema", "cardiogenic shock"]),
            high_severity_keywords: strings(&["cardiogenic shock"]),
        },
        ConditionRecord {
            name: "Pneumonia".into(),
            icd10: "J18.9".into(),
            drg_with_cc: "193".into(),
            drg_without_cc: "195".into(),
            avg_los_days: 4.2,
            severity_keywords: strings(&["severe", "respiratory failure", "sepsis", "hypoxemic"]),
            high_severity_keywords: strings(&["severe", "respiratory failure", "sepsis"]),
        },
    ]
}

fn default_admission_rules() -> Vec<AdmissionRule> {
    vec![
        AdmissionRule {
            condition: "COPD".into(),
            inpatient_criteria: strings(&[
                "Failure of outpatient or ED bronchodilator therapy",
                "SpO2 below 88% or new/increased oxygen requirement",
                "Respiratory rate above 24 or accessory muscle use",
                "Acute respiratory acidosis or need for non-invasive ventilation",
            ]),
            los_threshold_days: TWO_MIDNIGHT_THRESHOLD_DAYS,
        },
        AdmissionRule {
            condition: "CHF".into(),
            inpatient_criteria: strings(&[
                "IV diuretic therapy requiring monitoring",
                "New or worsening pulmonary edema or hypoxemia",
                "Telemetry for arrhythmia or hemodynamic instability",
                "Worsening renal function or electrolyte derangement",
            ]),
            los_threshold_days: TWO_MIDNIGHT_THRESHOLD_DAYS,
        },
        AdmissionRule {
            condition: "Pneumonia".into(),
            inpatient_criteria: strings(&[
                "CURB-65 score of 2 or more, or PSI class IV-V",
                "SpO2 below 90% on room air",
                "Need for IV antibiotics",
                "Sepsis, hypotension or altered mental status",
            ]),
            los_threshold_days: TWO_MIDNIGHT_THRESHOLD_DAYS,
        },
    ]
}

/// Explicit admission language outranks observation language. Hedged
/// phrasing ("may need to admit") is excluded before matching.
fn default_status_cues() -> Vec<StatusCue> {
    vec![
        StatusCue {
            status: AdmissionStatus::Admitted,
            phrases: strings(&["admitted"]),
            exclusions: strings(&["not admitted", "not be admitted", "readmitted"]),
        },
        StatusCue {
            status: AdmissionStatus::InpatientRecommended,
            phrases: strings(&[
                "admission",
                "admit ",
                "admit.",
                "admit,",
                "admitting",
                "inpatient level of care",
            ]),
            exclusions: strings(&[
                "may need to admit",
                "might need to admit",
                "may admit",
                "might admit",
                "consider admission",
                "considering admission",
                "readmission",
                "admission criteria",
            ]),
        },
        StatusCue {
            status: AdmissionStatus::Observation,
            phrases: strings(&["observe", "observation", "obs status"]),
            exclusions: strings(&["observed"]),
        },
    ]
}

fn default_interventions() -> Vec<InterventionDefinition> {
    vec![
        InterventionDefinition {
            name: "Nebulizer treatment".into(),
            phrases: strings(&["nebulizer", "neb treatment", "albuterol", "duoneb"]),
        },
        InterventionDefinition {
            name: "Systemic corticosteroids".into(),
            phrases: strings(&["prednisone", "methylprednisolone", "solu-medrol", "iv steroids"]),
        },
        InterventionDefinition {
            name: "IV diuretic".into(),
            phrases: strings(&["iv lasix", "iv furosemide", "iv bumex", "iv diuretic"]),
        },
        InterventionDefinition {
            name: "IV antibiotic".into(),
            phrases: strings(&[
                "iv antibiotic",
                "iv ceftriaxone",
                "iv azithromycin",
                "iv vancomycin",
                "iv zosyn",
            ]),
        },
        InterventionDefinition {
            name: "Telemetry monitoring".into(),
            phrases: strings(&["telemetry"]),
        },
        InterventionDefinition {
            name: "Supplemental oxygen".into(),
            phrases: strings(&["l o2", "nasal cannula", "supplemental oxygen", "on oxygen"]),
        },
        InterventionDefinition {
            name: "BiPAP/non-invasive ventilation".into(),
            phrases: strings(&["bipap", "cpap", "non-invasive ventilation"]),
        },
    ]
}

fn requirements(entries: &[(PayerCategory, &str)]) -> BTreeMap<PayerCategory, String> {
    entries
        .iter()
        .map(|(payer, text)| (*payer, text.to_string()))
        .collect()
}

fn default_prior_auth() -> Vec<PriorAuthEntry> {
    vec![
        PriorAuthEntry {
            intervention: "IV antibiotic".into(),
            requirements: requirements(&[
                (
                    PayerCategory::Commercial,
                    "Notify payer within 24 hours of admission; document culture results and failed oral therapy",
                ),
                (
                    PayerCategory::Medicare,
                    "No prior authorization; medical necessity must be documented in the record",
                ),
                (
                    PayerCategory::Medicaid,
                    "Prior authorization required for restricted agents (vancomycin, carbapenems)",
                ),
            ]),
        },
        PriorAuthEntry {
            intervention: "Telemetry monitoring".into(),
            requirements: requirements(&[
                (
                    PayerCategory::Commercial,
                    "Concurrent review requires a documented cardiac indication for telemetry",
                ),
                (
                    PayerCategory::Medicare,
                    "Covered within the inpatient stay; indication must be re-documented every 24 hours",
                ),
            ]),
        },
        PriorAuthEntry {
            intervention: "BiPAP/non-invasive ventilation".into(),
            requirements: requirements(&[
                (
                    PayerCategory::Commercial,
                    "Prior authorization required beyond 48 hours; document ABG or CO2 retention",
                ),
                (
                    PayerCategory::Medicare,
                    "Document hypercapnia or failed standard oxygen therapy",
                ),
                (
                    PayerCategory::Medicaid,
                    "Prior authorization required for continued use after discharge",
                ),
            ]),
        },
    ]
}

fn default_checklist() -> Vec<DocumentationRequirement> {
    vec![
        DocumentationRequirement {
            id: "vital_signs".into(),
            gap_description: "Quantified vital signs not documented (O2 saturation, respiratory rate, heart rate, blood pressure)".into(),
            phrases: strings(&["o2 sat", "spo2", "respiratory rate", "heart rate", "blood pressure"]),
            patterns: strings(&[r"\d+\s*%", r"\b(?:rr|hr|bp)\s*:?\s*\d+"]),
        },
        DocumentationRequirement {
            id: "treatment_response".into(),
            gap_description: "Response to initial treatment not documented (failed outpatient or ED therapy)".into(),
            phrases: strings(&[
                "not responding",
                "responding to",
                "response to",
                "no improvement",
                "improved",
                "failed",
                "refractory",
                "despite",
            ]),
            patterns: Vec::new(),
        },
        DocumentationRequirement {
            id: "disposition_plan".into(),
            gap_description: "Admission or discharge plan with expected length of stay not documented".into(),
            phrases: strings(&["expected stay", "length of stay", "discharge", "anticipate"]),
            patterns: strings(&[r"\b\d+(?:\s*-\s*\d+)?\s*(?:days?|nights?|hours?|hrs?)\b"]),
        },
        DocumentationRequirement {
            id: "comorbidities".into(),
            gap_description: "Comorbidities affecting severity (CC/MCC) not documented".into(),
            phrases: strings(&[
                "history of",
                "comorbid",
                "ckd",
                "chronic kidney disease",
                "diabetes",
                "hypertension",
                "atrial fibrillation",
            ]),
            patterns: strings(&[r"\bh/o\b", r"\bpmh\b"]),
        },
    ]
}
