//! CodeSilver Core Library
//!
//! Deterministic rule engine that turns free-text clinical notes into a
//! utilization-review profile and a claim denial-risk score.
//!
//! # Architecture
//!
//! ```text
//! Clinical note → Normalization → Condition Identification
//!                                          │
//!              ┌──────────────┬────────────┼──────────────┬───────────────┐
//!              ▼              ▼            ▼              ▼               ▼
//!          Severity      Admission    Interventions  Documentation     (DRG CC
//!         Assessment       Status      + Prior Auth       Gaps         selection)
//!              └──────────────┴────────────┼──────────────┴───────────────┘
//!                                          ▼
//!                                   AnalysisResult ──► Denial Risk Score
//! ```
//!
//! # Core Principle
//!
//! **Analysis never fails on note content.** A note without a known condition
//! produces an "Unspecified" profile; only a broken knowledge base is an error,
//! and that surfaces when it is loaded.
//!
//! # Modules
//!
//! - [`knowledge`]: Validated, read-only knowledge base
//! - [`models`]: Domain types (ConditionRecord, AnalysisResult, etc.)
//! - [`analyzer`]: Analysis pipeline and orchestrator
//! - [`scoring`]: Denial risk scoring
//! - [`export`]: JSON/CSV review export
//! - [`scenarios`]: Example notes

pub mod analyzer;
pub mod export;
pub mod knowledge;
pub mod models;
pub mod scenarios;
pub mod scoring;

// Re-export commonly used types
pub use analyzer::{Analyzer, Assessment};
pub use knowledge::{KnowledgeBase, KnowledgeError, KnowledgeResult};
pub use models::{
    AdmissionAssessment, AdmissionStatus, AnalysisResult, ConditionRecord, ConditionSummary,
    PayerCategory, PriorAuthRequirement, SeverityAssessment, SeverityLevel,
};
pub use scoring::{calculate_denial_risk, DenialRiskScorer, RiskBand, RiskWeights};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum CodeSilverError {
    #[error("Knowledge base error: {0}")]
    KnowledgeBaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<KnowledgeError> for CodeSilverError {
    fn from(e: KnowledgeError) -> Self {
        CodeSilverError::KnowledgeBaseError(e.to_string())
    }
}

impl From<serde_json::Error> for CodeSilverError {
    fn from(e: serde_json::Error) -> Self {
        CodeSilverError::SerializationError(e.to_string())
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Create an engine backed by the built-in knowledge base.
#[uniffi::export]
pub fn open_engine() -> Result<Arc<CodeSilverEngine>, CodeSilverError> {
    let kb = KnowledgeBase::builtin()?;
    Ok(Arc::new(CodeSilverEngine::new(kb)))
}

/// Create an engine from a knowledge-base JSON document.
#[uniffi::export]
pub fn open_engine_from_json(json: String) -> Result<Arc<CodeSilverEngine>, CodeSilverError> {
    let kb = KnowledgeBase::from_json(&json)?;
    Ok(Arc::new(CodeSilverEngine::new(kb)))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Analysis engine for FFI. Immutable, so no locking is needed.
#[derive(uniffi::Object)]
pub struct CodeSilverEngine {
    analyzer: Analyzer,
}

impl CodeSilverEngine {
    fn new(kb: KnowledgeBase) -> Self {
        Self {
            analyzer: Analyzer::new(Arc::new(kb)),
        }
    }
}

#[uniffi::export]
impl CodeSilverEngine {
    /// Analyze a clinical note.
    pub fn analyze(&self, text: String) -> FfiAnalysis {
        self.analyzer.assess(&text).into()
    }

    /// Analyze a clinical note and return the result as JSON.
    pub fn analyze_json(&self, text: String) -> Result<String, CodeSilverError> {
        Ok(self.analyzer.analyze(&text).to_json()?)
    }

    /// Denial risk (0-10) for a clinical note.
    pub fn denial_risk(&self, text: String) -> u8 {
        let analysis = self.analyzer.analyze(&text);
        self.analyzer.denial_risk(&analysis)
    }

    /// Export the active knowledge base as JSON.
    pub fn knowledge_base_json(&self) -> Result<String, CodeSilverError> {
        Ok(self.analyzer.knowledge_base().to_json()?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe analysis result with its risk score.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAnalysis {
    pub condition_name: String,
    pub icd10: Option<String>,
    pub drg: Option<String>,
    pub severity_level: String,
    pub quantified: bool,
    pub keywords_found: Vec<String>,
    pub current_status: String,
    pub expected_los_days: f64,
    pub two_midnight_rule: bool,
    pub interventions: Vec<String>,
    pub prior_auth: Vec<FfiPriorAuth>,
    pub documentation_gaps: Vec<String>,
    pub risk_score: u8,
    pub risk_band: String,
}

impl From<Assessment> for FfiAnalysis {
    fn from(assessment: Assessment) -> Self {
        let a = assessment.analysis;
        Self {
            condition_name: a.condition.name,
            icd10: a.condition.icd10,
            drg: a.condition.drg,
            severity_level: a.severity.level.to_string(),
            quantified: a.severity.quantified,
            keywords_found: a.severity.keywords_found,
            current_status: a.admission_status.current_status.to_string(),
            expected_los_days: a.admission_status.expected_los_days,
            two_midnight_rule: a.admission_status.two_midnight_rule,
            interventions: a.interventions,
            prior_auth: a.prior_auth.into_iter().map(|p| p.into()).collect(),
            documentation_gaps: a.documentation_gaps,
            risk_score: assessment.risk_score,
            risk_band: assessment.risk_band.as_str().to_string(),
        }
    }
}

/// FFI-safe prior-authorization requirement.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPriorAuth {
    pub intervention: String,
    pub commercial: Option<String>,
    pub medicare: Option<String>,
    pub medicaid: Option<String>,
}

impl From<PriorAuthRequirement> for FfiPriorAuth {
    fn from(mut auth: PriorAuthRequirement) -> Self {
        Self {
            commercial: auth.requirements.remove(&PayerCategory::Commercial),
            medicare: auth.requirements.remove(&PayerCategory::Medicare),
            medicaid: auth.requirements.remove(&PayerCategory::Medicaid),
            intervention: auth.intervention,
        }
    }
}
