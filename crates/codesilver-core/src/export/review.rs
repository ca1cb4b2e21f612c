//! Utilization-review export of analysis results.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::analyzer::Assessment;
use crate::models::AnalysisResult;
use crate::scoring::RiskBand;

/// Export format version.
pub const FORMAT_VERSION: &str = "1.0";

/// Review export for a single note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisExport {
    /// Export metadata
    pub metadata: ExportMetadata,
    /// Denial risk on the 0-10 scale
    pub risk_score: u8,
    pub risk_band: RiskBand,
    /// The full analysis
    pub analysis: AnalysisResult,
}

/// Review export metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Caller-supplied note identifier (file name, encounter id, ...)
    pub note_id: String,
    /// Export format version
    pub format_version: String,
    /// Export timestamp
    pub exported_at: String,
    /// Hash algorithm used for the fingerprint
    pub hash_algorithm: String,
    /// Hash of the analysis' compact JSON
    pub fingerprint: String,
}

impl AnalysisExport {
    /// Create an export from an assessed note.
    pub fn from_assessment(note_id: &str, assessment: Assessment) -> Result<Self, serde_json::Error> {
        let fingerprint = fingerprint(&assessment.analysis)?;

        Ok(Self {
            metadata: ExportMetadata {
                note_id: note_id.to_string(),
                format_version: FORMAT_VERSION.to_string(),
                exported_at: chrono::Utc::now().to_rfc3339(),
                hash_algorithm: "SHA-256".to_string(),
                fingerprint,
            },
            risk_score: assessment.risk_score,
            risk_band: assessment.risk_band,
            analysis: assessment.analysis,
        })
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Whether the fingerprint still matches the analysis.
    pub fn verify(&self) -> bool {
        fingerprint(&self.analysis)
            .map(|f| f == self.metadata.fingerprint)
            .unwrap_or(false)
    }
}

/// Counts across a batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchSummary {
    pub total_notes: usize,
    /// Notes with a knowledge-base condition
    pub identified: usize,
    pub high_risk: usize,
    pub prior_auth_flags: usize,
    pub documentation_gaps: usize,
}

/// Batch review export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchAnalysisExport {
    /// Unique export id
    pub export_id: String,
    /// Export timestamp
    pub exported_at: String,
    pub summary: BatchSummary,
    /// Individual note exports
    pub notes: Vec<AnalysisExport>,
}

impl BatchAnalysisExport {
    /// Build a batch export from per-note exports.
    pub fn new(notes: Vec<AnalysisExport>) -> Self {
        let summary = BatchSummary {
            total_notes: notes.len(),
            identified: notes
                .iter()
                .filter(|n| n.analysis.condition.is_identified())
                .count(),
            high_risk: notes
                .iter()
                .filter(|n| n.risk_band == RiskBand::High)
                .count(),
            prior_auth_flags: notes.iter().map(|n| n.analysis.prior_auth.len()).sum(),
            documentation_gaps: notes
                .iter()
                .map(|n| n.analysis.documentation_gaps.len())
                .sum(),
        };

        Self {
            export_id: uuid::Uuid::new_v4().to_string(),
            exported_at: chrono::Utc::now().to_rfc3339(),
            summary,
            notes,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV, one row per note.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("note_id,condition,icd10,drg,severity,quantified,status,expected_los_days,two_midnight_rule,interventions,prior_auth,gap_count,risk_score,fingerprint\n");

        for export in &self.notes {
            let a = &export.analysis;
            let prior_auth: Vec<&str> = a.prior_auth.iter().map(|p| p.intervention.as_str()).collect();

            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
                escape_csv(&export.metadata.note_id),
                escape_csv(&a.condition.name),
                a.condition.icd10.as_deref().unwrap_or(""),
                a.condition.drg.as_deref().unwrap_or(""),
                a.severity.level,
                a.severity.quantified,
                escape_csv(a.admission_status.current_status.as_str()),
                a.admission_status.expected_los_days,
                a.admission_status.two_midnight_rule,
                escape_csv(&a.interventions.join("; ")),
                escape_csv(&prior_auth.join("; ")),
                a.documentation_gaps.len(),
                export.risk_score,
                export.metadata.fingerprint,
            ));
        }

        csv
    }
}

/// SHA-256 of the analysis' compact JSON, hex encoded.
pub fn fingerprint(analysis: &AnalysisResult) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(analysis)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
