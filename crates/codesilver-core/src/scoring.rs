//! Denial risk scoring.
//!
//! Default weights:
//! - Severity: Severe 0, Moderate 1, Low 2, Unspecified 3
//! - No quantified measurements: +2
//! - Documentation gaps: +1 each, at most +3
//! - 2-midnight rule not met: +2
//!
//! The total is capped at [`MAX_RISK_SCORE`]. These weights are fixed
//! heuristics, not clinical findings.

use serde::{Deserialize, Serialize};

use crate::models::{AnalysisResult, SeverityLevel};

/// Upper bound of the risk scale.
pub const MAX_RISK_SCORE: u8 = 10;

/// Weights for the denial risk score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RiskWeights {
    pub severe: u8,
    pub moderate: u8,
    pub low: u8,
    pub unspecified: u8,
    /// Added when no quantified measurements are documented
    pub unquantified: u8,
    /// Added per documentation gap
    pub per_gap: u8,
    /// Cap on the total gap contribution
    pub gap_cap: u8,
    /// Added when the 2-midnight rule is not met
    pub two_midnight_miss: u8,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            severe: 0,
            moderate: 1,
            low: 2,
            unspecified: 3,
            unquantified: 2,
            per_gap: 1,
            gap_cap: 3,
            two_midnight_miss: 2,
        }
    }
}

impl RiskWeights {
    fn severity_points(&self, level: SeverityLevel) -> u32 {
        let points = match level {
            SeverityLevel::Severe => self.severe,
            SeverityLevel::Moderate => self.moderate,
            SeverityLevel::Low => self.low,
            SeverityLevel::Unspecified => self.unspecified,
        };
        u32::from(points)
    }
}

/// Coarse banding of a risk score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskBand {
    /// 0-3
    Low,
    /// 4-6
    Moderate,
    /// 7-10
    High,
}

impl RiskBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=3 => RiskBand::Low,
            4..=6 => RiskBand::Moderate,
            _ => RiskBand::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBand::Low => "Low",
            RiskBand::Moderate => "Moderate",
            RiskBand::High => "High",
        }
    }
}

/// Scores the likelihood of a claim denial from an analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DenialRiskScorer {
    weights: RiskWeights,
}

impl DenialRiskScorer {
    pub fn new(weights: RiskWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &RiskWeights {
        &self.weights
    }

    /// Score an analysis on the 0-10 scale.
    pub fn score(&self, analysis: &AnalysisResult) -> u8 {
        let w = &self.weights;

        let mut total = w.severity_points(analysis.severity.level);

        if !analysis.severity.quantified {
            total += u32::from(w.unquantified);
        }

        let gaps = u32::try_from(analysis.documentation_gaps.len()).unwrap_or(u32::MAX);
        total += gaps
            .saturating_mul(u32::from(w.per_gap))
            .min(u32::from(w.gap_cap));

        if !analysis.admission_status.two_midnight_rule {
            total += u32::from(w.two_midnight_miss);
        }

        total.min(u32::from(MAX_RISK_SCORE)) as u8
    }
}

/// Score an analysis with the default weights.
pub fn calculate_denial_risk(analysis: &AnalysisResult) -> u8 {
    DenialRiskScorer::default().score(analysis)
}
