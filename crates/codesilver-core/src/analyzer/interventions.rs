//! Intervention detection and prior-authorization lookup.

use crate::knowledge::KnowledgeBase;
use crate::models::PriorAuthRequirement;

use super::normalizer::NormalizedText;

/// Detects interventions and resolves their payer requirements.
pub struct InterventionDetector<'a> {
    kb: &'a KnowledgeBase,
}

impl<'a> InterventionDetector<'a> {
    pub fn new(kb: &'a KnowledgeBase) -> Self {
        Self { kb }
    }

    /// Interventions mentioned in the note, once each, in knowledge-base order.
    pub fn detect(&self, text: &NormalizedText) -> Vec<String> {
        self.kb
            .interventions()
            .iter()
            .filter(|i| text.contains_any(i.phrases.as_slice()))
            .map(|i| i.name.clone())
            .collect()
    }

    /// Prior-authorization requirements for detected interventions.
    ///
    /// Interventions without an entry are skipped.
    pub fn resolve_prior_auth(&self, interventions: &[String]) -> Vec<PriorAuthRequirement> {
        interventions
            .iter()
            .filter_map(|name| self.kb.prior_auth(name))
            .map(|entry| PriorAuthRequirement {
                intervention: entry.intervention.clone(),
                requirements: entry.requirements.clone(),
            })
            .collect()
    }
}
