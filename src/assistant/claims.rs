//! Claim-analysis prompt fan-out.
//!
//! Each aspect is an independent prompt with its own fallback sequence. The
//! aspects run concurrently and one aspect failing leaves the rest intact.
//! Nothing here scores or adjudicates a claim; the remote model's text is
//! returned as-is for a human reviewer.

use serde::{Deserialize, Serialize};

use crate::sealion::ClientError;

/// Facts about a claim that are shared with the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSummary {
    pub pet_name: String,
    pub species: String,
    pub treatment: String,
    pub amount: f64,
    pub currency: String,
    pub description: String,
}

impl ClaimSummary {
    /// Render the claim as a compact fact sheet for prompts.
    pub fn fact_sheet(&self) -> String {
        format!(
            "Pet: {} ({})\nTreatment: {}\nClaimed amount: {:.2} {}\nDescription: {}",
            self.pet_name, self.species, self.treatment, self.amount, self.currency, self.description
        )
    }
}

/// One angle of analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimAspect {
    Coverage,
    Documentation,
    CostReview,
    RiskIndicators,
    CustomerSummary,
}

impl ClaimAspect {
    pub const ALL: [ClaimAspect; 5] = [
        ClaimAspect::Coverage,
        ClaimAspect::Documentation,
        ClaimAspect::CostReview,
        ClaimAspect::RiskIndicators,
        ClaimAspect::CustomerSummary,
    ];

    /// The question asked for this aspect.
    pub fn instruction(self) -> &'static str {
        match self {
            ClaimAspect::Coverage => {
                "Assess whether this treatment is typically covered by an accident and illness pet \
                 insurance policy. Mention common exclusions that could apply."
            }
            ClaimAspect::Documentation => {
                "List the supporting documents a claims officer would expect for this claim and \
                 point out anything that appears to be missing from the description."
            }
            ClaimAspect::CostReview => {
                "Comment on whether the claimed amount looks reasonable for this treatment and \
                 species in Southeast Asia. Give a plausible range."
            }
            ClaimAspect::RiskIndicators => {
                "Identify any inconsistencies in the claim description that a human reviewer \
                 should double-check. Do not make a decision on the claim."
            }
            ClaimAspect::CustomerSummary => {
                "Write a short, friendly message to the pet owner summarising the next steps for \
                 this claim."
            }
        }
    }

    /// Full user prompt for this aspect.
    pub fn prompt(self, claim: &ClaimSummary) -> String {
        format!("{}\n\n{}", self.instruction(), claim.fact_sheet())
    }
}

/// Per-aspect outcomes of a claim analysis.
#[derive(Debug)]
pub struct ClaimAnalysis {
    pub results: Vec<(ClaimAspect, Result<String, ClientError>)>,
}

impl ClaimAnalysis {
    /// The reply for `aspect`, if it succeeded.
    pub fn get(&self, aspect: ClaimAspect) -> Option<&str> {
        self.results
            .iter()
            .find(|(a, _)| *a == aspect)
            .and_then(|(_, r)| r.as_ref().ok())
            .map(String::as_str)
    }

    pub fn failures(&self) -> impl Iterator<Item = (ClaimAspect, &ClientError)> {
        self.results
            .iter()
            .filter_map(|(a, r)| r.as_ref().err().map(|e| (*a, e)))
    }

    pub fn is_complete(&self) -> bool {
        self.results.iter().all(|(_, r)| r.is_ok())
    }
}
