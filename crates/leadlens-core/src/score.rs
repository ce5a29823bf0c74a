//! Lead scoring engine.
//!
//! A deterministic weighted sum over the extracted page signals, clamped to
//! `0..=10`. Weights are configuration, not constants, so scoring policy can
//! evolve without touching extraction.

use serde::{Deserialize, Serialize};

use crate::types::AnalysisResult;

/// Named weight set for [`lead_score`].
///
/// Each weight is added once when its signal is present. The defaults sum to
/// 10 for a page carrying every contact signal, with the copy-quality bonus
/// pushing borderline pages over ties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Added when at least one email was extracted.
    pub email: u8,
    /// Added when at least one phone number was extracted.
    pub phone: u8,
    /// Added when at least one contact/about link was found.
    pub contact_link: u8,
    /// Added when the page contains a form.
    pub form: u8,
    /// Added when the page has a call-to-action element.
    pub call_to_action: u8,
    /// Added when `copy_quality >= copy_quality_floor`.
    pub quality_copy: u8,
    pub copy_quality_floor: u8,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            email: 3,
            phone: 3,
            contact_link: 2,
            form: 1,
            call_to_action: 1,
            quality_copy: 1,
            copy_quality_floor: 5,
        }
    }
}

/// Scores an analysis result under `weights`, clamped to `0..=10`.
///
/// Monotone: enabling any positively weighted signal never lowers the score.
/// Ignores the `lead_score` already stored on `analysis`.
#[must_use]
pub fn lead_score(analysis: &AnalysisResult, weights: &ScoringWeights) -> u8 {
    let mut score: u32 = 0;
    if !analysis.emails.is_empty() {
        score += u32::from(weights.email);
    }
    if !analysis.phones.is_empty() {
        score += u32::from(weights.phone);
    }
    if !analysis.contact_links.is_empty() {
        score += u32::from(weights.contact_link);
    }
    if analysis.has_form {
        score += u32::from(weights.form);
    }
    if analysis.has_call_to_action {
        score += u32::from(weights.call_to_action);
    }
    if analysis.copy_quality >= weights.copy_quality_floor {
        score += u32::from(weights.quality_copy);
    }
    u8::try_from(score.min(10)).unwrap_or(10)
}
