use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A URL discovered by a source connector, prior to enrichment.
///
/// Connectors only construct a `Candidate` for URLs that passed the run's
/// [`crate::ValidationPolicy`]; a candidate is never mutated afterwards —
/// enrichment produces a separate [`AnalysisResult`] attached via [`Lead`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Absolute http/https URL of the prospective lead's landing page.
    pub url: String,
    /// Name of the connector that produced this candidate (e.g. `meta_ads`).
    pub source: String,
    /// The search term that surfaced this URL.
    pub query: String,
    pub discovered_at: DateTime<Utc>,
    /// Optional locator back to the originating ad or post.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<String>,
}

/// Categorical tone of a landing page's copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Commercial,
    Formal,
    Casual,
    Neutral,
    /// Page was unreachable or had no analyzable text.
    Unknown,
}

/// Contact and quality signals extracted from a candidate's landing page.
///
/// `lead_score` is always derived from the other fields through
/// [`crate::score::lead_score`]; it is never set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Deduplicated emails found in page text, placeholder domains dropped. Max 5.
    pub emails: Vec<String>,
    /// Deduplicated phone numbers with at least 9 digits. Max 5.
    pub phones: Vec<String>,
    /// Contact/about page links, resolved to absolute and policy-filtered. Max 3.
    pub contact_links: Vec<String>,
    pub has_form: bool,
    /// JSON-LD structured data present on the page.
    pub has_structured_data: bool,
    pub has_call_to_action: bool,
    /// Additive copy heuristic, 0..=10.
    pub copy_quality: u8,
    /// Keyword sentiment on a 0..=10 scale (5 is neutral).
    pub sentiment: u8,
    pub tone: Tone,
    pub professionalism: u8,
    pub persuasiveness: u8,
    /// Final ranking key, 0..=10.
    pub lead_score: u8,
}

impl AnalysisResult {
    /// The substitute attached to a lead whose landing page could not be
    /// fetched. All-zero so such leads rank last (and are the ones removed
    /// by quality-filter mode).
    #[must_use]
    pub fn zeroed() -> Self {
        Self {
            emails: Vec::new(),
            phones: Vec::new(),
            contact_links: Vec::new(),
            has_form: false,
            has_structured_data: false,
            has_call_to_action: false,
            copy_quality: 0,
            sentiment: 0,
            tone: Tone::Unknown,
            professionalism: 0,
            persuasiveness: 0,
            lead_score: 0,
        }
    }
}

/// A candidate merged with its landing-page analysis — the pipeline's
/// externally visible unit. Immutable once placed in the ranked output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    #[serde(flatten)]
    pub candidate: Candidate,
    #[serde(flatten)]
    pub analysis: AnalysisResult,
}

/// Per-connector outcome tag, reported alongside the merged lead list so
/// callers can tell a quiet source from a broken one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceOutcome {
    pub source: String,
    /// Candidates the connector contributed before cross-source dedup.
    pub candidate_count: usize,
    /// Failure reason when the connector degraded to an empty/partial result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result handle for one discovery run.
///
/// Owned by the caller; export projections take a `&DiscoveryRun` rather
/// than reading ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryRun {
    pub id: Uuid,
    pub query: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Leads sorted descending by `lead_score`, discovery order preserved on ties.
    pub leads: Vec<Lead>,
    pub source_outcomes: Vec<SourceOutcome>,
}
