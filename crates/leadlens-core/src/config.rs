//! Run-scoped pipeline configuration.
//!
//! Every knob the orchestrator, connectors, and enricher consult lives here
//! as one versioned value object passed into the run — the core never reads
//! the environment or any global. Defaults reproduce the reference behavior.

use std::time::Duration;

use crate::policy::ValidationPolicy;
use crate::score::ScoringWeights;

/// Browser User-Agent strings rotated across outbound requests.
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
];

/// Shared scroll-loop settings; per-source iteration budgets live on the
/// source profile.
#[derive(Debug, Clone)]
pub struct ScrollConfig {
    /// Fixed settle interval between scroll iterations.
    pub settle: Duration,
    /// Consecutive iterations with zero new unique links before stopping.
    pub empty_streak_limit: u32,
    /// Freshness cutoff in days for profiles that parse publish dates.
    /// `None` disables the date stop condition even where a profile
    /// supports it.
    pub max_age_days: Option<u32>,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(1000),
            empty_streak_limit: 3,
            max_age_days: Some(30),
        }
    }
}

/// Configuration for one discovery run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Maximum candidates each connector may return.
    pub per_source_cap: usize,
    /// Optional cap on the merged unique-candidate set before enrichment.
    pub overall_cap: Option<usize>,
    /// Concurrent enrichment fetches per batch.
    pub enrich_batch_size: usize,
    /// Timeout for one enrichment fetch. Kept shorter than `nav_timeout`
    /// because enrichment runs at much larger fan-out.
    pub enrich_timeout: Duration,
    /// Timeout for opening a connector's content session.
    pub nav_timeout: Duration,
    pub scroll: ScrollConfig,
    /// When set, leads with `lead_score == 0` are dropped from the output
    /// instead of being kept with zeroed signals.
    pub quality_filter: bool,
    pub policy: ValidationPolicy,
    pub weights: ScoringWeights,
    pub user_agents: Vec<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            per_source_cap: 200,
            overall_cap: None,
            enrich_batch_size: 10,
            enrich_timeout: Duration::from_secs(15),
            nav_timeout: Duration::from_secs(30),
            scroll: ScrollConfig::default(),
            quality_filter: false,
            policy: ValidationPolicy::default(),
            weights: ScoringWeights::default(),
            user_agents: DEFAULT_USER_AGENTS.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}
