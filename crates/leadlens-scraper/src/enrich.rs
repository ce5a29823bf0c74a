//! Landing-page enrichment: fetch one candidate URL and extract its signals.

use leadlens_core::{AnalysisResult, RunConfig};

use crate::extract::analyze_page;
use crate::fetcher::PageFetcher;

/// Fetches `url` with the enrichment timeout and runs signal extraction.
///
/// Returns `None` on timeout, network failure, or a non-2xx response — the
/// orchestrator substitutes [`AnalysisResult::zeroed`] so the lead stays in
/// the output instead of disappearing. Enrichment is a pure function of page
/// content, so results are independent of batch size and ordering.
pub async fn enrich_page(
    fetcher: &dyn PageFetcher,
    url: &str,
    config: &RunConfig,
) -> Option<AnalysisResult> {
    match fetcher.fetch(url, config.enrich_timeout).await {
        Ok(page) if page.is_success() => Some(analyze_page(
            &page.body,
            &page.final_url,
            &config.policy,
            &config.weights,
        )),
        Ok(page) => {
            tracing::debug!(url, status = page.status, "enrichment fetch returned non-2xx");
            None
        }
        Err(e) => {
            tracing::debug!(url, error = %e, "enrichment fetch failed");
            None
        }
    }
}
