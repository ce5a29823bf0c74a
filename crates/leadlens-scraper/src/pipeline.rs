//! Discovery orchestration: one query in, one ranked lead list out.

use std::collections::HashSet;

use chrono::Utc;
use futures::future::join_all;
use uuid::Uuid;

use leadlens_core::{AnalysisResult, Candidate, DiscoveryRun, Lead, RunConfig, SourceOutcome};

use crate::enrich::enrich_page;
use crate::error::ScrapeError;
use crate::fetcher::PageFetcher;
use crate::sources::{discover, SourceProfile};

/// Runs the full discovery pipeline for `query`.
///
/// 1. All connectors run concurrently with per-source caps; each is joined
///    regardless of individual failure.
/// 2. Outputs merge in connector order; exact-URL duplicates keep the first
///    occurrence, so the earliest connector's provenance wins.
/// 3. The unique set (optionally truncated to the overall cap) is enriched
///    in fixed-size batches to bound concurrent outbound connections.
/// 4. Failed enrichments attach a zeroed analysis instead of dropping the
///    lead, unless quality-filter mode excludes zero-score leads.
/// 5. Leads are stable-sorted descending by score, so ties keep their
///    first-discovered order.
///
/// # Errors
///
/// Returns [`ScrapeError::EmptyQuery`] for a blank query — the only error
/// this function surfaces. Source and enrichment failures are folded into
/// the run's `source_outcomes` and zeroed analyses; a run where every source
/// failed is an empty, well-formed `DiscoveryRun`, not an error.
pub async fn run_discovery(
    query: &str,
    config: &RunConfig,
    profiles: &[SourceProfile],
    fetcher: &dyn PageFetcher,
) -> Result<DiscoveryRun, ScrapeError> {
    if query.trim().is_empty() {
        return Err(ScrapeError::EmptyQuery);
    }
    let started_at = Utc::now();

    if profiles.is_empty() {
        tracing::warn!("no source connectors configured — returning an empty run");
        return Ok(DiscoveryRun {
            id: Uuid::new_v4(),
            query: query.to_owned(),
            started_at,
            finished_at: Utc::now(),
            leads: Vec::new(),
            source_outcomes: Vec::new(),
        });
    }

    tracing::info!(query, sources = profiles.len(), "starting discovery run");

    let results = join_all(
        profiles
            .iter()
            .map(|profile| discover(profile, query, config, fetcher)),
    )
    .await;

    let mut source_outcomes: Vec<SourceOutcome> = Vec::with_capacity(results.len());
    let mut merged: Vec<Candidate> = Vec::new();
    for (outcome, candidates) in results {
        source_outcomes.push(outcome);
        merged.extend(candidates);
    }

    // First occurrence wins: the earliest-arriving connector keeps the lead.
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique: Vec<Candidate> = Vec::new();
    for candidate in merged {
        if seen.insert(candidate.url.clone()) {
            unique.push(candidate);
        }
    }

    if let Some(cap) = config.overall_cap {
        unique.truncate(cap);
    }

    tracing::info!(
        query,
        unique = unique.len(),
        batch_size = config.enrich_batch_size,
        "enriching candidate landing pages"
    );

    let mut leads: Vec<Lead> = Vec::with_capacity(unique.len());
    for batch in unique.chunks(config.enrich_batch_size.max(1)) {
        let analyses = join_all(
            batch
                .iter()
                .map(|candidate| enrich_page(fetcher, &candidate.url, config)),
        )
        .await;

        for (candidate, analysis) in batch.iter().cloned().zip(analyses) {
            let analysis = analysis.unwrap_or_else(AnalysisResult::zeroed);
            if config.quality_filter && analysis.lead_score == 0 {
                tracing::debug!(url = %candidate.url, "quality filter dropped zero-score lead");
                continue;
            }
            leads.push(Lead {
                candidate,
                analysis,
            });
        }
    }

    // Stable sort: equal scores keep discovery order.
    leads.sort_by(|a, b| b.analysis.lead_score.cmp(&a.analysis.lead_score));

    let run = DiscoveryRun {
        id: Uuid::new_v4(),
        query: query.to_owned(),
        started_at,
        finished_at: Utc::now(),
        leads,
        source_outcomes,
    };

    tracing::info!(
        query,
        leads = run.leads.len(),
        run_id = %run.id,
        "discovery run complete"
    );

    Ok(run)
}
