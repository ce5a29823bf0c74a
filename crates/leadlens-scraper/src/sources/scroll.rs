//! The shared fetch/extract/stop loop behind every connector.

use std::collections::{HashMap, HashSet};

use chrono::{Duration as ChronoDuration, Utc};

use leadlens_core::{domain_of, is_valid_lead_url, Candidate, RunConfig, SourceOutcome};

use crate::error::ScrapeError;
use crate::extract::extract_hrefs;
use crate::fetcher::PageFetcher;
use crate::redirect::normalize_outbound_url;
use crate::sources::SourceProfile;

/// Runs one connector's discovery for `query`.
///
/// Never fails: any error from the session (navigation timeout, fetch
/// failure) is caught here, logged, and reported through the outcome tag
/// while whatever candidates were accumulated so far are returned. One
/// broken source must not abort the run.
pub(crate) async fn discover(
    profile: &SourceProfile,
    query: &str,
    config: &RunConfig,
    fetcher: &dyn PageFetcher,
) -> (SourceOutcome, Vec<Candidate>) {
    match scroll_loop(profile, query, config, fetcher).await {
        Ok(candidates) => {
            tracing::info!(
                source = profile.name,
                count = candidates.len(),
                "source discovery complete"
            );
            (
                SourceOutcome {
                    source: profile.name.to_owned(),
                    candidate_count: candidates.len(),
                    error: None,
                },
                candidates,
            )
        }
        Err(e) => {
            tracing::warn!(
                source = profile.name,
                error = %e,
                "source discovery failed — continuing without it"
            );
            (
                SourceOutcome {
                    source: profile.name.to_owned(),
                    candidate_count: 0,
                    error: Some(e.to_string()),
                },
                Vec::new(),
            )
        }
    }
}

/// The loop itself: open a session, then per iteration read content, pull
/// and normalize outbound links, keep policy-passing new ones under the
/// per-domain cap, and evaluate the stop conditions — cap reached, empty
/// scroll streak, iteration budget spent, or stale content.
async fn scroll_loop(
    profile: &SourceProfile,
    query: &str,
    config: &RunConfig,
    fetcher: &dyn PageFetcher,
) -> Result<Vec<Candidate>, ScrapeError> {
    let search_url = profile.search_url(query);
    let mut session = fetcher.open_session(&search_url, config.nav_timeout).await?;

    let mut candidates: Vec<Candidate> = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut domain_counts: HashMap<String, usize> = HashMap::new();
    let mut empty_streak: u32 = 0;

    for iteration in 0..profile.max_scrolls {
        let content = session.content().await?;

        if is_stale(profile, config, &content) {
            tracing::debug!(
                source = profile.name,
                iteration,
                "content older than freshness cutoff — stopping"
            );
            break;
        }

        let mut new_links = 0usize;
        for href in extract_hrefs(&content) {
            if candidates.len() >= config.per_source_cap {
                break;
            }
            let resolved = normalize_outbound_url(&href);
            if !is_valid_lead_url(&resolved, &config.policy) {
                continue;
            }
            if seen_urls.contains(&resolved) {
                continue;
            }
            let Some(domain) = domain_of(&resolved) else {
                continue;
            };
            let domain_count = domain_counts.entry(domain).or_insert(0);
            if *domain_count >= config.policy.per_domain_cap {
                continue;
            }
            *domain_count += 1;

            seen_urls.insert(resolved.clone());
            candidates.push(Candidate {
                url: resolved,
                source: profile.name.to_owned(),
                query: query.to_owned(),
                discovered_at: Utc::now(),
                provenance: Some(search_url.clone()),
            });
            new_links += 1;
        }

        if candidates.len() >= config.per_source_cap {
            tracing::debug!(source = profile.name, iteration, "per-source cap reached");
            break;
        }

        if new_links == 0 {
            empty_streak += 1;
            if empty_streak >= config.scroll.empty_streak_limit {
                tracing::debug!(
                    source = profile.name,
                    iteration,
                    streak = empty_streak,
                    "empty-scroll streak limit reached"
                );
                break;
            }
        } else {
            empty_streak = 0;
        }

        if iteration + 1 < profile.max_scrolls {
            session.scroll().await?;
            tokio::time::sleep(config.scroll.settle).await;
        }
    }

    Ok(candidates)
}

/// Freshness stop condition: true when the profile can date its content, the
/// run enables the cutoff, and the newest visible publish date is older than
/// the cutoff.
fn is_stale(profile: &SourceProfile, config: &RunConfig, content: &str) -> bool {
    let Some(extract_date) = profile.publish_date else {
        return false;
    };
    let Some(max_age_days) = config.scroll.max_age_days else {
        return false;
    };
    let Some(newest) = extract_date(content) else {
        return false;
    };
    Utc::now() - newest > ChronoDuration::days(i64::from(max_age_days))
}
