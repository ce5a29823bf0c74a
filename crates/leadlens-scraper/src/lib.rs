//! Lead discovery pipeline for leadlens.
//!
//! Fans out over source connectors (ad library, search-feed style sources),
//! validates and deduplicates the discovered URLs, enriches each unique
//! landing page with contact/quality signals in bounded batches, and returns
//! a [`leadlens_core::DiscoveryRun`] ranked by lead score. Individual source
//! or page failures degrade to partial results; they never abort a run.

pub mod enrich;
pub mod error;
pub mod export;
pub mod extract;
pub mod fetcher;
pub mod pipeline;
pub mod redirect;
pub mod sources;

pub use error::ScrapeError;
pub use export::{to_csv, to_flat_records, to_json, LeadRecord};
pub use fetcher::{FetchedPage, HttpFetcher, PageFetcher, ScrollSession};
pub use pipeline::run_discovery;
pub use sources::{default_profiles, SourceProfile};
