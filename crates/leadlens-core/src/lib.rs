//! Core types and pure logic for the leadlens discovery pipeline.
//!
//! Everything in this crate is side-effect free: the data model
//! ([`Candidate`], [`AnalysisResult`], [`Lead`], [`DiscoveryRun`]), the URL
//! validation policy, the lead scoring engine, and run configuration. The
//! I/O-bound pipeline lives in `leadlens-scraper`.

pub mod app_config;
pub mod config;
pub mod policy;
pub mod score;
pub mod types;

pub use app_config::{load_app_config, load_app_config_from_env, AppConfig, ConfigError, Environment};
pub use config::{RunConfig, ScrollConfig};
pub use policy::{domain_of, is_valid_lead_url, GeoFilter, ValidationPolicy};
pub use score::{lead_score, ScoringWeights};
pub use types::{AnalysisResult, Candidate, DiscoveryRun, Lead, SourceOutcome, Tone};
