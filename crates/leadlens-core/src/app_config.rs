//! Environment-driven configuration for the leadlens binaries.
//!
//! The server and CLI load an [`AppConfig`] from `LEADLENS_*` env vars and
//! derive a [`RunConfig`] from it. The pipeline itself only ever sees the
//! derived value object.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::config::{RunConfig, ScrollConfig};
use crate::policy::GeoFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub per_source_cap: usize,
    pub overall_cap: Option<usize>,
    pub enrich_batch_size: usize,
    pub enrich_timeout_secs: u64,
    pub nav_timeout_secs: u64,
    pub settle_ms: u64,
    pub empty_streak_limit: u32,
    pub max_age_days: Option<u32>,
    pub quality_filter: bool,
    /// Comma-separated host suffixes enabling the geographic filter
    /// (e.g. `.it,.ch`); empty disables it.
    pub geo_suffixes: Vec<String>,
}

impl AppConfig {
    /// Derives the pipeline's run configuration from this app config.
    #[must_use]
    pub fn run_config(&self) -> RunConfig {
        let mut config = RunConfig {
            per_source_cap: self.per_source_cap,
            overall_cap: self.overall_cap,
            enrich_batch_size: self.enrich_batch_size.max(1),
            enrich_timeout: Duration::from_secs(self.enrich_timeout_secs),
            nav_timeout: Duration::from_secs(self.nav_timeout_secs),
            scroll: ScrollConfig {
                settle: Duration::from_millis(self.settle_ms),
                empty_streak_limit: self.empty_streak_limit,
                max_age_days: self.max_age_days,
            },
            quality_filter: self.quality_filter,
            ..RunConfig::default()
        };
        if !self.geo_suffixes.is_empty() {
            config.policy.geo = Some(GeoFilter {
                domain_suffixes: self.geo_suffixes.clone(),
                path_keywords: self
                    .geo_suffixes
                    .iter()
                    .map(|s| format!("/{}/", s.trim_start_matches('.')))
                    .collect(),
            });
        }
        config
    }
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any env var value is invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if any env var value is invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the parsing/validation logic decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_opt_usize = |var: &str| -> Result<Option<usize>, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .parse::<usize>()
                .map(Some)
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(None),
        }
    };

    let parse_opt_u32 = |var: &str| -> Result<Option<u32>, ConfigError> {
        match lookup(var) {
            Ok(raw) if raw.eq_ignore_ascii_case("off") => Ok(None),
            Ok(raw) => raw
                .parse::<u32>()
                .map(Some)
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(Some(30)),
        }
    };

    let parse_bool = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match lookup(var) {
            Ok(raw) => match raw.to_lowercase().as_str() {
                "1" | "true" | "yes" => Ok(true),
                "0" | "false" | "no" => Ok(false),
                other => Err(ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: format!("expected boolean, got \"{other}\""),
                }),
            },
            Err(_) => Ok(default),
        }
    };

    let env = parse_environment(&or_default("LEADLENS_ENV", "development"))?;
    let bind_addr = parse_addr("LEADLENS_BIND_ADDR", "0.0.0.0:5000")?;
    let log_level = or_default("LEADLENS_LOG_LEVEL", "info");

    let per_source_cap = parse_usize("LEADLENS_PER_SOURCE_CAP", "200")?;
    let overall_cap = parse_opt_usize("LEADLENS_OVERALL_CAP")?;
    let enrich_batch_size = parse_usize("LEADLENS_ENRICH_BATCH_SIZE", "10")?;
    let enrich_timeout_secs = parse_u64("LEADLENS_ENRICH_TIMEOUT_SECS", "15")?;
    let nav_timeout_secs = parse_u64("LEADLENS_NAV_TIMEOUT_SECS", "30")?;
    let settle_ms = parse_u64("LEADLENS_SETTLE_MS", "1000")?;
    let empty_streak_limit = parse_u32("LEADLENS_EMPTY_STREAK_LIMIT", "3")?;
    let max_age_days = parse_opt_u32("LEADLENS_MAX_AGE_DAYS")?;
    let quality_filter = parse_bool("LEADLENS_QUALITY_FILTER", false)?;

    let geo_suffixes: Vec<String> = or_default("LEADLENS_GEO_SUFFIXES", "")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect();

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        per_source_cap,
        overall_cap,
        enrich_batch_size,
        enrich_timeout_secs,
        nav_timeout_secs,
        settle_ms,
        empty_streak_limit,
        max_age_days,
        quality_filter,
        geo_suffixes,
    })
}

fn parse_environment(raw: &str) -> Result<Environment, ConfigError> {
    match raw {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LEADLENS_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
