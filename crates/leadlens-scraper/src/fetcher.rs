//! The page-fetch capability consumed by the pipeline.
//!
//! Connectors and the enricher only require "fetch content for a URL, with a
//! timeout and a User-Agent, optionally with browser rendering". That
//! capability is modeled as the [`PageFetcher`] / [`ScrollSession`] traits so
//! a browser-automation collaborator can be plugged in without touching the
//! pipeline; the in-tree default is a plain reqwest client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::ScrapeError;

/// A fetched page body plus enough response metadata for callers to decide
/// what to do with it.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
    /// URL after redirects; relative links on the page resolve against this.
    pub final_url: String,
}

impl FetchedPage {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// An open content session against an infinite-scroll style source.
///
/// `content` returns the currently rendered document; `scroll` requests the
/// next content increment. A plain-HTTP session renders once and scrolls as
/// a no-op, which the loop's empty-scroll streak turns into a clean stop.
/// Teardown happens on drop.
#[async_trait]
pub trait ScrollSession: Send {
    async fn content(&mut self) -> Result<String, ScrapeError>;
    async fn scroll(&mut self) -> Result<(), ScrapeError>;
}

/// Fetches page content for the pipeline.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// One-shot fetch with a bounded timeout. Non-2xx responses are returned
    /// as pages, not errors — the enricher downgrades them itself.
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, ScrapeError>;

    /// Opens a content session against a source's query URL.
    ///
    /// # Errors
    ///
    /// Fails on navigation timeout or a non-2xx landing response; connectors
    /// catch this and degrade to an empty result.
    async fn open_session(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<Box<dyn ScrollSession>, ScrapeError>;
}

/// Plain-HTTP implementation of [`PageFetcher`] with User-Agent rotation.
pub struct HttpFetcher {
    client: Client,
    user_agents: Vec<String>,
}

impl HttpFetcher {
    /// Creates an `HttpFetcher`. Timeouts are applied per request, not on the
    /// client, because connector navigation and enrichment use different
    /// budgets.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(user_agents: Vec<String>) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, user_agents })
    }

    fn random_user_agent(&self) -> &str {
        if self.user_agents.is_empty() {
            return "leadlens/0.1";
        }
        let idx = rand::random_range(0..self.user_agents.len());
        &self.user_agents[idx]
    }

    async fn get(&self, url: &str, timeout: Duration) -> Result<FetchedPage, ScrapeError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .header(reqwest::header::USER_AGENT, self.random_user_agent())
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9,it;q=0.8")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ScrapeError::Timeout {
                        url: url.to_owned(),
                        timeout_secs: timeout.as_secs(),
                    }
                } else {
                    ScrapeError::Http(e)
                }
            })?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response.text().await?;

        Ok(FetchedPage {
            status,
            body,
            final_url,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, ScrapeError> {
        self.get(url, timeout).await
    }

    async fn open_session(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<Box<dyn ScrollSession>, ScrapeError> {
        let page = self.get(url, timeout).await?;
        if !page.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                status: page.status,
                url: url.to_owned(),
            });
        }
        Ok(Box::new(StaticSession { body: page.body }))
    }
}

/// Session over a single static render. Scrolling yields no new content, so
/// the connector's empty-scroll streak terminates the loop.
struct StaticSession {
    body: String,
}

#[async_trait]
impl ScrollSession for StaticSession {
    async fn content(&mut self) -> Result<String, ScrapeError> {
        Ok(self.body.clone())
    }

    async fn scroll(&mut self) -> Result<(), ScrapeError> {
        Ok(())
    }
}
