//! Source connectors.
//!
//! Each external source contributes a [`SourceProfile`]: its search-URL
//! template, scroll budget, and (optionally) a publish-date extractor for the
//! freshness stop condition. The fetch/extract/stop loop itself is shared —
//! see [`scroll`]. Connectors never let an error escape the pipeline; failures
//! degrade to an empty outcome with the reason tagged on the result.

mod linkedin;
mod meta_ads;
mod reddit;
mod scroll;

pub(crate) use scroll::discover;

use chrono::{DateTime, Utc};

/// Static description of one source. Everything that differs between sources
/// lives here; the loop skeleton and validation call are shared.
#[derive(Clone)]
pub struct SourceProfile {
    pub name: &'static str,
    /// Query URL template with a `{query}` placeholder.
    pub search_url_template: String,
    /// Upper bound on scroll iterations for one discovery.
    pub max_scrolls: u32,
    /// Extracts the newest publish date visible in rendered content, for
    /// sources where stale content should stop the scroll. `None` disables
    /// the freshness stop condition for this source.
    pub publish_date: Option<fn(&str) -> Option<DateTime<Utc>>>,
}

impl std::fmt::Debug for SourceProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceProfile")
            .field("name", &self.name)
            .field("search_url_template", &self.search_url_template)
            .field("max_scrolls", &self.max_scrolls)
            .field("freshness", &self.publish_date.is_some())
            .finish()
    }
}

impl SourceProfile {
    /// Expands the template for a search term, percent-encoding the query.
    #[must_use]
    pub fn search_url(&self, query: &str) -> String {
        self.search_url_template
            .replace("{query}", &encode_query(query))
    }
}

/// The default connector set: meta ads library, reddit link search, linkedin
/// content search.
#[must_use]
pub fn default_profiles() -> Vec<SourceProfile> {
    vec![meta_ads::profile(), reddit::profile(), linkedin::profile()]
}

pub(crate) fn encode_query(query: &str) -> String {
    use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
    utf8_percent_encode(query, NON_ALPHANUMERIC).to_string()
}
