//! LinkedIn content-search connector profile.
//!
//! LinkedIn throttles anonymous sessions aggressively, so this profile keeps
//! the smallest scroll budget of the default set and relies on the connector
//! boundary to degrade cleanly when access is restricted.

use crate::sources::SourceProfile;

pub(crate) fn profile() -> SourceProfile {
    SourceProfile {
        name: "linkedin",
        search_url_template: "https://www.linkedin.com/search/results/content/?keywords={query}"
            .to_owned(),
        max_scrolls: 3,
        publish_date: None,
    }
}
