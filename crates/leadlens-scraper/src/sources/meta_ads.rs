//! Meta ads library connector profile.
//!
//! The ads library surfaces long-dead creatives, so this is the one default
//! profile with the freshness stop condition enabled: it parses the
//! "Started running on <date>" strings the library renders next to each ad.

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;

use crate::sources::SourceProfile;

pub(crate) fn profile() -> SourceProfile {
    SourceProfile {
        name: "meta_ads",
        search_url_template:
            "https://www.facebook.com/ads/library/?active_status=all&ad_type=all&country=ALL&q={query}&search_type=keyword_unordered"
                .to_owned(),
        max_scrolls: 5,
        publish_date: Some(newest_start_date),
    }
}

/// Newest "Started running on Mon D, YYYY" date in the rendered library
/// page, or `None` when no ad card carries one.
fn newest_start_date(content: &str) -> Option<DateTime<Utc>> {
    let re = Regex::new(r"Started running on ([A-Z][a-z]{2} \d{1,2}, \d{4})")
        .expect("valid ad start-date regex");

    re.captures_iter(content)
        .filter_map(|cap| cap.get(1))
        .filter_map(|m| NaiveDate::parse_from_str(m.as_str(), "%b %d, %Y").ok())
        .max()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
