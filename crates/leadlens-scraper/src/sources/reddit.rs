//! Reddit link-search connector profile.

use crate::sources::SourceProfile;

pub(crate) fn profile() -> SourceProfile {
    SourceProfile {
        name: "reddit",
        search_url_template: "https://www.reddit.com/search/?q={query}&type=link".to_owned(),
        max_scrolls: 5,
        // Search results are already recency-ordered; no date stop needed.
        publish_date: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_targets_link_results() {
        let url = profile().search_url("corsi yoga");
        assert_eq!(url, "https://www.reddit.com/search/?q=corsi%20yoga&type=link");
    }
}
