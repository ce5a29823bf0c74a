//! Redirect/tracking-wrapper normalization.
//!
//! Ad libraries and social feeds wrap outbound links in click trackers that
//! carry the real destination in a `u=`, `url=`, or `href=` query parameter.
//! Normalization runs before validation so the policy judges the destination,
//! not the wrapper. Kept separate from the validation predicate on purpose —
//! different sources wrap differently, the policy does not care.

use url::Url;

/// Query parameter names that carry a wrapped destination URL.
const WRAPPER_PARAMS: &[&str] = &["u", "url", "href", "dest", "redirect_url"];

/// Wrappers can nest (a tracker pointing at another tracker); unwrap at most
/// this many layers before giving up and returning what we have.
const MAX_UNWRAP_DEPTH: usize = 3;

/// Resolves a possibly wrapped outbound link to its real destination.
///
/// Returns the innermost absolute http(s) URL found in a recognized wrapper
/// parameter, or the input unchanged when no wrapper is present or the input
/// does not parse. Percent-decoding of the parameter value is handled by the
/// URL parser.
#[must_use]
pub fn normalize_outbound_url(raw: &str) -> String {
    let mut current = raw.to_owned();
    for _ in 0..MAX_UNWRAP_DEPTH {
        match unwrap_once(&current) {
            Some(inner) => current = inner,
            None => break,
        }
    }
    current
}

fn unwrap_once(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    for (key, value) in url.query_pairs() {
        if WRAPPER_PARAMS.contains(&key.as_ref())
            && (value.starts_with("http://") || value.starts_with("https://"))
            && Url::parse(&value).is_ok()
        {
            return Some(value.into_owned());
        }
    }
    None
}
