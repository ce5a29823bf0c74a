//! URL validation policy: the rule set deciding whether a discovered URL is
//! an acceptable lead target.
//!
//! The predicate is pure and total — malformed URLs fail closed. One policy
//! instance is shared per run by every connector and by the enricher's
//! contact-link filter.

use url::Url;

/// Optional geographic inclusion predicate.
///
/// This is an approximation by domain suffix and path keyword only; there is
/// no IP- or content-based locale detection.
#[derive(Debug, Clone)]
pub struct GeoFilter {
    /// Host suffixes that pass, e.g. `.it`, `.ch`.
    pub domain_suffixes: Vec<String>,
    /// Path segments that pass regardless of suffix, e.g. `/it/`, `/it-it/`.
    pub path_keywords: Vec<String>,
}

impl GeoFilter {
    fn allows(&self, host: &str, path: &str) -> bool {
        self.domain_suffixes.iter().any(|s| host.ends_with(s.as_str()))
            || self.path_keywords.iter().any(|k| path.contains(k.as_str()))
    }
}

/// Versioned, swappable validation rule set. One immutable instance per run.
#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    /// Substrings matched case-insensitively against the host.
    pub blocked_domains: Vec<String>,
    /// Substrings matched against the full URL string; covers shorteners and
    /// support/legal subpaths wherever they appear.
    pub blocked_url_tokens: Vec<String>,
    /// Substrings matched against the URL path (login/register/auth family).
    pub blocked_paths: Vec<String>,
    /// When set, hosts/paths failing the inclusion predicate are rejected.
    pub geo: Option<GeoFilter>,
    /// Maximum candidates a single connector may emit for one domain.
    pub per_domain_cap: usize,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        let blocked_domains = [
            "facebook.com",
            "fb.com",
            "instagram.com",
            "twitter.com",
            "x.com",
            "linkedin.com",
            "reddit.com",
            "youtube.com",
            "youtu.be",
            "tiktok.com",
            "google.com",
            "apple.com",
            "microsoft.com",
        ]
        .map(str::to_owned)
        .to_vec();

        let blocked_url_tokens = [
            "bit.ly",
            "t.co/",
            "goo.gl",
            "ow.ly",
            "short.link",
            "tinyurl.com",
            "/privacy",
            "/terms",
            "/legal",
            "/cookie",
            "/support",
            "/help/",
        ]
        .map(str::to_owned)
        .to_vec();

        let blocked_paths = ["/login", "/signin", "/sign-in", "/register", "/signup", "/auth", "/password"]
            .map(str::to_owned)
            .to_vec();

        Self {
            blocked_domains,
            blocked_url_tokens,
            blocked_paths,
            geo: None,
            per_domain_cap: 3,
        }
    }
}

/// Returns the lowercase host of `raw`, or `None` when the URL does not parse.
///
/// Used for per-domain caps; kept alongside the predicate so both agree on
/// what "domain" means.
#[must_use]
pub fn domain_of(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    url.host_str().map(str::to_lowercase)
}

/// Decides whether `raw` is an acceptable lead target under `policy`.
///
/// Rejects when the URL is not absolute http/https, the host matches a
/// blocked-domain substring, the full URL contains a blocked token, the path
/// contains a blocked segment, the host is dotless or `localhost`, or the
/// geographic filter (when enabled) excludes it. Parse failures are treated
/// as invalid; the function never panics.
#[must_use]
pub fn is_valid_lead_url(raw: &str, policy: &ValidationPolicy) -> bool {
    let Ok(url) = Url::parse(raw) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_lowercase();
    if host == "localhost" || !host.contains('.') {
        return false;
    }
    if policy.blocked_domains.iter().any(|b| host.contains(b.as_str())) {
        return false;
    }

    let lower = raw.to_lowercase();
    if policy.blocked_url_tokens.iter().any(|t| lower.contains(t.as_str())) {
        return false;
    }

    let path = url.path().to_lowercase();
    if policy.blocked_paths.iter().any(|p| path.contains(p.as_str())) {
        return false;
    }

    if let Some(geo) = &policy.geo {
        if !geo.allows(&host, &path) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ValidationPolicy {
        ValidationPolicy::default()
    }

    #[test]
    fn accepts_plain_business_url() {
        assert!(is_valid_lead_url("https://acme-plumbing.it/", &policy()));
    }

    #[test]
    fn rejects_blocked_domains_regardless_of_scheme_and_path() {
        let p = policy();
        for url in [
            "https://facebook.com/somepage",
            "http://facebook.com/",
            "https://www.facebook.com/ads/library",
            "https://m.youtube.com/watch?v=x",
            "http://instagram.com/profile/x?hl=en",
        ] {
            assert!(!is_valid_lead_url(url, &p), "{url} should be rejected");
        }
    }

    #[test]
    fn rejects_shorteners_via_url_tokens() {
        let p = policy();
        assert!(!is_valid_lead_url("https://bit.ly/3xyz", &p));
        assert!(!is_valid_lead_url("https://tinyurl.com/abc", &p));
    }

    #[test]
    fn rejects_support_and_legal_subpaths() {
        let p = policy();
        assert!(!is_valid_lead_url("https://acme.com/privacy", &p));
        assert!(!is_valid_lead_url("https://acme.com/it/terms-of-service", &p));
    }

    #[test]
    fn rejects_auth_paths() {
        let p = policy();
        assert!(!is_valid_lead_url("https://acme.com/login", &p));
        assert!(!is_valid_lead_url("https://acme.com/account/register?next=/", &p));
    }

    #[test]
    fn rejects_non_http_schemes_and_relative_urls() {
        let p = policy();
        assert!(!is_valid_lead_url("ftp://acme.com/", &p));
        assert!(!is_valid_lead_url("mailto:info@acme.com", &p));
        assert!(!is_valid_lead_url("/contact", &p));
        assert!(!is_valid_lead_url("", &p));
    }

    #[test]
    fn rejects_dotless_hosts_and_localhost() {
        let p = policy();
        assert!(!is_valid_lead_url("http://localhost:8080/", &p));
        assert!(!is_valid_lead_url("http://intranet/", &p));
    }

    #[test]
    fn malformed_urls_fail_closed() {
        let p = policy();
        assert!(!is_valid_lead_url("http://", &p));
        assert!(!is_valid_lead_url("not a url at all", &p));
        assert!(!is_valid_lead_url("https://exa mple.com/", &p));
    }

    #[test]
    fn predicate_is_idempotent() {
        let p = policy();
        for url in ["https://acme.it/", "https://facebook.com/x", "garbage"] {
            let first = is_valid_lead_url(url, &p);
            for _ in 0..3 {
                assert_eq!(is_valid_lead_url(url, &p), first);
            }
        }
    }

    #[test]
    fn geo_filter_restricts_by_suffix_or_path() {
        let mut p = policy();
        p.geo = Some(GeoFilter {
            domain_suffixes: vec![".it".to_owned()],
            path_keywords: vec!["/it/".to_owned()],
        });
        assert!(is_valid_lead_url("https://palestra-roma.it/", &p));
        assert!(is_valid_lead_url("https://acme.com/it/offerte", &p));
        assert!(!is_valid_lead_url("https://acme.com/en/deals", &p));
    }

    #[test]
    fn domain_of_lowercases_host() {
        assert_eq!(domain_of("https://ACME.It/x").as_deref(), Some("acme.it"));
        assert_eq!(domain_of("nope"), None);
    }
}
