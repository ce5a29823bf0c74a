//! Landing-page signal extraction.
//!
//! Turns raw HTML into an [`AnalysisResult`]: contact channels (emails,
//! phones, contact links), structural flags (form, JSON-LD, call to action),
//! the additive copy-quality heuristic, and the keyword tone/sentiment
//! scales. All extraction is regex-driven over the page source and its
//! visible text; the final `lead_score` comes from the core scoring engine.

use regex::Regex;
use url::Url;

use leadlens_core::{is_valid_lead_url, lead_score, AnalysisResult, ScoringWeights, Tone, ValidationPolicy};

pub(crate) const MAX_EMAILS: usize = 5;
pub(crate) const MAX_PHONES: usize = 5;
pub(crate) const MAX_CONTACT_LINKS: usize = 3;

/// Matches with fewer digits than this are noise (CAP codes, prices, years).
const MIN_PHONE_DIGITS: usize = 9;

/// Copy-quality heuristics look at a capped sample of the page text.
const COPY_SAMPLE_CHARS: usize = 2500;

/// Emails whose domain is a documentation placeholder are dropped.
const PLACEHOLDER_EMAIL_DOMAINS: &[&str] = &[
    "example.com",
    "example.org",
    "example.net",
    "email.com",
    "domain.com",
    "yourdomain.com",
    "yoursite.com",
    "sentry.io",
    "wixpress.com",
];

/// Keywords marking an anchor as a contact/about page, matched against both
/// the href and the visible anchor text.
const CONTACT_KEYWORDS: &[&str] = &[
    "contact",
    "contatti",
    "contattaci",
    "about",
    "chi-siamo",
    "chi siamo",
    "get-in-touch",
    "reach-us",
    "scrivici",
];

const CTA_KEYWORDS: &[&str] = &[
    "buy", "get", "try", "start", "join", "subscribe", "download", "learn", "discover", "free",
    "acquista", "prova", "inizia", "iscriviti", "scarica", "scopri", "gratis", "richiedi",
];

const BENEFIT_KEYWORDS: &[&str] = &[
    "save", "increase", "improve", "boost", "grow", "reduce", "easy", "fast", "simple",
    "risparmia", "migliora", "aumenta", "facile", "veloce", "semplice",
];

const URGENCY_KEYWORDS: &[&str] = &[
    "now", "today", "limited", "offer", "hurry", "expires", "ora", "oggi", "offerta", "scade",
    "subito",
];

const SOCIAL_PROOF_KEYWORDS: &[&str] = &[
    "customers", "reviews", "rated", "trusted", "clienti", "recensioni", "testimonianze",
];

const POSITIVE_KEYWORDS: &[&str] = &[
    "great", "good", "excellent", "best", "love", "quality", "reliable", "ottimo", "migliore",
    "qualità", "eccellente", "affidabile",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "bad", "worst", "terrible", "scam", "problem", "complaint", "pessimo", "truffa", "problema",
    "reclamo",
];

const COMMERCIAL_KEYWORDS: &[&str] = &[
    "price", "discount", "sale", "shop", "order", "deal", "prezzo", "sconto", "promo", "vendita",
    "ordina", "negozio",
];

const FORMAL_KEYWORDS: &[&str] = &[
    "services", "solutions", "expertise", "consulting", "professional", "azienda", "servizi",
    "soluzioni", "consulenza", "professionale",
];

const CASUAL_KEYWORDS: &[&str] = &["hey", "cool", "awesome", "wow", "ciao", "dai", "super"];

/// Occurrence thresholds before a copy-quality bonus is granted. Density
/// keywords need two hits so a single stray word does not count.
const CTA_MIN_HITS: usize = 2;
const BENEFIT_MIN_HITS: usize = 2;
const URGENCY_MIN_HITS: usize = 1;
const SOCIAL_PROOF_MIN_HITS: usize = 1;

/// Runs the full extraction over one fetched page and scores the result.
///
/// `base_url` is the page's final URL, used to resolve relative contact
/// links. The shared run policy filters those links exactly as it filtered
/// the candidate itself.
#[must_use]
pub fn analyze_page(
    html: &str,
    base_url: &str,
    policy: &ValidationPolicy,
    weights: &ScoringWeights,
) -> AnalysisResult {
    let text = html_to_text(html);

    let mut analysis = AnalysisResult {
        emails: extract_emails(&text),
        phones: extract_phones(&text),
        contact_links: extract_contact_links(html, base_url, policy),
        has_form: has_form(html),
        has_structured_data: has_structured_data(html),
        has_call_to_action: has_call_to_action(html),
        copy_quality: copy_quality(&text),
        sentiment: 0,
        tone: Tone::Unknown,
        professionalism: 0,
        persuasiveness: 0,
        lead_score: 0,
    };

    let tone = tone_profile(&text);
    analysis.sentiment = tone.sentiment;
    analysis.tone = tone.tone;
    analysis.professionalism = tone.professionalism;
    analysis.persuasiveness = tone.persuasiveness;

    analysis.lead_score = lead_score(&analysis, weights);
    analysis
}

/// Strips markup from an HTML document and returns its visible text with
/// collapsed whitespace. Script and style bodies are removed first so their
/// contents never pollute keyword counts.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    let script_re =
        Regex::new(r"(?is)<(script|style|noscript)\b[^>]*>.*?</(script|style|noscript)>")
            .expect("valid script-strip regex");
    let tag_re = Regex::new(r"(?s)<[^>]+>").expect("valid tag-strip regex");

    let without_scripts = script_re.replace_all(html, " ");
    let without_tags = tag_re.replace_all(&without_scripts, " ");
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pulls all raw `href` attribute values out of an HTML document.
#[must_use]
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let re = Regex::new(r#"(?is)href\s*=\s*["']([^"']+)["']"#).expect("valid href regex");
    re.captures_iter(html)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().trim().to_owned()))
        .filter(|href| {
            !href.is_empty()
                && !href.starts_with('#')
                && !href.starts_with("mailto:")
                && !href.starts_with("javascript:")
        })
        .collect()
}

/// Extracts deduplicated emails from visible text, dropping placeholder
/// domains. Capped at [`MAX_EMAILS`].
#[must_use]
pub fn extract_emails(text: &str) -> Vec<String> {
    let re = Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
        .expect("valid email regex");

    let mut emails: Vec<String> = Vec::new();
    for m in re.find_iter(text) {
        let email = m.as_str().to_lowercase();
        let Some((_, domain)) = email.split_once('@') else {
            continue;
        };
        if PLACEHOLDER_EMAIL_DOMAINS.iter().any(|p| domain == *p) {
            continue;
        }
        if !emails.contains(&email) {
            emails.push(email);
        }
        if emails.len() == MAX_EMAILS {
            break;
        }
    }
    emails
}

/// Extracts deduplicated phone numbers from visible text.
///
/// Applies an ordered list of locale-aware patterns — country-code prefixed,
/// national format, mobile prefix — and keeps only matches with at least
/// [`MIN_PHONE_DIGITS`] digits. Duplicates are collapsed by digit sequence so
/// `+39 02 1234567` and `+39-02-1234567` count once. Capped at [`MAX_PHONES`].
#[must_use]
pub fn extract_phones(text: &str) -> Vec<String> {
    let patterns = [
        // International: +39 02 1234567, +41 (0)44 123 45 67
        r"\+\d{1,3}[ .\-]?\(?\d{1,4}\)?(?:[ .\-]?\d{1,4}){1,4}",
        // National with area code: 02 12345678, (055) 123-4567
        r"\(?\d{2,4}\)?[ .\-]\d{3,4}[ .\-]?\d{3,4}",
        // Mobile prefix: 333 1234567
        r"\b3\d{2}[ .\-]?\d{3}[ .\-]?\d{3,4}\b",
    ];

    let mut phones: Vec<String> = Vec::new();
    let mut seen_digits: Vec<String> = Vec::new();

    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid phone regex");
        for m in re.find_iter(text) {
            let raw = m.as_str().trim().to_owned();
            let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
            if digits.len() < MIN_PHONE_DIGITS {
                continue;
            }
            // A later pattern can re-match the tail of an earlier hit
            // ("02 1234567" inside "+39 02 1234567"), so overlapping digit
            // sequences count as duplicates too.
            if seen_digits
                .iter()
                .any(|seen| seen.contains(&digits) || digits.contains(seen))
            {
                continue;
            }
            seen_digits.push(digits);
            phones.push(raw);
            if phones.len() == MAX_PHONES {
                return phones;
            }
        }
    }
    phones
}

/// Finds contact/about page links: anchors whose href or visible text
/// contains a contact keyword, resolved to absolute against `base_url` and
/// filtered through the same run policy as the candidates themselves.
/// Capped at [`MAX_CONTACT_LINKS`].
#[must_use]
pub fn extract_contact_links(html: &str, base_url: &str, policy: &ValidationPolicy) -> Vec<String> {
    let anchor_re = Regex::new(r#"(?is)<a\b[^>]*href\s*=\s*["']([^"']+)["'][^>]*>(.*?)</a>"#)
        .expect("valid anchor regex");
    let base = Url::parse(base_url).ok();

    let mut links: Vec<String> = Vec::new();
    for cap in anchor_re.captures_iter(html) {
        let href = cap.get(1).map_or("", |m| m.as_str()).trim();
        let label = html_to_text(cap.get(2).map_or("", |m| m.as_str())).to_lowercase();
        let href_lower = href.to_lowercase();

        let keyword_hit = CONTACT_KEYWORDS
            .iter()
            .any(|k| href_lower.contains(k) || label.contains(k));
        if !keyword_hit {
            continue;
        }

        let absolute = if href_lower.starts_with("http://") || href_lower.starts_with("https://") {
            href.to_owned()
        } else if let Some(base) = &base {
            match base.join(href) {
                Ok(joined) => joined.to_string(),
                Err(_) => continue,
            }
        } else {
            continue;
        };

        if !is_valid_lead_url(&absolute, policy) {
            continue;
        }
        if !links.contains(&absolute) {
            links.push(absolute);
        }
        if links.len() == MAX_CONTACT_LINKS {
            break;
        }
    }
    links
}

#[must_use]
pub fn has_form(html: &str) -> bool {
    Regex::new(r"(?i)<form\b")
        .expect("valid form regex")
        .is_match(html)
}

/// JSON-LD (or equivalent schema markup) presence.
#[must_use]
pub fn has_structured_data(html: &str) -> bool {
    let jsonld = Regex::new(r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["']"#)
        .expect("valid json-ld regex");
    let microdata = Regex::new(r#"(?i)itemtype\s*=\s*["']https?://schema\.org"#)
        .expect("valid microdata regex");
    jsonld.is_match(html) || microdata.is_match(html)
}

/// Call-to-action presence: either CTA-styled elements (`cta`/`btn`/`button`
/// classes on buttons and anchors) or action-verb keywords in the visible
/// text of a button or anchor. Action verbs in plain prose do not count;
/// "learn" in a paragraph is not a call to action.
#[must_use]
pub fn has_call_to_action(html: &str) -> bool {
    let styled = Regex::new(r#"(?is)<(?:button|a)\b[^>]*class\s*=\s*["'][^"']*(?:cta|btn|button)"#)
        .expect("valid cta-class regex");
    if styled.is_match(html) {
        return true;
    }
    let clickable = Regex::new(r"(?is)<(button|a)\b[^>]*>(.*?)</(?:button|a)>")
        .expect("valid clickable-label regex");
    let has_cta_label = clickable.captures_iter(html).any(|cap| {
        let label = html_to_text(cap.get(2).map_or("", |m| m.as_str()));
        count_keyword_hits(&label, CTA_KEYWORDS) > 0
    });
    has_cta_label
}

/// Additive copy-quality heuristic over the first [`COPY_SAMPLE_CHARS`]
/// characters of visible text: length-in-range, call-to-action density,
/// benefit density, urgency, and social proof, 2 points each, capped at 10.
/// Pages with fewer than 50 characters of text score 0.
#[must_use]
pub fn copy_quality(text: &str) -> u8 {
    let sample: String = text.chars().take(COPY_SAMPLE_CHARS).collect();
    // Length gates count chars like the sample cap does, so accented text
    // is not inflated by its UTF-8 byte width.
    let sample_chars = sample.chars().count();
    if sample_chars < 50 {
        return 0;
    }

    let mut score = 0u8;
    if (100..2000).contains(&sample_chars) {
        score += 2;
    }
    if count_keyword_hits(&sample, CTA_KEYWORDS) >= CTA_MIN_HITS {
        score += 2;
    }
    if count_keyword_hits(&sample, BENEFIT_KEYWORDS) >= BENEFIT_MIN_HITS {
        score += 2;
    }
    if count_keyword_hits(&sample, URGENCY_KEYWORDS) >= URGENCY_MIN_HITS {
        score += 2;
    }
    if count_keyword_hits(&sample, SOCIAL_PROOF_KEYWORDS) >= SOCIAL_PROOF_MIN_HITS {
        score += 2;
    }
    score.min(10)
}

/// Tone and sentiment scales derived from keyword counts.
#[derive(Debug, Clone, Copy)]
pub struct ToneProfile {
    pub sentiment: u8,
    pub tone: Tone,
    pub professionalism: u8,
    pub persuasiveness: u8,
}

/// Maps bounded keyword counts into the fixed 0..=10 scales and the
/// categorical tone label: commercial keywords present wins, otherwise
/// formal beats casual, otherwise casual if present, else neutral. Pages
/// with no analyzable text are `Unknown` across the board.
#[must_use]
pub fn tone_profile(text: &str) -> ToneProfile {
    if text.trim().is_empty() {
        return ToneProfile {
            sentiment: 0,
            tone: Tone::Unknown,
            professionalism: 0,
            persuasiveness: 0,
        };
    }

    let positive = count_keyword_hits(text, POSITIVE_KEYWORDS).min(5);
    let negative = count_keyword_hits(text, NEGATIVE_KEYWORDS).min(5);
    let commercial = count_keyword_hits(text, COMMERCIAL_KEYWORDS);
    let formal = count_keyword_hits(text, FORMAL_KEYWORDS);
    let casual = count_keyword_hits(text, CASUAL_KEYWORDS);
    let urgency = count_keyword_hits(text, URGENCY_KEYWORDS);
    let cta = count_keyword_hits(text, CTA_KEYWORDS);

    let tone = if commercial > 0 {
        Tone::Commercial
    } else if formal > casual && formal > 0 {
        Tone::Formal
    } else if casual > 0 {
        Tone::Casual
    } else {
        Tone::Neutral
    };

    let sentiment = clamp_scale(5 + to_i(positive) - to_i(negative));
    let professionalism = clamp_scale(5 + to_i(formal.min(5)) - to_i(casual.min(5)));
    let persuasiveness = clamp_scale(to_i((cta + urgency + commercial).min(10)));

    ToneProfile {
        sentiment,
        tone,
        professionalism,
        persuasiveness,
    }
}

/// Counts whole-word keyword hits, case-insensitive, punctuation stripped.
fn count_keyword_hits(text: &str, keywords: &[&str]) -> usize {
    text.split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|word| !word.is_empty() && keywords.contains(&word.as_str()))
        .count()
}

fn to_i(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

fn clamp_scale(value: i32) -> u8 {
    u8::try_from(value.clamp(0, 10)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ValidationPolicy {
        ValidationPolicy::default()
    }

    #[test]
    fn html_to_text_strips_scripts_and_tags() {
        let html = r"<html><head><script>var x = 'spam buy now';</script>
            <style>.a { color: red; }</style></head>
            <body><h1>Palestra &amp; Fitness</h1><p>Vieni a trovarci</p></body></html>";
        let text = html_to_text(html);
        assert_eq!(text, "Palestra & Fitness Vieni a trovarci");
    }

    #[test]
    fn extracts_emails_and_drops_placeholders() {
        let text = "Scrivi a mario@esempio.it oppure demo@example.com o MARIO@esempio.it";
        let emails = extract_emails(text);
        assert_eq!(emails, vec!["mario@esempio.it".to_owned()]);
    }

    #[test]
    fn email_cap_is_five() {
        let text = (0..8)
            .map(|i| format!("user{i}@acme.it"))
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(extract_emails(&text).len(), MAX_EMAILS);
    }

    #[test]
    fn extracts_international_phone() {
        let phones = extract_phones("Chiama +39 02 1234567 per info");
        assert_eq!(phones, vec!["+39 02 1234567".to_owned()]);
    }

    #[test]
    fn extracts_mobile_prefix_phone() {
        let phones = extract_phones("cell: 333 123 4567");
        assert!(!phones.is_empty(), "mobile number should match: {phones:?}");
    }

    #[test]
    fn short_digit_runs_are_rejected() {
        assert!(extract_phones("aperto dalle 9 alle 18, CAP 20121").is_empty());
    }

    #[test]
    fn phones_dedup_by_digit_sequence() {
        let phones = extract_phones("+39 02 1234567 e anche +39-02-1234567");
        assert_eq!(phones.len(), 1);
    }

    #[test]
    fn contact_links_resolve_and_pass_policy() {
        let html = r#"<a href="/contatti">Contatti</a>
            <a href="https://facebook.com/page">Contact us on FB</a>
            <a href="/prodotti">Prodotti</a>"#;
        let links = extract_contact_links(html, "https://acme.it/home", &policy());
        assert_eq!(links, vec!["https://acme.it/contatti".to_owned()]);
    }

    #[test]
    fn contact_links_match_on_anchor_text_too() {
        let html = r#"<a href="/info">Chi siamo</a>"#;
        let links = extract_contact_links(html, "https://acme.it/", &policy());
        assert_eq!(links, vec!["https://acme.it/info".to_owned()]);
    }

    #[test]
    fn structural_flags() {
        assert!(has_form(r#"<form action="/subscribe" method="post">"#));
        assert!(!has_form("<div>no form here</div>"));
        assert!(has_structured_data(
            r#"<script type="application/ld+json">{"@type":"LocalBusiness"}</script>"#
        ));
        assert!(has_call_to_action(
            r#"<a class="btn btn-primary" href="/x">Go</a>"#
        ));
        assert!(has_call_to_action(r#"<a href="/prova">Prova gratis</a>"#));
        assert!(has_call_to_action("<button>Iscriviti</button>"));
    }

    #[test]
    fn call_to_action_ignores_action_verbs_in_prose() {
        let html = "<p>Learn about the history of our village library, free to visit.</p>";
        assert!(!has_call_to_action(html));

        let weights = leadlens_core::ScoringWeights::default();
        let analysis = analyze_page(html, "https://esempio.it/", &policy(), &weights);
        assert!(!analysis.has_call_to_action);
        assert_eq!(analysis.lead_score, 0);
    }

    #[test]
    fn copy_quality_rewards_density() {
        let text = "Acquista ora la tua offerta. Prova gratis oggi, scopri i nostri \
                    clienti soddisfatti e le recensioni. Facile e veloce, risparmia tempo. \
                    La palestra migliore della città ti aspetta con corsi per tutti.";
        let score = copy_quality(text);
        assert!(score >= 6, "expected a dense sales page to score high, got {score}");
    }

    #[test]
    fn copy_quality_zero_for_thin_pages() {
        assert_eq!(copy_quality("404"), 0);
        assert_eq!(copy_quality(""), 0);
    }

    #[test]
    fn copy_quality_length_gates_count_chars_not_bytes() {
        // 1200 accented chars is 2400 bytes; the in-range bonus must still
        // apply because the page has 1200 chars of copy.
        let accented = "è".repeat(1200);
        assert_eq!(copy_quality(&accented), 2);
        // 30 accented chars is 60 bytes but still a thin page.
        assert_eq!(copy_quality(&"è".repeat(30)), 0);
    }

    #[test]
    fn tone_commercial_wins() {
        let profile = tone_profile("sconto promo prezzo servizi soluzioni");
        assert_eq!(profile.tone, Tone::Commercial);
    }

    #[test]
    fn tone_formal_beats_casual() {
        let profile = tone_profile("azienda di consulenza e servizi professionali ciao");
        assert_eq!(profile.tone, Tone::Formal);
    }

    #[test]
    fn tone_neutral_and_unknown() {
        assert_eq!(tone_profile("il gatto dorme sul divano").tone, Tone::Neutral);
        assert_eq!(tone_profile("   ").tone, Tone::Unknown);
    }

    #[test]
    fn sentiment_scale_is_bounded() {
        let upbeat = tone_profile("ottimo eccellente migliore qualità affidabile great good");
        assert!(upbeat.sentiment > 5 && upbeat.sentiment <= 10);
        let grim = tone_profile("pessimo truffa problema reclamo bad worst terrible");
        assert!(grim.sentiment < 5);
    }

    #[test]
    fn analyze_page_scores_contact_heavy_page() {
        let weights = leadlens_core::ScoringWeights::default();
        let html = r#"<html><body>
            <p>Contattaci: mario@esempio.it oppure +39 02 1234567</p>
            <form method="post"><input name="email"></form>
            </body></html>"#;
        let analysis = analyze_page(html, "https://esempio.it/", &policy(), &weights);
        assert_eq!(analysis.emails, vec!["mario@esempio.it".to_owned()]);
        assert_eq!(analysis.phones, vec!["+39 02 1234567".to_owned()]);
        assert!(analysis.has_form);
        assert_eq!(
            analysis.lead_score,
            weights.email + weights.phone + weights.form
        );
    }
}
