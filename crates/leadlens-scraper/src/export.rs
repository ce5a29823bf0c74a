//! Read-only export projections over a [`DiscoveryRun`].
//!
//! The tabular projection flattens list-valued fields into `"; "`-joined
//! strings; the document projection serializes leads verbatim. Both take the
//! run handle by reference — there is no ambient "last results" state here.

use serde::Serialize;

use leadlens_core::{DiscoveryRun, Lead, Tone};

/// One lead flattened into scalar columns for tabular export.
#[derive(Debug, Clone, Serialize)]
pub struct LeadRecord {
    pub source: String,
    pub url: String,
    pub query: String,
    pub discovered_at: String,
    pub emails: String,
    pub phones: String,
    pub contact_links: String,
    pub has_form: bool,
    pub has_structured_data: bool,
    pub has_call_to_action: bool,
    pub copy_quality: u8,
    pub sentiment: u8,
    pub tone: String,
    pub professionalism: u8,
    pub persuasiveness: u8,
    pub lead_score: u8,
}

impl From<&Lead> for LeadRecord {
    fn from(lead: &Lead) -> Self {
        let c = &lead.candidate;
        let a = &lead.analysis;
        Self {
            source: c.source.clone(),
            url: c.url.clone(),
            query: c.query.clone(),
            discovered_at: c.discovered_at.to_rfc3339(),
            emails: a.emails.join("; "),
            phones: a.phones.join("; "),
            contact_links: a.contact_links.join("; "),
            has_form: a.has_form,
            has_structured_data: a.has_structured_data,
            has_call_to_action: a.has_call_to_action,
            copy_quality: a.copy_quality,
            sentiment: a.sentiment,
            tone: tone_label(a.tone).to_owned(),
            professionalism: a.professionalism,
            persuasiveness: a.persuasiveness,
            lead_score: a.lead_score,
        }
    }
}

fn tone_label(tone: Tone) -> &'static str {
    match tone {
        Tone::Commercial => "commercial",
        Tone::Formal => "formal",
        Tone::Casual => "casual",
        Tone::Neutral => "neutral",
        Tone::Unknown => "unknown",
    }
}

/// Flattens every lead of a run into [`LeadRecord`]s, preserving rank order.
#[must_use]
pub fn to_flat_records(run: &DiscoveryRun) -> Vec<LeadRecord> {
    run.leads.iter().map(LeadRecord::from).collect()
}

const CSV_HEADER: &str = "source,url,query,discovered_at,emails,phones,contact_links,\
has_form,has_structured_data,has_call_to_action,copy_quality,sentiment,tone,\
professionalism,persuasiveness,lead_score";

/// Renders a run as CSV with a fixed header row.
#[must_use]
pub fn to_csv(run: &DiscoveryRun) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for record in to_flat_records(run) {
        let fields = [
            record.source,
            record.url,
            record.query,
            record.discovered_at,
            record.emails,
            record.phones,
            record.contact_links,
            record.has_form.to_string(),
            record.has_structured_data.to_string(),
            record.has_call_to_action.to_string(),
            record.copy_quality.to_string(),
            record.sentiment.to_string(),
            record.tone,
            record.professionalism.to_string(),
            record.persuasiveness.to_string(),
            record.lead_score.to_string(),
        ];
        let row: Vec<String> = fields.iter().map(|f| csv_escape(f)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Serializes the ranked lead list as pretty-printed JSON.
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn to_json(run: &DiscoveryRun) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&run.leads)
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use uuid::Uuid;

    use leadlens_core::{AnalysisResult, Candidate};

    fn sample_run() -> DiscoveryRun {
        let mut analysis = AnalysisResult::zeroed();
        analysis.emails = vec!["a@acme.it".to_owned(), "b@acme.it".to_owned()];
        analysis.phones = vec!["+39 02 1234567".to_owned()];
        analysis.tone = Tone::Commercial;
        analysis.lead_score = 6;

        DiscoveryRun {
            id: Uuid::new_v4(),
            query: "palestra".to_owned(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            leads: vec![Lead {
                candidate: Candidate {
                    url: "https://acme.it/".to_owned(),
                    source: "meta_ads".to_owned(),
                    query: "palestra".to_owned(),
                    discovered_at: Utc::now(),
                    provenance: None,
                },
                analysis,
            }],
            source_outcomes: Vec::new(),
        }
    }

    #[test]
    fn flat_record_joins_lists() {
        let records = to_flat_records(&sample_run());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].emails, "a@acme.it; b@acme.it");
        assert_eq!(records[0].tone, "commercial");
        assert_eq!(records[0].lead_score, 6);
    }

    #[test]
    fn csv_has_header_and_one_row_per_lead() {
        let csv = to_csv(&sample_run());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("source,url,query"));
        assert!(lines[1].contains("a@acme.it; b@acme.it"));
    }

    #[test]
    fn csv_escapes_commas_and_quotes() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn json_export_is_an_array_of_leads() {
        let json = to_json(&sample_run()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let leads = value.as_array().unwrap();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0]["url"], "https://acme.it/");
        assert_eq!(leads[0]["lead_score"], 6);
        assert_eq!(leads[0]["tone"], "commercial");
    }
}
