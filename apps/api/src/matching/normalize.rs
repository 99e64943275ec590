//! Turns loosely typed scorer output, or a bare posting after a scorer
//! failure, into a `MatchResult` that always satisfies the score invariant.

use serde::Deserialize;
use serde_json::Value;

use crate::job_search::JobPosting;
use crate::models::job_match::{MatchKind, MatchResult, MAX_MATCH_SCORE};

/// Maximum number of apply links kept per result.
const MAX_APPLY_LINKS: usize = 4;

/// What the scorer asks the model to return. Every field is optional and
/// loosely typed; `into_result` does the coercion.
#[derive(Debug, Default, Deserialize)]
pub struct RawMatch {
    #[serde(default)]
    pub job_title: Value,
    #[serde(default)]
    pub company: Value,
    #[serde(default)]
    pub employment_type: Value,
    #[serde(default)]
    pub remote: Value,
    #[serde(default)]
    pub salary: Value,
    #[serde(default)]
    pub benefits: Value,
    #[serde(default)]
    pub responsibilities: Value,
    #[serde(default)]
    pub qualifications: Value,
    #[serde(default)]
    pub apply_links: Value,
    #[serde(default)]
    pub match_score: Value,
    #[serde(default)]
    pub match_reason: Value,
}

impl RawMatch {
    /// Builds a `Scored` result. Blank identity fields fall back to the posting.
    pub fn into_result(self, posting: &JobPosting) -> MatchResult {
        let fallback = degraded_result(posting, "");

        let or_fallback = |value: &Value, fallback: String| {
            let text = value_to_text(value);
            if text.is_empty() {
                fallback
            } else {
                text
            }
        };

        let mut apply_links = value_to_links(&self.apply_links);
        if apply_links.is_empty() {
            apply_links = fallback.apply_links.clone();
        }

        MatchResult {
            job_title: or_fallback(&self.job_title, fallback.job_title),
            company: or_fallback(&self.company, fallback.company),
            employment_type: or_fallback(&self.employment_type, fallback.employment_type),
            remote: or_fallback(&self.remote, fallback.remote),
            salary: or_fallback(&self.salary, fallback.salary),
            benefits: value_to_text(&self.benefits),
            responsibilities: value_to_text(&self.responsibilities),
            qualifications: value_to_text(&self.qualifications),
            apply_links,
            match_score: normalize_score(&self.match_score),
            match_reason: value_to_text(&self.match_reason),
            kind: MatchKind::Scored,
        }
    }
}

/// Coerces any scorer output into 0..=10.
///
/// Numbers are rounded and clamped, numeric strings are parsed first, and
/// anything unparsable scores 0.
pub fn normalize_score(value: &Value) -> u8 {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match raw {
        Some(score) if !score.is_nan() => score.round().clamp(0.0, MAX_MATCH_SCORE as f64) as u8,
        _ => 0,
    }
}

/// Result for a posting the scorer could not handle: posting fields only,
/// qualitative fields empty, score 0, reason carries the error.
pub fn degraded_result(posting: &JobPosting, reason: &str) -> MatchResult {
    let salary = match (posting.job_min_salary, posting.job_max_salary) {
        (Some(min), Some(max)) => format!("${} - ${}", format_thousands(min), format_thousands(max)),
        _ => "Not Specified".to_string(),
    };

    MatchResult {
        job_title: non_blank(posting.job_title.as_deref(), "Unknown Title"),
        company: non_blank(posting.employer_name.as_deref(), "Unknown Company"),
        employment_type: non_blank(posting.job_employment_type.as_deref(), "Not Specified"),
        remote: if posting.job_is_remote.unwrap_or(false) {
            "Yes".to_string()
        } else {
            "No".to_string()
        },
        salary,
        benefits: String::new(),
        responsibilities: String::new(),
        qualifications: posting
            .job_required_skills
            .as_deref()
            .map(|skills| skills.join("; "))
            .unwrap_or_default(),
        apply_links: posting
            .job_apply_link
            .iter()
            .filter(|link| !link.trim().is_empty())
            .cloned()
            .collect(),
        match_score: 0,
        match_reason: if reason.is_empty() {
            String::new()
        } else {
            format!("Error during analysis: {reason}")
        },
        kind: MatchKind::Degraded,
    }
}

fn non_blank(value: Option<&str>, default: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("; "),
        Value::Null | Value::Object(_) => String::new(),
    }
}

fn value_to_links(value: &Value) -> Vec<String> {
    let links: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => vec![],
    };
    links.into_iter().take(MAX_APPLY_LINKS).collect()
}

/// 1234567.4 → "1,234,567"
fn format_thousands(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
