//! Renders the match summary email. Pure functions; the transport lives in `smtp`.

use crate::models::job_match::MatchResult;

pub fn render_subject(matches: &[MatchResult], threshold: u8) -> String {
    let noun = if matches.len() == 1 { "match" } else { "matches" };
    format!(
        "{} job {noun} meeting your threshold (≥{threshold})",
        matches.len()
    )
}

/// Highest score first; ties keep the scoring order.
fn ranked(matches: &[MatchResult]) -> Vec<&MatchResult> {
    let mut ranked: Vec<&MatchResult> = matches.iter().collect();
    ranked.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    ranked
}

pub fn render_text(matches: &[MatchResult], threshold: u8) -> String {
    let mut body = format!(
        "{} job(s) scored {threshold}/10 or higher against your resume.\n\n",
        matches.len()
    );

    for (i, m) in ranked(matches).into_iter().enumerate() {
        body.push_str(&format!(
            "{}. {} at {} ({}/10)\n",
            i + 1,
            m.job_title,
            m.company,
            m.match_score
        ));
        body.push_str(&format!("   Salary: {} | Remote: {}\n", m.salary, m.remote));
        if !m.match_reason.is_empty() {
            body.push_str(&format!("   Why: {}\n", m.match_reason));
        }
        for link in &m.apply_links {
            body.push_str(&format!("   Apply: {link}\n"));
        }
        body.push('\n');
    }

    body
}

pub fn render_html(matches: &[MatchResult], threshold: u8) -> String {
    let mut html = format!(
        "<h2>{} job(s) scored {threshold}/10 or higher</h2>\n",
        matches.len()
    );

    for m in ranked(matches) {
        html.push_str("<div style=\"margin-bottom:24px\">\n");
        html.push_str(&format!(
            "<h3>{} &mdash; {} <small>({}/10)</small></h3>\n",
            escape_html(&m.job_title),
            escape_html(&m.company),
            m.match_score
        ));
        html.push_str(&format!(
            "<p><b>Salary:</b> {} &nbsp; <b>Remote:</b> {} &nbsp; <b>Type:</b> {}</p>\n",
            escape_html(&m.salary),
            escape_html(&m.remote),
            escape_html(&m.employment_type)
        ));
        if !m.qualifications.is_empty() {
            html.push_str(&format!(
                "<p><b>Qualifications:</b> {}</p>\n",
                escape_html(&m.qualifications)
            ));
        }
        if !m.match_reason.is_empty() {
            html.push_str(&format!("<p>{}</p>\n", escape_html(&m.match_reason)));
        }
        for link in &m.apply_links {
            let link = escape_html(link);
            html.push_str(&format!("<a href=\"{link}\">Apply</a> "));
        }
        html.push_str("\n</div>\n");
    }

    html
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
