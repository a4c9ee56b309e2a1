//! Output formats for one-shot search results.
//!
//! The `search` subcommand renders hits in one of three formats:
//! - Markdown - headers, metadata tables, and escaped titles
//! - JSON - structured data for programmatic use
//! - Plain Text - simple, copy-paste friendly format

use std::str::FromStr;

use chrono::Utc;

use crate::model::SearchHit;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Markdown with headers and metadata tables
    Markdown,
    /// JSON for programmatic consumption
    Json,
    /// Plain text for simple copy-paste
    #[default]
    PlainText,
}

impl ExportFormat {
    /// Get the display name for this format
    pub fn name(self) -> &'static str {
        match self {
            Self::Markdown => "Markdown",
            Self::Json => "JSON",
            Self::PlainText => "Plain Text",
        }
    }

    /// Get the file extension for this format
    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
            Self::PlainText => "txt",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "text" | "txt" | "plain" => Ok(Self::PlainText),
            other => Err(format!(
                "unknown format '{other}' (expected markdown, json, or text)"
            )),
        }
    }
}

/// Options for export customization
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Include the free-text body fields (description, content, snippet)
    pub include_body: bool,
    /// Include score in output
    pub include_score: bool,
    /// Total hit count reported by the engine (hits may be one page of it)
    pub total: u64,
    /// Query string (for header/metadata)
    pub query: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_body: false,
            include_score: true,
            total: 0,
            query: None,
        }
    }
}

/// Export search results to the specified format
pub fn export_results(hits: &[SearchHit], format: ExportFormat, options: &ExportOptions) -> String {
    match format {
        ExportFormat::Markdown => export_markdown(hits, options),
        ExportFormat::Json => export_json(hits, options),
        ExportFormat::PlainText => export_plain_text(hits, options),
    }
}

/// Remove the `<em>` markers the engine puts around highlighted terms.
pub fn strip_highlight_tags(text: &str) -> String {
    text.replace("<em>", "").replace("</em>", "")
}

/// Escape special Markdown characters to prevent formatting issues or injection.
fn escape_markdown(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace('*', "\\*")
        .replace('_', "\\_")
        .replace('[', "\\[")
        .replace(']', "\\]")
        .replace('<', "\\<")
        .replace('>', "\\>")
        .replace('`', "\\`")
}

/// Export to Markdown format
fn export_markdown(hits: &[SearchHit], options: &ExportOptions) -> String {
    let mut output = String::new();

    output.push_str("# Search Results\n\n");

    if let Some(query) = &options.query {
        output.push_str(&format!("**Query:** `{}`\n\n", query.replace('`', "")));
    }

    output.push_str(&format!(
        "**Shown:** {} of {} | **Exported:** {}\n\n",
        hits.len(),
        options.total,
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output.push_str("---\n\n");

    for (i, hit) in hits.iter().enumerate() {
        let safe_title = escape_markdown(&strip_highlight_tags(hit.display_title()));
        output.push_str(&format!("## {}. {}\n\n", i + 1, safe_title));

        output.push_str("| Field | Value |\n");
        output.push_str("|-------|-------|\n");
        output.push_str(&format!("| Id | `{}` |\n", hit.id.replace('`', "")));
        if !hit.event_date.is_empty() {
            output.push_str(&format!("| Date | {} |\n", escape_markdown(&hit.event_date)));
        }
        output.push_str(&format!("| Popularity | {} |\n", hit.popularity));
        if !hit.sport_type.is_empty() {
            output.push_str(&format!(
                "| Types | {} |\n",
                escape_markdown(&hit.sport_type.join(", "))
            ));
        }
        if options.include_score
            && let Some(score) = hit.score
        {
            output.push_str(&format!("| Score | {score:.2} |\n"));
        }
        output.push('\n');

        if options.include_body {
            for (label, text) in body_fields(hit) {
                if text.is_empty() {
                    continue;
                }
                output.push_str(&format!("### {label}\n\n"));
                output.push_str(&escape_markdown(text));
                output.push_str("\n\n");
            }
        }

        output.push_str("---\n\n");
    }

    output
}

/// Export to JSON format
fn export_json(hits: &[SearchHit], options: &ExportOptions) -> String {
    let export_data = serde_json::json!({
        "query": options.query,
        "count": hits.len(),
        "total": options.total,
        "exported_at": Utc::now().to_rfc3339(),
        "hits": hits.iter().map(|hit| {
            let mut obj = serde_json::json!({
                "id": hit.id,
                "title": hit.title,
                "event_date": hit.event_date,
                "popularity": hit.popularity,
                "sport_type": hit.sport_type,
            });

            if options.include_score {
                obj["score"] = serde_json::json!(hit.score);
            }
            if let Some(fragment) = &hit.title_snippet {
                obj["title_snippet"] = serde_json::json!(fragment);
            }
            if options.include_body {
                obj["description"] = serde_json::json!(hit.description);
                obj["content"] = serde_json::json!(hit.content);
                obj["snippet"] = serde_json::json!(hit.snippet);
            }

            obj
        }).collect::<Vec<_>>()
    });

    serde_json::to_string_pretty(&export_data).unwrap_or_else(|_| "{}".to_string())
}

/// Export to plain text format
fn export_plain_text(hits: &[SearchHit], options: &ExportOptions) -> String {
    let mut output = String::new();

    output.push_str("SEARCH RESULTS\n");
    output.push_str(&"=".repeat(60));
    output.push('\n');

    if let Some(query) = &options.query {
        output.push_str(&format!("Query: {query}\n"));
    }

    output.push_str(&format!(
        "Shown: {} of {} | Exported: {}\n",
        hits.len(),
        options.total,
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    for (i, hit) in hits.iter().enumerate() {
        output.push_str(&format!(
            "[{}] {}\n",
            i + 1,
            strip_highlight_tags(hit.display_title())
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        output.push_str(&format!("Id: {}\n", hit.id));
        if !hit.event_date.is_empty() {
            output.push_str(&format!("Date: {}\n", hit.event_date));
        }
        output.push_str(&format!("Popularity: {}\n", hit.popularity));
        if !hit.sport_type.is_empty() {
            output.push_str(&format!("Types: {}\n", hit.sport_type.join(", ")));
        }
        if options.include_score
            && let Some(score) = hit.score
        {
            output.push_str(&format!("Score: {score:.2}\n"));
        }

        if options.include_body {
            for (label, text) in body_fields(hit) {
                if text.is_empty() {
                    continue;
                }
                output.push_str(&format!("\n{label}:\n"));
                for line in text.lines() {
                    output.push_str(&format!("  {line}\n"));
                }
            }
        }

        output.push('\n');
    }

    output
}

fn body_fields(hit: &SearchHit) -> [(&'static str, &str); 3] {
    [
        ("Description", hit.description.as_str()),
        ("Content", hit.content.as_str()),
        ("Snippet", hit.snippet.as_str()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_hit() -> SearchHit {
        SearchHit {
            id: "iW8v".to_string(),
            score: Some(1.7),
            title: "City Marathon".to_string(),
            event_date: "1998-04-19".to_string(),
            popularity: 4,
            sport_type: vec!["running".to_string(), "road".to_string()],
            description: "Annual spring race".to_string(),
            content: String::new(),
            snippet: String::new(),
            title_snippet: Some("City <em>Marathon</em>".to_string()),
        }
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::PlainText);
        assert!("yaml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_strip_highlight_tags() {
        assert_eq!(strip_highlight_tags("City <em>Marathon</em>"), "City Marathon");
        assert_eq!(strip_highlight_tags("plain"), "plain");
    }

    #[test]
    fn test_export_markdown() {
        let hits = vec![sample_hit()];
        let options = ExportOptions {
            total: 12,
            query: Some("marathon".into()),
            ..ExportOptions::default()
        };
        let output = export_markdown(&hits, &options);

        assert!(output.contains("# Search Results"));
        assert!(output.contains("**Query:** `marathon`"));
        assert!(output.contains("**Shown:** 1 of 12"));
        assert!(output.contains("## 1. City Marathon"));
        assert!(output.contains("| Types | running, road |"));
        assert!(output.contains("| Score | 1.70 |"));
    }

    #[test]
    fn test_export_markdown_escapes_title() {
        let mut hit = sample_hit();
        hit.title = "[Link](javascript:alert(1))".to_string();
        hit.title_snippet = None;

        let output = export_markdown(&[hit], &ExportOptions::default());
        assert!(output.contains("\\[Link\\](javascript:alert(1))"));
    }

    #[test]
    fn test_export_json() {
        let hits = vec![sample_hit()];
        let options = ExportOptions {
            total: 2,
            ..ExportOptions::default()
        };
        let output = export_json(&hits, &options);

        assert!(output.contains("\"count\": 1"));
        assert!(output.contains("\"total\": 2"));
        assert!(output.contains("\"id\": \"iW8v\""));
        // body fields stay out unless asked for
        assert!(!output.contains("Annual spring race"));
    }

    #[test]
    fn test_export_json_with_body() {
        let hits = vec![sample_hit()];
        let options = ExportOptions {
            include_body: true,
            ..ExportOptions::default()
        };
        let output = export_json(&hits, &options);
        assert!(output.contains("Annual spring race"));
    }

    #[test]
    fn test_export_plain_text() {
        let hits = vec![sample_hit()];
        let output = export_plain_text(&hits, &ExportOptions::default());

        assert!(output.contains("SEARCH RESULTS"));
        assert!(output.contains("[1] City Marathon"));
        assert!(output.contains("Types: running, road"));
        assert!(!output.contains("<em>"));
    }
}
