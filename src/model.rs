//! Document and result types for the sports index.

use serde::{Deserialize, Serialize};

/// Highest allowed popularity rating.
pub const MAX_POPULARITY: u8 = 5;

/// A sports event document as sent to the engine.
///
/// Every field serializes even when blank: the engine receives empty
/// strings and empty lists rather than omitted keys, matching what the
/// add form submits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sport {
    pub title: String,
    pub event_date: String,
    pub popularity: u8,
    pub sport_type: Vec<String>,
    pub description: String,
    pub content: String,
    pub snippet: String,
}

impl Sport {
    /// Split comma-separated form input into the sport type list.
    pub fn parse_sport_types(input: &str) -> Vec<String> {
        input
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Clamp a raw rating into the 0..=5 range the form allows.
    pub fn clamp_popularity(value: i64) -> u8 {
        value.clamp(0, MAX_POPULARITY as i64) as u8
    }
}

/// A search result with its engine-assigned identity.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub score: Option<f64>,
    pub title: String,
    pub event_date: String,
    pub popularity: u8,
    pub sport_type: Vec<String>,
    pub description: String,
    pub content: String,
    pub snippet: String,
    /// Highlighted title fragment when the engine produced one.
    pub title_snippet: Option<String>,
}

impl SearchHit {
    /// The title to render: highlighted fragment with fallback to the raw field.
    pub fn display_title(&self) -> &str {
        self.title_snippet.as_deref().unwrap_or(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_document_serializes_every_key() {
        let doc = Sport::default();
        let json = serde_json::to_value(&doc).unwrap();

        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 7);
        assert_eq!(json["title"], "");
        assert_eq!(json["event_date"], "");
        assert_eq!(json["popularity"], 0);
        assert_eq!(json["sport_type"], serde_json::json!([]));
        assert_eq!(json["description"], "");
        assert_eq!(json["content"], "");
        assert_eq!(json["snippet"], "");
    }

    #[test]
    fn test_parse_sport_types() {
        assert_eq!(
            Sport::parse_sport_types("running, trail"),
            vec!["running".to_string(), "trail".to_string()]
        );
        assert_eq!(Sport::parse_sport_types("solo"), vec!["solo".to_string()]);
        assert!(Sport::parse_sport_types("").is_empty());
        assert!(Sport::parse_sport_types(" , ,").is_empty());
    }

    #[test]
    fn test_clamp_popularity() {
        assert_eq!(Sport::clamp_popularity(-3), 0);
        assert_eq!(Sport::clamp_popularity(2), 2);
        assert_eq!(Sport::clamp_popularity(9), 5);
    }

    #[test]
    fn test_display_title_prefers_highlight() {
        let mut hit = SearchHit {
            id: "1".into(),
            score: Some(1.0),
            title: "City Marathon".into(),
            event_date: "1998-04-19".into(),
            popularity: 4,
            sport_type: vec!["running".into()],
            description: String::new(),
            content: String::new(),
            snippet: String::new(),
            title_snippet: Some("City <em>Marathon</em>".into()),
        };
        assert_eq!(hit.display_title(), "City <em>Marathon</em>");
        hit.title_snippet = None;
        assert_eq!(hit.display_title(), "City Marathon");
    }
}
