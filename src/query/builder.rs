use serde_json::{Value, json};

use crate::config::{PrefixRule, SearchConfig, SearchField};

/// Rewrites raw search-box text into an engine query document.
///
/// The rules, checked in order:
/// - empty text produces no override, so the caller's default query stands;
/// - text starting with a configured prefix (for example `description:=` or
///   the shorthand `d=`) becomes an exact match on that prefix's field, with
///   the prefix stripped;
/// - anything else becomes a fuzzy multi-field match over the configured
///   fields with their boosts.
///
/// Input that merely resembles a prefix (`description:`) falls through to
/// the multi-field branch.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    fields: Vec<SearchField>,
    prefixes: Vec<PrefixRule>,
}

impl QueryBuilder {
    pub fn new(fields: Vec<SearchField>, prefixes: Vec<PrefixRule>) -> Self {
        Self { fields, prefixes }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.fields.clone(), config.prefixes.clone())
    }

    /// Apply the rewrite to a full request body.
    ///
    /// Leaves the body untouched when the text is empty.
    pub fn rewrite(&self, body: &mut Value, text: &str) {
        if let Some(query) = self.query_for(text) {
            body["query"] = query;
        }
    }

    /// The query document for the given text, or `None` when it is empty.
    pub fn query_for(&self, text: &str) -> Option<Value> {
        if text.is_empty() {
            return None;
        }

        for rule in &self.prefixes {
            if let Some(rest) = text.strip_prefix(rule.prefix.as_str()) {
                return Some(json!({
                    "match": { (rule.field.as_str()): rest }
                }));
            }
        }

        Some(json!({
            "multi_match": {
                "query": text,
                "fields": self.field_specs(),
                "fuzziness": "AUTO",
                "prefix_length": 2,
            }
        }))
    }

    /// Fields rendered as `name^weight`, defaulting the weight to 1.
    fn field_specs(&self) -> Vec<String> {
        self.fields.iter().map(field_spec).collect()
    }
}

fn field_spec(field: &SearchField) -> String {
    let weight = field.weight.unwrap_or(1.0);
    if weight.fract() == 0.0 {
        format!("{}^{}", field.name, weight as i64)
    } else {
        format!("{}^{}", field.name, weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_builder() -> QueryBuilder {
        QueryBuilder::from_config(&SearchConfig::default())
    }

    #[test]
    fn test_empty_text_is_no_override() {
        assert_eq!(default_builder().query_for(""), None);
    }

    #[test]
    fn test_empty_text_leaves_body_untouched() {
        let mut body = json!({"query": {"match_all": {}}, "size": 20});
        let before = body.clone();
        default_builder().rewrite(&mut body, "");
        assert_eq!(body, before);
    }

    #[test]
    fn test_prefixed_text_becomes_single_field_match() {
        let query = default_builder().query_for("d=soccer").unwrap();
        assert_eq!(query, json!({"match": {"description": "soccer"}}));

        let query = default_builder().query_for("description:=soccer").unwrap();
        assert_eq!(query, json!({"match": {"description": "soccer"}}));
    }

    #[test]
    fn test_prefix_with_empty_remainder_still_matches() {
        let query = default_builder().query_for("c=").unwrap();
        assert_eq!(query, json!({"match": {"content": ""}}));
    }

    #[test]
    fn test_first_matching_prefix_wins() {
        let builder = QueryBuilder::new(
            vec![SearchField::new("title")],
            vec![
                PrefixRule::new("x=", "description"),
                PrefixRule::new("x=", "content"),
            ],
        );
        let query = builder.query_for("x=goal").unwrap();
        assert_eq!(query, json!({"match": {"description": "goal"}}));
    }

    #[test]
    fn test_plain_text_becomes_multi_match() {
        let query = default_builder().query_for("marathon").unwrap();
        assert_eq!(
            query,
            json!({
                "multi_match": {
                    "query": "marathon",
                    "fields": ["title^1", "sport_type^1"],
                    "fuzziness": "AUTO",
                    "prefix_length": 2,
                }
            })
        );
    }

    #[test]
    fn test_malformed_prefix_falls_through() {
        let query = default_builder().query_for("description:soccer").unwrap();
        assert!(query.get("multi_match").is_some());
    }

    #[test]
    fn test_configured_weights_render_in_field_specs() {
        let builder = QueryBuilder::new(
            vec![
                SearchField::weighted("title", 2.5),
                SearchField::weighted("description", 3.0),
                SearchField::new("sport_type"),
            ],
            Vec::new(),
        );
        let query = builder.query_for("goal").unwrap();
        assert_eq!(
            query["multi_match"]["fields"],
            json!(["title^2.5", "description^3", "sport_type^1"])
        );
    }
}
