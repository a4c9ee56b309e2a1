use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::model::{SearchHit, Sport};

/// Envelope of a `_search` response.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub took: u64,
    pub hits: HitsEnvelope,
    #[serde(default)]
    pub aggregations: Option<Value>,
}

impl SearchResponse {
    /// Convert the raw hits into the read model, consuming the response.
    pub fn into_hits(self) -> Vec<SearchHit> {
        self.hits.hits.into_iter().map(RawHit::into_hit).collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct HitsEnvelope {
    pub total: TotalHits,
    pub hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
pub struct TotalHits {
    pub value: u64,
    #[serde(default)]
    pub relation: String,
}

/// One hit as the engine reports it.
#[derive(Debug, Deserialize)]
pub struct RawHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score")]
    pub score: Option<f64>,
    #[serde(rename = "_source", default)]
    pub source: Value,
    #[serde(default)]
    pub highlight: Option<HashMap<String, Vec<String>>>,
}

impl RawHit {
    pub fn into_hit(self) -> SearchHit {
        let title_snippet = self
            .highlight
            .as_ref()
            .and_then(|h| h.get("title"))
            .and_then(|fragments| fragments.first())
            .cloned();

        SearchHit {
            id: self.id,
            score: self.score,
            title: str_field(&self.source, "title"),
            event_date: str_field(&self.source, "event_date"),
            popularity: Sport::clamp_popularity(self.source["popularity"].as_i64().unwrap_or(0)),
            sport_type: list_field(&self.source, "sport_type"),
            description: str_field(&self.source, "description"),
            content: str_field(&self.source, "content"),
            snippet: str_field(&self.source, "snippet"),
            title_snippet,
        }
    }
}

/// Response to indexing a document.
#[derive(Debug, Deserialize)]
pub struct IndexedDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub result: String,
}

/// Response to deleting a document.
#[derive(Debug, Deserialize)]
pub struct DeletedDoc {
    pub result: String,
}

/// The engine's root banner.
#[derive(Debug, Deserialize)]
pub struct EngineInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cluster_name: String,
    pub version: EngineVersion,
}

#[derive(Debug, Deserialize)]
pub struct EngineVersion {
    pub number: String,
}

fn str_field(source: &Value, name: &str) -> String {
    source[name].as_str().unwrap_or_default().to_string()
}

fn list_field(source: &Value, name: &str) -> Vec<String> {
    match &source[name] {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::to_string)
            .collect(),
        // single-valued keyword fields come back as a bare string
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_response() -> Value {
        json!({
            "took": 4,
            "timed_out": false,
            "hits": {
                "total": {"value": 2, "relation": "eq"},
                "max_score": 1.7,
                "hits": [
                    {
                        "_index": "sports",
                        "_id": "iW8v",
                        "_score": 1.7,
                        "_source": {
                            "title": "City Marathon",
                            "event_date": "1998-04-19",
                            "popularity": 4,
                            "sport_type": ["running", "road"],
                            "description": "Annual race",
                            "content": "",
                            "snippet": "",
                        },
                        "highlight": {"title": ["City <em>Marathon</em>"]}
                    },
                    {
                        "_index": "sports",
                        "_id": "xQ1p",
                        "_score": 0.4,
                        "_source": {"title": "Derby", "sport_type": "horse racing"}
                    }
                ]
            },
            "aggregations": {
                "popularity": {"buckets": []}
            }
        })
    }

    #[test]
    fn test_parse_search_response() {
        let response: SearchResponse = serde_json::from_value(sample_response()).unwrap();
        assert_eq!(response.took, 4);
        assert_eq!(response.hits.total.value, 2);
        assert_eq!(response.hits.total.relation, "eq");
        assert!(response.aggregations.is_some());

        let hits = response.into_hits();
        assert_eq!(hits.len(), 2);

        let first = &hits[0];
        assert_eq!(first.id, "iW8v");
        assert_eq!(first.title, "City Marathon");
        assert_eq!(first.popularity, 4);
        assert_eq!(first.sport_type, vec!["running", "road"]);
        assert_eq!(first.display_title(), "City <em>Marathon</em>");
    }

    #[test]
    fn test_sparse_source_defaults_to_blank_fields() {
        let response: SearchResponse = serde_json::from_value(sample_response()).unwrap();
        let hits = response.into_hits();

        let sparse = &hits[1];
        assert_eq!(sparse.title, "Derby");
        assert_eq!(sparse.event_date, "");
        assert_eq!(sparse.popularity, 0);
        assert_eq!(sparse.sport_type, vec!["horse racing"]);
        assert_eq!(sparse.display_title(), "Derby");
    }

    #[test]
    fn test_parse_mutation_responses() {
        let indexed: IndexedDoc =
            serde_json::from_value(json!({"_id": "abc", "result": "created", "_index": "sports"}))
                .unwrap();
        assert_eq!(indexed.id, "abc");
        assert_eq!(indexed.result, "created");

        let deleted: DeletedDoc = serde_json::from_value(json!({"result": "deleted"})).unwrap();
        assert_eq!(deleted.result, "deleted");
    }
}
