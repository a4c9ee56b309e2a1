//! Facet definitions sent with every search.
//!
//! Three facets mirror the sidebar: a value facet over the keyword
//! sub-field of the title, a popularity range facet, and a relative-age
//! range facet over the event date. Bucket boundaries for the age facet are
//! computed from the current clock, so callers pass `now` explicitly.

use chrono::{DateTime, Months, SecondsFormat, Utc};
use serde_json::{Value, json};

/// Number of title values requested for the value facet.
pub const TITLE_FACET_SIZE: usize = 10;

/// Relative-age buckets for the event date facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBucket {
    Within30Years,
    Between30And70Years,
    Over70Years,
}

impl AgeBucket {
    pub fn all() -> &'static [AgeBucket] {
        &[
            AgeBucket::Within30Years,
            AgeBucket::Between30And70Years,
            AgeBucket::Over70Years,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Within30Years => "Within the last 30 years",
            Self::Between30And70Years => "30 - 70 years ago",
            Self::Over70Years => "More than 70 years ago",
        }
    }
}

/// Popularity buckets, lowest rating first.
pub fn popularity_buckets() -> Vec<(u8, &'static str)> {
    vec![
        (1, "1 & more"),
        (2, "2 & more"),
        (3, "3 & more"),
        (4, "4 & more"),
        (5, "5 (max)"),
    ]
}

/// The aggregation section attached to every search request.
pub fn aggregations(now: DateTime<Utc>) -> Value {
    let popularity_ranges: Vec<Value> = popularity_buckets()
        .into_iter()
        .map(|(from, key)| json!({"key": key, "from": from}))
        .collect();

    json!({
        "title_keyword": {
            "terms": {"field": "title_keyword", "size": TITLE_FACET_SIZE}
        },
        "popularity": {
            "range": {"field": "popularity", "ranges": popularity_ranges}
        },
        "event_date": {
            "date_range": {
                "field": "event_date",
                "ranges": [
                    {
                        "key": AgeBucket::Within30Years.label(),
                        "from": years_ago(now, 30),
                    },
                    {
                        "key": AgeBucket::Between30And70Years.label(),
                        "from": years_ago(now, 70),
                        "to": years_ago(now, 30),
                    },
                    {
                        "key": AgeBucket::Over70Years.label(),
                        "to": years_ago(now, 70),
                    },
                ],
            }
        },
    })
}

/// Facet buckets the user has selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacetSelection {
    /// Exact title value from the value facet.
    pub title: Option<String>,
    /// Lower popularity bound from the range facet.
    pub min_popularity: Option<u8>,
    /// Relative-age bucket from the date facet.
    pub age: Option<AgeBucket>,
}

impl FacetSelection {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Filter clauses matching the selected buckets.
    ///
    /// Range facets use `gte`/`lt` so the clauses reproduce the
    /// inclusive-from, exclusive-to convention of the aggregations.
    pub fn filter_clauses(&self, now: DateTime<Utc>) -> Vec<Value> {
        let mut clauses = Vec::new();

        if let Some(title) = &self.title {
            clauses.push(json!({"term": {"title_keyword": title}}));
        }
        if let Some(min) = self.min_popularity {
            clauses.push(json!({"range": {"popularity": {"gte": min}}}));
        }
        if let Some(age) = self.age {
            let clause = match age {
                AgeBucket::Within30Years => json!({"gte": years_ago(now, 30)}),
                AgeBucket::Between30And70Years => {
                    json!({"gte": years_ago(now, 70), "lt": years_ago(now, 30)})
                }
                AgeBucket::Over70Years => json!({"lt": years_ago(now, 70)}),
            };
            clauses.push(json!({"range": {"event_date": clause}}));
        }

        clauses
    }
}

/// Combine the rewritten query with facet filters.
///
/// Returns `None` when there is neither, so the engine default stands.
pub fn wrap_query(query: Option<Value>, filters: Vec<Value>) -> Option<Value> {
    if filters.is_empty() {
        return query;
    }
    match query {
        Some(q) => Some(json!({"bool": {"must": [q], "filter": filters}})),
        None => Some(json!({"bool": {"filter": filters}})),
    }
}

/// Bucket counts parsed out of an aggregation response.
#[derive(Debug, Clone, Default)]
pub struct FacetCounts {
    pub titles: Vec<(String, u64)>,
    pub popularity: Vec<(String, u64)>,
    pub event_date: Vec<(String, u64)>,
}

/// Read the counts back out of the engine's `aggregations` section.
///
/// Unknown or missing sections come back empty; the sidebar just renders
/// fewer rows.
pub fn parse_aggregations(aggs: &Value) -> FacetCounts {
    FacetCounts {
        titles: buckets_of(&aggs["title_keyword"]),
        popularity: buckets_of(&aggs["popularity"]),
        event_date: buckets_of(&aggs["event_date"]),
    }
}

fn buckets_of(agg: &Value) -> Vec<(String, u64)> {
    let Some(buckets) = agg["buckets"].as_array() else {
        return Vec::new();
    };
    buckets
        .iter()
        .filter_map(|b| {
            let key = b["key"].as_str().map(str::to_string).or_else(|| {
                // terms buckets over numeric fields report numeric keys
                b["key"].as_u64().map(|k| k.to_string())
            })?;
            Some((key, b["doc_count"].as_u64().unwrap_or(0)))
        })
        .collect()
}

fn years_ago(now: DateTime<Utc>, years: u32) -> String {
    now.checked_sub_months(Months::new(years * 12))
        .unwrap_or(now)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 4, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_aggregations_shape() {
        let aggs = aggregations(fixed_now());

        assert_eq!(aggs["title_keyword"]["terms"]["field"], "title_keyword");
        assert_eq!(aggs["title_keyword"]["terms"]["size"], 10);

        let pop = aggs["popularity"]["range"]["ranges"].as_array().unwrap();
        assert_eq!(pop.len(), 5);
        assert_eq!(pop[0], json!({"key": "1 & more", "from": 1}));
        assert_eq!(pop[4], json!({"key": "5 (max)", "from": 5}));

        let dates = aggs["event_date"]["date_range"]["ranges"]
            .as_array()
            .unwrap();
        assert_eq!(dates.len(), 3);
        assert_eq!(dates[0]["from"], "1996-08-04T12:00:00Z");
        assert_eq!(dates[1]["from"], "1956-08-04T12:00:00Z");
        assert_eq!(dates[1]["to"], "1996-08-04T12:00:00Z");
        assert_eq!(dates[2]["to"], "1956-08-04T12:00:00Z");
        assert!(dates[0].get("to").is_none());
        assert!(dates[2].get("from").is_none());
    }

    #[test]
    fn test_empty_selection_has_no_clauses() {
        let selection = FacetSelection::default();
        assert!(selection.is_empty());
        assert!(selection.filter_clauses(fixed_now()).is_empty());
    }

    #[test]
    fn test_selection_filter_clauses() {
        let selection = FacetSelection {
            title: Some("City Marathon".into()),
            min_popularity: Some(3),
            age: Some(AgeBucket::Between30And70Years),
        };
        let clauses = selection.filter_clauses(fixed_now());

        assert_eq!(clauses[0], json!({"term": {"title_keyword": "City Marathon"}}));
        assert_eq!(clauses[1], json!({"range": {"popularity": {"gte": 3}}}));
        assert_eq!(
            clauses[2],
            json!({"range": {"event_date": {
                "gte": "1956-08-04T12:00:00Z",
                "lt": "1996-08-04T12:00:00Z",
            }}})
        );
    }

    #[test]
    fn test_wrap_query_combinations() {
        let query = json!({"match": {"description": "goal"}});
        let filter = json!({"range": {"popularity": {"gte": 2}}});

        assert_eq!(wrap_query(None, Vec::new()), None);
        assert_eq!(
            wrap_query(Some(query.clone()), Vec::new()),
            Some(query.clone())
        );
        assert_eq!(
            wrap_query(None, vec![filter.clone()]),
            Some(json!({"bool": {"filter": [filter.clone()]}}))
        );
        assert_eq!(
            wrap_query(Some(query.clone()), vec![filter.clone()]),
            Some(json!({"bool": {"must": [query], "filter": [filter]}}))
        );
    }

    #[test]
    fn test_parse_aggregations() {
        let response = json!({
            "title_keyword": {"buckets": [
                {"key": "City Marathon", "doc_count": 3},
                {"key": "Derby", "doc_count": 1},
            ]},
            "popularity": {"buckets": [
                {"key": "1 & more", "from": 1.0, "doc_count": 4},
            ]},
            "event_date": {"buckets": [
                {"key": "Within the last 30 years", "doc_count": 2},
            ]},
        });

        let counts = parse_aggregations(&response);
        assert_eq!(counts.titles.len(), 2);
        assert_eq!(counts.titles[0], ("City Marathon".to_string(), 3));
        assert_eq!(counts.popularity, vec![("1 & more".to_string(), 4)]);
        assert_eq!(
            counts.event_date,
            vec![("Within the last 30 years".to_string(), 2)]
        );
    }

    #[test]
    fn test_parse_aggregations_missing_sections() {
        let counts = parse_aggregations(&json!({}));
        assert!(counts.titles.is_empty());
        assert!(counts.popularity.is_empty());
        assert!(counts.event_date.is_empty());
    }
}
