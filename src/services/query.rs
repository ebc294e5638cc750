// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Filter composition for the listing endpoints.
//!
//! Every parameter is optional and parameter groups combine with AND
//! semantics. A value that does not parse is treated as if it were absent.

use crate::time_utils::{parse_date_param, to_bson_datetime};
use mongodb::bson::{doc, Bson, Document};
use serde::Deserialize;

/// Query string of `GET /api/challenges`.
///
/// Fields are kept as raw strings so that malformed numbers or dates never
/// reject the request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeQuery {
    /// Comma-separated category names
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub min_participants: Option<String>,
    pub max_participants: Option<String>,
    /// Substring matched against title or description
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ChallengeQuery {
    /// Build the challenge filter. An empty query matches everything.
    pub fn to_filter(&self) -> Document {
        let mut filter = Document::new();

        if let Some(categories) = category_clause(self.category.as_deref()) {
            filter.insert("category", categories);
        }

        let start = self.start_date.as_deref().and_then(date_param);
        let end = self.end_date.as_deref().and_then(date_param);
        if let Some(range) = range_clause(start, end) {
            filter.insert("startDate", range);
        }

        let min = self.min_participants.as_deref().and_then(int_param);
        let max = self.max_participants.as_deref().and_then(int_param);
        if let Some(range) = range_clause(min, max) {
            filter.insert("participants", range);
        }

        if let Some(search) = search_clause(self.search.as_deref()) {
            filter.insert("$or", search);
        }

        filter
    }
}

/// Query string of `GET /api/blogs`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogQuery {
    pub category: Option<String>,
    pub author_email: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl BlogQuery {
    pub fn to_filter(&self) -> Document {
        let mut filter = Document::new();

        if let Some(categories) = category_clause(self.category.as_deref()) {
            filter.insert("category", categories);
        }
        if let Some(email) = non_blank(self.author_email.as_deref()) {
            filter.insert("authorEmail", email);
        }

        filter
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// `{$in: [...]}` over a comma-separated list, or `None` if the list is empty.
pub fn category_clause(raw: Option<&str>) -> Option<Document> {
    let categories: Vec<&str> = raw?
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();

    if categories.is_empty() {
        return None;
    }
    Some(doc! { "$in": categories })
}

/// Inclusive `$gte`/`$lte` bounds; either side may be missing.
pub fn range_clause<T: Into<Bson>>(min: Option<T>, max: Option<T>) -> Option<Document> {
    let mut range = Document::new();
    if let Some(min) = min {
        range.insert("$gte", min);
    }
    if let Some(max) = max {
        range.insert("$lte", max);
    }
    (!range.is_empty()).then_some(range)
}

/// Case-insensitive literal substring match on title or description.
pub fn search_clause(raw: Option<&str>) -> Option<Vec<Document>> {
    let pattern = regex::escape(non_blank(raw)?);
    Some(vec![
        doc! { "title": { "$regex": pattern.as_str(), "$options": "i" } },
        doc! { "description": { "$regex": pattern.as_str(), "$options": "i" } },
    ])
}

fn int_param(raw: &str) -> Option<i64> {
    let parsed = raw.trim().parse::<i64>().ok();
    if parsed.is_none() {
        tracing::debug!(value = raw, "Ignoring non-numeric filter parameter");
    }
    parsed
}

fn date_param(raw: &str) -> Option<Bson> {
    let parsed = parse_date_param(raw);
    if parsed.is_none() {
        tracing::debug!(value = raw, "Ignoring unparseable date parameter");
    }
    parsed.map(|date| Bson::DateTime(to_bson_datetime(date)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;

    fn query() -> ChallengeQuery {
        ChallengeQuery::default()
    }

    #[test]
    fn test_empty_query_matches_all() {
        assert_eq!(query().to_filter(), doc! {});
        assert_eq!(BlogQuery::default().to_filter(), doc! {});
    }

    #[test]
    fn test_category_list() {
        let q = ChallengeQuery {
            category: Some("Waste Reduction, Green Living,".to_string()),
            ..query()
        };
        assert_eq!(
            q.to_filter(),
            doc! { "category": { "$in": ["Waste Reduction", "Green Living"] } }
        );

        let blank = ChallengeQuery {
            category: Some(" , ".to_string()),
            ..query()
        };
        assert_eq!(blank.to_filter(), doc! {});
    }

    #[test]
    fn test_date_bounds_are_independent() {
        let only_start = ChallengeQuery {
            start_date: Some("2024-02-01".to_string()),
            ..query()
        };
        let expected = bson::DateTime::from_millis(1_706_745_600_000);
        assert_eq!(
            only_start.to_filter(),
            doc! { "startDate": { "$gte": expected } }
        );

        let both = ChallengeQuery {
            start_date: Some("2024-02-01".to_string()),
            end_date: Some("2024-03-01T00:00:00Z".to_string()),
            ..query()
        };
        let range = both.to_filter();
        let range = range.get_document("startDate").unwrap();
        assert!(range.contains_key("$gte"));
        assert!(range.contains_key("$lte"));
    }

    #[test]
    fn test_unparseable_values_are_absent() {
        let q = ChallengeQuery {
            min_participants: Some("lots".to_string()),
            max_participants: Some("50".to_string()),
            end_date: Some("someday".to_string()),
            ..query()
        };
        assert_eq!(q.to_filter(), doc! { "participants": { "$lte": 50_i64 } });

        let none_valid = ChallengeQuery {
            min_participants: Some("NaN".to_string()),
            ..query()
        };
        assert_eq!(none_valid.to_filter(), doc! {});
    }

    #[test]
    fn test_search_is_escaped_or_group() {
        let q = ChallengeQuery {
            search: Some("C++ (beta)".to_string()),
            category: Some("Green Living".to_string()),
            ..query()
        };
        let filter = q.to_filter();

        let or = filter.get_array("$or").unwrap();
        assert_eq!(or.len(), 2);
        let title = or[0].as_document().unwrap().get_document("title").unwrap();
        assert_eq!(title.get_str("$regex").unwrap(), r"C\+\+ \(beta\)");
        assert_eq!(title.get_str("$options").unwrap(), "i");
        assert!(filter.contains_key("category"));
    }

    #[test]
    fn test_blog_filter() {
        let q = BlogQuery {
            category: Some("Recycling".to_string()),
            author_email: Some("sarah@example.com".to_string()),
            ..BlogQuery::default()
        };
        assert_eq!(
            q.to_filter(),
            doc! {
                "category": { "$in": ["Recycling"] },
                "authorEmail": "sarah@example.com",
            }
        );
    }
}
