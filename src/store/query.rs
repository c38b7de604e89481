use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;

pub const CREATED_AT: &str = "$createdAt";

/// Filter, sort and pagination options for a listing.
///
/// Only the operators the dashboard needs are modelled. Appwrite receives
/// them as JSON query strings, the in-memory store evaluates them directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub created_after: Option<DateTime<Utc>>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_until: Option<DateTime<Utc>>,
    pub search: Option<(String, String)>,
    pub order_desc: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strictly after `at`.
    pub fn created_after(mut self, at: DateTime<Utc>) -> Self {
        self.created_after = Some(at);
        self
    }

    /// Inclusive creation-time range.
    pub fn created_between(mut self, from: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        self.created_from = Some(from);
        self.created_until = Some(until);
        self
    }

    pub fn search(mut self, attribute: &str, term: &str) -> Self {
        self.search = Some((attribute.to_string(), term.to_string()));
        self
    }

    pub fn order_desc(mut self, attribute: &str) -> Self {
        self.order_desc = Some(attribute.to_string());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Encode as Appwrite `queries[]` values.
    pub fn to_params(&self) -> Vec<String> {
        let stamp = |at: &DateTime<Utc>| at.to_rfc3339_opts(SecondsFormat::Millis, false);
        let mut params = Vec::new();
        if let Some(at) = &self.created_after {
            params.push(json!({"method": "greaterThan", "attribute": CREATED_AT, "values": [stamp(at)]}));
        }
        if let Some(at) = &self.created_from {
            params.push(json!({"method": "greaterThanEqual", "attribute": CREATED_AT, "values": [stamp(at)]}));
        }
        if let Some(at) = &self.created_until {
            params.push(json!({"method": "lessThanEqual", "attribute": CREATED_AT, "values": [stamp(at)]}));
        }
        if let Some((attribute, term)) = &self.search {
            params.push(json!({"method": "search", "attribute": attribute, "values": [term]}));
        }
        if let Some(attribute) = &self.order_desc {
            params.push(json!({"method": "orderDesc", "attribute": attribute}));
        }
        if let Some(limit) = self.limit {
            params.push(json!({"method": "limit", "values": [limit]}));
        }
        if let Some(offset) = self.offset {
            params.push(json!({"method": "offset", "values": [offset]}));
        }
        params.into_iter().map(|p| p.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn empty_query_has_no_params() {
        assert!(Query::new().to_params().is_empty());
    }

    #[test]
    fn range_and_paging_params() {
        let from = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let until = Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 59).unwrap();
        let params = Query::new()
            .created_between(from, until)
            .order_desc(CREATED_AT)
            .limit(5)
            .offset(10)
            .to_params();
        assert_eq!(params.len(), 5);
        assert_eq!(
            params[0],
            r#"{"attribute":"$createdAt","method":"greaterThanEqual","values":["2024-03-01T00:00:00.000+00:00"]}"#
        );
        assert!(params[2].contains("orderDesc"));
        assert_eq!(params[3], r#"{"method":"limit","values":[5]}"#);
        assert_eq!(params[4], r#"{"method":"offset","values":[10]}"#);
    }

    #[test]
    fn search_param_carries_attribute() {
        let params = Query::new().search("username", "ali").to_params();
        assert_eq!(params, vec![r#"{"attribute":"username","method":"search","values":["ali"]}"#.to_string()]);
    }
}
