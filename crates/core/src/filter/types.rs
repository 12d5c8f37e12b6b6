/// Filter values for the remote store's delete endpoint.
///
/// A filter is shaped `{ field: { operator: value } }`, for example
/// `{"document_id": {"$eq": "9fbe..."}}`. It is a wire value only and is
/// built fresh for every request.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::DocumentId;

pub const DOCUMENT_ID_FIELD: &str = "document_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "$eq")]
    Eq,
    #[serde(rename = "$ne")]
    Ne,
    #[serde(rename = "$in")]
    In,
    #[serde(rename = "$nin")]
    NotIn,
    #[serde(rename = "$gt")]
    Gt,
    #[serde(rename = "$gte")]
    Gte,
    #[serde(rename = "$lt")]
    Lt,
    #[serde(rename = "$lte")]
    Lte,
    #[serde(rename = "$like")]
    Like,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(BTreeMap<String, BTreeMap<Operator, Value>>);

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter matching exactly one document.
    pub fn document_id(id: &DocumentId) -> Self {
        Self::new().with(DOCUMENT_ID_FIELD, Operator::Eq, id.as_str())
    }

    /// Add a condition. A second condition on the same field and operator
    /// replaces the first.
    pub fn with(mut self, field: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        self.0
            .entry(field.into())
            .or_default()
            .insert(op, value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn condition(&self, field: &str, op: Operator) -> Option<&Value> {
        self.0.get(field).and_then(|ops| ops.get(&op))
    }

    /// Compact JSON, as sent in the `filters` query parameter.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Body of `DELETE delete` when the filter travels in the request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub filters: Filter,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_id_filter_shape() {
        let id = DocumentId::parse("doc-1").unwrap();
        let filter = Filter::document_id(&id);
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({"document_id": {"$eq": "doc-1"}})
        );
        assert_eq!(filter.to_json(), r#"{"document_id":{"$eq":"doc-1"}}"#);
    }

    #[test]
    fn multiple_conditions() {
        let filter = Filter::new()
            .with("document_id", Operator::In, json!(["a", "b"]))
            .with("user_id", Operator::Ne, "u1");
        assert_eq!(
            filter.condition("document_id", Operator::In),
            Some(&json!(["a", "b"]))
        );
        assert_eq!(filter.condition("user_id", Operator::Eq), None);
    }

    #[test]
    fn delete_request_body() {
        let id = DocumentId::parse("doc-1").unwrap();
        let body = DeleteRequest {
            filters: Filter::document_id(&id),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"filters": {"document_id": {"$eq": "doc-1"}}})
        );
    }

    #[test]
    fn parse_filter_from_json() {
        let filter: Filter =
            serde_json::from_value(json!({"title": {"$like": "%report%"}})).unwrap();
        assert_eq!(
            filter.condition("title", Operator::Like),
            Some(&json!("%report%"))
        );
        assert!(!filter.is_empty());
    }
}
