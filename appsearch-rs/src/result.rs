//! Typed views over the backend's search response JSON.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// A parsed search response.
///
/// `results` and `meta` always come from the primary query; `info.facets`
/// may have entries patched in from auxiliary disjunctive-facet queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<ResultItem>,
    #[serde(default)]
    pub info: ResponseInfo,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub meta: Value,
}

/// The response's `info` block: facet data plus whatever else the backend
/// chooses to report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResponseInfo {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub facets: BTreeMap<String, Vec<FacetResult>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One computed facet for a field, in backend order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetResult {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Vec<FacetCount>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single value/count pair within a facet. Ordering is the backend's;
/// the client never re-sorts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: Value,
    pub count: u64,
}

/// One search result record.
///
/// Field values are exposed exactly as returned. If the record carried a
/// `_group` array (grouped/collapsed results), each member is itself a
/// `ResultItem`, wrapped with the same rule at any depth.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultItem {
    data: Value,
    group: Vec<ResultItem>,
}

impl ResultItem {
    /// Wrap a raw record, recursively wrapping `_group` members.
    pub fn from_value(mut value: Value) -> Self {
        let group = match &mut value {
            Value::Object(record) => match record.remove("_group") {
                Some(Value::Array(members)) => {
                    members.into_iter().map(ResultItem::from_value).collect()
                }
                Some(other) => {
                    // not the grouped-results shape; leave it as a field
                    record.insert("_group".to_string(), other);
                    Vec::new()
                }
                None => Vec::new(),
            },
            _ => Vec::new(),
        };
        ResultItem { data: value, group }
    }

    /// Access a field of the record.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// The record's fields, without `_group`.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Grouped sub-results, empty unless the record carried `_group`.
    pub fn group(&self) -> &[ResultItem] {
        &self.group
    }
}

impl Serialize for ResultItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.group.is_empty() {
            return self.data.serialize(serializer);
        }
        // re-nest the wrapped group under its original key
        use serde::ser::SerializeMap;
        match &self.data {
            Value::Object(record) => {
                let mut map = serializer.serialize_map(Some(record.len() + 1))?;
                for (key, value) in record {
                    map.serialize_entry(key, value)?;
                }
                map.serialize_entry("_group", &self.group)?;
                map.end()
            }
            other => other.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ResultItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if !value.is_object() {
            return Err(D::Error::custom("result record must be a JSON object"));
        }
        Ok(ResultItem::from_value(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn wraps_group_members_recursively() {
        let item = ResultItem::from_value(json!({
            "id": {"raw": "express"},
            "_group": [
                {"id": {"raw": "connect"}, "_group": [{"id": {"raw": "qs"}}]},
                {"id": {"raw": "body-parser"}}
            ]
        }));
        assert_eq!(item.get("id"), Some(&json!({"raw": "express"})));
        assert_eq!(item.group().len(), 2);
        assert_eq!(item.group()[0].group().len(), 1);
        assert_eq!(
            item.group()[0].group()[0].get("id"),
            Some(&json!({"raw": "qs"}))
        );
        // _group is lifted out of the raw field map
        assert_eq!(item.get("_group"), None);
    }

    #[test]
    fn serializes_back_to_the_original_shape() {
        let raw = json!({
            "id": {"raw": "express"},
            "_group": [{"id": {"raw": "connect"}}]
        });
        let item = ResultItem::from_value(raw.clone());
        assert_eq!(serde_json::to_value(&item).unwrap(), raw);
    }

    #[test]
    fn response_parses_facets_in_backend_order() {
        let response: SearchResponse = serde_json::from_value(json!({
            "results": [{"id": {"raw": "express"}}],
            "info": {
                "facets": {
                    "license": [{
                        "type": "value",
                        "data": [
                            {"value": "MIT", "count": 101},
                            {"value": "BSD", "count": 33}
                        ]
                    }]
                }
            },
            "meta": {"page": {"current": 1}}
        }))
        .unwrap();

        let facet = &response.info.facets["license"][0];
        assert_eq!(facet.kind, "value");
        assert_eq!(facet.data[0].value, json!("MIT"));
        assert_eq!(facet.data[0].count, 101);
        assert_eq!(facet.data[1].value, json!("BSD"));
        assert_eq!(response.meta, json!({"page": {"current": 1}}));
    }

    #[test]
    fn missing_blocks_default_to_empty() {
        let response: SearchResponse =
            serde_json::from_value(json!({"results": []})).unwrap();
        assert!(response.info.facets.is_empty());
        assert!(response.meta.is_null());
    }
}
