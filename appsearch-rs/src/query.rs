//! Search options and backend query construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ClientError, Result};
use crate::filters::{self, Filter};

/// Pagination spec, passed through to the backend as `page`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Page {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<u64>,
}

/// One facet computation over a field, e.g. `{"type": "value", "size": 3}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Extra spec fields passed through verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FacetSpec {
    /// A value facet with the given page size.
    pub fn value(size: u64) -> Self {
        FacetSpec {
            kind: "value".to_string(),
            size: Some(size),
            extra: Map::new(),
        }
    }
}

/// A field's facet specs: either one bare spec or a list of them.
///
/// The backend and callers both allow the bare form; it is normalized to a
/// single-element list when the request is built so downstream code only
/// ever deals with lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacetSpecs {
    One(FacetSpec),
    Many(Vec<FacetSpec>),
}

impl FacetSpecs {
    pub fn to_vec(&self) -> Vec<FacetSpec> {
        match self {
            FacetSpecs::One(spec) => vec![spec.clone()],
            FacetSpecs::Many(specs) => specs.clone(),
        }
    }
}

impl From<FacetSpec> for FacetSpecs {
    fn from(spec: FacetSpec) -> Self {
        FacetSpecs::One(spec)
    }
}

impl From<Vec<FacetSpec>> for FacetSpecs {
    fn from(specs: Vec<FacetSpec>) -> Self {
        FacetSpecs::Many(specs)
    }
}

/// Caller-supplied search options.
///
/// `disjunctive_facets` is interpreted by the client and never sent to the
/// backend; everything in `extra` is passed through to the request body
/// untouched (grouping, sort, result fields, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SearchOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<Page>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "filters::option_from_value"
    )]
    pub filters: Option<Filter>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub facets: BTreeMap<String, FacetSpecs>,
    #[serde(
        rename = "disjunctiveFacets",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub disjunctive_facets: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchOptions {
    pub fn page(mut self, size: u64, current: u64) -> Self {
        self.page = Some(Page {
            size: Some(size),
            current: Some(current),
        });
        self
    }

    pub fn filters(mut self, filters: Filter) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn facet(mut self, field: impl Into<String>, specs: impl Into<FacetSpecs>) -> Self {
        self.facets.insert(field.into(), specs.into());
        self
    }

    pub fn disjunctive(mut self, field: impl Into<String>) -> Self {
        self.disjunctive_facets.push(field.into());
        self
    }

    /// Add a passthrough search flag, e.g. `group` or `sort`.
    pub fn flag(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Fields that need an auxiliary query: names listed as disjunctive
    /// that also have a facet spec. Names without one are inert.
    pub(crate) fn disjunctive_fields(&self) -> Vec<&str> {
        self.disjunctive_facets
            .iter()
            .filter(|field| self.facets.contains_key(field.as_str()))
            .map(String::as_str)
            .collect()
    }
}

/// A fully-built backend search request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryDescriptor {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<Page>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filter>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub facets: BTreeMap<String, Vec<FacetSpec>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QueryDescriptor {
    /// Derive the auxiliary query for one disjunctive field: same query,
    /// page and flags, but with the field's own filter constraints removed
    /// and the facet set restricted to that field.
    pub(crate) fn auxiliary_for_field(&self, field: &str) -> QueryDescriptor {
        let mut facets = BTreeMap::new();
        if let Some(specs) = self.facets.get(field) {
            facets.insert(field.to_string(), specs.clone());
        }
        QueryDescriptor {
            query: self.query.clone(),
            page: self.page.clone(),
            filters: self
                .filters
                .as_ref()
                .and_then(|tree| tree.without_field(field)),
            facets,
            extra: self.extra.clone(),
        }
    }
}

/// Build the primary query descriptor from caller options.
///
/// The only validation performed here is the required query string; the
/// backend validates everything else. Pure transformation, no I/O.
pub fn build_query(query: &str, options: &SearchOptions) -> Result<QueryDescriptor> {
    if query.trim().is_empty() {
        return Err(ClientError::MissingParameter("query"));
    }
    Ok(QueryDescriptor {
        query: query.to_string(),
        page: options.page.clone(),
        filters: options.filters.clone(),
        facets: options
            .facets
            .iter()
            .map(|(field, specs)| (field.clone(), specs.to_vec()))
            .collect(),
        extra: options.extra.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn rejects_empty_query() {
        let err = build_query("", &SearchOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "[400] Missing required parameter: query");

        let err = build_query("   ", &SearchOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "[400] Missing required parameter: query");
    }

    #[test]
    fn normalizes_bare_facet_spec() {
        let options = SearchOptions::default()
            .facet("license", FacetSpec::value(3))
            .facet("dependencies", vec![FacetSpec::value(3)]);
        let descriptor = build_query("cat", &options).unwrap();
        assert_eq!(descriptor.facets["license"], vec![FacetSpec::value(3)]);
        assert_eq!(descriptor.facets["dependencies"], vec![FacetSpec::value(3)]);
    }

    #[test]
    fn disjunctive_facets_stay_out_of_the_body() {
        let options = SearchOptions::default()
            .facet("license", FacetSpec::value(3))
            .disjunctive("license");
        let descriptor = build_query("cat", &options).unwrap();
        let body = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(
            body,
            json!({
                "query": "cat",
                "facets": {"license": [{"type": "value", "size": 3}]}
            })
        );
    }

    #[test]
    fn passthrough_flags_serialize_at_top_level() {
        let options = SearchOptions::default()
            .page(1, 2)
            .flag("group", json!({"field": "license"}));
        let descriptor = build_query("cat", &options).unwrap();
        let body = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(
            body,
            json!({
                "query": "cat",
                "page": {"size": 1, "current": 2},
                "group": {"field": "license"}
            })
        );
    }

    #[test]
    fn disjunctive_fields_require_matching_facet() {
        let options = SearchOptions::default()
            .facet("license", FacetSpec::value(3))
            .disjunctive("license")
            .disjunctive("dependencies");
        assert_eq!(options.disjunctive_fields(), vec!["license"]);
    }

    #[test]
    fn auxiliary_descriptor_strips_own_filter_and_other_facets() {
        let options = SearchOptions::default()
            .filters(Filter::all(vec![
                Filter::leaf("license", "BSD"),
                Filter::leaf("dependencies", "socket.io"),
            ]))
            .facet("license", FacetSpec::value(3))
            .facet("dependencies", FacetSpec::value(3));
        let primary = build_query("cat", &options).unwrap();
        let auxiliary = primary.auxiliary_for_field("license");

        assert_eq!(
            auxiliary.filters,
            Some(Filter::all(vec![Filter::leaf("dependencies", "socket.io")]))
        );
        assert_eq!(auxiliary.facets.keys().collect::<Vec<_>>(), vec!["license"]);
        assert_eq!(auxiliary.query, primary.query);
        // the primary descriptor is reusable for further removals
        assert!(primary.filters.as_ref().is_some_and(|f| f.references("license")));
    }

    #[test]
    fn options_deserialize_from_caller_json() {
        let options: SearchOptions = serde_json::from_value(json!({
            "page": {"size": 1},
            "filters": {"license": ["BSD"]},
            "facets": {"license": {"type": "value", "size": 3}},
            "disjunctiveFacets": ["license"]
        }))
        .unwrap();
        assert_eq!(options.filters, Some(Filter::leaf("license", json!(["BSD"]))));
        assert_eq!(options.disjunctive_fields(), vec!["license"]);
    }
}
