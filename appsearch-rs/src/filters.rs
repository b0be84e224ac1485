//! Filter tree model and per-field constraint removal.
//!
//! The backend accepts a recursive boolean filter structure: a leaf is a
//! single-field object like `{"license": "BSD"}` (the value may be a scalar
//! or an array of scalars), and compound nodes combine sub-filters with
//! `{"all": [...]}` or `{"any": [...]}`. The shape is fixed by the wire
//! contract, so (de)serialization is implemented by hand rather than with a
//! derived tagged enum.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::Result;

/// A node in the filter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// A constraint on a single field. `value` is a scalar or an array
    /// of scalars, passed through to the backend untouched.
    Leaf { field: String, value: Value },
    /// All children must hold (logical AND).
    All(Vec<Filter>),
    /// At least one child must hold (logical OR).
    Any(Vec<Filter>),
}

impl Filter {
    /// Build a leaf constraint.
    pub fn leaf(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Leaf {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Build an `all` compound.
    pub fn all(children: Vec<Filter>) -> Self {
        Filter::All(children)
    }

    /// Build an `any` compound.
    pub fn any(children: Vec<Filter>) -> Self {
        Filter::Any(children)
    }

    /// Parse a filter from its wire JSON shape.
    ///
    /// An object with several fields is an implicit conjunction, so
    /// `{"license": "BSD", "tier": 1}` parses as `All` of two leaves.
    /// The empty object carries no constraint and is rejected here;
    /// callers that accept "no filters" keep an `Option<Filter>` and map
    /// `{}` to `None` before calling (see [`option_from_value`]).
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(entries) = value else {
            return Err(serde_json::Error::custom("filter must be a JSON object").into());
        };
        let mut nodes = Vec::with_capacity(entries.len());
        for (key, entry) in entries {
            nodes.push(Self::node_from_entry(key, entry)?);
        }
        if nodes.len() == 1 {
            Ok(nodes.remove(0))
        } else if nodes.is_empty() {
            Err(serde_json::Error::custom("filter object must not be empty").into())
        } else {
            Ok(Filter::All(nodes))
        }
    }

    fn node_from_entry(key: String, entry: Value) -> Result<Self> {
        if key == "all" || key == "any" {
            let Value::Array(children) = entry else {
                return Err(serde_json::Error::custom(format!(
                    "`{key}` must hold an array of filters"
                ))
                .into());
            };
            let children = children
                .into_iter()
                .map(Self::from_value)
                .collect::<Result<Vec<_>>>()?;
            if key == "all" {
                Ok(Filter::All(children))
            } else {
                Ok(Filter::Any(children))
            }
        } else {
            Ok(Filter::Leaf {
                field: key,
                value: entry,
            })
        }
    }

    /// Return a copy of the tree with every constraint on `field` removed.
    ///
    /// Returns `None` when nothing survives: a leaf on `field` vanishes
    /// outright, and a compound whose children all vanish vanishes with
    /// them. Unrelated constraints are preserved at any nesting depth.
    /// The receiver is untouched, so the same tree can be reused for
    /// further removals.
    pub fn without_field(&self, field: &str) -> Option<Filter> {
        match self {
            Filter::Leaf { field: f, .. } if f == field => None,
            leaf @ Filter::Leaf { .. } => Some(leaf.clone()),
            Filter::All(children) => Self::rebuild(children, field, Filter::All),
            Filter::Any(children) => Self::rebuild(children, field, Filter::Any),
        }
    }

    fn rebuild(
        children: &[Filter],
        field: &str,
        combine: impl FnOnce(Vec<Filter>) -> Filter,
    ) -> Option<Filter> {
        let kept: Vec<Filter> = children
            .iter()
            .filter_map(|child| child.without_field(field))
            .collect();
        if kept.is_empty() { None } else { Some(combine(kept)) }
    }

    /// True if any leaf at any depth constrains `field`.
    pub fn references(&self, field: &str) -> bool {
        match self {
            Filter::Leaf { field: f, .. } => f == field,
            Filter::All(children) | Filter::Any(children) => {
                children.iter().any(|child| child.references(field))
            }
        }
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Filter::Leaf { field, value } => map.serialize_entry(field, value)?,
            Filter::All(children) => map.serialize_entry("all", children)?,
            Filter::Any(children) => map.serialize_entry("any", children)?,
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Filter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Filter::from_value(value).map_err(D::Error::custom)
    }
}

/// Deserialize an optional filter, treating `null` and the empty object
/// as "no constraint". Used with `#[serde(deserialize_with = ...)]`.
pub(crate) fn option_from_value<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Filter>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(entries)) if entries.is_empty() => Ok(None),
        Some(value) => Filter::from_value(value).map(Some).map_err(D::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_tree() -> Filter {
        // {all: [{license: "BSD"}, {any: [{dependencies: "socket.io"}, {license: "MIT"}]}]}
        Filter::all(vec![
            Filter::leaf("license", "BSD"),
            Filter::any(vec![
                Filter::leaf("dependencies", "socket.io"),
                Filter::leaf("license", "MIT"),
            ]),
        ])
    }

    #[test]
    fn removes_leaf_entirely() {
        let tree = Filter::leaf("license", "BSD");
        assert_eq!(tree.without_field("license"), None);
    }

    #[test]
    fn keeps_unrelated_leaf() {
        let tree = Filter::leaf("dependencies", "socket.io");
        assert_eq!(tree.without_field("license"), Some(tree.clone()));
    }

    #[test]
    fn removes_all_occurrences_at_depth() {
        let stripped = sample_tree().without_field("license");
        assert_eq!(
            stripped,
            Some(Filter::all(vec![Filter::any(vec![Filter::leaf(
                "dependencies",
                "socket.io"
            )])]))
        );
        assert!(!stripped.as_ref().is_some_and(|f| f.references("license")));
    }

    #[test]
    fn compound_collapses_when_emptied() {
        let tree = Filter::any(vec![
            Filter::leaf("license", "BSD"),
            Filter::leaf("license", "MIT"),
        ]);
        assert_eq!(tree.without_field("license"), None);
    }

    #[test]
    fn spec_example_leaves_other_field() {
        // filters {all: [{license: "BSD"}, {dependencies: "socket.io"}]},
        // disjunctive on license -> only the dependency constraint remains.
        let tree = Filter::all(vec![
            Filter::leaf("license", "BSD"),
            Filter::leaf("dependencies", "socket.io"),
        ]);
        assert_eq!(
            tree.without_field("license"),
            Some(Filter::all(vec![Filter::leaf("dependencies", "socket.io")]))
        );
    }

    #[test]
    fn removal_does_not_mutate_input() {
        let tree = sample_tree();
        let before = tree.clone();
        let _ = tree.without_field("license");
        let _ = tree.without_field("dependencies");
        assert_eq!(tree, before);
    }

    #[test]
    fn wire_round_trip() {
        let json = json!({
            "all": [
                {"license": ["BSD", "MIT"]},
                {"any": [{"dependencies": "socket.io"}]}
            ]
        });
        let parsed: Filter = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(
            parsed,
            Filter::all(vec![
                Filter::leaf("license", json!(["BSD", "MIT"])),
                Filter::any(vec![Filter::leaf("dependencies", "socket.io")]),
            ])
        );
        assert_eq!(serde_json::to_value(&parsed).unwrap(), json);
    }

    #[test]
    fn multi_field_object_is_implicit_all() {
        let parsed: Filter = serde_json::from_value(json!({"a": 1, "b": 2})).unwrap();
        assert_eq!(
            parsed,
            Filter::all(vec![Filter::leaf("a", 1), Filter::leaf("b", 2)])
        );
    }

    #[test]
    fn empty_object_is_rejected_as_filter_but_none_as_option() {
        assert!(Filter::from_value(json!({})).is_err());

        #[derive(Deserialize)]
        struct Holder {
            #[serde(default, deserialize_with = "option_from_value")]
            filters: Option<Filter>,
        }
        let holder: Holder = serde_json::from_value(json!({"filters": {}})).unwrap();
        assert_eq!(holder.filters, None);
    }
}
