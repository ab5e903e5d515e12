//! Field-path resolution over decoded body trees

use super::types::{DecodedBody, FieldPaths};
use crate::types::OptionStringExt;
use serde_json::{Map, Value};

/// Resolve a dot-separated path against a tree
///
/// Numeric segments index into arrays. An empty path (or `$`) is the root.
pub fn resolve_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix('$').unwrap_or(path);
    let path = path.strip_prefix('.').unwrap_or(path);
    if path.is_empty() {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(arr) => arr.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Collect items from the node at the items path
pub fn collect_items(node: Option<&Value>, item_element: Option<&str>) -> Vec<Value> {
    let node = match node {
        None | Some(Value::Null) => return vec![],
        Some(node) => node,
    };

    match (node, item_element) {
        (Value::Array(arr), _) => arr.clone(),
        (Value::Object(map), Some(element)) => match map.get(element) {
            None | Some(Value::Null) => vec![],
            Some(Value::Array(arr)) => arr.clone(),
            Some(single) => vec![single.clone()],
        },
        // Element names are only meaningful for XML collections
        (Value::String(s), Some(_)) if s.trim().is_empty() => vec![],
        (other, _) => vec![other.clone()],
    }
}

/// Collect items of several element kinds, each wrapped as `{"<element>": item}`
pub fn collect_tagged(node: Option<&Value>, elements: &[String]) -> Vec<Value> {
    let Some(node @ Value::Object(_)) = node else {
        return vec![];
    };

    elements
        .iter()
        .flat_map(|element| {
            collect_items(Some(node), Some(element.as_str()))
                .into_iter()
                .map(move |item| {
                    let mut tagged = Map::new();
                    tagged.insert(element.clone(), item);
                    Value::Object(tagged)
                })
        })
        .collect()
}

/// Read a continuation token from a node, treating empty strings as absent
pub fn continuation_token(node: Option<&Value>) -> Option<String> {
    match node? {
        Value::String(s) => s.trim().to_string().none_if_empty(),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Extract items and continuation token from a tree
pub fn extract(tree: &Value, paths: &FieldPaths) -> DecodedBody {
    let node = resolve_path(tree, &paths.items_path);
    let items = if paths.tagged_elements.is_empty() {
        collect_items(node, paths.item_element.as_deref())
    } else {
        collect_tagged(node, &paths.tagged_elements)
    };
    let continuation = continuation_token(resolve_path(tree, &paths.continuation_path));
    DecodedBody {
        items,
        continuation,
    }
}
