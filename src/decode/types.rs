//! Decoder types and traits
//!
//! Defines the core decoder abstractions.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Format of the response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyFormat {
    /// JSON format (default)
    #[default]
    Json,
    /// XML format
    Xml,
}

impl BodyFormat {
    /// Decoder for this format
    pub fn decoder(self) -> Arc<dyn BodyDecoder> {
        match self {
            BodyFormat::Json => Arc::new(super::JsonBodyDecoder::new()),
            BodyFormat::Xml => Arc::new(super::XmlBodyDecoder::new()),
        }
    }
}

/// Where the items and the continuation token live inside a response body
///
/// Paths are dot-separated (`EnumerationResults.NextMarker`). A leading `$.`
/// is accepted. A path that does not resolve is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPaths {
    /// Path to the items collection
    pub items_path: String,
    /// Path to the continuation token
    pub continuation_path: String,
    /// Element name of each item inside the collection (XML bodies)
    #[serde(default)]
    pub item_element: Option<String>,
    /// Element names of a collection mixing several item kinds (XML bodies)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tagged_elements: Vec<String>,
}

impl FieldPaths {
    /// Paths for a JSON body such as `{"value": [...], "nextLink": "..."}`
    pub fn json(items_path: impl Into<String>, continuation_path: impl Into<String>) -> Self {
        Self {
            items_path: items_path.into(),
            continuation_path: continuation_path.into(),
            item_element: None,
            tagged_elements: Vec::new(),
        }
    }

    /// Paths for an XML body whose collection holds repeated `item_element` children
    pub fn xml(
        items_path: impl Into<String>,
        continuation_path: impl Into<String>,
        item_element: impl Into<String>,
    ) -> Self {
        Self {
            items_path: items_path.into(),
            continuation_path: continuation_path.into(),
            item_element: Some(item_element.into()),
            tagged_elements: Vec::new(),
        }
    }

    /// Paths for an XML collection holding several kinds of item element
    ///
    /// Each item comes out as `{"<element>": value}`, the shape of an
    /// externally tagged serde enum. Items are grouped by element in the order
    /// of `elements`, in document order within each group.
    pub fn xml_tagged(
        items_path: impl Into<String>,
        continuation_path: impl Into<String>,
        elements: &[&str],
    ) -> Self {
        Self {
            items_path: items_path.into(),
            continuation_path: continuation_path.into(),
            item_element: None,
            tagged_elements: elements.iter().map(|e| (*e).to_string()).collect(),
        }
    }
}

/// Items and continuation token extracted from one response body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedBody {
    /// Untyped items, in document order
    pub items: Vec<Value>,
    /// Continuation token, `None` on the last page
    pub continuation: Option<String>,
}

/// Trait for decoding response bodies into items and a continuation token
pub trait BodyDecoder: Send + Sync {
    /// Format this decoder understands
    fn format(&self) -> BodyFormat;

    /// Parse the body into a structured tree
    fn decode_tree(&self, body: &[u8]) -> Result<Value>;

    /// Decode the body and extract items and token at `paths`
    fn decode(&self, body: &[u8], paths: &FieldPaths) -> Result<DecodedBody> {
        let tree = self.decode_tree(body)?;
        Ok(super::path::extract(&tree, paths))
    }
}
