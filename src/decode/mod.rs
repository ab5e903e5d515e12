//! Response decoder module
//!
//! Supports: JSON, XML
//!
//! # Overview
//!
//! Decoders parse a response body into a tree and extract the page items and
//! the continuation token at the configured field paths. Paths that do not
//! resolve yield no items and no token; only unparseable bodies are errors.

mod decoders;
mod path;
pub mod tolerant;
mod types;

pub use decoders::{xml_to_value, JsonBodyDecoder, XmlBodyDecoder};
pub use path::{collect_items, collect_tagged, continuation_token, resolve_path};
pub use types::{BodyDecoder, BodyFormat, DecodedBody, FieldPaths};
