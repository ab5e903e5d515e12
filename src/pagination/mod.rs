//! Pagination module
//!
//! Supports: query parameter markers, next-page links, path segment tokens
//!
//! # Overview
//!
//! A [`PagedEnumerator`] decodes the first response of a list operation and
//! fetches later pages on demand. Where items and the continuation token live
//! in the body is described by [`FieldPaths`](crate::decode::FieldPaths); how
//! the token travels in the next request is decided by a
//! [`ContinuationStrategy`].

mod enumerator;
mod page;
mod shared;
mod strategies;

pub use enumerator::PagedEnumerator;
pub use page::{Page, PagingConfig};
pub use shared::SharedPagedEnumerator;
pub use strategies::{
    ContinuationRequest, ContinuationStrategy, NextLinkContinuation, PathSegmentContinuation,
    QueryParamContinuation,
};
