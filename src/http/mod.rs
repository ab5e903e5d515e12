//! HTTP module
//!
//! The issuing client contract used by the paged enumerator, plus the
//! reqwest-backed client this crate ships.
//!
//! # Features
//!
//! - **Request Templates**: Method, URL, headers and query parameters, cloned per page
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Throttling**: governor token bucket per client, shared hold-off after `429`
//! - **Authentication**: Integration with the auth module

mod client;
mod request;
mod throttle;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use request::{
    IssuingClient, RawResponse, RequestContext, RequestTemplate, ResponseMetadata,
};
pub use throttle::RateLimit;

#[cfg(test)]
mod tests;
