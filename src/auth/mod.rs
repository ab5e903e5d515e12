//! Authentication module
//!
//! Supports: bearer tokens from a `TokenCredential`, shared access signatures
//!
//! A `Credential` is resolved once, when an issuing client is built, into an
//! `AuthPolicy`. The policy is then applied to every outgoing request and
//! manages token caching for bearer credentials.

mod policy;
mod types;

pub use policy::{AuthPolicy, StaticTokenCredential, TokenCredential};
pub use types::{AccessToken, Credential, SasToken};

#[cfg(test)]
mod tests;
