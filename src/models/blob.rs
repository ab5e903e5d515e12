//! Blob service listing items
//!
//! Field names follow the service's XML element names.

use crate::decode::tolerant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Public access level of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicAccess {
    /// Anonymous read access to the container and its blobs
    Container,
    /// Anonymous read access to blobs only
    Blob,
}

/// Kind of blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlobType {
    /// Block blob
    BlockBlob,
    /// Page blob
    PageBlob,
    /// Append blob
    AppendBlob,
}

/// One `<Container>` of a container listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerItem {
    /// Container name
    #[serde(deserialize_with = "tolerant::text")]
    pub name: String,
    /// Version of a soft-deleted container
    #[serde(
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
    /// Whether the container is soft-deleted
    #[serde(
        default,
        deserialize_with = "tolerant::optional_parsed",
        skip_serializing_if = "Option::is_none"
    )]
    pub deleted: Option<bool>,
    /// System properties
    #[serde(
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub properties: Option<ContainerProperties>,
    /// User metadata, present when requested with `include=metadata`
    #[serde(
        default,
        deserialize_with = "tolerant::optional_string_map",
        skip_serializing_if = "Option::is_none"
    )]
    pub metadata: Option<HashMap<String, String>>,
}

/// `<Properties>` of a container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerProperties {
    /// Last modification time
    #[serde(
        rename = "Last-Modified",
        default,
        deserialize_with = "tolerant::optional_http_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified: Option<DateTime<Utc>>,
    /// Entity tag
    #[serde(
        rename = "Etag",
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub etag: Option<String>,
    /// Lease status (`locked`, `unlocked`)
    #[serde(
        rename = "LeaseStatus",
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub lease_status: Option<String>,
    /// Lease state
    #[serde(
        rename = "LeaseState",
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub lease_state: Option<String>,
    /// Anonymous access level
    #[serde(
        rename = "PublicAccess",
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub public_access: Option<PublicAccess>,
    /// Whether an immutability policy is set
    #[serde(
        rename = "HasImmutabilityPolicy",
        default,
        deserialize_with = "tolerant::optional_parsed",
        skip_serializing_if = "Option::is_none"
    )]
    pub has_immutability_policy: Option<bool>,
    /// Whether a legal hold is set
    #[serde(
        rename = "HasLegalHold",
        default,
        deserialize_with = "tolerant::optional_parsed",
        skip_serializing_if = "Option::is_none"
    )]
    pub has_legal_hold: Option<bool>,
    /// When the container was deleted
    #[serde(
        rename = "DeletedTime",
        default,
        deserialize_with = "tolerant::optional_http_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub deleted_time: Option<DateTime<Utc>>,
    /// Days left before a deleted container is purged
    #[serde(
        rename = "RemainingRetentionDays",
        default,
        deserialize_with = "tolerant::optional_parsed",
        skip_serializing_if = "Option::is_none"
    )]
    pub remaining_retention_days: Option<u32>,
}

/// One `<Blob>` of a blob listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BlobItem {
    /// Blob name, as sent by the service
    ///
    /// Names with characters XML cannot carry arrive percent-encoded with
    /// `Encoded="true"` on the element.
    #[serde(deserialize_with = "tolerant::text")]
    pub name: String,
    /// Whether the blob is soft-deleted
    #[serde(
        default,
        deserialize_with = "tolerant::optional_parsed",
        skip_serializing_if = "Option::is_none"
    )]
    pub deleted: Option<bool>,
    /// Snapshot timestamp, for snapshot entries
    #[serde(
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub snapshot: Option<String>,
    /// Version id, when versioning is enabled
    #[serde(
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub version_id: Option<String>,
    /// Whether this entry is the current version
    #[serde(
        default,
        deserialize_with = "tolerant::optional_parsed",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_current_version: Option<bool>,
    /// System properties
    #[serde(
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub properties: Option<BlobProperties>,
    /// User metadata, present when requested with `include=metadata`
    #[serde(
        default,
        deserialize_with = "tolerant::optional_string_map",
        skip_serializing_if = "Option::is_none"
    )]
    pub metadata: Option<HashMap<String, String>>,
}

/// One `<BlobPrefix>` of a hierarchical listing
///
/// Stands for every blob whose name continues past the delimiter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BlobPrefix {
    /// Prefix, ending with the delimiter
    #[serde(deserialize_with = "tolerant::text")]
    pub name: String,
}

/// Entry of a hierarchical blob listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlobListItem {
    /// A virtual directory
    BlobPrefix(BlobPrefix),
    /// A blob directly under the listed prefix
    Blob(BlobItem),
}

impl BlobListItem {
    /// Blob name or prefix
    pub fn name(&self) -> &str {
        match self {
            BlobListItem::BlobPrefix(prefix) => &prefix.name,
            BlobListItem::Blob(blob) => &blob.name,
        }
    }

    /// Whether this entry is a virtual directory
    pub fn is_prefix(&self) -> bool {
        matches!(self, BlobListItem::BlobPrefix(_))
    }
}

/// `<Properties>` of a blob
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlobProperties {
    /// Creation time
    #[serde(
        rename = "Creation-Time",
        default,
        deserialize_with = "tolerant::optional_http_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub creation_time: Option<DateTime<Utc>>,
    /// Last modification time
    #[serde(
        rename = "Last-Modified",
        default,
        deserialize_with = "tolerant::optional_http_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified: Option<DateTime<Utc>>,
    /// Entity tag
    #[serde(
        rename = "Etag",
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub etag: Option<String>,
    /// Size in bytes
    #[serde(
        rename = "Content-Length",
        default,
        deserialize_with = "tolerant::optional_parsed",
        skip_serializing_if = "Option::is_none"
    )]
    pub content_length: Option<u64>,
    /// MIME type
    #[serde(
        rename = "Content-Type",
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub content_type: Option<String>,
    /// Base64 MD5 of the content
    #[serde(
        rename = "Content-MD5",
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub content_md5: Option<String>,
    /// Blob kind
    #[serde(
        rename = "BlobType",
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub blob_type: Option<BlobType>,
    /// Access tier (`Hot`, `Cool`, `Archive`)
    #[serde(
        rename = "AccessTier",
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub access_tier: Option<String>,
    /// Lease status (`locked`, `unlocked`)
    #[serde(
        rename = "LeaseStatus",
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub lease_status: Option<String>,
    /// Lease state
    #[serde(
        rename = "LeaseState",
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub lease_state: Option<String>,
    /// Whether the content is encrypted at rest
    #[serde(
        rename = "ServerEncrypted",
        default,
        deserialize_with = "tolerant::optional_parsed",
        skip_serializing_if = "Option::is_none"
    )]
    pub server_encrypted: Option<bool>,
}
