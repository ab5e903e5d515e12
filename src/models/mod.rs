//! Typed items returned by the list operations
//!
//! Required fields (names, ids) fail the item when malformed. Every other
//! field is optional and decodes tolerantly: a malformed value becomes `None`.

mod blob;
mod chat;

pub use blob::{
    BlobItem, BlobListItem, BlobPrefix, BlobProperties, BlobType, ContainerItem,
    ContainerProperties, PublicAccess,
};
pub use chat::{ChatMessage, ChatMessageContent, ChatMessageType, ChatThreadItem};
