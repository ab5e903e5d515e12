//! Chat service listing items

use crate::decode::tolerant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One chat thread of a thread listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatThreadItem {
    /// Thread id
    pub id: String,
    /// Thread topic
    #[serde(
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub topic: Option<String>,
    /// When the thread was deleted
    #[serde(
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub deleted_on: Option<DateTime<Utc>>,
    /// When the last message arrived
    #[serde(
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_message_received_on: Option<DateTime<Utc>>,
}

/// Kind of chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChatMessageType {
    /// Plain text
    Text,
    /// HTML
    Html,
    /// Thread topic changed
    TopicUpdated,
    /// Participants joined
    ParticipantAdded,
    /// Participants left
    ParticipantRemoved,
    /// Any kind added after this client was written
    #[serde(other)]
    Unknown,
}

/// Body of a chat message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageContent {
    /// Message text for `text` and `html` messages
    #[serde(
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub message: Option<String>,
    /// New topic for `topicUpdated` messages
    #[serde(
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub topic: Option<String>,
}

/// One message of a thread's message listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Message id
    pub id: String,
    /// Message kind
    #[serde(
        rename = "type",
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<ChatMessageType>,
    /// Position of the message in the thread
    #[serde(
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub sequence_id: Option<String>,
    /// Message version, bumped on edits
    #[serde(
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
    /// Message body
    #[serde(
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<ChatMessageContent>,
    /// Display name of the sender
    #[serde(
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub sender_display_name: Option<String>,
    /// When the message was sent
    #[serde(
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_on: Option<DateTime<Utc>>,
    /// When the message was deleted
    #[serde(
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub deleted_on: Option<DateTime<Utc>>,
    /// When the message was last edited
    #[serde(
        default,
        deserialize_with = "tolerant::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub edited_on: Option<DateTime<Utc>>,
}
