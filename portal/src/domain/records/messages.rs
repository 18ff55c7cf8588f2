//! Staff messaging threads.

use serde::{Deserialize, Serialize};

use super::{RecordId, search_fields};
use crate::domain::Searchable;

/// Conversation between staff members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageThread {
    /// Primary key.
    pub id: RecordId,
    /// Thread subject.
    #[serde(default)]
    pub subject: Option<String>,
    /// Participants' emails.
    #[serde(default)]
    pub participants: Vec<String>,
    /// Preview of the latest message.
    #[serde(default)]
    pub last_message: Option<String>,
    /// Unread message count for the viewer.
    #[serde(default)]
    pub unread_count: Option<u32>,
    /// Latest activity timestamp.
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Searchable for MessageThread {
    fn search_fields(&self) -> Vec<String> {
        let mut fields = search_fields([
            Some(self.id.to_string()),
            self.subject.clone(),
            self.last_message.clone(),
        ]);
        fields.extend(self.participants.iter().cloned());
        fields
    }
}

/// Message within a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Primary key.
    pub id: RecordId,
    /// Owning thread.
    #[serde(default)]
    pub thread_id: Option<RecordId>,
    /// Sender email.
    #[serde(default)]
    pub sender_email: Option<String>,
    /// Message text.
    #[serde(default)]
    pub body: Option<String>,
    /// Sent timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Searchable for Message {
    fn search_fields(&self) -> Vec<String> {
        search_fields([
            Some(self.id.to_string()),
            self.sender_email.clone(),
            self.body.clone(),
        ])
    }
}
