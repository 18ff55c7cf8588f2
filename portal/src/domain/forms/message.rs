//! Staff messaging: new threads and replies.

use serde::Deserialize;
use serde_json::json;

use super::{FormError, FormErrorCode, optional_text, required_text};
use crate::domain::ports::BackendCommand;
use crate::domain::records::RecordId;
use crate::domain::resources::MESSAGE_THREADS;

/// Longest message body accepted, in characters.
pub const MAX_MESSAGE_LEN: usize = 2000;

fn message_body(raw: Option<&str>) -> Result<String, FormError> {
    let body = required_text("body", raw)?;
    if body.chars().count() > MAX_MESSAGE_LEN {
        return Err(FormError::new(
            "body",
            FormErrorCode::TooLong,
            format!("body must be at most {MAX_MESSAGE_LEN} characters"),
        ));
    }
    Ok(body)
}

/// Raw reply form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplyInput {
    /// Message text.
    #[serde(default)]
    pub body: Option<String>,
}

/// Validated reply in an existing thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    thread_id: RecordId,
    body: String,
}

impl Reply {
    /// Validate a reply to `thread_id`.
    pub fn try_from_input(thread_id: RecordId, input: &ReplyInput) -> Result<Self, FormError> {
        Ok(Self {
            thread_id,
            body: message_body(input.body.as_deref())?,
        })
    }

    /// Thread replied to.
    pub fn thread_id(&self) -> &RecordId {
        &self.thread_id
    }

    /// The POST appending the message.
    pub fn to_command(&self) -> BackendCommand {
        BackendCommand::post(
            MESSAGE_THREADS.member_action_path(self.thread_id.as_str(), "messages"),
            json!({ "body": self.body }),
        )
    }
}

/// Raw "new thread" form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewThreadInput {
    /// Thread subject.
    #[serde(default)]
    pub subject: Option<String>,
    /// Recipient emails or user ids.
    #[serde(default)]
    pub recipients: Vec<String>,
    /// First message.
    #[serde(default)]
    pub body: Option<String>,
}

/// Validated new thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewThread {
    subject: String,
    recipients: Vec<String>,
    body: String,
}

impl NewThread {
    /// Validate the form.
    pub fn try_from_input(input: &NewThreadInput) -> Result<Self, FormError> {
        let subject = required_text("subject", input.subject.as_deref())?;
        let recipients: Vec<String> = input
            .recipients
            .iter()
            .filter_map(|recipient| optional_text(Some(recipient)))
            .collect();
        if recipients.is_empty() {
            return Err(FormError::required("recipients"));
        }
        Ok(Self {
            subject,
            recipients,
            body: message_body(input.body.as_deref())?,
        })
    }

    /// The POST opening the thread.
    pub fn to_command(&self) -> BackendCommand {
        BackendCommand::post(
            MESSAGE_THREADS.path(),
            json!({
                "subject": self.subject,
                "recipients": self.recipients,
                "body": self.body,
            }),
        )
    }
}
