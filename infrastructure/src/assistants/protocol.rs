//! Wire types of the assistant API.

use serde::{Deserialize, Serialize};

/// `POST /threads` response
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadObject {
    pub id: String,
}

/// `POST /threads/{thread}/messages` body
#[derive(Debug, Serialize)]
pub struct CreateMessageRequest<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

/// `POST /threads/{thread}/runs` body
#[derive(Debug, Serialize)]
pub struct CreateRunRequest<'a> {
    pub assistant_id: &'a str,
}

/// Lifecycle status of a run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Still waiting on the backend; keep polling.
    pub fn is_pending(&self) -> bool {
        matches!(self, RunStatus::Queued | RunStatus::InProgress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Unknown => "unknown",
        }
    }
}

/// Error attached to a failed run
#[derive(Debug, Clone, Deserialize)]
pub struct RunError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// A run, as returned by create and retrieve
#[derive(Debug, Clone, Deserialize)]
pub struct RunObject {
    pub id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub last_error: Option<RunError>,
}

/// `GET /threads/{thread}/messages` response
#[derive(Debug, Clone, Deserialize)]
pub struct MessageList {
    #[serde(default)]
    pub data: Vec<ThreadMessage>,
}

/// One message of a thread
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    pub role: String,
    #[serde(default)]
    pub run_id: Option<String>,
    #[serde(default)]
    pub content: Vec<MessageContent>,
}

/// A content block of a message
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: TextContent },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextContent {
    pub value: String,
}

/// `GET /assistants/{id}` response
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantObject {
    pub id: String,
    pub model: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl MessageList {
    /// Text of the newest assistant message produced by `run_id`.
    ///
    /// Messages are listed newest first; the first text block of the first
    /// matching message is returned.
    pub fn reply_for_run(&self, run_id: &str) -> Option<&str> {
        self.data
            .iter()
            .filter(|m| m.role == "assistant" && m.run_id.as_deref() == Some(run_id))
            .find_map(|m| {
                m.content.iter().find_map(|c| match c {
                    MessageContent::Text { text } => Some(text.value.as_str()),
                    MessageContent::Other => None,
                })
            })
    }
}
