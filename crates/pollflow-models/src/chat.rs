use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a chat message. Serialized as `"user"` / `"ai"` to match the
/// wire contract of the chat endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "ai")]
    Assistant,
}

/// One message in a chat session transcript. Exists only in memory for the
/// lifetime of a session; it is never persisted independently of the final
/// submitted answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}
