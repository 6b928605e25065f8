use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A poll as it travels over the wire and lives in storage. The
/// `is_text_based` flag is fixed for the poll's lifetime and decides which of
/// `options` and `answers` is meaningful.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub id: String,
    pub question: String,
    pub options: Vec<PollOption>,
    #[serde(default)]
    pub answers: Vec<PollAnswer>,
    pub is_text_based: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollOption {
    pub id: String,
    pub text: String,
    pub votes: i64,
}

/// A free-text response to a text-based poll. Append-only: never edited or
/// removed after submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollAnswer {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
