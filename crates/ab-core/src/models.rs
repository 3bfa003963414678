//! # Domain Models
//!
//! Threads and the replies embedded in them.
//! We use UUID v7 for time-ordered, globally unique identification.
//!
//! Neither record implements `Serialize`: responses go through the
//! projection types in [`crate::projection`], which carry no password
//! or report flag.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A discussion thread on a board, owning its replies.
#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    pub id: Uuid,
    /// Board name from the request path (e.g. "b")
    pub board: String,
    pub text: String,
    /// Stored and compared as plaintext
    pub delete_password: String,
    pub reported: bool,
    pub created_on: DateTime<Utc>,
    /// The timestamp used for sorting threads by activity
    pub bumped_on: DateTime<Utc>,
    /// Chronological; append-only apart from redaction
    pub replies: Vec<Reply>,
}

impl Thread {
    /// A fresh, unreported thread with no replies, created and bumped now.
    pub fn new(board: impl Into<String>, text: impl Into<String>, delete_password: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            board: board.into(),
            text: text.into(),
            delete_password: delete_password.into(),
            reported: false,
            created_on: now,
            bumped_on: now,
            replies: Vec::new(),
        }
    }

    pub fn reply_count(&self) -> usize {
        self.replies.len()
    }

    /// Looks up an embedded reply by its identifier.
    pub fn reply(&self, id: Uuid) -> Option<&Reply> {
        self.replies.iter().find(|r| r.id == id)
    }
}

/// A reply embedded in a thread. Has no lifecycle of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub id: Uuid,
    pub text: String,
    pub delete_password: String,
    pub reported: bool,
    pub created_on: DateTime<Utc>,
}

impl Reply {
    pub fn new(text: impl Into<String>, delete_password: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            text: text.into(),
            delete_password: delete_password.into(),
            reported: false,
            created_on: Utc::now(),
        }
    }
}
