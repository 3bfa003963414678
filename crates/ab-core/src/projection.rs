//! # Projections
//!
//! The public shapes of threads and replies. These are the only
//! serializable views of the domain records: delete passwords and
//! report flags are dropped here at both thread and reply level.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Reply, Thread};

/// How many threads a board listing returns.
pub const RECENT_THREAD_LIMIT: i64 = 10;

/// How many of the newest replies each thread carries in a board listing.
pub const PREVIEW_REPLY_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub text: String,
    pub created_on: DateTime<Utc>,
}

impl From<&Reply> for ReplyView {
    fn from(reply: &Reply) -> Self {
        Self {
            id: reply.id,
            text: reply.text.clone(),
            created_on: reply.created_on,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub board: String,
    pub text: String,
    pub created_on: DateTime<Utc>,
    pub bumped_on: DateTime<Utc>,
    pub replies: Vec<ReplyView>,
    /// Length of the full reply sequence, not of `replies`
    pub replycount: usize,
}

impl ThreadView {
    /// Board-listing shape: only the last [`PREVIEW_REPLY_LIMIT`] replies,
    /// still in chronological order.
    pub fn preview(thread: &Thread) -> Self {
        let skip = thread.replies.len().saturating_sub(PREVIEW_REPLY_LIMIT);
        Self::with_replies(thread, &thread.replies[skip..])
    }

    /// Single-thread shape: every reply.
    pub fn full(thread: &Thread) -> Self {
        Self::with_replies(thread, &thread.replies)
    }

    fn with_replies(thread: &Thread, replies: &[Reply]) -> Self {
        Self {
            id: thread.id,
            board: thread.board.clone(),
            text: thread.text.clone(),
            created_on: thread.created_on,
            bumped_on: thread.bumped_on,
            replies: replies.iter().map(ReplyView::from).collect(),
            replycount: thread.reply_count(),
        }
    }
}
