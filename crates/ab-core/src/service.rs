//! # BoardService
//!
//! The eight board operations, expressed over a [`ThreadRepo`].
//! HTTP concerns stay in `ab-api`; this layer validates input, checks
//! delete passwords and shapes responses through [`crate::projection`].

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Reply, Thread};
use crate::projection::{ThreadView, RECENT_THREAD_LIMIT};
use crate::traits::ThreadRepo;

/// Text a reply is overwritten with when its author deletes it.
pub const REDACTED_TEXT: &str = "[deleted]";

#[derive(Clone)]
pub struct BoardService {
    repo: Arc<dyn ThreadRepo>,
}

impl BoardService {
    pub fn new(repo: Arc<dyn ThreadRepo>) -> Self {
        Self { repo }
    }

    /// Starts a new thread on `board`.
    pub async fn create_thread(&self, board: &str, text: &str, delete_password: &str) -> Result<Thread> {
        require("board", board)?;
        require("text", text)?;
        require("delete_password", delete_password)?;

        let thread = Thread::new(board, text, delete_password);
        self.repo.insert_thread(&thread).await?;
        info!(board, thread_id = %thread.id, "thread created");
        Ok(thread)
    }

    /// The most recently bumped threads on `board`, each with a reply preview.
    pub async fn recent_threads(&self, board: &str) -> Result<Vec<ThreadView>> {
        let threads = self.repo.recent_threads(board, RECENT_THREAD_LIMIT).await?;
        Ok(threads.iter().map(ThreadView::preview).collect())
    }

    /// Flags a thread for moderators. No password needed; repeat reports are no-ops.
    pub async fn report_thread(&self, thread_id: &str) -> Result<()> {
        let id = parse_id("thread_id", thread_id)?;
        if !self.repo.mark_thread_reported(id).await? {
            return Err(thread_not_found(id));
        }
        info!(thread_id = %id, "thread reported");
        Ok(())
    }

    /// Removes a thread and all of its replies if `delete_password` matches.
    pub async fn delete_thread(&self, thread_id: &str, delete_password: &str) -> Result<()> {
        let id = parse_id("thread_id", thread_id)?;
        let thread = self.fetch(id).await?;

        if thread.delete_password != delete_password {
            warn!(thread_id = %id, "thread delete rejected: incorrect password");
            return Err(AppError::Unauthorized("incorrect password".into()));
        }

        if !self.repo.delete_thread(id).await? {
            return Err(thread_not_found(id));
        }
        info!(thread_id = %id, "thread deleted");
        Ok(())
    }

    /// Appends a reply to a thread and bumps it.
    pub async fn create_reply(&self, thread_id: &str, text: &str, delete_password: &str) -> Result<Reply> {
        let id = parse_id("thread_id", thread_id)?;
        require("text", text)?;
        require("delete_password", delete_password)?;

        let reply = Reply::new(text, delete_password);
        if !self.repo.append_reply(id, &reply).await? {
            return Err(thread_not_found(id));
        }
        info!(thread_id = %id, reply_id = %reply.id, "reply created");
        Ok(reply)
    }

    /// A whole thread with every reply, projected.
    pub async fn thread_with_replies(&self, thread_id: &str) -> Result<ThreadView> {
        let id = parse_id("thread_id", thread_id)?;
        let thread = self.fetch(id).await?;
        Ok(ThreadView::full(&thread))
    }

    pub async fn report_reply(&self, thread_id: &str, reply_id: &str) -> Result<()> {
        let id = parse_id("thread_id", thread_id)?;
        let rid = parse_id("reply_id", reply_id)?;
        if !self.repo.mark_reply_reported(id, rid).await? {
            return Err(AppError::NotFound("Reply".into(), rid.to_string()));
        }
        info!(thread_id = %id, reply_id = %rid, "reply reported");
        Ok(())
    }

    /// Redacts a reply in place if `delete_password` matches. The reply keeps
    /// its identifier and position; only the text changes.
    pub async fn delete_reply(&self, thread_id: &str, reply_id: &str, delete_password: &str) -> Result<()> {
        let id = parse_id("thread_id", thread_id)?;
        let rid = parse_id("reply_id", reply_id)?;
        let thread = self.fetch(id).await?;

        let reply = thread
            .reply(rid)
            .ok_or_else(|| AppError::NotFound("Reply".into(), rid.to_string()))?;

        if reply.delete_password != delete_password {
            warn!(thread_id = %id, reply_id = %rid, "reply delete rejected: incorrect password");
            return Err(AppError::Unauthorized("incorrect password".into()));
        }

        if !self.repo.set_reply_text(id, rid, REDACTED_TEXT).await? {
            return Err(AppError::NotFound("Reply".into(), rid.to_string()));
        }
        info!(thread_id = %id, reply_id = %rid, "reply redacted");
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> Result<Thread> {
        self.repo.get_thread(id).await?.ok_or_else(|| {
            debug!(thread_id = %id, "thread lookup missed");
            thread_not_found(id)
        })
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(AppError::ValidationError(format!("{field} is required")));
    }
    Ok(())
}

fn parse_id(field: &str, raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::ValidationError(format!("{field} is not a valid identifier: {raw:?}")))
}

fn thread_not_found(id: Uuid) -> AppError {
    AppError::NotFound("Thread".into(), id.to_string())
}
