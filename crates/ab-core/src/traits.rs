//! # Core Traits (Ports)
//!
//! Any storage plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use crate::models::{Reply, Thread};
use uuid::Uuid;

/// Data persistence contract for threads and their embedded replies.
///
/// Methods returning `bool` report whether the addressed thread (or reply)
/// existed. Single-reply mutations must be applied in place by the store,
/// never by rewriting the whole reply list, so concurrent writers to one
/// thread cannot lose each other's updates.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ThreadRepo: Send + Sync {
    // Thread Operations
    async fn insert_thread(&self, thread: &Thread) -> anyhow::Result<()>;
    /// Threads on `board`, most recently bumped first, with all their replies.
    async fn recent_threads(&self, board: &str, limit: i64) -> anyhow::Result<Vec<Thread>>;
    async fn get_thread(&self, id: Uuid) -> anyhow::Result<Option<Thread>>;
    async fn mark_thread_reported(&self, id: Uuid) -> anyhow::Result<bool>;
    /// Removes the thread together with its replies.
    async fn delete_thread(&self, id: Uuid) -> anyhow::Result<bool>;

    // Reply Operations
    /// Appends `reply` and sets the thread's `bumped_on` to `reply.created_on`
    /// in one atomic step.
    async fn append_reply(&self, thread_id: Uuid, reply: &Reply) -> anyhow::Result<bool>;
    async fn mark_reply_reported(&self, thread_id: Uuid, reply_id: Uuid) -> anyhow::Result<bool>;
    async fn set_reply_text(&self, thread_id: Uuid, reply_id: Uuid, text: &str) -> anyhow::Result<bool>;
}
