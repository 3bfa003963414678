//! # ab-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational model
//! and the `ab-core` domain models. Replies live in their own table keyed to
//! the owning thread; every single-reply change is one `UPDATE` addressing
//! the reply by `(id, thread_id)`.

use std::str::FromStr;

use anyhow::Context;
use async_trait::async_trait;
use ab_core::models::{Reply, Thread};
use ab_core::traits::ThreadRepo;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::Row;
use tracing::{debug, info};
use uuid::Uuid;

pub struct SqliteThreadRepo {
    pool: SqlitePool,
}

impl SqliteThreadRepo {
    /// Opens (creating if needed) the database at `url` and applies migrations.
    ///
    /// # Developer Note
    /// An in-memory database only lives as long as its connection, so those
    /// URLs get a single connection that is never recycled.
    pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");

        let mut options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid sqlite url {url:?}"))?
            .create_if_missing(true)
            .foreign_keys(true);
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .context("failed to open sqlite database")?;
        Self::from_pool(pool).await
    }

    /// Wraps an existing pool, running pending migrations first.
    pub async fn from_pool(pool: SqlitePool) -> anyhow::Result<Self> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run database migrations")?;
        info!("database migrations complete");
        Ok(Self { pool })
    }
}

fn thread_from_row(row: &SqliteRow) -> sqlx::Result<Thread> {
    Ok(Thread {
        id: row.try_get("id")?,
        board: row.try_get("board")?,
        text: row.try_get("text")?,
        delete_password: row.try_get("delete_password")?,
        reported: row.try_get("reported")?,
        created_on: row.try_get("created_on")?,
        bumped_on: row.try_get("bumped_on")?,
        replies: Vec::new(),
    })
}

fn reply_from_row(row: &SqliteRow) -> sqlx::Result<Reply> {
    Ok(Reply {
        id: row.try_get("id")?,
        text: row.try_get("text")?,
        delete_password: row.try_get("delete_password")?,
        reported: row.try_get("reported")?,
        created_on: row.try_get("created_on")?,
    })
}

/// All replies of one thread in insertion order.
async fn load_replies(conn: &mut SqliteConnection, thread_id: Uuid) -> sqlx::Result<Vec<Reply>> {
    let rows = sqlx::query(
        "SELECT id, text, delete_password, reported, created_on FROM replies WHERE thread_id = ? ORDER BY seq ASC",
    )
    .bind(thread_id)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(reply_from_row).collect()
}

async fn insert_reply(conn: &mut SqliteConnection, thread_id: Uuid, reply: &Reply) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO replies (id, thread_id, text, delete_password, reported, created_on) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(reply.id)
    .bind(thread_id)
    .bind(&reply.text)
    .bind(&reply.delete_password)
    .bind(reply.reported)
    .bind(reply.created_on)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

#[async_trait]
impl ThreadRepo for SqliteThreadRepo {
    /// Inserts the thread and any replies it already carries in one transaction.
    async fn insert_thread(&self, thread: &Thread) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO threads (id, board, text, delete_password, reported, created_on, bumped_on) VALUES (?, ?, ?, ?, ?, ?, ?)")
            .bind(thread.id)
            .bind(&thread.board)
            .bind(&thread.text)
            .bind(&thread.delete_password)
            .bind(thread.reported)
            .bind(thread.created_on)
            .bind(thread.bumped_on)
            .execute(&mut *tx)
            .await
            .context("failed to insert thread")?;

        for reply in &thread.replies {
            insert_reply(&mut tx, thread.id, reply).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Reads the page of threads and their replies from one snapshot.
    async fn recent_threads(&self, board: &str, limit: i64) -> anyhow::Result<Vec<Thread>> {
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query(
            "SELECT id, board, text, delete_password, reported, created_on, bumped_on FROM threads WHERE board = ? ORDER BY bumped_on DESC, id DESC LIMIT ?",
        )
        .bind(board)
        .bind(limit)
        .fetch_all(&mut *tx)
        .await?;

        let mut threads = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut thread = thread_from_row(row)?;
            thread.replies = load_replies(&mut tx, thread.id).await?;
            threads.push(thread);
        }

        tx.commit().await?;
        debug!(board, count = threads.len(), "loaded recent threads");
        Ok(threads)
    }

    async fn get_thread(&self, id: Uuid) -> anyhow::Result<Option<Thread>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT id, board, text, delete_password, reported, created_on, bumped_on FROM threads WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let mut thread = match row {
            Some(row) => thread_from_row(&row)?,
            None => return Ok(None),
        };
        thread.replies = load_replies(&mut tx, id).await?;

        tx.commit().await?;
        Ok(Some(thread))
    }

    async fn mark_thread_reported(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE threads SET reported = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_thread(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM threads WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bump and append commit together.
    ///
    /// # Developer Note
    /// The transaction opens with a write, so SQLite takes the write lock
    /// up front and concurrent appends to one thread queue behind each other
    /// instead of overwriting each other.
    async fn append_reply(&self, thread_id: Uuid, reply: &Reply) -> anyhow::Result<bool> {
        let mut tx = self.pool.begin().await?;

        let bumped = sqlx::query("UPDATE threads SET bumped_on = ? WHERE id = ?")
            .bind(reply.created_on)
            .bind(thread_id)
            .execute(&mut *tx)
            .await?;
        if bumped.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        insert_reply(&mut tx, thread_id, reply)
            .await
            .context("failed to insert reply")?;

        tx.commit().await?;
        Ok(true)
    }

    async fn mark_reply_reported(&self, thread_id: Uuid, reply_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE replies SET reported = 1 WHERE id = ? AND thread_id = ?")
            .bind(reply_id)
            .bind(thread_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_reply_text(&self, thread_id: Uuid, reply_id: Uuid, text: &str) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE replies SET text = ? WHERE id = ? AND thread_id = ?")
            .bind(text)
            .bind(reply_id)
            .bind(thread_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    async fn memory_repo() -> SqliteThreadRepo {
        SqliteThreadRepo::connect("sqlite::memory:", 1).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_thread() {
        let repo = memory_repo().await;
        let thread = Thread::new("test", "OP", "pw");

        repo.insert_thread(&thread).await.expect("Failed to create thread");

        let stored = repo.get_thread(thread.id).await.unwrap().expect("thread should exist");
        assert_eq!(stored, thread);
        assert!(!stored.reported);
        assert!(stored.replies.is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_thread() {
        let repo = memory_repo().await;
        assert!(repo.get_thread(Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_append_reply_bumps_thread() {
        let repo = memory_repo().await;
        let thread = Thread::new("test", "OP", "pw");
        repo.insert_thread(&thread).await.unwrap();

        let reply = Reply::new("hey", "p2");
        assert!(repo.append_reply(thread.id, &reply).await.unwrap());

        let stored = repo.get_thread(thread.id).await.unwrap().unwrap();
        assert_eq!(stored.replies, vec![reply.clone()]);
        assert_eq!(stored.bumped_on, reply.created_on);
        assert!(stored.bumped_on >= stored.created_on);
    }

    #[tokio::test]
    async fn test_append_reply_to_missing_thread() {
        let repo = memory_repo().await;
        assert!(!repo.append_reply(Uuid::now_v7(), &Reply::new("x", "y")).await.unwrap());
    }

    #[tokio::test]
    async fn test_recent_threads_order_and_limit() {
        let repo = memory_repo().await;
        let mut ids = Vec::new();
        for i in 0..12 {
            let thread = Thread::new("busy", format!("thread {i}"), "pw");
            repo.insert_thread(&thread).await.unwrap();
            ids.push(thread.id);
        }
        repo.insert_thread(&Thread::new("other", "elsewhere", "pw")).await.unwrap();

        // Replying to the oldest thread moves it to the top.
        repo.append_reply(ids[0], &Reply::new("bump", "pw")).await.unwrap();

        let threads = repo.recent_threads("busy", 10).await.unwrap();
        assert_eq!(threads.len(), 10);
        assert_eq!(threads[0].id, ids[0]);
        assert_eq!(threads[0].replies.len(), 1);
        assert_eq!(threads[1].id, ids[11]);
        assert!(threads.iter().all(|t| t.board == "busy"));
        assert!(threads.windows(2).all(|w| w[0].bumped_on >= w[1].bumped_on));
    }

    #[tokio::test]
    async fn test_replies_keep_insertion_order() {
        let repo = memory_repo().await;
        let thread = Thread::new("test", "OP", "pw");
        repo.insert_thread(&thread).await.unwrap();
        for i in 0..5 {
            repo.append_reply(thread.id, &Reply::new(format!("r{i}"), "pw")).await.unwrap();
        }

        let stored = repo.get_thread(thread.id).await.unwrap().unwrap();
        let texts: Vec<_> = stored.replies.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, ["r0", "r1", "r2", "r3", "r4"]);
    }

    #[tokio::test]
    async fn test_report_is_idempotent() {
        let repo = memory_repo().await;
        let thread = Thread::new("test", "OP", "pw");
        repo.insert_thread(&thread).await.unwrap();
        let reply = Reply::new("hey", "p2");
        repo.append_reply(thread.id, &reply).await.unwrap();

        for _ in 0..2 {
            assert!(repo.mark_thread_reported(thread.id).await.unwrap());
            assert!(repo.mark_reply_reported(thread.id, reply.id).await.unwrap());
        }

        let stored = repo.get_thread(thread.id).await.unwrap().unwrap();
        assert!(stored.reported);
        assert!(stored.replies[0].reported);
        assert!(!repo.mark_thread_reported(Uuid::now_v7()).await.unwrap());
        assert!(!repo.mark_reply_reported(thread.id, Uuid::now_v7()).await.unwrap());
    }

    #[tokio::test]
    async fn test_reply_text_update_is_scoped_to_its_thread() {
        let repo = memory_repo().await;
        let first = Thread::new("test", "one", "pw");
        let second = Thread::new("test", "two", "pw");
        repo.insert_thread(&first).await.unwrap();
        repo.insert_thread(&second).await.unwrap();
        let reply = Reply::new("hey", "p2");
        repo.append_reply(first.id, &reply).await.unwrap();
        repo.append_reply(first.id, &Reply::new("after", "p3")).await.unwrap();

        assert!(!repo.set_reply_text(second.id, reply.id, "[deleted]").await.unwrap());
        assert!(repo.set_reply_text(first.id, reply.id, "[deleted]").await.unwrap());

        let stored = repo.get_thread(first.id).await.unwrap().unwrap();
        assert_eq!(stored.replies.len(), 2);
        assert_eq!(stored.replies[0].id, reply.id);
        assert_eq!(stored.replies[0].text, "[deleted]");
        assert_eq!(stored.replies[1].text, "after");
    }

    #[tokio::test]
    async fn test_delete_thread_cascades_to_replies() {
        let repo = memory_repo().await;
        let thread = Thread::new("test", "OP", "pw");
        repo.insert_thread(&thread).await.unwrap();
        repo.append_reply(thread.id, &Reply::new("hey", "p2")).await.unwrap();

        assert!(repo.delete_thread(thread.id).await.unwrap());
        assert!(repo.get_thread(thread.id).await.unwrap().is_none());
        assert!(!repo.delete_thread(thread.id).await.unwrap());

        let (orphans,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM replies")
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_all_kept() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("board.db").display());
        let repo = Arc::new(SqliteThreadRepo::connect(&url, 4).await.unwrap());

        let thread = Thread::new("test", "OP", "pw");
        repo.insert_thread(&thread).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = Arc::clone(&repo);
                let id = thread.id;
                tokio::spawn(async move { repo.append_reply(id, &Reply::new(format!("r{i}"), "pw")).await })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().unwrap());
        }

        let stored = repo.get_thread(thread.id).await.unwrap().unwrap();
        assert_eq!(stored.replies.len(), 8);
        let newest = stored.replies.iter().map(|r| r.created_on).max().unwrap();
        assert!(stored.bumped_on <= newest);
        assert!(stored.replies.iter().any(|r| r.created_on == stored.bumped_on));
    }
}
