//! Persistence operations for the chat history log.
//!
//! Writes go through [`append_record`], which lets SQLite assign the row id
//! and the insert timestamp. Reads go through [`list_recent`], which returns
//! the newest records first.
//!
//! [`HistoryStore`] wraps both behind the connection pool for async callers:
//! each call checks a connection out inside a blocking task and returns it to
//! the pool when the task finishes, whatever the outcome.

use hexa_types::ChatRecord;
use rusqlite::{params, Connection};

use crate::error::StoreError;
use crate::pool::DbPool;

/// Inserts a question/answer pair and returns the stored record.
///
/// # Errors
///
/// Returns `StoreError::Database` on SQL failure.
pub fn append_record(
    conn: &Connection,
    question: &str,
    answer: &str,
) -> Result<ChatRecord, StoreError> {
    let record = conn.query_row(
        "INSERT INTO chat_history (question, answer)
         VALUES (?1, ?2)
         RETURNING id, question, answer, created_at",
        params![question, answer],
        |row| {
            Ok(ChatRecord {
                id: row.get(0)?,
                question: row.get(1)?,
                answer: row.get(2)?,
                created_at: row.get(3)?,
            })
        },
    )?;
    Ok(record)
}

/// Returns up to `limit` records, most recent first.
///
/// Records sharing a timestamp are ordered by id so that insertion order
/// still decides.
///
/// # Errors
///
/// Returns `StoreError::Database` on SQL failure.
pub fn list_recent(conn: &Connection, limit: usize) -> Result<Vec<ChatRecord>, StoreError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let mut stmt = conn.prepare(
        "SELECT id, question, answer, created_at
         FROM chat_history
         ORDER BY created_at DESC, id DESC
         LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit], |row| {
        Ok(ChatRecord {
            id: row.get(0)?,
            question: row.get(1)?,
            answer: row.get(2)?,
            created_at: row.get(3)?,
        })
    })?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row?);
    }
    Ok(records)
}

/// Pool-backed, async-friendly handle to the chat history log.
#[derive(Clone)]
pub struct HistoryStore {
    pool: DbPool,
}

impl HistoryStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Persists a question/answer pair.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if no connection is available or the insert fails.
    pub async fn append(&self, question: &str, answer: &str) -> Result<ChatRecord, StoreError> {
        let question = question.to_string();
        let answer = answer.to_string();
        self.with_connection(move |conn| append_record(conn, &question, &answer))
            .await
    }

    /// Reads up to `limit` records, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if no connection is available or the query fails.
    pub async fn list_recent(&self, limit: usize) -> Result<Vec<ChatRecord>, StoreError> {
        self.with_connection(move |conn| list_recent(conn, limit))
            .await
    }

    async fn with_connection<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            // The pooled connection is released when `conn` drops at the end
            // of this closure, on both the success and error paths.
            let conn = pool.get()?;
            op(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}
