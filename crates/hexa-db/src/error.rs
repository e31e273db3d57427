//! Error types for history store operations.

/// Errors raised by the history store.
///
/// All variants mean the same thing to callers: the store is unavailable
/// for this operation. The split exists for logging.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No connection could be checked out of the pool.
    #[error("history store unavailable: {0}")]
    Unavailable(#[from] r2d2::Error),

    /// A statement or transaction failed.
    #[error("history store query failed: {0}")]
    Database(#[from] rusqlite::Error),

    /// The blocking task running the operation panicked or was cancelled.
    #[error("history store task failed: {0}")]
    Task(String),
}
