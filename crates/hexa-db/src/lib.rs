//! Persistence layer for the Hexa gateway.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization,
//! embedded SQL migrations, and the chat history store.
//!
//! Every connection is checked out of the pool for the duration of a single
//! operation and returned when the guard drops, on success and error paths
//! alike. Callers never hold a connection across an `.await`.

mod error;
mod history;
mod migrations;
mod pool;

pub use error::StoreError;
pub use history::{append_record, list_recent, HistoryStore};
pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};
