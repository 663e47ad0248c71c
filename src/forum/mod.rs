//! Forum core: entity lookups, the create protocol, batch post insertion and
//! the thread traversals. Everything hangs off [`ForumStore`], a handle over
//! the connection pool that is built once and passed to whoever needs it.

pub mod batch;
pub mod cursor;
pub mod edit;
pub mod error;
pub mod listing;
pub mod lookup;
pub mod path;
pub mod protocol;
pub mod traversal;

use rusqlite::{Transaction, TransactionBehavior};
use std::fmt;

use crate::state::DbPool;

pub use cursor::{Page, SortMode};
pub use error::{ForumError, ForumResult};
pub use path::PostPath;
pub use protocol::Outcome;

#[derive(Clone)]
pub struct ForumStore {
    pool: DbPool,
}

impl ForumStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Runs `f` inside an immediate transaction. Commits when `f` succeeds;
    /// any error drops the transaction, which rolls it back.
    pub(crate) fn in_transaction<T>(
        &self,
        f: impl FnOnce(&Transaction<'_>) -> ForumResult<T>,
    ) -> ForumResult<T> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

/// A thread is addressed by numeric id or by slug at every read boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadRef {
    Id(i64),
    Slug(String),
}

impl ThreadRef {
    /// All-digit input is an id, anything else a slug.
    pub fn parse(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = raw.parse() {
                return Self::Id(id);
            }
        }
        Self::Slug(raw.to_string())
    }
}

impl fmt::Display for ThreadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "thread {}", id),
            Self::Slug(slug) => write!(f, "thread {}", slug),
        }
    }
}
