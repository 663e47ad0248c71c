//! Forum-level listings and service maintenance.

use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::db::models::{ServiceStatus, Thread, User};
use crate::forum::cursor::Page;
use crate::forum::error::{ForumError, ForumResult};
use crate::forum::lookup::find_forum;
use crate::forum::ForumStore;

impl ForumStore {
    /// Threads of a forum ordered by creation time. The `since` timestamp is
    /// inclusive.
    pub fn forum_threads(
        &self,
        slug: &str,
        page: &Page<DateTime<Utc>>,
    ) -> ForumResult<Vec<Thread>> {
        let conn = self.pool().get()?;
        let forum =
            find_forum(&conn, slug)?.ok_or_else(|| ForumError::not_found(format!("forum {}", slug)))?;

        let since_filter = match page.since {
            Some(_) => format!("AND created {} ?2", page.from()),
            None => String::new(),
        };
        let mut stmt = conn.prepare(&format!(
            "SELECT {columns} FROM threads WHERE forum = ?1 {since_filter}
             ORDER BY created {order}, id {order} LIMIT ?3",
            columns = Thread::COLUMNS,
            since_filter = since_filter,
            order = page.order()
        ))?;

        let threads = stmt
            .query_map(
                params![forum.slug, page.since, page.sql_limit()],
                Thread::from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(threads)
    }

    /// Users who started a thread or wrote a post in the forum, ordered by
    /// nickname without regard to case. The `since` nickname is exclusive.
    pub fn forum_users(&self, slug: &str, page: &Page<String>) -> ForumResult<Vec<User>> {
        let conn = self.pool().get()?;
        let forum =
            find_forum(&conn, slug)?.ok_or_else(|| ForumError::not_found(format!("forum {}", slug)))?;

        let since_filter = match page.since {
            Some(_) => format!("AND nickname {} ?2", page.after()),
            None => String::new(),
        };
        let mut stmt = conn.prepare(&format!(
            "SELECT {columns} FROM users
             WHERE nickname IN (
                SELECT author FROM threads WHERE forum = ?1
                UNION
                SELECT author FROM posts WHERE forum = ?1
             ) {since_filter}
             ORDER BY nickname {order} LIMIT ?3",
            columns = User::COLUMNS,
            since_filter = since_filter,
            order = page.order()
        ))?;

        let users = stmt
            .query_map(
                params![forum.slug, page.since, page.sql_limit()],
                User::from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    pub fn status(&self) -> ForumResult<ServiceStatus> {
        let conn = self.pool().get()?;
        let status = conn.query_row(
            "SELECT (SELECT COUNT(*) FROM users),
                    (SELECT COUNT(*) FROM forums),
                    (SELECT COUNT(*) FROM threads),
                    (SELECT COUNT(*) FROM posts)",
            [],
            |row| {
                Ok(ServiceStatus {
                    user: row.get(0)?,
                    forum: row.get(1)?,
                    thread: row.get(2)?,
                    post: row.get(3)?,
                })
            },
        )?;
        Ok(status)
    }

    /// Removes every user, forum, thread, post and vote.
    pub fn clear(&self) -> ForumResult<()> {
        self.in_transaction(|tx| {
            tx.execute_batch(
                "DELETE FROM votes;
                 DELETE FROM posts;
                 DELETE FROM threads;
                 DELETE FROM forums;
                 DELETE FROM users;
                 DELETE FROM sqlite_sequence WHERE name IN ('threads', 'posts');",
            )?;
            Ok(())
        })?;
        tracing::info!("Cleared all forum data");
        Ok(())
    }
}
