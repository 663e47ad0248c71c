//! Single-entity reads by key. The free functions take a bare connection so
//! the create paths can call them inside their own transaction.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::db::models::{Forum, Post, Thread, User};
use crate::forum::error::{ForumError, ForumResult};
use crate::forum::{ForumStore, ThreadRef};

pub fn find_user(conn: &Connection, nickname: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {} FROM users WHERE nickname = ?1", User::COLUMNS),
        params![nickname],
        User::from_row,
    )
    .optional()
}

/// Every user holding either natural key of a would-be new user.
pub fn find_clashing_users(
    conn: &Connection,
    nickname: &str,
    email: &str,
) -> rusqlite::Result<Vec<User>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM users WHERE nickname = ?1 OR email = ?2 ORDER BY nickname",
        User::COLUMNS
    ))?;
    let users = stmt
        .query_map(params![nickname, email], User::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(users)
}

pub fn find_forum(conn: &Connection, slug: &str) -> rusqlite::Result<Option<Forum>> {
    conn.query_row(
        &format!("SELECT {} FROM forums WHERE slug = ?1", Forum::COLUMNS),
        params![slug],
        Forum::from_row,
    )
    .optional()
}

pub fn find_thread(conn: &Connection, thread: &ThreadRef) -> rusqlite::Result<Option<Thread>> {
    match thread {
        ThreadRef::Id(id) => conn
            .query_row(
                &format!("SELECT {} FROM threads WHERE id = ?1", Thread::COLUMNS),
                params![id],
                Thread::from_row,
            )
            .optional(),
        ThreadRef::Slug(slug) => conn
            .query_row(
                &format!("SELECT {} FROM threads WHERE slug = ?1", Thread::COLUMNS),
                params![slug],
                Thread::from_row,
            )
            .optional(),
    }
}

pub fn find_post(conn: &Connection, id: i64) -> rusqlite::Result<Option<Post>> {
    conn.query_row(
        &format!("SELECT {} FROM posts WHERE id = ?1", Post::COLUMNS),
        params![id],
        Post::from_row,
    )
    .optional()
}

/// Which related entities to embed in a post details response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Related {
    pub user: bool,
    pub forum: bool,
    pub thread: bool,
}

impl Related {
    /// Parses a comma separated list such as `user,thread`. Unknown names
    /// are ignored.
    pub fn parse(raw: &str) -> Self {
        let mut related = Self::default();
        for name in raw.split(',').map(str::trim) {
            match name {
                "user" => related.user = true,
                "forum" => related.forum = true,
                "thread" => related.thread = true,
                _ => {}
            }
        }
        related
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetails {
    pub post: Post,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forum: Option<Forum>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread: Option<Thread>,
}

impl ForumStore {
    pub fn user(&self, nickname: &str) -> ForumResult<User> {
        let conn = self.pool().get()?;
        find_user(&conn, nickname)?.ok_or_else(|| ForumError::not_found(format!("user {}", nickname)))
    }

    pub fn forum(&self, slug: &str) -> ForumResult<Forum> {
        let conn = self.pool().get()?;
        find_forum(&conn, slug)?.ok_or_else(|| ForumError::not_found(format!("forum {}", slug)))
    }

    pub fn thread(&self, thread: &ThreadRef) -> ForumResult<Thread> {
        let conn = self.pool().get()?;
        find_thread(&conn, thread)?.ok_or_else(|| ForumError::not_found(thread.to_string()))
    }

    pub fn post(&self, id: i64) -> ForumResult<Post> {
        let conn = self.pool().get()?;
        find_post(&conn, id)?.ok_or_else(|| ForumError::not_found(format!("post {}", id)))
    }

    pub fn post_details(&self, id: i64, related: Related) -> ForumResult<PostDetails> {
        let conn = self.pool().get()?;
        let post =
            find_post(&conn, id)?.ok_or_else(|| ForumError::not_found(format!("post {}", id)))?;

        let author = if related.user {
            find_user(&conn, &post.author)?
        } else {
            None
        };
        let forum = if related.forum {
            find_forum(&conn, &post.forum)?
        } else {
            None
        };
        let thread = if related.thread {
            find_thread(&conn, &ThreadRef::Id(post.thread))?
        } else {
            None
        };

        Ok(PostDetails {
            post,
            author,
            forum,
            thread,
        })
    }
}
