use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use crate::forum::path::PostPath;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub nickname: String,
    pub fullname: String,
    #[serde(default)]
    pub about: String,
    pub email: String,
}

impl User {
    pub const COLUMNS: &'static str = "nickname, fullname, about, email";

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            nickname: row.get(0)?,
            fullname: row.get(1)?,
            about: row.get(2)?,
            email: row.get(3)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forum {
    pub slug: String,
    pub title: String,
    pub user: String,
    #[serde(default)]
    pub posts: i64,
    #[serde(default)]
    pub threads: i64,
}

impl Forum {
    pub const COLUMNS: &'static str = "slug, title, owner, posts, threads";

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            slug: row.get(0)?,
            title: row.get(1)?,
            user: row.get(2)?,
            posts: row.get(3)?,
            threads: row.get(4)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub author: String,
    pub forum: String,
    pub title: String,
    pub message: String,
    pub created: DateTime<Utc>,
    pub votes: i64,
}

impl Thread {
    pub const COLUMNS: &'static str = "id, slug, author, forum, title, message, created, votes";

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            slug: row.get(1)?,
            author: row.get(2)?,
            forum: row.get(3)?,
            title: row.get(4)?,
            message: row.get(5)?,
            created: row.get(6)?,
            votes: row.get(7)?,
        })
    }
}

/// A reply inside a thread. `path` is the materialized ancestry and is never
/// sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: i64,
    pub author: String,
    pub created: DateTime<Utc>,
    pub forum: String,
    pub thread: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<i64>,
    pub message: String,
    #[serde(rename = "isEdited")]
    pub is_edited: bool,
    #[serde(skip)]
    pub path: PostPath,
}

impl Post {
    pub const COLUMNS: &'static str =
        "id, author, created, forum, thread, parent, message, is_edited, path";

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let encoded: String = row.get(8)?;
        let path = PostPath::decode(&encoded).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Self {
            id: row.get(0)?,
            author: row.get(1)?,
            created: row.get(2)?,
            forum: row.get(3)?,
            thread: row.get(4)?,
            parent: row.get(5)?,
            message: row.get(6)?,
            is_edited: row.get(7)?,
            path,
        })
    }
}

/// Client input for a single post of a batch.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
    pub author: String,
    pub message: String,
    #[serde(default)]
    pub parent: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewForum {
    pub slug: String,
    pub title: String,
    pub user: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewThread {
    pub author: String,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Vote {
    pub nickname: String,
    pub voice: i32,
}

/// Partial profile update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub fullname: Option<String>,
    pub about: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThreadUpdate {
    pub title: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    pub user: i64,
    pub forum: i64,
    pub thread: i64,
    pub post: i64,
}
