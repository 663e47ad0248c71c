//! Materialized ancestry paths.
//!
//! Every post carries the ids of its ancestors from the thread root down to
//! itself. Comparing two paths element by element (a prefix sorts first) gives
//! a depth-first preorder of the thread, so the path doubles as the sort key of
//! the `tree` and `parent_tree` traversals.
//!
//! In storage the path is a string of fixed-width hex segments; byte order of
//! the encoded form is the same as the order of the decoded sequence.

use rusqlite::{params, Connection, OptionalExtension};
use std::fmt;

use crate::forum::error::{ForumError, ForumResult};

const SEGMENT_WIDTH: usize = 16;
const SEPARATOR: char = '.';

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PathError {
    #[error("empty path")]
    Empty,

    #[error("malformed path segment: {0:?}")]
    Segment(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PostPath(Vec<i64>);

impl PostPath {
    /// Path of a post without a parent.
    pub fn root(id: i64) -> Self {
        Self(vec![id])
    }

    /// Path of a new reply to the post owning `self`.
    pub fn child(&self, id: i64) -> Self {
        let mut ids = Vec::with_capacity(self.0.len() + 1);
        ids.extend_from_slice(&self.0);
        ids.push(id);
        Self(ids)
    }

    pub fn ids(&self) -> &[i64] {
        &self.0
    }

    /// Id of the top-level post this path descends from.
    pub fn root_id(&self) -> Option<i64> {
        self.0.first().copied()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(self.0.len() * (SEGMENT_WIDTH + 1));
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(SEPARATOR);
            }
            out.push_str(&format!("{:0width$x}", id, width = SEGMENT_WIDTH));
        }
        out
    }

    pub fn decode(encoded: &str) -> Result<Self, PathError> {
        if encoded.is_empty() {
            return Err(PathError::Empty);
        }

        encoded
            .split(SEPARATOR)
            .map(|segment| {
                if segment.len() != SEGMENT_WIDTH {
                    return Err(PathError::Segment(segment.to_string()));
                }
                i64::from_str_radix(segment, 16).map_err(|_| PathError::Segment(segment.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl From<Vec<i64>> for PostPath {
    fn from(ids: Vec<i64>) -> Self {
        Self(ids)
    }
}

impl fmt::Display for PostPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self.0.iter().map(|id| id.to_string()).collect();
        write!(f, "[{}]", ids.join(", "))
    }
}

/// Path of `parent`, which must be a post of `thread`.
pub fn parent_path(conn: &Connection, thread: i64, parent: i64) -> ForumResult<PostPath> {
    let row: Option<(i64, String)> = conn
        .query_row(
            "SELECT thread, path FROM posts WHERE id = ?1",
            params![parent],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    match row {
        Some((owner, encoded)) if owner == thread => PostPath::decode(&encoded)
            .map_err(|e| ForumError::Internal(format!("post {} has a corrupt path: {}", parent, e))),
        _ => Err(ForumError::InvalidParent(parent)),
    }
}

/// Stamps a freshly inserted post with its path. Returns the stored path.
pub fn assign(conn: &Connection, id: i64, parent: Option<&PostPath>) -> ForumResult<PostPath> {
    let path = match parent {
        Some(parent) => parent.child(id),
        None => PostPath::root(id),
    };
    let root = path.root_id().unwrap_or(id);

    conn.execute(
        "UPDATE posts SET path = ?1, root = ?2 WHERE id = ?3",
        params![path.encode(), root, id],
    )?;

    Ok(path)
}
