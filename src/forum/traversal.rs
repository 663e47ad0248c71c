//! Paginated listing of a thread's posts in one of three orders.
//!
//! - `flat`: by id.
//! - `tree`: by materialized path, a depth-first walk of the reply tree.
//! - `parent_tree`: whole top-level branches. The limit counts root posts,
//!   and each selected root comes back with all of its descendants in path
//!   order, however many rows that is. Roots follow the requested direction;
//!   posts inside a branch are always in ascending path order.
//!
//! `tree` and `parent_tree` cursors are post ids that get resolved to their
//! path first; a cursor post that is unknown or belongs to another thread is
//! an error, not an empty page.

use rusqlite::{params, Connection};

use crate::db::models::Post;
use crate::forum::cursor::{Page, SortMode};
use crate::forum::error::{ForumError, ForumResult};
use crate::forum::lookup::find_post;
use crate::forum::path::PostPath;
use crate::forum::ForumStore;

impl ForumStore {
    /// Lists posts of thread `thread_id`. The caller checks that the thread
    /// exists; an unknown thread id yields an empty page here.
    pub fn thread_posts(
        &self,
        thread_id: i64,
        sort: SortMode,
        page: &Page<i64>,
    ) -> ForumResult<Vec<Post>> {
        let conn = self.pool().get()?;
        match sort {
            SortMode::Flat => flat(&conn, thread_id, page),
            SortMode::Tree => tree(&conn, thread_id, page),
            SortMode::ParentTree => parent_tree(&conn, thread_id, page),
        }
    }
}

/// Path of the cursor post, which must belong to the listed thread.
fn cursor_path(conn: &Connection, thread_id: i64, since: i64) -> ForumResult<PostPath> {
    find_post(conn, since)?
        .filter(|post| post.thread == thread_id)
        .map(|post| post.path)
        .ok_or(ForumError::UnknownCursor(since))
}

fn collect(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> ForumResult<Vec<Post>> {
    let mut stmt = conn.prepare(sql)?;
    let posts = stmt
        .query_map(params, Post::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(posts)
}

fn flat(conn: &Connection, thread_id: i64, page: &Page<i64>) -> ForumResult<Vec<Post>> {
    match page.since {
        Some(since) => collect(
            conn,
            &format!(
                "SELECT {} FROM posts WHERE thread = ?1 AND id {} ?2 ORDER BY id {} LIMIT ?3",
                Post::COLUMNS,
                page.after(),
                page.order()
            ),
            params![thread_id, since, page.sql_limit()],
        ),
        None => collect(
            conn,
            &format!(
                "SELECT {} FROM posts WHERE thread = ?1 ORDER BY id {} LIMIT ?2",
                Post::COLUMNS,
                page.order()
            ),
            params![thread_id, page.sql_limit()],
        ),
    }
}

fn tree(conn: &Connection, thread_id: i64, page: &Page<i64>) -> ForumResult<Vec<Post>> {
    match page.since {
        Some(since) => {
            let from = cursor_path(conn, thread_id, since)?;
            collect(
                conn,
                &format!(
                    "SELECT {} FROM posts WHERE thread = ?1 AND path {} ?2
                     ORDER BY path {order}, id {order} LIMIT ?3",
                    Post::COLUMNS,
                    page.after(),
                    order = page.order()
                ),
                params![thread_id, from.encode(), page.sql_limit()],
            )
        }
        None => collect(
            conn,
            &format!(
                "SELECT {} FROM posts WHERE thread = ?1
                 ORDER BY path {order}, id {order} LIMIT ?2",
                Post::COLUMNS,
                order = page.order()
            ),
            params![thread_id, page.sql_limit()],
        ),
    }
}

fn parent_tree(conn: &Connection, thread_id: i64, page: &Page<i64>) -> ForumResult<Vec<Post>> {
    let from_root = match page.since {
        Some(since) => Some(
            cursor_path(conn, thread_id, since)?
                .root_id()
                .ok_or(ForumError::UnknownCursor(since))?,
        ),
        None => None,
    };

    let root_filter = match from_root {
        Some(_) => format!("AND id {} ?2", page.after()),
        None => String::new(),
    };
    let sql = format!(
        "SELECT {columns} FROM posts
         WHERE root IN (
            SELECT id FROM posts
            WHERE thread = ?1 AND parent IS NULL {root_filter}
            ORDER BY id {order} LIMIT ?3
         )
         ORDER BY root {order}, path ASC, id ASC",
        columns = Post::COLUMNS,
        root_filter = root_filter,
        order = page.order()
    );

    // ?2 is bound even when unused so the placeholder numbering stays fixed.
    collect(
        conn,
        &sql,
        params![thread_id, from_root.unwrap_or(0), page.sql_limit()],
    )
}
