//! All-or-nothing insertion of a list of replies into one thread.

use chrono::Utc;
use rusqlite::params;

use crate::db::models::{NewPost, Post, Thread};
use crate::db::violation::{classify, Violation};
use crate::forum::error::{ForumError, ForumResult};
use crate::forum::path;
use crate::forum::ForumStore;

impl ForumStore {
    /// Inserts `drafts` into `thread` in one transaction.
    ///
    /// Every post of the batch gets the same creation time. A draft whose
    /// parent is not a post of `thread` fails the whole batch with
    /// `InvalidParent`; an unknown author fails it with `MissingReference`.
    /// Parents may point at posts created earlier in the same batch.
    pub fn create_posts(&self, thread: &Thread, drafts: &[NewPost]) -> ForumResult<Vec<Post>> {
        if drafts.is_empty() {
            return Ok(Vec::new());
        }

        let created = Utc::now();

        let posts = self.in_transaction(|tx| {
            let mut stmt = tx.prepare(
                "INSERT INTO posts (author, created, forum, thread, parent, message)
                 VALUES (
                    COALESCE((SELECT nickname FROM users WHERE nickname = ?1), ?1),
                    ?2, ?3, ?4, ?5, ?6
                 )",
            )?;

            let mut posts = Vec::with_capacity(drafts.len());
            for draft in drafts {
                let parent_path = match draft.parent {
                    Some(parent) => Some(path::parent_path(tx, thread.id, parent)?),
                    None => None,
                };

                if let Err(err) = stmt.execute(params![
                    draft.author,
                    created,
                    thread.forum,
                    thread.id,
                    draft.parent,
                    draft.message,
                ]) {
                    return Err(match classify(&err) {
                        Violation::ForeignKey => {
                            ForumError::MissingReference(format!("user {}", draft.author))
                        }
                        _ => err.into(),
                    });
                }

                let id = tx.last_insert_rowid();
                let path = path::assign(tx, id, parent_path.as_ref())?;
                let author: String = tx.query_row(
                    "SELECT author FROM posts WHERE id = ?1",
                    params![id],
                    |row| row.get(0),
                )?;

                posts.push(Post {
                    id,
                    author,
                    created,
                    forum: thread.forum.clone(),
                    thread: thread.id,
                    parent: draft.parent,
                    message: draft.message.clone(),
                    is_edited: false,
                    path,
                });
            }

            tx.execute(
                "UPDATE forums SET posts = posts + ?1 WHERE slug = ?2",
                params![posts.len() as i64, thread.forum],
            )?;

            Ok(posts)
        })?;

        tracing::debug!(thread = thread.id, count = posts.len(), "created posts");
        Ok(posts)
    }
}
