use rusqlite::params;

use crate::db::models::{Post, Thread, ThreadUpdate, User, UserUpdate};
use crate::db::violation::{classify, Violation};
use crate::forum::error::{ForumError, ForumResult};
use crate::forum::lookup::{find_post, find_thread, find_user};
use crate::forum::{ForumStore, ThreadRef};

impl ForumStore {
    /// Applies a partial profile update. Taking an email that belongs to
    /// another user is a `Conflict`.
    pub fn update_user(&self, nickname: &str, update: &UserUpdate) -> ForumResult<User> {
        self.in_transaction(|tx| {
            let current = find_user(tx, nickname)?
                .ok_or_else(|| ForumError::not_found(format!("user {}", nickname)))?;

            let user = User {
                nickname: current.nickname,
                fullname: update.fullname.clone().unwrap_or(current.fullname),
                about: update.about.clone().unwrap_or(current.about),
                email: update.email.clone().unwrap_or(current.email),
            };

            let result = tx.execute(
                "UPDATE users SET fullname = ?1, about = ?2, email = ?3 WHERE nickname = ?4",
                params![user.fullname, user.about, user.email, user.nickname],
            );
            match result {
                Ok(_) => Ok(user),
                Err(err) if classify(&err) == Violation::Unique => Err(ForumError::Conflict(
                    format!("email {} is already taken", user.email),
                )),
                Err(err) => Err(err.into()),
            }
        })
    }

    pub fn update_thread(&self, thread: &ThreadRef, update: &ThreadUpdate) -> ForumResult<Thread> {
        self.in_transaction(|tx| {
            let current = find_thread(tx, thread)?
                .ok_or_else(|| ForumError::not_found(thread.to_string()))?;

            tx.execute(
                "UPDATE threads SET title = ?1, message = ?2 WHERE id = ?3",
                params![
                    update.title.as_deref().unwrap_or(&current.title),
                    update.message.as_deref().unwrap_or(&current.message),
                    current.id
                ],
            )?;

            find_thread(tx, &ThreadRef::Id(current.id))?
                .ok_or_else(|| ForumError::not_found(thread.to_string()))
        })
    }

    /// Replaces a post's message. The edited flag is only raised when the
    /// message actually changes.
    pub fn update_post(&self, id: i64, message: Option<&str>) -> ForumResult<Post> {
        self.in_transaction(|tx| {
            let current =
                find_post(tx, id)?.ok_or_else(|| ForumError::not_found(format!("post {}", id)))?;

            match message {
                Some(message) if message != current.message => {
                    tx.execute(
                        "UPDATE posts SET message = ?1, is_edited = 1 WHERE id = ?2",
                        params![message, id],
                    )?;
                    find_post(tx, id)?.ok_or_else(|| ForumError::not_found(format!("post {}", id)))
                }
                _ => Ok(current),
            }
        })
    }
}
