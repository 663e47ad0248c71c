//! Create-then-resolve for users, forums, threads and votes.
//!
//! Every create goes straight to an INSERT. The storage constraints decide
//! whether the entity already exists: a unique clash is answered with the
//! stored entity (or, for votes, turned into an update), a dangling foreign
//! key becomes `MissingReference`. There is no check-then-act read before the
//! insert and no retry loop.

use chrono::Utc;
use rusqlite::{params, Connection};

use crate::db::models::{Forum, NewForum, NewThread, Thread, User, Vote};
use crate::db::violation::{classify, Violation};
use crate::forum::error::{ForumError, ForumResult};
use crate::forum::lookup::{find_clashing_users, find_forum, find_thread};
use crate::forum::{ForumStore, ThreadRef};

/// Terminal state of a create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, C = T> {
    /// A new row was inserted.
    Created(T),
    /// The natural key was taken; carries what is stored under it.
    Existing(C),
    /// An existing row was overwritten with the request (votes only).
    Updated(T),
}

/// Maps the result of an insert attempt onto the protocol's terminal states.
fn settle<T, C>(
    attempt: rusqlite::Result<T>,
    on_unique: impl FnOnce() -> ForumResult<C>,
    missing: impl FnOnce() -> String,
) -> ForumResult<Outcome<T, C>> {
    match attempt {
        Ok(created) => Ok(Outcome::Created(created)),
        Err(err) => match classify(&err) {
            Violation::Unique => on_unique().map(Outcome::Existing),
            Violation::ForeignKey => Err(ForumError::MissingReference(missing())),
            Violation::Other => Err(err.into()),
        },
    }
}

fn insert_thread(conn: &Connection, forum: &str, thread: &NewThread) -> rusqlite::Result<Thread> {
    let created = thread.created.unwrap_or_else(Utc::now);
    let slug = thread.slug.as_deref().filter(|s| !s.is_empty());

    // Author and forum are rewritten to their stored spelling; an unknown key
    // is passed through unchanged so the foreign key rejects it.
    conn.execute(
        "INSERT INTO threads (slug, author, forum, title, message, created)
         VALUES (
            ?1,
            COALESCE((SELECT nickname FROM users WHERE nickname = ?2), ?2),
            COALESCE((SELECT slug FROM forums WHERE slug = ?3), ?3),
            ?4, ?5, ?6
         )",
        params![slug, thread.author, forum, thread.title, thread.message, created],
    )?;
    let id = conn.last_insert_rowid();

    conn.execute(
        "UPDATE forums SET threads = threads + 1
         WHERE slug = (SELECT forum FROM threads WHERE id = ?1)",
        params![id],
    )?;

    conn.query_row(
        &format!("SELECT {} FROM threads WHERE id = ?1", Thread::COLUMNS),
        params![id],
        Thread::from_row,
    )
}

impl ForumStore {
    pub fn create_user(&self, user: &User) -> ForumResult<Outcome<User, Vec<User>>> {
        self.in_transaction(|tx| {
            let attempt = tx
                .execute(
                    "INSERT INTO users (nickname, fullname, about, email) VALUES (?1, ?2, ?3, ?4)",
                    params![user.nickname, user.fullname, user.about, user.email],
                )
                .map(|_| user.clone());

            settle(
                attempt,
                || {
                    tracing::debug!(nickname = %user.nickname, "user exists, returning stored users");
                    Ok(find_clashing_users(tx, &user.nickname, &user.email)?)
                },
                || format!("user {}", user.nickname),
            )
        })
    }

    pub fn create_forum(&self, forum: &NewForum) -> ForumResult<Outcome<Forum>> {
        self.in_transaction(|tx| {
            let attempt = tx
                .execute(
                    "INSERT INTO forums (slug, title, owner)
                     VALUES (?1, ?2, COALESCE((SELECT nickname FROM users WHERE nickname = ?3), ?3))",
                    params![forum.slug, forum.title, forum.user],
                )
                .and_then(|_| {
                    find_forum(tx, &forum.slug)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
                });

            settle(
                attempt,
                || {
                    tracing::debug!(slug = %forum.slug, "forum exists, returning stored forum");
                    find_forum(tx, &forum.slug)?
                        .ok_or_else(|| ForumError::not_found(format!("forum {}", forum.slug)))
                },
                || format!("user {}", forum.user),
            )
        })
    }

    pub fn create_thread(&self, forum: &str, thread: &NewThread) -> ForumResult<Outcome<Thread>> {
        self.in_transaction(|tx| {
            settle(
                insert_thread(tx, forum, thread),
                || {
                    let slug = thread.slug.clone().unwrap_or_default();
                    tracing::debug!(slug = %slug, "thread exists, returning stored thread");
                    find_thread(tx, &ThreadRef::Slug(slug.clone()))?
                        .ok_or_else(|| ForumError::not_found(format!("thread {}", slug)))
                },
                || format!("forum {} or user {}", forum, thread.author),
            )
        })
    }

    /// Records a vote, or replaces the voter's previous voice on the thread.
    /// The thread's tally is recomputed in the same transaction.
    pub fn vote(&self, thread: &ThreadRef, vote: &Vote) -> ForumResult<Outcome<Thread>> {
        self.in_transaction(|tx| {
            let target = find_thread(tx, thread)?
                .ok_or_else(|| ForumError::MissingReference(thread.to_string()))?;

            let attempt = tx.execute(
                "INSERT INTO votes (thread, nickname, voice)
                 VALUES (?1, COALESCE((SELECT nickname FROM users WHERE nickname = ?2), ?2), ?3)",
                params![target.id, vote.nickname, vote.voice],
            );

            let created = match attempt {
                Ok(_) => true,
                Err(err) => match classify(&err) {
                    Violation::Unique => {
                        tracing::debug!(thread = target.id, nickname = %vote.nickname, "replacing earlier vote");
                        tx.execute(
                            "UPDATE votes SET voice = ?1 WHERE thread = ?2 AND nickname = ?3",
                            params![vote.voice, target.id, vote.nickname],
                        )?;
                        false
                    }
                    Violation::ForeignKey => {
                        return Err(ForumError::MissingReference(format!(
                            "user {}",
                            vote.nickname
                        )))
                    }
                    Violation::Other => return Err(err.into()),
                },
            };

            tx.execute(
                "UPDATE threads
                 SET votes = (SELECT COALESCE(SUM(voice), 0) FROM votes WHERE thread = ?1)
                 WHERE id = ?1",
                params![target.id],
            )?;

            let updated = find_thread(tx, &ThreadRef::Id(target.id))?
                .ok_or_else(|| ForumError::not_found(thread.to_string()))?;

            Ok(if created {
                Outcome::Created(updated)
            } else {
                Outcome::Updated(updated)
            })
        })
    }
}
