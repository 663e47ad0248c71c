#![allow(dead_code)]

use forumd::db;
use forumd::db::models::{Forum, NewForum, NewPost, NewThread, Post, Thread, User};
use forumd::forum::{ForumStore, Outcome};
use tempfile::TempDir;

// Helper to create a migrated store in a temporary directory
pub fn create_test_store() -> (ForumStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let pool = db::create_pool(&db_path, 4).expect("Failed to create test database");
    db::run_migrations(&pool).expect("Failed to run migrations");

    (ForumStore::new(pool), temp_dir)
}

pub fn user(nickname: &str) -> User {
    User {
        nickname: nickname.to_string(),
        fullname: format!("{} Fullname", nickname),
        about: format!("About {}", nickname),
        email: format!("{}@example.com", nickname.to_lowercase()),
    }
}

pub fn seed_user(store: &ForumStore, nickname: &str) -> User {
    match store.create_user(&user(nickname)).unwrap() {
        Outcome::Created(user) => user,
        other => panic!("expected a new user, got {:?}", other),
    }
}

pub fn seed_forum(store: &ForumStore, slug: &str, owner: &str) -> Forum {
    let forum = NewForum {
        slug: slug.to_string(),
        title: format!("Forum {}", slug),
        user: owner.to_string(),
    };
    match store.create_forum(&forum).unwrap() {
        Outcome::Created(forum) => forum,
        other => panic!("expected a new forum, got {:?}", other),
    }
}

pub fn new_thread(author: &str, slug: Option<&str>) -> NewThread {
    NewThread {
        author: author.to_string(),
        title: "Thread title".to_string(),
        message: "Thread message".to_string(),
        slug: slug.map(str::to_string),
        created: None,
    }
}

pub fn seed_thread(store: &ForumStore, forum: &str, author: &str, slug: Option<&str>) -> Thread {
    match store.create_thread(forum, &new_thread(author, slug)).unwrap() {
        Outcome::Created(thread) => thread,
        other => panic!("expected a new thread, got {:?}", other),
    }
}

/// A user, a forum and an empty thread.
pub fn seed_board(store: &ForumStore) -> Thread {
    seed_user(store, "alice");
    seed_forum(store, "rust", "alice");
    seed_thread(store, "rust", "alice", Some("first-thread"))
}

pub fn draft(author: &str, parent: Option<i64>) -> NewPost {
    NewPost {
        author: author.to_string(),
        message: match parent {
            Some(parent) => format!("reply to {}", parent),
            None => "root post".to_string(),
        },
        parent,
    }
}

/// Inserts a single post and returns it.
pub fn reply(store: &ForumStore, thread: &Thread, parent: Option<i64>) -> Post {
    store
        .create_posts(thread, &[draft("alice", parent)])
        .unwrap()
        .remove(0)
}

pub fn ids(posts: &[Post]) -> Vec<i64> {
    posts.iter().map(|p| p.id).collect()
}

pub fn count(store: &ForumStore, table: &str) -> i64 {
    let conn = store.pool().get().unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
    .unwrap()
}
