pub mod models;
pub mod violation;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use std::path::Path;

use crate::state::DbPool;

pub const MIGRATIONS: &[(&str, &str)] = &[
    (
        "001_initial",
        include_str!("../../migrations/001_initial.sql"),
    ),
    ("002_posts", include_str!("../../migrations/002_posts.sql")),
    ("003_votes", include_str!("../../migrations/003_votes.sql")),
];

// Runs on every pooled connection; foreign_keys is a per-connection setting.
const CONNECTION_PRAGMAS: &str = "
    PRAGMA busy_timeout = 5000;
    PRAGMA journal_mode = WAL;
    PRAGMA synchronous = NORMAL;
    PRAGMA foreign_keys = ON;
";

pub fn create_pool(db_path: &Path, max_size: u32) -> anyhow::Result<DbPool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let manager = SqliteConnectionManager::file(db_path)
        .with_init(|conn| conn.execute_batch(CONNECTION_PRAGMAS));
    let pool = Pool::builder().max_size(max_size).build(manager)?;

    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    let conn = pool.get()?;

    // Create migrations tracking table
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    for (name, sql) in MIGRATIONS {
        let already_applied: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM schema_version WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;

        if !already_applied {
            tracing::info!("Applying migration: {}", name);
            conn.execute_batch(sql)?;
            conn.execute(
                "INSERT INTO schema_version (name) VALUES (?1)",
                params![name],
            )?;
        }
    }

    tracing::info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_pool() -> (DbPool, TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let pool = create_pool(&tmp.path().join("test.db"), 2).unwrap();
        (pool, tmp)
    }

    #[test]
    fn create_pool_creates_db_file() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("sub/dir/test.db");
        let pool = create_pool(&db_path, 2).unwrap();
        assert!(db_path.exists());

        let conn = pool.get().unwrap();
        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode, "wal");
    }

    #[test]
    fn every_pooled_connection_enforces_foreign_keys() {
        let (pool, _tmp) = test_pool();
        let first = pool.get().unwrap();
        let second = pool.get().unwrap();
        for conn in [&first, &second] {
            let enabled: bool = conn
                .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
                .unwrap();
            assert!(enabled);
        }
    }

    #[test]
    fn migrations_run_successfully() {
        let (pool, _tmp) = test_pool();
        run_migrations(&pool).unwrap();

        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, MIGRATIONS.len() as i64);

        let tables: Vec<String> = {
            let mut stmt = conn
                .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
                .unwrap();
            stmt.query_map([], |row| row.get(0))
                .unwrap()
                .filter_map(|r| r.ok())
                .collect()
        };
        for table in ["users", "forums", "threads", "posts", "votes"] {
            assert!(tables.contains(&table.to_string()), "missing {}", table);
        }
    }

    #[test]
    fn migrations_are_idempotent() {
        let (pool, _tmp) = test_pool();
        run_migrations(&pool).unwrap();
        run_migrations(&pool).unwrap();

        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, MIGRATIONS.len() as i64);
    }

    #[test]
    fn nickname_is_case_insensitive_key() {
        let (pool, _tmp) = test_pool();
        run_migrations(&pool).unwrap();

        let conn = pool.get().unwrap();
        conn.execute(
            "INSERT INTO users (nickname, fullname, about, email) VALUES (?1, ?2, ?3, ?4)",
            params!["Alice", "Alice A", "", "alice@example.com"],
        )
        .unwrap();

        let result = conn.execute(
            "INSERT INTO users (nickname, fullname, about, email) VALUES (?1, ?2, ?3, ?4)",
            params!["ALICE", "Other", "", "other@example.com"],
        );
        assert!(result.is_err());
    }

    #[test]
    fn foreign_keys_enforced() {
        let (pool, _tmp) = test_pool();
        run_migrations(&pool).unwrap();

        let conn = pool.get().unwrap();
        let result = conn.execute(
            "INSERT INTO forums (slug, title, owner) VALUES (?1, ?2, ?3)",
            params!["rust", "Rust", "nobody"],
        );
        assert!(result.is_err());
    }
}
