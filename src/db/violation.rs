//! Classification of SQLite constraint failures.
//!
//! The create paths dispatch on these kinds instead of matching error codes
//! or message text at each call site.

use rusqlite::ffi;
use rusqlite::ErrorCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// UNIQUE or PRIMARY KEY clash: the row already exists.
    Unique,
    /// A referenced row is missing.
    ForeignKey,
    /// Not a constraint failure we resolve.
    Other,
}

pub fn classify(err: &rusqlite::Error) -> Violation {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            match e.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    Violation::Unique
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Violation::ForeignKey,
                _ => Violation::Other,
            }
        }
        _ => Violation::Other,
    }
}
