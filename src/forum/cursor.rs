//! Keyset pagination parameters shared by every listing.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Traversal order of a thread's posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Flat,
    Tree,
    ParentTree,
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flat" => Ok(Self::Flat),
            "tree" => Ok(Self::Tree),
            "parent_tree" => Ok(Self::ParentTree),
            other => Err(format!("unknown sort mode: {}", other)),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Flat => "flat",
            Self::Tree => "tree",
            Self::ParentTree => "parent_tree",
        };
        f.write_str(name)
    }
}

/// One page request: resume after `since`, at most `limit` items, in the
/// given direction. `limit == 0` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<K> {
    pub since: Option<K>,
    pub limit: u32,
    pub desc: bool,
}

impl<K> Page<K> {
    pub fn new(since: Option<K>, limit: u32, desc: bool) -> Self {
        Self { since, limit, desc }
    }

    pub fn unbounded(desc: bool) -> Self {
        Self {
            since: None,
            limit: 0,
            desc,
        }
    }

    /// Keyset predicate operator: items strictly past the cursor.
    pub fn after(&self) -> &'static str {
        if self.desc {
            "<"
        } else {
            ">"
        }
    }

    /// Like `after`, but keeps items equal to the cursor.
    pub fn from(&self) -> &'static str {
        if self.desc {
            "<="
        } else {
            ">="
        }
    }

    pub fn order(&self) -> &'static str {
        if self.desc {
            "DESC"
        } else {
            "ASC"
        }
    }

    /// Value for a SQLite `LIMIT` clause; a negative limit is unbounded.
    pub fn sql_limit(&self) -> i64 {
        if self.limit == 0 {
            -1
        } else {
            i64::from(self.limit)
        }
    }
}

impl Page<i64> {
    /// Post cursors arrive as plain ids where zero stands for "no cursor".
    pub fn for_posts(since: Option<i64>, limit: u32, desc: bool) -> Self {
        Self::new(since.filter(|id| *id != 0), limit, desc)
    }
}
