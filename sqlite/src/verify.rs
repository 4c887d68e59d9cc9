//! Integrity checks for the canonical store.
//!
//! A store is healthy when both canonical tables exist and hold at least
//! [`MIN_BOOK_COUNT`] books and [`MIN_VERSE_COUNT`] verses. A missing table
//! is an ordinary unhealthy result, not an error.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::schema::{BOOKS_TABLE, VERSES_TABLE, count_rows, table_exists};

/// Minimum number of books in a healthy store.
pub const MIN_BOOK_COUNT: u64 = 66;

/// Minimum number of verses in a healthy store.
pub const MIN_VERSE_COUNT: u64 = 30_000;

/// Raw figures behind a health verdict.
///
/// # Examples
///
/// ```
/// use scripture_sqlite::StoreHealth;
///
/// let health = StoreHealth {
///     books_table: true,
///     verses_table: true,
///     book_count: 66,
///     verse_count: 31_102,
/// };
/// assert!(health.is_healthy());
/// assert_eq!(health.diagnostic(), "Database looks healthy: 66 books and 31102 verses.");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreHealth {
    pub books_table: bool,
    pub verses_table: bool,
    pub book_count: u64,
    pub verse_count: u64,
}

impl StoreHealth {
    pub fn is_healthy(&self) -> bool {
        self.books_table
            && self.verses_table
            && self.book_count >= MIN_BOOK_COUNT
            && self.verse_count >= MIN_VERSE_COUNT
    }

    /// Human-readable status line.
    pub fn diagnostic(&self) -> String {
        match (self.books_table, self.verses_table) {
            (false, false) => "Database is missing both the books and verses tables.".to_string(),
            (false, true) => "Database is missing the books table.".to_string(),
            (true, false) => "Database is missing the verses table.".to_string(),
            (true, true) if self.is_healthy() => format!(
                "Database looks healthy: {} books and {} verses.",
                self.book_count, self.verse_count
            ),
            (true, true) => format!(
                "Database is incomplete: {} books and {} verses (expected at least {} and {}).",
                self.book_count, self.verse_count, MIN_BOOK_COUNT, MIN_VERSE_COUNT
            ),
        }
    }
}

/// Collects table presence and row counts for the canonical store.
///
/// # Errors
///
/// Returns [`StoreError::DatabaseError`](crate::StoreError::DatabaseError)
/// only when the catalog itself cannot be read.
pub fn inspect(conn: &Connection) -> Result<StoreHealth> {
    let books_table = table_exists(conn, BOOKS_TABLE)?;
    let verses_table = table_exists(conn, VERSES_TABLE)?;

    let book_count = if books_table {
        count_rows(conn, BOOKS_TABLE)?
    } else {
        0
    };
    let verse_count = if verses_table {
        count_rows(conn, VERSES_TABLE)?
    } else {
        0
    };

    let health = StoreHealth {
        books_table,
        verses_table,
        book_count,
        verse_count,
    };
    debug!(?health, "inspected store");
    Ok(health)
}

/// `true` iff the store passes [`StoreHealth::is_healthy`]. Errors count as unhealthy.
pub fn is_healthy(conn: &Connection) -> bool {
    inspect(conn).map(|h| h.is_healthy()).unwrap_or(false)
}
