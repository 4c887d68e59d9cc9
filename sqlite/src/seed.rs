//! Fallback seeding.
//!
//! When no corpus can be imported the store is filled with static data: the
//! canonical 66-book catalog and the curated verse set from
//! [`scripture_core::curated`]. Output is identical on every run, so a
//! seeded store always reads the same.

use rusqlite::{Connection, Transaction, params};
use scripture_core::{canon, curated};
use tracing::info;

use crate::error::{Result, StoreError};
use crate::schema::create_tables;

/// Report of a seed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    /// Number of catalog books written.
    pub books_written: u64,
    /// Number of curated verses written.
    pub verses_written: u64,
}

/// Rewrites the store with the canonical catalog and curated verses.
///
/// Creates the schema if needed, then replaces both tables inside one
/// transaction.
///
/// # Errors
///
/// Returns [`StoreError::StoreUnopenable`] if the destination cannot be
/// written. Nothing below this tier can recover from that.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use scripture_sqlite::seed_minimal;
///
/// let mut conn = Connection::open_in_memory().unwrap();
/// let report = seed_minimal(&mut conn).unwrap();
/// assert_eq!(report.books_written, 66);
/// assert!(report.verses_written >= 40);
/// ```
pub fn seed_minimal(conn: &mut Connection) -> Result<SeedReport> {
    let unwritable = |e: StoreError| StoreError::StoreUnopenable(format!("fallback seed failed: {e}"));

    create_tables(conn).map_err(unwritable)?;
    let tx = conn.transaction().map_err(|e| unwritable(e.into()))?;
    let books_written = write_catalog(&tx).map_err(unwritable)?;
    tx.execute("DELETE FROM verses", [])
        .map_err(|e| unwritable(e.into()))?;
    let verses_written = write_curated(&tx).map_err(unwritable)?;
    tx.commit().map_err(|e| unwritable(e.into()))?;

    info!(books = books_written, verses = verses_written, "seeded fallback data");
    Ok(SeedReport {
        books_written,
        verses_written,
    })
}

/// Replaces every book row with the canonical catalog.
pub(crate) fn write_catalog(tx: &Transaction<'_>) -> Result<u64> {
    tx.execute("DELETE FROM books", [])?;
    let mut stmt = tx.prepare("INSERT INTO books (id, name) VALUES (?1, ?2)")?;
    for (id, name) in canon::BOOKS {
        stmt.execute(params![id, name])?;
    }
    Ok(canon::BOOKS.len() as u64)
}

/// Adds any canonical book whose id is missing. Returns how many were added.
pub(crate) fn top_up_catalog(tx: &Transaction<'_>) -> Result<u64> {
    let mut stmt = tx.prepare("INSERT OR IGNORE INTO books (id, name) VALUES (?1, ?2)")?;
    let mut added = 0;
    for (id, name) in canon::BOOKS {
        added += stmt.execute(params![id, name])? as u64;
    }
    Ok(added)
}

/// Writes the curated verse set, replacing rows at the same reference.
pub(crate) fn write_curated(tx: &Transaction<'_>) -> Result<u64> {
    let mut stmt = tx.prepare(
        "INSERT OR REPLACE INTO verses (id, book_id, chapter, verse, text)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    let verses = curated::verses();
    for verse in &verses {
        stmt.execute(params![
            verse.id,
            verse.book_id,
            verse.chapter,
            verse.verse,
            verse.text
        ])?;
    }
    Ok(verses.len() as u64)
}
