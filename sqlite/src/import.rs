//! Batched import from a detected source into the canonical store.
//!
//! [`Importer::import`] runs the whole degrade-as-you-go pipeline:
//!
//! 1. Create the canonical schema in the destination.
//! 2. Open the source read-only and detect its books/verses relations.
//! 3. Undetected schema, or a source without books: seed fallback data.
//! 4. Replace the book catalog from the source, topping up any canonical id
//!    the source lacks. If that fails, write the static catalog instead.
//! 5. Copy verses in batches of `batch_size`, one transaction per batch.
//!    The first batch replaces the existing verses. A failed batch stops the
//!    loop; earlier batches stay committed.
//! 6. If no verse was committed at all, seed the curated verses. A cancelled
//!    import that committed nothing keeps the existing verses if there are any.
//!
//! Any other failure falls back to seeding. The only error that escapes is
//! [`StoreError::StoreUnopenable`], raised when even the seed cannot be
//! written.
//!
//! # Examples
//!
//! ```no_run
//! use rusqlite::Connection;
//! use scripture_sqlite::Importer;
//!
//! let mut store = Connection::open("data/scripture.db").unwrap();
//! let importer = Importer::new(1000);
//! let result = importer.import(&mut store, "data/kjv-source.db").unwrap();
//! println!(
//!     "{} books, {} verses (degraded: {})",
//!     result.books_imported, result.verses_imported, result.degraded
//! );
//! ```

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use rusqlite::{Connection, params};
use scripture_core::{Verse, canon};
use scripture_db::DEFAULT_BATCH_SIZE;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::detect::{DetectedSchema, detect, open_source, table_columns};
use crate::error::{Result, StoreError};
use crate::schema::{VERSES_TABLE, count_rows, create_tables, quote_ident};
use crate::seed::{seed_minimal, top_up_catalog, write_catalog, write_curated};

/// Outcome of one import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub books_imported: u64,
    pub verses_imported: u64,
    /// `true` when the store holds fallback data instead of source data.
    pub degraded: bool,
    /// `true` when a cancellation stopped the verse loop early.
    #[serde(default)]
    pub interrupted: bool,
    /// What was detected in the source, if it could be opened.
    pub schema: DetectedSchema,
    /// Reason the verse loop stopped early on a failed batch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_failure: Option<String>,
}

impl ImportResult {
    fn seeded(books: u64, verses: u64, schema: DetectedSchema) -> Self {
        Self {
            books_imported: books,
            verses_imported: verses,
            degraded: true,
            interrupted: false,
            schema,
            partial_failure: None,
        }
    }
}

/// Counters readable while an import runs.
#[derive(Debug, Default)]
pub struct ImportProgress {
    verses_imported: AtomicU64,
    total_verses: AtomicU64,
    batches_committed: AtomicU64,
}

/// Point-in-time copy of [`ImportProgress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub verses_imported: u64,
    pub total_verses: u64,
    pub batches_committed: u64,
}

impl ImportProgress {
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            verses_imported: self.verses_imported.load(Ordering::SeqCst),
            total_verses: self.total_verses.load(Ordering::SeqCst),
            batches_committed: self.batches_committed.load(Ordering::SeqCst),
        }
    }

    pub fn verses_imported(&self) -> u64 {
        self.verses_imported.load(Ordering::SeqCst)
    }

    fn reset(&self, total: u64) {
        self.verses_imported.store(0, Ordering::SeqCst);
        self.total_verses.store(total, Ordering::SeqCst);
        self.batches_committed.store(0, Ordering::SeqCst);
    }

    fn record_batch(&self, rows: u64) -> u64 {
        self.batches_committed.fetch_add(1, Ordering::SeqCst);
        self.verses_imported.fetch_add(rows, Ordering::SeqCst) + rows
    }
}

/// Cooperative stop signal, checked between verse batches.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Streams a source corpus into the canonical store.
#[derive(Debug, Clone)]
pub struct Importer {
    batch_size: usize,
    progress: Arc<ImportProgress>,
    cancel: CancellationToken,
}

impl Default for Importer {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl Importer {
    /// Creates an importer. A batch size of 0 is treated as 1.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            progress: Arc::new(ImportProgress::default()),
            cancel: CancellationToken::new(),
        }
    }

    /// Shares progress counters with the caller.
    pub fn with_progress(mut self, progress: Arc<ImportProgress>) -> Self {
        self.progress = progress;
        self
    }

    /// Shares a cancellation token with the caller.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn progress(&self) -> &Arc<ImportProgress> {
        &self.progress
    }

    /// Imports `source_path` into `dest`, degrading to fallback data as needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::StoreUnopenable`] only when the destination
    /// cannot be written even for the fallback seed.
    pub fn import(&self, dest: &mut Connection, source_path: impl AsRef<Path>) -> Result<ImportResult> {
        let source_path = source_path.as_ref();
        match self.try_import(dest, source_path) {
            Ok(result) => Ok(result),
            Err(err) => {
                warn!(source = %source_path.display(), error = %err, "import failed, seeding fallback data");
                self.seed_fallback(dest, DetectedSchema::undetected())
            }
        }
    }

    /// Writes fallback data and reports a degraded result.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::StoreUnopenable`] if the seed cannot be written.
    pub fn seed_fallback(&self, dest: &mut Connection, schema: DetectedSchema) -> Result<ImportResult> {
        let report = seed_minimal(dest)?;
        self.progress.reset(report.verses_written);
        self.progress.record_batch(report.verses_written);
        Ok(ImportResult::seeded(
            report.books_written,
            report.verses_written,
            schema,
        ))
    }

    fn try_import(&self, dest: &mut Connection, source_path: &Path) -> Result<ImportResult> {
        create_tables(dest)?;
        let source = open_source(source_path)?;

        let schema = detect(&source);
        let Some((books_table, verses_table)) = schema.tables() else {
            let undetected = StoreError::SchemaUndetected(source_path.display().to_string());
            info!(reason = %undetected, "falling back to seed data");
            return self.seed_fallback(dest, schema);
        };
        let (books_table, verses_table) = (books_table.to_string(), verses_table.to_string());

        if count_rows(&source, &books_table)? == 0 {
            info!(table = %books_table, "source has no books, falling back to seed data");
            return self.seed_fallback(dest, schema);
        }

        let books_imported = match self.import_books(&source, dest, &books_table) {
            Ok(count) => count,
            Err(err) => {
                warn!(table = %books_table, error = %err, "book import failed, writing canonical catalog");
                let tx = dest.transaction()?;
                let count = write_catalog(&tx)?;
                tx.commit()?;
                count
            }
        };

        let outcome = self.import_verses(&source, dest, &verses_table)?;

        if outcome.committed == 0 {
            let existing = count_rows(dest, VERSES_TABLE)?;
            if outcome.interrupted && existing > 0 {
                info!(kept = existing, "import cancelled before first batch, keeping existing verses");
                return Ok(ImportResult {
                    books_imported,
                    verses_imported: 0,
                    degraded: false,
                    interrupted: true,
                    schema,
                    partial_failure: outcome.failure,
                });
            }

            info!("no verses imported, seeding curated verses");
            let tx = dest.transaction()?;
            tx.execute("DELETE FROM verses", [])?;
            let seeded = write_curated(&tx)?;
            tx.commit()?;
            return Ok(ImportResult {
                books_imported,
                verses_imported: seeded,
                degraded: true,
                interrupted: outcome.interrupted,
                schema,
                partial_failure: outcome.failure,
            });
        }

        info!(
            books = books_imported,
            verses = outcome.committed,
            tag = ?schema.translation_tag,
            "import finished"
        );
        Ok(ImportResult {
            books_imported,
            verses_imported: outcome.committed,
            degraded: false,
            interrupted: outcome.interrupted,
            schema,
            partial_failure: outcome.failure,
        })
    }

    /// Replaces destination books with source rows in canonical id range.
    fn import_books(&self, source: &Connection, dest: &mut Connection, table: &str) -> Result<u64> {
        let mut stmt = source.prepare(&format!(
            "SELECT id, name FROM {} ORDER BY id",
            quote_ident(table)
        ))?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let tx = dest.transaction()?;
        tx.execute("DELETE FROM books", [])?;
        let mut imported = 0;
        let mut skipped = 0;
        {
            let mut insert = tx.prepare("INSERT OR REPLACE INTO books (id, name) VALUES (?1, ?2)")?;
            for (id, name) in &rows {
                if canon::book_name(*id).is_none() {
                    skipped += 1;
                    continue;
                }
                imported += insert.execute(params![id, name])? as u64;
            }
        }
        let topped_up = top_up_catalog(&tx)?;
        tx.commit()?;

        debug!(imported, skipped, topped_up, "imported books");
        Ok(imported + topped_up)
    }

    /// Existing verses are replaced by the first committed batch, not before.
    fn import_verses(&self, source: &Connection, dest: &mut Connection, table: &str) -> Result<VerseOutcome> {
        let key = if table_columns(source, table)?.iter().any(|c| c == "id") {
            "id"
        } else {
            "rowid"
        };
        let total = match count_rows(source, table) {
            Ok(total) => total,
            Err(err) => {
                warn!(error = %err, "could not count source verses");
                0
            }
        };
        self.progress.reset(total);

        let select = format!(
            "SELECT {key}, book_id, chapter, verse, text FROM {table}
             WHERE {key} > ?1 AND book_id BETWEEN 1 AND {max_book}
             ORDER BY {key} LIMIT ?2",
            table = quote_ident(table),
            max_book = canon::BOOK_COUNT,
        );

        let mut outcome = VerseOutcome::default();
        let mut last_key = i64::MIN;
        loop {
            if self.cancel.is_cancelled() {
                info!(committed = outcome.committed, "import cancelled");
                outcome.interrupted = true;
                break;
            }

            let batch = match fetch_batch(source, &select, last_key, self.batch_size) {
                Ok(batch) => batch,
                Err(err) => {
                    outcome.fail(err);
                    break;
                }
            };
            let Some(last) = batch.last() else {
                break;
            };
            last_key = last.id;

            if let Err(err) = insert_batch(dest, &batch, outcome.committed == 0) {
                outcome.fail(err);
                break;
            }
            outcome.committed = self.progress.record_batch(batch.len() as u64);
            info!(imported = outcome.committed, total, "committed verse batch");

            if batch.len() < self.batch_size {
                break;
            }
        }
        Ok(outcome)
    }
}

#[derive(Debug, Default)]
struct VerseOutcome {
    committed: u64,
    interrupted: bool,
    failure: Option<String>,
}

impl VerseOutcome {
    fn fail(&mut self, err: StoreError) {
        let partial = StoreError::ImportPartialFailure {
            committed: self.committed,
            reason: err.to_string(),
        };
        warn!(error = %partial, "verse import stopped");
        self.failure = Some(partial.to_string());
    }
}

fn fetch_batch(source: &Connection, sql: &str, after: i64, limit: usize) -> Result<Vec<Verse>> {
    let mut stmt = source.prepare_cached(sql)?;
    let rows = stmt
        .query_map(params![after, limit as i64], |row| {
            Ok(Verse {
                id: row.get(0)?,
                book_id: row.get(1)?,
                chapter: row.get(2)?,
                verse: row.get(3)?,
                text: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn insert_batch(dest: &mut Connection, batch: &[Verse], replace_existing: bool) -> Result<()> {
    let tx = dest.transaction()?;
    if replace_existing {
        tx.execute("DELETE FROM verses", [])?;
    }
    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO verses (id, book_id, chapter, verse, text) VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for verse in batch {
            stmt.execute(params![
                verse.id,
                verse.book_id,
                verse.chapter,
                verse.verse,
                verse.text
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_with(sql: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("source.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(sql).unwrap();
        (dir, path)
    }

    fn verse_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM verses", [], |r| r.get(0))
            .unwrap()
    }

    const SMALL_SOURCE: &str = "
        CREATE TABLE web_books (id INTEGER PRIMARY KEY, name TEXT);
        CREATE TABLE web_verses (id INTEGER PRIMARY KEY, book_id INTEGER, chapter INTEGER, verse INTEGER, text TEXT);
        INSERT INTO web_books VALUES (1, 'Genesis'), (2, 'Exodus'), (99, 'Apocrypha');
        INSERT INTO web_verses VALUES
            (10, 1, 1, 1, 'In the beginning, God created the heavens and the earth.'),
            (20, 1, 1, 2, 'The earth was formless and empty.'),
            (30, 2, 1, 1, 'Now these are the names of the sons of Israel.'),
            (40, 99, 1, 1, 'Not canonical.'),
            (50, 2, 1, 2, 'Reuben, Simeon, Levi, and Judah,');
    ";

    #[test]
    fn test_import_small_source_in_batches() {
        let (_dir, path) = source_with(SMALL_SOURCE);
        let mut dest = Connection::open_in_memory().unwrap();
        let importer = Importer::new(2);

        let result = importer.import(&mut dest, &path).unwrap();
        assert!(!result.degraded);
        assert_eq!(result.verses_imported, 4);
        assert_eq!(result.books_imported, 66);
        assert_eq!(result.schema.translation_tag.as_deref(), Some("web"));
        assert_eq!(verse_count(&dest), 4);

        let progress = importer.progress().snapshot();
        assert_eq!(progress.verses_imported, 4);
        assert_eq!(progress.batches_committed, 2);
        assert_eq!(progress.total_verses, 5);
    }

    #[test]
    fn test_out_of_range_books_are_skipped() {
        let (_dir, path) = source_with(SMALL_SOURCE);
        let mut dest = Connection::open_in_memory().unwrap();
        Importer::new(10).import(&mut dest, &path).unwrap();

        let apocrypha: i64 = dest
            .query_row("SELECT COUNT(*) FROM books WHERE id = 99", [], |r| r.get(0))
            .unwrap();
        assert_eq!(apocrypha, 0);
        let john: String = dest
            .query_row("SELECT name FROM books WHERE id = 43", [], |r| r.get(0))
            .unwrap();
        assert_eq!(john, "John");
    }

    #[test]
    fn test_missing_source_is_degraded() {
        let dir = tempfile::tempdir().unwrap();
        let mut dest = Connection::open_in_memory().unwrap();
        let result = Importer::default()
            .import(&mut dest, dir.path().join("absent.db"))
            .unwrap();
        assert!(result.degraded);
        assert_eq!(result.books_imported, 66);
        assert!(verse_count(&dest) >= 40);
    }

    #[test]
    fn test_source_without_books_is_degraded() {
        let (_dir, path) = source_with(
            "CREATE TABLE kjv_books (id INTEGER, name TEXT);
             CREATE TABLE kjv_verses (id INTEGER, book_id INTEGER, chapter INTEGER, verse INTEGER, text TEXT);",
        );
        let mut dest = Connection::open_in_memory().unwrap();
        let result = Importer::default().import(&mut dest, &path).unwrap();
        assert!(result.degraded);
        assert!(result.schema.is_detected());
    }

    #[test]
    fn test_books_without_name_column_fall_back_to_catalog() {
        let (_dir, path) = source_with(
            "CREATE TABLE asv_books (id INTEGER, title TEXT);
             CREATE TABLE asv_verses (id INTEGER, book_id INTEGER, chapter INTEGER, verse INTEGER, text TEXT);
             INSERT INTO asv_books VALUES (1, 'Genesis');
             INSERT INTO asv_verses VALUES (1, 1, 1, 1, 'In the beginning God created the heavens and the earth.');",
        );
        let mut dest = Connection::open_in_memory().unwrap();
        let result = Importer::default().import(&mut dest, &path).unwrap();
        assert!(!result.degraded);
        assert_eq!(result.books_imported, 66);
        assert_eq!(result.verses_imported, 1);
    }

    #[test]
    fn test_first_batch_failure_seeds_curated_verses() {
        let (_dir, path) = source_with(
            "CREATE TABLE t_books (id INTEGER, name TEXT);
             CREATE TABLE t_verses (id INTEGER, book_id INTEGER, chapter INTEGER, verse INTEGER, text TEXT);
             INSERT INTO t_books VALUES (1, 'Genesis');
             INSERT INTO t_verses VALUES (1, 1, 1, 1, '');",
        );
        let mut dest = Connection::open_in_memory().unwrap();
        let result = Importer::default().import(&mut dest, &path).unwrap();
        assert!(result.degraded);
        assert!(result.partial_failure.is_some());
        assert!(verse_count(&dest) >= 40);
    }

    #[test]
    fn test_cancelled_import_keeps_existing_verses() {
        let (_dir, path) = source_with(SMALL_SOURCE);
        let mut dest = Connection::open_in_memory().unwrap();
        let seeded = seed_minimal(&mut dest).unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let result = Importer::new(2)
            .with_cancellation(token.clone())
            .import(&mut dest, &path)
            .unwrap();
        assert!(result.interrupted);
        assert!(!result.degraded);
        assert_eq!(result.verses_imported, 0);
        assert_eq!(verse_count(&dest) as u64, seeded.verses_written);

        token.reset();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancelled_import_into_empty_store_seeds_curated_verses() {
        let (_dir, path) = source_with(SMALL_SOURCE);
        let mut dest = Connection::open_in_memory().unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let result = Importer::new(2)
            .with_cancellation(token)
            .import(&mut dest, &path)
            .unwrap();
        assert!(result.interrupted);
        assert!(result.degraded);
        assert!(verse_count(&dest) >= 40);
    }

    #[test]
    fn test_failed_first_batch_keeps_nothing_stale() {
        let (_dir, path) = source_with(
            "CREATE TABLE t_books (id INTEGER, name TEXT);
             CREATE TABLE t_verses (id INTEGER, book_id INTEGER, chapter INTEGER, verse INTEGER, text TEXT);
             INSERT INTO t_books VALUES (1, 'Genesis');
             INSERT INTO t_verses VALUES (1, 1, 1, 1, '');",
        );
        let mut dest = Connection::open_in_memory().unwrap();
        create_tables(&mut dest).unwrap();
        dest.execute(
            "INSERT INTO verses (id, book_id, chapter, verse, text) VALUES (7, 2, 9, 9, 'stale')",
            [],
        )
        .unwrap();

        let result = Importer::default().import(&mut dest, &path).unwrap();
        assert!(result.degraded);
        let stale: i64 = dest
            .query_row("SELECT COUNT(*) FROM verses WHERE text = 'stale'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(stale, 0);
    }

    #[test]
    fn test_source_without_id_column_uses_rowid() {
        let (_dir, path) = source_with(
            "CREATE TABLE books (id INTEGER, name TEXT);
             CREATE TABLE verses (book_id INTEGER, chapter INTEGER, verse INTEGER, text TEXT);
             INSERT INTO books VALUES (43, 'John');
             INSERT INTO verses VALUES (43, 3, 16, 'For God so loved the world'), (43, 3, 17, 'For God sent not his Son');",
        );
        let mut dest = Connection::open_in_memory().unwrap();
        let result = Importer::new(1).import(&mut dest, &path).unwrap();
        assert_eq!(result.verses_imported, 2);
        assert!(!result.degraded);
    }

    #[test]
    fn test_zero_batch_size_is_clamped() {
        assert_eq!(Importer::new(0).batch_size(), 1);
    }
}
