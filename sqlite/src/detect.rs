//! Schema detection for arbitrary source databases.
//!
//! A bundled corpus names its tables however its producer liked
//! (`kjv_books`, `t_book_list`, `Verses`, ...). [`detect`] locates the books
//! and verses relations with a chain of progressively looser strategies,
//! first match wins:
//!
//! 1. **Prefixed**: a `<tag>_books` table with a sibling `<tag>_verses`.
//! 2. **Loose**: the first table whose name contains `book`, and the first
//!    containing `verse`.
//! 3. **Shape**: column inspection. A books table has `id` and `name` and at
//!    most five columns; a verses table has `book_id`, `chapter`, `verse`,
//!    and `text`.
//!
//! Detection only reads. A source with no tables, or a file that is not a
//! database at all, yields [`DetectedSchema::undetected`].
//!
//! # Examples
//!
//! ```
//! use rusqlite::Connection;
//! use scripture_sqlite::{DetectionStrategy, detect};
//!
//! let conn = Connection::open_in_memory().unwrap();
//! conn.execute_batch(
//!     "CREATE TABLE niv_books (id INTEGER, name TEXT);
//!      CREATE TABLE niv_verses (id INTEGER, book_id INTEGER, chapter INTEGER, verse INTEGER, text TEXT);",
//! ).unwrap();
//!
//! let schema = detect(&conn);
//! assert_eq!(schema.books_table.as_deref(), Some("niv_books"));
//! assert_eq!(schema.translation_tag.as_deref(), Some("niv"));
//! assert_eq!(schema.strategy, DetectionStrategy::Prefixed);
//! ```

use std::fmt;
use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::schema::{count_rows, quote_ident};

/// Maximum column count for a table to qualify as a books table by shape.
const MAX_BOOKS_COLUMNS: usize = 5;

const VERSE_SHAPE_COLUMNS: [&str; 4] = ["book_id", "chapter", "verse", "text"];

/// Which detection strategy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionStrategy {
    Prefixed,
    Loose,
    Shape,
    Undetected,
}

impl fmt::Display for DetectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DetectionStrategy::Prefixed => "prefixed",
            DetectionStrategy::Loose => "loose",
            DetectionStrategy::Shape => "shape",
            DetectionStrategy::Undetected => "undetected",
        };
        f.write_str(s)
    }
}

/// Where the books and verses relations live in a source database.
///
/// Either both table fields are set or neither is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedSchema {
    pub books_table: Option<String>,
    pub verses_table: Option<String>,
    /// Tag taken from the table prefix (`niv` for `niv_books`), if any.
    pub translation_tag: Option<String>,
    pub strategy: DetectionStrategy,
}

impl DetectedSchema {
    /// The null descriptor: nothing usable was found.
    pub fn undetected() -> Self {
        Self {
            books_table: None,
            verses_table: None,
            translation_tag: None,
            strategy: DetectionStrategy::Undetected,
        }
    }

    /// Both relation names, when detection succeeded.
    pub fn tables(&self) -> Option<(&str, &str)> {
        match (&self.books_table, &self.verses_table) {
            (Some(books), Some(verses)) => Some((books, verses)),
            _ => None,
        }
    }

    pub fn is_detected(&self) -> bool {
        self.tables().is_some()
    }

    fn found(books: String, verses: String, strategy: DetectionStrategy) -> Self {
        let translation_tag = tag_of(&books).or_else(|| tag_of(&verses));
        Self {
            books_table: Some(books),
            verses_table: Some(verses),
            translation_tag,
            strategy,
        }
    }
}

/// One user table of a source database, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<String>,
    pub row_count: u64,
}

/// Locates the books and verses relations in `source`.
///
/// Never fails: any error while reading the catalog is logged and reported
/// as the null descriptor.
pub fn detect(source: &Connection) -> DetectedSchema {
    let tables = match list_user_tables(source) {
        Ok(tables) => tables,
        Err(err) => {
            warn!(error = %err, "could not read source table catalog");
            return DetectedSchema::undetected();
        }
    };
    debug!(tables = ?tables, "source tables");

    if tables.is_empty() {
        return DetectedSchema::undetected();
    }

    if let Some(schema) = detect_prefixed(&tables) {
        debug!(books = ?schema.books_table, verses = ?schema.verses_table, "detected prefixed schema");
        return schema;
    }

    let loose_books = tables.iter().find(|t| t.to_ascii_lowercase().contains("book"));
    let loose_verses = tables
        .iter()
        .find(|t| t.to_ascii_lowercase().contains("verse") && Some(*t) != loose_books);

    if let (Some(books), Some(verses)) = (loose_books, loose_verses) {
        debug!(books = %books, verses = %verses, "detected schema by loose name match");
        return DetectedSchema::found(books.clone(), verses.clone(), DetectionStrategy::Loose);
    }

    let books = loose_books
        .cloned()
        .or_else(|| find_by_shape(source, &tables, is_books_shape));
    let verses = loose_verses
        .cloned()
        .or_else(|| find_by_shape(source, &tables, is_verses_shape));

    match (books, verses) {
        (Some(books), Some(verses)) if books != verses => {
            debug!(books = %books, verses = %verses, "detected schema by column shape");
            DetectedSchema::found(books, verses, DetectionStrategy::Shape)
        }
        _ => {
            debug!("no books/verses relations found");
            DetectedSchema::undetected()
        }
    }
}

/// Opens `path` read-only and runs [`detect`] on it.
///
/// A path that cannot be opened yields the null descriptor.
pub fn detect_path(path: impl AsRef<Path>) -> DetectedSchema {
    match open_source(path.as_ref()) {
        Ok(conn) => detect(&conn),
        Err(err) => {
            warn!(path = %path.as_ref().display(), error = %err, "could not open source");
            DetectedSchema::undetected()
        }
    }
}

/// Opens a source database without write access.
pub fn open_source(path: &Path) -> Result<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(conn)
}

/// Lists every user table with its columns and row count.
///
/// # Errors
///
/// Returns [`StoreError::DatabaseError`](crate::StoreError::DatabaseError)
/// if the catalog cannot be read (e.g. the file is not a database).
pub fn describe_tables(source: &Connection) -> Result<Vec<TableInfo>> {
    list_user_tables(source)?
        .into_iter()
        .map(|name| {
            let columns = table_columns(source, &name)?;
            let row_count = count_rows(source, &name)?;
            Ok(TableInfo {
                name,
                columns,
                row_count,
            })
        })
        .collect()
}

/// User tables, excluding SQLite and Android bookkeeping tables.
pub(crate) fn list_user_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        r"SELECT name FROM sqlite_master
          WHERE type = 'table'
            AND name NOT LIKE 'sqlite\_%' ESCAPE '\'
            AND name NOT LIKE 'android\_%' ESCAPE '\'
          ORDER BY name",
    )?;
    let tables = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(tables)
}

/// Column names of a table, lowercased.
pub(crate) fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(table)))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .map(|r| r.map(|c| c.to_ascii_lowercase()))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(columns)
}

fn detect_prefixed(tables: &[String]) -> Option<DetectedSchema> {
    tables.iter().find_map(|books| {
        let lowered = books.to_ascii_lowercase();
        let prefix = lowered.strip_suffix("_books")?;
        if prefix.is_empty() {
            return None;
        }
        let wanted = format!("{prefix}_verses");
        let verses = tables.iter().find(|t| t.to_ascii_lowercase() == wanted)?;
        let tag = books[..prefix.len()].to_string();
        Some(DetectedSchema {
            books_table: Some(books.clone()),
            verses_table: Some(verses.clone()),
            translation_tag: Some(tag),
            strategy: DetectionStrategy::Prefixed,
        })
    })
}

fn find_by_shape(
    conn: &Connection,
    tables: &[String],
    matches: fn(&[String]) -> bool,
) -> Option<String> {
    tables
        .iter()
        .find(|table| match table_columns(conn, table) {
            Ok(columns) => matches(&columns),
            Err(err) => {
                debug!(table = %table, error = %err, "skipping table during shape match");
                false
            }
        })
        .cloned()
}

fn is_books_shape(columns: &[String]) -> bool {
    columns.len() <= MAX_BOOKS_COLUMNS
        && columns.iter().any(|c| c == "id")
        && columns.iter().any(|c| c == "name")
}

fn is_verses_shape(columns: &[String]) -> bool {
    VERSE_SHAPE_COLUMNS
        .iter()
        .all(|wanted| columns.iter().any(|c| c == wanted))
}

/// Leading `<tag>_` segment of a table name, if the name has one.
fn tag_of(table: &str) -> Option<String> {
    let (tag, rest) = table.split_once('_')?;
    if tag.is_empty() || rest.is_empty() {
        return None;
    }
    Some(tag.to_string())
}
