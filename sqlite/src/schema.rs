//! SQL schema generation for the canonical store.
//!
//! The canonical store holds two tables and one supporting index:
//!
//! - `{prefix}books`: the 66-book catalog, ids 1..=66
//! - `{prefix}verses`: verse rows, unique per `(book_id, chapter, verse)`
//! - `idx_{prefix}verses_book_chapter_verse`: lookup index for exact and
//!   chapter reads
//!
//! The local store uses the empty prefix. Non-empty prefixes produce the
//! `<tag>_books` / `<tag>_verses` shape found in bundled assets, which is
//! handy for building fixture sources.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Canonical books table name.
pub const BOOKS_TABLE: &str = "books";
/// Canonical verses table name.
pub const VERSES_TABLE: &str = "verses";

/// Validates that a table prefix contains only alphanumeric characters and underscores.
///
/// The empty prefix is valid and selects the canonical table names.
pub fn validate_prefix(prefix: &str) -> Result<()> {
    if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(StoreError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

/// Generates the `CREATE` statements for both tables and the index.
///
/// Uses `IF NOT EXISTS` throughout, so running the result against a store
/// that already has the schema is a no-op.
///
/// # Errors
///
/// Returns [`StoreError::InvalidPrefix`] if the prefix contains characters
/// other than ASCII alphanumerics and underscores.
///
/// # Examples
///
/// ```
/// use scripture_sqlite::generate_schema_sql;
///
/// let sql = generate_schema_sql("").unwrap();
/// assert!(sql.contains("CREATE TABLE IF NOT EXISTS books"));
/// assert!(generate_schema_sql("niv_").unwrap().contains("niv_verses"));
/// assert!(generate_schema_sql("x; DROP").is_err());
/// ```
pub fn generate_schema_sql(prefix: &str) -> Result<String> {
    validate_prefix(prefix)?;

    let sql = format!(
        r#"
CREATE TABLE IF NOT EXISTS {prefix}books (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS {prefix}verses (
    id INTEGER PRIMARY KEY,
    book_id INTEGER NOT NULL,
    chapter INTEGER NOT NULL CHECK (chapter >= 1),
    verse INTEGER NOT NULL CHECK (verse >= 1),
    text TEXT NOT NULL CHECK (length(text) > 0)
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_{prefix}verses_book_chapter_verse
    ON {prefix}verses(book_id, chapter, verse);
"#,
        prefix = prefix
    );

    Ok(sql)
}

/// Generates SQL to drop both tables (and with them, the index).
///
/// # Errors
///
/// Returns [`StoreError::InvalidPrefix`] if the prefix is invalid.
pub fn generate_drop_sql(prefix: &str) -> Result<String> {
    validate_prefix(prefix)?;

    let sql = format!(
        r#"
DROP TABLE IF EXISTS {prefix}verses;
DROP TABLE IF EXISTS {prefix}books;
"#,
        prefix = prefix
    );

    Ok(sql)
}

/// Creates the canonical schema in a single transaction.
pub fn create_tables(conn: &mut Connection) -> Result<()> {
    let sql = generate_schema_sql("")?;
    let tx = conn.transaction()?;
    tx.execute_batch(&sql)
        .map_err(|e| StoreError::StoreUnopenable(format!("failed to create tables: {e}")))?;
    tx.commit()?;
    Ok(())
}

/// Drops the canonical schema in a single transaction.
pub fn drop_tables(conn: &mut Connection) -> Result<()> {
    let sql = generate_drop_sql("")?;
    let tx = conn.transaction()?;
    tx.execute_batch(&sql)?;
    tx.commit()?;
    Ok(())
}

/// Checks whether a table exists, matching the name exactly.
pub(crate) fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1")?;
    let count: i64 = stmt.query_row([table], |row| row.get(0))?;
    Ok(count > 0)
}

/// Counts rows in a table whose name is already known to be safe.
pub(crate) fn count_rows(conn: &Connection, table: &str) -> Result<u64> {
    let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
    let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
    Ok(count.max(0) as u64)
}

/// Quotes an identifier read from an untrusted source file.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
