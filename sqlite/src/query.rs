//! Read queries over the canonical store.
//!
//! [`VerseQuery`] is a thin, stateless layer of SQL over a borrowed
//! connection. It reports absence as `None` or an empty vector; the
//! placeholder and fallback policy lives one level up in
//! [`ScriptureStore`](crate::ScriptureStore).
//!
//! # Example
//!
//! ```
//! use rusqlite::Connection;
//! use scripture_sqlite::{VerseQuery, seed_minimal};
//!
//! let mut conn = Connection::open_in_memory().unwrap();
//! seed_minimal(&mut conn).unwrap();
//!
//! let query = VerseQuery::new(&conn);
//! let verse = query.verse(43, 3, 16).unwrap().unwrap();
//! assert!(verse.text.starts_with("For God so loved the world"));
//! assert_eq!(query.search("shepherd", 10).unwrap().len(), 1);
//! ```

use rand::Rng;
use rusqlite::{Connection, OptionalExtension, Row, params};
use scripture_core::{Book, Scripture, canon};

use crate::error::Result;

const SELECT_SCRIPTURE: &str = "SELECT v.book_id, b.name, v.chapter, v.verse, v.text
     FROM verses v LEFT JOIN books b ON b.id = v.book_id";

/// Read-only query interface over a canonical store connection.
pub struct VerseQuery<'a> {
    conn: &'a Connection,
}

impl<'a> VerseQuery<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Exact lookup by book id, chapter, and verse.
    pub fn verse(&self, book_id: i64, chapter: i64, verse: i64) -> Result<Option<Scripture>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "{SELECT_SCRIPTURE} WHERE v.book_id = ?1 AND v.chapter = ?2 AND v.verse = ?3"
        ))?;
        let scripture = stmt
            .query_row(params![book_id, chapter, verse], scripture_from_row)
            .optional()?;
        Ok(scripture)
    }

    /// All verses of a chapter, ordered by verse number.
    pub fn chapter(&self, book_id: i64, chapter: i64) -> Result<Vec<Scripture>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "{SELECT_SCRIPTURE} WHERE v.book_id = ?1 AND v.chapter = ?2 ORDER BY v.verse"
        ))?;
        let rows = stmt
            .query_map(params![book_id, chapter], scripture_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Uniform pick by position, not id, so gaps in ids do not skew it.
    pub fn random_verse(&self, rng: &mut impl Rng) -> Result<Option<Scripture>> {
        let count = self.verse_count()?;
        if count == 0 {
            return Ok(None);
        }
        let offset = rng.gen_range(0..count);
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{SELECT_SCRIPTURE} ORDER BY v.id LIMIT 1 OFFSET ?1"))?;
        let scripture = stmt
            .query_row(params![offset], scripture_from_row)
            .optional()?;
        Ok(scripture)
    }

    /// Case-insensitive substring search in canonical order.
    ///
    /// `%` and `_` in `text` match literally.
    pub fn search(&self, text: &str, limit: usize) -> Result<Vec<Scripture>> {
        let pattern = format!("%{}%", escape_like(text));
        let mut stmt = self.conn.prepare_cached(&format!(
            r"{SELECT_SCRIPTURE} WHERE v.text LIKE ?1 ESCAPE '\'
              ORDER BY v.book_id, v.chapter, v.verse LIMIT ?2"
        ))?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![pattern, limit], scripture_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Book rows in id order.
    pub fn books(&self) -> Result<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name FROM books ORDER BY id")?;
        let books = stmt
            .query_map([], |row| {
                Ok(Book {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(books)
    }

    /// Highest chapter number stored for a book; 0 when it has none.
    pub fn chapter_count(&self, book_id: i64) -> Result<i64> {
        let count: Option<i64> = self.conn.query_row(
            "SELECT MAX(chapter) FROM verses WHERE book_id = ?1",
            [book_id],
            |row| row.get(0),
        )?;
        Ok(count.unwrap_or(0))
    }

    pub fn verse_count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM verses", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn scripture_from_row(row: &Row<'_>) -> rusqlite::Result<Scripture> {
    let book_id: i64 = row.get(0)?;
    let book_name: Option<String> = row.get(1)?;
    let book_name = book_name
        .or_else(|| canon::book_name(book_id).map(str::to_string))
        .unwrap_or_else(|| format!("Book {book_id}"));
    Ok(Scripture {
        book_name,
        chapter: row.get(2)?,
        verse: row.get(3)?,
        text: row.get(4)?,
        placeholder: false,
    })
}

/// Escapes LIKE wildcards with `\`.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
