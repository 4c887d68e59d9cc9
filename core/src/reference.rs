//! Textual reference parsing and validation.
//!
//! A reference has the shape `<book> <chapter>:<verse>`, where `<book>` may
//! contain spaces and leading ordinals (`"1 Corinthians 10:13"`,
//! `"Song of Songs 2:1"`). Parsing resolves the book to its canonical name
//! through [`crate::canon::book_id`].
//!
//! # Examples
//!
//! ```
//! use scripture_core::*;
//!
//! let reference = parse_reference("psalm 23:1").unwrap();
//! assert_eq!(reference.to_string(), "Psalms 23:1");
//! assert!(validate_reference(&reference).is_empty());
//!
//! assert!(parse_reference("John three sixteen").is_err());
//! ```

use thiserror::Error;

use crate::{ScriptureReference, canon};

/// Reference parsing and validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    /// Input is empty or whitespace-only.
    #[error("reference cannot be empty")]
    Empty,
    /// Input does not have the `<book> <chapter>:<verse>` shape.
    #[error("malformed reference: {0}")]
    Malformed(String),
    /// Chapter or verse is not a positive integer.
    #[error("invalid number in reference: {0}")]
    InvalidNumber(String),
    /// Book name does not resolve to the canonical catalog.
    #[error("unknown book: {0}")]
    UnknownBook(String),
    /// Chapter is outside the book's standard chapter range.
    #[error("{book} has no chapter {chapter}")]
    InvalidChapter { book: String, chapter: i64 },
    /// Verse number is below 1.
    #[error("invalid verse number: {0}")]
    InvalidVerse(i64),
    /// Emergency category name is not recognized.
    #[error("unknown emergency category: {0}")]
    UnknownCategory(String),
}

/// Result alias for reference operations.
pub type Result<T> = std::result::Result<T, ReferenceError>;

/// Parses `<book> <chapter>:<verse>` into a [`ScriptureReference`].
///
/// The book part is resolved to its canonical spelling; unknown books are
/// rejected so callers never query with a name the store cannot contain.
///
/// # Errors
///
/// Returns [`ReferenceError::Empty`] for blank input,
/// [`ReferenceError::Malformed`] when the `chapter:verse` suffix is missing,
/// [`ReferenceError::InvalidNumber`] for non-numeric or non-positive numbers,
/// and [`ReferenceError::UnknownBook`] when the book does not resolve.
///
/// # Examples
///
/// ```
/// use scripture_core::*;
///
/// let r = parse_reference("  2 Timothy   3:16 ").unwrap();
/// assert_eq!(r, ScriptureReference::new("II Timothy", 3, 16));
///
/// assert_eq!(parse_reference(""), Err(ReferenceError::Empty));
/// assert!(matches!(parse_reference("Hezekiah 1:1"), Err(ReferenceError::UnknownBook(_))));
/// ```
pub fn parse_reference(input: &str) -> Result<ScriptureReference> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ReferenceError::Empty);
    }

    let (book_part, location) = trimmed
        .rsplit_once(char::is_whitespace)
        .ok_or_else(|| ReferenceError::Malformed(trimmed.to_string()))?;
    let (chapter, verse) = location
        .split_once(':')
        .ok_or_else(|| ReferenceError::Malformed(trimmed.to_string()))?;

    let chapter = parse_positive(chapter)?;
    let verse = parse_positive(verse)?;

    let book_part = book_part.trim();
    if book_part.is_empty() {
        return Err(ReferenceError::Malformed(trimmed.to_string()));
    }
    let book = canon::canonical_book_name(book_part)
        .ok_or_else(|| ReferenceError::UnknownBook(book_part.to_string()))?;

    Ok(ScriptureReference::new(book, chapter, verse))
}

/// Checks a reference against the canonical catalog.
///
/// Returns every problem found; an empty vector means the reference is
/// valid. Verse numbers are only checked for a lower bound because the
/// per-chapter verse tables are approximate.
///
/// # Examples
///
/// ```
/// use scripture_core::*;
///
/// let ok = ScriptureReference::new("Jude", 1, 25);
/// assert!(validate_reference(&ok).is_empty());
///
/// let bad = ScriptureReference::new("Jude", 2, 0);
/// assert_eq!(validate_reference(&bad).len(), 2);
/// ```
pub fn validate_reference(reference: &ScriptureReference) -> Vec<ReferenceError> {
    let mut errors = Vec::new();

    let Some(book_id) = canon::book_id(&reference.book) else {
        errors.push(ReferenceError::UnknownBook(reference.book.clone()));
        return errors;
    };

    if reference.chapter < 1 || reference.chapter > canon::standard_chapter_count(book_id) {
        errors.push(ReferenceError::InvalidChapter {
            book: reference.book.clone(),
            chapter: reference.chapter,
        });
    }
    if reference.verse < 1 {
        errors.push(ReferenceError::InvalidVerse(reference.verse));
    }

    errors
}

/// Whether `text` has the loose shape of a reference.
///
/// Cheaper than [`parse_reference`] and does not resolve the book; used to
/// decide whether a failed search is worth retrying as a reference lookup.
pub fn looks_like_reference(text: &str) -> bool {
    let trimmed = text.trim();
    let Some((book, location)) = trimmed.rsplit_once(char::is_whitespace) else {
        return false;
    };
    let Some((chapter, verse)) = location.split_once(':') else {
        return false;
    };

    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    !book.trim().is_empty()
        && book
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        && digits(chapter)
        && digits(verse)
}

fn parse_positive(raw: &str) -> Result<i64> {
    match raw.trim().parse::<i64>() {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(ReferenceError::InvalidNumber(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_reference() {
        let r = parse_reference("John 3:16").unwrap();
        assert_eq!(r, ScriptureReference::new("John", 3, 16));
    }

    #[test]
    fn test_parse_multi_word_books() {
        assert_eq!(
            parse_reference("Song of Solomon 2:4").unwrap().book,
            "Song of Solomon"
        );
        assert_eq!(parse_reference("1 John 4:8").unwrap().book, "I John");
        assert_eq!(parse_reference("first peter 5:7").unwrap().book, "I Peter");
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert_eq!(parse_reference("   "), Err(ReferenceError::Empty));
        assert!(matches!(
            parse_reference("John"),
            Err(ReferenceError::Malformed(_))
        ));
        assert!(matches!(
            parse_reference("John 3"),
            Err(ReferenceError::Malformed(_))
        ));
        assert!(matches!(
            parse_reference("3:16"),
            Err(ReferenceError::Malformed(_))
        ));
        assert!(matches!(
            parse_reference("John 3:x"),
            Err(ReferenceError::InvalidNumber(_))
        ));
        assert!(matches!(
            parse_reference("John 0:1"),
            Err(ReferenceError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_validate_reference_checks_chapter_range() {
        let r = ScriptureReference::new("Obadiah", 2, 1);
        assert_eq!(
            validate_reference(&r),
            vec![ReferenceError::InvalidChapter {
                book: "Obadiah".to_string(),
                chapter: 2
            }]
        );
        let unknown = ScriptureReference::new("Enoch", 1, 1);
        assert!(matches!(
            validate_reference(&unknown)[0],
            ReferenceError::UnknownBook(_)
        ));
    }

    #[test]
    fn test_looks_like_reference() {
        assert!(looks_like_reference("John 3:16"));
        assert!(looks_like_reference("1 Corinthians 13:4"));
        assert!(looks_like_reference("Hezekiah 1:1"));
        assert!(!looks_like_reference("love your neighbour"));
        assert!(!looks_like_reference("John 3"));
        assert!(!looks_like_reference("John's 3:16"));
    }
}
