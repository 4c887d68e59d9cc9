//! The canonical book catalog and standard structure tables.
//!
//! [`BOOKS`] is the one table every store must reproduce exactly: user-facing
//! book ordering and the `books.id` numbering both come from it.
//!
//! The chapter and verse count tables size placeholder output when the store
//! lacks real data. Chapter counts match the KJV; verse counts are exact for a
//! handful of well-known chapters and fall back to book-level averages
//! elsewhere, so treat them as plausible counts only.

use crate::Book;

/// Number of books in the canonical catalog.
pub const BOOK_COUNT: usize = 66;

/// Canonical `(id, name)` pairs in canonical order.
pub const BOOKS: [(i64, &str); BOOK_COUNT] = [
    (1, "Genesis"),
    (2, "Exodus"),
    (3, "Leviticus"),
    (4, "Numbers"),
    (5, "Deuteronomy"),
    (6, "Joshua"),
    (7, "Judges"),
    (8, "Ruth"),
    (9, "I Samuel"),
    (10, "II Samuel"),
    (11, "I Kings"),
    (12, "II Kings"),
    (13, "I Chronicles"),
    (14, "II Chronicles"),
    (15, "Ezra"),
    (16, "Nehemiah"),
    (17, "Esther"),
    (18, "Job"),
    (19, "Psalms"),
    (20, "Proverbs"),
    (21, "Ecclesiastes"),
    (22, "Song of Solomon"),
    (23, "Isaiah"),
    (24, "Jeremiah"),
    (25, "Lamentations"),
    (26, "Ezekiel"),
    (27, "Daniel"),
    (28, "Hosea"),
    (29, "Joel"),
    (30, "Amos"),
    (31, "Obadiah"),
    (32, "Jonah"),
    (33, "Micah"),
    (34, "Nahum"),
    (35, "Habakkuk"),
    (36, "Zephaniah"),
    (37, "Haggai"),
    (38, "Zechariah"),
    (39, "Malachi"),
    (40, "Matthew"),
    (41, "Mark"),
    (42, "Luke"),
    (43, "John"),
    (44, "Acts"),
    (45, "Romans"),
    (46, "I Corinthians"),
    (47, "II Corinthians"),
    (48, "Galatians"),
    (49, "Ephesians"),
    (50, "Philippians"),
    (51, "Colossians"),
    (52, "I Thessalonians"),
    (53, "II Thessalonians"),
    (54, "I Timothy"),
    (55, "II Timothy"),
    (56, "Titus"),
    (57, "Philemon"),
    (58, "Hebrews"),
    (59, "James"),
    (60, "I Peter"),
    (61, "II Peter"),
    (62, "I John"),
    (63, "II John"),
    (64, "III John"),
    (65, "Jude"),
    (66, "Revelation"),
];

/// KJV chapter count per book, indexed by `book_id - 1`.
const CHAPTER_COUNTS: [i64; BOOK_COUNT] = [
    50, 40, 27, 36, 34, 24, 21, 4, 31, 24, 22, 25, 29, 36, 10, 13, 10, 42, 150, 31, 12, 8, 66, 52,
    5, 48, 12, 14, 3, 9, 1, 4, 7, 3, 3, 3, 2, 14, 4, 28, 16, 24, 21, 28, 16, 16, 13, 6, 6, 4, 4,
    5, 3, 6, 4, 3, 1, 13, 5, 5, 3, 5, 1, 1, 1, 22,
];

/// Chapters whose verse count is known exactly: `(book_id, chapter, verses)`.
const KNOWN_VERSE_COUNTS: &[(i64, i64, i64)] = &[
    (1, 1, 31),
    (1, 2, 25),
    (19, 23, 6),
    (19, 117, 2),
    (19, 119, 176),
    (20, 3, 35),
    (23, 53, 12),
    (40, 28, 20),
    (43, 1, 51),
    (43, 3, 36),
    (45, 8, 39),
    (50, 4, 23),
    (66, 22, 21),
];

/// Verse count used for chapters not listed in [`KNOWN_VERSE_COUNTS`].
pub const DEFAULT_VERSES_PER_CHAPTER: i64 = 30;

/// Returns the full catalog as owned [`Book`] rows, in canonical order.
pub fn books() -> Vec<Book> {
    BOOKS.iter().map(|(id, name)| Book::new(*id, name)).collect()
}

/// Canonical name for a book id, if it is in 1..=66.
pub fn book_name(id: i64) -> Option<&'static str> {
    usize::try_from(id)
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| BOOKS.get(i))
        .map(|(_, name)| *name)
}

/// Resolves a user-supplied book name (canonical or alias) to its id.
///
/// Matching is case-insensitive and whitespace-tolerant. Accepted aliases:
/// Arabic ordinals (`"1 Corinthians"`), ordinal words (`"First John"`),
/// `"Psalm"`, `"Song of Songs"`, `"Canticles"`, and `"Revelations"`.
///
/// # Examples
///
/// ```
/// use scripture_core::canon;
///
/// assert_eq!(canon::book_id("I Corinthians"), Some(46));
/// assert_eq!(canon::book_id("1 corinthians"), Some(46));
/// assert_eq!(canon::book_id("Psalm"), Some(19));
/// assert_eq!(canon::book_id("Hezekiah"), None);
/// ```
pub fn book_id(name: &str) -> Option<i64> {
    let normalized = normalize_book_name(name);
    BOOKS
        .iter()
        .find(|(_, canonical)| canonical.eq_ignore_ascii_case(&normalized))
        .map(|(id, _)| *id)
}

/// Canonical spelling for a user-supplied book name, if it resolves.
pub fn canonical_book_name(name: &str) -> Option<&'static str> {
    book_id(name).and_then(book_name)
}

/// Standard chapter count for a book; 1 for ids outside the catalog.
pub fn standard_chapter_count(book_id: i64) -> i64 {
    usize::try_from(book_id)
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| CHAPTER_COUNTS.get(i))
        .copied()
        .unwrap_or(1)
}

/// Plausible verse count for a chapter, used to size placeholder chapters.
///
/// # Examples
///
/// ```
/// use scripture_core::canon;
///
/// assert_eq!(canon::standard_verse_count(19, 119), 176);
/// assert_eq!(canon::standard_verse_count(19, 1), 25);
/// assert_eq!(canon::standard_verse_count(2, 5), 30);
/// ```
pub fn standard_verse_count(book_id: i64, chapter: i64) -> i64 {
    if let Some((_, _, count)) = KNOWN_VERSE_COUNTS
        .iter()
        .find(|(b, c, _)| *b == book_id && *c == chapter)
    {
        return *count;
    }

    match book_id {
        19 => 25,
        20 | 23 => 22,
        66 => 20,
        _ => DEFAULT_VERSES_PER_CHAPTER,
    }
}

fn normalize_book_name(name: &str) -> String {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    let lowered = collapsed.to_ascii_lowercase();

    match lowered.as_str() {
        "psalm" | "ps" => return "Psalms".to_string(),
        "song of songs" | "canticles" | "song" => return "Song of Solomon".to_string(),
        "revelations" | "revelation of john" => return "Revelation".to_string(),
        _ => {}
    }

    if let Some((first, rest)) = collapsed.split_once(' ') {
        let roman = match first.to_ascii_lowercase().as_str() {
            "1" | "1st" | "first" | "i" => Some("I"),
            "2" | "2nd" | "second" | "ii" => Some("II"),
            "3" | "3rd" | "third" | "iii" => Some("III"),
            _ => None,
        };
        if let Some(roman) = roman {
            return format!("{roman} {rest}");
        }
    }

    collapsed
}
