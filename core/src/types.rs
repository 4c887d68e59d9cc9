//! Domain type definitions.
//!
//! The types mirror the canonical local schema (`books`, `verses`) and the
//! query-result shape. They serialize with [`serde`] so the CLI and any UI
//! layer can emit them as JSON unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::reference::ReferenceError;

/// A row of the canonical `books` relation.
///
/// Ids are the stable canonical numbering 1..=66 (see [`crate::canon::BOOKS`]).
///
/// # Examples
///
/// ```
/// use scripture_core::Book;
///
/// let book = Book::new(43, "John");
/// assert_eq!(book.to_string(), "John");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Canonical book number.
    pub id: i64,
    /// Display name, unique across the catalog (e.g. `"I Corinthians"`).
    pub name: String,
}

impl Book {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A row of the canonical `verses` relation.
///
/// `(book_id, chapter, verse)` is unique within a store; `book_id` refers to
/// [`Book::id`] but is not enforced as a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// Unique row id. Not assumed contiguous.
    pub id: i64,
    /// Owning book.
    pub book_id: i64,
    /// Chapter number, starting at 1.
    pub chapter: i64,
    /// Verse number within the chapter, starting at 1.
    pub verse: i64,
    /// Verse text, never empty.
    pub text: String,
}

impl Verse {
    /// Deterministic id for a `(book, chapter, verse)` triple.
    ///
    /// Used for rows the store writes itself (fallback seed) so that ids are
    /// stable across runs and never collide.
    ///
    /// # Examples
    ///
    /// ```
    /// use scripture_core::Verse;
    ///
    /// assert_eq!(Verse::canonical_id(43, 3, 16), 43_003_016);
    /// ```
    pub fn canonical_id(book_id: i64, chapter: i64, verse: i64) -> i64 {
        book_id * 1_000_000 + chapter * 1_000 + verse
    }
}

/// Denormalized verse with its book name, as returned by every read path.
///
/// Never persisted. When a requested verse is not in the store the query
/// layer returns a placeholder instance (see [`Scripture::placeholder`])
/// whose `book_name`, `chapter`, and `verse` echo the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scripture {
    pub book_name: String,
    pub chapter: i64,
    pub verse: i64,
    pub text: String,
    /// `true` when the text was synthesized because the verse is missing.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub placeholder: bool,
}

impl Scripture {
    pub fn new(book_name: &str, chapter: i64, verse: i64, text: &str) -> Self {
        Self {
            book_name: book_name.to_string(),
            chapter,
            verse,
            text: text.to_string(),
            placeholder: false,
        }
    }

    /// Builds the clearly-labeled stand-in for a verse the store lacks.
    ///
    /// # Examples
    ///
    /// ```
    /// use scripture_core::Scripture;
    ///
    /// let missing = Scripture::placeholder("Obadiah", 1, 4);
    /// assert!(missing.placeholder);
    /// assert_eq!(missing.book_name, "Obadiah");
    /// assert!(missing.text.contains("Obadiah 1:4"));
    /// ```
    pub fn placeholder(book_name: &str, chapter: i64, verse: i64) -> Self {
        Self {
            book_name: book_name.to_string(),
            chapter,
            verse,
            text: format!(
                "{book_name} {chapter}:{verse} is not available in the current database. \
                 The full King James Bible contains this verse."
            ),
            placeholder: true,
        }
    }

    /// The `Book chapter:verse` label of this result.
    pub fn reference(&self) -> ScriptureReference {
        ScriptureReference::new(&self.book_name, self.chapter, self.verse)
    }
}

impl fmt::Display for Scripture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{} {}",
            self.book_name, self.chapter, self.verse, self.text
        )
    }
}

/// A textual pointer to a single verse.
///
/// Parsing goes through [`crate::parse_reference`], which resolves common
/// book aliases to their canonical names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptureReference {
    pub book: String,
    pub chapter: i64,
    pub verse: i64,
}

impl ScriptureReference {
    pub fn new(book: &str, chapter: i64, verse: i64) -> Self {
        Self {
            book: book.to_string(),
            chapter,
            verse,
        }
    }
}

impl fmt::Display for ScriptureReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}

impl FromStr for ScriptureReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse_reference(s)
    }
}

/// Situations the emergency flow offers targeted verses for.
///
/// # Examples
///
/// ```
/// use scripture_core::EmergencyCategory;
///
/// let category: EmergencyCategory = "Anxiety".parse().unwrap();
/// assert_eq!(category, EmergencyCategory::Anxiety);
/// assert_eq!(category.as_str(), "anxiety");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmergencyCategory {
    #[default]
    Temptation,
    Anxiety,
    Depression,
    Guidance,
    Comfort,
}

impl EmergencyCategory {
    /// Every category, in menu order.
    pub const ALL: [EmergencyCategory; 5] = [
        EmergencyCategory::Temptation,
        EmergencyCategory::Anxiety,
        EmergencyCategory::Depression,
        EmergencyCategory::Guidance,
        EmergencyCategory::Comfort,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmergencyCategory::Temptation => "temptation",
            EmergencyCategory::Anxiety => "anxiety",
            EmergencyCategory::Depression => "depression",
            EmergencyCategory::Guidance => "guidance",
            EmergencyCategory::Comfort => "comfort",
        }
    }

    /// Substring searched for when none of the category's references resolve.
    ///
    /// The category names themselves mostly do not occur in KJV text, so each
    /// maps to a stem that does.
    pub fn search_keyword(&self) -> &'static str {
        match self {
            EmergencyCategory::Temptation => "tempt",
            EmergencyCategory::Anxiety => "careful",
            EmergencyCategory::Depression => "trouble",
            EmergencyCategory::Guidance => "guide",
            EmergencyCategory::Comfort => "comfort",
        }
    }
}

impl fmt::Display for EmergencyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmergencyCategory {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        EmergencyCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == lowered)
            .ok_or_else(|| ReferenceError::UnknownCategory(s.to_string()))
    }
}
