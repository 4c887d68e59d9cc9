//! Daily and emergency reference lists.
//!
//! Both lists hold references only; the text is always looked up through the
//! store so an imported corpus takes precedence over anything static.

use crate::{EmergencyCategory, ScriptureReference};

/// Ordered daily rotation, `(book, chapter, verse)`.
pub const DAILY_REFERENCES: &[(&str, i64, i64)] = &[
    ("Philippians", 4, 13),
    ("Psalms", 118, 24),
    ("Isaiah", 40, 31),
    ("Romans", 8, 28),
    ("John", 3, 16),
    ("Jeremiah", 29, 11),
    ("Proverbs", 3, 5),
];

const TEMPTATION: &[(&str, i64, i64)] = &[
    ("I Corinthians", 10, 13),
    ("James", 4, 7),
    ("Matthew", 26, 41),
];

const ANXIETY: &[(&str, i64, i64)] = &[
    ("Philippians", 4, 6),
    ("I Peter", 5, 7),
    ("Matthew", 6, 34),
];

const DEPRESSION: &[(&str, i64, i64)] = &[
    ("Psalms", 34, 17),
    ("Isaiah", 41, 10),
    ("Psalms", 3, 3),
];

const GUIDANCE: &[(&str, i64, i64)] = &[
    ("Proverbs", 3, 5),
    ("Psalms", 32, 8),
    ("James", 1, 5),
];

const COMFORT: &[(&str, i64, i64)] = &[
    ("Psalms", 23, 4),
    ("Matthew", 11, 28),
    ("II Corinthians", 1, 3),
];

/// Daily reference for a 1-based day of the year.
///
/// The rotation is `day_of_year % DAILY_REFERENCES.len()`, so the same day
/// always yields the same reference and consecutive days step through the
/// list in order.
///
/// # Examples
///
/// ```
/// use scripture_core::lists;
///
/// let a = lists::daily_reference_for_day(100);
/// let b = lists::daily_reference_for_day(100 + lists::DAILY_REFERENCES.len() as u32);
/// assert_eq!(a, b);
/// ```
pub fn daily_reference_for_day(day_of_year: u32) -> ScriptureReference {
    let index = day_of_year as usize % DAILY_REFERENCES.len();
    let (book, chapter, verse) = DAILY_REFERENCES[index];
    ScriptureReference::new(book, chapter, verse)
}

/// The fixed reference list for an emergency category.
pub fn emergency_references(category: EmergencyCategory) -> &'static [(&'static str, i64, i64)] {
    match category {
        EmergencyCategory::Temptation => TEMPTATION,
        EmergencyCategory::Anxiety => ANXIETY,
        EmergencyCategory::Depression => DEPRESSION,
        EmergencyCategory::Guidance => GUIDANCE,
        EmergencyCategory::Comfort => COMFORT,
    }
}

/// Emergency reference at `index` (wrapped) within a category.
///
/// Random selection lives with the caller; this keeps the lists
/// deterministic and testable.
pub fn emergency_reference(category: EmergencyCategory, index: usize) -> ScriptureReference {
    let list = emergency_references(category);
    let (book, chapter, verse) = list[index % list.len()];
    ScriptureReference::new(book, chapter, verse)
}
