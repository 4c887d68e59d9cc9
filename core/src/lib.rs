//! Core domain types and static tables for the scripture store.
//!
//! This crate defines the data model shared by every layer of the store and
//! the fixed tables that never come from disk:
//!
//! - [`Book`], [`Verse`]: rows of the canonical `books` / `verses` relations.
//! - [`Scripture`]: the denormalized Book+Verse shape returned by every read.
//! - [`ScriptureReference`]: a `(book, chapter, verse)` triple with parsing
//!   ([`parse_reference`]) and validation ([`validate_reference`]).
//! - [`canon`]: the 66-book catalog in canonical order plus the standard
//!   chapter and verse count tables used to size placeholder output.
//! - [`curated`]: the fallback verse set written when no corpus can be
//!   imported.
//! - [`lists`]: daily and emergency reference lists.
//!
//! # Example
//!
//! ```
//! use scripture_core::*;
//!
//! let reference = parse_reference("1 Corinthians 10:13").unwrap();
//! assert_eq!(reference.book, "I Corinthians");
//! assert_eq!(canon::book_id(&reference.book), Some(46));
//!
//! let daily = lists::daily_reference_for_day(1);
//! assert!(canon::book_id(&daily.book).is_some());
//! ```

pub mod canon;
pub mod curated;
pub mod lists;
mod reference;
mod types;

pub use reference::{ReferenceError, looks_like_reference, parse_reference, validate_reference};
pub use types::*;
