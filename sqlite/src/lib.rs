//! SQLite backend for the scripture store.
//!
//! This crate turns an arbitrary third-party Bible database into a local
//! canonical store and serves verse lookups from it. The store heals
//! itself: a missing or corrupt store is rebuilt from the bundled
//! asset, and when no asset can be read it is seeded with built-in data.
//!
//! # Architecture
//!
//! - **`schema`**: canonical `books`/`verses` DDL with optional table prefixes
//! - **`detect`**: heuristics that locate the book and verse tables in a source file
//! - **`verify`**: table presence and row-count health checks
//! - **`seed`**: static catalog and curated verse fallback
//! - **`import`**: batched, cancellable copy from a detected source
//! - **`query`**: read queries over the canonical store
//! - **`store`**: [`ScriptureStore`], the state machine tying it together
//!
//! # Quick start
//!
//! ```no_run
//! use scripture_db::StoreConfig;
//! use scripture_sqlite::ScriptureStore;
//!
//! let store = ScriptureStore::open(StoreConfig::in_dir("data"));
//! println!("{}", store.status().diagnostic);
//!
//! for verse in store.search("shepherd", 5) {
//!     println!("{verse}");
//! }
//! ```
//!
//! # Lower-level pieces
//!
//! ```
//! use rusqlite::Connection;
//! use scripture_sqlite::{Importer, inspect};
//!
//! let mut dest = Connection::open_in_memory().unwrap();
//! // A source that does not exist degrades to the fallback dataset.
//! let result = Importer::default().import(&mut dest, "/nonexistent/source.db").unwrap();
//! assert!(result.degraded);
//! assert_eq!(inspect(&dest).unwrap().book_count, 66);
//! ```

mod detect;
mod error;
mod import;
mod query;
mod schema;
mod seed;
mod store;
mod verify;

pub use detect::{
    DetectedSchema, DetectionStrategy, TableInfo, describe_tables, detect, detect_path,
    open_source,
};
pub use error::{Result, StoreError};
pub use import::{
    CancellationToken, ImportProgress, ImportResult, Importer, ProgressSnapshot,
};
pub use query::VerseQuery;
pub use schema::{
    BOOKS_TABLE, VERSES_TABLE, create_tables, drop_tables, generate_drop_sql,
    generate_schema_sql, validate_prefix,
};
pub use seed::{SeedReport, seed_minimal};
pub use store::{MIN_SEARCH_LEN, ScriptureStore, StatusSnapshot, StoreStatus};
pub use verify::{MIN_BOOK_COUNT, MIN_VERSE_COUNT, StoreHealth, inspect, is_healthy};
