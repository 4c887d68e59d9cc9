//! The scripture store facade and its health state machine.
//!
//! [`ScriptureStore`] owns the single local store connection and decides,
//! per call, whether it can be read, needs repair, or cannot be used at all:
//!
//! ```text
//! LOADING ──open+verify──▶ READY
//!    │                       ▲
//!    ├──unhealthy──▶ REPAIR ─┤ repair (import pipeline)
//!    └──unopenable─▶ ERROR ──┘
//! ```
//!
//! The first read of a session opens and verifies the store and, if it is
//! not healthy, runs the materialize → detect → import pipeline once.
//! Further repairs are explicit ([`ScriptureStore::repair`],
//! [`ScriptureStore::force_reload`]).
//!
//! Reads share a read lock on the session; repairs take the write lock, so
//! reads wait behind an in-flight repair and two repairs never overlap.
//! Every read degrades instead of failing: a missing verse becomes a
//! placeholder, a thin catalog becomes the static one.
//!
//! # Examples
//!
//! ```no_run
//! use scripture_db::StoreConfig;
//! use scripture_sqlite::{ScriptureStore, StoreStatus};
//!
//! let store = ScriptureStore::open(StoreConfig::in_dir("/var/lib/scripture"));
//! assert_eq!(store.status().status, StoreStatus::Ready);
//!
//! let verse = store.get_verse("John", 3, 16).unwrap();
//! println!("{verse}");
//! ```

use std::fmt;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{Datelike, Local, NaiveDate};
use rand::Rng;
use rand::seq::SliceRandom;
use rusqlite::Connection;
use scripture_core::{
    Book, EmergencyCategory, Scripture, canon, lists, looks_like_reference, parse_reference,
    validate_reference,
};
use scripture_db::{AssetMaterializer, StoreConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::detect::DetectedSchema;
use crate::error::{Result, StoreError};
use crate::import::{CancellationToken, ImportProgress, ImportResult, Importer, ProgressSnapshot};
use crate::query::VerseQuery;
use crate::schema::drop_tables;
use crate::verify::{StoreHealth, inspect};

/// Queries shorter than this (after trimming) return no results.
pub const MIN_SEARCH_LEN: usize = 2;

/// Candidate pool size for the emergency keyword fallback.
const EMERGENCY_SEARCH_LIMIT: usize = 10;

/// Health state of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StoreStatus {
    Loading,
    Ready,
    /// Openable but failed verification.
    Repair,
    /// Cannot be opened or written.
    Error,
}

impl fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StoreStatus::Loading => "LOADING",
            StoreStatus::Ready => "READY",
            StoreStatus::Repair => "REPAIR",
            StoreStatus::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Status plus the human-readable diagnostic shown alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub status: StoreStatus,
    pub diagnostic: String,
}

struct Session {
    status: StoreStatus,
    diagnostic: String,
    conn: Option<Mutex<Connection>>,
    health: StoreHealth,
    repair_attempted: bool,
}

impl Session {
    fn new() -> Self {
        Self {
            status: StoreStatus::Loading,
            diagnostic: "Store not opened yet.".to_string(),
            conn: None,
            health: StoreHealth::default(),
            repair_attempted: false,
        }
    }

    fn conn_mut(&mut self) -> Option<&mut Connection> {
        self.conn
            .as_mut()
            .map(|m| m.get_mut().unwrap_or_else(PoisonError::into_inner))
    }
}

enum PipelineSource<'a> {
    Bundled,
    File(&'a Path),
    Seed,
}

/// Process-wide handle to the local scripture store.
///
/// Construct one per store file and share it (e.g. behind an [`Arc`]);
/// it is `Send + Sync`.
pub struct ScriptureStore {
    config: StoreConfig,
    materializer: AssetMaterializer,
    session: RwLock<Session>,
    progress: Arc<ImportProgress>,
    cancel: CancellationToken,
    subscribers: Mutex<Vec<Sender<StatusSnapshot>>>,
}

impl ScriptureStore {
    /// Creates a store handle without touching disk. Status is `LOADING`.
    pub fn new(config: StoreConfig) -> Self {
        let materializer = AssetMaterializer::from_config(&config);
        Self {
            config,
            materializer,
            session: RwLock::new(Session::new()),
            progress: Arc::new(ImportProgress::default()),
            cancel: CancellationToken::new(),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Creates a store handle and brings it up immediately.
    ///
    /// Never fails: an unusable store shows up as `ERROR` in
    /// [`status`](Self::status).
    pub fn open(config: StoreConfig) -> Self {
        let store = Self::new(config);
        store.ensure_ready();
        store
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn materializer(&self) -> &AssetMaterializer {
        &self.materializer
    }

    pub fn status(&self) -> StatusSnapshot {
        let session = self.read_session();
        StatusSnapshot {
            status: session.status,
            diagnostic: session.diagnostic.clone(),
        }
    }

    /// Receives a snapshot on every subsequent status change.
    pub fn subscribe(&self) -> Receiver<StatusSnapshot> {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Progress of the current or most recent import.
    pub fn progress(&self) -> ProgressSnapshot {
        self.progress.snapshot()
    }

    /// Last known health figures.
    pub fn health(&self) -> StoreHealth {
        self.read_session().health
    }

    /// Re-runs the import pipeline from the bundled asset.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::StoreUnopenable`] when the store cannot be
    /// written at all; the status is then `ERROR`.
    pub fn repair(&self) -> Result<ImportResult> {
        let mut session = self.write_session();
        self.run_pipeline(&mut session, PipelineSource::Bundled)
    }

    /// Imports from an explicit source file instead of the bundled asset.
    ///
    /// # Errors
    ///
    /// Same as [`repair`](Self::repair).
    pub fn import_from(&self, source: impl AsRef<Path>) -> Result<ImportResult> {
        let mut session = self.write_session();
        self.run_pipeline(&mut session, PipelineSource::File(source.as_ref()))
    }

    /// Replaces the store contents with the fallback dataset.
    ///
    /// # Errors
    ///
    /// Same as [`repair`](Self::repair).
    pub fn seed(&self) -> Result<ImportResult> {
        let mut session = self.write_session();
        self.run_pipeline(&mut session, PipelineSource::Seed)
    }

    /// Discards the store and rebuilds it from a fresh copy of the asset.
    ///
    /// An import already running is asked to stop at its next batch
    /// boundary; this call then waits for it and starts over.
    ///
    /// # Errors
    ///
    /// Same as [`repair`](Self::repair).
    pub fn force_reload(&self) -> Result<ImportResult> {
        self.cancel.cancel();
        let mut guard = self.write_session();
        self.cancel.reset();

        let session = &mut *guard;
        self.transition(session, StoreStatus::Loading, "Reloading scripture database.".to_string());
        if let Some(conn) = session.conn_mut() {
            if let Err(err) = drop_tables(conn) {
                warn!(error = %err, "could not drop tables before reload");
            }
        }
        if let Err(err) = self.materializer.invalidate() {
            warn!(error = %err, "could not invalidate materialized asset");
        }
        self.run_pipeline(session, PipelineSource::Bundled)
    }

    /// Drops the cached connection and returns to `LOADING`.
    pub fn close(&self) {
        let mut guard = self.write_session();
        let session = &mut *guard;
        session.conn = None;
        session.health = StoreHealth::default();
        session.repair_attempted = false;
        self.transition(session, StoreStatus::Loading, "Store closed.".to_string());
    }

    /// Re-inspects the store and returns a fresh diagnostic line.
    pub fn diagnose(&self) -> String {
        let mut guard = self.write_session();
        let session = &mut *guard;
        let Some(conn) = session.conn.as_ref() else {
            return session.diagnostic.clone();
        };
        let inspected = inspect(&conn.lock().unwrap_or_else(PoisonError::into_inner));
        match inspected {
            Ok(health) => {
                session.health = health;
                health.diagnostic()
            }
            Err(err) => format!("Could not inspect database: {err}"),
        }
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Exact verse lookup.
    ///
    /// Returns `None` only while the store is not `READY`. A verse missing
    /// from a ready store comes back as a placeholder echoing the request.
    pub fn get_verse(&self, book: &str, chapter: i64, verse: i64) -> Option<Scripture> {
        let book_id = canon::book_id(book);
        self.with_ready(|query, _| {
            let found = book_id.and_then(|id| logged(query.verse(id, chapter, verse), "get_verse"));
            found.unwrap_or_else(|| Scripture::placeholder(book, chapter, verse))
        })
    }

    /// Parses a reference such as `"1 Corinthians 13:4"` and looks it up.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidReference`] if the text does not parse,
    /// or names a chapter or verse outside the book's standard range.
    pub fn get_verse_by_reference(&self, reference: &str) -> Result<Option<Scripture>> {
        let reference = parse_reference(reference)?;
        if let Some(err) = validate_reference(&reference).into_iter().next() {
            return Err(err.into());
        }
        Ok(self.get_verse(&reference.book, reference.chapter, reference.verse))
    }

    /// Every verse of a chapter in verse order.
    ///
    /// An empty chapter yields one placeholder per expected verse.
    pub fn get_chapter(&self, book: &str, chapter: i64) -> Vec<Scripture> {
        let book_id = canon::book_id(book);
        self.with_ready(|query, _| {
            let rows = book_id
                .map(|id| logged(query.chapter(id, chapter), "get_chapter"))
                .unwrap_or_default();
            if rows.is_empty() {
                placeholder_chapter(book, book_id.unwrap_or(0), chapter)
            } else {
                rows
            }
        })
        .unwrap_or_default()
    }

    /// Id-based lookup: one verse when `verse` is given, else the chapter.
    pub fn get_verses(&self, book_id: i64, chapter: i64, verse: Option<i64>) -> Vec<Scripture> {
        let name = canon::book_name(book_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Book {book_id}"));
        match verse {
            Some(verse) => self.get_verse(&name, chapter, verse).into_iter().collect(),
            None => self.get_chapter(&name, chapter),
        }
    }

    pub fn get_random_verse(&self) -> Option<Scripture> {
        self.with_ready(|query, _| {
            logged(query.random_verse(&mut rand::thread_rng()), "get_random_verse")
        })
        .flatten()
    }

    /// Case-insensitive substring search, at most `limit` results.
    ///
    /// Queries under [`MIN_SEARCH_LEN`] characters return nothing. When
    /// nothing matches and the text reads like a reference, the reference
    /// is looked up instead.
    pub fn search(&self, text: &str, limit: usize) -> Vec<Scripture> {
        let text = text.trim();
        if text.chars().count() < MIN_SEARCH_LEN || limit == 0 {
            return Vec::new();
        }

        let results = self
            .with_ready(|query, _| logged(query.search(text, limit), "search"))
            .unwrap_or_default();
        if !results.is_empty() || !looks_like_reference(text) {
            return results;
        }

        match self.get_verse_by_reference(text) {
            Ok(Some(verse)) if !verse.placeholder => vec![verse],
            _ => Vec::new(),
        }
    }

    /// The 66 books in canonical order.
    ///
    /// Falls back to the static catalog when the store cannot provide it.
    pub fn get_all_books(&self) -> Vec<Book> {
        self.with_ready(|query, _| logged(query.books(), "get_all_books"))
            .filter(|books| books.len() == canon::BOOK_COUNT)
            .unwrap_or_else(canon::books)
    }

    /// Chapter count of a book, from the store when it holds a full corpus.
    pub fn get_chapter_count(&self, book_id: i64) -> i64 {
        self.with_ready(|query, health| {
            if health.is_healthy() {
                logged(query.chapter_count(book_id), "get_chapter_count")
            } else {
                0
            }
        })
        .filter(|count| *count > 0)
        .unwrap_or_else(|| canon::standard_chapter_count(book_id))
    }

    /// Today's verse in local time.
    pub fn get_daily_scripture(&self) -> Option<Scripture> {
        self.get_daily_scripture_on(Local::now().date_naive())
    }

    /// The daily verse for a given calendar date.
    pub fn get_daily_scripture_on(&self, date: NaiveDate) -> Option<Scripture> {
        let reference = lists::daily_reference_for_day(date.ordinal());
        self.get_verse(&reference.book, reference.chapter, reference.verse)
    }

    /// A random verse for the category, with keyword and random fallbacks.
    pub fn get_emergency_scripture(&self, category: EmergencyCategory) -> Option<Scripture> {
        let mut rng = rand::thread_rng();
        let references = lists::emergency_references(category);
        let reference = lists::emergency_reference(category, rng.gen_range(0..references.len()));

        if let Some(verse) = self.get_verse(&reference.book, reference.chapter, reference.verse) {
            if !verse.placeholder {
                return Some(verse);
            }
        }
        debug!(%category, %reference, "emergency reference unresolved, searching keyword");

        let matches = self.search(category.search_keyword(), EMERGENCY_SEARCH_LIMIT);
        if let Some(verse) = matches.choose(&mut rng) {
            return Some(verse.clone());
        }
        self.get_random_verse()
    }

    // -----------------------------------------------------------------------
    // State machine
    // -----------------------------------------------------------------------

    fn ensure_ready(&self) {
        {
            let session = self.read_session();
            match session.status {
                StoreStatus::Ready => return,
                StoreStatus::Repair | StoreStatus::Error if session.repair_attempted => return,
                _ => {}
            }
        }

        let mut guard = self.write_session();
        let session = &mut *guard;
        if session.status == StoreStatus::Loading {
            self.open_and_verify(session);
        }
        if matches!(session.status, StoreStatus::Repair | StoreStatus::Error)
            && !session.repair_attempted
        {
            if let Err(err) = self.run_pipeline(session, PipelineSource::Bundled) {
                warn!(error = %err, "automatic repair failed");
            }
        }
    }

    fn open_and_verify(&self, session: &mut Session) {
        match open_store(&self.config.store_path) {
            Ok(conn) => {
                let health = inspect(&conn).unwrap_or_default();
                session.conn = Some(Mutex::new(conn));
                session.health = health;
                let status = if health.is_healthy() {
                    StoreStatus::Ready
                } else {
                    let unhealthy = StoreError::StoreUnhealthy(health.diagnostic());
                    info!(reason = %unhealthy, "store needs repair");
                    StoreStatus::Repair
                };
                self.transition(session, status, health.diagnostic());
            }
            Err(err) => {
                self.transition(session, StoreStatus::Error, format!("Could not open database: {err}"));
            }
        }
    }

    fn run_pipeline(&self, session: &mut Session, source: PipelineSource<'_>) -> Result<ImportResult> {
        session.repair_attempted = true;
        self.transition(session, StoreStatus::Loading, "Rebuilding scripture database.".to_string());

        if let Err(err) = self.reopen_if_unusable(session) {
            self.transition(session, StoreStatus::Error, format!("Could not open database: {err}"));
            return Err(err);
        }

        let importer = Importer::new(self.config.batch_size())
            .with_progress(Arc::clone(&self.progress))
            .with_cancellation(self.cancel.clone());

        let (outcome, health) = {
            let Some(conn) = session.conn_mut() else {
                return Err(StoreError::StoreUnopenable("no connection".to_string()));
            };
            let outcome = match source {
                PipelineSource::Bundled => match self.materializer.ensure_local_copy() {
                    Ok(path) => importer.import(conn, &path),
                    Err(err) => {
                        let err = StoreError::from(err);
                        warn!(error = %err, "seeding fallback data");
                        importer.seed_fallback(conn, DetectedSchema::undetected())
                    }
                },
                PipelineSource::File(path) => importer.import(conn, path),
                PipelineSource::Seed => importer.seed_fallback(conn, DetectedSchema::undetected()),
            };
            (outcome, inspect(conn).unwrap_or_default())
        };

        match outcome {
            Ok(result) => {
                session.health = health;
                let diagnostic = if result.degraded {
                    format!("Using built-in fallback data. {}", health.diagnostic())
                } else {
                    health.diagnostic()
                };
                self.transition(session, StoreStatus::Ready, diagnostic);
                Ok(result)
            }
            Err(err) => {
                self.transition(session, StoreStatus::Error, format!("Could not rebuild database: {err}"));
                Err(err)
            }
        }
    }

    /// Opens the store if needed, recreating the file when it is not a database.
    fn reopen_if_unusable(&self, session: &mut Session) -> Result<()> {
        let corrupt = match session.conn.as_ref() {
            None => false,
            Some(conn) => inspect(&conn.lock().unwrap_or_else(PoisonError::into_inner)).is_err(),
        };
        if session.conn.is_some() && !corrupt {
            return Ok(());
        }

        session.conn = None;
        if corrupt {
            warn!(path = %self.config.store_path.display(), "store is not a database, recreating");
            match std::fs::remove_file(&self.config.store_path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(StoreError::StoreUnopenable(e.to_string())),
            }
        }
        session.conn = Some(Mutex::new(open_store(&self.config.store_path)?));
        Ok(())
    }

    fn transition(&self, session: &mut Session, status: StoreStatus, diagnostic: String) {
        if session.status != status {
            info!(from = %session.status, to = %status, diagnostic = %diagnostic, "store status changed");
        }
        session.status = status;
        session.diagnostic = diagnostic;

        let snapshot = StatusSnapshot {
            status,
            diagnostic: session.diagnostic.clone(),
        };
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|tx| tx.send(snapshot.clone()).is_ok());
    }

    fn with_ready<T>(&self, f: impl FnOnce(VerseQuery<'_>, &StoreHealth) -> T) -> Option<T> {
        self.ensure_ready();
        let session = self.read_session();
        if session.status != StoreStatus::Ready {
            return None;
        }
        let conn = session
            .conn
            .as_ref()?
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Some(f(VerseQuery::new(&conn), &session.health))
    }

    fn read_session(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_session(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ScriptureStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptureStore")
            .field("store_path", &self.config.store_path)
            .field("status", &self.status())
            .finish()
    }
}

fn open_store(path: &Path) -> Result<Connection> {
    let unopenable = |detail: String| StoreError::StoreUnopenable(format!("{}: {detail}", path.display()));
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| unopenable(e.to_string()))?;
        }
    }
    Connection::open(path).map_err(|e| unopenable(e.to_string()))
}

fn placeholder_chapter(book: &str, book_id: i64, chapter: i64) -> Vec<Scripture> {
    (1..=canon::standard_verse_count(book_id, chapter))
        .map(|verse| Scripture::placeholder(book, chapter, verse))
        .collect()
}

fn logged<T: Default>(result: Result<T>, operation: &str) -> T {
    result.unwrap_or_else(|err| {
        warn!(operation, error = %err, "store query failed");
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_minimal;
    use scripture_core::ReferenceError;

    fn store_in(dir: &Path) -> ScriptureStore {
        ScriptureStore::new(StoreConfig::in_dir(dir))
    }

    #[test]
    fn test_new_store_is_loading() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert_eq!(store.status().status, StoreStatus::Loading);
        assert!(!dir.path().join("data").exists());
    }

    #[test]
    fn test_missing_asset_seeds_and_becomes_ready() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScriptureStore::open(StoreConfig::in_dir(dir.path()));
        let status = store.status();
        assert_eq!(status.status, StoreStatus::Ready);
        assert!(status.diagnostic.starts_with("Using built-in fallback data."));

        let verse = store.get_verse("Genesis", 1, 1).unwrap();
        assert!(!verse.placeholder);
    }

    #[test]
    fn test_unknown_book_gets_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScriptureStore::open(StoreConfig::in_dir(dir.path()));
        let verse = store.get_verse("Hezekiah", 1, 1).unwrap();
        assert!(verse.placeholder);
        assert_eq!(verse.book_name, "Hezekiah");
    }

    #[test]
    fn test_empty_chapter_yields_standard_placeholder_count() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScriptureStore::open(StoreConfig::in_dir(dir.path()));
        let chapter = store.get_chapter("Psalms", 119);
        assert_eq!(chapter.len(), 176);
        assert!(chapter.iter().all(|s| s.placeholder));
        assert_eq!(chapter[175].verse, 176);
    }

    #[test]
    fn test_short_search_returns_empty_without_opening() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(store.search("", 10).is_empty());
        assert!(store.search("a", 10).is_empty());
        assert!(store.search("  b ", 10).is_empty());
        assert_eq!(store.status().status, StoreStatus::Loading);
    }

    #[test]
    fn test_search_falls_back_to_reference() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScriptureStore::open(StoreConfig::in_dir(dir.path()));
        let results = store.search("1 Corinthians 10:13", 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].book_name, "I Corinthians");
        assert!(store.search("Obadiah 1:4", 5).is_empty());
    }

    #[test]
    fn test_subscribe_sees_transitions() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let rx = store.subscribe();
        store.get_all_books();

        let seen: Vec<StoreStatus> = rx.try_iter().map(|s| s.status).collect();
        assert_eq!(seen.first(), Some(&StoreStatus::Repair));
        assert_eq!(seen.last(), Some(&StoreStatus::Ready));
    }

    #[test]
    fn test_close_returns_to_loading() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScriptureStore::open(StoreConfig::in_dir(dir.path()));
        store.close();
        assert_eq!(store.status().status, StoreStatus::Loading);
        assert!(store.get_verse("John", 3, 16).is_some());
        assert_eq!(store.status().status, StoreStatus::Ready);
    }

    #[test]
    fn test_thin_store_is_repaired_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::in_dir(dir.path());
        std::fs::create_dir_all(config.store_path.parent().unwrap()).unwrap();
        {
            let mut conn = Connection::open(&config.store_path).unwrap();
            seed_minimal(&mut conn).unwrap();
        }

        let store = ScriptureStore::open(config);
        assert_eq!(store.status().status, StoreStatus::Ready);
        assert_eq!(store.get_all_books().len(), 66);
    }

    #[test]
    fn test_corrupt_store_file_is_recreated() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::in_dir(dir.path());
        std::fs::create_dir_all(config.store_path.parent().unwrap()).unwrap();
        std::fs::write(&config.store_path, vec![0xAB; 8192]).unwrap();

        let store = ScriptureStore::open(config);
        assert_eq!(store.status().status, StoreStatus::Ready);
        assert!(!store.get_verse("John", 3, 16).unwrap().placeholder);
    }

    #[test]
    fn test_reference_outside_book_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScriptureStore::open(StoreConfig::in_dir(dir.path()));
        assert!(matches!(
            store.get_verse_by_reference("Jude 2:1"),
            Err(StoreError::InvalidReference(ReferenceError::InvalidChapter { .. }))
        ));
        assert!(store.get_verse_by_reference("Jude 1:1").unwrap().is_some());
        assert!(store.search("Jude 2:1", 5).is_empty());
    }

    #[test]
    fn test_unopenable_store_reports_error_until_repaired() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let mut config = StoreConfig::in_dir(dir.path());
        config.store_path = blocker.join("scripture.db");

        let store = ScriptureStore::open(config);
        let status = store.status();
        assert_eq!(status.status, StoreStatus::Error);
        assert!(!status.diagnostic.is_empty());
        assert_eq!(store.get_all_books().len(), 66);
        assert!(store.get_verse("John", 3, 16).is_none());
        assert!(matches!(store.repair(), Err(StoreError::StoreUnopenable(_))));
        assert_eq!(store.status().status, StoreStatus::Error);

        std::fs::remove_file(&blocker).unwrap();
        let result = store.repair().unwrap();
        assert!(result.degraded);
        assert_eq!(store.status().status, StoreStatus::Ready);
        assert!(!store.get_verse("John", 3, 16).unwrap().placeholder);
    }

    #[test]
    fn test_progress_and_diagnose_follow_last_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScriptureStore::open(StoreConfig::in_dir(dir.path()));
        let result = store.seed().unwrap();

        let progress = store.progress();
        assert_eq!(progress.verses_imported, result.verses_imported);
        assert!(progress.verses_imported > 0);
        assert_eq!(store.diagnose(), store.health().diagnostic());
        assert!(store.health().verse_count > 0);
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&StoreStatus::Repair).unwrap();
        assert_eq!(json, "\"REPAIR\"");
    }
}
