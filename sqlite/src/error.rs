//! Error types for store operations.
//!
//! Variants follow the store's failure tiers. Most are absorbed inside the
//! pipeline and turned into a cheaper fallback; only
//! [`StoreError::StoreUnopenable`] reaches callers as a terminal state.

use thiserror::Error;

/// Errors that can occur while building, checking, or reading the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite operation failure.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// The bundled asset is missing, unreadable, or failed to materialize.
    #[error("asset unavailable: {0}")]
    AssetUnavailable(#[from] scripture_db::AssetError),

    /// The source file has no recognizable books/verses relations.
    #[error("schema undetected in {0}")]
    SchemaUndetected(String),

    /// A verse batch failed; earlier batches stay committed.
    #[error("import stopped after {committed} verses: {reason}")]
    ImportPartialFailure { committed: u64, reason: String },

    /// The store opened but failed the integrity check.
    #[error("store unhealthy: {0}")]
    StoreUnhealthy(String),

    /// The destination store cannot be created, opened, or written.
    #[error("store unopenable: {0}")]
    StoreUnopenable(String),

    /// Table prefix contains invalid characters.
    #[error("invalid prefix '{0}': must contain only alphanumeric characters and underscores")]
    InvalidPrefix(String),

    /// A textual reference could not be parsed.
    #[error("invalid reference: {0}")]
    InvalidReference(#[from] scripture_core::ReferenceError),
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
