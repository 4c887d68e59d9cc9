//! Error types for asset and configuration operations.
//!
//! Covers every failure mode below the SQL layer: a missing or unreadable
//! bundled asset, local file I/O, manifest and config (de)serialization,
//! checksum verification, and decompression.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while materializing or describing the corpus asset.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The bundled asset cannot be located or read.
    #[error("bundled asset unavailable at {}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Local file I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Manifest validation failure (e.g. a field that cannot be recorded).
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    /// Checksum mismatch between the manifest and the local copy.
    #[error("invalid checksum: {0}")]
    InvalidChecksum(String),

    /// Gzip decompression failure, or a compressed asset without support for it.
    #[error("compression error: {0}")]
    CompressionError(String),
}

impl AssetError {
    /// Returns `true` when the bundled asset itself is the problem.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, AssetError::Unavailable { .. })
    }
}

/// Convenience alias for results with [`AssetError`].
pub type Result<T> = std::result::Result<T, AssetError>;
