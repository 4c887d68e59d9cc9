//! Asset manifest for materialized corpus copies.
//!
//! Every time the bundled asset is copied to its writable location, a JSON
//! sidecar (`<local>.manifest.json`) records where it came from, how large
//! it is, its SHA-256 checksum, and when the copy was made. The sidecar lets
//! later runs tell an intact copy from a truncated or hand-edited one.
//!
//! # Examples
//!
//! ```no_run
//! use scripture_db::AssetManifest;
//!
//! let manifest = AssetManifest::record("assets/kjv.db", "data/kjv-source.db", false).unwrap();
//! manifest.save(AssetManifest::sidecar_path("data/kjv-source.db")).unwrap();
//!
//! let loaded = AssetManifest::load(AssetManifest::sidecar_path("data/kjv-source.db")).unwrap();
//! loaded.verify("data/kjv-source.db").unwrap();
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{AssetError, Result};

/// Metadata recorded for one materialized copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    /// Bundled asset the copy was made from.
    pub bundled_path: String,
    /// Size of the local copy in bytes (after decompression).
    pub size_bytes: u64,
    /// SHA-256 hex digest of the local copy.
    pub checksum: String,
    /// RFC 3339 timestamp of the copy.
    pub materialized_at: String,
    /// Whether the bundled asset was gzip-compressed.
    #[serde(default)]
    pub compressed: bool,
}

impl AssetManifest {
    /// Builds a manifest describing the file currently at `local_path`.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::IoError`] if the local copy cannot be read, or
    /// [`AssetError::InvalidManifest`] if the bundled path is not UTF-8.
    pub fn record(
        bundled_path: impl AsRef<Path>,
        local_path: impl AsRef<Path>,
        compressed: bool,
    ) -> Result<Self> {
        let bundled_path = bundled_path.as_ref();
        let local_path = local_path.as_ref();
        let bundled = bundled_path.to_str().ok_or_else(|| {
            AssetError::InvalidManifest(format!(
                "bundled path is not valid UTF-8: {}",
                bundled_path.display()
            ))
        })?;

        Ok(Self {
            bundled_path: bundled.to_string(),
            size_bytes: std::fs::metadata(local_path)?.len(),
            checksum: Self::calculate_checksum(local_path)?,
            materialized_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            compressed,
        })
    }

    /// Path of the sidecar manifest for a local copy.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use scripture_db::AssetManifest;
    ///
    /// assert_eq!(
    ///     AssetManifest::sidecar_path("data/kjv.db"),
    ///     PathBuf::from("data/kjv.db.manifest.json")
    /// );
    /// ```
    pub fn sidecar_path(local_path: impl AsRef<Path>) -> PathBuf {
        let mut raw = local_path.as_ref().as_os_str().to_owned();
        raw.push(".manifest.json");
        PathBuf::from(raw)
    }

    /// Loads a manifest from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::IoError`] if the file cannot be read, or
    /// [`AssetError::JsonError`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let manifest = serde_json::from_reader(reader)?;
        Ok(manifest)
    }

    /// Saves the manifest as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::IoError`] if the file cannot be written, or
    /// [`AssetError::JsonError`] if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Computes the SHA-256 hex digest of a file.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::IoError`] if the file cannot be read.
    pub fn calculate_checksum(path: impl AsRef<Path>) -> Result<String> {
        let mut file = std::fs::File::open(path)?;
        let mut hasher = Sha256::new();
        std::io::copy(&mut file, &mut hasher)?;
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Confirms that `local_path` still matches this manifest.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::InvalidChecksum`] when the size or digest
    /// differs, or [`AssetError::IoError`] if the file cannot be read.
    pub fn verify(&self, local_path: impl AsRef<Path>) -> Result<()> {
        let local_path = local_path.as_ref();
        let size = std::fs::metadata(local_path)?.len();
        if size != self.size_bytes {
            return Err(AssetError::InvalidChecksum(format!(
                "{}: expected {} bytes, found {size}",
                local_path.display(),
                self.size_bytes
            )));
        }

        let actual = Self::calculate_checksum(local_path)?;
        if actual != self.checksum {
            return Err(AssetError::InvalidChecksum(format!(
                "{}: expected {}, found {actual}",
                local_path.display(),
                self.checksum
            )));
        }
        Ok(())
    }
}
