//! Materialization of the bundled corpus into a writable location.
//!
//! The bundled asset ships read-only (and possibly gzip-compressed). Before
//! the importer can open it, it is copied once to a writable path. Repeat
//! calls reuse the existing copy, so only the first call of a session pays
//! for the copy.
//!
//! # Examples
//!
//! ```no_run
//! use scripture_db::AssetMaterializer;
//!
//! let materializer = AssetMaterializer::new("assets/kjv.db", "data/kjv-source.db");
//! let local = materializer.ensure_local_copy().unwrap();
//! let again = materializer.ensure_local_copy().unwrap();
//! assert_eq!(local, again);
//! assert_eq!(materializer.copy_count(), 1);
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::error::{AssetError, Result};
use crate::manifest::AssetManifest;

/// Copies the bundled corpus to its writable location at most once.
#[derive(Debug)]
pub struct AssetMaterializer {
    bundled_path: PathBuf,
    local_path: PathBuf,
    copies: AtomicUsize,
}

impl AssetMaterializer {
    pub fn new(bundled_path: impl Into<PathBuf>, local_path: impl Into<PathBuf>) -> Self {
        Self {
            bundled_path: bundled_path.into(),
            local_path: local_path.into(),
            copies: AtomicUsize::new(0),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(&config.asset.bundled_path, &config.asset.local_path)
    }

    pub fn bundled_path(&self) -> &Path {
        &self.bundled_path
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// Number of copies performed by this materializer so far.
    pub fn copy_count(&self) -> usize {
        self.copies.load(Ordering::SeqCst)
    }

    /// Returns the path of a writable copy of the bundled asset.
    ///
    /// A non-empty local file is reused as-is unless its sidecar manifest
    /// exists and no longer matches it. Otherwise the bundled asset is
    /// copied (decompressing `.gz` assets) and a fresh manifest is written.
    /// A zero-length bundled asset produces a zero-length local file.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::Unavailable`] if the bundled asset cannot be
    /// opened, [`AssetError::CompressionError`] if decompression fails, or
    /// [`AssetError::IoError`] if the local copy cannot be written.
    pub fn ensure_local_copy(&self) -> Result<PathBuf> {
        if self.has_usable_copy() {
            debug!(path = %self.local_path.display(), "reusing materialized asset");
            return Ok(self.local_path.clone());
        }

        self.copy_bundled()?;
        Ok(self.local_path.clone())
    }

    /// Removes the local copy and its manifest.
    ///
    /// The next [`ensure_local_copy`](Self::ensure_local_copy) copies again.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::IoError`] if an existing file cannot be removed.
    pub fn invalidate(&self) -> Result<()> {
        for path in [
            self.local_path.clone(),
            AssetManifest::sidecar_path(&self.local_path),
        ] {
            match std::fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "removed materialized file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn has_usable_copy(&self) -> bool {
        let Ok(meta) = std::fs::metadata(&self.local_path) else {
            return false;
        };
        if meta.len() == 0 {
            return false;
        }

        let sidecar = AssetManifest::sidecar_path(&self.local_path);
        if !sidecar.exists() {
            return true;
        }
        match AssetManifest::load(&sidecar).and_then(|m| m.verify(&self.local_path)) {
            Ok(()) => true,
            Err(err) => {
                warn!(path = %self.local_path.display(), error = %err, "materialized asset failed verification");
                false
            }
        }
    }

    fn copy_bundled(&self) -> Result<()> {
        let source = File::open(&self.bundled_path).map_err(|source| AssetError::Unavailable {
            path: self.bundled_path.clone(),
            source,
        })?;

        if let Some(parent) = self.local_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let compressed = is_compressed(&self.bundled_path);
        let partial = partial_path(&self.local_path);
        let written = {
            let mut reader = BufReader::new(source);
            let mut writer = BufWriter::new(File::create(&partial)?);
            let written = if compressed {
                decompress(&mut reader, &mut writer)
            } else {
                std::io::copy(&mut reader, &mut writer).map_err(|e| self.read_error(e))
            };
            let written = match written {
                Ok(n) => n,
                Err(err) => {
                    drop(writer);
                    let _ = std::fs::remove_file(&partial);
                    return Err(err);
                }
            };
            writer.flush()?;
            written
        };
        std::fs::rename(&partial, &self.local_path)?;
        self.copies.fetch_add(1, Ordering::SeqCst);

        let manifest = AssetManifest::record(&self.bundled_path, &self.local_path, compressed)?;
        manifest.save(AssetManifest::sidecar_path(&self.local_path))?;

        info!(
            from = %self.bundled_path.display(),
            to = %self.local_path.display(),
            bytes = written,
            compressed,
            "materialized bundled asset"
        );
        Ok(())
    }

    fn read_error(&self, source: std::io::Error) -> AssetError {
        AssetError::Unavailable {
            path: self.bundled_path.clone(),
            source,
        }
    }
}

fn is_compressed(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("gz")
}

fn partial_path(local_path: &Path) -> PathBuf {
    let mut raw = local_path.as_os_str().to_owned();
    raw.push(".partial");
    PathBuf::from(raw)
}

#[cfg(feature = "compressed-assets")]
fn decompress(reader: &mut impl std::io::Read, writer: &mut impl Write) -> Result<u64> {
    let mut decoder = flate2::read::GzDecoder::new(reader);
    std::io::copy(&mut decoder, writer).map_err(|e| AssetError::CompressionError(e.to_string()))
}

#[cfg(not(feature = "compressed-assets"))]
fn decompress(_reader: &mut impl std::io::Read, _writer: &mut impl Write) -> Result<u64> {
    Err(AssetError::CompressionError(
        "gzip assets require the compressed-assets feature".to_string(),
    ))
}
