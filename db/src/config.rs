//! Store configuration.
//!
//! Defines the YAML-serializable configuration that says where the bundled
//! corpus lives, where its writable copy and the canonical store go, and how
//! large each import batch is.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! asset:
//!   bundled_path: assets/kjv.db
//!   local_path: data/kjv-source.db
//! store_path: data/scripture.db
//! import:
//!   batch_size: 1000
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Rows per verse import batch when the config does not say otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Current configuration format version.
pub const CONFIG_VERSION: &str = "1.0";

/// Locations of the bundled corpus and its writable copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Read-only corpus shipped with the application. May end in `.gz`.
    pub bundled_path: PathBuf,
    /// Writable location the bundled asset is materialized to.
    pub local_path: PathBuf,
}

/// Importer tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Verse rows per committed batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

/// Top-level store configuration.
///
/// # Examples
///
/// ```
/// use scripture_db::StoreConfig;
///
/// let config = StoreConfig::in_dir("/var/lib/scripture");
/// assert!(config.store_path.ends_with("data/scripture.db"));
/// assert_eq!(config.batch_size(), 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    /// Bundled asset locations.
    pub asset: AssetConfig,
    /// Canonical local store file.
    pub store_path: PathBuf,
    /// Importer settings.
    #[serde(default)]
    pub import: ImportConfig,
}

impl StoreConfig {
    /// Default layout rooted at `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            version: CONFIG_VERSION.to_string(),
            asset: AssetConfig {
                bundled_path: dir.join("assets").join("kjv.db"),
                local_path: dir.join("data").join("kjv-source.db"),
            },
            store_path: dir.join("data").join("scripture.db"),
            import: ImportConfig::default(),
        }
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::AssetError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::AssetError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::AssetError::IoError) if the file cannot
    /// be written, or [`YamlError`](crate::AssetError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Effective batch size, never below 1.
    pub fn batch_size(&self) -> usize {
        self.import.batch_size.max(1)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::in_dir("")
    }
}
