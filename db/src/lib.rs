//! File-level plumbing for the scripture store.
//!
//! This crate owns everything that happens before SQL: copying the bundled
//! corpus asset to a writable location, recording and verifying what was
//! copied, and loading the store configuration.
//!
//! # Quick start
//!
//! ```no_run
//! use scripture_db::{AssetMaterializer, StoreConfig};
//!
//! let config = StoreConfig::load("scripture.yml").unwrap();
//! let materializer = AssetMaterializer::from_config(&config);
//! let source = materializer.ensure_local_copy().unwrap();
//! println!("corpus ready at {}", source.display());
//! ```
//!
//! # Feature flags
//!
//! - **`compressed-assets`** (default): decompresses `*.gz` bundled assets
//!   while materializing them. Requires the `flate2` dependency.

mod config;
mod error;
mod manifest;
mod materializer;

pub use config::{AssetConfig, CONFIG_VERSION, DEFAULT_BATCH_SIZE, ImportConfig, StoreConfig};
pub use error::{AssetError, Result};
pub use manifest::AssetManifest;
pub use materializer::AssetMaterializer;
