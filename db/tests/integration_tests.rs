use std::path::Path;

use scripture_db::{AssetError, AssetManifest, AssetMaterializer, StoreConfig};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_bundle(dir: &Path, contents: &[u8]) -> StoreConfig {
    let config = StoreConfig::in_dir(dir);
    std::fs::create_dir_all(config.asset.bundled_path.parent().unwrap()).unwrap();
    std::fs::write(&config.asset.bundled_path, contents).unwrap();
    config
}

fn corpus_bytes() -> Vec<u8> {
    (0..64 * 1024u32).map(|i| (i % 251) as u8).collect()
}

// ---------------------------------------------------------------------------
// Materialization
// ---------------------------------------------------------------------------

#[test]
fn test_materialize_twice_is_byte_identical_with_one_copy() {
    let dir = TempDir::new().unwrap();
    let config = write_bundle(dir.path(), &corpus_bytes());
    let materializer = AssetMaterializer::from_config(&config);

    let first = materializer.ensure_local_copy().unwrap();
    let first_bytes = std::fs::read(&first).unwrap();
    let second = materializer.ensure_local_copy().unwrap();
    let second_bytes = std::fs::read(&second).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_bytes, second_bytes);
    assert_eq!(first_bytes, corpus_bytes());
    assert_eq!(materializer.copy_count(), 1);
}

#[test]
fn test_existing_copy_survives_new_materializer() {
    let dir = TempDir::new().unwrap();
    let config = write_bundle(dir.path(), b"first bundle");
    AssetMaterializer::from_config(&config)
        .ensure_local_copy()
        .unwrap();

    // A later session with a different bundle still reuses the intact copy.
    std::fs::write(&config.asset.bundled_path, b"second bundle").unwrap();
    let materializer = AssetMaterializer::from_config(&config);
    let local = materializer.ensure_local_copy().unwrap();

    assert_eq!(materializer.copy_count(), 0);
    assert_eq!(std::fs::read(local).unwrap(), b"first bundle");
}

#[test]
fn test_zero_length_asset_materializes_without_error() {
    let dir = TempDir::new().unwrap();
    let config = write_bundle(dir.path(), b"");
    let materializer = AssetMaterializer::from_config(&config);

    let local = materializer.ensure_local_copy().unwrap();
    assert!(local.exists());
    assert_eq!(std::fs::metadata(&local).unwrap().len(), 0);
}

#[test]
fn test_missing_asset_reports_unavailable() {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig::in_dir(dir.path());
    let materializer = AssetMaterializer::from_config(&config);

    match materializer.ensure_local_copy() {
        Err(AssetError::Unavailable { path, .. }) => {
            assert_eq!(path, config.asset.bundled_path);
        }
        other => panic!("expected Unavailable, got {other:?}"),
    }
    assert_eq!(materializer.copy_count(), 0);
}

#[cfg(feature = "compressed-assets")]
#[test]
fn test_gzip_asset_is_decompressed() {
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;

    let dir = TempDir::new().unwrap();
    let mut config = StoreConfig::in_dir(dir.path());
    config.asset.bundled_path = dir.path().join("kjv.db.gz");

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&corpus_bytes()).unwrap();
    std::fs::write(&config.asset.bundled_path, encoder.finish().unwrap()).unwrap();

    let materializer = AssetMaterializer::from_config(&config);
    let local = materializer.ensure_local_copy().unwrap();
    assert_eq!(std::fs::read(&local).unwrap(), corpus_bytes());

    let manifest = AssetManifest::load(AssetManifest::sidecar_path(&local)).unwrap();
    assert!(manifest.compressed);
    assert_eq!(manifest.size_bytes, corpus_bytes().len() as u64);
}

#[cfg(feature = "compressed-assets")]
#[test]
fn test_corrupt_gzip_asset_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    let mut config = StoreConfig::in_dir(dir.path());
    config.asset.bundled_path = dir.path().join("kjv.db.gz");
    std::fs::write(&config.asset.bundled_path, b"definitely not gzip").unwrap();

    let materializer = AssetMaterializer::from_config(&config);
    assert!(matches!(
        materializer.ensure_local_copy(),
        Err(AssetError::CompressionError(_))
    ));
    assert!(!config.asset.local_path.exists());
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

#[test]
fn test_manifest_matches_materialized_copy() {
    let dir = TempDir::new().unwrap();
    let config = write_bundle(dir.path(), &corpus_bytes());
    let materializer = AssetMaterializer::from_config(&config);
    let local = materializer.ensure_local_copy().unwrap();

    let manifest = AssetManifest::load(AssetManifest::sidecar_path(&local)).unwrap();
    assert_eq!(
        manifest.checksum,
        AssetManifest::calculate_checksum(&config.asset.bundled_path).unwrap()
    );
    manifest.verify(&local).unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(&manifest.materialized_at).is_ok());
}

#[test]
fn test_truncated_copy_is_rematerialized() {
    let dir = TempDir::new().unwrap();
    let config = write_bundle(dir.path(), &corpus_bytes());
    let materializer = AssetMaterializer::from_config(&config);
    let local = materializer.ensure_local_copy().unwrap();

    let mut truncated = corpus_bytes();
    truncated.truncate(100);
    std::fs::write(&local, truncated).unwrap();

    materializer.ensure_local_copy().unwrap();
    assert_eq!(materializer.copy_count(), 2);
    assert_eq!(std::fs::read(&local).unwrap(), corpus_bytes());
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn test_config_save_load_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scripture.yml");

    let mut config = StoreConfig::in_dir(dir.path());
    config.import.batch_size = 500;
    config.save(&path).unwrap();

    let loaded = StoreConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.batch_size(), 500);
}

#[test]
fn test_config_load_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        StoreConfig::load(dir.path().join("absent.yml")),
        Err(AssetError::IoError(_))
    ));
}
