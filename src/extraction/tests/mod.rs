use crate::error::{Error, ProvisionError};
use crate::extraction::*;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a valid ZIP archive containing the given (name, content) entries.
/// Entry names ending in '/' become directory entries.
fn create_zip_archive(archive_path: &Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(archive_path).unwrap();
    let mut writer = ::zip::ZipWriter::new(file);
    let options =
        ::zip::write::FileOptions::default().compression_method(::zip::CompressionMethod::Stored);
    for (name, content) in entries {
        if name.ends_with('/') {
            writer.add_directory(name.trim_end_matches('/'), options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            std::io::Write::write_all(&mut writer, content).unwrap();
        }
    }
    writer.finish().unwrap();
}

// ---------------------------------------------------------------------------
// ZipExtractor
// ---------------------------------------------------------------------------

#[test]
fn zip_extract_writes_nested_entries() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("payload.zip");
    create_zip_archive(
        &archive,
        &[
            ("12345/twoFA.txt", b"secret".as_slice()),
            ("12345/tdata/key_data", b"\x01\x02\x03".as_slice()),
        ],
    );

    let dest = dir.path().join("extracted");
    let files = ZipExtractor::extract(&archive, &dest).unwrap();

    assert_eq!(files.len(), 2);
    assert_eq!(
        std::fs::read(dest.join("12345/twoFA.txt")).unwrap(),
        b"secret"
    );
    assert!(dest.join("12345/tdata/key_data").is_file());
}

#[test]
fn zip_extract_creates_explicit_directory_entries() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("payload.zip");
    create_zip_archive(
        &archive,
        &[
            ("12345/", b"".as_slice()),
            ("12345/tdata/", b"".as_slice()),
            ("12345/twoFA.txt", b"secret".as_slice()),
        ],
    );

    let dest = dir.path().join("extracted");
    ZipExtractor::extract(&archive, &dest).unwrap();

    assert!(dest.join("12345/tdata").is_dir());
}

#[test]
fn zip_extract_rejects_corrupt_archive() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("broken.zip");
    std::fs::write(&archive, b"this is not a zip file").unwrap();

    let result = ZipExtractor::extract(&archive, &dir.path().join("extracted"));
    assert!(matches!(
        result,
        Err(Error::Provision(ProvisionError::ExtractionFailed { .. }))
    ));
}

#[test]
fn zip_extract_missing_archive_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let result = ZipExtractor::extract(
        &dir.path().join("absent.zip"),
        &dir.path().join("extracted"),
    );
    assert!(matches!(result, Err(Error::Io(_))));
}

// ---------------------------------------------------------------------------
// FormatDispatchExtractor
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dispatcher_routes_zip_archives() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("payload.zip");
    create_zip_archive(&archive, &[("12345/twoFA.txt", b"secret".as_slice())]);

    let extractor = FormatDispatchExtractor;
    let dest = dir.path().join("extracted");
    let files = extractor.extract(&archive, &dest).await.unwrap();

    assert_eq!(files.len(), 1);
    assert!(dest.join("12345/twoFA.txt").is_file());
}

#[tokio::test]
async fn dispatcher_rejects_unknown_archive_type() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("payload.tar.gz");
    std::fs::write(&archive, b"whatever").unwrap();

    let extractor = FormatDispatchExtractor;
    let result = extractor
        .extract(&archive, &dir.path().join("extracted"))
        .await;

    assert!(matches!(
        result,
        Err(Error::Provision(ProvisionError::UnknownArchiveType { .. }))
    ));
}

#[tokio::test]
async fn dispatcher_surfaces_corrupt_rar_as_extraction_failure() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("broken.rar");
    std::fs::write(&archive, b"this is not a rar file").unwrap();

    let extractor = FormatDispatchExtractor;
    let result = extractor
        .extract(&archive, &dir.path().join("extracted"))
        .await;

    assert!(matches!(
        result,
        Err(Error::Provision(ProvisionError::ExtractionFailed { .. }))
    ));
}

#[tokio::test]
async fn dispatcher_surfaces_corrupt_7z_as_extraction_failure() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("broken.7z");
    std::fs::write(&archive, b"this is not a 7z file").unwrap();

    let extractor = FormatDispatchExtractor;
    let result = extractor
        .extract(&archive, &dir.path().join("extracted"))
        .await;

    assert!(matches!(
        result,
        Err(Error::Provision(ProvisionError::ExtractionFailed { .. }))
    ));
}
