use crate::error::Result;
use crate::types::ArchiveType;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Detect archive type by file extension
///
/// Returns the archive type based on the file extension.
/// Supports RAR (.rar, .r00), 7z (.7z), and ZIP (.zip) formats.
#[must_use]
pub fn detect_archive_type(path: &Path) -> Option<ArchiveType> {
    let ext = path.extension()?.to_str()?.to_lowercase();

    match ext.as_str() {
        "rar" | "r00" => Some(ArchiveType::Rar),
        "7z" => Some(ArchiveType::SevenZip),
        "zip" => Some(ArchiveType::Zip),
        _ => None,
    }
}

/// Find supported archive files directly under a directory
///
/// Subdirectories are not searched. Results are sorted by path so the
/// selection of "the" downloaded archive is deterministic when the
/// downloader happens to leave more than one behind.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn find_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    debug!(?dir, "searching for downloaded archives");

    let mut archives = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        // Skip directories (per-iteration extraction dirs live alongside archives)
        if path.is_dir() {
            continue;
        }

        if detect_archive_type(&path).is_some() {
            archives.push(path);
        }
    }

    archives.sort();

    debug!("found {} archive(s)", archives.len());
    Ok(archives)
}
