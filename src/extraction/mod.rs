//! Archive extraction
//!
//! This module handles extracting the password-less RAR, 7z, and ZIP archives
//! produced by the external downloader. Extraction is modelled as an injected
//! capability ([`ArchiveExtractor`]) so tests can substitute a stub; the
//! default implementation detects the format by extension and routes to the
//! matching extractor.

mod rar;
mod sevenz;
mod shared;
mod zip;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

// Re-exports
pub use rar::RarExtractor;
pub use sevenz::SevenZipExtractor;
pub use shared::{detect_archive_type, find_archives};
pub use zip::ZipExtractor;

use crate::error::{ProvisionError, Result};
use crate::types::ArchiveType;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::task::spawn_blocking;
use tracing::info;

/// Capability for extracting a downloaded archive into a directory
#[async_trait]
pub trait ArchiveExtractor: Send + Sync {
    /// Extract `archive_path` into `dest_path`, creating it if needed
    ///
    /// Returns the list of extracted files.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown formats and corrupt or unreadable
    /// archives. All extraction errors abort the whole run.
    async fn extract(&self, archive_path: &Path, dest_path: &Path) -> Result<Vec<PathBuf>>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}

/// Default extractor: detects the format by extension and dispatches
///
/// Routes to [`RarExtractor`], [`SevenZipExtractor`], or [`ZipExtractor`].
/// The blocking archive-library work runs under `spawn_blocking` so the
/// async runtime is not stalled by large archives.
#[derive(Debug, Default)]
pub struct FormatDispatchExtractor;

#[async_trait]
impl ArchiveExtractor for FormatDispatchExtractor {
    async fn extract(&self, archive_path: &Path, dest_path: &Path) -> Result<Vec<PathBuf>> {
        let archive_type = detect_archive_type(archive_path).ok_or_else(|| {
            ProvisionError::UnknownArchiveType {
                archive: archive_path.to_path_buf(),
            }
        })?;

        info!(
            ?archive_path,
            ?archive_type,
            "dispatching extraction to appropriate extractor"
        );

        let archive = archive_path.to_path_buf();
        let dest = dest_path.to_path_buf();

        let files = spawn_blocking(move || match archive_type {
            ArchiveType::Rar => RarExtractor::extract(&archive, &dest),
            ArchiveType::SevenZip => SevenZipExtractor::extract(&archive, &dest),
            ArchiveType::Zip => ZipExtractor::extract(&archive, &dest),
        })
        .await
        .map_err(|e| ProvisionError::ExtractionFailed {
            archive: archive_path.to_path_buf(),
            reason: format!("extraction task panicked: {}", e),
        })??;

        Ok(files)
    }

    fn name(&self) -> &'static str {
        "format-dispatch"
    }
}
