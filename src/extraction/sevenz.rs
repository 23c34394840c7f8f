use crate::error::{Error, ProvisionError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Archive extractor for 7z files
pub struct SevenZipExtractor;

impl SevenZipExtractor {
    /// Extract a 7z archive
    ///
    /// Returns the list of extracted files, collected by scanning the
    /// destination after decompression (the sevenz library does not report
    /// them). Extracted paths are validated to stay inside the destination.
    pub fn extract(archive_path: &Path, dest_path: &Path) -> Result<Vec<PathBuf>> {
        debug!(?archive_path, ?dest_path, "attempting 7z extraction");

        // Create destination directory if it doesn't exist
        std::fs::create_dir_all(dest_path).map_err(|e| {
            Error::Io(std::io::Error::other(format!(
                "failed to create destination: {}",
                e
            )))
        })?;

        sevenz_rust::decompress_file(archive_path, dest_path).map_err(|e| {
            Error::Provision(ProvisionError::ExtractionFailed {
                archive: archive_path.to_path_buf(),
                reason: format!("failed to extract 7z archive: {}", e),
            })
        })?;

        // Path traversal protection for archives with hostile entry names
        Self::validate_extracted_paths(dest_path)?;

        let extracted_files = Self::collect_extracted_files(dest_path)?;

        info!(
            ?archive_path,
            extracted_count = extracted_files.len(),
            "7z extraction successful"
        );

        Ok(extracted_files)
    }

    /// Validate that all extracted files are within the destination directory
    fn validate_extracted_paths(dest_path: &Path) -> Result<()> {
        let canonical_dest = dest_path.canonicalize().map_err(|e| {
            Error::Io(std::io::Error::other(format!(
                "failed to canonicalize destination path: {}",
                e
            )))
        })?;

        fn check_dir(dir: &Path, canonical_dest: &Path) -> Result<()> {
            for entry in std::fs::read_dir(dir)? {
                let entry = entry?;
                let path = entry.path();
                let canonical = path.canonicalize().map_err(|e| {
                    Error::Io(std::io::Error::other(format!(
                        "failed to canonicalize extracted path: {}",
                        e
                    )))
                })?;

                if !canonical.starts_with(canonical_dest) {
                    return Err(Error::Provision(ProvisionError::ExtractionFailed {
                        archive: dir.to_path_buf(),
                        reason: format!(
                            "path traversal detected: extracted file {:?} is outside destination",
                            canonical
                        ),
                    }));
                }

                if path.is_dir() {
                    check_dir(&path, canonical_dest)?;
                }
            }
            Ok(())
        }

        check_dir(dest_path, &canonical_dest)
    }

    /// Collect all regular files under a directory, recursively
    fn collect_extracted_files(dir: &Path) -> Result<Vec<PathBuf>> {
        fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
            for entry in std::fs::read_dir(dir)? {
                let entry = entry?;
                let path = entry.path();
                if path.is_dir() {
                    walk(&path, files)?;
                } else {
                    files.push(path);
                }
            }
            Ok(())
        }

        let mut files = Vec::new();
        walk(dir, &mut files)?;
        Ok(files)
    }
}
