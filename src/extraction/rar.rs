use crate::error::{Error, ProvisionError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Archive extractor for RAR files
pub struct RarExtractor;

impl RarExtractor {
    /// Convert an unrar error to our error type
    fn convert_unrar_error(e: unrar::error::UnrarError, archive_path: &Path) -> Error {
        Error::Provision(ProvisionError::ExtractionFailed {
            archive: archive_path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Extract a RAR archive
    ///
    /// Returns the list of extracted files. Entry names are sanitized to
    /// prevent path traversal (e.g., "../../../etc/passwd").
    pub fn extract(archive_path: &Path, dest_path: &Path) -> Result<Vec<PathBuf>> {
        debug!(?archive_path, ?dest_path, "attempting RAR extraction");

        // Create destination directory if it doesn't exist
        std::fs::create_dir_all(dest_path).map_err(|e| {
            Error::Io(std::io::Error::other(format!(
                "failed to create destination: {}",
                e
            )))
        })?;

        let processor = unrar::Archive::new(archive_path)
            .open_for_processing()
            .map_err(|e| Self::convert_unrar_error(e, archive_path))?;

        let mut extracted_files = Vec::new();

        // Process each entry using the state machine interface
        let mut at_header = processor;
        loop {
            // Read the next header - transitions to BeforeFile state
            let at_file = match at_header.read_header() {
                Ok(Some(entry_processor)) => entry_processor,
                Ok(None) => break, // No more entries
                Err(e) => return Err(Self::convert_unrar_error(e, archive_path)),
            };

            let header = at_file.entry();

            // Sanitize filename to prevent path traversal
            let sanitized = Path::new(&header.filename)
                .components()
                .filter(|c| matches!(c, std::path::Component::Normal(_)))
                .collect::<PathBuf>();

            if sanitized.as_os_str().is_empty() {
                // Skip entries with no valid path components (e.g., pure ".." entries)
                at_header = at_file.skip().map_err(|e| {
                    Error::Provision(ProvisionError::ExtractionFailed {
                        archive: archive_path.to_path_buf(),
                        reason: format!("failed to skip unsafe entry: {}", e),
                    })
                })?;
                continue;
            }

            let file_path = dest_path.join(&sanitized);

            if !header.is_directory() {
                // Extract the file - transitions back to BeforeHeader state
                at_header = at_file
                    .extract_to(&file_path)
                    .map_err(|e| Self::convert_unrar_error(e, archive_path))?;
                extracted_files.push(file_path);
            } else {
                // Create directory entries eagerly so empty directories survive
                std::fs::create_dir_all(&file_path).map_err(|e| {
                    Error::Io(std::io::Error::other(format!(
                        "failed to create directory: {}",
                        e
                    )))
                })?;
                at_header = at_file.skip().map_err(|e| {
                    Error::Provision(ProvisionError::ExtractionFailed {
                        archive: archive_path.to_path_buf(),
                        reason: format!("failed to skip directory: {}", e),
                    })
                })?;
            }
        }

        info!(
            ?archive_path,
            extracted_count = extracted_files.len(),
            "RAR extraction successful"
        );

        Ok(extracted_files)
    }
}
