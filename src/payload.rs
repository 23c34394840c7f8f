//! Extracted payload validation
//!
//! Each downloaded archive must extract to exactly one top-level directory
//! carrying a `tdata` subdirectory and a `twoFA.txt` file. Anything else is
//! an unrecoverable layout error for the run.

use crate::error::{ProvisionError, Result};
use crate::types::{TDATA_DIR, TWO_FA_FILE};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolved paths of the credential artifacts inside an extracted payload
#[must_use]
#[derive(Debug, Clone)]
pub struct CredentialPayload {
    /// The single top-level extracted directory
    pub root: PathBuf,
    /// The `tdata` credential subdirectory inside `root`
    pub tdata_dir: PathBuf,
    /// The `twoFA.txt` credential file inside `root`
    pub two_fa_file: PathBuf,
}

/// Locate the credential payload inside an extraction directory
///
/// The extraction directory must contain exactly one top-level entry that is
/// a directory; stray top-level files are ignored when counting. That single
/// directory must contain the `tdata` subdirectory and the `twoFA.txt` file.
///
/// # Errors
///
/// Returns [`ProvisionError::UnexpectedLayout`] if the directory count is not
/// exactly one, or [`ProvisionError::MissingCredentials`] if a required
/// artifact is absent.
pub fn locate_payload(extract_dir: &Path) -> Result<CredentialPayload> {
    let mut top_level_dirs: Vec<PathBuf> = Vec::new();

    for entry in std::fs::read_dir(extract_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            top_level_dirs.push(entry.path());
        }
    }

    if top_level_dirs.len() != 1 {
        return Err(ProvisionError::UnexpectedLayout {
            dir: extract_dir.to_path_buf(),
            found: top_level_dirs.len(),
        }
        .into());
    }

    // Drained by the length check above
    let root = match top_level_dirs.pop() {
        Some(root) => root,
        None => {
            return Err(ProvisionError::UnexpectedLayout {
                dir: extract_dir.to_path_buf(),
                found: 0,
            }
            .into());
        }
    };

    let tdata_dir = root.join(TDATA_DIR);
    if !tdata_dir.is_dir() {
        return Err(ProvisionError::MissingCredentials {
            dir: root,
            name: TDATA_DIR,
        }
        .into());
    }

    let two_fa_file = root.join(TWO_FA_FILE);
    if !two_fa_file.is_file() {
        return Err(ProvisionError::MissingCredentials {
            dir: root,
            name: TWO_FA_FILE,
        }
        .into());
    }

    debug!(?root, "located credential payload");

    Ok(CredentialPayload {
        root,
        tdata_dir,
        two_fa_file,
    })
}
