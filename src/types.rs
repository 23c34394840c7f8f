//! Core types and events for clone-provisioner

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the credential subdirectory expected inside each extracted payload
pub const TDATA_DIR: &str = "tdata";

/// Name of the credential file expected inside each extracted payload
pub const TWO_FA_FILE: &str = "twoFA.txt";

/// Supported archive formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArchiveType {
    /// RAR archive (.rar, .r00)
    Rar,
    /// 7-Zip archive (.7z)
    SevenZip,
    /// ZIP archive (.zip)
    Zip,
}

/// Per-link pipeline stage, used for logging and event context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Invoking the external downloader
    Download,
    /// Locating the downloaded archive in the temp directory
    Locate,
    /// Extracting the archive
    Extract,
    /// Validating the extracted payload layout
    Validate,
    /// Copying the template directory to the clone destination
    CloneTemplate,
    /// Merging credential artifacts into the clone
    MergeCredentials,
    /// Appending the clone name to the progress ledger
    RecordProgress,
    /// Removing per-iteration temporary artifacts
    Cleanup,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Download => "download",
            Stage::Locate => "locate",
            Stage::Extract => "extract",
            Stage::Validate => "validate",
            Stage::CloneTemplate => "clone-template",
            Stage::MergeCredentials => "merge-credentials",
            Stage::RecordProgress => "record-progress",
            Stage::Cleanup => "cleanup",
        };
        write!(f, "{}", name)
    }
}

/// Progress events emitted by the provisioner
///
/// Consumers subscribe via [`BatchProvisioner::subscribe`] and receive one
/// event per state change. Events are informational; dropping the receiver
/// does not affect the run.
///
/// [`BatchProvisioner::subscribe`]: crate::provisioner::BatchProvisioner::subscribe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Clone already present in the ledger, skipped without side effects
    Skipped {
        /// Clone name that was skipped
        clone: String,
    },

    /// Download started for a link
    Downloading {
        /// Clone name being provisioned
        clone: String,
        /// The source link being downloaded
        link: String,
    },

    /// Archive extraction started
    Extracting {
        /// Clone name being provisioned
        clone: String,
        /// The archive being extracted
        archive: PathBuf,
    },

    /// Clone fully provisioned and recorded in the ledger
    Provisioned {
        /// Clone name that completed
        clone: String,
        /// Final clone directory
        path: PathBuf,
    },

    /// Every link processed; ledger and temp directory removed
    RunComplete {
        /// Number of clones provisioned this run
        provisioned: usize,
        /// Number of clones skipped as already complete
        skipped: usize,
    },

    /// Run aborted on an unrecoverable error; ledger preserved for resume
    RunAborted {
        /// Clone name that was being provisioned when the run aborted
        clone: String,
        /// Human-readable failure description
        error: String,
    },
}

/// Summary of a completed run
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// Clone names provisioned during this run, in order
    pub provisioned: Vec<String>,
    /// Clone names skipped because they were already in the ledger
    pub skipped: Vec<String>,
}
