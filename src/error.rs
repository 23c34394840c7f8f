//! Error types for clone-provisioner
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error types (Download, Provision, Config)
//! - Contextual information (link, file path, artifact name) for operator messages
//!
//! Every error is fatal to the current run: there is no automatic retry at
//! any step. The only resilience mechanism is the progress ledger, which lets
//! a fresh process invocation resume past already-completed clones.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for clone-provisioner operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for clone-provisioner
///
/// This is the primary error type used throughout the library. Each variant
/// includes contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "template_dir")
        key: Option<String>,
    },

    /// External downloader invocation error
    #[error("download error: {0}")]
    Download(#[from] DownloadError),

    /// Per-link provisioning error (extract, validate, copy, record)
    #[error("provisioning error: {0}")]
    Provision(#[from] ProvisionError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors surfaced by the external downloader capability
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The downloader executable could not be found
    #[error("downloader executable not found at {path}")]
    ToolNotFound {
        /// The configured or discovered path to the downloader binary
        path: PathBuf,
    },

    /// The downloader executable could not be spawned
    #[error("failed to execute downloader for {link}: {reason}")]
    SpawnFailed {
        /// The link whose download could not be started
        link: String,
        /// The underlying spawn failure
        reason: String,
    },

    /// The downloader exited with a non-zero status
    #[error("downloader failed for {link} (exit code {code:?}): {stderr}")]
    ToolFailed {
        /// The link whose download failed
        link: String,
        /// Exit code reported by the downloader, if any
        code: Option<i32>,
        /// Captured stderr from the downloader
        stderr: String,
    },
}

/// Per-link provisioning errors (everything after the download succeeded)
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// No archive file was found in the temporary output directory
    #[error("no archive found in {dir} after downloading {link}")]
    ArchiveNotFound {
        /// The temporary output directory that was searched
        dir: PathBuf,
        /// The link that was downloaded
        link: String,
    },

    /// The archive file has an unsupported extension
    #[error("unknown archive type for file: {archive}")]
    UnknownArchiveType {
        /// The file that could not be matched to a supported format
        archive: PathBuf,
    },

    /// Archive extraction failed (corrupt or unreadable archive)
    #[error("extraction failed for {archive}: {reason}")]
    ExtractionFailed {
        /// The archive file that failed to extract
        archive: PathBuf,
        /// The reason extraction failed
        reason: String,
    },

    /// The extracted payload does not have exactly one top-level directory
    #[error("expected exactly one extracted directory in {dir}, found {found}")]
    UnexpectedLayout {
        /// The extraction directory that was inspected
        dir: PathBuf,
        /// How many top-level directories were actually found
        found: usize,
    },

    /// A required credential artifact is missing from the extracted payload
    #[error("required credential artifact {name:?} not found in {dir}")]
    MissingCredentials {
        /// The single extracted directory that was inspected
        dir: PathBuf,
        /// The missing entry name (`tdata` or `twoFA.txt`)
        name: &'static str,
    },

    /// The clone destination already exists
    ///
    /// A stale directory from a prior partial run is not merged into; it is
    /// surfaced as an error for the operator to resolve.
    #[error("clone destination already exists: {path}")]
    CloneCollision {
        /// The destination path that already exists
        path: PathBuf,
    },

    /// Appending a completed clone to the progress ledger failed
    #[error("failed to record {clone} in ledger {path}: {reason}")]
    LedgerWriteFailed {
        /// The clone name that could not be recorded
        clone: String,
        /// The ledger file path
        path: PathBuf,
        /// The underlying write failure
        reason: String,
    },
}
