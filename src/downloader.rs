//! Downloader capability and the megatools-backed implementation
//!
//! Downloading is modelled as an injected capability so the provisioner can
//! be driven by a stub in tests. The production implementation shells out to
//! the external `megatools` binary.

use crate::error::{DownloadError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Capability for fetching a remote link into a local directory
///
/// Implementations download whatever the link points at and write the
/// resulting archive file into `dest_dir` as a side effect. Success is a
/// completed download; the provisioner locates the archive afterwards.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download `link` into `dest_dir`
    ///
    /// # Errors
    ///
    /// Returns an error if the download tool is missing, cannot be spawned,
    /// or reports failure. All downloader errors abort the whole run.
    async fn download(&self, link: &str, dest_dir: &Path) -> Result<()>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}

/// Downloader backed by the external `megatools` binary
///
/// Invokes `<binary> dl <link> --path <dest_dir>` and treats exit code zero
/// as success. The binary writes the downloaded archive into `dest_dir`
/// outside this system's control.
///
/// # Examples
///
/// ```no_run
/// use clone_provisioner::downloader::MegatoolsDownloader;
/// use std::path::PathBuf;
///
/// // Create with explicit path
/// let downloader = MegatoolsDownloader::new(PathBuf::from("/usr/bin/megatools"));
///
/// // Or auto-discover from PATH
/// let downloader = MegatoolsDownloader::from_path()
///     .expect("megatools not found in PATH");
/// ```
pub struct MegatoolsDownloader {
    binary_path: PathBuf,
}

impl MegatoolsDownloader {
    /// Subcommand token passed to megatools for downloading
    const DOWNLOAD_COMMAND: &'static str = "dl";

    /// Create a new downloader with an explicit binary path
    ///
    /// # Arguments
    ///
    /// * `binary_path` - Path to the megatools binary
    #[must_use]
    pub fn new(binary_path: PathBuf) -> Self {
        Self { binary_path }
    }

    /// Attempt to find megatools in PATH
    ///
    /// Uses the `which` crate to search the system PATH.
    ///
    /// # Returns
    ///
    /// `Some(MegatoolsDownloader)` if the binary is found, `None` otherwise.
    #[must_use]
    pub fn from_path() -> Option<Self> {
        which::which("megatools").ok().map(Self::new)
    }

    /// Path to the configured binary
    #[must_use]
    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }
}

#[async_trait]
impl Downloader for MegatoolsDownloader {
    async fn download(&self, link: &str, dest_dir: &Path) -> Result<()> {
        debug!(link = %link, ?dest_dir, binary = ?self.binary_path, "invoking megatools");

        let output = Command::new(&self.binary_path)
            .arg(Self::DOWNLOAD_COMMAND)
            .arg(link)
            .arg("--path")
            .arg(dest_dir)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    DownloadError::ToolNotFound {
                        path: self.binary_path.clone(),
                    }
                } else {
                    DownloadError::SpawnFailed {
                        link: link.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        if !output.status.success() {
            return Err(DownloadError::ToolFailed {
                link: link.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
            .into());
        }

        info!(link = %link, ?dest_dir, "download complete");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "megatools"
    }
}
