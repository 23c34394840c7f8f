//! The batch provisioner: a sequential, crash-resumable per-link pipeline
//!
//! One link is processed start-to-finish before the next begins. Per link:
//! download, locate archive, extract, validate payload, clone template, merge
//! credentials, record progress, clean up. The first unrecoverable error
//! aborts the whole run with the ledger left intact, so a fresh invocation
//! resumes past already-completed clones.

use crate::config::Config;
use crate::downloader::{Downloader, MegatoolsDownloader};
use crate::error::{Error, ProvisionError, Result};
use crate::extraction::{ArchiveExtractor, FormatDispatchExtractor, find_archives};
use crate::ledger::Ledger;
use crate::links::{clone_name, read_link_list};
use crate::payload::locate_payload;
use crate::types::{Event, RunReport, Stage, TDATA_DIR, TWO_FA_FILE};
use crate::utils::copy_dir_recursive;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Capacity of the progress event channel
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Drives the link list to completion, one link at a time
///
/// Constructed from an explicit [`Config`] plus the downloader and extractor
/// capabilities; there are no ambient globals. The run is strictly
/// single-threaded: no parallel downloads, no overlap between iterations.
///
/// # Examples
///
/// ```no_run
/// use clone_provisioner::{BatchProvisioner, Config};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::default();
///     let provisioner = BatchProvisioner::new(config)?;
///
///     let report = provisioner.run().await?;
///     println!("provisioned {} clone(s)", report.provisioned.len());
///     Ok(())
/// }
/// ```
pub struct BatchProvisioner {
    config: Config,
    downloader: Arc<dyn Downloader>,
    extractor: Arc<dyn ArchiveExtractor>,
    event_tx: broadcast::Sender<Event>,
}

impl BatchProvisioner {
    /// Create a provisioner with the default capabilities
    ///
    /// The downloader is `megatools` at the configured path, or discovered
    /// from PATH when `downloader_path` is unset; extraction dispatches on
    /// the archive format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid or no
    /// downloader binary can be found.
    pub fn new(config: Config) -> Result<Self> {
        let downloader = match &config.downloader_path {
            Some(path) => MegatoolsDownloader::new(path.clone()),
            None => MegatoolsDownloader::from_path().ok_or_else(|| Error::Config {
                message: "megatools not found in PATH and no downloader_path configured"
                    .to_string(),
                key: Some("downloader_path".to_string()),
            })?,
        };

        Self::with_capabilities(
            config,
            Arc::new(downloader),
            Arc::new(FormatDispatchExtractor),
        )
    }

    /// Create a provisioner with injected downloader and extractor capabilities
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn with_capabilities(
        config: Config,
        downloader: Arc<dyn Downloader>,
        extractor: Arc<dyn ArchiveExtractor>,
    ) -> Result<Self> {
        config.validate()?;
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            config,
            downloader,
            extractor,
            event_tx,
        })
    }

    /// Subscribe to progress events
    ///
    /// Events are informational; a lagging or dropped receiver does not
    /// affect the run.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// The configuration this provisioner was built with
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Process every link in the list, resuming past ledgered clones
    ///
    /// On full success the ledger file and the temporary output directory are
    /// deleted, leaving a clean slate for a future run. On the first error
    /// the run aborts with both left intact so a subsequent invocation
    /// resumes from the first unfinished link.
    ///
    /// # Errors
    ///
    /// Returns the first per-link error (downloader failure, missing archive,
    /// extraction failure, bad payload layout, filesystem error, ledger write
    /// failure) or a finalization error.
    pub async fn run(&self) -> Result<RunReport> {
        let links = read_link_list(&self.config.links_file)?;
        let mut ledger = Ledger::load(&self.config.ledger_file).await?;

        tokio::fs::create_dir_all(&self.config.temp_dir).await?;
        tokio::fs::create_dir_all(&self.config.clone_root).await?;

        info!(
            links = links.len(),
            already_completed = ledger.len(),
            downloader = self.downloader.name(),
            "starting provisioning run"
        );

        let mut report = RunReport::default();

        for (index, link) in links.iter().enumerate() {
            let name = clone_name(&self.config.clone_base_name, index);

            if ledger.contains(&name) {
                info!(clone = %name, "skipping already-completed clone");
                self.event_tx.send(Event::Skipped { clone: name.clone() }).ok();
                report.skipped.push(name);
                continue;
            }

            let outcome = self.provision_link(index, link, &name, &mut ledger).await;

            // Temporary artifacts never outlive the iteration, success or not
            self.cleanup_iteration(index).await;

            if let Err(e) = outcome {
                error!(
                    clone = %name,
                    link = %link,
                    error = %e,
                    "run aborted; ledger preserved for resume"
                );
                self.event_tx
                    .send(Event::RunAborted {
                        clone: name,
                        error: e.to_string(),
                    })
                    .ok();
                return Err(e);
            }

            report.provisioned.push(name);
        }

        self.finalize(&ledger).await?;

        info!(
            provisioned = report.provisioned.len(),
            skipped = report.skipped.len(),
            "provisioning run complete"
        );
        self.event_tx
            .send(Event::RunComplete {
                provisioned: report.provisioned.len(),
                skipped: report.skipped.len(),
            })
            .ok();

        Ok(report)
    }

    /// Execute the per-link pipeline for one not-yet-completed clone
    async fn provision_link(
        &self,
        index: usize,
        link: &str,
        name: &str,
        ledger: &mut Ledger,
    ) -> Result<()> {
        debug!(clone = %name, link = %link, stage = %Stage::Download, "provisioning clone");
        self.event_tx
            .send(Event::Downloading {
                clone: name.to_string(),
                link: link.to_string(),
            })
            .ok();

        self.downloader.download(link, &self.config.temp_dir).await?;

        debug!(clone = %name, stage = %Stage::Locate, "locating downloaded archive");
        let archives = find_archives(&self.config.temp_dir)?;
        let archive = archives
            .first()
            .cloned()
            .ok_or_else(|| ProvisionError::ArchiveNotFound {
                dir: self.config.temp_dir.clone(),
                link: link.to_string(),
            })?;
        if archives.len() > 1 {
            warn!(
                count = archives.len(),
                chosen = ?archive,
                "multiple archives in temp directory, using first in sorted order"
            );
        }

        debug!(clone = %name, ?archive, stage = %Stage::Extract, "extracting archive");
        self.event_tx
            .send(Event::Extracting {
                clone: name.to_string(),
                archive: archive.clone(),
            })
            .ok();
        let extract_dir = self.extraction_dir(index);
        self.extractor.extract(&archive, &extract_dir).await?;

        debug!(clone = %name, stage = %Stage::Validate, "validating extracted payload");
        let payload = locate_payload(&extract_dir)?;

        let clone_path = self.config.clone_root.join(name);
        if clone_path.exists() {
            // A stale directory from a prior partial run is an operator problem,
            // never a silent merge target
            return Err(ProvisionError::CloneCollision { path: clone_path }.into());
        }

        debug!(clone = %name, ?clone_path, stage = %Stage::CloneTemplate, "copying template");
        copy_dir_recursive(&self.config.template_dir, &clone_path).await?;

        debug!(clone = %name, stage = %Stage::MergeCredentials, "merging credential artifacts");
        copy_dir_recursive(&payload.tdata_dir, &clone_path.join(TDATA_DIR)).await?;
        tokio::fs::copy(&payload.two_fa_file, clone_path.join(TWO_FA_FILE)).await?;

        debug!(clone = %name, stage = %Stage::RecordProgress, "recording progress");
        ledger.record(name).await?;

        info!(clone = %name, path = ?clone_path, "clone provisioned");
        self.event_tx
            .send(Event::Provisioned {
                clone: name.to_string(),
                path: clone_path,
            })
            .ok();

        Ok(())
    }

    /// Best-effort removal of per-iteration temporary artifacts
    ///
    /// Runs unconditionally after each iteration, success or failure.
    /// Failures here are logged and never abort the run; ledger correctness
    /// does not depend on cleanup.
    async fn cleanup_iteration(&self, index: usize) {
        debug!(index, stage = %Stage::Cleanup, "cleaning up iteration artifacts");

        match find_archives(&self.config.temp_dir) {
            Ok(archives) => {
                for archive in archives {
                    if let Err(e) = tokio::fs::remove_file(&archive).await {
                        warn!(?archive, error = %e, "failed to delete downloaded archive");
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to scan temp directory during cleanup");
            }
        }

        let extract_dir = self.extraction_dir(index);
        match tokio::fs::remove_dir_all(&extract_dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(?extract_dir, error = %e, "failed to delete extraction directory");
            }
        }
    }

    /// Run-level finalization after every link completed
    async fn finalize(&self, ledger: &Ledger) -> Result<()> {
        ledger.remove().await?;

        match tokio::fs::remove_dir_all(&self.config.temp_dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        debug!("removed ledger and temporary output directory");
        Ok(())
    }

    /// Per-iteration extraction directory inside the temp directory
    fn extraction_dir(&self, index: usize) -> PathBuf {
        self.config.temp_dir.join(format!("extracted_{}", index + 1))
    }
}
