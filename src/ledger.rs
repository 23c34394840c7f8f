//! Progress ledger persistence
//!
//! The ledger is a plain-text file with one completed clone name per line.
//! It grows monotonically by append during a run, is read at start to decide
//! the resume point, and is deleted entirely only when every link in the
//! current run completes. A clone name enters the ledger only after its
//! destination directory and both credential artifacts exist on disk.

use crate::error::{ProvisionError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Durable set of completed clone names backed by an append-only file
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    completed: HashSet<String>,
}

impl Ledger {
    /// Load the ledger from disk
    ///
    /// An absent file means no prior progress and yields an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub async fn load(path: &Path) -> Result<Self> {
        let completed = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(
            ?path,
            completed = completed.len(),
            "loaded progress ledger"
        );

        Ok(Self {
            path: path.to_path_buf(),
            completed,
        })
    }

    /// Whether a clone name is already recorded as completed
    #[must_use]
    pub fn contains(&self, clone: &str) -> bool {
        self.completed.contains(clone)
    }

    /// Number of completed clones recorded so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.completed.len()
    }

    /// Whether the ledger records no completed clones
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    /// Append a completed clone name and flush it to disk
    ///
    /// The write is followed by an fsync so a crash immediately after this
    /// call does not lose the record.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::LedgerWriteFailed`] if the append cannot be
    /// made durable.
    pub async fn record(&mut self, clone: &str) -> Result<()> {
        let write = async {
            let mut file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .await?;
            file.write_all(format!("{}\n", clone).as_bytes()).await?;
            file.flush().await?;
            file.sync_all().await?;
            Ok::<(), std::io::Error>(())
        };

        write.await.map_err(|e| ProvisionError::LedgerWriteFailed {
            clone: clone.to_string(),
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        self.completed.insert(clone.to_string());
        info!(clone = %clone, "recorded completed clone in ledger");
        Ok(())
    }

    /// Delete the ledger file after a fully successful run
    ///
    /// Deleting an already-absent file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub async fn remove(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                info!(path = ?self.path, "removed progress ledger");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Path of the backing ledger file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
