//! # clone-provisioner
//!
//! Resumable batch provisioning of application-state clones from remote
//! archives.
//!
//! For each link in a list, the provisioner invokes an external downloader,
//! extracts the resulting archive, validates that the payload carries a
//! `tdata` credential directory and a `twoFA.txt` file, copies a template
//! directory to a fresh clone, merges the credentials in, and records the
//! clone in a durable progress ledger. The first unrecoverable error aborts
//! the run with the ledger intact, so a fresh invocation resumes from the
//! first unfinished link.
//!
//! ## Design Philosophy
//!
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Explicit configuration** - All paths passed in, no ambient globals
//! - **Injected capabilities** - Downloader and extractor are traits, so
//!   tests substitute stubs
//! - **Fail-fast** - No retries; the ledger is the only resilience mechanism
//!
//! ## Quick Start
//!
//! ```no_run
//! use clone_provisioner::{BatchProvisioner, Config};
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         links_file: PathBuf::from("25acc.txt"),
//!         template_dir: PathBuf::from("Telegram"),
//!         clone_root: PathBuf::from("/srv/clones"),
//!         ..Default::default()
//!     };
//!
//!     let provisioner = BatchProvisioner::new(config)?;
//!
//!     // Subscribe to progress events
//!     let mut events = provisioner.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let report = provisioner.run().await?;
//!     println!("provisioned {} clone(s)", report.provisioned.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// External downloader capability
pub mod downloader;
/// Error types
pub mod error;
/// Archive extraction
pub mod extraction;
/// Progress ledger persistence
pub mod ledger;
/// Link list reading and clone naming
pub mod links;
/// Extracted payload validation
pub mod payload;
/// The batch provisioning pipeline
pub mod provisioner;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use downloader::{Downloader, MegatoolsDownloader};
pub use error::{DownloadError, Error, ProvisionError, Result};
pub use extraction::{ArchiveExtractor, FormatDispatchExtractor};
pub use ledger::Ledger;
pub use payload::CredentialPayload;
pub use provisioner::BatchProvisioner;
pub use types::{ArchiveType, Event, RunReport, Stage, TDATA_DIR, TWO_FA_FILE};
