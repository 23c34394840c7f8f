//! Minimal provisioning run driven by a JSON config file.
//!
//! Usage: cargo run --example provision -- config.json

use clone_provisioner::{BatchProvisioner, Config, Event};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(Path::new(&path))?,
        None => Config::default(),
    };

    let provisioner = BatchProvisioner::new(config)?;

    // Print progress as it happens
    let mut events = provisioner.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                Event::Skipped { clone } => println!("skipped {clone} (already completed)"),
                Event::Downloading { clone, link } => println!("downloading {link} for {clone}"),
                Event::Extracting { clone, archive } => {
                    println!("extracting {} for {clone}", archive.display())
                }
                Event::Provisioned { clone, path } => {
                    println!("provisioned {clone} at {}", path.display())
                }
                Event::RunComplete {
                    provisioned,
                    skipped,
                } => println!("run complete: {provisioned} provisioned, {skipped} skipped"),
                Event::RunAborted { clone, error } => {
                    println!("run aborted at {clone}: {error}")
                }
            }
        }
    });

    let report = provisioner.run().await?;
    println!(
        "done: {} clone(s) provisioned, {} skipped",
        report.provisioned.len(),
        report.skipped.len()
    );
    Ok(())
}
