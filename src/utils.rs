//! Utility functions for file operations

use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Recursively copy a directory tree
///
/// The destination directory is created by this call and must not already
/// exist; an existing destination surfaces the underlying
/// `AlreadyExists` I/O error rather than silently merging into it.
/// Symlinks are followed (file contents are copied).
///
/// # Arguments
///
/// * `src` - Source directory (must exist)
/// * `dest` - Destination directory (must not exist)
///
/// # Errors
///
/// Returns an error on any filesystem failure, including a pre-existing
/// destination or unreadable source entries.
pub async fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<()> {
    tokio::fs::create_dir(dest).await?;
    copy_dir_contents(src, dest).await?;
    debug!(?src, ?dest, "copied directory tree");
    Ok(())
}

/// Copy the entries of `src` into the existing directory `dest`
fn copy_dir_contents<'a>(
    src: &'a Path,
    dest: &'a Path,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<()>> + Send + 'a>> {
    Box::pin(async move {
        let mut entries = tokio::fs::read_dir(src).await?;

        while let Some(entry) = entries.next_entry().await? {
            let entry_path = entry.path();
            let target: PathBuf = dest.join(entry.file_name());
            let file_type = entry.file_type().await?;

            if file_type.is_dir() {
                tokio::fs::create_dir(&target).await?;
                copy_dir_contents(&entry_path, &target).await?;
            } else {
                tokio::fs::copy(&entry_path, &target).await?;
            }
        }

        Ok(())
    })
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn build_tree(root: &Path) {
        std::fs::create_dir_all(root.join("sub/deeper")).unwrap();
        std::fs::write(root.join("marker.txt"), b"marker").unwrap();
        std::fs::write(root.join("sub/a.bin"), b"aaa").unwrap();
        std::fs::write(root.join("sub/deeper/b.bin"), b"bbb").unwrap();
    }

    #[tokio::test]
    async fn copies_nested_tree_verbatim() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("template");
        let dest = dir.path().join("clone");
        std::fs::create_dir(&src).unwrap();
        build_tree(&src);

        copy_dir_recursive(&src, &dest).await.unwrap();

        assert_eq!(std::fs::read(dest.join("marker.txt")).unwrap(), b"marker");
        assert_eq!(std::fs::read(dest.join("sub/a.bin")).unwrap(), b"aaa");
        assert_eq!(
            std::fs::read(dest.join("sub/deeper/b.bin")).unwrap(),
            b"bbb"
        );
    }

    #[tokio::test]
    async fn existing_destination_is_an_error() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("template");
        let dest = dir.path().join("clone");
        std::fs::create_dir(&src).unwrap();
        std::fs::create_dir(&dest).unwrap();

        let result = copy_dir_recursive(&src, &dest).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn missing_source_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = copy_dir_recursive(
            &dir.path().join("absent"),
            &dir.path().join("clone"),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn empty_source_yields_empty_destination() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("template");
        let dest = dir.path().join("clone");
        std::fs::create_dir(&src).unwrap();

        copy_dir_recursive(&src, &dest).await.unwrap();

        assert!(dest.is_dir());
        assert_eq!(std::fs::read_dir(&dest).unwrap().count(), 0);
    }
}
