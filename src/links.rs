//! Link list reading and clone name derivation

use crate::error::Result;
use std::path::Path;

/// Read the link list from a file
///
/// One source link per line; blank lines and surrounding whitespace are
/// discarded. The list is read once at run start and is immutable for the
/// duration of the run.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_link_list(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Derive the clone name for a link's position in the list
///
/// The first link (index 0) uses the base name unchanged; every subsequent
/// link appends its 1-based ordinal, starting at 2. The name doubles as the
/// ledger key and the destination directory name.
///
/// # Examples
///
/// ```
/// use clone_provisioner::links::clone_name;
///
/// assert_eq!(clone_name("Telegram", 0), "Telegram");
/// assert_eq!(clone_name("Telegram", 1), "Telegram2");
/// assert_eq!(clone_name("Telegram", 2), "Telegram3");
/// ```
#[must_use]
pub fn clone_name(base: &str, index: usize) -> String {
    if index == 0 {
        base.to_string()
    } else {
        format!("{}{}", base, index + 1)
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn read_link_list_skips_blank_lines_and_trims() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("links.txt");
        std::fs::write(
            &path,
            "https://example.test/a\n\n  https://example.test/b  \n   \nhttps://example.test/c\n",
        )
        .unwrap();

        let links = read_link_list(&path).unwrap();
        assert_eq!(
            links,
            vec![
                "https://example.test/a",
                "https://example.test/b",
                "https://example.test/c",
            ]
        );
    }

    #[test]
    fn read_link_list_empty_file_yields_no_links() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("links.txt");
        std::fs::write(&path, "").unwrap();

        assert!(read_link_list(&path).unwrap().is_empty());
    }

    #[test]
    fn read_link_list_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(read_link_list(&dir.path().join("absent.txt")).is_err());
    }

    #[test]
    fn first_clone_uses_bare_base_name() {
        assert_eq!(clone_name("Telegram", 0), "Telegram");
    }

    #[test]
    fn subsequent_clones_start_numbering_at_two() {
        assert_eq!(clone_name("Telegram", 1), "Telegram2");
        assert_eq!(clone_name("Telegram", 9), "Telegram10");
    }
}
