//! Recursive discovery of document files under a root directory.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::ConfigError;

/// Checks that `root` exists and is a directory.
///
/// # Errors
///
/// [`ConfigError::MissingRoot`] or [`ConfigError::NotADirectory`].
pub fn validate_root(root: &Path) -> Result<(), ConfigError> {
    if !root.exists() {
        return Err(ConfigError::MissingRoot {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(ConfigError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    Ok(())
}

/// Lists every file below `root` whose extension is in `extensions`.
///
/// Extensions compare case-insensitively and may be given with or without a
/// leading dot. Entries that cannot be read are logged and skipped. Results
/// are sorted so runs are deterministic.
///
/// # Errors
///
/// Returns a [`ConfigError`] if `root` is missing or not a directory.
pub fn discover_documents(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, ConfigError> {
    validate_root(root)?;

    let wanted: Vec<String> = extensions
        .iter()
        .map(|ext| ext.trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect();

    let mut documents = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| wanted.iter().any(|w| w.eq_ignore_ascii_case(ext)));
        if matches {
            documents.push(entry.into_path());
        }
    }

    documents.sort();
    debug!(root = %root.display(), count = documents.len(), "discovered documents");
    Ok(documents)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn exts(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_discovers_nested_markdown_files_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir_all(root.join("b/deeper")).unwrap();
        std::fs::write(root.join("z.md"), "").unwrap();
        std::fs::write(root.join("b/deeper/a.MD"), "").unwrap();
        std::fs::write(root.join("b/notes.txt"), "").unwrap();

        let found = discover_documents(root, &exts(&["md"])).unwrap();

        assert_eq!(found, vec![root.join("b/deeper/a.MD"), root.join("z.md")]);
    }

    #[test]
    fn test_extensions_accept_leading_dot() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("page.markdown"), "").unwrap();

        let found = discover_documents(temp_dir.path(), &exts(&[".markdown"])).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_missing_root_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("absent");
        assert!(matches!(
            discover_documents(&missing, &exts(&["md"])),
            Err(ConfigError::MissingRoot { .. })
        ));
    }

    #[test]
    fn test_file_root_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("doc.md");
        std::fs::write(&file, "").unwrap();
        assert!(matches!(
            validate_root(&file),
            Err(ConfigError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_empty_directory_yields_nothing() {
        let temp_dir = TempDir::new().unwrap();
        assert!(discover_documents(temp_dir.path(), &exts(&["md"])).unwrap().is_empty());
    }
}
