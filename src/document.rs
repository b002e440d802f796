// ABOUTME: Markdown document I/O and directory traversal
// ABOUTME: Reads and writes whole files and finds every .md file under a root

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Read a document's full text
pub fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Replace a document's full text
pub fn write_document(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Find all markdown documents under `root`, in file-name order.
/// Symlinks to files count; unreadable subdirectories are skipped.
pub fn find_documents(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }

    let mut documents = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(root = %root.display(), "skipping unreadable entry: {}", e);
                continue;
            }
        };
        // `path().is_file()` follows symlinks, `file_type()` does not
        if is_markdown(entry.path()) && entry.path().is_file() {
            documents.push(entry.into_path());
        }
    }

    Ok(documents)
}

fn is_markdown(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "md")
}

/// File name without extension, used as the caption for normalized embeds
pub fn document_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_documents_recurses_and_filters() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sub/deeper")).unwrap();
        fs::write(dir.path().join("b.md"), "").unwrap();
        fs::write(dir.path().join("a.md"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join("sub/deeper/c.md"), "").unwrap();
        fs::write(dir.path().join("sub/readme.markdown"), "").unwrap();

        let found = find_documents(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from("a.md"),
                PathBuf::from("b.md"),
                PathBuf::from("sub/deeper/c.md"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_find_documents_follows_symlinked_files() {
        let dir = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let target = elsewhere.path().join("real.md");
        fs::write(&target, "![[a.png]]").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("linked.md")).unwrap();
        // Dangling links are not documents
        std::os::unix::fs::symlink(elsewhere.path().join("gone.md"), dir.path().join("broken.md"))
            .unwrap();

        let found = find_documents(dir.path()).unwrap();
        assert_eq!(found, vec![dir.path().join("linked.md")]);
    }

    #[test]
    fn test_find_documents_missing_root_is_error() {
        let dir = TempDir::new().unwrap();
        let err = find_documents(&dir.path().join("nope")).unwrap_err();
        assert!(err.to_string().contains("Not a directory"));
    }

    #[test]
    fn test_document_stem() {
        assert_eq!(document_stem(Path::new("/notes/my note.md")), "my note");
        assert_eq!(document_stem(Path::new("note.md")), "note");
    }

    #[test]
    fn test_read_missing_document_is_error() {
        let dir = TempDir::new().unwrap();
        let err = read_document(&dir.path().join("gone.md")).unwrap_err();
        assert!(err.to_string().contains("gone.md"));
    }
}
