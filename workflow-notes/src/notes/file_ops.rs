//! Path and file helpers for notes.
//!
//! Note paths are vault-relative strings with `/` separators. The async
//! helpers at the bottom do the actual disk I/O for the vault store.

use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Join a folder and a child name into a vault path
pub fn join_path(folder: &str, name: &str) -> String {
    let folder = folder.trim_matches('/');
    let name = name.trim_start_matches('/');
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", folder, name)
    }
}

/// Last path component
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// File name without the `.md` extension
pub fn file_stem(path: &str) -> &str {
    let name = file_name(path);
    name.strip_suffix(".md").unwrap_or(name)
}

/// Parent folder path ("" for top-level entries)
pub fn parent_path(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit_once('/')
        .map(|(parent, _)| parent)
        .unwrap_or("")
}

/// Whether `path` lies inside `folder` (component-wise, not a bare prefix match)
pub fn is_within(path: &str, folder: &str) -> bool {
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        return true;
    }
    path.strip_prefix(folder)
        .map(|rest| rest.starts_with('/'))
        .unwrap_or(false)
}

/// `[[target]]`
pub fn wikilink(target: &str) -> String {
    format!("[[{}]]", target)
}

/// `"[[target]]"`, safe as a YAML scalar
pub fn quoted_wikilink(target: &str) -> String {
    format!("\"{}\"", wikilink(target))
}

/// Resolve a vault path under `root`, refusing absolute paths and `..`
pub fn resolve_in_vault(root: &Path, rel_path: &str) -> Option<PathBuf> {
    let rel = Path::new(rel_path.trim_start_matches('/'));
    let mut resolved = root.to_path_buf();
    for component in rel.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(resolved)
}

/// Write a new note, failing if the file already exists
pub async fn write_new_note(path: &Path, content: &str) -> io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(content.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

/// Overwrite an existing note
pub async fn overwrite_note(path: &Path, content: &str) -> io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .await?;
    file.write_all(content.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

/// Direct children of a folder as (name, is_dir), hidden entries skipped
pub async fn list_dir(dir: &Path) -> io::Result<Vec<(String, bool)>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut children = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().to_string();
        // Skip hidden files/dirs (like .workflow/)
        if name.starts_with('.') {
            continue;
        }
        let is_dir = entry.file_type().await?.is_dir();
        children.push((name, is_dir));
    }
    children.sort();
    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_path_helpers() {
        assert_eq!(join_path("workFlow/daily/", "a.md"), "workFlow/daily/a.md");
        assert_eq!(join_path("", "a.md"), "a.md");
        assert_eq!(file_name("a/b/c.md"), "c.md");
        assert_eq!(file_stem("a/b/2024-03-12_Tuesday.md"), "2024-03-12_Tuesday");
        assert_eq!(file_stem("plain"), "plain");
        assert_eq!(parent_path("a/b/c.md"), "a/b");
        assert_eq!(parent_path("c.md"), "");
    }

    #[test]
    fn test_is_within() {
        assert!(is_within("workFlow/daily/x.md", "workFlow/daily"));
        assert!(is_within("workFlow/daily/x.md", "workFlow/daily/"));
        assert!(!is_within("workFlow/daily-archive/x.md", "workFlow/daily"));
        assert!(!is_within("workFlow/daily", "workFlow/daily"));
    }

    #[test]
    fn test_links() {
        assert_eq!(wikilink("Atlas-index"), "[[Atlas-index]]");
        assert_eq!(quoted_wikilink("Atlas-index"), "\"[[Atlas-index]]\"");
    }

    #[test]
    fn test_resolve_in_vault_rejects_escapes() {
        let root = Path::new("/vault");
        assert_eq!(
            resolve_in_vault(root, "a/./b.md"),
            Some(PathBuf::from("/vault/a/b.md"))
        );
        assert_eq!(resolve_in_vault(root, "../etc/passwd"), None);
        assert_eq!(
            resolve_in_vault(root, "/a.md"),
            Some(PathBuf::from("/vault/a.md"))
        );
    }

    #[tokio::test]
    async fn test_write_new_note_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("n.md");
        write_new_note(&path, "one").await.unwrap();
        let err = write_new_note(&path, "two").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        overwrite_note(&path, "three").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "three");
    }

    #[tokio::test]
    async fn test_list_dir_skips_hidden() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.md"), "").unwrap();
        std::fs::create_dir(dir.path().join("a")).unwrap();
        std::fs::create_dir(dir.path().join(".workflow")).unwrap();
        let children = list_dir(dir.path()).await.unwrap();
        assert_eq!(
            children,
            vec![("a".to_string(), true), ("b.md".to_string(), false)]
        );
    }
}
