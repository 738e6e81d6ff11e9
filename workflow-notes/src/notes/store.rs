//! Document store: the host capability the workflows persist notes through.
//!
//! `VaultStore` maps vault paths onto a directory on disk. `MemoryStore`
//! keeps everything in a map and is what the workflow tests run against.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io;
use std::path::PathBuf;

use super::file_ops;
use crate::error::{StoreError, StoreResult};

/// A note file, identified by its vault path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Note {
    pub path: String,
}

impl Note {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn name(&self) -> &str {
        file_ops::file_name(&self.path)
    }

    /// Link text used inside `[[...]]`
    pub fn link_text(&self) -> &str {
        file_ops::file_stem(&self.path)
    }
}

/// What lives at a vault path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    File(Note),
    Folder(String),
    Missing,
}

/// Direct children of a folder, names only
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Children {
    pub files: Vec<String>,
    pub folders: Vec<String>,
}

/// Handle to a note already open in an editor view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    pub path: String,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn entry(&self, path: &str) -> Entry;

    async fn exists(&self, path: &str) -> bool {
        !matches!(self.entry(path).await, Entry::Missing)
    }

    /// Create a folder and any missing parents
    async fn create_folder(&self, path: &str) -> StoreResult<()>;

    /// Create a new note; fails if anything exists at `path`
    async fn create(&self, path: &str, content: &str) -> StoreResult<Note>;

    async fn read(&self, path: &str) -> StoreResult<String>;

    /// Replace the content of an existing note
    async fn modify(&self, path: &str, content: &str) -> StoreResult<()>;

    async fn list_children(&self, folder: &str) -> StoreResult<Children>;

    /// Best-effort focus of the note in an editor
    async fn open_in_editor(&self, note: &Note) -> StoreResult<()>;

    async fn find_open_document(&self, path: &str) -> Option<DocumentHandle>;
}

/// Make sure `path` is a folder, creating it if missing
pub async fn ensure_folder(store: &dyn DocumentStore, path: &str) -> StoreResult<()> {
    match store.entry(path).await {
        Entry::Folder(_) => Ok(()),
        Entry::Missing => {
            log::debug!("[STORE] Creating folder {}", path);
            store.create_folder(path).await
        }
        Entry::File(_) => Err(StoreError::NotAFolder(path.to_string())),
    }
}

/// Notes vault on the local filesystem
pub struct VaultStore {
    root: PathBuf,
    editor_command: Option<String>,
    open_documents: Mutex<HashSet<String>>,
}

impl VaultStore {
    pub fn new(root: PathBuf, editor_command: Option<String>) -> Self {
        Self {
            root,
            editor_command,
            open_documents: Mutex::new(HashSet::new()),
        }
    }

    fn resolve(&self, path: &str) -> StoreResult<PathBuf> {
        file_ops::resolve_in_vault(&self.root, path).ok_or_else(|| {
            StoreError::io(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "path escapes the vault"),
            )
        })
    }
}

#[async_trait]
impl DocumentStore for VaultStore {
    async fn entry(&self, path: &str) -> Entry {
        let Ok(full) = self.resolve(path) else {
            return Entry::Missing;
        };
        match tokio::fs::metadata(&full).await {
            Ok(meta) if meta.is_dir() => Entry::Folder(path.to_string()),
            Ok(_) => Entry::File(Note::new(path)),
            Err(_) => Entry::Missing,
        }
    }

    async fn create_folder(&self, path: &str) -> StoreResult<()> {
        let full = self.resolve(path)?;
        tokio::fs::create_dir_all(&full)
            .await
            .map_err(|e| StoreError::io(path, e))
    }

    async fn create(&self, path: &str, content: &str) -> StoreResult<Note> {
        let full = self.resolve(path)?;
        match file_ops::write_new_note(&full, content).await {
            Ok(()) => Ok(Note::new(path)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                Err(StoreError::AlreadyExists(path.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::MissingParent(path.to_string()))
            }
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    async fn read(&self, path: &str) -> StoreResult<String> {
        let full = self.resolve(path)?;
        match tokio::fs::read_to_string(&full).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(path.to_string()))
            }
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    async fn modify(&self, path: &str, content: &str) -> StoreResult<()> {
        let full = self.resolve(path)?;
        match file_ops::overwrite_note(&full, content).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(path.to_string()))
            }
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    async fn list_children(&self, folder: &str) -> StoreResult<Children> {
        let full = self.resolve(folder)?;
        let entries = file_ops::list_dir(&full).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(folder.to_string()),
            _ => StoreError::io(folder, e),
        })?;

        let mut children = Children::default();
        for (name, is_dir) in entries {
            if is_dir {
                children.folders.push(name);
            } else {
                children.files.push(name);
            }
        }
        Ok(children)
    }

    async fn open_in_editor(&self, note: &Note) -> StoreResult<()> {
        self.open_documents.lock().insert(note.path.clone());

        let Some(command) = &self.editor_command else {
            log::info!("[STORE] Note ready: {}", note.path);
            return Ok(());
        };

        let full = self.resolve(&note.path)?;
        match tokio::process::Command::new(command).arg(&full).spawn() {
            Ok(_child) => log::info!("[STORE] Opened {} with {}", note.path, command),
            // Focus is best effort; failing to launch the editor is not an error
            Err(e) => log::warn!("[STORE] Failed to launch editor {}: {}", command, e),
        }
        Ok(())
    }

    async fn find_open_document(&self, path: &str) -> Option<DocumentHandle> {
        self.open_documents
            .lock()
            .contains(path)
            .then(|| DocumentHandle {
                path: path.to_string(),
            })
    }
}

#[derive(Default)]
struct MemoryState {
    files: BTreeMap<String, String>,
    folders: BTreeSet<String>,
    open: HashSet<String>,
}

/// In-memory store
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

fn normalize(path: &str) -> String {
    path.trim_matches('/').to_string()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a note, creating its parent folders
    pub fn insert_file(&self, path: &str, content: &str) {
        let path = normalize(path);
        let mut state = self.state.lock();
        add_folder_chain(&mut state.folders, file_ops::parent_path(&path));
        state.files.insert(path, content.to_string());
    }

    /// Snapshot of a note's content
    pub fn content(&self, path: &str) -> Option<String> {
        self.state.lock().files.get(&normalize(path)).cloned()
    }

    pub fn file_paths(&self) -> Vec<String> {
        self.state.lock().files.keys().cloned().collect()
    }

    pub fn is_open(&self, path: &str) -> bool {
        self.state.lock().open.contains(&normalize(path))
    }
}

fn add_folder_chain(folders: &mut BTreeSet<String>, folder: &str) {
    let mut current = String::new();
    for part in folder.split('/').filter(|p| !p.is_empty()) {
        current = file_ops::join_path(&current, part);
        folders.insert(current.clone());
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn entry(&self, path: &str) -> Entry {
        let path = normalize(path);
        let state = self.state.lock();
        if state.files.contains_key(&path) {
            Entry::File(Note::new(path))
        } else if path.is_empty() || state.folders.contains(&path) {
            Entry::Folder(path)
        } else {
            Entry::Missing
        }
    }

    async fn create_folder(&self, path: &str) -> StoreResult<()> {
        let path = normalize(path);
        let mut state = self.state.lock();
        if state.files.contains_key(&path) {
            return Err(StoreError::NotAFolder(path));
        }
        add_folder_chain(&mut state.folders, &path);
        Ok(())
    }

    async fn create(&self, path: &str, content: &str) -> StoreResult<Note> {
        let path = normalize(path);
        let mut state = self.state.lock();
        if state.files.contains_key(&path) || state.folders.contains(&path) {
            return Err(StoreError::AlreadyExists(path));
        }
        let parent = file_ops::parent_path(&path);
        if !parent.is_empty() && !state.folders.contains(parent) {
            return Err(StoreError::MissingParent(path));
        }
        state.files.insert(path.clone(), content.to_string());
        Ok(Note::new(path))
    }

    async fn read(&self, path: &str) -> StoreResult<String> {
        let path = normalize(path);
        let state = self.state.lock();
        match state.files.get(&path) {
            Some(content) => Ok(content.clone()),
            None if state.folders.contains(&path) => Err(StoreError::NotAFile(path)),
            None => Err(StoreError::NotFound(path)),
        }
    }

    async fn modify(&self, path: &str, content: &str) -> StoreResult<()> {
        let path = normalize(path);
        let mut state = self.state.lock();
        match state.files.get_mut(&path) {
            Some(existing) => {
                *existing = content.to_string();
                Ok(())
            }
            None => Err(StoreError::NotFound(path)),
        }
    }

    async fn list_children(&self, folder: &str) -> StoreResult<Children> {
        let folder = normalize(folder);
        let state = self.state.lock();
        if !folder.is_empty() && !state.folders.contains(&folder) {
            return Err(StoreError::NotFound(folder));
        }

        let is_child = |path: &str| file_ops::parent_path(path) == folder;
        Ok(Children {
            files: state
                .files
                .keys()
                .filter(|p| is_child(p))
                .map(|p| file_ops::file_name(p).to_string())
                .collect(),
            folders: state
                .folders
                .iter()
                .filter(|p| is_child(p))
                .map(|p| file_ops::file_name(p).to_string())
                .collect(),
        })
    }

    async fn open_in_editor(&self, note: &Note) -> StoreResult<()> {
        self.state.lock().open.insert(normalize(&note.path));
        Ok(())
    }

    async fn find_open_document(&self, path: &str) -> Option<DocumentHandle> {
        let path = normalize(path);
        self.state
            .lock()
            .open
            .contains(&path)
            .then(|| DocumentHandle { path })
    }
}
