//! Workspace (file explorer) model.
//!
//! A workspace is a root directory plus a snapshot tree of its files. The
//! tree is rebuilt on `refresh` rather than patched incrementally; create
//! and delete operations refresh it themselves. An optional notify-based
//! watcher reports external changes so the owner can decide when to
//! refresh.

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use crate::{CoreError, CoreResult};

/// Directory entries hidden from the tree regardless of configuration.
const HIDDEN_PREFIX: char = '.';

/// One file or directory in the workspace tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    /// Sorted children: directories first, then files, each alphabetical
    pub children: Vec<FileNode>,
}

impl FileNode {
    /// Builds the tree under `path`, skipping dot-entries and the excluded
    /// directory names.
    fn from_path(path: &Path, exclude_dirs: &[String]) -> CoreResult<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("?")
            .to_string();
        let is_dir = path.is_dir();

        let mut children = Vec::new();
        if is_dir {
            for entry in std::fs::read_dir(path)? {
                let entry = entry?;
                let child_name = entry.file_name().to_string_lossy().to_string();
                if child_name.starts_with(HIDDEN_PREFIX) {
                    continue;
                }
                if entry.path().is_dir() && exclude_dirs.iter().any(|d| d == &child_name) {
                    continue;
                }
                children.push(Self::from_path(&entry.path(), exclude_dirs)?);
            }
            children.sort_by(|a, b| {
                b.is_dir
                    .cmp(&a.is_dir)
                    .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            });
        }

        Ok(Self {
            name,
            path: path.to_path_buf(),
            is_dir,
            children,
        })
    }

    /// Depth-first iteration over this node and everything below it.
    pub fn walk(&self) -> Vec<&FileNode> {
        let mut nodes = vec![self];
        for child in &self.children {
            nodes.extend(child.walk());
        }
        nodes
    }

    /// Total number of files (not directories) in the subtree.
    pub fn file_count(&self) -> usize {
        self.walk().iter().filter(|n| !n.is_dir).count()
    }
}

/// External change reported by the file watcher.
#[derive(Debug, Clone)]
pub enum FileChange {
    Created(PathBuf),
    Modified(PathBuf),
    Deleted(PathBuf),
}

/// A project folder opened in the editor.
pub struct Workspace {
    root: PathBuf,
    name: String,
    tree: FileNode,
    exclude_dirs: Vec<String>,
    watcher: Option<RecommendedWatcher>,
}

impl Workspace {
    /// Opens a workspace rooted at `path`.
    pub fn open(path: impl AsRef<Path>, exclude_dirs: Vec<String>) -> CoreResult<Self> {
        let root = path.as_ref().canonicalize()?;
        if !root.is_dir() {
            return Err(CoreError::FileNotFound(root.display().to_string()));
        }

        let name = root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("workspace")
            .to_string();
        let tree = FileNode::from_path(&root, &exclude_dirs)?;

        tracing::info!(root = %root.display(), files = tree.file_count(), "opened workspace");

        Ok(Self {
            root,
            name,
            tree,
            exclude_dirs,
            watcher: None,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tree(&self) -> &FileNode {
        &self.tree
    }

    /// Rebuilds the tree from disk.
    pub fn refresh(&mut self) -> CoreResult<()> {
        self.tree = FileNode::from_path(&self.root, &self.exclude_dirs)?;
        Ok(())
    }

    /// Resolves a path against the workspace root.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Returns the path relative to the root, when inside the workspace.
    pub fn relative(&self, path: impl AsRef<Path>) -> Option<PathBuf> {
        path.as_ref()
            .strip_prefix(&self.root)
            .ok()
            .map(PathBuf::from)
    }

    /// Checks whether a path lies within the workspace.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().starts_with(&self.root)
    }

    // ==================== CRUD ====================

    /// Creates an empty file under `parent` (the root when `None`).
    /// Fails if the target already exists.
    pub fn create_file(&mut self, parent: Option<&Path>, name: &str) -> CoreResult<PathBuf> {
        let path = self.child_path(parent, name)?;
        if path.exists() {
            return Err(CoreError::AlreadyExists(path.display().to_string()));
        }
        std::fs::write(&path, "")?;
        self.refresh()?;
        Ok(path)
    }

    /// Creates a directory under `parent` (the root when `None`).
    pub fn create_dir(&mut self, parent: Option<&Path>, name: &str) -> CoreResult<PathBuf> {
        let path = self.child_path(parent, name)?;
        if path.exists() {
            return Err(CoreError::AlreadyExists(path.display().to_string()));
        }
        std::fs::create_dir(&path)?;
        self.refresh()?;
        Ok(path)
    }

    /// Deletes a file or directory (recursively) inside the workspace.
    pub fn delete(&mut self, path: &Path) -> CoreResult<()> {
        let path = self.resolve(path);
        if !self.contains(&path) {
            return Err(CoreError::OutsideWorkspace(path.display().to_string()));
        }
        if !path.exists() {
            return Err(CoreError::FileNotFound(path.display().to_string()));
        }

        if path.is_dir() {
            std::fs::remove_dir_all(&path)?;
        } else {
            std::fs::remove_file(&path)?;
        }
        self.refresh()?;
        Ok(())
    }

    fn child_path(&self, parent: Option<&Path>, name: &str) -> CoreResult<PathBuf> {
        let dir = match parent {
            Some(parent) => self.resolve(parent),
            None => self.root.clone(),
        };
        if !self.contains(&dir) {
            return Err(CoreError::OutsideWorkspace(dir.display().to_string()));
        }
        Ok(dir.join(name))
    }

    // ==================== Watching ====================

    /// Starts watching the workspace for external changes.
    pub fn start_watching(&mut self) -> CoreResult<mpsc::Receiver<FileChange>> {
        let (tx, rx) = mpsc::channel(100);

        let mut watcher =
            notify::recommended_watcher(move |result: Result<Event, notify::Error>| {
                let Ok(event) = result else { return };
                for path in event.paths {
                    let change = match event.kind {
                        notify::EventKind::Create(_) => FileChange::Created(path),
                        notify::EventKind::Modify(_) => FileChange::Modified(path),
                        notify::EventKind::Remove(_) => FileChange::Deleted(path),
                        _ => continue,
                    };
                    let _ = tx.blocking_send(change);
                }
            })?;
        watcher.watch(&self.root, RecursiveMode::Recursive)?;

        self.watcher = Some(watcher);
        Ok(rx)
    }

    /// Stops the file watcher, if one is running.
    pub fn stop_watching(&mut self) {
        self.watcher = None;
    }
}
