//! Collaborator seam: the bookmark store and the persistent key-value
//! store the popup talks to, plus local JSON-file-backed bindings.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::info;
use serde_json::Value;
use uuid::Uuid;

use crate::error::HostError;
use crate::models::BookmarkNode;

/// Hierarchical bookmark store. Every call is atomic and non-retried.
pub trait BookmarkHost {
    fn get_tree(&self) -> Result<Vec<BookmarkNode>, HostError>;
    fn get_children(&self, id: &str) -> Result<Vec<BookmarkNode>, HostError>;
    fn get(&self, id: &str) -> Result<Option<BookmarkNode>, HostError>;
    fn create(
        &self,
        parent_id: &str,
        title: &str,
        url: Option<&str>,
    ) -> Result<BookmarkNode, HostError>;
    fn update(&self, id: &str, title: Option<&str>, url: Option<&str>) -> Result<(), HostError>;
    fn remove(&self, id: &str) -> Result<(), HostError>;
    fn move_to(&self, id: &str, parent_id: &str) -> Result<(), HostError>;
    fn search_by_url(&self, url: &str) -> Result<Vec<BookmarkNode>, HostError>;
}

/// Whole-record persistent storage. `read` yields `None` before first
/// initialization; `write` replaces the record in one atomic call.
pub trait StorageHost {
    fn read(&self) -> Result<Option<Value>, HostError>;
    fn write(&self, record: &Value) -> Result<(), HostError>;
    fn clear(&self) -> Result<(), HostError>;
}

/// App storage root under the platform data dir.
pub fn storage_root(app_handle: &tauri::AppHandle) -> Result<PathBuf, HostError> {
    use tauri::Manager;
    let app_data: PathBuf = app_handle
        .path()
        .app_data_dir()
        .map_err(|e| HostError(e.to_string()))?;
    let parent = app_data
        .parent()
        .ok_or_else(|| HostError("No parent for app data dir".into()))?;
    Ok(parent.join("QuickSave"))
}

/// Ensure the storage root exists.
pub fn init_root(root: &Path) -> Result<(), HostError> {
    fs::create_dir_all(root).map_err(|e| HostError(e.to_string()))
}

/// Atomic write: write to temp file then rename.
fn write_json(path: &Path, value: &Value) -> Result<(), HostError> {
    let temp_path = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(value).map_err(|e| HostError(e.to_string()))?;
    let mut f = fs::File::create(&temp_path).map_err(|e| HostError(e.to_string()))?;
    f.write_all(json.as_bytes())
        .map_err(|e| HostError(e.to_string()))?;
    f.sync_all().map_err(|e| HostError(e.to_string()))?;
    drop(f);
    fs::rename(&temp_path, path).map_err(|e| HostError(e.to_string()))
}

// ── Bookmark tree on disk ───────────────────────────────────────────────────

/// Bookmark forest persisted as `bookmarks.json` under the storage root.
pub struct FileBookmarkHost {
    path: PathBuf,
}

impl FileBookmarkHost {
    pub fn new(root: &Path) -> Self {
        Self {
            path: root.join("bookmarks.json"),
        }
    }

    /// First-run forest: a root container holding the two standard folders.
    fn seed_forest() -> Vec<BookmarkNode> {
        let now = Utc::now().timestamp_millis();
        let folder = |id: &str, title: &str| BookmarkNode {
            id: id.to_string(),
            title: title.to_string(),
            parent_id: Some("0".to_string()),
            date_added: now,
            url: None,
            children: Some(vec![]),
        };
        vec![BookmarkNode {
            id: "0".to_string(),
            title: String::new(),
            parent_id: None,
            date_added: now,
            url: None,
            children: Some(vec![folder("1", "Bookmarks Bar"), folder("2", "Other Bookmarks")]),
        }]
    }

    fn load(&self) -> Result<Vec<BookmarkNode>, HostError> {
        if !self.path.exists() {
            return Ok(Self::seed_forest());
        }
        let s = fs::read_to_string(&self.path).map_err(|e| HostError(e.to_string()))?;
        serde_json::from_str(&s).map_err(|e| HostError(e.to_string()))
    }

    fn save(&self, forest: &[BookmarkNode]) -> Result<(), HostError> {
        let value = serde_json::to_value(forest).map_err(|e| HostError(e.to_string()))?;
        write_json(&self.path, &value)
    }
}

fn find_node<'a>(nodes: &'a [BookmarkNode], id: &str) -> Option<&'a BookmarkNode> {
    let mut stack: Vec<&BookmarkNode> = nodes.iter().collect();
    while let Some(node) = stack.pop() {
        if node.id == id {
            return Some(node);
        }
        if let Some(children) = &node.children {
            stack.extend(children.iter());
        }
    }
    None
}

fn find_node_mut<'a>(nodes: &'a mut [BookmarkNode], id: &str) -> Option<&'a mut BookmarkNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(children) = node.children.as_mut() {
            if let Some(found) = find_node_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Detach a node from wherever it sits in the forest.
fn detach_node(nodes: &mut Vec<BookmarkNode>, id: &str) -> Option<BookmarkNode> {
    if let Some(pos) = nodes.iter().position(|n| n.id == id) {
        return Some(nodes.remove(pos));
    }
    for node in nodes {
        if let Some(children) = node.children.as_mut() {
            if let Some(detached) = detach_node(children, id) {
                return Some(detached);
            }
        }
    }
    None
}

fn subtree_contains(node: &BookmarkNode, id: &str) -> bool {
    if node.id == id {
        return true;
    }
    node.children
        .as_deref()
        .map(|children| children.iter().any(|c| subtree_contains(c, id)))
        .unwrap_or(false)
}

impl BookmarkHost for FileBookmarkHost {
    fn get_tree(&self) -> Result<Vec<BookmarkNode>, HostError> {
        self.load()
    }

    fn get_children(&self, id: &str) -> Result<Vec<BookmarkNode>, HostError> {
        let forest = self.load()?;
        let node = find_node(&forest, id).ok_or_else(|| HostError(format!("No node {}", id)))?;
        match &node.children {
            Some(children) => Ok(children.clone()),
            None => Err(HostError(format!("Node {} is not a folder", id))),
        }
    }

    fn get(&self, id: &str) -> Result<Option<BookmarkNode>, HostError> {
        let forest = self.load()?;
        Ok(find_node(&forest, id).cloned())
    }

    fn create(
        &self,
        parent_id: &str,
        title: &str,
        url: Option<&str>,
    ) -> Result<BookmarkNode, HostError> {
        let mut forest = self.load()?;
        let node = BookmarkNode {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            parent_id: Some(parent_id.to_string()),
            date_added: Utc::now().timestamp_millis(),
            url: url.map(String::from),
            children: if url.is_none() { Some(vec![]) } else { None },
        };
        let parent = find_node_mut(&mut forest, parent_id)
            .ok_or_else(|| HostError(format!("No folder {}", parent_id)))?;
        match parent.children.as_mut() {
            Some(children) => children.push(node.clone()),
            None => return Err(HostError(format!("Node {} is not a folder", parent_id))),
        }
        self.save(&forest)?;
        info!("Created node {} under {}", node.id, parent_id);
        Ok(node)
    }

    fn update(&self, id: &str, title: Option<&str>, url: Option<&str>) -> Result<(), HostError> {
        let mut forest = self.load()?;
        let node =
            find_node_mut(&mut forest, id).ok_or_else(|| HostError(format!("No node {}", id)))?;
        if url.is_some() && node.url.is_none() {
            return Err(HostError(format!("Node {} is not a bookmark", id)));
        }
        if let Some(t) = title {
            node.title = t.to_string();
        }
        if let Some(u) = url {
            node.url = Some(u.to_string());
        }
        self.save(&forest)
    }

    fn remove(&self, id: &str) -> Result<(), HostError> {
        let mut forest = self.load()?;
        let node = find_node(&forest, id).ok_or_else(|| HostError(format!("No node {}", id)))?;
        if node
            .children
            .as_deref()
            .map(|c| !c.is_empty())
            .unwrap_or(false)
        {
            return Err(HostError(format!("Folder {} is not empty", id)));
        }
        detach_node(&mut forest, id);
        self.save(&forest)
    }

    fn move_to(&self, id: &str, parent_id: &str) -> Result<(), HostError> {
        let mut forest = self.load()?;
        let node = find_node(&forest, id).ok_or_else(|| HostError(format!("No node {}", id)))?;
        if subtree_contains(node, parent_id) {
            return Err(HostError("Cannot move a folder into itself".into()));
        }
        let parent = find_node(&forest, parent_id)
            .ok_or_else(|| HostError(format!("No folder {}", parent_id)))?;
        if parent.children.is_none() {
            return Err(HostError(format!("Node {} is not a folder", parent_id)));
        }
        let mut detached = detach_node(&mut forest, id)
            .ok_or_else(|| HostError(format!("No node {}", id)))?;
        detached.parent_id = Some(parent_id.to_string());
        // Parent lookup cannot fail here: it is not inside the detached subtree.
        if let Some(parent) = find_node_mut(&mut forest, parent_id) {
            if let Some(children) = parent.children.as_mut() {
                children.push(detached);
            }
        }
        self.save(&forest)
    }

    fn search_by_url(&self, url: &str) -> Result<Vec<BookmarkNode>, HostError> {
        let forest = self.load()?;
        let mut matches = vec![];
        let mut stack: Vec<&BookmarkNode> = forest.iter().collect();
        while let Some(node) = stack.pop() {
            if node.url.as_deref() == Some(url) {
                matches.push(node.clone());
            }
            if let Some(children) = &node.children {
                stack.extend(children.iter());
            }
        }
        Ok(matches)
    }
}

// ── Key-value record on disk ────────────────────────────────────────────────

/// The versioned preference/metadata record persisted as `storage.json`.
pub struct FileStorageHost {
    path: PathBuf,
}

impl FileStorageHost {
    pub fn new(root: &Path) -> Self {
        Self {
            path: root.join("storage.json"),
        }
    }
}

impl StorageHost for FileStorageHost {
    fn read(&self) -> Result<Option<Value>, HostError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let s = fs::read_to_string(&self.path).map_err(|e| HostError(e.to_string()))?;
        serde_json::from_str(&s)
            .map(Some)
            .map_err(|e| HostError(e.to_string()))
    }

    fn write(&self, record: &Value) -> Result<(), HostError> {
        write_json(&self.path, record)
    }

    fn clear(&self) -> Result<(), HostError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| HostError(e.to_string()))?;
        }
        Ok(())
    }
}
