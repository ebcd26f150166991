//! Bookmark tree service: flattening the host tree into a folder list,
//! per-folder statistics, whole-tree search with folder paths, duplicate
//! detection, validated creation, and bulk operations.
//!
//! All traversals are explicit worklist walks with a visited-id guard, so
//! a malformed host tree can neither blow the stack nor loop forever.

use std::collections::{HashMap, HashSet};

use log::{error, warn};

use crate::error::Error;
use crate::host::{BookmarkHost, StorageHost};
use crate::models::{
    BookmarkNode, BulkResult, ExportedBookmark, FolderExport, FolderRecord, FolderStats,
    SearchResultBookmark,
};
use crate::storage;
use crate::util::{is_valid_url, sanitize_input};

/// Display title for folders whose stored title is empty (the root).
const DEFAULT_FOLDER_TITLE: &str = "Bookmarks";

/// Display title for bookmarks whose stored title is empty.
const DEFAULT_BOOKMARK_TITLE: &str = "Untitled";

/// Flatten the forest into folder records, pre-order depth-first. A node
/// is a folder iff it exposes a children list, regardless of title.
pub fn extract_folders(nodes: &[BookmarkNode]) -> Vec<FolderRecord> {
    let mut folders = vec![];
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&BookmarkNode> = nodes.iter().rev().collect();

    while let Some(node) = stack.pop() {
        if !visited.insert(node.id.as_str()) {
            continue;
        }
        if let Some(children) = &node.children {
            folders.push(FolderRecord {
                id: node.id.clone(),
                title: if node.title.is_empty() {
                    DEFAULT_FOLDER_TITLE.to_string()
                } else {
                    node.title.clone()
                },
                parent_id: node.parent_id.clone(),
                date_added: node.date_added,
            });
            stack.extend(children.iter().rev());
        }
    }
    folders
}

/// Immediate child counts per folder. A folder whose children cannot be
/// fetched is omitted from the map; the rest still come back (best-effort).
pub fn calculate_folder_stats<H: BookmarkHost>(
    host: &H,
    folders: &[FolderRecord],
) -> HashMap<String, FolderStats> {
    let mut stats = HashMap::new();
    for folder in folders {
        let children = match host.get_children(&folder.id) {
            Ok(children) => children,
            Err(e) => {
                warn!("Skipping stats for folder {}: {}", folder.id, e);
                continue;
            }
        };
        let bookmarks = children.iter().filter(|c| c.url.is_some()).count();
        let subfolders = children.iter().filter(|c| c.children.is_some()).count();
        stats.insert(
            folder.id.clone(),
            FolderStats {
                bookmarks,
                subfolders,
                total: bookmarks + subfolders,
            },
        );
    }
    stats
}

/// Pre-order walk collecting every leaf bookmark with its folder path.
/// Folder titles join the path only when non-empty; raw titles are used
/// here, without the "Bookmarks" display default.
fn collect_bookmarks(nodes: &[BookmarkNode]) -> Vec<SearchResultBookmark> {
    let mut results = vec![];
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<(&BookmarkNode, Vec<String>)> =
        nodes.iter().rev().map(|n| (n, vec![])).collect();

    while let Some((node, path)) = stack.pop() {
        if !visited.insert(node.id.as_str()) {
            continue;
        }
        if let Some(url) = &node.url {
            results.push(SearchResultBookmark {
                id: node.id.clone(),
                title: if node.title.is_empty() {
                    DEFAULT_BOOKMARK_TITLE.to_string()
                } else {
                    node.title.clone()
                },
                url: url.clone(),
                parent_id: node.parent_id.clone(),
                folder_path: path.join(" > "),
                date_added: node.date_added,
            });
        } else if let Some(children) = &node.children {
            let child_path = if node.title.is_empty() {
                path
            } else {
                let mut p = path;
                p.push(node.title.clone());
                p
            };
            for child in children.iter().rev() {
                stack.push((child, child_path.clone()));
            }
        }
    }
    results
}

/// Case-insensitive substring search over bookmark titles and URLs.
/// A blank query returns empty without touching the host; results come
/// back in tree-discovery order.
pub fn search_all_bookmarks<H: BookmarkHost>(host: &H, query: &str) -> Vec<SearchResultBookmark> {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return vec![];
    }
    let tree = match host.get_tree() {
        Ok(tree) => tree,
        Err(e) => {
            error!("Error loading bookmark tree: {}", e);
            return vec![];
        }
    };
    collect_bookmarks(&tree)
        .into_iter()
        .filter(|b| {
            b.title.to_lowercase().contains(&term) || b.url.to_lowercase().contains(&term)
        })
        .collect()
}

/// Exact-URL duplicate lookup. A failed lookup reads as "no duplicates";
/// callers treat the result as advisory either way.
pub fn check_for_duplicates<H: BookmarkHost>(host: &H, url: &str) -> Vec<BookmarkNode> {
    match host.search_by_url(url) {
        Ok(matches) => matches,
        Err(e) => {
            warn!("Duplicate check failed: {}", e);
            vec![]
        }
    }
}

/// Create a bookmark after validating title and URL, then persist tags and
/// note keyed by the new id. The creation itself fails loudly; the metadata
/// writes are best-effort and never roll the bookmark back.
pub fn create_bookmark<B: BookmarkHost, S: StorageHost>(
    bookmarks: &B,
    metadata: &S,
    parent_id: &str,
    title: &str,
    url: &str,
    tags: &[String],
    note: &str,
) -> Result<BookmarkNode, Error> {
    let title = sanitize_input(title);
    let url = url.trim();
    if title.is_empty() || url.is_empty() {
        return Err(Error::validation("Title and URL are required"));
    }
    if !is_valid_url(url) {
        return Err(Error::validation("Invalid URL format"));
    }

    let bookmark = bookmarks.create(parent_id, &title, Some(url))?;

    if !tags.is_empty() {
        storage::save_bookmark_tags(metadata, &bookmark.id, tags);
    }
    if !note.trim().is_empty() {
        storage::save_bookmark_note(metadata, &bookmark.id, note);
    }
    Ok(bookmark)
}

/// Create a folder. An empty name is a validation error, raised before
/// any host call.
pub fn create_folder<H: BookmarkHost>(
    host: &H,
    parent_id: &str,
    name: &str,
) -> Result<FolderRecord, Error> {
    let name = sanitize_input(name);
    if name.is_empty() {
        return Err(Error::validation("Folder name is required"));
    }
    let node = host.create(parent_id, &name, None)?;
    Ok(FolderRecord {
        id: node.id,
        title: node.title,
        parent_id: node.parent_id,
        date_added: node.date_added,
    })
}

pub fn get_bookmark<H: BookmarkHost>(host: &H, id: &str) -> Option<BookmarkNode> {
    match host.get(id) {
        Ok(node) => node,
        Err(e) => {
            warn!("Error getting bookmark {}: {}", id, e);
            None
        }
    }
}

/// Update title and/or URL. Changed fields are sanitized; an invalid URL
/// or a rejected host call both read as `false`.
pub fn update_bookmark<H: BookmarkHost>(
    host: &H,
    id: &str,
    title: Option<&str>,
    url: Option<&str>,
) -> bool {
    let title = title.map(sanitize_input);
    let url = match url {
        Some(u) => {
            let u = u.trim();
            if !is_valid_url(u) {
                warn!("Rejected update of {}: invalid URL", id);
                return false;
            }
            Some(u.to_string())
        }
        None => None,
    };
    match host.update(id, title.as_deref(), url.as_deref()) {
        Ok(()) => true,
        Err(e) => {
            error!("Error updating bookmark {}: {}", id, e);
            false
        }
    }
}

pub fn delete_bookmark<H: BookmarkHost>(host: &H, id: &str) -> bool {
    match host.remove(id) {
        Ok(()) => true,
        Err(e) => {
            error!("Error deleting bookmark {}: {}", id, e);
            false
        }
    }
}

pub fn move_bookmark<H: BookmarkHost>(host: &H, id: &str, destination_folder_id: &str) -> bool {
    match host.move_to(id, destination_folder_id) {
        Ok(()) => true,
        Err(e) => {
            error!("Error moving bookmark {}: {}", id, e);
            false
        }
    }
}

/// Direct leaf bookmarks of a folder (subfolders excluded).
pub fn bookmarks_in_folder<H: BookmarkHost>(host: &H, folder_id: &str) -> Vec<BookmarkNode> {
    match host.get_children(folder_id) {
        Ok(children) => children.into_iter().filter(|c| c.url.is_some()).collect(),
        Err(e) => {
            warn!("Error listing folder {}: {}", folder_id, e);
            vec![]
        }
    }
}

/// Export a folder's direct bookmarks for download.
pub fn export_folder<H: BookmarkHost>(host: &H, folder_id: &str) -> Option<FolderExport> {
    let folder = get_bookmark(host, folder_id)?;
    let bookmarks = bookmarks_in_folder(host, folder_id)
        .into_iter()
        .map(|b| ExportedBookmark {
            title: b.title,
            url: b.url.unwrap_or_default(),
            date_added: b.date_added,
        })
        .collect();
    Some(FolderExport {
        folder_name: folder.title,
        bookmarks,
    })
}

/// Delete each id independently; failures are collected, never fatal.
/// `success.len() + failed.len()` always equals the input length.
pub fn bulk_delete_bookmarks<H: BookmarkHost>(host: &H, ids: &[String]) -> BulkResult {
    let mut result = BulkResult::default();
    for id in ids {
        match host.remove(id) {
            Ok(()) => result.success.push(id.clone()),
            Err(e) => {
                error!("Error deleting bookmark {}: {}", id, e);
                result.failed.push(id.clone());
            }
        }
    }
    result
}

/// Move each id independently into the destination folder; same
/// partial-failure contract as bulk delete.
pub fn bulk_move_bookmarks<H: BookmarkHost>(
    host: &H,
    ids: &[String],
    destination_folder_id: &str,
) -> BulkResult {
    let mut result = BulkResult::default();
    for id in ids {
        match host.move_to(id, destination_folder_id) {
            Ok(()) => result.success.push(id.clone()),
            Err(e) => {
                error!("Error moving bookmark {}: {}", id, e);
                result.failed.push(id.clone());
            }
        }
    }
    result
}
