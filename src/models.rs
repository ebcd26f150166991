use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A node of the bookmark tree. Folders carry a `children` list (possibly
/// empty) and no URL; leaf bookmarks carry a URL and no children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkNode {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "parentId")]
    pub parent_id: Option<String>,
    /// Creation time, Unix milliseconds.
    #[serde(default, rename = "dateAdded")]
    pub date_added: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BookmarkNode>>,
}

impl BookmarkNode {
    pub fn is_folder(&self) -> bool {
        self.children.is_some()
    }
}

/// A folder flattened out of the tree. Derived on every load, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
    #[serde(rename = "dateAdded")]
    pub date_added: i64,
}

/// Immediate (one-level) child counts for a folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderStats {
    pub bookmarks: usize,
    pub subfolders: usize,
    pub total: usize,
}

/// A matched bookmark, annotated with the titles of its ancestor folders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultBookmark {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
    #[serde(rename = "folderPath")]
    pub folder_path: String,
    #[serde(rename = "dateAdded")]
    pub date_added: i64,
}

/// Outcome of a bulk delete/move: per-id partition, never an early abort.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkResult {
    pub success: Vec<String>,
    pub failed: Vec<String>,
}

/// One exported bookmark entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedBookmark {
    pub title: String,
    pub url: String,
    #[serde(rename = "dateAdded")]
    pub date_added: i64,
}

/// Export of a single folder's direct bookmarks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderExport {
    #[serde(rename = "folderName")]
    pub folder_name: String,
    pub bookmarks: Vec<ExportedBookmark>,
}

/// User settings, persisted inside the versioned record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "autoCategorize")]
    pub auto_categorize: bool,
    #[serde(rename = "checkDuplicates")]
    pub check_duplicates: bool,
    #[serde(rename = "openFolderAfterSave")]
    pub open_folder_after_save: bool,
    #[serde(rename = "maxRecentFolders")]
    pub max_recent_folders: usize,
    #[serde(rename = "maxSearchHistory")]
    pub max_search_history: usize,
    pub theme: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_categorize: false,
            check_duplicates: true,
            open_folder_after_save: false,
            max_recent_folders: 5,
            max_search_history: 10,
            theme: "dark".to_string(),
        }
    }
}

/// Entry of the recent-folders recency list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentFolder {
    pub id: String,
    pub title: String,
}

/// The single persisted document. `schema_version` gates first-run
/// initialization and migration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    #[serde(rename = "schemaVersion")]
    pub schema_version: String,
    pub theme: String,
    pub settings: Settings,
    #[serde(default, rename = "recentFolders")]
    pub recent_folders: Vec<RecentFolder>,
    #[serde(default, rename = "searchHistory")]
    pub search_history: Vec<String>,
    #[serde(default, rename = "bookmarkTags")]
    pub bookmark_tags: HashMap<String, Vec<String>>,
    #[serde(default, rename = "bookmarkNotes")]
    pub bookmark_notes: HashMap<String, String>,
}

/// An installed extension as reported by the host, reduced to the fields
/// the popup lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub enabled: bool,
    #[serde(default, rename = "shortName")]
    pub short_name: Option<String>,
    #[serde(default)]
    pub version: String,
}

/// Aggregate counts over an extension list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionStats {
    pub total: usize,
    pub enabled: usize,
    pub disabled: usize,
    pub categories: HashMap<String, Vec<String>>,
}
