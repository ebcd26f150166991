use std::collections::HashMap;

use serde_json::Value;

use crate::bookmarks;
use crate::extensions;
use crate::host::{self, BookmarkHost, FileBookmarkHost, FileStorageHost};
use crate::models::{
    BookmarkNode, BulkResult, ExtensionInfo, ExtensionStats, FolderExport, FolderRecord,
    FolderStats, RecentFolder, SearchResultBookmark, Settings,
};
use crate::storage;

fn bookmark_host(app: &tauri::AppHandle) -> Result<FileBookmarkHost, String> {
    let root = host::storage_root(app).map_err(|e| e.to_string())?;
    Ok(FileBookmarkHost::new(&root))
}

fn storage_host(app: &tauri::AppHandle) -> Result<FileStorageHost, String> {
    let root = host::storage_root(app).map_err(|e| e.to_string())?;
    Ok(FileStorageHost::new(&root))
}

#[tauri::command]
pub fn init_storage(app: tauri::AppHandle) -> Result<(), String> {
    let root = host::storage_root(&app).map_err(|e| e.to_string())?;
    host::init_root(&root).map_err(|e| e.to_string())?;
    storage::check_and_migrate(&FileStorageHost::new(&root)).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_folders(app: tauri::AppHandle) -> Result<Vec<FolderRecord>, String> {
    let host = bookmark_host(&app)?;
    let tree = host.get_tree().unwrap_or_default();
    Ok(bookmarks::extract_folders(&tree))
}

#[tauri::command]
pub fn get_folder_stats(app: tauri::AppHandle) -> Result<HashMap<String, FolderStats>, String> {
    let host = bookmark_host(&app)?;
    let tree = host.get_tree().unwrap_or_default();
    let folders = bookmarks::extract_folders(&tree);
    Ok(bookmarks::calculate_folder_stats(&host, &folders))
}

#[tauri::command]
pub fn search_bookmarks(
    app: tauri::AppHandle,
    query: String,
) -> Result<Vec<SearchResultBookmark>, String> {
    let host = bookmark_host(&app)?;
    Ok(bookmarks::search_all_bookmarks(&host, &query))
}

#[tauri::command]
pub fn check_duplicates(app: tauri::AppHandle, url: String) -> Result<Vec<BookmarkNode>, String> {
    let host = bookmark_host(&app)?;
    Ok(bookmarks::check_for_duplicates(&host, &url))
}

#[tauri::command]
pub fn create_bookmark(
    app: tauri::AppHandle,
    parent_id: String,
    title: String,
    url: String,
    tags: Vec<String>,
    note: String,
) -> Result<BookmarkNode, String> {
    let bookmark_host = bookmark_host(&app)?;
    let storage_host = storage_host(&app)?;
    bookmarks::create_bookmark(
        &bookmark_host,
        &storage_host,
        &parent_id,
        &title,
        &url,
        &tags,
        &note,
    )
    .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn create_folder(
    app: tauri::AppHandle,
    parent_id: String,
    name: String,
) -> Result<FolderRecord, String> {
    let host = bookmark_host(&app)?;
    bookmarks::create_folder(&host, &parent_id, &name).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_bookmark(app: tauri::AppHandle, id: String) -> Result<Option<BookmarkNode>, String> {
    let host = bookmark_host(&app)?;
    Ok(bookmarks::get_bookmark(&host, &id))
}

#[tauri::command]
pub fn update_bookmark(
    app: tauri::AppHandle,
    id: String,
    title: Option<String>,
    url: Option<String>,
) -> Result<bool, String> {
    let host = bookmark_host(&app)?;
    Ok(bookmarks::update_bookmark(
        &host,
        &id,
        title.as_deref(),
        url.as_deref(),
    ))
}

#[tauri::command]
pub fn delete_bookmark(app: tauri::AppHandle, id: String) -> Result<bool, String> {
    let host = bookmark_host(&app)?;
    Ok(bookmarks::delete_bookmark(&host, &id))
}

#[tauri::command]
pub fn move_bookmark(
    app: tauri::AppHandle,
    id: String,
    destination_folder_id: String,
) -> Result<bool, String> {
    let host = bookmark_host(&app)?;
    Ok(bookmarks::move_bookmark(&host, &id, &destination_folder_id))
}

#[tauri::command]
pub fn bookmarks_in_folder(
    app: tauri::AppHandle,
    folder_id: String,
) -> Result<Vec<BookmarkNode>, String> {
    let host = bookmark_host(&app)?;
    Ok(bookmarks::bookmarks_in_folder(&host, &folder_id))
}

#[tauri::command]
pub fn export_folder(
    app: tauri::AppHandle,
    folder_id: String,
) -> Result<Option<FolderExport>, String> {
    let host = bookmark_host(&app)?;
    Ok(bookmarks::export_folder(&host, &folder_id))
}

#[tauri::command]
pub fn bulk_delete_bookmarks(app: tauri::AppHandle, ids: Vec<String>) -> Result<BulkResult, String> {
    let host = bookmark_host(&app)?;
    Ok(bookmarks::bulk_delete_bookmarks(&host, &ids))
}

#[tauri::command]
pub fn bulk_move_bookmarks(
    app: tauri::AppHandle,
    ids: Vec<String>,
    destination_folder_id: String,
) -> Result<BulkResult, String> {
    let host = bookmark_host(&app)?;
    Ok(bookmarks::bulk_move_bookmarks(&host, &ids, &destination_folder_id))
}

// --- Preferences & metadata ---

#[tauri::command]
pub fn get_theme(app: tauri::AppHandle) -> Result<String, String> {
    Ok(storage::load_theme(&storage_host(&app)?))
}

#[tauri::command]
pub fn set_theme(app: tauri::AppHandle, theme: String) -> Result<(), String> {
    storage::save_theme(&storage_host(&app)?, &theme);
    Ok(())
}

#[tauri::command]
pub fn get_settings(app: tauri::AppHandle) -> Result<Settings, String> {
    Ok(storage::load_settings(&storage_host(&app)?))
}

#[tauri::command]
pub fn set_settings(app: tauri::AppHandle, settings: Settings) -> Result<(), String> {
    storage::save_settings(&storage_host(&app)?, settings);
    Ok(())
}

#[tauri::command]
pub fn get_recent_folders(app: tauri::AppHandle) -> Result<Vec<RecentFolder>, String> {
    Ok(storage::load_recent_folders(&storage_host(&app)?))
}

#[tauri::command]
pub fn add_recent_folder(
    app: tauri::AppHandle,
    folder: RecentFolder,
) -> Result<Vec<RecentFolder>, String> {
    let host = storage_host(&app)?;
    let max = storage::load_settings(&host).max_recent_folders;
    Ok(storage::add_to_recent_folders(&host, folder, max))
}

#[tauri::command]
pub fn get_search_history(app: tauri::AppHandle) -> Result<Vec<String>, String> {
    Ok(storage::load_search_history(&storage_host(&app)?))
}

#[tauri::command]
pub fn add_search_history(app: tauri::AppHandle, term: String) -> Result<(), String> {
    let host = storage_host(&app)?;
    let max = storage::load_settings(&host).max_search_history;
    storage::add_to_search_history(&host, &term, max);
    Ok(())
}

#[tauri::command]
pub fn get_bookmark_tags(app: tauri::AppHandle, bookmark_id: String) -> Result<Vec<String>, String> {
    Ok(storage::bookmark_tags(&storage_host(&app)?, &bookmark_id))
}

#[tauri::command]
pub fn save_bookmark_tags(
    app: tauri::AppHandle,
    bookmark_id: String,
    tags: Vec<String>,
) -> Result<(), String> {
    storage::save_bookmark_tags(&storage_host(&app)?, &bookmark_id, &tags);
    Ok(())
}

#[tauri::command]
pub fn search_by_tag(app: tauri::AppHandle, tag: String) -> Result<Vec<String>, String> {
    Ok(storage::search_by_tag(&storage_host(&app)?, &tag))
}

#[tauri::command]
pub fn get_bookmark_note(app: tauri::AppHandle, bookmark_id: String) -> Result<String, String> {
    Ok(storage::bookmark_note(&storage_host(&app)?, &bookmark_id))
}

#[tauri::command]
pub fn save_bookmark_note(
    app: tauri::AppHandle,
    bookmark_id: String,
    note: String,
) -> Result<(), String> {
    storage::save_bookmark_note(&storage_host(&app)?, &bookmark_id, &note);
    Ok(())
}

#[tauri::command]
pub fn export_all_data(app: tauri::AppHandle) -> Result<Value, String> {
    Ok(storage::export_all_data(&storage_host(&app)?))
}

#[tauri::command]
pub fn import_data(app: tauri::AppHandle, data: Value) -> Result<bool, String> {
    Ok(storage::import_data(&storage_host(&app)?, &data))
}

#[tauri::command]
pub fn clear_all_data(app: tauri::AppHandle) -> Result<bool, String> {
    Ok(storage::clear_all_data(&storage_host(&app)?))
}

// --- Extensions tab ---

#[tauri::command]
pub fn filter_extensions(
    extensions: Vec<ExtensionInfo>,
    term: String,
    sort_by: String,
) -> Result<Vec<ExtensionInfo>, String> {
    let filtered = extensions::search_extensions(extensions, &term);
    Ok(extensions::sort_extensions(filtered, &sort_by))
}

#[tauri::command]
pub fn extension_stats(extensions: Vec<ExtensionInfo>) -> Result<ExtensionStats, String> {
    Ok(extensions::extension_stats(&extensions))
}

// --- Misc ---

#[tauri::command]
pub fn open_url(app: tauri::AppHandle, url: String) -> Result<(), String> {
    use tauri_plugin_opener::OpenerExt;
    if !crate::util::is_valid_url(&url) {
        return Err("Invalid URL format".into());
    }
    app.opener()
        .open_url(url, None::<String>)
        .map_err(|e| e.to_string())
}
