pub mod bookmarks;
mod commands;
pub mod error;
pub mod extensions;
pub mod host;
pub mod models;
pub mod storage;
pub mod util;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_opener::init())
        .invoke_handler(tauri::generate_handler![
            commands::init_storage,
            commands::get_folders,
            commands::get_folder_stats,
            commands::search_bookmarks,
            commands::check_duplicates,
            commands::create_bookmark,
            commands::create_folder,
            commands::get_bookmark,
            commands::update_bookmark,
            commands::delete_bookmark,
            commands::move_bookmark,
            commands::bookmarks_in_folder,
            commands::export_folder,
            commands::bulk_delete_bookmarks,
            commands::bulk_move_bookmarks,
            commands::get_theme,
            commands::set_theme,
            commands::get_settings,
            commands::set_settings,
            commands::get_recent_folders,
            commands::add_recent_folder,
            commands::get_search_history,
            commands::add_search_history,
            commands::get_bookmark_tags,
            commands::save_bookmark_tags,
            commands::search_by_tag,
            commands::get_bookmark_note,
            commands::save_bookmark_note,
            commands::export_all_data,
            commands::import_data,
            commands::clear_all_data,
            commands::filter_extensions,
            commands::extension_stats,
            commands::open_url,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
