//! Versioned key-value persistence: the schema gate and migration, plus
//! the preference surface (theme, settings, recency lists) and per-bookmark
//! tag/note metadata layered on top of it.
//!
//! The whole store is one document (`StoredRecord`). Every operation reads
//! the record, mutates it, and writes it back whole; the host write itself
//! is atomic. Read paths degrade to defaults on failure, secondary write
//! paths log and continue (the popup must never crash over preferences).

use log::{error, info, warn};
use serde_json::Value;

use crate::error::Error;
use crate::host::StorageHost;
use crate::models::{RecentFolder, Settings, StoredRecord};
use crate::util::sanitize_input;

/// Current schema version, written on first run and after migration.
pub const SCHEMA_VERSION: &str = "2.0.0";

/// Version tags written by the pre-2.0 releases.
const LEGACY_VERSIONS: &[&str] = &["1.0", "1.0.0"];

fn default_record() -> StoredRecord {
    let settings = Settings::default();
    StoredRecord {
        schema_version: SCHEMA_VERSION.to_string(),
        theme: settings.theme.clone(),
        settings,
        recent_folders: vec![],
        search_history: vec![],
        bookmark_tags: Default::default(),
        bookmark_notes: Default::default(),
    }
}

/// Pure legacy transform: keep theme, recent folders, and search history
/// verbatim; drop every other legacy key; reset tags/notes; rebuild
/// settings as defaults with the theme carried over.
fn migrate_legacy(legacy: &Value) -> StoredRecord {
    let theme = legacy
        .get("theme")
        .and_then(Value::as_str)
        .unwrap_or("dark")
        .to_string();
    let recent_folders = legacy
        .get("recentFolders")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();
    let search_history = legacy
        .get("searchHistory")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();
    StoredRecord {
        schema_version: SCHEMA_VERSION.to_string(),
        theme: theme.clone(),
        settings: Settings {
            theme,
            ..Settings::default()
        },
        recent_folders,
        search_history,
        bookmark_tags: Default::default(),
        bookmark_notes: Default::default(),
    }
}

/// Idempotent schema gate, run once per popup activation.
///
/// Uninitialized store: write the full default record. Legacy version:
/// clear and replace with the migrated record (destructive). Current
/// version: no writes at all.
pub fn check_and_migrate<S: StorageHost>(host: &S) -> Result<(), Error> {
    let raw = host.read()?;
    let version = raw
        .as_ref()
        .and_then(|v| v.get("schemaVersion"))
        .and_then(Value::as_str);

    match version {
        None => {
            let record = default_record();
            host.write(&serde_json::to_value(&record).map_err(|e| Error::Host(e.to_string()))?)?;
            info!("Storage initialized at schema {}", SCHEMA_VERSION);
            Ok(())
        }
        Some(v) if LEGACY_VERSIONS.contains(&v) => {
            info!("Migrating storage from {} to {}", v, SCHEMA_VERSION);
            // raw is Some here: the version tag came from it.
            let migrated = migrate_legacy(raw.as_ref().unwrap_or(&Value::Null));
            host.clear()?;
            host.write(&serde_json::to_value(&migrated).map_err(|e| Error::Host(e.to_string()))?)?;
            Ok(())
        }
        Some(v) if v == SCHEMA_VERSION => Ok(()),
        Some(v) => {
            warn!("Unknown storage schema {}, leaving record untouched", v);
            Ok(())
        }
    }
}

/// Read the whole record, falling back to defaults on absence or failure.
pub fn load_record<S: StorageHost>(host: &S) -> StoredRecord {
    match host.read() {
        Ok(Some(raw)) => match serde_json::from_value(raw) {
            Ok(record) => record,
            Err(e) => {
                error!("Unreadable storage record: {}", e);
                default_record()
            }
        },
        Ok(None) => default_record(),
        Err(e) => {
            error!("Error reading storage: {}", e);
            default_record()
        }
    }
}

/// Best-effort whole-record write; failures are logged, not raised.
fn persist<S: StorageHost>(host: &S, record: &StoredRecord) {
    match serde_json::to_value(record) {
        Ok(value) => {
            if let Err(e) = host.write(&value) {
                error!("Error writing storage: {}", e);
            }
        }
        Err(e) => error!("Unserializable storage record: {}", e),
    }
}

// ── Preferences ─────────────────────────────────────────────────────────────

pub fn load_theme<S: StorageHost>(host: &S) -> String {
    load_record(host).settings.theme
}

pub fn save_theme<S: StorageHost>(host: &S, theme: &str) {
    let mut record = load_record(host);
    record.settings.theme = theme.to_string();
    persist(host, &record);
}

pub fn load_settings<S: StorageHost>(host: &S) -> Settings {
    load_record(host).settings
}

pub fn save_settings<S: StorageHost>(host: &S, settings: Settings) {
    let mut record = load_record(host);
    record.settings = settings;
    persist(host, &record);
}

pub fn load_recent_folders<S: StorageHost>(host: &S) -> Vec<RecentFolder> {
    load_record(host).recent_folders
}

/// Dedupe by folder id, prepend, then truncate to `max` — in that order.
pub fn add_to_recent_folders<S: StorageHost>(
    host: &S,
    folder: RecentFolder,
    max: usize,
) -> Vec<RecentFolder> {
    let mut record = load_record(host);
    record.recent_folders.retain(|f| f.id != folder.id);
    record.recent_folders.insert(0, folder);
    record.recent_folders.truncate(max);
    persist(host, &record);
    record.recent_folders
}

pub fn load_search_history<S: StorageHost>(host: &S) -> Vec<String> {
    load_record(host).search_history
}

/// Same recency discipline as folders, keyed on the exact term. Blank
/// terms are ignored.
pub fn add_to_search_history<S: StorageHost>(host: &S, term: &str, max: usize) {
    if term.trim().is_empty() {
        return;
    }
    let mut record = load_record(host);
    record.search_history.retain(|t| t != term);
    record.search_history.insert(0, term.to_string());
    record.search_history.truncate(max);
    persist(host, &record);
}

// ── Per-bookmark tags and notes ─────────────────────────────────────────────

pub fn bookmark_tags<S: StorageHost>(host: &S, bookmark_id: &str) -> Vec<String> {
    load_record(host)
        .bookmark_tags
        .get(bookmark_id)
        .cloned()
        .unwrap_or_default()
}

/// Persist the tag set for a bookmark: sanitized, empties dropped,
/// duplicates dropped (first occurrence wins).
pub fn save_bookmark_tags<S: StorageHost>(host: &S, bookmark_id: &str, tags: &[String]) {
    let mut cleaned: Vec<String> = vec![];
    for tag in tags {
        let tag = sanitize_input(tag);
        if !tag.is_empty() && !cleaned.contains(&tag) {
            cleaned.push(tag);
        }
    }
    let mut record = load_record(host);
    record.bookmark_tags.insert(bookmark_id.to_string(), cleaned);
    persist(host, &record);
}

/// Ids of bookmarks carrying the given tag (exact match).
pub fn search_by_tag<S: StorageHost>(host: &S, tag: &str) -> Vec<String> {
    let record = load_record(host);
    let mut ids: Vec<String> = record
        .bookmark_tags
        .iter()
        .filter(|(_, tags)| tags.iter().any(|t| t == tag))
        .map(|(id, _)| id.clone())
        .collect();
    ids.sort();
    ids
}

pub fn bookmark_note<S: StorageHost>(host: &S, bookmark_id: &str) -> String {
    load_record(host)
        .bookmark_notes
        .get(bookmark_id)
        .cloned()
        .unwrap_or_default()
}

pub fn save_bookmark_note<S: StorageHost>(host: &S, bookmark_id: &str, note: &str) {
    let mut record = load_record(host);
    record
        .bookmark_notes
        .insert(bookmark_id.to_string(), sanitize_input(note));
    persist(host, &record);
}

// ── Export / import / reset ─────────────────────────────────────────────────

/// Raw dump of the persisted record (empty object when uninitialized).
pub fn export_all_data<S: StorageHost>(host: &S) -> Value {
    match host.read() {
        Ok(Some(raw)) => raw,
        Ok(None) => Value::Object(Default::default()),
        Err(e) => {
            error!("Error exporting data: {}", e);
            Value::Object(Default::default())
        }
    }
}

/// Replace the persisted record wholesale with imported data.
pub fn import_data<S: StorageHost>(host: &S, data: &Value) -> bool {
    match host.write(data) {
        Ok(()) => true,
        Err(e) => {
            error!("Error importing data: {}", e);
            false
        }
    }
}

/// Wipe the store and re-run first-time initialization.
pub fn clear_all_data<S: StorageHost>(host: &S) -> bool {
    if let Err(e) = host.clear() {
        error!("Error clearing data: {}", e);
        return false;
    }
    check_and_migrate(host).is_ok()
}
