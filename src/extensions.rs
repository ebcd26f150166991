//! Extension-list helpers for the popup's secondary tab. Enumerating,
//! toggling, and uninstalling extensions belongs to the host; these are
//! the client-side filter/sort/classify helpers over what it reports.

use std::collections::HashMap;

use crate::models::{ExtensionInfo, ExtensionStats};

/// Filter extensions by a sanitized, case-insensitive substring on name,
/// description, or short name. A blank term returns the input unchanged.
pub fn search_extensions(extensions: Vec<ExtensionInfo>, term: &str) -> Vec<ExtensionInfo> {
    let term = crate::util::sanitize_input(term).to_lowercase();
    if term.is_empty() {
        return extensions;
    }
    extensions
        .into_iter()
        .filter(|ext| {
            ext.name.to_lowercase().contains(&term)
                || ext.description.to_lowercase().contains(&term)
                || ext
                    .short_name
                    .as_deref()
                    .map(|s| s.to_lowercase().contains(&term))
                    .unwrap_or(false)
        })
        .collect()
}

/// Sort extensions. Only name ordering is defined; anything else keeps
/// the host's order.
pub fn sort_extensions(mut extensions: Vec<ExtensionInfo>, sort_by: &str) -> Vec<ExtensionInfo> {
    if sort_by == "name" {
        extensions.sort_by(|a, b| a.name.cmp(&b.name));
    }
    extensions
}

/// Keyword-substring classification over name and description; first
/// matching rule wins.
pub fn categorize_extension(ext: &ExtensionInfo) -> &'static str {
    let name = ext.name.to_lowercase();
    let desc = ext.description.to_lowercase();
    let has = |needle: &str| name.contains(needle) || desc.contains(needle);

    if has("ad") && (has("block") || has("blocker")) {
        return "Ad Blockers";
    }
    if has("password") || has("auth") {
        return "Security";
    }
    if has("video") || has("youtube") {
        return "Media";
    }
    if has("dark") || has("theme") {
        return "Themes";
    }
    if has("dev") || has("debug") || has("inspect") {
        return "Developer Tools";
    }
    if has("translate") || has("dictionary") {
        return "Language";
    }
    if has("shopping") || has("coupon") || has("price") {
        return "Shopping";
    }
    if has("social") || has("twitter") || has("facebook") {
        return "Social";
    }
    if has("productivity") || has("todo") || has("note") {
        return "Productivity";
    }
    if has("download") || has("manager") {
        return "Downloads";
    }
    "Other"
}

/// Aggregate counts plus extension ids grouped by category.
pub fn extension_stats(extensions: &[ExtensionInfo]) -> ExtensionStats {
    let enabled = extensions.iter().filter(|e| e.enabled).count();
    let mut categories: HashMap<String, Vec<String>> = HashMap::new();
    for ext in extensions {
        categories
            .entry(categorize_extension(ext).to_string())
            .or_default()
            .push(ext.id.clone());
    }
    ExtensionStats {
        total: extensions.len(),
        enabled,
        disabled: extensions.len() - enabled,
        categories,
    }
}
