use chrono::Utc;
use url::Url;

use crate::error::Error;

/// Longest accepted title/tag/note after sanitization.
const MAX_INPUT_LEN: usize = 500;

/// Clean free-text input: escape HTML-sensitive characters so no markup
/// survives, trim surrounding whitespace, and cap the length.
pub fn sanitize_input(input: &str) -> String {
    let escaped: String = input
        .chars()
        .flat_map(|c| match c {
            '&' => "&amp;".chars().collect::<Vec<_>>(),
            '<' => "&lt;".chars().collect(),
            '>' => "&gt;".chars().collect(),
            c => vec![c],
        })
        .collect();
    escaped.trim().chars().take(MAX_INPUT_LEN).collect()
}

/// A URL is accepted iff it parses and uses http, https, or the local
/// file scheme.
pub fn is_valid_url(input: &str) -> bool {
    match Url::parse(input) {
        Ok(url) => matches!(url.scheme(), "http" | "https" | "file"),
        Err(_) => false,
    }
}

/// Trim a URL and reject anything that does not validate.
pub fn sanitize_url(input: &str) -> Result<String, Error> {
    let trimmed = input.trim();
    if !is_valid_url(trimmed) {
        return Err(Error::validation("Invalid URL format"));
    }
    Ok(trimmed.to_string())
}

/// Keyword rules for folder icons. First matching rule wins.
const FOLDER_ICON_RULES: &[(&[&str], &str)] = &[
    (&["work", "job", "office"], "💼"),
    (&["personal", "home"], "🏠"),
    (&["study", "learn", "education"], "📚"),
    (&["shopping", "buy", "store"], "🛒"),
    (&["travel", "trip", "vacation"], "✈️"),
    (&["food", "recipe", "cook"], "🍽️"),
    (&["music", "song", "audio"], "🎵"),
    (&["video", "movie", "film"], "🎬"),
    (&["game", "gaming", "play"], "🎮"),
    (&["social", "media", "network"], "📱"),
    (&["tech", "coding", "programming"], "💻"),
    (&["news", "article", "blog"], "📰"),
    (&["finance", "money", "bank"], "💰"),
    (&["health", "fitness", "exercise"], "💪"),
    (&["art", "design", "creative"], "🎨"),
];

/// Pick a display icon from keywords in the folder title.
pub fn folder_icon(folder_title: &str) -> &'static str {
    let title = folder_title.to_lowercase();
    for (keywords, icon) in FOLDER_ICON_RULES {
        if keywords.iter().any(|k| title.contains(k)) {
            return icon;
        }
    }
    "📁"
}

/// Suggest a category icon from the URL's domain, if any rule matches.
pub fn auto_categorize(url: &str) -> Option<&'static str> {
    let parsed = Url::parse(url).ok()?;
    let domain = parsed.host_str()?.to_lowercase();

    const DOMAIN_RULES: &[(&[&str], &str)] = &[
        (&["github.com", "stackoverflow.com"], "💻"),
        (&["youtube.com", "netflix.com"], "🎬"),
        (&["amazon.com", "ebay.com"], "🛒"),
        (&["linkedin.com", "indeed.com"], "💼"),
        (&["twitter.com", "facebook.com"], "📱"),
        (&["news.", "bbc.com"], "📰"),
        (&["bank", "paypal.com"], "💰"),
    ];
    for (needles, icon) in DOMAIN_RULES {
        if needles.iter().any(|n| domain.contains(n)) {
            return Some(icon);
        }
    }
    None
}

/// Human-readable age of a Unix-millisecond timestamp.
pub fn format_relative_date(timestamp_ms: i64) -> String {
    let now_ms = Utc::now().timestamp_millis();
    let diff_days = (now_ms - timestamp_ms).abs() / (1000 * 60 * 60 * 24);

    match diff_days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        d if d < 7 => format!("{} days ago", d),
        d if d < 30 => format!("{} weeks ago", d / 7),
        d if d < 365 => format!("{} months ago", d / 30),
        d => format!("{} years ago", d / 365),
    }
}
