//! In-memory generation history.

use chrono::{DateTime, Utc};

use crate::params::Mode;

/// Prompt recorded when the user submitted an empty one.
pub const FALLBACK_PROMPT: &str = "AI generated content";

/// One successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    /// Unique, time-derived identifier.
    pub id: String,
    /// Mode at creation time.
    pub kind: Mode,
    /// Data URI of the generated image.
    pub url: String,
    /// Prompt the image was generated from.
    pub prompt: String,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

/// Items whose prompt contains `query`, case-insensitively, in stored order.
#[must_use]
pub fn filter_history<'a>(items: &'a [HistoryItem], query: &str) -> Vec<&'a HistoryItem> {
    let needle = query.to_lowercase();
    items.iter().filter(|item| item.prompt.to_lowercase().contains(&needle)).collect()
}

/// "Just now", "5m ago", "3h ago", or the calendar date.
#[must_use]
pub fn format_relative(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed_ms = (now - at).num_milliseconds();
    let minutes = (elapsed_ms + 30_000).div_euclid(60_000);

    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    at.format("%Y-%m-%d").to_string()
}
