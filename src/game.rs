// Canonical enriched game record.
// Built from Steam library fields merged with optional storefront metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One owned game, enriched with store metadata when available.
///
/// Every optional field tolerates absence when deserialized so cache records
/// written by older versions still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameInfo {
    /// Steam app id, unique within one enumeration session.
    pub id: u64,
    /// Display title.
    pub name: String,
    /// Source platform tags (currently always `["steam"]`).
    #[serde(default)]
    pub platforms: Vec<String>,
    /// Free-text release date from the store; absent for library-only records.
    #[serde(default)]
    pub release_date: Option<String>,
    /// Human-readable playtime ("never", "90 minutes", "12 hours").
    #[serde(default)]
    pub playtime: Option<String>,
    /// Raw playtime in minutes; 0 when unknown.
    #[serde(default)]
    pub playtime_minutes: u64,
    /// Header/capsule art; store image preferred over the library logo.
    #[serde(default)]
    pub logo_uri: Option<String>,
    /// Store background art.
    #[serde(default)]
    pub bg_uri: Option<String>,
    /// Small library icon.
    #[serde(default)]
    pub icon_uri: Option<String>,
    /// Free-to-play flag; `None` when the store lookup did not succeed.
    #[serde(default)]
    pub free: Option<bool>,
    /// When store metadata was fetched; only set on store-backed records.
    #[serde(default)]
    pub fetched_at: Option<DateTime<Utc>>,
}

impl GameInfo {
    /// True when this record carries store metadata rather than being a
    /// library-only fallback.
    pub fn store_backed(&self) -> bool {
        self.fetched_at.is_some()
    }
}

/// Humanize a raw playtime-in-minutes counter.
pub fn format_playtime(minutes: u64) -> String {
    if minutes == 0 {
        "never".to_string()
    } else if minutes < 120 {
        format!("{} minutes", minutes)
    } else {
        format!("{} hours", minutes / 60)
    }
}
