// Steam API response types.
// Defines structs for deserializing Web API and storefront responses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One entry from `IPlayerService/GetOwnedGames` with app info included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedGame {
    pub appid: u64,
    #[serde(default)]
    pub name: String,
    /// Lifetime playtime in minutes.
    #[serde(default)]
    pub playtime_forever: u64,
    #[serde(default)]
    pub img_icon_url: Option<String>,
    #[serde(default)]
    pub img_logo_url: Option<String>,
}

/// Envelope for the owned-games listing.
#[derive(Debug, Deserialize)]
pub struct OwnedGamesEnvelope {
    pub response: OwnedGamesResponse,
}

#[derive(Debug, Default, Deserialize)]
pub struct OwnedGamesResponse {
    #[serde(default)]
    pub game_count: u64,
    #[serde(default)]
    pub games: Vec<OwnedGame>,
}

/// Envelope for `ISteamUser/ResolveVanityURL`.
#[derive(Debug, Deserialize)]
pub struct ResolveVanityEnvelope {
    pub response: ResolveVanityResponse,
}

#[derive(Debug, Deserialize)]
pub struct ResolveVanityResponse {
    /// 1 on success, 42 ("no match") otherwise.
    pub success: i32,
    #[serde(default)]
    pub steamid: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Storefront `appdetails` response: app id (as a string) → per-app entry.
pub type AppDetailsEnvelope = HashMap<String, AppDetailsEntry>;

/// Per-app entry in the `appdetails` envelope.
///
/// `success: false` means the app has no store page (delisted or never
/// distributed through the store); `data` is absent in that case.
#[derive(Debug, Deserialize)]
pub struct AppDetailsEntry {
    pub success: bool,
    #[serde(default)]
    pub data: Option<StoreAppDetail>,
}

/// Storefront per-app metadata.
///
/// A wide projection of the store payload; only a handful of fields feed
/// `GameInfo` construction, the rest are carried along. The upstream schema
/// is not stable across apps, so everything beyond the name is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreAppDetail {
    #[serde(rename = "type", default)]
    pub app_type: Option<String>,
    pub name: String,
    #[serde(default)]
    pub steam_appid: Option<u64>,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub about_the_game: Option<String>,
    #[serde(default)]
    pub supported_languages: Option<String>,
    #[serde(default)]
    pub header_image: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub developers: Vec<String>,
    #[serde(default)]
    pub publishers: Vec<String>,
    #[serde(default)]
    pub dlc: Vec<u64>,
    #[serde(default)]
    pub platforms: HashMap<String, bool>,
    #[serde(default)]
    pub price_overview: Option<PriceOverview>,
    #[serde(default)]
    pub metacritic: Option<MetacriticScore>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub screenshots: Vec<Screenshot>,
    #[serde(default)]
    pub recommendations: Option<Recommendations>,
    #[serde(default)]
    pub achievements: Option<Achievements>,
    #[serde(default)]
    pub release_date: Option<ReleaseDate>,
    #[serde(default)]
    pub support_info: Option<SupportInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceOverview {
    pub currency: String,
    pub initial: u64,
    #[serde(rename = "final")]
    pub final_price: u64,
    #[serde(default)]
    pub discount_percent: u64,
    #[serde(default)]
    pub final_formatted: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetacriticScore {
    pub score: u32,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Screenshot {
    pub id: u64,
    #[serde(default)]
    pub path_thumbnail: Option<String>,
    #[serde(default)]
    pub path_full: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendations {
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievements {
    #[serde(default)]
    pub total: u64,
}

/// Release info; `date` is free-text and locale-dependent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseDate {
    #[serde(default)]
    pub coming_soon: bool,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportInfo {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_detail_tolerates_sparse_payload() {
        let json = r#"{"name": "Some Delisted Game"}"#;
        let detail: StoreAppDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.name, "Some Delisted Game");
        assert!(!detail.is_free);
        assert!(detail.header_image.is_none());
        assert!(detail.genres.is_empty());
    }

    #[test]
    fn test_app_detail_drops_unknown_fields() {
        let json = r#"{"name": "X", "brand_new_upstream_field": {"nested": true}}"#;
        let detail: StoreAppDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.name, "X");
    }

    #[test]
    fn test_appdetails_envelope_not_found_entry() {
        let json = r#"{"42": {"success": false}}"#;
        let envelope: AppDetailsEnvelope = serde_json::from_str(json).unwrap();
        let entry = &envelope["42"];
        assert!(!entry.success);
        assert!(entry.data.is_none());
    }

    #[test]
    fn test_owned_games_envelope() {
        let json = r#"{"response": {"game_count": 1, "games": [
            {"appid": 620, "name": "Portal 2", "playtime_forever": 754,
             "img_icon_url": "abc123", "img_logo_url": "def456"}
        ]}}"#;
        let envelope: OwnedGamesEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.response.games.len(), 1);
        assert_eq!(envelope.response.games[0].appid, 620);
        assert_eq!(envelope.response.games[0].playtime_forever, 754);
    }

    #[test]
    fn test_owned_games_empty_library() {
        // Private profiles return an empty response object.
        let json = r#"{"response": {}}"#;
        let envelope: OwnedGamesEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.response.games.is_empty());
    }
}
