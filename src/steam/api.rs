// Steam Web API HTTP client.
// Handles key authentication, user resolution, and the owned-games listing.

use reqwest::{
    Client, Response, StatusCode,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::debug;

use crate::error::{Result, ShelfError};

use super::library::LibrarySource;
use super::types::{OwnedGame, OwnedGamesEnvelope, ResolveVanityEnvelope};

const STEAM_API_BASE: &str = "https://api.steampowered.com";
const PROFILE_URL_PREFIX: &str = "steamcommunity.com/id/";

/// Steam Web API client holding the operator's API key.
pub struct SteamApi {
    client: Client,
    api_key: String,
}

impl SteamApi {
    /// Create a new client with the given Web API key.
    pub fn new(api_key: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("gameshelf"));

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
        })
    }

    /// Make a GET request against a Web API interface method.
    async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Response> {
        let url = format!("{}{}", STEAM_API_BASE, endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("format", "json")])
            .query(params)
            .send()
            .await?;

        self.check_response(response).await
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        match response.status() {
            StatusCode::OK => Ok(response),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ShelfError::Auth(
                "invalid or revoked Steam API key".to_string(),
            )),
            StatusCode::NOT_FOUND => Err(ShelfError::NotFound(response.url().to_string())),
            status => Err(ShelfError::Transient(format!(
                "HTTP {}: {}",
                status,
                response.text().await.unwrap_or_default()
            ))),
        }
    }

    /// Resolve a user id or vanity profile name to a steamid64.
    ///
    /// Accepts a raw steamid64, a vanity name, or a full
    /// `steamcommunity.com/id/{name}` profile URL.
    pub async fn resolve_user(&self, user: &str) -> Result<u64> {
        let user = user.trim().trim_end_matches('/');
        if !user.is_empty() && user.chars().all(|c| c.is_ascii_digit()) {
            return user
                .parse()
                .map_err(|_| ShelfError::NotFound(format!("Steam user {}", user)));
        }

        let vanity = match user.find(PROFILE_URL_PREFIX) {
            Some(pos) => &user[pos + PROFILE_URL_PREFIX.len()..],
            None => user,
        };

        let response = self
            .get(
                "/ISteamUser/ResolveVanityURL/v1/",
                &[("vanityurl", vanity.to_string())],
            )
            .await?;
        let envelope: ResolveVanityEnvelope = response.json().await?;

        match envelope.response.steamid {
            Some(id) if envelope.response.success == 1 => id
                .parse()
                .map_err(|_| ShelfError::NotFound(format!("Steam user {}", vanity))),
            _ => {
                let detail = envelope.response.message.unwrap_or_default();
                Err(ShelfError::NotFound(format!(
                    "Steam user {} {}",
                    vanity, detail
                )))
            }
        }
    }

    /// List the games a user owns, with app info included.
    pub async fn owned_games(&self, steamid: u64) -> Result<Vec<OwnedGame>> {
        let response = self
            .get(
                "/IPlayerService/GetOwnedGames/v1/",
                &[
                    ("steamid", steamid.to_string()),
                    ("include_appinfo", "1".to_string()),
                    ("include_played_free_games", "1".to_string()),
                ],
            )
            .await?;
        let envelope: OwnedGamesEnvelope = response.json().await?;
        debug!(count = envelope.response.game_count, "owned games listed");
        Ok(envelope.response.games)
    }
}

/// A resolved Steam user: API client plus steamid64.
pub struct SteamUser {
    api: SteamApi,
    pub steamid: u64,
}

impl SteamUser {
    /// Authenticate with an API key and resolve the target user.
    pub async fn login(api_key: &str, user: &str) -> Result<Self> {
        let api = SteamApi::new(api_key)?;
        let steamid = api.resolve_user(user).await?;
        Ok(Self { api, steamid })
    }
}

impl LibrarySource for SteamUser {
    async fn owned_games(&self) -> Result<Vec<OwnedGame>> {
        self.api.owned_games(self.steamid).await
    }
}
