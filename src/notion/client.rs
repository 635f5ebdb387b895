// Notion REST API client.
// Creates the game-list database and one page (row) per imported game.

use reqwest::{
    Client, Response, StatusCode,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{Result, ShelfError};
use crate::game::GameInfo;
use crate::import::Destination;

use super::types::{CreatedObject, NotionUser};

const NOTION_API_BASE: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";
const DATABASE_ICON: &str = "\u{1F47E}"; // 👾

/// Notion API client bound to one integration token and parent page.
pub struct NotionClient {
    client: Client,
    parent_page_id: String,
}

impl NotionClient {
    /// Create a client and validate the token against `GET /users/me`.
    pub async fn login(token: &str, parent_page_id: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ShelfError::Auth("Notion token is not a valid header value".to_string()))?,
        );
        headers.insert("Notion-Version", HeaderValue::from_static(NOTION_VERSION));

        let client = Client::builder().default_headers(headers).build()?;
        let notion = Self {
            client,
            parent_page_id: parent_page_id.to_string(),
        };
        let bot = notion.me().await?;
        debug!(bot_id = %bot.id, bot_name = ?bot.name, "Notion token validated");
        Ok(notion)
    }

    /// Validate the token by fetching the integration's bot user.
    async fn me(&self) -> Result<NotionUser> {
        let response = self
            .client
            .get(format!("{}/users/me", NOTION_API_BASE))
            .send()
            .await?;
        let response = self.check_response(response).await?;
        Ok(response.json().await?)
    }

    async fn post(&self, endpoint: &str, body: &Value) -> Result<Response> {
        let response = self
            .client
            .post(format!("{}{}", NOTION_API_BASE, endpoint))
            .json(body)
            .send()
            .await?;
        self.check_response(response).await
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        match response.status() {
            StatusCode::OK | StatusCode::CREATED => Ok(response),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ShelfError::Auth(
                "invalid or expired Notion token".to_string(),
            )),
            StatusCode::NOT_FOUND => Err(ShelfError::NotFound(format!(
                "Notion object at {} (is the page shared with the integration?)",
                response.url()
            ))),
            status => Err(ShelfError::Transient(format!(
                "HTTP {}: {}",
                status,
                response.text().await.unwrap_or_default()
            ))),
        }
    }
}

impl Destination for NotionClient {
    /// Create the game-list database under the configured parent page.
    async fn create_collection(&self, title: &str, description: &str) -> Result<String> {
        let body = database_body(&self.parent_page_id, title, description);
        let response = self.post("/databases", &body).await?;
        let created: CreatedObject = response.json().await?;
        Ok(created.id)
    }

    /// Add one row for a game, with its icon and optional cover art.
    async fn add_row(&self, collection_id: &str, game: &GameInfo, use_bg_cover: bool) -> Result<String> {
        let body = row_body(collection_id, game, use_bg_cover);
        let response = self.post("/pages", &body).await?;
        let created: CreatedObject = response.json().await?;
        Ok(created.id)
    }
}

/// `POST /databases` body: title, description, icon, and the column schema.
fn database_body(parent_page_id: &str, title: &str, description: &str) -> Value {
    json!({
        "parent": {"type": "page_id", "page_id": parent_page_id},
        "icon": {"type": "emoji", "emoji": DATABASE_ICON},
        "title": [{"type": "text", "text": {"content": title}}],
        "description": [{"type": "text", "text": {"content": description}}],
        "properties": {
            "Title": {"title": {}},
            "Status": {"select": {"options": [
                {"name": "Completed", "color": "green"}
            ]}},
            "Score": {"select": {"options": [
                {"name": "10", "color": "green"},
                {"name": "1", "color": "red"}
            ]}},
            "Platforms": {"multi_select": {"options": [
                {"name": "steam", "color": "gray"},
                {"name": "switch", "color": "red"},
                {"name": "ps4", "color": "blue"}
            ]}},
            "Release date": {"rich_text": {}},
            "Playtime": {"rich_text": {}},
            "Notes": {"rich_text": {}},
            "Time": {"date": {}}
        }
    })
}

/// `POST /pages` body for one game row.
fn row_body(database_id: &str, game: &GameInfo, use_bg_cover: bool) -> Value {
    let mut properties = json!({
        "Title": {"title": [{"text": {"content": game.name}}]},
        "Platforms": {"multi_select":
            game.platforms.iter().map(|p| json!({"name": p})).collect::<Vec<_>>()
        },
    });

    if let Some(release_date) = &game.release_date {
        properties["Release date"] = json!({"rich_text": [{"text": {"content": release_date}}]});
    }
    if let Some(playtime) = &game.playtime {
        properties["Playtime"] = json!({"rich_text": [{"text": {"content": playtime}}]});
    }

    let mut body = json!({
        "parent": {"database_id": database_id},
        "properties": properties,
    });

    if let Some(icon) = &game.icon_uri {
        body["icon"] = json!({"type": "external", "external": {"url": icon}});
    }

    // The store background is richer art; fall back to the header image.
    let cover = if use_bg_cover {
        game.bg_uri.as_ref().or(game.logo_uri.as_ref())
    } else {
        game.logo_uri.as_ref()
    };
    if let Some(cover) = cover {
        body["cover"] = json!({"type": "external", "external": {"url": cover}});
    }

    body
}
