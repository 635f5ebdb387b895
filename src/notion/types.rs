// Notion API response types.
// Only the fields the importer reads; Notion returns far more.

use serde::Deserialize;

/// The bot user behind the integration token, from `GET /users/me`.
#[derive(Debug, Deserialize)]
pub struct NotionUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Any created object (database or page); only the id is needed.
#[derive(Debug, Deserialize)]
pub struct CreatedObject {
    pub id: String,
}
