// Notion module.
// REST client and response types for the destination game-list database.

pub mod client;
pub mod types;

pub use client::NotionClient;
