// Import orchestrator.
// Drives enumerate → sort → create destination collection → write rows → summary.

use tracing::warn;

use crate::console;
use crate::error::{Result, ShelfError};
use crate::game::GameInfo;
use crate::steam::library::{FetchOptions, LibrarySource, SteamLibrary};
use crate::steam::storefront::DetailTransport;

/// The destination document platform, reduced to what the importer needs.
/// `NotionClient` is the production implementation.
pub trait Destination {
    /// Create the titled collection that will hold one row per game.
    async fn create_collection(&self, title: &str, description: &str) -> Result<String>;

    /// Add one row; returns the created row id.
    async fn add_row(&self, collection_id: &str, game: &GameInfo, use_bg_cover: bool)
    -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub fetch: FetchOptions,
    /// Use the store background as the row cover instead of the header image.
    pub use_bg_cover: bool,
    pub page_title: String,
    pub page_description: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            fetch: FetchOptions::default(),
            use_bg_cover: false,
            page_title: "Notion Game List".to_string(),
            page_description: "My game list".to_string(),
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct ImportSummary {
    pub imported: usize,
    pub total: usize,
    /// Names of games whose row writes failed, sorted by name.
    pub failed: Vec<String>,
}

/// Run the end-to-end import.
///
/// Fatal outcomes: empty library (before any destination call) and zero
/// successful row writes. Individual row failures are collected and reported,
/// never fatal.
pub async fn run_import<L, T, D>(
    library: &mut SteamLibrary<L, T>,
    destination: &D,
    options: &ImportOptions,
) -> Result<ImportSummary>
where
    L: LibrarySource,
    T: DetailTransport,
    D: Destination,
{
    console::status("Getting Steam library games...");
    let ids = library.game_ids(options.fetch).await?;

    let mut games = Vec::with_capacity(ids.len());
    for id in ids {
        games.push(library.game_info(id, options.fetch).await?);
    }

    let unavailable = library.store_unavailable().len();
    if unavailable > 0 {
        console::note(&format!(
            "{} games fell back to library-only details (store unavailable)",
            unavailable
        ));
    }

    // Stable, case-sensitive byte order; ties keep enumeration order.
    games.sort_by(|a, b| a.name.cmp(&b.name));

    if games.is_empty() {
        return Err(ShelfError::NoData("no steam games found".to_string()));
    }
    console::success(&format!("Got {} games!", games.len()));

    console::status("Creating Notion game page...");
    let collection_id = destination
        .create_collection(&options.page_title, &options.page_description)
        .await?;
    console::success("Created!");

    console::status("Importing steam library games to Notion...");
    let total = games.len();
    let mut failed = Vec::new();
    for (index, game) in games.iter().enumerate() {
        console::progress(index + 1, total, &game.name);
        if let Err(e) = destination
            .add_row(&collection_id, game, options.use_bg_cover)
            .await
        {
            warn!(game = %game.name, error = %e, "row write failed");
            failed.push(game.name.clone());
        }
    }
    console::clear_progress();

    let imported = total - failed.len();
    if imported == 0 {
        return Err(ShelfError::NoData(
            "no games were imported to Notion".to_string(),
        ));
    }

    failed.sort();
    if !failed.is_empty() {
        console::warn("Not imported games:");
        for name in &failed {
            console::warn(&format!("- {}", name));
        }
    }

    Ok(ImportSummary {
        imported,
        total,
        failed,
    })
}
