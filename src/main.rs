// gameshelf: one-shot importer from a Steam library to a Notion game list.
// Authenticates to both services, enumerates owned games with store
// enrichment, and writes one row per game into a fresh Notion database.

mod cache;
mod config;
mod console;
mod error;
mod game;
mod import;
mod notion;
mod retry;
mod steam;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::{CliArgs, Config};
use error::Result;
use import::{ImportSummary, run_import};
use notion::NotionClient;
use steam::{SteamLibrary, SteamUser, Storefront};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    let debug = args.debug;
    init_tracing(debug);

    match run(args).await {
        Ok(summary) => {
            console::success(&format!("Imported: {}/{}", summary.imported, summary.total));
            console::summary("Completed!");
        }
        Err(e) => {
            if debug {
                console::error(&format!("{}: {:#?}", e.kind(), e));
            } else {
                console::error(&format!("{}: {}", e.kind(), e));
            }
            std::process::exit(1);
        }
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("gameshelf=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gameshelf=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: CliArgs) -> Result<ImportSummary> {
    let config = Config::load(args)?;

    console::status("Logging into Notion...");
    let notion = NotionClient::login(&config.notion_token, &config.notion_page).await?;
    console::success("Logged into Notion!");

    console::status("Logging into Steam...");
    let user = SteamUser::login(&config.steam_key, &config.steam_user).await?;
    console::success("Logged into Steam!");

    let mut library = SteamLibrary::new(user, Storefront::new()?, cache::games_path());

    run_import(&mut library, &notion, &config.import_options()).await
}
