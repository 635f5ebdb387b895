// Run configuration.
// One explicit struct built at startup from CLI flags and environment
// variables; no global mutable state.

use clap::Parser;

use crate::error::{Result, ShelfError};
use crate::import::ImportOptions;
use crate::steam::library::FetchOptions;

/// Command-line surface. Tokens come from the environment, everything else
/// from flags.
#[derive(Parser, Debug)]
#[command(name = "gameshelf")]
#[command(about = "Import a Steam game library into a Notion game-list page")]
#[command(version)]
pub struct CliArgs {
    /// Steam user: steamid64, vanity name, or steamcommunity.com/id/{user} URL
    #[arg(long)]
    pub steam_user: Option<String>,

    /// Notion page id the game-list database is created under
    #[arg(long)]
    pub notion_page: Option<String>,

    /// Use the Steam store background as the game cover
    #[arg(long)]
    pub store_bg_cover: bool,

    /// Do not import games that are no longer on the Steam store
    #[arg(long)]
    pub skip_non_steam: bool,

    /// Never query the Steam store; fetch everything from the library
    #[arg(long)]
    pub use_only_library: bool,

    /// Do not import free2play games
    #[arg(long)]
    pub skip_free_steam: bool,

    /// Ignore previously cached fetched games
    #[arg(long)]
    pub steam_no_cache: bool,

    /// Verbose diagnostics; fatal errors print the raw error chain
    #[arg(long)]
    pub debug: bool,
}

/// Resolved configuration for one run.
#[derive(Debug)]
pub struct Config {
    pub notion_token: String,
    pub notion_page: String,
    pub steam_key: String,
    pub steam_user: String,
    pub store_bg_cover: bool,
    pub skip_non_steam: bool,
    pub use_only_library: bool,
    pub skip_free_steam: bool,
    pub steam_no_cache: bool,
}

impl Config {
    /// Build from CLI args with environment fallbacks.
    ///
    /// `NOTION_TOKEN` and `STEAM_TOKEN` are environment-only; `--steam-user`
    /// and `--notion-page` override `STEAM_USER` and `NOTION_PAGE`.
    pub fn load(args: CliArgs) -> Result<Self> {
        Self::from_parts(args, |key| std::env::var(key).ok())
    }

    fn from_parts(args: CliArgs, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let notion_token = env("NOTION_TOKEN").ok_or_else(|| {
            ShelfError::Auth(
                "Notion token not found. Set the NOTION_TOKEN environment variable.".to_string(),
            )
        })?;
        let steam_key = env("STEAM_TOKEN").ok_or_else(|| {
            ShelfError::Auth(
                "Steam API key not found. Set STEAM_TOKEN (get one at \
                 https://steamcommunity.com/dev/apikey)."
                    .to_string(),
            )
        })?;
        let notion_page = args.notion_page.or_else(|| env("NOTION_PAGE")).ok_or_else(|| {
            ShelfError::Config(
                "Notion parent page not set. Pass --notion-page or set NOTION_PAGE.".to_string(),
            )
        })?;
        let steam_user = args.steam_user.or_else(|| env("STEAM_USER")).ok_or_else(|| {
            ShelfError::Config(
                "Steam user not set. Pass --steam-user or set STEAM_USER.".to_string(),
            )
        })?;

        let config = Self {
            notion_token,
            notion_page,
            steam_key,
            steam_user,
            store_bg_cover: args.store_bg_cover,
            skip_non_steam: args.skip_non_steam,
            use_only_library: args.use_only_library,
            skip_free_steam: args.skip_free_steam,
            steam_no_cache: args.steam_no_cache,
        };
        config.fetch_options().validate()?;
        Ok(config)
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            skip_non_store: self.skip_non_steam,
            skip_free: self.skip_free_steam,
            library_only: self.use_only_library,
            no_cache: self.steam_no_cache,
            force_refresh: false,
        }
    }

    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            fetch: self.fetch_options(),
            use_bg_cover: self.store_bg_cover,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(extra: &[&str]) -> CliArgs {
        CliArgs::parse_from(std::iter::once("gameshelf").chain(extra.iter().copied()))
    }

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_env() -> HashMap<String, String> {
        env_of(&[
            ("NOTION_TOKEN", "nt"),
            ("NOTION_PAGE", "np"),
            ("STEAM_TOKEN", "st"),
            ("STEAM_USER", "su"),
        ])
    }

    fn load(args: CliArgs, env: &HashMap<String, String>) -> Result<Config> {
        Config::from_parts(args, |key| env.get(key).cloned())
    }

    #[test]
    fn test_env_fallbacks() {
        let config = load(args(&[]), &full_env()).unwrap();
        assert_eq!(config.steam_user, "su");
        assert_eq!(config.notion_page, "np");
        assert!(!config.store_bg_cover);
    }

    #[test]
    fn test_cli_overrides_env() {
        let config = load(
            args(&["--steam-user", "gabe", "--store-bg-cover"]),
            &full_env(),
        )
        .unwrap();
        assert_eq!(config.steam_user, "gabe");
        assert!(config.store_bg_cover);
    }

    #[test]
    fn test_missing_token_is_auth_error() {
        let env = env_of(&[("STEAM_TOKEN", "st"), ("STEAM_USER", "su"), ("NOTION_PAGE", "np")]);
        assert!(matches!(
            load(args(&[]), &env),
            Err(ShelfError::Auth(_))
        ));
    }

    #[test]
    fn test_missing_user_is_config_error() {
        let env = env_of(&[
            ("NOTION_TOKEN", "nt"),
            ("NOTION_PAGE", "np"),
            ("STEAM_TOKEN", "st"),
        ]);
        assert!(matches!(load(args(&[]), &env), Err(ShelfError::Config(_))));
    }

    #[test]
    fn test_contradictory_flags_rejected_at_startup() {
        let result = load(
            args(&["--use-only-library", "--skip-non-steam"]),
            &full_env(),
        );
        assert!(matches!(result, Err(ShelfError::Config(_))));
    }
}
