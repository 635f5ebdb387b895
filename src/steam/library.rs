// Steam library enumerator.
// Merges the raw owned-games listing with storefront metadata into GameInfo
// records, applying skip policies, the on-disk cache, and per-item fallback.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::Utc;
use tracing::{debug, warn};

use crate::cache;
use crate::console;
use crate::error::{Result, ShelfError};
use crate::game::{GameInfo, format_playtime};

use super::storefront::{DetailTransport, Storefront};
use super::types::{OwnedGame, StoreAppDetail};

pub const PLATFORM: &str = "steam";

const IMAGE_HOST: &str = "http://media.steampowered.com/steamcommunity/public/images/apps";

/// Provider of the raw owned-games listing; the test seam for the Web API.
pub trait LibrarySource {
    async fn owned_games(&self) -> Result<Vec<OwnedGame>>;
}

/// Enumeration flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOptions {
    /// Omit games the store reports as having no page, instead of falling
    /// back to library-only records.
    pub skip_non_store: bool,
    /// Omit free-to-play games (post-enrichment, and on cache preload).
    pub skip_free: bool,
    /// Never query the store; every record is library-only.
    pub library_only: bool,
    /// Ignore the on-disk cache for this run.
    pub no_cache: bool,
    /// Re-run enumeration even if already populated this session.
    pub force_refresh: bool,
}

impl FetchOptions {
    /// Reject contradictory flag combinations up front.
    ///
    /// `library_only` never queries the store, so a store-based skip policy
    /// has nothing to act on.
    pub fn validate(&self) -> Result<()> {
        if self.library_only && self.skip_non_store {
            return Err(ShelfError::Config(
                "--use-only-library and --skip-non-steam are mutually exclusive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outcome of one per-item store lookup, after policy is applied.
enum StoreLookup {
    Hit(StoreAppDetail),
    /// No store page; build a library-only record and warn.
    Missing,
    /// Retries exhausted; build a library-only record.
    Unavailable,
    /// No store page and `skip_non_store` is set; drop the item.
    Skipped,
}

/// One user's game library for the duration of a run.
///
/// Owns the id→GameInfo map, populated at most once per session. Re-running
/// enumeration for an already-resolved id is a no-op.
pub struct SteamLibrary<L: LibrarySource, T: DetailTransport> {
    source: L,
    store: Storefront<T>,
    cache_path: Option<PathBuf>,
    games: HashMap<u64, GameInfo>,
    /// Enumeration order of `games` keys; ties in later sorts keep it.
    order: Vec<u64>,
    /// Ids whose store lookups exhausted their retry budget this session.
    store_unavailable: Vec<u64>,
    populated: bool,
}

impl<L: LibrarySource, T: DetailTransport> SteamLibrary<L, T> {
    pub fn new(source: L, store: Storefront<T>, cache_path: Option<PathBuf>) -> Self {
        Self {
            source,
            store,
            cache_path,
            games: HashMap::new(),
            order: Vec::new(),
            store_unavailable: Vec::new(),
            populated: false,
        }
    }

    /// Game ids in enumeration order, populating the library if needed.
    pub async fn game_ids(&mut self, options: FetchOptions) -> Result<Vec<u64>> {
        self.populate(options).await?;
        Ok(self.order.clone())
    }

    /// Look up a resolved record, populating the library if needed.
    pub async fn game_info(&mut self, game_id: u64, options: FetchOptions) -> Result<GameInfo> {
        self.populate(options).await?;
        self.games
            .get(&game_id)
            .cloned()
            .ok_or_else(|| ShelfError::NotFound(format!("game with id {}", game_id)))
    }

    /// Ids that fell back to library-only data after exhausting store retries.
    pub fn store_unavailable(&self) -> &[u64] {
        &self.store_unavailable
    }

    async fn populate(&mut self, options: FetchOptions) -> Result<()> {
        if self.populated && !options.force_refresh {
            return Ok(());
        }
        options.validate()?;

        self.games.clear();
        self.order.clear();
        self.store_unavailable.clear();

        if !options.no_cache {
            self.preload_from_cache(options);
        }

        let owned = self.source.owned_games().await?;
        let total = owned.len();

        for (index, owned_game) in owned.into_iter().enumerate() {
            console::progress(index + 1, total, &owned_game.name);

            if self.games.contains_key(&owned_game.appid) {
                debug!(appid = owned_game.appid, "already resolved, skipping");
                continue;
            }

            let lookup = self.lookup_store(&owned_game, options).await?;

            let detail = match lookup {
                StoreLookup::Hit(detail) => Some(detail),
                StoreLookup::Missing | StoreLookup::Unavailable => None,
                StoreLookup::Skipped => continue,
            };

            let game = build_game_info(&owned_game, detail);

            if game.store_backed() && !options.no_cache {
                self.persist(&game);
            }

            if options.skip_free && game.free == Some(true) {
                debug!(appid = game.id, "free game, skipping");
                continue;
            }

            self.order.push(game.id);
            self.games.insert(game.id, game);
        }

        console::clear_progress();
        self.populated = true;
        Ok(())
    }

    /// Pre-populate the session map from the on-disk cache.
    fn preload_from_cache(&mut self, options: FetchOptions) {
        let Some(path) = &self.cache_path else {
            return;
        };

        for (key, game) in cache::load(path) {
            let Ok(id) = key.parse::<u64>() else {
                warn!(key, "ignoring cache record with non-numeric id");
                continue;
            };
            if options.skip_free && game.free == Some(true) {
                continue;
            }
            if self.games.insert(id, game).is_none() {
                self.order.push(id);
            }
        }
        debug!(count = self.games.len(), "preloaded records from cache");
    }

    async fn lookup_store(
        &mut self,
        owned_game: &OwnedGame,
        options: FetchOptions,
    ) -> Result<StoreLookup> {
        if options.library_only {
            return Ok(StoreLookup::Missing);
        }

        match self.store.app_details(owned_game.appid).await {
            Ok(Some(detail)) => Ok(StoreLookup::Hit(detail)),
            Ok(None) => {
                self.store_unavailable.push(owned_game.appid);
                console::clear_progress();
                console::warn(&format!(
                    "Store data unavailable for {} id:{}, using library details",
                    owned_game.name, owned_game.appid
                ));
                Ok(StoreLookup::Unavailable)
            }
            Err(ShelfError::NotFound(_)) => {
                console::clear_progress();
                if options.skip_non_store {
                    console::note(&format!(
                        "Game {} id:{} not found in Steam store, skip it",
                        owned_game.name, owned_game.appid
                    ));
                    Ok(StoreLookup::Skipped)
                } else {
                    console::warn(&format!(
                        "Game {} id:{} not found in Steam store, fetching details from library",
                        owned_game.name, owned_game.appid
                    ));
                    Ok(StoreLookup::Missing)
                }
            }
            Err(e) => Err(e),
        }
    }

    fn persist(&self, game: &GameInfo) {
        let Some(path) = &self.cache_path else {
            return;
        };
        if let Err(e) = cache::store(path, game) {
            warn!(appid = game.id, error = %e, "failed to persist game to cache");
        }
    }
}

fn image_link(app_id: u64, img_hash: &str) -> String {
    format!("{}/{}/{}.jpg", IMAGE_HOST, app_id, img_hash)
}

/// Merge library fields with optional store metadata.
///
/// Library fields are always available; release date and the free flag come
/// only from the store and stay unset on fallback records. The store header
/// image wins over the derived library logo.
fn build_game_info(owned: &OwnedGame, detail: Option<StoreAppDetail>) -> GameInfo {
    let library_logo = owned
        .img_logo_url
        .as_deref()
        .filter(|hash| !hash.is_empty())
        .map(|hash| image_link(owned.appid, hash));
    let icon_uri = owned
        .img_icon_url
        .as_deref()
        .filter(|hash| !hash.is_empty())
        .map(|hash| image_link(owned.appid, hash));

    let detail = detail.as_ref();
    let store_logo = detail.and_then(|d| d.header_image.clone());

    GameInfo {
        id: owned.appid,
        name: owned.name.clone(),
        platforms: vec![PLATFORM.to_string()],
        release_date: detail.and_then(|d| d.release_date.as_ref()).and_then(|r| r.date.clone()),
        playtime: Some(format_playtime(owned.playtime_forever)),
        playtime_minutes: owned.playtime_forever,
        logo_uri: store_logo.or(library_logo),
        bg_uri: detail.and_then(|d| d.background.clone()),
        icon_uri,
        free: detail.map(|d| d.is_free),
        fetched_at: detail.map(|_| Utc::now()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steam::storefront::testutil::{FakeTransport, Outcome, detail, fast_retry};
    use tempfile::TempDir;

    struct FakeSource {
        games: Vec<OwnedGame>,
    }

    impl LibrarySource for FakeSource {
        async fn owned_games(&self) -> Result<Vec<OwnedGame>> {
            Ok(self.games.clone())
        }
    }

    fn owned(appid: u64, name: &str, playtime: u64) -> OwnedGame {
        OwnedGame {
            appid,
            name: name.to_string(),
            playtime_forever: playtime,
            img_icon_url: Some(format!("icon{}", appid)),
            img_logo_url: Some(format!("logo{}", appid)),
        }
    }

    fn library(
        games: Vec<OwnedGame>,
        outcomes: HashMap<u64, Outcome>,
        cache_path: Option<PathBuf>,
    ) -> SteamLibrary<FakeSource, FakeTransport> {
        SteamLibrary::new(
            FakeSource { games },
            Storefront::with_transport(FakeTransport::new(outcomes), fast_retry(1)),
            cache_path,
        )
    }

    fn transport<'a>(lib: &'a SteamLibrary<FakeSource, FakeTransport>) -> &'a FakeTransport {
        // Storefront exposes no transport accessor; reach through for tests.
        lib.store.transport_for_tests()
    }

    #[tokio::test(start_paused = true)]
    async fn test_library_only_never_queries_store() {
        let mut lib = library(
            vec![owned(1, "A", 0), owned(2, "B", 200)],
            HashMap::from([(1, Outcome::Ok(detail("A", false)))]),
            None,
        );
        let options = FetchOptions {
            library_only: true,
            ..Default::default()
        };

        let ids = lib.game_ids(options).await.unwrap();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(transport(&lib).total_calls(), 0);

        let info = lib.game_info(2, options).await.unwrap();
        assert_eq!(info.release_date, None);
        assert_eq!(info.free, None);
        assert_eq!(info.playtime.as_deref(), Some("3 hours"));
        assert!(!info.store_backed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_falls_back_and_caches_only_store_hits() {
        let temp_dir = TempDir::new().unwrap();
        let cache_path = temp_dir.path().join("games.json");
        let mut lib = library(
            vec![owned(1, "One", 30), owned(2, "Two", 0), owned(3, "Three", 500)],
            HashMap::from([
                (1, Outcome::Ok(detail("One", false))),
                (2, Outcome::NotFound),
                (3, Outcome::Ok(detail("Three", false))),
            ]),
            Some(cache_path.clone()),
        );

        let ids = lib.game_ids(FetchOptions::default()).await.unwrap();
        assert_eq!(ids, vec![1, 2, 3]);

        let two = lib.game_info(2, FetchOptions::default()).await.unwrap();
        assert_eq!(two.release_date, None);
        assert_eq!(two.free, None);
        assert_eq!(two.logo_uri.as_deref(), Some(
            "http://media.steampowered.com/steamcommunity/public/images/apps/2/logo2.jpg"
        ));

        let cached = cache::load(&cache_path);
        assert_eq!(cached.len(), 2);
        assert!(cached.contains_key("1"));
        assert!(cached.contains_key("3"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_non_store_omits_missing_items() {
        let mut lib = library(
            vec![owned(1, "One", 0), owned(2, "Two", 0)],
            HashMap::from([(1, Outcome::Ok(detail("One", false))), (2, Outcome::NotFound)]),
            None,
        );
        let options = FetchOptions {
            skip_non_store: true,
            ..Default::default()
        };

        let ids = lib.game_ids(options).await.unwrap();
        assert_eq!(ids, vec![1]);
        assert!(matches!(
            lib.game_info(2, options).await,
            Err(ShelfError::NotFound(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_unavailable_falls_back_and_is_recorded() {
        let mut lib = library(
            vec![owned(7, "Flaky", 10)],
            HashMap::from([(7, Outcome::Transient)]),
            None,
        );

        let ids = lib.game_ids(FetchOptions::default()).await.unwrap();
        assert_eq!(ids, vec![7]);
        assert_eq!(lib.store_unavailable(), &[7]);

        let info = lib.game_info(7, FetchOptions::default()).await.unwrap();
        assert_eq!(info.free, None);
        assert!(!info.store_backed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_free_filters_enrichment_and_preload() {
        let temp_dir = TempDir::new().unwrap();
        let cache_path = temp_dir.path().join("games.json");

        // First run caches a free and a paid game.
        let mut lib = library(
            vec![owned(1, "Paid", 0), owned(2, "Free", 0)],
            HashMap::from([
                (1, Outcome::Ok(detail("Paid", false))),
                (2, Outcome::Ok(detail("Free", true))),
            ]),
            Some(cache_path.clone()),
        );
        let options = FetchOptions {
            skip_free: true,
            ..Default::default()
        };
        let ids = lib.game_ids(options).await.unwrap();
        assert_eq!(ids, vec![1]);
        // The free game was still cached (persist precedes the filter).
        assert_eq!(cache::load(&cache_path).len(), 2);

        // Second session preloads from cache; the free record stays out.
        let mut lib = library(vec![], HashMap::new(), Some(cache_path));
        let ids = lib.game_ids(options).await.unwrap();
        assert_eq!(ids, vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_preload_skips_refetch() {
        let temp_dir = TempDir::new().unwrap();
        let cache_path = temp_dir.path().join("games.json");

        let mut lib = library(
            vec![owned(1, "One", 0)],
            HashMap::from([(1, Outcome::Ok(detail("One", false)))]),
            Some(cache_path.clone()),
        );
        lib.game_ids(FetchOptions::default()).await.unwrap();
        assert_eq!(transport(&lib).total_calls(), 1);

        // Fresh session: the cached record suppresses the store lookup.
        let mut lib = library(
            vec![owned(1, "One", 0)],
            HashMap::from([(1, Outcome::Ok(detail("One", false)))]),
            Some(cache_path),
        );
        lib.game_ids(FetchOptions::default()).await.unwrap();
        assert_eq!(transport(&lib).total_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enumeration_is_idempotent_per_session() {
        let mut lib = library(
            vec![owned(1, "One", 0)],
            HashMap::from([(1, Outcome::Ok(detail("One", false)))]),
            None,
        );

        lib.game_ids(FetchOptions::default()).await.unwrap();
        lib.game_ids(FetchOptions::default()).await.unwrap();
        assert_eq!(transport(&lib).total_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_force_refresh_reenumerates() {
        let mut lib = library(
            vec![owned(1, "One", 0)],
            HashMap::from([(1, Outcome::Ok(detail("One", false)))]),
            None,
        );

        lib.game_ids(FetchOptions::default()).await.unwrap();
        let options = FetchOptions {
            force_refresh: true,
            ..Default::default()
        };
        lib.game_ids(options).await.unwrap();
        // Second enumeration hits the storefront memo, not the transport.
        assert_eq!(transport(&lib).total_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_contradictory_flags_rejected() {
        let mut lib = library(vec![], HashMap::new(), None);
        let options = FetchOptions {
            library_only: true,
            skip_non_store: true,
            ..Default::default()
        };
        assert!(matches!(
            lib.game_ids(options).await,
            Err(ShelfError::Config(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_fields_win_over_library_fields() {
        let mut lib = library(
            vec![owned(620, "Portal 2", 754)],
            HashMap::from([(620, Outcome::Ok(detail("Portal 2", false)))]),
            None,
        );

        let info = lib.game_info(620, FetchOptions::default()).await.unwrap();
        assert_eq!(
            info.logo_uri.as_deref(),
            Some("https://cdn.example/Portal 2/header.jpg")
        );
        assert_eq!(info.release_date.as_deref(), Some("19 Apr, 2011"));
        assert_eq!(info.free, Some(false));
        assert_eq!(info.bg_uri.as_deref(), Some("https://cdn.example/Portal 2/bg.jpg"));
        assert_eq!(
            info.icon_uri.as_deref(),
            Some("http://media.steampowered.com/steamcommunity/public/images/apps/620/icon620.jpg")
        );
        assert!(info.store_backed());
    }
}
