// Cache path utilities.
// Locates the per-user cache file for fetched game records.

use std::path::PathBuf;

use directories::ProjectDirs;

/// Get the base cache directory (~/.cache/gameshelf on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gameshelf").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to the fetched-games cache file.
pub fn games_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("games.json"))
}
