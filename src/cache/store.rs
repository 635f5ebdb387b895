// Cache store for reading and writing fetched game records.
// One JSON object mapping app id to a serialized GameInfo record.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::game::GameInfo;

/// Read the whole cache map.
///
/// A missing or malformed file yields an empty map: the cache is an
/// optimization, never a correctness requirement.
pub fn load(path: &Path) -> HashMap<String, GameInfo> {
    let Ok(contents) = fs::read_to_string(path) else {
        return HashMap::new();
    };
    serde_json::from_str(&contents).unwrap_or_default()
}

/// Upsert one record keyed by its app id.
///
/// Reads the current contents, replaces the one entry, and rewrites the file.
/// Single-writer only; concurrent runs against the same file can race.
pub fn store(path: &Path, game: &GameInfo) -> Result<()> {
    let mut games = load(path);
    games.insert(game.id.to_string(), game.clone());
    write_map(path, &games)
}

fn write_map(path: &Path, games: &HashMap<String, GameInfo>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string(games)?;

    // Write atomically via temp file
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn game(id: u64, name: &str) -> GameInfo {
        GameInfo {
            id,
            name: name.to_string(),
            platforms: vec!["steam".to_string()],
            release_date: None,
            playtime: Some("never".to_string()),
            playtime_minutes: 0,
            logo_uri: None,
            bg_uri: None,
            icon_uri: None,
            free: Some(false),
            fetched_at: None,
        }
    }

    #[test]
    fn test_store_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("games.json");

        store(&path, &game(440, "Team Fortress 2")).unwrap();

        let games = load(&path);
        assert_eq!(games.len(), 1);
        assert_eq!(games["440"].name, "Team Fortress 2");
    }

    #[test]
    fn test_upsert_preserves_unrelated_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("games.json");

        store(&path, &game(440, "Team Fortress 2")).unwrap();
        store(&path, &game(620, "Portal 2")).unwrap();
        store(&path, &game(440, "Team Fortress 2 (renamed)")).unwrap();

        let games = load(&path);
        assert_eq!(games.len(), 2);
        assert_eq!(games["620"].name, "Portal 2");
        assert_eq!(games["440"].name, "Team Fortress 2 (renamed)");
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.json");
        assert!(load(&path).is_empty());
    }

    #[test]
    fn test_load_malformed_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("games.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load(&path).is_empty());
    }

    #[test]
    fn test_store_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("games.json");
        store(&path, &game(10, "Counter-Strike")).unwrap();
        assert_eq!(load(&path).len(), 1);
    }
}
