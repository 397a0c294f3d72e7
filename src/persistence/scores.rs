//! High score store: one JSON file per level

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::PersistenceError;
use crate::highscores::Score;

/// Load a level's leaderboard. A missing or empty file is an empty board.
pub fn load_high_scores(path: &Path) -> Result<Vec<Score>, PersistenceError> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("No high scores at {}, starting fresh", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(PersistenceError::io(path, e)),
    };

    if json.trim().is_empty() {
        return Ok(Vec::new());
    }

    let scores: Vec<Score> =
        serde_json::from_str(&json).map_err(|source| PersistenceError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    log::info!("Loaded {} high scores from {}", scores.len(), path.display());
    Ok(scores)
}

/// Save a level's leaderboard, creating the parent directory if needed
pub fn save_high_scores(scores: &[Score], path: &Path) -> Result<(), PersistenceError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| PersistenceError::io(dir, e))?;
    }
    let json = serde_json::to_string_pretty(scores).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|e| PersistenceError::io(path, e))?;
    log::info!("High scores saved to {} ({} entries)", path.display(), scores.len());
    Ok(())
}
