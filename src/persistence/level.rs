//! Level file loader
//!
//! ```text
//! # comment
//! 0
//! 20	50	50	100	H	0	false
//! ```
//! First content line is the level number, every following line one
//! pac-man: diameter, x, y, wait ms, direction, bounces, stopped.

use std::fs;
use std::path::Path;

use super::{PersistenceError, content_lines, parse_pacman_line};
use crate::consts::MAX_LEVEL;
use crate::sim::state::PacmanRecord;

/// Contents of a level file
#[derive(Debug, Clone, PartialEq)]
pub struct LevelData {
    pub level: u32,
    pub pacmen: Vec<PacmanRecord>,
}

/// Read and parse a level file
pub fn load_level(path: &Path) -> Result<LevelData, PersistenceError> {
    let text = fs::read_to_string(path).map_err(|e| PersistenceError::io(path, e))?;
    parse_level(&text, path)
}

/// Parse level file text. `path` is only used in messages.
pub fn parse_level(text: &str, path: &Path) -> Result<LevelData, PersistenceError> {
    let mut lines = content_lines(text);

    let (line_no, header) = lines.next().ok_or_else(|| PersistenceError::MissingLevel {
        path: path.to_path_buf(),
    })?;
    let raw: i64 = header.parse().map_err(|_| PersistenceError::InvalidLevel {
        path: path.to_path_buf(),
        line: line_no,
        value: header.to_string(),
    })?;
    let level = match u32::try_from(raw) {
        Ok(level) if level <= MAX_LEVEL => level,
        _ => {
            log::warn!(
                "{} line {}: level {} out of range, defaulting to 0",
                path.display(),
                line_no,
                raw
            );
            0
        }
    };

    let pacmen: Vec<PacmanRecord> = lines
        .filter_map(|(line_no, line)| parse_pacman_line(path, line_no, line, false))
        .collect();

    log::info!(
        "Loaded level {} from {} with {} pac-men",
        level,
        path.display(),
        pacmen.len()
    );
    Ok(LevelData { level, pacmen })
}
