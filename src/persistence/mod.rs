//! Level files, save files and the high-score store
//!
//! Text formats are parsed permissively: a malformed pac-man line is
//! logged and skipped, only a broken header fails the whole load.
//!
//! The simulation never calls into this module directly. Its request
//! methods take loader and writer closures, and these functions are the
//! ones the binary passes in.

pub mod level;
pub mod save;
pub mod scores;

use std::path::{Path, PathBuf};

use glam::DVec2;
use thiserror::Error;

use crate::sim::state::{Axis, PacmanRecord, Sign};

pub use level::{LevelData, load_level, parse_level};
pub use save::{SavedGame, format_save, load_saved_game, parse_save, write_save};
pub use scores::{load_high_scores, save_high_scores};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} does not contain a level number", path.display())]
    MissingLevel { path: PathBuf },
    #[error("{} line {line}: expected level number, got '{value}'", path.display())]
    InvalidLevel {
        path: PathBuf,
        line: usize,
        value: String,
    },
    #[error("{} does not contain a total bounce count", path.display())]
    MissingTotalBounces { path: PathBuf },
    #[error("{} line {line}: expected total bounces, got '{value}'", path.display())]
    InvalidTotalBounces {
        path: PathBuf,
        line: usize,
        value: String,
    },
    #[error("malformed high scores in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PersistenceError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Where level, save and high-score files live for each level number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    root: PathBuf,
}

impl AssetPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn level_file(&self, level: u32) -> PathBuf {
        self.root.join("levels").join(format!("level_{level}.txt"))
    }

    pub fn save_file(&self, level: u32) -> PathBuf {
        self.root.join("saves").join(format!("savegame_{level}.txt"))
    }

    pub fn high_score_file(&self, level: u32) -> PathBuf {
        self.root
            .join("highscores")
            .join(format!("highscores_{level}.json"))
    }
}

/// Non-blank, non-comment lines with their 1-based line numbers
pub(crate) fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Parse one tab-separated pac-man line.
///
/// Level lines have 7 fields; save lines carry the sign as an extra
/// field right after the axis letter. Returns `None` (after logging a
/// warning) when the line must be skipped.
pub(crate) fn parse_pacman_line(
    path: &Path,
    line_no: usize,
    line: &str,
    with_sign: bool,
) -> Option<PacmanRecord> {
    let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
    let expected = if with_sign { 8 } else { 7 };
    if fields.len() < expected {
        log::warn!(
            "{} line {}: expected {} tab-separated fields, got {}; skipping",
            path.display(),
            line_no,
            expected,
            fields.len()
        );
        return None;
    }

    let tail = if with_sign { 6 } else { 5 };
    let numbers = (
        fields[0].parse::<f64>(),
        fields[1].parse::<f64>(),
        fields[2].parse::<f64>(),
        fields[3].parse::<u32>(),
        fields[tail].parse::<u32>(),
    );
    let (diameter, x, y, wait_time_ms, bounces) = match numbers {
        (Ok(d), Ok(x), Ok(y), Ok(w), Ok(b)) => (d, x, y, w, b),
        _ => {
            log::warn!(
                "{} line {}: unparsable numeric field in '{}'; skipping",
                path.display(),
                line_no,
                line
            );
            return None;
        }
    };

    let axis = match fields[4].chars().next().and_then(Axis::from_code) {
        Some(axis) => axis,
        None => {
            log::warn!(
                "{} line {}: invalid direction '{}', defaulting to horizontal",
                path.display(),
                line_no,
                fields[4]
            );
            Axis::Horizontal
        }
    };

    let sign = if with_sign {
        match fields[5].parse::<i32>().ok().and_then(Sign::from_i32) {
            Some(sign) => sign,
            None => {
                log::warn!(
                    "{} line {}: invalid sub-direction '{}', defaulting to 1",
                    path.display(),
                    line_no,
                    fields[5]
                );
                Sign::Positive
            }
        }
    } else {
        Sign::Positive
    };

    let stopped = matches!(
        fields[tail + 1].to_ascii_lowercase().as_str(),
        "true" | "1"
    );

    let radius = diameter / 2.0;
    if !(radius.is_finite() && radius > 0.0) {
        log::warn!(
            "{} line {}: diameter must be positive, got {}; skipping",
            path.display(),
            line_no,
            diameter
        );
        return None;
    }
    if !(x.is_finite() && y.is_finite()) {
        log::warn!(
            "{} line {}: position must be finite, got ({}, {}); skipping",
            path.display(),
            line_no,
            x,
            y
        );
        return None;
    }

    Some(PacmanRecord {
        radius,
        position: DVec2::new(x, y),
        wait_time_ms,
        axis,
        sign,
        bounces,
        stopped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_paths() {
        let paths = AssetPaths::new("assets");
        assert_eq!(paths.level_file(1), Path::new("assets/levels/level_1.txt"));
        assert_eq!(paths.save_file(2), Path::new("assets/saves/savegame_2.txt"));
        assert_eq!(paths.high_score_file(0), Path::new("assets/highscores/highscores_0.json"));
    }

    #[test]
    fn test_content_lines_skip_blank_and_comments() {
        let lines: Vec<_> = content_lines("# header\n\n  1  \n#x\n2").collect();
        assert_eq!(lines, vec![(3, "1"), (5, "2")]);
    }

    #[test]
    fn test_parse_level_line() {
        let rec = parse_pacman_line(Path::new("t"), 1, "20\t50\t60\t100\tv\t3\tTRUE", false)
            .unwrap();
        assert_eq!(rec.radius, 10.0);
        assert_eq!(rec.position, DVec2::new(50.0, 60.0));
        assert_eq!(rec.wait_time_ms, 100);
        assert_eq!(rec.axis, Axis::Vertical);
        assert_eq!(rec.sign, Sign::Positive);
        assert_eq!(rec.bounces, 3);
        assert!(rec.stopped);
    }

    #[test]
    fn test_parse_save_line_with_sign() {
        let rec = parse_pacman_line(
            Path::new("t"),
            1,
            "20.00\t50.00\t60.00\t100\tH\t-1\t0\tfalse",
            true,
        )
        .unwrap();
        assert_eq!(rec.sign, Sign::Negative);
        assert_eq!(rec.axis, Axis::Horizontal);
        assert!(!rec.stopped);
    }

    #[test]
    fn test_parse_line_recovers_or_skips() {
        let p = Path::new("t");
        // Unknown direction defaults to horizontal
        let rec = parse_pacman_line(p, 1, "20\t50\t60\t100\tQ\t0\t0", false).unwrap();
        assert_eq!(rec.axis, Axis::Horizontal);
        // Bad sign defaults to positive
        let rec = parse_pacman_line(p, 1, "20\t50\t60\t100\tH\t7\t0\t0", true).unwrap();
        assert_eq!(rec.sign, Sign::Positive);
        // Too few fields, bad numbers and non-positive sizes are skipped
        assert!(parse_pacman_line(p, 1, "20\t50\t60", false).is_none());
        assert!(parse_pacman_line(p, 1, "big\t50\t60\t100\tH\t0\t0", false).is_none());
        assert!(parse_pacman_line(p, 1, "0\t50\t60\t100\tH\t0\t0", false).is_none());
        assert!(parse_pacman_line(p, 1, "20\t50\t60\t-5\tH\t0\t0", false).is_none());
    }

    #[test]
    fn test_parse_line_skips_non_finite_position() {
        let p = Path::new("t");
        assert!(parse_pacman_line(p, 1, "20\tNaN\t60\t100\tH\t0\t0", false).is_none());
        assert!(parse_pacman_line(p, 1, "20\t50\tinf\t100\tH\t0\t0", false).is_none());
        assert!(parse_pacman_line(p, 1, "20\t-inf\t60\t100\tH\t1\t0\t0", true).is_none());
    }
}
