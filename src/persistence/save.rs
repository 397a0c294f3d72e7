//! Save game files
//!
//! Line 1 is the level, line 2 the total bounce count, then one line per
//! pac-man: diameter, x, y, wait ms, direction, sub-direction (1 or -1),
//! bounces, stopped. Sizes and positions are written with two decimals.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::{PersistenceError, content_lines, parse_pacman_line};
use crate::sim::state::{PacmanRecord, SaveSnapshot};

/// Contents of a save file
#[derive(Debug, Clone, PartialEq)]
pub struct SavedGame {
    pub level: u32,
    pub total_bounces: u32,
    pub pacmen: Vec<PacmanRecord>,
}

/// Render a snapshot in the save file format
pub fn format_save(snapshot: &SaveSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", snapshot.level);
    let _ = writeln!(out, "{}", snapshot.total_bounces);
    for p in &snapshot.pacmen {
        let _ = writeln!(
            out,
            "{:.2}\t{:.2}\t{:.2}\t{}\t{}\t{}\t{}\t{}",
            p.radius * 2.0,
            p.position.x,
            p.position.y,
            p.wait_time_ms,
            p.axis.code(),
            p.sign.as_i32(),
            p.bounces,
            p.stopped
        );
    }
    out
}

/// Write a snapshot to `path`, creating the parent directory if needed
pub fn write_save(snapshot: &SaveSnapshot, path: &Path) -> Result<(), PersistenceError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| PersistenceError::io(dir, e))?;
    }
    fs::write(path, format_save(snapshot)).map_err(|e| PersistenceError::io(path, e))?;
    log::info!(
        "Game saved to {} (level {}, {} pac-men)",
        path.display(),
        snapshot.level,
        snapshot.pacmen.len()
    );
    Ok(())
}

/// Read and parse a save file
pub fn load_saved_game(path: &Path) -> Result<SavedGame, PersistenceError> {
    let text = fs::read_to_string(path).map_err(|e| PersistenceError::io(path, e))?;
    parse_save(&text, path)
}

/// Parse save file text. `path` is only used in messages.
pub fn parse_save(text: &str, path: &Path) -> Result<SavedGame, PersistenceError> {
    let mut lines = content_lines(text);

    let (line_no, header) = lines.next().ok_or_else(|| PersistenceError::MissingLevel {
        path: path.to_path_buf(),
    })?;
    let level: u32 = header.parse().map_err(|_| PersistenceError::InvalidLevel {
        path: path.to_path_buf(),
        line: line_no,
        value: header.to_string(),
    })?;

    let (line_no, header) = lines
        .next()
        .ok_or_else(|| PersistenceError::MissingTotalBounces {
            path: path.to_path_buf(),
        })?;
    let total_bounces: u32 = header
        .parse()
        .map_err(|_| PersistenceError::InvalidTotalBounces {
            path: path.to_path_buf(),
            line: line_no,
            value: header.to_string(),
        })?;

    let pacmen: Vec<PacmanRecord> = lines
        .filter_map(|(line_no, line)| parse_pacman_line(path, line_no, line, true))
        .collect();

    log::info!(
        "Loaded save {}: level {}, {} bounces, {} pac-men",
        path.display(),
        level,
        total_bounces,
        pacmen.len()
    );
    Ok(SavedGame {
        level,
        total_bounces,
        pacmen,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Axis, Sign};
    use glam::DVec2;

    fn snapshot() -> SaveSnapshot {
        SaveSnapshot {
            level: 2,
            total_bounces: 17,
            pacmen: vec![
                PacmanRecord {
                    radius: 10.0,
                    position: DVec2::new(123.456, 78.9),
                    wait_time_ms: 40,
                    axis: Axis::Vertical,
                    sign: Sign::Negative,
                    bounces: 5,
                    stopped: false,
                },
                PacmanRecord {
                    radius: 7.5,
                    position: DVec2::new(300.0, 20.0),
                    wait_time_ms: 250,
                    axis: Axis::Horizontal,
                    sign: Sign::Positive,
                    bounces: 0,
                    stopped: true,
                },
            ],
        }
    }

    #[test]
    fn test_format_save() {
        let text = format_save(&snapshot());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "2");
        assert_eq!(lines[1], "17");
        assert_eq!(lines[2], "20.00\t123.46\t78.90\t40\tV\t-1\t5\tfalse");
        assert_eq!(lines[3], "15.00\t300.00\t20.00\t250\tH\t1\t0\ttrue");
    }

    #[test]
    fn test_parse_formatted_save() {
        let original = snapshot();
        let loaded = parse_save(&format_save(&original), Path::new("s")).unwrap();
        assert_eq!(loaded.level, original.level);
        assert_eq!(loaded.total_bounces, original.total_bounces);
        assert_eq!(loaded.pacmen.len(), 2);
        let p = &loaded.pacmen[0];
        assert!((p.position.x - 123.46).abs() < 1e-9);
        assert_eq!(p.sign, Sign::Negative);
        assert_eq!(p.axis, Axis::Vertical);
        assert_eq!(loaded.pacmen[1], original.pacmen[1]);
    }

    #[test]
    fn test_bad_entity_line_is_skipped() {
        let text = "0\n4\n20\t50\t50\t100\tH\t1\t0\tfalse\n20\tnope\t50\t100\tH\t1\t0\tfalse\n";
        let loaded = parse_save(text, Path::new("s")).unwrap();
        assert_eq!(loaded.pacmen.len(), 1);
    }

    #[test]
    fn test_missing_headers_are_fatal() {
        assert!(matches!(
            parse_save("", Path::new("s")),
            Err(PersistenceError::MissingLevel { .. })
        ));
        assert!(matches!(
            parse_save("1\n", Path::new("s")),
            Err(PersistenceError::MissingTotalBounces { .. })
        ));
        assert!(matches!(
            parse_save("1\nlots\n", Path::new("s")),
            Err(PersistenceError::InvalidTotalBounces { line: 2, .. })
        ));
    }
}
