//! Game state and plain data types
//!
//! Everything here is a copyable value: the live, lock-guarded objects
//! live in `pacman` and `game`.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::highscores::Score;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, no level loaded yet
    Starting,
    /// Pac-men are moving
    Playing,
    /// All pac-men stopped, run did not make the leaderboard
    GameOver,
    /// All pac-men stopped, waiting for the player's name
    EnteringHighScore,
    /// Showing the leaderboard
    HallOfFame,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Starting => "Starting",
            GamePhase::Playing => "Playing",
            GamePhase::GameOver => "Game Over",
            GamePhase::EnteringHighScore => "Entering High Score",
            GamePhase::HallOfFame => "Hall of Fame",
        }
    }
}

/// Axis a pac-man travels along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Parse the one-letter file code (`H` or `V`, case-insensitive)
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'H' => Some(Axis::Horizontal),
            'V' => Some(Axis::Vertical),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            Axis::Horizontal => 'H',
            Axis::Vertical => 'V',
        }
    }

    /// Mutable access to the coordinate this axis moves
    #[inline]
    pub fn component_mut<'a>(&self, pos: &'a mut DVec2) -> &'a mut f64 {
        match self {
            Axis::Horizontal => &mut pos.x,
            Axis::Vertical => &mut pos.y,
        }
    }

    /// Arena extent along this axis
    #[inline]
    pub fn extent(&self, arena: &Arena) -> f64 {
        match self {
            Axis::Horizontal => arena.width,
            Axis::Vertical => arena.height,
        }
    }
}

/// Direction of travel along the axis: +1 (right/down) or -1 (left/up)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sign {
    #[default]
    Positive,
    Negative,
}

impl Sign {
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Sign::Positive),
            -1 => Some(Sign::Negative),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> i32 {
        match self {
            Sign::Positive => 1,
            Sign::Negative => -1,
        }
    }

    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.as_i32() as f64
    }

    #[inline]
    pub fn flipped(&self) -> Self {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        }
    }
}

/// Rectangular play area, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

/// Save-relevant fields of one pac-man
///
/// Produced by the level and save loaders, and captured from live
/// pac-men when the game is saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacmanRecord {
    pub radius: f64,
    pub position: DVec2,
    pub wait_time_ms: u32,
    pub axis: Axis,
    pub sign: Sign,
    pub bounces: u32,
    pub stopped: bool,
}

/// Drawable state of one pac-man
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacmanView {
    pub id: u32,
    pub position: DVec2,
    pub radius: f64,
    /// Mouth animation frame (0 or 1)
    pub anim_frame: u8,
    pub stopped: bool,
}

/// Position, size and status read for a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionProbe {
    pub position: DVec2,
    pub radius: f64,
    pub stopped: bool,
}

/// Headline numbers for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameStatus {
    pub phase: GamePhase,
    pub total_bounces: u32,
    /// `None` until a level has been loaded
    pub level: Option<u32>,
}

/// Leaderboard screen data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScoreView {
    pub phase: GamePhase,
    pub scores: Vec<Score>,
    /// Name typed so far (only meaningful while entering a high score)
    pub name: String,
}

/// Consistent copy of everything written to a save file
#[derive(Debug, Clone, PartialEq)]
pub struct SaveSnapshot {
    pub level: u32,
    pub total_bounces: u32,
    pub pacmen: Vec<PacmanRecord>,
}

/// Outcome of one simulation tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Bounces added to the total during this tick
    pub bounces: u32,
    /// Phase after the tick
    pub phase: GamePhase,
}
