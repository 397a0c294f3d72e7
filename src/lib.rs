//! Catch the Pac-Man - stop the bouncing pac-men before they rack up bounces
//!
//! Core modules:
//! - `sim`: Entity motion, collisions and the game phase machine
//! - `highscores`: Capped per-level leaderboard ranking
//! - `persistence`: Level, save-game and high-score files
//! - `settings`: Runtime configuration
//! - `console`: Text command driver used by the headless binary

pub mod console;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use highscores::{MAX_HIGH_SCORES, Score};
pub use settings::Settings;
pub use sim::{GameError, GamePhase, Simulation};

/// Game configuration constants
pub mod consts {
    /// Default arena dimensions (pixels)
    pub const ARENA_WIDTH: f64 = 640.0;
    pub const ARENA_HEIGHT: f64 = 480.0;

    /// Speed scale: a pac-man with wait time `w` ms moves at
    /// `BASE_SPEED * 100 / (w + 1)` pixels per second
    pub const BASE_SPEED: f64 = 60.0;

    /// Distance a pac-man is pushed along its axis after a pac-man collision
    pub const BOUNCE_NUDGE: f64 = 1.1;

    /// Seconds between mouth animation frames
    pub const ANIM_INTERVAL: f64 = 0.15;

    /// High score name entry
    pub const MAX_NAME_LEN: usize = 15;
    pub const DEFAULT_PLAYER_NAME: &str = "Anonymous";

    /// Highest level number shipped with the game
    pub const MAX_LEVEL: u32 = 2;

    /// Default simulation rate of the headless driver
    pub const DEFAULT_TICK_HZ: u32 = 60;
}
