//! Simulation module
//!
//! All gameplay logic lives here:
//! - Pac-man motion and wall bounces
//! - Pac-man vs pac-man collisions
//! - The phase machine (start, play, game over, name entry, hall of fame)
//!
//! No rendering, input polling or file formats: those are handed in by
//! the caller.

pub mod collision;
pub mod game;
pub mod pacman;
pub mod state;
mod tick;

pub use collision::{circles_overlap, point_in_circle, probes_collide};
pub use game::{GameError, HighScoreLoader, Simulation};
pub use pacman::{Pacman, SimError, speed_for_wait};
pub use state::{
    Arena, Axis, CollisionProbe, GamePhase, GameStatus, HighScoreView, PacmanRecord, PacmanView,
    SaveSnapshot, Sign, TickReport,
};
