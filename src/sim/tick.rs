//! One simulation step
//!
//! Moves every pac-man, resolves pac-man collisions and decides how the
//! run ends once everything has been stopped.

use super::collision::probes_collide;
use super::game::GameInner;
use super::state::{Arena, GamePhase, TickReport};
use crate::highscores;

/// Advance the game by `dt` seconds.
///
/// Caller holds the simulation's exclusive lock for the whole step.
pub(super) fn step(inner: &mut GameInner, arena: &Arena, dt: f64) -> TickReport {
    if inner.phase != GamePhase::Playing || inner.level.is_none() {
        return TickReport {
            bounces: 0,
            phase: inner.phase,
        };
    }

    let mut bounces = 0;
    let mut all_stopped = true;

    // Movement & wall bounces
    for pacman in &inner.pacmen {
        bounces += pacman.update(dt, arena);
        if !pacman.is_stopped() {
            all_stopped = false;
        }
    }

    // Pac-man vs pac-man. Each side is probed under its own lock and
    // released before the next one is taken.
    let count = inner.pacmen.len();
    for i in 0..count {
        let first = &inner.pacmen[i];
        let a = first.probe();
        if a.stopped {
            continue;
        }
        for second in &inner.pacmen[i + 1..] {
            let b = second.probe();
            if !probes_collide(&a, &b) {
                continue;
            }
            // bounce() re-checks the stopped flag, so a stale probe adds nothing
            if first.bounce() {
                bounces += 1;
            }
            if second.bounce() {
                bounces += 1;
            }
            log::debug!("Pac-men {} and {} collided", first.id(), second.id());
        }
    }

    inner.total_bounces = inner.total_bounces.saturating_add(bounces);

    if all_stopped {
        if highscores::qualifies(&inner.high_scores, inner.total_bounces) {
            log::info!("New high score: {} bounces", inner.total_bounces);
            inner.phase = GamePhase::EnteringHighScore;
            inner.new_high_score = true;
            inner.name_buffer.clear();
        } else {
            log::info!("Game over with {} bounces", inner.total_bounces);
            inner.phase = GamePhase::GameOver;
        }
    }

    TickReport {
        bounces,
        phase: inner.phase,
    }
}
