//! Pac-man entity
//!
//! Each pac-man guards its mutable state with its own mutex. Every public
//! method takes the lock for its full duration and never calls into
//! another pac-man while holding it, so callers can only ever hold one
//! pac-man lock at a time.

use std::sync::{Mutex, MutexGuard, PoisonError};

use glam::DVec2;
use thiserror::Error;

use super::collision::{circles_overlap, point_in_circle};
use super::state::{Arena, Axis, CollisionProbe, PacmanRecord, PacmanView, Sign};
use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("pac-man radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
}

/// Travel speed (pixels/second) for a configured wait time.
/// Shorter waits move faster.
pub fn speed_for_wait(wait_time_ms: u32) -> f64 {
    BASE_SPEED * (100.0 / (wait_time_ms as f64 + 1.0))
}

/// Mutable part of a pac-man
#[derive(Debug)]
struct PacmanState {
    pos: DVec2,
    sign: Sign,
    stopped: bool,
    bounces: u32,
    anim_frame: u8,
    /// Seconds since the last animation frame switch
    anim_elapsed: f64,
}

/// A bouncing pac-man
#[derive(Debug)]
pub struct Pacman {
    id: u32,
    radius: f64,
    axis: Axis,
    speed: f64,
    wait_time_ms: u32,
    state: Mutex<PacmanState>,
}

impl Pacman {
    /// Build a pac-man from a loaded record
    pub fn new(id: u32, record: &PacmanRecord) -> Result<Self, SimError> {
        if !(record.radius.is_finite() && record.radius > 0.0) {
            return Err(SimError::InvalidRadius(record.radius));
        }
        Ok(Self {
            id,
            radius: record.radius,
            axis: record.axis,
            speed: speed_for_wait(record.wait_time_ms),
            wait_time_ms: record.wait_time_ms,
            state: Mutex::new(PacmanState {
                pos: record.position,
                sign: record.sign,
                stopped: record.stopped,
                bounces: record.bounces,
                anim_frame: 0,
                anim_elapsed: 0.0,
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, PacmanState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Advance by `dt` seconds inside the arena.
    ///
    /// Returns the number of wall bounces this step produced (0 or 1).
    /// An overshoot is clamped back to the wall, never reflected, so a
    /// huge `dt` still counts a single bounce.
    pub fn update(&self, dt: f64, arena: &Arena) -> u32 {
        let mut guard = self.lock();
        if guard.stopped {
            return 0;
        }
        let state = &mut *guard;

        state.anim_elapsed += dt;
        if state.anim_elapsed >= ANIM_INTERVAL {
            state.anim_frame = (state.anim_frame + 1) % 2;
            state.anim_elapsed = 0.0;
        }

        let limit = self.axis.extent(arena);
        let coord = self.axis.component_mut(&mut state.pos);
        *coord += self.speed * dt * state.sign.as_f64();

        let bounced = match state.sign {
            Sign::Negative if *coord - self.radius < 0.0 => {
                *coord = self.radius;
                true
            }
            Sign::Positive if *coord + self.radius > limit => {
                *coord = limit - self.radius;
                true
            }
            _ => false,
        };

        if bounced {
            state.sign = state.sign.flipped();
            state.bounces = state.bounces.saturating_add(1);
            1
        } else {
            0
        }
    }

    /// Reverse direction after hitting another pac-man.
    ///
    /// The pac-man is nudged along its new heading so the same pair is not
    /// detected again on the next scan. Returns false if already stopped.
    pub fn bounce(&self) -> bool {
        let mut guard = self.lock();
        if guard.stopped {
            return false;
        }
        let state = &mut *guard;
        state.sign = state.sign.flipped();
        state.bounces = state.bounces.saturating_add(1);
        *self.axis.component_mut(&mut state.pos) += BOUNCE_NUDGE * state.sign.as_f64();
        true
    }

    /// Stop the pac-man. True only for the running -> stopped transition.
    pub fn stop(&self) -> bool {
        let mut state = self.lock();
        if state.stopped {
            return false;
        }
        state.stopped = true;
        true
    }

    /// Whether a click at `point` lands on this (running) pac-man
    pub fn hit_test(&self, point: DVec2) -> bool {
        let state = self.lock();
        !state.stopped && point_in_circle(point, state.pos, self.radius)
    }

    /// Whether this (running) pac-man overlaps a circle at `other` with `other_radius`
    pub fn collision_test(&self, other: DVec2, other_radius: f64) -> bool {
        let state = self.lock();
        !state.stopped && circles_overlap(state.pos, self.radius, other, other_radius)
    }

    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    pub fn bounces(&self) -> u32 {
        self.lock().bounces
    }

    pub fn position(&self) -> DVec2 {
        self.lock().pos
    }

    pub fn sign(&self) -> Sign {
        self.lock().sign
    }

    pub fn view(&self) -> PacmanView {
        let state = self.lock();
        PacmanView {
            id: self.id,
            position: state.pos,
            radius: self.radius,
            anim_frame: state.anim_frame,
            stopped: state.stopped,
        }
    }

    pub fn probe(&self) -> CollisionProbe {
        let state = self.lock();
        CollisionProbe {
            position: state.pos,
            radius: self.radius,
            stopped: state.stopped,
        }
    }

    /// Save-relevant fields
    pub fn record(&self) -> PacmanRecord {
        let state = self.lock();
        PacmanRecord {
            radius: self.radius,
            position: state.pos,
            wait_time_ms: self.wait_time_ms,
            axis: self.axis,
            sign: state.sign,
            bounces: state.bounces,
            stopped: state.stopped,
        }
    }
}
