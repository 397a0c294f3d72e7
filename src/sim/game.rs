//! Game controller
//!
//! `Simulation` owns the pac-men of the active level together with the
//! bounce counter, phase, leaderboard and name entry buffer, all behind a
//! single reader/writer lock. Ticks and requests take the write side;
//! the `Get`-style accessors take the read side and hand back copies.
//!
//! File access is injected: load requests take a loader closure, save
//! requests a writer closure, and the per-level leaderboard is read with
//! the loader given to [`Simulation::new`].

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use glam::DVec2;
use thiserror::Error;

use super::pacman::Pacman;
use super::state::{
    Arena, GamePhase, GameStatus, HighScoreView, PacmanRecord, PacmanView, SaveSnapshot,
    TickReport,
};
use super::tick::step;
use crate::consts::*;
use crate::highscores::{self, Score};
use crate::persistence::{AssetPaths, LevelData, PersistenceError, SavedGame};

/// Leaderboard loader bound at construction
pub type HighScoreLoader =
    Box<dyn Fn(&Path) -> Result<Vec<Score>, PersistenceError> + Send + Sync>;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("cannot save game: not playing")]
    NotPlaying,
    #[error("no level loaded")]
    NoLevel,
    #[error("request not valid while {}", .0.as_str())]
    WrongPhase(GamePhase),
    #[error("unknown level {0} (levels are 0..={max})", max = MAX_LEVEL)]
    UnknownLevel(u32),
    #[error("failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: PersistenceError,
    },
    #[error("failed to persist: {0}")]
    Persist(#[source] PersistenceError),
}

/// Files belonging to the loaded level
#[derive(Debug, Clone)]
pub(super) struct ActiveLevel {
    pub number: u32,
    pub level_file: PathBuf,
    pub save_file: PathBuf,
    pub high_score_file: PathBuf,
}

/// State guarded by the simulation lock
pub(super) struct GameInner {
    pub level: Option<ActiveLevel>,
    pub pacmen: Vec<Pacman>,
    pub total_bounces: u32,
    pub phase: GamePhase,
    pub high_scores: Vec<Score>,
    pub name_buffer: Vec<char>,
    pub new_high_score: bool,
    pub last_update: Instant,
    next_id: u32,
}

impl GameInner {
    fn new() -> Self {
        Self {
            level: None,
            pacmen: Vec::new(),
            total_bounces: 0,
            phase: GamePhase::Starting,
            high_scores: Vec::new(),
            name_buffer: Vec::new(),
            new_high_score: false,
            last_update: Instant::now(),
            next_id: 0,
        }
    }

    /// Build pac-men with fresh ids. Invalid records are skipped.
    fn spawn(&mut self, records: &[PacmanRecord]) -> Vec<Pacman> {
        let mut pacmen = Vec::with_capacity(records.len());
        for record in records {
            match Pacman::new(self.next_id, record) {
                Ok(pacman) => {
                    self.next_id += 1;
                    pacmen.push(pacman);
                }
                Err(e) => log::warn!("Skipping pac-man: {e}"),
            }
        }
        pacmen
    }
}

/// Thread-safe game controller
pub struct Simulation {
    arena: Arena,
    paths: AssetPaths,
    load_high_scores: HighScoreLoader,
    inner: RwLock<GameInner>,
}

impl Simulation {
    pub fn new<L>(arena: Arena, paths: AssetPaths, load_high_scores: L) -> Self
    where
        L: Fn(&Path) -> Result<Vec<Score>, PersistenceError> + Send + Sync + 'static,
    {
        Self {
            arena,
            paths,
            load_high_scores: Box::new(load_high_scores),
            inner: RwLock::new(GameInner::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, GameInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, GameInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    // --- Loading ---

    /// Replace the running game with freshly loaded pac-men.
    ///
    /// Only called after the loader succeeded, so every field changes
    /// together.
    fn install(
        &self,
        inner: &mut GameInner,
        level: u32,
        level_file: PathBuf,
        save_file: PathBuf,
        total_bounces: u32,
        records: &[PacmanRecord],
    ) {
        let high_score_file = self.paths.high_score_file(level);
        let high_scores = match (self.load_high_scores)(&high_score_file) {
            Ok(scores) => scores,
            Err(e) => {
                log::warn!("Could not load high scores for level {level}: {e}. Starting fresh.");
                Vec::new()
            }
        };

        inner.pacmen = inner.spawn(records);
        inner.level = Some(ActiveLevel {
            number: level,
            level_file,
            save_file,
            high_score_file,
        });
        inner.total_bounces = total_bounces;
        inner.high_scores = high_scores;
        inner.name_buffer.clear();
        inner.new_high_score = false;
        inner.phase = GamePhase::Playing;
        inner.last_update = Instant::now();

        log::info!(
            "Level {} ready: {} pac-men, {} bounces so far",
            level,
            inner.pacmen.len(),
            total_bounces
        );
    }

    fn load_level_locked<F>(
        &self,
        inner: &mut GameInner,
        path: &Path,
        load: F,
    ) -> Result<(), GameError>
    where
        F: FnOnce(&Path) -> Result<LevelData, PersistenceError>,
    {
        log::info!("Loading level from {}", path.display());
        let data = load(path).map_err(|source| {
            log::warn!("Error loading level {}: {source}", path.display());
            GameError::Load {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let save_file = self.paths.save_file(data.level);
        self.install(inner, data.level, path.to_path_buf(), save_file, 0, &data.pacmen);
        Ok(())
    }

    /// Load a level file and start playing it
    pub fn request_load_level<F>(&self, path: &Path, load: F) -> Result<(), GameError>
    where
        F: FnOnce(&Path) -> Result<LevelData, PersistenceError>,
    {
        let mut inner = self.write();
        self.load_level_locked(&mut inner, path, load)
    }

    /// Load one of the shipped levels by number
    pub fn request_load_level_number<F>(&self, level: u32, load: F) -> Result<(), GameError>
    where
        F: FnOnce(&Path) -> Result<LevelData, PersistenceError>,
    {
        if level > MAX_LEVEL {
            return Err(GameError::UnknownLevel(level));
        }
        self.request_load_level(&self.paths.level_file(level), load)
    }

    /// Title screen -> level 0
    pub fn request_start<F>(&self, load: F) -> Result<(), GameError>
    where
        F: FnOnce(&Path) -> Result<LevelData, PersistenceError>,
    {
        let mut inner = self.write();
        if inner.phase != GamePhase::Starting {
            return Err(GameError::WrongPhase(inner.phase));
        }
        self.load_level_locked(&mut inner, &self.paths.level_file(0), load)
    }

    /// Game over -> replay the same level
    pub fn request_restart<F>(&self, load: F) -> Result<(), GameError>
    where
        F: FnOnce(&Path) -> Result<LevelData, PersistenceError>,
    {
        let mut inner = self.write();
        if inner.phase != GamePhase::GameOver {
            return Err(GameError::WrongPhase(inner.phase));
        }
        let path = match &inner.level {
            Some(active) => active.level_file.clone(),
            None => self.paths.level_file(0),
        };
        self.load_level_locked(&mut inner, &path, load)
    }

    /// Hall of fame -> back to level 0
    pub fn request_continue<F>(&self, load: F) -> Result<(), GameError>
    where
        F: FnOnce(&Path) -> Result<LevelData, PersistenceError>,
    {
        let mut inner = self.write();
        if inner.phase != GamePhase::HallOfFame {
            return Err(GameError::WrongPhase(inner.phase));
        }
        self.load_level_locked(&mut inner, &self.paths.level_file(0), load)
    }

    /// Restore a saved game
    pub fn request_load_saved_game<F>(&self, path: &Path, load: F) -> Result<(), GameError>
    where
        F: FnOnce(&Path) -> Result<SavedGame, PersistenceError>,
    {
        let mut inner = self.write();
        log::info!("Loading saved game from {}", path.display());
        let saved = load(path).map_err(|source| {
            log::warn!("Error loading saved game {}: {source}", path.display());
            GameError::Load {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let level_file = self.paths.level_file(saved.level);
        self.install(
            &mut inner,
            saved.level,
            level_file,
            path.to_path_buf(),
            saved.total_bounces,
            &saved.pacmen,
        );
        Ok(())
    }

    /// Drop the current level and return to the title screen
    pub fn reset_to_start(&self) {
        let mut inner = self.write();
        inner.level = None;
        inner.pacmen.clear();
        inner.total_bounces = 0;
        inner.high_scores.clear();
        inner.name_buffer.clear();
        inner.new_high_score = false;
        inner.phase = GamePhase::Starting;
        log::info!("Back to start screen");
    }

    // --- Ticking ---

    /// Advance by the wall-clock time since the previous call
    pub fn update(&self) -> TickReport {
        let mut inner = self.write();
        let now = Instant::now();
        let dt = now.duration_since(inner.last_update).as_secs_f64();
        inner.last_update = now;
        step(&mut inner, &self.arena, dt)
    }

    /// Advance by a fixed `dt` seconds
    pub fn tick(&self, dt: f64) -> TickReport {
        let mut inner = self.write();
        step(&mut inner, &self.arena, dt)
    }

    // --- Player input ---

    /// Stop the first running pac-man under the cursor.
    /// Returns true if one was stopped.
    pub fn handle_click(&self, point: DVec2) -> bool {
        let inner = self.write();
        if inner.phase != GamePhase::Playing {
            return false;
        }
        match inner.pacmen.iter().find(|p| p.hit_test(point)) {
            Some(pacman) => {
                let stopped = pacman.stop();
                if stopped {
                    log::debug!("Stopped pac-man {}", pacman.id());
                }
                stopped
            }
            None => false,
        }
    }

    /// Append typed characters to the high score name
    pub fn handle_text_input(&self, text: &str) {
        let mut inner = self.write();
        if inner.phase != GamePhase::EnteringHighScore {
            return;
        }
        let room = MAX_NAME_LEN.saturating_sub(inner.name_buffer.len());
        inner.name_buffer.extend(text.chars().take(room));
    }

    pub fn handle_backspace(&self) {
        let mut inner = self.write();
        if inner.phase == GamePhase::EnteringHighScore {
            inner.name_buffer.pop();
        }
    }

    /// Confirm the typed name, record the score and show the hall of fame.
    ///
    /// The phase change is committed before `save` runs; a failed write is
    /// logged and returned but does not undo it.
    pub fn handle_enter<F>(&self, save: F) -> Result<(), GameError>
    where
        F: FnOnce(&[Score], &Path) -> Result<(), PersistenceError>,
    {
        let (scores, path) = {
            let mut inner = self.write();
            if inner.phase != GamePhase::EnteringHighScore {
                return Ok(());
            }

            let typed: String = inner.name_buffer.iter().collect();
            let name = if typed.is_empty() {
                DEFAULT_PLAYER_NAME.to_string()
            } else {
                typed
            };
            log::info!("Adding high score: {} - {}", name, inner.total_bounces);

            let candidate = Score::new(name, inner.total_bounces);
            let (scores, retained) = highscores::add_score(&inner.high_scores, candidate);
            if !retained {
                log::info!("Score did not survive ranking");
            }
            inner.high_scores = scores.clone();
            inner.phase = GamePhase::HallOfFame;
            inner.name_buffer.clear();
            inner.new_high_score = false;

            let level = inner.level.as_ref().map_or(0, |active| active.number);
            let path = match &inner.level {
                Some(active) => active.high_score_file.clone(),
                None => self.paths.high_score_file(level),
            };
            (scores, path)
        };

        save(&scores, &path).map_err(|e| {
            log::warn!("Failed to save high scores: {e}");
            GameError::Persist(e)
        })
    }

    /// Write the running game through `write`.
    ///
    /// The snapshot is taken under the read lock, which is released before
    /// `write` is called. Returns the path written.
    pub fn request_save_game<F>(&self, write: F) -> Result<PathBuf, GameError>
    where
        F: FnOnce(&SaveSnapshot, &Path) -> Result<(), PersistenceError>,
    {
        let (snapshot, path) = {
            let inner = self.read();
            let active = match &inner.level {
                Some(active) if inner.phase == GamePhase::Playing => active,
                _ => {
                    log::info!("Cannot save game: not currently playing a level");
                    return Err(GameError::NotPlaying);
                }
            };
            (snapshot_of(&inner, active.number), active.save_file.clone())
        };

        write(&snapshot, &path).map_err(|e| {
            log::warn!("Error saving game to {}: {e}", path.display());
            GameError::Persist(e)
        })?;
        Ok(path)
    }

    // --- Accessors ---

    pub fn game_status(&self) -> GameStatus {
        let inner = self.read();
        GameStatus {
            phase: inner.phase,
            total_bounces: inner.total_bounces,
            level: inner.level.as_ref().map(|active| active.number),
        }
    }

    pub fn pacman_views(&self) -> Vec<PacmanView> {
        self.read().pacmen.iter().map(Pacman::view).collect()
    }

    pub fn high_score_view(&self) -> HighScoreView {
        let inner = self.read();
        HighScoreView {
            phase: inner.phase,
            scores: inner.high_scores.clone(),
            name: inner.name_buffer.iter().collect(),
        }
    }

    /// Save data for the loaded level, if any
    pub fn save_snapshot(&self) -> Option<SaveSnapshot> {
        let inner = self.read();
        let level = inner.level.as_ref()?.number;
        Some(snapshot_of(&inner, level))
    }

    pub fn is_new_high_score_pending(&self) -> bool {
        self.read().new_high_score
    }

    /// Save file of the loaded level
    pub fn save_path(&self) -> Option<PathBuf> {
        self.read()
            .level
            .as_ref()
            .map(|active| active.save_file.clone())
    }
}

fn snapshot_of(inner: &GameInner, level: u32) -> SaveSnapshot {
    SaveSnapshot {
        level,
        total_bounces: inner.total_bounces,
        pacmen: inner.pacmen.iter().map(Pacman::record).collect(),
    }
}
