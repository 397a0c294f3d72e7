//! Text command driver
//!
//! Stands in for a graphical front end: each line typed on stdin becomes
//! one request against the simulation, and the state screens are printed
//! as plain text. Requests use the real file formats from `persistence`.

use std::fmt::Write as _;
use std::str::FromStr;

use glam::DVec2;
use thiserror::Error;

use crate::persistence::{load_level, load_saved_game, save_high_scores, write_save};
use crate::sim::{GameError, GamePhase, Simulation};

/// One console request
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Title screen -> level 0
    Start,
    /// Click at arena coordinates
    Click(DVec2),
    /// Type characters into the high score name
    Type(String),
    Backspace,
    /// Confirm the high score name
    Enter,
    /// Replay the level after a game over
    Restart,
    /// Leave the hall of fame
    Continue,
    Save,
    /// Load the save file of the current level
    Load,
    /// Jump to a level
    Level(u32),
    Status,
    Pacmen,
    Scores,
    /// Back to the title screen
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("not a number: '{0}'")]
    BadNumber(String),
}

fn number<T: FromStr>(word: Option<&str>, command: &'static str) -> Result<T, ParseCommandError> {
    let word = word.ok_or(ParseCommandError::MissingArgument(command))?;
    word.parse()
        .map_err(|_| ParseCommandError::BadNumber(word.to_string()))
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        let mut args = rest.split_whitespace();

        let command = match head.to_ascii_lowercase().as_str() {
            "" => return Err(ParseCommandError::Empty),
            "start" => Command::Start,
            "click" => {
                let x = number(args.next(), "click")?;
                let y = number(args.next(), "click")?;
                Command::Click(DVec2::new(x, y))
            }
            "type" => {
                if rest.is_empty() {
                    return Err(ParseCommandError::MissingArgument("type"));
                }
                Command::Type(rest.to_string())
            }
            "backspace" | "bs" => Command::Backspace,
            "enter" => Command::Enter,
            "restart" => Command::Restart,
            "continue" => Command::Continue,
            "save" => Command::Save,
            "load" => Command::Load,
            "level" => Command::Level(number(args.next(), "level")?),
            "status" => Command::Status,
            "pacmen" | "ls" => Command::Pacmen,
            "scores" => Command::Scores,
            "reset" => Command::Reset,
            "help" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(ParseCommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

pub const HELP: &str = "\
commands:
  start                 load level 0 from the title screen
  click X Y             stop the pac-man at X,Y
  type NAME / bs        edit the high score name
  enter                 confirm the high score name
  restart / continue    leave game over / hall of fame
  save / load           write or restore the current level's save
  level N               jump to level N
  status / pacmen / scores
  reset                 back to the title screen
  quit";

/// Run one command and describe the result
pub fn execute(sim: &Simulation, command: &Command) -> Result<String, GameError> {
    match command {
        Command::Start => {
            sim.request_start(load_level)?;
            Ok(render_status(sim))
        }
        Command::Click(point) => {
            if sim.handle_click(*point) {
                Ok(format!("Stopped a pac-man at ({:.0}, {:.0})", point.x, point.y))
            } else {
                Ok("Missed".to_string())
            }
        }
        Command::Type(text) => {
            sim.handle_text_input(text);
            Ok(format!("Name: {}", sim.high_score_view().name))
        }
        Command::Backspace => {
            sim.handle_backspace();
            Ok(format!("Name: {}", sim.high_score_view().name))
        }
        Command::Enter => {
            sim.handle_enter(save_high_scores)?;
            Ok(render_scores(sim))
        }
        Command::Restart => {
            sim.request_restart(load_level)?;
            Ok(render_status(sim))
        }
        Command::Continue => {
            sim.request_continue(load_level)?;
            Ok(render_status(sim))
        }
        Command::Save => {
            let path = sim.request_save_game(write_save)?;
            Ok(format!("Saved to {}", path.display()))
        }
        Command::Load => {
            let path = sim.save_path().ok_or(GameError::NoLevel)?;
            sim.request_load_saved_game(&path, load_saved_game)?;
            Ok(render_status(sim))
        }
        Command::Level(level) => {
            sim.request_load_level_number(*level, load_level)?;
            Ok(render_status(sim))
        }
        Command::Status => Ok(render_status(sim)),
        Command::Pacmen => Ok(render_pacmen(sim)),
        Command::Scores => Ok(render_scores(sim)),
        Command::Reset => {
            sim.reset_to_start();
            Ok(render_status(sim))
        }
        Command::Help => Ok(HELP.to_string()),
        Command::Quit => Ok("Bye".to_string()),
    }
}

pub fn render_status(sim: &Simulation) -> String {
    let status = sim.game_status();
    let level = status
        .level
        .map_or_else(|| "-".to_string(), |level| level.to_string());
    let mut out = format!(
        "[{}] level {} | bounces {}",
        status.phase.as_str(),
        level,
        status.total_bounces
    );
    let hint = match status.phase {
        GamePhase::Starting => "type 'start' to play",
        GamePhase::Playing => "click the pac-men",
        GamePhase::GameOver => "type 'restart' to try again",
        GamePhase::EnteringHighScore => "new high score! type your name, then 'enter'",
        GamePhase::HallOfFame => "type 'continue'",
    };
    let _ = write!(out, " | {hint}");
    out
}

pub fn render_pacmen(sim: &Simulation) -> String {
    let views = sim.pacman_views();
    if views.is_empty() {
        return "No pac-men".to_string();
    }
    let mut out = String::new();
    for view in views {
        let _ = writeln!(
            out,
            "#{:<3} ({:>7.2}, {:>7.2}) r={:<5.1} {}",
            view.id,
            view.position.x,
            view.position.y,
            view.radius,
            if view.stopped {
                "stopped"
            } else if view.anim_frame == 0 {
                "C"
            } else {
                "O"
            }
        );
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn render_scores(sim: &Simulation) -> String {
    let view = sim.high_score_view();
    let mut out = String::from("HALL OF FAME");
    if view.scores.is_empty() {
        out.push_str("\n  (empty)");
    }
    for (rank, score) in view.scores.iter().enumerate() {
        let _ = write!(out, "\n  {:>2}. {:<15} {:>5}", rank + 1, score.name, score.score);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("start".parse::<Command>(), Ok(Command::Start));
        assert_eq!(
            "click 10 20.5".parse::<Command>(),
            Ok(Command::Click(DVec2::new(10.0, 20.5)))
        );
        assert_eq!(
            "  TYPE  Ada Lovelace ".parse::<Command>(),
            Ok(Command::Type("Ada Lovelace".into()))
        );
        assert_eq!("level 2".parse::<Command>(), Ok(Command::Level(2)));
        assert_eq!("q".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Command>(), Err(ParseCommandError::Empty));
        assert_eq!(
            "click 10".parse::<Command>(),
            Err(ParseCommandError::MissingArgument("click"))
        );
        assert_eq!(
            "level two".parse::<Command>(),
            Err(ParseCommandError::BadNumber("two".into()))
        );
        assert_eq!(
            "jump".parse::<Command>(),
            Err(ParseCommandError::Unknown("jump".into()))
        );
        assert_eq!(
            "type".parse::<Command>(),
            Err(ParseCommandError::MissingArgument("type"))
        );
    }

    #[test]
    fn test_load_without_level() {
        let sim = Simulation::new(
            crate::sim::Arena::default(),
            crate::persistence::AssetPaths::new("assets"),
            |_: &std::path::Path| Ok(Vec::new()),
        );
        let err = execute(&sim, &Command::Load).unwrap_err();
        assert!(matches!(err, GameError::NoLevel));
        assert_eq!(err.to_string(), "no level loaded");
        assert!(matches!(execute(&sim, &Command::Save), Err(GameError::NotPlaying)));
    }
}
