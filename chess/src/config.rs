//! Game configuration

use crate::movegen::PawnDirection;
use crate::opponent::Difficulty;

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] io::Error),
    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Settings of a single game
///
/// Every field has a default, so an empty TOML document is a valid configuration.
///
/// # Example
///
/// ```
/// # use minichess::{config::GameConfig, movegen::PawnDirection, opponent::Difficulty};
/// #
/// let cfg = GameConfig::from_toml_str(r#"
/// difficulty = "hard"
/// time_control_minutes = 5
/// pawn_direction = "bycolor"
/// "#).unwrap();
/// assert_eq!(cfg.difficulty, Difficulty::Hard);
/// assert_eq!(cfg.time_control(), "5 min");
/// assert_eq!(cfg.pawn_direction, PawnDirection::ByColor);
/// assert_eq!(cfg.opponent_delay_ms, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    pub time_control_minutes: u32,
    /// Delay before the automated opponent moves
    pub opponent_delay_ms: u64,
    pub pawn_direction: PawnDirection,
    /// Seed for the opponent's random generator; taken from entropy if unset
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            difficulty: Difficulty::Easy,
            time_control_minutes: 10,
            opponent_delay_ms: 1000,
            pawn_direction: PawnDirection::Fixed,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(s: &str) -> Result<GameConfig, ConfigError> {
        let cfg: GameConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<GameConfig, ConfigError> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_control_minutes == 0 {
            return Err(ConfigError::Invalid {
                field: "time_control_minutes",
                reason: "must be positive",
            });
        }
        Ok(())
    }

    /// Clock budget of each side
    ///
    /// The budget is reported only, the clock is never ticked.
    pub fn clock_budget(&self) -> Duration {
        Duration::from_secs(u64::from(self.time_control_minutes) * 60)
    }

    pub fn opponent_delay(&self) -> Duration {
        Duration::from_millis(self.opponent_delay_ms)
    }

    /// Time control label, as sent in game reports
    pub fn time_control(&self) -> String {
        format!("{} min", self.time_control_minutes)
    }
}
