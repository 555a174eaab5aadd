use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// How the level counter reacts to score changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LevelRule {
    /// `level = 1 + score / level_threshold`
    #[default]
    Threshold,
    /// Level goes up by one whenever the new score is an exact multiple of the threshold.
    /// Only fires reliably when the threshold is a multiple of the food reward.
    Modulo,
}

/// Reasons a [`GameConfig`] cannot be played
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("snake must start with at least 3 segments, got {0}")]
    SnakeTooShort(usize),
    #[error("grid of {grid_size}x{grid_size} cannot hold a snake of {snake_length} plus food")]
    GridTooSmall {
        grid_size: usize,
        snake_length: usize,
    },
    #[error("food reward must be non-zero")]
    ZeroReward,
    #[error("level threshold must be non-zero")]
    ZeroLevelThreshold,
    #[error("minimum tick interval must be non-zero")]
    ZeroMinInterval,
    #[error("minimum tick interval {min_ms}ms exceeds initial interval {initial_ms}ms")]
    MinAboveInitial { min_ms: u64, initial_ms: u64 },
    #[error("canvas of {canvas}px does not divide into cells of {cell}px")]
    UnevenCanvas { canvas: usize, cell: usize },
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square grid, in cells
    pub grid_size: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    /// Points for eating one food
    pub food_reward: u32,
    /// Points per level
    pub level_threshold: u32,
    pub level_rule: LevelRule,

    // Speed curve, in milliseconds
    /// Tick interval at level 1
    pub initial_interval_ms: u64,
    /// Interval reduction per level gained
    pub interval_step_ms: u64,
    /// Fastest allowed interval
    pub min_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            initial_snake_length: 3,
            food_reward: 10,
            level_threshold: 100,
            level_rule: LevelRule::Threshold,
            initial_interval_ms: 150,
            interval_step_ms: 10,
            min_interval_ms: 50,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Derive the grid size from a pixel canvas and a cell size (240 / 12 = 20)
    pub fn from_canvas(canvas: usize, cell: usize) -> Result<Self, ConfigError> {
        if cell == 0 || canvas % cell != 0 {
            return Err(ConfigError::UnevenCanvas { canvas, cell });
        }
        Ok(Self::new(canvas / cell))
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Read a JSON configuration file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {:?}", path))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_snake_length < 3 {
            return Err(ConfigError::SnakeTooShort(self.initial_snake_length));
        }
        if self.grid_size <= self.initial_snake_length {
            return Err(ConfigError::GridTooSmall {
                grid_size: self.grid_size,
                snake_length: self.initial_snake_length,
            });
        }
        if self.food_reward == 0 {
            return Err(ConfigError::ZeroReward);
        }
        if self.level_threshold == 0 {
            return Err(ConfigError::ZeroLevelThreshold);
        }
        if self.min_interval_ms == 0 {
            return Err(ConfigError::ZeroMinInterval);
        }
        if self.min_interval_ms > self.initial_interval_ms {
            return Err(ConfigError::MinAboveInitial {
                min_ms: self.min_interval_ms,
                initial_ms: self.initial_interval_ms,
            });
        }
        Ok(())
    }

    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.initial_interval_ms)
    }

    /// Tick interval for a level: one step faster per level above 1, floored at the minimum
    pub fn interval_for_level(&self, level: u32) -> Duration {
        let reduction = self
            .interval_step_ms
            .saturating_mul(u64::from(level.saturating_sub(1)));
        let ms = self
            .initial_interval_ms
            .saturating_sub(reduction)
            .max(self.min_interval_ms);
        Duration::from_millis(ms)
    }

    /// Level after the score moved from `old_score` to `new_score`
    pub fn next_level(&self, current_level: u32, old_score: u32, new_score: u32) -> u32 {
        match self.level_rule {
            LevelRule::Threshold => 1 + new_score / self.level_threshold,
            LevelRule::Modulo => {
                if new_score != old_score && new_score % self.level_threshold == 0 {
                    current_level + 1
                } else {
                    current_level
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_size, 20);
        assert_eq!(config.initial_snake_length, 3);
        assert_eq!(config.food_reward, 10);
        assert_eq!(config.initial_interval(), Duration::from_millis(150));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_canvas() {
        let config = GameConfig::from_canvas(240, 12).unwrap();
        assert_eq!(config.grid_size, 20);

        assert_eq!(
            GameConfig::from_canvas(240, 7),
            Err(ConfigError::UnevenCanvas {
                canvas: 240,
                cell: 7
            })
        );
        assert!(GameConfig::from_canvas(240, 0).is_err());
    }

    #[test]
    fn test_interval_curve() {
        let config = GameConfig::default();
        assert_eq!(config.interval_for_level(1), Duration::from_millis(150));
        assert_eq!(config.interval_for_level(2), Duration::from_millis(140));
        assert_eq!(config.interval_for_level(11), Duration::from_millis(50));
        // Floor holds no matter how far the level climbs
        assert_eq!(config.interval_for_level(500), Duration::from_millis(50));
    }

    #[test]
    fn test_threshold_levels() {
        let config = GameConfig::default();
        assert_eq!(config.next_level(1, 80, 90), 1);
        assert_eq!(config.next_level(1, 90, 100), 2);
        assert_eq!(config.next_level(2, 100, 110), 2);
        assert_eq!(config.next_level(2, 190, 200), 3);
    }

    #[test]
    fn test_modulo_levels_skip_when_reward_misaligned() {
        let config = GameConfig {
            level_rule: LevelRule::Modulo,
            food_reward: 30,
            ..Default::default()
        };
        // 90 -> 120 steps over 100 and the modulo rule never notices
        assert_eq!(config.next_level(1, 90, 120), 1);
        assert_eq!(config.next_level(1, 270, 300), 2);
    }

    #[test]
    fn test_validation_errors() {
        let short = GameConfig {
            initial_snake_length: 2,
            ..Default::default()
        };
        assert_eq!(short.validate(), Err(ConfigError::SnakeTooShort(2)));

        assert!(matches!(
            GameConfig::new(3).validate(),
            Err(ConfigError::GridTooSmall { .. })
        ));

        let no_reward = GameConfig {
            food_reward: 0,
            ..Default::default()
        };
        assert_eq!(no_reward.validate(), Err(ConfigError::ZeroReward));

        let inverted = GameConfig {
            min_interval_ms: 200,
            ..Default::default()
        };
        assert_eq!(
            inverted.validate(),
            Err(ConfigError::MinAboveInitial {
                min_ms: 200,
                initial_ms: 150
            })
        );
    }

    #[test]
    fn test_load_partial_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "grid_size": 15, "level_rule": "modulo" }}"#).unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.grid_size, 15);
        assert_eq!(config.level_rule, LevelRule::Modulo);
        assert_eq!(config.food_reward, 10);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "level_threshold": 0 }}"#).unwrap();

        assert!(GameConfig::load(file.path()).is_err());
    }
}
