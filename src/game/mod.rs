//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O, timer or rendering
//! dependencies. The caller owns the [`GameState`] and drives [`GameEngine::tick`]
//! from whatever periodic trigger it likes.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, Input};
pub use config::{ConfigError, GameConfig, LevelRule};
pub use engine::{GameEngine, TickOutcome, TickResult};
pub use state::{CollisionType, GameState, Position, RunState, Snake, Snapshot};
