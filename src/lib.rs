//! Pixel Snake - a single-screen snake game
//!
//! This library provides:
//! - The simulation core (game module): grid, snake, food, speed curve
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - Session statistics (metrics module)
//! - The terminal driver that owns the tick timer (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
