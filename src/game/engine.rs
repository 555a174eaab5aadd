use super::{
    action::{Direction, Input},
    config::GameConfig,
    state::{CollisionType, GameState, Position, RunState, Snake, Snapshot},
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::time::Duration;
use tracing::{debug, info};

/// Starting column of the snake's head on a roomy grid
const START_HEAD_COLUMN: usize = 5;

/// What happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game was not running; nothing changed
    Idle,
    /// The snake moved one cell
    Moved,
    /// The snake moved onto the food and grew
    Ate,
    /// The move was fatal; the snake stays where it was
    Crashed(CollisionType),
    /// The snake ate the last food and now fills the grid
    Cleared,
}

/// Result of a game tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    pub outcome: TickOutcome,
    /// Renderable state after the tick, `None` when the tick did nothing
    pub snapshot: Option<Snapshot>,
    /// New tick interval, present only when the level changed the speed
    pub new_interval: Option<Duration>,
}

impl TickResult {
    fn idle() -> Self {
        Self {
            outcome: TickOutcome::Idle,
            snapshot: None,
            new_interval: None,
        }
    }

    /// Whether this tick ended the game
    pub fn terminated(&self) -> bool {
        matches!(self.outcome, TickOutcome::Crashed(_) | TickOutcome::Cleared)
    }
}

/// The game engine that handles all game logic
///
/// The engine holds configuration and randomness only. The single [`GameState`]
/// belongs to the caller and is passed in by reference, so the engine never owns
/// a timer or any ambient state.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Start a fresh game: short horizontal snake heading right, counters reset
    pub fn initialize(&mut self) -> GameState {
        let size = self.config.grid_size;
        let length = self.config.initial_snake_length;
        let head_x = START_HEAD_COLUMN
            .min(size.saturating_sub(1))
            .max(length.saturating_sub(1));

        let snake = Snake::new(
            Position::new(head_x as i32, (size / 2) as i32),
            Direction::Right,
            length,
        );

        let interval = self.config.initial_interval();
        let state = match self.place_food(&snake) {
            Some(food) => GameState::new(snake, food, size, interval),
            None => {
                // Only reachable with an unvalidated config
                let mut state = GameState::new(snake, Position::new(0, 0), size, interval);
                state.food = None;
                state.run_state = RunState::Cleared;
                state
            }
        };

        info!(
            grid = size,
            length,
            interval_ms = interval.as_millis() as u64,
            "New game started"
        );
        state
    }

    /// Pick a uniformly random free cell, or `None` if the snake covers the grid
    pub fn place_food(&mut self, snake: &Snake) -> Option<Position> {
        let size = self.config.grid_size as i32;
        let free: Vec<Position> = (0..size)
            .flat_map(|y| (0..size).map(move |x| Position::new(x, y)))
            .filter(|pos| !snake.occupies(*pos))
            .collect();

        free.choose(&mut self.rng).copied()
    }

    /// Apply an input. Returns whether it changed the state.
    ///
    /// Turns are checked against the committed heading, not the pending one, so
    /// two quick key presses within one tick cannot fold the snake back on itself.
    pub fn set_direction(&self, state: &mut GameState, input: Input) -> bool {
        match input {
            Input::TogglePause => match state.run_state {
                RunState::Running => {
                    state.run_state = RunState::Paused;
                    debug!(score = state.score, "Paused");
                    true
                }
                RunState::Paused => {
                    state.run_state = RunState::Running;
                    debug!(score = state.score, "Resumed");
                    true
                }
                RunState::Over | RunState::Cleared => false,
            },
            Input::Turn(direction) => {
                if state.run_state.is_terminal() {
                    return false;
                }
                if state.snake.direction.is_opposite(direction) {
                    return false;
                }
                state.snake.pending_direction = direction;
                true
            }
        }
    }

    /// Advance the game by one cell
    pub fn tick(&mut self, state: &mut GameState) -> TickResult {
        if !state.is_running() {
            return TickResult::idle();
        }

        let heading = state.snake.pending_direction;
        let new_head = state.snake.head().moved_in_direction(heading);

        if let Some(collision) = self.check_collision(state, new_head) {
            state.snake.direction = heading;
            state.run_state = RunState::Over;
            info!(
                ?collision,
                score = state.score,
                level = state.level,
                length = state.snake.len(),
                "Game over"
            );
            return TickResult {
                outcome: TickOutcome::Crashed(collision),
                snapshot: Some(state.snapshot()),
                new_interval: None,
            };
        }

        state.snake.direction = heading;
        state.steps += 1;
        let ate_food = state.food == Some(new_head);
        state.snake.advance_to(new_head, ate_food);

        if !ate_food {
            return TickResult {
                outcome: TickOutcome::Moved,
                snapshot: Some(state.snapshot()),
                new_interval: None,
            };
        }

        let new_interval = self.award_food(state);

        let outcome = match self.place_food(&state.snake) {
            Some(food) => {
                state.food = Some(food);
                TickOutcome::Ate
            }
            None => {
                state.food = None;
                state.run_state = RunState::Cleared;
                info!(score = state.score, level = state.level, "Board cleared");
                TickOutcome::Cleared
            }
        };

        TickResult {
            outcome,
            snapshot: Some(state.snapshot()),
            new_interval,
        }
    }

    /// Bump score and level. Returns the new interval if the speed changed.
    fn award_food(&self, state: &mut GameState) -> Option<Duration> {
        let old_score = state.score;
        state.score = state.score.saturating_add(self.config.food_reward);

        let level = self.config.next_level(state.level, old_score, state.score);
        if level <= state.level {
            return None;
        }
        state.level = level;

        let interval = self.config.interval_for_level(level);
        info!(
            level,
            score = state.score,
            interval_ms = interval.as_millis() as u64,
            "Level up"
        );
        if interval == state.tick_interval {
            return None;
        }
        state.tick_interval = interval;
        Some(interval)
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        // Check wall collision
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        // The tail has not moved yet, so it counts as well
        if state.snake.occupies(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }
}
