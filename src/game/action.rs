/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Intent delivered to the simulation core by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Request a new heading for the next tick
    Turn(Direction),
    /// Flip between running and paused
    TogglePause,
}

impl From<Direction> for Input {
    fn from(direction: Direction) -> Self {
        Input::Turn(direction)
    }
}
