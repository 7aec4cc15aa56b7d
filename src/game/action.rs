use super::error::GameError;

/// Absolute heading of the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Headings in clockwise order. Turning right moves one slot forward,
/// turning left one slot back (both modulo 4).
pub const CLOCKWISE: [Direction; 4] = [
    Direction::Right,
    Direction::Down,
    Direction::Left,
    Direction::Up,
];

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

    /// Returns the unit delta (dx, dy) for moving in this direction.
    /// Multiply by the block size to get a pixel offset.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    fn clockwise_index(&self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Up => 3,
        }
    }

    /// Heading after applying a relative turn
    pub fn turned(&self, turn: Turn) -> Direction {
        let idx = self.clockwise_index();
        let next = match turn {
            Turn::Straight => idx,
            Turn::Right => (idx + 1) % 4,
            Turn::Left => (idx + 3) % 4,
        };
        CLOCKWISE[next]
    }
}

/// Turn relative to the current heading.
///
/// The discriminant is the slot in the agent's one-hot action vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turn {
    Straight = 0,
    Right = 1,
    Left = 2,
}

/// Length of a one-hot action vector
pub const ACTION_SIZE: usize = 3;

impl Turn {
    pub const ALL: [Turn; ACTION_SIZE] = [Turn::Straight, Turn::Right, Turn::Left];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Turn> {
        Self::ALL.get(idx).copied()
    }

    /// Decode a one-hot action vector.
    ///
    /// Exactly three slots, exactly one of them 1.0 and the others 0.0.
    pub fn from_one_hot(action: &[f32]) -> Result<Turn, GameError> {
        let invalid = || GameError::InvalidAction {
            values: action.to_vec(),
        };

        if action.len() != ACTION_SIZE {
            return Err(invalid());
        }

        let mut hot = None;
        for (idx, &value) in action.iter().enumerate() {
            if value == 1.0 {
                if hot.is_some() {
                    return Err(invalid());
                }
                hot = Some(idx);
            } else if value != 0.0 {
                return Err(invalid());
            }
        }

        hot.and_then(Turn::from_index).ok_or_else(invalid)
    }

    pub fn one_hot(self) -> [f32; ACTION_SIZE] {
        let mut action = [0.0; ACTION_SIZE];
        action[self.index()] = 1.0;
        action
    }
}

/// Input that drives one game step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Relative turn, as chosen by the agent
    Turn(Turn),
    /// Absolute heading from the keyboard; a reversal request is ignored
    Steer(Direction),
}

impl From<Turn> for Action {
    fn from(turn: Turn) -> Self {
        Action::Turn(turn)
    }
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        Action::Steer(direction)
    }
}
