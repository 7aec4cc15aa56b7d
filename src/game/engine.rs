use super::{
    action::{Action, Direction},
    config::GameConfig,
    error::GameError,
    state::{GameState, Position, Snake},
};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

/// Random draws before food placement falls back to scanning free cells
const MAX_FOOD_DRAWS: usize = 1000;

/// Length of the snake after a reset
pub const INITIAL_SNAKE_LENGTH: usize = 2;

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Too many frames without progress
    Stall,
    /// Snake covers the whole board
    BoardFilled,
}

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Set when this step ended the episode
    pub end_reason: Option<EndReason>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub reward: f32,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Score after the step
    pub score: u32,
    pub info: StepInfo,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> Result<GameState, GameError> {
        let block = self.config.block_size;
        let head = Position::new(
            (self.config.columns() / 2) * block,
            (self.config.rows() / 2) * block,
        );

        let snake = Snake::new(head, Direction::Right, INITIAL_SNAKE_LENGTH, block);
        let food = self.place_food(&snake)?;

        Ok(GameState::new(
            snake,
            food,
            self.config.width,
            self.config.height,
            block,
        ))
    }

    /// Execute one step of the game
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        if !state.is_alive {
            return StepResult {
                reward: 0.0,
                terminated: true,
                score: state.score,
                info: StepInfo {
                    ate_food: false,
                    end_reason: None,
                },
            };
        }

        state.frame_count += 1;

        let current = state.snake.direction;
        state.snake.direction = match action {
            Action::Turn(turn) => current.turned(turn),
            Action::Steer(direction) if current.is_opposite(direction) => current,
            Action::Steer(direction) => direction,
        };

        let new_head = state.head().stepped(state.snake.direction, state.block_size);
        state.snake.push_head(new_head);

        // The new head stays in place and the tail is not trimmed on a terminal step
        if let Some(reason) = self.check_termination(state, new_head) {
            return self.end_episode(state, reason, self.config.death_penalty, false);
        }

        if new_head == state.food {
            state.score += 1;
            return match self.place_food(&state.snake) {
                Ok(food) => {
                    state.food = food;
                    StepResult {
                        reward: self.config.food_reward,
                        terminated: false,
                        score: state.score,
                        info: StepInfo {
                            ate_food: true,
                            end_reason: None,
                        },
                    }
                }
                Err(_) => self.end_episode(
                    state,
                    EndReason::BoardFilled,
                    self.config.food_reward,
                    true,
                ),
            };
        }

        state.snake.pop_tail();

        StepResult {
            reward: 0.0,
            terminated: false,
            score: state.score,
            info: StepInfo {
                ate_food: false,
                end_reason: None,
            },
        }
    }

    fn end_episode(
        &self,
        state: &mut GameState,
        reason: EndReason,
        reward: f32,
        ate_food: bool,
    ) -> StepResult {
        state.is_alive = false;
        StepResult {
            reward,
            terminated: true,
            score: state.score,
            info: StepInfo {
                ate_food,
                end_reason: Some(reason),
            },
        }
    }

    /// Check whether the freshly prepended head ends the episode
    fn check_termination(&self, state: &GameState, head: Position) -> Option<EndReason> {
        if !state.is_in_bounds(head) {
            return Some(EndReason::Wall);
        }

        if state.snake.collides_with_body(head) {
            return Some(EndReason::SelfCollision);
        }

        let stalled = self
            .config
            .stall_factor
            .is_some_and(|factor| state.frame_count as usize > factor as usize * state.snake.len());
        if stalled {
            return Some(EndReason::Stall);
        }

        None
    }

    /// Pick a uniformly random cell not covered by the snake
    fn place_food(&mut self, snake: &Snake) -> Result<Position, GameError> {
        let block = self.config.block_size;
        let (columns, rows) = (self.config.columns(), self.config.rows());

        for _ in 0..MAX_FOOD_DRAWS {
            let pos = Position::new(
                self.rng.gen_range(0..columns) * block,
                self.rng.gen_range(0..rows) * block,
            );
            if !snake.contains(pos) {
                return Ok(pos);
            }
        }

        let free: Vec<Position> = (0..rows)
            .flat_map(|row| (0..columns).map(move |col| Position::new(col * block, row * block)))
            .filter(|pos| !snake.contains(*pos))
            .collect();

        free.choose(&mut self.rng)
            .copied()
            .ok_or(GameError::BoardFull)
    }
}
