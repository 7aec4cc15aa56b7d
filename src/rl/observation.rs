use burn::tensor::{Tensor, TensorData, backend::Backend};

use crate::game::{Direction, GameState, Turn};

/// Number of features in an encoded state
pub const STATE_SIZE: usize = 11;

/// Encoded game state as seen by the agent
pub type StateVector = [f32; STATE_SIZE];

/// Encode the game state into 11 binary features
///
/// Layout:
/// - 0..3: danger one block straight, right, left of the heading
/// - 3..7: heading is left, right, up, down
/// - 7..11: food is left, right, above, below the head
///
/// Food flags use strict comparisons, so a food cell in the same column
/// sets neither `left` nor `right`.
pub fn encode_state(state: &GameState) -> StateVector {
    let head = state.head();
    let heading = state.direction();

    let danger = |turn: Turn| {
        let probe = head.stepped(heading.turned(turn), state.block_size);
        flag(state.is_collision(probe))
    };

    [
        danger(Turn::Straight),
        danger(Turn::Right),
        danger(Turn::Left),
        flag(heading == Direction::Left),
        flag(heading == Direction::Right),
        flag(heading == Direction::Up),
        flag(heading == Direction::Down),
        flag(state.food.x < head.x),
        flag(state.food.x > head.x),
        flag(state.food.y < head.y),
        flag(state.food.y > head.y),
    ]
}

fn flag(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}

/// Stack encoded states into a `[n, 11]` tensor
pub fn states_to_tensor<B: Backend>(states: &[StateVector], device: &B::Device) -> Tensor<B, 2> {
    let data: Vec<f32> = states.iter().flatten().copied().collect();
    let tensor_data = TensorData::new(data, [states.len(), STATE_SIZE]);

    Tensor::<B, 2>::from_data(tensor_data, device)
}

/// Single state as a `[1, 11]` tensor
pub fn state_tensor<B: Backend>(state: &StateVector, device: &B::Device) -> Tensor<B, 2> {
    states_to_tensor(std::slice::from_ref(state), device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Position, Snake};
    use burn::backend::NdArray;
    use burn::backend::ndarray::NdArrayDevice;

    type TestBackend = NdArray<f32>;

    fn state(head: Position, direction: Direction, length: usize, food: Position) -> GameState {
        let snake = Snake::new(head, direction, length, 20);
        GameState::new(snake, food, 640, 480, 20)
    }

    #[test]
    fn test_initial_state_encoding() {
        let state = state(
            Position::new(320, 240),
            Direction::Right,
            2,
            Position::new(100, 400),
        );

        assert_eq!(
            encode_state(&state),
            [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn test_danger_straight_at_right_wall() {
        let state = state(
            Position::new(620, 240),
            Direction::Right,
            2,
            Position::new(0, 0),
        );
        let encoded = encode_state(&state);

        assert_eq!(encoded[0], 1.0);
        assert_eq!(encoded[1], 0.0);
        assert_eq!(encoded[2], 0.0);
    }

    #[test]
    fn test_danger_uses_clockwise_turns() {
        // Heading up in the top-left corner: straight and left are walls
        let state = state(Position::new(0, 0), Direction::Up, 2, Position::new(100, 100));
        let encoded = encode_state(&state);

        assert_eq!(&encoded[0..3], &[1.0, 0.0, 1.0]);
        assert_eq!(&encoded[3..7], &[0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_danger_from_own_body() {
        // Coiled snake: the cell to the right of the head is a body segment
        let mut snake = Snake::new(Position::new(100, 100), Direction::Right, 1, 20);
        snake.body.extend([
            Position::new(100, 120),
            Position::new(120, 120),
            Position::new(140, 120),
        ]);
        let state = GameState::new(snake, Position::new(300, 300), 640, 480, 20);

        let encoded = encode_state(&state);
        assert_eq!(&encoded[0..3], &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_food_ties_are_zero() {
        let state = state(
            Position::new(320, 240),
            Direction::Down,
            2,
            Position::new(320, 240),
        );
        let encoded = encode_state(&state);

        assert_eq!(&encoded[7..11], &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_exactly_one_heading_flag() {
        for direction in crate::game::CLOCKWISE {
            let state = state(Position::new(320, 240), direction, 2, Position::new(0, 0));
            let encoded = encode_state(&state);
            let set: f32 = encoded[3..7].iter().sum();
            assert_eq!(set, 1.0);
            assert!(encoded.iter().all(|v| *v == 0.0 || *v == 1.0));
        }
    }

    #[test]
    fn test_states_to_tensor_shape() {
        let device = NdArrayDevice::default();
        let states = [[0.0; STATE_SIZE], [1.0; STATE_SIZE], [0.5; STATE_SIZE]];

        let tensor = states_to_tensor::<TestBackend>(&states, &device);
        assert_eq!(tensor.dims(), [3, STATE_SIZE]);

        let single = state_tensor::<TestBackend>(&states[1], &device);
        assert_eq!(single.dims(), [1, STATE_SIZE]);
    }
}
