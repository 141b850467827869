use super::board::{Board, Cell};
use super::config::*;
use super::direction::Direction;
use super::rng::RandomSource;

/// One snake controlled by this client.
#[derive(Clone, Debug)]
pub struct Bot {
    pub id: String,
    /// Percentage chance of leaving a direction that is still safe.
    pub likes_to_move: u32,
}

impl Bot {
    /// Create a bot with a freshly drawn turn propensity.
    pub fn new(id: String, rng: &mut impl RandomSource) -> Self {
        let likes_to_move = rng.between(LIKES_TO_MOVE_MIN, LIKES_TO_MOVE_MAX);
        Bot { id, likes_to_move }
    }

    /// Decide the next direction for this bot.
    ///
    /// The current direction and the two turns are probed with a collision
    /// ray of random length (3..=5 cells, drawn per probe). Returns `None` when
    /// no move should be sent: either nothing is safe, or the current
    /// direction is safe and the propensity roll did not trigger a turn.
    ///
    /// `cells` is the body ordered tail to head and must not be empty.
    pub fn decide(
        &self,
        direction: Direction,
        cells: &[Cell],
        board: &Board,
        rng: &mut impl RandomSource,
    ) -> Option<Direction> {
        let head = *cells.last()?;

        let mut turns = direction.turn_candidates();
        rng.shuffle(&mut turns);

        let probes = [direction, turns[0], turns[1]];
        let safe: Vec<Direction> = probes
            .into_iter()
            .filter(|&d| {
                let reach = rng.between(COLLISION_CHECK_RANGE_MIN, COLLISION_CHECK_RANGE_MAX);
                is_clear(board, head, d, reach)
            })
            .collect();

        let first = *safe.first()?;
        if first == direction && safe.len() > 1 {
            let roll = rng.between(0, TURN_ROLL_MAX);
            return if roll + self.likes_to_move > TURN_ROLL_MAX {
                Some(safe[1])
            } else {
                None
            };
        }
        Some(first)
    }
}

/// Walk `reach` cells from `head` towards `direction`. False as soon as a step
/// leaves the board or lands on a snake.
pub fn is_clear(board: &Board, head: Cell, direction: Direction, reach: u32) -> bool {
    let mut look = head;
    for _ in 0..reach {
        look = look.step(direction);
        if board.is_blocked(look) {
            return false;
        }
    }
    true
}
