use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slither_protocol::{Command, GameConfig, TurnSnapshot};

use crate::{Policy, safe_moves};

/// Picks a random cardinal direction, preferring ones that don't immediately
/// kill the snake.
///
/// The generator is reseeded from `(seed, turn, my_id)` on every call, so the
/// same inputs always give the same answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy {
    seed: u64,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub(crate) fn rng_for(&self, snapshot: &TurnSnapshot, config: &GameConfig) -> StdRng {
        let mixed = self.seed ^ (u64::from(snapshot.turn) << 32) ^ u64::from(config.my_id.0);
        StdRng::seed_from_u64(mixed)
    }

    /// Uniform pick among `candidates`, or among all cardinals if empty.
    pub(crate) fn pick(rng: &mut StdRng, candidates: &[Command]) -> Command {
        if candidates.is_empty() {
            let all = Command::CARDINALS;
            return all[rng.random_range(0..all.len())].clone();
        }
        candidates[rng.random_range(0..candidates.len())].clone()
    }
}

impl Policy for RandomPolicy {
    fn choose(&self, snapshot: &TurnSnapshot, config: &GameConfig) -> Command {
        let mut rng = self.rng_for(snapshot, config);
        Self::pick(&mut rng, &safe_moves(snapshot, config))
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use slither_protocol::{Point, SnakeId, SnakeState};

    use super::*;

    fn config() -> GameConfig {
        GameConfig {
            width: 3,
            height: 3,
            food_lifetime: None,
            food_value: 1.0,
            snake_count: 1,
            my_id: SnakeId(4),
            max_turns: 10,
            timeout: None,
        }
    }

    fn snapshot(turn: u32, body: Vec<Point>) -> TurnSnapshot {
        TurnSnapshot {
            turn,
            food: Vec::new(),
            snakes: vec![SnakeState {
                id: SnakeId(4),
                kills: 0,
                deaths: 0,
                body,
            }],
        }
    }

    #[test]
    fn test_only_safe_move_is_taken() {
        // Head in the top-left corner with the neck to the east: only south is open.
        let snap = snapshot(1, vec![Point::new(0, 2), Point::new(1, 2)]);
        for seed in 0..32 {
            assert_eq!(RandomPolicy::new(seed).choose(&snap, &config()), Command::South);
        }
    }

    #[test]
    fn test_trapped_snake_still_gets_a_cardinal() {
        let snap = snapshot(
            1,
            vec![
                Point::new(0, 0),
                Point::new(1, 0),
                Point::new(1, 1),
                Point::new(0, 1),
            ],
        );
        let cmd = RandomPolicy::new(9).choose(&snap, &config());
        assert!(cmd.is_cardinal());
    }

    #[test]
    fn test_repeatable_for_same_inputs() {
        let policy = RandomPolicy::new(1234);
        let snap = snapshot(7, vec![Point::new(1, 1)]);
        let first = policy.choose(&snap, &config());
        for _ in 0..10 {
            assert_eq!(policy.choose(&snap, &config()), first);
        }
    }
}
