use slither_protocol::{Command, FoodItem, GameConfig, Point, TurnSnapshot};
use tracing::trace;

use crate::random::RandomPolicy;
use crate::safety::landing;
use crate::{Policy, safe_moves};

/// Heads for the closest food that is still worth eating.
///
/// Rotten food (value `<= 0`) is ignored. When no safe move closes the
/// distance the policy behaves like [`RandomPolicy`] with the same seed.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPolicy {
    fallback: RandomPolicy,
}

impl GreedyPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            fallback: RandomPolicy::new(seed),
        }
    }
}

/// Nearest positive-value food, ties broken by the order the host sent them.
fn nearest_food(head: Point, food: &[FoodItem]) -> Option<&FoodItem> {
    food.iter()
        .filter(|f| f.value > 0.0)
        .min_by_key(|f| head.distance_to(f.position))
}

impl Policy for GreedyPolicy {
    fn choose(&self, snapshot: &TurnSnapshot, config: &GameConfig) -> Command {
        let safe = safe_moves(snapshot, config);
        let head = snapshot.snake(config.my_id).and_then(|s| s.head());

        let goal = head.and_then(|h| nearest_food(h, &snapshot.food).map(|f| (h, f.position)));

        if let Some((head, target)) = goal {
            if let Some(direct) = Command::towards(head, target).filter(|c| safe.contains(c)) {
                trace!(%head, %target, command = %direct, "heading straight for food");
                return direct;
            }
            let before = head.distance_to(target);
            if let Some(closer) = safe.iter().find(|c| {
                landing(c, head, config).is_some_and(|p| p.distance_to(target) < before)
            }) {
                trace!(%head, %target, command = %closer, "detouring towards food");
                return closer.clone();
            }
        }

        let mut rng = self.fallback.rng_for(snapshot, config);
        RandomPolicy::pick(&mut rng, &safe)
    }

    fn name(&self) -> &'static str {
        "greedy"
    }
}
