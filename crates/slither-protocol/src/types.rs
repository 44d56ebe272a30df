//! Records decoded from the host's wire format.
//!
//! [`GameConfig`] is built once from the four setup lines and never changes.
//! Everything else ([`FoodItem`], [`SnakeState`], [`TurnSnapshot`]) is rebuilt
//! from scratch every turn and dropped once the command has been sent.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity and geometry
// ---------------------------------------------------------------------------

/// Identifier of a snake as transmitted by the host.
///
/// Ids are neither contiguous nor guaranteed to match a snake's position in
/// the per-turn list, so they are always looked up, never indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnakeId(pub u32);

impl fmt::Display for SnakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A cell on the board.
///
/// Wire coordinates have `y` growing northward; the host flips its own axis
/// before sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to `other`.
    pub fn distance_to(&self, other: Point) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// Game settings sent once, before the first turn.
///
/// Sentinel encodings from the wire (`<= 0` meaning "none") have already been
/// turned into `None` here; nothing downstream ever sees the raw sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: u32,
    pub height: u32,
    /// How many turns a food item lives. `None` means food never rots.
    pub food_lifetime: Option<u32>,
    /// Base value of a freshly spawned food item.
    pub food_value: f64,
    /// Number of snake lines in every turn.
    pub snake_count: usize,
    /// The snake this client controls.
    pub my_id: SnakeId,
    pub max_turns: u32,
    /// Per-move time limit. `None` means the host waits indefinitely.
    pub timeout: Option<Duration>,
}

impl GameConfig {
    /// Returns `true` if `(x, y)` lies on the board.
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        (0..i64::from(self.width)).contains(&x) && (0..i64::from(self.height)).contains(&y)
    }

    /// Returns `true` if `point` lies on the board.
    pub fn contains(&self, point: Point) -> bool {
        point.x < self.width && point.y < self.height
    }

    /// Value of a food item with `remaining` turns of life left.
    ///
    /// Food loses value linearly and turns negative in the second half of its
    /// life: `round(food_value * (remaining / lifetime * 2 - 1))`. Without a
    /// lifetime the per-item figure is ignored and the base value is returned.
    pub fn decayed_value(&self, remaining: f64) -> f64 {
        match self.food_lifetime {
            Some(lifetime) => {
                (self.food_value * (remaining / f64::from(lifetime) * 2.0 - 1.0)).round()
            }
            None => self.food_value,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-turn records
// ---------------------------------------------------------------------------

/// One food item on the board this turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    /// Turns of life remaining, as reported by the host.
    pub lifetime: f64,
    pub position: Point,
    /// Decayed value, see [`GameConfig::decayed_value`].
    pub value: f64,
}

/// One snake as reported this turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnakeState {
    pub id: SnakeId,
    /// Signed on the wire; no meaning is attached to negative values.
    pub kills: i32,
    pub deaths: u32,
    /// Segments, head first. Empty while the snake waits to respawn.
    pub body: Vec<Point>,
}

impl SnakeState {
    pub fn head(&self) -> Option<Point> {
        self.body.first().copied()
    }

    /// The segment directly behind the head, if any.
    pub fn neck(&self) -> Option<Point> {
        self.body.get(1).copied()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Dead snakes are sent with length 0 until they respawn.
    pub fn is_dead(&self) -> bool {
        self.body.is_empty()
    }

    pub fn occupies(&self, point: Point) -> bool {
        self.body.contains(&point)
    }
}

/// The fully decoded board for a single turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnSnapshot {
    /// Turn index, starting at 1.
    pub turn: u32,
    pub food: Vec<FoodItem>,
    /// Snakes in the order the host sent them.
    pub snakes: Vec<SnakeState>,
}

impl TurnSnapshot {
    /// Looks up a snake by id.
    pub fn snake(&self, id: SnakeId) -> Option<&SnakeState> {
        self.snakes.iter().find(|s| s.id == id)
    }

    /// Returns `true` if any snake's body covers `point`.
    pub fn is_occupied(&self, point: Point) -> bool {
        self.snakes.iter().any(|s| s.occupies(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(food_lifetime: Option<u32>, food_value: f64) -> GameConfig {
        GameConfig {
            width: 20,
            height: 10,
            food_lifetime,
            food_value,
            snake_count: 2,
            my_id: SnakeId(1),
            max_turns: 50,
            timeout: None,
        }
    }

    #[test]
    fn test_snake_id_display() {
        assert_eq!(SnakeId(7).to_string(), "#7");
    }

    #[test]
    fn test_point_distance_is_manhattan() {
        assert_eq!(Point::new(1, 1).distance_to(Point::new(4, 5)), 7);
        assert_eq!(Point::new(4, 5).distance_to(Point::new(1, 1)), 7);
    }

    #[test]
    fn test_in_bounds_edges() {
        let cfg = config(None, 1.0);
        assert!(cfg.in_bounds(0, 0));
        assert!(cfg.in_bounds(19, 9));
        assert!(!cfg.in_bounds(20, 9));
        assert!(!cfg.in_bounds(19, 10));
        assert!(!cfg.in_bounds(-1, 0));
        assert!(cfg.contains(Point::new(19, 9)));
        assert!(!cfg.contains(Point::new(0, 10)));
    }

    #[test]
    fn test_decay_full_half_and_empty() {
        let cfg = config(Some(10), 4.0);
        assert_eq!(cfg.decayed_value(10.0), 4.0);
        assert_eq!(cfg.decayed_value(5.0), 0.0);
        assert_eq!(cfg.decayed_value(0.0), -4.0);
    }

    #[test]
    fn test_decay_rounds_to_nearest() {
        let cfg = config(Some(4), 3.0);
        // 3 * (3/4 * 2 - 1) = 1.5 → 2
        assert_eq!(cfg.decayed_value(3.0), 2.0);
    }

    #[test]
    fn test_no_lifetime_ignores_remaining() {
        let cfg = config(None, 2.5);
        assert_eq!(cfg.decayed_value(0.0), 2.5);
        assert_eq!(cfg.decayed_value(1_000.0), 2.5);
        assert_eq!(cfg.decayed_value(-3.0), 2.5);
    }

    #[test]
    fn test_snake_head_neck_and_death() {
        let snake = SnakeState {
            id: SnakeId(3),
            kills: -1,
            deaths: 2,
            body: vec![Point::new(5, 5), Point::new(5, 6)],
        };
        assert_eq!(snake.head(), Some(Point::new(5, 5)));
        assert_eq!(snake.neck(), Some(Point::new(5, 6)));
        assert!(!snake.is_dead());
        assert!(snake.occupies(Point::new(5, 6)));

        let dead = SnakeState {
            body: Vec::new(),
            ..snake
        };
        assert!(dead.is_dead());
        assert_eq!(dead.head(), None);
    }

    #[test]
    fn test_snapshot_lookup_ignores_order() {
        let snapshot = TurnSnapshot {
            turn: 1,
            food: Vec::new(),
            snakes: vec![
                SnakeState {
                    id: SnakeId(9),
                    kills: 0,
                    deaths: 0,
                    body: vec![Point::new(1, 1)],
                },
                SnakeState {
                    id: SnakeId(2),
                    kills: 0,
                    deaths: 0,
                    body: vec![Point::new(3, 3)],
                },
            ],
        };
        assert_eq!(snapshot.snake(SnakeId(2)).map(|s| s.len()), Some(1));
        assert!(snapshot.snake(SnakeId(5)).is_none());
        assert!(snapshot.is_occupied(Point::new(1, 1)));
        assert!(!snapshot.is_occupied(Point::new(2, 2)));
    }
}
