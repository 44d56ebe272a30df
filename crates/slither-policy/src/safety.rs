use slither_protocol::{Command, GameConfig, Point, TurnSnapshot};

/// Cardinal moves that keep our head on the board and off every body.
///
/// Tails are treated as solid even though they usually move away. Returns an
/// empty list when our snake is missing from the snapshot or dead.
pub fn safe_moves(snapshot: &TurnSnapshot, config: &GameConfig) -> Vec<Command> {
    let Some(head) = snapshot.snake(config.my_id).and_then(|s| s.head()) else {
        return Vec::new();
    };
    Command::CARDINALS
        .into_iter()
        .filter(|cmd| landing(cmd, head, config).is_some_and(|p| !snapshot.is_occupied(p)))
        .collect()
}

/// The cell `cmd` moves `head` onto, or `None` if that leaves the board.
pub(crate) fn landing(cmd: &Command, head: Point, config: &GameConfig) -> Option<Point> {
    let (x, y) = cmd.step(head);
    if !config.in_bounds(x, y) {
        return None;
    }
    Some(Point::new(u32::try_from(x).ok()?, u32::try_from(y).ok()?))
}

#[cfg(test)]
mod tests {
    use slither_protocol::{SnakeId, SnakeState};

    use super::*;

    fn config() -> GameConfig {
        GameConfig {
            width: 5,
            height: 5,
            food_lifetime: None,
            food_value: 1.0,
            snake_count: 2,
            my_id: SnakeId(0),
            max_turns: 10,
            timeout: None,
        }
    }

    fn snake(id: u32, body: &[(u32, u32)]) -> SnakeState {
        SnakeState {
            id: SnakeId(id),
            kills: 0,
            deaths: 0,
            body: body.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        }
    }

    #[test]
    fn test_corner_excludes_walls() {
        let snap = TurnSnapshot {
            turn: 1,
            food: Vec::new(),
            snakes: vec![snake(0, &[(0, 0)])],
        };
        assert_eq!(safe_moves(&snap, &config()), vec![Command::North, Command::East]);
    }

    #[test]
    fn test_bodies_are_blocked() {
        // Our neck is to the south, another snake sits to the east.
        let snap = TurnSnapshot {
            turn: 1,
            food: Vec::new(),
            snakes: vec![snake(0, &[(2, 2), (2, 1)]), snake(1, &[(3, 2), (4, 2)])],
        };
        assert_eq!(safe_moves(&snap, &config()), vec![Command::North, Command::West]);
    }

    #[test]
    fn test_missing_or_dead_snake_has_no_safe_moves() {
        let mut snap = TurnSnapshot {
            turn: 1,
            food: Vec::new(),
            snakes: vec![snake(1, &[(1, 1)])],
        };
        assert!(safe_moves(&snap, &config()).is_empty());

        snap.snakes.push(snake(0, &[]));
        assert!(safe_moves(&snap, &config()).is_empty());
    }

    #[test]
    fn test_landing_off_board_is_none() {
        let cfg = config();
        assert_eq!(landing(&Command::West, Point::new(0, 3), &cfg), None);
        assert_eq!(landing(&Command::North, Point::new(0, 4), &cfg), None);
        assert_eq!(
            landing(&Command::East, Point::new(0, 4), &cfg),
            Some(Point::new(1, 4))
        );
    }
}
