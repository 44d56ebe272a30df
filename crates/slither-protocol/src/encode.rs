//! Renders records back into wire lines, the way the host writes them.
//!
//! The client itself only decodes; these functions exist for the host side
//! of test harnesses and for replaying recorded snapshots into a client.

use std::fmt::Write as _;

use crate::{FoodItem, GameConfig, SnakeState, TurnSnapshot};

/// Timeout sentinel the host sends when it will wait forever.
const NO_TIMEOUT: i64 = -1;

/// Renders the four setup lines.
pub fn encode_config(config: &GameConfig) -> Vec<String> {
    let timeout = config
        .timeout
        .map(|t| i64::try_from(t.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(NO_TIMEOUT);
    vec![
        format!("{} {}", config.width, config.height),
        format!("{} {}", config.food_lifetime.unwrap_or(0), config.food_value),
        format!("{} {}", config.snake_count, config.my_id.0),
        format!("{} {}", config.max_turns, timeout),
    ]
}

/// Renders one `lifetime x y` line.
pub fn encode_food(food: &FoodItem) -> String {
    format!("{} {} {}", food.lifetime, food.position.x, food.position.y)
}

/// Renders one `id kills deaths length x0 y0 ...` line.
pub fn encode_snake(snake: &SnakeState) -> String {
    let mut line = format!(
        "{} {} {} {}",
        snake.id.0,
        snake.kills,
        snake.deaths,
        snake.body.len()
    );
    for p in &snake.body {
        // Writing to a String cannot fail.
        let _ = write!(line, " {} {}", p.x, p.y);
    }
    line
}

/// Renders a whole turn: the food count, each food line, each snake line.
pub fn encode_turn(snapshot: &TurnSnapshot) -> Vec<String> {
    let mut lines = Vec::with_capacity(1 + snapshot.food.len() + snapshot.snakes.len());
    lines.push(snapshot.food.len().to_string());
    lines.extend(snapshot.food.iter().map(encode_food));
    lines.extend(snapshot.snakes.iter().map(encode_snake));
    lines
}
