//! The reply a client sends each turn.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Point;

/// A movement command, written to the host as a single lowercase token.
///
/// The host may grow new tokens over time, so the set is open: anything that
/// isn't a cardinal direction round-trips through [`Command::Other`] untouched
/// instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Command {
    /// The host's default when a snake has not moved yet.
    #[default]
    North,
    East,
    South,
    West,
    /// A token this client doesn't know about.
    Other(String),
}

impl Command {
    /// The four cardinal directions, in the host's clockwise order.
    pub const CARDINALS: [Command; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// The exact token written to the wire.
    pub fn token(&self) -> &str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
            Self::Other(token) => token,
        }
    }

    /// Parses a token. Matching is exact; unknown tokens become `Other`.
    pub fn parse(token: &str) -> Self {
        match token {
            "north" => Self::North,
            "east" => Self::East,
            "south" => Self::South,
            "west" => Self::West,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_cardinal(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// The direction pointing the other way. `None` for unknown tokens.
    pub fn opposite(&self) -> Option<Self> {
        match self {
            Self::North => Some(Self::South),
            Self::South => Some(Self::North),
            Self::East => Some(Self::West),
            Self::West => Some(Self::East),
            Self::Other(_) => None,
        }
    }

    /// Unit step for this direction in wire coordinates (north is `+y`).
    pub fn delta(&self) -> (i64, i64) {
        match self {
            Self::North => (0, 1),
            Self::South => (0, -1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
            Self::Other(_) => (0, 0),
        }
    }

    /// Where a head at `from` ends up after this move, as signed coordinates
    /// so that stepping off the board can be detected by the caller.
    pub fn step(&self, from: Point) -> (i64, i64) {
        let (dx, dy) = self.delta();
        (i64::from(from.x) + dx, i64::from(from.y) + dy)
    }

    /// The cardinal direction that moves `from` closest to `to`.
    ///
    /// When both axes differ the larger offset wins; ties go to the vertical
    /// axis. Returns `None` when the points coincide.
    pub fn towards(from: Point, to: Point) -> Option<Self> {
        let dx = i64::from(to.x) - i64::from(from.x);
        let dy = i64::from(to.y) - i64::from(from.y);
        if dx == 0 && dy == 0 {
            return None;
        }
        let dir = if dx.abs() > dy.abs() {
            if dx > 0 { Self::East } else { Self::West }
        } else if dy > 0 {
            Self::North
        } else {
            Self::South
        };
        Some(dir)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Command {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for Command {
    fn from(token: String) -> Self {
        Self::parse(&token)
    }
}

impl From<Command> for String {
    fn from(command: Command) -> Self {
        command.token().to_string()
    }
}
