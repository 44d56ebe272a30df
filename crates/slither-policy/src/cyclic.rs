use slither_protocol::{Command, GameConfig, TurnSnapshot};

use crate::Policy;

/// The reference client's move pattern: a fixed six-step cycle indexed by
/// turn number. It ignores the board entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct CyclicPolicy;

impl CyclicPolicy {
    pub const CYCLE: [Command; 6] = [
        Command::North,
        Command::East,
        Command::East,
        Command::South,
        Command::West,
        Command::West,
    ];
}

impl Policy for CyclicPolicy {
    fn choose(&self, snapshot: &TurnSnapshot, _config: &GameConfig) -> Command {
        let slot = snapshot.turn as usize % Self::CYCLE.len();
        Self::CYCLE[slot].clone()
    }

    fn name(&self) -> &'static str {
        "cyclic"
    }
}
