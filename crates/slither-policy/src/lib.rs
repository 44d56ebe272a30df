//! Move-selection policies for Slither.
//!
//! A policy looks at one decoded turn and picks a [`Command`]. The turn loop
//! doesn't care how: anything implementing [`Policy`] can be dropped in.
//!
//! # Key types
//!
//! - [`Policy`]: the trait policies implement
//! - [`CyclicPolicy`]: the reference client's fixed six-step cycle
//! - [`RandomPolicy`]: a seeded random walk that avoids walls and bodies
//! - [`GreedyPolicy`]: heads for the nearest food worth eating
//! - [`PolicyKind`]: picks one of the above by name at startup

mod cyclic;
mod error;
mod greedy;
mod random;
mod safety;

use std::fmt;
use std::str::FromStr;

use slither_clock::Deadline;
use slither_protocol::{Command, GameConfig, TurnSnapshot};

pub use cyclic::CyclicPolicy;
pub use error::PolicyError;
pub use greedy::GreedyPolicy;
pub use random::RandomPolicy;
pub use safety::safe_moves;

/// The trait every move-selection policy implements.
///
/// A policy must be a pure function of its inputs: calling it twice with the
/// same snapshot and config must return the same command. Policies that want
/// randomness derive it from the inputs (see [`RandomPolicy`]).
///
/// The turn loop calls [`choose_within`](Self::choose_within), which by
/// default ignores the deadline and delegates to [`choose`](Self::choose).
/// None of the shipped policies poll the deadline. It is enforced only after
/// the fact: the turn loop times the call, and if it overran, the answer is
/// discarded and a fallback is sent instead.
pub trait Policy {
    /// Picks this turn's command.
    fn choose(&self, snapshot: &TurnSnapshot, config: &GameConfig) -> Command;

    /// Picks this turn's command, with a deadline to poll.
    ///
    /// Override this in policies that iterate, checking
    /// [`Deadline::expired`] between steps and returning early.
    fn choose_within(
        &self,
        snapshot: &TurnSnapshot,
        config: &GameConfig,
        _deadline: &Deadline,
    ) -> Command {
        self.choose(snapshot, config)
    }

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn choose(&self, snapshot: &TurnSnapshot, config: &GameConfig) -> Command {
        (**self).choose(snapshot, config)
    }

    fn choose_within(
        &self,
        snapshot: &TurnSnapshot,
        config: &GameConfig,
        deadline: &Deadline,
    ) -> Command {
        (**self).choose_within(snapshot, config, deadline)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

// ---------------------------------------------------------------------------
// PolicyKind
// ---------------------------------------------------------------------------

/// The shipped policies, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyKind {
    #[default]
    Cyclic,
    Random,
    Greedy,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 3] = [Self::Cyclic, Self::Random, Self::Greedy];

    /// Builds the policy. `seed` is ignored by policies without randomness.
    pub fn build(self, seed: u64) -> Box<dyn Policy> {
        match self {
            Self::Cyclic => Box::new(CyclicPolicy),
            Self::Random => Box::new(RandomPolicy::new(seed)),
            Self::Greedy => Box::new(GreedyPolicy::new(seed)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cyclic => "cyclic",
            Self::Random => "random",
            Self::Greedy => "greedy",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| PolicyError::UnknownPolicy(s.to_string()))
    }
}
