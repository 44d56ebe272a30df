//! # Slither
//!
//! Client framework for a turn-based multiplayer snake game.
//!
//! A host process feeds the client the game setup and then one board state
//! per turn over a plain text stream; the client answers each turn with a
//! single direction. Slither handles the reading, validation, timing and
//! writing; you supply a [`Policy`](slither_policy::Policy).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use slither::prelude::*;
//!
//! # async fn play() -> Result<(), SlitherError> {
//! let conn = StdioConnection::stdio();
//! let policy = PolicyKind::Greedy.build(7);
//! let summary = TurnLoop::new(conn, policy, ClientConfig::default()).run().await?;
//! eprintln!("played {} turns", summary.turns_played);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod driver;
mod error;
pub mod logging;
pub mod transcript;

pub use error::SlitherError;

pub use slither_clock as clock;
pub use slither_policy as policy;
pub use slither_protocol as protocol;
pub use slither_transport as transport;

pub mod prelude {
    pub use crate::SlitherError;
    pub use crate::config::ClientConfig;
    pub use crate::driver::{LoopSummary, TurnLoop};
    pub use slither_clock::{ClockConfig, Deadline};
    pub use slither_policy::{CyclicPolicy, GreedyPolicy, Policy, PolicyKind, RandomPolicy};
    pub use slither_protocol::{Command, GameConfig, Point, SnakeId, SnakeState, TurnSnapshot};
    pub use slither_transport::{Connection, StdioConnection, StreamConnection};
}
