//! Wire protocol for Slither.
//!
//! The host drives a snake client over a plain text stream: four setup lines,
//! then one block of lines per turn. This crate turns those lines into typed
//! records and nothing more:
//!
//! - **Types** ([`GameConfig`], [`TurnSnapshot`], [`SnakeState`], [`FoodItem`])
//!   are the decoded records.
//! - **Decoders** ([`ConfigDecoder`], [`TurnDecoder`], [`decode_config`],
//!   [`decode_turn`]) parse and validate lines.
//! - **Encoders** ([`encode_config`], [`encode_turn`]) render records back
//!   into wire lines, for host-side harnesses.
//! - **Commands** ([`Command`]) are what the client sends back.
//! - **Errors** ([`ProtocolError`]) describe what went wrong while decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (lines) and the turn loop. It
//! doesn't know about timing or output; it only knows how lines map to
//! records.
//!
//! ```text
//! Transport (lines) → Protocol (records) → Turn loop (commands)
//! ```

mod command;
mod decode;
mod encode;
mod error;
mod types;

pub use command::Command;
pub use decode::{
    ConfigDecoder, ConfigPhase, Progress, TurnDecoder, TurnPhase, decode_config, decode_turn,
};
pub use encode::{encode_config, encode_food, encode_snake, encode_turn};
pub use error::{ProtocolError, Record};
pub use types::{FoodItem, GameConfig, Point, SnakeId, SnakeState, TurnSnapshot};
