//! Error types for the protocol layer.
//!
//! Each crate in Slither defines its own error enum. A `ProtocolError` always
//! means the bytes were readable but did not form the record the host was
//! supposed to send (or there were no more bytes at all).

use std::fmt;

/// The kind of line a decoder was expecting when it failed.
///
/// Carried inside [`ProtocolError::Format`] so that a message like
/// "malformed snake line" points straight at the offending record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    /// Setup line 1: `width height`.
    Board,
    /// Setup line 2: `food_lifetime food_value`.
    FoodRules,
    /// Setup line 3: `snake_count my_id`.
    Players,
    /// Setup line 4: `max_turns timeout`.
    TurnLimits,
    /// Turn header: `num_food`.
    FoodCount,
    /// One `lifetime x y` entry.
    Food,
    /// One `id kills deaths length x0 y0 ...` entry.
    Snake,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Board => "board",
            Self::FoodRules => "food rules",
            Self::Players => "players",
            Self::TurnLimits => "turn limits",
            Self::FoodCount => "food count",
            Self::Food => "food",
            Self::Snake => "snake",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while decoding the host's byte stream.
///
/// Only [`Format`](Self::Format) and setup-level [`Range`](Self::Range)
/// errors are ever fatal. Out-of-board coordinates on a single food or snake
/// entry never surface here: the turn decoder logs and drops the entry.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A required line had the wrong number of fields, or a field did not
    /// parse as the expected numeric type. Framing is lost after this.
    #[error("malformed {record} line: {reason}")]
    Format { record: Record, reason: String },

    /// A setup field that must be positive was not.
    #[error("{field} must be positive, got {value}")]
    Range { field: &'static str, value: i64 },

    /// The stream ended while a record was still required.
    ///
    /// This is how the host says "game over"; callers treat it as a clean
    /// shutdown, not a failure.
    #[error("input stream closed")]
    StreamClosed,

    /// A line was fed to a decoder that had already produced its record.
    #[error("decoder already produced its record")]
    AlreadyComplete,
}

impl ProtocolError {
    /// Shorthand for building a [`ProtocolError::Format`].
    pub fn format(record: Record, reason: impl Into<String>) -> Self {
        Self::Format {
            record,
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is the graceful end-of-input signal.
    pub fn is_stream_closed(&self) -> bool {
        matches!(self, Self::StreamClosed)
    }
}
