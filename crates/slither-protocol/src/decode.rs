//! Line decoders for the setup block and for each turn.
//!
//! Both decoders are push-driven state machines: the caller hands them one
//! line at a time and they answer [`Progress::NeedMore`] until the record is
//! complete. They never read ahead, so a decoder consumes exactly the lines
//! its record occupies and the next decoder starts on the right line.
//!
//! ```text
//! ConfigDecoder:  Board → FoodRules → Players → TurnLimits → Done
//! TurnDecoder:    AwaitingCount → ReadingFood(n) → ReadingSnakes(n) → Done
//! ```
//!
//! [`decode_config`] and [`decode_turn`] wrap the state machines for callers
//! that already have the lines in an iterator.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use tracing::{trace, warn};

use crate::{FoodItem, GameConfig, Point, ProtocolError, Record, SnakeId, SnakeState, TurnSnapshot};

/// Fields before the coordinate pairs on a snake line.
const SNAKE_HEADER_FIELDS: usize = 4;

/// Upper bound on up-front allocation driven by a count the host sent.
const MAX_PREALLOC: usize = 1024;

/// Result of feeding one line to a decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress<T> {
    /// The record needs more lines.
    NeedMore,
    /// The record is complete; the decoder is now finished.
    Complete(T),
}

impl<T> Progress<T> {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

// ---------------------------------------------------------------------------
// Field parsing
// ---------------------------------------------------------------------------

/// A single wire line split into whitespace-separated fields.
struct Fields<'a> {
    record: Record,
    fields: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    fn split(record: Record, line: &'a str) -> Self {
        Self {
            record,
            fields: line.split_whitespace().collect(),
        }
    }

    fn len(&self) -> usize {
        self.fields.len()
    }

    fn expect_exactly(&self, count: usize) -> Result<(), ProtocolError> {
        if self.len() == count {
            Ok(())
        } else {
            Err(ProtocolError::format(
                self.record,
                format!("expected {count} fields, got {}", self.len()),
            ))
        }
    }

    fn parse<T>(&self, index: usize, name: &str) -> Result<T, ProtocolError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.fields.get(index).ok_or_else(|| {
            ProtocolError::format(self.record, format!("missing field `{name}`"))
        })?;
        raw.parse::<T>().map_err(|e| {
            ProtocolError::format(self.record, format!("field `{name}` = {raw:?}: {e}"))
        })
    }

    /// Floats must be finite; `inf` and `NaN` parse but mean nothing here.
    fn parse_finite(&self, index: usize, name: &str) -> Result<f64, ProtocolError> {
        let value: f64 = self.parse(index, name)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ProtocolError::format(
                self.record,
                format!("field `{name}` must be finite, got {value}"),
            ))
        }
    }

    fn parse_count(&self, index: usize, name: &str) -> Result<usize, ProtocolError> {
        let value: i64 = self.parse(index, name)?;
        usize::try_from(value).map_err(|_| {
            ProtocolError::format(
                self.record,
                format!("field `{name}` must be a non-negative integer, got {value}"),
            )
        })
    }

    fn parse_positive(&self, index: usize, name: &'static str) -> Result<u32, ProtocolError> {
        let value: i64 = self.parse(index, name)?;
        if value <= 0 {
            return Err(ProtocolError::Range { field: name, value });
        }
        u32::try_from(value).map_err(|_| {
            ProtocolError::format(self.record, format!("field `{name}` = {value} is too large"))
        })
    }

    /// Integer where `<= 0` encodes "absent".
    fn parse_optional(&self, index: usize, name: &str) -> Result<Option<u64>, ProtocolError> {
        let value: i64 = self.parse(index, name)?;
        Ok(u64::try_from(value).ok().filter(|&v| v > 0))
    }
}

// ---------------------------------------------------------------------------
// ConfigDecoder
// ---------------------------------------------------------------------------

/// Which setup line the [`ConfigDecoder`] expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPhase {
    Board,
    FoodRules,
    Players,
    TurnLimits,
    Done,
}

/// Decodes the four setup lines into a [`GameConfig`].
#[derive(Debug)]
pub struct ConfigDecoder {
    phase: ConfigPhase,
    width: u32,
    height: u32,
    food_lifetime: Option<u32>,
    food_value: f64,
    snake_count: usize,
    my_id: SnakeId,
}

impl ConfigDecoder {
    pub fn new() -> Self {
        Self {
            phase: ConfigPhase::Board,
            width: 0,
            height: 0,
            food_lifetime: None,
            food_value: 0.0,
            snake_count: 0,
            my_id: SnakeId(0),
        }
    }

    pub fn phase(&self) -> ConfigPhase {
        self.phase
    }

    /// Consumes the next setup line.
    ///
    /// # Errors
    /// [`ProtocolError::Format`] for a wrong field count or unparsable field,
    /// [`ProtocolError::Range`] for a non-positive width, height, snake count
    /// or turn limit.
    pub fn feed(&mut self, line: &str) -> Result<Progress<GameConfig>, ProtocolError> {
        match self.phase {
            ConfigPhase::Board => {
                let f = Fields::split(Record::Board, line);
                f.expect_exactly(2)?;
                self.width = f.parse_positive(0, "width")?;
                self.height = f.parse_positive(1, "height")?;
                self.phase = ConfigPhase::FoodRules;
            }
            ConfigPhase::FoodRules => {
                let f = Fields::split(Record::FoodRules, line);
                f.expect_exactly(2)?;
                self.food_lifetime = f
                    .parse_optional(0, "food_lifetime")?
                    .map(|v| {
                        u32::try_from(v).map_err(|_| {
                            ProtocolError::format(
                                Record::FoodRules,
                                format!("field `food_lifetime` = {v} is too large"),
                            )
                        })
                    })
                    .transpose()?;
                self.food_value = f.parse_finite(1, "food_value")?;
                self.phase = ConfigPhase::Players;
            }
            ConfigPhase::Players => {
                let f = Fields::split(Record::Players, line);
                f.expect_exactly(2)?;
                self.snake_count = f.parse_positive(0, "snake_count")? as usize;
                self.my_id = SnakeId(f.parse(1, "my_id")?);
                self.phase = ConfigPhase::TurnLimits;
            }
            ConfigPhase::TurnLimits => {
                let f = Fields::split(Record::TurnLimits, line);
                f.expect_exactly(2)?;
                let max_turns = f.parse_positive(0, "max_turns")?;
                let timeout = f.parse_optional(1, "timeout")?.map(Duration::from_millis);
                self.phase = ConfigPhase::Done;
                return Ok(Progress::Complete(GameConfig {
                    width: self.width,
                    height: self.height,
                    food_lifetime: self.food_lifetime,
                    food_value: self.food_value,
                    snake_count: self.snake_count,
                    my_id: self.my_id,
                    max_turns,
                    timeout,
                }));
            }
            ConfigPhase::Done => return Err(ProtocolError::AlreadyComplete),
        }
        Ok(Progress::NeedMore)
    }
}

impl Default for ConfigDecoder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// TurnDecoder
// ---------------------------------------------------------------------------

/// Which line the [`TurnDecoder`] expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// The `num_food` header.
    AwaitingCount,
    /// Food lines still to read.
    ReadingFood { remaining: usize },
    /// Snake lines still to read.
    ReadingSnakes { remaining: usize },
    Done,
}

/// Decodes one turn's block of lines into a [`TurnSnapshot`].
///
/// Out-of-board coordinates are not fatal: the entry is logged and dropped,
/// and the turn carries on with the remaining entries.
#[derive(Debug)]
pub struct TurnDecoder<'c> {
    config: &'c GameConfig,
    turn: u32,
    phase: TurnPhase,
    food: Vec<FoodItem>,
    snakes: Vec<SnakeState>,
}

impl<'c> TurnDecoder<'c> {
    pub fn new(config: &'c GameConfig, turn: u32) -> Self {
        Self {
            config,
            turn,
            phase: TurnPhase::AwaitingCount,
            food: Vec::new(),
            snakes: Vec::with_capacity(config.snake_count.min(MAX_PREALLOC)),
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Returns `true` once at least one line of this turn has been consumed.
    pub fn is_started(&self) -> bool {
        self.phase != TurnPhase::AwaitingCount
    }

    /// Consumes the next line of the turn.
    ///
    /// # Errors
    /// [`ProtocolError::Format`] if the line doesn't match its record layout.
    pub fn feed(&mut self, line: &str) -> Result<Progress<TurnSnapshot>, ProtocolError> {
        match self.phase {
            TurnPhase::AwaitingCount => {
                let f = Fields::split(Record::FoodCount, line);
                f.expect_exactly(1)?;
                let count = f.parse_count(0, "num_food")?;
                self.food.reserve(count.min(MAX_PREALLOC));
                self.phase = TurnPhase::ReadingFood { remaining: count };
            }
            TurnPhase::ReadingFood { remaining } => {
                if let Some(item) = self.decode_food(line)? {
                    self.food.push(item);
                }
                self.phase = TurnPhase::ReadingFood {
                    remaining: remaining - 1,
                };
            }
            TurnPhase::ReadingSnakes { remaining } => {
                if let Some(snake) = self.decode_snake(line)? {
                    self.snakes.push(snake);
                }
                self.phase = TurnPhase::ReadingSnakes {
                    remaining: remaining - 1,
                };
            }
            TurnPhase::Done => return Err(ProtocolError::AlreadyComplete),
        }
        Ok(self.settle())
    }

    /// Skips over exhausted sections so the phase always names the next line.
    fn settle(&mut self) -> Progress<TurnSnapshot> {
        loop {
            match self.phase {
                TurnPhase::ReadingFood { remaining: 0 } => {
                    self.phase = TurnPhase::ReadingSnakes {
                        remaining: self.config.snake_count,
                    };
                }
                TurnPhase::ReadingSnakes { remaining: 0 } => {
                    self.phase = TurnPhase::Done;
                    trace!(
                        turn = self.turn,
                        food = self.food.len(),
                        snakes = self.snakes.len(),
                        "turn decoded"
                    );
                    return Progress::Complete(TurnSnapshot {
                        turn: self.turn,
                        food: std::mem::take(&mut self.food),
                        snakes: std::mem::take(&mut self.snakes),
                    });
                }
                _ => return Progress::NeedMore,
            }
        }
    }

    fn decode_food(&self, line: &str) -> Result<Option<FoodItem>, ProtocolError> {
        let f = Fields::split(Record::Food, line);
        f.expect_exactly(3)?;
        let lifetime = f.parse_finite(0, "lifetime")?;
        let x: i64 = f.parse(1, "x")?;
        let y: i64 = f.parse(2, "y")?;

        if !self.config.in_bounds(x, y) {
            warn!(turn = self.turn, x, y, "food outside the board, skipping");
            return Ok(None);
        }

        // in_bounds guarantees both fit in u32.
        let position = Point::new(x as u32, y as u32);
        Ok(Some(FoodItem {
            lifetime,
            position,
            value: self.config.decayed_value(lifetime),
        }))
    }

    fn decode_snake(&self, line: &str) -> Result<Option<SnakeState>, ProtocolError> {
        let f = Fields::split(Record::Snake, line);
        if f.len() < SNAKE_HEADER_FIELDS {
            return Err(ProtocolError::format(
                Record::Snake,
                format!(
                    "expected at least {SNAKE_HEADER_FIELDS} fields, got {}",
                    f.len()
                ),
            ));
        }

        let id = SnakeId(f.parse(0, "id")?);
        let kills: i32 = f.parse(1, "kills")?;
        let deaths: u32 = f.parse(2, "deaths")?;
        let length = f.parse_count(3, "length")?;

        let needed = length
            .checked_mul(2)
            .and_then(|n| n.checked_add(SNAKE_HEADER_FIELDS))
            .ok_or_else(|| {
                ProtocolError::format(Record::Snake, format!("length {length} is too large"))
            })?;
        if f.len() < needed {
            return Err(ProtocolError::format(
                Record::Snake,
                format!(
                    "length {length} needs {needed} fields, got {}",
                    f.len()
                ),
            ));
        }
        if f.len() > needed {
            warn!(
                turn = self.turn,
                %id,
                extra = f.len() - needed,
                "ignoring trailing fields on snake line"
            );
        }

        let mut body = Vec::with_capacity(length.min(MAX_PREALLOC));
        let mut off_board = None;
        for i in 0..length {
            let at = SNAKE_HEADER_FIELDS + 2 * i;
            let x: i64 = f.parse(at, "x")?;
            let y: i64 = f.parse(at + 1, "y")?;
            if self.config.in_bounds(x, y) {
                body.push(Point::new(x as u32, y as u32));
            } else if off_board.is_none() {
                off_board = Some((x, y));
            }
        }

        if let Some((x, y)) = off_board {
            warn!(turn = self.turn, %id, x, y, "snake segment outside the board, dropping snake");
            return Ok(None);
        }

        Ok(Some(SnakeState {
            id,
            kills,
            deaths,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Iterator drivers
// ---------------------------------------------------------------------------

/// Pulls lines into `feed` until it completes. Running out of lines first
/// is [`ProtocolError::StreamClosed`].
fn drive<I, T>(
    lines: I,
    mut feed: impl FnMut(&str) -> Result<Progress<T>, ProtocolError>,
) -> Result<T, ProtocolError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    for line in lines {
        if let Progress::Complete(record) = feed(line.as_ref())? {
            return Ok(record);
        }
    }
    Err(ProtocolError::StreamClosed)
}

/// Decodes the setup block, consuming exactly four lines.
///
/// Pass `&mut iter` to keep using the iterator afterwards.
///
/// # Errors
/// See [`ConfigDecoder::feed`]; [`ProtocolError::StreamClosed`] if the lines
/// run out first.
pub fn decode_config<I>(lines: I) -> Result<GameConfig, ProtocolError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut decoder = ConfigDecoder::new();
    drive(lines, |line| decoder.feed(line))
}

/// Decodes one turn, consuming exactly the lines the turn occupies.
///
/// # Errors
/// See [`TurnDecoder::feed`]; [`ProtocolError::StreamClosed`] if the lines
/// run out first.
pub fn decode_turn<I>(lines: I, config: &GameConfig, turn: u32) -> Result<TurnSnapshot, ProtocolError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut decoder = TurnDecoder::new(config, turn);
    drive(lines, |line| decoder.feed(line))
}
