//! The turn loop: read a turn, choose a command, write it, repeat.
//!
//! The loop is a small state machine:
//!
//! ```text
//! setup ─▶ AwaitingTurn ─(turn decoded)─▶ HasSnapshot ─(command sent)─▶ AwaitingTurn
//!               │
//!               └─(stream closed)─▶ Closed
//! ```
//!
//! It runs until the host closes the stream. Running past `max_turns` is
//! not an error; the host decides when the game ends.

use std::io::Write;

use slither_clock::MoveClock;
use slither_policy::Policy;
use slither_protocol::{Command, ConfigDecoder, GameConfig, Progress, TurnDecoder, TurnSnapshot};
use slither_transport::Connection;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::transcript::{Transcript, TurnRecord};
use crate::SlitherError;

/// What a finished game looked like from this client's side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopSummary {
    /// Turns for which a command was sent.
    pub turns_played: u32,
    /// Turns where the policy overran and the fallback was sent.
    pub fallbacks: u32,
    /// The stream ended partway through a turn's lines.
    pub closed_mid_turn: bool,
}

#[derive(Debug)]
enum LoopState {
    /// Waiting for the lines of the turn after `turn`.
    AwaitingTurn { turn: u32 },
    HasSnapshot(TurnSnapshot),
    Closed { mid_turn: bool },
}

/// Drives one game over a [`Connection`] using a [`Policy`].
pub struct TurnLoop<C: Connection, P: Policy> {
    conn: C,
    policy: P,
    config: ClientConfig,
    transcript: Option<Transcript<Box<dyn Write>>>,
    last_command: Option<Command>,
}

impl<C: Connection, P: Policy> TurnLoop<C, P> {
    pub fn new(conn: C, policy: P, config: ClientConfig) -> Self {
        Self {
            conn,
            policy,
            config: config.validated(),
            transcript: None,
            last_command: None,
        }
    }

    /// Record every turn as JSON lines to `out`.
    pub fn with_transcript(mut self, out: Box<dyn Write>) -> Self {
        self.transcript = Some(Transcript::new(out));
        self
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub fn into_connection(self) -> C {
        self.conn
    }

    /// Plays until the host closes the stream.
    ///
    /// A closed stream, whether before setup, between turns or in the middle
    /// of one, ends the game normally.
    ///
    /// # Errors
    /// Malformed input, a non-positive setup value, or a failed read or
    /// write. None of these can be recovered from because line framing is
    /// lost.
    pub async fn run(&mut self) -> Result<LoopSummary, SlitherError> {
        let mut summary = LoopSummary::default();

        let Some(game) = self.read_config().await? else {
            return Ok(summary);
        };
        info!(
            width = game.width,
            height = game.height,
            snakes = game.snake_count,
            my_id = %game.my_id,
            max_turns = game.max_turns,
            timeout_ms = ?game.timeout.map(|t| t.as_millis()),
            policy = self.policy.name(),
            "game configured"
        );

        let mut clock = MoveClock::new(game.timeout, self.config.clock.clone());
        let mut state = LoopState::AwaitingTurn { turn: 0 };

        loop {
            state = match state {
                LoopState::AwaitingTurn { turn } => self.read_turn(&game, turn + 1).await?,
                LoopState::HasSnapshot(snapshot) => {
                    let overran = self.play(&game, &mut clock, &snapshot).await?;
                    summary.turns_played += 1;
                    if overran {
                        summary.fallbacks += 1;
                    }
                    LoopState::AwaitingTurn {
                        turn: snapshot.turn,
                    }
                }
                LoopState::Closed { mid_turn } => {
                    summary.closed_mid_turn = mid_turn;
                    break;
                }
            };
        }

        let metrics = clock.metrics();
        info!(
            turns = summary.turns_played,
            fallbacks = summary.fallbacks,
            max_move_us = metrics.max_move_time.as_micros() as u64,
            "stream closed, game over"
        );
        Ok(summary)
    }

    async fn read_config(&mut self) -> Result<Option<GameConfig>, SlitherError> {
        let mut decoder = ConfigDecoder::new();
        loop {
            let Some(line) = self.conn.recv_line().await? else {
                warn!(phase = ?decoder.phase(), "stream closed before setup completed");
                return Ok(None);
            };
            if let Progress::Complete(config) = decoder.feed(&line)? {
                return Ok(Some(config));
            }
        }
    }

    async fn read_turn(&mut self, game: &GameConfig, turn: u32) -> Result<LoopState, SlitherError> {
        let mut decoder = TurnDecoder::new(game, turn);
        loop {
            let Some(line) = self.conn.recv_line().await? else {
                let mid_turn = decoder.is_started();
                if mid_turn {
                    warn!(turn, phase = ?decoder.phase(), "stream closed partway through a turn");
                }
                return Ok(LoopState::Closed { mid_turn });
            };
            if let Progress::Complete(snapshot) = decoder.feed(&line)? {
                return Ok(LoopState::HasSnapshot(snapshot));
            }
        }
    }

    /// Chooses and sends this turn's command. Returns `true` if the policy
    /// overran and the fallback was sent instead.
    async fn play(
        &mut self,
        game: &GameConfig,
        clock: &mut MoveClock,
        snapshot: &TurnSnapshot,
    ) -> Result<bool, SlitherError> {
        if snapshot.turn == game.max_turns.saturating_add(1) {
            debug!(max_turns = game.max_turns, "past the advertised turn limit");
        }
        if snapshot.snake(game.my_id).is_none() {
            warn!(turn = snapshot.turn, my_id = %game.my_id, "own snake missing from turn");
        }

        let deadline = clock.start_move(snapshot.turn);
        let chosen = self.policy.choose_within(snapshot, game, &deadline);
        let timing = clock.finish_move();
        let overran = timing.as_ref().is_some_and(|t| t.overran);
        let elapsed_us = timing.map_or(0, |t| t.elapsed.as_micros() as u64);

        let command = if overran {
            let fallback = self
                .last_command
                .clone()
                .unwrap_or_else(|| self.config.fallback.clone());
            warn!(turn = snapshot.turn, discarded = %chosen, sent = %fallback, "policy overran, sending fallback");
            fallback
        } else {
            chosen
        };

        self.conn.send_line(command.token()).await?;
        debug!(turn = snapshot.turn, %command, elapsed_us, "command sent");

        if let Some(transcript) = self.transcript.as_mut() {
            transcript.record(&TurnRecord {
                turn: snapshot.turn,
                command: &command,
                fallback: overran,
                elapsed_us,
                snapshot,
            });
        }
        self.last_command = Some(command);
        Ok(overran)
    }
}
