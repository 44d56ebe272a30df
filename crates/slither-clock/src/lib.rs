//! Per-move deadline budget for Slither.
//!
//! The host gives each client a fixed amount of time to answer a turn. This
//! crate turns that timeout into a budget for the move-selection policy,
//! hands the policy a cooperative [`Deadline`] to check, and measures how
//! long each move actually took.
//!
//! Nothing here interrupts a running policy. The turn loop asks the clock
//! afterwards whether the move overran and, if so, throws the answer away
//! and sends a fallback instead.
//!
//! # Integration
//!
//! ```ignore
//! let deadline = clock.start_move(turn);
//! let command = policy.choose_within(&snapshot, &config, &deadline);
//! let timing = clock.finish_move().expect("move was started");
//! let command = if timing.overran { fallback } else { command };
//! ```

use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the move clock.
#[derive(Debug, Clone)]
pub struct ClockConfig {
    /// Time held back from the host's timeout for decoding, writing and
    /// pipe latency. The policy gets `timeout - safety_margin`.
    pub safety_margin: Duration,
    /// Budget warning threshold (0.0–1.0). Default: 0.80 (80%).
    /// A tracing warning is emitted when a move uses more than this
    /// fraction of its budget without overrunning it.
    pub budget_warn_threshold: f64,
    /// Enable per-move metrics collection.
    pub metrics_enabled: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            safety_margin: Duration::from_millis(10),
            budget_warn_threshold: 0.80,
            metrics_enabled: true,
        }
    }
}

impl ClockConfig {
    /// Clamp any out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`MoveClock::new`].
    pub fn validated(mut self) -> Self {
        if !(0.0..=1.0).contains(&self.budget_warn_threshold) {
            warn!(
                threshold = self.budget_warn_threshold,
                "budget_warn_threshold outside 0.0..=1.0, clamping"
            );
            self.budget_warn_threshold = if self.budget_warn_threshold.is_nan() {
                1.0
            } else {
                self.budget_warn_threshold.clamp(0.0, 1.0)
            };
        }
        self
    }

    /// Budget left for the policy under `timeout`. `None` means unbounded.
    ///
    /// If the margin would eat the whole timeout, the full timeout is used.
    pub fn budget_for(&self, timeout: Option<Duration>) -> Option<Duration> {
        timeout.map(|t| {
            if self.safety_margin < t {
                t - self.safety_margin
            } else {
                t
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Deadline
// ---------------------------------------------------------------------------

/// A point in time a move must finish by.
///
/// Policies that iterate (search, sampling) can poll [`expired`](Self::expired)
/// between steps and return their best answer so far.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    /// A deadline that never expires.
    pub fn unbounded() -> Self {
        Self {
            start: Instant::now(),
            budget: None,
        }
    }

    pub fn budget(&self) -> Option<Duration> {
        self.budget
    }

    /// Returns `true` once the budget is used up.
    pub fn expired(&self) -> bool {
        self.expired_at(Instant::now())
    }

    pub fn expired_at(&self, now: Instant) -> bool {
        match self.budget {
            Some(budget) => now.saturating_duration_since(self.start) > budget,
            None => false,
        }
    }

    /// Time left before the deadline, `None` when unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.budget
            .map(|b| b.saturating_sub(self.start.elapsed()))
    }
}

// ---------------------------------------------------------------------------
// Move timing (returned to caller each move)
// ---------------------------------------------------------------------------

/// Measurements for one finished move, returned by [`MoveClock::finish_move`].
#[derive(Debug, Clone)]
pub struct MoveTiming {
    pub turn: u32,
    pub elapsed: Duration,
    pub budget: Option<Duration>,
    /// `true` if the move took longer than its budget.
    pub overran: bool,
    /// `elapsed / budget`; `None` when unbounded.
    pub utilization: Option<f64>,
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Running metrics across all moves.
#[derive(Debug, Clone)]
pub struct MoveMetrics {
    pub total_moves: u64,
    pub total_overruns: u64,
    /// Exponential moving average of move time (α = 0.1).
    pub avg_move_time: Duration,
    pub max_move_time: Duration,
    /// Utilization of the most recent move. >1.0 means overrun.
    pub budget_utilization: f64,
}

impl Default for MoveMetrics {
    fn default() -> Self {
        Self {
            total_moves: 0,
            total_overruns: 0,
            avg_move_time: Duration::ZERO,
            max_move_time: Duration::ZERO,
            budget_utilization: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// MoveClock
// ---------------------------------------------------------------------------

/// Times each move against the budget derived from the host's timeout.
///
/// One clock per game.
pub struct MoveClock {
    config: ClockConfig,
    budget: Option<Duration>,
    /// Turn and start instant of the move in progress.
    current: Option<(u32, Instant)>,
    metrics: MoveMetrics,
}

impl MoveClock {
    /// Create a clock for a game with the given per-move timeout.
    pub fn new(timeout: Option<Duration>, config: ClockConfig) -> Self {
        let config = config.validated();
        let budget = config.budget_for(timeout);

        match budget {
            Some(b) => debug!(
                timeout_ms = ?timeout.map(|t| t.as_millis()),
                budget_ms = b.as_secs_f64() * 1000.0,
                "move clock created"
            ),
            None => debug!("move clock created without a time limit"),
        }

        Self {
            config,
            budget,
            current: None,
            metrics: MoveMetrics::default(),
        }
    }

    /// A clock with no time limit.
    pub fn unbounded() -> Self {
        Self::new(None, ClockConfig::default())
    }

    /// Start timing the move for `turn`.
    pub fn start_move(&mut self, turn: u32) -> Deadline {
        self.start_move_at(turn, Instant::now())
    }

    /// Like [`start_move`](Self::start_move) with an explicit start instant.
    pub fn start_move_at(&mut self, turn: u32, now: Instant) -> Deadline {
        if let Some((previous, _)) = self.current.replace((turn, now)) {
            trace!(previous, turn, "move restarted before finishing");
        }
        Deadline {
            start: now,
            budget: self.budget,
        }
    }

    /// Stop timing the current move.
    ///
    /// Returns `None` if no move was started.
    pub fn finish_move(&mut self) -> Option<MoveTiming> {
        self.finish_move_at(Instant::now())
    }

    /// Like [`finish_move`](Self::finish_move) with an explicit end instant.
    pub fn finish_move_at(&mut self, now: Instant) -> Option<MoveTiming> {
        let (turn, start) = self.current.take()?;
        let elapsed = now.saturating_duration_since(start);

        let utilization = self
            .budget
            .map(|b| elapsed.as_secs_f64() / b.as_secs_f64().max(f64::MIN_POSITIVE));
        let overran = self.budget.is_some_and(|b| elapsed > b);

        if let (Some(budget), Some(util)) = (self.budget, utilization) {
            self.metrics.budget_utilization = util;
            if overran {
                warn!(
                    turn,
                    elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                    budget_ms = budget.as_secs_f64() * 1000.0,
                    "move exceeded budget"
                );
            } else if util >= self.config.budget_warn_threshold {
                warn!(
                    turn,
                    elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                    budget_ms = budget.as_secs_f64() * 1000.0,
                    utilization_pct = format!("{:.1}", util * 100.0),
                    "move approaching budget limit"
                );
            }
        }

        self.metrics.total_moves += 1;
        if overran {
            self.metrics.total_overruns += 1;
        }
        if self.config.metrics_enabled {
            if elapsed > self.metrics.max_move_time {
                self.metrics.max_move_time = elapsed;
            }
            let alpha = 0.1;
            let prev = self.metrics.avg_move_time.as_secs_f64();
            let curr = elapsed.as_secs_f64();
            self.metrics.avg_move_time =
                Duration::from_secs_f64(prev * (1.0 - alpha) + curr * alpha);
        }

        trace!(turn, elapsed_us = elapsed.as_micros() as u64, overran, "move timed");

        Some(MoveTiming {
            turn,
            elapsed,
            budget: self.budget,
            overran,
            utilization,
        })
    }

    /// Whether a move is currently being timed.
    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    /// The policy's budget per move, `None` when unbounded.
    pub fn budget(&self) -> Option<Duration> {
        self.budget
    }

    pub fn metrics(&self) -> &MoveMetrics {
        &self.metrics
    }
}
