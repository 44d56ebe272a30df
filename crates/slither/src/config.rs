//! Client-side settings for the turn loop.

use std::time::Duration;

use slither_clock::ClockConfig;
use slither_protocol::Command;
use tracing::warn;

/// Settings the turn loop needs beyond what the host sends.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Move budget settings.
    pub clock: ClockConfig,
    /// Command sent when the policy overruns on the very first turn.
    /// Later overruns repeat the last command that was sent.
    pub fallback: Command,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            clock: ClockConfig::default(),
            fallback: Command::North,
        }
    }
}

impl ClientConfig {
    /// A default config with the given safety margin.
    pub fn with_safety_margin(margin: Duration) -> Self {
        Self {
            clock: ClockConfig {
                safety_margin: margin,
                ..ClockConfig::default()
            },
            ..Self::default()
        }
    }

    /// Clamp out-of-range values.
    ///
    /// A fallback the host won't understand is replaced by `north`.
    pub fn validated(mut self) -> Self {
        self.clock = self.clock.validated();
        if !self.fallback.is_cardinal() {
            warn!(fallback = %self.fallback, "fallback is not a direction, using north");
            self.fallback = Command::North;
        }
        self
    }
}
