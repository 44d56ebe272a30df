//! JSON-lines record of every turn played.
//!
//! One object per line:
//!
//! ```text
//! {"turn":1,"command":"north","fallback":false,"elapsed_us":41,"snapshot":{...}}
//! ```

use std::io::Write;

use serde::Serialize;
use slither_protocol::{Command, TurnSnapshot};
use tracing::warn;

/// One transcript line.
#[derive(Debug, Serialize)]
pub struct TurnRecord<'a> {
    pub turn: u32,
    pub command: &'a Command,
    /// `true` if the policy overran and `command` is the fallback.
    pub fallback: bool,
    pub elapsed_us: u64,
    pub snapshot: &'a TurnSnapshot,
}

/// Writes [`TurnRecord`]s to `W`.
///
/// A write failure is logged once and turns the transcript off; the game
/// keeps going.
pub struct Transcript<W: Write> {
    out: W,
    enabled: bool,
    written: u64,
}

impl<W: Write> Transcript<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            enabled: true,
            written: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of records successfully written.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn record(&mut self, record: &TurnRecord<'_>) {
        if !self.enabled {
            return;
        }
        if let Err(e) = self.write_line(record) {
            warn!(turn = record.turn, error = %e, "transcript write failed, disabling transcript");
            self.enabled = false;
            return;
        }
        self.written += 1;
    }

    fn write_line(&mut self, record: &TurnRecord<'_>) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use slither_protocol::{Point, SnakeId, SnakeState};

    use super::*;

    fn snapshot() -> TurnSnapshot {
        TurnSnapshot {
            turn: 4,
            food: Vec::new(),
            snakes: vec![SnakeState {
                id: SnakeId(1),
                kills: 0,
                deaths: 0,
                body: vec![Point::new(2, 3)],
            }],
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_record_is_one_json_line() {
        let snap = snapshot();
        let mut transcript = Transcript::new(Vec::new());
        transcript.record(&TurnRecord {
            turn: 4,
            command: &Command::East,
            fallback: false,
            elapsed_us: 12,
            snapshot: &snap,
        });
        assert_eq!(transcript.written(), 1);

        let text = String::from_utf8(transcript.into_inner()).unwrap();
        assert!(text.ends_with('\n'));
        let value: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(value["command"], "east");
        assert_eq!(value["fallback"], false);
        assert_eq!(value["snapshot"]["snakes"][0]["body"][0]["x"], 2);
    }

    #[test]
    fn test_write_failure_disables_transcript() {
        let snap = snapshot();
        let mut transcript = Transcript::new(BrokenPipe);
        let record = TurnRecord {
            turn: 1,
            command: &Command::North,
            fallback: true,
            elapsed_us: 0,
            snapshot: &snap,
        };
        transcript.record(&record);
        assert!(!transcript.is_enabled());
        transcript.record(&record);
        assert_eq!(transcript.written(), 0);
    }
}
