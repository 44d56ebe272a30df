//! Reference snake client.
//!
//! Reads the game from stdin and answers on stdout, one direction per turn.
//! Diagnostics go to stderr; set `RUST_LOG` to see more of them.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use slither::prelude::*;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "reference-snake")]
#[command(about = "Plays one game of snake over stdin/stdout")]
struct Args {
    /// Move-selection policy
    #[arg(long, default_value = "cyclic")]
    policy: PolicyKind,

    /// Seed for policies that use randomness
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Milliseconds held back from the host's timeout for I/O
    #[arg(long, default_value_t = 10)]
    safety_margin_ms: u64,

    /// Write a JSON-lines record of every turn to this file
    #[arg(long)]
    transcript: Option<PathBuf>,
}

fn open_transcript(path: &Path) -> Option<Box<dyn Write>> {
    match File::create(path) {
        Ok(file) => Some(Box::new(BufWriter::new(file))),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot create transcript, continuing without it");
            None
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    slither::logging::init();
    let args = Args::parse();

    info!(policy = %args.policy, seed = args.seed, "starting reference snake");

    let config = ClientConfig::with_safety_margin(Duration::from_millis(args.safety_margin_ms));
    let policy = args.policy.build(args.seed);
    let mut turn_loop = TurnLoop::new(StdioConnection::stdio(), policy, config);
    if let Some(out) = args.transcript.as_deref().and_then(open_transcript) {
        turn_loop = turn_loop.with_transcript(out);
    }

    match turn_loop.run().await {
        Ok(summary) => {
            info!(turns = summary.turns_played, fallbacks = summary.fallbacks, "done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "game aborted");
            eprintln!("reference-snake: {e}");
            ExitCode::FAILURE
        }
    }
}
