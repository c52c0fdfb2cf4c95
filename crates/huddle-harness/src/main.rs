#![forbid(unsafe_code)]

//! Replay a scenario file and print its frame trace.
//!
//! # Running
//!
//! ```sh
//! cargo run -p huddle-harness -- plays.json            # JSONL trace on stdout
//! cargo run -p huddle-harness -- plays.json --checksum # checksum only
//! HUDDLE_LOG=huddle_runtime=debug cargo run -p huddle-harness -- plays.json
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use huddle_harness::{HarnessError, Scenario, init_tracing, replay};

const USAGE: &str = "usage: huddle-harness <scenario.json> [--checksum]";

struct Args {
    scenario: PathBuf,
    checksum_only: bool,
}

fn parse_args() -> Option<Args> {
    let mut scenario = None;
    let mut checksum_only = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--checksum" => checksum_only = true,
            "-h" | "--help" => return None,
            _ if scenario.is_none() && !arg.starts_with('-') => scenario = Some(PathBuf::from(&arg)),
            _ => return None,
        }
    }
    Some(Args {
        scenario: scenario?,
        checksum_only,
    })
}

fn run(args: &Args) -> Result<(), HarnessError> {
    let scenario = Scenario::load(&args.scenario)?;
    let trace = replay(&scenario)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.checksum_only {
        writeln!(out, "{:#018x}", trace.checksum()?)?;
    } else {
        trace.write_jsonl(&mut out)?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    let Some(args) = parse_args() else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(path = %args.scenario.display(), "replay failed");
            eprintln!("huddle-harness: {err}");
            ExitCode::FAILURE
        }
    }
}
