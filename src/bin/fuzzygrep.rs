//! fuzzygrep: filter stdin lines by fuzzy match against a query.
//!
//! Reads stdin line by line, scores each against the query, and writes
//! matching lines to stdout preserving input order.

use std::io::{self, BufRead, BufWriter, Write};

use clap::Parser;

use tern::{Algorithm, EditDistanceConfig, MatchConfig, SmithWatermanConfig};

#[derive(Parser)]
#[command(name = "fuzzygrep", about = "Filter stdin lines by fuzzy match", version)]
struct Args {
    /// Use the Smith-Waterman local-alignment engine instead of the
    /// default edit-distance engine
    #[arg(long)]
    sw: bool,

    /// Minimum normalized score a line must reach, in [0, 1]
    #[arg(long, default_value_t = 0.85, value_parser = parse_score)]
    score: f32,

    /// Query to match lines against
    query: String,
}

fn parse_score(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("score must be in [0, 1], got {value}"))
    }
}

fn main() {
    env_logger::builder().format_timestamp_nanos().init();

    match real_main() {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            // If the downstream pipe is closed (e.g. a pager quit), exit
            // silently.
            if err.kind() == io::ErrorKind::BrokenPipe {
                std::process::exit(0)
            }
            eprintln!("fuzzygrep: {err}");
            std::process::exit(2)
        }
    }
}

fn real_main() -> Result<i32, io::Error> {
    let args = Args::parse();

    let algorithm = if args.sw {
        Algorithm::SmithWaterman(SmithWatermanConfig::default())
    } else {
        Algorithm::EditDistance(EditDistanceConfig::default())
    };
    let query = tern::prepare_with(&args.query, MatchConfig::new(algorithm, args.score));
    let mut buffer = tern::make_buffer();

    let stdin = io::stdin();
    let mut out = BufWriter::new(io::stdout().lock());
    let mut matched_any = false;
    for line in stdin.lock().lines() {
        let line = line?;
        if tern::score(&line, &query, &mut buffer).is_some() {
            out.write_all(line.as_bytes())?;
            out.write_all(b"\n")?;
            matched_any = true;
        }
    }
    out.flush()?;

    Ok(if matched_any { 0 } else { 1 })
}
