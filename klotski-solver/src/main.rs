//! Command-line Klotski solver.
//!
//! Reads a board in the text format, runs DFS or A*, and writes the
//! solution as a sequence of boards separated by blank lines.
//!
//! ```text
//! solver --inputfile start.txt --outputfile solution.txt --algo astar
//! ```

mod movegen;
mod solver;
mod stats;

#[cfg(test)]
mod fixtures;

use std::error::Error;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use env_logger::Env;
use klotski_core::Board;

use solver::{solution_path, Outcome, Searcher};
use stats::RunSummary;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Algo {
    Dfs,
    Astar,
}

impl Algo {
    fn name(self) -> &'static str {
        match self {
            Algo::Dfs => "dfs",
            Algo::Astar => "astar",
        }
    }
}

struct Args {
    inputfile: String,
    outputfile: String,
    algo: Algo,
    json_summary: bool,
    log_interval: u64,
}

fn usage() -> ! {
    eprintln!(
        "usage: solver --inputfile <board.txt> --outputfile <solution.txt> \
         [--algo dfs|astar] [--json-summary] [--log-interval <secs>]"
    );
    std::process::exit(2);
}

fn parse_args() -> Args {
    let mut inputfile = None;
    let mut outputfile = None;
    let mut algo = Algo::Astar;
    let mut json_summary = false;
    let mut log_interval = 5;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--inputfile" => inputfile = args.next(),
            "--outputfile" => outputfile = args.next(),
            "--algo" => match args.next().as_deref() {
                Some("dfs") => algo = Algo::Dfs,
                Some("astar") => algo = Algo::Astar,
                _ => usage(),
            },
            "--json-summary" => json_summary = true,
            "--log-interval" => match args.next().and_then(|s| s.parse().ok()) {
                Some(secs) => log_interval = secs,
                None => usage(),
            },
            _ => usage(),
        }
    }

    match (inputfile, outputfile) {
        (Some(inputfile), Some(outputfile)) => Args {
            inputfile,
            outputfile,
            algo,
            json_summary,
            log_interval,
        },
        _ => usage(),
    }
}

/// Write the solution boards, successive boards separated by one blank
/// line.
fn write_solution(path: &str, boards: &[Board]) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for (i, board) in boards.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        write!(out, "{}", board)?;
    }
    out.flush()
}

fn run() -> Result<ExitCode, Box<dyn Error>> {
    let args = parse_args();

    let text = fs::read_to_string(&args.inputfile)?;
    let start: Board = text.parse()?;
    log::info!(
        "loaded {} ({} pieces), running {}",
        args.inputfile,
        start.pieces().len(),
        args.algo.name()
    );

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);
        })?;
    }

    let mut searcher = Searcher::new(args.log_interval);
    let outcome = match args.algo {
        Algo::Dfs => searcher.dfs(start, &running),
        Algo::Astar => searcher.astar(start, &running),
    };
    searcher.stats.print_summary(args.algo.name(), outcome.label());

    let (depth, code) = match &outcome {
        Outcome::Solved(goal) => {
            let path = solution_path(goal);
            write_solution(&args.outputfile, &path)?;
            log::info!("wrote {} boards to {}", path.len(), args.outputfile);
            (Some(goal.depth), ExitCode::SUCCESS)
        }
        Outcome::Exhausted => {
            log::error!("no solution: the start position's component is exhausted");
            (None, ExitCode::from(1))
        }
        Outcome::Interrupted => {
            log::warn!("interrupted before finding a solution");
            (None, ExitCode::from(130))
        }
    };

    if args.json_summary {
        let summary = RunSummary {
            algorithm: args.algo.name(),
            outcome: outcome.label(),
            depth,
            expanded: searcher.stats.expanded,
            generated: searcher.stats.generated,
            duplicate_pops: searcher.stats.duplicate_pops,
            max_frontier: searcher.stats.max_frontier,
            elapsed_ms: searcher.stats.elapsed().as_millis(),
        };
        println!("{}", serde_json::to_string(&summary)?);
    }

    Ok(code)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    match run() {
        Ok(code) => code,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::from(2)
        }
    }
}
