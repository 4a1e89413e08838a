//! Command-line frontend for the `walksat` solver: DIMACS (optionally
//! gzip-compressed) file ingestion, argument parsing, logging setup, run
//! statistics, and the final assignment printer. None of this lives in the
//! `walksat` core crate -- it is all an "external collaborator" by design.

mod dimacs;
mod error;
mod stats;

use std::io::Read;
use std::process;

use clap::{App, Arg, ArgMatches};
use flate2::read::GzDecoder;

use walksat::{Assignment, Config, Solver};

use dimacs::ParseOutcome;
use error::CliError;
use stats::Stats;

fn build_cli() -> App<'static, 'static> {
    App::new("walksat")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Stochastic local-search SAT solver (WalkSAT / Algorithm W)")
        .arg(
            Arg::with_name("input")
                .help("DIMACS CNF input file, optionally gzip-compressed")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .default_value("0")
                .validator(validate::<u64>)
                .help("PRNG seed; 0 seeds from wall-clock time"),
        )
        .arg(
            Arg::with_name("initial-bias")
                .long("initial-bias")
                .takes_value(true)
                .default_value("0.1")
                .validator(validate::<f64>)
                .help("Probability a variable is initialized to true"),
        )
        .arg(
            Arg::with_name("non-greedy-choice")
                .long("non-greedy-choice")
                .takes_value(true)
                .default_value("0.65")
                .validator(validate::<f64>)
                .help("Probability of non-greedy literal selection"),
        )
        .arg(
            Arg::with_name("max-flips")
                .long("max-flips")
                .takes_value(true)
                .validator(validate::<u64>)
                .help("Report UNKNOWN after this many flips without a model (default: unbounded)"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Increase log verbosity (-v, -vv)"),
        )
}

fn validate<T>(value: String) -> Result<(), String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map(|_| ())
        .map_err(|e| format!("'{}' is not valid: {}", value, e))
}

fn value_of<T>(matches: &ArgMatches, name: &str) -> T
where
    T: std::str::FromStr,
{
    matches
        .value_of(name)
        .unwrap()
        .parse()
        .unwrap_or_else(|_| unreachable!("clap validator already checked {}", name))
}

#[cfg(feature = "logging")]
fn init_logging(verbosity: u64) {
    use log::LevelFilter;
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();
}

#[cfg(not(feature = "logging"))]
fn init_logging(_verbosity: u64) {}

fn read_input(path: &str) -> Result<String, CliError> {
    let open = |source| CliError::Open {
        path: path.to_string(),
        source,
    };
    let bytes = std::fs::read(path).map_err(open)?;

    if bytes.len() >= 2 && bytes[0] == 0x1f && bytes[1] == 0x8b {
        let mut decoder = GzDecoder::new(&bytes[..]);
        let mut text = String::new();
        decoder.read_to_string(&mut text).map_err(open)?;
        Ok(text)
    } else {
        String::from_utf8(bytes).map_err(|e| {
            open(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                e.utf8_error(),
            ))
        })
    }
}

/// Prints a satisfying assignment in DIMACS solver style: `v`-prefixed
/// lines of up to 10 literals, the last one terminated by a trailing `0`.
fn print_model(model: &Assignment) {
    println!("SAT");
    let mut line = String::from("v");
    let mut on_line = 0u32;
    for v in 1..=model.num_vars() {
        let lit: i64 = if model.value(v) { v as i64 } else { -(v as i64) };
        line.push(' ');
        line.push_str(&lit.to_string());
        on_line += 1;
        if on_line == 10 {
            println!("{}", line);
            line = String::from("v");
            on_line = 0;
        }
    }
    line.push_str(" 0");
    println!("{}", line);
}

fn run(matches: &ArgMatches) -> Result<i32, CliError> {
    let path = matches.value_of("input").expect("required argument");
    let text = read_input(path)?;

    let formula = match dimacs::parse(&text)? {
        ParseOutcome::UnsatEmptyClause => {
            println!("UNSAT");
            return Ok(20);
        }
        ParseOutcome::Formula(f) => f,
    };

    let config = Config {
        initial_bias: value_of(matches, "initial-bias"),
        non_greedy_choice: value_of(matches, "non-greedy-choice"),
        seed: value_of(matches, "seed"),
    };
    let max_flips: Option<u64> = matches
        .value_of("max-flips")
        .map(|s| s.parse().expect("clap validator already checked max-flips"));

    #[cfg(feature = "logging")]
    log::info!(
        "loaded formula: {} variables, {} clauses",
        formula.num_vars(),
        formula.num_clauses()
    );

    let mut stats = Stats::start();
    let mut solver = Solver::new(&formula, config);
    let mut flips = 0u64;

    loop {
        if solver.is_solved() {
            break;
        }
        if let Some(cap) = max_flips {
            if flips >= cap {
                stats.set_flips(flips);
                stats.print();
                println!("UNKNOWN");
                return Ok(30);
            }
        }
        solver.step();
        flips += 1;
        stats.record_flip();
    }

    stats.print();
    print_model(solver.assignment());
    Ok(0)
}

fn main() {
    let matches = build_cli().get_matches();
    init_logging(matches.occurrences_of("verbose"));

    match run(&matches) {
        Ok(code) => process::exit(code),
        Err(e) => {
            #[cfg(feature = "logging")]
            log::error!("{}", e);
            eprintln!("walksat: {}", e);
            process::exit(1);
        }
    }
}
