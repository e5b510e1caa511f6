//! Print the insight digest of a saved grid snapshot
//!
//! Reads a snapshot file as written by the game-state exporter and prints the active rules,
//! YOU/WIN positions and the shortest winning route, as text or JSON.

use babapath::insights::insights;
use babapath::{EngineConfig, Level};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::fs;
use std::process;

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <snapshot.txt> [--json] [--verbose]", program);
    eprintln!("Prints rules, positions and the shortest path to a win cell");
    process::exit(1);
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("snapshot_insights");

    let mut path = None;
    let mut json = false;
    let mut verbose = false;
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "--verbose" | "-v" => verbose = true,
            other if path.is_none() && !other.starts_with('-') => path = Some(other.to_string()),
            _ => usage(program),
        }
    }
    let Some(path) = path else {
        usage(program);
    };

    let level_filter = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    let _ = TermLogger::init(level_filter, Config::default(), TerminalMode::Stderr, ColorChoice::Auto);

    let snapshot = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("Failed to read {}: {}", path, e);
            process::exit(1);
        }
    };

    let config = EngineConfig::load();
    let digest = Level::parse(&snapshot, &config).and_then(|level| insights(&level));
    let digest = match digest {
        Ok(digest) => digest,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    if json {
        match serde_json::to_string_pretty(&digest) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Failed to serialize insights: {}", e);
                process::exit(2);
            }
        }
    } else {
        println!("{}", digest);
    }
}
