// Standalone replay tool for analyzing knight's tour move journals
//
// Usage:
//   cargo run --bin replay -- <journal_file> [options]
//
// Options:
//   --tour <e1,e2>         Replay specific tours by epoch (comma-separated)
//   --verbose              Show detailed output for each move
//   --config <path>        Path to Knight.toml (default: Knight.toml)

use std::env;
use std::process;

use knight_tour::config::Config;
use knight_tour::replay::ReplayEngine;

fn print_usage() {
    eprintln!("Knight's Tour Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <journal_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --tour <E1,E2,...>      Replay specific tours by epoch (default: all)");
    eprintln!("  --verbose               Show detailed output for each move");
    eprintln!("  --config <path>         Path to Knight.toml (default: Knight.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  # Replay every tour in the journal");
    eprintln!("  replay knight_journal.jsonl");
    eprintln!();
    eprintln!("  # Verbose replay of tours 2 and 3");
    eprintln!("  replay knight_journal.jsonl --tour 2,3 --verbose");
}

fn parse_epochs(s: &str) -> Result<Vec<u64>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<u64>()
                .map_err(|e| format!("Invalid epoch '{}': {}", t, e))
        })
        .collect()
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let log_file = &args[1];
    let mut config_path = "Knight.toml".to_string();
    let mut verbose = false;
    let mut epochs: Option<Vec<u64>> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--tour" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --tour requires an argument");
                    process::exit(1);
                }
                match parse_epochs(&args[i + 1]) {
                    Ok(e) => epochs = Some(e),
                    Err(e) => {
                        eprintln!("Error parsing epochs: {}", e);
                        process::exit(1);
                    }
                }
                i += 1;
            }
            "--config" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --config requires an argument");
                    process::exit(1);
                }
                config_path = args[i + 1].clone();
                i += 1;
            }
            "--verbose" => {
                verbose = true;
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Loaded configuration from: {}", config_path);
    println!("Journal file: {}", log_file);
    println!();

    let engine = ReplayEngine::new(config, verbose);

    let entries = match engine.load_log_file(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading journal: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Journal is empty");
        process::exit(1);
    }

    println!("Loaded {} journal entries\n", entries.len());

    let replays = match &epochs {
        Some(epochs) => {
            println!("Replaying {} tour(s)...\n", epochs.len());
            engine.replay_epochs(&entries, epochs)
        }
        None => engine.replay_all(&entries),
    };

    match replays {
        Ok(replays) => engine.print_report(&replays),
        Err(e) => {
            eprintln!("Error during replay: {}", e);
            process::exit(1);
        }
    }
}
