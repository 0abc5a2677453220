//! Run Warnsdorff play-outs from many starting cells and report completion.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --bin survey -- --size 8
//! cargo run --release --bin survey -- --size 6 --closed
//! cargo run --release --bin survey -- --size 12 --samples 20 --seed 7
//! ```
//!
//! Without `--samples` every cell is used as a start. `--samples` and
//! `--seed` default to the `[survey]` section of Knight.toml.

use std::env;
use std::process;

use knight_tour::config::Config;
use knight_tour::survey::{all_starts, sample_starts, survey};
use knight_tour::types::{BoardConfig, TourType};

fn print_usage(program: &str) {
    eprintln!("Usage: {} --size N [--closed] [--samples K] [--seed S] [--config <path>]", program);
    eprintln!("Example: {} --size 8 --samples 16 --seed 42", program);
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T
where
    T::Err: std::fmt::Display,
{
    let raw = match args.get(i + 1) {
        Some(raw) => raw,
        None => {
            eprintln!("Error: {} requires an argument", flag);
            process::exit(1);
        }
    };
    raw.parse::<T>().unwrap_or_else(|e| {
        eprintln!("Error: invalid value '{}' for {}: {}", raw, flag, e);
        process::exit(1);
    })
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut size: Option<i32> = None;
    let mut tour_type = TourType::Open;
    let mut samples: Option<usize> = None;
    let mut seed: Option<u64> = None;
    let mut config_path = "Knight.toml".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--size" => {
                size = Some(parse_value(&args, i, "--size"));
                i += 1;
            }
            "--closed" => tour_type = TourType::Closed,
            "--samples" => {
                samples = Some(parse_value(&args, i, "--samples"));
                i += 1;
            }
            "--seed" => {
                seed = Some(parse_value(&args, i, "--seed"));
                i += 1;
            }
            "--config" => {
                config_path = parse_value(&args, i, "--config");
                i += 1;
            }
            "--help" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other => {
                eprintln!("Error: Unknown option '{}'", other);
                print_usage(&args[0]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let size = match size {
        Some(size) => size,
        None => {
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        Config::default_hardcoded()
    });

    let board = match BoardConfig::new(size, tour_type) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let samples = samples.unwrap_or(config.survey.default_samples);
    let seed = seed.unwrap_or(config.survey.default_seed);
    let starts = if samples == 0 {
        all_starts(size)
    } else {
        sample_starts(size, samples, seed)
    };

    println!("Surveying {} start(s) on {}x{} {}", starts.len(), size, size, tour_type);
    survey(board, &starts).print_report();
}
