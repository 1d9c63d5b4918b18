use anyhow::{Context, Result};
use log::info;
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::time::Instant;
use thousands::Separable;

use rush_hour::config::{Config, ConfigError};
use rush_hour::render::{board_to_string, solution_to_string};
use rush_hour::saver::save_solution;
use rush_hour::{load_puzzle, solve};

fn prompt_for_puzzle() -> Result<PathBuf> {
    print!("Puzzle file: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read the puzzle path")?;
    let path = line.trim();
    anyhow::ensure!(!path.is_empty(), "no puzzle file given");
    Ok(PathBuf::from(path))
}

fn run(config: Config) -> Result<()> {
    let path = match config.puzzle {
        Some(ref path) => path.clone(),
        None => prompt_for_puzzle()?,
    };
    let board = load_puzzle(&path).with_context(|| format!("failed to load {}", path.display()))?;
    println!("Puzzle:\n{}", board_to_string(&board, None, config.colored));

    info!(
        "solving {} with {} ({})",
        path.display(),
        config.algorithm,
        config.heuristic
    );
    let stopwatch = Instant::now();
    let result = solve(&board, config.algorithm, Some(config.heuristic));
    let elapsed = stopwatch.elapsed();

    print!("{}", solution_to_string(&result, config.colored));
    println!();
    match result.cost() {
        Some(cost) => println!("Moves: {cost}"),
        None => println!("Moves: -"),
    }
    println!(
        "Nodes expanded: {}",
        result.nodes_expanded().separate_with_commas()
    );
    println!("Elapsed: {:.3} ms", elapsed.as_secs_f64() * 1000.0);

    if let Some(dir) = &config.output_dir {
        let saved = save_solution(&result, dir)
            .with_context(|| format!("failed to save the solution to {}", dir.display()))?;
        println!("Saved to {}", saved.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match Config::from_args(env::args().skip(1)) {
        Ok(config) => config,
        Err(ConfigError::HelpRequested) => {
            println!("{}", ConfigError::HelpRequested);
            return Ok(());
        }
        Err(err) => {
            eprintln!("{err}");
            process::exit(2);
        }
    };

    run(config)
}
