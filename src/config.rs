use crossterm::tty::IsTty;
use std::env;
use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::heuristic::Heuristic;
use crate::search::{Algorithm, SelectionError};

pub const DEFAULT_ALGORITHM: Algorithm = Algorithm::AStar;
pub const DEFAULT_HEURISTIC: Heuristic = Heuristic::Manhattan;

/// Default directory for saved solutions.
pub const OUTPUT_DIR_ENV: &str = "RUSH_HOUR_OUTPUT";
/// Any value disables colored output.
pub const NO_COLOR_ENV: &str = "NO_COLOR";

pub const USAGE: &str = "\
Usage: rush-hour [PUZZLE] [OPTIONS]

Options:
  -a, --algorithm NAME   ucs, greedy, astar or ida (default astar)
  -H, --heuristic NAME   manhattan, blockingCount, blockingDistance or combined (default manhattan)
  -o, --output DIR       save the solution to DIR
      --no-color         plain output
  -h, --help             print this message";

#[derive(Debug)]
pub enum ConfigError {
    HelpRequested,
    UnknownFlag(String),
    MissingValue(String),
    ExtraArgument(String),
    Selection(SelectionError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::HelpRequested => f.write_str(USAGE),
            ConfigError::UnknownFlag(flag) => write!(f, "unknown option '{flag}'\n\n{USAGE}"),
            ConfigError::MissingValue(flag) => write!(f, "option '{flag}' needs a value"),
            ConfigError::ExtraArgument(arg) => write!(f, "unexpected argument '{arg}'"),
            ConfigError::Selection(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Selection(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SelectionError> for ConfigError {
    fn from(err: SelectionError) -> Self {
        ConfigError::Selection(err)
    }
}

/// Run settings for the terminal front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Puzzle file; prompted for when absent.
    pub puzzle: Option<PathBuf>,
    pub algorithm: Algorithm,
    pub heuristic: Heuristic,
    pub output_dir: Option<PathBuf>,
    pub colored: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            puzzle: None,
            algorithm: DEFAULT_ALGORITHM,
            heuristic: DEFAULT_HEURISTIC,
            output_dir: None,
            colored: false,
        }
    }
}

impl Config {
    /// Defaults adjusted by the environment.
    pub fn from_env() -> Self {
        Self {
            output_dir: env::var_os(OUTPUT_DIR_ENV)
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
            colored: env::var_os(NO_COLOR_ENV).is_none() && io::stdout().is_tty(),
            ..Self::default()
        }
    }

    /// Environment defaults overridden by command line arguments (program name excluded).
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        Self::from_env().with_args(args)
    }

    pub fn with_args<I>(mut self, args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Err(ConfigError::HelpRequested),
                "-a" | "--algorithm" => {
                    self.algorithm = value(&arg, args.next())?.parse()?;
                }
                "-H" | "--heuristic" => {
                    self.heuristic = value(&arg, args.next())?.parse()?;
                }
                "-o" | "--output" => {
                    self.output_dir = Some(PathBuf::from(value(&arg, args.next())?));
                }
                "--no-color" => self.colored = false,
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(ConfigError::UnknownFlag(arg));
                }
                _ if self.puzzle.is_none() => self.puzzle = Some(PathBuf::from(arg)),
                _ => return Err(ConfigError::ExtraArgument(arg)),
            }
        }
        Ok(self)
    }
}

fn value(flag: &str, next: Option<String>) -> Result<String, ConfigError> {
    next.ok_or_else(|| ConfigError::MissingValue(flag.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default().with_args(Vec::new()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.algorithm, Algorithm::AStar);
        assert_eq!(config.heuristic, Heuristic::Manhattan);
    }

    #[test]
    fn test_all_options() {
        let config = Config {
            colored: true,
            ..Config::default()
        }
        .with_args(args(&[
            "puzzles/a.txt",
            "-a",
            "ida",
            "--heuristic",
            "blocking-count",
            "-o",
            "out",
            "--no-color",
        ]))
        .unwrap();
        assert_eq!(config.puzzle, Some(PathBuf::from("puzzles/a.txt")));
        assert_eq!(config.algorithm, Algorithm::IdaStar);
        assert_eq!(config.heuristic, Heuristic::BlockingCount);
        assert_eq!(config.output_dir, Some(PathBuf::from("out")));
        assert!(!config.colored);
    }

    #[test]
    fn test_errors() {
        let parse = |list: &[&str]| Config::default().with_args(args(list));
        assert!(matches!(parse(&["--help"]), Err(ConfigError::HelpRequested)));
        assert!(matches!(parse(&["--fast"]), Err(ConfigError::UnknownFlag(_))));
        assert!(matches!(parse(&["-a"]), Err(ConfigError::MissingValue(_))));
        assert!(matches!(parse(&["a.txt", "b.txt"]), Err(ConfigError::ExtraArgument(_))));
        assert!(matches!(
            parse(&["-a", "dfs"]),
            Err(ConfigError::Selection(SelectionError::UnknownAlgorithm(_)))
        ));
        assert!(matches!(
            parse(&["-H", "euclid"]),
            Err(ConfigError::Selection(SelectionError::UnknownHeuristic(_)))
        ));
    }
}
