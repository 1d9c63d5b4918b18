//! Rush Hour solver.
//!
//! Boards are parsed from text, explored with uniform cost search, greedy
//! best-first search, A* or IDA*, and the resulting move sequence can be
//! rendered or saved.

pub mod board;
pub mod config;
pub mod frontier;
pub mod heuristic;
pub mod moves;
pub mod parser;
pub mod piece;
pub mod render;
pub mod saver;
pub mod search;

pub use board::{Board, BoardError, ExitSide};
pub use heuristic::Heuristic;
pub use moves::Move;
pub use parser::{load_puzzle, parse_puzzle, ParseError};
pub use piece::{Direction, Orientation, Piece, Position};
pub use search::{
    a_star, greedy, ida_star, solve, solve_by_name, uniform_cost, Algorithm, SearchResult,
    SelectionError,
};
