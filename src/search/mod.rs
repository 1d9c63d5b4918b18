//! State-space search over [`Board`] configurations.
//!
//! Four strategies share the move generator, the estimators and the node
//! arena:
//! - uniform cost search, ordered by path cost `g`
//! - greedy best-first, ordered by the estimate `h`
//! - A*, ordered by `f = g + h` with per-state best-cost tracking
//! - IDA*, depth-first passes bounded by a rising `f` threshold
//!
//! Every run reports the number of expanded nodes and, when solved, the
//! terminal node whose parent chain is the solution.

mod best_first;
mod ida;
pub mod node;

use log::debug;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

use crate::board::Board;
use crate::heuristic::Heuristic;
use crate::moves::Move;

pub use node::{NodeArena, NodeId, SearchNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    Ucs,
    Greedy,
    #[default]
    AStar,
    IdaStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Ucs,
        Algorithm::Greedy,
        Algorithm::AStar,
        Algorithm::IdaStar,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Ucs => "ucs",
            Algorithm::Greedy => "greedy",
            Algorithm::AStar => "astar",
            Algorithm::IdaStar => "ida",
        }
    }

    /// Whether the algorithm consults a heuristic.
    pub fn is_informed(self) -> bool {
        !matches!(self, Algorithm::Ucs)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ucs" => Ok(Algorithm::Ucs),
            "greedy" | "gbfs" => Ok(Algorithm::Greedy),
            "astar" | "a*" => Ok(Algorithm::AStar),
            "ida" | "idastar" | "ida*" => Ok(Algorithm::IdaStar),
            _ => Err(SelectionError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// An algorithm or heuristic name outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    UnknownAlgorithm(String),
    UnknownHeuristic(String),
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::UnknownAlgorithm(name) => write!(
                f,
                "unsupported algorithm '{name}' (expected ucs, greedy, astar or ida)"
            ),
            SelectionError::UnknownHeuristic(name) => write!(
                f,
                "unsupported heuristic '{name}' \
                 (expected manhattan, blockingCount, blockingDistance or combined)"
            ),
        }
    }
}

impl Error for SelectionError {}

/// Outcome of one search run.
#[derive(Debug, Clone)]
pub struct SearchResult {
    algorithm: Algorithm,
    heuristic: Option<Heuristic>,
    arena: NodeArena,
    goal: Option<NodeId>,
    nodes_expanded: u64,
    thresholds: Vec<u32>,
}

impl SearchResult {
    pub(crate) fn new(
        algorithm: Algorithm,
        heuristic: Option<Heuristic>,
        arena: NodeArena,
        goal: Option<NodeId>,
        nodes_expanded: u64,
    ) -> Self {
        Self {
            algorithm,
            heuristic,
            arena,
            goal,
            nodes_expanded,
            thresholds: Vec::new(),
        }
    }

    pub(crate) fn with_thresholds(mut self, thresholds: Vec<u32>) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The estimator used; `None` for uniform cost search.
    pub fn heuristic(&self) -> Option<Heuristic> {
        self.heuristic
    }

    pub fn nodes_expanded(&self) -> u64 {
        self.nodes_expanded
    }

    /// Nodes retained when the run ended.
    pub fn nodes_stored(&self) -> usize {
        self.arena.len()
    }

    /// IDA* thresholds, one per iteration. Empty for other algorithms.
    pub fn thresholds(&self) -> &[u32] {
        &self.thresholds
    }

    pub fn is_solved(&self) -> bool {
        self.goal.is_some()
    }

    /// The goal node, if one was reached.
    pub fn terminal(&self) -> Option<&SearchNode> {
        self.goal.map(|id| &self.arena[id])
    }

    /// Solution nodes from the initial board to the goal.
    pub fn path(&self) -> Option<Vec<&SearchNode>> {
        self.goal.map(|id| self.arena.path(id))
    }

    pub fn moves(&self) -> Option<Vec<Move>> {
        self.path()
            .map(|path| path.iter().filter_map(|node| node.last_move()).collect())
    }

    /// Number of moves in the solution.
    pub fn cost(&self) -> Option<u32> {
        self.terminal().map(SearchNode::g)
    }
}

pub(crate) fn no_estimate(_: &Board) -> u32 {
    0
}

/// Runs `algorithm` from `board`.
///
/// Uniform cost search ignores `heuristic`; the other algorithms fall back to
/// [`Heuristic::default`] when none is given.
pub fn solve(board: &Board, algorithm: Algorithm, heuristic: Option<Heuristic>) -> SearchResult {
    let heuristic = if algorithm.is_informed() {
        Some(heuristic.unwrap_or_default())
    } else {
        None
    };
    debug!(
        "starting {} search ({}) on {}x{} board with {} pieces",
        algorithm,
        heuristic.map_or("no heuristic", Heuristic::name),
        board.height(),
        board.width(),
        board.pieces().len()
    );

    let result = match (algorithm, heuristic) {
        (Algorithm::IdaStar, Some(h)) => ida::search(board, h),
        _ => best_first::search(board, algorithm, heuristic),
    };

    match result.cost() {
        Some(cost) => debug!(
            "{} solved in {} moves, {} nodes expanded",
            algorithm, cost, result.nodes_expanded
        ),
        None => debug!(
            "{} exhausted the state space, {} nodes expanded",
            algorithm, result.nodes_expanded
        ),
    }
    result
}

/// Resolves the names first, so an unsupported selection fails before any
/// search work.
pub fn solve_by_name(
    board: &Board,
    algorithm: &str,
    heuristic: Option<&str>,
) -> Result<SearchResult, SelectionError> {
    let algorithm: Algorithm = algorithm.parse()?;
    let heuristic = heuristic.map(str::parse::<Heuristic>).transpose()?;
    Ok(solve(board, algorithm, heuristic))
}

pub fn uniform_cost(board: &Board) -> SearchResult {
    solve(board, Algorithm::Ucs, None)
}

pub fn greedy(board: &Board, heuristic: Heuristic) -> SearchResult {
    solve(board, Algorithm::Greedy, Some(heuristic))
}

pub fn a_star(board: &Board, heuristic: Heuristic) -> SearchResult {
    solve(board, Algorithm::AStar, Some(heuristic))
}

pub fn ida_star(board: &Board, heuristic: Heuristic) -> SearchResult {
    solve(board, Algorithm::IdaStar, Some(heuristic))
}
