//! Cost-to-go estimators over a [`Board`].
//!
//! All estimators are zero on a goal board. `manhattan` and the blocking
//! counts measure different things (cells versus pieces), so their sum in
//! `combined` can exceed the true number of moves left.

use rustc_hash::FxHashSet;
use std::fmt;
use std::str::FromStr;

use crate::board::Board;
use crate::piece::{Orientation, Piece};
use crate::search::SelectionError;

/// Signature shared by every estimator.
pub type Estimator = fn(&Board) -> u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Heuristic {
    #[default]
    Manhattan,
    BlockingCount,
    BlockingDistance,
    Combined,
}

impl Heuristic {
    pub const ALL: [Heuristic; 4] = [
        Heuristic::Manhattan,
        Heuristic::BlockingCount,
        Heuristic::BlockingDistance,
        Heuristic::Combined,
    ];

    /// The estimator function behind this selection.
    pub fn estimator(self) -> Estimator {
        match self {
            Heuristic::Manhattan => manhattan,
            Heuristic::BlockingCount => blocking_count,
            Heuristic::BlockingDistance => blocking_distance,
            Heuristic::Combined => combined,
        }
    }

    pub fn estimate(self, board: &Board) -> u32 {
        (self.estimator())(board)
    }

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::Manhattan => "manhattan",
            Heuristic::BlockingCount => "blockingCount",
            Heuristic::BlockingDistance => "blockingDistance",
            Heuristic::Combined => "combined",
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Heuristic {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manhattan" => Ok(Heuristic::Manhattan),
            "blockingcount" | "blocking-count" => Ok(Heuristic::BlockingCount),
            "blockingdistance" | "blocking-distance" | "blocking" => {
                Ok(Heuristic::BlockingDistance)
            }
            "combined" => Ok(Heuristic::Combined),
            _ => Err(SelectionError::UnknownHeuristic(s.to_string())),
        }
    }
}

/// Cells between the primary's leading edge and the exit.
pub fn manhattan(board: &Board) -> u32 {
    board.exit_gap()
}

/// Distinct pieces in the corridor, plus one for the primary's own slide.
pub fn blocking_count(board: &Board) -> u32 {
    if board.is_goal() {
        return 0;
    }
    blockers(board).len() as u32 + 1
}

/// Sum of the shortest slide each blocker needs to leave the primary's
/// lane, plus one for the primary's own slide.
pub fn blocking_distance(board: &Board) -> u32 {
    if board.is_goal() {
        return 0;
    }
    let total: u32 = blockers(board)
        .into_iter()
        .map(|blocker| clearing_distance(board, blocker))
        .sum();
    total + 1
}

pub fn combined(board: &Board) -> u32 {
    manhattan(board) + blocking_count(board)
}

/// Pieces occupying the corridor, nearest first, each listed once.
fn blockers(board: &Board) -> Vec<&Piece> {
    let mut seen = FxHashSet::default();
    board
        .corridor()
        .filter_map(|cell| board.occupant(cell))
        .filter(|piece| seen.insert(piece.id()))
        .collect()
}

/// Fewest cells `blocker` must slide along its own axis to leave the lane,
/// ignoring every other piece.
fn clearing_distance(board: &Board, blocker: &Piece) -> u32 {
    // A blocker lying along the lane never leaves it.
    if blocker.orientation() == board.primary().orientation() {
        return 1;
    }

    let (lane, start, extent) = match blocker.orientation() {
        Orientation::Vertical => (board.exit().row, blocker.anchor().row, board.height()),
        Orientation::Horizontal => (board.exit().col, blocker.anchor().col, board.width()),
    };
    let end = start + blocker.length() - 1;
    let backward = end - lane + 1;
    let forward = lane - start + 1;
    let backward_fits = start - backward >= 0;
    let forward_fits = end + forward < extent;

    let distance = match (backward_fits, forward_fits) {
        (true, false) => backward,
        (false, true) => forward,
        _ => backward.min(forward),
    };
    distance as u32
}
