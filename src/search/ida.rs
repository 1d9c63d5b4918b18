use log::debug;
use rustc_hash::FxHashSet;

use crate::board::Board;
use crate::heuristic::{Estimator, Heuristic};

use super::node::{NodeArena, SearchNode};
use super::{Algorithm, SearchResult};

/// Result of one bounded depth-first pass.
enum Bound {
    /// A goal is on the path; unwind without touching it.
    Found,
    /// Smallest `f` that exceeded the threshold.
    Overflow(u32),
    /// Nothing was pruned and no goal was reached.
    Exhausted,
}

struct Ida {
    estimate: Estimator,
    /// Current DFS path, root first. A node's parent is the entry before it.
    path: Vec<SearchNode>,
    on_path: FxHashSet<String>,
    nodes_expanded: u64,
}

impl Ida {
    fn dfs(&mut self, threshold: u32) -> Bound {
        let depth = self.path.len() - 1;
        let f = self.path[depth].f();
        if f > threshold {
            return Bound::Overflow(f);
        }
        self.nodes_expanded += 1;
        if self.path[depth].board().is_goal() {
            return Bound::Found;
        }

        let g = self.path[depth].g() + 1;
        let moves = self.path[depth].board().generate_moves();
        let mut next: Option<u32> = None;
        for movement in moves {
            let board = self.path[depth].board().successor(&movement);
            let key = board.serialize();
            // Only states on the current path count as cycles.
            if self.on_path.contains(&key) {
                continue;
            }

            let h = (self.estimate)(&board);
            self.path.push(SearchNode::child(board, g, h, depth, movement));
            self.on_path.insert(key.clone());

            let bound = self.dfs(threshold);
            if let Bound::Found = bound {
                return Bound::Found;
            }

            self.path.pop();
            self.on_path.remove(&key);
            if let Bound::Overflow(t) = bound {
                next = Some(next.map_or(t, |n| n.min(t)));
            }
        }

        next.map_or(Bound::Exhausted, Bound::Overflow)
    }
}

/// Iterative-deepening A*: repeated depth-first passes with a rising `f` bound.
///
/// The first threshold is `h(start)`; each following one is the smallest `f`
/// pruned by the previous pass.
pub(super) fn search(start: &Board, heuristic: Heuristic) -> SearchResult {
    let estimate = heuristic.estimator();
    let root = SearchNode::root(start.clone(), estimate(start));
    let mut threshold = root.f();

    let mut on_path = FxHashSet::default();
    on_path.insert(start.serialize());
    let mut ida = Ida {
        estimate,
        path: vec![root],
        on_path,
        nodes_expanded: 0,
    };

    let mut thresholds = Vec::new();
    loop {
        thresholds.push(threshold);
        debug!(
            "IDA* iteration {} with threshold {} ({} nodes so far)",
            thresholds.len(),
            threshold,
            ida.nodes_expanded
        );

        match ida.dfs(threshold) {
            Bound::Found => {
                let goal = ida.path.len() - 1;
                return SearchResult::new(
                    Algorithm::IdaStar,
                    Some(heuristic),
                    NodeArena::from(ida.path),
                    Some(goal),
                    ida.nodes_expanded,
                )
                .with_thresholds(thresholds);
            }
            Bound::Overflow(next) => threshold = next,
            Bound::Exhausted => {
                return SearchResult::new(
                    Algorithm::IdaStar,
                    Some(heuristic),
                    NodeArena::new(),
                    None,
                    ida.nodes_expanded,
                )
                .with_thresholds(thresholds);
            }
        }
    }
}
