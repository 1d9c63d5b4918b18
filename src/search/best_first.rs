use log::trace;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::board::Board;
use crate::frontier::Frontier;
use crate::heuristic::{Estimator, Heuristic};

use super::node::{NodeArena, SearchNode};
use super::{Algorithm, SearchResult};

/// Repeated-state bookkeeping, keyed by [`Board::serialize`].
enum Visited {
    /// The first expansion of a state is final.
    Seen(FxHashSet<String>),
    /// Cheapest path cost recorded per state.
    BestCost(FxHashMap<String, u32>),
}

impl Visited {
    fn for_algorithm(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::AStar => Visited::BestCost(FxHashMap::default()),
            _ => Visited::Seen(FxHashSet::default()),
        }
    }

    /// True if a node for `key` reached with cost `g` is no longer worth expanding.
    fn is_stale(&self, key: &str, g: u32) -> bool {
        match self {
            Visited::Seen(seen) => seen.contains(key),
            Visited::BestCost(best) => best.get(key).map_or(false, |&cost| cost <= g),
        }
    }

    fn record(&mut self, key: String, g: u32) {
        match self {
            Visited::Seen(seen) => {
                seen.insert(key);
            }
            Visited::BestCost(best) => {
                best.insert(key, g);
            }
        }
    }
}

const INITIAL_FRONTIER: usize = 1024;

fn priority(algorithm: Algorithm, node: &SearchNode) -> u32 {
    match algorithm {
        Algorithm::Greedy => node.h(),
        Algorithm::AStar => node.f(),
        _ => node.g(),
    }
}

/// Frontier-driven search shared by UCS, Greedy and A*.
///
/// Pop the best node, drop it if its state is stale, otherwise record it,
/// count it as expanded, goal-test it and push its children.
pub(super) fn search(
    start: &Board,
    algorithm: Algorithm,
    heuristic: Option<Heuristic>,
) -> SearchResult {
    let estimate: Estimator =
        heuristic.map_or(super::no_estimate as Estimator, Heuristic::estimator);

    let mut arena = NodeArena::new();
    let mut frontier = Frontier::with_capacity(INITIAL_FRONTIER);
    let mut visited = Visited::for_algorithm(algorithm);
    let mut nodes_expanded: u64 = 0;

    let root = SearchNode::root(start.clone(), estimate(start));
    let root_priority = priority(algorithm, &root);
    frontier.push(arena.push(root), root_priority);

    while let Some(id) = frontier.pop() {
        let node = &arena[id];
        let key = node.board().serialize();
        if visited.is_stale(&key, node.g()) {
            continue;
        }
        visited.record(key, node.g());
        nodes_expanded += 1;

        if node.board().is_goal() {
            return SearchResult::new(algorithm, heuristic, arena, Some(id), nodes_expanded);
        }

        let g = node.g() + 1;
        let children: Vec<SearchNode> = node
            .board()
            .generate_moves()
            .into_iter()
            .filter_map(|movement| {
                let board = node.board().successor(&movement);
                if visited.is_stale(&board.serialize(), g) {
                    return None;
                }
                let h = estimate(&board);
                Some(SearchNode::child(board, g, h, id, movement))
            })
            .collect();

        trace!(
            "{algorithm}: expanded node {id} (g={}, h={}), {} children, frontier {}",
            g - 1,
            node.h(),
            children.len(),
            frontier.len()
        );

        for child in children {
            let child_priority = priority(algorithm, &child);
            frontier.push(arena.push(child), child_priority);
        }
    }

    SearchResult::new(algorithm, heuristic, arena, None, nodes_expanded)
}
