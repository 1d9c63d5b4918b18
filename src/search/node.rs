use std::ops::Index;

use crate::board::Board;
use crate::moves::Move;

/// Index of a [`SearchNode`] inside its [`NodeArena`].
pub type NodeId = usize;

/// One state in the search tree. Parents are referenced by arena index.
#[derive(Debug, Clone)]
pub struct SearchNode {
    board: Board,
    g: u32,
    h: u32,
    parent: Option<NodeId>,
    last_move: Option<Move>,
}

impl SearchNode {
    pub fn root(board: Board, h: u32) -> Self {
        Self {
            board,
            g: 0,
            h,
            parent: None,
            last_move: None,
        }
    }

    pub fn child(board: Board, g: u32, h: u32, parent: NodeId, movement: Move) -> Self {
        Self {
            board,
            g,
            h,
            parent: Some(parent),
            last_move: Some(movement),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Moves made since the root.
    pub fn g(&self) -> u32 {
        self.g
    }

    pub fn h(&self) -> u32 {
        self.h
    }

    pub fn f(&self) -> u32 {
        self.g + self.h
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The move that produced this node from its parent; `None` at the root.
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }
}

/// Append-only store of every node a search created.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: SearchNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes from the root down to `id`.
    pub fn path(&self, id: NodeId) -> Vec<&SearchNode> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(index) = current {
            let node = &self.nodes[index];
            path.push(node);
            current = node.parent;
        }
        path.reverse();
        path
    }
}

impl Index<NodeId> for NodeArena {
    type Output = SearchNode;

    fn index(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id]
    }
}

impl From<Vec<SearchNode>> for NodeArena {
    fn from(nodes: Vec<SearchNode>) -> Self {
        Self { nodes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Direction, Orientation, Piece, Position};

    #[test]
    fn test_path_follows_parents() {
        let board = Board::new(
            5,
            1,
            vec![Piece::new('P', Orientation::Horizontal, 2, Position::new(0, 0))],
            'P',
            Position::new(0, 5),
        )
        .unwrap();

        let mut arena = NodeArena::new();
        let root = arena.push(SearchNode::root(board.clone(), 3));
        let first = Move::new('P', Direction::Right, 1);
        let b1 = board.successor(&first);
        let a = arena.push(SearchNode::child(b1.clone(), 1, 2, root, first));
        // A sibling that is not on the path.
        let sibling = Move::new('P', Direction::Right, 2);
        arena.push(SearchNode::child(board.successor(&sibling), 1, 1, root, sibling));
        let second = Move::new('P', Direction::Right, 2);
        let leaf = arena.push(SearchNode::child(b1.successor(&second), 2, 0, a, second));

        let path = arena.path(leaf);
        assert_eq!(path.len(), 3);
        assert_eq!(path[0].last_move(), None);
        assert_eq!(path[1].last_move(), Some(first));
        assert_eq!(path[2].last_move(), Some(second));
        assert!(path[2].board().is_goal());
        assert_eq!(path[2].f(), 2);
        assert_eq!(arena.len(), 4);
        assert_eq!(arena[leaf].parent(), Some(a));
    }
}
