use std::fmt;

use crate::board::Board;
use crate::piece::Direction;

/// A single slide of one piece, any number of cells, costing one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub piece: char,
    pub direction: Direction,
    pub distance: u32,
}

impl Move {
    pub fn new(piece: char, direction: Direction, distance: u32) -> Self {
        Self {
            piece,
            direction,
            distance,
        }
    }

    /// Offset along the piece's axis; negative for up and left.
    pub fn signed_offset(&self) -> i32 {
        if self.direction.is_forward() {
            self.distance as i32
        } else {
            -(self.distance as i32)
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.piece, self.direction, self.distance)
    }
}

impl Board {
    /// Every legal slide from this configuration, grouped by piece in board
    /// order, then by direction, then by increasing distance.
    ///
    /// A slide stops at the first occupied or off-grid cell. The only cell
    /// outside the grid a piece may enter is the exit, and only the primary
    /// piece may enter it.
    pub fn generate_moves(&self) -> Vec<Move> {
        let mut occupancy = self.occupancy();
        let mut moves = Vec::new();

        for (index, piece) in self.pieces().iter().enumerate() {
            self.mark(&mut occupancy, piece, None);
            let is_primary = index == self.primary_index();

            for direction in piece.orientation().directions() {
                let lead = piece.leading_cell(direction);
                let mut distance = 1;
                loop {
                    let next = lead.step(direction, distance);
                    if self.in_bounds(next) {
                        if occupancy[self.cell_index(next)].is_some() {
                            break;
                        }
                        moves.push(Move::new(piece.id(), direction, distance as u32));
                        distance += 1;
                        continue;
                    }
                    if is_primary && next == self.exit() {
                        moves.push(Move::new(piece.id(), direction, distance as u32));
                    }
                    break;
                }
            }

            self.mark(&mut occupancy, piece, Some(index));
        }

        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Orientation, Piece, Position};

    fn board(pieces: Vec<Piece>, exit: Position) -> Board {
        Board::new(4, 4, pieces, 'P', exit).unwrap()
    }

    #[test]
    fn test_move_display() {
        assert_eq!(Move::new('A', Direction::Up, 2).to_string(), "A-up-2");
        assert_eq!(Move::new('A', Direction::Up, 2).signed_offset(), -2);
        assert_eq!(Move::new('A', Direction::Right, 3).signed_offset(), 3);
    }

    #[test]
    fn test_moves_stop_at_obstruction() {
        // ....
        // PP.A K
        // ...A
        // ....
        let b = board(
            vec![
                Piece::new('P', Orientation::Horizontal, 2, Position::new(1, 0)),
                Piece::new('A', Orientation::Vertical, 2, Position::new(1, 3)),
            ],
            Position::new(1, 4),
        );
        let moves = b.generate_moves();
        assert_eq!(
            moves,
            vec![
                Move::new('P', Direction::Right, 1),
                Move::new('A', Direction::Up, 1),
                Move::new('A', Direction::Down, 1),
            ]
        );
    }

    #[test]
    fn test_primary_may_enter_exit() {
        let b = board(
            vec![Piece::new('P', Orientation::Horizontal, 2, Position::new(2, 0))],
            Position::new(2, 4),
        );
        let moves = b.generate_moves();
        assert_eq!(
            moves,
            vec![
                Move::new('P', Direction::Right, 1),
                Move::new('P', Direction::Right, 2),
                Move::new('P', Direction::Right, 3),
            ]
        );
        let entered = b.successor(&moves[2]);
        assert_eq!(entered.leading_cell(), Position::new(2, 4));
        assert!(entered.is_goal());
        // Nothing beyond the opening.
        assert!(entered
            .generate_moves()
            .iter()
            .all(|m| m.direction == Direction::Left));
    }

    #[test]
    fn test_other_pieces_cannot_use_exit() {
        // B sits in the exit column below the primary.
        let b = board(
            vec![
                Piece::new('P', Orientation::Vertical, 2, Position::new(0, 0)),
                Piece::new('B', Orientation::Vertical, 2, Position::new(2, 0)),
            ],
            Position::new(4, 0),
        );
        assert!(b.generate_moves().is_empty());
    }

    #[test]
    fn test_left_exit() {
        let b = board(
            vec![
                Piece::new('P', Orientation::Horizontal, 2, Position::new(0, 2)),
                Piece::new('B', Orientation::Vertical, 3, Position::new(1, 0)),
            ],
            Position::new(0, -1),
        );
        let p_moves: Vec<_> = b.generate_moves().into_iter().filter(|m| m.piece == 'P').collect();
        assert_eq!(
            p_moves,
            vec![
                Move::new('P', Direction::Left, 1),
                Move::new('P', Direction::Left, 2),
                Move::new('P', Direction::Left, 3),
            ]
        );
    }

    #[test]
    fn test_blocked_piece_has_no_moves() {
        let b = board(
            vec![
                Piece::new('P', Orientation::Horizontal, 2, Position::new(1, 1)),
                Piece::new('A', Orientation::Horizontal, 1, Position::new(1, 0)),
                Piece::new('B', Orientation::Horizontal, 1, Position::new(1, 3)),
            ],
            Position::new(1, 4),
        );
        assert!(b.generate_moves().is_empty());
    }
}
