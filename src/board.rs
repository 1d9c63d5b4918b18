use rand::{seq::SliceRandom, Rng};
use rustc_hash::FxHashMap;
use std::error::Error;
use std::fmt;

use crate::moves::Move;
use crate::piece::{Direction, Orientation, Piece, Position};
use crate::render;

/// Marks an empty in-grid cell in serializations and renderings.
pub const EMPTY_CELL: char = '.';
/// Marks the exit opening. Never a valid piece identifier.
pub const EXIT_CELL: char = 'K';
/// Separates rows in [`Board::serialize`].
pub const ROW_SEPARATOR: char = '|';

/// The grid edge the exit opening sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl ExitSide {
    /// The direction the primary piece has to travel to leave the grid.
    pub fn direction(&self) -> Direction {
        match self {
            ExitSide::Top => Direction::Up,
            ExitSide::Bottom => Direction::Down,
            ExitSide::Left => Direction::Left,
            ExitSide::Right => Direction::Right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    EmptyGrid { width: i32, height: i32 },
    GridTooLarge { width: i32, height: i32 },
    ReservedId(char),
    DuplicatePiece(char),
    InvalidLength { id: char, length: i32 },
    OutOfBounds { id: char, cell: Position },
    Overlap { first: char, second: char, cell: Position },
    MissingPrimary(char),
    ExitNotOnEdge(Position),
    PrimaryMisaligned { side: ExitSide },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::EmptyGrid { width, height } => {
                write!(f, "grid must be at least 1x1, got {height}x{width}")
            }
            BoardError::GridTooLarge { width, height } => {
                write!(f, "grid of {height}x{width} cells is too large")
            }
            BoardError::ReservedId(id) => write!(f, "'{id}' is reserved and cannot name a piece"),
            BoardError::DuplicatePiece(id) => write!(f, "piece '{id}' is defined twice"),
            BoardError::InvalidLength { id, length } => {
                write!(f, "piece '{id}' has invalid length {length}")
            }
            BoardError::OutOfBounds { id, cell } => {
                write!(f, "piece '{id}' leaves the grid at {cell}")
            }
            BoardError::Overlap { first, second, cell } => {
                write!(f, "pieces '{first}' and '{second}' overlap at {cell}")
            }
            BoardError::MissingPrimary(id) => write!(f, "primary piece '{id}' is not on the board"),
            BoardError::ExitNotOnEdge(cell) => {
                write!(f, "exit {cell} is not one cell beyond a grid edge")
            }
            BoardError::PrimaryMisaligned { side } => {
                write!(f, "primary piece cannot reach the {side:?} exit along its axis")
            }
        }
    }
}

impl Error for BoardError {}

/// A puzzle configuration: fixed grid shape and exit, movable pieces.
///
/// Cloning is a deep copy of the piece list, so a clone never shares
/// mutable state with the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: i32,
    height: i32,
    pieces: Vec<Piece>,
    primary: usize,
    exit: Position,
    exit_side: ExitSide,
}

impl Board {
    /// Builds a board, checking every structural invariant the search relies on.
    pub fn new(
        width: i32,
        height: i32,
        pieces: Vec<Piece>,
        primary_id: char,
        exit: Position,
    ) -> Result<Self, BoardError> {
        if width < 1 || height < 1 {
            return Err(BoardError::EmptyGrid { width, height });
        }

        // Serialization covers one extra row and column for the exit.
        let padded = width.checked_add(1).zip(height.checked_add(1));
        if padded.and_then(|(w, h)| w.checked_mul(h)).is_none() {
            return Err(BoardError::GridTooLarge { width, height });
        }

        let exit_side = Self::locate_exit(width, height, exit)?;
        let primary = pieces
            .iter()
            .position(|p| p.id() == primary_id)
            .ok_or(BoardError::MissingPrimary(primary_id))?;

        let mut claimed: FxHashMap<Position, char> = FxHashMap::default();
        for (index, piece) in pieces.iter().enumerate() {
            if piece.id() == EXIT_CELL || piece.id() == EMPTY_CELL || piece.id() == ROW_SEPARATOR {
                return Err(BoardError::ReservedId(piece.id()));
            }
            if pieces[..index].iter().any(|p| p.id() == piece.id()) {
                return Err(BoardError::DuplicatePiece(piece.id()));
            }
            if piece.length() < 1 {
                return Err(BoardError::InvalidLength {
                    id: piece.id(),
                    length: piece.length(),
                });
            }
            for cell in piece.cells() {
                if cell.row < 0 || cell.row >= height || cell.col < 0 || cell.col >= width {
                    return Err(BoardError::OutOfBounds { id: piece.id(), cell });
                }
                if let Some(&other) = claimed.get(&cell) {
                    return Err(BoardError::Overlap {
                        first: other,
                        second: piece.id(),
                        cell,
                    });
                }
                claimed.insert(cell, piece.id());
            }
        }

        let p = &pieces[primary];
        let aligned = match exit_side {
            ExitSide::Top | ExitSide::Bottom => {
                p.orientation() == Orientation::Vertical && p.anchor().col == exit.col
            }
            ExitSide::Left | ExitSide::Right => {
                p.orientation() == Orientation::Horizontal && p.anchor().row == exit.row
            }
        };
        if !aligned {
            return Err(BoardError::PrimaryMisaligned { side: exit_side });
        }

        Ok(Self {
            width,
            height,
            pieces,
            primary,
            exit,
            exit_side,
        })
    }

    fn locate_exit(width: i32, height: i32, exit: Position) -> Result<ExitSide, BoardError> {
        let row_inside = (0..height).contains(&exit.row);
        let col_inside = (0..width).contains(&exit.col);
        match (exit.row, exit.col) {
            (-1, _) if col_inside => Ok(ExitSide::Top),
            (r, _) if r == height && col_inside => Ok(ExitSide::Bottom),
            (_, -1) if row_inside => Ok(ExitSide::Left),
            (_, c) if c == width && row_inside => Ok(ExitSide::Right),
            _ => Err(BoardError::ExitNotOnEdge(exit)),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn primary(&self) -> &Piece {
        &self.pieces[self.primary]
    }

    pub fn primary_index(&self) -> usize {
        self.primary
    }

    pub fn exit(&self) -> Position {
        self.exit
    }

    pub fn exit_side(&self) -> ExitSide {
        self.exit_side
    }

    pub fn piece(&self, id: char) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id() == id)
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        (0..self.height).contains(&position.row) && (0..self.width).contains(&position.col)
    }

    pub(crate) fn cell_index(&self, position: Position) -> usize {
        (position.row * self.width + position.col) as usize
    }

    /// The primary's cell nearest the exit.
    pub fn leading_cell(&self) -> Position {
        self.primary().leading_cell(self.exit_side.direction())
    }

    /// Number of cells strictly between the primary's leading cell and the exit.
    pub fn exit_gap(&self) -> u32 {
        let lead = self.leading_cell();
        let gap = match self.exit_side {
            ExitSide::Top => lead.row - self.exit.row,
            ExitSide::Bottom => self.exit.row - lead.row,
            ExitSide::Left => lead.col - self.exit.col,
            ExitSide::Right => self.exit.col - lead.col,
        } - 1;
        gap.max(0) as u32
    }

    /// The cells between the primary and the exit, nearest first.
    pub fn corridor(&self) -> impl Iterator<Item = Position> + '_ {
        let lead = self.leading_cell();
        let direction = self.exit_side.direction();
        (1..=self.exit_gap() as i32).map(move |d| lead.step(direction, d))
    }

    /// True when the primary's leading edge sits on the exit opening.
    pub fn is_goal(&self) -> bool {
        self.exit_gap() == 0
    }

    /// Per-cell owner (piece index) of every in-grid cell.
    ///
    /// Panics if two pieces claim the same cell.
    pub fn occupancy(&self) -> Vec<Option<usize>> {
        let mut grid = vec![None; (self.width * self.height) as usize];
        for (index, piece) in self.pieces.iter().enumerate() {
            self.mark(&mut grid, piece, Some(index));
        }
        grid
    }

    /// Writes `owner` into every in-grid cell of `piece`.
    pub(crate) fn mark(&self, grid: &mut [Option<usize>], piece: &Piece, owner: Option<usize>) {
        for cell in piece.cells().filter(|c| self.in_bounds(*c)) {
            let slot = &mut grid[self.cell_index(cell)];
            if let (Some(current), Some(new)) = (*slot, owner) {
                assert!(
                    current == new,
                    "pieces '{}' and '{}' overlap at {}",
                    self.pieces[current].id(),
                    self.pieces[new].id(),
                    cell
                );
            }
            *slot = owner;
        }
    }

    /// The piece covering `position`, if any.
    pub fn occupant(&self, position: Position) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.covers(position))
    }

    /// Display character of a cell: a piece id, [`EXIT_CELL`] or [`EMPTY_CELL`].
    pub fn cell_at(&self, position: Position) -> char {
        match self.occupant(position) {
            Some(piece) => piece.id(),
            None if position == self.exit => EXIT_CELL,
            None => EMPTY_CELL,
        }
    }

    /// Canonical key of the current configuration, used for duplicate detection.
    ///
    /// Covers `max(height, exit.row + 1)` rows and `max(width, exit.col + 1)`
    /// columns so a bottom or right exit is part of the key.
    pub fn serialize(&self) -> String {
        let rows = self.height.max(self.exit.row + 1);
        let cols = self.width.max(self.exit.col + 1);
        let mut grid = vec![EMPTY_CELL; (rows * cols) as usize];

        for piece in &self.pieces {
            for cell in piece.cells() {
                if cell.row >= 0 && cell.row < rows && cell.col >= 0 && cell.col < cols {
                    grid[(cell.row * cols + cell.col) as usize] = piece.id();
                }
            }
        }
        if self.exit.row >= 0 && self.exit.col >= 0 {
            let slot = &mut grid[(self.exit.row * cols + self.exit.col) as usize];
            if *slot == EMPTY_CELL {
                *slot = EXIT_CELL;
            }
        }

        let mut key = String::with_capacity(((cols + 1) * rows) as usize);
        for (r, row) in grid.chunks(cols as usize).enumerate() {
            if r > 0 {
                key.push(ROW_SEPARATOR);
            }
            key.extend(row.iter());
        }
        key
    }

    /// Slides the named piece. Returns false if the piece does not exist or
    /// cannot travel in that direction; does not check for collisions.
    pub fn apply_move(&mut self, movement: &Move) -> bool {
        match self.pieces.iter_mut().find(|p| p.id() == movement.piece) {
            Some(piece) if piece.orientation() == movement.direction.orientation() => {
                piece.shift(movement.signed_offset());
                true
            }
            _ => false,
        }
    }

    /// A fresh board with `movement` applied.
    ///
    /// Panics if the move does not fit this board; moves are expected to come
    /// from [`Board::generate_moves`].
    pub fn successor(&self, movement: &Move) -> Board {
        let mut next = self.clone();
        assert!(
            next.apply_move(movement),
            "move {movement} does not apply to this board"
        );
        next
    }

    /// Random walk of up to `steps` legal moves.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R, steps: usize) {
        for _ in 0..steps {
            let moves = self.generate_moves();
            match moves.choose(rng) {
                Some(movement) => {
                    let applied = self.apply_move(movement);
                    debug_assert!(applied);
                }
                None => break,
            }
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render::board_to_string(self, None, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car(id: char, row: i32, col: i32) -> Piece {
        Piece::new(id, Orientation::Horizontal, 2, Position::new(row, col))
    }

    fn truck(id: char, row: i32, col: i32) -> Piece {
        Piece::new(id, Orientation::Vertical, 3, Position::new(row, col))
    }

    fn sample() -> Board {
        Board::new(
            6,
            6,
            vec![car('P', 2, 0), truck('A', 0, 3), car('B', 5, 0)],
            'P',
            Position::new(2, 6),
        )
        .unwrap()
    }

    #[test]
    fn test_exit_side() {
        let board = sample();
        assert_eq!(board.exit_side(), ExitSide::Right);
        assert_eq!(board.exit_side().direction(), Direction::Right);
    }

    #[test]
    fn test_rejects_overlap() {
        let err = Board::new(
            6,
            6,
            vec![car('P', 2, 2), truck('A', 1, 3)],
            'P',
            Position::new(2, 6),
        )
        .unwrap_err();
        assert_eq!(
            err,
            BoardError::Overlap {
                first: 'P',
                second: 'A',
                cell: Position::new(2, 3)
            }
        );
    }

    #[test]
    fn test_rejects_out_of_bounds() {
        let err = Board::new(6, 6, vec![car('P', 2, 5)], 'P', Position::new(2, 6)).unwrap_err();
        assert!(matches!(err, BoardError::OutOfBounds { id: 'P', .. }));
    }

    #[test]
    fn test_rejects_bad_exit() {
        let err = Board::new(6, 6, vec![car('P', 2, 0)], 'P', Position::new(2, 3)).unwrap_err();
        assert_eq!(err, BoardError::ExitNotOnEdge(Position::new(2, 3)));

        let corner = Board::new(6, 6, vec![car('P', 2, 0)], 'P', Position::new(-1, 6)).unwrap_err();
        assert_eq!(corner, BoardError::ExitNotOnEdge(Position::new(-1, 6)));
    }

    #[test]
    fn test_rejects_oversized_grid() {
        let err = Board::new(70_000, 70_000, vec![car('P', 0, 0)], 'P', Position::new(0, 70_000));
        assert_eq!(
            err,
            Err(BoardError::GridTooLarge {
                width: 70_000,
                height: 70_000
            })
        );

        let widest = Board::new(i32::MAX, 1, vec![car('P', 0, 0)], 'P', Position::new(0, i32::MAX));
        assert!(matches!(widest, Err(BoardError::GridTooLarge { .. })));

        // Large but addressable grids are validated without a dense buffer.
        let tall = Board::new(2, 40_000, vec![car('P', 0, 0)], 'P', Position::new(0, 2)).unwrap();
        assert!(tall.is_goal());
    }

    #[test]
    fn test_rejects_misaligned_primary() {
        let wrong_row = Board::new(6, 6, vec![car('P', 1, 0)], 'P', Position::new(2, 6));
        assert!(matches!(wrong_row, Err(BoardError::PrimaryMisaligned { .. })));

        let wrong_axis = Board::new(6, 6, vec![car('P', 2, 0)], 'P', Position::new(-1, 0));
        assert!(matches!(wrong_axis, Err(BoardError::PrimaryMisaligned { side: ExitSide::Top })));
    }

    #[test]
    fn test_rejects_reserved_and_duplicate_ids() {
        let exit = Position::new(2, 6);
        let reserved = Board::new(6, 6, vec![car('P', 2, 0), car('K', 0, 0)], 'P', exit);
        assert_eq!(reserved, Err(BoardError::ReservedId('K')));

        let pieces = vec![car('P', 2, 0), car('A', 0, 0), car('A', 4, 0)];
        let duplicate = Board::new(6, 6, pieces, 'P', exit);
        assert_eq!(duplicate, Err(BoardError::DuplicatePiece('A')));
    }

    #[test]
    fn test_missing_primary() {
        let err = Board::new(6, 6, vec![car('A', 2, 0)], 'P', Position::new(2, 6)).unwrap_err();
        assert_eq!(err, BoardError::MissingPrimary('P'));
    }

    #[test]
    fn test_exit_gap_and_goal() {
        let mut board = sample();
        assert_eq!(board.leading_cell(), Position::new(2, 1));
        assert_eq!(board.exit_gap(), 4);
        assert!(!board.is_goal());

        board.apply_move(&Move::new('P', Direction::Right, 4));
        assert_eq!(board.exit_gap(), 0);
        assert!(board.is_goal());

        // Slid into the opening itself.
        board.apply_move(&Move::new('P', Direction::Right, 1));
        assert_eq!(board.leading_cell(), Position::new(2, 6));
        assert!(board.is_goal());
    }

    #[test]
    fn test_goal_on_top_exit() {
        let p = Piece::new('P', Orientation::Vertical, 2, Position::new(0, 1));
        let board = Board::new(3, 4, vec![p], 'P', Position::new(-1, 1)).unwrap();
        assert_eq!(board.exit_side(), ExitSide::Top);
        assert!(board.is_goal());
        assert_eq!(board.corridor().count(), 0);
    }

    #[test]
    fn test_corridor() {
        let board = sample();
        let corridor: Vec<_> = board.corridor().collect();
        assert_eq!(
            corridor,
            vec![
                Position::new(2, 2),
                Position::new(2, 3),
                Position::new(2, 4),
                Position::new(2, 5)
            ]
        );
        assert_eq!(board.occupant(Position::new(2, 3)).map(Piece::id), Some('A'));
    }

    #[test]
    fn test_serialize() {
        let board = sample();
        assert_eq!(
            board.serialize(),
            "...A...|...A...|PP.A..K|.......|.......|BB....."
        );
    }

    #[test]
    fn test_serialize_clone_and_difference() {
        let board = sample();
        let clone = board.clone();
        assert_eq!(board.serialize(), clone.serialize());

        let moved = board.successor(&Move::new('B', Direction::Right, 1));
        assert_ne!(board.serialize(), moved.serialize());
        // The original is untouched by the successor.
        assert_eq!(board.piece('B').unwrap().anchor(), Position::new(5, 0));
    }

    #[test]
    fn test_cell_at() {
        let board = sample();
        assert_eq!(board.cell_at(Position::new(2, 0)), 'P');
        assert_eq!(board.cell_at(Position::new(2, 6)), EXIT_CELL);
        assert_eq!(board.cell_at(Position::new(4, 4)), EMPTY_CELL);
    }

    #[test]
    fn test_apply_move_rejects_off_axis() {
        let mut board = sample();
        assert!(!board.apply_move(&Move::new('P', Direction::Up, 1)));
        assert!(!board.apply_move(&Move::new('Z', Direction::Left, 1)));
        assert!(board.apply_move(&Move::new('A', Direction::Down, 2)));
        assert_eq!(board.piece('A').unwrap().anchor(), Position::new(2, 3));
    }

    #[test]
    #[should_panic]
    fn test_occupancy_panics_on_overlap() {
        let mut board = sample();
        board.apply_move(&Move::new('P', Direction::Right, 2));
        board.occupancy();
    }

    #[test]
    fn test_display() {
        let board = sample();
        let expected = "\
...A..
...A..
PP.A..K
......
......
BB....
";
        assert_eq!(board.to_string(), expected);
    }
}
