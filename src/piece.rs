use std::fmt;

/// The axis a piece is locked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// The two directions a piece with this orientation may slide in.
    pub fn directions(&self) -> [Direction; 2] {
        match self {
            Orientation::Horizontal => [Direction::Left, Direction::Right],
            Orientation::Vertical => [Direction::Up, Direction::Down],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// `(row, col)` delta of a single step.
    pub fn as_offset(&self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn orientation(&self) -> Orientation {
        match self {
            Direction::Up | Direction::Down => Orientation::Vertical,
            Direction::Left | Direction::Right => Orientation::Horizontal,
        }
    }

    /// True for directions that increase the row or column index.
    pub fn is_forward(&self) -> bool {
        matches!(self, Direction::Down | Direction::Right)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        write!(f, "{}", s)
    }
}

/// A grid cell. Signed so that cells just outside the grid (the exit) can be named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The cell `distance` steps away in `direction`.
    pub fn step(self, direction: Direction, distance: i32) -> Self {
        let (dr, dc) = direction.as_offset();
        Self {
            row: self.row + dr * distance,
            col: self.col + dc * distance,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A rectangular piece of width one, sliding along its orientation.
///
/// The anchor is the piece's lexicographically smallest cell; every other
/// cell follows it along the orientation axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    id: char,
    orientation: Orientation,
    length: i32,
    anchor: Position,
}

impl Piece {
    pub fn new(id: char, orientation: Orientation, length: i32, anchor: Position) -> Self {
        Self {
            id,
            orientation,
            length,
            anchor,
        }
    }

    pub fn id(&self) -> char {
        self.id
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn length(&self) -> i32 {
        self.length
    }

    pub fn anchor(&self) -> Position {
        self.anchor
    }

    /// Cells covered by the piece, anchor first.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        let (dr, dc) = match self.orientation {
            Orientation::Horizontal => (0, 1),
            Orientation::Vertical => (1, 0),
        };
        let anchor = self.anchor;
        (0..self.length).map(move |i| Position::new(anchor.row + dr * i, anchor.col + dc * i))
    }

    /// The cell that leads when sliding in `direction`.
    pub fn leading_cell(&self, direction: Direction) -> Position {
        if direction.is_forward() {
            match self.orientation {
                Orientation::Horizontal => self.anchor.step(Direction::Right, self.length - 1),
                Orientation::Vertical => self.anchor.step(Direction::Down, self.length - 1),
            }
        } else {
            self.anchor
        }
    }

    pub fn covers(&self, position: Position) -> bool {
        match self.orientation {
            Orientation::Horizontal => {
                position.row == self.anchor.row
                    && position.col >= self.anchor.col
                    && position.col < self.anchor.col + self.length
            }
            Orientation::Vertical => {
                position.col == self.anchor.col
                    && position.row >= self.anchor.row
                    && position.row < self.anchor.row + self.length
            }
        }
    }

    /// Slides the piece `offset` cells along its axis (negative is up/left).
    pub fn shift(&mut self, offset: i32) {
        match self.orientation {
            Orientation::Horizontal => self.anchor.col += offset,
            Orientation::Vertical => self.anchor.row += offset,
        }
    }
}
