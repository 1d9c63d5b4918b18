//! Text puzzle format.
//!
//! ```text
//! 6 6
//! 11
//! AAB..F
//! ..BCDF
//! GPPCDFK
//! GH.III
//! GHJ...
//! LLJMM.
//! ```
//!
//! The first line holds the row and column counts, the second the number of
//! pieces besides the primary `P`. The exit `K` sits outside the grid: as the
//! first or last character of a row for a left or right exit, or on its own
//! line above or below the grid for a top or bottom exit.

use log::warn;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::board::{Board, BoardError, EMPTY_CELL, EXIT_CELL};
use crate::piece::{Orientation, Piece, Position};

/// Identifier of the piece that has to reach the exit.
pub const PRIMARY_ID: char = 'P';

#[derive(Debug)]
pub enum ParseError {
    Io { path: PathBuf, source: io::Error },
    MissingHeader,
    InvalidDimensions(String),
    InvalidPieceCount(String),
    UnexpectedExitLine { line: usize },
    UnexpectedLine { line: usize },
    RowLength { line: usize, expected: usize, found: usize },
    RowCount { expected: usize, found: usize },
    MissingExit,
    MissingPrimary,
    NonLinearPiece(char),
    Board(BoardError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Io { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            ParseError::MissingHeader => {
                write!(f, "expected a dimensions line and a piece count line")
            }
            ParseError::InvalidDimensions(line) => write!(f, "invalid dimensions line: {line:?}"),
            ParseError::InvalidPieceCount(line) => write!(f, "invalid piece count: {line:?}"),
            ParseError::UnexpectedExitLine { line } => {
                write!(f, "line {line}: exit line must be directly above or below the grid")
            }
            ParseError::UnexpectedLine { line } => {
                write!(f, "line {line}: unexpected text after the grid")
            }
            ParseError::RowLength { line, expected, found } => write!(
                f,
                "line {line}: expected {expected} cells (or {} with an exit), found {found}",
                expected + 1
            ),
            ParseError::RowCount { expected, found } => {
                write!(f, "expected {expected} grid rows, found {found}")
            }
            ParseError::MissingExit => write!(f, "no exit ({EXIT_CELL}) on any edge"),
            ParseError::MissingPrimary => write!(f, "no primary piece ({PRIMARY_ID})"),
            ParseError::NonLinearPiece(id) => {
                write!(f, "piece '{id}' is not a straight contiguous line of at least two cells")
            }
            ParseError::Board(err) => write!(f, "invalid board: {err}"),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParseError::Io { source, .. } => Some(source),
            ParseError::Board(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BoardError> for ParseError {
    fn from(err: BoardError) -> Self {
        ParseError::Board(err)
    }
}

/// Reads and parses a puzzle file.
pub fn load_puzzle(path: impl AsRef<Path>) -> Result<Board, ParseError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_puzzle(&text)
}

pub fn parse_puzzle(text: &str) -> Result<Board, ParseError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim_end()))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, dimensions) = lines.next().ok_or(ParseError::MissingHeader)?;
    let (height, width) = parse_dimensions(dimensions)?;
    let (_, count) = lines.next().ok_or(ParseError::MissingHeader)?;
    let expected_pieces: usize = count
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidPieceCount(count.to_string()))?;

    let mut rows: Vec<Vec<char>> = Vec::new();
    let mut exit: Option<Position> = None;

    for (number, line) in lines {
        let cells: Vec<char> = line.chars().collect();
        let exit_col = cells.iter().position(|&c| c == EXIT_CELL);

        if let (Some(col), true) = (exit_col, cells.len() <= width) {
            // Exit on a line of its own, above or below the grid.
            let row = match rows.len() {
                0 => -1,
                n if n == height => height as i32,
                _ => return Err(ParseError::UnexpectedExitLine { line: number }),
            };
            if exit.is_some() {
                return Err(ParseError::UnexpectedExitLine { line: number });
            }
            exit = Some(Position::new(row, col as i32));
            continue;
        }

        if rows.len() == height {
            return Err(ParseError::UnexpectedLine { line: number });
        }

        if cells.len() == width {
            rows.push(cells);
        } else if cells.len() == width + 1 && exit_col.is_some() && exit.is_none() {
            let row = rows.len() as i32;
            if cells[0] == EXIT_CELL {
                exit = Some(Position::new(row, -1));
                rows.push(cells[1..].to_vec());
            } else if cells[width] == EXIT_CELL {
                exit = Some(Position::new(row, width as i32));
                rows.push(cells[..width].to_vec());
            } else {
                return Err(ParseError::RowLength {
                    line: number,
                    expected: width,
                    found: cells.len(),
                });
            }
        } else {
            return Err(ParseError::RowLength {
                line: number,
                expected: width,
                found: cells.len(),
            });
        }
    }

    if rows.len() != height {
        return Err(ParseError::RowCount {
            expected: height,
            found: rows.len(),
        });
    }
    let exit = exit.ok_or(ParseError::MissingExit)?;

    let pieces = collect_pieces(&rows)?;
    if !pieces.iter().any(|p| p.id() == PRIMARY_ID) {
        return Err(ParseError::MissingPrimary);
    }
    if pieces.len() != expected_pieces + 1 {
        warn!(
            "header declares {} non-primary pieces, grid contains {}",
            expected_pieces,
            pieces.len() - 1
        );
    }

    Ok(Board::new(width as i32, height as i32, pieces, PRIMARY_ID, exit)?)
}

fn parse_dimensions(line: &str) -> Result<(usize, usize), ParseError> {
    let invalid = || ParseError::InvalidDimensions(line.to_string());
    let values = line
        .split_whitespace()
        .map(|v| v.parse::<usize>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;
    // Board coordinates are `i32`.
    let limit = i32::MAX as usize;
    match values[..] {
        [rows, cols] if (1..=limit).contains(&rows) && (1..=limit).contains(&cols) => {
            Ok((rows, cols))
        }
        _ => Err(invalid()),
    }
}

/// Groups grid cells by identifier, in first-seen order.
fn collect_pieces(rows: &[Vec<char>]) -> Result<Vec<Piece>, ParseError> {
    let mut groups: Vec<(char, Vec<Position>)> = Vec::new();
    for (r, row) in rows.iter().enumerate() {
        for (c, &id) in row.iter().enumerate() {
            if id == EMPTY_CELL {
                continue;
            }
            let cell = Position::new(r as i32, c as i32);
            match groups.iter_mut().find(|(g, _)| *g == id) {
                Some((_, cells)) => cells.push(cell),
                None => groups.push((id, vec![cell])),
            }
        }
    }

    groups
        .into_iter()
        .map(|(id, cells)| {
            // Row-major scan order already puts the anchor first.
            let anchor = cells[0];
            let orientation = if cells.len() < 2 {
                return Err(ParseError::NonLinearPiece(id));
            } else if cells.iter().all(|c| c.row == anchor.row) {
                Orientation::Horizontal
            } else if cells.iter().all(|c| c.col == anchor.col) {
                Orientation::Vertical
            } else {
                return Err(ParseError::NonLinearPiece(id));
            };

            let piece = Piece::new(id, orientation, cells.len() as i32, anchor);
            if !piece.cells().eq(cells.iter().copied()) {
                return Err(ParseError::NonLinearPiece(id));
            }
            Ok(piece)
        })
        .collect()
}
