use crossterm::style::{style, Stylize};

use crate::board::{Board, ExitSide, EMPTY_CELL, EXIT_CELL};
use crate::piece::Position;
use crate::search::SearchResult;

/// Draws `board` with the exit outside the grid.
///
/// With `colored`, the primary piece is bold yellow, the exit cyan and the
/// `highlight` piece (usually the one that just moved) bold green.
pub fn board_to_string(board: &Board, highlight: Option<char>, colored: bool) -> String {
    let primary = board.primary().id();
    let first_col = if board.exit_side() == ExitSide::Left { -1 } else { 0 };

    let mut out = String::new();
    for row in -1..=board.height() {
        let cells: Vec<char> = (first_col..=board.width())
            .map(|col| {
                let position = Position::new(row, col);
                if board.in_bounds(position) || position == board.exit() {
                    board.cell_at(position)
                } else {
                    ' '
                }
            })
            .collect();
        let Some(last) = cells.iter().rposition(|&c| c != ' ') else {
            continue;
        };

        for &cell in &cells[..=last] {
            let styled = match cell {
                _ if !colored || cell == ' ' || cell == EMPTY_CELL => None,
                _ if Some(cell) == highlight => Some(style(cell).green().bold()),
                _ if cell == primary => Some(style(cell).yellow().bold()),
                EXIT_CELL => Some(style(cell).cyan()),
                _ => None,
            };
            match styled {
                Some(styled) => out.push_str(&styled.to_string()),
                None => out.push(cell),
            }
        }
        out.push('\n');
    }
    out
}

/// The initial board followed by every move and the board it produces.
pub fn solution_to_string(result: &SearchResult, colored: bool) -> String {
    let Some(path) = result.path() else {
        return format!(
            "No solution found ({} nodes expanded)\n",
            result.nodes_expanded()
        );
    };

    let mut out = String::from("Initial board:\n");
    for (step, node) in path.iter().enumerate() {
        let highlight = match node.last_move() {
            Some(movement) => {
                out.push_str(&format!("\nMove {step}: {movement}\n"));
                Some(movement.piece)
            }
            None => None,
        };
        out.push_str(&board_to_string(node.board(), highlight, colored));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_puzzle;
    use crate::search::uniform_cost;

    fn one_blocker() -> Board {
        parse_puzzle("4 4\n1\n....\nPPA.K\n..A.\n....\n").unwrap()
    }

    #[test]
    fn test_plain_board() {
        let text = board_to_string(&one_blocker(), None, false);
        assert_eq!(text, "....\nPPA.K\n..A.\n....\n");
    }

    #[test]
    fn test_plain_matches_display() {
        let board = parse_puzzle("3 4\n0\n....\nKPP..\n....\n").unwrap();
        assert_eq!(board_to_string(&board, None, false), board.to_string());
        assert_eq!(board_to_string(&board, None, false), " ....\nKPP..\n ....\n");
    }

    #[test]
    fn test_top_exit_line() {
        let board = parse_puzzle("3 3\n0\n.K\n.P.\n.P.\n...\n").unwrap();
        assert_eq!(board_to_string(&board, None, false), " K\n.P.\n.P.\n...\n");
    }

    #[test]
    fn test_colored_board_styles_pieces() {
        let plain = board_to_string(&one_blocker(), Some('A'), false);
        let colored = board_to_string(&one_blocker(), Some('A'), true);
        assert_ne!(plain, colored);
        assert!(colored.contains('\u{1b}'));
        assert!(!plain.contains('\u{1b}'));
    }

    #[test]
    fn test_solution_text() {
        let result = uniform_cost(&one_blocker());
        let text = solution_to_string(&result, false);
        assert!(text.starts_with("Initial board:\n....\nPPA.K\n"));
        assert!(text.contains("Move 1: A-"));
        assert!(text.contains("Move 2: P-right-"));
        assert!(!text.contains("Move 3"));
    }

    #[test]
    fn test_unsolved_text() {
        let board = parse_puzzle("1 5\n1\nPP.AAK\n").unwrap();
        let result = uniform_cost(&board);
        assert!(solution_to_string(&result, false).starts_with("No solution found"));
    }
}
