//! Draw detection logic for tic-tac-toe.

use super::super::{Board, Square};
use tracing::instrument;

/// Checks if the board is full (all squares occupied).
///
/// A full board with no winner is a draw.
#[instrument(level = "trace")]
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}

#[cfg(test)]
mod tests {
    use super::super::super::{GameStatus, Player};
    use super::super::status;
    use super::*;

    fn parse(cells: &str) -> Board {
        let mut marks = [None; 9];
        for (pos, c) in cells.chars().enumerate() {
            marks[pos] = match c {
                'X' => Some(Player::X),
                'O' => Some(Player::O),
                _ => None,
            };
        }
        Board::from_marks(marks)
    }

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(&Board::new()));
    }

    #[test]
    fn test_partial_board_not_full() {
        assert!(!is_full(&parse("....X....")));
    }

    #[test]
    fn test_draw_detection() {
        let board = parse("XOXXOOOXX");
        assert!(is_full(&board));
        assert_eq!(status(&board), GameStatus::Draw);
    }

    #[test]
    fn test_full_board_with_line_is_a_win() {
        let board = parse("XXXOOXOXO");
        assert!(is_full(&board));
        assert_eq!(
            status(&board),
            GameStatus::Won {
                winner: Player::X,
                line: [0, 1, 2]
            }
        );
    }
}
