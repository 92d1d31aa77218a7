use shared::domain::{CellState, Player};

use crate::board_mirror::BoardView;

/// Move legality as decided by the game rules.
pub trait RulesEngine: Send + Sync {
    fn is_legal_move(&self, board: &BoardView, row: usize, col: usize, player: Player) -> bool;
}

const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Standard Reversi legality: an empty cell from which at least one line of
/// opponent discs is closed off by one of the player's own discs. Flips are
/// left to the server.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRules;

impl RulesEngine for StandardRules {
    fn is_legal_move(&self, board: &BoardView, row: usize, col: usize, player: Player) -> bool {
        if board.contents_at(row, col) != Ok(CellState::Empty) {
            return false;
        }

        DIRECTIONS
            .iter()
            .any(|&step| brackets_opponent(board, row, col, step, player))
    }
}

fn brackets_opponent(
    board: &BoardView,
    row: usize,
    col: usize,
    (d_row, d_col): (isize, isize),
    player: Player,
) -> bool {
    let own = player.disc();
    let opponent = player.opponent().disc();
    let mut seen_opponent = false;
    let mut cursor = (row, col);

    loop {
        let Some(next_row) = cursor.0.checked_add_signed(d_row) else {
            return false;
        };
        let Some(next_col) = cursor.1.checked_add_signed(d_col) else {
            return false;
        };
        let Ok(cell) = board.contents_at(next_row, next_col) else {
            return false;
        };

        if cell == opponent {
            seen_opponent = true;
        } else if cell == own {
            return seen_opponent;
        } else {
            return false;
        }
        cursor = (next_row, next_col);
    }
}

#[cfg(test)]
#[path = "tests/rules_tests.rs"]
mod tests;
