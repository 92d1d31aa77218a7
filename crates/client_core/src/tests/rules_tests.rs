use super::*;
use crate::test_support::{eight_by_eight, opening_update, opening_view};

use shared::domain::GameStatus;

fn legal_moves(board: &BoardView, player: Player) -> Vec<(usize, usize)> {
    let dims = board.dimensions();
    (0..dims.rows)
        .flat_map(|row| (0..dims.cols).map(move |col| (row, col)))
        .filter(|&(row, col)| StandardRules.is_legal_move(board, row, col, player))
        .collect()
}

#[test]
fn opening_moves_for_player_one() {
    let board = opening_view(true);
    assert_eq!(
        legal_moves(&board, Player::PlayerOne),
        vec![(2, 3), (3, 2), (4, 5), (5, 4)]
    );
}

#[test]
fn opening_moves_for_player_two() {
    let board = opening_view(true);
    assert_eq!(
        legal_moves(&board, Player::PlayerTwo),
        vec![(2, 4), (3, 5), (4, 2), (5, 3)]
    );
}

#[test]
fn occupied_and_out_of_range_cells_are_illegal() {
    let board = opening_view(true);
    assert!(!StandardRules.is_legal_move(&board, 3, 3, Player::PlayerOne));
    assert!(!StandardRules.is_legal_move(&board, 8, 3, Player::PlayerOne));
    assert!(!StandardRules.is_legal_move(&board, 0, 0, Player::PlayerOne));
}

#[test]
fn line_must_end_in_own_disc() {
    // Row 0: empty, two, two, empty. Nothing closes the line.
    let dims = eight_by_eight();
    let mut update = opening_update(true);
    update.cells = vec![CellState::Empty; dims.cell_count().expect("cell count")];
    update.cells[1] = CellState::PlayerTwo;
    update.cells[2] = CellState::PlayerTwo;
    update.status = GameStatus::InProgress;
    let board = BoardView::from_update(dims, Player::PlayerOne, update.clone(), 0).expect("view");
    assert!(!StandardRules.is_legal_move(&board, 0, 0, Player::PlayerOne));

    update.cells[3] = CellState::PlayerOne;
    let board = BoardView::from_update(dims, Player::PlayerOne, update, 1).expect("view");
    assert!(StandardRules.is_legal_move(&board, 0, 0, Player::PlayerOne));
}
