use crate::{board_mirror::BoardView, rules::RulesEngine};

/// Whether the local player may place a disc at `(row, col)` on `view`.
///
/// Callers pass the same snapshot they read the turn flag from, so the
/// decision never mixes two different states.
pub fn is_legal(rules: &dyn RulesEngine, view: &BoardView, row: usize, col: usize) -> bool {
    view.dimensions().contains(row, col)
        && rules.is_legal_move(view, row, col, view.local_player())
}
