use std::fmt::Write as _;

use client_core::BoardView;
use shared::domain::CellState;

fn glyph(cell: CellState) -> char {
    match cell {
        CellState::Empty => '.',
        CellState::PlayerOne => 'X',
        CellState::PlayerTwo => 'O',
    }
}

/// Plain-text frame: column header, one line per row, then the status lines.
pub fn board_text(view: &BoardView) -> String {
    let dims = view.dimensions();
    let mut out = String::new();

    out.push_str("   ");
    for col in 0..dims.cols {
        let _ = write!(out, " {col}");
    }
    out.push('\n');

    for row in 0..dims.rows {
        let _ = write!(out, "{row:>2} ");
        for col in 0..dims.cols {
            let cell = view.contents_at(row, col).unwrap_or_default();
            let _ = write!(out, " {}", glyph(cell));
        }
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "You play {}. {}",
        glyph(view.local_player().disc()),
        view.headline()
    );
    let _ = write!(
        out,
        "{} | {}",
        view.moves_text(),
        view.status().run_state_text()
    );
    if let Some(detail) = view.detail() {
        let _ = write!(out, "\n{detail}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{
        domain::{Dimensions, GameStatus, Player},
        protocol::BoardUpdate,
    };

    fn view(status: GameStatus, local_turn: bool) -> BoardView {
        let mut cells = vec![CellState::Empty; 16];
        cells[5] = CellState::PlayerTwo;
        cells[6] = CellState::PlayerOne;
        BoardView::from_update(
            Dimensions::new(4, 4),
            Player::PlayerTwo,
            BoardUpdate {
                cells,
                local_turn,
                status,
                moves_remaining: 14,
            },
            1,
        )
        .expect("view")
    }

    #[test]
    fn prints_grid_and_status() {
        let text = board_text(&view(GameStatus::InProgress, true));
        let expected = [
            "    0 1 2 3",
            " 0  . . . .",
            " 1  . O X .",
            " 2  . . . .",
            " 3  . . . .",
            "You play O. It's your turn",
            "Moves left: 14 | Running",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn game_over_frame_reports_result() {
        let text = board_text(&view(GameStatus::LocalLost, false));
        assert!(text.contains("You play O. Game over. You lost!"));
        assert!(text.ends_with("Moves left: 14 | Stopped"));
    }
}
