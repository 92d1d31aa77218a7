//! Fixtures shared by the unit test modules.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use shared::{
    domain::{CellState, Dimensions, GameStatus, Player},
    protocol::BoardUpdate,
};

use crate::{
    board_mirror::BoardView,
    rules::RulesEngine,
    transport::{GameTransport, Handshake, RemoteUpdate, RemoteUpdateSink},
};

pub fn eight_by_eight() -> Dimensions {
    Dimensions::new(8, 8)
}

/// Standard opening: white on the main diagonal, black on the other.
pub fn opening_update(local_turn: bool) -> BoardUpdate {
    let dims = eight_by_eight();
    let mut cells = vec![CellState::Empty; dims.cell_count().expect("cell count")];
    cells[3 * 8 + 3] = CellState::PlayerTwo;
    cells[4 * 8 + 4] = CellState::PlayerTwo;
    cells[3 * 8 + 4] = CellState::PlayerOne;
    cells[4 * 8 + 3] = CellState::PlayerOne;
    BoardUpdate {
        cells,
        local_turn,
        status: GameStatus::InProgress,
        moves_remaining: 60,
    }
}

pub fn opening_view(local_turn: bool) -> BoardView {
    BoardView::from_update(eight_by_eight(), Player::PlayerOne, opening_update(local_turn), 0)
        .expect("opening view")
}

pub fn opening_handshake(local_turn: bool) -> Handshake {
    Handshake {
        dimensions: eight_by_eight(),
        local_player: Player::PlayerOne,
        initial: opening_update(local_turn),
    }
}

pub struct FixedRules(pub bool);

impl RulesEngine for FixedRules {
    fn is_legal_move(&self, _board: &BoardView, _row: usize, _col: usize, _player: Player) -> bool {
        self.0
    }
}

#[derive(Default)]
pub struct RecordingTransport {
    pub moves: Mutex<Vec<(usize, usize)>>,
    pub closes: AtomicUsize,
    pub sink: Mutex<Option<Arc<dyn RemoteUpdateSink>>>,
}

impl RecordingTransport {
    pub fn sent_moves(&self) -> Vec<(usize, usize)> {
        self.moves.lock().expect("moves").clone()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn push(&self, update: RemoteUpdate) {
        let sink = self.sink.lock().expect("sink").clone().expect("subscribed");
        sink.deliver(update);
    }
}

impl GameTransport for RecordingTransport {
    fn subscribe(&self, sink: Arc<dyn RemoteUpdateSink>) {
        *self.sink.lock().expect("sink") = Some(sink);
    }

    fn send_move(&self, row: usize, col: usize) {
        self.moves.lock().expect("moves").push((row, col));
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}
