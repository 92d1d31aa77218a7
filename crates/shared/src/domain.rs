use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    #[default]
    Empty,
    PlayerOne,
    PlayerTwo,
}

impl CellState {
    pub fn is_empty(self) -> bool {
        self == CellState::Empty
    }
}

/// Seat a client plays from. Player one moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    PlayerOne,
    PlayerTwo,
}

impl Player {
    pub fn disc(self) -> CellState {
        match self {
            Player::PlayerOne => CellState::PlayerOne,
            Player::PlayerTwo => CellState::PlayerTwo,
        }
    }

    pub fn opponent(self) -> Player {
        match self {
            Player::PlayerOne => Player::PlayerTwo,
            Player::PlayerTwo => Player::PlayerOne,
        }
    }
}

/// Game outcome as seen from the local seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    InProgress,
    LocalWon,
    LocalLost,
    Tied,
    Error,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }

    /// Headline shown once the game has ended.
    pub fn display_text(self) -> &'static str {
        match self {
            GameStatus::InProgress => "Running",
            GameStatus::LocalWon => "Game over. You won!",
            GameStatus::LocalLost => "Game over. You lost!",
            GameStatus::Tied => "Game over. You tied!",
            GameStatus::Error => "ERROR!",
        }
    }

    /// Short run-state label for status bars.
    pub fn run_state_text(self) -> &'static str {
        if self.is_terminal() {
            "Stopped"
        } else {
            "Running"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub rows: usize,
    pub cols: usize,
}

impl Dimensions {
    /// Largest side length a client will lay out.
    pub const MAX_SIDE: usize = 64;

    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// `None` when the product does not fit in `usize`.
    pub fn cell_count(self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }

    /// Both sides non-zero and at most [`Self::MAX_SIDE`].
    pub fn is_playable(self) -> bool {
        (1..=Self::MAX_SIDE).contains(&self.rows) && (1..=Self::MAX_SIDE).contains(&self.cols)
    }

    pub fn contains(self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Row-major index, `None` when outside the board.
    pub fn index(self, row: usize, col: usize) -> Option<usize> {
        self.contains(row, col).then(|| row * self.cols + col)
    }
}
