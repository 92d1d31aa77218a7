use serde::{Deserialize, Serialize};

use crate::{
    domain::{CellState, Dimensions, GameStatus, Player},
    error::ApiError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientRequest {
    MakeMove { row: usize, col: usize },
    Leave,
}

/// Full authoritative board pushed by the server after every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardUpdate {
    /// Row-major, `rows * cols` entries.
    pub cells: Vec<CellState>,
    pub local_turn: bool,
    pub status: GameStatus,
    pub moves_remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerEvent {
    Connected {
        rows: usize,
        cols: usize,
        local_player: Player,
        state: BoardUpdate,
    },
    BoardUpdated(BoardUpdate),
    Error(ApiError),
}

impl ServerEvent {
    pub fn connected(dimensions: Dimensions, local_player: Player, state: BoardUpdate) -> Self {
        ServerEvent::Connected {
            rows: dimensions.rows,
            cols: dimensions.cols,
            local_player,
            state,
        }
    }
}
