use std::sync::{Arc, PoisonError, RwLock};

use shared::{
    domain::{CellState, Dimensions, GameStatus, Player},
    protocol::BoardUpdate,
};
use tracing::{debug, info};

use crate::error::MirrorError;

/// Immutable, versioned copy of the game state handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    dimensions: Dimensions,
    local_player: Player,
    cells: Vec<CellState>,
    local_turn: bool,
    status: GameStatus,
    moves_remaining: u32,
    version: u64,
    detail: Option<String>,
}

impl BoardView {
    pub fn from_update(
        dimensions: Dimensions,
        local_player: Player,
        update: BoardUpdate,
        version: u64,
    ) -> Result<Self, MirrorError> {
        let expected = dimensions
            .cell_count()
            .filter(|_| dimensions.is_playable())
            .ok_or(MirrorError::InvalidDimensions {
                rows: dimensions.rows,
                cols: dimensions.cols,
            })?;
        if update.cells.len() != expected {
            return Err(MirrorError::CellCountMismatch {
                expected,
                actual: update.cells.len(),
            });
        }

        Ok(Self {
            dimensions,
            local_player,
            cells: update.cells,
            local_turn: update.local_turn,
            status: update.status,
            moves_remaining: update.moves_remaining,
            version,
            detail: None,
        })
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn local_player(&self) -> Player {
        self.local_player
    }

    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    pub fn contents_at(&self, row: usize, col: usize) -> Result<CellState, MirrorError> {
        self.dimensions
            .index(row, col)
            .map(|idx| self.cells[idx])
            .ok_or(MirrorError::OutOfRange {
                row,
                col,
                rows: self.dimensions.rows,
                cols: self.dimensions.cols,
            })
    }

    /// The turn flag only counts while the game is running.
    pub fn is_local_turn(&self) -> bool {
        self.local_turn && !self.status.is_terminal()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn moves_remaining(&self) -> u32 {
        self.moves_remaining
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Reason attached to an `Error` status, if any.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn headline(&self) -> &'static str {
        if self.status.is_terminal() {
            self.status.display_text()
        } else if self.local_turn {
            "It's your turn"
        } else {
            "Wait your turn"
        }
    }

    pub fn moves_text(&self) -> String {
        format!("Moves left: {}", self.moves_remaining)
    }
}

pub struct BoardMirror {
    current: RwLock<Arc<BoardView>>,
}

impl BoardMirror {
    pub fn new(
        dimensions: Dimensions,
        local_player: Player,
        initial: BoardUpdate,
    ) -> Result<Self, MirrorError> {
        let view = BoardView::from_update(dimensions, local_player, initial, 0)?;
        info!(
            rows = dimensions.rows,
            cols = dimensions.cols,
            ?local_player,
            moves_remaining = view.moves_remaining,
            "board mirror initialized"
        );
        Ok(Self {
            current: RwLock::new(Arc::new(view)),
        })
    }

    pub fn dimensions(&self) -> Dimensions {
        self.snapshot().dimensions
    }

    pub fn contents_at(&self, row: usize, col: usize) -> Result<CellState, MirrorError> {
        self.snapshot().contents_at(row, col)
    }

    /// Consistent copy of the latest applied state. The read lock is held
    /// only while the `Arc` is cloned.
    pub fn snapshot(&self) -> Arc<BoardView> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replaces every field at once. Fails once the mirror holds a terminal status.
    pub fn apply_remote_update(&self, update: BoardUpdate) -> Result<Arc<BoardView>, MirrorError> {
        self.replace(|current| {
            BoardView::from_update(
                current.dimensions,
                current.local_player,
                update,
                current.version + 1,
            )
        })
    }

    /// Moves the mirror to `Error`, keeping the last known cells.
    pub fn fail(&self, detail: impl Into<String>) -> Result<Arc<BoardView>, MirrorError> {
        let detail = detail.into();
        self.replace(|current| {
            Ok(BoardView {
                cells: current.cells.clone(),
                local_turn: false,
                status: GameStatus::Error,
                version: current.version + 1,
                detail: Some(detail),
                ..*current
            })
        })
    }

    fn replace<F>(&self, build: F) -> Result<Arc<BoardView>, MirrorError>
    where
        F: FnOnce(&BoardView) -> Result<BoardView, MirrorError>,
    {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if guard.status.is_terminal() {
            return Err(MirrorError::Frozen(guard.status));
        }

        let next = Arc::new(build(&guard)?);
        debug!(
            version = next.version,
            status = ?next.status,
            local_turn = next.local_turn,
            moves_remaining = next.moves_remaining,
            "board mirror replaced"
        );
        *guard = Arc::clone(&next);
        Ok(next)
    }
}

#[cfg(test)]
#[path = "tests/board_mirror_tests.rs"]
mod tests;
