use super::*;
use crate::test_support::{eight_by_eight, opening_update};

use std::thread;

fn mirror() -> BoardMirror {
    BoardMirror::new(eight_by_eight(), Player::PlayerOne, opening_update(true)).expect("mirror")
}

#[test]
fn contents_at_reads_row_major_cells() {
    let mirror = mirror();
    assert_eq!(mirror.contents_at(3, 3), Ok(CellState::PlayerTwo));
    assert_eq!(mirror.contents_at(3, 4), Ok(CellState::PlayerOne));
    assert_eq!(mirror.contents_at(0, 0), Ok(CellState::Empty));
}

#[test]
fn contents_at_rejects_coordinates_outside_the_board() {
    let mirror = mirror();
    assert_eq!(
        mirror.contents_at(8, 0),
        Err(MirrorError::OutOfRange {
            row: 8,
            col: 0,
            rows: 8,
            cols: 8
        })
    );
    assert!(mirror.contents_at(0, 42).is_err());
}

#[test]
fn initial_state_must_match_dimensions() {
    let mut update = opening_update(true);
    update.cells.pop();
    let err = BoardMirror::new(eight_by_eight(), Player::PlayerOne, update)
        .err()
        .expect("short board must be rejected");
    assert_eq!(
        err,
        MirrorError::CellCountMismatch {
            expected: 64,
            actual: 63
        }
    );
}

#[test]
fn apply_remote_update_replaces_every_field_and_bumps_version() {
    let mirror = mirror();
    let before = mirror.snapshot();

    let mut update = opening_update(false);
    update.cells[2 * 8 + 3] = CellState::PlayerOne;
    update.cells[3 * 8 + 3] = CellState::PlayerOne;
    update.moves_remaining = 59;
    let after = mirror.apply_remote_update(update).expect("apply");

    assert_eq!(after.version(), before.version() + 1);
    assert!(!after.is_local_turn());
    assert_eq!(after.moves_remaining(), 59);
    assert_eq!(after.contents_at(2, 3), Ok(CellState::PlayerOne));
    assert_eq!(mirror.snapshot(), after);

    // Earlier snapshots are unaffected by later writes.
    assert_eq!(before.moves_remaining(), 60);
    assert_eq!(before.contents_at(2, 3), Ok(CellState::Empty));
}

#[test]
fn malformed_update_leaves_mirror_untouched() {
    let mirror = mirror();
    let mut update = opening_update(false);
    update.cells.push(CellState::Empty);

    assert!(matches!(
        mirror.apply_remote_update(update),
        Err(MirrorError::CellCountMismatch { .. })
    ));
    assert_eq!(mirror.snapshot().version(), 0);
    assert!(mirror.snapshot().is_local_turn());
}

#[test]
fn terminal_status_freezes_the_mirror() {
    let mirror = mirror();
    let mut won = opening_update(false);
    won.status = GameStatus::LocalWon;
    won.moves_remaining = 0;
    mirror.apply_remote_update(won).expect("apply terminal");

    let err = mirror
        .apply_remote_update(opening_update(true))
        .expect_err("frozen");
    assert_eq!(err, MirrorError::Frozen(GameStatus::LocalWon));
    assert!(mirror.fail("late failure").is_err());

    let view = mirror.snapshot();
    assert_eq!(view.status(), GameStatus::LocalWon);
    assert_eq!(view.moves_remaining(), 0);
    assert_eq!(view.version(), 1);
}

#[test]
fn fail_keeps_cells_and_records_detail() {
    let mirror = mirror();
    let view = mirror.fail("connection closed by server").expect("fail");

    assert_eq!(view.status(), GameStatus::Error);
    assert_eq!(view.detail(), Some("connection closed by server"));
    assert_eq!(view.contents_at(4, 4), Ok(CellState::PlayerTwo));
    assert!(!view.is_local_turn());
    assert_eq!(view.headline(), "ERROR!");
}

#[test]
fn headline_follows_turn_and_status() {
    let mirror = mirror();
    assert_eq!(mirror.snapshot().headline(), "It's your turn");
    assert_eq!(mirror.snapshot().moves_text(), "Moves left: 60");

    mirror
        .apply_remote_update(opening_update(false))
        .expect("apply");
    assert_eq!(mirror.snapshot().headline(), "Wait your turn");

    let mut tied = opening_update(true);
    tied.status = GameStatus::Tied;
    mirror.apply_remote_update(tied).expect("apply");
    let view = mirror.snapshot();
    assert_eq!(view.headline(), "Game over. You tied!");
    assert!(!view.is_local_turn(), "turn flag is meaningless once terminal");
}

/// Every update written here keeps `moves_remaining`, the turn flag and the
/// number of occupied cells in lockstep, so a torn read would break the relation.
fn correlated_update(step: u32) -> BoardUpdate {
    let dims = eight_by_eight();
    let mut cells = vec![CellState::Empty; dims.cell_count().expect("cell count")];
    for cell in cells.iter_mut().take(step as usize) {
        *cell = CellState::PlayerOne;
    }
    BoardUpdate {
        cells,
        local_turn: step % 2 == 0,
        status: GameStatus::InProgress,
        moves_remaining: 60 - step,
    }
}

#[test]
fn concurrent_snapshots_never_observe_partial_updates() {
    let mirror = Arc::new(
        BoardMirror::new(eight_by_eight(), Player::PlayerOne, correlated_update(0))
            .expect("mirror"),
    );

    let writer = {
        let mirror = Arc::clone(&mirror);
        thread::spawn(move || {
            for step in 1..=60 {
                mirror
                    .apply_remote_update(correlated_update(step))
                    .expect("apply");
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let mirror = Arc::clone(&mirror);
            thread::spawn(move || {
                let mut last_version = 0;
                for _ in 0..2_000 {
                    let view = mirror.snapshot();
                    let step = view.version() as u32;
                    let occupied = view.cells().iter().filter(|c| !c.is_empty()).count();

                    assert!(view.version() >= last_version, "versions never go backwards");
                    assert_eq!(view.moves_remaining(), 60 - step);
                    assert_eq!(occupied as u32, step);
                    assert_eq!(view.is_local_turn(), step % 2 == 0);
                    last_version = view.version();
                }
            })
        })
        .collect();

    writer.join().expect("writer");
    for reader in readers {
        reader.join().expect("reader");
    }
    assert_eq!(mirror.snapshot().version(), 60);
}

#[test]
fn concurrent_writers_are_serialized() {
    const WRITERS: u32 = 4;
    const UPDATES_PER_WRITER: u32 = 50;

    let mirror = Arc::new(
        BoardMirror::new(eight_by_eight(), Player::PlayerOne, correlated_update(0))
            .expect("mirror"),
    );

    let writers: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let mirror = Arc::clone(&mirror);
            thread::spawn(move || {
                (0..UPDATES_PER_WRITER)
                    .map(|i| {
                        let step = (writer * 13 + i) % 61;
                        mirror
                            .apply_remote_update(correlated_update(step))
                            .expect("apply")
                            .version()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let mirror = Arc::clone(&mirror);
            thread::spawn(move || {
                for _ in 0..2_000 {
                    let view = mirror.snapshot();
                    let occupied = view.cells().iter().filter(|c| !c.is_empty()).count() as u32;

                    assert_eq!(view.moves_remaining() + occupied, 60);
                    assert_eq!(view.is_local_turn(), occupied % 2 == 0);
                }
            })
        })
        .collect();

    let mut versions: Vec<u64> = writers
        .into_iter()
        .flat_map(|writer| writer.join().expect("writer"))
        .collect();
    for reader in readers {
        reader.join().expect("reader");
    }

    let total = u64::from(WRITERS * UPDATES_PER_WRITER);
    versions.sort_unstable();
    assert_eq!(versions, (1..=total).collect::<Vec<_>>());
    assert_eq!(mirror.snapshot().version(), total);
}

#[test]
fn oversized_dimensions_are_rejected_without_allocating() {
    let update = BoardUpdate {
        cells: Vec::new(),
        ..opening_update(true)
    };

    for dims in [
        Dimensions::new(1 << 32, 1 << 32),
        Dimensions::new(0, 0),
        Dimensions::new(65, 8),
    ] {
        let err = BoardMirror::new(dims, Player::PlayerOne, update.clone())
            .err()
            .expect("unplayable board must be rejected");
        assert_eq!(
            err,
            MirrorError::InvalidDimensions {
                rows: dims.rows,
                cols: dims.cols
            }
        );
    }
}
