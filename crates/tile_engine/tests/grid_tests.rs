//! Tests for grid edits and batch replay

use tile_engine::{Batch, EngineError, Grid, Operation, Position, TileKind};

const STONE: TileKind = TileKind(0);
const GRASS: TileKind = TileKind(1);

fn snapshot(grid: &Grid) -> Vec<(Position, tile_engine::Tile)> {
    grid.all_tiles()
}

// ============================================================================
// Place / Remove
// ============================================================================

#[test]
fn test_place_on_empty_records_no_previous() {
    let mut grid = Grid::new();
    let op = grid.place(Position::new(1, 2), STONE);

    assert_eq!(op.previous, None);
    assert_eq!(grid.kind_at(Position::new(1, 2)), Some(STONE));
    assert_eq!(grid.len(), 1);
}

#[test]
fn test_place_overwrites_and_revert_restores_occupant() {
    let mut grid = Grid::new();
    let pos = Position::new(0, 0);
    grid.place(pos, STONE);
    let original = grid.tile_at(pos);

    let op = grid.place(pos, GRASS);
    assert_eq!(op.previous, original);
    assert_eq!(grid.len(), 1);

    grid.revert(&Batch::with_operations("overwrite", vec![op]));
    assert_eq!(grid.tile_at(pos), original);
}

#[test]
fn test_try_place_same_kind_is_rejected() {
    let mut grid = Grid::new();
    let pos = Position::new(3, 3);
    grid.place(pos, STONE);

    assert_eq!(grid.try_place(pos, STONE), Err(EngineError::OccupiedSameType { pos }));
    assert!(grid.try_place(pos, GRASS).is_ok());
}

#[test]
fn test_remove_empty_is_noop() {
    let mut grid = Grid::new();
    let op = grid.remove(Position::new(9, 9));

    assert_eq!(op.previous, None);
    assert!(op.is_noop());
    assert!(grid.take_dirty().is_empty());
}

// ============================================================================
// Apply / Revert
// ============================================================================

#[test]
fn test_apply_then_revert_round_trip() {
    let mut grid = Grid::new();
    grid.place(Position::new(0, 0), STONE);
    grid.place(Position::new(1, 0), GRASS);
    let before = snapshot(&grid);

    let mut batch = Batch::new("mixed");
    let fresh = grid.new_tile(GRASS);
    batch.push(Operation::place(Position::new(0, 0), grid.tile_at(Position::new(0, 0)), fresh));
    batch.push(Operation::erase(Position::new(1, 0), grid.tile_at(Position::new(1, 0))));
    let other = grid.new_tile(STONE);
    batch.push(Operation::place(Position::new(5, 5), None, other));

    let report = grid.apply(&batch);
    assert_eq!(report.applied, 3);
    assert_ne!(snapshot(&grid), before);

    grid.revert(&batch);
    assert_eq!(snapshot(&grid), before);
}

#[test]
fn test_revert_handles_repeated_coordinate() {
    let mut grid = Grid::new();
    let pos = Position::new(2, 2);
    let before = snapshot(&grid);

    let first = grid.new_tile(STONE);
    let second = grid.new_tile(GRASS);
    let mut batch = Batch::new("twice");
    batch.push(Operation::place(pos, None, first));
    batch.push(Operation::place(pos, None, second));

    grid.commit_batch(&mut batch);
    assert_eq!(grid.tile_at(pos), Some(second));
    assert_eq!(batch.operations()[1].previous, Some(first));

    grid.revert(&batch);
    assert_eq!(snapshot(&grid), before);
}

#[test]
fn test_commit_batch_drops_noops_and_refreshes_previous() {
    let mut grid = Grid::new();
    grid.place(Position::new(0, 0), STONE);

    let mut batch = Batch::new("stale");
    let same = grid.new_tile(STONE);
    let fresh = grid.new_tile(GRASS);
    batch.push(Operation::place(Position::new(0, 0), None, same));
    batch.push(Operation::place(Position::new(1, 0), None, fresh));
    batch.push(Operation::erase(Position::new(2, 0), None));

    let report = grid.commit_batch(&mut batch);
    assert_eq!(report.applied, 1);
    assert_eq!(batch.len(), 1);
    assert_eq!(batch.operations()[0].pos, Position::new(1, 0));
}

#[test]
fn test_revert_skips_cells_edited_since() {
    let mut grid = Grid::new();
    let pos = Position::new(4, 4);

    let mut batch = Batch::new("mine");
    let mine = grid.new_tile(STONE);
    batch.push(Operation::place(pos, None, mine));
    grid.commit_batch(&mut batch);

    // someone else paints over it
    grid.place(pos, GRASS);
    let theirs = grid.tile_at(pos);

    let report = grid.revert(&batch);
    assert_eq!(report.conflicts, 1);
    assert_eq!(grid.tile_at(pos), theirs);
}

#[test]
fn test_all_tiles_sorted_and_dirty_tracking() {
    let mut grid = Grid::new();
    grid.place(Position::new(5, 1), STONE);
    grid.place(Position::new(0, 1), STONE);
    grid.place(Position::new(9, 0), GRASS);

    let positions: Vec<_> = grid.all_tiles().into_iter().map(|(p, _)| p).collect();
    assert_eq!(positions, vec![Position::new(9, 0), Position::new(0, 1), Position::new(5, 1)]);

    assert_eq!(grid.take_dirty().len(), 3);
    assert!(grid.take_dirty().is_empty());
}
