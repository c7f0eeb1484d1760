//! The shared tile surface.
//!
//! Each coordinate holds at most one [`Tile`]. All edits that belong in a
//! history go through [`Grid::commit_batch`], [`Grid::apply`] and
//! [`Grid::revert`]; `place`/`remove` exist for loaders and one-off edits.

use std::collections::{HashMap, HashSet};

use crate::{Batch, EngineError, Operation, Position, Result, Tile, TileId, TileKind};

/// Outcome of replaying a batch against the grid
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: usize,
    /// Operations skipped because the cell no longer held the expected tile
    pub conflicts: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Grid {
    tiles: HashMap<Position, Tile>,
    next_id: u64,
    dirty: HashSet<Position>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tile_at(&self, pos: Position) -> Option<Tile> {
        self.tiles.get(&pos).copied()
    }

    pub fn kind_at(&self, pos: Position) -> Option<TileKind> {
        self.tiles.get(&pos).map(|t| t.kind)
    }

    /// Mint a tile instance that is not on the grid yet.
    pub fn new_tile(&mut self, kind: TileKind) -> Tile {
        self.next_id += 1;
        Tile::new(TileId(self.next_id), kind)
    }

    /// Put a new tile at `pos`, replacing whatever was there.
    pub fn place(&mut self, pos: Position, kind: TileKind) -> Operation {
        let tile = self.new_tile(kind);
        let previous = self.write(pos, Some(tile));
        Operation::place(pos, previous, tile)
    }

    /// Like [`Grid::place`] but refuses to replace a tile of the same kind.
    pub fn try_place(&mut self, pos: Position, kind: TileKind) -> Result<Operation> {
        if self.kind_at(pos) == Some(kind) {
            return Err(EngineError::OccupiedSameType { pos });
        }
        Ok(self.place(pos, kind))
    }

    /// Clear `pos`. Removing from an empty cell changes nothing.
    pub fn remove(&mut self, pos: Position) -> Operation {
        let previous = self.write(pos, None);
        Operation::erase(pos, previous)
    }

    /// Every placed tile, sorted by position.
    pub fn all_tiles(&self) -> Vec<(Position, Tile)> {
        let mut tiles: Vec<_> = self.tiles.iter().map(|(pos, tile)| (*pos, *tile)).collect();
        tiles.sort_by_key(|(pos, _)| *pos);
        tiles
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.tiles.keys().copied()
    }

    /// First application of a freshly built batch.
    ///
    /// Each operation's `previous` is re-read from the grid right before it is
    /// written, so edits other actors made while the batch was being built are
    /// recorded correctly. Operations that would not change the cell are dropped.
    pub fn commit_batch(&mut self, batch: &mut Batch) -> ApplyReport {
        batch.operations_mut().retain_mut(|op| {
            op.previous = self.tile_at(op.pos);
            if op.is_noop() {
                return false;
            }
            self.write(op.pos, op.new);
            true
        });
        ApplyReport {
            applied: batch.len(),
            conflicts: 0,
        }
    }

    /// Perform every operation's `new` in batch order.
    pub fn apply(&mut self, batch: &Batch) -> ApplyReport {
        let mut report = ApplyReport::default();
        for op in batch.operations() {
            if self.tile_at(op.pos) == op.previous {
                self.write(op.pos, op.new);
                report.applied += 1;
            } else {
                report.conflicts += 1;
            }
        }
        if report.conflicts > 0 {
            log::debug!("apply '{}': skipped {} edited cells", batch.description(), report.conflicts);
        }
        report
    }

    /// Restore every operation's `previous` in reverse batch order.
    pub fn revert(&mut self, batch: &Batch) -> ApplyReport {
        let mut report = ApplyReport::default();
        for op in batch.operations().iter().rev() {
            if self.tile_at(op.pos) == op.new {
                self.write(op.pos, op.previous);
                report.applied += 1;
            } else {
                report.conflicts += 1;
            }
        }
        if report.conflicts > 0 {
            log::debug!("revert '{}': skipped {} edited cells", batch.description(), report.conflicts);
        }
        report
    }

    /// Coordinates changed since the last call, sorted.
    pub fn take_dirty(&mut self) -> Vec<Position> {
        let mut dirty: Vec<_> = self.dirty.drain().collect();
        dirty.sort();
        dirty
    }

    fn write(&mut self, pos: Position, tile: Option<Tile>) -> Option<Tile> {
        let previous = match tile {
            Some(tile) => self.tiles.insert(pos, tile),
            None => self.tiles.remove(&pos),
        };
        if previous != tile {
            self.dirty.insert(pos);
        }
        previous
    }
}
