//! Reversible grid edits.

use serde::{Deserialize, Serialize};

use crate::{Position, Tile, TileKind};

/// One reversible edit at a single coordinate.
///
/// `previous == None` means the cell was empty, `new == None` means erase.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub pos: Position,
    pub previous: Option<Tile>,
    pub new: Option<Tile>,
}

impl Operation {
    pub fn new(pos: Position, previous: Option<Tile>, new: Option<Tile>) -> Self {
        Self { pos, previous, new }
    }

    pub fn place(pos: Position, previous: Option<Tile>, tile: Tile) -> Self {
        Self::new(pos, previous, Some(tile))
    }

    pub fn erase(pos: Position, previous: Option<Tile>) -> Self {
        Self::new(pos, previous, None)
    }

    /// True when applying would leave the cell looking the same.
    pub fn is_noop(&self) -> bool {
        kind_of(self.previous) == kind_of(self.new)
    }
}

fn kind_of(tile: Option<Tile>) -> Option<TileKind> {
    tile.map(|t| t.kind)
}

/// All operations produced by one gesture; the unit of undo and redo
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    description: String,
    operations: Vec<Operation>,
}

impl Batch {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            operations: Vec::new(),
        }
    }

    pub fn with_operations(description: impl Into<String>, operations: Vec<Operation>) -> Self {
        Self {
            description: description.into(),
            operations,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn push(&mut self, op: Operation) {
        self.operations.push(op);
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub(crate) fn operations_mut(&mut self) -> &mut Vec<Operation> {
        &mut self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.operations.iter().map(|op| op.pos)
    }
}
