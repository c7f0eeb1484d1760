//! Per-actor tool state and drawing sessions.
//!
//! An actor is `Idle` until a pencil, eraser or rectangle session starts. While
//! `Drawing`, every [`Actor::sample`] looks at the cursor's grid cell. Pencil and
//! eraser edits land on the grid right away and are collected into one batch
//! that goes into the actor's own history when the session ends. Rectangles are
//! only written at the end. Fill and clear-all commit straight away.

use std::collections::HashSet;

use tile_engine::{Batch, Grid, Operation, Position, Result, TileCatalog, TileKind, shapes};

use crate::{ActorUndoStack, EditConfig, Tool};

/// Cursors stay within this many world units of the origin on each axis
pub const CURSOR_EXTENT: f32 = 1_000_000.0;

/// Identity of an editing actor. 0 is the local editor, 1..=4 are remote.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u8);

impl ActorId {
    pub const LOCAL: ActorId = ActorId(0);
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What an edit request did
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// A drawing session is now running
    Started(Tool),
    /// A batch went into the history
    Committed { operations: usize },
    /// The gesture changed nothing and was not recorded
    Discarded,
    /// The tool cannot be used with the active tile
    Refused(Tool),
    /// Nothing to act on (no session, or a session for another tool)
    Ignored,
}

/// Result of an undo or redo request
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HistoryOutcome {
    Applied { operations: usize, conflicts: usize },
    NothingToUndo,
    NothingToRedo,
}

#[derive(Debug)]
struct Session {
    tool: Tool,
    origin: Position,
    rect_limit: usize,
    visited: HashSet<Position>,
    /// Pencil and eraser edits already on the grid
    applied: Batch,
}

#[derive(Debug, Default)]
enum ActorState {
    #[default]
    Idle,
    Drawing(Session),
}

#[derive(Debug)]
pub struct Actor {
    id: ActorId,
    tool: Tool,
    tile: TileKind,
    area_tools: bool,
    cursor: (f32, f32),
    state: ActorState,
    history: ActorUndoStack,
}

impl Actor {
    pub fn new(id: ActorId, tile: TileKind, catalog: &TileCatalog) -> Self {
        Self {
            id,
            tool: Tool::default(),
            tile,
            area_tools: catalog.can_use_area_tools(tile),
            cursor: (0.0, 0.0),
            state: ActorState::Idle,
            history: ActorUndoStack::new(),
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn tile(&self) -> TileKind {
        self.tile
    }

    pub fn cursor(&self) -> (f32, f32) {
        self.cursor
    }

    /// Grid cell under the cursor
    pub fn target(&self) -> Position {
        Position::from_world(self.cursor.0, self.cursor.1)
    }

    /// Move the cursor to `(x, y)`, clamped to [`CURSOR_EXTENT`]. A NaN
    /// coordinate leaves that axis where it was.
    pub fn set_cursor(&mut self, x: f32, y: f32) {
        self.cursor = (clamp_cursor(x, self.cursor.0), clamp_cursor(y, self.cursor.1));
    }

    pub fn move_cursor(&mut self, dx: f32, dy: f32) {
        self.set_cursor(self.cursor.0 + dx, self.cursor.1 + dy);
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, ActorState::Drawing(_))
    }

    pub fn session_tool(&self) -> Option<Tool> {
        match &self.state {
            ActorState::Drawing(session) => Some(session.tool),
            ActorState::Idle => None,
        }
    }

    pub fn history(&self) -> &ActorUndoStack {
        &self.history
    }

    pub fn set_active_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Switch tiles and report whether fill and rectangles are still usable.
    pub fn set_active_tile(&mut self, tile: TileKind, catalog: &TileCatalog) -> Result<bool> {
        catalog.get(tile)?;
        self.tile = tile;
        self.area_tools = catalog.can_use_area_tools(tile);
        Ok(self.area_tools)
    }

    pub fn can_use_area_tools(&self) -> bool {
        self.area_tools
    }

    /// Start a gesture with `tool`. A running session is committed first.
    pub fn begin_session(&mut self, tool: Tool, grid: &mut Grid, config: &EditConfig) -> Result<ActionOutcome> {
        if tool.is_area_tool() && !self.area_tools {
            log::debug!("actor {}: {tool} refused for tile {}", self.id, self.tile);
            return Ok(ActionOutcome::Refused(tool));
        }
        self.tool = tool;

        if self.is_drawing() {
            match self.end_session(grid) {
                Ok(outcome) => log::debug!("actor {}: previous session closed by new start: {outcome:?}", self.id),
                Err(err) => log::warn!("actor {}: previous session dropped: {err}", self.id),
            }
        }

        if tool == Tool::Fill {
            return self.flood_fill(grid, config.fill_limit);
        }

        let origin = self.target();
        self.state = ActorState::Drawing(Session {
            tool,
            origin,
            rect_limit: config.rect_limit,
            visited: HashSet::new(),
            applied: Batch::new(tool.name()),
        });
        self.sample(grid);
        Ok(ActionOutcome::Started(tool))
    }

    /// Draw or erase the cursor's cell for a running pencil or eraser session.
    ///
    /// Each cell is considered once per session.
    pub fn sample(&mut self, grid: &mut Grid) {
        let target = self.target();
        let tile = self.tile;
        let ActorState::Drawing(session) = &mut self.state else {
            return;
        };
        if session.tool.is_rectangle() || !session.visited.insert(target) {
            return;
        }

        let current = grid.kind_at(target);
        match session.tool {
            Tool::Pencil if current != Some(tile) => session.applied.push(grid.place(target, tile)),
            Tool::Eraser if current.is_some() => session.applied.push(grid.remove(target)),
            _ => {}
        }
    }

    /// Cells the running session has changed, or for rectangles would change
    /// if it ended now. A rectangle over its limit previews as nothing.
    pub fn preview(&self) -> Vec<Position> {
        match &self.state {
            ActorState::Idle => Vec::new(),
            ActorState::Drawing(session) if session.tool.is_rectangle() => {
                let filled = session.tool == Tool::RectangleFilled;
                shapes::bounded_rectangle_points(session.origin, self.target(), filled, session.rect_limit).unwrap_or_default()
            }
            ActorState::Drawing(session) => session.applied.positions().collect(),
        }
    }

    /// Finish the running session and record what it did.
    ///
    /// A rectangle larger than the limit ends the session with
    /// `RectangleLimitExceeded` and leaves the grid alone.
    pub fn end_session(&mut self, grid: &mut Grid) -> Result<ActionOutcome> {
        self.sample(grid);
        let target = self.target();
        let session = match std::mem::take(&mut self.state) {
            ActorState::Drawing(session) => session,
            ActorState::Idle => return Ok(ActionOutcome::Ignored),
        };

        if !session.tool.is_rectangle() {
            return Ok(self.record(session.applied));
        }

        let filled = session.tool == Tool::RectangleFilled;
        let mut batch = Batch::new(session.tool.name());
        for pos in shapes::bounded_rectangle_points(session.origin, target, filled, session.rect_limit)? {
            if grid.kind_at(pos) != Some(self.tile) {
                let tile = grid.new_tile(self.tile);
                batch.push(Operation::place(pos, grid.tile_at(pos), tile));
            }
        }
        Ok(self.commit(grid, batch))
    }

    /// Fill the region under the cursor with the active tile.
    ///
    /// The region is every cell 4-connected to the target that holds the same
    /// kind of tile (or is equally empty). Regions larger than `limit` abort
    /// with `FillLimitExceeded` and leave the grid alone.
    pub fn flood_fill(&mut self, grid: &mut Grid, limit: usize) -> Result<ActionOutcome> {
        if !self.area_tools {
            return Ok(ActionOutcome::Refused(Tool::Fill));
        }
        self.tool = Tool::Fill;

        let start = self.target();
        let region_kind = grid.kind_at(start);
        if region_kind == Some(self.tile) {
            return Ok(ActionOutcome::Discarded);
        }

        let region = shapes::flood_fill_points(start, limit, |pos| grid.kind_at(pos) == region_kind)?;
        let mut batch = Batch::new(Tool::Fill.name());
        for pos in region {
            let previous = grid.tile_at(pos);
            let tile = grid.new_tile(self.tile);
            batch.push(Operation::place(pos, previous, tile));
        }
        Ok(self.commit(grid, batch))
    }

    /// Remove every tile on the grid, whoever placed it, as one batch.
    pub fn clear_all(&mut self, grid: &mut Grid) -> ActionOutcome {
        let batch = Batch::with_operations(
            "clear",
            grid.all_tiles().into_iter().map(|(pos, tile)| Operation::erase(pos, Some(tile))).collect(),
        );
        self.commit(grid, batch)
    }

    /// Apply a batch and record it. Batches that change nothing are discarded.
    pub fn commit(&mut self, grid: &mut Grid, mut batch: Batch) -> ActionOutcome {
        grid.commit_batch(&mut batch);
        self.record(batch)
    }

    /// Push a batch that is already on the grid.
    fn record(&mut self, batch: Batch) -> ActionOutcome {
        if batch.is_empty() {
            return ActionOutcome::Discarded;
        }
        let operations = batch.len();
        log::debug!("actor {}: committed '{}' with {operations} operations", self.id, batch.description());
        self.history.push(batch);
        ActionOutcome::Committed { operations }
    }

    pub fn undo(&mut self, grid: &mut Grid) -> HistoryOutcome {
        let Some(batch) = self.history.pop_undo() else {
            return HistoryOutcome::NothingToUndo;
        };
        let report = grid.revert(&batch);
        self.history.push_redo(batch);
        HistoryOutcome::Applied {
            operations: report.applied,
            conflicts: report.conflicts,
        }
    }

    pub fn redo(&mut self, grid: &mut Grid) -> HistoryOutcome {
        let Some(batch) = self.history.pop_redo() else {
            return HistoryOutcome::NothingToRedo;
        };
        let report = grid.apply(&batch);
        self.history.push_undo(batch);
        HistoryOutcome::Applied {
            operations: report.applied,
            conflicts: report.conflicts,
        }
    }
}

fn clamp_cursor(value: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        return fallback;
    }
    value.clamp(-CURSOR_EXTENT, CURSOR_EXTENT)
}
