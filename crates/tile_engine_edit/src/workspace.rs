//! The shared grid plus every registered actor.
//!
//! `Workspace` is the only owner of the [`Grid`]; every edit is issued through
//! an actor so it lands in that actor's history. It is driven from a single
//! thread and does no locking.

use tile_engine::{Batch, EngineError, Grid, Result, TileCatalog, TileKind};

use crate::{ActionOutcome, Actor, ActorId, HistoryOutcome, Tool};

/// Remote editors that can be registered next to the local one
pub const MAX_REMOTE_ACTORS: usize = 4;

/// Default bound on the number of cells a single flood fill may touch
pub const DEFAULT_FILL_LIMIT: usize = 4096;

/// Default bound on the number of cells a single rectangle may cover
pub const DEFAULT_RECT_LIMIT: usize = 16_384;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditConfig {
    pub fill_limit: usize,
    pub rect_limit: usize,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            fill_limit: DEFAULT_FILL_LIMIT,
            rect_limit: DEFAULT_RECT_LIMIT,
        }
    }
}

pub struct Workspace {
    grid: Grid,
    catalog: TileCatalog,
    actors: Vec<Actor>,
    config: EditConfig,
}

impl Workspace {
    /// Create a workspace with the local editor (actor 0) registered.
    pub fn new(catalog: TileCatalog, config: EditConfig) -> Self {
        let local = Actor::new(ActorId::LOCAL, catalog.default_kind(), &catalog);
        Self {
            grid: Grid::new(),
            catalog,
            actors: vec![local],
            config,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Direct grid access for level loaders. Edits made here bypass every history.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EditConfig {
        &self.config
    }

    /// Hand out the next remote actor id (1, 2, ...).
    pub fn register_remote(&mut self) -> Result<ActorId> {
        if self.actors.len() > MAX_REMOTE_ACTORS {
            return Err(EngineError::ActorLimitReached { max: MAX_REMOTE_ACTORS });
        }
        let id = ActorId(self.actors.len() as u8);
        self.actors.push(Actor::new(id, self.catalog.default_kind(), &self.catalog));
        log::info!("registered remote actor {id}");
        Ok(id)
    }

    pub fn is_registered(&self, id: ActorId) -> bool {
        (id.0 as usize) < self.actors.len()
    }

    pub fn actor_ids(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.actors.iter().map(Actor::id)
    }

    pub fn actor(&self, id: ActorId) -> Result<&Actor> {
        self.actors.get(id.0 as usize).ok_or(EngineError::UnknownActor { id: id.0 })
    }

    fn actor_mut(&mut self, id: ActorId) -> Result<&mut Actor> {
        self.actors.get_mut(id.0 as usize).ok_or(EngineError::UnknownActor { id: id.0 })
    }

    fn split(&mut self, id: ActorId) -> Result<(&mut Actor, &mut Grid)> {
        let actor = self.actors.get_mut(id.0 as usize).ok_or(EngineError::UnknownActor { id: id.0 })?;
        Ok((actor, &mut self.grid))
    }

    pub fn set_active_tool(&mut self, id: ActorId, tool: Tool) -> Result<()> {
        self.actor_mut(id)?.set_active_tool(tool);
        Ok(())
    }

    /// Returns whether area tools are available for the new tile.
    pub fn set_active_tile(&mut self, id: ActorId, tile: TileKind) -> Result<bool> {
        let actor = self.actors.get_mut(id.0 as usize).ok_or(EngineError::UnknownActor { id: id.0 })?;
        actor.set_active_tile(tile, &self.catalog)
    }

    pub fn can_use_area_tools(&self, tile: TileKind) -> bool {
        self.catalog.can_use_area_tools(tile)
    }

    pub fn set_cursor(&mut self, id: ActorId, x: f32, y: f32) -> Result<()> {
        self.actor_mut(id)?.set_cursor(x, y);
        Ok(())
    }

    pub fn move_cursor(&mut self, id: ActorId, dx: f32, dy: f32) -> Result<()> {
        self.actor_mut(id)?.move_cursor(dx, dy);
        Ok(())
    }

    pub fn begin_session(&mut self, id: ActorId, tool: Tool) -> Result<ActionOutcome> {
        let actor = self.actors.get_mut(id.0 as usize).ok_or(EngineError::UnknownActor { id: id.0 })?;
        actor.begin_session(tool, &mut self.grid, &self.config)
    }

    /// Start a session with whatever tool the actor has selected.
    pub fn begin_active_session(&mut self, id: ActorId) -> Result<ActionOutcome> {
        let tool = self.actor(id)?.tool();
        self.begin_session(id, tool)
    }

    /// End the running session. With `Some(tool)` only a session of that tool is ended.
    pub fn end_session(&mut self, id: ActorId, tool: Option<Tool>) -> Result<ActionOutcome> {
        let (actor, grid) = self.split(id)?;
        match (actor.session_tool(), tool) {
            (None, _) => Ok(ActionOutcome::Ignored),
            (Some(running), Some(wanted)) if running != wanted => Ok(ActionOutcome::Ignored),
            _ => actor.end_session(grid),
        }
    }

    pub fn flood_fill(&mut self, id: ActorId) -> Result<ActionOutcome> {
        let fill_limit = self.config.fill_limit;
        let (actor, grid) = self.split(id)?;
        actor.flood_fill(grid, fill_limit)
    }

    pub fn clear_all(&mut self, id: ActorId) -> Result<ActionOutcome> {
        let (actor, grid) = self.split(id)?;
        Ok(actor.clear_all(grid))
    }

    /// Apply `batch` and push it onto `id`'s undo stack, clearing its redo stack.
    pub fn commit(&mut self, id: ActorId, batch: Batch) -> Result<ActionOutcome> {
        let (actor, grid) = self.split(id)?;
        Ok(actor.commit(grid, batch))
    }

    pub fn undo(&mut self, id: ActorId) -> Result<HistoryOutcome> {
        let (actor, grid) = self.split(id)?;
        Ok(actor.undo(grid))
    }

    pub fn redo(&mut self, id: ActorId) -> Result<HistoryOutcome> {
        let (actor, grid) = self.split(id)?;
        Ok(actor.redo(grid))
    }

    /// (undo, redo) stack sizes, used to grey out buttons.
    pub fn history_len(&self, id: ActorId) -> Result<(usize, usize)> {
        let history = self.actor(id)?.history();
        Ok((history.undo_len(), history.redo_len()))
    }

    /// One consumer tick: every drawing actor samples its cursor.
    pub fn tick(&mut self) {
        for actor in &mut self.actors {
            actor.sample(&mut self.grid);
        }
    }
}
