//! Multi-actor editing on top of `tile_engine`.
//!
//! Every actor (the local editor and up to four remote ones) has its own tool,
//! active tile, cursor and undo/redo history. All of them edit the one grid
//! owned by [`Workspace`].

pub mod tools;
pub use tools::Tool;

mod undo_stack;
pub use undo_stack::ActorUndoStack;

mod actor;
pub use actor::*;

mod workspace;
pub use workspace::*;

// Re-export the data model so callers only need this crate
pub use tile_engine::{ApplyReport, Batch, EngineError, Grid, Operation, Position, Result, Tile, TileCatalog, TileCategory, TileId, TileKind, TileType};
