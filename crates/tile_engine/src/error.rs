//! Unified error types for tile_engine

use thiserror::Error;

use crate::{Position, TileKind};

/// Main error type for grid and editing operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    // === Grid Errors ===
    #[error("A tile of the same kind already occupies {pos}")]
    OccupiedSameType { pos: Position },

    #[error("Flood fill exceeded its limit of {limit} cells")]
    FillLimitExceeded { limit: usize },

    #[error("Rectangle exceeds its limit of {limit} cells")]
    RectangleLimitExceeded { limit: usize },

    // === Catalog Errors ===
    #[error("Unknown tile kind: {kind}")]
    UnknownTileKind { kind: TileKind },

    // === Actor Errors ===
    #[error("Actor {id} is not registered")]
    UnknownActor { id: u8 },

    #[error("All {max} remote actor slots are taken")]
    ActorLimitReached { max: usize },
}

/// Result type alias for tile_engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
