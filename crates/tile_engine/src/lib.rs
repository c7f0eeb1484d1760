//! Data model for the level creator: tiles, the grid they sit on and the
//! reversible operations that edit it.

mod error;
pub use error::*;

mod position;
pub use position::Position;

mod tile;
pub use tile::*;

mod operation;
pub use operation::{Batch, Operation};

mod grid;
pub use grid::{ApplyReport, Grid};

pub mod shapes;
