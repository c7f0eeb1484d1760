//! Shape algorithms for the area tools
//!
//! Contains algorithms that enumerate grid coordinates:
//! - Rectangles (outline and filled)
//! - Flood fill (4-connected BFS, bounded)
//!
//! None of these touch the grid; callers turn the coordinates into operations.

use std::collections::{HashSet, VecDeque};

use crate::{EngineError, Position, Result};

// ═══════════════════════════════════════════════════════════════════════════
// Rectangle Algorithm
// ═══════════════════════════════════════════════════════════════════════════

/// Get points for a rectangle (outline or filled)
///
/// Bounds are inclusive on both axes and the corners may be given in any order.
/// Every coordinate is returned exactly once, in row-major order.
pub fn rectangle_points(p0: Position, p1: Position, filled: bool) -> Vec<Position> {
    let min = p0.min(p1);
    let max = p0.max(p1);

    let mut points = Vec::new();
    for y in min.y..=max.y {
        let is_edge_row = y == min.y || y == max.y;
        if filled || is_edge_row {
            points.extend((min.x..=max.x).map(|x| Position::new(x, y)));
        } else {
            points.push(Position::new(min.x, y));
            if max.x != min.x {
                points.push(Position::new(max.x, y));
            }
        }
    }
    points
}

/// Number of cells [`rectangle_points`] returns for these corners.
///
/// `None` when the count does not fit in a `u64`.
pub fn rectangle_len(p0: Position, p1: Position, filled: bool) -> Option<u64> {
    let min = p0.min(p1);
    let max = p0.max(p1);
    let width = (i64::from(max.x) - i64::from(min.x) + 1) as u64;
    let height = (i64::from(max.y) - i64::from(min.y) + 1) as u64;
    if filled || width <= 2 || height <= 2 {
        width.checked_mul(height)
    } else {
        Some(2 * width + 2 * height - 4)
    }
}

/// [`rectangle_points`] that refuses shapes of more than `limit` cells.
///
/// The size is checked before any point is produced.
pub fn bounded_rectangle_points(p0: Position, p1: Position, filled: bool, limit: usize) -> Result<Vec<Position>> {
    match rectangle_len(p0, p1, filled) {
        Some(len) if len <= limit as u64 => Ok(rectangle_points(p0, p1, filled)),
        _ => Err(EngineError::RectangleLimitExceeded { limit }),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Flood Fill Algorithm
// ═══════════════════════════════════════════════════════════════════════════

/// Compute flood fill points using 4-connected BFS
///
/// `belongs` decides whether a coordinate is part of the region; the start
/// coordinate is always included. The grid has no edges, so the search stops
/// with [`EngineError::FillLimitExceeded`] once the region grows past `limit`
/// cells instead of walking forever.
pub fn flood_fill_points<F>(start: Position, limit: usize, belongs: F) -> Result<Vec<Position>>
where
    F: Fn(Position) -> bool,
{
    let mut visited = HashSet::new();
    let mut region = Vec::new();
    let mut queue = VecDeque::new();

    visited.insert(start);
    queue.push_back(start);

    while let Some(pos) = queue.pop_front() {
        if region.len() >= limit {
            return Err(EngineError::FillLimitExceeded { limit });
        }
        region.push(pos);

        for next in pos.neighbours() {
            if visited.contains(&next) || !belongs(next) {
                continue;
            }
            visited.insert(next);
            queue.push_back(next);
        }
    }

    region.sort();
    Ok(region)
}
