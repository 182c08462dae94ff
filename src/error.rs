//! Error types shared by the viewport tree and the terrain grid.

use crate::viewport::ViewportId;

/// Errors raised while composing viewports or reading the terrain grid.
///
/// Only reads and construction calls return these. Writes and per-cell
/// draw operations swallow `OutOfBounds` and carry on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenError {
    /// Coordinate resolves outside the root surface or the grid extent
    OutOfBounds { x: i32, y: i32 },
    /// Viewport created with a non-positive width or height
    InvalidSize { width: i32, height: i32 },
    /// Id does not name a node of this tree
    UnknownViewport(ViewportId),
    /// Child already belongs to another viewport
    AlreadyOwned(ViewportId),
    /// Attaching the node would make it its own ancestor
    WouldCycle(ViewportId),
}

impl std::fmt::Display for ScreenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScreenError::OutOfBounds { x, y } => write!(f, "coordinate ({}, {}) out of bounds", x, y),
            ScreenError::InvalidSize { width, height } => {
                write!(f, "invalid viewport size {}x{}", width, height)
            }
            ScreenError::UnknownViewport(id) => write!(f, "unknown viewport {}", id),
            ScreenError::AlreadyOwned(id) => write!(f, "viewport {} already has a parent", id),
            ScreenError::WouldCycle(id) => write!(f, "attaching viewport {} would create a cycle", id),
        }
    }
}

impl std::error::Error for ScreenError {}
