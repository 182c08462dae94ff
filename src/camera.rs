//! Saturating positions on the terrain grid: the player and the map camera.

/// Add `delta` to `value` and keep the result in `[0, limit - 1]`.
///
/// Stepping past either end leaves the value at the end.
pub fn bounded_step(value: i32, delta: i32, limit: i32) -> i32 {
    let v = value.saturating_add(delta);
    v.clamp(0, (limit - 1).max(0))
}

/// A point inside a grid of known size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoundedPoint {
    pub x: i32,
    pub y: i32,
}

impl BoundedPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move by (dx, dy), clamping each axis on its own.
    pub fn shift(&mut self, dx: i32, dy: i32, width: usize, height: usize) {
        self.x = bounded_step(self.x, dx, width as i32);
        self.y = bounded_step(self.y, dy, height as i32);
    }
}
