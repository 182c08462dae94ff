//! The terrain grid: the world map of styled glyphs, shared between the
//! draw loop and background pings.

use std::sync::{Mutex, MutexGuard};

use ratatui::style::{Color, Style};
use rayon::prelude::*;

use crate::error::ScreenError;
use crate::noise_source::{LayeredPerlin, NoiseParams, TerrainNoise};
use crate::tilemap::Tilemap;

/// Terrain palette from low to high noise values: sand, dry grass, grass,
/// forest, then water. Values below zero or past the end are capped to the
/// first or last entry.
pub const TERRAIN_PALETTE: [Color; 35] = [
    Color::Indexed(226),
    Color::Indexed(226),
    Color::Indexed(226),
    Color::Indexed(226),
    Color::Indexed(226),
    Color::Indexed(226),
    Color::Indexed(178),
    Color::Indexed(178),
    Color::Indexed(178),
    Color::Indexed(178),
    Color::Indexed(178),
    Color::Indexed(184),
    Color::Indexed(184),
    Color::Indexed(184),
    Color::Indexed(184),
    Color::Indexed(184),
    Color::Indexed(185),
    Color::Indexed(185),
    Color::Indexed(185),
    Color::Indexed(186),
    Color::Indexed(190),
    Color::Indexed(191),
    Color::Indexed(192),
    Color::Indexed(193),
    Color::Indexed(22),
    Color::Indexed(28),
    Color::Indexed(34),
    Color::Indexed(40),
    Color::Indexed(41),
    Color::Indexed(46),
    Color::Indexed(47),
    Color::Indexed(21),
    Color::Indexed(20),
    Color::Indexed(19),
    Color::Indexed(18),
];

/// One map cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerrainCell {
    pub glyph: char,
    pub style: Style,
}

impl TerrainCell {
    pub const fn new(glyph: char, style: Style) -> Self {
        Self { glyph, style }
    }
}

impl Default for TerrainCell {
    fn default() -> Self {
        Self::new(' ', Style::new())
    }
}

/// Map a noise value onto a palette index.
///
/// The upper cap triggers at `len - 1` rather than `len`. The result is the
/// same as a plain clamp, but the boundary is kept exactly as the terrain
/// format has always computed it.
pub fn palette_index(value: i32, palette_len: usize) -> usize {
    let last = palette_len.saturating_sub(1) as i32;
    let mut f = value;
    if f < 0 {
        f = 0;
    }
    if f >= last {
        f = last;
    }
    f as usize
}

/// The cell regenerate produces for a noise value.
pub fn terrain_cell(value: i32) -> TerrainCell {
    let color = TERRAIN_PALETTE[palette_index(value, TERRAIN_PALETTE.len())];
    TerrainCell::new(' ', Style::default().bg(color).fg(Color::Green))
}

/// A fixed-size grid of terrain cells behind a lock.
///
/// Every accessor takes the lock for a single cell operation. Nothing ties
/// two operations together, so concurrent writers race and the last one wins.
pub struct TerrainGrid {
    width: usize,
    height: usize,
    cells: Mutex<Tilemap<TerrainCell>>,
}

impl TerrainGrid {
    /// Create a grid of blank cells.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: Mutex::new(Tilemap::new(width, height)),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn lock(&self) -> MutexGuard<'_, Tilemap<TerrainCell>> {
        // A ping thread that panicked mid-write leaves plain values behind
        self.cells.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Read one cell.
    pub fn get_tile(&self, x: i32, y: i32) -> Result<TerrainCell, ScreenError> {
        self.lock()
            .get(x, y)
            .copied()
            .ok_or(ScreenError::OutOfBounds { x, y })
    }

    /// Write one cell. Out-of-range writes do nothing.
    pub fn set_tile(&self, x: i32, y: i32, cell: TerrainCell) {
        self.lock().set(x, y, cell);
    }

    /// Copy of the whole grid, for comparisons and exports.
    pub fn snapshot(&self) -> Tilemap<TerrainCell> {
        self.lock().clone()
    }

    /// Repopulate every cell from the layered Perlin field for `(params, seed)`.
    pub fn regenerate(&self, params: &NoiseParams, seed: u64) {
        let field = LayeredPerlin::new(*params, seed);
        self.regenerate_with(&field);
        tracing::info!(seed, width = self.width, height = self.height, "terrain regenerated");
    }

    /// Repopulate every cell from an arbitrary noise source.
    ///
    /// Rows are evaluated in parallel without holding the lock; the finished
    /// map is swapped in under it.
    pub fn regenerate_with(&self, noise: &dyn TerrainNoise) {
        let width = self.width;
        let rows: Vec<TerrainCell> = (0..self.height)
            .into_par_iter()
            .flat_map_iter(|y| (0..width).map(move |x| terrain_cell(noise.sample(x as i32, y as i32))))
            .collect();

        if let Some(map) = Tilemap::from_rows(self.width, self.height, rows) {
            self.lock().replace(map);
        }
    }
}
