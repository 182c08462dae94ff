//! Drawing surfaces addressed by absolute cell coordinates.

use ratatui::buffer::Buffer;
use ratatui::style::Style;

/// A terminal-like grid of drawable cells.
pub trait Surface {
    /// Width and height in cells.
    fn size(&self) -> (i32, i32);

    /// Write one cell. Implementations tolerate out-of-range coordinates.
    fn set_cell(&mut self, x: i32, y: i32, glyph: char, style: Style);
}

impl Surface for Buffer {
    fn size(&self) -> (i32, i32) {
        (self.area.width as i32, self.area.height as i32)
    }

    fn set_cell(&mut self, x: i32, y: i32, glyph: char, style: Style) {
        if x < 0 || y < 0 || x > u16::MAX as i32 || y > u16::MAX as i32 {
            return;
        }
        let (Some(px), Some(py)) = (
            self.area.x.checked_add(x as u16),
            self.area.y.checked_add(y as u16),
        ) else {
            return;
        };
        if let Some(cell) = self.cell_mut((px, py)) {
            cell.set_char(glyph).set_style(style);
        }
    }
}

/// In-memory surface used for off-screen composition and tests.
#[derive(Clone, Debug)]
pub struct CellBuffer {
    width: i32,
    height: i32,
    cells: Vec<(char, Style)>,
    writes: usize,
}

impl CellBuffer {
    pub fn new(width: i32, height: i32) -> Self {
        let len = (width.max(0) * height.max(0)) as usize;
        Self {
            width: width.max(0),
            height: height.max(0),
            cells: vec![(' ', Style::default()); len],
            writes: 0,
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Option<(char, Style)> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[(y * self.width + x) as usize])
    }

    pub fn glyph(&self, x: i32, y: i32) -> Option<char> {
        self.get(x, y).map(|(c, _)| c)
    }

    /// The glyphs of one row as a string.
    pub fn row_text(&self, y: i32) -> String {
        (0..self.width).filter_map(|x| self.glyph(x, y)).collect()
    }

    /// Number of in-range writes since creation.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Surface for CellBuffer {
    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn set_cell(&mut self, x: i32, y: i32, glyph: char, style: Style) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }
        self.cells[(y * self.width + x) as usize] = (glyph, style);
        self.writes += 1;
    }
}
