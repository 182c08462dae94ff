//! Screen layout: the viewport tree the explorer draws every frame.

use std::cell::RefCell;
use std::rc::Rc;

use ratatui::style::{Color, Style};

use crate::error::ScreenError;
use crate::game::Game;
use crate::surface::Surface;
use crate::viewport::{border_style, ViewportId, ViewportRef, ViewportTree};

/// Rows above the map holding the two-digit hex column numbers.
const RULER_ROWS: i32 = 2;
/// Columns left of the map: two hex digits and a gap.
const RULER_COLS: i32 = 3;

/// Offset of the map box inside the root on every side.
const MAP_MARGIN: i32 = 5;

/// Root viewport covering the terminal with the map viewport nested inside.
pub struct Screen {
    tree: ViewportTree,
    root: ViewportId,
    map: ViewportId,
    width: i32,
    height: i32,
}

impl Screen {
    /// Lay out a `width`×`height` terminal. The renderers share `game` with
    /// the input loop.
    pub fn build(width: i32, height: i32, game: Rc<RefCell<Game>>) -> Result<Self, ScreenError> {
        let mut tree = ViewportTree::new();

        let root = tree.create(0, 0, width, height, None)?;
        tree.set_bordered(root, true)?;
        tree.set_active(root, true)?;
        tree.set_title(root, game.borrow().mode.label())?;

        let map = tree.create(
            MAP_MARGIN,
            MAP_MARGIN,
            (width - 2 * MAP_MARGIN).max(3),
            (height - 2 * MAP_MARGIN).max(3),
            Some(root),
        )?;
        tree.set_bordered(map, true)?;
        tree.set_active(map, true)?;
        tree.set_title(map, "Map")?;

        let status_game = game.clone();
        tree.set_content(root, move |vp, surface| draw_status(vp, surface, &status_game.borrow()))?;
        tree.set_content(map, move |vp, surface| draw_map(vp, surface, &game.borrow()))?;

        Ok(Screen {
            tree,
            root,
            map,
            width,
            height,
        })
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn root(&self) -> ViewportId {
        self.root
    }

    pub fn map(&self) -> ViewportId {
        self.map
    }

    /// Sync per-frame labels with the model before drawing.
    pub fn refresh(&mut self, game: &Game) -> Result<(), ScreenError> {
        self.tree.set_title(self.root, game.mode.label())
    }

    pub fn draw(&self, surface: &mut dyn Surface) -> Result<(), ScreenError> {
        self.tree.draw(self.root, surface)
    }
}

fn ruler_style() -> Style {
    Style::default().bg(Color::Black).fg(Color::White)
}

fn player_style() -> Style {
    Style::default().bg(Color::Black).fg(Color::Green)
}

/// Two hex digits of a grid coordinate, wrapping every 256 cells.
fn hex_label(v: i32) -> [char; 2] {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
    let v = v.rem_euclid(256) as usize;
    [DIGITS[v >> 4] as char, DIGITS[v & 0xF] as char]
}

/// Draw the visible window of the terrain with hex rulers and the player.
///
/// Clips to the viewport interior. When the camera sits near the far edge,
/// the part of the window past the grid is left as is.
fn draw_map(vp: ViewportRef<'_>, surface: &mut dyn Surface, game: &Game) {
    let (ix, iy, iw, ih) = vp.interior();
    let cols = iw - RULER_COLS;
    let rows = ih - RULER_ROWS;
    if cols <= 0 || rows <= 0 {
        return;
    }

    let grid = &game.grid;
    let camera = game.camera;
    let visible_cols = cols.min(grid.width() as i32 - camera.x).max(0);
    let visible_rows = rows.min(grid.height() as i32 - camera.y).max(0);

    let ox = ix + RULER_COLS;
    let oy = iy + RULER_ROWS;
    let ruler = ruler_style();

    for col in 0..visible_cols {
        let [hi, lo] = hex_label(camera.x + col);
        vp.put(surface, ox + col, iy, hi, ruler);
        vp.put(surface, ox + col, iy + 1, lo, ruler);
    }

    for row in 0..visible_rows {
        let ty = camera.y + row;
        let [hi, lo] = hex_label(ty);
        vp.put(surface, ix, oy + row, hi, ruler);
        vp.put(surface, ix + 1, oy + row, lo, ruler);
        vp.put(surface, ix + 2, oy + row, ' ', ruler);

        for col in 0..visible_cols {
            if let Ok(cell) = grid.get_tile(camera.x + col, ty) {
                vp.put(surface, ox + col, oy + row, cell.glyph, cell.style);
            }
        }
    }

    let px = game.player.x - camera.x;
    let py = game.player.y - camera.y;
    if (0..visible_cols).contains(&px) && (0..visible_rows).contains(&py) {
        vp.put(surface, ox + px, oy + py, 'P', player_style());
    }
}

/// Status text on the bottom frame row of the root.
fn draw_status(vp: ViewportRef<'_>, surface: &mut dyn Surface, game: &Game) {
    let room = (vp.width() - 4).max(0) as usize;
    if room == 0 {
        return;
    }

    let status = format!(
        " seed {} | player ({},{}) | view ({},{}) | Tab:Mode  Space:Ping  R:Regen  Q:Quit ",
        game.seed, game.player.x, game.player.y, game.camera.x, game.camera.y,
    );
    let text: String = status.chars().take(room).collect();
    vp.put_str(surface, 2, vp.height() - 1, &text, border_style(vp.active()));
}
