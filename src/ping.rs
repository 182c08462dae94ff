//! Expanding-ring ping over the terrain grid.
//!
//! A ping draws one ring of markers per radius step, restoring the previous
//! ring before drawing the next, and cleans up after the last one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use ratatui::style::{Color, Style};

use crate::terrain::{TerrainCell, TerrainGrid};

/// Glyph written on ring cells.
pub const PING_GLYPH: char = '*';

/// Angle between two samples on a ring (20 samples per ring).
pub const RING_STEP_DEGREES: usize = 18;

/// Delay between two radius steps.
pub const PING_INTERVAL: Duration = Duration::from_millis(50);

pub fn ping_cell() -> TerrainCell {
    TerrainCell::new(PING_GLYPH, Style::new().bg(Color::Black).fg(Color::White))
}

/// Grid points of the ring at `radius` around (sx, sy), one per 18°.
/// Offsets are truncated toward zero, so small rings repeat points.
pub fn ring_points(sx: i32, sy: i32, radius: usize) -> impl Iterator<Item = (i32, i32)> {
    let r = radius as f64;
    (0..360).step_by(RING_STEP_DEGREES).map(move |deg| {
        let a = (deg as f64).to_radians();
        (sx + (a.cos() * r) as i32, sy + (a.sin() * r) as i32)
    })
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct SavedCell {
    x: i32,
    y: i32,
    cell: TerrainCell,
}

/// State of one ping animation.
#[derive(Debug)]
pub struct Ping {
    source_x: i32,
    source_y: i32,
    current_radius: usize,
    max_radius: usize,
    saved: Vec<SavedCell>,
}

impl Ping {
    pub fn new(source_x: i32, source_y: i32, strength: usize) -> Self {
        Self {
            source_x,
            source_y,
            current_radius: 0,
            max_radius: strength,
            saved: Vec::with_capacity(360 / RING_STEP_DEGREES),
        }
    }

    pub fn current_radius(&self) -> usize {
        self.current_radius
    }

    pub fn is_finished(&self) -> bool {
        self.current_radius >= self.max_radius
    }

    /// Cells currently covered by this ping's markers.
    pub fn pending_restores(&self) -> usize {
        self.saved.len()
    }

    /// Restore the last ring and draw the next one. Returns `false` once all
    /// radius steps are done.
    pub fn step(&mut self, grid: &TerrainGrid) -> bool {
        if self.is_finished() {
            return false;
        }

        self.restore(grid);

        let marker = ping_cell();
        for (x, y) in ring_points(self.source_x, self.source_y, self.current_radius) {
            if let Ok(cell) = grid.get_tile(x, y) {
                if cell.glyph != PING_GLYPH {
                    self.saved.push(SavedCell { x, y, cell });
                }
            }
            grid.set_tile(x, y, marker);
        }

        self.current_radius += 1;
        true
    }

    /// Put back every cell the last ring covered.
    pub fn restore(&mut self, grid: &TerrainGrid) {
        for saved in self.saved.drain(..) {
            grid.set_tile(saved.x, saved.y, saved.cell);
        }
    }
}

/// Run a whole ping on the calling thread, sleeping `interval` after each
/// ring. `cancel` is checked between rings; a cancelled ping still cleans up.
pub fn run_ping(
    grid: &TerrainGrid,
    x: i32,
    y: i32,
    strength: usize,
    interval: Duration,
    cancel: &AtomicBool,
) {
    tracing::debug!(x, y, strength, "ping started");
    let mut ping = Ping::new(x, y, strength);

    while !cancel.load(Ordering::Relaxed) && ping.step(grid) {
        if !interval.is_zero() {
            thread::sleep(interval);
        }
    }

    ping.restore(grid);
    tracing::debug!(x, y, radius = ping.current_radius(), "ping finished");
}

/// A ping running on its own thread. Dropping the handle detaches it; the
/// ping then runs to completion.
pub struct PingHandle {
    cancel: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

impl PingHandle {
    /// Ask the ping to stop after its current ring.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the ping to finish.
    pub fn join(self) {
        if self.thread.join().is_err() {
            tracing::warn!("ping thread panicked");
        }
    }
}

/// Start a ping of `strength` rings at (x, y) with the default cadence.
pub fn trigger_ping(grid: Arc<TerrainGrid>, x: i32, y: i32, strength: usize) -> PingHandle {
    trigger_ping_with(grid, x, y, strength, PING_INTERVAL)
}

pub fn trigger_ping_with(
    grid: Arc<TerrainGrid>,
    x: i32,
    y: i32,
    strength: usize,
    interval: Duration,
) -> PingHandle {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    let thread = thread::spawn(move || run_ping(&grid, x, y, strength, interval, &flag));
    PingHandle { cancel, thread }
}
