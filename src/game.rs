//! Model state the explorer drives: terrain, player, camera and input mode.

use std::sync::Arc;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::camera::BoundedPoint;
use crate::config::Config;
use crate::noise_source::NoiseParams;
use crate::ping::{trigger_ping_with, PingHandle};
use crate::terrain::TerrainGrid;

/// What the movement keys act on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveMode {
    Player,
    Map,
    Menu,
}

impl MoveMode {
    pub fn label(&self) -> &'static str {
        match self {
            MoveMode::Player => "PLAYER",
            MoveMode::Map => "MAP",
            MoveMode::Menu => "MENU",
        }
    }

    pub fn next(&self) -> MoveMode {
        match self {
            MoveMode::Player => MoveMode::Map,
            MoveMode::Map => MoveMode::Menu,
            MoveMode::Menu => MoveMode::Player,
        }
    }
}

pub struct Game {
    pub grid: Arc<TerrainGrid>,
    pub player: BoundedPoint,
    pub camera: BoundedPoint,
    pub mode: MoveMode,
    /// Seed of the terrain currently shown
    pub seed: u64,
    noise: NoiseParams,
    ping_strength: usize,
    ping_interval: Duration,
    /// Draws the seed for each regeneration after the first
    seeds: ChaCha8Rng,
}

impl Game {
    /// Create the world and generate its first terrain from `seed`.
    pub fn new(config: &Config, seed: u64) -> Self {
        let grid = Arc::new(TerrainGrid::new(config.world_width, config.world_height));
        grid.regenerate(&config.noise, seed);

        Game {
            grid,
            player: BoundedPoint::default(),
            camera: BoundedPoint::default(),
            mode: MoveMode::Player,
            seed,
            noise: config.noise,
            ping_strength: config.ping_strength,
            ping_interval: config.ping_interval(),
            seeds: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Replace the terrain with the next seed of this session's sequence.
    /// Blocks for the whole regeneration.
    pub fn regenerate(&mut self) {
        self.seed = self.seeds.gen();
        self.grid.regenerate(&self.noise, self.seed);
    }

    pub fn cycle_mode(&mut self) {
        self.mode = self.mode.next();
        tracing::debug!(mode = self.mode.label(), "move mode changed");
    }

    /// Apply a movement key to whatever the current mode targets.
    pub fn move_focus(&mut self, dx: i32, dy: i32) {
        let (w, h) = (self.grid.width(), self.grid.height());
        match self.mode {
            MoveMode::Player => self.player.shift(dx, dy, w, h),
            MoveMode::Map => self.camera.shift(dx, dy, w, h),
            MoveMode::Menu => {}
        }
    }

    /// Fire a ping from the player's position. The returned handle may be
    /// dropped to let it run on its own.
    pub fn ping(&self) -> PingHandle {
        trigger_ping_with(
            self.grid.clone(),
            self.player.x,
            self.player.y,
            self.ping_strength,
            self.ping_interval,
        )
    }
}
