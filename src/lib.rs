//! Terrain viewport explorer library
//!
//! Nested viewports over a terminal surface, a lock-guarded terrain grid,
//! saturating camera/player positions and the expanding-ring ping.
//! Re-exports modules for use by the binary.

pub mod camera;
pub mod config;
pub mod error;
pub mod explorer;
pub mod game;
pub mod logging;
pub mod noise_source;
pub mod ping;
pub mod screen;
pub mod surface;
pub mod terrain;
pub mod tilemap;
pub mod viewport;

pub use camera::{bounded_step, BoundedPoint};
pub use error::ScreenError;
pub use noise_source::{LayeredPerlin, NoiseParams, TerrainNoise};
pub use ping::{run_ping, trigger_ping, PingHandle};
pub use surface::{CellBuffer, Surface};
pub use terrain::{TerrainCell, TerrainGrid};
pub use viewport::{ViewportId, ViewportRef, ViewportTree};
