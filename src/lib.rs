pub mod app;
pub mod core;
pub mod debug;
pub mod gameplay;
pub mod interaction;
pub mod physics;
pub mod rendering;

// Curated re-exports
pub use crate::app::sim::SimulationPlugin;
pub use crate::app::state::SimState;
pub use crate::core::components::{BallRadius, BodyKind, EmojiBall, RngSeed, SwingDirection};
pub use crate::core::config::config::SimConfig;
pub use crate::core::events::{ClearAllEmojis, RebuildWorld, SpawnEmoji};
pub use crate::core::playfield::Playfield;
