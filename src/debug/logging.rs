#[cfg(feature = "debug")]
use bevy::prelude::*;

#[cfg(feature = "debug")]
use super::stats::{DebugState, DebugStats};
#[cfg(feature = "debug")]
use crate::core::level::course::ActiveLayout;
#[cfg(feature = "debug")]
use crate::gameplay::population::EmojiPopulation;

#[cfg(feature = "debug")]
pub fn debug_logging_system(
    time: Res<Time>,
    mut state: ResMut<DebugState>,
    stats: Res<DebugStats>,
    population: Res<EmojiPopulation>,
    layout: Option<Res<ActiveLayout>>,
) {
    state.time_accum += time.delta_secs();
    if state.time_accum >= state.log_interval {
        state.time_accum = 0.0;
        info!(
            "SIM frame={} t={:.3}s fps={:.1} ft_ms={:.1} balls={}/{} glyphs={} layout={}",
            state.frame_counter,
            time.elapsed_secs(),
            stats.fps,
            stats.frame_time_ms,
            population.0,
            stats.ball_count,
            stats.cached_glyphs,
            layout.map(|l| l.0.as_str()).unwrap_or("-")
        );
    }
}
