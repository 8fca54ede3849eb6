#[cfg(feature = "debug")]
use bevy::prelude::*;
#[cfg(feature = "debug")]
use rand::Rng;

#[cfg(feature = "debug")]
use crate::app::state::SimState;
#[cfg(feature = "debug")]
use crate::core::events::{ClearAllEmojis, RebuildWorld, SpawnEmoji};

/// Symbols fed by the debug keymap in place of the upstream stream client.
#[cfg(feature = "debug")]
const FEED_SYMBOLS: [&str; 6] = ["🔥", "✨", "💧", "🎉", "🍀", "🫧"];

/// E = feed one random symbol, C = clear all, R = force rebuild,
/// Space = toggle Running/Stopped.
#[cfg(feature = "debug")]
pub fn debug_key_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<SimState>>,
    mut next_state: ResMut<NextState<SimState>>,
    mut spawn: EventWriter<SpawnEmoji>,
    mut clear: EventWriter<ClearAllEmojis>,
    mut rebuild: EventWriter<RebuildWorld>,
) {
    if keys.just_pressed(KeyCode::KeyE) {
        let idx = rand::thread_rng().gen_range(0..FEED_SYMBOLS.len());
        spawn.write(SpawnEmoji(FEED_SYMBOLS[idx].into()));
    }
    if keys.just_pressed(KeyCode::KeyC) {
        clear.write(ClearAllEmojis);
    }
    if keys.just_pressed(KeyCode::KeyR) {
        rebuild.write(RebuildWorld);
    }
    if keys.just_pressed(KeyCode::Space) {
        let target = match state.get() {
            SimState::Running => SimState::Stopped,
            SimState::Stopped => SimState::Running,
        };
        next_state.set(target);
        info!("sim state -> {target:?}");
    }
}
