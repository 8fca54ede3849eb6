use bevy::prelude::*;

/// Loop lifecycle. Construction enters `Running` immediately (there is no
/// separate "start" call in the host contract); `Stopped` freezes stepping
/// so hosts and tests can drive or halt the world explicitly.
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum SimState {
    #[default]
    Running,
    Stopped,
}
