use bevy::prelude::*;

/// One qualifying upstream message, already reduced by the event-stream
/// client to the single symbol to visualize.
#[derive(Event, Debug, Clone)]
pub struct SpawnEmoji(pub String);

/// Host request: remove every transient ball immediately.
#[derive(Event, Debug, Default)]
pub struct ClearAllEmojis;

/// Tear down all bodies and constraints and rebuild boundaries, course and
/// pendulum from the current playfield. Emitted once at startup and on every
/// resize; external callers may emit it as an explicit reset.
#[derive(Event, Debug, Default)]
pub struct RebuildWorld;
