use bevy::prelude::*;

/// Role of a simulation body, assigned once at creation time.
/// Every lifecycle rule (cleanup, clear-all, rebuild) keys on this tag,
/// never on collider shape: obstacle pieces may be circles too.
#[derive(Component, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BodyKind {
    /// Static strip framing the top, or the visible bottom shelf.
    Boundary,
    /// Piece of the active obstacle course (including its pin anchors).
    Obstacle,
    /// The single swinging bob.
    Pendulum,
    /// Transient falling ball carrying a glyph texture.
    EmojiBall,
}

/// Marker + payload for one transient emoji ball.
#[derive(Component, Debug, Clone)]
pub struct EmojiBall {
    pub symbol: String,
}

/// Logical radius used both for the collider and sprite/mesh scale.
#[derive(Component, Debug, Deref, DerefMut, Copy, Clone)]
pub struct BallRadius(pub f32);

/// Horizontal drive direction of the pendulum swing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SwingDirection {
    /// Driving toward negative x.
    Left,
    /// Driving toward positive x.
    Right,
}

/// Deterministic RNG seed resource (set in tests for reproducible layout rolls).
#[derive(Resource, Debug, Copy, Clone)]
pub struct RngSeed(pub u64);
