use bevy::prelude::*;

/// Visible simulation region, in world units (y-up, origin at center).
/// Owned by the orchestrator; every mutation is followed by a `RebuildWorld`.
#[derive(Resource, Debug, Copy, Clone, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
    /// Vertical offset of the region below the host window's top edge.
    pub top: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32, top: f32) -> Self {
        Self { width, height, top }
    }

    pub fn half_width(&self) -> f32 {
        self.width * 0.5
    }

    pub fn half_height(&self) -> f32 {
        self.height * 0.5
    }

    /// True when a body at `pos` with `radius` has fully left the region
    /// through the left, right or bottom open edge. The top edge is not
    /// checked: balls enter there and may bounce above it briefly.
    pub fn is_out_of_bounds(&self, pos: Vec2, radius: f32) -> bool {
        pos.y < -self.half_height() - radius
            || pos.x < -self.half_width() - radius
            || pos.x > self.half_width() + radius
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new(1280.0, 720.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inside_positions_are_in_bounds() {
        let f = Playfield::new(1000.0, 600.0, 0.0);
        assert!(!f.is_out_of_bounds(Vec2::ZERO, 10.0));
        assert!(!f.is_out_of_bounds(Vec2::new(490.0, -290.0), 10.0));
        // Above the top edge is still "in": the top boundary is open.
        assert!(!f.is_out_of_bounds(Vec2::new(0.0, 400.0), 10.0));
    }

    #[test]
    fn open_edges_cull_with_radius_margin() {
        let f = Playfield::new(1000.0, 600.0, 0.0);
        // Bottom: center must clear the edge by a full radius.
        assert!(!f.is_out_of_bounds(Vec2::new(0.0, -305.0), 10.0));
        assert!(f.is_out_of_bounds(Vec2::new(0.0, -311.0), 10.0));
        // Left / right.
        assert!(f.is_out_of_bounds(Vec2::new(-511.0, 0.0), 10.0));
        assert!(f.is_out_of_bounds(Vec2::new(511.0, 0.0), 10.0));
    }
}
