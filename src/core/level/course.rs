//! Procedural obstacle courses.
//!
//! One of four mutually exclusive layouts is rolled on every world rebuild
//! (construction and every resize), scaled to the current playfield. The
//! roll itself is a pure function of a uniform sample so tests can pin the
//! choice; each layout's geometry is likewise pure and consumed by the
//! entity builder.

use bevy::prelude::*;
use bevy::sprite::MeshMaterial2d;
use bevy_rapier2d::prelude::{
    Collider, Damping, Friction, ImpulseJoint, Restitution, RevoluteJointBuilder, RigidBody,
};
use std::f32::consts::PI;

use crate::core::components::BodyKind;
use crate::core::config::config::SimConfig;
use crate::core::playfield::Playfield;

/// Which obstacle course occupies the playfield until the next rebuild.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LayoutKind {
    Pegs,
    Slats,
    Paddlewheels,
    FacingPaddles,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 4] = [
        LayoutKind::Pegs,
        LayoutKind::Slats,
        LayoutKind::Paddlewheels,
        LayoutKind::FacingPaddles,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pegs" => Some(Self::Pegs),
            "Slats" => Some(Self::Slats),
            "Paddlewheels" => Some(Self::Paddlewheels),
            "FacingPaddles" => Some(Self::FacingPaddles),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pegs => "Pegs",
            Self::Slats => "Slats",
            Self::Paddlewheels => "Paddlewheels",
            Self::FacingPaddles => "FacingPaddles",
        }
    }
}

/// Records the layout chosen by the last rebuild.
#[derive(Resource, Debug, Copy, Clone)]
pub struct ActiveLayout(pub LayoutKind);

/// Map one uniform roll in [0, 1) to a layout.
pub fn choose_layout(roll: f32) -> LayoutKind {
    let n = LayoutKind::ALL.len();
    let idx = (roll.clamp(0.0, 1.0 - f32::EPSILON) * n as f32) as usize;
    LayoutKind::ALL[idx.min(n - 1)]
}

// ------------------------------- Geometry -------------------------------

const SLAT_TILT: f32 = 22.5 * PI / 180.0;
const SLAT_HALF_THICKNESS: f32 = 6.0;
const PADDLE_HALF_THICKNESS: f32 = 7.0;
const WHEEL_HUB_RADIUS: f32 = 10.0;
/// Spokes per wheel; each spans the full diameter, so 4 give 8 paddle faces.
pub const WHEEL_SPOKES: usize = 4;

#[derive(Debug, Clone)]
pub struct PegGrid {
    pub radius: f32,
    pub positions: Vec<Vec2>,
}

/// Quincunx grid sized from playfield height, centered in the upper half.
pub fn peg_grid(field: &Playfield, radius: f32) -> PegGrid {
    let rows = (field.height / 75.0).round().max(1.0) as usize;
    let cols = (field.height / 33.3).round().max(2.0) as usize;
    let pitch_x = field.width * 0.8 / (cols as f32 - 1.0);
    let pitch_y = field.height * 0.45 / rows as f32;
    // Odd rows shift half a pitch; the stagger widens the grid by that much.
    let span_x = pitch_x * (cols as f32 - 1.0) + pitch_x * 0.5;
    let span_y = pitch_y * (rows as f32 - 1.0);
    let x0 = -span_x * 0.5;
    let y0 = field.height * 0.25 + span_y * 0.5;
    let mut positions = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        let stagger = if row % 2 == 1 { pitch_x * 0.5 } else { 0.0 };
        let y = y0 - row as f32 * pitch_y;
        for col in 0..cols {
            positions.push(Vec2::new(x0 + col as f32 * pitch_x + stagger, y));
        }
    }
    PegGrid { radius, positions }
}

#[derive(Debug, Clone, Copy)]
pub struct Slat {
    pub center: Vec2,
    pub tilt: f32,
}

/// Zig-zag chute: a vertical stack of tilted bars with alternating tilt
/// sign and alternating horizontal offset.
pub fn slat_run(field: &Playfield) -> (Vec2, Vec<Slat>) {
    let count = (field.height / 150.0).round().max(2.0) as usize;
    let half_extents = Vec2::new(field.width * 0.22, SLAT_HALF_THICKNESS);
    let pitch_y = field.height / (count as f32 + 1.0);
    let offset_x = field.width * 0.15;
    let mut slats = Vec::with_capacity(count);
    for i in 0..count {
        let (x, tilt) = if i % 2 == 0 {
            (-offset_x, -SLAT_TILT)
        } else {
            (offset_x, SLAT_TILT)
        };
        slats.push(Slat {
            center: Vec2::new(x, field.half_height() - pitch_y * (i as f32 + 1.0)),
            tilt,
        });
    }
    (half_extents, slats)
}

#[derive(Debug, Clone, Copy)]
pub struct Wheel {
    pub center: Vec2,
    pub radius: f32,
}

/// Two free-spinning wheels left and right of center. The right wheel is
/// shrunk when its rim would reach into the central band reserved for the
/// swing anchor (`keepout` = half-width of that band).
pub fn paddlewheels(field: &Playfield, keepout: f32) -> [Wheel; 2] {
    let base_r = (field.height * 0.18).min(field.width * 0.12);
    let x = field.width * 0.25;
    let left = Wheel {
        center: Vec2::new(-x, 0.0),
        radius: base_r,
    };
    let mut right = Wheel {
        center: Vec2::new(x, 0.0),
        radius: base_r,
    };
    if right.center.x - right.radius < keepout {
        right.radius = (right.center.x - keepout).max(base_r * 0.4);
    }
    [left, right]
}

#[derive(Debug, Clone, Copy)]
pub struct PaddlePair {
    pub half_extents: Vec2,
    pub centers: [Vec2; 2],
}

/// Two single paddles pinned at playfield center height, symmetric about x = 0.
pub fn facing_paddles(field: &Playfield) -> PaddlePair {
    let x = field.width * 0.25;
    PaddlePair {
        half_extents: Vec2::new(field.width * 0.09, PADDLE_HALF_THICKNESS),
        centers: [Vec2::new(-x, 0.0), Vec2::new(x, 0.0)],
    }
}

/// Number of `BodyKind::Obstacle` entities a layout produces (pinned pieces
/// count their fixed anchor body too). Backs the rebuild-idempotence tests.
pub fn body_count(kind: LayoutKind, field: &Playfield, cfg: &SimConfig) -> usize {
    match kind {
        LayoutKind::Pegs => peg_grid(field, cfg.course.peg_radius).positions.len(),
        LayoutKind::Slats => slat_run(field).1.len(),
        LayoutKind::Paddlewheels | LayoutKind::FacingPaddles => 4,
    }
}

// ------------------------------- Builder -------------------------------

const OBSTACLE_COLOR: Color = Color::srgb(0.55, 0.58, 0.66);

/// Spawn the bodies and constraints of one layout. Caller has already
/// cleared the previous build.
pub fn build_course(
    commands: &mut Commands,
    kind: LayoutKind,
    field: &Playfield,
    cfg: &SimConfig,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
) {
    match kind {
        LayoutKind::Pegs => {
            let grid = peg_grid(field, cfg.course.peg_radius);
            for pos in &grid.positions {
                let mut e = commands.spawn((
                    BodyKind::Obstacle,
                    RigidBody::Fixed,
                    Collider::ball(grid.radius),
                    Restitution::coefficient(cfg.course.peg_restitution),
                    Transform::from_xyz(pos.x, pos.y, 0.0),
                    GlobalTransform::default(),
                    Visibility::Visible,
                ));
                if cfg.draw_shapes {
                    let mesh = meshes.add(Mesh::from(Circle {
                        radius: grid.radius,
                    }));
                    e.insert((Mesh2d::from(mesh), MeshMaterial2d(materials.add(OBSTACLE_COLOR))));
                }
            }
        }
        LayoutKind::Slats => {
            let (half_extents, slats) = slat_run(field);
            for slat in &slats {
                let mut e = commands.spawn((
                    BodyKind::Obstacle,
                    RigidBody::Fixed,
                    Collider::cuboid(half_extents.x, half_extents.y),
                    Friction::coefficient(0.05),
                    Transform::from_xyz(slat.center.x, slat.center.y, 0.0)
                        .with_rotation(Quat::from_rotation_z(slat.tilt)),
                    GlobalTransform::default(),
                    Visibility::Visible,
                ));
                if cfg.draw_shapes {
                    let mesh = meshes.add(Mesh::from(Rectangle::new(
                        half_extents.x * 2.0,
                        half_extents.y * 2.0,
                    )));
                    e.insert((Mesh2d::from(mesh), MeshMaterial2d(materials.add(OBSTACLE_COLOR))));
                }
            }
        }
        LayoutKind::Paddlewheels => {
            // Keep the rim clear of the band the swing hangs in.
            let keepout = cfg.pendulum.radius * 2.0;
            for wheel in paddlewheels(field, keepout) {
                spawn_pinned(
                    commands,
                    wheel.center,
                    wheel_collider(wheel.radius),
                    wheel_visual(wheel.radius, cfg, meshes, materials),
                );
            }
        }
        LayoutKind::FacingPaddles => {
            let pair = facing_paddles(field);
            for center in pair.centers {
                spawn_pinned(
                    commands,
                    center,
                    Collider::cuboid(pair.half_extents.x, pair.half_extents.y),
                    paddle_visual(pair.half_extents, cfg, meshes, materials),
                );
            }
        }
    }
}

fn wheel_collider(radius: f32) -> Collider {
    let mut shapes = vec![(Vec2::ZERO, 0.0, Collider::ball(WHEEL_HUB_RADIUS))];
    for i in 0..WHEEL_SPOKES {
        let angle = i as f32 * PI / WHEEL_SPOKES as f32;
        shapes.push((
            Vec2::ZERO,
            angle,
            Collider::cuboid(radius, PADDLE_HALF_THICKNESS),
        ));
    }
    Collider::compound(shapes)
}

type VisualParts = Vec<(Mesh2d, MeshMaterial2d<ColorMaterial>, Transform)>;

fn wheel_visual(
    radius: f32,
    cfg: &SimConfig,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
) -> VisualParts {
    if !cfg.draw_shapes {
        return Vec::new();
    }
    let mat = materials.add(OBSTACLE_COLOR);
    let mut parts = vec![(
        Mesh2d::from(meshes.add(Mesh::from(Circle {
            radius: WHEEL_HUB_RADIUS,
        }))),
        MeshMaterial2d(mat.clone()),
        Transform::default(),
    )];
    let spoke = meshes.add(Mesh::from(Rectangle::new(
        radius * 2.0,
        PADDLE_HALF_THICKNESS * 2.0,
    )));
    for i in 0..WHEEL_SPOKES {
        let angle = i as f32 * PI / WHEEL_SPOKES as f32;
        parts.push((
            Mesh2d::from(spoke.clone()),
            MeshMaterial2d(mat.clone()),
            Transform::from_rotation(Quat::from_rotation_z(angle)),
        ));
    }
    parts
}

fn paddle_visual(
    half_extents: Vec2,
    cfg: &SimConfig,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
) -> VisualParts {
    if !cfg.draw_shapes {
        return Vec::new();
    }
    vec![(
        Mesh2d::from(meshes.add(Mesh::from(Rectangle::new(
            half_extents.x * 2.0,
            half_extents.y * 2.0,
        )))),
        MeshMaterial2d(materials.add(OBSTACLE_COLOR)),
        Transform::default(),
    )]
}

/// One dynamic body pinned to a fixed anchor by a zero-length revolute
/// joint: free rotation about its center, no translation.
fn spawn_pinned(
    commands: &mut Commands,
    center: Vec2,
    collider: Collider,
    visual: VisualParts,
) {
    let anchor = commands
        .spawn((
            BodyKind::Obstacle,
            RigidBody::Fixed,
            Transform::from_xyz(center.x, center.y, 0.0),
            GlobalTransform::default(),
        ))
        .id();
    let joint = RevoluteJointBuilder::new()
        .local_anchor1(Vec2::ZERO)
        .local_anchor2(Vec2::ZERO);
    let mut body = commands.spawn((
        BodyKind::Obstacle,
        RigidBody::Dynamic,
        collider,
        Restitution::coefficient(0.4),
        Friction::coefficient(0.3),
        Damping {
            linear_damping: 0.0,
            angular_damping: 0.05,
        },
        ImpulseJoint::new(anchor, joint),
        Transform::from_xyz(center.x, center.y, 0.0),
        GlobalTransform::default(),
        Visibility::Visible,
    ));
    body.with_children(|parent| {
        for (mesh, material, transform) in visual {
            parent.spawn((mesh, material, transform, GlobalTransform::default()));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Playfield {
        Playfield::new(1000.0, 600.0, 0.0)
    }

    #[test]
    fn roll_covers_all_layouts_in_order() {
        assert_eq!(choose_layout(0.0), LayoutKind::Pegs);
        assert_eq!(choose_layout(0.2), LayoutKind::Pegs);
        assert_eq!(choose_layout(0.26), LayoutKind::Slats);
        assert_eq!(choose_layout(0.51), LayoutKind::Paddlewheels);
        assert_eq!(choose_layout(0.76), LayoutKind::FacingPaddles);
        assert_eq!(choose_layout(1.0), LayoutKind::FacingPaddles);
    }

    #[test]
    fn peg_grid_counts_derive_from_height() {
        let grid = peg_grid(&field(), 8.0);
        // 600 / 75 = 8 rows, 600 / 33.3 = 18 columns.
        assert_eq!(grid.positions.len(), 8 * 18);
    }

    #[test]
    fn peg_grid_is_staggered_and_above_midline() {
        let grid = peg_grid(&field(), 8.0);
        let cols = 18;
        let first_row_x = grid.positions[0].x;
        let second_row_x = grid.positions[cols].x;
        let pitch_x = grid.positions[1].x - grid.positions[0].x;
        assert!((second_row_x - first_row_x - pitch_x * 0.5).abs() < 1e-3);
        let avg_y: f32 =
            grid.positions.iter().map(|p| p.y).sum::<f32>() / grid.positions.len() as f32;
        assert!(avg_y > 0.0, "grid should sit above the midline, avg_y={avg_y}");
    }

    #[test]
    fn slats_alternate_tilt_and_offset() {
        let (_, slats) = slat_run(&field());
        assert_eq!(slats.len(), 4); // 600 / 150
        for pair in slats.windows(2) {
            assert!(pair[0].tilt * pair[1].tilt < 0.0, "tilt must alternate");
            assert!(pair[0].center.x * pair[1].center.x < 0.0, "offset must alternate");
            assert!(pair[0].center.y > pair[1].center.y, "stack runs downward");
        }
    }

    #[test]
    fn right_wheel_shrinks_away_from_swing_band() {
        // Narrow field: rim at x = 250 - r would cross a 110-wide band.
        let narrow = Playfield::new(800.0, 600.0, 0.0);
        let [left, right] = paddlewheels(&narrow, 110.0);
        assert!(left.radius > right.radius);
        assert!((right.center.x - right.radius) >= 110.0 - 1e-3);
        // Wide field: no adjustment.
        let wide = Playfield::new(2000.0, 600.0, 0.0);
        let [l2, r2] = paddlewheels(&wide, 110.0);
        assert_eq!(l2.radius, r2.radius);
    }

    #[test]
    fn facing_paddles_are_symmetric_at_center_height() {
        let pair = facing_paddles(&field());
        assert_eq!(pair.centers[0].y, 0.0);
        assert_eq!(pair.centers[1].y, 0.0);
        assert_eq!(pair.centers[0].x, -pair.centers[1].x);
    }
}
