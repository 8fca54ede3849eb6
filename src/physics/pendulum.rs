//! The driven swing.
//!
//! One large ball hangs from a rope anchored at top-center and is kept
//! oscillating by a direction-reversing horizontal force instead of passive
//! gravity alone, so the element stays active indefinitely. Rotation is
//! locked: collisions translate the bob along its arc but never spin it.

use bevy::prelude::*;
use bevy::sprite::MeshMaterial2d;
use bevy_rapier2d::prelude::{
    Collider, ExternalForce, Friction, ImpulseJoint, LockedAxes, Restitution, RigidBody,
    RopeJointBuilder, Velocity,
};
use bevy::asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use std::f32::consts::FRAC_PI_2;

use crate::app::sim::{BOTTOM_RAISE, BOUNDARY_HALF_THICKNESS};
use crate::app::state::SimState;
use crate::core::components::{BallRadius, BodyKind, SwingDirection};
use crate::core::config::config::SimConfig;
use crate::core::playfield::Playfield;
use crate::core::system::system_order::PrePhysicsSet;

/// Sprite tried for the bob; on any load/decode failure the bob stays
/// physically present but visually unadorned.
const BOB_SPRITE: &str = "assets/sprites/pendulum.png";
/// Clearance between the resting bob and the bottom shelf.
const REST_GAP: f32 = 4.0;

/// Oscillation state of the bob. Position lives in `Transform`.
#[derive(Component, Debug)]
pub struct Swing {
    pub direction: SwingDirection,
}

/// Direction transition law. `theta_abs` is |angle from vertical|.
/// A leftward swing reverses only past `flip_out`; a rightward swing
/// reverses only once it has come back inside `flip_in`.
pub fn next_direction(
    direction: SwingDirection,
    theta_abs: f32,
    flip_out: f32,
    flip_in: f32,
) -> SwingDirection {
    match direction {
        SwingDirection::Left if theta_abs > flip_out => SwingDirection::Right,
        SwingDirection::Right if theta_abs < flip_in => SwingDirection::Left,
        d => d,
    }
}

/// Drive law: the constant horizontal force applies only while the bob is in
/// the half of the arc before its direction's target extreme.
pub fn drive_sign(direction: SwingDirection, theta_abs: f32) -> Option<f32> {
    match direction {
        SwingDirection::Left if theta_abs < FRAC_PI_2 => Some(-1.0),
        SwingDirection::Right if theta_abs > FRAC_PI_2 => Some(1.0),
        _ => None,
    }
}

pub struct PendulumPlugin;

impl Plugin for PendulumPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            pendulum_drive
                .in_set(PrePhysicsSet)
                .run_if(in_state(SimState::Running)),
        );
    }
}

/// Spawn the bob, roped to `anchor_body` (the top boundary strip). The rope
/// rest length parks the bob just above the bottom shelf.
pub fn attach_pendulum(
    commands: &mut Commands,
    anchor_body: Entity,
    field: &Playfield,
    cfg: &SimConfig,
    images: &mut Assets<Image>,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
) {
    let radius = cfg.pendulum.radius;
    let shelf_top = -field.half_height() + BOTTOM_RAISE + BOUNDARY_HALF_THICKNESS;
    let rest_y = shelf_top + radius + REST_GAP;
    let rope_len = (field.half_height() - rest_y).max(radius);
    // The joint parent is the top strip; offset its local anchor down to the
    // exact top edge of the playfield.
    let rope = RopeJointBuilder::new(rope_len)
        .local_anchor1(Vec2::new(0.0, -BOUNDARY_HALF_THICKNESS))
        .local_anchor2(Vec2::ZERO);

    let mut bob = commands.spawn((
        BodyKind::Pendulum,
        Swing {
            direction: SwingDirection::Left,
        },
        BallRadius(radius),
        RigidBody::Dynamic,
        Collider::ball(radius),
        LockedAxes::ROTATION_LOCKED,
        Restitution::coefficient(0.5),
        Friction::coefficient(0.1),
        Velocity::zero(),
        ExternalForce::default(),
        ImpulseJoint::new(anchor_body, rope),
        Transform::from_xyz(0.0, rest_y, 1.0),
        GlobalTransform::default(),
        Visibility::Visible,
    ));

    match load_bob_sprite(images) {
        Ok(image) => {
            bob.insert(Sprite {
                image,
                custom_size: Some(Vec2::splat(radius * 2.0)),
                ..default()
            });
        }
        Err(e) => {
            warn!(target: "pendulum", "bob sprite unavailable ({e}); rendering plain circle");
            if cfg.draw_shapes {
                bob.insert((
                    Mesh2d::from(meshes.add(Mesh::from(Circle { radius }))),
                    MeshMaterial2d(materials.add(Color::srgb(0.85, 0.3, 0.3))),
                ));
            }
        }
    }
}

fn load_bob_sprite(images: &mut Assets<Image>) -> Result<Handle<Image>, String> {
    let bytes = std::fs::read(BOB_SPRITE).map_err(|e| format!("read {BOB_SPRITE}: {e}"))?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| format!("decode {BOB_SPRITE}: {e}"))?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    Ok(images.add(Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        decoded.into_raw(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )))
}

/// Per physics tick: update the swing direction state machine and apply the
/// drive force at the bob's center.
fn pendulum_drive(
    cfg: Res<SimConfig>,
    field: Res<Playfield>,
    mut q_bob: Query<(&Transform, &mut Swing, &mut ExternalForce)>,
) {
    let anchor = Vec2::new(0.0, field.half_height());
    for (transform, mut swing, mut force) in q_bob.iter_mut() {
        let d = transform.translation.truncate() - anchor;
        // Angle from vertical: 0 hanging straight down, positive to the right.
        let theta = d.x.atan2(-d.y);
        let next = next_direction(
            swing.direction,
            theta.abs(),
            cfg.pendulum.flip_out,
            cfg.pendulum.flip_in,
        );
        if next != swing.direction {
            debug!(target: "pendulum", "reversal to {:?} at |theta|={:.2}", next, theta.abs());
            swing.direction = next;
        }
        force.force = match drive_sign(swing.direction, theta.abs()) {
            Some(sign) => Vec2::new(sign * cfg.pendulum.drive_force, 0.0),
            None => Vec2::ZERO,
        };
    }
}
