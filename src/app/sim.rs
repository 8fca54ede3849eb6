// This file is part of Emoji Rain.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bevy::prelude::*;
use bevy::sprite::MeshMaterial2d;
use bevy::window::WindowResized;
use bevy_rapier2d::prelude::{Collider, RigidBody};
use rand::{Rng, SeedableRng};

use crate::app::state::SimState;
use crate::core::components::{BodyKind, RngSeed};
use crate::core::config::config::SimConfig;
use crate::core::events::{ClearAllEmojis, RebuildWorld, SpawnEmoji};
use crate::core::level::course::{build_course, choose_layout, ActiveLayout, LayoutKind};
use crate::core::playfield::Playfield;
use crate::core::system::system_order::{PostPhysicsAdjustSet, PrePhysicsSet};
use crate::debug::DebugPlugin;
use crate::gameplay::population::{EmojiPopulation, PopulationPlugin};
use crate::interaction::session::auto_close::AutoClosePlugin;
use crate::physics::pendulum::{attach_pendulum, PendulumPlugin};
use crate::physics::rapier_setup::PhysicsSetupPlugin;
use crate::rendering::camera::CameraPlugin;
use crate::rendering::glyphs::GlyphCachePlugin;

pub const BOUNDARY_HALF_THICKNESS: f32 = 20.0;
/// The bottom shelf floats this far above the true bottom edge, so balls
/// pushed past its ends drain out and get culled.
pub const BOTTOM_RAISE: f32 = 30.0;
/// Fraction of the playfield width the bottom shelf spans.
pub const BOTTOM_WIDTH_FRAC: f32 = 0.8;

const SHELF_COLOR: Color = Color::srgb(0.35, 0.37, 0.42);

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<SimState>()
            .add_event::<SpawnEmoji>()
            .add_event::<ClearAllEmojis>()
            .add_event::<RebuildWorld>()
            .init_resource::<Playfield>()
            .configure_sets(
                Update,
                (PrePhysicsSet, PostPhysicsAdjustSet.after(PrePhysicsSet)),
            )
            .add_plugins((
                CameraPlugin,
                PhysicsSetupPlugin,
                GlyphCachePlugin,
                PopulationPlugin,
                PendulumPlugin,
                AutoClosePlugin,
                DebugPlugin,
            ))
            .add_systems(Startup, capture_playfield)
            .add_systems(PostStartup, request_initial_build)
            .add_systems(
                Update,
                (handle_resize, rebuild_world).chain().before(PrePhysicsSet),
            );
    }
}

/// Capture initial playfield dimensions from the primary window; headless
/// hosts (tests) fall back to the configured window size.
fn capture_playfield(
    mut field: ResMut<Playfield>,
    cfg: Res<SimConfig>,
    windows: Query<&Window>,
) {
    let (width, height) = windows
        .single()
        .map(|w| (w.width(), w.height()))
        .unwrap_or((cfg.window.width, cfg.window.height));
    *field = Playfield::new(width, height, 0.0);
}

fn request_initial_build(mut rebuild: EventWriter<RebuildWorld>) {
    rebuild.write(RebuildWorld);
}

/// Any resize discards and rebuilds the whole world; the layout re-rolls.
/// Resizing is a fresh start, not a proportional re-layout.
fn handle_resize(
    mut resized: EventReader<WindowResized>,
    mut field: ResMut<Playfield>,
    mut rebuild: EventWriter<RebuildWorld>,
) {
    let Some(last) = resized.read().last() else {
        return;
    };
    if (last.width - field.width).abs() < 0.5 && (last.height - field.height).abs() < 0.5 {
        return;
    }
    field.width = last.width;
    field.height = last.height;
    rebuild.write(RebuildWorld);
}

/// Clear every body and constraint, then raise boundaries, one obstacle
/// course and the pendulum from the current playfield. Safe to run any
/// number of times.
pub fn rebuild_world(
    mut events: EventReader<RebuildWorld>,
    mut commands: Commands,
    q_bodies: Query<Entity, With<BodyKind>>,
    field: Res<Playfield>,
    cfg: Res<SimConfig>,
    seed: Option<Res<RngSeed>>,
    mut population: ResMut<EmojiPopulation>,
    mut images: ResMut<Assets<Image>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    for entity in q_bodies.iter() {
        commands.entity(entity).despawn();
    }
    population.0 = 0;

    let top = spawn_boundaries(&mut commands, &field, &cfg, &mut meshes, &mut materials);

    let kind = match LayoutKind::parse(&cfg.course.layout) {
        Some(kind) => kind,
        None => {
            // Separate stream from any other seeded randomness.
            let roll = match seed {
                Some(s) => rand::rngs::StdRng::seed_from_u64(s.0.wrapping_add(0x0C0_5E17)).gen(),
                None => rand::thread_rng().gen(),
            };
            choose_layout(roll)
        }
    };
    commands.insert_resource(ActiveLayout(kind));
    build_course(&mut commands, kind, &field, &cfg, &mut meshes, &mut materials);
    attach_pendulum(
        &mut commands,
        top,
        &field,
        &cfg,
        &mut images,
        &mut meshes,
        &mut materials,
    );
    info!(
        target: "world",
        "rebuilt {:.0}x{:.0} playfield with layout {}",
        field.width,
        field.height,
        kind.as_str()
    );
}

/// Two static strips: an invisible one sealing the top (it also parks the
/// swing anchor) and the visible bottom shelf at 80% width.
fn spawn_boundaries(
    commands: &mut Commands,
    field: &Playfield,
    cfg: &SimConfig,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
) -> Entity {
    let top = commands
        .spawn((
            BodyKind::Boundary,
            RigidBody::Fixed,
            Collider::cuboid(field.half_width(), BOUNDARY_HALF_THICKNESS),
            Transform::from_xyz(
                0.0,
                field.half_height() + BOUNDARY_HALF_THICKNESS,
                0.0,
            ),
            GlobalTransform::default(),
        ))
        .id();

    let shelf_half_width = field.width * BOTTOM_WIDTH_FRAC * 0.5;
    let mut shelf = commands.spawn((
        BodyKind::Boundary,
        RigidBody::Fixed,
        Collider::cuboid(shelf_half_width, BOUNDARY_HALF_THICKNESS),
        Transform::from_xyz(0.0, -field.half_height() + BOTTOM_RAISE, 0.0),
        GlobalTransform::default(),
        Visibility::Visible,
    ));
    if cfg.draw_shapes {
        shelf.insert((
            Mesh2d::from(meshes.add(Mesh::from(Rectangle::new(
                shelf_half_width * 2.0,
                BOUNDARY_HALF_THICKNESS * 2.0,
            )))),
            MeshMaterial2d(materials.add(SHELF_COLOR)),
        ));
    }
    top
}
