//! Bounded population of transient emoji balls.
//!
//! Spawns are driven by upstream `SpawnEmoji` events and capped at
//! `emoji.max_live`; a per-frame cleanup pass culls balls that leave the
//! playfield through the left, right or bottom edge. The tracked counter
//! equals the number of live `BodyKind::EmojiBall` entities at all times.

use bevy::prelude::*;
use bevy_rapier2d::prelude::{Collider, Damping, Friction, Restitution, RigidBody, Velocity};
use rand::Rng;

use crate::app::state::SimState;
use crate::core::components::{BallRadius, BodyKind, EmojiBall};
use crate::core::config::config::SimConfig;
use crate::core::events::{ClearAllEmojis, SpawnEmoji};
use crate::core::playfield::Playfield;
use crate::core::system::system_order::{PostPhysicsAdjustSet, PrePhysicsSet};
use crate::rendering::glyphs::GlyphCache;

/// Live transient-ball count. Incremented exactly once per successful spawn,
/// decremented exactly once per removal.
#[derive(Resource, Debug, Default, Copy, Clone)]
pub struct EmojiPopulation(pub usize);

pub struct PopulationPlugin;

impl Plugin for PopulationPlugin {
    fn build(&self, app: &mut App) {
        // Clear-before-spawn keeps the counter equal to the live bodies even
        // when both requests land on the same frame; both run after the
        // rebuild pass (ordered before PrePhysicsSet by the orchestrator).
        app.init_resource::<EmojiPopulation>()
            .add_systems(
                Update,
                (
                    clear_all_emojis,
                    spawn_emojis.run_if(in_state(SimState::Running)),
                )
                    .chain()
                    .in_set(PrePhysicsSet),
            )
            .add_systems(
                Update,
                cleanup_offscreen
                    .in_set(PostPhysicsAdjustSet)
                    .run_if(in_state(SimState::Running)),
            );
    }
}

/// Drain pending spawn requests. Requests at the cap are rejected with no
/// side effect on the counter.
pub fn spawn_emojis(
    mut commands: Commands,
    mut events: EventReader<SpawnEmoji>,
    cfg: Res<SimConfig>,
    field: Res<Playfield>,
    mut population: ResMut<EmojiPopulation>,
    mut glyphs: ResMut<GlyphCache>,
    mut images: ResMut<Assets<Image>>,
) {
    let mut rng = rand::thread_rng();
    for SpawnEmoji(symbol) in events.read() {
        if population.0 >= cfg.emoji.max_live {
            debug!(target: "population", "spawn of '{symbol}' rejected at cap {}", cfg.emoji.max_live);
            continue;
        }
        let texture = glyphs.get(symbol, &mut images);
        let radius = cfg.emoji.radius;
        let jitter = field.width * cfg.emoji.spawn_jitter_pct;
        let x = if jitter > 0.0 {
            rng.gen_range(-jitter..=jitter)
        } else {
            0.0
        };
        let y = field.half_height() - radius;
        commands.spawn((
            BodyKind::EmojiBall,
            EmojiBall {
                symbol: symbol.clone(),
            },
            BallRadius(radius),
            RigidBody::Dynamic,
            Collider::ball(radius),
            Velocity::zero(),
            Restitution::coefficient(cfg.emoji.restitution),
            Friction::coefficient(cfg.emoji.friction),
            Damping {
                linear_damping: cfg.emoji.linear_damping,
                angular_damping: 0.0,
            },
            Sprite {
                image: texture,
                custom_size: Some(Vec2::splat(radius * 2.0)),
                ..default()
            },
            Transform::from_xyz(x, y, 0.0),
            GlobalTransform::default(),
            Visibility::Visible,
        ));
        population.0 += 1;
    }
}

/// Once per rendered frame: remove every transient ball that has fully left
/// the playfield. Keyed on `BodyKind`, so the pendulum and circular obstacle
/// pieces are never candidates.
pub fn cleanup_offscreen(
    mut commands: Commands,
    field: Res<Playfield>,
    mut population: ResMut<EmojiPopulation>,
    q_bodies: Query<(Entity, &Transform, &BallRadius, &BodyKind)>,
) {
    for (entity, transform, radius, kind) in q_bodies.iter() {
        if *kind != BodyKind::EmojiBall {
            continue;
        }
        if field.is_out_of_bounds(transform.translation.truncate(), radius.0) {
            commands.entity(entity).despawn();
            population.0 = population.0.saturating_sub(1);
        }
    }
}

/// Explicit reset from the host: every transient ball goes, regardless of
/// position; pendulum, boundaries and obstacles stay.
pub fn clear_all_emojis(
    mut commands: Commands,
    mut events: EventReader<ClearAllEmojis>,
    mut population: ResMut<EmojiPopulation>,
    q_bodies: Query<(Entity, &BodyKind)>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();
    let mut removed = 0usize;
    for (entity, kind) in q_bodies.iter() {
        if *kind == BodyKind::EmojiBall {
            commands.entity(entity).despawn();
            removed += 1;
        }
    }
    population.0 = 0;
    info!(target: "population", "clear-all removed {removed} balls");
}
