use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use bevy_rapier2d::render::DebugRenderContext;

use crate::app::state::SimState;
use crate::core::config::config::SimConfig;

/// Wrapper configuring Rapier: downward gravity from config, fixed-step
/// integration decoupled from render rate, and pipeline pause on `Stopped`.
pub struct PhysicsSetupPlugin;

impl Plugin for PhysicsSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            RapierPhysicsPlugin::<NoUserData>::default(),
            RapierDebugRenderPlugin::default(),
        ))
        .insert_resource(TimestepMode::Fixed {
            dt: 1.0 / 60.0,
            substeps: 1,
        })
        .add_systems(Startup, configure_physics)
        .add_systems(OnEnter(SimState::Stopped), pause_pipeline)
        .add_systems(OnEnter(SimState::Running), resume_pipeline);
    }
}

fn configure_physics(
    mut rapier_cfg: Query<&mut RapierConfiguration>,
    cfg: Res<SimConfig>,
    debug_ctx: Option<ResMut<DebugRenderContext>>,
) {
    for mut rapier_cfg in rapier_cfg.iter_mut() {
        rapier_cfg.gravity = Vect::new(0.0, cfg.gravity.y);
    }
    if let Some(mut ctx) = debug_ctx {
        ctx.enabled = cfg.rapier_debug;
    }
}

fn pause_pipeline(mut rapier_cfg: Query<&mut RapierConfiguration>) {
    for mut rapier_cfg in rapier_cfg.iter_mut() {
        rapier_cfg.physics_pipeline_active = false;
    }
}

fn resume_pipeline(mut rapier_cfg: Query<&mut RapierConfiguration>) {
    for mut rapier_cfg in rapier_cfg.iter_mut() {
        rapier_cfg.physics_pipeline_active = true;
    }
}
