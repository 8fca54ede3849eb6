use bevy::prelude::*;

use emoji_rain::{SimConfig, SimulationPlugin};

fn main() {
    // Load configuration (fall back to defaults if missing or malformed).
    let cfg = SimConfig::load_from_file("assets/config/sim.ron").unwrap_or_else(|e| {
        eprintln!("config unavailable ({e:#}); using defaults");
        SimConfig::default()
    });
    for warning in cfg.validate() {
        eprintln!("config: {warning}");
    }

    App::new()
        .insert_resource(cfg.clone())
        .add_plugins(
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: cfg.window.title.clone(),
                    resolution: (cfg.window.width, cfg.window.height).into(),
                    resizable: true,
                    ..default()
                }),
                ..default()
            }),
        )
        .add_plugins(SimulationPlugin)
        .run();
}
