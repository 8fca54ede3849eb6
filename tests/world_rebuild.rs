//! World lifecycle scenarios: rebuild idempotence, the population cap
//! end-to-end, and clear-all sparing the fixed bodies.

use bevy::prelude::*;

use emoji_rain::app::sim::rebuild_world;
use emoji_rain::core::level::course::{body_count, ActiveLayout, LayoutKind};
use emoji_rain::gameplay::population::{
    clear_all_emojis, cleanup_offscreen, spawn_emojis, EmojiPopulation,
};
use emoji_rain::rendering::glyphs::GlyphCache;
use emoji_rain::{
    BodyKind, ClearAllEmojis, Playfield, RebuildWorld, RngSeed, SimConfig, SimState, SpawnEmoji,
};

fn world_app(layout: &str) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(bevy::state::app::StatesPlugin);
    app.init_state::<SimState>();
    app.add_event::<SpawnEmoji>();
    app.add_event::<ClearAllEmojis>();
    app.add_event::<RebuildWorld>();
    let mut cfg = SimConfig::default();
    cfg.draw_shapes = false;
    cfg.course.layout = layout.into();
    app.insert_resource(cfg);
    app.insert_resource(Playfield::new(1000.0, 600.0, 0.0));
    app.init_resource::<EmojiPopulation>();
    app.init_resource::<Assets<Image>>();
    app.init_resource::<Assets<Mesh>>();
    app.init_resource::<Assets<ColorMaterial>>();
    app.insert_resource(GlyphCache::new(None, 32));
    app.add_systems(
        Update,
        (rebuild_world, clear_all_emojis, spawn_emojis, cleanup_offscreen).chain(),
    );
    app
}

fn kind_count(app: &mut App, kind: BodyKind) -> usize {
    let world = app.world_mut();
    let mut q = world.query::<&BodyKind>();
    q.iter(world).filter(|k| **k == kind).count()
}

#[test]
fn construction_raises_boundaries_course_and_pendulum() {
    let mut app = world_app("Pegs");
    app.world_mut().send_event(RebuildWorld);
    app.update();

    assert_eq!(kind_count(&mut app, BodyKind::Boundary), 2);
    assert_eq!(kind_count(&mut app, BodyKind::Pendulum), 1);
    let field = Playfield::new(1000.0, 600.0, 0.0);
    let cfg = app.world().resource::<SimConfig>().clone();
    assert_eq!(
        kind_count(&mut app, BodyKind::Obstacle),
        body_count(LayoutKind::Pegs, &field, &cfg)
    );
}

#[test]
fn repeated_rebuilds_never_accumulate_bodies() {
    let mut app = world_app("Paddlewheels");
    for _ in 0..4 {
        app.world_mut().send_event(RebuildWorld);
        app.update();
    }
    assert_eq!(kind_count(&mut app, BodyKind::Boundary), 2);
    assert_eq!(kind_count(&mut app, BodyKind::Pendulum), 1);
    assert_eq!(kind_count(&mut app, BodyKind::Obstacle), 4);
}

#[test]
fn rebuild_swaps_layouts_without_remnants() {
    let mut app = world_app("Pegs");
    app.world_mut().send_event(RebuildWorld);
    app.update();
    let pegs = kind_count(&mut app, BodyKind::Obstacle);
    assert!(pegs > 4);

    app.world_mut()
        .resource_mut::<SimConfig>()
        .course
        .layout = "FacingPaddles".into();
    app.world_mut().send_event(RebuildWorld);
    app.update();
    assert_eq!(kind_count(&mut app, BodyKind::Obstacle), 4);
    assert_eq!(
        app.world().resource::<ActiveLayout>().0,
        LayoutKind::FacingPaddles
    );
}

#[test]
fn rebuild_discards_live_balls_and_resets_the_counter() {
    let mut app = world_app("Slats");
    app.world_mut().send_event(RebuildWorld);
    app.update();
    for _ in 0..20 {
        app.world_mut().send_event(SpawnEmoji("💧".into()));
    }
    app.update();
    assert_eq!(app.world().resource::<EmojiPopulation>().0, 20);

    app.world_mut().send_event(RebuildWorld);
    app.update();
    assert_eq!(kind_count(&mut app, BodyKind::EmojiBall), 0);
    assert_eq!(app.world().resource::<EmojiPopulation>().0, 0);
}

#[test]
fn seeded_layout_roll_is_deterministic() {
    let layout_for_seed = |seed: u64| {
        let mut app = world_app("Random");
        app.insert_resource(RngSeed(seed));
        app.world_mut().send_event(RebuildWorld);
        app.update();
        app.world().resource::<ActiveLayout>().0
    };
    assert_eq!(layout_for_seed(7), layout_for_seed(7));
    assert_eq!(layout_for_seed(1234), layout_for_seed(1234));
}

#[test]
fn thousand_ball_scenario_end_to_end() {
    let mut app = world_app("Paddlewheels");
    app.world_mut().send_event(RebuildWorld);
    app.update();

    for _ in 0..1001 {
        app.world_mut().send_event(SpawnEmoji("🔥".into()));
    }
    app.update();
    assert_eq!(app.world().resource::<EmojiPopulation>().0, 1000);
    assert_eq!(kind_count(&mut app, BodyKind::EmojiBall), 1000);

    app.world_mut().send_event(ClearAllEmojis);
    app.update();
    assert_eq!(app.world().resource::<EmojiPopulation>().0, 0);
    assert_eq!(kind_count(&mut app, BodyKind::EmojiBall), 0);
    // Fixed bodies untouched by the clear.
    assert_eq!(kind_count(&mut app, BodyKind::Boundary), 2);
    assert_eq!(kind_count(&mut app, BodyKind::Pendulum), 1);
    assert_eq!(kind_count(&mut app, BodyKind::Obstacle), 4);
}
