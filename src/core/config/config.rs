use anyhow::Context;
use bevy::prelude::*;
use serde::Deserialize;
use std::{f32::consts::PI, fs, path::Path};

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Emoji Rain".into(),
            auto_close: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GravityConfig {
    pub y: f32,
}
impl Default for GravityConfig {
    fn default() -> Self {
        Self { y: -600.0 }
    }
}

/// Tuning for the transient falling balls.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EmojiConfig {
    pub radius: f32,
    pub restitution: f32,
    pub friction: f32,
    pub linear_damping: f32,
    /// Population cap; spawns beyond it are rejected outright.
    pub max_live: usize,
    /// Spawn x jitter around center, as a fraction of playfield width.
    pub spawn_jitter_pct: f32,
    /// Edge length of the square glyph bitmap, in pixels.
    pub glyph_px: u32,
}
impl Default for EmojiConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            restitution: 0.7,
            friction: 0.05,
            linear_damping: 0.0,
            max_live: 1000,
            spawn_jitter_pct: 0.02,
            glyph_px: 32,
        }
    }
}

/// Tuning for the driven swing.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PendulumConfig {
    pub radius: f32,
    /// Magnitude of the constant horizontal drive force.
    pub drive_force: f32,
    /// |theta| (radians from vertical) past which a leftward swing reverses.
    pub flip_out: f32,
    /// |theta| below which a rightward swing reverses.
    pub flip_in: f32,
}
impl Default for PendulumConfig {
    fn default() -> Self {
        Self {
            radius: 55.0,
            drive_force: 9.0e6,
            flip_out: 0.7 * PI,
            flip_in: 0.3 * PI,
        }
    }
}

/// Obstacle course selection and tuning.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CourseConfig {
    /// "Random", or a layout name to pin ("Pegs", "Slats", "Paddlewheels",
    /// "FacingPaddles"). Unknown names fall back to Random with a warning.
    pub layout: String,
    pub peg_radius: f32,
    pub peg_restitution: f32,
}
impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            layout: "Random".into(),
            peg_radius: 8.0,
            peg_restitution: 0.5,
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub window: WindowConfig,
    pub gravity: GravityConfig,
    pub emoji: EmojiConfig,
    pub pendulum: PendulumConfig,
    pub course: CourseConfig,
    pub rapier_debug: bool,
    /// Attach plain meshes to obstacles / boundaries so the scene is visible
    /// without an external renderer.
    pub draw_shapes: bool,
}
impl Default for SimConfig {
    fn default() -> Self {
        Self {
            window: Default::default(),
            gravity: Default::default(),
            emoji: Default::default(),
            pendulum: Default::default(),
            course: Default::default(),
            rapier_debug: false,
            draw_shapes: true,
        }
    }
}

impl SimConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let cfg: SimConfig =
            ron::from_str(&txt).with_context(|| format!("parse config {}", path.display()))?;
        Ok(cfg)
    }

    /// Non-fatal sanity warnings, logged once at startup.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        }
        if self.gravity.y.abs() < 1e-4 {
            w.push("gravity.y magnitude near zero; balls may float".into());
        }
        if self.gravity.y > 0.0 {
            w.push(format!(
                "gravity.y is positive ({}); Y-up world? typical configs use negative for downward",
                self.gravity.y
            ));
        }
        if self.emoji.radius <= 0.0 {
            w.push("emoji.radius must be > 0".into());
        }
        if !(0.0..=1.5).contains(&self.emoji.restitution) {
            w.push(format!(
                "emoji.restitution {} outside recommended 0..1.5",
                self.emoji.restitution
            ));
        }
        if self.emoji.max_live == 0 {
            w.push("emoji.max_live is 0; nothing will spawn".into());
        }
        if self.emoji.max_live > 50_000 {
            w.push(format!(
                "emoji.max_live {} very high; performance may suffer",
                self.emoji.max_live
            ));
        }
        if !(0.0..=0.5).contains(&self.emoji.spawn_jitter_pct) {
            w.push(format!(
                "emoji.spawn_jitter_pct {} outside 0..0.5; spawns may leave the playfield",
                self.emoji.spawn_jitter_pct
            ));
        }
        if self.emoji.glyph_px == 0 {
            w.push("emoji.glyph_px is 0; glyphs will be blank".into());
        }
        if self.pendulum.radius <= 0.0 {
            w.push("pendulum.radius must be > 0".into());
        }
        if self.pendulum.drive_force <= 0.0 {
            w.push("pendulum.drive_force <= 0; the swing will not self-sustain".into());
        }
        if !(0.0 < self.pendulum.flip_in
            && self.pendulum.flip_in < self.pendulum.flip_out
            && self.pendulum.flip_out < PI)
        {
            w.push(format!(
                "pendulum flip thresholds must satisfy 0 < flip_in ({}) < flip_out ({}) < pi",
                self.pendulum.flip_in, self.pendulum.flip_out
            ));
        }
        if self.course.layout != "Random"
            && crate::core::level::course::LayoutKind::parse(&self.course.layout).is_none()
        {
            w.push(format!(
                "course.layout '{}' unknown; falling back to Random",
                self.course.layout
            ));
        }
        if self.course.peg_radius <= 0.0 {
            w.push("course.peg_radius must be > 0".into());
        }
        w
    }
}
