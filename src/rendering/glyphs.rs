//! Glyph texture cache.
//!
//! One bitmap per distinct symbol, rasterized lazily and never evicted (the
//! practical symbol alphabet is small). A single scratch buffer is cleared
//! and reused for every rasterization so cache misses do not allocate a
//! working surface per call.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use std::collections::HashMap;

use crate::core::config::config::SimConfig;

/// TTFs tried in order at startup; the first one that parses wins.
const FONT_SEARCH: [&str; 2] = [
    "assets/fonts/NotoEmoji-Regular.ttf",
    "assets/fonts/FiraSans-Bold.ttf",
];

#[derive(Resource)]
pub struct GlyphCache {
    font: Option<fontdue::Font>,
    glyph_px: u32,
    scratch: Vec<u8>,
    entries: HashMap<String, Handle<Image>>,
    rasterizations: usize,
}

impl GlyphCache {
    pub fn new(font: Option<fontdue::Font>, glyph_px: u32) -> Self {
        Self {
            font,
            glyph_px: glyph_px.max(1),
            scratch: Vec::new(),
            entries: HashMap::new(),
            rasterizations: 0,
        }
    }

    /// Cached handle for `symbol`, rasterizing on first sight. Malformed or
    /// unrenderable input degrades to a blank glyph; this never fails.
    pub fn get(&mut self, symbol: &str, images: &mut Assets<Image>) -> Handle<Image> {
        if let Some(handle) = self.entries.get(symbol) {
            return handle.clone();
        }
        let image = self.rasterize(symbol);
        self.rasterizations += 1;
        let handle = images.add(image);
        self.entries.insert(symbol.to_owned(), handle.clone());
        handle
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total rasterization passes performed (cache hits do none).
    pub fn rasterizations(&self) -> usize {
        self.rasterizations
    }

    fn rasterize(&mut self, symbol: &str) -> Image {
        let size = self.glyph_px as usize;
        self.scratch.clear();
        self.scratch.resize(size * size * 4, 0);

        let ch = symbol.chars().find(|c| !c.is_whitespace());
        if let (Some(font), Some(ch)) = (self.font.as_ref(), ch) {
            let (metrics, coverage) = font.rasterize(ch, self.glyph_px as f32 * 0.85);
            let ox = size.saturating_sub(metrics.width) / 2;
            let oy = size.saturating_sub(metrics.height) / 2;
            for y in 0..metrics.height.min(size) {
                for x in 0..metrics.width.min(size) {
                    let alpha = coverage[y * metrics.width + x];
                    if alpha == 0 {
                        continue;
                    }
                    let px = (ox + x).min(size - 1);
                    let py = (oy + y).min(size - 1);
                    let idx = (py * size + px) * 4;
                    self.scratch[idx] = 0xff;
                    self.scratch[idx + 1] = 0xff;
                    self.scratch[idx + 2] = 0xff;
                    self.scratch[idx + 3] = alpha;
                }
            }
        }
        // Without a font (or for pure-whitespace input) the scratch stays
        // fully transparent: the blank-glyph fallback.

        Image::new(
            Extent3d {
                width: self.glyph_px,
                height: self.glyph_px,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            self.scratch.clone(),
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::default(),
        )
    }
}

pub struct GlyphCachePlugin;

impl Plugin for GlyphCachePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_glyph_cache);
    }
}

fn setup_glyph_cache(mut commands: Commands, cfg: Res<SimConfig>) {
    let mut loaded: Option<fontdue::Font> = None;
    for path in FONT_SEARCH {
        if let Ok(bytes) = std::fs::read(path) {
            match fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default()) {
                Ok(f) => {
                    info!(target: "glyphs", "loaded font '{path}' for glyph rasterization");
                    loaded = Some(f);
                    break;
                }
                Err(e) => warn!(target: "glyphs", "failed to parse font '{path}': {e}"),
            }
        }
    }
    if loaded.is_none() {
        warn!(target: "glyphs", "no font available; all glyphs will render blank");
    }
    commands.insert_resource(GlyphCache::new(loaded, cfg.emoji.glyph_px));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_lookups_reuse_the_cached_handle() {
        let mut images = Assets::<Image>::default();
        let mut cache = GlyphCache::new(None, 32);
        let a = cache.get("🔥", &mut images);
        let b = cache.get("🔥", &mut images);
        assert_eq!(a, b);
        assert_eq!(cache.rasterizations(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_symbols_rasterize_once_each() {
        let mut images = Assets::<Image>::default();
        let mut cache = GlyphCache::new(None, 32);
        let a = cache.get("🔥", &mut images);
        let b = cache.get("✨", &mut images);
        assert_ne!(a, b);
        assert_eq!(cache.rasterizations(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn fontless_rasterization_yields_a_blank_square() {
        let mut images = Assets::<Image>::default();
        let mut cache = GlyphCache::new(None, 16);
        let handle = cache.get("?", &mut images);
        let image = images.get(&handle).expect("image stored");
        let data = image.data.as_ref().expect("cpu-side data");
        assert_eq!(data.len(), 16 * 16 * 4);
        assert!(data.iter().all(|b| *b == 0), "blank glyph must be transparent");
    }
}
