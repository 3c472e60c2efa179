//! Tile atlases: id ranges, tile lookup, and a one-tile read cache.

use macroquad::color::Color;

use crate::assets::{asset_key, AssetProvider};
use crate::error::LoadError;
use crate::map::AtlasDescriptor;
use crate::pixels::PixelBuffer;

/// Last block read from an atlas, keyed by its pixel-space origin.
#[derive(Debug, Default)]
pub struct TileCache {
    origin: Option<(u32, u32)>,
    block: Vec<Color>,
    misses: usize,
}

impl TileCache {
    /// Number of times the source image was actually read.
    pub fn misses(&self) -> usize {
        self.misses
    }
}

/// A tile atlas with its pixel source attached.
///
/// Each render pass builds its own `AtlasIndex` values, so the cache is
/// never shared between passes.
#[derive(Debug)]
pub struct AtlasIndex {
    descriptor: AtlasDescriptor,
    source: Option<PixelBuffer>,
    cache: TileCache,
}

impl AtlasIndex {
    /// Index with no source yet; call [`load_source`](Self::load_source).
    pub fn new(descriptor: AtlasDescriptor) -> Self {
        AtlasIndex {
            descriptor,
            source: None,
            cache: TileCache::default(),
        }
    }

    /// Builds an index with an already decoded source.
    pub fn with_source(descriptor: AtlasDescriptor, source: PixelBuffer) -> Self {
        AtlasIndex {
            descriptor,
            source: Some(source),
            cache: TileCache::default(),
        }
    }

    #[inline]
    /// The atlas as declared in the document.
    pub fn descriptor(&self) -> &AtlasDescriptor {
        &self.descriptor
    }

    #[inline]
    /// Tile width in pixels.
    pub fn tile_width(&self) -> u32 {
        self.descriptor.tile_width
    }

    #[inline]
    /// Tile height in pixels.
    pub fn tile_height(&self) -> u32 {
        self.descriptor.tile_height
    }

    /// Read cache, for inspection.
    pub fn cache(&self) -> &TileCache {
        &self.cache
    }

    /// True once a pixel source is attached.
    pub fn is_loaded(&self) -> bool {
        self.source.is_some()
    }

    /// Fetches the atlas image from `provider`, under `folder` if non-empty.
    pub fn load_source(&mut self, provider: &dyn AssetProvider, folder: &str) -> Result<(), LoadError> {
        let key = asset_key(folder, &self.descriptor.name);
        let source = provider.lookup(&key)?;
        log::debug!(
            "loaded atlas '{}' ({}x{} px)",
            key,
            source.width(),
            source.height()
        );
        self.source = Some(source);
        self.cache = TileCache::default();
        Ok(())
    }

    #[inline]
    /// Whether this atlas owns `tile_id`.
    pub fn is_in_range(&self, tile_id: u32) -> bool {
        self.descriptor.contains(tile_id)
    }

    /// Bottom-left pixel origin of `tile_id` inside the atlas image.
    pub fn tile_origin(&self, tile_id: u32) -> (u32, u32) {
        let d = &self.descriptor;
        let local = tile_id - d.first_id;
        let per_row = d.tiles_per_row();
        let row = local / per_row;
        let col = local % per_row;
        // atlas rows count from the top, the pixel source from the bottom
        let flipped_row = d.tiles_per_column() - row - 1;
        (col * d.tile_width, flipped_row * d.tile_height)
    }

    /// The `tile_width x tile_height` block for `tile_id`, bottom row first.
    ///
    /// Callers must check [`is_in_range`](Self::is_in_range) and load the
    /// source first; both are contract violations and panic.
    pub fn tile_pixels(&mut self, tile_id: u32) -> &[Color] {
        assert!(
            self.is_in_range(tile_id),
            "tile id {tile_id} is outside atlas '{}'",
            self.descriptor.name
        );
        let origin = self.tile_origin(tile_id);
        if self.cache.origin != Some(origin) {
            let source = self
                .source
                .as_ref()
                .unwrap_or_else(|| panic!("atlas '{}' read before its source was loaded", self.descriptor.name));
            self.cache.block = source.read_block(
                origin.0,
                origin.1,
                self.descriptor.tile_width,
                self.descriptor.tile_height,
            );
            self.cache.origin = Some(origin);
            self.cache.misses += 1;
        }
        &self.cache.block
    }
}
