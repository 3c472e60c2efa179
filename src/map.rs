//! The parsed, immutable map document.

use std::path::Path;

use crate::error::ParseError;
use crate::layer::{checked_pixel_size, wide_pixel_size, LayerData};
use crate::loader::tmx_loader::{parse_document, ParseOptions};

/// Map-level grid size, inherited by every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapDimensions {
    /// Columns.
    pub width_tiles: u32,
    /// Rows.
    pub height_tiles: u32,
    /// Cell width in pixels.
    pub tile_width: u32,
    /// Cell height in pixels.
    pub tile_height: u32,
}

impl MapDimensions {
    /// Size of every layer bitmap, `None` if it cannot be allocated.
    pub fn pixel_size(&self) -> Option<(u32, u32)> {
        checked_pixel_size(self.width_tiles, self.height_tiles, self.tile_width, self.tile_height)
    }

    /// Unchecked pixel size, widened to `u64`.
    pub fn wide_pixel_size(&self) -> (u64, u64) {
        wide_pixel_size(self.width_tiles, self.height_tiles, self.tile_width, self.tile_height)
    }
}

/// One tile atlas as declared in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasDescriptor {
    /// First global tile id owned by this atlas.
    pub first_id: u32,
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// Declared image width in pixels.
    pub source_width: u32,
    /// Declared image height in pixels.
    pub source_height: u32,
    /// Image base name, no directory and no extension.
    pub name: String,
}

impl AtlasDescriptor {
    /// Whole tiles across the image; 0 when `tile_width` is 0.
    pub fn tiles_per_row(&self) -> u32 {
        self.source_width.checked_div(self.tile_width).unwrap_or(0)
    }

    /// Whole tiles down the image; 0 when `tile_height` is 0.
    pub fn tiles_per_column(&self) -> u32 {
        self.source_height.checked_div(self.tile_height).unwrap_or(0)
    }

    /// Number of ids this atlas owns.
    pub fn tile_count(&self) -> u32 {
        self.tiles_per_row() * self.tiles_per_column()
    }

    /// `first_id <= tile_id < first_id + tile_count`
    pub fn contains(&self, tile_id: u32) -> bool {
        let end = self.first_id as u64 + self.tile_count() as u64;
        tile_id >= self.first_id && (tile_id as u64) < end
    }
}

/// A parsed map. Immutable; reloading builds a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapDocument {
    /// Map-level grid size.
    pub dimensions: MapDimensions,
    /// Declaration order, which is also tile id resolution order.
    pub atlases: Vec<AtlasDescriptor>,
    /// Document order, which is also stacking order.
    pub layers: Vec<LayerData>,
}

impl MapDocument {
    /// Parses TMX text with the default options.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        parse_document(text, &ParseOptions::default())
    }

    /// Parses TMX text, with control over hidden object groups.
    pub fn parse_with(text: &str, options: &ParseOptions) -> Result<Self, ParseError> {
        parse_document(text, options)
    }

    /// Load a map from a file path, only supporting TMX
    pub fn load_from_file<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Self, ParseError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tmx") => {
                let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                parse_document(&text, options)
            }
            _ => Err(ParseError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Layers the renderer will composite, in stacking order.
    pub fn visible_layers(&self) -> impl Iterator<Item = &LayerData> {
        self.layers.iter().filter(|l| l.is_visible())
    }
}
