//! Parsed layers: dense tile grids and sparse object placements.

/// Largest width or height, in pixels, a composited layer may have.
pub const MAX_LAYER_SIDE: u32 = u16::MAX as u32;

/// Largest pixel count a composited layer may have.
pub const MAX_LAYER_PIXELS: u64 = 1 << 26;

/// Pixel size of a `width_tiles x height_tiles` grid of `tile_width x tile_height` tiles.
///
/// `None` when either side exceeds [`MAX_LAYER_SIDE`] or the area exceeds
/// [`MAX_LAYER_PIXELS`].
pub fn checked_pixel_size(
    width_tiles: u32,
    height_tiles: u32,
    tile_width: u32,
    tile_height: u32,
) -> Option<(u32, u32)> {
    let (w, h) = wide_pixel_size(width_tiles, height_tiles, tile_width, tile_height);
    if w > MAX_LAYER_SIDE as u64 || h > MAX_LAYER_SIDE as u64 || w * h > MAX_LAYER_PIXELS {
        return None;
    }
    Some((w as u32, h as u32))
}

/// Same product as [`checked_pixel_size`], widened so it cannot overflow.
pub fn wide_pixel_size(
    width_tiles: u32,
    height_tiles: u32,
    tile_width: u32,
    tile_height: u32,
) -> (u64, u64) {
    (
        width_tiles as u64 * tile_width as u64,
        height_tiles as u64 * tile_height as u64,
    )
}

/// Name prefix that tags a layer as collision geometry.
pub const COLLISION_MARKER: &str = "[C]";

/// True when `name` starts with `[C]`, ignoring ASCII case.
pub fn is_collision_name(name: &str) -> bool {
    name.get(..COLLISION_MARKER.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(COLLISION_MARKER))
}

/// Dense layer: one tile id per cell, row 0 is the top row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayer {
    /// Layer name from the document.
    pub name: String,
    /// Columns.
    pub width_tiles: u32,
    /// Rows.
    pub height_tiles: u32,
    /// Cell width in pixels.
    pub tile_width: u32,
    /// Cell height in pixels.
    pub tile_height: u32,
    /// Row-major, `width_tiles * height_tiles` long.
    pub cells: Vec<u32>,
    /// False for `visible="0"`; hidden layers are not rendered.
    pub visible: bool,
    /// Name starts with `[C]`.
    pub collision: bool,
}

/// A tile stamped at a pixel position; `y` counts down from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Global tile id (`gid`).
    pub tile_id: u32,
    /// Left edge in pixels.
    pub x: i32,
    /// Pixels down from the top of the layer.
    pub y: i32,
}

/// Sparse layer of pixel-addressed tile placements, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLayer {
    /// Layer name from the document.
    pub name: String,
    /// Canvas width in tiles.
    pub width_tiles: u32,
    /// Canvas height in tiles.
    pub height_tiles: u32,
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// Stamps in document order; later ones overwrite earlier ones.
    pub placements: Vec<Placement>,
    /// False for `visible="0"`; hidden layers are not rendered.
    pub visible: bool,
    /// Name starts with `[C]`.
    pub collision: bool,
}

/// A parsed layer of either kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerData {
    /// A `<layer>` element.
    Grid(GridLayer),
    /// An `<objectgroup>` element.
    Objects(ObjectLayer),
}

impl LayerData {
    /// Layer name from the document.
    pub fn name(&self) -> &str {
        match self {
            LayerData::Grid(l) => &l.name,
            LayerData::Objects(l) => &l.name,
        }
    }

    /// False for layers marked `visible="0"`.
    pub fn is_visible(&self) -> bool {
        match self {
            LayerData::Grid(l) => l.visible,
            LayerData::Objects(l) => l.visible,
        }
    }

    /// True when the name carries the `[C]` marker.
    pub fn is_collision_layer(&self) -> bool {
        match self {
            LayerData::Grid(l) => l.collision,
            LayerData::Objects(l) => l.collision,
        }
    }

    fn grid_size(&self) -> (u32, u32, u32, u32) {
        match self {
            LayerData::Grid(l) => (l.width_tiles, l.height_tiles, l.tile_width, l.tile_height),
            LayerData::Objects(l) => (l.width_tiles, l.height_tiles, l.tile_width, l.tile_height),
        }
    }

    /// Output bitmap size in pixels: `(width_tiles * tile_width, height_tiles * tile_height)`.
    ///
    /// `None` when the bitmap would be too large to allocate.
    pub fn pixel_size(&self) -> Option<(u32, u32)> {
        let (w, h, tw, th) = self.grid_size();
        checked_pixel_size(w, h, tw, th)
    }

    /// Unchecked pixel size, widened to `u64`.
    pub fn wide_pixel_size(&self) -> (u64, u64) {
        let (w, h, tw, th) = self.grid_size();
        wide_pixel_size(w, h, tw, th)
    }
}
