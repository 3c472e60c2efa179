//! Tiled TMX loader that composites every layer into one bitmap for Macroquad.
//!
//! `MapDocument::parse` reads the TMX text, [`MapRenderer`] fetches the atlas
//! images through an [`AssetProvider`] and composites each visible layer,
//! and a [`LayerPresenter`] such as [`LayerStack`] turns the results into
//! textures. [`TileMap`] ties the three together for hosts that re-render
//! on demand.
//!
//! ```
//! use macroquad_tiled_layers::{MapDocument, MapRenderer, MemoryAssets, PixelBuffer};
//!
//! let tmx = r#"<map width="2" height="1" tilewidth="4" tileheight="4">
//!   <tileset firstgid="1" tilewidth="4" tileheight="4">
//!     <image source="tiles.png" width="4" height="4"/>
//!   </tileset>
//!   <layer name="[C]ground"><data encoding="csv">1,0</data></layer>
//! </map>"#;
//! let doc = MapDocument::parse(tmx).unwrap();
//!
//! let mut assets = MemoryAssets::new();
//! assets.insert("tiles", PixelBuffer::new(4, 4));
//! let layers = MapRenderer::new(&assets).render(&doc, "").unwrap();
//! assert_eq!(layers[0].pixels.width(), 8);
//! assert!(layers[0].collision);
//! ```

#![warn(missing_docs)]

pub mod assets;
mod error;
pub mod layer;
/// Document readers.
pub mod loader {
    pub mod tmx_loader;
}
pub mod map;
pub mod pixels;
pub mod present;
pub mod render;
pub mod settings;
pub mod tile_map;
pub mod tileset;

pub use assets::{asset_key, AssetProvider, FolderAssets, MemoryAssets};
pub use error::{LoadError, MapError, ParseError, ResolutionError};
pub use layer::{is_collision_name, GridLayer, LayerData, ObjectLayer, Placement};
pub use loader::tmx_loader::{HiddenObjectGroup, ParseOptions};
pub use map::{AtlasDescriptor, MapDimensions, MapDocument};
pub use pixels::{PixelBuffer, SamplerHints, TRANSPARENT};
pub use present::{LayerPresenter, LayerStack, PresentedLayer};
pub use render::{composite, MapRenderer, RenderedLayer};
pub use settings::TileMapSettings;
pub use tile_map::TileMap;
pub use tileset::AtlasIndex;
