//! Whole-map rendering.

use crate::assets::AssetProvider;
use crate::error::MapError;
use crate::map::MapDocument;
use crate::pixels::PixelBuffer;
use crate::render::compositor::composite;
use crate::tileset::AtlasIndex;

/// One composited layer, ready for a presenter.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLayer {
    /// Layer name from the document.
    pub name: String,
    /// Bottom-left-origin bitmap, point-filtered and clamped.
    pub pixels: PixelBuffer,
    /// Name starts with `[C]`.
    pub collision: bool,
}

/// Turns a [`MapDocument`] into composited layers, in stacking order.
///
/// Nothing is cached between calls: every `render` reloads the atlas
/// sources and composites from scratch.
pub struct MapRenderer<'p> {
    provider: &'p dyn AssetProvider,
}

impl<'p> MapRenderer<'p> {
    /// Renderer that fetches atlas images from `provider`.
    pub fn new(provider: &'p dyn AssetProvider) -> Self {
        MapRenderer { provider }
    }

    /// Loads every atlas under `folder`, then composites each visible layer.
    ///
    /// Fails fast: a missing atlas or an unresolved tile id aborts the whole
    /// render and no layers are returned.
    pub fn render(&self, document: &MapDocument, folder: &str) -> Result<Vec<RenderedLayer>, MapError> {
        let mut atlases = self.load_atlases(document, folder)?;

        let mut rendered = Vec::with_capacity(document.layers.len());
        for layer in document.visible_layers() {
            let pixels = composite(layer, &mut atlases)?;
            rendered.push(RenderedLayer {
                name: layer.name().to_owned(),
                pixels,
                collision: layer.is_collision_layer(),
            });
        }

        log::info!(
            "rendered {} of {} layers using {} atlases",
            rendered.len(),
            document.layers.len(),
            atlases.len()
        );
        Ok(rendered)
    }

    fn load_atlases(&self, document: &MapDocument, folder: &str) -> Result<Vec<AtlasIndex>, MapError> {
        document
            .atlases
            .iter()
            .map(|descriptor| -> Result<AtlasIndex, MapError> {
                let mut atlas = AtlasIndex::new(descriptor.clone());
                atlas.load_source(self.provider, folder)?;
                Ok(atlas)
            })
            .collect()
    }
}
