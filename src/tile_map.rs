//! Host-facing facade: re-parse, render, present.

use crate::assets::AssetProvider;
use crate::error::MapError;
use crate::map::MapDocument;
use crate::present::LayerPresenter;
use crate::render::MapRenderer;
use crate::settings::TileMapSettings;

/// A map as the host sees it: TMX text plus settings, rendered on demand.
///
/// Every [`render_map`](Self::render_map) re-parses the stored text, so
/// editing the document and rendering again picks the change up.
pub struct TileMap {
    settings: TileMapSettings,
    text: String,
    document: Option<MapDocument>,
}

impl TileMap {
    /// Nothing is parsed until the first render.
    pub fn new(text: impl Into<String>, settings: TileMapSettings) -> Self {
        TileMap {
            settings,
            text: text.into(),
            document: None,
        }
    }

    /// Settings this map was created with.
    pub fn settings(&self) -> &TileMapSettings {
        &self.settings
    }

    /// The document from the last successful render, if any.
    pub fn document(&self) -> Option<&MapDocument> {
        self.document.as_ref()
    }

    /// Swaps the TMX text. Takes effect on the next render.
    pub fn set_document(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Parses the stored text into a brand-new document.
    pub fn reload(&self) -> Result<MapDocument, MapError> {
        Ok(MapDocument::parse_with(&self.text, &self.settings.parse_options())?)
    }

    /// Clears `presenter`, then re-parses, renders and presents every
    /// visible layer. Returns how many layers were presented.
    ///
    /// On error the presenter is left empty.
    pub fn render_map(
        &mut self,
        provider: &dyn AssetProvider,
        presenter: &mut dyn LayerPresenter,
    ) -> Result<usize, MapError> {
        presenter.clear();
        let document = self.reload()?;
        let layers = MapRenderer::new(provider).render(&document, &self.settings.tile_folder)?;
        let count = layers.len();

        for (index, layer) in layers.into_iter().enumerate() {
            if let Err(e) = presenter.present(index, layer) {
                presenter.clear();
                return Err(e);
            }
        }

        self.document = Some(document);
        Ok(count)
    }

    /// Releases presented layers. The stored document is untouched, so a
    /// later `render_map` works without resetting anything.
    pub fn clear_map(&mut self, presenter: &mut dyn LayerPresenter) {
        presenter.clear();
    }
}
