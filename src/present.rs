//! Handing composited layers to whatever draws them.

use macroquad::prelude::*;

use crate::error::MapError;
use crate::render::RenderedLayer;

/// Receives layers in stacking order and owns whatever it builds from them.
pub trait LayerPresenter {
    /// `index` is the layer's position in the render output; higher
    /// indices sit in front.
    fn present(&mut self, index: usize, layer: RenderedLayer) -> Result<(), MapError>;

    /// Releases everything presented so far.
    fn clear(&mut self);
}

/// A layer uploaded as a macroquad texture.
pub struct PresentedLayer {
    /// Layer name from the document.
    pub name: String,
    /// Uploaded bitmap.
    pub texture: Texture2D,
    /// Size in world units (`pixels / unit`).
    pub size: Vec2,
    /// `-index`: later layers are nearer the viewer.
    pub depth: f32,
    /// The host builds collision geometry for these.
    pub collision: bool,
}

/// Stack of layer textures sharing a bottom-left pivot.
pub struct LayerStack {
    unit: f32,
    layers: Vec<PresentedLayer>,
}

impl LayerStack {
    /// `unit` is layer pixels per world unit.
    pub fn new(unit: f32) -> Self {
        LayerStack {
            unit,
            layers: Vec::new(),
        }
    }

    /// Presented layers, back to front.
    pub fn layers(&self) -> &[PresentedLayer] {
        &self.layers
    }

    /// Layers whose name carries the `[C]` marker.
    pub fn collision_layers(&self) -> impl Iterator<Item = &PresentedLayer> {
        self.layers.iter().filter(|l| l.collision)
    }

    /// Draws back to front with the bottom-left corner at `pivot`, in the
    /// coordinates of the current camera (y down).
    pub fn draw(&self, pivot: Vec2) {
        for layer in &self.layers {
            draw_texture_ex(
                &layer.texture,
                pivot.x,
                pivot.y - layer.size.y,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(layer.size),
                    ..Default::default()
                },
            );
        }
    }
}

impl LayerPresenter for LayerStack {
    fn present(&mut self, index: usize, layer: RenderedLayer) -> Result<(), MapError> {
        let RenderedLayer {
            name,
            pixels,
            collision,
        } = layer;
        let image = pixels.to_image().ok_or_else(|| MapError::TooLarge {
            layer: name.clone(),
            width: pixels.width() as u64,
            height: pixels.height() as u64,
        })?;

        let texture = Texture2D::from_image(&image);
        if pixels.sampler().point_filtered {
            texture.set_filter(FilterMode::Nearest);
        }

        let depth = -(index as f32);
        let at = self
            .layers
            .iter()
            .position(|l| l.depth < depth)
            .unwrap_or(self.layers.len());
        self.layers.insert(
            at,
            PresentedLayer {
                name,
                texture,
                size: vec2(
                    pixels.width() as f32 / self.unit,
                    pixels.height() as f32 / self.unit,
                ),
                depth,
                collision,
            },
        );
        Ok(())
    }

    fn clear(&mut self) {
        // dropping the textures frees them
        self.layers.clear();
    }
}
