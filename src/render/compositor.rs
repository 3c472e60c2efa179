//! Layer compositing: tile ids in, one bitmap per layer out.

use crate::error::{MapError, ResolutionError};
use crate::layer::{GridLayer, LayerData, ObjectLayer};
use crate::pixels::{PixelBuffer, SamplerHints, TRANSPARENT};
use crate::tileset::AtlasIndex;

/// First atlas, in declaration order, whose id range holds `tile_id`.
#[inline]
pub fn resolve_atlas(atlases: &mut [AtlasIndex], tile_id: u32) -> Option<&mut AtlasIndex> {
    atlases.iter_mut().find(|a| a.is_in_range(tile_id))
}

fn unresolved(layer: &str, tile_id: u32) -> ResolutionError {
    ResolutionError::UnresolvedTileId {
        layer: layer.to_owned(),
        tile_id,
    }
}

/// Composites one layer into a fresh bottom-left-origin bitmap of
/// `width_tiles * tile_width` by `height_tiles * tile_height` pixels.
///
/// Fails with [`MapError::TooLarge`] before allocating when that size does
/// not fit a layer bitmap, and with [`MapError::Resolution`] on an unknown id.
pub fn composite(layer: &LayerData, atlases: &mut [AtlasIndex]) -> Result<PixelBuffer, MapError> {
    let (width, height) = layer.pixel_size().ok_or_else(|| {
        let (width, height) = layer.wide_pixel_size();
        MapError::TooLarge {
            layer: layer.name().to_owned(),
            width,
            height,
        }
    })?;
    let mut out = PixelBuffer::new(width, height);
    match layer {
        LayerData::Grid(grid) => composite_grid(grid, atlases, &mut out)?,
        LayerData::Objects(objects) => composite_objects(objects, atlases, &mut out)?,
    }
    out.set_sampler(SamplerHints::POINT_CLAMP);
    log::debug!("composited layer '{}' ({}x{} px)", layer.name(), width, height);
    Ok(out)
}

fn composite_grid(
    layer: &GridLayer,
    atlases: &mut [AtlasIndex],
    out: &mut PixelBuffer,
) -> Result<(), ResolutionError> {
    let (tw, th) = (layer.tile_width, layer.tile_height);
    let empty = vec![TRANSPARENT; tw as usize * th as usize];
    let total = layer.width_tiles as usize * layer.height_tiles as usize;

    for (i, &tile_id) in layer.cells.iter().enumerate().take(total) {
        let col = i as u32 % layer.width_tiles;
        let row = i as u32 / layer.width_tiles;
        let map_x = (col * tw) as i64;
        // cell row 0 is the top of the map, output row 0 the bottom
        let map_y = ((layer.height_tiles - row - 1) * th) as i64;

        if tile_id == 0 {
            out.write_block(map_x, map_y, tw, th, &empty);
            continue;
        }

        let atlas = resolve_atlas(atlases, tile_id).ok_or_else(|| unresolved(&layer.name, tile_id))?;
        let (aw, ah) = (atlas.tile_width(), atlas.tile_height());
        out.write_block(map_x, map_y, aw, ah, atlas.tile_pixels(tile_id));
    }
    Ok(())
}

fn composite_objects(
    layer: &ObjectLayer,
    atlases: &mut [AtlasIndex],
    out: &mut PixelBuffer,
) -> Result<(), ResolutionError> {
    out.clear(TRANSPARENT);
    let total_height = out.height() as i64;

    for placement in &layer.placements {
        if placement.tile_id == 0 {
            continue;
        }
        let atlas = resolve_atlas(atlases, placement.tile_id)
            .ok_or_else(|| unresolved(&layer.name, placement.tile_id))?;
        let (aw, ah) = (atlas.tile_width(), atlas.tile_height());
        let map_x = placement.x as i64;
        let map_y = total_height - placement.y as i64 - 1;

        if !out.write_block(map_x, map_y, aw, ah, atlas.tile_pixels(placement.tile_id)) {
            log::warn!(
                "tile {} at ({}, {}) in layer '{}' is clipped by the layer bounds",
                placement.tile_id,
                placement.x,
                placement.y,
                layer.name
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Placement;
    use crate::map::AtlasDescriptor;
    use macroquad::color::Color;

    const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);
    const BLUE: Color = Color::new(0.0, 0.0, 1.0, 1.0);

    /// 2x1 atlas of 1x1 tiles: id `first` is red, `first + 1` is blue.
    fn two_tone(first_id: u32) -> AtlasIndex {
        let descriptor = AtlasDescriptor {
            first_id,
            tile_width: 1,
            tile_height: 1,
            source_width: 2,
            source_height: 1,
            name: "two_tone".into(),
        };
        let source = PixelBuffer::from_pixels(2, 1, vec![RED, BLUE]).expect("2x1");
        AtlasIndex::with_source(descriptor, source)
    }

    fn grid(width_tiles: u32, height_tiles: u32, cells: Vec<u32>) -> LayerData {
        LayerData::Grid(GridLayer {
            name: "g".into(),
            width_tiles,
            height_tiles,
            tile_width: 1,
            tile_height: 1,
            cells,
            visible: true,
            collision: false,
        })
    }

    #[test]
    fn top_row_of_cells_lands_on_top_of_output() {
        let mut atlases = vec![two_tone(1)];
        let out = composite(&grid(1, 2, vec![1, 2]), &mut atlases).expect("composite");
        assert_eq!(out.get(0, 1), Some(RED));
        assert_eq!(out.get(0, 0), Some(BLUE));
        assert_eq!(out.sampler(), SamplerHints::POINT_CLAMP);
    }

    #[test]
    fn unresolved_tile_is_an_error() {
        let mut atlases = vec![two_tone(1)];
        let err = composite(&grid(1, 1, vec![7]), &mut atlases).unwrap_err();
        match err {
            MapError::Resolution(e) => assert_eq!(
                e,
                ResolutionError::UnresolvedTileId {
                    layer: "g".into(),
                    tile_id: 7
                }
            ),
            other => panic!("expected Resolution, got {:?}", other),
        }
    }

    #[test]
    fn overflowing_tile_width_is_too_large() {
        let mut atlases = vec![two_tone(1)];
        let layer = LayerData::Grid(GridLayer {
            name: "wide".into(),
            width_tiles: 2,
            height_tiles: 1,
            tile_width: 3_000_000_000,
            tile_height: 1,
            cells: vec![0, 0],
            visible: true,
            collision: false,
        });
        let err = composite(&layer, &mut atlases).unwrap_err();
        assert!(matches!(
            err,
            MapError::TooLarge { ref layer, width: 6_000_000_000, height: 1 } if layer == "wide"
        ));
    }

    #[test]
    fn huge_object_canvas_is_too_large() {
        let mut atlases = vec![two_tone(1)];
        let layer = LayerData::Objects(ObjectLayer {
            name: "o".into(),
            width_tiles: 60_000,
            height_tiles: 60_000,
            tile_width: 16,
            tile_height: 16,
            placements: Vec::new(),
            visible: true,
            collision: false,
        });
        let err = composite(&layer, &mut atlases).unwrap_err();
        assert!(matches!(err, MapError::TooLarge { width: 960_000, height: 960_000, .. }));
    }

    #[test]
    fn later_placements_overwrite_earlier() {
        let mut atlases = vec![two_tone(1)];
        let layer = LayerData::Objects(ObjectLayer {
            name: "o".into(),
            width_tiles: 2,
            height_tiles: 2,
            tile_width: 1,
            tile_height: 1,
            placements: vec![
                Placement { tile_id: 1, x: 1, y: 0 },
                Placement { tile_id: 2, x: 1, y: 0 },
            ],
            visible: true,
            collision: false,
        });
        let out = composite(&layer, &mut atlases).expect("composite");
        // y = 0 flips to the top output row
        assert_eq!(out.get(1, 1), Some(BLUE));
        assert_eq!(out.get(0, 0), Some(TRANSPARENT));
        assert_eq!(out.get(1, 0), Some(TRANSPARENT));
    }

    #[test]
    fn placement_outside_canvas_is_clipped() {
        let mut atlases = vec![two_tone(1)];
        let layer = LayerData::Objects(ObjectLayer {
            name: "o".into(),
            width_tiles: 1,
            height_tiles: 1,
            tile_width: 1,
            tile_height: 1,
            placements: vec![Placement { tile_id: 1, x: 5, y: 5 }],
            visible: true,
            collision: false,
        });
        let out = composite(&layer, &mut atlases).expect("composite");
        assert!(out.is_fully_transparent());
    }
}
