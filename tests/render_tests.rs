// tests/render_tests.rs

use macroquad::color::Color;
use macroquad_tiled_layers::{
    AtlasDescriptor, AtlasIndex, GridLayer, LayerData, MapDocument, MapError, MapRenderer,
    MemoryAssets, ObjectLayer, PixelBuffer, Placement, ResolutionError, TRANSPARENT,
};

/// Atlas image where tile `n` (0-based, row-major from the top-left) is
/// filled with red = n / 16, alpha 1.
fn numbered_atlas(cols: u32, rows: u32, tile_w: u32, tile_h: u32) -> PixelBuffer {
    let mut buf = PixelBuffer::new(cols * tile_w, rows * tile_h);
    for ty in 0..rows {
        for tx in 0..cols {
            let n = ty * cols + tx;
            let color = Color::new(n as f32 / 16.0, 0.0, 0.0, 1.0);
            // bottom-up buffer: atlas row 0 is the highest block
            let base_y = (rows - ty - 1) * tile_h;
            for y in 0..tile_h {
                for x in 0..tile_w {
                    buf.set(tx * tile_w + x, base_y + y, color);
                }
            }
        }
    }
    buf
}

fn tile_color(n: u32) -> Color {
    Color::new(n as f32 / 16.0, 0.0, 0.0, 1.0)
}

fn block_is(buf: &PixelBuffer, x0: u32, y0: u32, w: u32, h: u32, color: Color) -> bool {
    (y0..y0 + h).all(|y| (x0..x0 + w).all(|x| buf.get(x, y) == Some(color)))
}

const END_TO_END: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.0" orientation="orthogonal" width="2" height="1" tilewidth="16" tileheight="16">
  <tileset firstgid="1" name="tiles" tilewidth="16" tileheight="16">
    <image source="tiles.png" width="32" height="16"/>
  </tileset>
  <layer name="ground" width="2" height="1">
    <data encoding="csv">1,2</data>
  </layer>
</map>"#;

#[test]
fn end_to_end_two_tile_strip() {
    let doc = MapDocument::parse(END_TO_END).expect("parse");
    let mut assets = MemoryAssets::new();
    assets.insert("tiles", numbered_atlas(2, 1, 16, 16));

    let layers = MapRenderer::new(&assets).render(&doc, "").expect("render");
    assert_eq!(layers.len(), 1);
    let out = &layers[0].pixels;
    assert_eq!((out.width(), out.height()), (32, 16));
    assert!(block_is(out, 0, 0, 16, 16, tile_color(0)));
    assert!(block_is(out, 16, 0, 16, 16, tile_color(1)));
    assert!(!layers[0].collision);
}

#[test]
fn parsing_is_deterministic() {
    let a = MapDocument::parse(END_TO_END).expect("parse");
    let b = MapDocument::parse(END_TO_END).expect("parse");
    assert_eq!(a, b);
}

fn grid(width_tiles: u32, height_tiles: u32, tile: u32, cells: Vec<u32>) -> LayerData {
    LayerData::Grid(GridLayer {
        name: "grid".into(),
        width_tiles,
        height_tiles,
        tile_width: tile,
        tile_height: tile,
        cells,
        visible: true,
        collision: false,
    })
}

fn atlas(first_id: u32, cols: u32, rows: u32, tile: u32) -> AtlasIndex {
    AtlasIndex::with_source(
        AtlasDescriptor {
            first_id,
            tile_width: tile,
            tile_height: tile,
            source_width: cols * tile,
            source_height: rows * tile,
            name: format!("atlas{first_id}"),
        },
        numbered_atlas(cols, rows, tile, tile),
    )
}

#[test]
fn single_row_tile_lands_bottom_left() {
    // tile 5 is the first tile of an atlas starting at 5
    let mut atlases = vec![atlas(5, 2, 2, 4)];
    let out = macroquad_tiled_layers::composite(&grid(2, 1, 4, vec![5, 0]), &mut atlases)
        .expect("composite");
    assert!(block_is(&out, 0, 0, 4, 4, tile_color(0)));
    assert!(block_is(&out, 4, 0, 4, 4, TRANSPARENT));
}

#[test]
fn grid_rows_flip_vertically() {
    let mut atlases = vec![atlas(1, 2, 2, 2)];
    // top row: tiles 1,2 ; bottom row: tiles 3,4
    let out = macroquad_tiled_layers::composite(&grid(2, 2, 2, vec![1, 2, 3, 4]), &mut atlases)
        .expect("composite");
    assert!(block_is(&out, 0, 2, 2, 2, tile_color(0)));
    assert!(block_is(&out, 2, 2, 2, 2, tile_color(1)));
    assert!(block_is(&out, 0, 0, 2, 2, tile_color(2)));
    assert!(block_is(&out, 2, 0, 2, 2, tile_color(3)));
}

#[test]
fn all_zero_layer_is_transparent() {
    let mut atlases = vec![atlas(1, 1, 1, 8)];
    let out = macroquad_tiled_layers::composite(&grid(3, 2, 8, vec![0; 6]), &mut atlases)
        .expect("composite");
    assert_eq!((out.width(), out.height()), (24, 16));
    assert!(out.is_fully_transparent());
}

#[test]
fn overlapping_ranges_resolve_to_first_declared() {
    // both atlases claim ids 1..=4
    let mut atlases = vec![atlas(1, 2, 2, 2), atlas(1, 4, 1, 2)];
    let out = macroquad_tiled_layers::composite(&grid(1, 1, 2, vec![3]), &mut atlases)
        .expect("composite");
    // in the 2x2 atlas id 3 is tile index 2
    assert!(block_is(&out, 0, 0, 2, 2, tile_color(2)));
    assert_eq!(atlases[1].cache().misses(), 0);
}

#[test]
fn second_atlas_serves_ids_past_the_first() {
    let mut atlases = vec![atlas(1, 2, 1, 2), atlas(3, 2, 1, 2)];
    let out = macroquad_tiled_layers::composite(&grid(2, 1, 2, vec![2, 4]), &mut atlases)
        .expect("composite");
    assert!(block_is(&out, 0, 0, 2, 2, tile_color(1)));
    assert!(block_is(&out, 2, 0, 2, 2, tile_color(1)));
    assert_eq!(atlases[0].cache().misses(), 1);
    assert_eq!(atlases[1].cache().misses(), 1);
}

#[test]
fn output_size_matches_layer_grid() {
    let mut atlases = vec![atlas(1, 2, 2, 3)];
    for (w, h) in [(1, 1), (4, 2), (3, 5)] {
        let cells = (0..w * h).map(|i| i % 5).collect();
        let out = macroquad_tiled_layers::composite(&grid(w, h, 3, cells), &mut atlases)
            .expect("composite");
        assert_eq!((out.width(), out.height()), (w * 3, h * 3));
    }
}

#[test]
fn repeated_tiles_read_the_source_once() {
    let mut atlases = vec![atlas(1, 2, 2, 2)];
    macroquad_tiled_layers::composite(&grid(4, 1, 2, vec![2, 2, 2, 2]), &mut atlases)
        .expect("composite");
    assert_eq!(atlases[0].cache().misses(), 1);
}

#[test]
fn object_placement_flips_y_against_layer_height() {
    let mut atlases = vec![atlas(1, 2, 1, 2)];
    let layer = LayerData::Objects(ObjectLayer {
        name: "props".into(),
        width_tiles: 2,
        height_tiles: 2,
        tile_width: 2,
        tile_height: 2,
        placements: vec![Placement { tile_id: 2, x: 1, y: 3 }],
        visible: true,
        collision: false,
    });
    let out = macroquad_tiled_layers::composite(&layer, &mut atlases).expect("composite");
    assert_eq!((out.width(), out.height()), (4, 4));
    // 4 - 3 - 1 = 0
    assert!(block_is(&out, 1, 0, 2, 2, tile_color(1)));
    assert_eq!(out.get(0, 0), Some(TRANSPARENT));
    assert_eq!(out.get(3, 3), Some(TRANSPARENT));
}

#[test]
fn unresolved_id_aborts_render() {
    let text = r#"<map width="1" height="1" tilewidth="2" tileheight="2">
  <tileset firstgid="1" tilewidth="2" tileheight="2"><image source="t.png" width="2" height="2"/></tileset>
  <layer name="first"><data encoding="csv">1</data></layer>
  <layer name="broken"><data encoding="csv">9</data></layer>
</map>"#;
    let doc = MapDocument::parse(text).expect("parse");
    let mut assets = MemoryAssets::new();
    assets.insert("t", numbered_atlas(1, 1, 2, 2));

    let err = MapRenderer::new(&assets).render(&doc, "").unwrap_err();
    match err {
        MapError::Resolution(ResolutionError::UnresolvedTileId { layer, tile_id }) => {
            assert_eq!(layer, "broken");
            assert_eq!(tile_id, 9);
        }
        other => panic!("expected UnresolvedTileId, got {:?}", other),
    }
}
