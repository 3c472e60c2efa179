use anyhow::Context;
use macroquad::prelude::*;
use macroquad_tiled_layers::{LayerStack, MemoryAssets, TileMap, TileMapSettings};

const MAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.0" orientation="orthogonal" width="6" height="4" tilewidth="16" tileheight="16">
  <tileset firstgid="1" name="terrain" tilewidth="16" tileheight="16">
    <image source="gfx/terrain.png" width="32" height="32"/>
  </tileset>
  <layer name="ground" width="6" height="4">
    <data encoding="csv">
1,1,1,1,1,1,
1,2,2,2,2,1,
1,2,0,0,2,1,
3,3,3,3,3,3
</data>
  </layer>
  <layer name="[C]walls" width="6" height="4">
    <data encoding="csv">
4,0,0,0,0,4,
0,0,0,0,0,0,
0,0,0,0,0,0,
0,0,0,0,0,0
</data>
  </layer>
</map>"#;

/// 2x2 atlas of flat-colored 16px tiles.
fn terrain_atlas() -> Image {
    let colors = [DARKGREEN, GREEN, BROWN, DARKGRAY];
    let mut image = Image::gen_image_color(32, 32, BLANK);
    for (n, color) in colors.iter().enumerate() {
        let (tx, ty) = ((n % 2) as u32 * 16, (n / 2) as u32 * 16);
        for y in 0..16 {
            for x in 0..16 {
                image.set_pixel(tx + x, ty + y, *color);
            }
        }
    }
    image
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Basic Map".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

fn setup() -> anyhow::Result<LayerStack> {
    let settings = TileMapSettings {
        tile_folder: "maps".into(),
        unit: 0.125, // draw each layer pixel 8 screen pixels wide
        ..Default::default()
    };

    let mut assets = MemoryAssets::new();
    assets.insert_image("maps/terrain", &terrain_atlas());

    let mut map = TileMap::new(MAP, settings.clone());
    let mut stack = LayerStack::new(settings.unit);
    let count = map
        .render_map(&assets, &mut stack)
        .context("rendering demo map")?;
    println!(
        "layers={} collision_layers={}",
        count,
        stack.collision_layers().count()
    );
    Ok(stack)
}

#[macroquad::main(window_conf)]
async fn main() {
    let stack = match setup() {
        Ok(stack) => stack,
        Err(e) => {
            eprintln!("{e:#}");
            return;
        }
    };

    loop {
        clear_background(BLACK);

        stack.draw(vec2(40.0, screen_height() - 40.0));

        draw_text(
            &format!("FPS: {}", get_fps()),
            screen_width() - 135.0,
            55.0,
            30.0,
            RED,
        );

        next_frame().await;
    }
}
