//! Usage: cargo run --example objects -- <map.tmx> [settings.json]
//!
//! Atlas images are looked up as `<map dir>/<tile_folder>/<name>.png`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use macroquad::prelude::*;
use macroquad_tiled_layers::{
    FolderAssets, LayerData, LayerPresenter, LayerStack, MapDocument, MapRenderer,
    TileMapSettings,
};

fn window_conf() -> Conf {
    Conf {
        window_title: "Objects Example".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

fn setup() -> anyhow::Result<LayerStack> {
    let mut args = std::env::args().skip(1);
    let map_path = PathBuf::from(args.next().context("missing <map.tmx> argument")?);
    let settings = match args.next() {
        Some(p) => TileMapSettings::from_json_file(&p).with_context(|| format!("Reading settings {p}"))?,
        None => TileMapSettings::default(),
    };

    let doc = MapDocument::load_from_file(&map_path, &settings.parse_options())
        .with_context(|| format!("Loading map {}", map_path.display()))?;

    let placements: usize = doc
        .layers
        .iter()
        .map(|l| match l {
            LayerData::Objects(o) => o.placements.len(),
            LayerData::Grid(_) => 0,
        })
        .sum();
    println!("layers={} placements={}", doc.layers.len(), placements);

    let map_dir = map_path.parent().unwrap_or_else(|| Path::new("."));
    let assets = FolderAssets::new(map_dir);
    let layers = MapRenderer::new(&assets)
        .render(&doc, &settings.tile_folder)
        .context("Rendering layers")?;

    let mut stack = LayerStack::new(settings.unit);
    for (index, layer) in layers.into_iter().enumerate() {
        stack.present(index, layer)?;
    }
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

        stack.draw(vec2(20.0, screen_height() - 20.0));

        draw_text("objects example", 20.0, 30.0, 32.0, WHITE);
        next_frame().await;
    }
}
