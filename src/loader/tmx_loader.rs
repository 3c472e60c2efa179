// src/loader/tmx_loader.rs
//! TMX (XML) reader producing a [`MapDocument`].
use crate::error::ParseError;
use crate::layer::{is_collision_name, GridLayer, LayerData, ObjectLayer, Placement};
use crate::map::{AtlasDescriptor, MapDimensions, MapDocument};
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What a `visible="0"` object group does to the rest of the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenObjectGroup {
    /// Keep the hidden group, then stop reading any further elements.
    #[default]
    StopParsing,
    /// Keep the hidden group and carry on, like hidden tile layers.
    Skip,
}

/// Knobs for [`parse_document`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Policy for `visible="0"` object groups.
    #[serde(default)]
    pub hidden_object_group: HiddenObjectGroup,
}

fn attr<'a>(node: Node<'a, '_>, attribute: &'static str) -> Result<&'a str, ParseError> {
    node.attribute(attribute)
        .ok_or_else(|| ParseError::MissingAttribute {
            element: node.tag_name().name().to_owned(),
            attribute,
        })
}

fn int_attr<T: FromStr>(node: Node<'_, '_>, attribute: &'static str) -> Result<T, ParseError> {
    let raw = attr(node, attribute)?;
    raw.trim().parse().map_err(|_| ParseError::InvalidInteger {
        element: node.tag_name().name().to_owned(),
        attribute,
        value: raw.to_owned(),
    })
}

fn child<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> Result<Node<'a, 'input>, ParseError> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
        .ok_or_else(|| ParseError::MissingElement {
            parent: node.tag_name().name().to_owned(),
            child: name,
        })
}

/// `visible` is only false when the attribute is literally "0".
fn is_visible(node: Node<'_, '_>) -> bool {
    node.attribute("visible") != Some("0")
}

/// `../gfx/tiles.png` -> `tiles`. Accepts `/` and `\` separators and strips
/// only the final extension.
pub fn image_base_name(source: &str) -> &str {
    let file = source.rsplit(['/', '\\']).next().unwrap_or(source);
    match file.rfind('.') {
        Some(0) | None => file,
        Some(dot) => &file[..dot],
    }
}

fn parse_atlas(node: Node<'_, '_>) -> Result<AtlasDescriptor, ParseError> {
    let image = child(node, "image")?;
    let source = attr(image, "source")?;
    Ok(AtlasDescriptor {
        first_id: int_attr(node, "firstgid")?,
        tile_width: int_attr(node, "tilewidth")?,
        tile_height: int_attr(node, "tileheight")?,
        source_width: int_attr(image, "width")?,
        source_height: int_attr(image, "height")?,
        name: image_base_name(source).to_owned(),
    })
}

fn parse_csv(text: &str) -> Result<Vec<u32>, ParseError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(|cell| {
            let cell = cell.trim();
            cell.parse().map_err(|_| ParseError::InvalidInteger {
                element: "data".to_owned(),
                attribute: "csv",
                value: cell.to_owned(),
            })
        })
        .collect()
}

fn parse_cells(layer: Node<'_, '_>, layer_name: &str) -> Result<Vec<u32>, ParseError> {
    let data = child(layer, "data")?;
    match data.attribute("encoding") {
        Some("csv") => parse_csv(data.text().unwrap_or("")),
        None => {
            let mut tiles = data
                .children()
                .filter(|c| c.is_element() && c.tag_name().name() == "tile")
                .peekable();
            if tiles.peek().is_none() {
                return parse_csv(data.text().unwrap_or(""));
            }
            tiles
                .map(|t| match t.attribute("gid") {
                    Some(_) => int_attr(t, "gid"),
                    None => Ok(0),
                })
                .collect()
        }
        Some(other) => Err(ParseError::UnsupportedEncoding {
            layer: layer_name.to_owned(),
            encoding: other.to_owned(),
        }),
    }
}

fn parse_grid_layer(node: Node<'_, '_>, dims: &MapDimensions) -> Result<GridLayer, ParseError> {
    let name = node.attribute("name").unwrap_or_default().to_owned();
    let cells = parse_cells(node, &name)?;

    let expected = dims.width_tiles as usize * dims.height_tiles as usize;
    if cells.len() != expected {
        return Err(ParseError::InvalidLayerSize {
            layer: name,
            expected,
            found: cells.len(),
        });
    }

    Ok(GridLayer {
        collision: is_collision_name(&name),
        visible: is_visible(node),
        width_tiles: dims.width_tiles,
        height_tiles: dims.height_tiles,
        tile_width: dims.tile_width,
        tile_height: dims.tile_height,
        cells,
        name,
    })
}

fn parse_placements(node: Node<'_, '_>) -> Result<Vec<Placement>, ParseError> {
    node.children()
        .filter(|c| c.is_element() && c.tag_name().name() == "object")
        .map(|obj| -> Result<Placement, ParseError> {
            Ok(Placement {
                tile_id: int_attr(obj, "gid")?,
                x: int_attr(obj, "x")?,
                y: int_attr(obj, "y")?,
            })
        })
        .collect()
}

/// With `read_objects` false the layer is returned without placements and
/// its `<object>` children are never looked at.
fn parse_object_layer(
    node: Node<'_, '_>,
    dims: &MapDimensions,
    read_objects: bool,
) -> Result<ObjectLayer, ParseError> {
    let name = node.attribute("name").unwrap_or_default().to_owned();
    let placements = if read_objects {
        parse_placements(node)?
    } else {
        Vec::new()
    };

    Ok(ObjectLayer {
        collision: is_collision_name(&name),
        visible: is_visible(node),
        width_tiles: dims.width_tiles,
        height_tiles: dims.height_tiles,
        tile_width: dims.tile_width,
        tile_height: dims.tile_height,
        placements,
        name,
    })
}

/// Parses TMX text into a fresh [`MapDocument`].
pub fn parse_document(text: &str, options: &ParseOptions) -> Result<MapDocument, ParseError> {
    let doc = Document::parse(text)?;
    let root = doc.root_element();

    let dimensions = MapDimensions {
        width_tiles: int_attr(root, "width")?,
        height_tiles: int_attr(root, "height")?,
        tile_width: int_attr(root, "tilewidth")?,
        tile_height: int_attr(root, "tileheight")?,
    };
    if dimensions.pixel_size().is_none() {
        let (width, height) = dimensions.wide_pixel_size();
        return Err(ParseError::MapTooLarge { width, height });
    }

    let mut atlases = Vec::new();
    let mut layers = Vec::new();

    for node in root.children().filter(|n| n.is_element()) {
        match node.tag_name().name() {
            "tileset" => {
                let atlas = parse_atlas(node)?;
                log::debug!(
                    "tileset '{}' owns ids {}..{}",
                    atlas.name,
                    atlas.first_id,
                    atlas.first_id as u64 + atlas.tile_count() as u64
                );
                atlases.push(atlas);
            }
            "layer" => {
                let layer = parse_grid_layer(node, &dimensions)?;
                log::debug!("tile layer '{}' (visible: {})", layer.name, layer.visible);
                layers.push(LayerData::Grid(layer));
            }
            "objectgroup" => {
                let stop = !is_visible(node)
                    && options.hidden_object_group == HiddenObjectGroup::StopParsing;
                let layer = parse_object_layer(node, &dimensions, !stop)?;
                if stop {
                    log::warn!(
                        "hidden object group '{}' ends the layer list; later elements are ignored",
                        layer.name
                    );
                    layers.push(LayerData::Objects(layer));
                    break;
                }
                log::debug!(
                    "object group '{}' with {} placements (visible: {})",
                    layer.name,
                    layer.placements.len(),
                    layer.visible
                );
                layers.push(LayerData::Objects(layer));
            }
            _ => {}
        }
    }

    Ok(MapDocument {
        dimensions,
        atlases,
        layers,
    })
}
