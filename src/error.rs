//! Error types for each stage: parse, asset load, tile resolution.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while reading a TMX document. No partial document is returned.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not well-formed XML
    #[error("malformed TMX document: {0}")]
    MalformedDocument(#[from] roxmltree::Error),
    /// A required attribute is absent
    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        /// Tag name of the element.
        element: String,
        /// Name of the missing attribute.
        attribute: &'static str,
    },
    /// An attribute or CSV cell is not an integer
    #[error("<{element}> attribute '{attribute}' is not an integer: {value:?}")]
    InvalidInteger {
        /// Tag name of the element.
        element: String,
        /// Attribute name, or `csv` for a data cell.
        attribute: &'static str,
        /// The offending text.
        value: String,
    },
    /// A required child element is absent
    #[error("<{parent}> is missing required child <{child}>")]
    MissingElement {
        /// Tag name of the parent.
        parent: String,
        /// Tag name that was expected.
        child: &'static str,
    },
    /// A grid layer's cell count does not match width * height
    #[error("layer '{layer}' has {found} cells, expected {expected}")]
    InvalidLayerSize {
        /// Layer name.
        layer: String,
        /// `width * height` of the map.
        expected: usize,
        /// Cells actually present.
        found: usize,
    },
    /// Map pixel size overflows or exceeds what a layer bitmap may hold
    #[error("map is {width}x{height} pixels, larger than a layer bitmap allows")]
    MapTooLarge {
        /// `width * tilewidth`
        width: u64,
        /// `height * tileheight`
        height: u64,
    },
    /// Layer data uses an encoding other than csv or plain xml
    #[error("layer '{layer}' uses unsupported data encoding '{encoding}'")]
    UnsupportedEncoding {
        /// Layer name.
        layer: String,
        /// Value of the `encoding` attribute.
        encoding: String,
    },
    /// Map file is not a .tmx file
    #[error("unsupported map file format: {0}")]
    UnsupportedFormat(String),
    /// Reading the map file failed
    #[error("failed to read map file {path:?}: {source}")]
    Io {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Failure while fetching an atlas pixel source from the asset provider.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No image is registered or on disk for this key
    #[error("atlas asset '{key}' was not found")]
    AssetNotFound {
        /// Lookup key, `folder/name` or `name`.
        key: String,
    },
    /// The file exists but is not a readable image
    #[error("atlas asset '{key}' could not be decoded: {message}")]
    Decode {
        /// Lookup key.
        key: String,
        /// Decoder message.
        message: String,
    },
    /// The file could not be read
    #[error("failed to read atlas asset {path:?}: {source}")]
    Io {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// A non-zero tile id that no atlas claims.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// Raised by the compositor; aborts the whole render.
    #[error("tile id {tile_id} in layer '{layer}' does not belong to any atlas")]
    UnresolvedTileId {
        /// Layer being composited.
        layer: String,
        /// The id no atlas claims.
        tile_id: u32,
    },
}

/// Everything that can go wrong between a TMX string and presented layers.
#[derive(Debug, Error)]
pub enum MapError {
    /// See [`ParseError`].
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// See [`LoadError`].
    #[error(transparent)]
    Load(#[from] LoadError),
    /// See [`ResolutionError`].
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    /// Settings JSON could not be read
    #[error("invalid tile map settings: {0}")]
    Settings(#[from] serde_json::Error),
    /// Settings file could not be opened
    #[error("failed to read settings file {path:?}: {source}")]
    SettingsIo {
        /// Settings file path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Layer bitmap exceeds what a layer bitmap or texture can hold
    #[error("layer '{layer}' is {width}x{height} pixels, larger than a layer bitmap allows")]
    TooLarge {
        /// Layer name.
        layer: String,
        /// Width in pixels, computed without overflow.
        width: u64,
        /// Height in pixels, computed without overflow.
        height: u64,
    },
}
