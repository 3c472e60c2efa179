//! Where atlas pixels come from.
//!
//! The renderer never touches the filesystem itself; it asks an
//! [`AssetProvider`] for a decoded image by key. Keys are the atlas base
//! name, prefixed with `folder/` when a tile folder is configured.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use macroquad::texture::Image;

use crate::error::LoadError;
use crate::pixels::PixelBuffer;

/// `folder/name`, or just `name` when `folder` is empty.
pub fn asset_key(folder: &str, name: &str) -> String {
    if folder.is_empty() {
        name.to_owned()
    } else {
        format!("{folder}/{name}")
    }
}

/// Source of decoded atlas images.
pub trait AssetProvider {
    /// Returns the decoded image for `key`, or [`LoadError::AssetNotFound`].
    fn lookup(&self, key: &str) -> Result<PixelBuffer, LoadError>;
}

/// Images registered up front, keyed exactly as the renderer asks for them.
#[derive(Debug, Default, Clone)]
pub struct MemoryAssets {
    images: HashMap<String, PixelBuffer>,
}

impl MemoryAssets {
    /// Empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a bottom-up buffer under `key`, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, image: PixelBuffer) {
        self.images.insert(key.into(), image);
    }

    /// Registers a top-down macroquad image.
    pub fn insert_image(&mut self, key: impl Into<String>, image: &Image) {
        self.insert(key, PixelBuffer::from_image(image));
    }
}

impl AssetProvider for MemoryAssets {
    fn lookup(&self, key: &str) -> Result<PixelBuffer, LoadError> {
        self.images
            .get(key)
            .cloned()
            .ok_or_else(|| LoadError::AssetNotFound { key: key.to_owned() })
    }
}

/// Reads `<root>/<key>.<ext>` from disk, trying each extension in turn.
#[derive(Debug, Clone)]
pub struct FolderAssets {
    root: PathBuf,
    extensions: Vec<String>,
}

impl FolderAssets {
    /// Looks for `.png` files under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FolderAssets {
            root: root.into(),
            extensions: vec!["png".to_owned()],
        }
    }

    /// Replaces the extensions tried, in order.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Folder keys are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn candidate(&self, key: &str) -> Option<PathBuf> {
        self.extensions
            .iter()
            .map(|ext| self.root.join(format!("{key}.{ext}")))
            .find(|p| p.is_file())
    }
}

impl AssetProvider for FolderAssets {
    fn lookup(&self, key: &str) -> Result<PixelBuffer, LoadError> {
        let path = self
            .candidate(key)
            .ok_or_else(|| LoadError::AssetNotFound { key: key.to_owned() })?;
        let bytes = std::fs::read(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let image = Image::from_file_with_format(&bytes, None).map_err(|e| LoadError::Decode {
            key: key.to_owned(),
            message: format!("{e:?}"),
        })?;
        Ok(PixelBuffer::from_image(&image))
    }
}
