//! From a parsed document to composited layer bitmaps.

pub mod compositor;
pub mod renderer;

pub use compositor::{composite, resolve_atlas};
pub use renderer::{MapRenderer, RenderedLayer};
