//! CPU-side RGBA bitmaps with a bottom-left origin.
//!
//! Row 0 of a [`PixelBuffer`] is the *bottom* row, the way sprite and
//! texture coordinates usually count. TMX data and decoded image files are
//! top-down, so every conversion in or out of this type flips vertically.

use macroquad::color::Color;
use macroquad::texture::Image;

/// Fully transparent pixel, what tile id 0 renders as.
pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

/// How a downstream sampler should read a composited buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplerHints {
    /// Nearest-neighbour sampling, no filtering.
    pub point_filtered: bool,
    /// Clamp to edge instead of wrapping.
    pub clamped: bool,
}

impl SamplerHints {
    /// Nearest filtering, clamped edges; what composited layers use.
    pub const POINT_CLAMP: SamplerHints = SamplerHints {
        point_filtered: true,
        clamped: true,
    };
}

/// A `width x height` grid of colors, row-major, `(0, 0)` at bottom-left.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    sampler: SamplerHints,
}

impl PixelBuffer {
    /// Fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, TRANSPARENT)
    }

    /// Buffer with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        PixelBuffer {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
            sampler: SamplerHints::default(),
        }
    }

    /// Wraps raw bottom-up pixels. Returns `None` when the length is wrong.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize {
            return None;
        }
        Some(PixelBuffer {
            width,
            height,
            pixels,
            sampler: SamplerHints::default(),
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major pixels, bottom row first.
    #[inline]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// How this buffer should be sampled.
    #[inline]
    pub fn sampler(&self) -> SamplerHints {
        self.sampler
    }

    /// Replaces the sampler hints.
    pub fn set_sampler(&mut self, sampler: SamplerHints) {
        self.sampler = sampler;
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Pixel at `(x, y)`, counted from the bottom-left.
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.offset(x, y)])
        } else {
            None
        }
    }

    /// Returns false if `(x, y)` is outside the buffer.
    pub fn set(&mut self, x: u32, y: u32, color: Color) -> bool {
        if x < self.width && y < self.height {
            let i = self.offset(x, y);
            self.pixels[i] = color;
            true
        } else {
            false
        }
    }

    /// Fills every pixel with `color`.
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// True when every alpha is zero.
    pub fn is_fully_transparent(&self) -> bool {
        self.pixels.iter().all(|p| p.a == 0.0)
    }

    /// Copies the `w x h` block whose bottom-left corner is `(x, y)`.
    ///
    /// Pixels that fall outside the buffer read as [`TRANSPARENT`], so the
    /// block always has exactly `w * h` entries.
    pub fn read_block(&self, x: u32, y: u32, w: u32, h: u32) -> Vec<Color> {
        let mut out = Vec::with_capacity(w as usize * h as usize);
        for row in 0..h {
            let sy = y.saturating_add(row);
            for col in 0..w {
                let sx = x.saturating_add(col);
                out.push(self.get(sx, sy).unwrap_or(TRANSPARENT));
            }
        }
        out
    }

    /// Overwrites the `w x h` block whose bottom-left corner is `(x, y)`.
    ///
    /// `block` is row-major, bottom row first. Anything outside the buffer
    /// is dropped. Returns true when the whole block landed inside.
    pub fn write_block(&mut self, x: i64, y: i64, w: u32, h: u32, block: &[Color]) -> bool {
        debug_assert_eq!(block.len(), w as usize * h as usize);
        let mut inside = true;
        for row in 0..h as i64 {
            let dy = y + row;
            if dy < 0 || dy >= self.height as i64 {
                inside = false;
                continue;
            }
            let src_row = (row as usize) * w as usize;
            for col in 0..w as i64 {
                let dx = x + col;
                if dx < 0 || dx >= self.width as i64 {
                    inside = false;
                    continue;
                }
                let i = self.offset(dx as u32, dy as u32);
                self.pixels[i] = block[src_row + col as usize];
            }
        }
        inside
    }

    /// Imports a decoded image. Images store their top row first.
    pub fn from_image(image: &Image) -> Self {
        let width = image.width as u32;
        let height = image.height as u32;
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height as usize {
            let src_row = height as usize - 1 - y;
            let start = src_row * width as usize * 4;
            for px in image.bytes[start..start + width as usize * 4].chunks_exact(4) {
                pixels.push(Color::from_rgba(px[0], px[1], px[2], px[3]));
            }
        }
        PixelBuffer {
            width,
            height,
            pixels,
            sampler: SamplerHints::default(),
        }
    }

    /// Exports to a top-down image. `None` when a side exceeds `u16::MAX`.
    pub fn to_image(&self) -> Option<Image> {
        let width = u16::try_from(self.width).ok()?;
        let height = u16::try_from(self.height).ok()?;
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for y in (0..self.height).rev() {
            let start = self.offset(0, y);
            for c in &self.pixels[start..start + self.width as usize] {
                bytes.extend_from_slice(&color_to_rgba8(*c));
            }
        }
        Some(Image {
            bytes,
            width,
            height,
        })
    }
}

#[inline]
fn channel_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn color_to_rgba8(c: Color) -> [u8; 4] {
    [
        channel_to_u8(c.r),
        channel_to_u8(c.g),
        channel_to_u8(c.b),
        channel_to_u8(c.a),
    ]
}
