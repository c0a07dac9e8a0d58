//! CPU-side decoded images.
//!
//! The GPU texture itself is host-owned; the core only hands the host a
//! decoded RGBA8 pixel buffer with its dimensions and row stride.

use std::path::Path;

use crate::errors::Result;

/// A decoded image, tightly packed RGBA8.
#[derive(Debug, Clone)]
pub struct Image {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Image {
    /// Wraps an already-decoded RGBA8 pixel buffer.
    ///
    /// # Panics
    ///
    /// Panics when `data.len() != width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            width as usize * height as usize * 4,
            "pixel buffer size does not match {width}x{height} RGBA8"
        );
        Self { width, height, data }
    }

    /// Decodes an encoded image (PNG/JPEG) from memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = decoded.dimensions();
        Ok(Self {
            width,
            height,
            data: decoded.into_raw(),
        })
    }

    /// Loads and decodes an image file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let decoded = image::open(path)?.to_rgba8();
        let (width, height) = decoded.dimensions();
        Ok(Self {
            width,
            height,
            data: decoded.into_raw(),
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes.
    #[inline]
    pub fn stride(&self) -> u32 {
        self.width * 4
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
