//! Raw video frames.

use serde::{Deserialize, Serialize};

/// One emulated video frame in packed RGB565.
///
/// Equality is exact byte-content equality; two frames rendered from
/// identical machine states compare equal regardless of provenance.
///
/// Invariant: `pixels.len() == width * height * 2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Packed RGB565 pixel data, native byte order, row-major.
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    pub fn new(pixels: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 2) as usize);
        Self { pixels, width, height }
    }

    /// Expand packed RGB565 to 8-bit RGBA (alpha fixed at 255).
    ///
    /// The 5/6-bit channels are widened by replicating their high bits so
    /// full-scale values map to 255 rather than 248/252.
    pub fn to_rgba(&self) -> Vec<u8> {
        let packed: Vec<u16> = bytemuck::pod_collect_to_vec(&self.pixels);
        let mut rgba = Vec::with_capacity(packed.len() * 4);
        for value in packed {
            let r = ((value >> 11) & 0x1f) as u8;
            let g = ((value >> 5) & 0x3f) as u8;
            let b = (value & 0x1f) as u8;
            rgba.push((r << 3) | (r >> 2));
            rgba.push((g << 2) | (g >> 4));
            rgba.push((b << 3) | (b >> 2));
            rgba.push(0xff);
        }
        rgba
    }
}
