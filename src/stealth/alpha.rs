// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/stealth-pnginfo

//! Alpha-plane adapter: carries a bit sequence across pixel alpha LSBs.
//!
//! The pixel grid is an external, borrowed resource — this module never
//! owns pixel memory and never touches anything but the least-significant
//! bit of each alpha value. The scan order is column-major (outer loop
//! over x, inner loop over y); images embedded by other tools use the same
//! order, so it must not change.

use image::RgbaImage;

use super::bitio::{BitReader, BitWriter};
use super::error::Result;
use super::frame;

/// Read access to the alpha channel of a width × height pixel grid.
pub trait AlphaPlane {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Alpha value at (x, y), for x in `0..width`, y in `0..height`.
    fn alpha(&self, x: u32, y: u32) -> u8;
}

/// Write access to the alpha channel. Only alpha is ever written; the
/// other channels belong to the image owner.
pub trait AlphaPlaneMut: AlphaPlane {
    fn set_alpha(&mut self, x: u32, y: u32, alpha: u8);
}

impl AlphaPlane for RgbaImage {
    fn width(&self) -> u32 {
        RgbaImage::width(self)
    }

    fn height(&self) -> u32 {
        RgbaImage::height(self)
    }

    fn alpha(&self, x: u32, y: u32) -> u8 {
        self.get_pixel(x, y).0[3]
    }
}

impl AlphaPlaneMut for RgbaImage {
    fn set_alpha(&mut self, x: u32, y: u32, alpha: u8) {
        self.get_pixel_mut(x, y).0[3] = alpha;
    }
}

/// Bit capacity of a plane: one bit per pixel.
pub fn capacity_bits<P: AlphaPlane + ?Sized>(plane: &P) -> usize {
    plane.width() as usize * plane.height() as usize
}

/// Write the frame bits into the plane's alpha LSBs, column-major.
///
/// Each touched alpha becomes `(alpha & 0xFE) | bit`; the upper 7 bits and
/// every other channel are left untouched, as are all pixels past the end
/// of the bit sequence. A sequence longer than the plane's capacity is
/// truncated at capacity — the wire-level behavior; callers wanting a hard
/// failure check [`capacity_bits`] first (the pipeline does).
///
/// Returns the number of bits written.
pub fn embed_bits<P: AlphaPlaneMut + ?Sized>(plane: &mut P, bits: &BitWriter) -> usize {
    let total = bits.bit_len();
    let mut idx = 0;
    'pixels: for x in 0..plane.width() {
        for y in 0..plane.height() {
            if idx >= total {
                break 'pixels;
            }
            let alpha = plane.alpha(x, y);
            plane.set_alpha(x, y, (alpha & 0xFE) | bits.bit(idx));
            idx += 1;
        }
    }
    idx
}

/// Collect every alpha LSB in column-major order into a packed buffer.
///
/// Returns the buffer and the bit count (always width × height). The
/// frame parser consumes only as many bits as it needs.
pub fn extract_bits<P: AlphaPlane + ?Sized>(plane: &P) -> (Vec<u8>, usize) {
    let mut writer = BitWriter::new();
    for x in 0..plane.width() {
        for y in 0..plane.height() {
            writer.write_bit(plane.alpha(x, y) & 1);
        }
    }
    let bit_len = writer.bit_len();
    (writer.as_bytes().to_vec(), bit_len)
}

/// Recover the still-compressed frame payload from a plane.
pub fn recover_payload<P: AlphaPlane + ?Sized>(plane: &P) -> Result<Vec<u8>> {
    let (bytes, bit_len) = extract_bits(plane);
    let mut reader = BitReader::new(&bytes, bit_len);
    frame::parse_frame(&mut reader)
}
