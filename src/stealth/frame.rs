// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/stealth-pnginfo

//! Stealth payload frame construction and parsing.
//!
//! The frame is the bit sequence that carries the compressed metadata
//! across the alpha plane:
//!
//! ```text
//! [15 bytes] ASCII magic "stealth_pngcomp"
//! [ 4 bytes] payload length in bits (big-endian i32, always byte_count × 8)
//! [ N bytes] gzip-compressed payload (N = length / 8)
//! ```
//!
//! The length field counts bits, not bytes — a quirk of the format that is
//! load-bearing for compatibility with images already in the wild.

use super::bitio::{BitReader, BitWriter};
use super::error::{Result, StealthError};

/// ASCII magic token opening every stealth frame.
pub const MAGIC: &[u8; 15] = b"stealth_pngcomp";

/// Frame overhead in bits: magic (15 × 8) + length field (32).
pub const FRAME_OVERHEAD_BITS: usize = MAGIC.len() * 8 + 32;

/// Build the frame bit sequence for an already-compressed payload.
///
/// Succeeds for any payload, including empty. The only failure is a payload
/// whose bit count does not fit the signed 32-bit length field.
pub fn build_frame(compressed: &[u8]) -> Result<BitWriter> {
    if compressed.len() > i32::MAX as usize / 8 {
        return Err(StealthError::PayloadTooLarge {
            required_bits: FRAME_OVERHEAD_BITS + compressed.len().saturating_mul(8),
            capacity_bits: FRAME_OVERHEAD_BITS + i32::MAX as usize,
        });
    }

    let mut writer = BitWriter::new();
    writer.write_bytes(MAGIC);
    writer.write_i32(compressed.len() as i32 * 8);
    writer.write_bytes(compressed);
    Ok(writer)
}

/// Parse a frame from recovered bits, returning the still-compressed payload.
///
/// # Errors
/// - [`StealthError::OutOfRange`] if the stream holds fewer bits than the
///   magic and length field need.
/// - [`StealthError::MagicMismatch`] if the first 15 bytes are not the
///   magic token — the common "no hidden payload" outcome.
/// - [`StealthError::InvalidLength`] if the length field is negative or not
///   a multiple of 8.
/// - [`StealthError::TruncatedPayload`] if fewer bits remain than declared.
pub fn parse_frame(reader: &mut BitReader<'_>) -> Result<Vec<u8>> {
    let magic = reader.read_bytes(MAGIC.len())?;
    if magic != MAGIC {
        return Err(StealthError::MagicMismatch);
    }

    let payload_bits = reader.read_i32()?;
    if payload_bits < 0 || payload_bits % 8 != 0 {
        return Err(StealthError::InvalidLength(payload_bits));
    }
    let payload_bits = payload_bits as usize;
    if reader.remaining() < payload_bits {
        return Err(StealthError::TruncatedPayload);
    }

    reader.read_bytes(payload_bits / 8)
}
