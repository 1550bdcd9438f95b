// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/stealth-pnginfo

//! Stealth encode/decode pipeline.
//!
//! Encode: gzip the metadata text, wrap it in the magic + length frame,
//! and write the frame bits into the alpha plane. Decode is the mirror:
//! read the alpha plane, parse the frame, gunzip, and parse the metadata
//! as JSON. The PNG-bytes layer at the bottom wraps the same pipeline for
//! callers holding an encoded file rather than a pixel grid.

use std::io::{Cursor, Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use super::alpha::{self, AlphaPlane, AlphaPlaneMut};
use super::error::{Result, StealthError};
use super::frame;

/// Embed a metadata string into the alpha plane of `plane`.
///
/// The metadata is conventionally a JSON document but any UTF-8 text is
/// accepted; [`stealth_decode`] parses whatever comes back as JSON.
///
/// # Errors
/// [`StealthError::PayloadTooLarge`] if the framed payload does not fit
/// width × height bits. The plane is untouched in that case.
pub fn stealth_encode<P: AlphaPlaneMut + ?Sized>(plane: &mut P, metadata: &str) -> Result<()> {
    // 1. Compress. Writing into a Vec cannot fail.
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(metadata.as_bytes())
        .expect("gzip to Vec cannot fail");
    let compressed = encoder.finish().expect("gzip to Vec cannot fail");

    // 2. Frame.
    let frame = frame::build_frame(&compressed)?;

    // 3. Reject up front instead of silently truncating mid-payload.
    let capacity_bits = alpha::capacity_bits(plane);
    if frame.bit_len() > capacity_bits {
        return Err(StealthError::PayloadTooLarge {
            required_bits: frame.bit_len(),
            capacity_bits,
        });
    }

    // 4. Embed.
    alpha::embed_bits(plane, &frame);
    Ok(())
}

/// Recover the metadata hidden in `plane`'s alpha LSBs.
///
/// # Errors
/// - [`StealthError::MagicMismatch`] if the plane carries no stealth frame
///   (the common outcome for an ordinary image).
/// - [`StealthError::OutOfRange`] / [`StealthError::InvalidLength`] /
///   [`StealthError::TruncatedPayload`] for malformed frames.
/// - [`StealthError::Decompression`] if the payload is not a gzip stream.
/// - [`StealthError::InvalidUtf8`] / [`StealthError::InvalidJson`] if the
///   decompressed payload is not UTF-8 JSON.
pub fn stealth_decode<P: AlphaPlane + ?Sized>(plane: &P) -> Result<serde_json::Value> {
    // 1. Read the plane and slice the compressed payload out of the frame.
    let compressed = alpha::recover_payload(plane)?;

    // 2. Decompress.
    let mut plaintext = Vec::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_end(&mut plaintext)
        .map_err(|_| StealthError::Decompression)?;

    // 3. Decode and parse.
    let text = String::from_utf8(plaintext).map_err(|_| StealthError::InvalidUtf8)?;
    serde_json::from_str(&text).map_err(StealthError::InvalidJson)
}

/// Embed metadata into a PNG file, returning the re-encoded PNG bytes.
///
/// Decodes with the `image` crate, converts to RGBA8 (the alpha channel
/// must exist to carry bits), embeds, and re-encodes as PNG. Only lossless
/// output makes sense here — any lossy re-encode would shred the LSBs.
pub fn stealth_encode_png(png_bytes: &[u8], metadata: &str) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(png_bytes).map_err(StealthError::InvalidImage)?;
    let mut rgba = decoded.to_rgba8();

    stealth_encode(&mut rgba, metadata)?;

    let mut out = Cursor::new(Vec::new());
    rgba.write_to(&mut out, image::ImageFormat::Png)
        .map_err(StealthError::InvalidImage)?;
    Ok(out.into_inner())
}

/// Recover metadata from a PNG file's alpha plane.
pub fn stealth_decode_png(png_bytes: &[u8]) -> Result<serde_json::Value> {
    let decoded = image::load_from_memory(png_bytes).map_err(StealthError::InvalidImage)?;
    stealth_decode(&decoded.to_rgba8())
}
