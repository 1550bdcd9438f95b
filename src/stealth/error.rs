// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/stealth-pnginfo

//! Error types for the stealth embedding and extraction pipeline.
//!
//! [`StealthError`] covers all failure modes from bitstream exhaustion
//! through frame parsing, decompression, and metadata parsing. Every
//! decode-side condition is a distinct variant so callers can tell "no
//! hidden data present" ([`StealthError::MagicMismatch`], the common case)
//! from "hidden data present but corrupted" (everything else). None of
//! these conditions is fatal; they describe malformed or absent input.

use std::fmt;

/// Errors that can occur while embedding or recovering a stealth payload.
#[derive(Debug)]
pub enum StealthError {
    /// A bitstream read ran past the end of the available bits.
    OutOfRange,
    /// The first 15 embedded bytes are not the `stealth_pngcomp` magic —
    /// the image carries no hidden payload.
    MagicMismatch,
    /// The length field is negative or not a multiple of 8. Valid frames
    /// always declare a non-negative bit count that is byte-aligned.
    InvalidLength(i32),
    /// The length field declares more payload bits than the image holds.
    TruncatedPayload,
    /// The framed payload does not fit the alpha plane's capacity.
    PayloadTooLarge {
        /// Total bits the frame needs (magic + length field + payload).
        required_bits: usize,
        /// Bits the plane can carry (width × height).
        capacity_bits: usize,
    },
    /// The embedded payload bytes are not a valid gzip stream.
    Decompression,
    /// The decompressed payload is not valid UTF-8.
    InvalidUtf8,
    /// The decompressed text does not parse as JSON.
    InvalidJson(serde_json::Error),
    /// The input bytes could not be decoded or re-encoded as an image.
    InvalidImage(image::ImageError),
}

impl fmt::Display for StealthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange => write!(f, "bitstream exhausted"),
            Self::MagicMismatch => write!(f, "magic bytes not found (no hidden payload)"),
            Self::InvalidLength(bits) => write!(f, "invalid payload length field: {bits} bits"),
            Self::TruncatedPayload => write!(f, "payload truncated before declared length"),
            Self::PayloadTooLarge {
                required_bits,
                capacity_bits,
            } => write!(
                f,
                "payload needs {required_bits} bits but the plane holds {capacity_bits}"
            ),
            Self::Decompression => write!(f, "payload is not a valid gzip stream"),
            Self::InvalidUtf8 => write!(f, "decompressed payload is not valid UTF-8"),
            Self::InvalidJson(e) => write!(f, "metadata is not valid JSON: {e}"),
            Self::InvalidImage(e) => write!(f, "invalid image: {e}"),
        }
    }
}

impl std::error::Error for StealthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidJson(e) => Some(e),
            Self::InvalidImage(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, StealthError>;
