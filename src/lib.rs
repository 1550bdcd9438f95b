// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/stealth-pnginfo

//! # stealth-pnginfo
//!
//! Hides and recovers gzip-compressed JSON metadata in the least-significant
//! bit of an image's alpha channel ("stealth pnginfo", magic
//! `stealth_pngcomp`), and extracts the `__metadata__` block from safetensors
//! model headers by balanced-brace matching.
//!
//! Two independent layers:
//!
//! - **`stealth`**: the bit-level hiding protocol — a packed bitstream
//!   reader/writer, the magic + length + payload frame codec, and the
//!   alpha-plane adapter that carries the frame across pixel LSBs in
//!   column-major order.
//! - **`safetensors`**: locating and parsing a JSON object embedded in a
//!   larger text buffer without a length prefix, including the second-pass
//!   parse of known JSON-encoded string fields.
//!
//! The crate never owns pixel memory or decodes image formats itself; pixel
//! access goes through the [`AlphaPlane`] / [`AlphaPlaneMut`] traits
//! (implemented for `image::RgbaImage`), and the PNG convenience layer
//! delegates file decoding to the `image` crate.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use stealth_pnginfo::{stealth_encode_png, stealth_decode_png};
//!
//! let cover = std::fs::read("photo.png").unwrap();
//! let stego = stealth_encode_png(&cover, r#"{"prompt":"a cat"}"#).unwrap();
//! let meta = stealth_decode_png(&stego).unwrap();
//! assert_eq!(meta["prompt"], "a cat");
//! ```

pub mod safetensors;
pub mod stealth;

pub use safetensors::{MetaError, extract_metadata};
pub use stealth::alpha::{AlphaPlane, AlphaPlaneMut};
pub use stealth::bitio::{BitReader, BitWriter};
pub use stealth::{
    StealthError, stealth_decode, stealth_decode_png, stealth_encode, stealth_encode_png,
};
