// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/stealth-pnginfo

//! The stealth hiding protocol: frame codec plus alpha-plane transport.
//!
//! Wire format, bit-exact:
//!
//! ```text
//! [15 bytes] ASCII magic "stealth_pngcomp"
//! [ 4 bytes] payload length in bits (big-endian i32)
//! [ N bytes] gzip-compressed metadata (N = length / 8)
//! ```
//!
//! Bytes are packed MSB-first and carried one bit per pixel in the alpha
//! channel's least-significant bit, scanning columns first (x outer, y
//! inner). Everything here is synchronous; each call owns its bitstream
//! for the call's duration and borrows the pixel plane from the caller.

pub mod alpha;
pub mod bitio;
pub mod error;
pub mod frame;
mod pipeline;

pub use alpha::{AlphaPlane, AlphaPlaneMut, capacity_bits};
pub use error::StealthError;
pub use frame::{FRAME_OVERHEAD_BITS, MAGIC};
pub use pipeline::{stealth_decode, stealth_decode_png, stealth_encode, stealth_encode_png};
