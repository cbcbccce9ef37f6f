//! # Lossless byte-oriented compression codecs
//!
//! *Three classic entropy coders over raw octet buffers: run-length,
//! Huffman, and Rice coding.*
//!
//! ## Intuition First
//!
//! All three codecs exploit the same observation from different angles:
//! real data is not uniformly random. Run-length encoding bets on
//! *repetition* (the same byte occurring many times in a row). Huffman
//! coding bets on a *skewed histogram* (some byte values occurring far more
//! often than others) and hands the frequent ones short bit patterns. Rice
//! coding bets on *small values* (a geometric-ish distribution) and spends
//! roughly `log2(value)` bits per symbol once its parameter is tuned.
//!
//! ## The Problem
//!
//! Bytes are a convenient unit for storage but a wasteful unit for
//! information. Squeezing out the slack means trading the fixed 8-bit cell
//! for variable-length bit patterns, which in turn demands machinery for
//! addressing, growing, and replaying buffers one bit at a time. That
//! bit-stream substrate is where most of the subtlety in this crate lives;
//! the coders on top are short once it exists.
//!
//! ## Historical Context
//!
//! ```text
//! 1948  Shannon     Entropy as the fundamental limit
//! 1952  Huffman     Optimal prefix codes from a frequency-sorted merge
//! 1966  Golomb      Divisor codes for geometric distributions
//! 1979  Rice        Power-of-two Golomb codes, cheap on real hardware
//! ```
//!
//! ## Layout
//!
//! - [`bitstream`]: the shared substrate. A growable [`BitWriter`], a
//!   borrowing [`BitReader`], and the [`Code`] value they exchange. Bits
//!   are packed LSB-first within each byte.
//! - [`rle`]: `(count, byte)` packets with a compile-time count width.
//! - [`huffman`]: tree construction over a fixed node pool, a serialized
//!   code-table prefix, and a table-scan decoder.
//! - [`rice`]: per-buffer parameter search plus unary/binary symbol codes.
//!
//! Each codec exposes one-shot `easy_encode`/`easy_decode` entry points and
//! the lower-level encoder/decoder types they are built from.
//!
//! ## Complexity Analysis
//!
//! - **RLE**: O(n) both ways, no allocation.
//! - **Huffman**: O(n + s log s) encode for s distinct symbols; the
//!   reference decoder scans a 256-entry table per emitted byte.
//! - **Rice**: O(n * k_max) parameter search, then O(n) both ways.
//!
//! ## Failure Modes
//!
//! 1. **Pathological inputs**: Huffman codes are capped at 64 bits and the
//!    inner-node pool at 512 entries; pathological frequency ladders fail
//!    with an error rather than producing a broken stream.
//! 2. **Expansion**: all three codecs can make incompressible data larger
//!    (RLE up to 2x, Huffman by its ~320-byte table prefix). Nothing here
//!    falls back to stored mode; callers compare sizes if they care.
//!
//! ## References
//!
//! - Huffman, D. (1952). "A Method for the Construction of
//!   Minimum-Redundancy Codes."
//! - Rice, R. F. (1979). "Some Practical Universal Noiseless Coding
//!   Techniques." JPL Technical Report 79-22.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitstream;
pub mod error;
pub mod huffman;
pub mod rice;
pub mod rle;

pub use bitstream::{BitReader, BitWriter, Code};
pub use error::{Error, Result};
