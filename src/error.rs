//! Error types for the compression codecs.

use thiserror::Error;

/// Error variants for encode/decode operations.
///
/// Decode errors that interrupt an operation midway carry the number of
/// bytes already produced, so callers can salvage a partial result from
/// their output buffer if they want to.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A code grew past the 64-bit limit of [`Code`](crate::bitstream::Code).
    #[error("code length exceeds 64 bits")]
    CodeOverflow,

    /// The bit stream ended while more bits were expected.
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// The fixed pool of Huffman inner nodes is exhausted.
    #[error("no free huffman node slots")]
    NodePoolExhausted,

    /// A code length field holds a value outside the valid (0, 64] range.
    #[error("invalid code length: {0} bits")]
    BadCodeLength(usize),

    /// The Huffman stream header carries an unexpected code count.
    #[error("unexpected code count in stream header: {0} (expected 256)")]
    BadCodeCount(u64),

    /// The output buffer filled up with input left to decode, or an
    /// encoder ran out of room for its next packet.
    #[error("output buffer full after {decoded} bytes")]
    OutputTooSmall {
        /// Bytes produced before the buffer filled.
        decoded: usize,
    },

    /// The compressed stream ended before the expected output was produced.
    #[error("compressed stream ended after {decoded} bytes")]
    TruncatedStream {
        /// Bytes produced before the stream ended.
        decoded: usize,
    },

    /// An empty input or output buffer was passed to an easy entry point.
    #[error("empty input or output buffer")]
    EmptyInput,
}

/// A specialized Result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
