//! Rice coding (power-of-two Golomb coding).
//!
//! Robert F. Rice's 1979 JPL reports popularized Golomb codes with a
//! power-of-two divisor `M = 2^K`: a byte splits into quotient `q = v >> K`
//! and remainder `r = v & (M - 1)`, written as `q` one-bits, a zero
//! terminator, then the K-bit remainder. No divisions, just shifts, which
//! is why the scheme survives in FLAC, CCSDS telemetry, and lossless JPEG.
//!
//! The encoder here searches `K` in `[0, k_max]` for the parameter that
//! minimizes the total bit count of the buffer, stores it in a 4-bit
//! header field, and encodes every byte with it. One asymmetry is part of
//! the wire format: the remainder is written MSB-first at the symbol
//! level, while the substrate packs everything else LSB-first. Encoder and
//! decoder agree, and changing it would break stored streams.
//!
//! The stream is not self-delimiting; the decoder is told how many bytes
//! to produce.

use log::debug;

use crate::bitstream::{BitReader, BitWriter};
use crate::error::{Error, Result};

/// Upper bound of the parameter search used by [`easy_encode`].
pub const EASY_K_MAX: usize = 8;

/// Width of the parameter header field; K up to 15 fits.
const PARAMETER_BITS: usize = 4;

/// Length in bits of the Rice code for `value` with parameter `k`:
/// `q + 1 + k` where `q = value >> k`.
pub fn code_length(value: u8, k: usize) -> usize {
    (value as usize >> k) + 1 + k
}

/// Exhaustive search for the parameter minimizing the encoded size of
/// `input` over `k` in `[0, k_max]`. Ties go to the lowest `k`.
///
/// Returns `(best_k, best_total_bits)`, the header field excluded.
pub fn find_best_k(input: &[u8], k_max: usize) -> (usize, usize) {
    let mut best_k = 0;
    let mut best_size = 0;

    for k in 0..=k_max {
        let total: usize = input.iter().map(|&b| code_length(b, k)).sum();
        if best_size == 0 || total < best_size {
            best_size = total;
            best_k = k;
        }
    }
    (best_k, best_size)
}

// ========================================================
// Encoder
// ========================================================

/// Rice encoder over a growable bit stream.
#[derive(Debug, Default)]
pub struct Encoder {
    stream: BitWriter,
}

impl Encoder {
    /// An encoder with the default buffer reserve.
    pub fn new() -> Self {
        Self {
            stream: BitWriter::new(),
        }
    }

    /// An encoder reserving `initial_bits` up front, for callers that
    /// already predicted the output size via [`find_best_k`].
    pub fn with_capacity(initial_bits: usize) -> Self {
        Self {
            stream: BitWriter::with_capacity(initial_bits, 2),
        }
    }

    /// Writes the 4-bit parameter header field, LSB-first.
    pub fn write_parameter(&mut self, k: usize) {
        debug_assert!(k < 1 << PARAMETER_BITS);
        self.stream.append_bits_u64(k as u64, PARAMETER_BITS);
    }

    /// Appends one byte: the unary quotient, a zero terminator, then the
    /// k-bit remainder MSB-first.
    pub fn encode_byte(&mut self, value: u8, k: usize) {
        let q = value as usize >> k;
        for _ in 0..q {
            self.stream.append_bit(1);
        }
        self.stream.append_bit(0);

        for i in (0..k).rev() {
            self.stream.append_bit(((value as usize >> i) & 1) as u8);
        }
    }

    /// Bytes in use, trailing partial byte included.
    pub fn byte_count(&self) -> usize {
        self.stream.byte_count()
    }

    /// Exact bit count written.
    pub fn bit_count(&self) -> usize {
        self.stream.bit_count()
    }

    /// View of the underlying stream buffer.
    pub fn data(&self) -> &[u8] {
        self.stream.data()
    }

    /// Hands the encoded buffer to the caller; the encoder resets.
    pub fn release(&mut self) -> Vec<u8> {
        self.stream.release()
    }

    /// The underlying bit writer.
    pub fn bit_writer(&self) -> &BitWriter {
        &self.stream
    }
}

// ========================================================
// Decoder
// ========================================================

/// Rice decoder over a borrowed stream.
///
/// Construction consumes the 4-bit parameter header; each
/// [`decode_byte`](Self::decode_byte) then replays one symbol.
#[derive(Debug)]
pub struct Decoder<'a> {
    stream: BitReader<'a>,
    k: usize,
}

impl<'a> Decoder<'a> {
    /// A decoder over `data`, of which `bit_count` bits are valid.
    ///
    /// # Errors
    /// [`Error::UnexpectedEof`] if even the parameter field is missing.
    pub fn new(data: &'a [u8], bit_count: usize) -> Result<Self> {
        let mut stream = BitReader::new(data, bit_count);
        let k = stream.read_bits_u64(PARAMETER_BITS)? as usize;
        stream.clear_code();
        Ok(Self { stream, k })
    }

    /// A decoder reading an encoder's output in place.
    ///
    /// # Errors
    /// Fails like [`Decoder::new`].
    pub fn from_encoder(encoder: &'a Encoder) -> Result<Self> {
        Self::new(encoder.data(), encoder.bit_count())
    }

    /// The parameter recovered from the header.
    pub fn parameter(&self) -> usize {
        self.k
    }

    /// Decodes one byte as `M * q + r`.
    ///
    /// Returns `Ok(None)` when the stream ends cleanly before a symbol
    /// starts.
    ///
    /// # Errors
    /// [`Error::UnexpectedEof`] when the stream ends in the middle of a
    /// symbol.
    pub fn decode_byte(&mut self) -> Result<Option<u8>> {
        let m = 1usize << self.k;

        let mut q = 0usize;
        loop {
            match self.stream.read_bit() {
                Some(1) => q += 1,
                Some(_) => break,
                None if q == 0 => return Ok(None),
                None => return Err(Error::UnexpectedEof),
            }
        }

        let mut value = m * q;
        for i in (0..self.k).rev() {
            let bit = self.stream.read_bit().ok_or(Error::UnexpectedEof)?;
            value |= (bit as usize) << i;
        }
        Ok(Some(value as u8))
    }
}

// ========================================================
// Easy one-shot entry points
// ========================================================

/// Compresses `uncompressed` with the best parameter in `[0, 8]`.
///
/// Returns the buffer and its exact size in bits; ownership of the buffer
/// moves to the caller. The stream starts with the 4-bit parameter field,
/// so it is self-describing up to K; the byte count is not recoverable
/// from the stream and must travel beside it.
///
/// # Errors
/// [`Error::EmptyInput`] when handed an empty slice.
pub fn easy_encode(uncompressed: &[u8]) -> Result<(Vec<u8>, usize)> {
    if uncompressed.is_empty() {
        return Err(Error::EmptyInput);
    }

    let (k, predicted_bits) = find_best_k(uncompressed, EASY_K_MAX);
    debug!("rice: parameter k={k} predicts {predicted_bits} bits");

    let mut encoder = Encoder::with_capacity(predicted_bits + PARAMETER_BITS);
    encoder.write_parameter(k);
    for &byte in uncompressed {
        encoder.encode_byte(byte, k);
    }

    let bit_count = encoder.bit_count();
    Ok((encoder.release(), bit_count))
}

/// Decompresses the output of [`easy_encode`] into `uncompressed`, whose
/// length is the expected byte count. Returns the bytes produced.
///
/// # Errors
/// [`Error::EmptyInput`] for empty buffers or a zero bit count, and
/// [`Error::TruncatedStream`] (with the partial count) if the stream ends
/// before `uncompressed` fills.
pub fn easy_decode(
    compressed: &[u8],
    compressed_size_bits: usize,
    uncompressed: &mut [u8],
) -> Result<usize> {
    if compressed.is_empty() || compressed_size_bits == 0 || uncompressed.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut decoder = Decoder::new(compressed, compressed_size_bits)?;
    let mut decoded = 0;
    while decoded < uncompressed.len() {
        match decoder.decode_byte() {
            Ok(Some(value)) => {
                uncompressed[decoded] = value;
                decoded += 1;
            }
            Ok(None) | Err(Error::UnexpectedEof) => {
                return Err(Error::TruncatedStream { decoded });
            }
            Err(other) => return Err(other),
        }
    }
    Ok(decoded)
}

// ========================================================
// Tests
// ========================================================
