//! Run-length encoding over raw byte buffers.
//!
//! The oldest trick in the book: a run of identical bytes becomes a single
//! `(count, byte)` packet. The count field width is a compile-time choice
//! between 8 and 16 bits, made by instantiating the entry points with
//! [`u8`] or [`u16`]; both peers must agree on it. A 16-bit count pays off
//! on long runs and doubles the worst case on unlucky data.
//!
//! The wire format is neither self-describing nor self-terminating: the
//! decoder consumes exactly the input it is handed, which must be a whole
//! number of packets. The 16-bit count is serialized little-endian.

use crate::error::{Error, Result};

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
}

/// Width of the run-count field, selected at compile time.
///
/// Implemented for [`u8`] (counts up to 255, 2-byte packets) and [`u16`]
/// (counts up to 65535, 3-byte packets). The trait is sealed; no other
/// widths are valid on the wire.
pub trait RunCount: sealed::Sealed + Copy {
    /// Longest run a single packet can carry.
    const MAX_RUN: u32;

    /// Size of the count field on the wire, in bytes.
    const WIDTH: usize;

    /// Serializes a count at the start of `out`.
    fn write_count(count: u32, out: &mut [u8]);

    /// Deserializes a count from the start of `input`.
    fn read_count(input: &[u8]) -> u32;
}

impl RunCount for u8 {
    const MAX_RUN: u32 = u8::MAX as u32;
    const WIDTH: usize = 1;

    fn write_count(count: u32, out: &mut [u8]) {
        out[0] = count as u8;
    }

    fn read_count(input: &[u8]) -> u32 {
        u32::from(input[0])
    }
}

impl RunCount for u16 {
    const MAX_RUN: u32 = u16::MAX as u32;
    const WIDTH: usize = 2;

    fn write_count(count: u32, out: &mut [u8]) {
        out[..2].copy_from_slice(&(count as u16).to_le_bytes());
    }

    fn read_count(input: &[u8]) -> u32 {
        u32::from(u16::from_le_bytes([input[0], input[1]]))
    }
}

/// Writes one `(count, byte)` packet at `offset`, returning the new offset.
fn flush_run<C: RunCount>(
    count: u32,
    byte: u8,
    output: &mut [u8],
    offset: usize,
) -> Result<usize> {
    if offset + C::WIDTH + 1 > output.len() {
        return Err(Error::OutputTooSmall { decoded: offset });
    }
    C::write_count(count, &mut output[offset..]);
    output[offset + C::WIDTH] = byte;
    Ok(offset + C::WIDTH + 1)
}

/// Compresses `input` into `output` as a packet stream, returning the
/// number of bytes written.
///
/// Runs are flushed when the byte value changes or the count saturates at
/// [`RunCount::MAX_RUN`]; a zero count never appears on the wire. An empty
/// input encodes to zero bytes.
///
/// # Errors
/// Returns [`Error::OutputTooSmall`] (with the bytes written so far) if a
/// packet no longer fits in `output`; incompressible data needs up to
/// `WIDTH + 1` output bytes per input byte.
pub fn easy_encode<C: RunCount>(input: &[u8], output: &mut [u8]) -> Result<usize> {
    let Some(&first) = input.first() else {
        return Ok(0);
    };

    let mut bytes_written = 0;
    let mut run_count = 0u32;
    let mut run_byte = first;

    for &b in input {
        if b != run_byte || run_count == C::MAX_RUN {
            bytes_written = flush_run::<C>(run_count, run_byte, output, bytes_written)?;
            run_count = 0;
            run_byte = b;
        }
        run_count += 1;
    }

    // Residual run at the end. The count is never 0 here: the loop always
    // counts the byte it just flushed for.
    flush_run::<C>(run_count, run_byte, output, bytes_written)
}

/// Expands a packet stream from `input` into `output`, returning the
/// number of bytes produced.
///
/// # Errors
/// Returns [`Error::OutputTooSmall`] if `output` fills while a packet
/// still owes bytes, and [`Error::TruncatedStream`] if `input` ends in the
/// middle of a packet. Both carry the byte count produced so far.
pub fn easy_decode<C: RunCount>(input: &[u8], output: &mut [u8]) -> Result<usize> {
    let packet = C::WIDTH + 1;
    let mut bytes_written = 0;
    let mut offset = 0;

    while offset < input.len() {
        if offset + packet > input.len() {
            return Err(Error::TruncatedStream {
                decoded: bytes_written,
            });
        }
        let run_count = C::read_count(&input[offset..]);
        let run_byte = input[offset + C::WIDTH];
        offset += packet;

        for _ in 0..run_count {
            if bytes_written == output.len() {
                return Err(Error::OutputTooSmall {
                    decoded: bytes_written,
                });
            }
            output[bytes_written] = run_byte;
            bytes_written += 1;
        }
    }

    Ok(bytes_written)
}

// ========================================================
// Tests
// ========================================================
